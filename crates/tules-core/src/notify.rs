//! Notification dispatcher boundary.
//!
//! Presenting a notification is the desktop's job; the core only decides
//! when and with what text. `notify` is called from the event loop and must
//! return promptly: wrap backends that block in [`BackgroundNotifier`].

use std::sync::Arc;

use tracing::{info, warn};

use crate::error::NotifyError;

pub trait Notifier: Send {
    fn notify(&self, title: &str, body: &str) -> Result<(), NotifyError>;
}

/// Writes reminders to the log instead of the desktop.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, title: &str, body: &str) -> Result<(), NotifyError> {
        info!(title, body, "notification");
        Ok(())
    }
}

/// Runs a blocking notifier on tokio's blocking pool.
///
/// `notify` only queues the work, so its result says nothing about
/// delivery; delivery failures are logged.
#[derive(Debug)]
pub struct BackgroundNotifier<N> {
    inner: Arc<N>,
}

impl<N> BackgroundNotifier<N>
where
    N: Notifier + Sync + 'static,
{
    pub fn new(inner: N) -> Self {
        Self {
            inner: Arc::new(inner),
        }
    }
}

impl<N> Notifier for BackgroundNotifier<N>
where
    N: Notifier + Sync + 'static,
{
    fn notify(&self, title: &str, body: &str) -> Result<(), NotifyError> {
        let runtime = tokio::runtime::Handle::try_current()
            .map_err(|e| NotifyError::Unavailable(e.to_string()))?;
        let inner = Arc::clone(&self.inner);
        let (title, body) = (title.to_string(), body.to_string());
        runtime.spawn_blocking(move || {
            if let Err(e) = inner.notify(&title, &body) {
                warn!("notification failed: {e}");
            }
        });
        Ok(())
    }
}
