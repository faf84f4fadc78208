//! Desktop notification backend.

use tules_core::{Notifier, NotifyError};

/// Shows reminders through the desktop notification service.
///
/// `show` waits on the notification daemon; the companion process runs
/// this behind a `BackgroundNotifier`.
#[derive(Debug, Default, Clone, Copy)]
pub struct DesktopNotifier;

impl Notifier for DesktopNotifier {
    fn notify(&self, title: &str, body: &str) -> Result<(), NotifyError> {
        notify_rust::Notification::new()
            .appname("tules")
            .summary(title)
            .body(body)
            .show()
            .map(|_| ())
            .map_err(|e| NotifyError::Unavailable(e.to_string()))
    }
}
