use std::time::Duration;

use tokio::sync::mpsc;
use tracing::info;

use super::{Bridge, Flow, Request};
use crate::shortcuts::ShortcutBackend;

/// Longest single sleep. Waking up at least this often lets the loop notice
/// wall-clock jumps (suspend, manual clock changes) without a tick storm.
const MAX_SLEEP: Duration = Duration::from_secs(60);

impl<B: ShortcutBackend> Bridge<B> {
    /// Run until `quit` arrives or the request channel closes.
    ///
    /// Requests, hotkey presses, auth completions and timer deadlines are
    /// all handled on this one task, in arrival order. `hotkeys` carries
    /// the ids of pressed global hotkeys.
    pub async fn run(
        mut self,
        mut requests: mpsc::Receiver<Request>,
        mut hotkeys: mpsc::UnboundedReceiver<u32>,
    ) {
        self.start();

        loop {
            let sleep = self.time_until_due();
            tokio::select! {
                request = requests.recv() => {
                    let Some(request) = request else {
                        info!("request channel closed");
                        self.shutdown();
                        break;
                    };
                    if self.handle(request) == Flow::Quit {
                        break;
                    }
                }
                Some(id) = hotkeys.recv() => {
                    self.hotkey_pressed(id);
                }
                Some(done) = self.auth_rx.recv() => {
                    self.complete_auth(done);
                }
                _ = sleep_or_forever(sleep) => {
                    self.tick();
                }
            }
        }
    }

    fn time_until_due(&self) -> Option<Duration> {
        let due = self.next_due()?;
        let until = (due - self.clock.now().to_utc())
            .to_std()
            .unwrap_or(Duration::ZERO);
        Some(until.min(MAX_SLEEP))
    }
}

async fn sleep_or_forever(duration: Option<Duration>) {
    match duration {
        Some(d) => tokio::time::sleep(d).await,
        None => std::future::pending().await,
    }
}
