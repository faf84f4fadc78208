//! The companion process.
//!
//! Composition root: opens the store, wires the notifier, auth provider and
//! global shortcuts into a bridge, and pumps newline-delimited JSON between
//! stdin/stdout and the bridge's event loop.

use clap::Args;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};
use tules_core::error::Result;
use tules_core::{
    BackgroundNotifier, BindingTable, Bridge, GlobalShortcuts, LogNotifier, Notifier, Outbound,
    Request, ShortcutBackend, SpotifyAuth, SystemClock,
};

use super::open_store;
use crate::notifier::DesktopNotifier;

const REQUEST_BUFFER: usize = 64;

#[derive(Args)]
pub struct RunArgs {
    /// Log reminders instead of showing desktop notifications
    #[arg(long)]
    pub log_notify: bool,

    /// Don't grab global hotkeys; presses arrive as `shortcut` requests
    #[arg(long)]
    pub no_hotkeys: bool,

    /// Token endpoint for the music service auth exchange
    #[arg(long, default_value = tules_core::auth::SPOTIFY_TOKEN_URL)]
    pub token_url: String,
}

pub fn run(data_dir: Option<PathBuf>, args: RunArgs) -> Result<()> {
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;
    let result = runtime.block_on(serve(data_dir, args));
    // A pending stdin read can't be canceled; don't wait for it.
    runtime.shutdown_background();
    result
}

async fn serve(data_dir: Option<PathBuf>, args: RunArgs) -> Result<()> {
    let store = open_store(data_dir)?;
    if let Some(path) = store.path() {
        info!(path = %path.display(), "using config store");
    }

    let notifier: Box<dyn Notifier> = if args.log_notify {
        Box::new(LogNotifier)
    } else {
        Box::new(BackgroundNotifier::new(DesktopNotifier))
    };

    let (shortcuts, hotkey_rx) = shortcut_backend(args.no_hotkeys);

    let (out_tx, out_rx) = mpsc::unbounded_channel();
    let bridge = Bridge::new(
        store,
        shortcuts,
        notifier,
        Arc::new(SpotifyAuth::with_token_url(args.token_url)),
        Box::new(SystemClock),
        out_tx,
    );

    let (req_tx, req_rx) = mpsc::channel(REQUEST_BUFFER);
    let reader = tokio::spawn(read_requests(req_tx));
    let writer = tokio::spawn(write_events(out_rx));

    bridge.run(req_rx, hotkey_rx).await;

    reader.abort();
    // The bridge owned the only sender, so the writer drains and exits.
    if let Err(e) = writer.await {
        warn!("event writer stopped abnormally: {e}");
    }
    info!("companion process exiting");
    Ok(())
}

/// OS hotkeys when available, otherwise an in-process table fed by
/// `shortcut` requests. The receiver yields ids of pressed hotkeys.
fn shortcut_backend(
    disabled: bool,
) -> (Box<dyn ShortcutBackend>, mpsc::UnboundedReceiver<u32>) {
    if !disabled {
        match GlobalShortcuts::new() {
            Ok(global) => return (Box::new(global), GlobalShortcuts::pressed_events()),
            Err(e) => warn!("{e}; falling back to shortcut requests"),
        }
    }
    // Sender dropped: the loop sees a closed channel and ignores it.
    let (_, rx) = mpsc::unbounded_channel();
    (Box::new(BindingTable::new()), rx)
}

/// Parse stdin lines into requests. Bad lines are logged and skipped.
async fn read_requests(requests: mpsc::Sender<Request>) {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        let line = match lines.next_line().await {
            Ok(Some(line)) => line,
            Ok(None) => break,
            Err(e) => {
                warn!("stdin read failed: {e}");
                break;
            }
        };
        if line.trim().is_empty() {
            continue;
        }

        match serde_json::from_str::<Request>(&line) {
            Ok(request) => {
                if requests.send(request).await.is_err() {
                    break;
                }
            }
            Err(e) => warn!("ignoring malformed request: {e}"),
        }
    }
    debug!("stdin closed");
}

async fn write_events(mut events: mpsc::UnboundedReceiver<Outbound>) {
    let mut stdout = tokio::io::stdout();
    while let Some(event) = events.recv().await {
        let mut line = match serde_json::to_string(&event) {
            Ok(line) => line,
            Err(e) => {
                warn!("cannot encode event: {e}");
                continue;
            }
        };
        line.push('\n');
        if let Err(e) = stdout.write_all(line.as_bytes()).await {
            warn!("stdout write failed: {e}");
            break;
        }
        let _ = stdout.flush().await;
    }
}
