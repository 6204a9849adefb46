use tokio::sync::mpsc;
use tracing::debug;

/// Pushes human-readable progress lines to an optional channel; the CLI wires
/// the channel to a spinner. Headless callers still get every line on the
/// debug log.
pub struct ProgressReporter(Option<mpsc::UnboundedSender<String>>);

impl ProgressReporter {
    pub fn new(tx: Option<mpsc::UnboundedSender<String>>) -> Self {
        Self(tx)
    }

    pub fn disabled() -> Self {
        Self(None)
    }

    pub fn report(&self, message: impl Into<String>) {
        let message = message.into();
        debug!("{message}");
        if let Some(tx) = &self.0 {
            let _ = tx.send(message);
        }
    }
}
