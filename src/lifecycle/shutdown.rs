//! Shutdown coordination for the proxy.

use tokio::sync::watch;

/// Coordinator for graceful shutdown.
///
/// Cloneable handle around a watch channel; any clone can trigger, every
/// clone can wait. Waiting after the trigger resolves immediately.
#[derive(Clone, Debug)]
pub struct Shutdown {
    tx: watch::Sender<bool>,
    rx: watch::Receiver<bool>,
}

impl Shutdown {
    /// Create a new shutdown coordinator.
    pub fn new() -> Self {
        let (tx, rx) = watch::channel(false);
        Self { tx, rx }
    }

    /// Trigger the shutdown signal.
    pub fn trigger(&self) {
        let _ = self.tx.send(true);
    }

    /// Wait until shutdown has been triggered.
    pub async fn wait(mut self) {
        // wait_for resolves immediately if the value is already true.
        let _ = self.rx.wait_for(|triggered| *triggered).await;
    }
}

impl Default for Shutdown {
    fn default() -> Self {
        Self::new()
    }
}
