use crate::ShutdownCoordinator;

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tokio::sync::broadcast;

/// Per-task view of a [`ShutdownCoordinator`]
pub struct ShutdownGuard {
    shutdown_rx: broadcast::Receiver<()>,
    triggered: Arc<AtomicBool>,
}

impl ShutdownGuard {
    pub fn new(coordinator: &ShutdownCoordinator) -> Self {
        Self {
            shutdown_rx: coordinator.subscribe(),
            triggered: coordinator.triggered_flag(),
        }
    }

    /// Resolve once shutdown has been triggered, including before this guard existed
    pub async fn wait(&mut self) {
        if self.triggered.load(Ordering::SeqCst) {
            return;
        }
        let _ = self.shutdown_rx.recv().await;
    }

    /// Non-blocking check
    pub fn poll_shutdown(&mut self) -> bool {
        matches!(self.shutdown_rx.try_recv(), Ok(_)) || self.triggered.load(Ordering::SeqCst)
    }
}
