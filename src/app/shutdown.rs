//! Graceful shutdown handling for the runner.
//!
//! Ctrl-C is the only exit signal; it stops the run loop after the current
//! turn so the final reports still print.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Shared shutdown flag.
#[derive(Clone, Default)]
pub struct ShutdownManager {
    shutdown_requested: Arc<AtomicBool>,
}

impl ShutdownManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Spawns a task that requests shutdown on Ctrl-C. Needs a tokio runtime.
    pub fn listen(&self) {
        let manager = self.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                tracing::info!("Ctrl+C received, stopping after this turn...");
                manager.request_shutdown();
            }
        });
    }

    pub fn request_shutdown(&self) {
        self.shutdown_requested.store(true, Ordering::SeqCst);
    }

    pub fn is_shutdown_requested(&self) -> bool {
        self.shutdown_requested.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shutdown_manager_new() {
        let manager = ShutdownManager::new();
        assert!(!manager.is_shutdown_requested());
    }

    #[test]
    fn test_shutdown_request_is_shared_by_clones() {
        let manager = ShutdownManager::new();
        let handle = manager.clone();
        handle.request_shutdown();
        assert!(manager.is_shutdown_requested());
    }
}
