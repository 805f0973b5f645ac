use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Shared interrupt flag, tripped from the Ctrl-C handler
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    cancelled: Arc<AtomicBool>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }

    /// Install a Ctrl-C handler that trips this token.
    /// A second handler registration fails; that is reported, not fatal.
    pub fn install_ctrlc_handler(&self) {
        let token = self.clone();
        if let Err(e) = ctrlc::set_handler(move || token.cancel()) {
            tracing::warn!(error = %e, "could not install Ctrl-C handler");
        }
    }
}
