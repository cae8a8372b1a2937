//! Cooperative cancellation
//!
//! Analysis passes take an explicit `CancellationToken` and consult it at
//! each node-visit boundary. Observing a cancelled token aborts the pass
//! with `CslintError::Cancelled`; the caller discards any partial results.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::error::CslintError;
use crate::result::Result;

/// Shareable cancellation signal. Cloning is cheap; all clones observe the
/// same flag.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    cancelled: Arc<AtomicBool>,
}

impl CancellationToken {
    /// Create a token that is never cancelled unless `cancel` is called
    pub fn new() -> Self {
        Self::default()
    }

    /// Signal cancellation to all clones of this token
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Relaxed);
    }

    /// Whether cancellation has been requested
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Relaxed)
    }

    /// Abort the current pass if cancellation has been requested
    pub fn check(&self) -> Result<()> {
        if self.is_cancelled() {
            Err(CslintError::Cancelled)
        } else {
            Ok(())
        }
    }
}
