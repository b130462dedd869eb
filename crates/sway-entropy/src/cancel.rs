//! Cooperative cancellation for long-running entropy sweeps.

use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};

/// Error returned when a computation observed a fired [`CancelToken`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("computation cancelled")]
pub struct Cancelled;

/// Shared flag that asks running computations to stop early.
///
/// Clones share the same flag, so a token handed to a sweep can be fired from
/// another thread. Computations poll it between units of work; a fired token
/// never produces partial results, only [`Cancelled`].
///
/// # Examples
///
/// ```
/// use sway_entropy::cancel::CancelToken;
///
/// let token = CancelToken::new();
/// let watcher = token.clone();
/// assert!(watcher.check().is_ok());
///
/// token.cancel();
/// assert!(watcher.is_cancelled());
/// assert!(watcher.check().is_err());
/// ```
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    flag: Arc<AtomicBool>,
}

impl CancelToken {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Fires the token. Idempotent.
    pub fn cancel(&self) {
        self.flag.store(true, Ordering::Relaxed);
    }

    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::Relaxed)
    }

    /// Returns `Err(Cancelled)` once the token has fired.
    pub fn check(&self) -> Result<(), Cancelled> {
        if self.is_cancelled() {
            Err(Cancelled)
        } else {
            Ok(())
        }
    }
}
