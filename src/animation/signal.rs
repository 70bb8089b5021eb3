//! One-shot stop flag shared by all loops of a session.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// A flag that is raised once and never lowered.
///
/// Clones share the same flag. Loops poll it between ticks; only the owner
/// of the session raises it.
///
/// # Examples
///
/// ```
/// use hue_mood::CancellationSignal;
///
/// let signal = CancellationSignal::new();
/// let observer = signal.clone();
/// assert!(!observer.is_cancelled());
///
/// assert!(signal.cancel());
/// assert!(!signal.cancel());
/// assert!(observer.is_cancelled());
/// ```
#[derive(Debug, Clone, Default)]
pub struct CancellationSignal {
    cancelled: Arc<AtomicBool>,
}

impl CancellationSignal {
    pub fn new() -> Self {
        Self::default()
    }

    /// Raise the flag. Returns `true` only for the call that raised it.
    pub fn cancel(&self) -> bool {
        !self.cancelled.swap(true, Ordering::SeqCst)
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}
