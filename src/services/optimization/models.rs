use super::Error;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Shared cancellation flag for running searches.
///
/// Clones share the same flag. A search checks it before every generation and
/// stops with [`Error::Interrupted`] once it is set; no partial result is returned.
#[derive(Debug, Clone, Default)]
pub struct Interrupt(Arc<AtomicBool>);

impl Interrupt {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn interrupt(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_interrupted(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }

    /// Clears the flag so the handle can be reused for new searches.
    pub fn reset(&self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

/// Fails with [`Error::Interrupted`] when `interrupt` is set.
pub(crate) fn check_interrupt(
    interrupt: Option<&Interrupt>,
    completed_generations: usize,
) -> Result<(), Error> {
    match interrupt {
        Some(flag) if flag.is_interrupted() => {
            tracing::info!(completed_generations, "Search interrupted");
            Err(Error::Interrupted {
                completed_generations,
            })
        }
        _ => Ok(()),
    }
}
