//! Re-entrancy protection for gesture handlers.

use std::cell::Cell;
use std::rc::Rc;

/// Lets one interaction run at a time; nested attempts are refused.
#[derive(Debug, Clone, Default)]
pub struct InteractionGuard {
    busy: Rc<Cell<bool>>,
}

/// Held while an interaction runs. Releases the guard when dropped.
#[derive(Debug)]
pub struct InteractionToken {
    busy: Rc<Cell<bool>>,
}

impl Drop for InteractionToken {
    fn drop(&mut self) {
        self.busy.set(false);
    }
}

impl InteractionGuard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start an interaction, or `None` if one is already running.
    pub fn enter(&self) -> Option<InteractionToken> {
        if self.busy.replace(true) {
            log::debug!("ignoring nested interaction");
            return None;
        }
        Some(InteractionToken {
            busy: self.busy.clone(),
        })
    }

    pub fn is_busy(&self) -> bool {
        self.busy.get()
    }

    /// Run `f` unless an interaction is already running.
    pub fn perform<R>(&self, f: impl FnOnce() -> R) -> Option<R> {
        let _token = self.enter()?;
        Some(f())
    }
}
