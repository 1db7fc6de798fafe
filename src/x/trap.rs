//! Turning protocol errors into a flag that can be polled
//!
//! A window can disappear between the moment it is discovered and the moment
//! it is queried. Requests made on its behalf inside an [`ErrorTrap`] have
//! their protocol errors recorded instead of returned.

use crate::error::{Error, Result};
use std::cell::Cell;

/// State shared by the connection and the active [`TrapGuard`]
#[derive(Debug, Default)]
pub struct ErrorTrap {
    /// Is a [`TrapGuard`] alive?
    active:  Cell<bool>,
    /// Has a protocol error been recorded since the guard was created?
    tripped: Cell<bool>,
}

impl ErrorTrap {
    /// Create a new, inactive [`ErrorTrap`]
    pub fn new() -> Self {
        Self::default()
    }

    /// Start trapping protocol errors.
    ///
    /// Only one trap may be active at a time; entering a second one returns
    /// [`Error::TrapAlreadyActive`]
    pub fn enter(&self) -> Result<TrapGuard<'_>> {
        if self.active.replace(true) {
            log::error!("attempted to nest error traps");
            return Err(Error::TrapAlreadyActive);
        }
        log::trace!("entering error trap");
        self.tripped.set(false);

        Ok(TrapGuard { trap: self })
    }

    /// Is a trap currently active?
    pub fn is_active(&self) -> bool {
        self.active.get()
    }

    /// Has a protocol error been recorded and not yet consumed?
    pub fn is_tripped(&self) -> bool {
        self.tripped.get()
    }

    /// Route the outcome of a request through the trap.
    ///
    /// Protocol errors are recorded and turned into `Ok(None)` while the trap
    /// is active. Outside of a trap they are returned unchanged, as are
    /// connection errors in either case
    pub(crate) fn absorb<T>(&self, res: Result<T>) -> Result<Option<T>> {
        match res {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.is_protocol() && self.active.get() => {
                log::debug!("trapped: {}", e);
                self.tripped.set(true);
                Ok(None)
            },
            Err(e) => {
                if e.is_protocol() {
                    log::error!("untrapped {}", e);
                }
                Err(e)
            },
        }
    }
}

/// A scope in which protocol errors are recorded instead of returned.
///
/// Call [`TrapGuard::release`] to leave the scope and learn whether an error
/// happened. Dropping the guard leaves the scope and discards the result
#[derive(Debug)]
#[must_use = "the trap is released as soon as the guard is dropped"]
pub struct TrapGuard<'a> {
    /// The trap this guard keeps active
    trap: &'a ErrorTrap,
}

impl TrapGuard<'_> {
    /// Leave the scope, returning whether a protocol error was recorded.
    /// The flag is cleared afterwards
    pub fn release(self) -> bool {
        let tripped = self.trap.tripped.replace(false);
        log::trace!("leaving error trap (tripped: {})", tripped);
        tripped
    }
}

impl Drop for TrapGuard<'_> {
    fn drop(&mut self) {
        self.trap.tripped.set(false);
        self.trap.active.set(false);
    }
}
