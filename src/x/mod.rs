//! Everything that talks to the X-Server
//!
//! The live [`XConnection`](xconnection::XConnection) and the in-memory
//! server used by the tests both implement the traits in this module, so the
//! classification and naming rules never depend on a running display.

pub mod atoms;
pub mod extension;
pub mod message;
pub mod name;
pub mod property;
pub mod state;
pub mod trap;
pub mod xconnection;

#[cfg(test)]
pub(crate) mod dummy;

use self::{atoms::AtomTable, trap::ErrorTrap};
use x11rb::protocol::xproto::Window;

/// State every request against the server needs
pub trait XContext {
    /// The interned [`AtomTable`]
    fn atoms(&self) -> &AtomTable;

    /// The root window of the screen in use
    fn root(&self) -> Window;

    /// The [`ErrorTrap`] requests are routed through
    fn error_trap(&self) -> &ErrorTrap;
}
