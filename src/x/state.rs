//! Classifying top-level windows for the task list
//!
//! Every answer is recomputed from the server on each call

use super::{
    atoms::{AtomTable, XAtom},
    property::{IcccmWindowState, PropertyReader, WmHintsFlags},
};
use crate::error::Result;
use serde::Serialize;
use std::convert::TryFrom;
use x11rb::protocol::xproto::{Atom, Window};

/// Everything the panel needs to know to draw a task button
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct TaskState {
    /// Should the window get a task button?
    pub panel_visible:  bool,
    /// Is the window drawn on the screen?
    pub screen_visible: bool,
    /// Does the window want the user's attention?
    pub urgent:         bool,
    /// Is the window minimized?
    pub iconified:      bool,
    /// Desktop the window is on
    pub desktop:        u32,
}

/// Does `list` contain the id interned for any of `wanted`?
fn contains_any(atoms: &AtomTable, list: &[Atom], wanted: &[XAtom]) -> bool {
    list.iter()
        .any(|id| wanted.iter().any(|atom| atoms.is(*id, *atom)))
}

/// Windows of these types never get a task button
const HIDDEN_TYPES: &[XAtom] = &[XAtom::NetWmWindowTypeDock, XAtom::NetWmWindowTypeDesktop];

/// Classification of a window from its EWMH and ICCCM properties
pub trait WindowStateExt: PropertyReader {
    /// The `WM_STATE` of the window, `None` when absent or unknown
    fn icccm_state(&self, window: Window) -> Result<Option<IcccmWindowState>> {
        Ok(self
            .read_first(window, XAtom::WmState, XAtom::WmState)?
            .and_then(|state| IcccmWindowState::try_from(state).ok()))
    }

    /// Should the window be listed on the panel?
    ///
    /// Docks, desktops, withdrawn windows and windows that ask to skip the
    /// taskbar are not
    fn is_visible_on_panel(&self, window: Window) -> Result<bool> {
        let types = self.read_atoms(window, XAtom::NetWmWindowType)?;
        if contains_any(self.atoms(), &types, HIDDEN_TYPES) {
            return Ok(false);
        }

        if self.icccm_state(window)? == Some(IcccmWindowState::Withdrawn) {
            return Ok(false);
        }

        let states = self.read_atoms(window, XAtom::NetWmState)?;
        Ok(!contains_any(self.atoms(), &states, &[XAtom::NetWmStateSkipTaskbar]))
    }

    /// Is the window drawn on the screen? Same as
    /// [`is_visible_on_panel`](Self::is_visible_on_panel), but hidden windows
    /// are excluded as well
    fn is_visible_on_screen(&self, window: Window) -> Result<bool> {
        if !self.is_visible_on_panel(window)? {
            return Ok(false);
        }

        let states = self.read_atoms(window, XAtom::NetWmState)?;
        Ok(!contains_any(self.atoms(), &states, &[XAtom::NetWmStateHidden]))
    }

    /// Does the window demand attention?
    fn is_urgent(&self, window: Window) -> Result<bool> {
        let flags = self
            .read_first(window, XAtom::WmHints, XAtom::WmHints)?
            .map(WmHintsFlags::from_bits_truncate)
            .unwrap_or_default();
        if flags.contains(WmHintsFlags::URGENCY) {
            return Ok(true);
        }

        let states = self.read_atoms(window, XAtom::NetWmState)?;
        Ok(contains_any(self.atoms(), &states, &[
            XAtom::NetWmStateDemandsAttention,
        ]))
    }

    /// Is the window minimized?
    fn is_iconified(&self, window: Window) -> Result<bool> {
        if self.icccm_state(window)? == Some(IcccmWindowState::Iconic) {
            return Ok(true);
        }

        let states = self.read_atoms(window, XAtom::NetWmState)?;
        Ok(contains_any(self.atoms(), &states, &[XAtom::NetWmStateHidden]))
    }

    /// Index of the desktop the window is on, `0` when unset
    fn window_desktop(&self, window: Window) -> Result<u32> {
        self.read_int(window, XAtom::NetWmDesktop, 0)
    }

    /// Gather every classification at once
    fn task_state(&self, window: Window) -> Result<TaskState> {
        Ok(TaskState {
            panel_visible:  self.is_visible_on_panel(window)?,
            screen_visible: self.is_visible_on_screen(window)?,
            urgent:         self.is_urgent(window)?,
            iconified:      self.is_iconified(window)?,
            desktop:        self.window_desktop(window)?,
        })
    }
}

impl<T: PropertyReader + ?Sized> WindowStateExt for T {}

#[cfg(test)]
mod tests {
    use super::{TaskState, WindowStateExt};
    use crate::x::{
        atoms::XAtom,
        dummy::DummyServer,
        property::{IcccmWindowState, WmHintsFlags},
    };

    #[test]
    fn plain_window_is_visible() {
        let server = DummyServer::new();
        let win = server.add_window();

        assert_eq!(server.task_state(win).unwrap(), TaskState {
            panel_visible:  true,
            screen_visible: true,
            urgent:         false,
            iconified:      false,
            desktop:        0,
        });
    }

    #[test]
    fn skip_taskbar_hides_everywhere() {
        let server = DummyServer::new();
        let win = server.add_window();
        server.set_atoms(win, XAtom::NetWmState, &[XAtom::NetWmStateShaded]);
        assert!(server.is_visible_on_panel(win).unwrap());

        server.set_atoms(win, XAtom::NetWmState, &[
            XAtom::NetWmStateShaded,
            XAtom::NetWmStateSkipTaskbar,
        ]);
        assert!(!server.is_visible_on_panel(win).unwrap());
        assert!(!server.is_visible_on_screen(win).unwrap());
    }

    #[test]
    fn docks_and_withdrawn_are_not_tasks() {
        let server = DummyServer::new();

        let dock = server.add_window();
        server.set_atoms(dock, XAtom::NetWmWindowType, &[XAtom::NetWmWindowTypeDock]);
        assert!(!server.is_visible_on_panel(dock).unwrap());

        let withdrawn = server.add_window();
        server.set(withdrawn, XAtom::WmState, XAtom::WmState, &[
            IcccmWindowState::Withdrawn.into(),
            0,
        ]);
        assert!(!server.is_visible_on_panel(withdrawn).unwrap());
        assert_eq!(
            server.icccm_state(withdrawn).unwrap(),
            Some(IcccmWindowState::Withdrawn)
        );

        // A `WM_STATE` of the wrong type is ignored
        let mistyped = server.add_window();
        server.set(mistyped, XAtom::WmState, XAtom::Cardinal, &[0]);
        assert!(server.is_visible_on_panel(mistyped).unwrap());
    }

    #[test]
    fn hidden_is_iconified_but_listed() {
        let server = DummyServer::new();
        let win = server.add_window();
        server.set_atoms(win, XAtom::NetWmState, &[XAtom::NetWmStateHidden]);

        assert!(server.is_visible_on_panel(win).unwrap());
        assert!(!server.is_visible_on_screen(win).unwrap());
        assert!(server.is_iconified(win).unwrap());

        let iconic = server.add_window();
        server.set(iconic, XAtom::WmState, XAtom::WmState, &[
            IcccmWindowState::Iconic.into(),
            0,
        ]);
        assert!(server.is_iconified(iconic).unwrap());
        assert!(server.is_visible_on_screen(iconic).unwrap());
    }

    #[test]
    fn urgency_from_hints_or_state() {
        let server = DummyServer::new();

        let hinted = server.add_window();
        server.set(hinted, XAtom::WmHints, XAtom::WmHints, &[
            (WmHintsFlags::INPUT | WmHintsFlags::URGENCY).bits(),
            1,
            0,
            0,
            0,
            0,
            0,
            0,
            0,
        ]);
        assert!(server.is_urgent(hinted).unwrap());

        let calm = server.add_window();
        server.set(calm, XAtom::WmHints, XAtom::WmHints, &[WmHintsFlags::INPUT.bits()]);
        assert!(!server.is_urgent(calm).unwrap());

        server.set_atoms(calm, XAtom::NetWmState, &[XAtom::NetWmStateDemandsAttention]);
        assert!(server.is_urgent(calm).unwrap());
    }

    #[test]
    fn desktop_defaults_to_zero() {
        let server = DummyServer::new();
        let win = server.add_window();
        assert_eq!(server.window_desktop(win).unwrap(), 0);

        server.set(win, XAtom::NetWmDesktop, XAtom::Cardinal, &[3]);
        assert_eq!(server.task_state(win).unwrap().desktop, 3);
    }
}
