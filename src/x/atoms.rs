//! The fixed table of [`Atom`]s used by the panel

use crate::error::{Error, Result};
use serde::Serialize;
use strum::IntoEnumIterator;
use strum_macros::{Display, EnumIter, IntoStaticStr};
use x11rb::{
    connection::Connection,
    protocol::xproto::{Atom, ConnectionExt as _},
    NONE,
};

// === Atoms === [[[

/// An [`Atom`] is a unique ID corresponding to a string name that is used to
/// identify properties, types, and selections. See the [Client Properties][1]
/// and [Extended Properties][2] for more information.
///
/// The discriminant of each variant is its index in the [`AtomTable`]; the
/// order of this list is the order in which names are interned.
///
/// [1]: https://specifications.freedesktop.org/wm-spec/wm-spec-latest.html
/// [2]: https://tronche.com/gui/x/icccm/sec-4.html#s-4.1.2
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, EnumIter, IntoStaticStr, Display, Serialize,
)]
#[serde(into = "&'static str")]
pub enum XAtom {
    // ========== ICCCM window manager properties ====== [[[
    /// Top-level windows not in withdrawn have this tag
    #[strum(serialize = "WM_STATE")]
    WmState,
    // ]]]

    // ============== EWMH root properties ============= [[[
    /// Array of null-terminated strings for all virtual desktops
    #[strum(serialize = "_NET_DESKTOP_NAMES")]
    NetDesktopNames,
    /// Atoms describing the window's state
    #[strum(serialize = "_NET_WM_STATE")]
    NetWmState,
    /// Window ID of active window or none if no window is focused
    #[strum(serialize = "_NET_ACTIVE_WINDOW")]
    NetActiveWindow,
    /// Request to close a window
    #[strum(serialize = "_NET_CLOSE_WINDOW")]
    NetCloseWindow,
    // ]]]

    // ========== EWMH application properties ========== [[[
    /// If set, preferred to WM_NAME
    #[strum(serialize = "_NET_WM_NAME")]
    NetWmName,
    /// Title of the icon (preferred over WM_ICON_NAME)
    #[strum(serialize = "_NET_WM_ICON_NAME")]
    NetWmIconName,
    /// If the window manager displays an icon name other than
    /// `_NET_WM_ICON_NAME`
    #[strum(serialize = "_NET_WM_VISIBLE_ICON_NAME")]
    NetWmVisibleIconName,
    /// Contains geometry for each desktop
    #[strum(serialize = "_NET_WORKAREA")]
    NetWorkarea,
    #[strum(serialize = "_NET_WM_ICON")]
    NetWmIcon,
    #[strum(serialize = "_NET_WM_ICON_GEOMETRY")]
    NetWmIconGeometry,
    /// If the window manager displays a name other than `_NET_WM_NAME`
    #[strum(serialize = "_NET_WM_VISIBLE_NAME")]
    NetWmVisibleName,
    // ]]]

    // === EWMH window states === [[[
    #[strum(serialize = "_NET_WM_STATE_SKIP_TASKBAR")]
    NetWmStateSkipTaskbar,
    #[strum(serialize = "_NET_WM_STATE_SHADED")]
    NetWmStateShaded,
    #[strum(serialize = "_NET_WM_STATE_HIDDEN")]
    NetWmStateHidden,
    #[strum(serialize = "_NET_WM_STATE_DEMANDS_ATTENTION")]
    NetWmStateDemandsAttention,
    // ]]]

    /// Desktop the window is on
    #[strum(serialize = "_NET_WM_DESKTOP")]
    NetWmDesktop,
    #[strum(serialize = "_NET_MOVERESIZE_WINDOW")]
    NetMoveresizeWindow,

    // =============== EWMH window types =============== [[[
    #[strum(serialize = "_NET_WM_WINDOW_TYPE")]
    NetWmWindowType,
    #[strum(serialize = "_NET_WM_WINDOW_TYPE_DOCK")]
    NetWmWindowTypeDock,
    #[strum(serialize = "_NET_WM_WINDOW_TYPE_DESKTOP")]
    NetWmWindowTypeDesktop,
    // ]]]

    #[strum(serialize = "_NET_WM_STRUT")]
    NetWmStrut,
    #[strum(serialize = "_NET_WM_STRUT_PARTIAL")]
    NetWmStrutPartial,
    /// All windows managed by the window manager, oldest first
    #[strum(serialize = "_NET_CLIENT_LIST")]
    NetClientList,
    /// All windows managed by the window manager, bottom-to-top
    #[strum(serialize = "_NET_CLIENT_LIST_STACKING")]
    NetClientListStacking,
    #[strum(serialize = "_NET_NUMBER_OF_DESKTOPS")]
    NetNumberOfDesktops,
    #[strum(serialize = "_NET_CURRENT_DESKTOP")]
    NetCurrentDesktop,
    #[strum(serialize = "_NET_FRAME_EXTENTS")]
    NetFrameExtents,
    #[strum(serialize = "_NET_SYSTEM_TRAY_OPCODE")]
    NetSystemTrayOpcode,
    #[strum(serialize = "_NET_SHOWING_DESKTOP")]
    NetShowingDesktop,

    /// UTF-8 encoded string data
    #[strum(serialize = "UTF8_STRING")]
    Utf8String,
    #[strum(serialize = "_MOTIF_WM_HINTS")]
    MotifWmHints,

    // ============= Root background pixmap ============ [[[
    #[strum(serialize = "_XROOTPMAP_ID")]
    XRootPmapId,
    #[strum(serialize = "ESETROOT_PMAP_ID")]
    EsetrootPmapId,
    // ]]]

    // ================ Drag and drop ================== [[[
    #[strum(serialize = "XdndAware")]
    XdndAware,
    #[strum(serialize = "XdndPosition")]
    XdndPosition,
    #[strum(serialize = "XdndStatus")]
    XdndStatus,
    // ]]]

    // ============= Core protocol atoms =============== [[[
    // Interning a predefined name returns its predefined id
    /// A Latin-1 string
    #[strum(serialize = "STRING")]
    String,
    /// A cardinal number
    #[strum(serialize = "CARDINAL")]
    Cardinal,
    /// An X11-Atom
    #[strum(serialize = "ATOM")]
    Atom,
    /// An X11 window ID
    #[strum(serialize = "WINDOW")]
    Window,
    /// An X11 pixmap ID
    #[strum(serialize = "PIXMAP")]
    Pixmap,
    #[strum(serialize = "VISUALID")]
    VisualId,
    /// Title or name of the window
    #[strum(serialize = "WM_NAME")]
    WmName,
    #[strum(serialize = "WM_ICON_NAME")]
    WmIconName,
    /// Urgency, input model and initial state of the window
    #[strum(serialize = "WM_HINTS")]
    WmHints,
    // ]]]
}

impl XAtom {
    /// The protocol name of the [`XAtom`]
    pub fn name(self) -> &'static str {
        self.into()
    }

    /// Number of names in the table
    pub fn count() -> usize {
        Self::iter().count()
    }
}

// ]]] === Atoms ===

// ============================ AtomTable ============================= [[[

/// Interned ids for every [`XAtom`], indexed by the variant's discriminant
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AtomTable {
    /// Ids in [`XAtom`] order
    ids: Vec<Atom>,
}

impl AtomTable {
    /// Intern every [`XAtom`] name in one batch.
    ///
    /// All requests are sent before the first reply is read, so this costs a
    /// single round trip
    pub fn intern<C: Connection>(conn: &C) -> Result<Self> {
        log::debug!("interning {} Atoms", XAtom::count());
        let cookies = XAtom::iter()
            .map(|atom| conn.intern_atom(false, atom.name().as_bytes()))
            .collect::<Result<Vec<_>, _>>()?;

        let ids = cookies
            .into_iter()
            .map(|cookie| cookie.reply().map(|reply| reply.atom))
            .collect::<Result<Vec<_>, _>>()?;

        Self::from_ids(ids)
    }

    /// Build a table from ids given in [`XAtom`] order
    pub fn from_ids(ids: Vec<Atom>) -> Result<Self> {
        let expected = XAtom::count();
        if ids.len() != expected {
            return Err(Error::AtomTable {
                expected,
                found: ids.len(),
            });
        }

        for (atom, id) in XAtom::iter().zip(&ids) {
            if *id == NONE {
                log::debug!("`{}` is not known to the server", atom);
            }
        }

        Ok(Self { ids })
    }

    /// Return the id of the given [`XAtom`]
    pub fn get(&self, atom: XAtom) -> Atom {
        self.ids[atom as usize]
    }

    /// Find the [`XAtom`] an id belongs to
    pub fn symbol(&self, id: Atom) -> Option<XAtom> {
        if id == NONE {
            return None;
        }
        XAtom::iter().find(|atom| self.get(*atom) == id)
    }

    /// Check whether the id is the one interned for `atom`
    pub fn is(&self, id: Atom, atom: XAtom) -> bool {
        id != NONE && self.get(atom) == id
    }
} // ]]] === AtomTable ===
