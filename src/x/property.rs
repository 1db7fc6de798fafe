//! Properties on the server

use crate::{
    error::Result,
    x::{atoms::XAtom, XContext},
};
use bitflags::bitflags;
use std::convert::TryFrom;
use x11rb::{
    protocol::xproto::{Atom, Pixmap, Visualid, Window},
    NONE,
};

// ============================= Property =============================

/// The value of a window property as reported by the server
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Property {
    /// The type the server reports for the property
    pub type_:  Atom,
    /// Size of each item in bits (8, 16 or 32). Zero if the property is missing
    pub format: u8,
    /// Raw item data in the connection's byte order
    pub value:  Vec<u8>,
}

impl Property {
    /// The reply the server gives for a property that is not set
    pub const fn missing() -> Self {
        Self {
            type_:  NONE,
            format: 0,
            value:  Vec::new(),
        }
    }

    /// Build a 32-bit property from its items
    pub fn from_u32s(type_: Atom, items: &[u32]) -> Self {
        Self {
            type_,
            format: 32,
            value: items.iter().flat_map(|item| item.to_ne_bytes()).collect(),
        }
    }

    /// Build an 8-bit property from its bytes
    pub fn from_bytes(type_: Atom, bytes: &[u8]) -> Self {
        Self {
            type_,
            format: 8,
            value: bytes.to_vec(),
        }
    }

    /// Number of items in the property
    pub fn len(&self) -> usize {
        match self.format {
            8 | 16 | 32 => self.value.len() / usize::from(self.format / 8),
            _ => 0,
        }
    }

    /// Whether the property holds no items
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Iterate over the items of a 32-bit property
    pub fn value32(&self) -> Option<impl Iterator<Item = u32> + '_> {
        (self.format == 32).then(|| {
            self.value
                .chunks_exact(4)
                .map(|c| u32::from_ne_bytes([c[0], c[1], c[2], c[3]]))
        })
    }

    /// The first item of a 32-bit property
    pub fn first32(&self) -> Option<u32> {
        self.value32().and_then(|mut items| items.next())
    }
}

// ========================== PropertyReader ==========================

/// Typed access to window properties.
///
/// Implementors provide the two wire operations; everything else is built on
/// top of them. A property that is missing, or whose type is not the one asked
/// for, is *absent*: `Ok(None)` or the caller's default, never an error
pub trait PropertyReader: XContext {
    /// Issue one `GetProperty` request at offset `0` with no item limit.
    ///
    /// A missing property is answered with [`Property::missing`]; a property
    /// of another type carries that type and no data
    fn fetch_property(&self, window: Window, property: Atom, type_: Atom) -> Result<Property>;

    /// Replace a property with 32-bit items
    fn store_property32(&self, window: Window, property: Atom, type_: Atom, data: &[u32])
        -> Result<()>;

    /// Return the interned id of an [`XAtom`]
    fn atom(&self, atom: XAtom) -> Atom {
        self.atoms().get(atom)
    }

    /// Read a property by its raw ids, returning `None` when it is absent or
    /// not of type `type_`
    fn read_raw(&self, window: Window, property: Atom, type_: Atom) -> Result<Option<Property>> {
        if property == NONE || type_ == NONE {
            return Ok(None);
        }

        let reply = match self
            .error_trap()
            .absorb(self.fetch_property(window, property, type_))?
        {
            Some(reply) => reply,
            None => return Ok(None),
        };

        if reply.type_ != type_ {
            if reply.type_ != NONE {
                log::trace!(
                    "Window({:#0x}): property {} has type {}, wanted {}",
                    window,
                    property,
                    reply.type_,
                    type_
                );
            }
            return Ok(None);
        }

        Ok(Some(reply))
    }

    /// Read a property, returning `None` when it is absent or not of type
    /// `type_`
    fn read(&self, window: Window, property: XAtom, type_: XAtom) -> Result<Option<Property>> {
        log::trace!("reading `{}` ({}) from Window({:#0x})", property, type_, window);
        self.read_raw(window, self.atom(property), self.atom(type_))
    }

    /// Read every item of a 32-bit property, empty when absent
    fn read_list(&self, window: Window, property: XAtom, type_: XAtom) -> Result<Vec<u32>> {
        Ok(self
            .read(window, property, type_)?
            .and_then(|prop| prop.value32().map(Iterator::collect))
            .unwrap_or_default())
    }

    /// Read a list of `ATOM`s such as `_NET_WM_STATE`
    fn read_atoms(&self, window: Window, property: XAtom) -> Result<Vec<Atom>> {
        self.read_list(window, property, XAtom::Atom)
    }

    /// Read the first item of a 32-bit property of the given type
    fn read_first(&self, window: Window, property: XAtom, type_: XAtom) -> Result<Option<u32>> {
        Ok(self
            .read(window, property, type_)?
            .and_then(|prop| prop.first32()))
    }

    /// Read a `CARDINAL`, returning `default` when absent
    fn read_int(&self, window: Window, property: XAtom, default: u32) -> Result<u32> {
        Ok(self
            .read_first(window, property, XAtom::Cardinal)?
            .unwrap_or(default))
    }

    /// Read a `WINDOW` id, returning `default` when absent
    fn read_window(&self, window: Window, property: XAtom, default: Window) -> Result<Window> {
        Ok(self
            .read_first(window, property, XAtom::Window)?
            .unwrap_or(default))
    }

    /// Read a `PIXMAP` id, returning `default` when absent
    fn read_pixmap(&self, window: Window, property: XAtom, default: Pixmap) -> Result<Pixmap> {
        Ok(self
            .read_first(window, property, XAtom::Pixmap)?
            .unwrap_or(default))
    }

    /// Replace a property with 32-bit items of the given type
    fn write(&self, window: Window, property: XAtom, type_: XAtom, data: &[u32]) -> Result<()> {
        log::debug!("changing `{}` in Window({:#0x})", property, window);
        self.error_trap()
            .absorb(self.store_property32(window, self.atom(property), self.atom(type_), data))
            .map(drop)
    }

    /// Set a single `CARDINAL`
    fn set_int(&self, window: Window, property: XAtom, value: u32) -> Result<()> {
        self.write(window, property, XAtom::Cardinal, &[value])
    }

    /// Set a single `ATOM`
    fn set_atom(&self, window: Window, property: XAtom, value: XAtom) -> Result<()> {
        self.write(window, property, XAtom::Atom, &[self.atom(value)])
    }

    /// Set a single `VISUALID`
    fn set_visualid(&self, window: Window, property: XAtom, value: Visualid) -> Result<()> {
        self.write(window, property, XAtom::VisualId, &[value])
    }

    /// Set an array of `CARDINAL`s
    fn set_array(&self, window: Window, property: XAtom, values: &[u32]) -> Result<()> {
        self.write(window, property, XAtom::Cardinal, values)
    }
}

// ============================== Hints ===============================

bitflags! {
    /// The flags field of `WM_HINTS`
    #[derive(Default)]
    pub struct WmHintsFlags: u32 {
        /// The input field is set
        const INPUT         = 0b0_0000_0001;
        /// The initial state field is set
        const STATE         = 0b0_0000_0010;
        /// The icon pixmap field is set
        const ICON_PIXMAP   = 0b0_0000_0100;
        /// The icon window field is set
        const ICON_WINDOW   = 0b0_0000_1000;
        /// The icon position fields are set
        const ICON_POSITION = 0b0_0001_0000;
        /// The icon mask field is set
        const ICON_MASK     = 0b0_0010_0000;
        /// The window group field is set
        const WINDOW_GROUP  = 0b0_0100_0000;
        /// The window wants the user's attention
        const URGENCY       = 0b1_0000_0000;
    }
}

// ======================= Icccm Window State ======================

/// Possible values of the `WM_STATE` property on a client.
///
/// See the [ICCCM docs][1] for more information.
///
/// [1]: https://tronche.com/gui/x/icccm/sec-4.html#s-4.1.3.1
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum IcccmWindowState {
    /// Newly created windows, or windows the client has withdrawn
    Withdrawn,
    /// Window is visible
    Normal,
    /// Window's icon is visible
    Iconic,
}

impl TryFrom<u32> for IcccmWindowState {
    type Error = u32;

    fn try_from(u: u32) -> Result<Self, Self::Error> {
        match u {
            0 => Ok(Self::Withdrawn),
            1 => Ok(Self::Normal),
            3 => Ok(Self::Iconic),
            other => Err(other),
        }
    }
}

impl From<IcccmWindowState> for u32 {
    fn from(u: IcccmWindowState) -> Self {
        match u {
            IcccmWindowState::Withdrawn => 0,
            IcccmWindowState::Normal => 1,
            IcccmWindowState::Iconic => 3,
        }
    }
}
