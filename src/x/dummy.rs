//! An in-memory stand-in for the X-Server used by the unit tests

use crate::{
    error::{Error, Result},
    x::{
        atoms::{AtomTable, XAtom},
        message::MessageSender,
        property::{Property, PropertyReader},
        trap::ErrorTrap,
        XContext,
    },
};
use std::{
    cell::{Cell, RefCell},
    collections::HashMap,
};
use x11rb::{
    errors::ConnectionError,
    protocol::xproto::{Atom, ClientMessageEvent, EventMask, Window},
};

/// Id of the dummy root window
const ROOT: Window = 0x0000_0100;

/// A client message that was handed to the server
#[derive(Debug, Clone)]
pub(crate) struct SentMessage {
    /// Window the event was sent to
    pub(crate) destination: Window,
    /// Mask it was sent with
    pub(crate) mask:        EventMask,
    /// The event itself
    pub(crate) event:       ClientMessageEvent,
}

/// Windows and their properties, kept in memory
#[derive(Debug)]
pub(crate) struct DummyServer {
    atoms:    AtomTable,
    trap:     ErrorTrap,
    windows:  RefCell<HashMap<Window, HashMap<Atom, Property>>>,
    next_id:  Cell<Window>,
    sent:     RefCell<Vec<SentMessage>>,
    requests: Cell<usize>,
    broken:   Cell<bool>,
}

impl DummyServer {
    /// Create a server that only has a root window. Atom ids start at `100`
    pub(crate) fn new() -> Self {
        let ids = (0..XAtom::count() as u32).map(|i| 100 + i).collect();
        let mut windows = HashMap::new();
        windows.insert(ROOT, HashMap::new());

        Self {
            atoms:    AtomTable::from_ids(ids).expect("dummy atom table"),
            trap:     ErrorTrap::new(),
            windows:  RefCell::new(windows),
            next_id:  Cell::new(0x0060_0001),
            sent:     RefCell::new(vec![]),
            requests: Cell::new(0),
            broken:   Cell::new(false),
        }
    }

    /// Create a window without properties
    pub(crate) fn add_window(&self) -> Window {
        let id = self.next_id.get();
        self.next_id.set(id + 1);
        self.windows.borrow_mut().insert(id, HashMap::new());
        id
    }

    /// Destroy a window
    pub(crate) fn remove_window(&self, window: Window) {
        self.windows.borrow_mut().remove(&window);
    }

    /// Set a 32-bit property directly
    pub(crate) fn set(&self, window: Window, property: XAtom, type_: XAtom, items: &[u32]) {
        self.insert(
            window,
            property,
            Property::from_u32s(self.atoms.get(type_), items),
        );
    }

    /// Set an 8-bit text property directly
    pub(crate) fn set_text(&self, window: Window, property: XAtom, type_: XAtom, text: &[u8]) {
        self.insert(window, property, Property::from_bytes(self.atoms.get(type_), text));
    }

    /// Set an `ATOM` list naming the given [`XAtom`]s
    pub(crate) fn set_atoms(&self, window: Window, property: XAtom, values: &[XAtom]) {
        let ids: Vec<u32> = values.iter().map(|a| self.atoms.get(*a)).collect();
        self.set(window, property, XAtom::Atom, &ids);
    }

    /// Delete a property
    pub(crate) fn unset(&self, window: Window, property: XAtom) {
        if let Some(props) = self.windows.borrow_mut().get_mut(&window) {
            props.remove(&self.atoms.get(property));
        }
    }

    /// Messages sent so far
    pub(crate) fn sent(&self) -> Vec<SentMessage> {
        self.sent.borrow().clone()
    }

    /// Make every following flush fail as if the connection was lost
    pub(crate) fn break_connection(&self) {
        self.broken.set(true);
    }

    /// Number of property requests answered so far
    pub(crate) fn requests(&self) -> usize {
        self.requests.get()
    }

    fn insert(&self, window: Window, property: XAtom, value: Property) {
        self.windows
            .borrow_mut()
            .get_mut(&window)
            .expect("window exists")
            .insert(self.atoms.get(property), value);
    }

    fn bad_window(window: Window) -> Error {
        Error::Protocol(format!("BadWindow (resource id: {:#0x})", window))
    }
}

impl XContext for DummyServer {
    fn atoms(&self) -> &AtomTable {
        &self.atoms
    }

    fn root(&self) -> Window {
        ROOT
    }

    fn error_trap(&self) -> &ErrorTrap {
        &self.trap
    }
}

impl PropertyReader for DummyServer {
    fn fetch_property(&self, window: Window, property: Atom, type_: Atom) -> Result<Property> {
        self.requests.set(self.requests.get() + 1);
        let windows = self.windows.borrow();
        let props = windows.get(&window).ok_or_else(|| Self::bad_window(window))?;

        Ok(match props.get(&property) {
            None => Property::missing(),
            Some(prop) if prop.type_ == type_ => prop.clone(),
            // The server reports the actual type but sends no data
            Some(prop) => Property {
                type_:  prop.type_,
                format: prop.format,
                value:  vec![],
            },
        })
    }

    fn store_property32(
        &self,
        window: Window,
        property: Atom,
        type_: Atom,
        data: &[u32],
    ) -> Result<()> {
        self.requests.set(self.requests.get() + 1);
        let mut windows = self.windows.borrow_mut();
        let props = windows
            .get_mut(&window)
            .ok_or_else(|| Self::bad_window(window))?;
        props.insert(property, Property::from_u32s(type_, data));
        Ok(())
    }
}

impl MessageSender for DummyServer {
    fn queue_message(
        &self,
        destination: Window,
        mask: EventMask,
        event: &ClientMessageEvent,
    ) -> Result<()> {
        self.sent.borrow_mut().push(SentMessage {
            destination,
            mask,
            event: event.clone(),
        });
        Ok(())
    }

    fn flush_messages(&self) -> Result<()> {
        if self.broken.get() {
            return Err(Error::Connection(ConnectionError::UnknownError));
        }
        Ok(())
    }
}
