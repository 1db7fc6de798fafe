//! The connection to the X-Server

use super::{
    atoms::{AtomTable, XAtom},
    extension,
    message::MessageSender,
    property::{Property, PropertyReader},
    trap::ErrorTrap,
    XContext,
};
use crate::{
    error::{Error, Result},
    geometry::{Dimension, Point, Rectangle},
    monitor::{self, Monitor, StrategyKind},
};
use x11rb::{
    connection::Connection,
    protocol::{
        xproto::{
            self,
            Atom,
            ChangeWindowAttributesAux,
            ClientMessageEvent,
            Colormap,
            ConnectionExt as _,
            CreateWindowAux,
            EventMask,
            Pixmap,
            PropMode,
            Visualid,
            Window,
        },
        Event,
    },
    rust_connection::RustConnection,
    wrapper::ConnectionExt as _,
    NONE,
};

/// The main connection to the X-Server
pub struct XConnection {
    /// Connection to the X-Server
    conn:        RustConnection,
    /// Index of the screen in use
    screen_num:  usize,
    /// Interned atoms
    atoms:       AtomTable,
    /// Traps protocol errors for vanished windows
    trap:        ErrorTrap,
    /// Monitor detection order
    detection:   Vec<StrategyKind>,
    /// Monitors found by the last detection
    monitors:    Vec<Monitor>,
    /// Size of the screen in pixels
    screen_size: Dimension,
    /// Background pixmap of the root window, `NONE` if unknown
    root_pixmap: Pixmap,
}

impl XConnection {
    /// Connect to `display` (`$DISPLAY` when `None`) and gather what the
    /// panel needs to know about the screen
    pub fn connect(display: Option<&str>, detection: &[StrategyKind]) -> Result<Self> {
        log::debug!("connecting to display {}", display.unwrap_or("$DISPLAY"));
        let (conn, screen_num) = RustConnection::connect(display)?;
        let atoms = AtomTable::intern(&conn)?;

        let screen = &conn.setup().roots[screen_num];
        let screen_size = Dimension::new(
            u32::from(screen.width_in_pixels),
            u32::from(screen.height_in_pixels),
        );
        log::debug!(
            "using screen {} ({}, depth {}, visual {:#0x})",
            screen_num,
            screen_size,
            screen.root_depth,
            screen.root_visual
        );

        let mut xconn = Self {
            conn,
            screen_num,
            atoms,
            trap: ErrorTrap::new(),
            detection: detection.to_vec(),
            monitors: vec![],
            screen_size,
            root_pixmap: NONE,
        };

        xconn.select_root_input()?;
        xconn.update_root_pixmap()?;
        xconn.update_monitors();

        Ok(xconn)
    }

    /// Watch the root window for property changes and screen changes
    fn select_root_input(&self) -> Result<()> {
        log::debug!("selecting input on the root window");
        self.conn
            .change_window_attributes(
                self.root(),
                &ChangeWindowAttributesAux::new()
                    .event_mask(EventMask::PROPERTY_CHANGE | EventMask::STRUCTURE_NOTIFY),
            )?
            .check()?;
        Ok(())
    }

    // ========================= Accessor ========================= [[[

    /// Return the connection to the X-Server
    pub fn aux(&self) -> &RustConnection {
        &self.conn
    }

    /// Return the screen in use
    pub fn screen(&self) -> &xproto::Screen {
        &self.conn.setup().roots[self.screen_num]
    }

    /// Return the index of the screen in use
    pub const fn screen_num(&self) -> usize {
        self.screen_num
    }

    /// Return the size of the screen
    pub const fn screen_size(&self) -> Dimension {
        self.screen_size
    }

    /// Return the default visual of the screen
    pub fn visual(&self) -> Visualid {
        self.screen().root_visual
    }

    /// Return the default colormap of the screen
    pub fn colormap(&self) -> Colormap {
        self.screen().default_colormap
    }

    /// Return the default depth of the screen
    pub fn depth(&self) -> u8 {
        self.screen().root_depth
    }

    /// Return the background pixmap of the root window
    pub const fn root_pixmap(&self) -> Pixmap {
        self.root_pixmap
    }

    /// Return the monitors found by the last detection
    pub fn monitors(&self) -> &[Monitor] {
        &self.monitors
    }

    // ]]] === Accessor ===

    // ========================== Screen ========================== [[[

    /// Detect the monitors again, replacing the previous list
    pub fn update_monitors(&mut self) {
        let strategies = extension::strategies(&self.conn, self.root(), &self.detection);
        self.monitors = monitor::detect_monitors(&strategies, self.screen_size);
    }

    /// Record a new screen size, e.g. after a `ConfigureNotify` on the root,
    /// and detect the monitors again
    pub fn screen_changed(&mut self, size: Dimension) {
        log::debug!("screen changed: {} -> {}", self.screen_size, size);
        self.screen_size = size;
        self.update_monitors();
    }

    /// Read the background pixmap of the root window from `_XROOTPMAP_ID`,
    /// or from `ESETROOT_PMAP_ID` if the former is not set
    pub fn update_root_pixmap(&mut self) -> Result<Pixmap> {
        let root = self.root();
        let mut pixmap = self.read_pixmap(root, XAtom::XRootPmapId, NONE)?;
        if pixmap == NONE {
            pixmap = self.read_pixmap(root, XAtom::EsetrootPmapId, NONE)?;
        }
        log::debug!("root pixmap: {:#0x}", pixmap);

        self.root_pixmap = pixmap;
        Ok(pixmap)
    }

    // ]]] === Screen ===

    // ======================== Root State ======================== [[[

    /// Windows managed by the window manager, oldest first
    pub fn client_list(&self) -> Result<Vec<Window>> {
        self.read_list(self.root(), XAtom::NetClientList, XAtom::Window)
    }

    /// Index of the desktop being shown
    pub fn current_desktop(&self) -> Result<u32> {
        self.read_int(self.root(), XAtom::NetCurrentDesktop, 0)
    }

    /// The focused window, `None` if nothing has focus
    pub fn active_window(&self) -> Result<Option<Window>> {
        let window = self.read_window(self.root(), XAtom::NetActiveWindow, NONE)?;
        Ok((window != NONE).then(|| window))
    }

    // ]]] === Root State ===

    // ========================= Actions ========================== [[[

    /// Translate a point relative to `window` into root coordinates.
    ///
    /// Returns `None` if the window vanished while inside an [`ErrorTrap`]
    pub fn translate_coordinates(&self, window: Window, point: Point) -> Result<Option<Point>> {
        log::trace!("translating ({}) of Window({:#0x})", point, window);
        let (x, y) = point.to_x11()?;
        let res: Result<_> = self
            .conn
            .translate_coordinates(window, self.root(), x, y)
            .map_err(Into::into)
            .and_then(|cookie| cookie.reply().map_err(Into::into));

        Ok(self
            .trap
            .absorb(res)?
            .map(|reply| Point::new(i32::from(reply.dst_x), i32::from(reply.dst_y))))
    }

    /// Create a child of `parent` with the default depth and visual
    fn create_child(&self, parent: Window, rect: Rectangle, aux: &CreateWindowAux) -> Result<Window> {
        let (x, y) = rect.point.to_x11()?;
        let (width, height) = rect.dimension.to_x11()?;
        let wid = self.conn.generate_id()?;
        self.conn
            .create_window(
                self.depth(),
                wid,
                parent,
                x,
                y,
                width,
                height,
                0,
                xproto::WindowClass::INPUT_OUTPUT,
                self.visual(),
                aux,
            )?
            .check()?;

        Ok(wid)
    }

    /// Create a window on the root with the default depth and visual
    pub fn create_default_window(&self, rect: Rectangle, aux: &CreateWindowAux) -> Result<Window> {
        log::debug!("creating a window: Rectangle({})", rect);
        self.create_child(self.root(), rect, aux)
    }

    /// Create a window inside `parent` that shows the parent's background,
    /// e.g. to hold a tray icon
    pub fn create_default_embedder(&self, parent: Window, dimension: Dimension) -> Result<Window> {
        log::debug!("creating an embedder in Window({:#0x}): {}", parent, dimension);
        self.create_child(
            parent,
            Rectangle::new(0, 0, dimension.width, dimension.height),
            &embedder_attributes(),
        )
    }

    /// Create a pixmap with the default depth
    pub fn create_default_pixmap(&self, dimension: Dimension) -> Result<Pixmap> {
        log::debug!("creating a pixmap: {}", dimension);
        let (width, height) = dimension.to_x11()?;
        let pid = self.conn.generate_id()?;
        self.conn
            .create_pixmap(self.depth(), pid, self.root(), width, height)?
            .check()?;

        Ok(pid)
    }

    // ]]] === Actions ===

    // ======================= Base Wrappers ====================== [[[

    /// Flush all pending requests to the X-Server
    pub fn flush(&self) -> Result<()> {
        log::trace!("flushing requests to the X-Server");
        self.conn.flush().map_err(|e| {
            log::warn!("failed to flush requests to the X-Server: {}", e);
            e.into()
        })
    }

    /// Pass protocol errors to the [`ErrorTrap`], returning everything else
    fn route_event(&self, event: Event) -> Result<Option<Event>> {
        match event {
            Event::Error(e) => self
                .trap
                .absorb::<()>(Err(Error::Protocol(format!("{:?}", e))))
                .map(|_| None),
            event => Ok(Some(event)),
        }
    }

    /// Return the next queued event without blocking. Protocol errors are
    /// routed through the [`ErrorTrap`] and skipped
    pub fn poll_for_event(&self) -> Result<Option<Event>> {
        while let Some(event) = self.conn.poll_for_event()? {
            if let Some(event) = self.route_event(event)? {
                return Ok(Some(event));
            }
        }
        Ok(None)
    }

    /// Block until the next event that is not a trapped protocol error
    pub fn wait_for_event(&self) -> Result<Event> {
        loop {
            let event = self.conn.wait_for_event()?;
            if let Some(event) = self.route_event(event)? {
                return Ok(event);
            }
        }
    }

    /// Drain queued events, handing every one that is not a protocol error
    /// back to the caller
    pub fn drain_events(&self) -> Result<Vec<Event>> {
        let mut events = vec![];
        while let Some(event) = self.poll_for_event()? {
            events.push(event);
        }
        Ok(events)
    }

    // ]]] === Base Wrappers ===
}

impl XContext for XConnection {
    fn atoms(&self) -> &AtomTable {
        &self.atoms
    }

    fn root(&self) -> Window {
        self.screen().root
    }

    fn error_trap(&self) -> &ErrorTrap {
        &self.trap
    }
}

impl PropertyReader for XConnection {
    fn fetch_property(&self, window: Window, property: Atom, type_: Atom) -> Result<Property> {
        let reply = self
            .conn
            .get_property(false, window, property, type_, 0, u32::MAX)?
            .reply()?;

        Ok(Property {
            type_:  reply.type_,
            format: reply.format,
            value:  reply.value,
        })
    }

    fn store_property32(
        &self,
        window: Window,
        property: Atom,
        type_: Atom,
        data: &[u32],
    ) -> Result<()> {
        self.conn
            .change_property32(PropMode::REPLACE, window, property, type_, data)?
            .check()?;
        Ok(())
    }
}

impl MessageSender for XConnection {
    fn queue_message(
        &self,
        destination: Window,
        mask: EventMask,
        event: &ClientMessageEvent,
    ) -> Result<()> {
        self.conn
            .send_event(false, destination, mask, event)?
            .ignore_error();
        Ok(())
    }

    fn flush_messages(&self) -> Result<()> {
        self.flush()
    }
}

/// Attributes of an embedder window: no background of its own
fn embedder_attributes() -> CreateWindowAux {
    CreateWindowAux::new().background_pixmap(u32::from(xproto::BackPixmap::PARENT_RELATIVE))
}

#[cfg(test)]
mod tests {
    use super::embedder_attributes;
    use x11rb::protocol::xproto::BackPixmap;

    #[test]
    fn embedder_shows_parent_background() {
        let aux = embedder_attributes();
        assert_eq!(
            aux.background_pixmap,
            Some(u32::from(BackPixmap::PARENT_RELATIVE))
        );
        assert_eq!(aux.background_pixel, None);
        assert_eq!(aux.event_mask, None);
    }
}
