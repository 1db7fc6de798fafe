//! Outbound client messages
//!
//! Requests such as "activate this window" are broadcast to the root window
//! where the window manager picks them up. Drag-and-drop negotiation is sent
//! directly to the peer window. Neither waits for an answer

use crate::{
    error::Result,
    geometry::Rectangle,
    x::{atoms::XAtom, XContext},
};
use x11rb::{
    protocol::xproto::{ClientMessageEvent, EventMask, Window},
    CURRENT_TIME,
};

/// Source indication for requests coming from a pager or taskbar
const SOURCE_PAGER: u32 = 2;

/// `_NET_MOVERESIZE_WINDOW` flags: x, y, width and height are present
const MOVERESIZE_XYWH: u32 = 0b1111 << 8;

/// Build the five-slot, 32-bit [`ClientMessageEvent`] used by every request
pub fn client_message(window: Window, message_type: u32, data: [u32; 5]) -> ClientMessageEvent {
    ClientMessageEvent::new(32, window, message_type, data)
}

/// Sending [`ClientMessageEvent`]s
pub trait MessageSender: XContext {
    /// Queue the event for the server. Protocol errors it causes later are
    /// dropped
    fn queue_message(
        &self,
        destination: Window,
        mask: EventMask,
        event: &ClientMessageEvent,
    ) -> Result<()>;

    /// Write every queued request to the server
    fn flush_messages(&self) -> Result<()>;

    /// Hand the event to the server without waiting for a reply. A connection
    /// that fails while flushing is an error
    fn dispatch(&self, destination: Window, mask: EventMask, event: &ClientMessageEvent) -> Result<()> {
        self.queue_message(destination, mask, event)?;
        self.flush_messages()
    }

    /// Send a message about `window` to the root window, where the window
    /// manager listens for it
    fn send_netwm_message(&self, window: Window, message_type: XAtom, data: [u32; 5]) -> Result<()> {
        let event = client_message(window, self.atoms().get(message_type), data);
        log::debug!(
            "sending `{}` for Window({:#0x}) to the root: {:?}",
            message_type,
            window,
            data
        );
        self.dispatch(
            self.root(),
            EventMask::SUBSTRUCTURE_NOTIFY | EventMask::SUBSTRUCTURE_REDIRECT,
            &event,
        )
    }

    /// Send a message directly to `window`
    fn send_dnd_message(&self, window: Window, message_type: XAtom, data: [u32; 5]) -> Result<()> {
        let event = client_message(window, self.atoms().get(message_type), data);
        log::debug!("sending `{}` to Window({:#0x}): {:?}", message_type, window, data);
        self.dispatch(window, EventMask::NO_EVENT, &event)
    }

    /// Ask the window manager to activate `window`
    fn activate_window(&self, window: Window) -> Result<()> {
        self.send_netwm_message(window, XAtom::NetActiveWindow, [
            SOURCE_PAGER,
            CURRENT_TIME,
            0,
            0,
            0,
        ])
    }

    /// Ask the window manager to close `window`
    fn close_window(&self, window: Window) -> Result<()> {
        self.send_netwm_message(window, XAtom::NetCloseWindow, [
            CURRENT_TIME,
            SOURCE_PAGER,
            0,
            0,
            0,
        ])
    }

    /// Ask the window manager to move and resize `window`
    fn move_resize_window(&self, window: Window, rect: Rectangle) -> Result<()> {
        self.send_netwm_message(window, XAtom::NetMoveresizeWindow, [
            MOVERESIZE_XYWH | (SOURCE_PAGER << 12),
            rect.point.x as u32,
            rect.point.y as u32,
            rect.dimension.width,
            rect.dimension.height,
        ])
    }

    /// Ask the window manager to switch to another desktop
    fn switch_desktop(&self, desktop: u32) -> Result<()> {
        self.send_netwm_message(self.root(), XAtom::NetCurrentDesktop, [
            desktop,
            CURRENT_TIME,
            0,
            0,
            0,
        ])
    }
}
