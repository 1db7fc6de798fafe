//! Finding a title for a task button

use super::{
    atoms::{AtomTable, XAtom},
    property::PropertyReader,
};
use crate::error::Result;
use serde::Serialize;
use x11rb::protocol::xproto::{Atom, Window};

/// Title used when a window has no name at all
pub const UNKNOWN_NAME: &str = "<unknown>";

/// A `(property, type)` pair the title can be read from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct NameSource {
    /// Property holding the text
    pub property: XAtom,
    /// Type the text is stored as
    pub type_:    XAtom,
}

impl NameSource {
    const fn new(property: XAtom, type_: XAtom) -> Self {
        Self { property, type_ }
    }
}

/// Where a title is looked for, best first. Icon names come before window
/// names since a task button is small
pub const NAME_CASCADE: [NameSource; 8] = [
    NameSource::new(XAtom::NetWmVisibleIconName, XAtom::Utf8String),
    NameSource::new(XAtom::NetWmIconName, XAtom::Utf8String),
    NameSource::new(XAtom::WmIconName, XAtom::String),
    NameSource::new(XAtom::WmIconName, XAtom::Utf8String),
    NameSource::new(XAtom::NetWmVisibleName, XAtom::Utf8String),
    NameSource::new(XAtom::NetWmName, XAtom::Utf8String),
    NameSource::new(XAtom::WmName, XAtom::String),
    NameSource::new(XAtom::WmName, XAtom::Utf8String),
];

/// A title together with the [`NameSource`] it came from
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedName {
    /// Pair the text was read from; `None` if nothing matched
    pub source: Option<NameSource>,
    /// The decoded title
    pub text:   String,
}

impl ResolvedName {
    /// The result when no source yields a title
    pub fn unknown() -> Self {
        Self {
            source: None,
            text:   String::from(UNKNOWN_NAME),
        }
    }

    /// Does a change of the property `changed` affect this title?
    pub fn is_sourced_from(&self, atoms: &AtomTable, changed: Atom) -> bool {
        self.source
            .map_or(false, |source| atoms.is(changed, source.property))
    }
}

impl Default for ResolvedName {
    fn default() -> Self {
        Self::unknown()
    }
}

/// Decode the raw bytes of a text property. The text ends at the first NUL
///
/// `STRING` is Latin-1, anything else is treated as (possibly broken) UTF-8
fn decode(type_: XAtom, bytes: &[u8]) -> String {
    let bytes = bytes.split(|b| *b == 0).next().unwrap_or_default();

    match type_ {
        XAtom::String => bytes.iter().map(|b| char::from(*b)).collect(),
        _ => String::from_utf8_lossy(bytes).into_owned(),
    }
}

/// Resolving window titles through the [`NAME_CASCADE`]
pub trait WindowNameExt: PropertyReader {
    /// Read the title from a single source
    fn read_name(&self, window: Window, source: NameSource) -> Result<Option<String>> {
        Ok(self
            .read(window, source.property, source.type_)?
            .filter(|prop| prop.format == 8)
            .map(|prop| decode(source.type_, &prop.value)))
    }

    /// Walk the whole cascade and return the first title found
    fn resolve_name(&self, window: Window) -> Result<ResolvedName> {
        for source in NAME_CASCADE {
            if let Some(text) = self.read_name(window, source)? {
                log::trace!(
                    "Window({:#0x}) is named {:?} by `{}`",
                    window,
                    text,
                    source.property
                );
                return Ok(ResolvedName {
                    source: Some(source),
                    text,
                });
            }
        }

        log::trace!("Window({:#0x}) has no name", window);
        Ok(ResolvedName::unknown())
    }

    /// Re-read a title, trying the source of `previous` before anything else
    fn refresh_name(&self, window: Window, previous: &ResolvedName) -> Result<ResolvedName> {
        if let Some(source) = previous.source {
            if let Some(text) = self.read_name(window, source)? {
                return Ok(ResolvedName {
                    source: Some(source),
                    text,
                });
            }
        }

        self.resolve_name(window)
    }
}

impl<T: PropertyReader + ?Sized> WindowNameExt for T {}

#[cfg(test)]
mod tests {
    use super::{decode, NameSource, ResolvedName, WindowNameExt, NAME_CASCADE, UNKNOWN_NAME};
    use crate::x::{atoms::XAtom, dummy::DummyServer, XContext};

    #[test]
    fn visible_name_alone_wins() {
        let server = DummyServer::new();
        let win = server.add_window();
        server.set_text(win, XAtom::NetWmVisibleName, XAtom::Utf8String, "vim ─ main.rs".as_bytes());

        let name = server.resolve_name(win).unwrap();
        assert_eq!(name.text, "vim ─ main.rs");
        assert_eq!(
            name.source,
            Some(NameSource {
                property: XAtom::NetWmVisibleName,
                type_:    XAtom::Utf8String,
            })
        );
    }

    #[test]
    fn nameless_window_is_unknown() {
        let server = DummyServer::new();
        let win = server.add_window();

        let name = server.resolve_name(win).unwrap();
        assert_eq!(name, ResolvedName::unknown());
        assert_eq!(name.text, UNKNOWN_NAME);
        assert!(name.source.is_none());
    }

    #[test]
    fn icon_names_come_first() {
        let server = DummyServer::new();
        let win = server.add_window();
        server.set_text(win, XAtom::NetWmName, XAtom::Utf8String, b"Terminal - ~/src");
        server.set_text(win, XAtom::WmIconName, XAtom::String, b"Terminal\0");

        let name = server.resolve_name(win).unwrap();
        assert_eq!(name.text, "Terminal");
        assert_eq!(name.source, Some(NAME_CASCADE[2]));
    }

    #[test]
    fn refresh_reads_recorded_source_only() {
        let server = DummyServer::new();
        let win = server.add_window();
        server.set_text(win, XAtom::WmName, XAtom::Utf8String, b"xterm");

        let first = server.resolve_name(win).unwrap();
        assert_eq!(first.source, Some(NAME_CASCADE[7]));

        server.set_text(win, XAtom::WmName, XAtom::Utf8String, b"xterm: htop");
        let before = server.requests();
        let second = server.refresh_name(win, &first).unwrap();
        assert_eq!(server.requests() - before, 1);
        assert_eq!(second.text, "xterm: htop");
        assert_eq!(second.source, first.source);
    }

    #[test]
    fn refresh_falls_back_to_cascade() {
        let server = DummyServer::new();
        let win = server.add_window();
        server.set_text(win, XAtom::NetWmName, XAtom::Utf8String, b"Firefox");
        let first = server.resolve_name(win).unwrap();

        // The recorded source disappears, another one is still there
        server.unset(win, XAtom::NetWmName);
        server.set_text(win, XAtom::WmName, XAtom::String, b"Navigator");
        let second = server.refresh_name(win, &first).unwrap();
        assert_eq!(second.text, "Navigator");
        assert_eq!(second.source, Some(NAME_CASCADE[6]));

        // Nothing left at all
        server.unset(win, XAtom::WmName);
        assert_eq!(server.refresh_name(win, &second).unwrap(), ResolvedName::unknown());
    }

    #[test]
    fn property_notify_matches_source() {
        let server = DummyServer::new();
        let win = server.add_window();
        server.set_text(win, XAtom::NetWmIconName, XAtom::Utf8String, b"mpv");

        let name = server.resolve_name(win).unwrap();
        let atoms = server.atoms();
        assert!(name.is_sourced_from(atoms, atoms.get(XAtom::NetWmIconName)));
        assert!(!name.is_sourced_from(atoms, atoms.get(XAtom::NetWmName)));
        assert!(!ResolvedName::unknown().is_sourced_from(atoms, atoms.get(XAtom::WmName)));
    }

    #[test]
    fn decodes_latin1_and_broken_utf8() {
        assert_eq!(decode(XAtom::String, b"caf\xe9\0\0"), "café");
        assert_eq!(decode(XAtom::Utf8String, b"ok\xff"), "ok\u{fffd}");
        assert_eq!(decode(XAtom::Utf8String, b"\0"), "");
    }

    #[test]
    fn title_ends_at_first_nul() {
        let server = DummyServer::new();
        let win = server.add_window();
        server.set_text(win, XAtom::WmName, XAtom::String, b"foo\0bar");

        let name = server.resolve_name(win).unwrap();
        assert_eq!(name.text, "foo");
        assert_eq!(name.source, Some(NAME_CASCADE[6]));
        assert_eq!(decode(XAtom::Utf8String, b"\0leading"), "");
    }
}
