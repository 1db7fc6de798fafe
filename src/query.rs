//! Snapshots of the task list

use crate::{
    error::Result,
    x::{
        name::WindowNameExt,
        property::PropertyReader,
        state::{TaskState, WindowStateExt},
        XContext,
    },
};
use serde::Serialize;
use std::fmt;
use x11rb::protocol::xproto::Window;

/// Everything known about one task
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct TaskReport {
    /// The client window
    pub window:       Window,
    /// Title for the task button
    pub title:        String,
    /// Property the title was read from
    pub title_source: Option<&'static str>,
    /// Classification of the window
    #[serde(flatten)]
    pub state:        TaskState,
}

impl TaskReport {
    /// Gather the report for a single window.
    ///
    /// Returns `None` if the window vanished while being queried
    pub fn collect<R: PropertyReader + ?Sized>(reader: &R, window: Window) -> Result<Option<Self>> {
        let guard = reader.error_trap().enter()?;
        let state = reader.task_state(window)?;
        let name = reader.resolve_name(window)?;
        if guard.release() {
            log::debug!("Window({:#0x}) vanished while being queried", window);
            return Ok(None);
        }

        Ok(Some(Self {
            window,
            title: name.text,
            title_source: name.source.map(|s| s.property.name()),
            state,
        }))
    }
}

impl fmt::Display for TaskReport {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let mut flags = String::new();
        if self.state.urgent {
            flags.push('!');
        }
        if self.state.iconified {
            flags.push('_');
        }
        if !self.state.screen_visible {
            flags.push('h');
        }

        write!(
            f,
            "{:#010x}  {:>2}  {:<3} {}",
            self.window, self.state.desktop, flags, self.title
        )
    }
}

/// Reports for every window in `windows` that belongs on the panel, in the
/// given order
pub fn task_list<R: PropertyReader + ?Sized>(reader: &R, windows: &[Window]) -> Result<Vec<TaskReport>> {
    let mut tasks = vec![];
    for &window in windows {
        match TaskReport::collect(reader, window)? {
            Some(report) if report.state.panel_visible => tasks.push(report),
            Some(_) => log::trace!("Window({:#0x}) is not a task", window),
            None => {},
        }
    }

    Ok(tasks)
}

#[cfg(test)]
mod tests {
    use super::{task_list, TaskReport};
    use crate::x::{atoms::XAtom, dummy::DummyServer, XContext};

    #[test]
    fn lists_only_panel_windows() {
        let server = DummyServer::new();
        let editor = server.add_window();
        server.set_text(editor, XAtom::NetWmName, XAtom::Utf8String, b"notes.md - editor");
        server.set(editor, XAtom::NetWmDesktop, XAtom::Cardinal, &[1]);

        let dock = server.add_window();
        server.set_atoms(dock, XAtom::NetWmWindowType, &[XAtom::NetWmWindowTypeDock]);

        let gone = server.add_window();
        server.remove_window(gone);

        let tasks = task_list(&server, &[editor, dock, gone]).unwrap();
        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0].window, editor);
        assert_eq!(tasks[0].title, "notes.md - editor");
        assert_eq!(tasks[0].title_source, Some("_NET_WM_NAME"));
        assert_eq!(tasks[0].state.desktop, 1);
        assert!(!server.error_trap().is_active());
    }

    #[test]
    fn vanished_window_has_no_report() {
        let server = DummyServer::new();
        let win = server.add_window();
        server.remove_window(win);

        assert_eq!(TaskReport::collect(&server, win).unwrap(), None);
    }

    #[test]
    fn report_serializes_flat() {
        let server = DummyServer::new();
        let win = server.add_window();
        let report = TaskReport::collect(&server, win).unwrap().unwrap();

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["title"], "<unknown>");
        assert_eq!(json["title-source"], serde_json::Value::Null);
        assert_eq!(json["panel-visible"], true);
        assert_eq!(json["desktop"], 0);
    }
}
