//! Monitor layout from the `RANDR` and `XINERAMA` extensions

use crate::{
    error::Result,
    geometry::Rectangle,
    monitor::{Monitor, MonitorStrategy, Probe, StrategyKind},
};
use x11rb::{
    connection::Connection,
    protocol::{
        randr::{self, ConnectionExt as _, Crtc, Output},
        xinerama::{self, ConnectionExt as _},
        xproto::Window,
    },
    NONE,
};

/// Is the extension known to the server?
fn extension_present<C: Connection>(conn: &C, name: &'static str) -> bool {
    match conn.extension_information(name) {
        Ok(info) => info.is_some(),
        Err(e) => {
            log::debug!("failed to query the {} extension: {}", name, e);
            false
        },
    }
}

/// Turn the outcome of a query into a [`Probe`]
fn finish(name: &str, res: Result<Option<Vec<Monitor>>>) -> Probe {
    match res {
        Ok(Some(monitors)) => Probe::Monitors(monitors),
        Ok(None) => Probe::Unavailable,
        Err(e) => {
            log::debug!("{} query failed: {}", name, e);
            Probe::Unavailable
        },
    }
}

// ============================== RandR ===============================

/// What the server reports about one RandR output
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct OutputState {
    /// The output
    output:     Output,
    /// Whether a monitor is plugged in
    connection: randr::Connection,
    /// CRTC driving the output, `NONE` when it is switched off
    crtc:       Crtc,
}

/// One [`Monitor`] per output that is connected and driven by a CRTC, in the
/// order the outputs are given. `crtc_area` looks up the geometry of a CRTC
fn randr_monitors<F>(
    outputs: impl IntoIterator<Item = OutputState>,
    mut crtc_area: F,
) -> Result<Vec<Monitor>>
where
    F: FnMut(Crtc) -> Result<Rectangle>,
{
    let mut monitors = vec![];
    for state in outputs {
        if state.connection == randr::Connection::DISCONNECTED || state.crtc == NONE {
            log::trace!("skipping output {}", state.output);
            continue;
        }

        let rect = crtc_area(state.crtc)?;
        log::trace!("output {} at {}", state.output, rect);
        monitors.push(Monitor::new(rect));
    }

    Ok(monitors)
}

/// One [`Monitor`] per connected output that has a CRTC
#[derive(Debug)]
pub struct RandrOutputs<'a, C: Connection> {
    /// Connection to the X-Server
    conn: &'a C,
    /// Root window of the screen
    root: Window,
}

impl<'a, C: Connection> RandrOutputs<'a, C> {
    /// Create a new [`RandrOutputs`] strategy
    pub fn new(conn: &'a C, root: Window) -> Self {
        Self { conn, root }
    }

    fn query(&self) -> Result<Option<Vec<Monitor>>> {
        if !extension_present(self.conn, randr::X11_EXTENSION_NAME) {
            return Ok(None);
        }
        let (major, minor) = randr::X11_XML_VERSION;
        let version = self.conn.randr_query_version(major, minor)?.reply()?;
        log::trace!(
            "`randr` version {}.{}",
            version.major_version,
            version.minor_version
        );

        let resources = self
            .conn
            .randr_get_screen_resources_current(self.root)?
            .reply()?;
        let timestamp = resources.config_timestamp;

        let mut outputs = Vec::with_capacity(resources.outputs.len());
        for output in resources.outputs {
            let info = self.conn.randr_get_output_info(output, timestamp)?.reply()?;
            log::trace!(
                "output {} is {}",
                output,
                String::from_utf8_lossy(&info.name)
            );
            outputs.push(OutputState {
                output,
                connection: info.connection,
                crtc: info.crtc,
            });
        }

        randr_monitors(outputs, |crtc| {
            let info = self.conn.randr_get_crtc_info(crtc, timestamp)?.reply()?;
            Ok(Rectangle::new(
                i32::from(info.x),
                i32::from(info.y),
                u32::from(info.width),
                u32::from(info.height),
            ))
        })
        .map(Some)
    }
}

impl<C: Connection> MonitorStrategy for RandrOutputs<'_, C> {
    fn name(&self) -> &'static str {
        "randr"
    }

    fn probe(&self) -> Probe {
        finish(self.name(), self.query())
    }
}

// ============================= Xinerama =============================

/// One [`Monitor`] per active Xinerama screen
#[derive(Debug)]
pub struct XineramaScreens<'a, C: Connection> {
    /// Connection to the X-Server
    conn: &'a C,
}

impl<'a, C: Connection> XineramaScreens<'a, C> {
    /// Create a new [`XineramaScreens`] strategy
    pub fn new(conn: &'a C) -> Self {
        Self { conn }
    }

    fn query(&self) -> Result<Option<Vec<Monitor>>> {
        if !extension_present(self.conn, xinerama::X11_EXTENSION_NAME) {
            return Ok(None);
        }
        if self.conn.xinerama_is_active()?.reply()?.state == 0 {
            log::trace!("`xinerama` is present but inactive");
            return Ok(None);
        }

        let screens = self.conn.xinerama_query_screens()?.reply()?;
        Ok(Some(
            screens
                .screen_info
                .iter()
                .map(|s| {
                    Monitor::new(Rectangle::new(
                        i32::from(s.x_org),
                        i32::from(s.y_org),
                        u32::from(s.width),
                        u32::from(s.height),
                    ))
                })
                .collect(),
        ))
    }
}

impl<C: Connection> MonitorStrategy for XineramaScreens<'_, C> {
    fn name(&self) -> &'static str {
        "xinerama"
    }

    fn probe(&self) -> Probe {
        finish(self.name(), self.query())
    }
}

/// Build the strategy list described by `kinds`, in that order
pub fn strategies<'a, C: Connection>(
    conn: &'a C,
    root: Window,
    kinds: &[StrategyKind],
) -> Vec<Box<dyn MonitorStrategy + 'a>> {
    kinds
        .iter()
        .map(|kind| -> Box<dyn MonitorStrategy + 'a> {
            match kind {
                StrategyKind::Randr => Box::new(RandrOutputs::new(conn, root)),
                StrategyKind::Xinerama => Box::new(XineramaScreens::new(conn)),
            }
        })
        .collect()
}
