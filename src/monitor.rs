//! Detection of the monitors the screen is spread across

use crate::geometry::{Dimension, Rectangle};
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use std::fmt;
use strum_macros::{Display, EnumString};

/// Area of the root window shown by one physical monitor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct Monitor {
    /// Position and size in root window coordinates
    rectangle: Rectangle,
}

impl Monitor {
    /// Create a new [`Monitor`]
    pub const fn new(rectangle: Rectangle) -> Self {
        Self { rectangle }
    }

    /// Return the [`Rectangle`] of the [`Monitor`]
    pub const fn rectangle(&self) -> Rectangle {
        self.rectangle
    }
}

impl fmt::Display for Monitor {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.rectangle)
    }
}

/// The answer of a single [`MonitorStrategy`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Probe {
    /// The strategy could not be used on this server
    Unavailable,
    /// Monitors in the order the server reported them
    Monitors(Vec<Monitor>),
}

/// One way of asking the server for the monitor layout
pub trait MonitorStrategy {
    /// Name used in log messages
    fn name(&self) -> &'static str;

    /// Query the server
    fn probe(&self) -> Probe;
}

/// Strategies the user can list in the configuration file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum StrategyKind {
    /// Outputs of the `RANDR` extension
    Randr,
    /// Screens of the `XINERAMA` extension
    Xinerama,
}

impl StrategyKind {
    /// Order used when the configuration does not say otherwise
    pub fn default_order() -> Vec<Self> {
        vec![Self::Randr, Self::Xinerama]
    }
}

/// Try each strategy in turn and return the first non-empty result.
///
/// When every strategy fails, the whole screen is a single monitor
pub fn detect_monitors(strategies: &[Box<dyn MonitorStrategy + '_>], screen: Dimension) -> Vec<Monitor> {
    for strategy in strategies {
        match strategy.probe() {
            Probe::Monitors(monitors) if !monitors.is_empty() => {
                log::debug!(
                    "{} reports {} monitor(s): {}",
                    strategy.name(),
                    monitors.len(),
                    monitors.iter().join(", ")
                );
                return monitors;
            },
            Probe::Monitors(_) => log::debug!("{} reports no monitors", strategy.name()),
            Probe::Unavailable => log::debug!("{} is unavailable", strategy.name()),
        }
    }

    log::debug!("using the whole screen ({}) as the only monitor", screen);
    vec![Monitor::new(Rectangle::new(0, 0, screen.width, screen.height))]
}

#[cfg(test)]
mod tests {
    use super::{detect_monitors, Monitor, MonitorStrategy, Probe, StrategyKind};
    use crate::geometry::{Dimension, Rectangle};
    use std::{cell::Cell, str::FromStr};

    /// A strategy with a fixed answer that counts how often it was asked
    struct Scripted {
        name:   &'static str,
        answer: Probe,
        calls:  Cell<usize>,
    }

    impl Scripted {
        fn new(name: &'static str, answer: Probe) -> Self {
            Self {
                name,
                answer,
                calls: Cell::new(0),
            }
        }
    }

    impl MonitorStrategy for &Scripted {
        fn name(&self) -> &'static str {
            self.name
        }

        fn probe(&self) -> Probe {
            self.calls.set(self.calls.get() + 1);
            self.answer.clone()
        }
    }

    const SCREEN: Dimension = Dimension::new(3840, 1080);

    fn xinerama_pair() -> Vec<Monitor> {
        vec![
            Monitor::new(Rectangle::new(0, 0, 1920, 1080)),
            Monitor::new(Rectangle::new(1920, 0, 1920, 1080)),
        ]
    }

    #[test]
    fn empty_randr_falls_through_to_xinerama() {
        let randr = Scripted::new("randr", Probe::Monitors(vec![]));
        let xinerama = Scripted::new("xinerama", Probe::Monitors(xinerama_pair()));

        let monitors = detect_monitors(&[Box::new(&randr), Box::new(&xinerama)], SCREEN);
        assert_eq!(monitors, xinerama_pair());
        assert_eq!(randr.calls.get(), 1);
    }

    #[test]
    fn first_success_stops_the_search() {
        let randr = Scripted::new("randr", Probe::Monitors(vec![Monitor::new(Rectangle::new(
            0, 0, 2560, 1440,
        ))]));
        let xinerama = Scripted::new("xinerama", Probe::Monitors(xinerama_pair()));

        let monitors = detect_monitors(&[Box::new(&randr), Box::new(&xinerama)], SCREEN);
        assert_eq!(monitors.len(), 1);
        assert_eq!(monitors[0].rectangle().dimension, Dimension::new(2560, 1440));
        assert_eq!(xinerama.calls.get(), 0);
    }

    #[test]
    fn nothing_available_means_whole_screen() {
        let randr = Scripted::new("randr", Probe::Unavailable);
        let xinerama = Scripted::new("xinerama", Probe::Unavailable);

        let monitors = detect_monitors(&[Box::new(&randr), Box::new(&xinerama)], SCREEN);
        assert_eq!(monitors, vec![Monitor::new(Rectangle::new(0, 0, 3840, 1080))]);
        assert_eq!(detect_monitors(&[], SCREEN), monitors);
    }

    #[test]
    fn strategy_names_parse() {
        assert_eq!(StrategyKind::from_str("xinerama").unwrap(), StrategyKind::Xinerama);
        assert_eq!(StrategyKind::Randr.to_string(), "randr");
        assert!(StrategyKind::from_str("vga").is_err());
    }
}
