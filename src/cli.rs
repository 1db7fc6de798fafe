//! The command line arguments

use crate::utils::{parse_window, wants_color};
use clap::{crate_description, crate_version, AppSettings, Parser, Subcommand, ValueHint};
use once_cell::sync::Lazy;
use std::{env, fs, path::PathBuf};
use x11rb::protocol::xproto::Window;

/// Options for the `panelx` program
#[derive(Parser, Default, Clone, Debug, PartialEq)]
#[clap(
    version = crate_version!(),
    about = <String as AsRef<str>>::as_ref(&APP_ABOUT),
    after_help = <String as AsRef<str>>::as_ref(&AFTER_HELP),
    max_term_width = 100,
    color = clap::ColorChoice::Auto,
    global_setting = AppSettings::DeriveDisplayOrder,
    disable_help_subcommand = true,
    infer_subcommands = true,
)]
pub(crate) struct Opts {
    /// Display debugging messages on various levels
    #[clap(
        long,
        short,
        global = true,
        parse(from_occurrences),
        long_help = "\
        Set the verbosity level of the program. There are 2 extra levels after the default (INFO). \
                     If `-v` is used, DEBUG messages are displayed, and if `-vv` is used TRACE \
                     messages are displayed. The verbosity can also be set with the `PANELX_LOG` \
                     environment variable"
    )]
    pub(crate) verbose: u8,

    /// Location of configuration file
    #[clap(
        long,
        short,
        global = true,
        takes_value = true,
        number_of_values = 1,
        value_name = "file",
        value_hint = ValueHint::FilePath,
        validator = |t| {
            let path = PathBuf::from(t);
            let path = if path.components().count() > 1 {
                path
            } else {
                env::current_dir().unwrap_or_else(|_| PathBuf::from(".")).join(path)
            };
            fs::metadata(path)
                .map(|_| ())
                .map_err(|_| String::from("must be a valid path"))
        },
        long_help = "\
        Specify the location of the configuration file. The default location is \
                `$XDG_CONFIG_HOME/panelx/panelx.yml`"
    )]
    pub(crate) config: Option<PathBuf>,

    /// Display to connect to
    #[clap(
        long,
        short,
        global = true,
        takes_value = true,
        value_name = "display",
        long_help = "\
        The X11 display to connect to, e.g. `:1`. Overrides the `display` key of the \
                configuration file. When neither is given, `$DISPLAY` is used"
    )]
    pub(crate) display: Option<String>,

    /// Print results as JSON
    #[clap(long, short, global = true, takes_value = false)]
    pub(crate) json: bool,

    /// What to query or request
    #[clap(subcommand)]
    pub(crate) command: Option<Command>,
}

/// Subcommands of `panelx`
#[derive(Subcommand, Clone, Debug, PartialEq, Eq)]
pub(crate) enum Command {
    /// List the monitors the screen is spread across (default)
    Monitors,

    /// List the windows that belong on the panel with their state
    Tasks,

    /// Show the title of a window and where it was read from
    Name {
        /// Window id, in hexadecimal (`0x...`) or decimal
        #[clap(parse(try_from_str = parse_window))]
        window: Window,
    },

    /// Ask the window manager to activate a window
    Activate {
        /// Window id, in hexadecimal (`0x...`) or decimal
        #[clap(parse(try_from_str = parse_window))]
        window: Window,
    },

    /// Ask the window manager to close a window
    Close {
        /// Window id, in hexadecimal (`0x...`) or decimal
        #[clap(parse(try_from_str = parse_window))]
        window: Window,
    },
}

impl Default for Command {
    fn default() -> Self {
        Self::Monitors
    }
}

// =============== Prettify Help ==================

/// Yellow ansi code
const YELLOW: &str = "\x1b[0;33m";
/// Green ansi code
const GREEN: &str = "\x1b[0;32m";
/// Bold-red ansi code
const BRED: &str = "\x1b[01;38;5;1m";
/// Reset colors
const RES: &str = "\x1b[0m";

/// Colored options used in the output of `--help`
pub(crate) static APP_ABOUT: Lazy<String> = Lazy::new(|| {
    wants_color()
        .then(|| {
            format!(
                "{}DESCRIPTION: {}{}{}",
                YELLOW,
                GREEN,
                crate_description!(),
                RES
            )
        })
        .unwrap_or_else(|| crate_description!().to_owned())
});

/// Colorized message displayed after the help message
pub(crate) static AFTER_HELP: Lazy<String> = Lazy::new(|| {
    wants_color()
        .then(|| {
            format!(
                "See {}panelx{} {}--help{} for longer explanations of some options.",
                BRED, RES, GREEN, RES
            )
        })
        .unwrap_or_else(|| {
            String::from("See panelx --help for longer explanations of some options.")
        })
});

#[cfg(test)]
mod tests {
    use super::{Command, Opts};
    use clap::Parser;

    #[test]
    fn parses_window_subcommands() {
        let opts = Opts::try_parse_from(&["panelx", "-vv", "--json", "name", "0x1c00003"]).unwrap();
        assert_eq!(opts.verbose, 2);
        assert!(opts.json);
        assert_eq!(opts.command, Some(Command::Name { window: 0x01c0_0003 }));

        let opts = Opts::try_parse_from(&["panelx", "close", "42", "-d", ":1"]).unwrap();
        assert_eq!(opts.command, Some(Command::Close { window: 42 }));
        assert_eq!(opts.display.as_deref(), Some(":1"));
    }

    #[test]
    fn rejects_bad_window_ids() {
        assert!(Opts::try_parse_from(&["panelx", "activate", "xterm"]).is_err());
    }

    #[test]
    fn no_subcommand() {
        let opts = Opts::try_parse_from(&["panelx"]).unwrap();
        assert_eq!(opts.command.unwrap_or_default(), Command::Monitors);
    }
}
