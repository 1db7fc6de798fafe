//! Various helper-utilities

use crate::{
    cli::Opts,
    config::{Config, PROJECT_DIRS},
};
use anyhow::{anyhow, Result};
use clap::crate_name;
use flexi_logger::{
    style,
    AdaptiveFormat,
    Age,
    Cleanup,
    Criterion,
    DeferredNow,
    Duplicate,
    FileSpec,
    Level,
    Logger,
    LoggerHandle,
    Naming,
    Record,
    WriteMode,
};
use serde::{de, Deserialize};
use std::{
    env,
    io::{self, Write},
    panic,
    path::PathBuf,
};
use x11rb::protocol::xproto::Window;

/// Shorter way of testing if the user wants color for the output of `--help`
pub(crate) fn wants_color() -> bool {
    env::var_os("NO_COLOR").is_none()
}

/// Level requested through `PANELX_LOG` or the number of `-v` flags
fn log_spec(verbose: u8) -> String {
    env::var("PANELX_LOG").unwrap_or_else(|_| match verbose {
        0 => String::from("info"),
        1 => String::from("debug"),
        _ => String::from("trace"),
    })
}

/// Initializes logging for this crate.
///
/// The returned handle has to be kept alive for as long as logs are written
pub(crate) fn initialize_logging(config: &Config, args: &Opts) -> Result<(LoggerHandle, PathBuf)> {
    /// Customize the format of the log (colored)
    fn colored_format(
        w: &mut dyn Write,
        _now: &mut DeferredNow,
        record: &Record,
    ) -> Result<(), io::Error> {
        let level = record.level();
        write!(
            w,
            "{:<5} [{}:{}]: {}",
            style(level, level),
            style(Level::Trace, record.file().unwrap_or("<unnamed>")),
            record.line().unwrap_or(0),
            &record.args()
        )
    }

    /// Customize the format of the log (uncolored)
    fn uncolored_format(
        w: &mut dyn Write,
        now: &mut DeferredNow,
        record: &Record,
    ) -> Result<(), io::Error> {
        // Log messages may carry ansi sequences from `colored`
        write!(
            w,
            "[{:>}] {:<5} [{}:{}]: {}",
            now.now().format("%Y-%m-%d %H:%M:%S"),
            record.level(),
            record.file().unwrap_or("<unnamed>"),
            record.line().unwrap_or(0),
            String::from_utf8(strip_ansi_escapes::strip(
                &record.args().to_string().as_bytes()
            )?)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?
        )
    }

    if cfg!(debug_assertions) {
        better_panic::install();
        panic::set_hook(Box::new(|panic_info| {
            better_panic::Settings::auto().create_panic_handler()(panic_info);
        }));
    }

    let log_dir = config.log_dir.clone().unwrap_or_else(|| {
        PROJECT_DIRS.as_ref().map_or_else(
            || env::temp_dir().join(crate_name!()),
            |dirs| dirs.data_dir().to_path_buf(),
        )
    });

    let mut logger = Logger::try_with_str(log_spec(args.verbose))?
        .write_mode(WriteMode::BufferAndFlush)
        .adaptive_format_for_stderr(AdaptiveFormat::Custom(uncolored_format, colored_format))
        .set_palette(String::from("9;11;14;5;13"));

    if config.log_to_file {
        logger = logger
            .duplicate_to_stderr(Duplicate::All)
            .rotate(
                Criterion::AgeOrSize(Age::Day, 50_000_000),
                Naming::Numbers,
                Cleanup::KeepLogFiles(2),
            )
            .log_to_file(
                FileSpec::default()
                    .basename(crate_name!())
                    .directory(&log_dir),
            )
            .format_for_files(uncolored_format);
    }

    let handle = logger.start()?;

    Ok((handle, log_dir))
}

/// [`Deserialize`] something that has a shell variable
#[allow(single_use_lifetimes)]
pub(crate) fn deserialize_shellexpand<'de, D>(d: D) -> Result<Option<PathBuf>, D::Error>
where
    D: de::Deserializer<'de>,
{
    let value = match Option::<PathBuf>::deserialize(d)? {
        Some(value) => value,
        None => return Ok(None),
    };

    let value = PathBuf::from(
        shellexpand::full(&value.to_string_lossy())
            .map_err(|e| {
                de::Error::invalid_value(
                    de::Unexpected::Str(value.to_string_lossy().as_ref()),
                    &e.to_string().as_str(),
                )
            })?
            .to_string(),
    );

    Ok(Some(value))
}

/// Parse a window id given in hexadecimal (`0x...`) or decimal
pub(crate) fn parse_window(s: &str) -> Result<Window> {
    let s = s.trim();
    let res = match s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        Some(hex) => Window::from_str_radix(hex, 16),
        None => s.parse::<Window>(),
    };

    res.map_err(|e| anyhow!("invalid window id '{}': {}", s, e))
}

#[cfg(test)]
mod tests {
    use super::{log_spec, parse_window};

    #[test]
    fn window_ids() {
        assert_eq!(parse_window("0x1c00003").unwrap(), 0x01c0_0003);
        assert_eq!(parse_window(" 0X1C00003 ").unwrap(), 0x01c0_0003);
        assert_eq!(parse_window("29360131").unwrap(), 29_360_131);
        assert!(parse_window("0xzz").is_err());
        assert!(parse_window("-1").is_err());
    }

    #[test]
    fn verbosity_levels() {
        if std::env::var_os("PANELX_LOG").is_none() {
            assert_eq!(log_spec(0), "info");
            assert_eq!(log_spec(1), "debug");
            assert_eq!(log_spec(4), "trace");
        }
    }
}
