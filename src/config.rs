//! Configuration options

use crate::utils::deserialize_shellexpand;
use anyhow::{anyhow, Context, Result};
use colored::Colorize;
use directories::{BaseDirs, ProjectDirs};
use format_serde_error::SerdeError;
use once_cell::sync::Lazy;
use panelx::monitor::StrategyKind;
use serde::{Deserialize, Serialize};
use std::{
    env,
    fs,
    io::Write,
    path::{Path, PathBuf},
};

/// Configuration file name
const CONFIG_FILE: &str = "panelx.yml";

// =================== Config ===================== [[[

/// Configuration file to parse
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub(crate) struct Config {
    /// Display to connect to. `$DISPLAY` is used when unset
    pub(crate) display: Option<String>,

    /// Whether logs should be written to a file
    pub(crate) log_to_file: bool,

    /// The directory to write the log to
    #[serde(deserialize_with = "deserialize_shellexpand")]
    pub(crate) log_dir: Option<PathBuf>,

    /// Ways of detecting monitors, tried in order. The whole screen is used
    /// when none of them works
    pub(crate) monitor_detection: Vec<StrategyKind>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            display:           None,
            log_to_file:       false,
            log_dir:           None,
            monitor_detection: StrategyKind::default_order(),
        }
    }
}

impl Config {
    /// Create the default configuration file in `path` if there is none and
    /// load it
    pub(crate) fn create_default<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        if !path.exists() {
            log::debug!("creating configuration path: {}", path.display());
            fs::create_dir_all(path).context("unable to create configuration directory")?;
        }

        let path = path.join(CONFIG_FILE);
        log::debug!("{}: {}", "configuration path".bright_blue(), path.display());

        if !path.is_file() {
            let initialization = include_str!("../etc/panelx.yml");

            let mut config_file: fs::File = fs::OpenOptions::new()
                .write(true)
                .create(true)
                .open(&path)
                .with_context(|| format!("could not create panelx config: '{}'", path.display()))?;

            config_file
                .write_all(initialization.as_bytes())
                .with_context(|| format!("could not create panelx config: '{}'", path.display()))?;
            config_file.flush()?;
        }

        Self::load(path)
    }

    /// Load the configuration file from a given path
    pub(crate) fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = fs::read_to_string(path.as_ref())
            .with_context(|| format!("failed to read config file: {}", path.as_ref().display()))?;
        Self::parse(file)
    }

    /// Parse the contents of a configuration file
    pub(crate) fn parse(file: String) -> Result<Self> {
        // An empty file is a valid, default configuration
        if file.trim().is_empty() {
            return Ok(Self::default());
        }

        let res = serde_yaml::from_str(&file).map_err(|e| SerdeError::new(file, e))?;

        Ok(res)
    }

    /// Load the default configuration file
    pub(crate) fn load_default() -> Result<Self> {
        let dirs = PROJECT_DIRS
            .as_ref()
            .ok_or_else(|| anyhow!("could not detect the user's home directory"))?;
        let path = dirs.config_dir();
        log::debug!("loading default config: {}", path.display());
        Self::create_default(path)
    }
} // ]]] === Config ===

// ================ Project Dirs ================== [[[

/// Get the base [`PanelDirs`]
pub(crate) static PROJECT_DIRS: Lazy<Option<PanelDirs>> = Lazy::new(PanelDirs::new);

/// Get the project directories relevant to `panelx`
#[derive(Debug, Clone)]
pub(crate) struct PanelDirs {
    /// User's `$XDG_CONFIG_HOME/panelx` directory
    config_dir: PathBuf,
    /// User's `$XDG_DATA_HOME/panelx` directory
    data_dir:   PathBuf,
}

impl PanelDirs {
    /// Create a new [`PanelDirs`]
    fn new() -> Option<Self> {
        let project = get_project_dirs()?;
        Some(Self {
            config_dir: Self::get_dir(
                "PANELX_CONFIG_DIR",
                "XDG_CONFIG_HOME",
                ".config",
                project.config_dir(),
            )?,
            data_dir:   Self::get_dir(
                "PANELX_DATA_DIR",
                "XDG_DATA_HOME",
                ".local/share",
                project.data_dir(),
            )?,
        })
    }

    /// Wrapper function that makes it easier to get directories.
    ///
    /// `env_var` is used as is; `var` gets the package name appended. When
    /// neither is set, `join` below the home directory is tried and finally
    /// the platform default `dirf`
    fn get_dir(env_var: &str, var: &str, join: &str, dirf: &Path) -> Option<PathBuf> {
        env::var_os(env_var).map(PathBuf::from).map_or_else(
            || {
                env::var_os(var)
                    .map(PathBuf::from)
                    .filter(|p| p.is_absolute())
                    .or_else(|| BaseDirs::new().map(|p| p.home_dir().join(join)))
                    .map(|p| p.join(env!("CARGO_PKG_NAME")))
                    .or_else(|| Some(dirf.to_path_buf()))
            },
            |v| {
                // Custom env var is set
                if v.is_absolute() {
                    Some(v)
                } else {
                    BaseDirs::new().map(|p| p.home_dir().join(v))
                }
            },
        )
    }

    /// Get configuration directory
    #[must_use]
    pub(crate) fn config_dir(&self) -> &Path {
        &self.config_dir
    }

    /// Get local data directory, where log files are written by default
    #[must_use]
    pub(crate) fn data_dir(&self) -> &Path {
        &self.data_dir
    }
} // ]]] === Project Dirs ===

/// Get all user project directories
fn get_project_dirs() -> Option<ProjectDirs> {
    log::trace!("determining project default folders");
    ProjectDirs::from("org", "panelx", "panelx")
}

#[cfg(test)]
mod tests {
    use super::Config;
    use panelx::monitor::StrategyKind;
    use std::path::PathBuf;

    #[test]
    fn template_is_default() {
        let template = include_str!("../etc/panelx.yml").to_owned();
        assert_eq!(Config::parse(template).unwrap(), Config::default());
    }

    #[test]
    fn empty_file_is_default() {
        assert_eq!(Config::parse(String::from("\n")).unwrap(), Config::default());
    }

    #[test]
    fn custom_detection_order() {
        let config = Config::parse(String::from(
            "display: \":1\"\nlog-to-file: true\nlog-dir: /tmp/panelx\nmonitor-detection: [xinerama]\n",
        ))
        .unwrap();

        assert_eq!(config.display.as_deref(), Some(":1"));
        assert!(config.log_to_file);
        assert_eq!(config.log_dir, Some(PathBuf::from("/tmp/panelx")));
        assert_eq!(config.monitor_detection, vec![StrategyKind::Xinerama]);

        let config = Config::parse(String::from("monitor-detection: []\n")).unwrap();
        assert!(config.monitor_detection.is_empty());
    }

    #[test]
    fn unknown_strategy_is_rejected() {
        assert!(Config::parse(String::from("monitor-detection: [vga]\n")).is_err());
    }
}
