//! Interpreter settings shared by every run in the process.
//!
//! Settings come from `[interpreter]` in `bf.toml` under the XDG config home
//! (or the file named by `BF_CONFIG`) and can be replaced at any time with
//! [`set_global`]; a run copies the current value when it starts.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use cross_xdg::BaseDirs;
use serde::Deserialize;

use crate::tape::CellWidth;

pub const DEFAULT_TAPE_LENGTH: usize = 30_000;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("tape_length must be > 0")]
    ZeroTapeLength,

    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

/// Tape length, cell width and console echo.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct InterpreterConfig {
    /// Number of cells on the tape.
    pub tape_length: usize,
    /// Written as `8` or `16` in TOML.
    pub cell_width: CellWidth,
    /// Mirror each `.` to the echo sink as it happens.
    pub console_echo: bool,
}

impl InterpreterConfig {
    pub const DEFAULT: InterpreterConfig = InterpreterConfig {
        tape_length: DEFAULT_TAPE_LENGTH,
        cell_width: CellWidth::Eight,
        console_echo: true,
    };

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.tape_length == 0 {
            return Err(ConfigError::ZeroTapeLength);
        }
        Ok(())
    }
}

impl Default for InterpreterConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}

#[derive(Debug, Default, Deserialize)]
struct ConfigFile {
    #[serde(default)]
    interpreter: InterpreterConfig,
}

static GLOBAL: RwLock<InterpreterConfig> = RwLock::new(InterpreterConfig::DEFAULT);

/// Current process-wide settings.
pub fn global() -> InterpreterConfig {
    *GLOBAL.read().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Replace the process-wide settings used by subsequent [`crate::execute`] calls.
pub fn set_global(config: InterpreterConfig) -> Result<(), ConfigError> {
    config.validate()?;
    *GLOBAL.write().unwrap_or_else(|poisoned| poisoned.into_inner()) = config;
    Ok(())
}

/// `$BF_CONFIG` if set, else `bf.toml` inside the user's config home.
pub fn default_config_path() -> Option<PathBuf> {
    if let Some(path) = std::env::var_os("BF_CONFIG") {
        return Some(PathBuf::from(path));
    }

    // On Linux: resolves to /home/<user>/.config
    // On Windows: resolves to C:\Users\<user>\.config
    // On macOS: resolves to /Users/<user>/.config
    let base_dirs = BaseDirs::new().ok()?;
    let mut path = PathBuf::from(base_dirs.config_home());
    path.push("bf.toml");
    Some(path)
}

/// Parse the `[interpreter]` table of a TOML document.
pub fn parse_toml(content: &str, path: &Path) -> Result<InterpreterConfig, ConfigError> {
    let file: ConfigFile = toml::from_str(content).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    file.interpreter.validate()?;
    Ok(file.interpreter)
}

/// Load settings from `path`. A missing file is `Ok(None)`.
pub fn load_from_toml(path: &Path) -> Result<Option<InterpreterConfig>, ConfigError> {
    if !path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    parse_toml(&content, path).map(Some)
}

/// Settings from the user's `bf.toml`, falling back to defaults when the
/// file is absent or unusable.
pub fn load_user_config() -> InterpreterConfig {
    let Some(path) = default_config_path() else {
        return InterpreterConfig::default();
    };
    match load_from_toml(&path) {
        Ok(Some(config)) => {
            tracing::debug!(path = %path.display(), ?config, "loaded interpreter config");
            config
        }
        Ok(None) => InterpreterConfig::default(),
        Err(err) => {
            tracing::warn!(%err, "ignoring interpreter config");
            InterpreterConfig::default()
        }
    }
}
