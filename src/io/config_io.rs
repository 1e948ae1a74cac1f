use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::model::config::AppConfig;

/// Environment variable overriding the data directory
pub const DATA_DIR_ENV: &str = "TICKLIST_DIR";

const CONFIG_FILE: &str = "config.toml";

/// Error type for configuration I/O
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("could not read {path}: {source}")]
    ReadError { path: PathBuf, source: io::Error },
    #[error("could not parse config.toml: {0}")]
    ParseError(#[from] toml::de::Error),
    #[error("config.toml already exists at {0}")]
    AlreadyExists(PathBuf),
    #[error("io error: {0}")]
    IoError(#[from] io::Error),
}

pub const CONFIG_TEMPLATE: &str = r##"# ticklist configuration

[storage]
# write a few sample tasks the first time the list is opened
seed_samples = true

[ui]
show_key_hints = true
# used by the "auto" theme when the terminal does not report its background
fallback_appearance = "dark"

# Uncomment and edit to override palette colors.
#
# [ui.colors.dark]
# background = "#161722"
# surface = "#25273C"
# text = "#C8CBE7"
# text_bright = "#E4E5F1"
# dim = "#5B5E7E"
# accent = "#3A7BFD"
# accent_alt = "#C058F3"
# danger = "#E05F5F"
#
# [ui.colors.light]
# background = "#FAFAFA"
# surface = "#FFFFFF"
# text = "#494C6B"
# text_bright = "#25273C"
# dim = "#9495A5"

[log]
# trace | debug | info | warn | error
# level = "info"
"##;

/// Pick the data directory: explicit flag, then `TICKLIST_DIR`, then the
/// platform data directory, then `./.ticklist`.
pub fn resolve_data_dir(explicit: Option<&Path>) -> PathBuf {
    if let Some(dir) = explicit {
        return dir.to_path_buf();
    }
    if let Some(dir) = std::env::var_os(DATA_DIR_ENV).filter(|v| !v.is_empty()) {
        return PathBuf::from(dir);
    }
    dirs::data_dir()
        .map(|d| d.join("ticklist"))
        .unwrap_or_else(|| PathBuf::from(".ticklist"))
}

pub fn config_path(data_dir: &Path) -> PathBuf {
    data_dir.join(CONFIG_FILE)
}

/// Read config.toml from the data directory. A missing file yields defaults.
pub fn read_config(data_dir: &Path) -> Result<AppConfig, ConfigError> {
    let path = config_path(data_dir);
    let text = match fs::read_to_string(&path) {
        Ok(text) => text,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(AppConfig::default()),
        Err(e) => return Err(ConfigError::ReadError { path, source: e }),
    };
    Ok(toml::from_str(&text)?)
}

/// Write the commented template, refusing to overwrite an existing file.
pub fn write_config_template(data_dir: &Path) -> Result<PathBuf, ConfigError> {
    let path = config_path(data_dir);
    if path.exists() {
        return Err(ConfigError::AlreadyExists(path));
    }
    fs::create_dir_all(data_dir)?;
    fs::write(&path, CONFIG_TEMPLATE)?;
    Ok(path)
}
