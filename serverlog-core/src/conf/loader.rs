use crate::conf::error::ConfigError;
use crate::conf::types::{ConfigFile, ConfigOverrides, ViewerConfig};
use crate::net::{BindAddress, DEFAULT_BIND_ADDRESS};
use crate::render::{DEFAULT_DATE_FORMAT, DEFAULT_FORMAT, is_valid_date_format};
use std::fs;
use std::path::Path;

pub fn load_config_file(path: &Path) -> Result<ConfigFile, ConfigError> {
    let s = fs::read_to_string(path).map_err(|e| ConfigError::read_file(path, e))?;
    hcl::from_str(&s).map_err(|e| ConfigError::parse(path, e))
}

/// Merge command-line values over the file over built-in defaults.
///
/// `terminal` says whether stdout is a TTY; it decides colors when neither
/// source does.
pub fn resolve(
    overrides: ConfigOverrides,
    file: Option<ConfigFile>,
    terminal: bool,
) -> Result<ViewerConfig, ConfigError> {
    let file = file.unwrap_or_default();

    let listen: BindAddress = overrides
        .listen
        .or(file.listen)
        .as_deref()
        .unwrap_or(DEFAULT_BIND_ADDRESS)
        .parse()?;

    let format = match overrides.format {
        // Shells make a real newline awkward to pass.
        Some(format) => format.replace("\\n", "\n"),
        None => file.format.unwrap_or_else(|| DEFAULT_FORMAT.to_string()),
    };

    let date_format = overrides
        .date_format
        .or(file.date_format)
        .unwrap_or_else(|| DEFAULT_DATE_FORMAT.to_string());
    if !is_valid_date_format(&date_format) {
        return Err(ConfigError::InvalidDateFormat(date_format));
    }

    let filter = overrides
        .filter
        .or(file.filter)
        .filter(|f| !f.trim().is_empty());

    Ok(ViewerConfig {
        listen,
        format,
        date_format,
        filter,
        colors: overrides.colors.or(file.colors).unwrap_or(terminal),
        verbosity: overrides.verbosity.or(file.verbosity).unwrap_or_default(),
    })
}
