use crate::net::BindAddress;
use crate::render::{
    DEFAULT_DATE_FORMAT, DEFAULT_FORMAT, LineFormatter, Verbosity, VerbosityGate,
};
use serde::Deserialize;

/// Contents of an optional `serverlog.hcl`.
///
/// ```hcl
/// listen      = "127.0.0.1:9911"
/// date_format = "%Y-%m-%d %H:%M:%S"
/// filter      = "level >= 300"
/// colors      = true
/// verbosity   = "very_verbose"
/// ```
#[derive(Debug, Default, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    pub listen: Option<String>,
    pub format: Option<String>,
    pub date_format: Option<String>,
    pub filter: Option<String>,
    pub colors: Option<bool>,
    pub verbosity: Option<Verbosity>,
}

/// Values given on the command line. Anything set here wins over the file.
#[derive(Debug, Default, Clone)]
pub struct ConfigOverrides {
    pub listen: Option<String>,
    pub format: Option<String>,
    pub date_format: Option<String>,
    pub filter: Option<String>,
    pub colors: Option<bool>,
    pub verbosity: Option<Verbosity>,
}

/// Fully resolved settings for one server run.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewerConfig {
    pub listen: BindAddress,
    pub format: String,
    pub date_format: String,
    pub filter: Option<String>,
    pub colors: bool,
    pub verbosity: Verbosity,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            listen: BindAddress::Tcp {
                host: "0.0.0.0".to_string(),
                port: 9911,
            },
            format: DEFAULT_FORMAT.to_string(),
            date_format: DEFAULT_DATE_FORMAT.to_string(),
            filter: None,
            colors: false,
            verbosity: Verbosity::default(),
        }
    }
}

impl ViewerConfig {
    /// Context and extra are pretty-printed only at the highest verbosity.
    pub fn multiline(&self) -> bool {
        self.verbosity == Verbosity::Debug
    }

    pub fn formatter(&self) -> LineFormatter {
        LineFormatter::new(
            self.format.clone(),
            self.date_format.clone(),
            self.colors,
            self.multiline(),
        )
    }

    pub fn gate(&self) -> VerbosityGate {
        VerbosityGate::new(self.verbosity)
    }
}
