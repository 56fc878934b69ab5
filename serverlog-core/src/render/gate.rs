use crate::record::Level;
use serde::Deserialize;

/// Decides whether a record is shown at all.
pub trait SeverityGate {
    fn is_handling(&self, level: Level) -> bool;
}

impl<F> SeverityGate for F
where
    F: Fn(Level) -> bool,
{
    fn is_handling(&self, level: Level) -> bool {
        self(level)
    }
}

/// Console verbosity, from `-q` up to `-vvv`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Verbosity {
    Quiet,
    #[default]
    Normal,
    Verbose,
    VeryVerbose,
    Debug,
}

impl Verbosity {
    pub fn from_flags(quiet: bool, verbose: u8) -> Self {
        if quiet {
            return Verbosity::Quiet;
        }

        match verbose {
            0 => Verbosity::Normal,
            1 => Verbosity::Verbose,
            2 => Verbosity::VeryVerbose,
            _ => Verbosity::Debug,
        }
    }

    /// Lowest level displayed at this verbosity.
    pub fn min_level(self) -> Level {
        match self {
            Verbosity::Quiet => Level::ERROR,
            Verbosity::Normal => Level::WARNING,
            Verbosity::Verbose => Level::NOTICE,
            Verbosity::VeryVerbose => Level::INFO,
            Verbosity::Debug => Level::DEBUG,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct VerbosityGate {
    min_level: Level,
}

impl VerbosityGate {
    pub fn new(verbosity: Verbosity) -> Self {
        Self {
            min_level: verbosity.min_level(),
        }
    }
}

impl SeverityGate for VerbosityGate {
    fn is_handling(&self, level: Level) -> bool {
        level >= self.min_level
    }
}
