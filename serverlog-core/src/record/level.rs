use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;

/// Monolog-style severity.
///
/// Any integer is accepted on the wire; the named constants are the ones the
/// renderer and the verbosity gate know about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Level(pub i64);

impl Level {
    pub const DEBUG: Level = Level(100);
    pub const INFO: Level = Level(200);
    pub const NOTICE: Level = Level(250);
    pub const WARNING: Level = Level(300);
    pub const ERROR: Level = Level(400);
    pub const CRITICAL: Level = Level(500);
    pub const ALERT: Level = Level(550);
    pub const EMERGENCY: Level = Level(600);

    const NAMED: [(Level, &'static str); 8] = [
        (Level::DEBUG, "DEBUG"),
        (Level::INFO, "INFO"),
        (Level::NOTICE, "NOTICE"),
        (Level::WARNING, "WARNING"),
        (Level::ERROR, "ERROR"),
        (Level::CRITICAL, "CRITICAL"),
        (Level::ALERT, "ALERT"),
        (Level::EMERGENCY, "EMERGENCY"),
    ];

    pub fn name(self) -> Cow<'static, str> {
        Self::NAMED
            .iter()
            .find(|(level, _)| *level == self)
            .map(|(_, name)| Cow::Borrowed(*name))
            .unwrap_or_else(|| Cow::Owned(format!("LEVEL{}", self.0)))
    }

    pub fn value(self) -> i64 {
        self.0
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name())
    }
}

impl FromStr for Level {
    type Err = String;

    /// Accepts either a level name (case-insensitive) or its numeric value.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if let Ok(value) = s.parse::<i64>() {
            return Ok(Level(value));
        }

        Self::NAMED
            .iter()
            .find(|(_, name)| name.eq_ignore_ascii_case(s))
            .map(|(level, _)| *level)
            .ok_or_else(|| format!("unknown log level '{s}'"))
    }
}
