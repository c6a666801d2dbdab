//! Layout of the persistent key/value store.

use std::fmt;
use std::str::FromStr;

/// Hash: field = virtual id (hex), value = real id (hex).
pub const VID_TO_RID: &str = "VIDTORID";
/// Hash: field = real id (hex), value = virtual id (hex).
pub const RID_TO_VID: &str = "RIDTOVID";
/// Integer key backing virtual-id allocation; atomically incremented.
pub const VID_COUNTER: &str = "VIDCOUNTER";
/// Current daemon log level.
pub const LOG_LEVEL: &str = "LOGLEVEL";

/// Log levels stored under [`LOG_LEVEL`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogLevel {
    Debug,
    Info,
    #[default]
    Notice,
    Warn,
    Error,
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            LogLevel::Debug => "DEBUG",
            LogLevel::Info => "INFO",
            LogLevel::Notice => "NOTICE",
            LogLevel::Warn => "WARN",
            LogLevel::Error => "ERROR",
        };
        f.write_str(s)
    }
}

impl FromStr for LogLevel {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "DEBUG" => Ok(LogLevel::Debug),
            "INFO" => Ok(LogLevel::Info),
            "NOTICE" => Ok(LogLevel::Notice),
            "WARN" => Ok(LogLevel::Warn),
            "ERROR" => Ok(LogLevel::Error),
            _ => Err(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip() {
        for level in [
            LogLevel::Debug,
            LogLevel::Info,
            LogLevel::Notice,
            LogLevel::Warn,
            LogLevel::Error,
        ] {
            assert_eq!(level.to_string().parse::<LogLevel>().unwrap(), level);
        }
        assert!("verbose".parse::<LogLevel>().is_err());
    }
}
