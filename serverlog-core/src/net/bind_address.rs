use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BindAddressError {
    #[error("unsupported transport '{0}' (expected tcp or unix)")]
    UnsupportedScheme(String),

    #[error("missing port in '{0}'")]
    MissingPort(String),

    #[error("invalid port in '{0}'")]
    InvalidPort(String),

    #[error("missing socket path in '{0}'")]
    MissingPath(String),
}

/// Where the server listens.
///
/// Written as `[scheme://]address`; without a scheme, TCP is assumed. A host
/// of `0` (or no host at all) listens on every IPv4 interface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BindAddress {
    Tcp { host: String, port: u16 },
    Unix(PathBuf),
}

pub const DEFAULT_BIND_ADDRESS: &str = "0:9911";

impl FromStr for BindAddress {
    type Err = BindAddressError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let (scheme, rest) = s.split_once("://").unwrap_or(("tcp", s));

        match scheme.to_ascii_lowercase().as_str() {
            "tcp" => parse_tcp(s, rest),
            "unix" if cfg!(unix) => {
                if rest.is_empty() {
                    Err(BindAddressError::MissingPath(s.to_string()))
                } else {
                    Ok(BindAddress::Unix(PathBuf::from(rest)))
                }
            }
            other => Err(BindAddressError::UnsupportedScheme(other.to_string())),
        }
    }
}

fn parse_tcp(original: &str, rest: &str) -> Result<BindAddress, BindAddressError> {
    let (host, port) = rest
        .rsplit_once(':')
        .ok_or_else(|| BindAddressError::MissingPort(original.to_string()))?;

    if port.is_empty() {
        return Err(BindAddressError::MissingPort(original.to_string()));
    }
    let port = port
        .parse::<u16>()
        .map_err(|_| BindAddressError::InvalidPort(original.to_string()))?;

    let host = host.trim_start_matches('[').trim_end_matches(']');
    let host = match host {
        "" | "0" => "0.0.0.0",
        other => other,
    };

    Ok(BindAddress::Tcp {
        host: host.to_string(),
        port,
    })
}

impl fmt::Display for BindAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BindAddress::Tcp { host, port } if host.contains(':') => {
                write!(f, "tcp://[{host}]:{port}")
            }
            BindAddress::Tcp { host, port } => write!(f, "tcp://{host}:{port}"),
            BindAddress::Unix(path) => write!(f, "unix://{}", path.display()),
        }
    }
}
