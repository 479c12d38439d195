//! SBI URI scheme selection.

use std::fmt;
use std::str::FromStr;

use crate::error::SbiError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UriScheme {
    /// Cleartext HTTP/2 (prior knowledge); HTTP/1.1 is also accepted.
    Http,
    /// HTTP/2 over TLS, negotiated with ALPN.
    Https,
}

impl UriScheme {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Http => "http",
            Self::Https => "https",
        }
    }
}

impl FromStr for UriScheme {
    type Err = SbiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "http" => Ok(Self::Http),
            "https" => Ok(Self::Https),
            other => Err(SbiError::UnsupportedScheme(other.to_string())),
        }
    }
}

impl fmt::Display for UriScheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
