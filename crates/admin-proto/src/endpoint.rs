//! Replica addresses

use crate::error::ProtoError;
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Network address of one metadata replica.
///
/// Parsed from `<host>:<port>`. The host may be a DNS name or an IPv4
/// address; IPv6 literals are rejected. The port must be non-zero.
///
/// # Example
///
/// ```
/// use meta_admin_proto::Endpoint;
///
/// let ep: Endpoint = "meta-1.cluster:34601".parse().unwrap();
/// assert_eq!(ep.host(), "meta-1.cluster");
/// assert_eq!(ep.port(), 34601);
/// assert_eq!(ep.to_string(), "meta-1.cluster:34601");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Endpoint {
    host: String,
    port: u16,
}

impl Endpoint {
    /// Create an endpoint, validating host and port
    pub fn new(host: impl Into<String>, port: u16) -> Result<Self, ProtoError> {
        let host = host.into();
        let invalid = |reason: &str| ProtoError::InvalidEndpoint {
            input: format!("{}:{}", host, port),
            reason: reason.to_string(),
        };

        if host.is_empty() {
            return Err(invalid("host is empty"));
        }
        if host.contains(':') || host.starts_with('[') {
            return Err(invalid("IPv6 notation is not supported"));
        }
        if host.chars().any(char::is_whitespace) {
            return Err(invalid("host contains whitespace"));
        }
        if port == 0 {
            return Err(invalid("port must be non-zero"));
        }

        Ok(Self { host, port })
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn port(&self) -> u16 {
        self.port
    }
}

impl FromStr for Endpoint {
    type Err = ProtoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let (host, port) = s.rsplit_once(':').ok_or_else(|| ProtoError::InvalidEndpoint {
            input: s.to_string(),
            reason: "expected <host>:<port>".to_string(),
        })?;

        let port = port.parse::<u16>().map_err(|e| ProtoError::InvalidEndpoint {
            input: s.to_string(),
            reason: format!("bad port: {}", e),
        })?;

        Self::new(host, port)
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.host, self.port)
    }
}

impl Serialize for Endpoint {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Endpoint {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(de::Error::custom)
    }
}
