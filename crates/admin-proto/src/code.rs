//! Status codes embedded in every admin response
//!
//! The metadata service reports outcomes as textual codes (`ERR_OK`,
//! `ERR_FORWARD_TO_OTHERS`, ...). Routing decisions only depend on which
//! [`StatusClass`] a code falls into; everything the client does not know
//! about is treated as an application-level answer.

use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::fmt;

/// How a status code should be handled by a retrying caller
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatusClass {
    /// The request succeeded
    Ok,
    /// The replica is not the leader; ask another one
    Forward,
    /// The replica could not serve the request right now
    Transient,
    /// A well-formed answer about the request itself (never retried)
    Application,
}

/// Textual status code carried in the `err` field of every response
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ErrorCode(Cow<'static, str>);

impl ErrorCode {
    pub const OK: ErrorCode = ErrorCode::from_static("ERR_OK");
    pub const FORWARD_TO_OTHERS: ErrorCode = ErrorCode::from_static("ERR_FORWARD_TO_OTHERS");
    pub const SERVICE_NOT_ACTIVE: ErrorCode = ErrorCode::from_static("ERR_SERVICE_NOT_ACTIVE");
    pub const TIMEOUT: ErrorCode = ErrorCode::from_static("ERR_TIMEOUT");
    pub const NETWORK_FAILURE: ErrorCode = ErrorCode::from_static("ERR_NETWORK_FAILURE");
    pub const BUSY: ErrorCode = ErrorCode::from_static("ERR_BUSY");
    pub const APP_EXIST: ErrorCode = ErrorCode::from_static("ERR_APP_EXIST");
    pub const APP_NOT_EXIST: ErrorCode = ErrorCode::from_static("ERR_APP_NOT_EXIST");
    pub const INVALID_PARAMETERS: ErrorCode = ErrorCode::from_static("ERR_INVALID_PARAMETERS");
    pub const OBJECT_NOT_FOUND: ErrorCode = ErrorCode::from_static("ERR_OBJECT_NOT_FOUND");
    pub const INVALID_STATE: ErrorCode = ErrorCode::from_static("ERR_INVALID_STATE");
    pub const BUSY_CREATING: ErrorCode = ErrorCode::from_static("ERR_BUSY_CREATING");
    pub const BUSY_DROPPING: ErrorCode = ErrorCode::from_static("ERR_BUSY_DROPPING");

    const fn from_static(code: &'static str) -> Self {
        ErrorCode(Cow::Borrowed(code))
    }

    /// Wrap an arbitrary code received from (or destined for) the wire
    pub fn new(code: impl Into<String>) -> Self {
        ErrorCode(Cow::Owned(code.into()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_ok(&self) -> bool {
        self.class() == StatusClass::Ok
    }

    /// Classify this code for routing purposes
    pub fn class(&self) -> StatusClass {
        match self.as_str() {
            "ERR_OK" => StatusClass::Ok,
            "ERR_FORWARD_TO_OTHERS" => StatusClass::Forward,
            "ERR_SERVICE_NOT_ACTIVE" | "ERR_TIMEOUT" | "ERR_NETWORK_FAILURE" | "ERR_BUSY" => {
                StatusClass::Transient
            }
            _ => StatusClass::Application,
        }
    }
}

impl Default for ErrorCode {
    fn default() -> Self {
        ErrorCode::OK
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<&str> for ErrorCode {
    fn from(code: &str) -> Self {
        ErrorCode::new(code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classification() {
        assert_eq!(ErrorCode::OK.class(), StatusClass::Ok);
        assert_eq!(ErrorCode::FORWARD_TO_OTHERS.class(), StatusClass::Forward);
        assert_eq!(ErrorCode::SERVICE_NOT_ACTIVE.class(), StatusClass::Transient);
        assert_eq!(ErrorCode::TIMEOUT.class(), StatusClass::Transient);
        assert_eq!(ErrorCode::APP_EXIST.class(), StatusClass::Application);
        assert_eq!(ErrorCode::BUSY_CREATING.class(), StatusClass::Application);
        assert_eq!(ErrorCode::new("ERR_SOMETHING_NEW").class(), StatusClass::Application);
    }

    #[test]
    fn test_owned_and_static_codes_compare_equal() {
        assert_eq!(ErrorCode::new("ERR_APP_EXIST"), ErrorCode::APP_EXIST);
        assert!(ErrorCode::from("ERR_OK").is_ok());
        assert_eq!(ErrorCode::default(), ErrorCode::OK);
    }

    #[test]
    fn test_serializes_as_plain_string() {
        let json = serde_json::to_string(&ErrorCode::APP_NOT_EXIST).unwrap();
        assert_eq!(json, "\"ERR_APP_NOT_EXIST\"");

        let code: ErrorCode = serde_json::from_str("\"ERR_FORWARD_TO_OTHERS\"").unwrap();
        assert_eq!(code, ErrorCode::FORWARD_TO_OTHERS);
    }
}
