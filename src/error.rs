//! Error handling for rdap-bootstrap

use crate::types::ObjectKind;
use thiserror::Error;

/// Main error type for rdap-bootstrap
#[derive(Error, Debug, Clone)]
pub enum RdapError {
    #[error("Cannot determine object type of '{identifier}'")]
    Classification { identifier: String },

    #[error("No RDAP service known for '{identifier}'")]
    UnknownService {
        identifier: String,
        kind: Option<ObjectKind>,
    },

    #[error("Expected a {expected} reference but '{identifier}' is a {actual}")]
    KindMismatch {
        identifier: String,
        expected: ObjectKind,
        actual: ObjectKind,
    },

    #[error("Transport error: {message}")]
    Transport {
        message: String,
        status_code: Option<u16>,
        url: Option<String>,
    },

    #[error("Timeout error: request to {url} timed out")]
    Timeout { url: String },

    #[error("Malformed bootstrap document: {message}")]
    Format {
        message: String,
        url: Option<String>,
    },

    #[error("Parse error: {message}")]
    Parse {
        message: String,
        content: Option<String>,
    },

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl RdapError {
    /// Create a classification error
    pub fn classification(identifier: impl Into<String>) -> Self {
        Self::Classification {
            identifier: identifier.into(),
        }
    }

    /// Create an unknown service error
    pub fn unknown_service(identifier: impl Into<String>, kind: Option<ObjectKind>) -> Self {
        Self::UnknownService {
            identifier: identifier.into(),
            kind,
        }
    }

    /// Create a kind mismatch error
    pub fn kind_mismatch(
        identifier: impl Into<String>,
        expected: ObjectKind,
        actual: ObjectKind,
    ) -> Self {
        Self::KindMismatch {
            identifier: identifier.into(),
            expected,
            actual,
        }
    }

    /// Create a transport error
    pub fn transport(
        message: impl Into<String>,
        status_code: Option<u16>,
        url: Option<String>,
    ) -> Self {
        Self::Transport {
            message: message.into(),
            status_code,
            url,
        }
    }

    /// Create a timeout error
    pub fn timeout(url: impl Into<String>) -> Self {
        Self::Timeout { url: url.into() }
    }

    /// Create a bootstrap document format error
    pub fn format(message: impl Into<String>, url: Option<String>) -> Self {
        Self::Format {
            message: message.into(),
            url,
        }
    }

    /// Create a parse error
    pub fn parse(message: impl Into<String>, content: Option<String>) -> Self {
        Self::Parse {
            message: message.into(),
            content,
        }
    }

    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create an internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Attach the document URL to a format error that does not carry one yet
    pub fn with_url(self, document_url: &str) -> Self {
        match self {
            Self::Format { message, url: None } => Self::Format {
                message,
                url: Some(document_url.to_string()),
            },
            other => other,
        }
    }

    /// Whether repeating the same call may succeed without new input
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Transport { .. } | Self::Timeout { .. })
    }

    /// HTTP status reported by the remote side, if any
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::Transport { status_code, .. } => *status_code,
            _ => None,
        }
    }

    /// Get user-friendly error message with suggestions
    pub fn user_message(&self) -> String {
        match self {
            Self::Classification { identifier } => {
                format!(
                    "❌ Cannot tell what kind of object '{}' is\n💡 Pass --type domain or --type entity",
                    identifier
                )
            }
            Self::UnknownService { identifier, kind } => {
                let kind = kind.map_or(String::new(), |k| format!(" {}", k));
                format!(
                    "❌ No RDAP server is responsible for{} '{}'\n💡 Pass --service to query a server directly",
                    kind, identifier
                )
            }
            Self::KindMismatch { identifier, expected, actual } => {
                format!("❌ '{}' is a {} reference, not a {}", identifier, actual, expected)
            }
            Self::Transport { message, status_code, .. } => {
                let status = status_code.map_or(String::new(), |c| format!(" ({})", c));
                format!("❌ Network error{}: {}\n💡 Check your internet connection", status, message)
            }
            Self::Timeout { url } => {
                format!("⏱️  Request to {} timed out\n💡 Try increasing RDAP_TIMEOUT_SECS", url)
            }
            Self::Format { message, url } => {
                let url = url.as_ref().map_or(String::new(), |u| format!(" ({})", u));
                format!("❌ Bootstrap data is malformed{}: {}\n💡 The previous registry data stays in use", url, message)
            }
            Self::Parse { message, .. } => {
                format!("❌ Parse error: {}\n💡 The server returned an unexpected response", message)
            }
            Self::Config { message } => {
                format!("❌ Configuration problem: {}\n💡 Check your .env file or RDAP_* variables", message)
            }
            Self::Internal { message } => {
                format!("❌ Internal error: {}\n💡 This is a bug, please report it", message)
            }
        }
    }
}

/// Convert from common error types
impl From<reqwest::Error> for RdapError {
    fn from(err: reqwest::Error) -> Self {
        let status_code = err.status().map(|s| s.as_u16());
        let url = err.url().map(|u| u.to_string());

        if err.is_timeout() {
            Self::timeout(url.unwrap_or_default())
        } else if err.is_connect() {
            Self::transport("Connection failed", status_code, url)
        } else if err.is_request() {
            Self::transport("Request failed", status_code, url)
        } else {
            Self::transport(err.to_string(), status_code, url)
        }
    }
}

impl From<serde_json::Error> for RdapError {
    fn from(err: serde_json::Error) -> Self {
        Self::parse(err.to_string(), None)
    }
}

impl From<dotenv::Error> for RdapError {
    fn from(err: dotenv::Error) -> Self {
        Self::config(err.to_string())
    }
}

/// Result type alias for convenience
pub type Result<T> = std::result::Result<T, RdapError>;

/// Helper macro for bootstrap document errors
#[macro_export]
macro_rules! format_error {
    ($msg:expr) => {
        $crate::error::RdapError::format($msg, None)
    };
    ($fmt:expr, $($arg:tt)*) => {
        $crate::error::RdapError::format(format!($fmt, $($arg)*), None)
    };
}

#[macro_export]
macro_rules! config_error {
    ($msg:expr) => {
        $crate::error::RdapError::config($msg)
    };
    ($fmt:expr, $($arg:tt)*) => {
        $crate::error::RdapError::config(format!($fmt, $($arg)*))
    };
}
