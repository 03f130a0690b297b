use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::priority::{Facility, Priority, Severity};

/// Structured data: outer SD-ID → param name → param value.
pub type StructuredData = HashMap<String, HashMap<String, String>>;

/// Built-in grammars.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FormatKind {
    /// RFC 5424 syslog
    #[default]
    Rfc5424,
    /// Nginx access log sent over syslog (`log_format syslog '[request ...]'`)
    NginxAccess,
    /// Nginx error log sent over syslog
    NginxError,
}

impl FormatKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            FormatKind::Rfc5424 => "rfc5424",
            FormatKind::NginxAccess => "nginx_access",
            FormatKind::NginxError => "nginx_error",
        }
    }
}

impl fmt::Display for FormatKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FormatKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "rfc5424" => Ok(FormatKind::Rfc5424),
            "nginx_access" | "nginx-access" => Ok(FormatKind::NginxAccess),
            "nginx_error" | "nginx-error" => Ok(FormatKind::NginxError),
            other => Err(format!("unknown format: {}", other)),
        }
    }
}

/// A grammar mismatch at a zero-based byte offset of the input line.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid format at byte {offset}: {reason}")]
pub struct FormatError {
    pub offset: usize,
    pub reason: String,
}

impl FormatError {
    pub fn new(offset: usize, reason: impl Into<String>) -> Self {
        Self {
            offset,
            reason: reason.into(),
        }
    }
}

/// Failure of a single field parser.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StepError {
    /// The input ended before the field was complete.
    #[error("insufficient input")]
    Eof,

    #[error(transparent)]
    Format(#[from] FormatError),
}

/// Failure of a whole parse, as seen by callers.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// The line ended before a required field or delimiter. More data may fix it.
    #[error("message incomplete")]
    Incomplete,

    /// The line is malformed.
    #[error(transparent)]
    Format(#[from] FormatError),

    #[error("Line too large: {0} bytes (max: {1} bytes)")]
    LineTooLarge(usize, usize),
}

impl ParseError {
    /// Byte offset of the failure, if the error has one.
    pub fn offset(&self) -> Option<usize> {
        match self {
            ParseError::Format(err) => Some(err.offset),
            _ => None,
        }
    }
}

impl From<StepError> for ParseError {
    fn from(err: StepError) -> Self {
        match err {
            StepError::Eof => ParseError::Incomplete,
            StepError::Format(err) => ParseError::Format(err),
        }
    }
}

/// A single decoded log line.
///
/// Every field starts out absent: zero priority, no version or timestamp,
/// empty strings and an empty data map. Grammar branches that are not taken
/// leave their field untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Message {
    pub priority: Priority,
    pub facility: Facility,
    pub severity: Severity,
    pub version: Option<u8>,
    /// Serializes as an RFC 3339 string
    pub timestamp: Option<DateTime<FixedOffset>>,
    pub hostname: String,
    pub appname: String,
    pub process_id: String,
    pub message_id: String,
    pub data: StructuredData,
    pub message: String,
}

impl Message {
    /// Looks up a structured-data param.
    pub fn param(&self, id: &str, name: &str) -> Option<&str> {
        self.data.get(id)?.get(name).map(String::as_str)
    }
}
