//! Built-in grammars and the `Format` container

pub mod nginx;
pub mod syslog;

use std::fmt;
use std::sync::LazyLock;

use super::model::FormatKind;
use super::traits::Step;

/// An ordered list of field parsers describing one complete log grammar.
///
/// Immutable once built; a single instance can be shared by any number of
/// concurrent parses.
pub struct Format {
    name: String,
    steps: Vec<Step>,
}

impl Format {
    pub fn new(name: impl Into<String>, steps: Vec<Step>) -> Self {
        Self {
            name: name.into(),
            steps,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }
}

impl fmt::Debug for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Format")
            .field("name", &self.name)
            .field("steps", &self.steps.len())
            .finish()
    }
}

/// Format of RFC 5424, see <https://tools.ietf.org/html/rfc5424>.
pub static RFC5424: LazyLock<Format> = LazyLock::new(syslog::rfc5424);

/// Nginx access logs sent to syslog. The structured data is only filled in
/// when nginx uses a `log_format` of the form:
///
/// ```text
/// log_format syslog '[request '
///     'remote_addr="$remote_addr" '
///     'request_time="$request_time" '
///     'status="$status"'
///     ']';
/// ```
///
/// after which `status` is found at `msg.data["request"]["status"]`.
pub static NGINX_ACCESS: LazyLock<Format> = LazyLock::new(nginx::access);

/// Nginx error logs sent to syslog.
pub static NGINX_ERROR: LazyLock<Format> = LazyLock::new(nginx::error);

impl FormatKind {
    /// The shared built-in format for this kind.
    pub fn format(self) -> &'static Format {
        match self {
            FormatKind::Rfc5424 => &RFC5424,
            FormatKind::NginxAccess => &NGINX_ACCESS,
            FormatKind::NginxError => &NGINX_ERROR,
        }
    }
}
