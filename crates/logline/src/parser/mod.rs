//! Log line parsing
//!
//! Turns one raw syslog line into a structured [`Message`] by running an
//! ordered list of field parsers (a [`Format`]) over a byte cursor.
//!
//! # Architecture
//!
//! - `cursor.rs`: forward-only byte reader with a single-byte unread
//! - `fields.rs`: the field parsers and combinators
//! - `formats/`: the built-in grammars (RFC 5424, Nginx access/error)
//! - `driver.rs`: runs a format and wraps it in the [`Parser`] façade
//! - `priority.rs`: priority/facility/severity values
//! - `metrics.rs`: parsing counters
//!
//! A `Format` is immutable once built and may be shared by any number of
//! threads; every parse gets its own cursor and message.

pub mod cursor;
pub mod driver;
pub mod fields;
pub mod formats;
pub mod metrics;
pub mod model;
pub mod priority;
pub mod traits;

// Re-export commonly used types
pub use driver::{parse_message, Parser};
pub use formats::{Format, NGINX_ACCESS, NGINX_ERROR, RFC5424};
pub use model::{FormatError, FormatKind, Message, ParseError, StepError, StructuredData};
pub use priority::{calculate_priority, Facility, Priority, Severity};
pub use traits::{FieldParser, LogParser, Step};

// Constants
pub const MAX_LINE_SIZE: usize = 1_048_576; // 1MB
