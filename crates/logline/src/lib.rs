// Module structure for the logline syslog parser.

// Core
pub mod parser;
pub mod encode;

// Embedding support
pub mod conf;
pub mod runtime;

pub use conf::{ConfigError, ParserConfig};
pub use parser::{
    parse_message, FieldParser, Format, FormatError, FormatKind, LogParser, Message, ParseError,
    Parser, StepError,
};
