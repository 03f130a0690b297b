//! Model: ParserConfig.

use serde::{Deserialize, Serialize};

use crate::parser::{FormatKind, MAX_LINE_SIZE};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParserConfig {
    /// Grammar used for every line
    pub format: FormatKind,
    /// Lines longer than this are rejected without being parsed
    pub max_line_size: usize,
    /// Keep parsing counters
    pub metrics: bool,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            format: FormatKind::Rfc5424,
            max_line_size: MAX_LINE_SIZE,
            metrics: true,
        }
    }
}
