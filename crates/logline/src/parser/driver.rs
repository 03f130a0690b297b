use std::ops::Deref;
use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, info, trace};

use super::cursor::Cursor;
use super::formats::Format;
use super::metrics::{MetricErrorType, ParsingMetrics};
use super::model::{FormatKind, Message, ParseError};
use super::traits::LogParser;
use super::MAX_LINE_SIZE;
use crate::conf::{ConfigError, ParserConfig};

/// Runs every step of `format` over `raw`, in order, stopping at the first failure.
///
/// Running out of input in any step surfaces as [`ParseError::Incomplete`].
/// Bytes left over after the last step are ignored.
pub fn parse_message(raw: &[u8], format: &Format) -> Result<Message, ParseError> {
    let mut cursor = Cursor::new(raw);
    let mut msg = Message::default();

    for (step, parser) in format.steps().iter().enumerate() {
        trace!(format = format.name(), step, offset = cursor.position(), "running step");

        if let Err(err) = parser.parse(&mut cursor, &mut msg) {
            debug!(
                format = format.name(),
                step,
                offset = cursor.position(),
                error = %err,
                "parse failed"
            );
            return Err(err.into());
        }
    }

    Ok(msg)
}

enum FormatRef {
    Builtin(FormatKind),
    Custom(Arc<Format>),
}

impl Deref for FormatRef {
    type Target = Format;

    fn deref(&self) -> &Format {
        match self {
            FormatRef::Builtin(kind) => kind.format(),
            FormatRef::Custom(format) => format,
        }
    }
}

/// A reusable parser bound to one format.
///
/// Cheap to share behind an `Arc`; each `parse` call owns its own cursor and message.
pub struct Parser {
    format: FormatRef,
    max_line_size: usize,
    metrics: Option<Arc<ParsingMetrics>>,
}

impl Parser {
    pub fn new(kind: FormatKind) -> Self {
        Self {
            format: FormatRef::Builtin(kind),
            max_line_size: MAX_LINE_SIZE,
            metrics: None,
        }
    }

    pub fn with_format(format: Arc<Format>) -> Self {
        Self {
            format: FormatRef::Custom(format),
            max_line_size: MAX_LINE_SIZE,
            metrics: None,
        }
    }

    /// Builds a parser from `config`, rejecting settings that can never parse a line.
    pub fn from_config(config: &ParserConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        info!(
            format = %config.format,
            max_line_size = config.max_line_size,
            metrics = config.metrics,
            "Creating parser"
        );
        let parser = Self::new(config.format).with_max_line_size(config.max_line_size);
        Ok(if config.metrics {
            parser.with_metrics(Arc::new(ParsingMetrics::new()))
        } else {
            parser
        })
    }

    pub fn with_metrics(mut self, metrics: Arc<ParsingMetrics>) -> Self {
        self.metrics = Some(metrics);
        self
    }

    pub fn with_max_line_size(mut self, max_line_size: usize) -> Self {
        self.max_line_size = max_line_size;
        self
    }

    /// The built-in kind, `None` for custom formats.
    pub fn kind(&self) -> Option<FormatKind> {
        match self.format {
            FormatRef::Builtin(kind) => Some(kind),
            FormatRef::Custom(_) => None,
        }
    }

    pub fn max_line_size(&self) -> usize {
        self.max_line_size
    }

    pub fn metrics(&self) -> Option<&Arc<ParsingMetrics>> {
        self.metrics.as_ref()
    }

    fn parse_line(&self, raw: &[u8]) -> Result<Message, ParseError> {
        // Refuse oversized lines before touching them
        if raw.len() > self.max_line_size {
            return Err(ParseError::LineTooLarge(raw.len(), self.max_line_size));
        }
        parse_message(raw, &self.format)
    }
}

impl Default for Parser {
    fn default() -> Self {
        Self::new(FormatKind::default())
    }
}

impl LogParser for Parser {
    fn parse(&self, raw: &[u8]) -> Result<Message, ParseError> {
        let Some(metrics) = &self.metrics else {
            return self.parse_line(raw);
        };

        let parse_start = Instant::now();
        let result = self.parse_line(raw);
        match &result {
            Ok(_) => {
                let parse_time = u64::try_from(parse_start.elapsed().as_nanos()).unwrap_or(u64::MAX);
                metrics.record_parse(self.kind(), parse_time);
            }
            Err(err) => metrics.record_error(MetricErrorType::from(err)),
        }
        result
    }

    fn format(&self) -> &Format {
        &self.format
    }
}
