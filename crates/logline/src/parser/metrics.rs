use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;

use super::model::{FormatKind, ParseError};

/// Error categories for metrics recording.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetricErrorType {
    /// The line ended early
    Incomplete,
    /// The line did not match the grammar
    Malformed,
    /// Line exceeded the configured maximum size
    TooLarge,
}

impl From<&ParseError> for MetricErrorType {
    fn from(err: &ParseError) -> Self {
        match err {
            ParseError::Incomplete => MetricErrorType::Incomplete,
            ParseError::Format(_) => MetricErrorType::Malformed,
            ParseError::LineTooLarge(..) => MetricErrorType::TooLarge,
        }
    }
}

/// A wrapper that forces the wrapped data onto its own cache line(s), so
/// threads bumping different groups don't invalidate each other.
#[repr(align(64))]
#[derive(Debug, Default)]
pub struct CacheAligned<T>(pub T);

/// Successful parses per format (updated once per line)
#[derive(Debug, Default)]
pub struct FormatMetrics {
    pub rfc5424: AtomicU64,
    pub nginx_access: AtomicU64,
    pub nginx_error: AtomicU64,
    pub custom: AtomicU64,
}

#[derive(Debug, Default)]
pub struct TotalMetrics {
    pub time_nanos: AtomicU64,
    pub count: AtomicU64,
}

#[derive(Debug, Default)]
pub struct ErrorMetrics {
    pub incomplete: AtomicU64,
    pub malformed: AtomicU64,
    pub too_large: AtomicU64,
}

/// Counters for parsing operations.
///
/// All updates use `Ordering::Relaxed`; `snapshot()` is not atomic across
/// fields, so totals may be slightly out of step with each other.
#[derive(Debug, Default)]
pub struct ParsingMetrics {
    pub formats: CacheAligned<FormatMetrics>,
    pub totals: CacheAligned<TotalMetrics>,
    pub errors: CacheAligned<ErrorMetrics>,
}

impl ParsingMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a successful parse. `None` stands for a custom format.
    #[inline]
    pub fn record_parse(&self, kind: Option<FormatKind>, time_nanos: u64) {
        self.totals.0.count.fetch_add(1, Ordering::Relaxed);
        self.totals.0.time_nanos.fetch_add(time_nanos, Ordering::Relaxed);

        let counter = match kind {
            Some(FormatKind::Rfc5424) => &self.formats.0.rfc5424,
            Some(FormatKind::NginxAccess) => &self.formats.0.nginx_access,
            Some(FormatKind::NginxError) => &self.formats.0.nginx_error,
            None => &self.formats.0.custom,
        };
        counter.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub fn record_error(&self, error_type: MetricErrorType) {
        let counter = match error_type {
            MetricErrorType::Incomplete => &self.errors.0.incomplete,
            MetricErrorType::Malformed => &self.errors.0.malformed,
            MetricErrorType::TooLarge => &self.errors.0.too_large,
        };
        counter.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            total_lines_parsed: self.totals.0.count.load(Ordering::Relaxed),
            total_parse_time_nanos: self.totals.0.time_nanos.load(Ordering::Relaxed),
            rfc5424_count: self.formats.0.rfc5424.load(Ordering::Relaxed),
            nginx_access_count: self.formats.0.nginx_access.load(Ordering::Relaxed),
            nginx_error_count: self.formats.0.nginx_error.load(Ordering::Relaxed),
            custom_count: self.formats.0.custom.load(Ordering::Relaxed),
            incomplete_errors: self.errors.0.incomplete.load(Ordering::Relaxed),
            malformed_errors: self.errors.0.malformed.load(Ordering::Relaxed),
            too_large_errors: self.errors.0.too_large.load(Ordering::Relaxed),
        }
    }
}

/// Point-in-time copy of [`ParsingMetrics`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MetricsSnapshot {
    pub total_lines_parsed: u64,
    pub total_parse_time_nanos: u64,
    pub rfc5424_count: u64,
    pub nginx_access_count: u64,
    pub nginx_error_count: u64,
    pub custom_count: u64,
    pub incomplete_errors: u64,
    pub malformed_errors: u64,
    pub too_large_errors: u64,
}

impl MetricsSnapshot {
    pub fn total_errors(&self) -> u64 {
        self.incomplete_errors + self.malformed_errors + self.too_large_errors
    }

    pub fn avg_parse_time_nanos(&self) -> u64 {
        if self.total_lines_parsed == 0 {
            0
        } else {
            self.total_parse_time_nanos / self.total_lines_parsed
        }
    }
}
