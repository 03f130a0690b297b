use std::collections::HashMap;

use chrono::{Datelike, Local, NaiveDate, Offset, TimeZone};

use crate::parser::cursor::{Cursor, Short};
use crate::parser::fields::*;
use crate::parser::model::{FormatError, FormatKind, Message, StepError};
use crate::steps;

use super::Format;

const COMMA: u8 = b',';
const COLON: u8 = b':';

/// Key under which `parse_nginx_data` stores its flat map.
pub const NGINX_DATA_ID: &str = "data";

/// `<PRI>Mmm _d hh:mm:ss HOSTNAME nginx: [request key="value" ...]`
pub(super) fn access() -> Format {
    Format::new(
        FormatKind::NginxAccess.as_str(),
        steps![
            parse_priority,
            calculate_facility,
            calculate_severity,
            parse_timestamp(&[TimestampFormat::Bsd]),
            nginx_fix_timestamp,
            discard_space,
            parse_hostname,
            discard_space,
            parse_appname,
            nginx_fix_appname,
            discard_space,
            parse_data,
        ],
    )
}

/// `<PRI>Mmm _d hh:mm:ss HOSTNAME nginx: yyyy/mm/dd hh:mm:ss [level] MESSAGE, key: value, ...`
pub(super) fn error() -> Format {
    Format::new(
        FormatKind::NginxError.as_str(),
        steps![
            parse_priority,
            calculate_facility,
            calculate_severity,
            parse_timestamp(&[TimestampFormat::Bsd]),
            nginx_fix_timestamp,
            discard_space,
            parse_hostname,
            discard_space,
            parse_appname,
            nginx_fix_appname,
            discard_space,
            // the timestamp again, as yyyy/mm/dd hh:mm:ss
            discard(19),
            discard_space,
            // the severity again, e.g. [error]
            discard_byte(b'['),
            discard_until(b']'),
            discard_space,
            parse_nginx_msg,
            discard_space,
            parse_nginx_data,
        ],
    )
}

/// Moves a year-less timestamp into the current year and the local timezone.
///
/// Requires the timestamp to be set; a nil timestamp is left alone. Feb 29 rolls
/// over to Mar 1 when the current year has no leap day.
pub fn nginx_fix_timestamp(cursor: &mut Cursor<'_>, msg: &mut Message) -> Result<(), StepError> {
    let Some(timestamp) = msg.timestamp else {
        return Ok(());
    };

    let now = Local::now();
    // runs right after the timestamp, so step back to its first byte
    let start = cursor.position().saturating_sub(TimestampFormat::Bsd.width());
    let invalid = || {
        StepError::from(FormatError::new(
            start,
            format!("timestamp {} doesn't exist in {}", timestamp.format("%b %e %T"), now.year()),
        ))
    };

    let parsed = timestamp.naive_local();
    let naive = match parsed.with_year(now.year()) {
        Some(naive) => naive,
        None => NaiveDate::from_ymd_opt(now.year(), 3, 1)
            .ok_or_else(invalid)?
            .and_time(parsed.time()),
    };
    let fixed = match Local.from_local_datetime(&naive).earliest() {
        Some(local) => local.fixed_offset(),
        // skipped by a DST transition, keep the current offset
        None => now
            .offset()
            .fix()
            .from_local_datetime(&naive)
            .single()
            .ok_or_else(invalid)?,
    };

    msg.timestamp = Some(fixed);
    Ok(())
}

/// Nginx separates the appname from the rest with a colon (`nginx:`), drop it.
pub fn nginx_fix_appname(_cursor: &mut Cursor<'_>, msg: &mut Message) -> Result<(), StepError> {
    if let Some(appname) = msg.appname.strip_suffix(':') {
        msg.appname.truncate(appname.len());
    }
    Ok(())
}

/// Reads the message up to the first comma.
pub fn parse_nginx_msg(cursor: &mut Cursor<'_>, msg: &mut Message) -> Result<(), StepError> {
    let bytes = cursor.read_until(COMMA).map_err(|_| StepError::Eof)?;
    msg.message = to_string(bytes[..bytes.len() - 1].trim_ascii());
    Ok(())
}

/// Parses `key: value, key: "value", ...` into `msg.data["data"]`.
///
/// Keys and values are trimmed and lose one layer of quotes. Commas and colons
/// inside quotes do not split.
pub fn parse_nginx_data(cursor: &mut Cursor<'_>, msg: &mut Message) -> Result<(), StepError> {
    if cursor.is_at_end() {
        return Err(StepError::Eof);
    }

    let mut data = HashMap::new();
    while !cursor.is_at_end() {
        let start = cursor.position();
        let segment = read_segment(cursor);

        let Some(colon) = find_unquoted(segment, COLON) else {
            return Err(FormatError::new(
                start,
                format!("data segment without key: {}", to_string(segment.trim_ascii())),
            )
            .into());
        };

        data.insert(unquote(&segment[..colon]), unquote(&segment[colon + 1..]));
    }

    msg.data = HashMap::from([(NGINX_DATA_ID.to_string(), data)]);
    Ok(())
}

/// Consumes up to and including the next unquoted comma, returning the bytes
/// before it. Without a comma the rest of the input is the segment.
fn read_segment<'a>(cursor: &mut Cursor<'a>) -> &'a [u8] {
    let rest = cursor.peek(cursor.remaining()).unwrap_or_else(|Short(rest)| rest);
    match find_unquoted(rest, COMMA) {
        Some(idx) => {
            cursor.discard(idx + 1);
            &rest[..idx]
        }
        None => {
            cursor.discard(rest.len());
            rest
        }
    }
}

/// Position of the first `needle` outside of double quotes.
fn find_unquoted(bytes: &[u8], needle: u8) -> Option<usize> {
    let mut quoted = false;
    let mut escaped = false;
    for (i, &c) in bytes.iter().enumerate() {
        if escaped {
            escaped = false;
        } else if quoted && c == BACKSLASH {
            escaped = true;
        } else if c == QUOTE {
            quoted = !quoted;
        } else if !quoted && c == needle {
            return Some(i);
        }
    }
    None
}

fn unquote(bytes: &[u8]) -> String {
    let bytes = bytes.trim_ascii();
    match bytes {
        [QUOTE, inner @ .., QUOTE] => {
            let mut value = Vec::with_capacity(inner.len());
            let mut escaped = false;
            for &c in inner {
                if escaped {
                    if !matches!(c, QUOTE | BACKSLASH) {
                        value.push(BACKSLASH);
                    }
                    value.push(c);
                    escaped = false;
                } else if c == BACKSLASH {
                    escaped = true;
                } else {
                    value.push(c);
                }
            }
            to_string(&value)
        }
        _ => to_string(bytes),
    }
}
