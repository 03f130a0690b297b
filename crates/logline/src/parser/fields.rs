//! Field parsers: the building blocks of a [`Format`](super::formats::Format).
//!
//! Every parser either consumes the bytes of exactly one field and writes it
//! into the message, or fails without touching the message.

use std::collections::HashMap;

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveTime};

use super::cursor::{Cursor, Short};
use super::model::{FormatError, Message, StepError};
use super::priority::Priority;
use super::traits::{FieldParser, Step};

pub const MAX_PRIORITY_LENGTH: usize = 3;
pub const MAX_VERSION_LENGTH: usize = 2;
pub const MAX_HOSTNAME_LENGTH: usize = 255;
pub const MAX_APPNAME_LENGTH: usize = 48;
pub const MAX_PROCESS_ID_LENGTH: usize = 128;
pub const MAX_MESSAGE_ID_LENGTH: usize = 32;
pub const MAX_DATA_ID_LENGTH: usize = 32;
pub const MAX_DATA_PARAM_LENGTH: usize = 32;

pub(crate) const SPACE: u8 = b' ';
pub(crate) const NIL_VALUE: u8 = b'-';
const EQUAL: u8 = b'=';
pub(crate) const QUOTE: u8 = b'"';
pub(crate) const BACKSLASH: u8 = b'\\';
const PRIORITY_START: u8 = b'<';
const PRIORITY_END: u8 = b'>';
const DATA_START: u8 = b'[';
const DATA_END: u8 = b']';

const BOM: &[u8] = &[0xEF, 0xBB, 0xBF];

const MONTHS: [&[u8; 3]; 12] = [
    b"Jan", b"Feb", b"Mar", b"Apr", b"May", b"Jun",
    b"Jul", b"Aug", b"Sep", b"Oct", b"Nov", b"Dec",
];

/// Timestamp layouts accepted by [`parse_timestamp`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimestampFormat {
    /// `2006-01-02T15:04:05Z07:00`, whole seconds
    Rfc3339,
    /// `2006-01-02T15:04:05.999999999Z07:00`, optional fraction
    Rfc3339Nano,
    /// `Jan _2 15:04:05`, no year and no zone (BSD syslog, Nginx)
    Bsd,
}

impl TimestampFormat {
    /// Maximum number of bytes a timestamp in this layout occupies.
    pub fn width(self) -> usize {
        match self {
            TimestampFormat::Rfc3339 => 25,
            TimestampFormat::Rfc3339Nano => 35,
            TimestampFormat::Bsd => 15,
        }
    }

    /// Tries this layout against the lookahead at the cursor.
    ///
    /// Returns the timestamp and the number of bytes it spans; the cursor is not moved.
    fn parse_at(self, cursor: &Cursor<'_>) -> Option<(DateTime<FixedOffset>, usize)> {
        match self {
            TimestampFormat::Rfc3339 | TimestampFormat::Rfc3339Nano => {
                let window = cursor.peek(self.width()).unwrap_or_else(|Short(rest)| rest);
                let len = window.iter().position(|&c| c == SPACE).unwrap_or(window.len());
                let text = std::str::from_utf8(&window[..len]).ok()?;
                if self == TimestampFormat::Rfc3339 && text.contains('.') {
                    return None;
                }
                let timestamp = DateTime::parse_from_rfc3339(text).ok()?;
                Some((timestamp, len))
            }
            TimestampFormat::Bsd => {
                let window = cursor.peek(self.width()).ok()?;
                parse_bsd_timestamp(window).map(|timestamp| (timestamp, window.len()))
            }
        }
    }
}

/// Parses `Mmm _d hh:mm:ss` into year 0, UTC. Year 0 is a leap year, so Feb 29 survives
/// until the year is fixed up.
fn parse_bsd_timestamp(bytes: &[u8]) -> Option<DateTime<FixedOffset>> {
    if bytes.len() != 15 || bytes[3] != SPACE || bytes[6] != SPACE {
        return None;
    }

    let month = MONTHS.iter().position(|m| m[..] == bytes[..3])? + 1;
    let day = parse_number(bytes[4..6].trim_ascii_start())?;
    let time = NaiveTime::parse_from_str(std::str::from_utf8(&bytes[7..]).ok()?, "%H:%M:%S").ok()?;
    let date = NaiveDate::from_ymd_opt(0, month as u32, u32::from(day))?;

    Some(date.and_time(time).and_utc().fixed_offset())
}

/// Parses a short run of ASCII digits. Signs and empty input are rejected.
fn parse_number(digits: &[u8]) -> Option<u16> {
    if digits.is_empty() || digits.len() > 4 {
        return None;
    }
    digits.iter().try_fold(0u16, |acc, &c| {
        c.is_ascii_digit().then(|| acc * 10 + u16::from(c - b'0'))
    })
}

#[inline]
pub(crate) fn to_string(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes).into_owned()
}

/// Everything after the cursor, without consuming it.
#[inline]
fn rest<'a>(cursor: &Cursor<'a>) -> &'a [u8] {
    cursor.peek(cursor.remaining()).unwrap_or_else(|Short(rest)| rest)
}

fn expected_byte(offset: usize, expected: &str, got: u8) -> StepError {
    FormatError::new(
        offset,
        format!("expected byte {}, but got '{}'", expected, char::from(got)),
    )
    .into()
}

/// Consumes the next byte, failing unless it equals `expected`.
pub(crate) fn check_byte(cursor: &mut Cursor<'_>, expected: u8) -> Result<(), StepError> {
    let offset = cursor.position();
    match cursor.read_byte() {
        None => Err(StepError::Eof),
        Some(c) if c == expected => Ok(()),
        Some(c) => Err(expected_byte(offset, &format!("'{}'", char::from(expected)), c)),
    }
}

/// Consumes a lone nil marker (`-` followed by a space or the end of input).
pub(crate) fn next_is_nil(cursor: &mut Cursor<'_>) -> bool {
    let lone = matches!(
        cursor.peek(2),
        Ok([NIL_VALUE, SPACE]) | Err(Short([NIL_VALUE]))
    );
    if lone {
        cursor.discard(1);
    }
    lone
}

/// Reads a space terminated value of at most `max_length` bytes.
///
/// The terminating space is left in place for the following separator step.
fn parse_single_value(
    cursor: &mut Cursor<'_>,
    name: &str,
    allow_nil: bool,
    max_length: usize,
) -> Result<String, StepError> {
    if allow_nil && next_is_nil(cursor) {
        return Ok(String::new());
    }

    let start = cursor.position();
    let value = match cursor.read_until(SPACE) {
        Ok(value) => {
            cursor.unread_byte();
            &value[..value.len() - 1]
        }
        Err(Short([])) => return Err(StepError::Eof),
        Err(Short(value)) => value,
    };

    if value.len() > max_length {
        return Err(FormatError::new(start, format!("{} too long", name)).into());
    }
    Ok(to_string(value))
}

pub fn parse_priority(cursor: &mut Cursor<'_>, msg: &mut Message) -> Result<(), StepError> {
    check_byte(cursor, PRIORITY_START)?;

    let start = cursor.position();
    let (window, complete) = match cursor.peek(MAX_PRIORITY_LENGTH + 1) {
        Ok(window) => (window, true),
        Err(Short(window)) => (window, false),
    };

    let Some(end) = window.iter().position(|&c| c == PRIORITY_END) else {
        // no '>' in reach: either a stray byte where it should be, or too many digits
        let err = match window.iter().position(|c| !c.is_ascii_digit()) {
            Some(idx) => FormatError::new(start + idx, "priority not closed"),
            None if complete => FormatError::new(start + MAX_PRIORITY_LENGTH, "priority too long"),
            None => FormatError::new(start + window.len(), "priority not closed"),
        };
        return Err(err.into());
    };

    let digits = &window[..end];
    if digits.is_empty() {
        return Err(FormatError::new(start, "priority can't be empty").into());
    }
    let priority = parse_number(digits).ok_or_else(|| {
        FormatError::new(start, format!("priority not a number: {}", to_string(digits)))
    })?;

    cursor.discard(end + 1);
    msg.priority = Priority(priority);
    Ok(())
}

/// Version is 0 to 2 digits; when absent the message keeps `None`.
pub fn parse_version(cursor: &mut Cursor<'_>, msg: &mut Message) -> Result<(), StepError> {
    let start = cursor.position();
    let window = cursor.peek(MAX_VERSION_LENGTH).unwrap_or_else(|Short(rest)| rest);
    let len = window.iter().position(|&c| c == SPACE).unwrap_or(window.len());
    if len == 0 {
        return Ok(());
    }

    let digits = &window[..len];
    let version = parse_number(digits).ok_or_else(|| {
        FormatError::new(start, format!("version not a number: {}", to_string(digits)))
    })?;

    cursor.discard(len);
    // At most two digits, always fits.
    msg.version = Some(version as u8);
    Ok(())
}

/// Builds a timestamp parser trying `formats` in order.
///
/// # Panics
///
/// Panics when `formats` is empty.
pub fn parse_timestamp(formats: &[TimestampFormat]) -> impl FieldParser {
    assert!(!formats.is_empty(), "no formats supplied to parse_timestamp");
    let formats = formats.to_vec();

    move |cursor: &mut Cursor<'_>, msg: &mut Message| -> Result<(), StepError> {
        if next_is_nil(cursor) {
            return Ok(());
        }

        let start = cursor.position();
        for format in &formats {
            if let Some((timestamp, len)) = format.parse_at(cursor) {
                cursor.discard(len);
                msg.timestamp = Some(timestamp);
                return Ok(());
            }
        }

        if cursor.is_at_end() {
            return Err(StepError::Eof);
        }
        Err(FormatError::new(start, "timestamp is not following an accepted format").into())
    }
}

pub fn parse_hostname(cursor: &mut Cursor<'_>, msg: &mut Message) -> Result<(), StepError> {
    msg.hostname = parse_single_value(cursor, "hostname", true, MAX_HOSTNAME_LENGTH)?;
    Ok(())
}

pub fn parse_appname(cursor: &mut Cursor<'_>, msg: &mut Message) -> Result<(), StepError> {
    msg.appname = parse_single_value(cursor, "appname", true, MAX_APPNAME_LENGTH)?;
    Ok(())
}

pub fn parse_process_id(cursor: &mut Cursor<'_>, msg: &mut Message) -> Result<(), StepError> {
    msg.process_id = parse_single_value(cursor, "processID", true, MAX_PROCESS_ID_LENGTH)?;
    Ok(())
}

pub fn parse_message_id(cursor: &mut Cursor<'_>, msg: &mut Message) -> Result<(), StepError> {
    msg.message_id = parse_single_value(cursor, "messageID", true, MAX_MESSAGE_ID_LENGTH)?;
    Ok(())
}

/// Parses `-` or one or more `[id name="value" ...]` groups.
pub fn parse_data(cursor: &mut Cursor<'_>, msg: &mut Message) -> Result<(), StepError> {
    if next_is_nil(cursor) {
        return Ok(());
    }
    check_byte(cursor, DATA_START)?;

    let mut data = HashMap::new();
    loop {
        let id = parse_data_id(cursor)?;

        let mut params = HashMap::new();
        loop {
            let offset = cursor.position();
            match cursor.read_byte() {
                None => return Err(StepError::Eof),
                Some(DATA_END) => break,
                Some(SPACE) => {
                    let name = parse_param_name(cursor)?;
                    let value = parse_param_value(cursor)?;
                    if value.as_bytes() != [NIL_VALUE] {
                        params.insert(name, value);
                    }
                }
                Some(c) => return Err(expected_byte(offset, "']' or ' '", c)),
            }
        }
        data.insert(id, params);

        let offset = cursor.position();
        match cursor.read_byte() {
            None => break,
            Some(SPACE) => {
                cursor.unread_byte();
                break;
            }
            Some(DATA_START) => {}
            Some(c) => return Err(expected_byte(offset, "' ' or '['", c)),
        }
    }

    msg.data = data;
    Ok(())
}

fn parse_data_id(cursor: &mut Cursor<'_>) -> Result<String, StepError> {
    let start = cursor.position();
    let rest = rest(cursor);
    let Some(len) = rest.iter().position(|&c| c == SPACE || c == DATA_END) else {
        cursor.discard(rest.len());
        return Err(StepError::Eof);
    };

    let id = &rest[..len];
    if id.is_empty() {
        return Err(FormatError::new(start, "data ID can't be empty").into());
    } else if id.len() > MAX_DATA_ID_LENGTH {
        return Err(FormatError::new(start, "data ID too long").into());
    }

    cursor.discard(len);
    Ok(to_string(id))
}

fn parse_param_name(cursor: &mut Cursor<'_>) -> Result<String, StepError> {
    let start = cursor.position();
    let rest = rest(cursor);
    let Some(len) = rest
        .iter()
        .position(|&c| matches!(c, EQUAL | SPACE | DATA_END | QUOTE))
    else {
        cursor.discard(rest.len());
        return Err(StepError::Eof);
    };

    if rest[len] != EQUAL {
        return Err(expected_byte(start + len, "'='", rest[len]));
    }

    let name = &rest[..len];
    if name.is_empty() {
        return Err(FormatError::new(start, "data param name can't be empty").into());
    } else if name.len() > MAX_DATA_PARAM_LENGTH {
        return Err(FormatError::new(start, "data param name too long").into());
    }

    cursor.discard(len + 1);
    Ok(to_string(name))
}

/// Reads a quoted param value. `\"`, `\\` and `\]` are unescaped, any other
/// backslash is kept as is.
fn parse_param_value(cursor: &mut Cursor<'_>) -> Result<String, StepError> {
    check_byte(cursor, QUOTE)?;

    let rest = rest(cursor);
    let mut value = Vec::new();
    let mut escaped = false;
    for (i, &c) in rest.iter().enumerate() {
        if escaped {
            if !matches!(c, QUOTE | BACKSLASH | DATA_END) {
                value.push(BACKSLASH);
            }
            value.push(c);
            escaped = false;
        } else if c == BACKSLASH {
            escaped = true;
        } else if c == QUOTE {
            cursor.discard(i + 1);
            return Ok(to_string(&value));
        } else {
            value.push(c);
        }
    }

    cursor.discard(rest.len());
    Err(StepError::Eof)
}

/// Reads the rest of the line, trimming whitespace and a leading BOM.
pub fn parse_msg(cursor: &mut Cursor<'_>, msg: &mut Message) -> Result<(), StepError> {
    let bytes = cursor.read_remaining().trim_ascii();
    let bytes = bytes.strip_prefix(BOM).unwrap_or(bytes).trim_ascii();
    msg.message = to_string(bytes);
    Ok(())
}

/// Discards exactly `n` bytes.
pub fn discard(n: usize) -> impl FieldParser {
    move |cursor: &mut Cursor<'_>, _msg: &mut Message| -> Result<(), StepError> {
        if cursor.discard(n) < n {
            return Err(StepError::Eof);
        }
        Ok(())
    }
}

/// Discards the next byte if it is `c`, fails otherwise.
pub fn discard_byte(c: u8) -> impl FieldParser {
    move |cursor: &mut Cursor<'_>, _msg: &mut Message| -> Result<(), StepError> {
        check_byte(cursor, c)
    }
}

/// Discards everything up to and including the first `c`.
pub fn discard_until(c: u8) -> impl FieldParser {
    move |cursor: &mut Cursor<'_>, _msg: &mut Message| -> Result<(), StepError> {
        cursor.read_until(c).map(|_| ()).map_err(|_| StepError::Eof)
    }
}

pub fn discard_space(cursor: &mut Cursor<'_>, _msg: &mut Message) -> Result<(), StepError> {
    check_byte(cursor, SPACE)
}

/// Runs `steps` only if at least `lookahead` bytes are left.
///
/// The check happens once, up front: once the block is entered every step is
/// required, so a present but malformed section still fails the parse.
pub fn optional(lookahead: usize, steps: Vec<Step>) -> impl FieldParser {
    move |cursor: &mut Cursor<'_>, msg: &mut Message| -> Result<(), StepError> {
        if cursor.peek(lookahead).is_err() {
            return Ok(());
        }
        steps.iter().try_for_each(|step| step.parse(cursor, msg))
    }
}

/// Requires the priority to be set.
pub fn calculate_facility(_cursor: &mut Cursor<'_>, msg: &mut Message) -> Result<(), StepError> {
    msg.facility = msg.priority.facility();
    Ok(())
}

/// Requires the priority to be set.
pub fn calculate_severity(_cursor: &mut Cursor<'_>, msg: &mut Message) -> Result<(), StepError> {
    msg.severity = msg.priority.severity();
    Ok(())
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::parser::priority::{Facility, Severity};
    use crate::steps;

    /// Runs `parser` over `input` and returns the result, the message and the leftover bytes.
    pub(crate) fn run(
        parser: &dyn FieldParser,
        input: &[u8],
    ) -> (Result<(), StepError>, Message, Vec<u8>) {
        let mut cursor = Cursor::new(input);
        let mut msg = Message::default();
        let result = parser.parse(&mut cursor, &mut msg);
        let leftover = cursor.read_remaining().to_vec();
        (result, msg, leftover)
    }

    pub(crate) fn format_error(offset: usize, reason: &str) -> Result<(), StepError> {
        Err(StepError::Format(FormatError::new(offset, reason)))
    }

    fn generate_string(prefix: &str, length: usize) -> String {
        let mut s = prefix.to_string();
        while s.len() < length {
            s.push_str("abcdefghijklmnopqrstuvwxyz");
        }
        s.truncate(length);
        s
    }

    #[test]
    fn test_generate_string() {
        assert_eq!(generate_string("", 1), "a");
        assert_eq!(generate_string("", 26), "abcdefghijklmnopqrstuvwxyz");
        assert_eq!(generate_string("myPrefix", 10), "myPrefixab");
        assert_eq!(generate_string("myPrefix", 1), "m");
    }

    #[test]
    fn test_parse_priority() {
        for (input, expected) in [("<0>", 0), ("<1>", 1), ("<100>", 100), ("<191>", 191), ("<999>", 999)] {
            let (result, msg, leftover) = run(&parse_priority, input.as_bytes());
            assert_eq!(result, Ok(()), "input {input:?}");
            assert_eq!(msg.priority, Priority(expected));
            assert!(leftover.is_empty());
        }

        let (_, _, leftover) = run(&parse_priority, b"<34>1 ");
        assert_eq!(leftover, b"1 ");
    }

    #[test]
    fn test_parse_priority_errors() {
        let cases: [(&str, Result<(), StepError>); 12] = [
            ("", Err(StepError::Eof)),
            ("!", format_error(0, "expected byte '<', but got '!'")),
            ("<", format_error(1, "priority not closed")),
            ("<19", format_error(3, "priority not closed")),
            ("<12 x", format_error(3, "priority not closed")),
            ("<12 - - -", format_error(3, "priority not closed")),
            ("<x", format_error(1, "priority not closed")),
            ("<1 2>", format_error(1, "priority not a number: 1 2")),
            ("<1923", format_error(4, "priority too long")),
            ("<1923>", format_error(4, "priority too long")),
            ("<>", format_error(1, "priority can't be empty")),
            ("<abc>", format_error(1, "priority not a number: abc")),
        ];

        for (input, expected) in cases {
            let (result, msg, _) = run(&parse_priority, input.as_bytes());
            assert_eq!(result, expected, "input {input:?}");
            assert_eq!(msg, Message::default());
        }

        let (result, _, _) = run(&parse_priority, b"<+1>");
        assert_eq!(result, format_error(1, "priority not a number: +1"));
    }

    #[test]
    fn test_parse_version() {
        for (input, expected, leftover) in [
            ("", None, ""),
            (" 2015", None, " 2015"),
            ("0", Some(0), ""),
            ("1", Some(1), ""),
            ("1 -", Some(1), " -"),
            ("10", Some(10), ""),
            ("99", Some(99), ""),
        ] {
            let (result, msg, rest) = run(&parse_version, input.as_bytes());
            assert_eq!(result, Ok(()), "input {input:?}");
            assert_eq!(msg.version, expected, "input {input:?}");
            assert_eq!(rest, leftover.as_bytes());
        }

        let (result, _, _) = run(&parse_version, b"a");
        assert_eq!(result, format_error(0, "version not a number: a"));
        let (result, _, _) = run(&parse_version, b"ab");
        assert_eq!(result, format_error(0, "version not a number: ab"));
    }

    #[test]
    fn test_parse_timestamp() {
        let parser = parse_timestamp(&[TimestampFormat::Rfc3339, TimestampFormat::Rfc3339Nano]);

        let (result, msg, leftover) = run(&parser, b"-");
        assert_eq!(result, Ok(()));
        assert_eq!(msg.timestamp, None);
        assert!(leftover.is_empty());

        let cases = [
            ("2015-10-18T17:05:55+00:00", "2015-10-18T17:05:55+00:00"),
            ("2015-10-18T17:05:55+02:00", "2015-10-18T17:05:55+02:00"),
            ("2015-10-18T17:05:55.956934919+02:00", "2015-10-18T17:05:55.956934919+02:00"),
            ("2003-10-11T22:14:15.003Z", "2003-10-11T22:14:15.003+00:00"),
            ("2000-01-01T01:01:01Z", "2000-01-01T01:01:01+00:00"),
        ];
        for (input, expected) in cases {
            let (result, msg, leftover) = run(&parser, input.as_bytes());
            assert_eq!(result, Ok(()), "input {input:?}");
            let expected = DateTime::parse_from_rfc3339(expected).unwrap();
            assert_eq!(msg.timestamp, Some(expected));
            assert_eq!(msg.timestamp.unwrap().offset(), expected.offset());
            assert!(leftover.is_empty());
        }

        let (_, msg, leftover) = run(&parser, b"2015-10-18T17:05:55+02:00 host");
        assert!(msg.timestamp.is_some());
        assert_eq!(leftover, b" host");
    }

    #[test]
    fn test_parse_timestamp_errors() {
        let parser = parse_timestamp(&[TimestampFormat::Rfc3339, TimestampFormat::Rfc3339Nano]);

        for input in ["a", "abc", "2015-13-18T17:05:55+00:00", "-foo"] {
            let (result, msg, leftover) = run(&parser, input.as_bytes());
            assert_eq!(
                result,
                format_error(0, "timestamp is not following an accepted format"),
                "input {input:?}"
            );
            assert_eq!(msg.timestamp, None);
            assert_eq!(leftover, input.as_bytes());
        }

        let (result, _, _) = run(&parser, b"");
        assert_eq!(result, Err(StepError::Eof));
    }

    #[test]
    fn test_parse_timestamp_fallback_order() {
        let seconds_only = parse_timestamp(&[TimestampFormat::Rfc3339]);
        let (result, _, _) = run(&seconds_only, b"2015-10-18T17:05:55.5+02:00");
        assert!(matches!(result, Err(StepError::Format(_))));

        let with_nano = parse_timestamp(&[TimestampFormat::Rfc3339, TimestampFormat::Rfc3339Nano]);
        let (result, msg, _) = run(&with_nano, b"2015-10-18T17:05:55.5+02:00");
        assert_eq!(result, Ok(()));
        assert_eq!(msg.timestamp.unwrap().timestamp_subsec_millis(), 500);
    }

    #[test]
    fn test_parse_bsd_timestamp() {
        let parser = parse_timestamp(&[TimestampFormat::Bsd]);

        let (result, msg, leftover) = run(&parser, b"Oct  5 12:05:15 hostname");
        assert_eq!(result, Ok(()));
        assert_eq!(leftover, b" hostname");
        let expected = NaiveDate::from_ymd_opt(0, 10, 5)
            .unwrap()
            .and_hms_opt(12, 5, 15)
            .unwrap()
            .and_utc()
            .fixed_offset();
        assert_eq!(msg.timestamp, Some(expected));

        let (result, msg, _) = run(&parser, b"Feb 29 00:00:00");
        assert_eq!(result, Ok(()));
        assert!(msg.timestamp.is_some());

        for input in ["Foo 13 10:06:04", "Oct 13 25:06:04", "Oct 13"] {
            let (result, _, _) = run(&parser, input.as_bytes());
            assert!(matches!(result, Err(StepError::Format(_))), "input {input:?}");
        }
    }

    #[test]
    #[should_panic(expected = "no formats supplied to parse_timestamp")]
    fn test_parse_timestamp_no_formats() {
        let _ = parse_timestamp(&[]);
    }

    #[test]
    fn test_parse_hostname() {
        for (input, expected, leftover) in [
            ("-", "", ""),
            ("- ", "", " "),
            ("h", "h", ""),
            ("host", "host", ""),
            ("hostname ", "hostname", " "),
            ("-host ", "-host", " "),
        ] {
            let (result, msg, rest) = run(&parse_hostname, input.as_bytes());
            assert_eq!(result, Ok(()), "input {input:?}");
            assert_eq!(msg.hostname, expected);
            assert_eq!(rest, leftover.as_bytes());
        }

        let (result, _, _) = run(&parse_hostname, b"");
        assert_eq!(result, Err(StepError::Eof));
    }

    #[test]
    fn test_parse_hostname_length_boundary() {
        let exact = generate_string("hostname", MAX_HOSTNAME_LENGTH);
        let (result, msg, _) = run(&parse_hostname, format!("{exact} appname").as_bytes());
        assert_eq!(result, Ok(()));
        assert_eq!(msg.hostname, exact);

        let long = generate_string("hostname", MAX_HOSTNAME_LENGTH + 1);
        let (result, _, _) = run(&parse_hostname, long.as_bytes());
        assert_eq!(result, format_error(0, "hostname too long"));
        let (result, _, _) = run(&parse_hostname, format!("{long} appname").as_bytes());
        assert_eq!(result, format_error(0, "hostname too long"));
    }

    #[test]
    fn test_parse_bounded_fields() {
        let cases: [(&dyn FieldParser, &str, usize); 3] = [
            (&parse_appname, "appname", MAX_APPNAME_LENGTH),
            (&parse_process_id, "processID", MAX_PROCESS_ID_LENGTH),
            (&parse_message_id, "messageID", MAX_MESSAGE_ID_LENGTH),
        ];

        for (parser, name, max) in cases {
            let (result, _, _) = run(parser, b"");
            assert_eq!(result, Err(StepError::Eof));

            let (result, msg, leftover) = run(parser, b"-");
            assert_eq!(result, Ok(()));
            assert_eq!(msg, Message::default());
            assert!(leftover.is_empty());

            let exact = generate_string(name, max);
            let (result, _, _) = run(parser, exact.as_bytes());
            assert_eq!(result, Ok(()), "{name} of {max} bytes");

            let long = generate_string(name, max + 1);
            let (result, _, _) = run(parser, long.as_bytes());
            assert_eq!(result, format_error(0, &format!("{name} too long")));
        }

        let (_, msg, leftover) = run(&parse_appname, b"appname ");
        assert_eq!(msg.appname, "appname");
        assert_eq!(leftover, b" ");
        let (_, msg, _) = run(&parse_process_id, b"procId");
        assert_eq!(msg.process_id, "procId");
        let (_, msg, _) = run(&parse_message_id, b"msgID");
        assert_eq!(msg.message_id, "msgID");
    }

    #[test]
    fn test_parse_data() {
        let (result, msg, _) = run(&parse_data, b"-");
        assert_eq!(result, Ok(()));
        assert!(msg.data.is_empty());

        let (result, msg, _) = run(&parse_data, b"[dataID]");
        assert_eq!(result, Ok(()));
        assert_eq!(msg.data.len(), 1);
        assert!(msg.data["dataID"].is_empty());

        let (result, msg, _) = run(&parse_data, br#"[dataID dataName="dataValue"]"#);
        assert_eq!(result, Ok(()));
        assert_eq!(msg.param("dataID", "dataName"), Some("dataValue"));

        let (result, msg, leftover) =
            run(&parse_data, br#"[dataID dataName="dataValue" dataName2="dataValue2"] msg"#);
        assert_eq!(result, Ok(()));
        assert_eq!(msg.data["dataID"].len(), 2);
        assert_eq!(msg.param("dataID", "dataName2"), Some("dataValue2"));
        assert_eq!(leftover, b" msg");
    }

    #[test]
    fn test_parse_data_multiple_groups() {
        let (result, msg, leftover) =
            run(&parse_data, br#"[a x="1"][b y="2" z="-"][a w="3"]"#);
        assert_eq!(result, Ok(()));
        assert!(leftover.is_empty());
        assert_eq!(msg.data.len(), 2);
        // the second `a` group replaces the first
        assert_eq!(msg.param("a", "x"), None);
        assert_eq!(msg.param("a", "w"), Some("3"));
        assert_eq!(msg.param("b", "y"), Some("2"));
        assert_eq!(msg.param("b", "z"), None);
    }

    #[test]
    fn test_parse_data_duplicate_param() {
        let (result, msg, _) = run(&parse_data, br#"[a x="1" x="2"]"#);
        assert_eq!(result, Ok(()));
        assert_eq!(msg.param("a", "x"), Some("2"));
    }

    #[test]
    fn test_parse_data_escapes() {
        let (result, msg, _) = run(&parse_data, br#"[a q="say \"hi\"" b="x\]y" c="back\\slash" d="C:\dir"]"#);
        assert_eq!(result, Ok(()));
        assert_eq!(msg.param("a", "q"), Some(r#"say "hi""#));
        assert_eq!(msg.param("a", "b"), Some("x]y"));
        assert_eq!(msg.param("a", "c"), Some(r"back\slash"));
        assert_eq!(msg.param("a", "d"), Some(r"C:\dir"));
    }

    #[test]
    fn test_parse_data_errors() {
        let cases: [(&[u8], Result<(), StepError>); 10] = [
            (b"", Err(StepError::Eof)),
            (b"[dataID", Err(StepError::Eof)),
            (br#"[dataID name="value"#, Err(StepError::Eof)),
            (br#"[dataID name="value""#, Err(StepError::Eof)),
            (b"x", format_error(0, "expected byte '[', but got 'x'")),
            (b"[]", format_error(1, "data ID can't be empty")),
            (br#"[id name="v"x"#, format_error(12, "expected byte ']' or ' ', but got 'x'")),
            (br#"[id name="v"]x"#, format_error(13, "expected byte ' ' or '[', but got 'x'")),
            (br#"[id name "v"]"#, format_error(8, "expected byte '=', but got ' '")),
            (br#"[id name=v]"#, format_error(9, "expected byte '\"', but got 'v'")),
        ];

        for (input, expected) in cases {
            let (result, msg, _) = run(&parse_data, input);
            assert_eq!(result, expected, "input {:?}", String::from_utf8_lossy(input));
            assert!(msg.data.is_empty());
        }

        let long_id = format!("[{}]", generate_string("id", MAX_DATA_ID_LENGTH + 1));
        let (result, _, _) = run(&parse_data, long_id.as_bytes());
        assert_eq!(result, format_error(1, "data ID too long"));

        let long_name = format!(r#"[id {}="v"]"#, generate_string("name", MAX_DATA_PARAM_LENGTH + 1));
        let (result, _, _) = run(&parse_data, long_name.as_bytes());
        assert_eq!(result, format_error(4, "data param name too long"));

        let (result, _, _) = run(&parse_data, br#"[id ="v"]"#);
        assert_eq!(result, format_error(4, "data param name can't be empty"));
    }

    #[test]
    fn test_parse_msg() {
        let bom = "\u{feff}";
        for (input, expected) in [
            (String::new(), ""),
            ("m".to_string(), "m"),
            ("msg".to_string(), "msg"),
            (" message ".to_string(), "message"),
            (format!("{bom} message "), "message"),
            (" \t\t message \t\t ".to_string(), "message"),
            (format!(" \t\t {bom}message \t\t "), "message"),
        ] {
            let (result, msg, leftover) = run(&parse_msg, input.as_bytes());
            assert_eq!(result, Ok(()));
            assert_eq!(msg.message, expected, "input {input:?}");
            assert!(leftover.is_empty());
        }
    }

    #[test]
    fn test_discard() {
        let parser = discard(5);
        for (input, expected, leftover) in [
            ("", Err(StepError::Eof), ""),
            ("1234", Err(StepError::Eof), ""),
            ("12345", Ok(()), ""),
            ("123456", Ok(()), "6"),
        ] {
            let (result, _, rest) = run(&parser, input.as_bytes());
            assert_eq!(result, expected, "input {input:?}");
            assert_eq!(rest, leftover.as_bytes());
        }
    }

    #[test]
    fn test_discard_byte() {
        let parser = discard_byte(b'a');
        for (input, expected, leftover) in [
            ("", Err(StepError::Eof), ""),
            ("a", Ok(()), ""),
            ("abc", Ok(()), "bc"),
            ("bc", format_error(0, "expected byte 'a', but got 'b'"), "c"),
            ("cba", format_error(0, "expected byte 'a', but got 'c'"), "ba"),
        ] {
            let (result, _, rest) = run(&parser, input.as_bytes());
            assert_eq!(result, expected, "input {input:?}");
            assert_eq!(rest, leftover.as_bytes());
        }
    }

    #[test]
    fn test_discard_until() {
        let parser = discard_until(b'a');
        for (input, expected, leftover) in [
            ("", Err(StepError::Eof), ""),
            ("bcdef", Err(StepError::Eof), ""),
            ("a", Ok(()), ""),
            ("abc", Ok(()), "bc"),
            ("cba", Ok(()), ""),
        ] {
            let (result, _, rest) = run(&parser, input.as_bytes());
            assert_eq!(result, expected, "input {input:?}");
            assert_eq!(rest, leftover.as_bytes());
        }
    }

    #[test]
    fn test_discard_space() {
        for (input, expected) in [
            ("", Err(StepError::Eof)),
            (" ", Ok(())),
            (" abc", Ok(())),
            ("bc", format_error(0, "expected byte ' ', but got 'b'")),
            ("cb ", format_error(0, "expected byte ' ', but got 'c'")),
        ] {
            let (result, _, _) = run(&discard_space, input.as_bytes());
            assert_eq!(result, expected, "input {input:?}");
        }
    }

    #[test]
    fn test_optional() {
        let parser = optional(2, steps![discard_space, parse_msg]);

        let (result, msg, _) = run(&parser, b"");
        assert_eq!(result, Ok(()));
        assert_eq!(msg.message, "");

        let (result, msg, leftover) = run(&parser, b" ");
        assert_eq!(result, Ok(()));
        assert_eq!(msg.message, "");
        assert_eq!(leftover, b" ");

        let (result, msg, _) = run(&parser, b" hello world");
        assert_eq!(result, Ok(()));
        assert_eq!(msg.message, "hello world");
    }

    #[test]
    fn test_optional_checks_only_once() {
        let parser = optional(2, steps![discard_space, parse_msg]);
        let (result, _, _) = run(&parser, b"xy");
        assert_eq!(result, format_error(0, "expected byte ' ', but got 'x'"));

        let parser = optional(1, steps![discard_space, discard(3)]);
        let (result, _, _) = run(&parser, b" a");
        assert_eq!(result, Err(StepError::Eof));
    }

    #[test]
    fn test_calculate_facility_and_severity() {
        let mut cursor = Cursor::new(b"untouched");
        let mut msg = Message {
            priority: Priority(187),
            ..Message::default()
        };

        calculate_facility(&mut cursor, &mut msg).unwrap();
        calculate_severity(&mut cursor, &mut msg).unwrap();
        assert_eq!(msg.facility, Facility::LOCAL7);
        assert_eq!(msg.severity, Severity::ERROR);
        assert_eq!(cursor.position(), 0);
    }
}
