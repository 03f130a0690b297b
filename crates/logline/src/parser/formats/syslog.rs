use crate::parser::fields::*;
use crate::parser::model::FormatKind;
use crate::steps;

use super::Format;

/// `<PRI>VERSION TIMESTAMP HOSTNAME APP-NAME PROCID MSGID STRUCTURED-DATA [MSG]`
pub(super) fn rfc5424() -> Format {
    Format::new(
        FormatKind::Rfc5424.as_str(),
        steps![
            parse_priority,
            calculate_facility,
            calculate_severity,
            parse_version,
            discard_space,
            parse_timestamp(&[TimestampFormat::Rfc3339, TimestampFormat::Rfc3339Nano]),
            discard_space,
            parse_hostname,
            discard_space,
            parse_appname,
            discard_space,
            parse_process_id,
            discard_space,
            parse_message_id,
            discard_space,
            parse_data,
            optional(2, steps![discard_space, parse_msg]),
        ],
    )
}
