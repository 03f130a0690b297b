//! Encode: renders a [`Message`] back into RFC 5424 text.
//!
//! Absent fields become `-`, structured data is written sorted by SD-ID and
//! then by param name so the output is deterministic. Parsing the result with
//! [`RFC5424`](crate::parser::RFC5424) gives back an equal message.

use std::fmt::{self, Write};

use chrono::SecondsFormat;

use crate::parser::Message;

const NIL: &str = "-";

impl Message {
    /// The RFC 5424 line for this message.
    pub fn to_rfc5424(&self) -> String {
        self.to_string()
    }

    /// Writes the RFC 5424 line for this message into `w`.
    pub fn write_rfc5424<W: Write>(&self, w: &mut W) -> fmt::Result {
        write!(w, "<{}>", self.priority.0)?;
        if let Some(version) = self.version {
            write!(w, "{}", version)?;
        }
        w.write_char(' ')?;

        match &self.timestamp {
            Some(ts) => w.write_str(&ts.to_rfc3339_opts(SecondsFormat::AutoSi, false))?,
            None => w.write_str(NIL)?,
        }

        for field in [&self.hostname, &self.appname, &self.process_id, &self.message_id] {
            w.write_char(' ')?;
            w.write_str(nil_if_empty(field))?;
        }

        w.write_char(' ')?;
        write_data(w, self)?;

        if !self.message.is_empty() {
            w.write_char(' ')?;
            w.write_str(&self.message)?;
        }
        Ok(())
    }
}

impl fmt::Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write_rfc5424(f)
    }
}

fn nil_if_empty(value: &str) -> &str {
    if value.is_empty() {
        NIL
    } else {
        value
    }
}

fn write_data<W: Write>(w: &mut W, msg: &Message) -> fmt::Result {
    if msg.data.is_empty() {
        return w.write_str(NIL);
    }

    let mut ids: Vec<_> = msg.data.iter().collect();
    ids.sort_unstable_by(|a, b| a.0.cmp(b.0));

    for (id, params) in ids {
        write!(w, "[{}", id)?;

        let mut params: Vec<_> = params.iter().collect();
        params.sort_unstable_by(|a, b| a.0.cmp(b.0));
        for (name, value) in params {
            write!(w, " {}=\"", name)?;
            write_escaped(w, value)?;
            w.write_char('"')?;
        }
        w.write_char(']')?;
    }
    Ok(())
}

fn write_escaped<W: Write>(w: &mut W, value: &str) -> fmt::Result {
    for c in value.chars() {
        if matches!(c, '"' | '\\' | ']') {
            w.write_char('\\')?;
        }
        w.write_char(c)?;
    }
    Ok(())
}
