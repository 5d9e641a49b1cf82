//! Log record model and structured (JSON) encoding.

use std::borrow::Cow;
use std::fmt;
use std::panic::Location;

use chrono::{DateTime, SecondsFormat, Utc};
use serde::ser::{SerializeMap, Serializer};
use serde_json::Value;

use super::fields::Fields;
use super::level::Level;

/// Keys written by the encoder itself. User fields with these names are
/// emitted under a `fields.` prefix.
pub(crate) const RESERVED_KEYS: &[&str] = &["level", "time", "message", "error", "caller"];

/// Source location a record was issued from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Caller {
    pub file: &'static str,
    pub line: u32,
}

impl Caller {
    pub fn new(file: &'static str, line: u32) -> Self {
        Self { file, line }
    }

    /// File name without its directory.
    pub fn short_file(&self) -> &'static str {
        self.file
            .rsplit(['/', '\\'])
            .next()
            .unwrap_or(self.file)
    }
}

impl From<&'static Location<'static>> for Caller {
    fn from(loc: &'static Location<'static>) -> Self {
        Self::new(loc.file(), loc.line())
    }
}

impl fmt::Display for Caller {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.short_file(), self.line)
    }
}

/// A single log event, borrowed from the call site for the duration of encoding.
#[derive(Debug)]
pub struct Record<'a> {
    pub level: Level,
    pub time: DateTime<Utc>,
    pub message: &'a str,
    pub base_fields: &'a [(String, Value)],
    pub fields: Fields,
    pub error: Option<String>,
    pub caller: Option<Caller>,
}

impl Record<'_> {
    /// RFC 3339 timestamp with seconds precision.
    pub fn timestamp(&self) -> String {
        self.time.to_rfc3339_opts(SecondsFormat::Secs, true)
    }

    /// User fields under their output keys, each key exactly once.
    ///
    /// Base fields come first, then call fields. When two entries end up with
    /// the same output key the later one wins: call fields over base fields,
    /// and within one source a literal `fields.<key>` over a renamed reserved
    /// key.
    pub(crate) fn output_fields(&self) -> Vec<(Cow<'_, str>, &Value)> {
        let mut out: Vec<(Cow<'_, str>, &Value)> =
            Vec::with_capacity(self.base_fields.len() + self.fields.len());
        let base: Vec<(&str, &Value)> =
            self.base_fields.iter().map(|(k, v)| (k.as_str(), v)).collect();
        let call: Vec<(&str, &Value)> = self.fields.iter().map(|(k, v)| (k.as_str(), v)).collect();
        for source in [base, call] {
            let (renamed, literal): (Vec<_>, Vec<_>) = source
                .into_iter()
                .partition(|(k, _)| RESERVED_KEYS.contains(k));
            for (raw, value) in renamed.into_iter().chain(literal) {
                let key = field_key(raw);
                match out.iter_mut().find(|(k, _)| *k == key) {
                    Some(slot) => slot.1 = value,
                    None => out.push((key, value)),
                }
            }
        }
        out
    }

    /// Encode as a single JSON line, newline included.
    pub fn to_json_line(&self) -> Vec<u8> {
        let mut buf = Vec::with_capacity(256);
        {
            let mut ser = serde_json::Serializer::new(&mut buf);
            // Writing into a Vec cannot fail and Value always serializes.
            let _ = self.write_json(&mut ser);
        }
        buf.push(b'\n');
        buf
    }

    fn write_json<W: std::io::Write>(
        &self,
        ser: &mut serde_json::Serializer<W>,
    ) -> Result<(), serde_json::Error> {
        let mut map = ser.serialize_map(None)?;
        map.serialize_entry("level", self.level.as_str())?;
        map.serialize_entry("time", &self.timestamp())?;
        for (k, v) in self.output_fields() {
            map.serialize_entry(k.as_ref(), v)?;
        }
        if let Some(err) = &self.error {
            map.serialize_entry("error", err)?;
        }
        if let Some(caller) = &self.caller {
            map.serialize_entry("caller", &caller.to_string())?;
        }
        map.serialize_entry("message", self.message)?;
        map.end()
    }
}

fn field_key(key: &str) -> Cow<'_, str> {
    if RESERVED_KEYS.contains(&key) {
        format!("fields.{}", key).into()
    } else {
        key.into()
    }
}
