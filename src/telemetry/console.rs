//! Human-readable console rendering for development mode.
//!
//! Line layout: `<time> <LVL> [<file:line> >] <message> [error=<e>] [key=value ...]`.

use std::fmt::Write as _;

use serde_json::Value;

use super::level::Level;
use super::record::Record;

const RESET: &str = "\x1b[0m";
const BOLD: &str = "\x1b[1m";
const DARK_GRAY: &str = "\x1b[90m";
const RED: &str = "\x1b[31m";
const GREEN: &str = "\x1b[32m";
const YELLOW: &str = "\x1b[33m";
const BLUE: &str = "\x1b[34m";
const MAGENTA: &str = "\x1b[35m";
const CYAN: &str = "\x1b[36m";

fn level_color(level: Level) -> &'static str {
    match level {
        Level::Trace => MAGENTA,
        Level::Debug => YELLOW,
        Level::Info => GREEN,
        Level::Warn | Level::Error | Level::Fatal | Level::Panic => RED,
    }
}

struct Painter {
    ansi: bool,
}

impl Painter {
    fn paint(&self, out: &mut String, color: &str, text: &str) {
        if self.ansi {
            let _ = write!(out, "{}{}{}", color, text, RESET);
        } else {
            out.push_str(text);
        }
    }
}

/// Render a value the way it reads best inline: bare strings, JSON otherwise.
fn render_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Render a record as one console line, newline included.
pub fn render(record: &Record<'_>, ansi: bool) -> Vec<u8> {
    let painter = Painter { ansi };
    let mut out = String::with_capacity(128);

    painter.paint(&mut out, DARK_GRAY, &record.timestamp());
    out.push(' ');

    let tag = record.level.abbrev();
    if ansi && record.level >= Level::Error {
        let _ = write!(out, "{}{}{}{}", BOLD, level_color(record.level), tag, RESET);
    } else {
        painter.paint(&mut out, level_color(record.level), tag);
    }
    out.push(' ');

    if let Some(caller) = &record.caller {
        painter.paint(&mut out, BOLD, &caller.to_string());
        out.push(' ');
        painter.paint(&mut out, CYAN, ">");
        out.push(' ');
    }

    out.push_str(record.message);

    if let Some(err) = &record.error {
        out.push(' ');
        painter.paint(&mut out, RED, "error=");
        painter.paint(&mut out, RED, err);
    }

    let mut pairs = record.output_fields();
    pairs.sort_by(|a, b| a.0.cmp(&b.0));
    for (k, v) in pairs {
        out.push(' ');
        painter.paint(&mut out, CYAN, &format!("{}=", k));
        painter.paint(&mut out, BLUE, &render_value(v));
    }

    out.push('\n');
    out.into_bytes()
}
