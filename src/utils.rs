use chrono::Local;
use colored::Color;
use log::Level;

use crate::{Verbosity, caller::SourceSite, config::Tags};

/// Last line of every message block.
pub const BLOCK_END: &str = "<<<<<\n";

/// Severity of a single message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Severity {
    Error,
    Warning,
    Debug,
    Info,
}

impl Severity {
    /// Whether a message of this severity is printed at `verbosity`.
    pub fn emits_at(self, verbosity: Verbosity) -> bool {
        match self {
            Severity::Error => true,
            Severity::Warning => verbosity > Verbosity::Normal,
            Severity::Info => verbosity > Verbosity::Silent,
            Severity::Debug => verbosity > Verbosity::Warning,
        }
    }

    /// Whether the caller location is attached at `verbosity`.
    pub fn located_at(self, verbosity: Verbosity) -> bool {
        match self {
            Severity::Error => true,
            Severity::Warning | Severity::Debug => verbosity > Verbosity::Warning,
            Severity::Info => verbosity > Verbosity::Normal,
        }
    }
}

impl From<Level> for Severity {
    fn from(level: Level) -> Self {
        match level {
            Level::Error => Severity::Error,
            Level::Warn => Severity::Warning,
            Level::Info => Severity::Info,
            Level::Debug | Level::Trace => Severity::Debug,
        }
    }
}

/// Wraps `text` in `ESC[<fg>;1m ... ESC[0m`, bold foreground, when `enabled`.
///
/// The escapes are built here instead of through `colored::Colorize` because
/// `colored` consults `NO_COLOR`, `CLICOLOR` and whether stdout is a terminal, and
/// may order bold and color codes differently. Only the facility's `color` flag
/// decides here, and the bytes are exactly the ones above. `colored` still provides
/// the color model and its foreground codes.
pub(crate) fn paint(text: &str, color: Color, enabled: bool) -> String {
    if enabled {
        format!("\x1b[{};1m{text}\x1b[0m", color.to_fg_str())
    } else {
        text.into()
    }
}

/// Renders a complete message block, ready for a single write.
pub(crate) fn format_log(
    message: &str,
    severity: Severity,
    name: &str,
    location: Option<&SourceSite>,
    tags: &Tags,
    color: bool,
) -> String {
    let time = Local::now().format("%Y-%m-%d %H:%M:%S");
    let (tag_color, label) = tags.tag(severity);
    let mut block = String::with_capacity(message.len() + name.len() + 96);
    if let Some(location) = location {
        block.push_str(&paint(&location.to_string(), tags.location, color));
        block.push('\n');
    }
    if !name.is_empty() {
        block.push_str(&format!("Logger: {name} >>>>>\n"));
    }
    block.push_str(&format!("{time} {} {message}\n", paint(label, *tag_color, color)));
    block.push_str(BLOCK_END);
    block
}
