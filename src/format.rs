//! Output line assembly.

use chrono::{SecondsFormat, Utc};
use std::fmt::{self, Display, Write as _};
use std::panic::Location;

use crate::caller::{CALLER_WIDTH, caller_token};

/// Width of the logger name column; longer names are cut to this length.
pub const NAME_WIDTH: usize = 6;
pub const SEPARATOR: &str = "  |  ";
const TIMESTAMP_WIDTH: usize = 30;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Level {
    Debug,
    Info,
}

impl Level {
    pub fn tag(self) -> &'static str {
        match self {
            Level::Debug => "DBG",
            Level::Info => "NFO",
        }
    }
}

/// Current UTC time as RFC 3339 with nanoseconds.
pub fn timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Nanos, true)
}

/// Builds complete lines for one logger.
///
/// Verbose lines read `timestamp | level | name | caller | message`, quiet
/// ones `timestamp | name | message`. Every line ends in a single `\n` and
/// is returned whole so the caller can hand it to one write.
pub struct LineFormatter<'a> {
    name: &'a str,
    verbose: bool,
}

impl<'a> LineFormatter<'a> {
    pub fn new(name: &'a str, verbose: bool) -> Self {
        Self { name, verbose }
    }

    /// Space-joins the values after the prefix columns.
    pub fn values(&self, level: Level, location: &Location<'_>, values: &[&dyn Display]) -> String {
        let mut line = self.head(level, location);
        for (index, value) in values.iter().enumerate() {
            if index > 0 {
                line.push(' ');
            }
            let _ = write!(line, "{value}");
        }
        line.push('\n');
        line
    }

    /// Renders preformatted arguments, collapsing trailing newlines to one.
    pub fn args(&self, level: Level, location: &Location<'_>, args: fmt::Arguments<'_>) -> String {
        let mut line = self.head(level, location);
        let _ = line.write_fmt(args);
        let end = line.trim_end_matches('\n').len();
        line.truncate(end);
        line.push('\n');
        line
    }

    fn head(&self, level: Level, location: &Location<'_>) -> String {
        let mut line = format!("{:<TIMESTAMP_WIDTH$}{SEPARATOR}", timestamp());
        if self.verbose {
            let _ = write!(
                line,
                "{}{SEPARATOR}{:<NAME_WIDTH$}{SEPARATOR}{:<CALLER_WIDTH$}{SEPARATOR}",
                level.tag(),
                self.name,
                caller_token(location),
            );
        } else {
            let _ = write!(line, "{:<NAME_WIDTH$}{SEPARATOR}", self.name);
        }
        line
    }
}
