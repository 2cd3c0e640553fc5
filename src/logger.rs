//! Named loggers with their own debug switch.

use std::fmt::{self, Display};
use std::io::Write;
use std::panic::Location;
use std::sync::Arc;
use tracing::trace;
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::fmt::writer::BoxMakeWriter;

use crate::env;
use crate::format::{Level, LineFormatter, NAME_WIDTH, timestamp};

/// Exit code used by [`Logger::die`].
pub const DEFAULT_EXIT_CODE: i32 = 1;

/// A named logger writing human-readable lines to stdout.
///
/// The debug flag is fixed at construction. When it is off, the debug
/// family is silent and info lines carry only the timestamp and name; when
/// it is on, info and debug lines also carry the level tag and call site.
#[derive(Clone)]
pub struct Logger {
    name: String,
    debug_enabled: bool,
    out: Arc<BoxMakeWriter>,
    err: Arc<BoxMakeWriter>,
}

impl Logger {
    /// Creates a logger. With `honor_env` false debug stays off; otherwise
    /// it follows `DEPLOY_ENV` and `LOG_DEBUG`.
    pub fn new(name: &str, honor_env: bool) -> Self {
        Self::with_debug(name, honor_env && env::debug_enabled())
    }

    /// Creates a logger with debug mode set explicitly.
    pub fn with_debug(name: &str, debug_enabled: bool) -> Self {
        Self {
            name: truncate_name(name),
            debug_enabled,
            out: Arc::new(BoxMakeWriter::new(std::io::stdout)),
            err: Arc::new(BoxMakeWriter::new(std::io::stderr)),
        }
    }

    /// Sends regular output somewhere other than stdout.
    pub fn with_writer<M>(mut self, make_writer: M) -> Self
    where
        M: for<'w> MakeWriter<'w> + Send + Sync + 'static,
    {
        self.out = Arc::new(BoxMakeWriter::new(make_writer));
        self
    }

    /// Sends the `die` report somewhere other than stderr.
    pub fn with_err_writer<M>(mut self, make_writer: M) -> Self
    where
        M: for<'w> MakeWriter<'w> + Send + Sync + 'static,
    {
        self.err = Arc::new(BoxMakeWriter::new(make_writer));
        self
    }

    /// Copy of this logger under another name, sharing flag and sinks.
    pub fn renamed(&self, name: &str) -> Self {
        Self {
            name: truncate_name(name),
            ..self.clone()
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn debug_enabled(&self) -> bool {
        self.debug_enabled
    }

    #[track_caller]
    pub fn debug(&self, values: &[&dyn Display]) {
        if !self.debug_enabled {
            return;
        }
        self.emit_values(Level::Debug, Location::caller(), values);
    }

    #[track_caller]
    pub fn debugln(&self, values: &[&dyn Display]) {
        self.debug(values);
    }

    #[track_caller]
    pub fn debugf(&self, args: fmt::Arguments<'_>) {
        if !self.debug_enabled {
            return;
        }
        self.emit_args(Level::Debug, Location::caller(), args);
    }

    #[track_caller]
    pub fn info(&self, values: &[&dyn Display]) {
        self.emit_values(Level::Info, Location::caller(), values);
    }

    #[track_caller]
    pub fn infoln(&self, values: &[&dyn Display]) {
        self.info(values);
    }

    #[track_caller]
    pub fn infof(&self, args: fmt::Arguments<'_>) {
        self.emit_args(Level::Info, Location::caller(), args);
    }

    #[track_caller]
    pub fn print(&self, values: &[&dyn Display]) {
        self.info(values);
    }

    #[track_caller]
    pub fn println(&self, values: &[&dyn Display]) {
        self.info(values);
    }

    #[track_caller]
    pub fn printf(&self, args: fmt::Arguments<'_>) {
        self.infof(args);
    }

    /// Reports `err` with its full cause chain on the error sink and exits
    /// the process with status 1.
    pub fn die(&self, err: impl Into<anyhow::Error>) -> ! {
        self.die_with_code(err, DEFAULT_EXIT_CODE)
    }

    /// Like [`Logger::die`] with a chosen exit status.
    pub fn die_with_code(&self, err: impl Into<anyhow::Error>, code: i32) -> ! {
        let err = err.into();
        write_line(&self.err, &format!("DIE {}\n{err:?}\n", timestamp()));
        std::process::exit(code)
    }

    fn emit_values(&self, level: Level, location: &Location<'_>, values: &[&dyn Display]) {
        let line = self.formatter().values(level, location, values);
        write_line(&self.out, &line);
    }

    fn emit_args(&self, level: Level, location: &Location<'_>, args: fmt::Arguments<'_>) {
        let line = self.formatter().args(level, location, args);
        write_line(&self.out, &line);
    }

    fn formatter(&self) -> LineFormatter<'_> {
        LineFormatter::new(&self.name, self.debug_enabled)
    }
}

impl fmt::Debug for Logger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Logger")
            .field("name", &self.name)
            .field("debug_enabled", &self.debug_enabled)
            .finish_non_exhaustive()
    }
}

/// One `write_all` per line so concurrent callers never split a line.
fn write_line(sink: &BoxMakeWriter, line: &str) {
    let mut writer = sink.make_writer();
    if let Err(err) = writer.write_all(line.as_bytes()) {
        trace!(error = %err, "log line dropped");
    }
}

fn truncate_name(name: &str) -> String {
    name.chars().take(NAME_WIDTH).collect()
}
