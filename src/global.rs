//! The process-wide `main` logger and the free functions that use it.
//!
//! The default logger lives in an [`ArcSwap`], so log calls read it without
//! locking. [`rename`] and [`set_default`] swap in a whole new logger; a
//! call racing a swap prints under either the old or the new name.

use arc_swap::ArcSwap;
use std::fmt::{self, Display};
use std::sync::{Arc, LazyLock};

use crate::logger::{DEFAULT_EXIT_CODE, Logger};

/// Name of the logger used before any rename.
pub const DEFAULT_NAME: &str = "main";

static DEFAULT: LazyLock<ArcSwap<Logger>> =
    LazyLock::new(|| ArcSwap::from_pointee(Logger::new(DEFAULT_NAME, true)));

/// Current default logger.
pub fn default_logger() -> Arc<Logger> {
    DEFAULT.load_full()
}

/// Replaces the default logger.
pub fn set_default(logger: Logger) {
    DEFAULT.store(Arc::new(logger));
}

/// Gives the default logger a new display name, usually the application's.
/// Repeated renames are allowed; the last one wins.
pub fn rename(name: &str) {
    DEFAULT.rcu(|current| Arc::new(current.renamed(name)));
}

#[track_caller]
pub fn debug(values: &[&dyn Display]) {
    DEFAULT.load().debug(values);
}

#[track_caller]
pub fn debugln(values: &[&dyn Display]) {
    DEFAULT.load().debugln(values);
}

#[track_caller]
pub fn debugf(args: fmt::Arguments<'_>) {
    DEFAULT.load().debugf(args);
}

#[track_caller]
pub fn info(values: &[&dyn Display]) {
    DEFAULT.load().info(values);
}

#[track_caller]
pub fn infoln(values: &[&dyn Display]) {
    DEFAULT.load().infoln(values);
}

#[track_caller]
pub fn infof(args: fmt::Arguments<'_>) {
    DEFAULT.load().infof(args);
}

#[track_caller]
pub fn print(values: &[&dyn Display]) {
    info(values);
}

#[track_caller]
pub fn println(values: &[&dyn Display]) {
    info(values);
}

#[track_caller]
pub fn printf(args: fmt::Arguments<'_>) {
    infof(args);
}

/// Reports `err` on stderr and exits with status 1.
///
/// Meant for the top of a process, where an error has nowhere left to go.
pub fn die(err: impl Into<anyhow::Error>) -> ! {
    die_with_code(err, DEFAULT_EXIT_CODE)
}

/// Reports `err` on stderr and exits with `code`.
pub fn die_with_code(err: impl Into<anyhow::Error>, code: i32) -> ! {
    DEFAULT.load().die_with_code(err, code)
}
