//! Plain console logging for small services.
//!
//! Loggers are named and print one human-readable line per call:
//!
//! ```text
//! 2026-10-16T09:14:03.120455012Z  |  api     |  listening on 0.0.0.0:8080
//! ```
//!
//! Debug mode is read from the environment when a logger is created
//! (`DEPLOY_ENV=dev|development` or a non-empty `LOG_DEBUG`). It turns on the
//! debug family and adds the level tag and call site to every line:
//!
//! ```text
//! 2026-10-16T09:14:03.120455012Z  |  DBG  |  api     |  src/routes.rs:41        |  cache miss
//! ```
//!
//! [`RequestLogLayer`] plugs the same logger into a `tower` stack and writes
//! one line per HTTP request.

mod caller;
mod capture;
mod env;
mod error;
mod format;
mod global;
mod logger;
mod macros;
mod middleware;

#[cfg(test)]
mod test_support;

pub use caller::{CALLER_WIDTH, caller_token};
pub use capture::{CaptureBody, ResponseCapture, Upgradable};
pub use env::{DEPLOY_ENV, LOG_DEBUG, debug_enabled, debug_enabled_with};
pub use error::{Error, Result};
pub use format::NAME_WIDTH;
pub use global::{
    DEFAULT_NAME, debug, debugf, debugln, default_logger, die, die_with_code, info, infof, infoln,
    print, printf, println, rename, set_default,
};
pub use logger::{DEFAULT_EXIT_CODE, Logger};
pub use middleware::{
    DEFAULT_BLACKLIST, LoggerSource, RequestLog, RequestLogLayer, ResponseFuture, format_elapsed,
    http_handler,
};
