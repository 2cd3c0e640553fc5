//! Variadic front-ends for the logging functions.
//!
//! Each macro targets the default logger, or a given one with a leading
//! `logger: expr,`. The plain forms space-join their arguments; the `f`
//! forms take a format string.
//!
//! ```
//! let db = plainlog::Logger::new("db", true);
//! plainlog::info!("listening on", 8080);
//! plainlog::infof!(logger: db, "pool ready with {} connections", 16);
//! plainlog::debug!(logger: db, "checkout", 3);
//! ```

#[macro_export]
macro_rules! debug {
    (logger: $logger:expr, $($value:expr),+ $(,)?) => {
        $logger.debug(&[$(&$value as &dyn ::std::fmt::Display),+])
    };
    ($($value:expr),+ $(,)?) => {
        $crate::debug(&[$(&$value as &dyn ::std::fmt::Display),+])
    };
}

#[macro_export]
macro_rules! info {
    (logger: $logger:expr, $($value:expr),+ $(,)?) => {
        $logger.info(&[$(&$value as &dyn ::std::fmt::Display),+])
    };
    ($($value:expr),+ $(,)?) => {
        $crate::info(&[$(&$value as &dyn ::std::fmt::Display),+])
    };
}

#[macro_export]
macro_rules! debugf {
    (logger: $logger:expr, $($arg:tt)+) => {
        $logger.debugf(::std::format_args!($($arg)+))
    };
    ($($arg:tt)+) => {
        $crate::debugf(::std::format_args!($($arg)+))
    };
}

#[macro_export]
macro_rules! infof {
    (logger: $logger:expr, $($arg:tt)+) => {
        $logger.infof(::std::format_args!($($arg)+))
    };
    ($($arg:tt)+) => {
        $crate::infof(::std::format_args!($($arg)+))
    };
}
