//! 统一的错误类型与结果别名。

use thiserror::Error;

/// Errors surfaced by the HTTP side of the crate.
///
/// Logging calls themselves never fail; these only come from building a
/// blacklist or asking a message for its connection upgrade.
#[derive(Debug, Error)]
pub enum Error {
    #[error("connection upgrade not supported")]
    UpgradeUnsupported,
    #[error("invalid blacklist pattern: {0}")]
    InvalidBlacklist(#[from] regex::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
