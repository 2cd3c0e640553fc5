//! CLI arguments for the demo server.

use clap::Parser;

pub const DEFAULT_BIND: &str = "127.0.0.1:8080";
pub const DEFAULT_LOGGER_NAME: &str = "demo";
pub const SLOW_ROUTE_DELAY_MS: u64 = 1200;

/// CLI arguments and environment configuration for the demo server.
#[derive(Parser, Debug)]
#[command(
    name = "plainlog-demo",
    version,
    about = "Serves a few routes behind the plainlog request logger"
)]
pub struct Args {
    #[arg(
        short = 'b',
        long,
        env = "PLAINLOG_BIND",
        default_value = DEFAULT_BIND,
        help = "Address to listen on"
    )]
    pub bind: String,
    #[arg(
        short = 'n',
        long,
        env = "PLAINLOG_NAME",
        default_value = DEFAULT_LOGGER_NAME,
        help = "Name shown on every log line (cut to 6 chars)"
    )]
    pub name: String,
    #[arg(
        long,
        env = "PLAINLOG_LOG_ALL",
        help = "Log /ping and /healthz as well"
    )]
    pub log_all: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_apply_without_arguments() {
        let args = Args::try_parse_from(["plainlog-demo"]).expect("parse");
        assert_eq!(args.bind, DEFAULT_BIND);
        assert_eq!(args.name, DEFAULT_LOGGER_NAME);
        assert!(!args.log_all);
    }

    #[test]
    fn flags_override_defaults() {
        let args = Args::try_parse_from(["plainlog-demo", "-b", "0.0.0.0:9000", "--name", "shop", "--log-all"])
            .expect("parse");
        assert_eq!(args.bind, "0.0.0.0:9000");
        assert_eq!(args.name, "shop");
        assert!(args.log_all);
    }
}
