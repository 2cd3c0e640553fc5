//! 调试模式的环境变量开关。

/// Deployment stage variable; `dev` or `development` turns debug on.
pub const DEPLOY_ENV: &str = "DEPLOY_ENV";
/// Any non-empty value turns debug on, whatever the deployment stage.
pub const LOG_DEBUG: &str = "LOG_DEBUG";

const DEBUG_STAGES: [&str; 2] = ["dev", "development"];

/// 根据进程环境变量判断是否开启调试模式。
pub fn debug_enabled() -> bool {
    debug_enabled_with(|key| std::env::var(key).ok())
}

/// Decides debug mode from an arbitrary key-value lookup.
pub fn debug_enabled_with<F>(lookup: F) -> bool
where
    F: Fn(&str) -> Option<String>,
{
    let stage_is_debug = lookup(DEPLOY_ENV)
        .is_some_and(|stage| DEBUG_STAGES.contains(&stage.as_str()));
    stage_is_debug || lookup(LOG_DEBUG).is_some_and(|flag| !flag.is_empty())
}
