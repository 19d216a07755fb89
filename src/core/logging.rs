//! 日志初始化
//!
//! `RUST_LOG` 存在时以其为准，否则使用配置中的级别。重复初始化不会报错，
//! 后一次调用直接被忽略。

use crate::config::LoggingConfig;
use tracing_subscriber::EnvFilter;

/// 安装全局 tracing 订阅者
///
/// # 返回
///
/// 本次调用确实完成安装时返回 `true`；已有全局订阅者时返回 `false`。
pub fn init(config: &LoggingConfig) -> bool {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.level.as_directive()));

    let installed = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .try_init()
        .is_ok();

    if installed {
        tracing::info!(target: "nebula::driver", level = config.level.as_directive(), "logging initialized");
    }
    installed
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repeated_init_is_harmless() {
        let config = LoggingConfig::default();
        init(&config);
        assert!(!init(&config));
    }
}
