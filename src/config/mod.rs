//! 统一配置系统
//!
//! 提供TOML/JSON配置文件、环境变量覆盖和配置验证

use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub mod graphics;
pub mod simulation;

pub use graphics::{CompositorConfig, TierParams, WindowConfig};
pub use simulation::SimulationConfig;

use crate::impl_default;

/// 配置错误
#[derive(Error, Debug)]
pub enum ConfigError {
    /// 文件读取错误
    #[error("Config file error: {0}")]
    FileError(#[from] std::io::Error),
    /// 解析错误
    #[error("Config parse error: {0}")]
    ParseError(String),
    /// 验证错误
    #[error("Config validation error: {0}")]
    ValidationError(String),
}

pub type ConfigResult<T> = Result<T, ConfigError>;

/// 星云效果主配置
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NebulaConfig {
    /// 粒子模拟配置
    pub simulation: SimulationConfig,

    /// 合成器配置
    pub compositor: CompositorConfig,

    /// 窗口配置（仅二进制程序使用）
    pub window: WindowConfig,

    /// 日志配置
    pub logging: LoggingConfig,
}

impl NebulaConfig {
    /// 创建默认配置
    pub fn new() -> Self {
        Self::default()
    }

    /// 按扩展名加载配置文件（`.json` 走JSON，其余按TOML解析）
    pub fn from_file<P: AsRef<Path>>(path: P) -> ConfigResult<Self> {
        let path = path.as_ref();
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => Self::from_json_file(path),
            _ => Self::from_toml_file(path),
        }
    }

    /// 从TOML文件加载配置
    pub fn from_toml_file<P: AsRef<Path>>(path: P) -> ConfigResult<Self> {
        let content = fs::read_to_string(path).map_err(ConfigError::FileError)?;
        Self::from_toml_str(&content)
    }

    /// 从TOML字符串解析配置
    pub fn from_toml_str(content: &str) -> ConfigResult<Self> {
        toml::from_str(content).map_err(|e| ConfigError::ParseError(e.to_string()))
    }

    /// 从JSON文件加载配置
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> ConfigResult<Self> {
        let content = fs::read_to_string(path).map_err(ConfigError::FileError)?;
        Self::from_json_str(&content)
    }

    /// 从JSON字符串解析配置
    pub fn from_json_str(content: &str) -> ConfigResult<Self> {
        serde_json::from_str(content).map_err(|e| ConfigError::ParseError(e.to_string()))
    }

    /// 保存为TOML文件
    pub fn save_toml<P: AsRef<Path>>(&self, path: P) -> ConfigResult<()> {
        let content =
            toml::to_string_pretty(self).map_err(|e| ConfigError::ParseError(e.to_string()))?;
        fs::write(path, content).map_err(ConfigError::FileError)
    }

    /// 保存为JSON文件
    pub fn save_json<P: AsRef<Path>>(&self, path: P) -> ConfigResult<()> {
        let content = serde_json::to_string_pretty(self)
            .map_err(|e| ConfigError::ParseError(e.to_string()))?;
        fs::write(path, content).map_err(ConfigError::FileError)
    }

    /// 从环境变量覆盖配置
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| env::var(key).ok());
    }

    /// 从任意键值来源覆盖配置
    ///
    /// 无法解析的值会被忽略并保留原配置。
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(count) = lookup("NEBULA_PARTICLE_COUNT").and_then(|v| v.parse().ok()) {
            self.simulation.particle_count = count;
        }
        if let Some(seed) = lookup("NEBULA_SEED").and_then(|v| v.parse().ok()) {
            self.simulation.seed = Some(seed);
        }
        if let Some(width) = lookup("NEBULA_WINDOW_WIDTH").and_then(|v| v.parse().ok()) {
            self.window.width = width;
        }
        if let Some(height) = lookup("NEBULA_WINDOW_HEIGHT").and_then(|v| v.parse().ok()) {
            self.window.height = height;
        }
        if let Some(level) = lookup("NEBULA_LOG_LEVEL").and_then(|v| LogLevel::parse(&v)) {
            self.logging.level = level;
        }
    }

    /// 验证配置
    pub fn validate(&self) -> ConfigResult<()> {
        self.simulation.validate()?;
        self.compositor.validate()?;
        self.window.validate()?;
        Ok(())
    }

    /// 查找配置文件
    ///
    /// 按以下顺序查找：
    /// 1. ./nebula.toml
    /// 2. ./nebula.json
    /// 3. ~/.config/nebula_field/config.toml
    pub fn locate() -> Option<PathBuf> {
        let mut candidates = vec![PathBuf::from("nebula.toml"), PathBuf::from("nebula.json")];
        if let Some(home) = env::var_os("HOME") {
            candidates.push(
                PathBuf::from(home)
                    .join(".config")
                    .join("nebula_field")
                    .join("config.toml"),
            );
        }
        candidates.into_iter().find(|path| path.is_file())
    }
}

/// 日志配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// 日志级别，`RUST_LOG` 存在时以其为准
    pub level: LogLevel,
}

impl_default!(LoggingConfig {
    level: LogLevel::Info,
});

/// 日志级别
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// 跟踪
    Trace,
    /// 调试
    Debug,
    /// 信息
    Info,
    /// 警告
    Warn,
    /// 错误
    Error,
}

impl LogLevel {
    /// 解析不区分大小写的级别名
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "trace" => Some(Self::Trace),
            "debug" => Some(Self::Debug),
            "info" => Some(Self::Info),
            "warn" | "warning" => Some(Self::Warn),
            "error" => Some(Self::Error),
            _ => None,
        }
    }

    /// `EnvFilter` 可接受的指令字符串
    pub fn as_directive(self) -> &'static str {
        match self {
            Self::Trace => "trace",
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error => "error",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_default_config() {
        let config = NebulaConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.simulation.particle_count, 20_000);
    }

    #[test]
    fn test_toml_serialization() {
        let config = NebulaConfig::default();
        let toml_str = toml::to_string(&config).unwrap();
        let parsed = NebulaConfig::from_toml_str(&toml_str).unwrap();
        assert_eq!(config, parsed);
    }

    #[test]
    fn test_json_serialization() {
        let mut config = NebulaConfig::default();
        config.simulation.seed = Some(42);
        let json_str = serde_json::to_string(&config).unwrap();
        let parsed = NebulaConfig::from_json_str(&json_str).unwrap();
        assert_eq!(parsed.simulation.seed, Some(42));
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let parsed = NebulaConfig::from_toml_str(
            r#"
            [simulation]
            particle_count = 512

            [logging]
            level = "debug"
            "#,
        )
        .unwrap();
        assert_eq!(parsed.simulation.particle_count, 512);
        assert_eq!(parsed.simulation.spawn_radius, 250.0);
        assert_eq!(parsed.logging.level, LogLevel::Debug);
        assert_eq!(parsed.compositor, CompositorConfig::default());
    }

    #[test]
    fn test_overrides() {
        let vars: HashMap<&str, &str> = [
            ("NEBULA_PARTICLE_COUNT", "64"),
            ("NEBULA_SEED", "7"),
            ("NEBULA_WINDOW_WIDTH", "not-a-number"),
            ("NEBULA_LOG_LEVEL", "WARN"),
        ]
        .into_iter()
        .collect();

        let mut config = NebulaConfig::default();
        config.apply_overrides(|key| vars.get(key).map(|v| v.to_string()));

        assert_eq!(config.simulation.particle_count, 64);
        assert_eq!(config.simulation.seed, Some(7));
        assert_eq!(config.window.width, WindowConfig::default().width);
        assert_eq!(config.logging.level, LogLevel::Warn);
    }

    #[test]
    fn test_parse_error() {
        let err = NebulaConfig::from_toml_str("simulation = 3").unwrap_err();
        assert!(matches!(err, ConfigError::ParseError(_)));
    }
}
