//! 统一错误处理模块
//!
//! 提供星云效果范围内的统一错误类型定义
//!
//! ## 错误类型分层
//!
//! - **帧错误** (`RenderError`): 单帧计算/绘制过程中的失败，由帧驱动器捕获并停止循环
//! - **配置错误** (`ConfigError`): 配置文件读取、解析与验证
//! - **平台错误** (`PlatformError`): 窗口与事件循环
//!
//! `NebulaError` 汇总以上所有错误，供挂载入口与二进制程序使用。

use thiserror::Error;

pub use crate::config::ConfigError;

/// 顶层错误类型
#[derive(Error, Debug)]
pub enum NebulaError {
    #[error("Initialization error: {0}")]
    Init(String),

    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    #[error("Render error: {0}")]
    Render(#[from] RenderError),

    #[error("Platform error: {0}")]
    Platform(#[from] PlatformError),

    #[error("Event loop error: {0}")]
    EventLoop(String),

    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// 渲染/帧错误
///
/// `InvalidState` 与 `TickPanicked` 属于帧内失败，驱动器收到后会停止调度。
/// 其余变体只在 GPU 呈现层出现。
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RenderError {
    #[error("Invalid render state: {0}")]
    InvalidState(String),

    #[error("Frame panicked: {0}")]
    TickPanicked(String),

    #[error("Failed to create surface: {0}")]
    SurfaceCreation(String),

    #[error("Failed to request adapter: no compatible GPU found")]
    NoAdapter,

    #[error("Failed to request device: {0}")]
    DeviceRequest(String),

    #[error("Surface error: {0}")]
    Surface(String),
}

/// 平台层错误
#[derive(Error, Debug)]
pub enum PlatformError {
    #[error("Window creation failed: {0}")]
    WindowCreation(String),

    #[error("Event loop error: {0}")]
    EventLoop(String),
}

pub type NebulaResult<T> = Result<T, NebulaError>;
pub type RenderResult<T> = Result<T, RenderError>;
pub type PlatformResult<T> = Result<T, PlatformError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_conversion() {
        let render_err = RenderError::InvalidState("offscreen buffer is 0x0".to_string());
        let err: NebulaError = render_err.into();
        assert!(matches!(err, NebulaError::Render(_)));

        let config_err = ConfigError::ValidationError("particle_count".to_string());
        let err: NebulaError = config_err.into();
        assert!(matches!(err, NebulaError::Config(_)));
    }

    #[test]
    fn test_error_display() {
        let err = RenderError::NoAdapter;
        assert_eq!(
            err.to_string(),
            "Failed to request adapter: no compatible GPU found"
        );
        let err = RenderError::TickPanicked("boom".to_string());
        assert_eq!(err.to_string(), "Frame panicked: boom");
    }
}
