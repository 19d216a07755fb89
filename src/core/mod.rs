//! 核心模块
//!
//! 包含效果的生命周期与基础设施：
//! - `context` - 挂载期间独占的效果状态
//! - `driver` - 帧驱动器（挂载、逐帧推进、失败停止、卸载）
//! - `scheduler` - 宿主接口与取消令牌
//! - `error` - 错误类型定义
//! - `logging` - 日志初始化

pub mod context;
pub mod driver;
pub mod error;
pub mod logging;
pub mod scheduler;
#[macro_use]
pub mod macros;

// 重新导出错误类型
pub use error::{
    ConfigError, NebulaError, NebulaResult, PlatformError, PlatformResult, RenderError,
    RenderResult,
};

// 重新导出主要类型
pub use context::NebulaContext;
pub use driver::{render_headless, DriverState, FrameDriver, FrameOutcome};
pub use scheduler::{CancellationToken, FrameHost, FrameRequest, ManualHost, ResizeListener};

use crate::config::NebulaConfig;

/// 把效果挂载到宿主上
///
/// 等价于 [`FrameDriver::mount`]。卸载使用 [`FrameDriver::unmount`]。
///
/// # 示例
///
/// ```rust
/// use nebula_field::config::NebulaConfig;
/// use nebula_field::core::{self, ManualHost};
/// use nebula_field::render::Viewport;
///
/// let mut config = NebulaConfig::default();
/// config.simulation.particle_count = 100;
///
/// let mut host = ManualHost::new(Viewport::new(200, 200));
/// let mut driver = core::mount(&mut host, &config).unwrap();
/// driver.pump(&mut host);
/// assert_eq!(driver.tick(), 1);
/// driver.unmount(&mut host);
/// ```
pub fn mount<H: FrameHost + ?Sized>(host: &mut H, config: &NebulaConfig) -> NebulaResult<FrameDriver> {
    FrameDriver::mount(host, config)
}
