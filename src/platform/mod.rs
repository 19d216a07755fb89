//! 平台层
//!
//! - `winit` - 窗口宿主与事件循环
//! - `present` - 把画布呈现到窗口表面

pub mod present;
pub mod winit;

pub use self::present::WgpuPresenter;
pub use self::winit::{run, WinitHost};
