//! 渲染模块
//!
//! 两层表面：
//!
//! ```text
//! ┌──────────────┐  rasterize   ┌─────────────────┐  composite   ┌──────────────┐
//! │ ParticleSample│ ───────────► │ OffscreenBuffer │ ───────────► │    Canvas    │
//! │   (per tick)  │              │  RGBA8, 每帧清零 │  fill+2 draw │ 预乘 f32, 累积 │
//! └──────────────┘              └─────────────────┘              └──────────────┘
//! ```
//!
//! 可见画布从不整体清空；拖尾来自合成器每帧第一步的半透明黑色填充。

pub mod canvas;
pub mod compositor;
pub mod filter;
pub mod offscreen;

use glam::Vec2;

pub use canvas::{Canvas, CompositeOp};
pub use compositor::{Compositor, DrawOp, QualityTier};
pub use filter::{Filter, FilterChain};
pub use offscreen::OffscreenBuffer;

/// 视口尺寸（逻辑像素）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// 视口中心 `(0.5 * width, 0.5 * height)`
    pub fn center(&self) -> Vec2 {
        Vec2::new(self.width as f32 * 0.5, self.height as f32 * 0.5)
    }

    /// 任一维度为零
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_viewport_center() {
        assert_eq!(Viewport::new(800, 600).center(), Vec2::new(400.0, 300.0));
        assert_eq!(Viewport::new(5, 3).center(), Vec2::new(2.5, 1.5));
    }

    #[test]
    fn test_empty_viewport() {
        assert!(Viewport::new(0, 10).is_empty());
        assert!(!Viewport::new(1, 1).is_empty());
    }
}
