//! 合成器
//!
//! 每帧对可见画布恰好执行三次绘制，顺序固定：
//! 1. 半透明黑色填充（拖尾衰减，位于粒子之下）
//! 2. 离屏缓冲 + `blur brightness` 滤镜，常规覆盖
//! 3. 离屏缓冲 + `saturate` 滤镜，加色叠加

use super::canvas::{Canvas, CompositeOp};
use super::filter::{premultiply, Filter, FilterChain};
use super::offscreen::OffscreenBuffer;
use super::Viewport;
use crate::config::{CompositorConfig, TierParams};
use crate::core::error::{RenderError, RenderResult};

/// 质量档位
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QualityTier {
    /// 窄视口：小模糊半径、近零亮度、完全去饱和
    Compact,
    /// 常规视口：大模糊半径、原亮度
    Full,
}

impl QualityTier {
    /// 按视口宽度选择档位，宽度严格小于阈值时为紧凑档
    pub fn for_width(width: u32, threshold: u32) -> Self {
        if width < threshold {
            Self::Compact
        } else {
            Self::Full
        }
    }
}

/// 一次绘制操作
#[derive(Debug, Clone, PartialEq)]
pub enum DrawOp {
    /// 以非预乘颜色填满画布
    Fill { rgba: [f32; 4], op: CompositeOp },
    /// 绘制经滤镜处理的离屏缓冲
    DrawOffscreen { filters: FilterChain, op: CompositeOp },
}

/// 合成器
#[derive(Debug, Clone)]
pub struct Compositor {
    config: CompositorConfig,
}

impl Compositor {
    /// 创建合成器
    pub fn new(config: CompositorConfig) -> Self {
        Self { config }
    }

    /// 视口对应的档位
    pub fn tier(&self, viewport: Viewport) -> QualityTier {
        QualityTier::for_width(viewport.width, self.config.compact_width_threshold)
    }

    /// 档位参数
    pub fn params(&self, tier: QualityTier) -> TierParams {
        match tier {
            QualityTier::Compact => self.config.compact,
            QualityTier::Full => self.config.full,
        }
    }

    /// 本帧的三次绘制操作，按执行顺序排列
    pub fn passes(&self, viewport: Viewport) -> [DrawOp; 3] {
        let params = self.params(self.tier(viewport));
        [
            DrawOp::Fill {
                rgba: [0.0, 0.0, 0.0, self.config.trail_alpha],
                op: CompositeOp::SourceOver,
            },
            DrawOp::DrawOffscreen {
                filters: FilterChain::new()
                    .with(Filter::Blur(params.blur_px))
                    .with(Filter::Brightness(params.brightness)),
                op: CompositeOp::SourceOver,
            },
            DrawOp::DrawOffscreen {
                filters: FilterChain::new().with(Filter::Saturate(params.saturation)),
                op: CompositeOp::Lighter,
            },
        ]
    }

    /// 把离屏缓冲合成到可见画布
    ///
    /// # 错误
    ///
    /// 画布与离屏缓冲尺寸不一致时返回 `RenderError::InvalidState`，画布保持不变。
    pub fn composite(&self, canvas: &mut Canvas, offscreen: &OffscreenBuffer) -> RenderResult<()> {
        let viewport = canvas.viewport();
        if offscreen.viewport() != viewport {
            return Err(RenderError::InvalidState(format!(
                "offscreen buffer {:?} does not match canvas {:?}",
                offscreen.viewport(),
                viewport
            )));
        }
        if viewport.is_empty() {
            return Ok(());
        }

        let source = premultiply(offscreen.as_image());
        for pass in self.passes(viewport) {
            match pass {
                DrawOp::Fill { rgba, op } => canvas.fill(rgba, op),
                DrawOp::DrawOffscreen { filters, op } => {
                    let mut layer = source.clone();
                    filters.apply(&mut layer);
                    canvas.draw_image(&layer, op)?;
                }
            }
        }
        Ok(())
    }
}
