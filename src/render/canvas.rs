//! 可见画布
//!
//! 预乘 alpha 的 f32 RGBA 表面。画布在帧之间从不整体清空，拖尾效果依赖
//! 每帧一次的半透明黑色填充逐步擦除旧内容。

use super::Viewport;
use crate::core::error::{RenderError, RenderResult};
use image::{Rgba, Rgba32FImage, RgbaImage};

/// 合成模式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompositeOp {
    /// 常规覆盖：`d = s + d * (1 - sa)`
    SourceOver,
    /// 加色叠加：`d = min(1, s + d)`
    Lighter,
}

impl CompositeOp {
    /// 合成单个预乘像素
    #[inline]
    pub fn blend(self, src: [f32; 4], dst: [f32; 4]) -> [f32; 4] {
        match self {
            Self::SourceOver => {
                let k = 1.0 - src[3];
                [
                    src[0] + dst[0] * k,
                    src[1] + dst[1] * k,
                    src[2] + dst[2] * k,
                    src[3] + dst[3] * k,
                ]
            }
            Self::Lighter => [
                (src[0] + dst[0]).min(1.0),
                (src[1] + dst[1]).min(1.0),
                (src[2] + dst[2]).min(1.0),
                (src[3] + dst[3]).min(1.0),
            ],
        }
    }
}

/// 可见画布
#[derive(Debug, Clone)]
pub struct Canvas {
    image: Rgba32FImage,
}

impl Canvas {
    /// 创建全透明画布
    pub fn new(viewport: Viewport) -> Self {
        Self {
            image: Rgba32FImage::new(viewport.width, viewport.height),
        }
    }

    /// 宽度
    pub fn width(&self) -> u32 {
        self.image.width()
    }

    /// 高度
    pub fn height(&self) -> u32 {
        self.image.height()
    }

    /// 当前尺寸
    pub fn viewport(&self) -> Viewport {
        Viewport::new(self.width(), self.height())
    }

    /// 调整大小
    ///
    /// 尺寸不变时什么都不做；尺寸变化时内容重置为全透明。
    pub fn resize(&mut self, viewport: Viewport) {
        if self.viewport() == viewport {
            return;
        }
        self.image = Rgba32FImage::new(viewport.width, viewport.height);
    }

    /// 以非预乘颜色 `rgba`（0..1）填满整个画布
    pub fn fill(&mut self, rgba: [f32; 4], op: CompositeOp) {
        let a = rgba[3];
        let src = [rgba[0] * a, rgba[1] * a, rgba[2] * a, a];
        for pixel in self.image.pixels_mut() {
            pixel.0 = op.blend(src, pixel.0);
        }
    }

    /// 在 (0, 0) 处绘制一张同尺寸的预乘图像
    pub fn draw_image(&mut self, src: &Rgba32FImage, op: CompositeOp) -> RenderResult<()> {
        if src.dimensions() != self.image.dimensions() {
            return Err(RenderError::InvalidState(format!(
                "source image is {:?} but canvas is {:?}",
                src.dimensions(),
                self.image.dimensions()
            )));
        }
        for (dst, src) in self.image.pixels_mut().zip(src.pixels()) {
            dst.0 = op.blend(src.0, dst.0);
        }
        Ok(())
    }

    /// 读取预乘像素
    pub fn pixel(&self, x: u32, y: u32) -> Option<[f32; 4]> {
        self.image.get_pixel_checked(x, y).map(|p| p.0)
    }

    /// 底层图像（预乘）
    pub fn as_image(&self) -> &Rgba32FImage {
        &self.image
    }

    /// 铺在黑色背景上并量化为 RGBA8
    ///
    /// 宿主容器的背景是黑色，铺底后预乘的 RGB 即最终颜色。
    pub fn to_rgba8_over_black(&self) -> RgbaImage {
        let mut out = RgbaImage::new(self.width(), self.height());
        for (dst, src) in out.pixels_mut().zip(self.image.pixels()) {
            let [r, g, b, _] = src.0;
            *dst = Rgba([to_byte(r), to_byte(g), to_byte(b), 255]);
        }
        out
    }
}

#[inline]
fn to_byte(value: f32) -> u8 {
    (value.clamp(0.0, 1.0) * 255.0).round() as u8
}
