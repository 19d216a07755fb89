//! 离屏光栅化
//!
//! 离屏缓冲每帧先清零，再把本帧存活粒子逐个写成单像素。缓冲本身不跨帧累积，
//! 拖尾效果由合成器在可见画布上完成。

use super::Viewport;
use crate::core::error::{RenderError, RenderResult};
use crate::simulation::ParticleSample;
use image::RgbaImage;

/// 离屏像素缓冲（非预乘 RGBA8）
#[derive(Debug, Clone)]
pub struct OffscreenBuffer {
    image: RgbaImage,
}

impl OffscreenBuffer {
    /// 创建全透明缓冲
    pub fn new(viewport: Viewport) -> Self {
        Self {
            image: RgbaImage::new(viewport.width, viewport.height),
        }
    }

    /// 当前尺寸
    pub fn viewport(&self) -> Viewport {
        Viewport::new(self.image.width(), self.image.height())
    }

    /// 调整大小，尺寸不变时不重新分配
    pub fn resize(&mut self, viewport: Viewport) {
        if self.viewport() == viewport {
            return;
        }
        self.image = RgbaImage::new(viewport.width, viewport.height);
    }

    /// 清零后写入本帧样本
    ///
    /// 像素索引为 `floor(x) + floor(y) * width`；多个样本落在同一像素时后写覆盖先写。
    ///
    /// # 返回
    ///
    /// 写入的样本数。
    ///
    /// # 错误
    ///
    /// 样本落在缓冲之外时返回 `RenderError::InvalidState`，此时缓冲内容不完整。
    pub fn rasterize(&mut self, samples: &[ParticleSample]) -> RenderResult<usize> {
        self.image.fill(0);
        let width = self.image.width() as usize;
        let height = self.image.height() as usize;
        let data: &mut [u8] = &mut self.image;

        for sample in samples {
            let px = sample.x.floor();
            let py = sample.y.floor();
            if !(px >= 0.0 && py >= 0.0 && (px as usize) < width && (py as usize) < height) {
                return Err(RenderError::InvalidState(format!(
                    "particle sample ({}, {}) outside {}x{} offscreen buffer",
                    sample.x, sample.y, width, height
                )));
            }
            let i = 4 * (px as usize + py as usize * width);
            let [r, g, b] = sample.color;
            data[i..i + 4].copy_from_slice(&[
                channel(r),
                channel(g),
                channel(b),
                sample.alpha.round() as u8,
            ]);
        }
        Ok(samples.len())
    }

    /// 读取像素
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        self.image.get_pixel_checked(x, y).map(|p| p.0)
    }

    /// 底层图像
    pub fn as_image(&self) -> &RgbaImage {
        &self.image
    }
}

/// 颜色通道写入字节缓冲
///
/// 粒子颜色在模拟中不做截断，可能小于 0 或大于 255；写入时按饱和转换落到字节范围，
/// 与钳制型像素数组的存储方式一致。
#[inline]
fn channel(value: i32) -> u8 {
    value.clamp(0, 255) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(x: f32, y: f32, color: [i32; 3], alpha: f32) -> ParticleSample {
        ParticleSample { x, y, color, alpha }
    }

    #[test]
    fn test_single_pixel_writes() {
        let mut buffer = OffscreenBuffer::new(Viewport::new(10, 10));
        let written = buffer
            .rasterize(&[sample(3.7, 2.2, [10, 20, 30], 127.6)])
            .unwrap();
        assert_eq!(written, 1);
        assert_eq!(buffer.pixel(3, 2), Some([10, 20, 30, 128]));
        assert_eq!(buffer.pixel(4, 2), Some([0, 0, 0, 0]));
    }

    #[test]
    fn test_last_write_wins() {
        let mut buffer = OffscreenBuffer::new(Viewport::new(4, 4));
        buffer
            .rasterize(&[
                sample(1.1, 1.1, [255, 0, 0], 255.0),
                sample(1.9, 1.5, [0, 255, 0], 100.0),
            ])
            .unwrap();
        assert_eq!(buffer.pixel(1, 1), Some([0, 255, 0, 100]));
    }

    #[test]
    fn test_buffer_cleared_each_tick() {
        let mut buffer = OffscreenBuffer::new(Viewport::new(4, 4));
        buffer.rasterize(&[sample(2.0, 2.0, [1, 2, 3], 4.0)]).unwrap();
        buffer.rasterize(&[]).unwrap();
        assert!(buffer.as_image().pixels().all(|p| p.0 == [0, 0, 0, 0]));
    }

    #[test]
    fn test_out_of_range_channels_saturate() {
        let mut buffer = OffscreenBuffer::new(Viewport::new(2, 2));
        buffer
            .rasterize(&[sample(0.0, 0.0, [274, -3, 128], 255.0)])
            .unwrap();
        assert_eq!(buffer.pixel(0, 0), Some([255, 0, 128, 255]));
    }

    #[test]
    fn test_sample_outside_buffer_is_an_error() {
        let mut buffer = OffscreenBuffer::new(Viewport::new(4, 4));
        let err = buffer
            .rasterize(&[sample(4.0, 1.0, [0, 0, 0], 0.0)])
            .unwrap_err();
        assert!(matches!(err, RenderError::InvalidState(_)));
    }
}
