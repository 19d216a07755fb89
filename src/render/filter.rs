//! 画布滤镜
//!
//! 对预乘 RGBA 图像依次应用滤镜：
//! - Blur: 高斯模糊的三次盒式近似（与 CSS/SVG `blur()` 相同的做法）
//! - Brightness: RGB 线性缩放
//! - Saturate: CSS 饱和度矩阵
//!
//! 亮度与饱和度都是 RGB 上的线性变换，预乘空间中可直接应用。

use image::{Rgba32FImage, RgbaImage};

/// 单个滤镜
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Filter {
    /// 高斯模糊，参数为标准差（像素）
    Blur(f32),
    /// 亮度倍数
    Brightness(f32),
    /// 饱和度倍数，负值按 0 处理
    Saturate(f32),
}

/// 按顺序应用的滤镜链
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterChain {
    filters: Vec<Filter>,
}

impl FilterChain {
    /// 空滤镜链
    pub fn new() -> Self {
        Self::default()
    }

    /// 追加一个滤镜
    pub fn with(mut self, filter: Filter) -> Self {
        self.filters.push(filter);
        self
    }

    /// 滤镜列表
    pub fn filters(&self) -> &[Filter] {
        &self.filters
    }

    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }

    /// 原地应用全部滤镜
    pub fn apply(&self, image: &mut Rgba32FImage) {
        if self.filters.is_empty() || image.width() == 0 || image.height() == 0 {
            return;
        }
        for filter in &self.filters {
            match *filter {
                Filter::Blur(sigma) => gaussian_blur(image, sigma),
                Filter::Brightness(amount) => brightness(image, amount),
                Filter::Saturate(amount) => saturate(image, amount),
            }
        }
        clamp_premultiplied(image);
    }
}

/// 非预乘 RGBA8 → 预乘 f32
pub fn premultiply(src: &RgbaImage) -> Rgba32FImage {
    let mut out = Rgba32FImage::new(src.width(), src.height());
    for (dst, src) in out.pixels_mut().zip(src.pixels()) {
        let [r, g, b, a] = src.0;
        let a = a as f32 / 255.0;
        dst.0 = [
            r as f32 / 255.0 * a,
            g as f32 / 255.0 * a,
            b as f32 / 255.0 * a,
            a,
        ];
    }
    out
}

/// 盒式模糊的窗口尺寸：`floor(sigma * 3 * sqrt(2π) / 4 + 0.5)`
pub fn box_size(sigma: f32) -> usize {
    let d = sigma * 3.0 * (2.0 * std::f32::consts::PI).sqrt() / 4.0 + 0.5;
    d.floor().max(0.0) as usize
}

/// 三次盒式模糊的 (左延伸, 右延伸) 序列
///
/// 奇数尺寸三次都居中；偶数尺寸前两次分别偏左、偏右，第三次用 d+1 居中。
fn box_passes(d: usize) -> [(usize, usize); 3] {
    if d % 2 == 1 {
        let r = (d - 1) / 2;
        [(r, r); 3]
    } else {
        let h = d / 2;
        [(h, h - 1), (h - 1, h), (h, h)]
    }
}

fn gaussian_blur(image: &mut Rgba32FImage, sigma: f32) {
    let d = box_size(sigma);
    if d <= 1 {
        return;
    }
    let passes = box_passes(d);
    let width = image.width() as usize;
    let height = image.height() as usize;
    let pixels: &mut [[f32; 4]] = bytemuck::cast_slice_mut(&mut **image);

    let mut line = vec![[0.0f32; 4]; width.max(height)];
    let mut scratch = vec![[0.0f32; 4]; width.max(height)];

    // 水平方向
    for row in pixels.chunks_exact_mut(width) {
        line[..width].copy_from_slice(row);
        blur_line_passes(&mut line[..width], &mut scratch[..width], &passes);
        row.copy_from_slice(&line[..width]);
    }

    // 垂直方向
    for x in 0..width {
        for y in 0..height {
            line[y] = pixels[y * width + x];
        }
        blur_line_passes(&mut line[..height], &mut scratch[..height], &passes);
        for y in 0..height {
            pixels[y * width + x] = line[y];
        }
    }
}

fn blur_line_passes(line: &mut [[f32; 4]], scratch: &mut [[f32; 4]], passes: &[(usize, usize); 3]) {
    for &(left, right) in passes {
        box_blur_line(line, scratch, left, right);
        line.copy_from_slice(scratch);
    }
}

/// 一维盒式模糊，窗口 `[i - left, i + right]`，窗口外按透明处理
fn box_blur_line(input: &[[f32; 4]], output: &mut [[f32; 4]], left: usize, right: usize) {
    let n = input.len();
    if n == 0 {
        return;
    }
    let inv = 1.0 / (left + right + 1) as f32;
    let mut acc = [0.0f32; 4];
    for px in input.iter().take(right.min(n - 1) + 1) {
        add(&mut acc, px);
    }
    for i in 0..n {
        output[i] = [acc[0] * inv, acc[1] * inv, acc[2] * inv, acc[3] * inv];
        let incoming = i + 1 + right;
        if incoming < n {
            add(&mut acc, &input[incoming]);
        }
        if i >= left {
            sub(&mut acc, &input[i - left]);
        }
    }
}

#[inline]
fn add(acc: &mut [f32; 4], px: &[f32; 4]) {
    for c in 0..4 {
        acc[c] += px[c];
    }
}

#[inline]
fn sub(acc: &mut [f32; 4], px: &[f32; 4]) {
    for c in 0..4 {
        acc[c] -= px[c];
    }
}

fn brightness(image: &mut Rgba32FImage, amount: f32) {
    let amount = amount.max(0.0);
    for pixel in image.pixels_mut() {
        pixel.0[0] *= amount;
        pixel.0[1] *= amount;
        pixel.0[2] *= amount;
    }
}

fn saturate(image: &mut Rgba32FImage, amount: f32) {
    let s = amount.max(0.0);
    let m = [
        [0.213 + 0.787 * s, 0.715 - 0.715 * s, 0.072 - 0.072 * s],
        [0.213 - 0.213 * s, 0.715 + 0.285 * s, 0.072 - 0.072 * s],
        [0.213 - 0.213 * s, 0.715 - 0.715 * s, 0.072 + 0.928 * s],
    ];
    for pixel in image.pixels_mut() {
        let [r, g, b, a] = pixel.0;
        pixel.0 = [
            m[0][0] * r + m[0][1] * g + m[0][2] * b,
            m[1][0] * r + m[1][1] * g + m[1][2] * b,
            m[2][0] * r + m[2][1] * g + m[2][2] * b,
            a,
        ];
    }
}

// 预乘颜色分量必须落在 [0, alpha]
fn clamp_premultiplied(image: &mut Rgba32FImage) {
    for pixel in image.pixels_mut() {
        let a = pixel.0[3].clamp(0.0, 1.0);
        pixel.0 = [
            pixel.0[0].clamp(0.0, a),
            pixel.0[1].clamp(0.0, a),
            pixel.0[2].clamp(0.0, a),
            a,
        ];
    }
}
