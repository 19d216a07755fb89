//! 粒子记录、透明度包络与出生采样

use crate::config::SimulationConfig;
use glam::Vec2;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::f32::consts::TAU;

/// 单个粒子（逻辑记录，物理上按列存储于 [`ParticleStore`](super::ParticleStore)）
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Particle {
    /// 位置（视口像素坐标）
    pub position: Vec2,
    /// 速度（像素/tick）
    pub velocity: Vec2,
    /// 透明度 0..=255，每 tick 由年龄推导
    pub alpha: f32,
    /// 出生以来的 tick 数
    pub age: u32,
    /// 寿命（tick），出生时确定
    pub lifetime: u32,
    /// 速度系数，缩放噪声驱动的目标速度
    pub speed: f32,
    /// 颜色，未截断到字节范围
    pub color: [i32; 3],
}

impl Particle {
    /// 在某位置静止、颜色为白色的粒子
    pub fn at(position: Vec2, lifetime: u32, speed: f32) -> Self {
        Self {
            position,
            velocity: Vec2::ZERO,
            alpha: 0.0,
            age: 0,
            lifetime,
            speed,
            color: [255, 255, 255],
        }
    }
}

/// 交给光栅化器的单帧粒子样本
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParticleSample {
    pub x: f32,
    pub y: f32,
    pub color: [i32; 3],
    pub alpha: f32,
}

/// 三角形淡入淡出包络
///
/// `t < ttl/2` 时从 0 线性升到 1，之后线性降回 0，在 `ttl/2` 处取得峰值 1。
pub fn fade_in_out(t: f32, ttl: f32) -> f32 {
    let half = ttl / 2.0;
    if t < half {
        t / half
    } else {
        1.0 - (t - half) / half
    }
}

fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// 粒子出生采样器
///
/// 在以中心为圆心的圆盘内按均匀角度、均匀半径采样出生位置，
/// 颜色按出生半径从圆心色混合到边缘色，再加每通道抖动。
pub struct Spawner {
    rng: StdRng,
    config: SimulationConfig,
}

impl Spawner {
    /// 创建采样器；`config.seed` 为空时使用系统熵
    pub fn new(config: SimulationConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self { rng, config }
    }

    /// 按出生半径计算抖动前的颜色
    ///
    /// 混合因子为 `radius / color_radius`，不截断，超过 1 时会越过边缘色外推。
    pub fn base_color(&self, radius: f32) -> [f32; 3] {
        let factor = radius / self.config.color_radius;
        let center = self.config.center_color;
        let edge = self.config.edge_color;
        [
            lerp(center[0], edge[0], factor),
            lerp(center[1], edge[1], factor),
            lerp(center[2], edge[2], factor),
        ]
    }

    /// 在 `center` 周围生成一个新粒子
    pub fn spawn(&mut self, center: Vec2) -> Particle {
        let theta = self.rng.gen_range(0.0..TAU);
        let radius = self.rng.gen_range(0.0..self.config.spawn_radius);
        let position = center + radius * Vec2::new(theta.cos(), theta.sin());

        let lifetime = self
            .rng
            .gen_range(self.config.lifetime_min..self.config.lifetime_max);
        let speed = self
            .rng
            .gen_range(self.config.speed_min..self.config.speed_max);

        let base = self.base_color(radius);
        let color = base.map(|channel| (channel + self.jitter()) as i32);

        Particle {
            position,
            velocity: Vec2::ZERO,
            alpha: 0.0,
            age: 0,
            lifetime,
            speed,
            color,
        }
    }

    fn jitter(&mut self) -> f32 {
        let amount = self.config.color_jitter;
        if amount > 0.0 {
            self.rng.gen_range(-amount..amount)
        } else {
            0.0
        }
    }
}
