//! 噪声场
//!
//! 粒子运动方向由 3D 相干噪声 (x, y, t) 决定。实现只需确定、平滑，
//! 输出大致落在 [-1, 1]，不要求与任何特定噪声库逐位一致。

use ::noise::{NoiseFn, OpenSimplex};

/// 3D 相干噪声源
///
/// 相同输入必须得到相同输出。
pub trait NoiseField {
    /// 在 (x, y, t) 处采样，返回值大致位于 [-1, 1]
    fn sample(&self, x: f64, y: f64, t: f64) -> f64;
}

/// OpenSimplex 噪声场
pub struct SimplexNoise {
    noise: OpenSimplex,
}

impl SimplexNoise {
    /// 以给定种子创建噪声场
    pub fn new(seed: u32) -> Self {
        Self {
            noise: OpenSimplex::new(seed),
        }
    }
}

impl NoiseField for SimplexNoise {
    fn sample(&self, x: f64, y: f64, t: f64) -> f64 {
        self.noise.get([x, y, t])
    }
}

/// 常量噪声场，所有位置返回同一个值
///
/// 主要用于测试：常量 0 意味着所有粒子的目标方向都是 +x。
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConstantNoise(pub f64);

impl NoiseField for ConstantNoise {
    fn sample(&self, _x: f64, _y: f64, _t: f64) -> f64 {
        self.0
    }
}

impl<N: NoiseField + ?Sized> NoiseField for Box<N> {
    fn sample(&self, x: f64, y: f64, t: f64) -> f64 {
        (**self).sample(x, y, t)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simplex_is_deterministic() {
        let a = SimplexNoise::new(7);
        let b = SimplexNoise::new(7);
        for i in 0..32 {
            let x = i as f64 * 0.37;
            let y = i as f64 * 0.11;
            let t = i as f64 * 0.05;
            assert_eq!(a.sample(x, y, t), b.sample(x, y, t));
        }
    }

    #[test]
    fn test_simplex_range_and_smoothness() {
        let field = SimplexNoise::new(1);
        let mut previous = field.sample(0.0, 0.0, 0.0);
        for i in 1..2000 {
            let x = i as f64 * 0.0025;
            let value = field.sample(x, 0.5, 0.25);
            assert!((-1.05..=1.05).contains(&value), "out of range: {value}");
            // 相邻采样点间距很小，值不应跳变
            assert!((value - previous).abs() < 0.1);
            previous = value;
        }
    }

    #[test]
    fn test_constant_noise() {
        let field: Box<dyn NoiseField> = Box::new(ConstantNoise(0.25));
        assert_eq!(field.sample(10.0, -3.0, 99.0), 0.25);
    }
}
