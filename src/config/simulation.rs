use super::{ConfigError, ConfigResult};
use serde::{Deserialize, Serialize};

/// 粒子模拟配置
///
/// 默认值即星云效果的参考参数。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// 粒子数量（存储容量，构造后固定）
    pub particle_count: usize,

    /// 随机种子；为空时使用系统熵
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,

    /// 出生圆盘半径（像素）
    pub spawn_radius: f32,

    /// 颜色混合的归一化半径，出生半径除以该值得到混合因子（不截断）
    pub color_radius: f32,

    /// 圆心颜色
    pub center_color: [f32; 3],

    /// 边缘颜色
    pub edge_color: [f32; 3],

    /// 每通道颜色抖动幅度，均匀分布于 [-jitter, jitter]
    pub color_jitter: f32,

    /// 寿命下限（含）
    pub lifetime_min: u32,

    /// 寿命上限（不含）
    pub lifetime_max: u32,

    /// 速度系数下限（含）
    pub speed_min: f32,

    /// 速度系数上限（不含）
    pub speed_max: f32,

    /// 噪声采样的空间缩放 (x, y)
    pub noise_scale: [f64; 2],

    /// 噪声采样的时间缩放（每 tick）
    pub time_scale: f64,

    /// 噪声值到角度的倍数（角度 = noise * TAU * noise_steps）
    pub noise_steps: f32,

    /// 速度向目标速度的指数平滑因子
    pub velocity_blend: f32,

    /// 视口四周的边界余量（像素）
    pub edge_margin: f32,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            particle_count: 20_000,
            seed: None,
            spawn_radius: 250.0,
            color_radius: 142.069,
            center_color: [255.0, 255.0, 255.0],
            edge_color: [210.0, 134.0, 95.0],
            color_jitter: 20.0,
            lifetime_min: 100,
            lifetime_max: 300,
            speed_min: 1.0,
            speed_max: 10.0,
            noise_scale: [0.0025, 0.00125],
            time_scale: 0.00025,
            noise_steps: 6.0,
            velocity_blend: 0.015,
            edge_margin: 1.0,
        }
    }
}

impl SimulationConfig {
    /// 验证配置
    pub fn validate(&self) -> ConfigResult<()> {
        if self.particle_count == 0 {
            return Err(ConfigError::ValidationError(
                "particle_count must be greater than 0".to_string(),
            ));
        }
        if self.lifetime_min == 0 || self.lifetime_min >= self.lifetime_max {
            return Err(ConfigError::ValidationError(format!(
                "invalid lifetime range [{}, {})",
                self.lifetime_min, self.lifetime_max
            )));
        }
        if !(self.speed_min < self.speed_max) {
            return Err(ConfigError::ValidationError(format!(
                "invalid speed range [{}, {})",
                self.speed_min, self.speed_max
            )));
        }
        if !(self.velocity_blend > 0.0 && self.velocity_blend <= 1.0) {
            return Err(ConfigError::ValidationError(format!(
                "velocity_blend must be in (0, 1], got {}",
                self.velocity_blend
            )));
        }
        if !(self.spawn_radius > 0.0) || !(self.color_radius > 0.0) {
            return Err(ConfigError::ValidationError(
                "spawn_radius and color_radius must be positive".to_string(),
            ));
        }
        if !(self.color_jitter >= 0.0) {
            return Err(ConfigError::ValidationError(
                "color_jitter must not be negative".to_string(),
            ));
        }
        // 边距为 0 时 x == width 仍算在界内，会落到缓冲之外
        if !(self.edge_margin > 0.0) {
            return Err(ConfigError::ValidationError(
                "edge_margin must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_empty_ranges() {
        let config = SimulationConfig {
            lifetime_min: 300,
            lifetime_max: 300,
            ..SimulationConfig::default()
        };
        assert!(config.validate().is_err());

        let config = SimulationConfig {
            speed_min: 10.0,
            speed_max: 1.0,
            ..SimulationConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_zero_particles() {
        let config = SimulationConfig {
            particle_count: 0,
            ..SimulationConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::ValidationError(_))
        ));
    }
}
