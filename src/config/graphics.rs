use super::{ConfigError, ConfigResult};
use crate::impl_default;
use serde::{Deserialize, Serialize};

/// 合成器配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompositorConfig {
    /// 拖尾背景填充的不透明度（黑色）
    pub trail_alpha: f32,

    /// 宽度低于该值时使用紧凑档位
    pub compact_width_threshold: u32,

    /// 窄视口档位
    pub compact: TierParams,

    /// 常规档位
    pub full: TierParams,
}

impl_default!(CompositorConfig {
    trail_alpha: 0.1,
    compact_width_threshold: 768,
    compact: TierParams {
        blur_px: 5.0,
        brightness: 0.01,
        saturation: -1.0,
    },
    full: TierParams {
        blur_px: 10.0,
        brightness: 1.0,
        saturation: 0.01,
    },
});

impl CompositorConfig {
    /// 验证配置
    pub fn validate(&self) -> ConfigResult<()> {
        if !(0.0..=1.0).contains(&self.trail_alpha) {
            return Err(ConfigError::ValidationError(format!(
                "trail_alpha must be in [0, 1], got {}",
                self.trail_alpha
            )));
        }
        self.compact.validate()?;
        self.full.validate()?;
        Ok(())
    }
}

/// 单个质量档位的滤镜参数
///
/// `blur_px` 与 `brightness` 用于第一遍绘制，`saturation` 用于第二遍（叠加）绘制。
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TierParams {
    /// 模糊标准差（像素）
    pub blur_px: f32,
    /// 亮度倍数，1.0 为原样
    pub brightness: f32,
    /// 饱和度倍数，1.0 为原样；负值按 0 处理
    pub saturation: f32,
}

impl TierParams {
    fn validate(&self) -> ConfigResult<()> {
        if !(self.blur_px >= 0.0) || !(self.brightness >= 0.0) {
            return Err(ConfigError::ValidationError(
                "blur_px and brightness must not be negative".to_string(),
            ));
        }
        if !self.saturation.is_finite() {
            return Err(ConfigError::ValidationError(
                "saturation must be finite".to_string(),
            ));
        }
        Ok(())
    }
}

/// 窗口配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    /// 标题
    pub title: String,
    /// 初始宽度（逻辑像素）
    pub width: u32,
    /// 初始高度（逻辑像素）
    pub height: u32,
}

impl_default!(WindowConfig {
    title: "Nebula".to_string(),
    width: 1280,
    height: 720,
});

impl WindowConfig {
    /// 验证配置
    pub fn validate(&self) -> ConfigResult<()> {
        if self.width == 0 || self.height == 0 {
            return Err(ConfigError::ValidationError(
                "Invalid window size".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_tiers() {
        let config = CompositorConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.compact.blur_px, 5.0);
        assert_eq!(config.full.blur_px, 10.0);
    }

    #[test]
    fn test_trail_alpha_range() {
        let config = CompositorConfig {
            trail_alpha: 1.5,
            ..CompositorConfig::default()
        };
        assert!(config.validate().is_err());
    }
}
