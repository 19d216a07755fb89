//! 核心宏定义
//!
//! 提供统一的宏来减少配置结构体的样板代码

/// 为结构体实现Default trait的宏
///
/// 使用示例:
/// ```rust
/// use nebula_field::impl_default;
///
/// struct TierParams {
///     blur_px: f32,
///     brightness: f32,
/// }
///
/// impl_default!(TierParams {
///     blur_px: 10.0,
///     brightness: 1.0,
/// });
///
/// assert_eq!(TierParams::default().blur_px, 10.0);
/// ```
#[macro_export]
macro_rules! impl_default {
    ($struct_name:ident {
        $($field:ident: $value:expr),* $(,)?
    }) => {
        impl Default for $struct_name {
            fn default() -> Self {
                Self {
                    $($field: $value),*
                }
            }
        }
    };
}
