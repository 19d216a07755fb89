//! 星云粒子模拟模块
//!
//! CPU 上的噪声驱动粒子场，每个 tick 推进全部粒子一次。
//!
//! ## 架构设计
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │                   Particle Simulation                    │
//! ├─────────────────────────────────────────────────────────┤
//! │  1. Noise Field                                          │
//! │     - 3D 相干噪声 (x, y, time) → 标量                     │
//! │                                                          │
//! │  2. Particle Store                                       │
//! │     - 固定容量的列式存储 (SoA)                            │
//! │     - 槽位原地复用，不增删                                 │
//! │                                                          │
//! │  3. Simulator                                            │
//! │     - 年龄/透明度包络更新                                 │
//! │     - 存活判定，失效即原地重生                             │
//! │     - 噪声角度驱动的速度平滑与积分                         │
//! │     - 输出本帧可绘制的粒子样本                             │
//! └─────────────────────────────────────────────────────────┘
//! ```

pub mod noise;
pub mod particle;
pub mod simulator;
pub mod store;


pub use self::noise::{ConstantNoise, NoiseField, SimplexNoise};
pub use particle::{fade_in_out, Particle, ParticleSample, Spawner};
pub use simulator::{Bounds, Simulator, StepStats};
pub use store::ParticleStore;
