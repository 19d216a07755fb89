//! 粒子模拟器
//!
//! 每个 tick 对每个槽位执行：
//! 1. 年龄加一并由三角包络计算透明度
//! 2. 存活（未到寿命且在边界内）则按噪声角度平滑速度并积分位置，输出样本
//! 3. 否则在同一槽位原地重生，本帧不绘制

use super::noise::NoiseField;
use super::particle::{fade_in_out, ParticleSample, Spawner};
use super::store::ParticleStore;
use crate::config::SimulationConfig;
use glam::Vec2;
use std::f32::consts::TAU;

/// 存活区域：`[margin, width - margin] × [margin, height - margin]`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub width: f32,
    pub height: f32,
    pub margin: f32,
}

impl Bounds {
    pub fn new(width: f32, height: f32, margin: f32) -> Self {
        Self {
            width,
            height,
            margin,
        }
    }

    /// 位置是否在存活区域内，非有限值视为越界
    pub fn contains(&self, position: Vec2) -> bool {
        if !position.is_finite() {
            return false;
        }
        let m = self.margin;
        !(position.x < m
            || position.x > self.width - m
            || position.y < m
            || position.y > self.height - m)
    }
}

/// 单个 tick 的统计
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StepStats {
    /// 推进并输出样本的粒子数
    pub advanced: usize,
    /// 原地重生的粒子数
    pub respawned: usize,
}

/// 粒子模拟器，独占出生采样器与噪声场
pub struct Simulator {
    spawner: Spawner,
    noise: Box<dyn NoiseField>,
    config: SimulationConfig,
}

impl Simulator {
    /// 创建模拟器
    pub fn new(config: SimulationConfig, noise: impl NoiseField + 'static) -> Self {
        Self {
            spawner: Spawner::new(config.clone()),
            noise: Box::new(noise),
            config,
        }
    }

    /// 模拟配置
    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    /// 生成一个围绕 `center` 的新粒子
    pub fn spawn(&mut self, center: Vec2) -> super::Particle {
        self.spawner.spawn(center)
    }

    /// 分配并填满一个新的粒子存储
    pub fn populate(&mut self, center: Vec2) -> ParticleStore {
        let spawner = &mut self.spawner;
        ParticleStore::populate(self.config.particle_count, |_| spawner.spawn(center))
    }

    /// 推进全部粒子一个 tick
    ///
    /// # 参数
    ///
    /// * `store` - 粒子存储
    /// * `bounds` - 存活区域
    /// * `center` - 当前视口中心，重生粒子围绕它出生
    /// * `tick` - 当前 tick 计数，作为噪声的时间轴
    /// * `samples` - 输出缓冲，先清空再写入本帧可绘制的粒子
    pub fn step(
        &mut self,
        store: &mut ParticleStore,
        bounds: Bounds,
        center: Vec2,
        tick: u64,
        samples: &mut Vec<ParticleSample>,
    ) -> StepStats {
        samples.clear();
        let mut stats = StepStats::default();

        let Self {
            spawner,
            noise,
            config,
        } = self;
        let t = tick as f64 * config.time_scale;
        let [scale_x, scale_y] = config.noise_scale;

        store.update_each(|_, mut particle| {
            particle.age += 1;
            particle.alpha =
                fade_in_out(particle.age as f32, particle.lifetime as f32) * 255.0;

            if particle.age < particle.lifetime && bounds.contains(particle.position) {
                let drawn_at = particle.position;
                let n = noise.sample(
                    drawn_at.x as f64 * scale_x,
                    drawn_at.y as f64 * scale_y,
                    t,
                ) as f32
                    * TAU
                    * config.noise_steps;
                let target = Vec2::new(n.cos(), n.sin()) * particle.speed;
                particle.velocity = particle.velocity.lerp(target, config.velocity_blend);
                particle.position += particle.velocity;

                samples.push(ParticleSample {
                    x: drawn_at.x,
                    y: drawn_at.y,
                    color: particle.color,
                    alpha: particle.alpha,
                });
                stats.advanced += 1;
                particle
            } else {
                stats.respawned += 1;
                spawner.spawn(center)
            }
        });

        tracing::trace!(
            target: "nebula::sim",
            tick,
            advanced = stats.advanced,
            respawned = stats.respawned,
            "simulation step"
        );
        stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simulation::noise::ConstantNoise;
    use crate::simulation::particle::Particle;

    fn config(count: usize) -> SimulationConfig {
        SimulationConfig {
            particle_count: count,
            seed: Some(11),
            ..SimulationConfig::default()
        }
    }

    #[test]
    fn test_constant_noise_blends_toward_plus_x() {
        let mut sim = Simulator::new(config(4), ConstantNoise(0.0));
        let particles: Vec<Particle> = (0..4)
            .map(|i| Particle::at(Vec2::new(20.0 + i as f32 * 10.0, 50.0), 200, 1.0 + i as f32))
            .collect();
        let mut store = ParticleStore::from_particles(particles.clone());
        let mut samples = Vec::new();

        let stats = sim.step(
            &mut store,
            Bounds::new(100.0, 100.0, 1.0),
            Vec2::new(50.0, 50.0),
            1,
            &mut samples,
        );

        assert_eq!(stats, StepStats { advanced: 4, respawned: 0 });
        for (index, before) in particles.iter().enumerate() {
            let after = store.get(index).unwrap();
            assert!((after.velocity.x - 0.015 * before.speed).abs() < 1e-6);
            assert!(after.velocity.y.abs() < 1e-6);
            assert!((after.position.x - (before.position.x + after.velocity.x)).abs() < 1e-4);
            assert_eq!(after.age, 1);
        }
    }

    #[test]
    fn test_samples_use_position_before_advance() {
        let mut sim = Simulator::new(config(1), ConstantNoise(0.0));
        let mut store =
            ParticleStore::from_particles(vec![Particle::at(Vec2::new(10.5, 20.25), 200, 5.0)]);
        let mut samples = Vec::new();
        sim.step(
            &mut store,
            Bounds::new(100.0, 100.0, 1.0),
            Vec2::new(50.0, 50.0),
            1,
            &mut samples,
        );
        assert_eq!(samples.len(), 1);
        assert_eq!((samples[0].x, samples[0].y), (10.5, 20.25));
        // age 1 / (200 / 2) * 255
        assert!((samples[0].alpha - 2.55).abs() < 1e-4);
    }

    #[test]
    fn test_out_of_bounds_respawns_regardless_of_lifetime() {
        let mut sim = Simulator::new(config(2), ConstantNoise(0.0));
        let mut store = ParticleStore::from_particles(vec![
            Particle::at(Vec2::new(0.0, 50.0), 299, 3.0),
            Particle::at(Vec2::new(50.0, 50.0), 299, 3.0),
        ]);
        let mut samples = Vec::new();
        let stats = sim.step(
            &mut store,
            Bounds::new(100.0, 100.0, 1.0),
            Vec2::new(50.0, 50.0),
            1,
            &mut samples,
        );

        assert_eq!(stats, StepStats { advanced: 1, respawned: 1 });
        let respawned = store.get(0).unwrap();
        assert_eq!(respawned.age, 0);
        assert_eq!(respawned.velocity, Vec2::ZERO);
        assert!(respawned.position.distance(Vec2::new(50.0, 50.0)) <= 250.0);
        // 重生的粒子本帧不绘制
        assert_eq!(samples.len(), 1);
        assert_eq!(samples[0].x, 50.0);
    }

    #[test]
    fn test_expired_particle_respawns() {
        let mut sim = Simulator::new(config(1), ConstantNoise(0.0));
        let mut particle = Particle::at(Vec2::new(50.0, 50.0), 120, 3.0);
        particle.age = 119;
        let mut store = ParticleStore::from_particles(vec![particle]);
        let mut samples = Vec::new();
        let stats = sim.step(
            &mut store,
            Bounds::new(100.0, 100.0, 1.0),
            Vec2::new(50.0, 50.0),
            7,
            &mut samples,
        );
        assert_eq!(stats.respawned, 1);
        assert!(samples.is_empty());
        assert_eq!(store.get(0).unwrap().age, 0);
    }

    #[test]
    fn test_bounds_edges() {
        let bounds = Bounds::new(100.0, 80.0, 1.0);
        assert!(bounds.contains(Vec2::new(1.0, 1.0)));
        assert!(bounds.contains(Vec2::new(99.0, 79.0)));
        assert!(!bounds.contains(Vec2::new(0.999, 40.0)));
        assert!(!bounds.contains(Vec2::new(99.001, 40.0)));
        assert!(!bounds.contains(Vec2::new(50.0, 79.5)));
        assert!(!bounds.contains(Vec2::new(f32::NAN, 40.0)));
    }

    #[test]
    fn test_populate_fills_capacity() {
        let mut sim = Simulator::new(config(128), ConstantNoise(0.0));
        let store = sim.populate(Vec2::new(300.0, 300.0));
        assert_eq!(store.len(), 128);
        store.for_each(|_, p| {
            assert_eq!(p.age, 0);
            assert!(p.position.distance(Vec2::new(300.0, 300.0)) <= 250.0 + 1e-3);
        });
    }
}
