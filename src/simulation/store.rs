//! SoA (Structure of Arrays) 粒子存储
//!
//! 每个字段一列，按索引随机读写 O(1)。容量在构造时确定，之后既不增长也不收缩；
//! 每个槽位始终保存一个粒子，失效粒子在原槽位被替换。

use super::particle::Particle;
use glam::Vec2;

/// 固定容量的列式粒子存储
#[derive(Debug, Clone)]
pub struct ParticleStore {
    /// 位置列
    positions: Vec<Vec2>,
    /// 速度列
    velocities: Vec<Vec2>,
    /// 透明度列
    alphas: Vec<f32>,
    /// 年龄列
    ages: Vec<u32>,
    /// 寿命列
    lifetimes: Vec<u32>,
    /// 速度系数列
    speeds: Vec<f32>,
    /// 颜色列
    colors: Vec<[i32; 3]>,
}

impl ParticleStore {
    /// 以生成函数填满 `capacity` 个槽位
    pub fn populate<F>(capacity: usize, mut f: F) -> Self
    where
        F: FnMut(usize) -> Particle,
    {
        let mut store = Self::with_capacity(capacity);
        for index in 0..capacity {
            store.push(f(index));
        }
        store
    }

    /// 由现成的粒子列表构建，容量即列表长度
    pub fn from_particles(particles: Vec<Particle>) -> Self {
        let mut store = Self::with_capacity(particles.len());
        for particle in particles {
            store.push(particle);
        }
        store
    }

    fn with_capacity(capacity: usize) -> Self {
        Self {
            positions: Vec::with_capacity(capacity),
            velocities: Vec::with_capacity(capacity),
            alphas: Vec::with_capacity(capacity),
            ages: Vec::with_capacity(capacity),
            lifetimes: Vec::with_capacity(capacity),
            speeds: Vec::with_capacity(capacity),
            colors: Vec::with_capacity(capacity),
        }
    }

    // 仅在构造阶段使用
    fn push(&mut self, particle: Particle) {
        self.positions.push(particle.position);
        self.velocities.push(particle.velocity);
        self.alphas.push(particle.alpha);
        self.ages.push(particle.age);
        self.lifetimes.push(particle.lifetime);
        self.speeds.push(particle.speed);
        self.colors.push(particle.color);
    }

    /// 槽位数量（恒等于容量）
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    /// 是否为空（仅当容量为 0）
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// 容量
    pub fn capacity(&self) -> usize {
        self.len()
    }

    /// 读取槽位
    pub fn get(&self, index: usize) -> Option<Particle> {
        if index >= self.len() {
            return None;
        }
        Some(Particle {
            position: self.positions[index],
            velocity: self.velocities[index],
            alpha: self.alphas[index],
            age: self.ages[index],
            lifetime: self.lifetimes[index],
            speed: self.speeds[index],
            color: self.colors[index],
        })
    }

    /// 写入槽位
    ///
    /// # 返回
    ///
    /// 索引越界时返回`false`且不做任何修改。
    pub fn set(&mut self, index: usize, particle: Particle) -> bool {
        if index >= self.len() {
            return false;
        }
        self.positions[index] = particle.position;
        self.velocities[index] = particle.velocity;
        self.alphas[index] = particle.alpha;
        self.ages[index] = particle.age;
        self.lifetimes[index] = particle.lifetime;
        self.speeds[index] = particle.speed;
        self.colors[index] = particle.color;
        true
    }

    /// 按索引升序只读遍历，每个槽位恰好一次
    pub fn for_each<F>(&self, mut f: F)
    where
        F: FnMut(usize, Particle),
    {
        for index in 0..self.len() {
            if let Some(particle) = self.get(index) {
                f(index, particle);
            }
        }
    }

    /// 按索引升序遍历并以返回值替换槽位，每个槽位恰好一次
    pub fn update_each<F>(&mut self, mut f: F)
    where
        F: FnMut(usize, Particle) -> Particle,
    {
        for index in 0..self.len() {
            if let Some(particle) = self.get(index) {
                let updated = f(index, particle);
                self.set(index, updated);
            }
        }
    }

    /// 位置列
    pub fn positions(&self) -> &[Vec2] {
        &self.positions
    }

    /// 速度列
    pub fn velocities(&self) -> &[Vec2] {
        &self.velocities
    }

    /// 年龄列
    pub fn ages(&self) -> &[u32] {
        &self.ages
    }

    /// 寿命列
    pub fn lifetimes(&self) -> &[u32] {
        &self.lifetimes
    }

    /// 颜色列
    pub fn colors(&self) -> &[[i32; 3]] {
        &self.colors
    }
}
