//! 效果上下文
//!
//! 挂载期间唯一拥有的状态：视口、中心、tick 计数、粒子存储、模拟器、
//! 离屏缓冲、可见画布与合成器。卸载时整体释放。

use crate::config::NebulaConfig;
use crate::core::error::RenderResult;
use crate::render::{Canvas, Compositor, OffscreenBuffer, Viewport};
use crate::simulation::{
    Bounds, NoiseField, ParticleSample, ParticleStore, Simulator, StepStats,
};
use glam::Vec2;

/// 效果上下文
pub struct NebulaContext {
    viewport: Viewport,
    center: Vec2,
    tick: u64,
    store: ParticleStore,
    simulator: Simulator,
    offscreen: OffscreenBuffer,
    canvas: Canvas,
    compositor: Compositor,
    samples: Vec<ParticleSample>,
}

impl NebulaContext {
    /// 按视口分配两层表面并填满粒子存储
    ///
    /// # 参数
    ///
    /// * `config` - 已验证的配置
    /// * `viewport` - 初始视口
    /// * `noise` - 噪声场
    pub fn new(config: &NebulaConfig, viewport: Viewport, noise: Box<dyn NoiseField>) -> Self {
        let center = viewport.center();
        let mut simulator = Simulator::new(config.simulation.clone(), noise);
        let store = simulator.populate(center);
        let samples = Vec::with_capacity(store.capacity());

        Self {
            viewport,
            center,
            tick: 0,
            store,
            simulator,
            offscreen: OffscreenBuffer::new(viewport),
            canvas: Canvas::new(viewport),
            compositor: Compositor::new(config.compositor.clone()),
            samples,
        }
    }

    /// 执行一帧：tick 加一、推进粒子、光栅化、合成
    ///
    /// # 错误
    ///
    /// 光栅化或合成失败时返回错误，此时画布可能只完成了部分绘制。
    pub fn render_frame(&mut self) -> RenderResult<StepStats> {
        self.tick += 1;
        let bounds = self.bounds();
        let stats = self.simulator.step(
            &mut self.store,
            bounds,
            self.center,
            self.tick,
            &mut self.samples,
        );
        self.offscreen.rasterize(&self.samples)?;
        self.compositor.composite(&mut self.canvas, &self.offscreen)?;
        Ok(stats)
    }

    /// 适配新视口
    ///
    /// 两层表面改为新尺寸并重新计算中心，粒子保持原状，越界的粒子会在下一帧重生。
    /// 尺寸不变时不做任何事。
    pub fn resize(&mut self, viewport: Viewport) -> bool {
        if self.viewport == viewport {
            return false;
        }
        self.viewport = viewport;
        self.center = viewport.center();
        self.offscreen.resize(viewport);
        self.canvas.resize(viewport);
        true
    }

    /// 当前存活区域
    pub fn bounds(&self) -> Bounds {
        Bounds::new(
            self.viewport.width as f32,
            self.viewport.height as f32,
            self.simulator.config().edge_margin,
        )
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn center(&self) -> Vec2 {
        self.center
    }

    pub fn tick(&self) -> u64 {
        self.tick
    }

    pub fn store(&self) -> &ParticleStore {
        &self.store
    }

    pub fn canvas(&self) -> &Canvas {
        &self.canvas
    }

    pub fn offscreen(&self) -> &OffscreenBuffer {
        &self.offscreen
    }

    /// 上一帧交给光栅化器的样本
    pub fn samples(&self) -> &[ParticleSample] {
        &self.samples
    }
}
