//! 帧驱动器
//!
//! 把效果上下文挂到宿主上，按宿主的刷新节奏逐帧推进。
//!
//! ```text
//!   host ──request──► pending ──on_frame──► request next ──► render_frame
//!                                                              │
//!                                           Ok ◄───────────────┤
//!                                  Err / panic ──► cancel + Halted
//! ```
//!
//! 下一帧总是在本帧工作开始之前请求；单帧失败时撤销这次请求并停止调度。

use super::context::NebulaContext;
use super::error::{NebulaError, NebulaResult, RenderError};
use super::scheduler::{CancellationToken, FrameHost, FrameRequest, ManualHost, ResizeListener};
use crate::config::NebulaConfig;
use crate::render::{Canvas, Viewport};
use crate::simulation::{NoiseField, SimplexNoise, StepStats};
use std::any::Any;
use std::panic::{self, AssertUnwindSafe};

/// 驱动器状态
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriverState {
    /// 正常调度中
    Running,
    /// 某一帧失败后停止，画布保留最后一次成功绘制的内容
    Halted,
}

/// 单次帧回调的结果
#[derive(Debug, Clone, PartialEq)]
pub enum FrameOutcome {
    /// 本帧完成
    Rendered(StepStats),
    /// 过期、已撤销或停止后的请求，未做任何工作
    Ignored,
    /// 本帧失败，循环已停止
    Halted(RenderError),
}

/// 帧驱动器
pub struct FrameDriver {
    context: NebulaContext,
    pending: Option<FrameRequest>,
    listener: Option<ResizeListener>,
    token: CancellationToken,
    state: DriverState,
    last_error: Option<RenderError>,
}

impl FrameDriver {
    /// 挂载效果，噪声场使用 OpenSimplex
    ///
    /// 配置中未指定种子时噪声与出生采样各自随机取种。
    ///
    /// # 错误
    ///
    /// 配置验证失败时返回 `NebulaError::Config`，宿主状态不变。
    pub fn mount<H: FrameHost + ?Sized>(host: &mut H, config: &NebulaConfig) -> NebulaResult<Self> {
        let seed = match config.simulation.seed {
            Some(seed) => (seed ^ (seed >> 32)) as u32,
            None => rand::random(),
        };
        Self::mount_with_noise(host, config, Box::new(SimplexNoise::new(seed)))
    }

    /// 以指定噪声场挂载效果
    ///
    /// # 参数
    ///
    /// * `host` - 宿主环境
    /// * `config` - 配置，挂载前先验证
    /// * `noise` - 噪声场
    ///
    /// # 错误
    ///
    /// 配置验证失败时返回 `NebulaError::Config`。
    pub fn mount_with_noise<H: FrameHost + ?Sized>(
        host: &mut H,
        config: &NebulaConfig,
        noise: Box<dyn NoiseField>,
    ) -> NebulaResult<Self> {
        config.validate()?;

        let viewport = host.viewport();
        let context = NebulaContext::new(config, viewport, noise);
        let listener = host.subscribe_resize();
        let pending = host.request_frame();

        tracing::info!(
            target: "nebula::driver",
            width = viewport.width,
            height = viewport.height,
            particles = context.store().len(),
            "nebula mounted"
        );

        Ok(Self {
            context,
            pending: Some(pending),
            listener: Some(listener),
            token: CancellationToken::new(),
            state: DriverState::Running,
            last_error: None,
        })
    }

    /// 宿主交付一帧
    ///
    /// 只处理最近一次请求；其余请求（过期的、已撤销的、停止之后的）直接忽略。
    /// 失败不会向外传播：无论是返回错误还是 panic，都会撤销已登记的下一帧、
    /// 取消令牌并进入 `Halted`。
    pub fn on_frame<H: FrameHost + ?Sized>(
        &mut self,
        host: &mut H,
        request: FrameRequest,
    ) -> FrameOutcome {
        if self.state != DriverState::Running
            || self.token.is_cancelled()
            || self.pending != Some(request)
        {
            return FrameOutcome::Ignored;
        }

        self.pending = Some(host.request_frame());

        let context = &mut self.context;
        let result = panic::catch_unwind(AssertUnwindSafe(|| context.render_frame()))
            .unwrap_or_else(|payload| Err(RenderError::TickPanicked(panic_message(payload))));

        match result {
            Ok(stats) => FrameOutcome::Rendered(stats),
            Err(err) => {
                self.halt(host, err.clone());
                FrameOutcome::Halted(err)
            }
        }
    }

    /// 从手动宿主取出一个请求并交付
    ///
    /// 队列为空时返回 `None`。
    pub fn pump(&mut self, host: &mut ManualHost) -> Option<FrameOutcome> {
        let request = host.next_request()?;
        Some(self.on_frame(host, request))
    }

    /// 视口尺寸变化
    ///
    /// # 返回
    ///
    /// 尺寸确实变化时返回 `true`。
    pub fn on_resize(&mut self, viewport: Viewport) -> bool {
        let changed = self.context.resize(viewport);
        if changed {
            tracing::debug!(
                target: "nebula::driver",
                width = viewport.width,
                height = viewport.height,
                "viewport resized"
            );
        }
        changed
    }

    /// 卸载效果并释放全部状态
    pub fn unmount<H: FrameHost + ?Sized>(mut self, host: &mut H) {
        if let Some(pending) = self.pending.take() {
            host.cancel_frame(pending);
        }
        if let Some(listener) = self.listener.take() {
            host.unsubscribe_resize(listener);
        }
        self.token.cancel();
        tracing::info!(target: "nebula::driver", tick = self.context.tick(), "nebula unmounted");
    }

    fn halt<H: FrameHost + ?Sized>(&mut self, host: &mut H, err: RenderError) {
        if let Some(pending) = self.pending.take() {
            host.cancel_frame(pending);
        }
        self.token.cancel();
        self.state = DriverState::Halted;
        tracing::error!(
            target: "nebula::driver",
            tick = self.context.tick(),
            error = %err,
            "frame failed, animation halted"
        );
        self.last_error = Some(err);
    }

    pub fn state(&self) -> DriverState {
        self.state
    }

    /// 导致停止的错误
    pub fn last_error(&self) -> Option<&RenderError> {
        self.last_error.as_ref()
    }

    /// 已完成（或已开始）的帧数
    pub fn tick(&self) -> u64 {
        self.context.tick()
    }

    /// 等待交付的帧请求
    pub fn pending_request(&self) -> Option<FrameRequest> {
        self.pending
    }

    /// 取消令牌的共享句柄
    pub fn token(&self) -> CancellationToken {
        self.token.clone()
    }

    pub fn canvas(&self) -> &Canvas {
        self.context.canvas()
    }

    pub fn context(&self) -> &NebulaContext {
        &self.context
    }
}

/// 不开窗口渲染指定帧数，返回最终画布
///
/// # 错误
///
/// 配置无效或任一帧失败时返回错误。
pub fn render_headless(
    config: &NebulaConfig,
    viewport: Viewport,
    frames: u32,
) -> NebulaResult<Canvas> {
    let mut host = ManualHost::new(viewport);
    let mut driver = FrameDriver::mount(&mut host, config)?;

    for _ in 0..frames {
        match driver.pump(&mut host) {
            Some(FrameOutcome::Halted(err)) => return Err(NebulaError::Render(err)),
            Some(_) => {}
            None => break,
        }
    }

    let canvas = driver.canvas().clone();
    driver.unmount(&mut host);
    Ok(canvas)
}

fn panic_message(payload: Box<dyn Any + Send>) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic payload".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simulation::ConstantNoise;

    struct FailingNoise;

    impl NoiseField for FailingNoise {
        fn sample(&self, _x: f64, _y: f64, _t: f64) -> f64 {
            panic!("noise backend failed")
        }
    }

    fn config(count: usize) -> NebulaConfig {
        let mut config = NebulaConfig::default();
        config.simulation.particle_count = count;
        config.simulation.seed = Some(99);
        config
    }

    #[test]
    fn test_mount_requests_first_frame_and_subscribes() {
        let mut host = ManualHost::new(Viewport::new(400, 300));
        let driver = FrameDriver::mount(&mut host, &config(16)).unwrap();
        assert_eq!(host.pending_frames(), 1);
        assert!(host.has_resize_listeners());
        assert_eq!(driver.state(), DriverState::Running);
        assert_eq!(driver.tick(), 0);
    }

    #[test]
    fn test_mount_rejects_invalid_config() {
        let mut host = ManualHost::new(Viewport::new(400, 300));
        let result = FrameDriver::mount(&mut host, &config(0));
        assert!(matches!(result, Err(NebulaError::Config(_))));
        assert_eq!(host.pending_frames(), 0);
        assert!(!host.has_resize_listeners());
    }

    #[test]
    fn test_next_frame_requested_before_work() {
        let mut host = ManualHost::new(Viewport::new(400, 300));
        let mut driver =
            FrameDriver::mount_with_noise(&mut host, &config(16), Box::new(ConstantNoise(0.0)))
                .unwrap();

        let outcome = driver.pump(&mut host).unwrap();
        assert!(matches!(outcome, FrameOutcome::Rendered(_)));
        assert_eq!(driver.tick(), 1);
        assert_eq!(host.pending_frames(), 1);
        assert_eq!(driver.pending_request(), host.next_request());
    }

    #[test]
    fn test_stale_request_is_ignored() {
        let mut host = ManualHost::new(Viewport::new(400, 300));
        let mut driver =
            FrameDriver::mount_with_noise(&mut host, &config(16), Box::new(ConstantNoise(0.0)))
                .unwrap();
        let first = host.next_request().unwrap();
        driver.on_frame(&mut host, first);

        assert_eq!(driver.on_frame(&mut host, first), FrameOutcome::Ignored);
        assert_eq!(driver.tick(), 1);
    }

    #[test]
    fn test_panicking_frame_halts_loop() {
        let mut host = ManualHost::new(Viewport::new(600, 600));
        let mut driver =
            FrameDriver::mount_with_noise(&mut host, &config(8), Box::new(FailingNoise)).unwrap();
        let token = driver.token();

        let outcome = driver.pump(&mut host).unwrap();
        assert_eq!(
            outcome,
            FrameOutcome::Halted(RenderError::TickPanicked("noise backend failed".into()))
        );
        assert_eq!(driver.state(), DriverState::Halted);
        assert!(token.is_cancelled());
        assert!(driver.last_error().is_some());
        // 本帧开头登记的下一帧已被撤销
        assert_eq!(host.pending_frames(), 0);
        assert_eq!(driver.pending_request(), None);

        let late = host.request_frame();
        assert_eq!(driver.on_frame(&mut host, late), FrameOutcome::Ignored);
    }

    #[test]
    fn test_resize_is_idempotent() {
        let mut host = ManualHost::new(Viewport::new(400, 300));
        let mut driver =
            FrameDriver::mount_with_noise(&mut host, &config(16), Box::new(ConstantNoise(0.0)))
                .unwrap();
        assert!(!driver.on_resize(Viewport::new(400, 300)));
        assert!(driver.on_resize(Viewport::new(800, 600)));
        assert!(!driver.on_resize(Viewport::new(800, 600)));
        assert_eq!(driver.canvas().viewport(), Viewport::new(800, 600));
    }

    #[test]
    fn test_unmount_releases_host_resources() {
        let mut host = ManualHost::new(Viewport::new(400, 300));
        let driver = FrameDriver::mount(&mut host, &config(16)).unwrap();
        let token = driver.token();
        driver.unmount(&mut host);
        assert_eq!(host.pending_frames(), 0);
        assert!(!host.has_resize_listeners());
        assert!(token.is_cancelled());
    }

    #[test]
    fn test_render_headless() {
        let canvas = render_headless(&config(500), Viewport::new(320, 240), 10).unwrap();
        assert_eq!(canvas.viewport(), Viewport::new(320, 240));
    }
}
