//! winit 宿主
//!
//! 帧请求映射为 `Window::request_redraw`，在 `RedrawRequested` 时交付；
//! 尺寸通知来自 `WindowEvent::Resized`。视口以逻辑像素计。

use super::present::WgpuPresenter;
use crate::config::NebulaConfig;
use crate::core::driver::{FrameDriver, FrameOutcome};
use crate::core::error::{NebulaError, NebulaResult, PlatformError};
use crate::core::scheduler::{FrameHost, FrameRequest, ResizeListener};
use crate::render::Viewport;
use std::sync::Arc;
use winit::dpi::LogicalSize;
use winit::event::{Event, WindowEvent};
use winit::event_loop::EventLoop;
use winit::window::{Window, WindowBuilder};

/// 以 winit 窗口为宿主
pub struct WinitHost {
    window: Arc<Window>,
    pending: Option<FrameRequest>,
    listeners: Vec<ResizeListener>,
    next_id: u64,
}

impl WinitHost {
    pub fn new(window: Arc<Window>) -> Self {
        Self {
            window,
            pending: None,
            listeners: Vec::new(),
            next_id: 0,
        }
    }

    /// 取出待交付的帧请求，在 `RedrawRequested` 时调用
    pub fn take_frame(&mut self) -> Option<FrameRequest> {
        self.pending.take()
    }

    pub fn has_resize_listeners(&self) -> bool {
        !self.listeners.is_empty()
    }

    fn next_id(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }
}

impl FrameHost for WinitHost {
    fn viewport(&self) -> Viewport {
        let logical: LogicalSize<f64> = self
            .window
            .inner_size()
            .to_logical(self.window.scale_factor());
        Viewport::new(logical.width.round() as u32, logical.height.round() as u32)
    }

    fn request_frame(&mut self) -> FrameRequest {
        let request = FrameRequest(self.next_id());
        self.pending = Some(request);
        self.window.request_redraw();
        request
    }

    fn cancel_frame(&mut self, request: FrameRequest) {
        if self.pending == Some(request) {
            self.pending = None;
        }
    }

    fn subscribe_resize(&mut self) -> ResizeListener {
        let listener = ResizeListener(self.next_id());
        self.listeners.push(listener);
        listener
    }

    fn unsubscribe_resize(&mut self, listener: ResizeListener) {
        self.listeners.retain(|l| *l != listener);
    }
}

/// 打开窗口并运行效果，直到窗口关闭
///
/// # 错误
///
/// 事件循环、窗口、GPU 初始化或挂载失败时返回错误。单帧失败只会停止动画，
/// 窗口保持打开。
pub fn run(config: NebulaConfig) -> NebulaResult<()> {
    let event_loop =
        EventLoop::new().map_err(|e| PlatformError::EventLoop(e.to_string()))?;
    let window = Arc::new(
        WindowBuilder::new()
            .with_title(config.window.title.clone())
            .with_inner_size(LogicalSize::new(config.window.width, config.window.height))
            .build(&event_loop)
            .map_err(|e| PlatformError::WindowCreation(e.to_string()))?,
    );

    let mut presenter = pollster::block_on(WgpuPresenter::new(window.clone()))?;
    let mut host = WinitHost::new(window.clone());
    let mut driver = Some(FrameDriver::mount(&mut host, &config)?);

    tracing::info!(
        target: "nebula::platform",
        width = config.window.width,
        height = config.window.height,
        "window opened"
    );

    event_loop
        .run(move |event, elwt| {
            let Event::WindowEvent { window_id, event } = event else {
                return;
            };
            if window_id != window.id() {
                return;
            }
            match event {
                WindowEvent::CloseRequested => {
                    if let Some(driver) = driver.take() {
                        driver.unmount(&mut host);
                    }
                    elwt.exit();
                }
                WindowEvent::Resized(size) => {
                    presenter.resize(size);
                    if host.has_resize_listeners() {
                        if let Some(driver) = driver.as_mut() {
                            driver.on_resize(host.viewport());
                        }
                    }
                }
                WindowEvent::RedrawRequested => {
                    let (Some(driver), Some(request)) = (driver.as_mut(), host.take_frame())
                    else {
                        return;
                    };
                    if let FrameOutcome::Rendered(_) = driver.on_frame(&mut host, request) {
                        if let Err(e) = presenter.present(&driver.canvas().to_rgba8_over_black()) {
                            tracing::error!(target: "nebula::platform", error = %e, "present failed");
                            elwt.exit();
                        }
                    }
                }
                _ => {}
            }
        })
        .map_err(|e| NebulaError::EventLoop(e.to_string()))
}
