//! 帧调度
//!
//! 效果本身不拥有时钟，由宿主在显示刷新时回调。这里定义宿主接口、
//! 取消令牌以及一个进程内的手动宿主。
//!
//! ## 功能特性
//!
//! - 帧请求与取消
//! - 尺寸变化订阅
//! - 跨克隆共享的取消信号

use crate::render::Viewport;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// 帧请求句柄
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrameRequest(pub u64);

/// 尺寸变化订阅句柄
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ResizeListener(pub u64);

/// 宿主环境
///
/// 宿主负责在下一次刷新时交付已请求的帧，并在视口尺寸变化时通知订阅者。
/// 交付本身由宿主的事件循环完成，接口只描述登记与撤销。
pub trait FrameHost {
    /// 当前视口尺寸
    fn viewport(&self) -> Viewport;

    /// 请求下一帧
    fn request_frame(&mut self) -> FrameRequest;

    /// 撤销尚未交付的帧请求，已交付或未知的请求忽略
    fn cancel_frame(&mut self, request: FrameRequest);

    /// 订阅尺寸变化
    fn subscribe_resize(&mut self) -> ResizeListener;

    /// 取消订阅
    fn unsubscribe_resize(&mut self, listener: ResizeListener);
}

/// 取消令牌
///
/// 克隆共享同一个标志。取消只阻止之后的帧，不会中断正在执行的帧。
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    cancelled: Arc<AtomicBool>,
}

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// 发出取消信号
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}

/// 进程内宿主
///
/// 帧请求进入队列，由调用方通过 [`ManualHost::next_request`] 逐个取出后交给驱动器。
/// 用于测试、基准与无窗口渲染。
///
/// # 示例
///
/// ```rust
/// use nebula_field::core::scheduler::{FrameHost, ManualHost};
/// use nebula_field::render::Viewport;
///
/// let mut host = ManualHost::new(Viewport::new(320, 240));
/// let request = host.request_frame();
/// assert_eq!(host.next_request(), Some(request));
/// assert_eq!(host.next_request(), None);
/// ```
#[derive(Debug, Default)]
pub struct ManualHost {
    viewport: Viewport,
    pending: VecDeque<FrameRequest>,
    listeners: Vec<ResizeListener>,
    next_id: u64,
}

impl ManualHost {
    /// 创建指定视口的宿主
    pub fn new(viewport: Viewport) -> Self {
        Self {
            viewport,
            ..Self::default()
        }
    }

    /// 取出最早的待交付请求
    pub fn next_request(&mut self) -> Option<FrameRequest> {
        self.pending.pop_front()
    }

    /// 待交付请求数
    pub fn pending_frames(&self) -> usize {
        self.pending.len()
    }

    /// 是否存在尺寸订阅者
    pub fn has_resize_listeners(&self) -> bool {
        !self.listeners.is_empty()
    }

    /// 修改视口尺寸
    ///
    /// # 返回
    ///
    /// 尺寸确实变化且存在订阅者时返回新视口，调用方应据此通知驱动器。
    pub fn set_viewport(&mut self, viewport: Viewport) -> Option<Viewport> {
        let changed = self.viewport != viewport;
        self.viewport = viewport;
        (changed && self.has_resize_listeners()).then_some(viewport)
    }

    fn next_id(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }
}

impl FrameHost for ManualHost {
    fn viewport(&self) -> Viewport {
        self.viewport
    }

    fn request_frame(&mut self) -> FrameRequest {
        let request = FrameRequest(self.next_id());
        self.pending.push_back(request);
        request
    }

    fn cancel_frame(&mut self, request: FrameRequest) {
        self.pending.retain(|pending| *pending != request);
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cancellation_token_shared_between_clones() {
        let token = CancellationToken::new();
        let clone = token.clone();
        assert!(!clone.is_cancelled());
        token.cancel();
        assert!(clone.is_cancelled());
    }

    #[test]
    fn test_requests_delivered_in_order() {
        let mut host = ManualHost::new(Viewport::new(10, 10));
        let a = host.request_frame();
        let b = host.request_frame();
        assert_ne!(a, b);
        assert_eq!(host.next_request(), Some(a));
        assert_eq!(host.next_request(), Some(b));
        assert_eq!(host.pending_frames(), 0);
    }

    #[test]
    fn test_cancel_removes_pending_request() {
        let mut host = ManualHost::new(Viewport::new(10, 10));
        let a = host.request_frame();
        host.cancel_frame(a);
        host.cancel_frame(a);
        assert_eq!(host.next_request(), None);
    }

    #[test]
    fn test_resize_notifications_require_listener() {
        let mut host = ManualHost::new(Viewport::new(10, 10));
        assert_eq!(host.set_viewport(Viewport::new(20, 10)), None);

        let listener = host.subscribe_resize();
        assert_eq!(host.set_viewport(Viewport::new(20, 10)), None);
        assert_eq!(
            host.set_viewport(Viewport::new(30, 10)),
            Some(Viewport::new(30, 10))
        );

        host.unsubscribe_resize(listener);
        assert!(!host.has_resize_listeners());
        assert_eq!(host.set_viewport(Viewport::new(40, 10)), None);
    }
}
