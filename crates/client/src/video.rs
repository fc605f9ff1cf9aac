//! Video display loop
//!
//! The driver decodes the robot's camera track and hands frames to a
//! registered callback. Frames cross into a bounded drop-oldest queue
//! and a dedicated render thread drains it into a [`FrameSink`]. The
//! queue is bounded so a slow sink costs freshness, not memory; the
//! dropped-frame count is kept for diagnostics.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;

use bytes::Bytes;
use parking_lot::{Condvar, Mutex};
use tracing::{debug, warn};

use crate::driver::Driver;
use crate::{Error, Result};

/// A decoded BGR24 camera frame
#[derive(Debug, Clone)]
pub struct VideoFrame {
    /// Packed BGR24 pixel data, `width * height * 3` bytes
    pub data: Bytes,

    /// Frame width in pixels
    pub width: u32,

    /// Frame height in pixels
    pub height: u32,
}

impl VideoFrame {
    /// Build a frame, validating the pixel buffer length
    pub fn bgr24(width: u32, height: u32, data: Bytes) -> Result<Self> {
        let expected = width as usize * height as usize * 3;
        if data.len() != expected {
            return Err(Error::Video(format!(
                "bgr24 buffer is {} bytes, expected {} for {}x{}",
                data.len(),
                expected,
                width,
                height
            )));
        }
        Ok(Self {
            data,
            width,
            height,
        })
    }
}

/// Verdict a sink returns for each frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SinkControl {
    /// Keep rendering
    Continue,
    /// Stop the render thread
    Stop,
}

/// Consumer of frames on the render thread
pub trait FrameSink: Send {
    /// Handle one frame; runs on the dedicated render thread
    fn on_frame(&mut self, frame: VideoFrame) -> SinkControl;
}

impl<F> FrameSink for F
where
    F: FnMut(VideoFrame) -> SinkControl + Send,
{
    fn on_frame(&mut self, frame: VideoFrame) -> SinkControl {
        self(frame)
    }
}

struct QueueInner {
    frames: VecDeque<VideoFrame>,
    closed: bool,
}

/// Bounded frame queue with drop-oldest policy
pub(crate) struct FrameQueue {
    inner: Mutex<QueueInner>,
    available: Condvar,
    capacity: usize,
    dropped: AtomicU64,
}

impl FrameQueue {
    pub(crate) fn new(capacity: usize) -> Self {
        Self {
            inner: Mutex::new(QueueInner {
                frames: VecDeque::with_capacity(capacity),
                closed: false,
            }),
            available: Condvar::new(),
            capacity,
            dropped: AtomicU64::new(0),
        }
    }

    /// Push a frame, dropping oldest if the queue is full
    pub(crate) fn push(&self, frame: VideoFrame) {
        let mut inner = self.inner.lock();
        if inner.closed {
            return;
        }

        let mut dropped_now = 0u64;
        while inner.frames.len() >= self.capacity {
            inner.frames.pop_front();
            dropped_now += 1;
        }
        if dropped_now > 0 {
            let total = self.dropped.fetch_add(dropped_now, Ordering::Relaxed) + dropped_now;
            warn!(
                dropped = dropped_now,
                total_dropped = total,
                capacity = self.capacity,
                "display queue overflow, dropped oldest frames"
            );
        }

        inner.frames.push_back(frame);
        drop(inner);
        self.available.notify_one();
    }

    /// Block until a frame is available; `None` once closed and drained
    pub(crate) fn pop(&self) -> Option<VideoFrame> {
        let mut inner = self.inner.lock();
        loop {
            if let Some(frame) = inner.frames.pop_front() {
                return Some(frame);
            }
            if inner.closed {
                return None;
            }
            self.available.wait(&mut inner);
        }
    }

    /// Unblock the consumer and refuse further frames
    pub(crate) fn close(&self) {
        self.inner.lock().closed = true;
        self.available.notify_all();
    }

    pub(crate) fn dropped(&self) -> u64 {
        self.dropped.load(Ordering::Relaxed)
    }

    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.inner.lock().frames.len()
    }
}

/// A running display loop
///
/// Created by [`Go2Client::start_video`](crate::Go2Client::start_video).
/// Dropping the handle without calling [`stop`](VideoSession::stop)
/// leaves the render thread running until the sink asks to stop.
pub struct VideoSession {
    queue: Arc<FrameQueue>,
    render: Option<JoinHandle<()>>,
    driver: Arc<dyn Driver>,
}

impl VideoSession {
    /// Enable the driver's video channel and spawn the render thread
    pub(crate) async fn start(
        driver: Arc<dyn Driver>,
        queue_capacity: usize,
        mut sink: Box<dyn FrameSink>,
    ) -> Result<Self> {
        driver.set_video_channel(true).await?;

        let queue = Arc::new(FrameQueue::new(queue_capacity));
        let producer = Arc::clone(&queue);
        driver.add_frame_handler(Box::new(move |frame| producer.push(frame)));

        let consumer = Arc::clone(&queue);
        let render = std::thread::Builder::new()
            .name("go2-video".to_string())
            .spawn(move || {
                while let Some(frame) = consumer.pop() {
                    if sink.on_frame(frame) == SinkControl::Stop {
                        debug!("frame sink requested stop");
                        break;
                    }
                }
            })
            .map_err(|e| Error::Video(format!("failed to spawn render thread: {e}")))?;

        Ok(Self {
            queue,
            render: Some(render),
            driver,
        })
    }

    /// Frames dropped to the bounded queue so far
    pub fn dropped_frames(&self) -> u64 {
        self.queue.dropped()
    }

    /// Disable the video channel, stop the render thread, and join it
    pub async fn stop(mut self) -> Result<()> {
        self.queue.close();
        if let Some(handle) = self.render.take() {
            tokio::task::spawn_blocking(move || handle.join())
                .await
                .map_err(|e| Error::Video(format!("render thread join failed: {e}")))?
                .map_err(|_| Error::Video("render thread panicked".to_string()))?;
        }
        self.driver.set_video_channel(false).await
    }
}

impl Drop for VideoSession {
    fn drop(&mut self) {
        // Unblocks the render thread if stop() was never awaited.
        self.queue.close();
    }
}
