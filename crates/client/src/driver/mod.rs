//! Seam to the external WebRTC driver
//!
//! The driver owns the hard parts: session negotiation, the reliable
//! request/response correlation over the data channel, and media track
//! transport. This module defines the surface the client needs from it
//! and nothing more. [`ReplayDriver`] is a scripted in-memory
//! implementation for tests and offline runs.

pub mod replay;

use std::path::Path;

use async_trait::async_trait;

use crate::api::{ApiRequest, ApiResponse};
use crate::video::VideoFrame;
use crate::Result;

pub use replay::ReplayDriver;

/// Callback receiving decoded video frames from the driver's track
/// callback. Invoked on a driver-owned thread; must not block.
pub type FrameHandler = Box<dyn Fn(VideoFrame) + Send + Sync>;

/// Surface of the external robot driver
#[async_trait]
pub trait Driver: Send + Sync {
    /// Establish the WebRTC session
    async fn connect(&self) -> Result<()>;

    /// Tear the session down
    async fn disconnect(&self) -> Result<()>;

    /// Publish a request to a service topic and await its response
    async fn request(&self, topic: &str, request: ApiRequest) -> Result<ApiResponse>;

    /// Enable or disable the robot's video track
    async fn set_video_channel(&self, enabled: bool) -> Result<()>;

    /// Register a callback for decoded video frames
    fn add_frame_handler(&self, handler: FrameHandler);

    /// Feed an audio file into the driver's outbound audio track
    async fn play_audio_file(&self, path: &Path) -> Result<()>;
}
