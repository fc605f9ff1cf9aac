//! Scripted in-memory driver
//!
//! Answers requests from a canned response table and records every
//! request verbatim, so tests can assert the exact parameter shapes
//! the facade puts on the wire. The demos run against it too, which
//! keeps them runnable without a robot on the network.

use std::collections::{HashMap, VecDeque};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;
use tracing::debug;

use crate::api::{motion, topics, vui, ApiRequest, ApiResponse};
use crate::driver::{Driver, FrameHandler};
use crate::video::VideoFrame;
use crate::Result;

#[derive(Default)]
struct ReplayState {
    /// Canned responses keyed by (topic, api_id), popped in order
    script: HashMap<(String, u32), VecDeque<ApiResponse>>,
    /// Every request the facade published, in order
    sent: Vec<(String, ApiRequest)>,
    /// Audio files handed to the driver
    played: Vec<PathBuf>,
    connected: bool,
    video_enabled: bool,
}

/// In-memory [`Driver`] answering from a scripted response table
#[derive(Default)]
pub struct ReplayDriver {
    state: Mutex<ReplayState>,
    frame_handlers: Mutex<Vec<Arc<FrameHandler>>>,
}

impl ReplayDriver {
    /// An empty driver; unscripted requests are answered as accepted
    pub fn new() -> Self {
        Self::default()
    }

    /// A driver pre-scripted with the robot's typical idle state:
    /// normal mode, volume 5, brightness 5
    pub fn with_defaults() -> Self {
        let driver = Self::new();
        driver.script_mode("normal");
        driver.script_volume(5);
        driver.script_brightness(5);
        driver
    }

    /// Queue a canned response for the next request matching
    /// (topic, api_id)
    pub fn script(&self, topic: &str, api_id: u32, response: ApiResponse) {
        self.state
            .lock()
            .script
            .entry((topic.to_string(), api_id))
            .or_default()
            .push_back(response);
    }

    /// Queue a mode query response reporting `mode`
    pub fn script_mode(&self, mode: &str) {
        let response =
            ApiResponse::with_data(&serde_json::json!({"name": mode})).expect("static payload");
        self.script(topics::MOTION_SWITCHER, motion::GET_MODE, response);
    }

    /// Queue a volume query response reporting `level`
    pub fn script_volume(&self, level: u8) {
        let response =
            ApiResponse::with_data(&serde_json::json!({"volume": level})).expect("static payload");
        self.script(topics::VUI, vui::GET_VOLUME, response);
    }

    /// Queue a brightness query response reporting `level`
    pub fn script_brightness(&self, level: u8) {
        let response = ApiResponse::with_data(&serde_json::json!({"brightness": level}))
            .expect("static payload");
        self.script(topics::VUI, vui::GET_BRIGHTNESS, response);
    }

    /// Requests recorded so far, oldest first
    pub fn sent(&self) -> Vec<(String, ApiRequest)> {
        self.state.lock().sent.clone()
    }

    /// Audio files handed to the driver, oldest first
    pub fn played(&self) -> Vec<PathBuf> {
        self.state.lock().played.clone()
    }

    /// Whether the video track is currently enabled
    pub fn video_enabled(&self) -> bool {
        self.state.lock().video_enabled
    }

    /// Push a frame through every registered handler, as the real
    /// driver's track callback would
    pub fn emit_frame(&self, frame: VideoFrame) {
        let handlers: Vec<_> = self.frame_handlers.lock().iter().cloned().collect();
        for handler in handlers {
            (*handler)(frame.clone());
        }
    }
}

#[async_trait]
impl Driver for ReplayDriver {
    async fn connect(&self) -> Result<()> {
        self.state.lock().connected = true;
        debug!("replay driver connected");
        Ok(())
    }

    async fn disconnect(&self) -> Result<()> {
        self.state.lock().connected = false;
        Ok(())
    }

    async fn request(&self, topic: &str, request: ApiRequest) -> Result<ApiResponse> {
        let mut state = self.state.lock();
        let api_id = request.api_id;
        state.sent.push((topic.to_string(), request));
        let response = state
            .script
            .get_mut(&(topic.to_string(), api_id))
            .and_then(|queue| queue.pop_front())
            .unwrap_or_else(ApiResponse::accepted);
        debug!(topic, api_id, ok = response.is_ok(), "replay response");
        Ok(response)
    }

    async fn set_video_channel(&self, enabled: bool) -> Result<()> {
        self.state.lock().video_enabled = enabled;
        Ok(())
    }

    fn add_frame_handler(&self, handler: FrameHandler) {
        self.frame_handlers.lock().push(Arc::new(handler));
    }

    async fn play_audio_file(&self, path: &Path) -> Result<()> {
        self.state.lock().played.push(path.to_path_buf());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn scripted_responses_pop_in_order() {
        let driver = ReplayDriver::new();
        driver.script(topics::VUI, vui::GET_VOLUME, ApiResponse::rejected(1));
        driver.script_volume(9);

        let first = driver
            .request(topics::VUI, ApiRequest::bare(vui::GET_VOLUME))
            .await
            .unwrap();
        assert!(!first.is_ok());

        let second = driver
            .request(topics::VUI, ApiRequest::bare(vui::GET_VOLUME))
            .await
            .unwrap();
        let state: vui::VolumeState = second.decode().unwrap();
        assert_eq!(state.volume, 9);
    }

    #[tokio::test]
    async fn unscripted_requests_are_accepted() {
        let driver = ReplayDriver::new();
        let response = driver
            .request(topics::SPORT, ApiRequest::bare(1016))
            .await
            .unwrap();
        assert!(response.is_ok());
        assert_eq!(driver.sent().len(), 1);
    }
}
