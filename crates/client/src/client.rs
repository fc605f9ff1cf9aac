//! The robot client facade
//!
//! [`Go2Client`] shapes command parameters, awaits the driver's
//! responses, and caches the scalar state it last saw (motion mode,
//! volume, brightness). The cache reflects the last value sent or
//! fetched; nothing here polls the robot behind the caller's back.

use std::path::Path;
use std::sync::Arc;

use parking_lot::Mutex;
use serde_json::json;
use tracing::{debug, info};

use crate::api::{motion, sport, topics, vui, ApiRequest, ApiResponse};
use crate::config::ClientConfig;
use crate::driver::Driver;
use crate::video::{FrameSink, VideoSession};
use crate::{Error, Result};

#[derive(Debug, Default, Clone, Copy)]
struct CachedState {
    mode: Option<motion::MotionMode>,
    volume: Option<u8>,
    brightness: Option<u8>,
}

/// Named motion, audio, and lighting control over an external driver
pub struct Go2Client {
    driver: Arc<dyn Driver>,
    config: ClientConfig,
    cached: Mutex<CachedState>,
}

impl Go2Client {
    /// Create a client over a driver handle
    pub fn new(driver: Arc<dyn Driver>, config: ClientConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            driver,
            config,
            cached: Mutex::new(CachedState::default()),
        })
    }

    /// Create a client with the default configuration
    pub fn with_defaults(driver: Arc<dyn Driver>) -> Self {
        Self {
            driver,
            config: ClientConfig::default(),
            cached: Mutex::new(CachedState::default()),
        }
    }

    /// The configuration this client runs with
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Connect the driver and make sure the robot is in normal mode
    pub async fn connect(&self) -> Result<()> {
        self.driver.connect().await?;
        info!(method = ?self.config.method, "driver connected");
        self.switch_mode(motion::MotionMode::Normal).await
    }

    /// Tear the driver session down
    pub async fn disconnect(&self) -> Result<()> {
        self.driver.disconnect().await
    }

    /// Publish a request, await its response, and check the status code
    async fn send(&self, topic: &'static str, request: ApiRequest) -> Result<ApiResponse> {
        let api_id = request.api_id;
        debug!(topic, api_id, "sending request");

        let deadline = self.config.request_timeout;
        let response = tokio::time::timeout(deadline, self.driver.request(topic, request))
            .await
            .map_err(|_| Error::RequestTimeout {
                timeout_ms: deadline.as_millis() as u64,
                context: format!("api {api_id} on {topic}"),
            })??;

        if !response.is_ok() {
            return Err(Error::CommandRejected {
                topic: topic.to_string(),
                api_id,
                code: response.header.status.code,
            });
        }
        Ok(response)
    }

    // =========================================================================
    // Motion
    // =========================================================================

    /// Query the active motion mode from the motion switcher
    pub async fn motion_mode(&self) -> Result<motion::MotionMode> {
        let response = self
            .send(topics::MOTION_SWITCHER, ApiRequest::bare(motion::GET_MODE))
            .await?;
        let state: motion::SwitcherState = response.decode()?;
        let mode: motion::MotionMode = state.name.parse()?;
        self.cached.lock().mode = Some(mode);
        debug!(%mode, "motion mode queried");
        Ok(mode)
    }

    /// Switch the motion mode, skipping the request when already active
    ///
    /// The onboard motion service restarts on a switch, so after an
    /// accepted request this waits the configured settle period before
    /// returning.
    pub async fn switch_mode(&self, mode: motion::MotionMode) -> Result<()> {
        let current = self.motion_mode().await?;
        if current == mode {
            debug!(%mode, "motion mode already active, skipping switch");
            return Ok(());
        }

        info!(from = %current, to = %mode, "switching motion mode");
        self.send(
            topics::MOTION_SWITCHER,
            ApiRequest::with_parameter(motion::SELECT_MODE, json!({"name": mode.as_str()})),
        )
        .await?;

        tokio::time::sleep(self.config.mode_settle).await;
        self.cached.lock().mode = Some(mode);
        Ok(())
    }

    /// Perform a one-shot action (normal mode)
    pub async fn perform(&self, action: sport::NormalAction) -> Result<()> {
        self.send(
            topics::SPORT,
            ApiRequest::bare(action.command().api_id()),
        )
        .await?;
        Ok(())
    }

    /// Engage or disengage a sustained stunt (AI mode)
    pub async fn perform_ai(&self, action: sport::AiAction, engage: bool) -> Result<()> {
        self.send(
            topics::SPORT,
            ApiRequest::with_parameter(action.command().api_id(), json!({"data": engage})),
        )
        .await?;
        Ok(())
    }

    /// Walk with the given body-frame velocities
    ///
    /// `forward` and `side` in m/s, `yaw` in rad/s; the sport service
    /// applies them for its nominal command window.
    pub async fn walk(&self, forward: f64, side: f64, yaw: f64) -> Result<()> {
        self.send(
            topics::SPORT,
            ApiRequest::with_parameter(
                sport::SportCmd::Move.api_id(),
                json!({"x": forward, "y": side, "z": yaw}),
            ),
        )
        .await?;
        Ok(())
    }

    // =========================================================================
    // Audio
    // =========================================================================

    /// Query the speaker volume (0..=10)
    pub async fn volume(&self) -> Result<u8> {
        let response = self
            .send(topics::VUI, ApiRequest::bare(vui::GET_VOLUME))
            .await?;
        let state: vui::VolumeState = response.decode()?;
        self.cached.lock().volume = Some(state.volume);
        Ok(state.volume)
    }

    /// Set the speaker volume (0..=10)
    pub async fn set_volume(&self, level: u8) -> Result<()> {
        if !vui::LEVEL_RANGE.contains(&level) {
            return Err(Error::OutOfRange {
                name: "volume",
                value: level as i64,
                range: "0..=10",
            });
        }
        self.send(
            topics::VUI,
            ApiRequest::with_parameter(vui::SET_VOLUME, json!({"volume": level})),
        )
        .await?;
        self.cached.lock().volume = Some(level);
        Ok(())
    }

    /// Feed an audio file into the driver's outbound audio track
    pub async fn play_audio_file(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        if !path.is_file() {
            return Err(Error::AudioFileNotFound {
                path: path.display().to_string(),
            });
        }
        info!(path = %path.display(), "playing audio file");
        self.driver.play_audio_file(path).await
    }

    // =========================================================================
    // Lighting
    // =========================================================================

    /// Query the head-light brightness (0..=10)
    pub async fn brightness(&self) -> Result<u8> {
        let response = self
            .send(topics::VUI, ApiRequest::bare(vui::GET_BRIGHTNESS))
            .await?;
        let state: vui::BrightnessState = response.decode()?;
        self.cached.lock().brightness = Some(state.brightness);
        Ok(state.brightness)
    }

    /// Set the head-light brightness (0..=10)
    pub async fn set_brightness(&self, level: u8) -> Result<()> {
        if !vui::LEVEL_RANGE.contains(&level) {
            return Err(Error::OutOfRange {
                name: "brightness",
                value: level as i64,
                range: "0..=10",
            });
        }
        self.send(
            topics::VUI,
            ApiRequest::with_parameter(vui::SET_BRIGHTNESS, json!({"brightness": level})),
        )
        .await?;
        self.cached.lock().brightness = Some(level);
        Ok(())
    }

    /// Hold the head-light on a color for `seconds`
    pub async fn set_color(&self, color: vui::VuiColor, seconds: u32) -> Result<()> {
        self.send(
            topics::VUI,
            ApiRequest::with_parameter(
                vui::SET_COLOR,
                json!({"color": color.as_str(), "time": seconds}),
            ),
        )
        .await?;
        Ok(())
    }

    /// Flash the head-light on a color for `seconds`, cycling every
    /// `cycle_ms` milliseconds
    pub async fn flash_color(
        &self,
        color: vui::VuiColor,
        seconds: u32,
        cycle_ms: u32,
    ) -> Result<()> {
        self.send(
            topics::VUI,
            ApiRequest::with_parameter(
                vui::SET_COLOR,
                json!({"color": color.as_str(), "time": seconds, "flash_cycle": cycle_ms}),
            ),
        )
        .await?;
        Ok(())
    }

    // =========================================================================
    // Video
    // =========================================================================

    /// Enable the camera track and start the display loop
    pub async fn start_video(&self, sink: impl FrameSink + 'static) -> Result<VideoSession> {
        VideoSession::start(
            Arc::clone(&self.driver),
            self.config.video_queue_frames,
            Box::new(sink),
        )
        .await
    }

    // =========================================================================
    // Cached state
    // =========================================================================

    /// Motion mode last sent or fetched, if any
    pub fn last_mode(&self) -> Option<motion::MotionMode> {
        self.cached.lock().mode
    }

    /// Volume last sent or fetched, if any
    pub fn last_volume(&self) -> Option<u8> {
        self.cached.lock().volume
    }

    /// Brightness last sent or fetched, if any
    pub fn last_brightness(&self) -> Option<u8> {
        self.cached.lock().brightness
    }
}
