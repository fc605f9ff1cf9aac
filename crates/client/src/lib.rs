//! Named motion, audio, and lighting control for a Go2-class quadruped
//!
//! The hard parts — WebRTC session negotiation, reliable data-channel
//! request/response, media track transport — belong to the external
//! driver behind the [`Driver`] trait. This crate supplies the robot's
//! command tables, a facade that shapes request parameters and checks
//! response status, and a bounded display loop for the camera track.
//!
//! # Example
//!
//! ```ignore
//! use go2_client::{api::sport::NormalAction, ClientConfig, Go2Client};
//! use std::sync::Arc;
//!
//! let client = Go2Client::new(driver, ClientConfig::default())?;
//! client.connect().await?;
//!
//! client.set_volume(7).await?;
//! client.perform(NormalAction::Hello).await?;
//! ```
//!
//! Requests are awaited end to end; a non-zero status code from the
//! robot's dispatcher surfaces as [`Error::CommandRejected`] rather
//! than being dropped on the floor.

pub mod api;
mod client;
mod config;
pub mod driver;
mod error;
pub mod video;

pub use client::Go2Client;
pub use config::{ClientConfig, ConnectionMethod};
pub use driver::{Driver, FrameHandler, ReplayDriver};
pub use error::{Error, Result};
pub use video::{FrameSink, SinkControl, VideoFrame, VideoSession};
