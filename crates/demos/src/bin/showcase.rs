//! Audio, lighting, and greeting walkthrough
//!
//! Runs a fixed sequence against the scripted driver, so it works
//! without a robot on the network: read volume and brightness, raise
//! both, make sure the robot is in normal mode, wave, and play a clip
//! if one is lying around. Swap in the real driver handle to run it
//! against hardware.

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use go2_client::api::motion::MotionMode;
use go2_client::api::sport::NormalAction;
use go2_client::{ClientConfig, Driver, Go2Client, ReplayDriver};

fn scripted_driver() -> Arc<ReplayDriver> {
    let driver = Arc::new(ReplayDriver::new());
    // One mode query per connect() and per switch_mode() in the
    // sequence below.
    driver.script_mode("normal");
    driver.script_mode("normal");
    driver.script_volume(5);
    driver.script_brightness(5);
    driver
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let driver = scripted_driver();
    let robot = Go2Client::new(
        Arc::clone(&driver) as Arc<dyn Driver>,
        ClientConfig::default(),
    )?;

    robot.connect().await?;

    let volume = robot.volume().await?;
    info!(volume, "current volume");

    let brightness = robot.brightness().await?;
    info!(brightness, "current brightness");

    robot.set_volume(7).await?;
    robot.set_brightness(8).await?;
    info!("updated volume to 7 and brightness to 8");

    robot.switch_mode(MotionMode::Normal).await?;

    info!("performing the Hello action");
    robot.perform(NormalAction::Hello).await?;
    tokio::time::sleep(Duration::from_secs(2)).await;

    let clip = Path::new("sounds/demo.mp3");
    if clip.is_file() {
        robot.play_audio_file(clip).await?;
        info!("playing sound");
        tokio::time::sleep(Duration::from_secs(5)).await;
    } else {
        warn!(path = %clip.display(), "no demo clip found, skipping audio playback");
    }

    robot.disconnect().await?;
    Ok(())
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("info"))
        .unwrap();

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}
