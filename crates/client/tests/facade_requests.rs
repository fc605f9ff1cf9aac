//! Facade request shaping, asserted byte-for-byte through the replay
//! driver

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use bytes::Bytes;
use serde_json::json;

use go2_client::api::motion::MotionMode;
use go2_client::api::sport::{AiAction, NormalAction};
use go2_client::api::vui::VuiColor;
use go2_client::api::{motion, topics, vui, ApiRequest, ApiResponse};
use go2_client::{
    ClientConfig, Error, Go2Client, ReplayDriver, SinkControl, VideoFrame,
};

fn test_config() -> ClientConfig {
    ClientConfig {
        // The settle wait covers a real hardware delay; pointless
        // against the replay driver.
        mode_settle: Duration::ZERO,
        ..Default::default()
    }
}

fn client_over(driver: &Arc<ReplayDriver>) -> Go2Client {
    Go2Client::new(
        Arc::clone(driver) as Arc<dyn go2_client::Driver>,
        test_config(),
    )
    .unwrap()
}

fn sample_frame() -> VideoFrame {
    VideoFrame::bgr24(4, 2, Bytes::from(vec![0u8; 24])).unwrap()
}

#[tokio::test]
async fn set_volume_shapes_the_exact_parameter() {
    let driver = Arc::new(ReplayDriver::new());
    let client = client_over(&driver);

    client.set_volume(7).await.unwrap();

    let sent = driver.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].0, topics::VUI);
    assert_eq!(
        serde_json::to_value(&sent[0].1).unwrap(),
        json!({"api_id": 1003, "parameter": {"volume": 7}})
    );
    assert_eq!(client.last_volume(), Some(7));
}

#[tokio::test]
async fn out_of_range_volume_sends_nothing() {
    let driver = Arc::new(ReplayDriver::new());
    let client = client_over(&driver);

    let err = client.set_volume(11).await.unwrap_err();
    assert!(matches!(err, Error::OutOfRange { name: "volume", .. }));
    assert!(driver.sent().is_empty());
    assert_eq!(client.last_volume(), None);
}

#[tokio::test]
async fn volume_query_decodes_the_nested_payload() {
    let driver = Arc::new(ReplayDriver::new());
    driver.script_volume(4);
    let client = client_over(&driver);

    assert_eq!(client.volume().await.unwrap(), 4);
    assert_eq!(client.last_volume(), Some(4));

    let sent = driver.sent();
    assert_eq!(
        serde_json::to_value(&sent[0].1).unwrap(),
        json!({"api_id": 1004})
    );
}

#[tokio::test]
async fn brightness_round_trip() {
    let driver = Arc::new(ReplayDriver::new());
    driver.script_brightness(2);
    let client = client_over(&driver);

    assert_eq!(client.brightness().await.unwrap(), 2);
    client.set_brightness(8).await.unwrap();
    assert_eq!(client.last_brightness(), Some(8));

    let sent = driver.sent();
    assert_eq!(
        serde_json::to_value(&sent[1].1).unwrap(),
        json!({"api_id": 1005, "parameter": {"brightness": 8}})
    );

    let err = client.set_brightness(42).await.unwrap_err();
    assert!(matches!(err, Error::OutOfRange { name: "brightness", .. }));
}

#[tokio::test]
async fn switch_mode_skips_when_already_active() {
    let driver = Arc::new(ReplayDriver::new());
    driver.script_mode("normal");
    let client = client_over(&driver);

    client.switch_mode(MotionMode::Normal).await.unwrap();

    let sent = driver.sent();
    assert_eq!(sent.len(), 1, "only the mode query should go out");
    assert_eq!(sent[0].0, topics::MOTION_SWITCHER);
    assert_eq!(sent[0].1, ApiRequest::bare(motion::GET_MODE));
    assert_eq!(client.last_mode(), Some(MotionMode::Normal));
}

#[tokio::test]
async fn switch_mode_selects_by_name() {
    let driver = Arc::new(ReplayDriver::new());
    driver.script_mode("normal");
    let client = client_over(&driver);

    client.switch_mode(MotionMode::Ai).await.unwrap();

    let sent = driver.sent();
    assert_eq!(sent.len(), 2);
    assert_eq!(
        serde_json::to_value(&sent[1].1).unwrap(),
        json!({"api_id": 1002, "parameter": {"name": "ai"}})
    );
    assert_eq!(client.last_mode(), Some(MotionMode::Ai));
}

#[tokio::test]
async fn connect_queries_and_settles_into_normal_mode() {
    let driver = Arc::new(ReplayDriver::new());
    driver.script_mode("ai");
    let client = client_over(&driver);

    client.connect().await.unwrap();

    let sent = driver.sent();
    assert_eq!(sent[0].1, ApiRequest::bare(motion::GET_MODE));
    assert_eq!(
        serde_json::to_value(&sent[1].1).unwrap(),
        json!({"api_id": 1002, "parameter": {"name": "normal"}})
    );
}

#[tokio::test]
async fn one_shot_actions_are_bare_commands() {
    let driver = Arc::new(ReplayDriver::new());
    let client = client_over(&driver);

    client.perform(NormalAction::Hello).await.unwrap();

    let sent = driver.sent();
    assert_eq!(sent[0].0, topics::SPORT);
    assert_eq!(
        serde_json::to_value(&sent[0].1).unwrap(),
        json!({"api_id": 1016})
    );
}

#[tokio::test]
async fn sustained_stunts_carry_the_engage_flag() {
    let driver = Arc::new(ReplayDriver::new());
    let client = client_over(&driver);

    client.perform_ai(AiAction::Handstand, true).await.unwrap();
    client.perform_ai(AiAction::Handstand, false).await.unwrap();

    let sent = driver.sent();
    assert_eq!(
        serde_json::to_value(&sent[0].1).unwrap(),
        json!({"api_id": 1301, "parameter": {"data": true}})
    );
    assert_eq!(
        serde_json::to_value(&sent[1].1).unwrap(),
        json!({"api_id": 1301, "parameter": {"data": false}})
    );
}

#[tokio::test]
async fn walk_carries_body_frame_velocities() {
    let driver = Arc::new(ReplayDriver::new());
    let client = client_over(&driver);

    client.walk(0.5, 0.0, -0.3).await.unwrap();

    let sent = driver.sent();
    assert_eq!(
        serde_json::to_value(&sent[0].1).unwrap(),
        json!({"api_id": 1008, "parameter": {"x": 0.5, "y": 0.0, "z": -0.3}})
    );
}

#[tokio::test]
async fn color_commands_shape_time_and_flash_cycle() {
    let driver = Arc::new(ReplayDriver::new());
    let client = client_over(&driver);

    client.set_color(VuiColor::Red, 5).await.unwrap();
    client.flash_color(VuiColor::Cyan, 5, 500).await.unwrap();

    let sent = driver.sent();
    assert_eq!(
        serde_json::to_value(&sent[0].1).unwrap(),
        json!({"api_id": 1007, "parameter": {"color": "red", "time": 5}})
    );
    assert_eq!(
        serde_json::to_value(&sent[1].1).unwrap(),
        json!({"api_id": 1007, "parameter": {"color": "cyan", "time": 5, "flash_cycle": 500}})
    );
}

#[tokio::test]
async fn rejected_commands_surface_the_status_code() {
    let driver = Arc::new(ReplayDriver::new());
    driver.script(topics::VUI, vui::SET_VOLUME, ApiResponse::rejected(3203));
    let client = client_over(&driver);

    let err = client.set_volume(3).await.unwrap_err();
    match err {
        Error::CommandRejected { topic, api_id, code } => {
            assert_eq!(topic, topics::VUI);
            assert_eq!(api_id, vui::SET_VOLUME);
            assert_eq!(code, 3203);
        }
        other => panic!("expected CommandRejected, got {other:?}"),
    }
    // A rejected set must not poison the cache.
    assert_eq!(client.last_volume(), None);
}

#[tokio::test]
async fn missing_audio_file_is_reported_before_the_driver_is_touched() {
    let driver = Arc::new(ReplayDriver::new());
    let client = client_over(&driver);

    let err = client
        .play_audio_file("/nonexistent/bark.mp3")
        .await
        .unwrap_err();
    assert!(matches!(err, Error::AudioFileNotFound { .. }));
    assert!(driver.played().is_empty());
}

#[tokio::test]
async fn audio_files_are_handed_to_the_driver() {
    let driver = Arc::new(ReplayDriver::new());
    let client = client_over(&driver);

    let file = tempfile::NamedTempFile::new().unwrap();
    client.play_audio_file(file.path()).await.unwrap();

    assert_eq!(driver.played(), vec![file.path().to_path_buf()]);
}

#[tokio::test]
async fn video_session_renders_until_the_sink_stops() {
    let driver = Arc::new(ReplayDriver::new());
    let client = client_over(&driver);

    let rendered = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&rendered);
    let (done_tx, done_rx) = std::sync::mpsc::channel();

    let session = client
        .start_video(move |_frame: VideoFrame| {
            let n = counter.fetch_add(1, Ordering::SeqCst) + 1;
            if n >= 3 {
                done_tx.send(()).ok();
                SinkControl::Stop
            } else {
                SinkControl::Continue
            }
        })
        .await
        .unwrap();
    assert!(driver.video_enabled());

    for _ in 0..5 {
        driver.emit_frame(sample_frame());
    }
    done_rx
        .recv_timeout(Duration::from_secs(5))
        .expect("sink never saw three frames");

    session.stop().await.unwrap();
    assert!(!driver.video_enabled());
    assert_eq!(rendered.load(Ordering::SeqCst), 3);
}
