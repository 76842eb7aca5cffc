//! Integration tests for the tracker view.
//!
//! Covers the observable contract: initial state, bounded refresh drift,
//! locate success/failure/unavailable, overlapping locates and rendering.

use asset_tracker::core::{Position, StatusKind, UserPosition, DEFAULT_SEED_LAT, DEFAULT_SEED_LON};
use asset_tracker::geolocation::{FailureCode, GeoError, MockGeolocation, MockResponse};
use asset_tracker::map::{render_page, RecordingMap};
use asset_tracker::tracker::{DriftGenerator, TrackerView};
use asset_tracker::utils::TrackerConfig;
use std::time::Duration;

type TestView = TrackerView<MockGeolocation, RecordingMap>;

fn build_view(config: TrackerConfig, mock: &MockGeolocation) -> TestView {
    let map = RecordingMap::new(config.seed_position, config.zoom);
    TrackerView::new(config, mock.clone(), map).expect("valid config")
}

#[test]
fn initial_state_matches_seed() {
    let view = build_view(TrackerConfig::default(), &MockGeolocation::new());

    assert_eq!(view.device_position(), Position::new(DEFAULT_SEED_LAT, DEFAULT_SEED_LON));
    assert!(view.user_position().is_none());
    assert_eq!(view.status().kind, StatusKind::Normal);
}

#[test]
fn refresh_drift_is_bounded_but_not_constant() {
    let config = TrackerConfig::default();
    let half_width = config.drift_half_width_deg;
    let mut view = build_view(config, &MockGeolocation::new());

    let mut distinct = 0;
    for _ in 0..500 {
        let before = view.device_position();
        view.refresh_tracker();
        let after = view.device_position();

        assert!((after.lat - before.lat).abs() < half_width);
        assert!((after.lon - before.lon).abs() < half_width);
        assert_eq!(view.status().kind, StatusKind::Normal);
        if after != before {
            distinct += 1;
        }
    }

    assert!(distinct > 490, "refresh should almost surely move the device");
    assert_eq!(view.map().moves().len(), distinct);
}

#[tokio::test]
async fn locate_success_stores_reading() {
    let mock = MockGeolocation::new();
    mock.push_response(MockResponse::success(12.9716, 77.5946, 15.0));
    let mut view = build_view(TrackerConfig::default(), &mock);

    assert!(view.locate_user().is_some());
    assert!(view.process_next().await);

    assert_eq!(view.user_position(), Some(UserPosition::new(12.9716, 77.5946, 15.0)));
    assert_eq!(view.status().kind, StatusKind::Success);
    assert!(view.status().message.contains("12.9716"));
    assert!(view.status().message.contains("77.5946"));
}

#[tokio::test]
async fn locate_failure_reports_host_message() {
    let mock = MockGeolocation::new();
    mock.push_response(MockResponse::failure(GeoError::request_failed(
        FailureCode::PermissionDenied,
        "User denied Geolocation",
    )));
    let mut view = build_view(TrackerConfig::default(), &mock);

    view.locate_user();
    view.process_next().await;

    assert_eq!(view.status().kind, StatusKind::Error);
    assert!(view.status().message.contains("User denied Geolocation"));
    assert!(view.user_position().is_none());
}

#[tokio::test]
async fn locate_failure_keeps_last_good_reading() {
    let mock = MockGeolocation::new();
    mock.push_response(MockResponse::success(51.5074, -0.1278, 20.0));
    mock.push_response(MockResponse::failure(GeoError::position_unavailable()));
    let mut view = build_view(TrackerConfig::default(), &mock);

    view.locate_user();
    view.process_next().await;
    view.locate_user();
    view.process_next().await;

    assert_eq!(view.status().kind, StatusKind::Error);
    assert_eq!(view.user_position(), Some(UserPosition::new(51.5074, -0.1278, 20.0)));
}

#[test]
fn locate_without_capability_never_requests() {
    let mock = MockGeolocation::unavailable();
    let mut view = build_view(TrackerConfig::default(), &mock);

    assert!(view.locate_user().is_none());
    assert_eq!(mock.request_count(), 0);
    assert_eq!(view.status().kind, StatusKind::Error);
}

#[tokio::test]
async fn locate_forwards_configured_options() {
    let mut config = TrackerConfig::default();
    config.geolocation.enable_high_accuracy = false;
    config.geolocation.timeout_ms = Some(2_500);
    let mock = MockGeolocation::new();
    mock.push_response(MockResponse::success(0.0, 0.0, 1.0));
    let mut view = build_view(config.clone(), &mock);

    view.locate_user();
    view.process_next().await;

    assert_eq!(mock.last_options(), Some(config.geolocation));
}

#[tokio::test]
async fn host_that_never_answers_leaves_loading() {
    let mock = MockGeolocation::new();
    mock.push_response(MockResponse::NoReply);
    let mut view = build_view(TrackerConfig::default(), &mock);

    view.locate_user();
    tokio::task::yield_now().await;

    assert_eq!(view.process_ready(), 0);
    assert_eq!(view.status().kind, StatusKind::Loading);
    assert_eq!(view.pending_locates(), 1);
}

#[tokio::test(start_paused = true)]
async fn overlapping_locates_last_completion_wins() {
    let mock = MockGeolocation::new();
    mock.push_response(MockResponse::success(1.0, 1.0, 10.0).delayed(Duration::from_millis(500)));
    mock.push_response(MockResponse::success(2.0, 2.0, 10.0));
    let mut view = build_view(TrackerConfig::default(), &mock);

    view.locate_user();
    view.locate_user();
    assert_eq!(view.pending_locates(), 2);

    assert!(view.process_next().await);
    assert_eq!(view.user_position(), Some(UserPosition::new(2.0, 2.0, 10.0)));

    assert!(view.process_next().await);
    assert_eq!(view.user_position(), Some(UserPosition::new(1.0, 1.0, 10.0)));
    assert_eq!(view.pending_locates(), 0);
}

#[tokio::test(start_paused = true)]
async fn stale_locates_can_be_discarded() {
    let mut config = TrackerConfig::default();
    config.discard_stale_locates = true;
    let mock = MockGeolocation::new();
    mock.push_response(MockResponse::success(1.0, 1.0, 10.0).delayed(Duration::from_millis(500)));
    mock.push_response(MockResponse::success(2.0, 2.0, 10.0));
    let mut view = build_view(config, &mock);

    view.locate_user();
    view.locate_user();

    assert!(view.process_next().await);
    assert!(!view.process_next().await);
    assert_eq!(view.user_position(), Some(UserPosition::new(2.0, 2.0, 10.0)));
    assert_eq!(view.status().kind, StatusKind::Success);
}

#[tokio::test]
async fn circle_present_iff_user_located() {
    let mock = MockGeolocation::new();
    mock.push_response(MockResponse::success(12.9716, 77.5946, 15.0));
    let mut view = build_view(TrackerConfig::default(), &mock);

    assert!(view.render().accuracy_circle.is_none());

    view.locate_user();
    view.process_next().await;

    let scene = view.render();
    let circle = scene.accuracy_circle.expect("circle after successful locate");
    assert_eq!(circle.center, Position::new(12.9716, 77.5946));
    assert_eq!(circle.radius_m, 7.5);
    assert_eq!(scene.status.css_class, "status status-success");
}

#[test]
fn clamped_drift_keeps_device_valid() {
    let mut config = TrackerConfig::default();
    config.seed_position = Position::new(89.9995, 179.9995);
    config.clamp_to_valid_range = true;
    let mock = MockGeolocation::new();
    let mut view = build_view(config, &mock).with_drift(DriftGenerator::seeded(0.001, 11).with_clamping(true));

    for _ in 0..100 {
        view.refresh_tracker();
        assert!(view.device_position().is_valid());
    }
}

#[tokio::test]
async fn page_contains_layers() {
    let mock = MockGeolocation::new();
    mock.push_response(MockResponse::success(12.9716, 77.5946, 15.0));
    let mut view = build_view(TrackerConfig::default(), &mock);

    let page = render_page(&view.render(), None).unwrap();
    assert!(page.contains("tile.openstreetmap.org"));
    assert!(page.contains("OpenStreetMap"));
    assert!(page.contains("\"marker\""));
    assert!(page.contains("\"accuracy_circle\":null"));
    assert!(!page.contains("http-equiv=\"refresh\""));

    view.locate_user();
    view.process_next().await;

    let page = render_page(&view.render(), Some(3)).unwrap();
    assert!(page.contains("\"radius_m\":7.5"));
    assert!(page.contains("content=\"3\""));
}
