use std::fs;
use std::path::PathBuf;

use matchlens::category::{Category, CategoryFilter};
use matchlens::normalize::Bucket;
use matchlens::payload::{AnalyticsPayload, parse_payload_json};
use matchlens::state::{AppState, Delta, Phase, apply_delta};

fn read_fixture(name: &str) -> String {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("tests");
    path.push("fixtures");
    path.push(name);
    fs::read_to_string(path).expect("fixture file should be readable")
}

fn loaded(name: &str, fingerprint: &str) -> Delta {
    let payload = parse_payload_json(&read_fixture(name)).expect("fixture should parse");
    Delta::PayloadLoaded {
        source: name.to_string(),
        payload: Box::new(payload),
        fingerprint: fingerprint.to_string(),
    }
}

#[test]
fn upload_progress_then_payload_makes_state_ready() {
    let mut state = AppState::new();
    assert!(state.view.is_none());

    apply_delta(&mut state, Delta::UploadProgress(40));
    assert_eq!(state.phase, Phase::Uploading { progress: 40 });
    assert!(state.is_busy());

    apply_delta(&mut state, Delta::UploadProgress(250));
    assert_eq!(state.phase, Phase::Uploading { progress: 100 });

    apply_delta(&mut state, Delta::LoadStarted { source: "x".to_string() });
    assert_eq!(state.phase, Phase::Loading);

    apply_delta(&mut state, loaded("analytics_roster.json", "aaaa"));
    assert_eq!(state.phase, Phase::Ready);
    assert_eq!(state.view.as_ref().map(|v| v.events.len()), Some(8));
    assert!(state.loaded_at.is_some());
    assert!(state.logs.back().is_some_and(|l| l.starts_with("[INFO] Loaded 8 events")));
}

#[test]
fn new_payload_replaces_the_previous_view() {
    let mut state = AppState::new();
    apply_delta(&mut state, loaded("analytics_roster.json", "aaaa"));
    state.selected = 2;

    apply_delta(&mut state, loaded("analytics_home_away.json", "bbbb"));
    let view = state.view.as_ref().expect("view");
    assert_eq!(view.events.len(), 5);
    assert!(view.directory.is_empty());
    assert_eq!(state.selected, 0);
    assert_eq!(state.fingerprint.as_deref(), Some("bbbb"));
}

#[test]
fn same_fingerprint_is_reported_as_unchanged() {
    let mut state = AppState::new();
    apply_delta(&mut state, loaded("analytics_roster.json", "aaaa"));
    apply_delta(&mut state, loaded("analytics_roster.json", "aaaa"));
    assert!(state.logs.back().is_some_and(|l| l.contains("unchanged")));
}

#[test]
fn failed_load_keeps_last_good_view() {
    let mut state = AppState::new();
    apply_delta(&mut state, loaded("analytics_roster.json", "aaaa"));
    apply_delta(&mut state, Delta::LoadFailed("Failed to load analytics: boom".to_string()));
    assert!(matches!(state.phase, Phase::Failed(_)));
    assert!(state.view.is_some());
    assert!(state.logs.back().is_some_and(|l| l.starts_with("[WARN]")));
}

#[test]
fn visible_events_follow_bucket_and_filter() {
    let mut state = AppState::new();
    apply_delta(&mut state, loaded("analytics_roster.json", "aaaa"));

    assert_eq!(state.bucket, Bucket::Red);
    assert_eq!(state.visible_events().len(), 3);

    state.filter = CategoryFilter::Only(Category::Goal);
    let ids: Vec<&str> = state
        .visible_events()
        .iter()
        .map(|e| e.event.event_id.as_str())
        .collect();
    assert_eq!(ids, ["e1"]);

    state.cycle_bucket();
    assert_eq!(state.bucket, Bucket::Blue);
    state.filter = CategoryFilter::Only(Category::Corner);
    assert_eq!(state.visible_events().len(), 1);

    state.cycle_bucket();
    state.filter = CategoryFilter::Only(Category::Freekick);
    assert_eq!(state.visible_events().len(), 1);
}

#[test]
fn selection_is_clamped_to_visible_rows() {
    let mut state = AppState::new();
    apply_delta(&mut state, Delta::PayloadLoaded {
        source: "inline".to_string(),
        payload: Box::new(AnalyticsPayload::default()),
        fingerprint: "0".to_string(),
    });
    state.select_next();
    assert_eq!(state.selected, 0);

    apply_delta(&mut state, loaded("analytics_roster.json", "aaaa"));
    for _ in 0..10 {
        state.select_next();
    }
    assert_eq!(state.selected, 2);
    state.cycle_filter(true);
    assert_eq!(state.selected, 0);
    assert_eq!(state.filter, CategoryFilter::Only(Category::Corner));
}

#[test]
fn console_log_is_bounded() {
    let mut state = AppState::new();
    for i in 0..250 {
        apply_delta(&mut state, Delta::Log(format!("[INFO] line {i}")));
    }
    assert_eq!(state.logs.len(), 200);
    assert_eq!(state.logs.front().map(String::as_str), Some("[INFO] line 50"));
}
