use std::collections::VecDeque;
use std::path::PathBuf;
use std::time::Instant;

use chrono::Local;

use crate::aggregate::{AggregateCounts, PlayerLine, Scope, aggregate, player_lines};
use crate::category::CategoryFilter;
use crate::export::ExportReport;
use crate::filter::{filter_events, partition_buckets};
use crate::normalize::{Bucket, EnrichedEvent, MatchView};
use crate::payload::AnalyticsPayload;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Uploading { progress: u8 },
    Loading,
    Ready,
    Failed(String),
}

#[derive(Debug, Clone)]
pub struct ExportState {
    pub active: bool,
    pub done: bool,
    pub path: Option<String>,
    pub message: String,
    pub last_updated: Option<Instant>,
}

impl Default for ExportState {
    fn default() -> Self {
        Self::new()
    }
}

impl ExportState {
    pub fn new() -> Self {
        Self {
            active: false,
            done: false,
            path: None,
            message: String::new(),
            last_updated: None,
        }
    }

    pub fn clear_if_done_for(&mut self, now: Instant, keep_secs: u64) {
        if !self.active || !self.done {
            return;
        }
        let Some(last) = self.last_updated else {
            return;
        };
        if now.duration_since(last).as_secs() >= keep_secs {
            *self = Self::new();
        }
    }
}

pub struct AppState {
    pub phase: Phase,
    pub view: Option<MatchView>,
    pub fingerprint: Option<String>,
    pub source: String,
    pub loaded_at: Option<String>,
    pub filter: CategoryFilter,
    pub bucket: Bucket,
    pub selected: usize,
    pub logs: VecDeque<String>,
    pub help_overlay: bool,
    pub export: ExportState,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

impl AppState {
    pub fn new() -> Self {
        Self {
            phase: Phase::Idle,
            view: None,
            fingerprint: None,
            source: String::new(),
            loaded_at: None,
            filter: CategoryFilter::All,
            bucket: Bucket::Red,
            selected: 0,
            logs: VecDeque::with_capacity(200),
            help_overlay: false,
            export: ExportState::new(),
        }
    }

    pub fn push_log(&mut self, msg: impl Into<String>) {
        const MAX_LOGS: usize = 200;
        self.logs.push_back(msg.into());
        while self.logs.len() > MAX_LOGS {
            self.logs.pop_front();
        }
    }

    pub fn maybe_clear_export(&mut self, now: Instant) {
        self.export.clear_if_done_for(now, 8);
    }

    pub fn is_busy(&self) -> bool {
        matches!(self.phase, Phase::Uploading { .. } | Phase::Loading)
    }

    /// Events of the selected bucket that pass the selected category.
    pub fn visible_events(&self) -> Vec<&EnrichedEvent> {
        match &self.view {
            Some(view) => filter_events(&view.events, self.bucket, self.filter),
            None => Vec::new(),
        }
    }

    pub fn counts(&self, scope: Scope) -> Option<AggregateCounts> {
        self.view
            .as_ref()
            .map(|view| aggregate(&view.payload.summary, &view.events, scope))
    }

    pub fn players(&self, bucket: Bucket) -> Vec<PlayerLine> {
        self.view
            .as_ref()
            .map(|view| player_lines(&view.events, bucket))
            .unwrap_or_default()
    }

    pub fn cycle_filter(&mut self, forward: bool) {
        self.filter = if forward {
            self.filter.next()
        } else {
            self.filter.prev()
        };
        self.selected = 0;
    }

    pub fn cycle_bucket(&mut self) {
        self.bucket = self.bucket.next();
        self.selected = 0;
    }

    pub fn select_next(&mut self) {
        let total = self.visible_events().len();
        if total == 0 {
            self.selected = 0;
            return;
        }
        self.selected = (self.selected + 1).min(total - 1);
    }

    pub fn select_prev(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }
}

#[derive(Debug, Clone)]
pub enum Delta {
    UploadProgress(u8),
    LoadStarted { source: String },
    PayloadLoaded {
        source: String,
        payload: Box<AnalyticsPayload>,
        fingerprint: String,
    },
    LoadFailed(String),
    ExportStarted { path: String },
    ExportFinished { path: String, report: ExportReport },
    ExportFailed { path: String, error: String },
    Log(String),
}

#[derive(Debug, Clone)]
pub enum LoaderCommand {
    /// Simulated upload of a match video, followed by a payload fetch.
    Upload { video: Option<String> },
    Reload,
    Export { path: PathBuf, view: Box<MatchView> },
}

pub fn apply_delta(state: &mut AppState, delta: Delta) {
    match delta {
        Delta::UploadProgress(progress) => {
            state.phase = Phase::Uploading {
                progress: progress.min(100),
            };
        }
        Delta::LoadStarted { source } => {
            state.phase = Phase::Loading;
            state.push_log(format!("[INFO] Loading analytics from {source}"));
        }
        Delta::PayloadLoaded {
            source,
            payload,
            fingerprint,
        } => {
            let unchanged = state.fingerprint.as_deref() == Some(fingerprint.as_str());
            // A new payload replaces every derived view.
            let view = MatchView::from_payload(*payload);
            let buckets = partition_buckets(&view.events);
            let line = format!(
                "{} events ({} red / {} blue / {} undetermined)",
                buckets.len(),
                buckets.red.len(),
                buckets.blue.len(),
                buckets.undetermined.len()
            );
            if unchanged {
                state.push_log(format!("[INFO] Payload unchanged: {line}"));
            } else {
                state.push_log(format!("[INFO] Loaded {line}"));
            }
            state.view = Some(view);
            state.fingerprint = Some(fingerprint);
            state.source = source;
            state.loaded_at = Some(Local::now().format("%Y-%m-%d %H:%M:%S").to_string());
            state.selected = 0;
            state.phase = Phase::Ready;
        }
        Delta::LoadFailed(message) => {
            state.push_log(format!("[WARN] {message}"));
            state.phase = Phase::Failed(message);
        }
        Delta::ExportStarted { path } => {
            state.export = ExportState {
                active: true,
                done: false,
                path: Some(path.clone()),
                message: "Exporting".to_string(),
                last_updated: Some(Instant::now()),
            };
            state.push_log(format!("[INFO] Export started: {path}"));
        }
        Delta::ExportFinished { path, report } => {
            let message = format!(
                "Exported {} events, {} players",
                report.events, report.players
            );
            state.export.active = true;
            state.export.done = true;
            state.export.path = Some(path.clone());
            state.export.message = message.clone();
            state.export.last_updated = Some(Instant::now());
            state.push_log(format!("[INFO] {message} to {path}"));
        }
        Delta::ExportFailed { path, error } => {
            state.export.active = true;
            state.export.done = true;
            state.export.path = Some(path.clone());
            state.export.message = "Export failed".to_string();
            state.export.last_updated = Some(Instant::now());
            state.push_log(format!("[WARN] Export to {path} failed: {error}"));
        }
        Delta::Log(msg) => state.push_log(msg),
    }
}

pub fn phase_label(phase: &Phase) -> String {
    match phase {
        Phase::Idle => "NO DATA".to_string(),
        Phase::Uploading { progress } => format!("UPLOADING {progress}%"),
        Phase::Loading => "LOADING".to_string(),
        Phase::Ready => "READY".to_string(),
        Phase::Failed(_) => "FAILED".to_string(),
    }
}
