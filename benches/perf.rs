use criterion::{Criterion, criterion_group, criterion_main};
use std::hint::black_box;

use matchlens::aggregate::{Scope, aggregate, player_lines};
use matchlens::category::{Category, CategoryFilter};
use matchlens::filter::{filter_events, partition_buckets};
use matchlens::normalize::{Bucket, MatchView, normalize_events};
use matchlens::payload::{RawEvent, RosterEntry, Summary, parse_payload_json};
use matchlens::team::TeamDirectory;

const KINDS: [&str; 8] = [
    "goal",
    "pass",
    "tackle",
    "missed shot",
    "goal save",
    "corner",
    "freekick",
    "throw in",
];

fn synthetic_roster() -> Vec<RosterEntry> {
    (0..22)
        .map(|idx| RosterEntry {
            player_jersey_number: Some((idx + 1).to_string()),
            team: Some(if idx < 11 { "red" } else { "blue" }.to_string()),
            ..RosterEntry::default()
        })
        .collect()
}

fn synthetic_events(count: usize) -> Vec<RawEvent> {
    (0..count)
        .map(|idx| RawEvent {
            event_id: format!("ev{idx}"),
            event_type: KINDS[idx % KINDS.len()].to_string(),
            // Jerseys 1..=30 leave a tail for notes and undetermined.
            player_jersey_number: Some((idx % 30 + 1).to_string()),
            notes: match idx % 5 {
                0 => Some("penalty area".to_string()),
                1 => Some("light blue shirt".to_string()),
                _ => None,
            },
            start_time: Some(idx as f64 * 3.5),
            end_time: Some(idx as f64 * 3.5 + 1.0),
            confidence: 0.8,
            ..RawEvent::default()
        })
        .collect()
}

fn bench_normalize(c: &mut Criterion) {
    let directory = TeamDirectory::build(&synthetic_roster());
    let events = synthetic_events(5_000);
    c.bench_function("normalize_events_5k", |b| {
        b.iter(|| {
            let enriched = normalize_events(black_box(&events), black_box(&directory));
            black_box(enriched.len());
        })
    });
}

fn bench_aggregate(c: &mut Criterion) {
    let directory = TeamDirectory::build(&synthetic_roster());
    let events = synthetic_events(5_000);
    let enriched = normalize_events(&events, &directory);
    let summary = Summary::default();
    c.bench_function("aggregate_all_scopes_5k", |b| {
        b.iter(|| {
            let global = aggregate(black_box(&summary), &enriched, Scope::Global);
            black_box(global.value(Category::Goal));
            for bucket in Bucket::ALL {
                let counts = aggregate(&summary, &enriched, Scope::Bucket(bucket));
                black_box(counts.value(Category::Pass));
            }
        })
    });
    c.bench_function("player_lines_5k", |b| {
        b.iter(|| {
            let lines = player_lines(black_box(&enriched), Bucket::Red);
            black_box(lines.len());
        })
    });
}

fn bench_filter(c: &mut Criterion) {
    let directory = TeamDirectory::build(&synthetic_roster());
    let events = synthetic_events(5_000);
    let enriched = normalize_events(&events, &directory);
    c.bench_function("filter_every_option_5k", |b| {
        b.iter(|| {
            let buckets = partition_buckets(black_box(&enriched));
            black_box(buckets.len());
            for option in CategoryFilter::OPTIONS {
                let rows = filter_events(&enriched, Bucket::Blue, option);
                black_box(rows.len());
            }
        })
    });
}

fn bench_payload_parse(c: &mut Criterion) {
    c.bench_function("payload_parse", |b| {
        b.iter(|| {
            let payload = parse_payload_json(black_box(ROSTER_JSON)).unwrap();
            black_box(payload.per_event.len());
        })
    });
    c.bench_function("match_view_build", |b| {
        b.iter(|| {
            let payload = parse_payload_json(black_box(HOME_AWAY_JSON)).unwrap();
            let view = MatchView::from_payload(payload);
            black_box(view.events.len());
        })
    });
}

criterion_group!(
    perf,
    bench_normalize,
    bench_aggregate,
    bench_filter,
    bench_payload_parse
);
criterion_main!(perf);

static ROSTER_JSON: &str = include_str!("../tests/fixtures/analytics_roster.json");
static HOME_AWAY_JSON: &str = include_str!("../tests/fixtures/analytics_home_away.json");
