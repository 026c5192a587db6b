use std::fs;
use std::path::PathBuf;

use matchlens::aggregate::{Scope, aggregate, player_lines};
use matchlens::category::{Category, CategoryFilter};
use matchlens::filter::{filter_events, partition_buckets};
use matchlens::normalize::{Bucket, MatchView, normalize_events};
use matchlens::payload::{CountSource, RawEvent, RosterEntry, parse_payload_json};
use matchlens::team::{PlayerKey, Team, TeamDirectory};
use matchlens::team_resolve::TeamSource;

fn read_fixture(name: &str) -> String {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("tests");
    path.push("fixtures");
    path.push(name);
    fs::read_to_string(path).expect("fixture file should be readable")
}

fn view_of(name: &str) -> MatchView {
    let payload = parse_payload_json(&read_fixture(name)).expect("fixture should parse");
    MatchView::from_payload(payload)
}

fn event(id: &str, kind: &str, jersey: Option<&str>, notes: &str, team: Option<&str>) -> RawEvent {
    RawEvent {
        event_id: id.to_string(),
        event_type: kind.to_string(),
        player_jersey_number: jersey.map(str::to_string),
        notes: Some(notes.to_string()),
        team: team.map(str::to_string),
        ..RawEvent::default()
    }
}

#[test]
fn goal_filter_over_red_bucket_returns_the_rostered_goal() {
    let events = vec![
        event("1", "goal", Some("9"), "", None),
        event("2", "tackle", Some("4"), "blue defender", None),
    ];
    let directory = TeamDirectory::build(&[RosterEntry {
        player_jersey_number: Some("9".to_string()),
        team: Some("red".to_string()),
        ..RosterEntry::default()
    }]);

    let enriched = normalize_events(&events, &directory);
    assert_eq!(enriched[0].team, Some(Team::Red));
    assert_eq!(enriched[0].team_source, Some(TeamSource::Roster));
    assert_eq!(enriched[1].team, Some(Team::Blue));
    assert_eq!(enriched[1].team_source, Some(TeamSource::Notes));

    let goals = filter_events(&enriched, Bucket::Red, CategoryFilter::Only(Category::Goal));
    assert_eq!(goals.len(), 1);
    assert_eq!(goals[0].event.event_id, "1");
}

#[test]
fn explicit_tag_outranks_roster_and_notes() {
    let events = vec![event("1", "pass", Some("5"), "red boots", Some("Blue"))];
    let directory = TeamDirectory::build(&[RosterEntry {
        player_jersey_number: Some("5".to_string()),
        team: Some("red".to_string()),
        ..RosterEntry::default()
    }]);
    let enriched = normalize_events(&events, &directory);
    assert_eq!(enriched[0].team, Some(Team::Blue));
}

#[test]
fn maroon_is_red_on_roster_and_event() {
    let directory = TeamDirectory::build(&[RosterEntry {
        player_jersey_number: Some("3".to_string()),
        team: Some("Maroon".to_string()),
        ..RosterEntry::default()
    }]);
    assert_eq!(directory.get(&PlayerKey::Jersey("3".to_string())), Some(Team::Red));

    let enriched = normalize_events(
        &[event("1", "pass", None, "", Some("MAROON"))],
        &TeamDirectory::default(),
    );
    assert_eq!(enriched[0].team, Some(Team::Red));
}

#[test]
fn penalty_goal_is_a_penalty_not_a_goal() {
    let enriched = normalize_events(
        &[event("1", "goal", None, "penalty kick scored", Some("blue"))],
        &TeamDirectory::default(),
    );
    let goals = filter_events(&enriched, Bucket::Blue, CategoryFilter::Only(Category::Goal));
    let penalties = filter_events(&enriched, Bucket::Blue, CategoryFilter::Only(Category::Penalty));
    assert!(goals.is_empty());
    assert_eq!(penalties.len(), 1);
}

#[test]
fn notes_text_can_decide_the_team_by_substring() {
    // "scored" contains "red"; the notes rule is a plain substring match.
    let enriched = normalize_events(
        &[event("1", "goal", None, "penalty kick scored", None)],
        &TeamDirectory::default(),
    );
    assert_eq!(enriched[0].team, Some(Team::Red));
    assert_eq!(enriched[0].team_source, Some(TeamSource::Notes));
}

#[test]
fn roster_fixture_resolves_every_event() {
    let view = view_of("analytics_roster.json");
    assert_eq!(view.directory.len(), 4);
    assert_eq!(view.events.len(), 8);

    let teams: Vec<Bucket> = view.events.iter().map(|e| e.bucket()).collect();
    assert_eq!(
        teams,
        [
            Bucket::Red,
            Bucket::Blue,
            Bucket::Red,
            Bucket::Blue,
            Bucket::Blue,
            Bucket::Red,
            Bucket::Undetermined,
            Bucket::Undetermined,
        ]
    );
    // Duplicate event ids are kept as separate events.
    assert_eq!(view.events[4].event.event_id, view.events[5].event.event_id);
    assert_eq!(view.events[5].team_source, Some(TeamSource::Explicit));
}

#[test]
fn every_event_lands_in_exactly_one_bucket() {
    let view = view_of("analytics_roster.json");
    let buckets = partition_buckets(&view.events);
    assert_eq!(buckets.len(), view.events.len());
    assert_eq!(buckets.red.len(), 3);
    assert_eq!(buckets.blue.len(), 3);
    assert_eq!(buckets.undetermined.len(), 2);

    for e in &view.events {
        let hits = Bucket::ALL
            .iter()
            .filter(|b| buckets.get(**b).iter().any(|x| std::ptr::eq(*x, e)))
            .count();
        assert_eq!(hits, 1);
    }
}

#[test]
fn normalizing_twice_is_identical() {
    let raw = read_fixture("analytics_roster.json");
    let first = MatchView::from_payload(parse_payload_json(&raw).unwrap());
    let second = MatchView::from_payload(parse_payload_json(&raw).unwrap());
    assert_eq!(first, second);

    let again = normalize_events(&first.payload.per_event, &first.directory);
    assert_eq!(again, first.events);
}

#[test]
fn computed_counts_follow_the_category_rules() {
    let view = view_of("analytics_roster.json");
    let counts = aggregate(&view.payload.summary, &view.events, Scope::Global);

    assert_eq!(counts.events, 8);
    // Totals count every event typed "goal", the penalty one included.
    assert_eq!(counts.value(Category::Goal), 2);
    assert_eq!(counts.value(Category::Penalty), 1);
    assert_eq!(counts.value(Category::Save), 1);
    assert_eq!(counts.value(Category::MissShot), 1);
    assert_eq!(counts.value(Category::Freekick), 1);
    assert_eq!(counts.value(Category::Corner), 1);
    assert_eq!(counts.get(Category::Pass).source, CountSource::Computed);
    assert_eq!(counts.by_type.get("throw in"), Some(&1));
    assert_eq!(counts.by_type.get("goal"), Some(&2));
}

#[test]
fn missing_saves_total_is_counted_from_events() {
    let view = view_of("analytics_home_away.json");
    let counts = aggregate(&view.payload.summary, &view.events, Scope::Global);

    let saves = counts.get(Category::Save);
    assert_eq!(saves.value, 3);
    assert_eq!(saves.source, CountSource::Computed);

    assert_eq!(counts.get(Category::Goal).value, 2);
    assert_eq!(counts.get(Category::Goal).source, CountSource::Home);
    assert_eq!(counts.get(Category::Corner).value, 6);
    assert_eq!(counts.get(Category::Corner).source, CountSource::Away);
}

#[test]
fn team_scopes_read_their_own_side() {
    let view = view_of("analytics_home_away.json");
    let blue = aggregate(&view.payload.summary, &view.events, Scope::Bucket(Bucket::Blue));
    let red = aggregate(&view.payload.summary, &view.events, Scope::Bucket(Bucket::Red));

    assert_eq!(blue.value(Category::Pass), 310);
    assert_eq!(blue.value(Category::Save), 1);
    assert_eq!(red.value(Category::Corner), 6);
    assert_eq!(red.value(Category::Save), 1);
    assert_eq!(red.value(Category::Penalty), 1);
    assert_eq!(view.team_name(Bucket::Blue), "Harbour FC");
    assert_eq!(view.team_name(Bucket::Red), "Valley Town");
}

#[test]
fn computed_goal_total_and_goal_filter_disagree_on_penalties() {
    let view = view_of("analytics_flat.json");
    let red = aggregate(&view.payload.summary, &view.events, Scope::Bucket(Bucket::Red));
    let shown = filter_events(&view.events, Bucket::Red, CategoryFilter::Only(Category::Goal));
    assert_eq!(red.value(Category::Goal), 2);
    assert_eq!(shown.len(), 1);

    let global = aggregate(&view.payload.summary, &view.events, Scope::Global);
    assert_eq!(global.get(Category::Goal).value, 3);
    assert_eq!(global.get(Category::Goal).source, CountSource::TopLevel);
    assert_eq!(global.value(Category::Pass), 120);
}

#[test]
fn team_tables_group_events_by_player() {
    let view = view_of("analytics_roster.json");
    let red = player_lines(&view.events, Bucket::Red);
    let keys: Vec<String> = red.iter().map(|l| l.key.to_string()).collect();
    assert_eq!(keys, ["#9", "K. Rook", "#10"]);
    assert_eq!(red[1].goals, 1);
    assert_eq!(red[2].tackles, 1);

    let blue = player_lines(&view.events, Bucket::Blue);
    assert_eq!(blue[0].name.as_deref(), Some("D. Moss"));
    assert_eq!(blue[0].passes, 1);
}

#[test]
fn filtering_leaves_the_input_untouched() {
    let view = view_of("analytics_roster.json");
    let before = view.events.clone();
    let _ = filter_events(&view.events, Bucket::Blue, CategoryFilter::Only(Category::Corner));
    let _ = filter_events(&view.events, Bucket::Red, CategoryFilter::All);
    assert_eq!(before, view.events);
}
