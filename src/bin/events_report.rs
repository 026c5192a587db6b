use anyhow::{Context, Result};

use matchlens::aggregate::{Scope, aggregate, player_lines};
use matchlens::category::{Category, CategoryFilter};
use matchlens::config::Config;
use matchlens::display::{count_source_label, format_confidence, format_span, or_dash};
use matchlens::filter::{filter_events, partition_buckets};
use matchlens::logging::init_stderr_logging;
use matchlens::normalize::{Bucket, MatchView};
use matchlens::source::{PayloadSource, load_payload};

fn main() -> Result<()> {
    let config = Config::from_env();
    let _ = init_stderr_logging();

    let source = arg_value("--source")
        .map(|raw| PayloadSource::parse(&raw))
        .unwrap_or_else(|| config.source.clone());
    let filter = match arg_value("--filter") {
        Some(raw) => raw.parse::<CategoryFilter>()?,
        None => CategoryFilter::All,
    };
    let bucket = arg_value("--team")
        .map(|raw| raw.parse::<Bucket>())
        .transpose()?;

    let loaded = load_payload(&source, config.http_timeout)
        .with_context(|| format!("unable to load analytics from {source}"))?;
    let view = MatchView::from_payload(loaded.payload);
    let buckets = partition_buckets(&view.events);

    println!("Analytics report");
    println!("Source: {source}");
    println!("Payload: {}", loaded.fingerprint);
    println!(
        "Match: {} (home) vs {} (opposition)",
        view.team_name(Bucket::Blue),
        view.team_name(Bucket::Red)
    );
    println!(
        "Events: {} (red {}, blue {}, undetermined {})",
        buckets.len(),
        buckets.red.len(),
        buckets.blue.len(),
        buckets.undetermined.len()
    );
    println!("Roster entries mapped: {}", view.directory.len());
    if let Some(notes) = view.payload.notes.as_deref() {
        println!("Notes: {notes}");
    }

    let scopes = [
        Scope::Global,
        Scope::Bucket(Bucket::Red),
        Scope::Bucket(Bucket::Blue),
        Scope::Bucket(Bucket::Undetermined),
    ];
    println!();
    print!("{:<14}", "");
    for scope in scopes {
        print!("{:>16}", scope.label());
    }
    println!();
    let counts = scopes
        .iter()
        .map(|scope| aggregate(&view.payload.summary, &view.events, *scope))
        .collect::<Vec<_>>();
    for category in Category::ALL {
        print!("{:<14}", category.title());
        for c in &counts {
            let count = c.get(category);
            print!(
                "{:>16}",
                format!("{} ({})", count.value, count_source_label(count.source))
            );
        }
        println!();
    }

    if let Some(global) = counts.first()
        && !global.by_type.is_empty()
    {
        println!();
        println!("By type:");
        for (kind, n) in &global.by_type {
            println!("  {kind}: {n}");
        }
    }

    for side in [Bucket::Blue, Bucket::Red] {
        let lines = player_lines(&view.events, side);
        if lines.is_empty() {
            continue;
        }
        println!();
        println!("{} players:", view.team_name(side));
        for line in lines {
            println!(
                "  {:<6} {:<18} goals={} passes={} tackles={}",
                line.key.to_string(),
                or_dash(line.name.as_deref()),
                line.goals,
                line.passes,
                line.tackles
            );
        }
    }

    let selected = match bucket {
        Some(b) => vec![b],
        None => Bucket::ALL.to_vec(),
    };
    for side in selected {
        let rows = filter_events(&view.events, side, filter);
        println!();
        println!("Events [team={} category={}]: {}", side.label(), filter, rows.len());
        for e in rows.iter().take(50) {
            println!(
                "  {:<8} {:<12} {:<6} {:<16} {} {} {}",
                e.event.event_id,
                e.event.event_type,
                or_dash(e.event.player_jersey_number.as_deref()),
                or_dash(e.event.player_name.as_deref()),
                format_confidence(e.event.confidence),
                format_span(e),
                or_dash(e.event.notes.as_deref())
            );
        }
        if rows.len() > 50 {
            println!("  ... {} more", rows.len() - 50);
        }
    }

    Ok(())
}

fn arg_value(flag: &str) -> Option<String> {
    let args = std::env::args().skip(1).collect::<Vec<_>>();
    for (idx, arg) in args.iter().enumerate() {
        if arg == flag {
            return args.get(idx + 1).cloned();
        }
        if let Some(rest) = arg.strip_prefix(&format!("{flag}=")) {
            return Some(rest.to_string());
        }
    }
    None
}
