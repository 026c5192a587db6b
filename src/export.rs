use std::path::Path;

use anyhow::{Context, Result};
use rust_xlsxwriter::{Workbook, Worksheet};

use crate::aggregate::{Scope, aggregate, player_lines};
use crate::category::Category;
use crate::display::{
    categories_label, count_source_label, format_clock, format_confidence, or_dash,
};
use crate::normalize::{Bucket, MatchView};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportReport {
    pub summary_rows: usize,
    pub events: usize,
    pub players: usize,
}

pub fn export_match_xlsx(path: &Path, view: &MatchView) -> Result<ExportReport> {
    let summary_rows = summary_rows(view);
    let event_rows = event_rows(view);
    let player_rows = player_rows(view);

    let mut workbook = Workbook::new();
    {
        let sheet = workbook.add_worksheet();
        sheet.set_name("Summary")?;
        write_rows(sheet, &summary_rows)?;
    }
    {
        let sheet = workbook.add_worksheet();
        sheet.set_name("Events")?;
        write_rows(sheet, &event_rows)?;
    }
    {
        let sheet = workbook.add_worksheet();
        sheet.set_name("Players")?;
        write_rows(sheet, &player_rows)?;
    }
    workbook
        .save(path)
        .with_context(|| format!("failed to save {}", path.display()))?;

    Ok(ExportReport {
        summary_rows: summary_rows.len().saturating_sub(1),
        events: event_rows.len().saturating_sub(1),
        players: player_rows.len().saturating_sub(1),
    })
}

fn summary_rows(view: &MatchView) -> Vec<Vec<String>> {
    let mut rows = vec![vec![
        "Scope".to_string(),
        "Category".to_string(),
        "Value".to_string(),
        "Source".to_string(),
    ]];
    let scopes = [
        Scope::Global,
        Scope::Bucket(Bucket::Red),
        Scope::Bucket(Bucket::Blue),
        Scope::Bucket(Bucket::Undetermined),
    ];
    for scope in scopes {
        let counts = aggregate(&view.payload.summary, &view.events, scope);
        for category in Category::ALL {
            let count = counts.get(category);
            rows.push(vec![
                scope.label().to_string(),
                category.title().to_string(),
                count.value.to_string(),
                count_source_label(count.source).to_string(),
            ]);
        }
    }
    rows
}

fn event_rows(view: &MatchView) -> Vec<Vec<String>> {
    let mut rows = vec![vec![
        "Event ID".to_string(),
        "Type".to_string(),
        "Jersey No.".to_string(),
        "Player".to_string(),
        "Team".to_string(),
        "Team From".to_string(),
        "Categories".to_string(),
        "Confidence".to_string(),
        "Start".to_string(),
        "End".to_string(),
        "Notes".to_string(),
    ]];
    rows.extend(view.events.iter().map(|e| {
        vec![
            e.event.event_id.clone(),
            e.event.event_type.clone(),
            or_dash(e.event.player_jersey_number.as_deref()),
            or_dash(e.event.player_name.as_deref()),
            e.bucket().label().to_string(),
            e.team_source
                .map(|s| s.label().to_string())
                .unwrap_or_else(|| "-".to_string()),
            categories_label(&e.categories()),
            format_confidence(e.event.confidence),
            format_clock(e.event.start_time),
            format_clock(e.event.end_time),
            or_dash(e.event.notes.as_deref()),
        ]
    }));
    rows
}

fn player_rows(view: &MatchView) -> Vec<Vec<String>> {
    let mut rows = vec![vec![
        "Team".to_string(),
        "Player".to_string(),
        "Name".to_string(),
        "Goals".to_string(),
        "Passes".to_string(),
        "Tackles".to_string(),
    ]];
    for bucket in [Bucket::Blue, Bucket::Red] {
        let team = view.team_name(bucket);
        rows.extend(player_lines(&view.events, bucket).into_iter().map(|line| {
            vec![
                team.clone(),
                line.key.to_string(),
                or_dash(line.name.as_deref()),
                line.goals.to_string(),
                line.passes.to_string(),
                line.tackles.to_string(),
            ]
        }));
    }
    rows
}

fn write_rows(worksheet: &mut Worksheet, rows: &[Vec<String>]) -> Result<()> {
    for (row_idx, row) in rows.iter().enumerate() {
        for (col_idx, value) in row.iter().enumerate() {
            worksheet
                .write_string(row_idx as u32, col_idx as u16, value)
                .with_context(|| format!("write cell ({row_idx},{col_idx})"))?;
        }
    }
    Ok(())
}
