use crate::category::Category;
use crate::normalize::EnrichedEvent;
use crate::payload::CountSource;

/// `mm:ss`, or `-` when the time is missing or not a usable number.
pub fn format_clock(seconds: Option<f64>) -> String {
    let Some(s) = seconds.filter(|s| s.is_finite() && *s >= 0.0) else {
        return "-".to_string();
    };
    let mins = (s / 60.0).floor() as u64;
    let secs = (s % 60.0).floor() as u64;
    format!("{mins:02}:{secs:02}")
}

pub fn format_span(event: &EnrichedEvent) -> String {
    format!(
        "{} - {}",
        format_clock(event.event.start_time),
        format_clock(event.event.end_time)
    )
}

pub fn format_confidence(confidence: f64) -> String {
    if confidence.is_finite() {
        format!("{confidence:.2}")
    } else {
        "0.00".to_string()
    }
}

pub fn or_dash(value: Option<&str>) -> String {
    match value.map(str::trim) {
        Some(s) if !s.is_empty() => s.to_string(),
        _ => "-".to_string(),
    }
}

pub fn count_source_label(source: CountSource) -> &'static str {
    match source {
        CountSource::TopLevel => "summary",
        CountSource::Home => "home",
        CountSource::Away => "away",
        CountSource::Computed => "events",
    }
}

pub fn categories_label(categories: &[Category]) -> String {
    if categories.is_empty() {
        return "-".to_string();
    }
    categories
        .iter()
        .map(|c| c.token())
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clock_formats_minutes_and_seconds() {
        assert_eq!(format_clock(Some(0.0)), "00:00");
        assert_eq!(format_clock(Some(754.9)), "12:34");
        assert_eq!(format_clock(Some(f64::NAN)), "-");
        assert_eq!(format_clock(None), "-");
    }

    #[test]
    fn blanks_become_dashes() {
        assert_eq!(or_dash(Some("  ")), "-");
        assert_eq!(or_dash(None), "-");
        assert_eq!(or_dash(Some(" 9 ")), "9");
        assert_eq!(format_confidence(0.876), "0.88");
    }
}
