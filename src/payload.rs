use std::collections::BTreeMap;

use anyhow::{Context, Result, bail};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// One detected in-match event, exactly as the producer emitted it.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RawEvent {
    #[serde(default, deserialize_with = "lenient_required_string")]
    pub event_id: String,
    #[serde(default, deserialize_with = "lenient_required_string")]
    pub event_type: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub player_jersey_number: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub player_name: Option<String>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub start_time: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub end_time: Option<f64>,
    #[serde(default, deserialize_with = "lenient_boxes")]
    pub bounding_box: Vec<f64>,
    #[serde(default, deserialize_with = "lenient_confidence")]
    pub confidence: f64,
    #[serde(default, deserialize_with = "lenient_string")]
    pub notes: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub team: Option<String>,
}

/// A player-level record from `summary.players`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RosterEntry {
    #[serde(default, deserialize_with = "lenient_string")]
    pub player_jersey_number: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub jersey_number: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub player_name: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub team: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub notes: Option<String>,
}

/// `total_*` counters found on one summary object.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TeamTotals {
    pub team_name: Option<String>,
    totals: BTreeMap<String, u64>,
}

impl TeamTotals {
    pub fn get(&self, field: &str) -> Option<u64> {
        self.totals.get(field).copied()
    }

    pub fn with_total(mut self, field: &str, value: u64) -> Self {
        self.totals.insert(field.to_string(), value);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.totals.is_empty()
    }

    fn from_object(obj: &Map<String, Value>) -> Self {
        let team_name = obj.get("team_name").and_then(value_to_string);
        let totals = obj
            .iter()
            .filter(|(key, _)| key.starts_with("total_"))
            .filter_map(|(key, value)| value_to_count(value).map(|n| (key.clone(), n)))
            .collect();
        Self { team_name, totals }
    }
}

/// Where an aggregate value came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CountSource {
    TopLevel,
    Home,
    Away,
    Computed,
}

/// The summary block. The flat, home/away and roster shapes can all be present
/// in one payload; `authoritative` fixes the order they are consulted in.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Summary {
    pub top_level: TeamTotals,
    pub home: Option<TeamTotals>,
    pub away: Option<TeamTotals>,
    pub players: Vec<RosterEntry>,
}

impl Summary {
    /// Top-level field first, then `home`, then `away`.
    pub fn authoritative(&self, field: &str) -> Option<(u64, CountSource)> {
        if let Some(n) = self.top_level.get(field) {
            return Some((n, CountSource::TopLevel));
        }
        if let Some(n) = self.home.as_ref().and_then(|t| t.get(field)) {
            return Some((n, CountSource::Home));
        }
        self.away
            .as_ref()
            .and_then(|t| t.get(field))
            .map(|n| (n, CountSource::Away))
    }

    pub fn home_total(&self, field: &str) -> Option<u64> {
        self.home.as_ref().and_then(|t| t.get(field))
    }

    pub fn away_total(&self, field: &str) -> Option<u64> {
        self.away.as_ref().and_then(|t| t.get(field))
    }

    fn from_value(value: Option<&Value>) -> Self {
        let Some(obj) = value.and_then(Value::as_object) else {
            return Self::default();
        };
        let side = |key: &str| obj.get(key).and_then(Value::as_object).map(TeamTotals::from_object);
        Self {
            top_level: TeamTotals::from_object(obj),
            home: side("home"),
            away: side("away"),
            players: parse_roster(obj.get("players")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct AnalyticsPayload {
    pub summary: Summary,
    pub per_event: Vec<RawEvent>,
    pub notes: Option<String>,
}

/// Parses the analytics document. Anything short of invalid JSON or a
/// non-object root degrades to defaults instead of failing.
pub fn parse_payload_json(raw: &str) -> Result<AnalyticsPayload> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed == "null" {
        return Ok(AnalyticsPayload::default());
    }

    let root: Value = serde_json::from_str(trimmed).context("invalid analytics json")?;
    let Some(obj) = root.as_object() else {
        bail!("analytics json root is not an object");
    };

    let mut summary = Summary::from_value(obj.get("summary"));
    // Earlier payloads carried the roster next to `summary` instead of inside it.
    if summary.players.is_empty() {
        summary.players = parse_roster(obj.get("players"));
    }

    Ok(AnalyticsPayload {
        summary,
        per_event: parse_events(obj.get("per_event")),
        notes: obj.get("notes").and_then(value_to_string),
    })
}

fn parse_events(value: Option<&Value>) -> Vec<RawEvent> {
    let Some(items) = value.and_then(Value::as_array) else {
        return Vec::new();
    };
    items
        .iter()
        .enumerate()
        .filter_map(|(idx, item)| match RawEvent::deserialize(item) {
            Ok(event) => Some(event),
            Err(err) => {
                tracing::warn!(index = idx, error = %err, "skipping unreadable per_event entry");
                None
            }
        })
        .collect()
}

fn parse_roster(value: Option<&Value>) -> Vec<RosterEntry> {
    let Some(items) = value.and_then(Value::as_array) else {
        return Vec::new();
    };
    items
        .iter()
        .filter_map(|item| RosterEntry::deserialize(item).ok())
        .collect()
}

pub(crate) fn value_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn value_to_f64(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
}

fn value_to_count(value: &Value) -> Option<u64> {
    if let Some(n) = value.as_u64() {
        return Some(n);
    }
    let f = value_to_f64(value)?;
    (f.is_finite() && f >= 0.0 && f.fract() == 0.0).then_some(f as u64)
}

fn lenient_string<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(value_to_string))
}

fn lenient_required_string<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    lenient_string(deserializer).map(Option::unwrap_or_default)
}

fn lenient_f64<'de, D>(deserializer: D) -> std::result::Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(value_to_f64))
}

fn lenient_confidence<'de, D>(deserializer: D) -> std::result::Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    lenient_f64(deserializer).map(|v| v.unwrap_or(0.0))
}

fn lenient_boxes<'de, D>(deserializer: D) -> std::result::Result<Vec<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value
        .as_ref()
        .and_then(Value::as_array)
        .map(|items| items.iter().filter_map(value_to_f64).collect())
        .unwrap_or_default())
}
