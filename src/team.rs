use std::collections::HashMap;
use std::fmt;

use crate::payload::{RawEvent, RosterEntry};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Team {
    Red,
    Blue,
}

impl Team {
    pub fn label(self) -> &'static str {
        match self {
            Team::Red => "red",
            Team::Blue => "blue",
        }
    }
}

/// Lowercases a team label and collapses synonyms. Labels that are neither
/// side resolve to `None`.
pub fn normalize_team(label: &str) -> Option<Team> {
    match label.trim().to_lowercase().as_str() {
        "red" | "maroon" => Some(Team::Red),
        "blue" | "light blue" => Some(Team::Blue),
        _ => None,
    }
}

/// Free-text fallback. Red keywords are checked before blue ones.
pub fn infer_team_from_notes(notes: &str) -> Option<Team> {
    let lower = notes.to_lowercase();
    if lower.contains("red") || lower.contains("maroon") {
        Some(Team::Red)
    } else if lower.contains("blue") || lower.contains("light blue") {
        Some(Team::Blue)
    } else {
        None
    }
}

/// Lookup key for the directory. A jersey number and a player name with the
/// same text are different keys.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PlayerKey {
    Jersey(String),
    Name(String),
}

impl PlayerKey {
    /// `player_jersey_number`, then `jersey_number`, then `player_name`; the
    /// first non-empty value after trimming wins.
    pub fn for_roster(entry: &RosterEntry) -> Option<Self> {
        if let Some(num) = non_empty(entry.player_jersey_number.as_deref())
            .or_else(|| non_empty(entry.jersey_number.as_deref()))
        {
            return Some(PlayerKey::Jersey(num.to_string()));
        }
        non_empty(entry.player_name.as_deref()).map(|name| PlayerKey::Name(name.to_string()))
    }

    /// Jersey if the event carries one at all, otherwise the player name.
    pub fn for_event(event: &RawEvent) -> Option<Self> {
        if let Some(num) = event.player_jersey_number.as_deref() {
            return Some(PlayerKey::Jersey(num.trim().to_string()));
        }
        event
            .player_name
            .as_deref()
            .map(|name| PlayerKey::Name(name.trim().to_string()))
    }

    pub fn as_str(&self) -> &str {
        match self {
            PlayerKey::Jersey(s) | PlayerKey::Name(s) => s,
        }
    }
}

impl fmt::Display for PlayerKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlayerKey::Jersey(num) => write!(f, "#{num}"),
            PlayerKey::Name(name) => f.write_str(name),
        }
    }
}

/// Player identifier to team, built once per payload.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TeamDirectory {
    entries: HashMap<PlayerKey, Team>,
}

impl TeamDirectory {
    pub fn build(roster: &[RosterEntry]) -> Self {
        let mut entries = HashMap::with_capacity(roster.len());
        for (idx, entry) in roster.iter().enumerate() {
            let Some(key) = PlayerKey::for_roster(entry) else {
                tracing::debug!(index = idx, "roster entry has no identifier");
                continue;
            };
            let team = match non_empty(entry.team.as_deref()) {
                Some(label) => normalize_team(label),
                None => entry.notes.as_deref().and_then(infer_team_from_notes),
            };
            let Some(team) = team else {
                tracing::debug!(index = idx, player = %key, "roster entry has no usable team");
                continue;
            };
            // Later entries overwrite earlier ones for the same key.
            entries.insert(key, team);
        }
        Self { entries }
    }

    pub fn get(&self, key: &PlayerKey) -> Option<Team> {
        self.entries.get(key).copied()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|s| !s.is_empty())
}
