use std::fmt;
use std::str::FromStr;

use anyhow::{Result, anyhow};

use crate::payload::RawEvent;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Category {
    Goal,
    Pass,
    Tackle,
    MissShot,
    Save,
    Corner,
    Freekick,
    Penalty,
}

impl Category {
    pub const ALL: [Category; 8] = [
        Category::Goal,
        Category::Pass,
        Category::Tackle,
        Category::MissShot,
        Category::Save,
        Category::Corner,
        Category::Freekick,
        Category::Penalty,
    ];

    /// Independent predicate; an event can satisfy several categories.
    pub fn matches(self, event: &RawEvent) -> bool {
        let text = EventText::of(event);
        self.matches_text(&text)
    }

    /// Counting rule for computed totals. Same as `matches`, except a goal is
    /// any event typed "goal", penalty notes or not.
    pub fn tallies(self, event: &RawEvent) -> bool {
        let text = EventText::of(event);
        match self {
            Category::Goal => text.kind == "goal",
            other => other.matches_text(&text),
        }
    }

    /// Every category the event satisfies, in `ALL` order.
    pub fn matching(event: &RawEvent) -> Vec<Category> {
        let text = EventText::of(event);
        Self::ALL
            .into_iter()
            .filter(|c| c.matches_text(&text))
            .collect()
    }

    fn matches_text(self, text: &EventText) -> bool {
        let kind = text.kind.as_str();
        let notes = text.notes.as_str();
        match self {
            Category::Goal => kind == "goal" && !notes.contains("penalty"),
            Category::Pass => kind == "pass",
            Category::Tackle => kind == "tackle",
            Category::MissShot => kind == "miss shot" || kind == "missed shot",
            Category::Save => kind == "save" || kind == "goal save",
            Category::Corner => kind == "corner" || notes.contains("corner"),
            Category::Freekick => kind == "freekick" || notes.contains("free kick"),
            // Covers goals, saves and missed shots whose notes mention a penalty.
            Category::Penalty => kind == "penalty" || notes.contains("penalty"),
        }
    }

    /// Key of the matching counter in the summary payload.
    pub fn summary_field(self) -> &'static str {
        match self {
            Category::Goal => "total_goals",
            Category::Pass => "total_passes",
            Category::Tackle => "total_tackles",
            Category::MissShot => "total_missed_shots",
            Category::Save => "total_saves",
            Category::Corner => "total_corners",
            Category::Freekick => "total_freekicks",
            Category::Penalty => "total_penalties",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Category::Goal => "Goals",
            Category::Pass => "Passes",
            Category::Tackle => "Tackles",
            Category::MissShot => "Missed Shots",
            Category::Save => "Saves",
            Category::Corner => "Corners",
            Category::Freekick => "Free Kicks",
            Category::Penalty => "Penalties",
        }
    }

    /// Dropdown token.
    pub fn token(self) -> &'static str {
        match self {
            Category::Goal => "goal",
            Category::Pass => "pass",
            Category::Tackle => "tackle",
            Category::MissShot => "miss shot",
            Category::Save => "save",
            Category::Corner => "corner",
            Category::Freekick => "freekick",
            Category::Penalty => "penalty",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

struct EventText {
    kind: String,
    notes: String,
}

impl EventText {
    fn of(event: &RawEvent) -> Self {
        Self {
            kind: event.event_type.trim().to_lowercase(),
            notes: event.notes.as_deref().unwrap_or_default().to_lowercase(),
        }
    }
}

/// Category selector of the events table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CategoryFilter {
    #[default]
    All,
    Only(Category),
}

impl CategoryFilter {
    /// Dropdown order.
    pub const OPTIONS: [CategoryFilter; 9] = [
        CategoryFilter::All,
        CategoryFilter::Only(Category::Corner),
        CategoryFilter::Only(Category::Freekick),
        CategoryFilter::Only(Category::Goal),
        CategoryFilter::Only(Category::MissShot),
        CategoryFilter::Only(Category::Pass),
        CategoryFilter::Only(Category::Penalty),
        CategoryFilter::Only(Category::Save),
        CategoryFilter::Only(Category::Tackle),
    ];

    pub fn accepts(self, event: &RawEvent) -> bool {
        match self {
            CategoryFilter::All => true,
            CategoryFilter::Only(category) => category.matches(event),
        }
    }

    pub fn token(self) -> &'static str {
        match self {
            CategoryFilter::All => "all",
            CategoryFilter::Only(category) => category.token(),
        }
    }

    pub fn next(self) -> Self {
        self.step(1)
    }

    pub fn prev(self) -> Self {
        self.step(Self::OPTIONS.len() - 1)
    }

    fn step(self, by: usize) -> Self {
        let idx = Self::OPTIONS
            .iter()
            .position(|opt| *opt == self)
            .unwrap_or(0);
        Self::OPTIONS[(idx + by) % Self::OPTIONS.len()]
    }
}

impl FromStr for CategoryFilter {
    type Err = anyhow::Error;

    fn from_str(raw: &str) -> Result<Self> {
        let token = raw.trim().to_lowercase().replace(['_', '-'], " ");
        let filter = match token.as_str() {
            "all" | "" => CategoryFilter::All,
            "corner" => CategoryFilter::Only(Category::Corner),
            "freekick" | "free kick" => CategoryFilter::Only(Category::Freekick),
            "goal" => CategoryFilter::Only(Category::Goal),
            "miss shot" | "missed shot" => CategoryFilter::Only(Category::MissShot),
            "pass" => CategoryFilter::Only(Category::Pass),
            "penalty" => CategoryFilter::Only(Category::Penalty),
            "save" => CategoryFilter::Only(Category::Save),
            "tackle" => CategoryFilter::Only(Category::Tackle),
            _ => return Err(anyhow!("unknown category filter: {raw}")),
        };
        Ok(filter)
    }
}

impl fmt::Display for CategoryFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}
