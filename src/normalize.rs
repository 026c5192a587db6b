use crate::category::{Category, CategoryFilter};
use crate::payload::{AnalyticsPayload, RawEvent};
use crate::team::{Team, TeamDirectory};
use crate::team_resolve::{TeamSource, resolve_team};

/// The three disjoint groups an event can land in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Bucket {
    Red,
    Blue,
    Undetermined,
}

impl Bucket {
    pub const ALL: [Bucket; 3] = [Bucket::Red, Bucket::Blue, Bucket::Undetermined];

    pub fn label(self) -> &'static str {
        match self {
            Bucket::Red => "red",
            Bucket::Blue => "blue",
            Bucket::Undetermined => "undetermined",
        }
    }

    pub fn next(self) -> Self {
        match self {
            Bucket::Red => Bucket::Blue,
            Bucket::Blue => Bucket::Undetermined,
            Bucket::Undetermined => Bucket::Red,
        }
    }
}

impl From<Option<Team>> for Bucket {
    fn from(team: Option<Team>) -> Self {
        match team {
            Some(Team::Red) => Bucket::Red,
            Some(Team::Blue) => Bucket::Blue,
            None => Bucket::Undetermined,
        }
    }
}

impl std::str::FromStr for Bucket {
    type Err = anyhow::Error;

    fn from_str(raw: &str) -> anyhow::Result<Self> {
        match raw.trim().to_lowercase().as_str() {
            "red" | "maroon" => Ok(Bucket::Red),
            "blue" => Ok(Bucket::Blue),
            "undetermined" | "none" | "unknown" => Ok(Bucket::Undetermined),
            other => Err(anyhow::anyhow!("unknown team bucket: {other}")),
        }
    }
}

/// A raw event with its resolved team. Categories are not stored; they are
/// predicates evaluated per query.
#[derive(Debug, Clone, PartialEq)]
pub struct EnrichedEvent {
    pub event: RawEvent,
    pub team: Option<Team>,
    pub team_source: Option<TeamSource>,
}

impl EnrichedEvent {
    pub fn bucket(&self) -> Bucket {
        Bucket::from(self.team)
    }

    pub fn is(&self, category: Category) -> bool {
        category.matches(&self.event)
    }

    pub fn passes(&self, filter: CategoryFilter) -> bool {
        filter.accepts(&self.event)
    }

    pub fn categories(&self) -> Vec<Category> {
        Category::matching(&self.event)
    }
}

/// Resolves the team of every event. Order and length are preserved.
pub fn normalize_events(events: &[RawEvent], directory: &TeamDirectory) -> Vec<EnrichedEvent> {
    events
        .iter()
        .map(|event| {
            let resolved = resolve_team(event, directory);
            EnrichedEvent {
                event: event.clone(),
                team: resolved.map(|r| r.team),
                team_source: resolved.map(|r| r.source),
            }
        })
        .collect()
}

/// Everything derived from one payload. Rebuilt from scratch whenever a new
/// payload arrives.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchView {
    pub payload: AnalyticsPayload,
    pub directory: TeamDirectory,
    pub events: Vec<EnrichedEvent>,
}

impl MatchView {
    pub fn from_payload(payload: AnalyticsPayload) -> Self {
        let directory = TeamDirectory::build(&payload.summary.players);
        let events = normalize_events(&payload.per_event, &directory);
        tracing::debug!(
            events = events.len(),
            roster = directory.len(),
            "match view rebuilt"
        );
        Self {
            payload,
            directory,
            events,
        }
    }

    /// Display name for a side: blue is the home team, red the opposition.
    pub fn team_name(&self, bucket: Bucket) -> String {
        let summary = &self.payload.summary;
        let name = match bucket {
            Bucket::Blue => summary.home.as_ref().and_then(|t| t.team_name.clone()),
            Bucket::Red => summary.away.as_ref().and_then(|t| t.team_name.clone()),
            Bucket::Undetermined => None,
        };
        name.filter(|n| !n.trim().is_empty()).unwrap_or_else(|| match bucket {
            Bucket::Red => "Red".to_string(),
            Bucket::Blue => "Blue".to_string(),
            Bucket::Undetermined => "Undetermined".to_string(),
        })
    }
}
