use std::collections::{BTreeMap, HashMap};

use crate::category::Category;
use crate::normalize::{Bucket, EnrichedEvent};
use crate::payload::{CountSource, Summary};
use crate::team::PlayerKey;

/// Which events (and which summary block) a set of counts describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
    Global,
    Bucket(Bucket),
}

impl Scope {
    pub fn label(self) -> &'static str {
        match self {
            Scope::Global => "all",
            Scope::Bucket(bucket) => bucket.label(),
        }
    }

    fn includes(self, event: &EnrichedEvent) -> bool {
        match self {
            Scope::Global => true,
            Scope::Bucket(bucket) => event.bucket() == bucket,
        }
    }

    fn authoritative(self, summary: &Summary, field: &str) -> Option<(u64, CountSource)> {
        match self {
            Scope::Global => summary.authoritative(field),
            Scope::Bucket(Bucket::Blue) => summary.home_total(field).map(|n| (n, CountSource::Home)),
            Scope::Bucket(Bucket::Red) => summary.away_total(field).map(|n| (n, CountSource::Away)),
            Scope::Bucket(Bucket::Undetermined) => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CategoryCount {
    pub value: u64,
    pub source: CountSource,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AggregateCounts {
    pub scope: Scope,
    pub events: usize,
    pub counts: BTreeMap<Category, CategoryCount>,
    /// Verbatim `event_type` histogram for the "all" view.
    pub by_type: BTreeMap<String, usize>,
}

impl AggregateCounts {
    pub fn get(&self, category: Category) -> CategoryCount {
        self.counts.get(&category).copied().unwrap_or(CategoryCount {
            value: 0,
            source: CountSource::Computed,
        })
    }

    pub fn value(&self, category: Category) -> u64 {
        self.get(category).value
    }
}

/// Summary value when the payload has one for this scope, otherwise the
/// number of in-scope events the category's counting rule accepts.
pub fn aggregate(summary: &Summary, events: &[EnrichedEvent], scope: Scope) -> AggregateCounts {
    let in_scope: Vec<&EnrichedEvent> = events.iter().filter(|e| scope.includes(e)).collect();

    let counts = Category::ALL
        .into_iter()
        .map(|category| {
            let count = match scope.authoritative(summary, category.summary_field()) {
                Some((value, source)) => CategoryCount { value, source },
                None => CategoryCount {
                    value: in_scope.iter().filter(|e| category.tallies(&e.event)).count() as u64,
                    source: CountSource::Computed,
                },
            };
            (category, count)
        })
        .collect();

    let mut by_type = BTreeMap::new();
    for e in &in_scope {
        *by_type.entry(e.event.event_type.clone()).or_insert(0) += 1;
    }

    AggregateCounts {
        scope,
        events: in_scope.len(),
        counts,
        by_type,
    }
}

/// Per-player line of a team table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayerLine {
    pub key: PlayerKey,
    pub name: Option<String>,
    pub goals: u64,
    pub passes: u64,
    pub tackles: u64,
}

/// Groups a bucket's events by player, in order of first appearance. Events
/// with neither jersey nor name are left out.
pub fn player_lines(events: &[EnrichedEvent], bucket: Bucket) -> Vec<PlayerLine> {
    let mut lines: Vec<PlayerLine> = Vec::new();
    let mut index: HashMap<PlayerKey, usize> = HashMap::new();

    for e in events.iter().filter(|e| e.bucket() == bucket) {
        let Some(key) = PlayerKey::for_event(&e.event) else {
            continue;
        };
        let slot = *index.entry(key.clone()).or_insert_with(|| {
            lines.push(PlayerLine {
                key,
                name: None,
                goals: 0,
                passes: 0,
                tackles: 0,
            });
            lines.len() - 1
        });
        let line = &mut lines[slot];
        if line.name.is_none() {
            line.name = e
                .event
                .player_name
                .as_deref()
                .map(str::trim)
                .filter(|n| !n.is_empty())
                .map(str::to_string);
        }
        if Category::Goal.tallies(&e.event) {
            line.goals += 1;
        }
        if Category::Pass.tallies(&e.event) {
            line.passes += 1;
        }
        if Category::Tackle.tallies(&e.event) {
            line.tackles += 1;
        }
    }

    lines
}
