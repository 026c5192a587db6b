use crate::category::CategoryFilter;
use crate::normalize::{Bucket, EnrichedEvent};

#[derive(Debug, Default)]
pub struct Buckets<'a> {
    pub red: Vec<&'a EnrichedEvent>,
    pub blue: Vec<&'a EnrichedEvent>,
    pub undetermined: Vec<&'a EnrichedEvent>,
}

impl<'a> Buckets<'a> {
    pub fn get(&self, bucket: Bucket) -> &[&'a EnrichedEvent] {
        match bucket {
            Bucket::Red => &self.red,
            Bucket::Blue => &self.blue,
            Bucket::Undetermined => &self.undetermined,
        }
    }

    pub fn len(&self) -> usize {
        self.red.len() + self.blue.len() + self.undetermined.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Splits events into the three disjoint buckets, keeping input order.
pub fn partition_buckets(events: &[EnrichedEvent]) -> Buckets<'_> {
    let mut out = Buckets::default();
    for e in events {
        match e.bucket() {
            Bucket::Red => out.red.push(e),
            Bucket::Blue => out.blue.push(e),
            Bucket::Undetermined => out.undetermined.push(e),
        }
    }
    out
}

pub fn team_bucket(events: &[EnrichedEvent], bucket: Bucket) -> Vec<&EnrichedEvent> {
    events.iter().filter(|e| e.bucket() == bucket).collect()
}

/// Events of one bucket that pass the category selector.
pub fn filter_events(
    events: &[EnrichedEvent],
    bucket: Bucket,
    filter: CategoryFilter,
) -> Vec<&EnrichedEvent> {
    events
        .iter()
        .filter(|e| e.bucket() == bucket)
        .filter(|e| e.passes(filter))
        .collect()
}
