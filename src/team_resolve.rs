use crate::payload::RawEvent;
use crate::team::{PlayerKey, Team, TeamDirectory, infer_team_from_notes, normalize_team};

/// Which piece of evidence decided the team.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TeamSource {
    Explicit,
    Roster,
    Notes,
}

impl TeamSource {
    pub fn label(self) -> &'static str {
        match self {
            TeamSource::Explicit => "tag",
            TeamSource::Roster => "roster",
            TeamSource::Notes => "notes",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TeamResolution {
    pub team: Team,
    pub source: TeamSource,
}

/// Explicit tag, then roster lookup, then notes text. `None` means the event
/// is undetermined.
pub fn resolve_team(event: &RawEvent, directory: &TeamDirectory) -> Option<TeamResolution> {
    let explicit = event.team.as_deref().and_then(normalize_team);
    if let Some(team) = explicit {
        return Some(TeamResolution {
            team,
            source: TeamSource::Explicit,
        });
    }

    let rostered = PlayerKey::for_event(event).and_then(|key| directory.get(&key));
    if let Some(team) = rostered {
        return Some(TeamResolution {
            team,
            source: TeamSource::Roster,
        });
    }

    event
        .notes
        .as_deref()
        .and_then(infer_team_from_notes)
        .map(|team| TeamResolution {
            team,
            source: TeamSource::Notes,
        })
}
