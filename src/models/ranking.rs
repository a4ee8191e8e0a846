//! Ranking rows returned by the contest backend.

use serde::{Deserialize, Serialize};

/// One team's standing in the sales contest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamRanking {
    /// Team display name
    pub team: String,
    /// Accumulated points after penalties
    pub points: i64,
    /// Zone the team competes in, if the row carries it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub zone: Option<String>,
}

impl TeamRanking {
    pub fn new(team: impl Into<String>, points: i64) -> Self {
        Self {
            team: team.into(),
            points,
            zone: None,
        }
    }

    pub fn in_zone(mut self, zone: impl Into<String>) -> Self {
        self.zone = Some(zone.into());
        self
    }
}
