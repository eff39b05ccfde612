use serde::{Deserialize, Serialize};

/// Event-wide voting rules, read and written through `/vote/config`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VoteConfig {
    #[serde(default)]
    pub vote_name: String,
    #[serde(default = "default_max_votes")]
    pub max_votes_per_user: u32,
}

fn default_max_votes() -> u32 {
    1
}

impl Default for VoteConfig {
    fn default() -> Self {
        Self {
            vote_name: String::new(),
            max_votes_per_user: 1,
        }
    }
}

/// Aggregate counters from `/votes/statistics`. The server also embeds the
/// full candidate list in this payload; it is ignored here, the candidate
/// store is the single source for that.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VoteStatistics {
    #[serde(default)]
    pub total_votes: u32,
    #[serde(default)]
    pub total_candidates: u32,
    #[serde(default)]
    pub unique_voters: u32,
    #[serde(default)]
    pub max_votes_per_user: u32,
    #[serde(default)]
    pub avg_votes_per_candidate: f64,
    #[serde(default)]
    pub vote_completion_rate: f64,
}

#[cfg(test)]
mod tests {
    use super::{VoteConfig, VoteStatistics};

    #[test]
    fn config_defaults_apply() {
        let cfg: VoteConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(cfg.vote_name, "");
        assert_eq!(cfg.max_votes_per_user, 1);
    }

    #[test]
    fn statistics_ignore_embedded_candidate_list() {
        let stats: VoteStatistics = serde_json::from_str(
            r#"{
                "total_votes": 42,
                "total_candidates": 4,
                "unique_voters": 42,
                "max_votes_per_user": 3,
                "avg_votes_per_candidate": 10.5,
                "vote_completion_rate": 14.0,
                "candidates": [],
                "top_candidate": null
            }"#,
        )
        .unwrap();
        assert_eq!(stats.total_votes, 42);
        assert_eq!(stats.avg_votes_per_candidate, 10.5);
    }
}
