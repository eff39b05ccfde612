use hustings_shared::Candidate;

/// One row of the live ranking. Derived from the candidate store on every
/// refresh, never cached across refreshes.
#[derive(Debug, Clone, PartialEq)]
pub struct RankingEntry {
    /// 1-based rank by sorted order.
    pub position: usize,
    pub candidate: Candidate,
    /// Vote share in percent, rounded to one decimal. `0.0` when no votes
    /// have been cast at all.
    pub percentage: f64,
}

/// Project the candidate list into ranked rows: votes descending, ties kept
/// in list order (stable sort — no other tie-break exists in the data).
pub fn rank(candidates: &[Candidate]) -> Vec<RankingEntry> {
    let total: u64 = candidates.iter().map(|c| u64::from(c.votes)).sum();

    let mut sorted: Vec<&Candidate> = candidates.iter().collect();
    sorted.sort_by(|a, b| b.votes.cmp(&a.votes));

    sorted
        .into_iter()
        .enumerate()
        .map(|(index, candidate)| RankingEntry {
            position: index + 1,
            candidate: candidate.clone(),
            percentage: share_percent(candidate.votes, total),
        })
        .collect()
}

fn share_percent(votes: u32, total: u64) -> f64 {
    if total == 0 {
        return 0.0;
    }
    (f64::from(votes) / total as f64 * 1000.0).round() / 10.0
}

/// Headline counters for the dashboard tiles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Summary {
    pub total_votes: u64,
    pub total_candidates: usize,
    pub top_votes: u32,
}

pub fn summarize(candidates: &[Candidate]) -> Summary {
    Summary {
        total_votes: candidates.iter().map(|c| u64::from(c.votes)).sum(),
        total_candidates: candidates.len(),
        top_votes: candidates.iter().map(|c| c.votes).max().unwrap_or(0),
    }
}

#[cfg(test)]
mod tests {
    use super::{rank, summarize};
    use hustings_shared::Candidate;

    fn candidate(id: u32, votes: u32) -> Candidate {
        Candidate {
            id,
            name: format!("c{id}"),
            description: String::new(),
            photo_path: String::new(),
            votes,
        }
    }

    #[test]
    fn sorts_by_votes_with_stable_ties() {
        let list = vec![candidate(1, 5), candidate(2, 5), candidate(3, 9)];
        let ids: Vec<u32> = rank(&list).iter().map(|e| e.candidate.id).collect();
        assert_eq!(ids, vec![3, 1, 2]);
    }

    #[test]
    fn positions_are_one_based_rank_order() {
        let list = vec![candidate(1, 2), candidate(2, 7)];
        let ranked = rank(&list);
        assert_eq!(ranked[0].position, 1);
        assert_eq!(ranked[0].candidate.id, 2);
        assert_eq!(ranked[1].position, 2);
    }

    #[test]
    fn zero_total_means_all_zero_percentages() {
        let list = vec![candidate(1, 0), candidate(2, 0)];
        assert!(rank(&list).iter().all(|e| e.percentage == 0.0));
    }

    #[test]
    fn percentages_round_to_one_decimal() {
        let list = vec![candidate(1, 1), candidate(2, 2)];
        let ranked = rank(&list);
        assert_eq!(ranked[0].percentage, 66.7);
        assert_eq!(ranked[1].percentage, 33.3);
    }

    #[test]
    fn percentage_sum_stays_within_rounding_slack() {
        let list = vec![
            candidate(1, 1),
            candidate(2, 1),
            candidate(3, 1),
            candidate(4, 1),
            candidate(5, 1),
            candidate(6, 1),
            candidate(7, 1),
        ];
        let sum: f64 = rank(&list).iter().map(|e| e.percentage).sum();
        let slack = 0.1 * (list.len() - 1) as f64;
        assert!((sum - 100.0).abs() <= slack, "sum was {sum}");
    }

    #[test]
    fn summary_counts() {
        let list = vec![candidate(1, 4), candidate(2, 9), candidate(3, 0)];
        let summary = summarize(&list);
        assert_eq!(summary.total_votes, 13);
        assert_eq!(summary.total_candidates, 3);
        assert_eq!(summary.top_votes, 9);
    }

    #[test]
    fn summary_of_empty_list_is_zeroed() {
        let summary = summarize(&[]);
        assert_eq!(summary.total_votes, 0);
        assert_eq!(summary.top_votes, 0);
    }
}
