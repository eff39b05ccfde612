use hustings_shared::Candidate;

/// In-memory cache of the last-fetched candidate list.
///
/// The list is only ever replaced wholesale through [`CandidateStore::apply`]
/// — there is deliberately no insert/patch API, so no reader can observe a
/// half-updated list and save flows cannot write into it directly (they
/// trigger a refetch instead). Each refresh claims a generation token; of two
/// overlapping refreshes only the newest one's response is applied, the way
/// the stale-fetch nonce guard works in the map client this is modeled on.
#[derive(Debug, Clone, Default)]
pub struct CandidateStore {
    list: Vec<Candidate>,
    generation: u64,
}

impl CandidateStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claim a token for a refresh that is about to start. Starting a newer
    /// refresh invalidates every earlier token.
    pub fn begin_refresh(&mut self) -> u64 {
        self.generation = self.generation.wrapping_add(1);
        self.generation
    }

    /// Replace the list wholesale, unless a newer refresh has started since
    /// `token` was claimed. Returns whether the list was replaced.
    pub fn apply(&mut self, token: u64, list: Vec<Candidate>) -> bool {
        if token != self.generation {
            return false;
        }
        self.list = list;
        true
    }

    pub fn candidates(&self) -> &[Candidate] {
        &self.list
    }

    pub fn find(&self, id: u32) -> Option<&Candidate> {
        self.list.iter().find(|c| c.id == id)
    }
}

#[cfg(test)]
mod tests {
    use super::CandidateStore;
    use hustings_shared::Candidate;

    fn candidate(id: u32) -> Candidate {
        Candidate {
            id,
            name: format!("c{id}"),
            description: String::new(),
            photo_path: String::new(),
            votes: 0,
        }
    }

    #[test]
    fn apply_replaces_wholesale() {
        let mut store = CandidateStore::new();
        let token = store.begin_refresh();
        assert!(store.apply(token, vec![candidate(1), candidate(2)]));
        assert_eq!(store.candidates().len(), 2);

        let token = store.begin_refresh();
        assert!(store.apply(token, vec![candidate(3)]));
        assert_eq!(store.candidates().len(), 1);
        assert!(store.find(3).is_some());
        assert!(store.find(1).is_none());
    }

    #[test]
    fn stale_refresh_is_discarded() {
        let mut store = CandidateStore::new();
        let first = store.begin_refresh();
        let second = store.begin_refresh();

        // The second (newer) fetch resolves first.
        assert!(store.apply(second, vec![candidate(2)]));
        // The first fetch's response arrives late and must not clobber it.
        assert!(!store.apply(first, vec![candidate(1)]));
        assert_eq!(store.candidates().len(), 1);
        assert_eq!(store.candidates()[0].id, 2);
    }

    #[test]
    fn find_misses_return_none() {
        let mut store = CandidateStore::new();
        let token = store.begin_refresh();
        store.apply(token, vec![candidate(5)]);
        assert!(store.find(6).is_none());
        assert_eq!(store.find(5).unwrap().id, 5);
    }
}
