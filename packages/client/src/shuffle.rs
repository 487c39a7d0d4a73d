use common::Entry;
use rand::seq::SliceRandom;

/// Per-contest display order for the voting gallery.
///
/// Entries are shuffled once so the upload order does not bias ballots,
/// then the order is pinned. It is recomputed only when the contest or
/// the entry count changes (an upload or withdrawal landed), never on a
/// plain refresh, so photos do not jump around mid-deliberation.
#[derive(Default)]
pub struct ShuffleCache {
    key: Option<(String, usize)>,
    order: Vec<String>,
}

impl ShuffleCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Arrange `entries` in this contest's pinned order, reshuffling
    /// first if the cache is stale.
    pub fn arrange(&mut self, contest_id: &str, entries: &[Entry]) -> Vec<Entry> {
        let key = (contest_id.to_string(), entries.len());
        if self.key.as_ref() != Some(&key) {
            let mut ids: Vec<String> = entries.iter().map(|e| e.id.clone()).collect();
            ids.shuffle(&mut rand::rng());
            self.order = ids;
            self.key = Some(key);
        }

        let mut arranged: Vec<Entry> = self
            .order
            .iter()
            .filter_map(|id| entries.iter().find(|e| &e.id == id).cloned())
            .collect();
        // Ids the pinned order has not seen keep their incoming position
        // at the tail until the next reshuffle.
        for entry in entries {
            if !self.order.contains(&entry.id) {
                arranged.push(entry.clone());
            }
        }
        arranged
    }
}
