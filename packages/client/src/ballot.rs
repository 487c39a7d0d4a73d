use common::{Ranking, VOTE_SLOTS};

/// A ballot being assembled, before it is sealed.
///
/// Slots hold entry ids; slot index 0 is first place. An entry occupies
/// at most one slot at a time.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BallotDraft {
    slots: [Option<String>; VOTE_SLOTS],
}

impl BallotDraft {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resume a draft from a previously stored ranking.
    pub fn from_ranking(ranking: &Ranking) -> Self {
        Self {
            slots: ranking.slots.clone(),
        }
    }

    /// 1-based rank of an entry, if currently picked.
    pub fn rank_of(&self, entry_id: &str) -> Option<u8> {
        self.slots
            .iter()
            .position(|s| s.as_deref() == Some(entry_id))
            .map(|i| (i + 1) as u8)
    }

    /// Assign an entry to a 1-based rank.
    ///
    /// The entry leaves any slot it held before, the slot's previous
    /// occupant is evicted, and assigning an entry to the rank it already
    /// holds toggles it off. Out-of-range ranks are ignored.
    pub fn select(&mut self, entry_id: &str, rank: u8) {
        let Some(index) = (rank as usize).checked_sub(1) else {
            return;
        };
        if index >= VOTE_SLOTS {
            return;
        }

        if self.slots[index].as_deref() == Some(entry_id) {
            self.slots[index] = None;
            return;
        }

        for slot in &mut self.slots {
            if slot.as_deref() == Some(entry_id) {
                *slot = None;
            }
        }
        self.slots[index] = Some(entry_id.to_string());
    }

    /// Drop an entry from the draft wherever it sits.
    pub fn clear(&mut self, entry_id: &str) {
        for slot in &mut self.slots {
            if slot.as_deref() == Some(entry_id) {
                *slot = None;
            }
        }
    }

    pub fn selected_count(&self) -> usize {
        self.slots.iter().filter(|s| s.is_some()).count()
    }

    pub fn is_complete(&self) -> bool {
        self.selected_count() == VOTE_SLOTS
    }

    /// The ranking to submit. `None` until every slot is filled.
    pub fn ranking(&self) -> Option<Ranking> {
        self.is_complete().then(|| Ranking {
            slots: self.slots.clone(),
        })
    }
}
