//! Ordered store of issued predictions.
//!
//! Entries are keyed by an insertion sequence number so iteration order is
//! creation order. Resolved entries beyond the history cap are pruned oldest
//! first; pending entries are never dropped.

use std::collections::{BTreeMap, HashMap};
use tick_oracle_core::{Direction, MultiLevelAccuracy, Prediction, PredictionId};

#[derive(Debug, Clone)]
pub struct PredictionLedger {
    entries: BTreeMap<u64, Prediction>,
    index: HashMap<PredictionId, u64>,
    next_seq: u64,
    resolved: usize,
    max_resolved: usize,
}

impl PredictionLedger {
    /// Creates an empty ledger.
    ///
    /// # Arguments
    ///
    /// * `max_resolved` - Resolved predictions kept before the oldest are pruned
    #[must_use]
    pub fn new(max_resolved: usize) -> Self {
        Self {
            entries: BTreeMap::new(),
            index: HashMap::new(),
            next_seq: 0,
            resolved: 0,
            max_resolved,
        }
    }

    /// Stores a new prediction and returns its id.
    pub fn insert(&mut self, prediction: Prediction) -> PredictionId {
        let id = prediction.id;
        let seq = self.next_seq;
        self.next_seq += 1;

        if prediction.resolved {
            self.resolved += 1;
        }
        self.index.insert(id, seq);
        self.entries.insert(seq, prediction);
        id
    }

    #[must_use]
    pub fn get(&self, id: &PredictionId) -> Option<&Prediction> {
        self.index.get(id).and_then(|seq| self.entries.get(seq))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub const fn resolved_count(&self) -> usize {
        self.resolved
    }

    #[must_use]
    pub fn pending_count(&self) -> usize {
        self.entries.len() - self.resolved
    }

    /// Ids of unresolved predictions whose horizon has elapsed at `now_ms`,
    /// soonest expiry first.
    #[must_use]
    pub fn due(&self, now_ms: i64) -> Vec<PredictionId> {
        let mut due: Vec<(i64, u64, PredictionId)> = self
            .entries
            .iter()
            .filter(|(_, p)| p.is_due(now_ms))
            .map(|(seq, p)| (p.expires_at_ms, *seq, p.id))
            .collect();
        due.sort_unstable_by_key(|&(expires, seq, _)| (expires, seq));
        due.into_iter().map(|(_, _, id)| id).collect()
    }

    /// Resolves one entry in place. Returns the resolved prediction, or
    /// `None` if the id is unknown or was already resolved.
    pub fn resolve(
        &mut self,
        id: &PredictionId,
        actual_direction: Direction,
        actual_price: f64,
        resolved_at_ms: i64,
        levels: MultiLevelAccuracy,
    ) -> Option<&Prediction> {
        let seq = *self.index.get(id)?;
        let prediction = self.entries.get_mut(&seq)?;
        if !prediction.resolve(actual_direction, actual_price, resolved_at_ms, levels) {
            return None;
        }
        self.resolved += 1;
        Some(prediction)
    }

    /// Unresolved predictions, soonest expiry first.
    #[must_use]
    pub fn pending(&self) -> Vec<Prediction> {
        let mut pending: Vec<(u64, &Prediction)> = self
            .entries
            .iter()
            .filter(|(_, p)| !p.resolved)
            .map(|(seq, p)| (*seq, p))
            .collect();
        pending.sort_by_key(|(seq, p)| (p.expires_at_ms, *seq));
        pending.into_iter().map(|(_, p)| p.clone()).collect()
    }

    /// Up to `count` predictions, newest first, regardless of status.
    #[must_use]
    pub fn recent(&self, count: usize) -> Vec<Prediction> {
        self.entries.values().rev().take(count).cloned().collect()
    }

    /// Drops the oldest resolved entries beyond the history cap.
    /// Returns the number of entries removed.
    pub fn prune(&mut self) -> usize {
        let excess = self.resolved.saturating_sub(self.max_resolved);
        if excess == 0 {
            return 0;
        }

        let doomed: Vec<u64> = self
            .entries
            .iter()
            .filter(|(_, p)| p.resolved)
            .map(|(seq, _)| *seq)
            .take(excess)
            .collect();

        for seq in &doomed {
            if let Some(prediction) = self.entries.remove(seq) {
                self.index.remove(&prediction.id);
            }
        }
        self.resolved -= doomed.len();
        doomed.len()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.index.clear();
        self.resolved = 0;
    }
}
