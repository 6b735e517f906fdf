use crate::host::Millis;

/// One-shot scheduled actions keyed by `K`, fired by absolute deadline.
///
/// Deadlines are computed once at schedule time, so skipped or uneven
/// frames never stretch a duration. Scheduling a key that is already
/// pending replaces its deadline (last write wins).
#[derive(Debug, Clone)]
pub struct TimerQueue<K> {
    pending: Vec<(K, Millis)>,
}

impl<K: Copy + PartialEq> TimerQueue<K> {
    pub fn new() -> Self {
        Self {
            pending: Vec::new(),
        }
    }

    pub fn schedule(&mut self, key: K, now: Millis, delay_ms: Millis) {
        let deadline = now.saturating_add(delay_ms);
        match self.pending.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = deadline,
            None => self.pending.push((key, deadline)),
        }
    }

    pub fn cancel(&mut self, key: K) -> bool {
        let before = self.pending.len();
        self.pending.retain(|(k, _)| *k != key);
        self.pending.len() != before
    }

    pub fn deadline(&self, key: K) -> Option<Millis> {
        self.pending
            .iter()
            .find(|(k, _)| *k == key)
            .map(|&(_, at)| at)
    }

    /// Remove and return every key whose deadline is `<= now`, earliest
    /// first.
    pub fn pop_due(&mut self, now: Millis) -> Vec<K> {
        let mut due: Vec<(K, Millis)> = Vec::new();
        self.pending.retain(|&(k, at)| {
            if at <= now {
                due.push((k, at));
                false
            } else {
                true
            }
        });
        due.sort_by_key(|&(_, at)| at);
        due.into_iter().map(|(k, _)| k).collect()
    }

    pub fn clear(&mut self) {
        self.pending.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}

impl<K: Copy + PartialEq> Default for TimerQueue<K> {
    fn default() -> Self {
        Self::new()
    }
}
