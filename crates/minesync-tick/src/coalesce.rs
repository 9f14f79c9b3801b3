//! Latest-wins coalescing slot.
//!
//! Pointer movement arrives far more often than the network should hear
//! about it. Producers overwrite a single slot; the flushing tick takes
//! whatever is there. Intermediate values are overwritten; only the
//! most recent position matters.

/// A one-value buffer where every push replaces the previous value.
#[derive(Debug, Clone)]
pub struct LatestWins<T> {
    slot: Option<T>,
}

impl<T> LatestWins<T> {
    /// Creates an empty slot.
    pub fn new() -> Self {
        Self { slot: None }
    }

    /// Stores `value`, replacing anything still pending.
    pub fn push(&mut self, value: T) {
        self.slot = Some(value);
    }

    /// Removes and returns the pending value, if any.
    pub fn take(&mut self) -> Option<T> {
        self.slot.take()
    }

    /// Whether a value is waiting to be taken.
    pub fn is_pending(&self) -> bool {
        self.slot.is_some()
    }
}

impl<T> Default for LatestWins<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_slot_has_nothing_pending() {
        let mut slot: LatestWins<(i64, i64)> = LatestWins::new();
        assert!(!slot.is_pending());
        assert_eq!(slot.take(), None);
    }

    #[test]
    fn test_latest_push_wins() {
        let mut slot = LatestWins::new();
        slot.push((1, 1));
        slot.push((2, 2));
        slot.push((3, 4));
        assert!(slot.is_pending());
        assert_eq!(slot.take(), Some((3, 4)));
    }

    #[test]
    fn test_take_clears_the_slot() {
        let mut slot = LatestWins::new();
        slot.push(5);
        assert_eq!(slot.take(), Some(5));
        assert!(!slot.is_pending());
        assert_eq!(slot.take(), None);
    }
}
