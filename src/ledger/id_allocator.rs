/// First id handed out by a fresh allocator.
pub const FIRST_ID: u64 = 1001;

/// Hands out monotonically increasing transaction ids.
///
/// The counter is never persisted; after a reload it is re-derived from the
/// largest id passed to [`IdAllocator::observe`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdAllocator {
    next: u64,
}

impl IdAllocator {
    pub fn new() -> Self {
        Self { next: FIRST_ID }
    }

    /// Returns the current counter value and advances it.
    pub fn next_id(&mut self) -> u64 {
        let id = self.next;
        self.next += 1;
        id
    }

    /// The id the next call to [`IdAllocator::next_id`] will return.
    pub fn peek(&self) -> u64 {
        self.next
    }

    /// Registers an id read from storage so new ids never collide with it.
    pub fn observe(&mut self, id: u64) {
        self.next = self.next.max(id.saturating_add(1));
    }
}

impl Default for IdAllocator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_at_first_id_and_increments() {
        let mut ids = IdAllocator::new();
        assert_eq!(ids.next_id(), 1001);
        assert_eq!(ids.next_id(), 1002);
        assert_eq!(ids.peek(), 1003);
    }

    #[test]
    fn observe_only_moves_forward() {
        let mut ids = IdAllocator::new();
        ids.observe(2000);
        assert_eq!(ids.peek(), 2001);
        ids.observe(5);
        assert_eq!(ids.next_id(), 2001);
    }
}
