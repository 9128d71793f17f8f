/// Single-slot queue for an action deferred until the zoom image loads.
///
/// Queuing over an occupied slot replaces the older action; taking empties
/// the slot, so a queued action can run at most once.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PendingSlot<T> {
    slot: Option<T>,
}

impl<T> Default for PendingSlot<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> PendingSlot<T> {
    pub const fn new() -> Self {
        Self { slot: None }
    }

    /// Stores `action`, returning the one it displaced.
    pub fn queue(&mut self, action: T) -> Option<T> {
        self.slot.replace(action)
    }

    pub fn take(&mut self) -> Option<T> {
        self.slot.take()
    }

    pub fn clear(&mut self) {
        self.slot = None;
    }

    pub fn is_pending(&self) -> bool {
        self.slot.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn queue_overwrites_previous_action() {
        let mut slot = PendingSlot::new();
        assert_eq!(slot.queue(1), None);
        assert_eq!(slot.queue(2), Some(1));
        assert!(slot.is_pending());
        assert_eq!(slot.take(), Some(2));
    }

    #[test]
    fn take_fires_once() {
        let mut slot = PendingSlot::new();
        slot.queue("zoom");
        assert_eq!(slot.take(), Some("zoom"));
        assert_eq!(slot.take(), None);
        assert!(!slot.is_pending());
    }

    #[test]
    fn clear_drops_queued_action() {
        let mut slot = PendingSlot::<u8>::default();
        slot.queue(7);
        slot.clear();
        assert_eq!(slot.take(), None);
    }
}
