use crate::segment::Segment;

#[derive(Debug, Copy, Clone, PartialEq)]
pub enum SlotState {
    /// Moved out of view, waiting to be reused.
    Parked,
    Visible(Segment),
}

/// Result of resizing the pool for a new route.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PoolChange {
    /// Slots allocated this round (they start parked).
    pub created: usize,
    /// Previously visible slots that were parked because the route is shorter.
    pub parked: Vec<usize>,
}

/// Persistent drawable segments, reused across routes.
///
/// The pool only ever grows; surplus slots are parked rather than destroyed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SegmentPool {
    slots: Vec<SlotState>,
}

impl SegmentPool {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<SlotState> {
        self.slots.get(index).copied()
    }

    pub fn visible_count(&self) -> usize {
        self.slots
            .iter()
            .filter(|s| matches!(s, SlotState::Visible(_)))
            .count()
    }

    /// Grows the pool to at least `needed` slots and parks everything beyond.
    pub fn prepare(&mut self, needed: usize) -> PoolChange {
        let created = needed.saturating_sub(self.slots.len());
        self.slots.resize(self.slots.len() + created, SlotState::Parked);

        let mut parked = Vec::new();
        for (index, slot) in self.slots.iter_mut().enumerate().skip(needed) {
            if matches!(slot, SlotState::Visible(_)) {
                *slot = SlotState::Parked;
                parked.push(index);
            }
        }
        PoolChange { created, parked }
    }

    /// Returns `false` if `index` is outside the pool.
    pub fn show(&mut self, index: usize, segment: Segment) -> bool {
        let Some(slot) = self.slots.get_mut(index) else {
            return false;
        };
        *slot = SlotState::Visible(segment);
        true
    }
}
