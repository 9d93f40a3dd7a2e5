use foundation::ids::CityId;

/// The two most recently clicked cities, oldest first.
///
/// Ordering contract:
/// - At most two entries are ever held.
/// - Recording into a full state evicts the oldest entry; the remaining entry
///   keeps its place and the new one goes last.
/// - The same city may occupy both slots (a degenerate route).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionState {
    ids: Vec<CityId>,
}

impl SelectionState {
    pub const CAPACITY: usize = 2;

    pub fn new() -> Self {
        Self {
            ids: Vec::with_capacity(Self::CAPACITY),
        }
    }

    /// Records a click on `city`.
    ///
    /// Returns the evicted id when the state was already full.
    pub fn record_click(&mut self, city: CityId) -> Option<CityId> {
        let evicted = if self.ids.len() == Self::CAPACITY {
            Some(self.ids.remove(0))
        } else {
            None
        };
        self.ids.push(city);
        evicted
    }

    pub fn is_pair_complete(&self) -> bool {
        self.ids.len() == Self::CAPACITY
    }

    /// Current entries, oldest first.
    pub fn ids(&self) -> &[CityId] {
        &self.ids
    }

    /// `(source, destination)` once both are chosen.
    pub fn pair(&self) -> Option<(CityId, CityId)> {
        match self.ids.as_slice() {
            [source, dest] => Some((*source, *dest)),
            _ => None,
        }
    }

    pub fn contains(&self, city: CityId) -> bool {
        self.ids.contains(&city)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}
