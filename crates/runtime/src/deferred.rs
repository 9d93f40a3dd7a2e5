use foundation::time::Millis;

#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TaskId(pub u64);

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
struct Key {
    due: Millis,
    id: TaskId,
}

impl Ord for Key {
    fn cmp(&self, other: &Self) -> core::cmp::Ordering {
        self.due.cmp(&other.due).then_with(|| self.id.cmp(&other.id))
    }
}

impl PartialOrd for Key {
    fn partial_cmp(&self, other: &Self) -> Option<core::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

#[derive(Debug)]
struct Item<T> {
    key: Key,
    payload: T,
}

#[derive(Debug, PartialEq)]
pub struct DueTask<T> {
    pub id: TaskId,
    pub due: Millis,
    pub payload: T,
}

/// Deterministic queue of delayed callbacks for a single-threaded event loop.
///
/// Key properties:
/// - Total ordering on `(due, id)`.
/// - Tasks due at the same instant fire in insertion order.
/// - Nothing is ever removed early. Tasks that became irrelevant are expected
///   to carry a [`crate::GenerationToken`] and turn into no-ops when they fire.
#[derive(Debug)]
pub struct DeferredQueue<T> {
    next_id: u64,
    items: Vec<Item<T>>,
}

impl<T> Default for DeferredQueue<T> {
    fn default() -> Self {
        Self {
            next_id: 0,
            items: Vec::new(),
        }
    }
}

impl<T> DeferredQueue<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Schedules `payload` to fire `delay_ms` after `now`.
    pub fn schedule(&mut self, now: Millis, delay_ms: u64, payload: T) -> TaskId {
        self.schedule_at(now + delay_ms, payload)
    }

    pub fn schedule_at(&mut self, due: Millis, payload: T) -> TaskId {
        let id = TaskId(self.next_id);
        self.next_id = self.next_id.wrapping_add(1);
        self.items.push(Item {
            key: Key { due, id },
            payload,
        });
        id
    }

    /// Earliest due time among pending tasks.
    pub fn next_due(&self) -> Option<Millis> {
        self.items.iter().map(|i| i.key.due).min()
    }

    /// Pops the earliest task whose due time is `<= now`.
    pub fn pop_due(&mut self, now: Millis) -> Option<DueTask<T>> {
        let mut best_idx: Option<usize> = None;
        for (idx, item) in self.items.iter().enumerate() {
            if item.key.due > now {
                continue;
            }
            match best_idx {
                None => best_idx = Some(idx),
                Some(best) => {
                    if item.key < self.items[best].key {
                        best_idx = Some(idx);
                    }
                }
            }
        }

        let idx = best_idx?;
        let item = self.items.swap_remove(idx);
        Some(DueTask {
            id: item.key.id,
            due: item.key.due,
            payload: item.payload,
        })
    }

    /// Pops every task due at or before `now`, in firing order.
    pub fn drain_due(&mut self, now: Millis) -> Vec<DueTask<T>> {
        let mut out = Vec::new();
        while let Some(task) = self.pop_due(now) {
            out.push(task);
        }
        out
    }
}
