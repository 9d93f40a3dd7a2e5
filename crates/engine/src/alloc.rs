use std::alloc::Layout;
use std::cell::Cell;
use std::ptr::NonNull;
use std::rc::Rc;

/// Source of foreign (manually managed) memory handed to the native engine.
pub trait ForeignAllocator {
    /// Returns zeroed memory for `layout`, or `None` if the request cannot be met.
    fn allocate(&self, layout: Layout) -> Option<NonNull<u8>>;

    /// # Safety
    ///
    /// `ptr` must have been returned by [`ForeignAllocator::allocate`] on this
    /// allocator with the same `layout`, and must not be freed more than once.
    unsafe fn deallocate(&self, ptr: NonNull<u8>, layout: Layout);
}

/// The process heap.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemAllocator;

impl ForeignAllocator for SystemAllocator {
    fn allocate(&self, layout: Layout) -> Option<NonNull<u8>> {
        if layout.size() == 0 {
            return None;
        }
        // SAFETY: layout has a non-zero size.
        NonNull::new(unsafe { std::alloc::alloc_zeroed(layout) })
    }

    unsafe fn deallocate(&self, ptr: NonNull<u8>, layout: Layout) {
        // SAFETY: forwarded from the caller's contract.
        unsafe { std::alloc::dealloc(ptr.as_ptr(), layout) }
    }
}

#[derive(Debug, Default)]
struct Counters {
    live_allocations: Cell<usize>,
    live_bytes: Cell<usize>,
    total_allocations: Cell<usize>,
    fail_on: Cell<Option<usize>>,
}

/// Allocator double that counts what is currently held.
///
/// Clones share counters, so a test can keep one handle while a buffer owns
/// another. Backed by [`SystemAllocator`].
#[derive(Debug, Default, Clone)]
pub struct TrackingAllocator {
    counters: Rc<Counters>,
}

impl TrackingAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes the `n`-th allocation from now (1-based) fail.
    pub fn fail_on_allocation(&self, n: usize) {
        let base = self.counters.total_allocations.get();
        self.counters.fail_on.set(Some(base + n));
    }

    pub fn live_allocations(&self) -> usize {
        self.counters.live_allocations.get()
    }

    pub fn live_bytes(&self) -> usize {
        self.counters.live_bytes.get()
    }

    pub fn total_allocations(&self) -> usize {
        self.counters.total_allocations.get()
    }
}

impl ForeignAllocator for TrackingAllocator {
    fn allocate(&self, layout: Layout) -> Option<NonNull<u8>> {
        let c = &self.counters;
        let attempt = c.total_allocations.get() + 1;
        c.total_allocations.set(attempt);
        if c.fail_on.get() == Some(attempt) {
            c.fail_on.set(None);
            return None;
        }

        let ptr = SystemAllocator.allocate(layout)?;
        c.live_allocations.set(c.live_allocations.get() + 1);
        c.live_bytes.set(c.live_bytes.get() + layout.size());
        Some(ptr)
    }

    unsafe fn deallocate(&self, ptr: NonNull<u8>, layout: Layout) {
        let c = &self.counters;
        c.live_allocations.set(c.live_allocations.get().saturating_sub(1));
        c.live_bytes.set(c.live_bytes.get().saturating_sub(layout.size()));
        // SAFETY: forwarded from the caller's contract.
        unsafe { SystemAllocator.deallocate(ptr, layout) }
    }
}
