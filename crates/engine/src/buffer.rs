use std::alloc::Layout;
use std::ptr::NonNull;

use crate::alloc::{ForeignAllocator, SystemAllocator};
use crate::error::EngineError;
use crate::native::OutSlots;

const DATA_ALIGN: usize = std::mem::align_of::<f64>();

/// Outcome of [`ForeignBuffer::release`].
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Release {
    Freed,
    /// The buffer had already been released; nothing was freed.
    AlreadyReleased,
}

/// Fixed-capacity block of foreign memory plus a 4-byte length slot.
///
/// The native engine writes up to `capacity` elements into the data region
/// and the number it wrote into the length slot. One buffer is sized for the
/// largest call shape and reused for every call.
///
/// Single owner: the buffer is released exactly once, either explicitly via
/// [`ForeignBuffer::release`] or when dropped.
#[derive(Debug)]
pub struct ForeignBuffer<A: ForeignAllocator = SystemAllocator> {
    capacity: usize,
    element_size: usize,
    data: NonNull<u8>,
    data_layout: Layout,
    length: NonNull<i32>,
    released: bool,
    allocator: A,
}

impl ForeignBuffer<SystemAllocator> {
    pub fn acquire(capacity: usize, element_size: usize) -> Result<Self, EngineError> {
        Self::acquire_in(capacity, element_size, SystemAllocator)
    }
}

impl<A: ForeignAllocator> ForeignBuffer<A> {
    /// Allocates both regions or neither.
    pub fn acquire_in(capacity: usize, element_size: usize, allocator: A) -> Result<Self, EngineError> {
        let bytes = capacity
            .checked_mul(element_size)
            .ok_or(EngineError::Allocation { bytes: usize::MAX })?;
        let data_layout = Layout::from_size_align(bytes, DATA_ALIGN)
            .map_err(|_| EngineError::Allocation { bytes })?;
        let length_layout = Layout::new::<i32>();

        let data = allocator
            .allocate(data_layout)
            .ok_or(EngineError::Allocation { bytes })?;
        let Some(length) = allocator.allocate(length_layout) else {
            // SAFETY: `data` was just allocated with `data_layout` and never handed out.
            unsafe { allocator.deallocate(data, data_layout) };
            return Err(EngineError::Allocation {
                bytes: length_layout.size(),
            });
        };

        Ok(Self {
            capacity,
            element_size,
            data,
            data_layout,
            length: length.cast::<i32>(),
            released: false,
            allocator,
        })
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn element_size(&self) -> usize {
        self.element_size
    }

    pub fn is_released(&self) -> bool {
        self.released
    }

    /// Frees both regions.
    ///
    /// A second call frees nothing and returns [`Release::AlreadyReleased`];
    /// callers should treat that as a logic defect.
    pub fn release(&mut self) -> Release {
        if self.released {
            if cfg!(debug_assertions) {
                tracing::error!(
                    capacity = self.capacity,
                    "foreign buffer released twice; ignoring second release"
                );
            }
            return Release::AlreadyReleased;
        }
        self.released = true;
        // SAFETY: both pointers came from `self.allocator` with these layouts and
        // the `released` flag guarantees this runs once.
        unsafe {
            self.allocator.deallocate(self.data, self.data_layout);
            self.allocator
                .deallocate(self.length.cast::<u8>(), Layout::new::<i32>());
        }
        Release::Freed
    }

    /// Number of elements the native side reports having written.
    pub fn reported_length(&self) -> Result<usize, EngineError> {
        if self.released {
            return Err(EngineError::Released);
        }
        // SAFETY: the slot is live (not released) and was allocated for an i32.
        let raw = unsafe { self.length.as_ptr().read() };
        match usize::try_from(raw) {
            Ok(len) if len <= self.capacity => Ok(len),
            _ => Err(EngineError::Corruption {
                reported: i64::from(raw),
                capacity: self.capacity,
            }),
        }
    }

    /// Zeroes the data region and the length slot.
    pub fn reset(&mut self) -> Result<(), EngineError> {
        if self.released {
            return Err(EngineError::Released);
        }
        // SAFETY: both regions are live and exclusively borrowed through `&mut self`.
        unsafe {
            std::ptr::write_bytes(self.data.as_ptr(), 0, self.data_layout.size());
            self.length.as_ptr().write(0);
        }
        Ok(())
    }

    /// Clears the length slot and returns the raw slots for one `f64` call.
    ///
    /// The slots stay valid until the buffer is next borrowed mutably.
    pub fn prepare_f64_call(&mut self) -> Result<OutSlots, EngineError> {
        self.check_f64()?;
        // SAFETY: the slot is live and exclusively borrowed through `&mut self`.
        unsafe { self.length.as_ptr().write(0) };
        Ok(OutSlots::new(
            self.data.as_ptr().cast::<f64>(),
            self.length.as_ptr(),
            self.capacity,
        ))
    }

    /// Copies out the reported prefix of the data region as `f64`s.
    pub fn read_f64(&self) -> Result<Vec<f64>, EngineError> {
        self.check_f64()?;
        let len = self.reported_length()?;
        // SAFETY: the region holds `capacity` f64-aligned f64 slots and `len <= capacity`.
        let values = unsafe { std::slice::from_raw_parts(self.data.as_ptr().cast::<f64>(), len) };
        Ok(values.to_vec())
    }

    fn check_f64(&self) -> Result<(), EngineError> {
        if self.released {
            return Err(EngineError::Released);
        }
        let expected = std::mem::size_of::<f64>();
        if self.element_size != expected {
            return Err(EngineError::ElementSize {
                expected,
                actual: self.element_size,
            });
        }
        Ok(())
    }
}

impl<A: ForeignAllocator> Drop for ForeignBuffer<A> {
    fn drop(&mut self) {
        if !self.released {
            self.release();
        }
    }
}
