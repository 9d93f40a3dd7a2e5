/// Raw output slots handed to one native call.
///
/// `data` points at `capacity` `f64` slots; `length` at the 4-byte count the
/// engine fills in. Both belong to a live [`crate::ForeignBuffer`].
#[derive(Debug, Copy, Clone)]
pub struct OutSlots {
    data: *mut f64,
    length: *mut i32,
    capacity: usize,
}

impl OutSlots {
    pub(crate) fn new(data: *mut f64, length: *mut i32, capacity: usize) -> Self {
        Self {
            data,
            length,
            capacity,
        }
    }

    pub fn data(self) -> *mut f64 {
        self.data
    }

    pub fn length(self) -> *mut i32 {
        self.length
    }

    pub fn capacity(self) -> usize {
        self.capacity
    }

    /// Writes at most `capacity` values and stores `reported` in the length slot.
    ///
    /// `reported` is written verbatim so a misbehaving engine can be modelled.
    ///
    /// # Safety
    ///
    /// The slots must come from a buffer that is still live and not otherwise
    /// accessed for the duration of the call.
    pub unsafe fn write(self, values: &[f64], reported: i32) {
        let n = values.len().min(self.capacity);
        // SAFETY: `data` has room for `capacity` values and `n <= capacity`.
        unsafe {
            std::ptr::copy_nonoverlapping(values.as_ptr(), self.data, n);
            self.length.write(reported);
        }
    }

    /// Writes `values` and reports their count.
    ///
    /// # Safety
    ///
    /// Same contract as [`OutSlots::write`].
    pub unsafe fn write_all(self, values: &[f64]) {
        let reported = i32::try_from(values.len()).unwrap_or(i32::MAX);
        // SAFETY: forwarded from the caller's contract.
        unsafe { self.write(values, reported) }
    }
}

/// The three entry points of the native path engine.
///
/// Each call writes a flat `f64` array plus its element count into the given
/// slots. The engine never allocates on the caller's behalf.
pub trait NativeEngine {
    /// Writes `3N` unit-sphere coordinates, one triple per city.
    ///
    /// # Safety
    ///
    /// `out` must describe live foreign memory not aliased during the call.
    unsafe fn airport_xyz(&mut self, out: OutSlots);

    /// Writes the minimum-time route from `source` to `dest` as city indices.
    ///
    /// # Safety
    ///
    /// Same contract as [`NativeEngine::airport_xyz`].
    unsafe fn path_out_real(&mut self, out: OutSlots, source: i32, dest: i32);

    /// Writes the display name of `city` as one character code per element.
    ///
    /// # Safety
    ///
    /// Same contract as [`NativeEngine::airport_xyz`].
    unsafe fn city_name(&mut self, out: OutSlots, city: i32);
}

impl<E: NativeEngine + ?Sized> NativeEngine for Box<E> {
    unsafe fn airport_xyz(&mut self, out: OutSlots) {
        // SAFETY: forwarded from the caller's contract.
        unsafe { (**self).airport_xyz(out) }
    }

    unsafe fn path_out_real(&mut self, out: OutSlots, source: i32, dest: i32) {
        // SAFETY: forwarded from the caller's contract.
        unsafe { (**self).path_out_real(out, source, dest) }
    }

    unsafe fn city_name(&mut self, out: OutSlots, city: i32) {
        // SAFETY: forwarded from the caller's contract.
        unsafe { (**self).city_name(out, city) }
    }
}
