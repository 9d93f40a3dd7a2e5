use std::os::raw::c_int;

use crate::native::{NativeEngine, OutSlots};

unsafe extern "C" {
    #[link_name = "voidAirportXyz"]
    fn void_airport_xyz(out: *mut f64, out_len: *mut c_int);

    #[link_name = "voidPathOutReal"]
    fn void_path_out_real(out: *mut f64, out_len: *mut c_int, source: c_int, dest: c_int);

    #[link_name = "voidGetCityName"]
    fn void_get_city_name(out: *mut f64, out_len: *mut c_int, city: c_int);
}

/// The native engine linked into this binary.
#[derive(Debug, Default)]
pub struct LinkedEngine {
    _private: (),
}

impl LinkedEngine {
    pub fn new() -> Self {
        Self::default()
    }
}

impl NativeEngine for LinkedEngine {
    unsafe fn airport_xyz(&mut self, out: OutSlots) {
        // SAFETY: the caller guarantees the slots are live and unaliased.
        unsafe { void_airport_xyz(out.data(), out.length()) }
    }

    unsafe fn path_out_real(&mut self, out: OutSlots, source: i32, dest: i32) {
        // SAFETY: as above.
        unsafe { void_path_out_real(out.data(), out.length(), source, dest) }
    }

    unsafe fn city_name(&mut self, out: OutSlots, city: i32) {
        // SAFETY: as above.
        unsafe { void_get_city_name(out.data(), out.length(), city) }
    }
}
