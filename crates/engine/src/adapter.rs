use foundation::ids::CityId;
use foundation::math::Vec3;

use crate::alloc::{ForeignAllocator, SystemAllocator};
use crate::buffer::ForeignBuffer;
use crate::decode;
use crate::error::EngineError;
use crate::native::{NativeEngine, OutSlots};

/// Sole caller of the native engine.
///
/// Owns the engine handle and the single [`ForeignBuffer`] every call shares.
/// Calls take `&mut self`, so two calls can never overlap on the buffer.
#[derive(Debug)]
pub struct NativeEngineAdapter<E, A: ForeignAllocator = SystemAllocator> {
    engine: E,
    buffer: ForeignBuffer<A>,
    radius: f64,
}

impl<E: NativeEngine> NativeEngineAdapter<E, SystemAllocator> {
    /// `capacity` is counted in `f64` elements and must cover the largest call.
    pub fn new(engine: E, capacity: usize, radius: f64) -> Result<Self, EngineError> {
        Self::with_allocator(engine, capacity, radius, SystemAllocator)
    }
}

impl<E: NativeEngine, A: ForeignAllocator> NativeEngineAdapter<E, A> {
    pub fn with_allocator(
        engine: E,
        capacity: usize,
        radius: f64,
        allocator: A,
    ) -> Result<Self, EngineError> {
        let buffer = ForeignBuffer::acquire_in(capacity, std::mem::size_of::<f64>(), allocator)?;
        Ok(Self {
            engine,
            buffer,
            radius,
        })
    }

    pub fn radius(&self) -> f64 {
        self.radius
    }

    pub fn buffer(&self) -> &ForeignBuffer<A> {
        &self.buffer
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    /// Zeroes the shared buffer between calls.
    pub fn reset_buffer(&mut self) -> Result<(), EngineError> {
        self.buffer.reset()
    }

    /// City positions, scaled from the unit sphere to the globe radius.
    pub fn load_catalog(&mut self) -> Result<Vec<Vec3>, EngineError> {
        let raw = self.dispatch(|engine, out| {
            // SAFETY: `dispatch` hands out slots of the live, exclusively borrowed buffer.
            unsafe { engine.airport_xyz(out) }
        })?;
        let positions = decode::decode_positions(&raw, self.radius)?;
        tracing::debug!(cities = positions.len(), "catalog loaded from native engine");
        Ok(positions)
    }

    /// Route from `source` to `dest`, both endpoints included.
    pub fn query_path(&mut self, source: CityId, dest: CityId) -> Result<Vec<CityId>, EngineError> {
        let raw = self.dispatch(|engine, out| {
            // SAFETY: as in `load_catalog`.
            unsafe { engine.path_out_real(out, source.as_native(), dest.as_native()) }
        })?;
        let route = decode::decode_route(&raw, source, dest)?;
        tracing::debug!(%source, %dest, hops = route.len(), "route decoded");
        Ok(route)
    }

    pub fn lookup_name(&mut self, city: CityId) -> Result<String, EngineError> {
        let raw = self.dispatch(|engine, out| {
            // SAFETY: as in `load_catalog`.
            unsafe { engine.city_name(out, city.as_native()) }
        })?;
        decode::decode_name(&raw)
    }

    fn dispatch(&mut self, call: impl FnOnce(&mut E, OutSlots)) -> Result<Vec<f64>, EngineError> {
        let slots = self.buffer.prepare_f64_call()?;
        call(&mut self.engine, slots);
        self.buffer.read_f64()
    }
}
