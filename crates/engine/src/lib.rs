//! Bridge to the native path engine.
//!
//! The engine exposes three C entry points that write flat `f64` arrays into
//! caller-owned memory. This crate owns that memory ([`ForeignBuffer`]),
//! dispatches the calls ([`NativeEngineAdapter`]) and turns the raw arrays into
//! validated, typed results ([`decode`]).

pub mod adapter;
pub mod alloc;
pub mod buffer;
pub mod decode;
pub mod error;
pub mod fixture;
#[cfg(feature = "linked-engine")]
pub mod linked;
pub mod native;

pub use adapter::*;
pub use alloc::*;
pub use buffer::*;
pub use error::*;
pub use fixture::*;
#[cfg(feature = "linked-engine")]
pub use linked::*;
pub use native::*;
