//! Staggered, cancellable route rendering.

pub mod animation;
pub mod dedup;
pub mod pool;
pub mod segment;

pub use animation::*;
pub use dedup::*;
pub use pool::*;
pub use segment::*;
