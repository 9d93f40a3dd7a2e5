pub mod markers;
pub mod picking;
pub mod selection;

pub use markers::*;
pub use picking::*;
pub use selection::*;
