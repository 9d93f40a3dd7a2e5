pub mod exact;
pub mod vec;

pub use exact::*;
pub use vec::*;
