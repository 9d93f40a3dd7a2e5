pub mod deferred;
pub mod generation;

pub use deferred::*;
pub use generation::*;
