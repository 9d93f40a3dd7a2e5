//! Interactive route planner core.
//!
//! [`MapSession`] is the single event entry point: clicks go in, catalog,
//! selection and segment updates come out through a [`Renderer`].

pub mod config;
pub mod error;
pub mod renderer;
pub mod session;

pub use config::*;
pub use error::*;
pub use renderer::*;
pub use session::*;
