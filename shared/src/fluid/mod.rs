mod engine;
mod error;
mod snapshot;

pub use engine::FluidEngine;
pub use error::EngineError;
pub use snapshot::{BlockSnapshot, FluidSnapshot};
