mod component;
mod types;

pub use component::Results;
pub use types::SimulationResponse;
