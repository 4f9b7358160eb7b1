mod component;
mod types;

pub use component::SimForm;
pub use types::{SimParams, SimulationRequest};
