pub mod container;
pub mod network;
pub mod spec;

pub use crate::domain::ports::StartableDockerContainer;
pub use crate::utils::error::Result;
