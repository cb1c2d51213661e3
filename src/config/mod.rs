pub mod aws;
#[cfg(feature = "cli")]
pub mod cli;
pub mod lambda;
pub mod network_file;

#[cfg(feature = "cli")]
pub use cli::CliConfig;
pub use network_file::{ContainerNetwork, NetworkFile};
