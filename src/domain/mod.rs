// Domain layer: service payload models and the container port.

pub mod model;
pub mod ports;
