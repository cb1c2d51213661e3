// Adapters layer: concrete implementations for external systems (containers, AWS clients, http).

pub mod clients;
pub mod containers;
pub mod http;
