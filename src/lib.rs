//! temporal-cache: Sunday-anchored week numbering and a key-value calendar cache,
//! laid out as a hexagon (domain, ports, adapters, use cases).

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod shared;
pub mod usecases;
