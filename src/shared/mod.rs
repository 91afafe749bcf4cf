//! Cross-cutting concerns shared by use cases and the binary.

pub mod config;
