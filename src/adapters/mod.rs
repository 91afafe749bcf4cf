//! Infrastructure adapters. Implement ports.
//!
//! Cache backends and the terminal UI. Map errors to DomainError.

pub mod persistence;
pub mod ui;
