//! Core domain layer. No external I/O dependencies.
//!
//! Entities, the week-numbering engine, and calendar helpers live here.

pub mod cron;
pub mod dates;
pub mod entities;
pub mod errors;
pub mod keys;
pub mod records;
pub mod week_numbering;
pub mod weekday;

pub use dates::DateExt;
pub use entities::{Day, StartOfWeek, Week, WeekNumber, Year};
pub use errors::DomainError;
pub use keys::KeySpace;
pub use records::{FieldMap, Record};
