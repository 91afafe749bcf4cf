//! Application use cases. Orchestrate domain logic via ports.

pub mod builder;
pub mod calendar_service;
pub mod week_range;

pub use builder::{BuildSummary, CalendarBuilder};
pub use calendar_service::CalendarService;
pub use week_range::WeekRange;
