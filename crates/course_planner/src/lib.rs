//! Course time-code parsing and schedule planning.
//!
//! Course records carry their weekly meetings as a compact `class_time`
//! string. [`timecode::parse_course_time`] turns it into per-day entries,
//! [`conflict::check_schedule_conflict`] compares a candidate course against
//! a selection, and [`selection::Selection`] keeps a user's picked courses
//! consistent. Everything here is pure: no I/O happens outside of
//! configuration loading.
pub mod config;
pub mod conflict;
pub mod error;
pub mod search;
pub mod selection;
pub mod timecode;

pub use conflict::{check_schedule_conflict, format_conflict_message, ConflictInfo, Course};
pub use error::PlannerError;
pub use timecode::{parse_course_time, ScheduleEntry, Weekday};
