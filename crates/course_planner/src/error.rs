//! Error types for the course planner.
//!
//! Parsing and conflict checking never fail; these errors come from the
//! edges: loading configuration, mutating a selection, and compiling search
//! filters.

use crate::conflict::ConflictInfo;
use chrono::NaiveTime;
use thiserror::Error;

#[derive(Debug, Error, Clone)]
pub enum PlannerError {
    /// Reading a file failed
    #[error("I/O error: {message}")]
    Io { message: String },

    /// A configuration value or file could not be used
    #[error("Invalid configuration: {message}")]
    InvalidConfig { message: String },

    /// A period slot that does not end after it starts
    #[error("Period {label} has start {start} not before end {end}")]
    InvalidPeriodTime {
        label: String,
        start: NaiveTime,
        end: NaiveTime,
    },

    /// The course is already part of the selection
    #[error("Course {course_code} is already selected")]
    AlreadySelected { course_code: String },

    /// The selection holds the maximum number of courses
    #[error("Selection is full ({max} courses)")]
    SelectionFull { max: usize },

    /// Adding the course would overlap an already selected one
    #[error("Schedule conflict: {message}")]
    ScheduleConflict { message: String, info: ConflictInfo },

    /// No selected course has this code
    #[error("Course {course_code} is not selected")]
    CourseNotFound { course_code: String },

    /// A search filter could not be compiled
    #[error("Invalid search pattern: {message}")]
    InvalidPattern { message: String },
}

impl PlannerError {
    /// Returns true if the caller can recover by changing the selection
    /// (dropping a course or picking another section).
    pub fn is_selection_error(&self) -> bool {
        matches!(
            self,
            PlannerError::AlreadySelected { .. }
                | PlannerError::SelectionFull { .. }
                | PlannerError::ScheduleConflict { .. }
                | PlannerError::CourseNotFound { .. }
        )
    }
}

impl From<std::io::Error> for PlannerError {
    fn from(err: std::io::Error) -> Self {
        PlannerError::Io {
            message: err.to_string(),
        }
    }
}

impl From<serde_json::Error> for PlannerError {
    fn from(err: serde_json::Error) -> Self {
        PlannerError::InvalidConfig {
            message: err.to_string(),
        }
    }
}

impl From<regex::Error> for PlannerError {
    fn from(err: regex::Error) -> Self {
        PlannerError::InvalidPattern {
            message: err.to_string(),
        }
    }
}
