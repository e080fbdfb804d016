/// Types for schedule conflict reports
use crate::timecode::Weekday;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A course record as far as the planner is concerned.
///
/// Only `course_code` and `class_time` drive conflict checks; `course_name` is
/// used in messages and every other attribute of the catalog record is kept
/// in `extra` untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Course {
    pub course_code: String,
    #[serde(default)]
    pub course_name: String,
    /// Raw meeting time code, e.g. `一/1,2[SC101]`
    #[serde(default)]
    pub class_time: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Course {
    pub fn new(
        course_code: impl Into<String>,
        course_name: impl Into<String>,
        class_time: Option<&str>,
    ) -> Self {
        Self {
            course_code: course_code.into(),
            course_name: course_name.into(),
            class_time: class_time.map(str::to_string),
            extra: Map::new(),
        }
    }

    /// The time code, or `None` when it is missing or blank
    pub fn class_time(&self) -> Option<&str> {
        self.class_time.as_deref().filter(|t| !t.trim().is_empty())
    }

    /// Teacher names from the carried-through `teachers` attribute, which
    /// the catalog stores either as an array or as one string.
    pub fn teachers(&self) -> Vec<&str> {
        match self.extra.get("teachers") {
            Some(Value::Array(items)) => items.iter().filter_map(Value::as_str).collect(),
            Some(Value::String(name)) => vec![name.as_str()],
            _ => Vec::new(),
        }
    }
}

/// Periods two courses share on one day
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConflictSlot {
    pub day: Weekday,
    pub periods: Vec<u32>,
}

/// One already selected course that collides with the candidate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CourseConflict {
    pub existing_course: Course,
    pub new_course: Course,
    pub conflicting_slots: Vec<ConflictSlot>,
}

/// Result of checking a candidate course against a selection
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ConflictInfo {
    pub has_conflict: bool,
    pub conflicting_courses: Vec<CourseConflict>,
}

impl ConflictInfo {
    pub fn none() -> Self {
        Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_course_keeps_extra_fields() {
        let course: Course = serde_json::from_value(json!({
            "course_code": "CS135",
            "course_name": "Data Structures",
            "class_time": "二/3,4",
            "credits": 3,
            "teachers": ["Lin", "Chen"],
        }))
        .unwrap();

        assert_eq!(course.class_time(), Some("二/3,4"));
        assert_eq!(course.extra["credits"], 3);
        assert_eq!(course.teachers(), vec!["Lin", "Chen"]);

        let back = serde_json::to_value(&course).unwrap();
        assert_eq!(back["credits"], 3);
        assert_eq!(back["course_code"], "CS135");
    }

    #[test]
    fn test_missing_or_blank_class_time() {
        let course: Course = serde_json::from_value(json!({"course_code": "PE101"})).unwrap();
        assert_eq!(course.class_time(), None);
        assert_eq!(course.course_name, "");

        let blank = Course::new("PE102", "Swimming", Some("  "));
        assert_eq!(blank.class_time(), None);
    }

    #[test]
    fn test_single_teacher_string() {
        let mut course = Course::new("MA101", "Calculus", None);
        course.extra.insert("teachers".to_string(), json!("Wang"));
        assert_eq!(course.teachers(), vec!["Wang"]);
    }
}
