/// Schedule builder: the set of courses a user has picked
mod key;

pub use key::ScheduleKey;

use crate::conflict::{check_schedule_conflict, format_conflict_message, ConflictInfo, Course};
use crate::error::PlannerError;
use crate::timecode::{parse_course_time, Weekday};
use std::collections::BTreeMap;
use tracing::{debug, info};

/// Default cap on selected courses
pub const DEFAULT_MAX_COURSES: usize = 40;

/// Courses selected for one personal schedule, in the order they were added.
///
/// Held in memory by whoever owns the user's session; nothing here is
/// persisted.
#[derive(Debug, Clone)]
pub struct Selection {
    courses: Vec<Course>,
    max_courses: usize,
}

impl Selection {
    pub fn new(max_courses: usize) -> Self {
        Self {
            courses: Vec::new(),
            max_courses,
        }
    }

    pub fn courses(&self) -> &[Course] {
        &self.courses
    }

    pub fn len(&self) -> usize {
        self.courses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.courses.is_empty()
    }

    pub fn contains(&self, course_code: &str) -> bool {
        self.courses.iter().any(|c| c.course_code == course_code)
    }

    /// Adds a course if it fits.
    ///
    /// # Returns
    /// * `Ok(())` - The course was appended
    /// * `Err(PlannerError::AlreadySelected)` - Same code already present
    /// * `Err(PlannerError::SelectionFull)` - At capacity
    /// * `Err(PlannerError::ScheduleConflict)` - Overlaps a selected course;
    ///   the selection is left unchanged
    pub fn try_add(&mut self, course: Course) -> Result<(), PlannerError> {
        self.check_can_add(&course)?;

        let info = check_schedule_conflict(&self.courses, &course);
        if info.has_conflict {
            let message = format_conflict_message(&info);
            debug!("Rejected {}: {}", course.course_code, message);
            return Err(PlannerError::ScheduleConflict { message, info });
        }

        info!("Selected {}", course.course_code);
        self.courses.push(course);
        Ok(())
    }

    /// Adds a course even if it overlaps others, returning what it overlaps.
    /// Duplicates and capacity are still enforced.
    pub fn force_add(&mut self, course: Course) -> Result<ConflictInfo, PlannerError> {
        self.check_can_add(&course)?;

        let info = check_schedule_conflict(&self.courses, &course);
        info!(
            "Selected {} ({} conflicting course(s))",
            course.course_code,
            info.conflicting_courses.len()
        );
        self.courses.push(course);
        Ok(info)
    }

    /// Removes a course by code and returns it.
    pub fn remove(&mut self, course_code: &str) -> Result<Course, PlannerError> {
        let index = self
            .courses
            .iter()
            .position(|c| c.course_code == course_code)
            .ok_or_else(|| PlannerError::CourseNotFound {
                course_code: course_code.to_string(),
            })?;

        info!("Removed {}", course_code);
        Ok(self.courses.remove(index))
    }

    /// Every conflict inside the selection. Each pair appears once, with
    /// the earlier-added course as the existing one.
    pub fn conflicts(&self) -> Vec<ConflictInfo> {
        self.courses
            .iter()
            .enumerate()
            .skip(1)
            .map(|(i, course)| check_schedule_conflict(&self.courses[..i], course))
            .filter(|info| info.has_conflict)
            .collect()
    }

    /// Timetable cells: course codes meeting at each (day, period), in
    /// selection order.
    pub fn weekly_grid(&self) -> BTreeMap<(Weekday, u32), Vec<String>> {
        let mut grid: BTreeMap<(Weekday, u32), Vec<String>> = BTreeMap::new();

        for course in &self.courses {
            let Some(class_time) = course.class_time() else {
                continue;
            };
            for entry in parse_course_time(class_time) {
                for period in entry.periods {
                    let cell = grid.entry((entry.day, period)).or_default();
                    // A code listing the same slot twice only shows once
                    if !cell.contains(&course.course_code) {
                        cell.push(course.course_code.clone());
                    }
                }
            }
        }

        grid
    }

    /// Key for sharing this selection
    pub fn share_key(&self) -> ScheduleKey {
        ScheduleKey::from_codes(self.courses.iter().map(|c| c.course_code.as_str()))
    }

    fn check_can_add(&self, course: &Course) -> Result<(), PlannerError> {
        if self.contains(&course.course_code) {
            return Err(PlannerError::AlreadySelected {
                course_code: course.course_code.clone(),
            });
        }
        if self.courses.len() >= self.max_courses {
            return Err(PlannerError::SelectionFull {
                max: self.max_courses,
            });
        }
        Ok(())
    }
}

impl Default for Selection {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_COURSES)
    }
}
