//! Schedule conflict detection between courses.
mod types;

pub use types::{ConflictInfo, ConflictSlot, Course, CourseConflict};

use crate::timecode::{parse_course_time, ScheduleEntry};
use tracing::debug;

/// Checks whether `candidate` meets at the same time as any course in
/// `existing`.
///
/// A course without a time code never conflicts, and a course is never
/// compared against an entry with its own code. Every colliding course is
/// reported, in the order it appears in `existing`.
///
/// # Arguments
/// * `existing` - Courses already in the schedule
/// * `candidate` - The course being added
///
/// # Returns
/// The conflict report; never an error, malformed codes just parse to fewer
/// entries.
pub fn check_schedule_conflict(existing: &[Course], candidate: &Course) -> ConflictInfo {
    let Some(candidate_time) = candidate.class_time() else {
        return ConflictInfo::none();
    };
    let candidate_slots = parse_course_time(candidate_time);

    let mut info = ConflictInfo::none();

    for course in existing {
        if course.course_code == candidate.course_code {
            continue;
        }
        let Some(existing_time) = course.class_time() else {
            continue;
        };

        let existing_slots = parse_course_time(existing_time);
        let conflicting_slots = overlapping_slots(&existing_slots, &candidate_slots);

        if !conflicting_slots.is_empty() {
            debug!(
                "{} overlaps {} in {} slot group(s)",
                candidate.course_code,
                course.course_code,
                conflicting_slots.len()
            );
            info.has_conflict = true;
            info.conflicting_courses.push(CourseConflict {
                existing_course: course.clone(),
                new_course: candidate.clone(),
                conflicting_slots,
            });
        }
    }

    info
}

/// Same-day period intersections, existing entries outer and candidate
/// entries inner. Periods keep the existing entry's order.
fn overlapping_slots(existing: &[ScheduleEntry], candidate: &[ScheduleEntry]) -> Vec<ConflictSlot> {
    let mut slots = Vec::new();

    for s1 in existing {
        for s2 in candidate.iter().filter(|s2| s2.day == s1.day) {
            let periods: Vec<u32> = s1
                .periods
                .iter()
                .copied()
                .filter(|p| s2.periods.contains(p))
                .collect();

            if !periods.is_empty() {
                slots.push(ConflictSlot {
                    day: s1.day,
                    periods,
                });
            }
        }
    }

    slots
}

/// Renders a conflict report as a user-facing sentence per colliding course,
/// e.g. `与「微積分」(MA101) 在 星期一第1、2節，星期三第3節 时间冲突`.
///
/// Sentences are joined with `；`. Returns an empty string when there is no
/// conflict.
pub fn format_conflict_message(info: &ConflictInfo) -> String {
    if !info.has_conflict {
        return String::new();
    }

    info.conflicting_courses
        .iter()
        .map(|conflict| {
            let groups: Vec<String> = conflict
                .conflicting_slots
                .iter()
                .map(|slot| {
                    let periods: Vec<String> = slot.periods.iter().map(|p| p.to_string()).collect();
                    format!("{}第{}節", slot.day.long_label(), periods.join("、"))
                })
                .collect();

            format!(
                "与「{}」({}) 在 {} 时间冲突",
                conflict.existing_course.course_name,
                conflict.existing_course.course_code,
                groups.join("，")
            )
        })
        .collect::<Vec<_>>()
        .join("；")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::timecode::Weekday;

    fn course(code: &str, name: &str, time: &str) -> Course {
        Course::new(code, name, Some(time))
    }

    #[test]
    fn test_empty_selection() {
        let candidate = course("CS101", "Intro", "一/1,2");
        let info = check_schedule_conflict(&[], &candidate);
        assert!(!info.has_conflict);
        assert!(info.conflicting_courses.is_empty());
    }

    #[test]
    fn test_identical_times() {
        let a = course("CS101", "Intro", "一/1,2");
        let b = course("MA101", "Calculus", "一/1,2");

        let info = check_schedule_conflict(&[a.clone()], &b);
        assert!(info.has_conflict);
        assert_eq!(info.conflicting_courses.len(), 1);

        let conflict = &info.conflicting_courses[0];
        assert_eq!(conflict.existing_course, a);
        assert_eq!(conflict.new_course, b);
        assert_eq!(
            conflict.conflicting_slots,
            vec![ConflictSlot {
                day: Weekday::Monday,
                periods: vec![1, 2]
            }]
        );
    }

    #[test]
    fn test_partial_overlap_reports_intersection_only() {
        let a = course("CS101", "Intro", "一/1,2,3");
        let b = course("MA101", "Calculus", "一/3,4");

        let info = check_schedule_conflict(&[a], &b);
        assert_eq!(info.conflicting_courses[0].conflicting_slots[0].periods, vec![3]);
    }

    #[test]
    fn test_periods_follow_existing_order() {
        let a = course("CS101", "Intro", "一/4,2,3");
        let b = course("MA101", "Calculus", "一/3,2");

        let info = check_schedule_conflict(&[a], &b);
        assert_eq!(info.conflicting_courses[0].conflicting_slots[0].periods, vec![2, 3]);
    }

    #[test]
    fn test_different_days_do_not_conflict() {
        let a = course("CS101", "Intro", "一/1,2");
        let b = course("MA101", "Calculus", "二/1,2");
        assert!(!check_schedule_conflict(&[a], &b).has_conflict);
    }

    #[test]
    fn test_never_conflicts_with_itself() {
        let a = course("CS101", "Intro", "一/1,2");
        let info = check_schedule_conflict(&[a.clone()], &a);
        assert!(!info.has_conflict);
    }

    #[test]
    fn test_missing_class_time() {
        let a = course("CS101", "Intro", "一/1,2");
        let no_time = Course::new("PE101", "Swimming", None);
        let blank = course("PE102", "Running", "");

        assert!(!check_schedule_conflict(&[a.clone()], &no_time).has_conflict);
        assert!(!check_schedule_conflict(&[a.clone()], &blank).has_conflict);
        assert!(!check_schedule_conflict(&[no_time, blank], &a).has_conflict);
    }

    #[test]
    fn test_malformed_time_yields_no_conflict() {
        let a = course("CS101", "Intro", "Mon 1-2");
        let b = course("MA101", "Calculus", "一/1,2");
        assert!(!check_schedule_conflict(&[a], &b).has_conflict);
    }

    #[test]
    fn test_reports_every_conflicting_course() {
        let a = course("CS101", "Intro", "一/1,2");
        let b = course("EE201", "Circuits", "三/5,6");
        let c = course("PH101", "Physics", "五/1");
        let candidate = course("MA101", "Calculus", "一/2;三/6,7");

        let info = check_schedule_conflict(&[a, b, c], &candidate);
        let codes: Vec<&str> = info
            .conflicting_courses
            .iter()
            .map(|c| c.existing_course.course_code.as_str())
            .collect();
        assert_eq!(codes, vec!["CS101", "EE201"]);
    }

    #[test]
    fn test_slot_groups_in_existing_then_candidate_order() {
        let a = course("CS101", "Intro", "三/3;一/1,2");
        let candidate = course("MA101", "Calculus", "一/1;一/2;三/3");

        let info = check_schedule_conflict(&[a], &candidate);
        assert_eq!(
            info.conflicting_courses[0].conflicting_slots,
            vec![
                ConflictSlot { day: Weekday::Wednesday, periods: vec![3] },
                ConflictSlot { day: Weekday::Monday, periods: vec![1] },
                ConflictSlot { day: Weekday::Monday, periods: vec![2] },
            ]
        );
    }

    #[test]
    fn test_format_no_conflict() {
        assert_eq!(format_conflict_message(&ConflictInfo::none()), "");
    }

    #[test]
    fn test_format_single_conflict() {
        let a = course("MA101", "微積分", "一/1,2;三/3");
        let b = course("CS101", "計算機概論", "一/1,2;三/3,4");

        let message = format_conflict_message(&check_schedule_conflict(&[a], &b));
        assert_eq!(message, "与「微積分」(MA101) 在 星期一第1、2節，星期三第3節 时间冲突");
    }

    #[test]
    fn test_format_multiple_conflicts() {
        let a = course("MA101", "微積分", "一/1");
        let b = course("PH101", "普通物理", "二/2");
        let candidate = course("CS101", "計算機概論", "一/1;二/2");

        let message = format_conflict_message(&check_schedule_conflict(&[a, b], &candidate));
        assert_eq!(
            message,
            "与「微積分」(MA101) 在 星期一第1節 时间冲突；与「普通物理」(PH101) 在 星期二第2節 时间冲突"
        );
    }
}
