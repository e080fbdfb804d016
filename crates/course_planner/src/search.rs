//! Course search filters.
//!
//! Search parameters arrive loosely typed (every field optional). They are
//! turned into a [`QueryIntent`] once, by fixed precedence, and the intent is
//! compiled into a [`CourseFilter`] that can be evaluated against courses.

use crate::conflict::Course;
use crate::error::PlannerError;
use regex::{Regex, RegexBuilder};
use serde::Deserialize;
use tracing::debug;

/// Raw search parameters, e.g. from a query string.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchParams {
    /// Free text matched against code, name and teachers
    #[serde(default)]
    pub keyword: Option<String>,
    #[serde(default)]
    pub course_code: Option<String>,
    #[serde(default)]
    pub course_name: Option<String>,
    #[serde(default)]
    pub teacher: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CourseField {
    CourseCode,
    CourseName,
    Teacher,
}

impl CourseField {
    fn values<'a>(&self, course: &'a Course) -> Vec<&'a str> {
        match self {
            CourseField::CourseCode => vec![course.course_code.as_str()],
            CourseField::CourseName => vec![course.course_name.as_str()],
            CourseField::Teacher => course.teachers(),
        }
    }
}

/// What a search asks for
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryIntent {
    MatchAll,
    /// Field equals the value exactly
    Exact { field: CourseField, value: String },
    /// Field contains the text, ignoring case
    Substring { field: CourseField, text: String },
    /// Code, name or any teacher contains the text, ignoring case
    Unified { text: String },
    /// Every inner intent must match
    All(Vec<QueryIntent>),
}

impl QueryIntent {
    /// Builds the intent for a set of parameters.
    ///
    /// A keyword wins over everything else, then an exact course code; the
    /// name and teacher filters only apply when neither is given. Blank
    /// values count as absent.
    pub fn from_params(params: &SearchParams) -> Self {
        if let Some(keyword) = non_blank(&params.keyword) {
            return QueryIntent::Unified {
                text: keyword.to_string(),
            };
        }

        if let Some(code) = non_blank(&params.course_code) {
            return QueryIntent::Exact {
                field: CourseField::CourseCode,
                value: code.to_string(),
            };
        }

        let mut filters = Vec::new();
        if let Some(name) = non_blank(&params.course_name) {
            filters.push(QueryIntent::Substring {
                field: CourseField::CourseName,
                text: name.to_string(),
            });
        }
        if let Some(teacher) = non_blank(&params.teacher) {
            filters.push(QueryIntent::Substring {
                field: CourseField::Teacher,
                text: teacher.to_string(),
            });
        }

        match filters.len() {
            0 => QueryIntent::MatchAll,
            1 => filters.remove(0),
            _ => QueryIntent::All(filters),
        }
    }

    /// Compiles the intent into an evaluable filter.
    pub fn compile(&self) -> Result<CourseFilter, PlannerError> {
        let filter = match self {
            QueryIntent::MatchAll => CourseFilter::MatchAll,
            QueryIntent::Exact { field, value } => CourseFilter::Exact {
                field: *field,
                value: value.clone(),
            },
            QueryIntent::Substring { field, text } => CourseFilter::Pattern {
                field: *field,
                regex: literal_regex(text)?,
            },
            QueryIntent::Unified { text } => CourseFilter::Unified {
                regex: literal_regex(text)?,
            },
            QueryIntent::All(intents) => CourseFilter::All(
                intents
                    .iter()
                    .map(QueryIntent::compile)
                    .collect::<Result<Vec<_>, _>>()?,
            ),
        };

        debug!("Compiled search intent {:?}", self);
        Ok(filter)
    }
}

/// A compiled search filter
#[derive(Debug, Clone)]
pub enum CourseFilter {
    MatchAll,
    Exact { field: CourseField, value: String },
    Pattern { field: CourseField, regex: Regex },
    Unified { regex: Regex },
    All(Vec<CourseFilter>),
}

impl CourseFilter {
    pub fn matches(&self, course: &Course) -> bool {
        match self {
            CourseFilter::MatchAll => true,
            CourseFilter::Exact { field, value } => {
                field.values(course).iter().any(|v| *v == value.as_str())
            }
            CourseFilter::Pattern { field, regex } => {
                field.values(course).iter().any(|v| regex.is_match(v))
            }
            CourseFilter::Unified { regex } => [
                CourseField::CourseCode,
                CourseField::CourseName,
                CourseField::Teacher,
            ]
            .iter()
            .flat_map(|field| field.values(course))
            .any(|v| regex.is_match(v)),
            CourseFilter::All(filters) => filters.iter().all(|f| f.matches(course)),
        }
    }

    /// Courses that match, in their original order
    pub fn filter<'a>(&self, courses: &'a [Course]) -> Vec<&'a Course> {
        courses.iter().filter(|c| self.matches(c)).collect()
    }
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

/// Case-insensitive regex matching `text` literally
fn literal_regex(text: &str) -> Result<Regex, PlannerError> {
    Ok(RegexBuilder::new(&regex::escape(text))
        .case_insensitive(true)
        .build()?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn catalog() -> Vec<Course> {
        serde_json::from_value(json!([
            {"course_code": "CS135", "course_name": "Data Structures", "class_time": "二/3,4", "teachers": ["Lin", "Chen"]},
            {"course_code": "CS1350", "course_name": "Advanced Data Structures", "teachers": "Wang"},
            {"course_code": "MA101", "course_name": "Calculus (I)", "teachers": ["Chen"]},
        ]))
        .unwrap()
    }

    fn params(keyword: Option<&str>, code: Option<&str>, name: Option<&str>, teacher: Option<&str>) -> SearchParams {
        SearchParams {
            keyword: keyword.map(str::to_string),
            course_code: code.map(str::to_string),
            course_name: name.map(str::to_string),
            teacher: teacher.map(str::to_string),
        }
    }

    fn codes(filter: &CourseFilter, courses: &[Course]) -> Vec<String> {
        filter
            .filter(courses)
            .into_iter()
            .map(|c| c.course_code.clone())
            .collect()
    }

    #[test]
    fn test_intent_precedence() {
        assert_eq!(
            QueryIntent::from_params(&params(Some("data"), Some("CS135"), Some("x"), None)),
            QueryIntent::Unified { text: "data".to_string() }
        );
        assert_eq!(
            QueryIntent::from_params(&params(Some("  "), Some("CS135"), Some("x"), None)),
            QueryIntent::Exact {
                field: CourseField::CourseCode,
                value: "CS135".to_string()
            }
        );
        assert_eq!(
            QueryIntent::from_params(&params(None, None, Some("calc"), Some("chen"))),
            QueryIntent::All(vec![
                QueryIntent::Substring { field: CourseField::CourseName, text: "calc".to_string() },
                QueryIntent::Substring { field: CourseField::Teacher, text: "chen".to_string() },
            ])
        );
        assert_eq!(QueryIntent::from_params(&SearchParams::default()), QueryIntent::MatchAll);
    }

    #[test]
    fn test_exact_code_is_not_substring() {
        let courses = catalog();
        let filter = QueryIntent::from_params(&params(None, Some("CS135"), None, None))
            .compile()
            .unwrap();
        assert_eq!(codes(&filter, &courses), vec!["CS135"]);
    }

    #[test]
    fn test_unified_search_covers_teachers() {
        let courses = catalog();
        let filter = QueryIntent::from_params(&params(Some("chen"), None, None, None))
            .compile()
            .unwrap();
        assert_eq!(codes(&filter, &courses), vec!["CS135", "MA101"]);

        let filter = QueryIntent::from_params(&params(Some("cs135"), None, None, None))
            .compile()
            .unwrap();
        assert_eq!(codes(&filter, &courses), vec!["CS135", "CS1350"]);
    }

    #[test]
    fn test_user_text_is_literal() {
        let courses = catalog();
        let filter = QueryIntent::from_params(&params(None, None, Some("(I)"), None))
            .compile()
            .unwrap();
        assert_eq!(codes(&filter, &courses), vec!["MA101"]);
    }

    #[test]
    fn test_combined_filters() {
        let courses = catalog();
        let filter = QueryIntent::from_params(&params(None, None, Some("structures"), Some("wang")))
            .compile()
            .unwrap();
        assert_eq!(codes(&filter, &courses), vec!["CS1350"]);

        let all = QueryIntent::MatchAll.compile().unwrap();
        assert_eq!(all.filter(&courses).len(), 3);
    }

    #[test]
    fn test_params_from_query_json() {
        let params: SearchParams = serde_json::from_value(json!({"teacher": "Lin"})).unwrap();
        assert_eq!(
            QueryIntent::from_params(&params),
            QueryIntent::Substring { field: CourseField::Teacher, text: "Lin".to_string() }
        );
    }
}
