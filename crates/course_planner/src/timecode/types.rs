/// Types for parsed course meeting times
use serde::{Deserialize, Serialize};
use std::fmt;

/// Day of the week a course meets on.
///
/// Serialized with its long English label (`"Monday"`). Raw time codes use the
/// single-character marker returned by [`Weekday::marker`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Weekday {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

impl Weekday {
    /// All seven days, Monday first.
    pub const ALL: [Weekday; 7] = [
        Weekday::Monday,
        Weekday::Tuesday,
        Weekday::Wednesday,
        Weekday::Thursday,
        Weekday::Friday,
        Weekday::Saturday,
        Weekday::Sunday,
    ];

    /// Maps a raw day marker (e.g. `一`) to its weekday.
    pub fn from_marker(c: char) -> Option<Self> {
        match c {
            '一' => Some(Weekday::Monday),
            '二' => Some(Weekday::Tuesday),
            '三' => Some(Weekday::Wednesday),
            '四' => Some(Weekday::Thursday),
            '五' => Some(Weekday::Friday),
            '六' => Some(Weekday::Saturday),
            '日' => Some(Weekday::Sunday),
            _ => None,
        }
    }

    /// The single-character marker used in raw time codes.
    pub fn marker(&self) -> char {
        match self {
            Weekday::Monday => '一',
            Weekday::Tuesday => '二',
            Weekday::Wednesday => '三',
            Weekday::Thursday => '四',
            Weekday::Friday => '五',
            Weekday::Saturday => '六',
            Weekday::Sunday => '日',
        }
    }

    /// Long label shown to users, e.g. `星期一`.
    pub fn long_label(&self) -> &'static str {
        match self {
            Weekday::Monday => "星期一",
            Weekday::Tuesday => "星期二",
            Weekday::Wednesday => "星期三",
            Weekday::Thursday => "星期四",
            Weekday::Friday => "星期五",
            Weekday::Saturday => "星期六",
            Weekday::Sunday => "星期日",
        }
    }

    /// English name, matching the serialized form.
    pub fn name(&self) -> &'static str {
        match self {
            Weekday::Monday => "Monday",
            Weekday::Tuesday => "Tuesday",
            Weekday::Wednesday => "Wednesday",
            Weekday::Thursday => "Thursday",
            Weekday::Friday => "Friday",
            Weekday::Saturday => "Saturday",
            Weekday::Sunday => "Sunday",
        }
    }
}

impl fmt::Display for Weekday {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One meeting block of a course on a single weekday.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleEntry {
    pub day: Weekday,
    /// Period slot numbers in the order they appeared in the raw code
    pub periods: Vec<u32>,
    /// Room/building text from a bracketed segment, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
}

impl ScheduleEntry {
    pub fn new(day: Weekday, periods: Vec<u32>) -> Self {
        Self {
            day,
            periods,
            location: None,
        }
    }

    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_marker_round_trip() {
        for day in Weekday::ALL {
            assert_eq!(Weekday::from_marker(day.marker()), Some(day));
        }
        assert_eq!(Weekday::from_marker('月'), None);
        assert_eq!(Weekday::from_marker('1'), None);
    }

    #[test]
    fn test_entry_serialization() {
        let entry = ScheduleEntry::new(Weekday::Monday, vec![1, 2]);
        let json = serde_json::to_value(&entry).unwrap();
        assert_eq!(json, serde_json::json!({"day": "Monday", "periods": [1, 2]}));

        let located = ScheduleEntry::new(Weekday::Wednesday, vec![3]).with_location("EB205");
        let json = serde_json::to_value(&located).unwrap();
        assert_eq!(json["day"], "Wednesday");
        assert_eq!(json["location"], "EB205");
    }
}
