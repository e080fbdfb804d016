/// Class period table: which clock times each period slot covers
use super::types::ScheduleEntry;
use crate::error::PlannerError;
use chrono::NaiveTime;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::Path;
use tracing::info;

/// Built-in slots: `A` is the early-morning slot, `1`..`13` run hourly from 08:10.
const DEFAULT_SLOTS: [(&str, (u32, u32), (u32, u32)); 14] = [
    ("A", (7, 10), (8, 0)),
    ("1", (8, 10), (9, 0)),
    ("2", (9, 10), (10, 0)),
    ("3", (10, 10), (11, 0)),
    ("4", (11, 10), (12, 0)),
    ("5", (12, 10), (13, 0)),
    ("6", (13, 10), (14, 0)),
    ("7", (14, 10), (15, 0)),
    ("8", (15, 10), (16, 0)),
    ("9", (16, 10), (17, 0)),
    ("10", (17, 10), (18, 0)),
    ("11", (18, 10), (19, 0)),
    ("12", (19, 10), (20, 0)),
    ("13", (20, 10), (21, 0)),
];

/// A single period slot
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeriodSlot {
    pub label: String,
    #[serde(with = "hhmm")]
    pub start: NaiveTime,
    #[serde(with = "hhmm")]
    pub end: NaiveTime,
}

/// Ordered set of period slots for a teaching day
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<PeriodSlot>", into = "Vec<PeriodSlot>")]
pub struct PeriodTable {
    slots: Vec<PeriodSlot>,
}

impl TryFrom<Vec<PeriodSlot>> for PeriodTable {
    type Error = PlannerError;

    fn try_from(slots: Vec<PeriodSlot>) -> Result<Self, Self::Error> {
        Self::new(slots)
    }
}

impl From<PeriodTable> for Vec<PeriodSlot> {
    fn from(table: PeriodTable) -> Self {
        table.slots
    }
}

impl PeriodTable {
    /// Builds a table from slots, validating them.
    ///
    /// # Returns
    /// * `Ok(PeriodTable)` - Labels are unique, every slot ends after it starts,
    ///   and start times never go backwards
    /// * `Err` - Describing the first offending slot
    pub fn new(slots: Vec<PeriodSlot>) -> Result<Self, PlannerError> {
        let mut seen: HashSet<String> = HashSet::new();
        let mut previous_start: Option<NaiveTime> = None;

        for slot in &slots {
            if slot.label.trim().is_empty() {
                return Err(PlannerError::InvalidConfig {
                    message: "period slot with an empty label".to_string(),
                });
            }
            if !seen.insert(slot.label.clone()) {
                return Err(PlannerError::InvalidConfig {
                    message: format!("duplicate period label {:?}", slot.label),
                });
            }
            if slot.start >= slot.end {
                return Err(PlannerError::InvalidPeriodTime {
                    label: slot.label.clone(),
                    start: slot.start,
                    end: slot.end,
                });
            }
            if previous_start.is_some_and(|prev| slot.start < prev) {
                return Err(PlannerError::InvalidConfig {
                    message: format!("period {:?} starts before the slot listed above it", slot.label),
                });
            }
            previous_start = Some(slot.start);
        }

        Ok(Self { slots })
    }

    /// Loads a period table from a JSON file holding an array of slots.
    pub fn load_from_file(path: &Path) -> Result<Self, PlannerError> {
        let content = fs::read_to_string(path)?;
        let table: PeriodTable = serde_json::from_str(&content)?;

        info!("Loaded {} period slots from {}", table.len(), path.display());
        Ok(table)
    }

    pub fn slots(&self) -> &[PeriodSlot] {
        &self.slots
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Gets a slot by its label (e.g. `"A"`, `"7"`)
    pub fn slot(&self, label: &str) -> Option<&PeriodSlot> {
        self.slots.iter().find(|s| s.label == label)
    }

    /// Gets the slot for a parsed numeric period
    pub fn slot_for_period(&self, period: u32) -> Option<&PeriodSlot> {
        self.slot(&period.to_string())
    }

    /// Earliest start and latest end over the periods this table knows.
    /// Unknown periods are ignored; `None` when none are known.
    pub fn span(&self, periods: &[u32]) -> Option<(NaiveTime, NaiveTime)> {
        periods
            .iter()
            .filter_map(|&p| self.slot_for_period(p))
            .fold(None, |acc, slot| match acc {
                None => Some((slot.start, slot.end)),
                Some((start, end)) => Some((start.min(slot.start), end.max(slot.end))),
            })
    }

    /// Human-readable line for one entry, e.g. `星期一 08:10-10:00 @ SC101`.
    pub fn describe_entry(&self, entry: &ScheduleEntry) -> String {
        let mut text = entry.day.long_label().to_string();

        if let Some((start, end)) = self.span(&entry.periods) {
            text.push_str(&format!(" {}-{}", start.format("%H:%M"), end.format("%H:%M")));
        } else if !entry.periods.is_empty() {
            let list: Vec<String> = entry.periods.iter().map(|p| p.to_string()).collect();
            text.push_str(&format!(" 第{}節", list.join("、")));
        }

        if let Some(location) = entry.location.as_deref().filter(|l| !l.is_empty()) {
            text.push_str(" @ ");
            text.push_str(location);
        }

        text
    }
}

impl Default for PeriodTable {
    fn default() -> Self {
        let slots = DEFAULT_SLOTS
            .iter()
            .filter_map(|(label, (sh, sm), (eh, em))| {
                Some(PeriodSlot {
                    label: label.to_string(),
                    start: NaiveTime::from_hms_opt(*sh, *sm, 0)?,
                    end: NaiveTime::from_hms_opt(*eh, *em, 0)?,
                })
            })
            .collect();
        Self { slots }
    }
}

/// `HH:MM` (de)serialization for slot times
mod hhmm {
    use chrono::NaiveTime;
    use serde::{Deserialize, Deserializer, Serializer};

    const FORMAT: &str = "%H:%M";

    pub fn serialize<S: Serializer>(time: &NaiveTime, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&time.format(FORMAT).to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveTime, D::Error> {
        let raw = String::deserialize(deserializer)?;
        NaiveTime::parse_from_str(raw.trim(), FORMAT).map_err(serde::de::Error::custom)
    }
}
