//! Course time-code parsing.
//!
//! Course records store their weekly meetings as a compact string such as
//! `一/1,2[SC101];三/3,4[EB205]`: a day marker, a `/`, a comma separated list
//! of period numbers, and an optional bracketed location. Multi-line strings
//! hold one or more such segments per line.
//!
//! Unknown characters are skipped instead of rejected, so a malformed string
//! yields fewer entries rather than an error.
mod periods;
mod types;

pub use periods::{PeriodSlot, PeriodTable};
pub use types::{ScheduleEntry, Weekday};

use tracing::{debug, trace};

/// Parses a raw `class_time` string into its meeting entries.
///
/// Each line is scanned independently and entries are returned in the order
/// they are completed, line by line. No sorting or de-duplication happens.
///
/// # Arguments
/// * `raw` - The stored time code, possibly spanning several lines
///
/// # Returns
/// The parsed entries. Empty when the string contains no day marker.
pub fn parse_course_time(raw: &str) -> Vec<ScheduleEntry> {
    let mut entries = Vec::new();

    for line in raw.lines() {
        let mut scanner = LineScanner::default();
        for c in line.chars() {
            scanner.feed(c, &mut entries);
        }
        scanner.finish(&mut entries);
    }

    trace!("Parsed {} schedule entries from {:?}", entries.len(), raw);
    entries
}

/// Scratch state for scanning a single line.
#[derive(Default)]
struct LineScanner {
    day: Option<Weekday>,
    periods: Vec<u32>,
    location: Option<String>,
    pending: String,
    reading_periods: bool,
    reading_location: bool,
}

impl LineScanner {
    fn feed(&mut self, c: char, out: &mut Vec<ScheduleEntry>) {
        // Location text is taken verbatim up to the closing bracket.
        if self.reading_location {
            if c == ']' {
                self.reading_location = false;
            } else if let Some(location) = self.location.as_mut() {
                location.push(c);
            }
            return;
        }

        // Brackets open a location even outside an entry, so their text is
        // never scanned for day markers.
        if c == '[' {
            self.flush_pending();
            self.reading_periods = false;
            self.reading_location = true;
            self.location = Some(String::new());
            return;
        }

        if let Some(day) = Weekday::from_marker(c) {
            self.start_day(day, out);
            return;
        }

        // Nothing else counts until a day marker has been seen.
        if self.day.is_none() {
            return;
        }

        match c {
            '/' => {
                self.flush_pending();
                self.reading_periods = true;
            }
            '0'..='9' if self.reading_periods => self.pending.push(c),
            ',' if self.reading_periods => self.flush_pending(),
            ' ' if self.reading_periods => self.terminate(out),
            ';' => self.terminate(out),
            _ if self.reading_periods => self.flush_pending(),
            _ => {}
        }
    }

    /// Begins a new entry. The previous one is kept only if it collected
    /// periods or a location; a bare day marker is dropped here, unlike at
    /// the end of a line or at an explicit terminator.
    fn start_day(&mut self, day: Weekday, out: &mut Vec<ScheduleEntry>) {
        self.flush_pending();
        if let Some(previous) = self.day {
            if !self.periods.is_empty() || self.location.is_some() {
                out.push(self.take_entry(previous));
            } else {
                debug!("Dropping empty {} fragment before {}", previous, day);
            }
        }
        self.reset();
        self.day = Some(day);
    }

    /// Ends the current entry on `;` or on a space inside a period list.
    fn terminate(&mut self, out: &mut Vec<ScheduleEntry>) {
        self.flush_pending();
        if let Some(day) = self.day {
            out.push(self.take_entry(day));
        }
        self.reset();
    }

    fn finish(mut self, out: &mut Vec<ScheduleEntry>) {
        self.flush_pending();
        if let Some(day) = self.day {
            out.push(self.take_entry(day));
        }
    }

    fn flush_pending(&mut self) {
        if self.pending.is_empty() {
            return;
        }
        match self.pending.parse::<u32>() {
            Ok(period) => self.periods.push(period),
            Err(e) => debug!("Discarding period number {:?}: {}", self.pending, e),
        }
        self.pending.clear();
    }

    fn take_entry(&mut self, day: Weekday) -> ScheduleEntry {
        ScheduleEntry {
            day,
            periods: std::mem::take(&mut self.periods),
            location: self.location.take(),
        }
    }

    fn reset(&mut self) {
        *self = LineScanner::default();
    }
}
