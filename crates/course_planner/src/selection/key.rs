//! Stable identifiers for sharing a schedule.

use sha2::{Digest, Sha256};
use std::collections::BTreeSet;

/// A key derived from the course codes in a schedule.
///
/// The same set of courses always produces the same key, regardless of the
/// order they were added in or of duplicates.
#[derive(Debug, Clone, Hash, Eq, PartialEq)]
pub struct ScheduleKey(String);

impl ScheduleKey {
    /// Creates a key from course codes.
    pub fn from_codes<'a>(codes: impl IntoIterator<Item = &'a str>) -> Self {
        let unique: BTreeSet<&str> = codes.into_iter().collect();

        let mut hasher = Sha256::new();
        for code in unique {
            hasher.update(code.as_bytes());
            // Separator so ["AB", "C"] and ["A", "BC"] differ
            hasher.update([0u8]);
        }
        let result = hasher.finalize();
        // First 16 bytes are plenty for a share link
        Self(hex::encode(&result[..16]))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ScheduleKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}...", &self.0[..8.min(self.0.len())])
    }
}

mod hex {
    pub fn encode(bytes: &[u8]) -> String {
        bytes.iter().map(|b| format!("{:02x}", b)).collect()
    }
}
