//! Static timezone offset table.
//!
//! Offsets are expressed relative to EST, matching how historical patterns
//! are aggregated. Immutable constant data.

use serde::{Deserialize, Serialize};

/// EST-relative hour offsets for the supported timezone codes.
pub const TIMEZONE_OFFSETS: [(&str, f64); 6] = [
    ("PST", -3.0),
    ("MST", -2.0),
    ("CST", -1.0),
    ("EST", 0.0),
    ("GMT", 5.0),
    ("IST", 10.5),
];

/// Default timezone assumed when the caller does not supply one.
pub const DEFAULT_TIMEZONE: &str = "EST";

/// Hour offset relative to EST for a timezone code.
pub fn offset_for(code: &str) -> Option<f64> {
    TIMEZONE_OFFSETS
        .iter()
        .find(|(c, _)| c.eq_ignore_ascii_case(code))
        .map(|(_, offset)| *offset)
}

/// A per-zone consideration attached to analyzed patterns.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimezoneNote {
    pub code: String,
    pub offset_hours: f64,
    pub note: String,
}

/// The full consideration table, one entry per supported zone.
pub fn considerations() -> Vec<TimezoneNote> {
    TIMEZONE_OFFSETS
        .iter()
        .map(|(code, offset)| TimezoneNote {
            code: (*code).to_string(),
            offset_hours: *offset,
            note: match *code {
                "PST" => "3 hours behind EST; morning windows land mid-day for East Coast recruiters".to_string(),
                "MST" => "2 hours behind EST; aim slightly earlier in the local morning".to_string(),
                "CST" => "1 hour behind EST; windows translate almost directly".to_string(),
                "EST" => "Reference zone for aggregated patterns".to_string(),
                "GMT" => "5 hours ahead of EST; late-morning EST windows fall in the local afternoon".to_string(),
                "IST" => "10.5 hours ahead of EST; overnight submissions reach inboxes at local opening".to_string(),
                _ => String::new(),
            },
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_offset_lookup() {
        assert_eq!(offset_for("PST"), Some(-3.0));
        assert_eq!(offset_for("est"), Some(0.0));
        assert_eq!(offset_for("IST"), Some(10.5));
        assert_eq!(offset_for("CET"), None);
    }

    #[test]
    fn test_considerations_cover_all_zones() {
        let notes = considerations();
        assert_eq!(notes.len(), TIMEZONE_OFFSETS.len());
        assert!(notes.iter().all(|n| !n.note.is_empty()));
    }
}
