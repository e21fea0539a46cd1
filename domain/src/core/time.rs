//! Wall-clock helpers.
//!
//! Timestamps are local naive ISO-8601 strings with microsecond precision
//! (`2024-05-01T14:03:22.123456`). Persisted documents store them as plain
//! strings, so lexicographic order equals chronological order.

use chrono::Local;

const ISO_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.6f";
const STAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

/// Current local time as an ISO-8601 string.
pub fn now_iso() -> String {
    Local::now().naive_local().format(ISO_FORMAT).to_string()
}

/// Current local time at second granularity, as used in session filenames.
pub fn session_stamp() -> String {
    Local::now().naive_local().format(STAMP_FORMAT).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_iso_timestamp_shape() {
        let ts = now_iso();
        assert_eq!(ts.len(), "2024-05-01T14:03:22.123456".len());
        assert_eq!(&ts[4..5], "-");
        assert_eq!(&ts[10..11], "T");
        assert_eq!(&ts[19..20], ".");
    }

    #[test]
    fn test_session_stamp_shape() {
        let stamp = session_stamp();
        assert_eq!(stamp.len(), 15);
        assert_eq!(&stamp[8..9], "_");
        assert!(stamp.chars().filter(|c| *c != '_').all(|c| c.is_ascii_digit()));
    }

    #[test]
    fn test_timestamps_are_non_decreasing() {
        let a = now_iso();
        let b = now_iso();
        assert!(a <= b);
    }
}
