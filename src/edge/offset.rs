//! `±HH:MM` rendering of UTC offsets.

use crate::edge::timezone::TimezoneOffsetMinutes;

/// Format an offset in minutes as `±HH:MM`.
///
/// Sign and magnitude are split before the hour/minute decomposition, so
/// negative non-whole-hour offsets keep a single leading sign.
pub fn format_offset(minutes: TimezoneOffsetMinutes) -> String {
    let sign = if minutes < 0 { '-' } else { '+' };
    let magnitude = minutes.unsigned_abs();
    format!("{}{:02}:{:02}", sign, magnitude / 60, magnitude % 60)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_offset_vectors() {
        let vectors = [
            (0, "+00:00"),
            (60, "+01:00"),
            (-60, "-01:00"),
            (-330, "-05:30"),
            (330, "+05:30"),
            (-210, "-03:30"),
            (345, "+05:45"),
            (-30, "-00:30"),
            (840, "+14:00"),
            (-720, "-12:00"),
        ];

        for (minutes, expected) in vectors {
            assert_eq!(format_offset(minutes), expected, "offset {minutes}");
        }
    }

    #[test]
    fn test_extreme_input() {
        assert_eq!(format_offset(i32::MIN), "-35791394:08");
    }
}
