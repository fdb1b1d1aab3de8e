//! IANA time zone name to UTC offset resolution.

use chrono::{DateTime, Offset, Utc};
use chrono_tz::Tz;
use thiserror::Error;

/// Offset from UTC in minutes, positive east of Greenwich.
pub type TimezoneOffsetMinutes = i32;

/// Practical bounds of real-world UTC offsets.
pub const MIN_OFFSET_MINUTES: TimezoneOffsetMinutes = -720;
pub const MAX_OFFSET_MINUTES: TimezoneOffsetMinutes = 840;

/// The time zone name is not in the zone database.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown time zone '{0}'")]
pub struct UnknownZoneError(pub String);

/// Resolves zone names against the bundled IANA database.
#[derive(Debug, Clone, Copy, Default)]
pub struct TimezoneOffsetResolver;

impl TimezoneOffsetResolver {
    pub fn new() -> Self {
        Self
    }

    /// Offset of `name` right now, including any daylight-saving shift.
    pub fn resolve(&self, name: &str) -> Result<TimezoneOffsetMinutes, UnknownZoneError> {
        self.resolve_at(name, Utc::now())
    }

    /// Offset of `name` at `instant`.
    pub fn resolve_at(
        &self,
        name: &str,
        instant: DateTime<Utc>,
    ) -> Result<TimezoneOffsetMinutes, UnknownZoneError> {
        let tz: Tz = name
            .trim()
            .parse()
            .map_err(|_| UnknownZoneError(name.to_string()))?;

        let seconds = instant.with_timezone(&tz).offset().fix().local_minus_utc();
        Ok(seconds / 60)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn january() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 15, 12, 0, 0).unwrap()
    }

    fn july() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 7, 15, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_fixed_zones() {
        let resolver = TimezoneOffsetResolver::new();
        assert_eq!(resolver.resolve_at("UTC", january()), Ok(0));
        assert_eq!(resolver.resolve_at("Asia/Kolkata", january()), Ok(330));
        assert_eq!(resolver.resolve_at("Asia/Kathmandu", july()), Ok(345));
        assert_eq!(resolver.resolve_at("Pacific/Kiritimati", july()), Ok(MAX_OFFSET_MINUTES));
    }

    #[test]
    fn test_daylight_saving() {
        let resolver = TimezoneOffsetResolver::new();
        assert_eq!(resolver.resolve_at("America/New_York", january()), Ok(-300));
        assert_eq!(resolver.resolve_at("America/New_York", july()), Ok(-240));
        assert_eq!(resolver.resolve_at("America/St_Johns", january()), Ok(-210));
        assert_eq!(resolver.resolve_at("Europe/London", july()), Ok(60));
    }

    #[test]
    fn test_unknown_zones() {
        let resolver = TimezoneOffsetResolver::new();
        for name in ["Not/AZone", "", "   ", "america/new york"] {
            assert_eq!(resolver.resolve(name), Err(UnknownZoneError(name.to_string())));
        }
    }

    #[test]
    fn test_now_within_bounds() {
        let offset = TimezoneOffsetResolver::new().resolve("Australia/Sydney").unwrap();
        assert!((MIN_OFFSET_MINUTES..=MAX_OFFSET_MINUTES).contains(&offset));
    }
}
