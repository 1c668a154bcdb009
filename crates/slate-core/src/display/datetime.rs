//! DateTime display utilities.

use std::fmt;

use jiff::{civil::Date, tz::TimeZone, Timestamp};

/// Formats a `Timestamp` in the system timezone as `YYYY-MM-DD HH:MM:SS TZ`.
pub struct LocalDateTime<'a>(pub &'a Timestamp);

impl fmt::Display for LocalDateTime<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}",
            self.0
                .to_zoned(TimeZone::system())
                .strftime("%Y-%m-%d %H:%M:%S %Z")
        )
    }
}

/// Formats an inclusive date range, with `…` standing in for a missing end.
pub struct DateRange(pub Option<Date>, pub Option<Date>);

impl fmt::Display for DateRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.0, self.1) {
            (None, None) => write!(f, "no dates"),
            (Some(start), Some(end)) => write!(f, "{start} → {end}"),
            (Some(start), None) => write!(f, "{start} → …"),
            (None, Some(end)) => write!(f, "… → {end}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use jiff::civil::date;

    use super::*;

    #[test]
    fn test_date_range_variants() {
        let start = Some(date(2025, 1, 2));
        let end = Some(date(2025, 1, 5));
        assert_eq!(DateRange(start, end).to_string(), "2025-01-02 → 2025-01-05");
        assert_eq!(DateRange(start, None).to_string(), "2025-01-02 → …");
        assert_eq!(DateRange(None, None).to_string(), "no dates");
    }
}
