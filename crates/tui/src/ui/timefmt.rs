use chrono::{DateTime, FixedOffset};
use chrono_tz::Tz;

/// Short form for table rows.
pub fn short(created_at: &DateTime<FixedOffset>, tz: Tz) -> String {
    created_at.with_timezone(&tz).format("%d %b %H:%M").to_string()
}

/// Long form for the detail overlay.
pub fn long(created_at: &DateTime<FixedOffset>, tz: Tz) -> String {
    created_at
        .with_timezone(&tz)
        .format("%d %b %Y %H:%M")
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_in_the_configured_timezone() {
        let created_at = DateTime::parse_from_rfc3339("2024-01-01T00:00:00Z").unwrap();
        let tz: Tz = "Europe/Rome".parse().unwrap();
        // UTC midnight is 01:00 in Rome in January.
        assert_eq!(long(&created_at, tz), "01 Jan 2024 01:00");
        assert_eq!(short(&created_at, tz), "01 Jan 01:00");
    }
}
