//! Display formatting for sizes and timestamps.

use chrono::{DateTime, TimeZone};
use std::fmt::Display;

const SIZE_UNITS: [&str; 5] = ["Bytes", "KB", "MB", "GB", "TB"];

/// Human readable size in base 1024, e.g. `1536 -> "1.5 KB"`.
pub fn format_file_size(bytes: u64) -> String {
    if bytes == 0 {
        return "0 Bytes".to_string();
    }

    let mut unit = 0;
    let mut scale = 1u64;
    while unit < SIZE_UNITS.len() - 1 && bytes >= scale.saturating_mul(1024) {
        scale *= 1024;
        unit += 1;
    }

    let value = bytes as f64 / scale as f64;
    let rendered = format!("{:.2}", value);
    let trimmed = rendered.trim_end_matches('0').trim_end_matches('.');
    format!("{} {}", trimmed, SIZE_UNITS[unit])
}

/// Clock time such as `3:07 PM`.
pub fn format_time<Tz: TimeZone>(dt: &DateTime<Tz>) -> String
where
    Tz::Offset: Display,
{
    dt.format("%-I:%M %p").to_string()
}

/// Calendar date such as `Jan 5, 2025`.
pub fn format_date<Tz: TimeZone>(dt: &DateTime<Tz>) -> String
where
    Tz::Offset: Display,
{
    dt.format("%b %-d, %Y").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn test_file_sizes() {
        assert_eq!(format_file_size(0), "0 Bytes");
        assert_eq!(format_file_size(1023), "1023 Bytes");
        assert_eq!(format_file_size(1024), "1 KB");
        assert_eq!(format_file_size(1536), "1.5 KB");
        assert_eq!(format_file_size(10 * 1024), "10 KB");
        assert_eq!(format_file_size(50 * 1024 * 1024), "50 MB");
        assert_eq!(format_file_size(1_234_567), "1.18 MB");
    }

    #[test]
    fn test_time_and_date() {
        let dt = Utc.with_ymd_and_hms(2025, 1, 5, 15, 7, 0).unwrap();
        assert_eq!(format_time(&dt), "3:07 PM");
        assert_eq!(format_date(&dt), "Jan 5, 2025");
    }
}
