//! Display formatting for clock readouts and wall-clock stamps.

use time::format_description::BorrowedFormatItem;
use time::macros::format_description;
use time::OffsetDateTime;

use crate::error::InvalidInput;

const DATE_TIME: &[BorrowedFormatItem<'static>] =
    format_description!("[year]-[month]-[day] [hour]:[minute]:[second]");
const DATE_TIME_MS: &[BorrowedFormatItem<'static>] =
    format_description!("[year]-[month]-[day] [hour]:[minute]:[second].[subsecond digits:3]");
const TIME_OF_DAY: &[BorrowedFormatItem<'static>] =
    format_description!("[hour]:[minute]:[second]");
const FILE_STAMP: &[BorrowedFormatItem<'static>] =
    format_description!("[year][month][day]_[hour][minute][second]");

/// Render non-negative seconds as `MM:SS.ss`. The minute field is zero-padded
/// to two digits and keeps growing past 99 minutes (no wraparound); hundredths
/// are truncated, not rounded. Negative input is rejected, never clamped.
pub fn format_clock(seconds: f64) -> Result<String, InvalidInput> {
    if seconds < 0.0 {
        return Err(InvalidInput::NegativeDuration(seconds));
    }
    let total_centis = (seconds * 100.0) as u64;
    let minutes = total_centis / 6000;
    let secs = (total_centis % 6000) / 100;
    let centis = total_centis % 100;
    Ok(format!("{minutes:02}:{secs:02}.{centis:02}"))
}

/// `YYYY-MM-DD HH:MM:SS`, for the export metadata block.
pub fn format_date_time(ts: OffsetDateTime) -> String {
    ts.format(DATE_TIME).unwrap_or_default()
}

/// `YYYY-MM-DD HH:MM:SS.mmm`, for per-lap rows.
pub fn format_date_time_ms(ts: OffsetDateTime) -> String {
    ts.format(DATE_TIME_MS).unwrap_or_default()
}

/// `HH:MM:SS`, for the live lap feed.
pub fn format_time_of_day(ts: OffsetDateTime) -> String {
    ts.format(TIME_OF_DAY).unwrap_or_default()
}

/// Compact `YYYYmmdd_HHMMSS` stamp used in generated file and session names.
pub fn file_stamp(ts: OffsetDateTime) -> String {
    ts.format(FILE_STAMP).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    #[test]
    fn formats_zero_as_double_zero() {
        assert_eq!(format_clock(0.0).unwrap(), "00:00.00");
    }

    #[test]
    fn truncates_hundredths_instead_of_rounding() {
        assert_eq!(format_clock(65.247).unwrap(), "01:05.24");
        assert_eq!(format_clock(59.999).unwrap(), "00:59.99");
    }

    #[test]
    fn minute_field_grows_past_two_digits() {
        assert_eq!(format_clock(6000.0).unwrap(), "100:00.00");
    }

    #[test]
    fn rejects_negative_durations() {
        assert_eq!(
            format_clock(-1.0),
            Err(InvalidInput::NegativeDuration(-1.0))
        );
    }

    #[test]
    fn renders_wall_clock_stamps() {
        let ts = datetime!(2025-06-01 10:30:05.589 UTC);
        assert_eq!(format_date_time(ts), "2025-06-01 10:30:05");
        assert_eq!(format_date_time_ms(ts), "2025-06-01 10:30:05.589");
        assert_eq!(format_time_of_day(ts), "10:30:05");
        assert_eq!(file_stamp(ts), "20250601_103005");
    }
}
