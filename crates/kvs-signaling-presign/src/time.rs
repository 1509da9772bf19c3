//! UTC timestamp formatting for AWS Signature Version 4.
//!
//! SigV4 binds every signature to two fixed-format timestamps: the full
//! ISO 8601 basic datetime carried in `X-Amz-Date`, and the compact date
//! used in the credential scope. Both are always rendered in UTC,
//! regardless of the host timezone.

use chrono::{DateTime, Utc};

/// ISO 8601 basic format used for `X-Amz-Date` (`YYYYMMDDTHHMMSSZ`).
const AMZ_DATE_FORMAT: &str = "%Y%m%dT%H%M%SZ";

/// Compact date format used in the credential scope (`YYYYMMDD`).
const DATE_STAMP_FORMAT: &str = "%Y%m%d";

/// Format a UTC instant as the `X-Amz-Date` timestamp.
///
/// # Examples
///
/// ```
/// use chrono::DateTime;
/// use kvs_signaling_presign::time::format_amz_date;
///
/// let date = DateTime::from_timestamp_millis(1689984000000).unwrap();
/// assert_eq!(format_amz_date(&date), "20230722T000000Z");
/// ```
#[must_use]
pub fn format_amz_date(date: &DateTime<Utc>) -> String {
    date.format(AMZ_DATE_FORMAT).to_string()
}

/// Format a UTC instant as the credential-scope date stamp.
///
/// # Examples
///
/// ```
/// use chrono::DateTime;
/// use kvs_signaling_presign::time::format_date_stamp;
///
/// let date = DateTime::from_timestamp_millis(1689984000000).unwrap();
/// assert_eq!(format_date_stamp(&date), "20230722");
/// ```
#[must_use]
pub fn format_date_stamp(date: &DateTime<Utc>) -> String {
    date.format(DATE_STAMP_FORMAT).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at_millis(millis: i64) -> DateTime<Utc> {
        DateTime::from_timestamp_millis(millis).unwrap()
    }

    #[test]
    fn test_should_format_amz_date_at_midnight_utc() {
        // Saturday, July 22, 2023 12:00:00.000 AM (UTC)
        assert_eq!(format_amz_date(&at_millis(1689984000000)), "20230722T000000Z");
    }

    #[test]
    fn test_should_format_amz_date_just_before_midnight_utc() {
        // Friday, July 21, 2023 11:59:59.999 PM (UTC); sub-second precision truncates.
        assert_eq!(format_amz_date(&at_millis(1689983999999)), "20230721T235959Z");
    }

    #[test]
    fn test_should_format_date_stamp_at_midnight_utc() {
        assert_eq!(format_date_stamp(&at_millis(1689984000000)), "20230722");
    }

    #[test]
    fn test_should_format_date_stamp_just_before_midnight_utc() {
        assert_eq!(format_date_stamp(&at_millis(1689983999999)), "20230721");
    }
}
