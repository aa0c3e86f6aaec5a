//! Small pure functions the templates call.

use chrono::{DateTime, Utc};

use crate::api::ApiVersion;
use crate::image::ImageRecord;

/// `text` when `cond` holds, otherwise the empty string.
pub fn if_true(cond: bool, text: &str) -> &str {
    if cond {
        text
    } else {
        ""
    }
}

/// Epoch seconds to a UTC instant. Non-positive values mean "no timestamp".
pub fn to_date(epoch_seconds: i64) -> Option<DateTime<Utc>> {
    if epoch_seconds <= 0 {
        return None;
    }
    epoch_seconds
        .checked_mul(1000)
        .and_then(DateTime::<Utc>::from_timestamp_millis)
}

pub fn format_date(epoch_seconds: i64) -> String {
    to_date(epoch_seconds)
        .map(|date| date.format("%Y-%m-%d %H:%M:%S").to_string())
        .unwrap_or_default()
}

/// Flips whether the processed image is shown for `record`.
///
/// v1 payloads carry no processed image URL, so one is derived from the
/// file id; v2 already ships it as `CleanImg`.
pub fn toggle_processed(record: &mut ImageRecord, version: ApiVersion) {
    record.show_img = !record.show_img;
    if version == ApiVersion::V1 {
        record.proc_url = Some(format!("static/{}processed.jpg", record.file_id));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn no_date_for_non_positive_input() {
        assert_eq!(to_date(0), None);
        assert_eq!(to_date(-5), None);
        assert_eq!(format_date(0), "");
        assert_eq!(format_date(-62_135_596_800), "");
    }

    #[test]
    fn seconds_become_a_utc_date() {
        let expected = Utc.with_ymd_and_hms(1970, 1, 1, 0, 16, 40).unwrap();
        assert_eq!(to_date(1000), Some(expected));
        assert_eq!(format_date(1000), "1970-01-01 00:16:40");
    }

    #[test]
    fn absurd_timestamps_are_dropped() {
        assert_eq!(to_date(i64::MAX), None);
    }

    #[test]
    fn if_true_picks_text_or_nothing() {
        assert_eq!(if_true(true, "x"), "x");
        assert_eq!(if_true(false, "x"), "");
    }

    #[test]
    fn toggle_twice_restores_the_flag() {
        let mut record = ImageRecord::default();

        toggle_processed(&mut record, ApiVersion::V2);
        assert!(record.show_img);
        toggle_processed(&mut record, ApiVersion::V2);
        assert!(!record.show_img);
        assert_eq!(record.proc_url, None);
    }

    #[test]
    fn v1_toggle_derives_the_processed_url() {
        let mut record = ImageRecord { file_id: "abc123".into(), ..Default::default() };

        toggle_processed(&mut record, ApiVersion::V1);

        assert!(record.show_img);
        assert_eq!(record.proc_url.as_deref(), Some("static/abc123processed.jpg"));
    }
}
