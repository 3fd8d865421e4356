use chrono::{Datelike, NaiveDate, NaiveDateTime, Timelike};
pub const DATE_PATTERN: &str = "%d-%m-%Y";
const SECONDS_PER_DAY: f64 = 86_400.0;
pub fn parse_date(text: &str) -> Option<NaiveDate> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return None;
    }
    if !has_date_shape(trimmed) {
        return None;
    }
    NaiveDate::parse_from_str(trimmed, DATE_PATTERN).ok()
}
// `%Y` alone accepts short years such as `24`; the extract always writes four digits.
fn has_date_shape(text: &str) -> bool {
    let mut parts = text.split('-');
    let (Some(day), Some(month), Some(year), None) =
        (parts.next(), parts.next(), parts.next(), parts.next())
    else {
        return false;
    };
    let digits = |part: &str, min: usize, max: usize| {
        (min..=max).contains(&part.len()) && part.bytes().all(|b| b.is_ascii_digit())
    };
    digits(day, 1, 2) && digits(month, 1, 2) && digits(year, 4, 4)
}
pub fn parse_datetime(text: &str) -> Option<NaiveDateTime> {
    parse_date(text).and_then(|date| date.and_hms_opt(0, 0, 0))
}
/// Serial day number in the spreadsheet 1900 date system.
///
/// Serial 1 is 1900-01-01. The format counts a phantom 1900-02-29, so dates
/// from 1900-03-01 on are one higher than a plain day count.
pub fn excel_serial_date(date: NaiveDate) -> Option<i64> {
    let first = NaiveDate::from_ymd_opt(1900, 1, 1)?;
    let leap_bug = NaiveDate::from_ymd_opt(1900, 3, 1)?;
    let epoch = NaiveDate::from_ymd_opt(1899, 12, 30)?;
    if date < first || date.year() > 9999 {
        return None;
    }
    let days = date.signed_duration_since(epoch).num_days();
    if date < leap_bug {
        Some(days - 1)
    } else {
        Some(days)
    }
}
pub fn excel_serial_datetime(value: NaiveDateTime) -> Option<f64> {
    let days = i32::try_from(excel_serial_date(value.date())?).ok()?;
    let seconds = value.time().num_seconds_from_midnight();
    Some(f64::from(days) + f64::from(seconds) / SECONDS_PER_DAY)
}
