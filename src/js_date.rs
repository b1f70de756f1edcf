use crate::core::{JSObjectDataPtr, MutationContext, ObjectKind, Realm, new_object_with};
use crate::error::JSError;
use crate::raise_range_error;
use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};

/// Largest absolute time value a Date can hold (±100,000,000 days).
const MAX_TIME_MS: f64 = 8.64e15;

/// `new Date(ms)`. Out-of-range or non-finite inputs produce an invalid date.
pub fn create_date<'gc>(mc: &MutationContext<'gc>, realm: &Realm<'gc>, time_ms: f64) -> JSObjectDataPtr<'gc> {
    create_date_with_prototype(mc, realm.prototype("Date"), time_ms)
}

pub(crate) fn create_date_with_prototype<'gc>(
    mc: &MutationContext<'gc>,
    prototype: Option<JSObjectDataPtr<'gc>>,
    time_ms: f64,
) -> JSObjectDataPtr<'gc> {
    new_object_with(mc, ObjectKind::Date { time: time_clip(time_ms) }, prototype)
}

/// `new Date(string)`. Unparseable strings give an invalid date, like
/// JavaScript does.
pub fn create_date_from_string<'gc>(mc: &MutationContext<'gc>, realm: &Realm<'gc>, text: &str) -> JSObjectDataPtr<'gc> {
    let time = parse_date_string(text).unwrap_or(f64::NAN);
    create_date(mc, realm, time)
}

/// `date.getTime()`; `None` if `obj` is not a Date.
pub fn date_time_value(obj: &JSObjectDataPtr<'_>) -> Option<f64> {
    match obj.borrow().kind {
        ObjectKind::Date { time } => Some(time),
        _ => None,
    }
}

pub fn set_date_time_value<'gc>(mc: &MutationContext<'gc>, obj: &JSObjectDataPtr<'gc>, time_ms: f64) -> bool {
    let mut data = obj.borrow_mut(mc);
    match &mut data.kind {
        ObjectKind::Date { time } => {
            *time = time_clip(time_ms);
            true
        }
        _ => false,
    }
}

/// `date.toISOString()`
pub fn date_to_iso_string(obj: &JSObjectDataPtr<'_>) -> Result<String, JSError> {
    let time = date_time_value(obj).ok_or_else(|| crate::raise_type_error!("this is not a Date object."))?;
    if time.is_nan() {
        return Err(raise_range_error!("Invalid time value"));
    }
    match Utc.timestamp_millis_opt(time as i64).single() {
        Some(dt) => Ok(dt.format("%Y-%m-%dT%H:%M:%S%.3fZ").to_string()),
        None => Err(raise_range_error!("Invalid time value")),
    }
}

fn time_clip(time_ms: f64) -> f64 {
    if !time_ms.is_finite() || time_ms.abs() > MAX_TIME_MS {
        return f64::NAN;
    }
    // +0 for -0
    time_ms.trunc() + 0.0
}

pub(crate) fn parse_date_string(date_str: &str) -> Option<f64> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(date_str) {
        return Some(dt.timestamp_millis() as f64);
    }

    if let Ok(dt) = DateTime::parse_from_rfc2822(date_str) {
        return Some(dt.timestamp_millis() as f64);
    }

    let formats = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S", "%Y/%m/%d %H:%M:%S"];
    for format in &formats {
        if let Ok(dt) = NaiveDateTime::parse_from_str(date_str, format) {
            return Some(Utc.from_utc_datetime(&dt).timestamp_millis() as f64);
        }
    }

    // Date-only forms are UTC midnight.
    for format in &["%Y-%m-%d", "%Y/%m/%d"] {
        if let Ok(date) = NaiveDate::parse_from_str(date_str, format)
            && let Some(dt) = date.and_hms_opt(0, 0, 0)
        {
            return Some(Utc.from_utc_datetime(&dt).timestamp_millis() as f64);
        }
    }

    None
}
