use chrono::{Datelike, NaiveDate, NaiveDateTime};

/// Snapshot date the ratings were published against.
pub const DEFAULT_REFERENCE_YMD: (i32, u32, u32) = (2024, 10, 1);

pub fn default_reference_date() -> NaiveDate {
    let (y, m, d) = DEFAULT_REFERENCE_YMD;
    NaiveDate::from_ymd_opt(y, m, d).unwrap_or(NaiveDate::MIN)
}

/// Whole years between `birth_date` and `reference_date`, `None` only when the birth date is
/// missing. A birth date after the reference date gives a negative age.
pub fn derive_age(birth_date: Option<NaiveDate>, reference_date: NaiveDate) -> Option<i32> {
    let birth = birth_date?;
    let mut age = reference_date.year() - birth.year();
    if (reference_date.month(), reference_date.day()) < (birth.month(), birth.day()) {
        age -= 1;
    }
    Some(age)
}

pub fn parse_birth_date(raw: &str) -> Option<NaiveDate> {
    const DATE_FORMATS: [&str; 4] = ["%Y-%m-%d", "%Y/%m/%d", "%d/%m/%Y", "%d.%m.%Y"];
    const DATETIME_FORMATS: [&str; 2] = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"];

    let cleaned = raw.trim();
    if cleaned.is_empty() {
        return None;
    }
    for fmt in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(cleaned, fmt) {
            return Some(date);
        }
    }
    for fmt in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(cleaned, fmt) {
            return Some(dt.date());
        }
    }
    None
}

pub fn parse_reference_date(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d").ok()
}
