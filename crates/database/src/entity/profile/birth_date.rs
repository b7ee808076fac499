use chrono::{DateTime, Month, NaiveDate, NaiveDateTime};

use crate::{DatabaseError, DatabaseResult};

/// Builds a calendar date from a month name ("February" or "Feb"), a day and a year.
/// Impossible dates such as 30 February are a validation error.
pub fn parse_birth_date(month: &str, day: &str, year: &str) -> DatabaseResult<NaiveDate> {
    let month: Month = month
        .trim()
        .parse()
        .map_err(|_| DatabaseError::validation(format!("unknown month {month:?}")))?;
    let day: u32 = day
        .trim()
        .parse()
        .map_err(|_| DatabaseError::validation(format!("invalid day {day:?}")))?;
    let year: i32 = year
        .trim()
        .parse()
        .map_err(|_| DatabaseError::validation(format!("invalid year {year:?}")))?;

    NaiveDate::from_ymd_opt(year, month.number_from_month(), day).ok_or_else(|| {
        DatabaseError::validation(format!(
            "{} {day}, {year} is not a calendar date",
            month.name()
        ))
    })
}

/// Reads a date stored as text by older releases. Time of day, fractional seconds and
/// offsets are dropped. Anything unreadable yields `None`.
pub fn parse_legacy_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();

    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Some(date);
    }
    if let Ok(stamp) = DateTime::parse_from_rfc3339(raw) {
        return Some(stamp.date_naive());
    }
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f%:z"]
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(raw, format).ok())
        .map(|stamp| stamp.date())
        .or_else(|| {
            DateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S%.f%#z")
                .ok()
                .map(|stamp| stamp.date_naive())
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn month_names_are_accepted_in_full_and_short_form() {
        assert_eq!(
            parse_birth_date("March", "14", "1995").unwrap(),
            NaiveDate::from_ymd_opt(1995, 3, 14).unwrap()
        );
        assert_eq!(
            parse_birth_date("sep", "1", "2000").unwrap(),
            NaiveDate::from_ymd_opt(2000, 9, 1).unwrap()
        );
    }

    #[test]
    fn impossible_dates_are_rejected() {
        assert!(matches!(
            parse_birth_date("February", "30", "2001"),
            Err(DatabaseError::Validation(_))
        ));
        assert!(matches!(
            parse_birth_date("February", "29", "2001"),
            Err(DatabaseError::Validation(_))
        ));
        assert!(parse_birth_date("February", "29", "2000").is_ok());
        assert!(matches!(
            parse_birth_date("Smarch", "1", "2001"),
            Err(DatabaseError::Validation(_))
        ));
        assert!(matches!(
            parse_birth_date("May", "first", "2001"),
            Err(DatabaseError::Validation(_))
        ));
    }

    #[test]
    fn legacy_strings_drop_time_and_zone() {
        let expected = NaiveDate::from_ymd_opt(1990, 7, 4);
        assert_eq!(parse_legacy_date("1990-07-04"), expected);
        assert_eq!(parse_legacy_date("1990-07-04 00:00:00.000"), expected);
        assert_eq!(parse_legacy_date("1990-07-04T10:30:00.123"), expected);
        assert_eq!(parse_legacy_date("1990-07-04T10:30:00+05:30"), expected);
        assert_eq!(parse_legacy_date(" 1990-07-04 "), expected);
    }

    #[test]
    fn unreadable_legacy_strings_degrade_to_none() {
        assert_eq!(parse_legacy_date(""), None);
        assert_eq!(parse_legacy_date("04/07/1990"), None);
        assert_eq!(parse_legacy_date("1990-02-31"), None);
    }
}
