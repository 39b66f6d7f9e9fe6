//! Release dates written as `15 mars 2020`

use chrono::NaiveDate;

const MONTHS: [&str; 12] = [
    "janvier",
    "février",
    "mars",
    "avril",
    "mai",
    "juin",
    "juillet",
    "août",
    "septembre",
    "octobre",
    "novembre",
    "décembre",
];

/// Parse a French `day month-name year` date
///
/// The day may carry the ordinal suffix used for the first of the month
/// (`1er`). Anything that is not exactly three valid parts is absent.
pub fn parse_release(text: &str) -> Option<NaiveDate> {
    let mut parts = text.split_whitespace();
    let (day, month, year) = (parts.next()?, parts.next()?, parts.next()?);
    if parts.next().is_some() {
        return None;
    }

    let day: u32 = day.trim_end_matches("er").parse().ok()?;
    let month = month_number(month)?;
    let year: i32 = year.parse().ok()?;

    NaiveDate::from_ymd_opt(year, month, day)
}

fn month_number(name: &str) -> Option<u32> {
    let name = name.to_lowercase();
    MONTHS
        .iter()
        .position(|month| *month == name)
        .map(|index| index as u32 + 1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::format_release;

    #[test]
    fn test_parses_french_date() {
        let date = parse_release("15 mars 2020").unwrap();
        assert_eq!(date, NaiveDate::from_ymd_opt(2020, 3, 15).unwrap());
        assert_eq!(format_release(date), "2020-3-15");
    }

    #[test]
    fn test_pads_day_only() {
        let date = parse_release("5 août 1998").unwrap();
        assert_eq!(format_release(date), "1998-8-05");
    }

    #[test]
    fn test_first_of_month() {
        assert_eq!(
            parse_release("1er décembre 2004"),
            NaiveDate::from_ymd_opt(2004, 12, 1)
        );
    }

    #[test]
    fn test_month_case_insensitive() {
        assert_eq!(
            parse_release("31 Mai 1995"),
            NaiveDate::from_ymd_opt(1995, 5, 31)
        );
    }

    #[test]
    fn test_malformed_is_absent() {
        assert_eq!(parse_release(""), None);
        assert_eq!(parse_release("prochainement"), None);
        assert_eq!(parse_release("15 march 2020"), None);
        assert_eq!(parse_release("31 février 2020"), None);
        assert_eq!(parse_release("15 mars"), None);
        assert_eq!(parse_release("15 mars 2020 (France)"), None);
    }
}
