//! Lenient parsing of user supplied dates.

use time::{Date, format_description::BorrowedFormatItem, macros::format_description};

const DATE_FORMAT: &[BorrowedFormatItem] =
    format_description!("[year]-[month padding:zero]-[day padding:zero]");

/// Parse `text` as a `YYYY-MM-DD` date.
///
/// Returns `None` for empty input, input that is not exactly in the
/// `YYYY-MM-DD` form, and dates that do not exist on the calendar (e.g.
/// 2024-02-30). Leading and trailing whitespace is ignored.
pub fn parse_date(text: &str) -> Option<Date> {
    let text = text.trim();

    if !has_date_shape(text) {
        return None;
    }

    Date::parse(text, DATE_FORMAT).ok()
}

/// Checks for four digits, a dash, two digits, a dash and two digits.
fn has_date_shape(text: &str) -> bool {
    let bytes = text.as_bytes();

    bytes.len() == 10
        && bytes.iter().enumerate().all(|(i, byte)| match i {
            4 | 7 => *byte == b'-',
            _ => byte.is_ascii_digit(),
        })
}

#[cfg(test)]
mod tests {
    use time::{Date, Duration, macros::date};

    use super::parse_date;

    #[test]
    fn parses_valid_date() {
        assert_eq!(parse_date("2024-01-31"), Some(date!(2024 - 01 - 31)));
    }

    #[test]
    fn ignores_surrounding_whitespace() {
        assert_eq!(parse_date("  2024-01-31\t"), Some(date!(2024 - 01 - 31)));
    }

    #[test]
    fn leap_day() {
        assert_eq!(parse_date("2024-02-29"), Some(date!(2024 - 02 - 29)));
        assert_eq!(parse_date("2023-02-29"), None);
    }

    #[test]
    fn round_trips_every_day_of_a_year() {
        let mut day = date!(2024 - 01 - 01);

        while day.year() == 2024 {
            assert_eq!(parse_date(&day.to_string()), Some(day), "{day}");
            day += Duration::days(1);
        }
    }

    #[test]
    fn empty_input_is_none() {
        assert_eq!(parse_date(""), None);
        assert_eq!(parse_date("   "), None);
    }

    #[test]
    fn malformed_input_is_none() {
        let cases = [
            "not-a-date",
            "2024-13-01",
            "2024-00-10",
            "2024-04-31",
            "2024-1-5",
            "24-01-05",
            "2024/01/05",
            "05-01-2024",
            "2024-01-05T00:00",
            "+2024-01-05",
            "２０２４-01-05",
        ];

        for case in cases {
            let got: Option<Date> = parse_date(case);
            assert_eq!(got, None, "want None for {case:?}, got {got:?}");
        }
    }
}
