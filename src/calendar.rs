//! Month-name and day-first date normalization.

use crate::models::CanonicalMonth;
use chrono::{DateTime, NaiveDate, NaiveDateTime};

/// Fold Turkish month text into an accent-, dot- and case-free lookup key.
///
/// `"Şubat"`, `"SUBAT"` and `" şubat "` all become `"SUBAT"`; inner whitespace is
/// dropped so `"AĞUS TOS"` still matches.
pub fn month_key(raw: &str) -> String {
    raw.trim()
        .to_uppercase()
        .chars()
        .filter_map(|c| match c {
            'İ' | 'I' | 'ı' | 'i' => Some('I'),
            'Ö' => Some('O'),
            'Ü' => Some('U'),
            'Ş' => Some('S'),
            'Ğ' => Some('G'),
            'Ç' => Some('C'),
            // combining dot above, left over from lower-case "i̇"
            '\u{0307}' => None,
            c if c.is_whitespace() => None,
            c => Some(c),
        })
        .collect()
}

impl CanonicalMonth {
    /// Look a free-form month name up; `None` when it names no month.
    pub fn from_text(raw: &str) -> Option<Self> {
        let key = month_key(raw);
        CanonicalMonth::ALL
            .iter()
            .copied()
            .find(|m| month_key(m.name()) == key)
    }
}

const DATE_LAYOUTS: [&str; 5] = ["%d.%m.%Y", "%d/%m/%Y", "%d-%m-%Y", "%Y-%m-%d", "%Y/%m/%d"];

const DATETIME_LAYOUTS: [&str; 8] = [
    "%d.%m.%Y %H:%M:%S",
    "%d.%m.%Y %H:%M",
    "%d/%m/%Y %H:%M:%S",
    "%d/%m/%Y %H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
];

/// Parse a date written day first (`01.11.2024`, `1/11/2024`).
///
/// ISO `YYYY-MM-DD` text is unambiguous and accepted as well, with or without a
/// time part. Anything else yields `None`.
pub fn parse_day_first(raw: &str) -> Option<NaiveDate> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }
    for layout in DATE_LAYOUTS {
        if let Ok(d) = NaiveDate::parse_from_str(s, layout) {
            return Some(d);
        }
    }
    for layout in DATETIME_LAYOUTS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, layout) {
            return Some(dt.date());
        }
    }
    DateTime::parse_from_rfc3339(s).ok().map(|dt| dt.date_naive())
}

/// Render a date the way the tables show it: `DD.MM.YYYY`.
pub fn format_date_tr(date: NaiveDate) -> String {
    date.format("%d.%m.%Y").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys_fold_turkish_letters() {
        assert_eq!(month_key("Ağustos"), "AGUSTOS");
        assert_eq!(month_key(" eylül "), "EYLUL");
        assert_eq!(month_key("nisan"), "NISAN");
        assert_eq!(month_key("Haz iran"), "HAZIRAN");
    }

    #[test]
    fn two_digit_day_and_month() {
        assert_eq!(
            parse_day_first("03.02.2024"),
            NaiveDate::from_ymd_opt(2024, 2, 3)
        );
    }
}
