//! Turkish number formatting: period groups thousands, comma marks decimals.
//!
//! This is the inverse of US formatting (`1.234.567,89` instead of `1,234,567.89`).
//! Currency amounts get a ` ₺` suffix.

use num_format::{Locale, ToFormattedString};
use serde::{Deserialize, Serialize};

pub const CURRENCY_SUFFIX: &str = " ₺";

/// Display format for one series or axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NumberFormat {
    /// 0 for all-integral data, 2 otherwise.
    pub decimals: usize,
    pub currency: bool,
}

impl NumberFormat {
    /// Pick the format for a whole set of values: one non-integral value forces
    /// two decimals for all of them.
    pub fn for_values<'a, I>(values: I, currency: bool) -> Self
    where
        I: IntoIterator<Item = &'a f64>,
    {
        let decimals = if all_integral(values) { 0 } else { 2 };
        Self { decimals, currency }
    }

    pub fn format(&self, value: f64) -> String {
        let mut s = format_tr(value, self.decimals);
        if self.currency {
            s.push_str(CURRENCY_SUFFIX);
        }
        s
    }

    /// Equivalent D3 format string (`$,.0f`, `,.2f`, …) for spec export.
    pub fn d3(&self) -> String {
        format!(
            "{},.{}f",
            if self.currency { "$" } else { "" },
            self.decimals
        )
    }
}

/// True when every value has a zero fractional part (vacuously true when empty).
pub fn all_integral<'a, I>(values: I) -> bool
where
    I: IntoIterator<Item = &'a f64>,
{
    values.into_iter().all(|v| v.fract() == 0.0)
}

/// Format `value` with `decimals` digits in the Turkish locale.
pub fn format_tr(value: f64, decimals: usize) -> String {
    if !value.is_finite() {
        return value.to_string();
    }
    // Round in f64 text so magnitudes past u64 keep their digits.
    let rounded = format!("{:.*}", decimals, value.abs());
    let (int_digits, frac_digits) = rounded.split_once('.').unwrap_or((&rounded, ""));

    let mut out = String::new();
    if value < 0.0 && rounded.bytes().any(|b| matches!(b, b'1'..=b'9')) {
        out.push('-');
    }
    match int_digits.parse::<u64>() {
        Ok(n) => out.push_str(&n.to_formatted_string(&Locale::tr)),
        Err(_) => out.push_str(&group_digits(int_digits, Locale::tr.separator())),
    }
    if decimals > 0 {
        out.push_str(Locale::tr.decimal());
        out.push_str(frac_digits);
    }
    out
}

fn group_digits(digits: &str, separator: &str) -> String {
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 * separator.len());
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push_str(separator);
        }
        out.push(c);
    }
    out
}
