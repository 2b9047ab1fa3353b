//! Arabic / English display formatting for amounts, quantities and dates.

use chrono::{DateTime, Datelike, Utc};
use rust_decimal::Decimal;
use serde::Deserialize;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    #[default]
    En,
    Ar,
}

const EN_MONTHS: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

const AR_MONTHS: [&str; 12] = [
    "يناير",
    "فبراير",
    "مارس",
    "أبريل",
    "مايو",
    "يونيو",
    "يوليو",
    "أغسطس",
    "سبتمبر",
    "أكتوبر",
    "نوفمبر",
    "ديسمبر",
];

const ARABIC_DECIMAL_SEPARATOR: char = '٫';
const ARABIC_GROUP_SEPARATOR: char = '٬';

/// `1234.5` → `1,234.50` / `١٬٢٣٤٫٥٠`
pub fn format_amount(value: Decimal, locale: Locale) -> String {
    let rounded = crate::services::totals::round_money(value);
    localize(&group(&format!("{:.2}", rounded)), locale)
}

/// Like [`format_amount`] but without trailing zeros: `2.50` → `2.5`.
pub fn format_quantity(value: Decimal, locale: Locale) -> String {
    localize(&group(&value.normalize().to_string()), locale)
}

/// `17 October 2026` / `١٧ أكتوبر ٢٠٢٦` (Gregorian calendar).
pub fn format_date(date: DateTime<Utc>, locale: Locale) -> String {
    let month = date.month0() as usize;
    match locale {
        Locale::En => format!("{} {} {}", date.day(), EN_MONTHS[month], date.year()),
        Locale::Ar => to_arabic_digits(&format!(
            "{} {} {}",
            date.day(),
            AR_MONTHS[month],
            date.year()
        )),
    }
}

pub fn currency_label(locale: Locale) -> &'static str {
    match locale {
        Locale::En => "SAR",
        Locale::Ar => "ريال",
    }
}

pub fn to_arabic_digits(text: &str) -> String {
    text.chars()
        .map(|c| match c.to_digit(10) {
            Some(d) if c.is_ascii_digit() => char::from_u32(0x0660 + d).unwrap_or(c),
            _ => c,
        })
        .collect()
}

/// Map Arabic-Indic and extended Arabic-Indic digits to ASCII, the Arabic
/// decimal separator to `.`, and drop Arabic group separators.
pub fn normalize_digits(text: &str) -> String {
    text.chars()
        .filter(|c| *c != ARABIC_GROUP_SEPARATOR)
        .map(|c| match c {
            '\u{0660}'..='\u{0669}' => char::from(b'0' + (c as u32 - 0x0660) as u8),
            '\u{06F0}'..='\u{06F9}' => char::from(b'0' + (c as u32 - 0x06F0) as u8),
            ARABIC_DECIMAL_SEPARATOR => '.',
            _ => c,
        })
        .collect()
}

/// Insert `,` every three digits of the integer part of a plain decimal.
fn group(plain: &str) -> String {
    let (sign, unsigned) = match plain.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", plain),
    };
    let (int_part, frac_part) = match unsigned.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (unsigned, None),
    };

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, c) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }

    match frac_part {
        Some(frac) => format!("{}{}.{}", sign, grouped, frac),
        None => format!("{}{}", sign, grouped),
    }
}

fn localize(grouped: &str, locale: Locale) -> String {
    match locale {
        Locale::En => grouped.to_string(),
        Locale::Ar => to_arabic_digits(
            &grouped
                .chars()
                .map(|c| match c {
                    ',' => ARABIC_GROUP_SEPARATOR,
                    '.' => ARABIC_DECIMAL_SEPARATOR,
                    other => other,
                })
                .collect::<String>(),
        ),
    }
}
