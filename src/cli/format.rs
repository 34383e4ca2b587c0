//! Text rendering for amounts, dates, and times shown by the shell.

use std::collections::HashMap;

use chrono::{Datelike, NaiveDate, NaiveTime, Weekday};
use once_cell::sync::Lazy;
use tabi_core::BudgetStatus;

use crate::cli::core::CommandError;

/// Currency code to (symbol, minor units).
static CURRENCIES: Lazy<HashMap<&'static str, (&'static str, usize)>> = Lazy::new(|| {
    HashMap::from([
        ("JPY", ("¥", 0)),
        ("KRW", ("₩", 0)),
        ("USD", ("$", 2)),
        ("EUR", ("€", 2)),
        ("GBP", ("£", 2)),
        ("AUD", ("A$", 2)),
        ("TWD", ("NT$", 0)),
    ])
});

/// Formats `amount` in `currency`, for example `¥12,345` or `$1,234.50`.
/// Unknown codes render as `CHF 12.00`.
pub fn format_amount(amount: f64, currency: &str) -> String {
    let code = currency.trim().to_ascii_uppercase();
    let (symbol, precision) = match CURRENCIES.get(code.as_str()) {
        Some((symbol, precision)) => ((*symbol).to_string(), *precision),
        None => (format!("{code} "), 2),
    };
    let body = format!("{:.*}", precision, amount.abs());
    let (int_part, fraction) = match body.split_once('.') {
        Some((int_part, fraction)) => (int_part, Some(fraction)),
        None => (body.as_str(), None),
    };
    let mut rendered = group_digits(int_part);
    if let Some(fraction) = fraction {
        rendered.push('.');
        rendered.push_str(fraction);
    }
    let sign = if amount < 0.0 && rendered.chars().any(|ch| ('1'..='9').contains(&ch)) {
        "-"
    } else {
        ""
    };
    format!("{sign}{symbol}{rendered}")
}

fn group_digits(digits: &str) -> String {
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (index, ch) in digits.chars().enumerate() {
        if index > 0 && (digits.len() - index) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    grouped
}

/// `M/d (Weekday)`; Japanese locales get `水`-style weekday names.
pub fn format_day(date: NaiveDate, locale: &str) -> String {
    format!(
        "{}/{} ({})",
        date.month(),
        date.day(),
        weekday_label(date.weekday(), locale)
    )
}

fn weekday_label(weekday: Weekday, locale: &str) -> &'static str {
    let japanese = locale.to_ascii_lowercase().starts_with("ja");
    match (weekday, japanese) {
        (Weekday::Mon, true) => "月",
        (Weekday::Tue, true) => "火",
        (Weekday::Wed, true) => "水",
        (Weekday::Thu, true) => "木",
        (Weekday::Fri, true) => "金",
        (Weekday::Sat, true) => "土",
        (Weekday::Sun, true) => "日",
        (Weekday::Mon, false) => "Mon",
        (Weekday::Tue, false) => "Tue",
        (Weekday::Wed, false) => "Wed",
        (Weekday::Thu, false) => "Thu",
        (Weekday::Fri, false) => "Fri",
        (Weekday::Sat, false) => "Sat",
        (Weekday::Sun, false) => "Sun",
    }
}

/// `yyyy/MM/dd`.
pub fn format_date(date: NaiveDate) -> String {
    date.format("%Y/%m/%d").to_string()
}

pub fn format_range(start: NaiveDate, end: NaiveDate) -> String {
    format!("{} ~ {}", format_date(start), format_date(end))
}

/// `HH:MM`.
pub fn format_time(time: NaiveTime) -> String {
    time.format("%H:%M").to_string()
}

pub fn format_percent(percent: Option<f64>) -> String {
    match percent {
        Some(value) => format!("{value:.1}%"),
        None => "-".into(),
    }
}

pub fn status_label(status: BudgetStatus) -> &'static str {
    match status {
        BudgetStatus::Unbudgeted => "no budget",
        BudgetStatus::UnderBudget => "under budget",
        BudgetStatus::OnTrack => "on budget",
        BudgetStatus::OverBudget => "over budget",
    }
}

/// Fixed-width usage bar, clamped to full at 100%.
pub fn progress_bar(percent: Option<f64>, width: usize) -> String {
    let ratio = percent.unwrap_or(0.0).clamp(0.0, 100.0) / 100.0;
    let filled = ((ratio * width as f64).round() as usize).min(width);
    format!("[{}{}]", "#".repeat(filled), ".".repeat(width - filled))
}

/// Accepts `2025-04-10` or `2025/04/10`.
pub fn parse_date(value: &str) -> Result<NaiveDate, CommandError> {
    let trimmed = value.trim();
    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(trimmed, "%Y/%m/%d"))
        .map_err(|_| {
            CommandError::InvalidArguments(format!(
                "invalid date `{trimmed}`; expected YYYY-MM-DD"
            ))
        })
}

/// Accepts `9:30` or `09:30`.
pub fn parse_time(value: &str) -> Result<NaiveTime, CommandError> {
    let trimmed = value.trim();
    NaiveTime::parse_from_str(trimmed, "%H:%M").map_err(|_| {
        CommandError::InvalidArguments(format!("invalid time `{trimmed}`; expected HH:MM"))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn yen_has_no_fraction_and_groups_thousands() {
        assert_eq!(format_amount(0.0, "JPY"), "¥0");
        assert_eq!(format_amount(999.0, "JPY"), "¥999");
        assert_eq!(format_amount(12_345.0, "JPY"), "¥12,345");
        assert_eq!(format_amount(1_234_567.4, "JPY"), "¥1,234,567");
        assert_eq!(format_amount(-3_000.0, "JPY"), "-¥3,000");
    }

    #[test]
    fn other_currencies_keep_minor_units() {
        assert_eq!(format_amount(1234.5, "usd"), "$1,234.50");
        assert_eq!(format_amount(12.0, "CHF"), "CHF 12.00");
        assert_eq!(format_amount(-0.001, "USD"), "$0.00");
    }

    #[test]
    fn days_follow_locale() {
        let date = NaiveDate::from_ymd_opt(2025, 5, 7).unwrap();
        assert_eq!(format_day(date, "ja-JP"), "5/7 (水)");
        assert_eq!(format_day(date, "en-US"), "5/7 (Wed)");
    }

    #[test]
    fn parses_dates_and_times() {
        assert_eq!(
            parse_date("2025/04/10").unwrap(),
            NaiveDate::from_ymd_opt(2025, 4, 10).unwrap()
        );
        assert!(parse_date("10.04.2025").is_err());
        assert_eq!(format_time(parse_time("9:05").unwrap()), "09:05");
        assert!(parse_time("25:00").is_err());
    }

    #[test]
    fn progress_bar_clamps() {
        assert_eq!(progress_bar(Some(50.0), 10), "[#####.....]");
        assert_eq!(progress_bar(Some(180.0), 4), "[####]");
        assert_eq!(progress_bar(None, 4), "[....]");
    }
}
