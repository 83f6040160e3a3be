//! Display formatting shared by the CSV and PDF exporters and the summary.

use chrono::NaiveDate;

/// Short date used in CSV files, e.g. `1/5/24`
pub const SHORT_DATE_FORMAT: &str = "%-m/%-d/%y";

/// Placeholder for unset values in reports
pub const EM_DASH: &str = "—";

/// Format an amount as currency with thousands separators, e.g. `$1,234.50`
pub fn format_currency(amount: f64, symbol: &str) -> String {
    let cents = (amount.abs() * 100.0).round() as u64;
    let whole = (cents / 100).to_string();
    let fraction = cents % 100;

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, digit) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    let sign = if amount < 0.0 && cents > 0 { "-" } else { "" };
    format!("{}{}{}.{:02}", sign, symbol, grouped, fraction)
}

/// Two decimal places without symbol or grouping, as written to CSV
pub fn format_amount(amount: f64) -> String {
    format!("{:.2}", amount)
}

pub fn short_date(date: NaiveDate) -> String {
    date.format(SHORT_DATE_FORMAT).to_string()
}

/// e.g. `January 5, 2024`
pub fn long_date(date: NaiveDate) -> String {
    date.format("%B %-d, %Y").to_string()
}

/// e.g. `Jan 2024`
pub fn month_year(date: NaiveDate) -> String {
    date.format("%b %Y").to_string()
}

/// Cut `text` to at most `max_chars` characters, ending in an ellipsis when shortened
pub fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let mut truncated: String = text.chars().take(max_chars.saturating_sub(1)).collect();
    truncated.push('…');
    truncated
}
