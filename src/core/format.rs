//! Display formatting for prices, ratios and percentages.

fn currency_prefix(currency: &str) -> String {
    match currency.to_uppercase().as_str() {
        "USD" => "$".to_string(),
        "EUR" => "€".to_string(),
        "GBP" => "£".to_string(),
        other => format!("{other} "),
    }
}

fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    grouped
}

/// Formats a price: millions with two decimals, thousands rounded and
/// grouped, anything smaller with two decimals.
pub fn format_price(price: f64, currency: &str) -> String {
    let prefix = currency_prefix(currency);
    if price >= 1_000_000.0 {
        format!("{prefix}{:.2}M", price / 1_000_000.0)
    } else if price >= 1_000.0 {
        format!("{prefix}{}", group_thousands(price.round() as u64))
    } else {
        format!("{prefix}{price:.2}")
    }
}

pub fn format_deviation(pct: f64) -> String {
    format!("{pct:+.0}%")
}

pub fn format_change(pct: f64) -> String {
    format!("{pct:+.1}% (24h)")
}

pub fn format_ratio(value: f64) -> String {
    format!("{value:.2}")
}
