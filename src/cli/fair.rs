use super::ui;
use crate::core::Evaluator;
use crate::core::config::AppConfig;
use crate::core::format::format_price;
use anyhow::{Context, Result};
use chrono::{DateTime, NaiveDate, Utc};

/// Accepts an RFC 3339 timestamp or a plain `YYYY-MM-DD` date (midnight UTC).
pub fn parse_date(value: &str) -> Result<DateTime<Utc>, String> {
    if let Ok(timestamp) = DateTime::parse_from_rfc3339(value) {
        return Ok(timestamp.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
        .ok_or_else(|| format!("invalid date '{value}', expected YYYY-MM-DD or RFC 3339"))
}

pub fn render_band(evaluator: &Evaluator, at: DateTime<Utc>, currency: &str) -> Result<String> {
    let band = evaluator.model_band(at)?;

    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell("Date"),
        ui::header_cell("Day"),
        ui::header_cell("Support"),
        ui::header_cell("Fair"),
        ui::header_cell("Resistance"),
    ]);
    table.add_row(vec![
        ui::label_cell(&at.format("%Y-%m-%d").to_string()),
        ui::value_cell(format!("{:.0}", band.elapsed_days)),
        ui::value_cell(format_price(band.support, currency)),
        ui::value_cell(format_price(band.fair_value, currency)),
        ui::value_cell(format_price(band.resist, currency)),
    ]);
    Ok(table.to_string())
}

/// Prints the model band at `date`, or now, without fetching any price.
pub fn run(config: &AppConfig, date: Option<DateTime<Utc>>) -> Result<()> {
    let evaluator = Evaluator::new(config.model.clone()).context("Invalid model configuration")?;
    let at = date.unwrap_or_else(Utc::now);
    println!("{}", render_band(&evaluator, at, &config.currency)?);
    Ok(())
}
