use super::ui;
use crate::core::config::{AppConfig, ProvidersConfig};
use crate::core::format::{format_change, format_deviation, format_price, format_ratio};
use crate::core::{Asset, EvaluationResult, Evaluator, PriceProvider, PriceQuote};
use crate::providers::{CoinGeckoProvider, CoinbaseProvider, FallbackProvider};
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use comfy_table::{Cell, CellAlignment};
use serde::Serialize;
use tracing::{info, warn};

/// Interactive power-law chart the panel points to.
pub const WEB_APP_URL: &str = "https://loknlod.github.io/Bitcoin-Power-Law/";

/// Quotes and the valuation derived from them for one run.
#[derive(Debug, Serialize)]
pub struct Snapshot {
    pub asset: Asset,
    pub quote: PriceQuote,
    pub reference_asset: Option<Asset>,
    pub reference_quote: Option<PriceQuote>,
    pub evaluation: EvaluationResult,
}

/// CoinGecko first, then Coinbase, for whichever are configured.
pub fn build_price_chain(providers: &ProvidersConfig, currency: &str) -> FallbackProvider {
    let mut chain: Vec<Box<dyn PriceProvider>> = Vec::new();
    if let Some(coingecko) = &providers.coingecko {
        chain.push(Box::new(CoinGeckoProvider::new(&coingecko.base_url, currency)));
    }
    if let Some(coinbase) = &providers.coinbase {
        chain.push(Box::new(CoinbaseProvider::new(&coinbase.base_url, currency)));
    }
    FallbackProvider::new(chain)
}

/// Fetches the quotes the evaluator needs and evaluates them at `now`.
pub async fn fetch_snapshot(
    config: &AppConfig,
    evaluator: &Evaluator,
    provider: &dyn PriceProvider,
    now: DateTime<Utc>,
) -> Result<Snapshot> {
    let reference_asset = match (&config.assets.reference, evaluator.relations()) {
        (Some(asset), 2) => Some(asset.clone()),
        (None, 2) => {
            warn!("Secondary model configured without a reference asset");
            None
        }
        _ => None,
    };

    let primary_fetch = provider.fetch_price(&config.assets.primary);
    let reference_fetch = async {
        match &reference_asset {
            Some(asset) => provider.fetch_price(asset).await.map(Some),
            None => Ok(None),
        }
    };
    let (quote, reference_quote) = futures::try_join!(primary_fetch, reference_fetch)?;
    info!(price = quote.price, source = %quote.source, "Fetched price");

    let evaluation = evaluator
        .evaluate(
            now,
            quote.price,
            reference_quote.as_ref().map(|q| q.price),
        )
        .context("Failed to evaluate valuation")?;

    Ok(Snapshot {
        asset: config.assets.primary.clone(),
        quote,
        reference_asset,
        reference_quote,
        evaluation,
    })
}

pub fn render_panel(snapshot: &Snapshot, currency: &str) -> String {
    let primary = &snapshot.evaluation.primary;
    let status = primary.status.display();

    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell(&format!("₿ Power Law ({})", snapshot.asset.symbol)),
        Cell::new(status.glyph).set_alignment(CellAlignment::Right),
    ]);

    let mut price_text = format_price(primary.price, currency);
    if let Some(change) = snapshot.quote.change_24h {
        price_text = format!("{price_text}  {}", format_change(change));
    }
    let price_cell = match snapshot.quote.change_24h {
        Some(change) => ui::change_cell(price_text, change),
        None => ui::value_cell(price_text),
    };
    table.add_row(vec![ui::label_cell("Price"), price_cell]);
    table.add_row(vec![
        ui::label_cell("Gauge"),
        Cell::new(ui::gauge_bar(primary.gauge_position, ui::GAUGE_WIDTH)),
    ]);
    table.add_row(vec![
        ui::label_cell("Fair"),
        ui::value_cell(format_price(primary.fair_value, currency)).fg(ui::hex_color("#4da6ff")),
    ]);
    table.add_row(vec![
        ui::label_cell("Deviation"),
        ui::deviation_cell(format_deviation(primary.deviation_pct), primary.deviation_pct),
    ]);
    table.add_row(vec![
        ui::label_cell("Support"),
        ui::value_cell(format_price(primary.support, currency)),
    ]);
    table.add_row(vec![
        ui::label_cell("Resistance"),
        ui::value_cell(format_price(primary.resist, currency)),
    ]);
    table.add_row(vec![
        ui::label_cell("Status"),
        ui::value_cell(status.label.to_string()).fg(ui::hex_color(status.color)),
    ]);

    if let (Some(secondary), Some(reference)) =
        (&snapshot.evaluation.secondary, &snapshot.reference_asset)
    {
        table.add_row(vec![
            ui::label_cell(&format!("In {}", reference.symbol)),
            ui::value_cell(format!(
                "{} (fair {})",
                format_ratio(secondary.cross_rate),
                format_ratio(secondary.fair_value)
            )),
        ]);
        table.add_row(vec![
            ui::label_cell(&format!("{} deviation", reference.symbol)),
            ui::deviation_cell(
                format_deviation(secondary.deviation_pct),
                secondary.deviation_pct,
            ),
        ]);
    }

    let footer = ui::style_text(
        &format!(
            "{} via {} · day {:.0}",
            snapshot.evaluation.evaluated_at.format("%Y-%m-%d %H:%M UTC"),
            snapshot.quote.source,
            snapshot.evaluation.elapsed_days
        ),
        ui::StyleType::Subtle,
    );
    let link = ui::style_text(WEB_APP_URL, ui::StyleType::Link);
    format!("{table}\n{footer}\n{link}")
}

pub async fn run(config: &AppConfig, json: bool) -> Result<()> {
    let evaluator = Evaluator::new(config.model.clone()).context("Invalid model configuration")?;
    let chain = build_price_chain(&config.providers, &config.currency);

    let spinner = (!json).then(|| ui::new_spinner("Fetching prices..."));
    let result = fetch_snapshot(config, &evaluator, &chain, Utc::now()).await;
    if let Some(spinner) = spinner {
        spinner.finish_and_clear();
    }
    let snapshot = result?;

    if json {
        println!("{}", serde_json::to_string_pretty(&snapshot)?);
    } else {
        println!("{}", render_panel(&snapshot, &config.currency));
    }
    Ok(())
}
