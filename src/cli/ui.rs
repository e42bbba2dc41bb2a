use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

/// Width of the rendered gauge in characters.
pub const GAUGE_WIDTH: usize = 28;

/// Defines different styles for text elements.
pub enum StyleType {
    Subtle,
    Link,
}

/// Applies a consistent style to a string.
pub fn style_text(text: &str, style_type: StyleType) -> String {
    let styled = match style_type {
        StyleType::Subtle => style(text).dim(),
        StyleType::Link => style(text).cyan().underlined(),
    };
    styled.to_string()
}

/// Creates a new `comfy_table::Table` with standard styling.
pub fn new_styled_table() -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table
}

/// Creates a styled header cell for a table.
pub fn header_cell(text: &str) -> Cell {
    Cell::new(text)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

pub fn label_cell(text: &str) -> Cell {
    Cell::new(text).fg(Color::DarkGrey)
}

pub fn value_cell(text: String) -> Cell {
    Cell::new(text)
        .add_attribute(Attribute::Bold)
        .set_alignment(CellAlignment::Right)
}

/// Parses a `#rrggbb` color into a table color, white if malformed.
pub fn hex_color(hex: &str) -> Color {
    let parse = |range: std::ops::Range<usize>| {
        hex.trim_start_matches('#')
            .get(range)
            .and_then(|h| u8::from_str_radix(h, 16).ok())
    };
    match (parse(0..2), parse(2..4), parse(4..6)) {
        (Some(r), Some(g), Some(b)) => Color::Rgb { r, g, b },
        _ => Color::White,
    }
}

/// Green when the market is up.
pub fn change_cell(text: String, change: f64) -> Cell {
    let color = if change >= 0.0 {
        Color::Green
    } else {
        Color::Red
    };
    Cell::new(text).fg(color).set_alignment(CellAlignment::Right)
}

/// Red when trading above the model, green below it.
pub fn deviation_cell(text: String, deviation: f64) -> Cell {
    let color = if deviation >= 0.0 {
        Color::Red
    } else {
        Color::Green
    };
    Cell::new(text)
        .fg(color)
        .add_attribute(Attribute::Bold)
        .set_alignment(CellAlignment::Right)
}

/// Segment widths of the gauge and the index of the marker.
#[derive(Debug, PartialEq, Eq)]
pub struct GaugeLayout {
    pub green: usize,
    pub blue: usize,
    pub red: usize,
    pub marker: usize,
}

pub fn gauge_layout(position: f64, width: usize) -> GaugeLayout {
    let green = (width as f64 * 0.33).round() as usize;
    let blue = (width as f64 * 0.34).round() as usize;
    let red = width.saturating_sub(green + blue);
    let marker = (position.clamp(0.0, 1.0) * (width.saturating_sub(1)) as f64).round() as usize;
    GaugeLayout {
        green,
        blue,
        red,
        marker,
    }
}

/// Renders the gauge as a colored bar with a marker at `position`.
pub fn gauge_bar(position: f64, width: usize) -> String {
    let layout = gauge_layout(position, width);
    (0..width)
        .map(|i| {
            if i == layout.marker {
                return style("●").white().bold().to_string();
            }
            let segment = style("━");
            if i < layout.green {
                segment.green().to_string()
            } else if i < layout.green + layout.blue {
                segment.blue().to_string()
            } else {
                segment.red().to_string()
            }
        })
        .collect()
}

/// Creates a spinner shown while quotes are fetched.
pub fn new_spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    if let Ok(spinner_style) = ProgressStyle::default_spinner().template("{spinner:.green} {msg}") {
        pb.set_style(spinner_style);
    }
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}
