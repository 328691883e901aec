//! Inline SVG candlestick and volume chart.

use std::fmt::{self, Write as _};

use crate::domain::date_range::DATE_FORMAT;
use crate::domain::ohlcv::PriceBar;

pub const INCREASING_COLOR: &str = "rgba(0,128,0,0.7)";
pub const DECREASING_COLOR: &str = "rgba(255,0,0,0.7)";
pub const VOLUME_COLOR: &str = "rgba(37,99,235,0.45)";
pub const EMPTY_CHART: &str = "No price data available.";

const WIDTH: f64 = 900.0;
const HEIGHT: f64 = 420.0;
const PAD_LEFT: f64 = 64.0;
const PAD_RIGHT: f64 = 16.0;
const PAD_TOP: f64 = 28.0;
const PAD_BOTTOM: f64 = 36.0;
const PANE_GAP: f64 = 12.0;
/// Share of the plot height given to the price pane.
const PRICE_SHARE: f64 = 0.72;

fn drawable(bar: &PriceBar) -> bool {
    [bar.open, bar.high, bar.low, bar.close, bar.volume]
        .iter()
        .all(|v| v.is_finite())
}

/// Candles in the upper pane, volume bars in the lower one. `None` when no
/// bar has finite values to draw.
pub fn candlestick_svg(bars: &[PriceBar]) -> Option<String> {
    let bars: Vec<&PriceBar> = bars.iter().filter(|b| drawable(b)).collect();
    if bars.is_empty() {
        return None;
    }
    let mut svg = String::new();
    draw(&bars, &mut svg).ok()?;
    Some(svg)
}

/// Standalone svg carrying the [`EMPTY_CHART`] message.
pub fn placeholder_svg() -> String {
    format!(
        r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 400 40"><text x="8" y="24">{EMPTY_CHART}</text></svg>"#
    )
}

fn draw(bars: &[&PriceBar], svg: &mut String) -> fmt::Result {
    let plot_width = WIDTH - PAD_LEFT - PAD_RIGHT;
    let plot_height = HEIGHT - PAD_TOP - PAD_BOTTOM - PANE_GAP;
    let price_height = plot_height * PRICE_SHARE;
    let volume_height = plot_height - price_height;
    let volume_top = PAD_TOP + price_height + PANE_GAP;

    let min_price = bars
        .iter()
        .map(|b| b.low.min(b.open).min(b.close))
        .fold(f64::INFINITY, f64::min);
    let max_price = bars
        .iter()
        .map(|b| b.high.max(b.open).max(b.close))
        .fold(f64::NEG_INFINITY, f64::max);
    let max_volume = bars.iter().map(|b| b.volume).fold(0.0, f64::max);

    let range = max_price - min_price;
    let price_y = |p: f64| {
        if range > 0.0 {
            PAD_TOP + (max_price - p) / range * price_height
        } else {
            PAD_TOP + price_height / 2.0
        }
    };

    let slot = plot_width / bars.len() as f64;
    let body_width = (slot * 0.6).max(1.0);

    write!(
        svg,
        r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 {WIDTH:.0} {HEIGHT:.0}" width="100%" role="img" aria-label="Price history and volume">"#
    )?;
    write!(
        svg,
        r#"<text x="{:.1}" y="18" font-size="14" font-weight="600">Price History and Volume</text>"#,
        PAD_LEFT
    )?;

    // axes
    write!(
        svg,
        "<line x1=\"{l:.1}\" y1=\"{t:.1}\" x2=\"{l:.1}\" y2=\"{b:.1}\" stroke=\"#9ca3af\"/>",
        l = PAD_LEFT,
        t = PAD_TOP,
        b = HEIGHT - PAD_BOTTOM,
    )?;
    write!(
        svg,
        "<line x1=\"{l:.1}\" y1=\"{y:.1}\" x2=\"{r:.1}\" y2=\"{y:.1}\" stroke=\"#9ca3af\"/>",
        l = PAD_LEFT,
        r = WIDTH - PAD_RIGHT,
        y = HEIGHT - PAD_BOTTOM,
    )?;
    write!(
        svg,
        r#"<text x="{:.1}" y="{:.1}" font-size="11" text-anchor="end">{:.2}</text>"#,
        PAD_LEFT - 6.0,
        PAD_TOP + 4.0,
        max_price
    )?;
    write!(
        svg,
        r#"<text x="{:.1}" y="{:.1}" font-size="11" text-anchor="end">{:.2}</text>"#,
        PAD_LEFT - 6.0,
        PAD_TOP + price_height,
        min_price
    )?;

    for (i, bar) in bars.iter().enumerate() {
        let cx = PAD_LEFT + slot * (i as f64 + 0.5);
        let color = if bar.is_up() {
            INCREASING_COLOR
        } else {
            DECREASING_COLOR
        };

        let body_top = price_y(bar.open.max(bar.close));
        let body_bottom = price_y(bar.open.min(bar.close));
        let wick_top = price_y(bar.high).min(body_top);
        let wick_bottom = price_y(bar.low).max(body_bottom);

        write!(
            svg,
            r#"<g class="candle"><title>{date} O {o:.2} H {h:.2} L {l:.2} C {c:.2} V {v:.0}</title>"#,
            date = bar.date.format(DATE_FORMAT),
            o = bar.open,
            h = bar.high,
            l = bar.low,
            c = bar.close,
            v = bar.volume,
        )?;
        write!(
            svg,
            r#"<line x1="{cx:.1}" y1="{wick_top:.1}" x2="{cx:.1}" y2="{wick_bottom:.1}" stroke="{color}"/>"#
        )?;
        write!(
            svg,
            r#"<rect x="{:.1}" y="{:.1}" width="{:.1}" height="{:.1}" fill="{color}"/></g>"#,
            cx - body_width / 2.0,
            body_top,
            body_width,
            (body_bottom - body_top).max(1.0),
        )?;

        if max_volume > 0.0 {
            let h = bar.volume / max_volume * volume_height;
            write!(
                svg,
                r#"<rect class="volume" x="{:.1}" y="{:.1}" width="{:.1}" height="{:.1}" fill="{VOLUME_COLOR}"/>"#,
                cx - body_width / 2.0,
                volume_top + volume_height - h,
                body_width,
                h,
            )?;
        }
    }

    let first = bars[0].date.format(DATE_FORMAT);
    let last = bars[bars.len() - 1].date.format(DATE_FORMAT);
    write!(
        svg,
        r#"<text x="{:.1}" y="{:.1}" font-size="11">{first}</text>"#,
        PAD_LEFT,
        HEIGHT - PAD_BOTTOM + 16.0
    )?;
    write!(
        svg,
        r#"<text x="{:.1}" y="{:.1}" font-size="11" text-anchor="end">{last}</text>"#,
        WIDTH - PAD_RIGHT,
        HEIGHT - PAD_BOTTOM + 16.0
    )?;
    write!(
        svg,
        r#"<text x="{:.1}" y="{:.1}" font-size="11" text-anchor="middle">Date</text>"#,
        PAD_LEFT + plot_width / 2.0,
        HEIGHT - 6.0
    )?;
    svg.push_str("</svg>");
    Ok(())
}
