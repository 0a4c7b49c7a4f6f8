use crate::format::{format_magnitude, format_percent, format_plain};
use crate::model::{DeltaDirection, KeyStat, PriceSeries, TickerMetadata, ViewModel};

pub const NO_DESCRIPTION: &str = "No description available.";

/// Combine the price series and metadata into one render-ready value.
/// Callers only invoke this with a non-empty series; every optional
/// metadata field is resolved to its default here and nowhere else.
pub fn build_view_model(series: PriceSeries, meta: &TickerMetadata, ticker: &str) -> ViewModel {
    let mut current_price = meta.current_price;
    let mut previous_close = meta.previous_close;

    // Metadata may lack the live price even when history exists: fall
    // back to the last close, and to the second-to-last for the
    // previous close when the series is long enough.
    if current_price.is_none() {
        current_price = series.last_close();
        if series.len() > 1 {
            previous_close = series.prev_close();
        }
    }
    let current_price = current_price.unwrap_or_default();

    let (delta, delta_percent, direction) = match previous_close {
        Some(prev) if prev != 0.0 => {
            let delta = current_price - prev;
            let direction = if delta >= 0.0 {
                DeltaDirection::Up
            } else {
                DeltaDirection::Down
            };
            (delta, delta / prev * 100.0, direction)
        }
        _ => (0.0, 0.0, DeltaDirection::Flat),
    };

    ViewModel {
        display_name: meta.short_name.clone().unwrap_or_else(|| ticker.to_owned()),
        ticker: ticker.to_owned(),
        current_price,
        previous_close,
        delta,
        delta_percent,
        direction,
        currency: meta.currency.clone().unwrap_or_else(|| "USD".to_owned()),
        series,
        key_stats: key_statistics(meta),
        summary: meta
            .long_business_summary
            .clone()
            .unwrap_or_else(|| NO_DESCRIPTION.to_owned()),
    }
}

/// The six fixed statistics, in grid order (rows of four, left to
/// right). Absent fields render as "N/A", never get dropped.
fn key_statistics(meta: &TickerMetadata) -> Vec<KeyStat> {
    vec![
        KeyStat {
            label: "Market Cap",
            value: format_magnitude(meta.market_cap),
        },
        KeyStat {
            label: "P/E Ratio",
            value: format_magnitude(meta.trailing_pe),
        },
        KeyStat {
            label: "Dividend Yield",
            value: format_percent(meta.dividend_yield),
        },
        KeyStat {
            label: "52 Wk High",
            value: format_plain(meta.fifty_two_week_high),
        },
        KeyStat {
            label: "52 Wk Low",
            value: format_plain(meta.fifty_two_week_low),
        },
        KeyStat {
            label: "Volume",
            value: format_magnitude(meta.volume),
        },
    ]
}
