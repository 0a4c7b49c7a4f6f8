use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One daily close observation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    pub ts: DateTime<Utc>,
    pub close: f64,
}

/// Time-ordered closes for one ticker/period request. Ascending by
/// timestamp, no duplicates. Empty means the provider had no data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceSeries {
    pub ticker: String,
    pub points: Vec<PricePoint>,
}

impl PriceSeries {
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn last_close(&self) -> Option<f64> {
        self.points.last().map(|p| p.close)
    }

    /// Close of the second-to-last point, if at least two exist.
    pub fn prev_close(&self) -> Option<f64> {
        match self.points.len() {
            0 | 1 => None,
            n => Some(self.points[n - 2].close),
        }
    }
}

/// Descriptive fields for a ticker. Every field is independently
/// optional; `Default` is the all-absent bundle used when the metadata
/// fetch fails.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TickerMetadata {
    pub short_name: Option<String>,
    pub current_price: Option<f64>,
    pub previous_close: Option<f64>,
    pub currency: Option<String>,
    pub market_cap: Option<f64>,
    pub trailing_pe: Option<f64>,
    pub dividend_yield: Option<f64>,
    pub fifty_two_week_high: Option<f64>,
    pub fifty_two_week_low: Option<f64>,
    pub volume: Option<f64>,
    pub long_business_summary: Option<String>,
}

/// Requested span of history, restricted to the selector choices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Period {
    OneMonth,
    ThreeMonths,
    SixMonths,
    YearToDate,
    #[default]
    OneYear,
    TwoYears,
    FiveYears,
    Max,
}

impl Period {
    pub const ALL: [Period; 8] = [
        Period::OneMonth,
        Period::ThreeMonths,
        Period::SixMonths,
        Period::YearToDate,
        Period::OneYear,
        Period::TwoYears,
        Period::FiveYears,
        Period::Max,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Period::OneMonth => "1M",
            Period::ThreeMonths => "3M",
            Period::SixMonths => "6M",
            Period::YearToDate => "YTD",
            Period::OneYear => "1Y",
            Period::TwoYears => "2Y",
            Period::FiveYears => "5Y",
            Period::Max => "MAX",
        }
    }

    /// The provider's range token for this period.
    pub fn api_token(self) -> &'static str {
        match self {
            Period::OneMonth => "1mo",
            Period::ThreeMonths => "3mo",
            Period::SixMonths => "6mo",
            Period::YearToDate => "ytd",
            Period::OneYear => "1y",
            Period::TwoYears => "2y",
            Period::FiveYears => "5y",
            Period::Max => "max",
        }
    }
}

/// Sign of the session change. A zero delta counts as Up; Flat is
/// reserved for the case where no delta could be computed at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeltaDirection {
    Up,
    Down,
    Flat,
}

impl DeltaDirection {
    /// Prefix for the delta readout. Negative numbers already carry
    /// their own minus sign.
    pub fn sign(self) -> &'static str {
        match self {
            DeltaDirection::Up => "+",
            DeltaDirection::Down | DeltaDirection::Flat => "",
        }
    }
}

/// One labeled cell of the statistics grid.
#[derive(Debug, Clone, PartialEq)]
pub struct KeyStat {
    pub label: &'static str,
    pub value: String,
}

/// Render-ready snapshot assembled once per request cycle and
/// discarded on the next interaction.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewModel {
    pub display_name: String,
    pub ticker: String,
    pub current_price: f64,
    pub previous_close: Option<f64>,
    pub delta: f64,
    pub delta_percent: f64,
    pub direction: DeltaDirection,
    pub currency: String,
    pub series: PriceSeries,
    pub key_stats: Vec<KeyStat>,
    pub summary: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn period_tokens_match_provider_ranges() {
        let expected = ["1mo", "3mo", "6mo", "ytd", "1y", "2y", "5y", "max"];
        for (period, token) in Period::ALL.iter().zip(expected) {
            assert_eq!(period.api_token(), token);
        }
        assert_eq!(Period::default(), Period::OneYear);
    }

    #[test]
    fn prev_close_needs_two_points() {
        let ts = DateTime::from_timestamp(1_700_000_000, 0).expect("valid timestamp");
        let mut series = PriceSeries {
            ticker: "AAPL".into(),
            points: vec![PricePoint { ts, close: 100.0 }],
        };
        assert_eq!(series.last_close(), Some(100.0));
        assert_eq!(series.prev_close(), None);

        series.points.push(PricePoint {
            ts: ts + chrono::Duration::days(1),
            close: 105.0,
        });
        assert_eq!(series.last_close(), Some(105.0));
        assert_eq!(series.prev_close(), Some(100.0));
    }
}
