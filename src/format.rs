/// "N/A" for absent values; otherwise two decimals with a
/// trillions/billions/millions suffix where the magnitude warrants one.
pub fn format_magnitude(value: Option<f64>) -> String {
    let Some(value) = value else {
        return "N/A".to_owned();
    };

    if value >= 1e12 {
        format!("{:.2}T", value / 1e12)
    } else if value >= 1e9 {
        format!("{:.2}B", value / 1e9)
    } else if value >= 1e6 {
        format!("{:.2}M", value / 1e6)
    } else {
        format!("{value:.2}")
    }
}

/// Ratio (0.015 = 1.5%) to a percentage readout, "N/A" when absent.
pub fn format_percent(ratio: Option<f64>) -> String {
    match ratio {
        Some(ratio) => format!("{:.2}%", ratio * 100.0),
        None => "N/A".to_owned(),
    }
}

/// Plain two-decimal number, "N/A" when absent.
pub fn format_plain(value: Option<f64>) -> String {
    match value {
        Some(value) => format!("{value:.2}"),
        None => "N/A".to_owned(),
    }
}

/// Header price: two decimals with comma-grouped thousands.
pub fn format_price(value: f64) -> String {
    let unsigned = format!("{:.2}", value.abs());
    let (int_part, frac_part) = unsigned.split_once('.').unwrap_or((unsigned.as_str(), "00"));

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let sign = if value < 0.0 { "-" } else { "" };
    format!("{sign}{grouped}.{frac_part}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn magnitude_suffix_ladder() {
        assert_eq!(format_magnitude(None), "N/A");
        assert_eq!(format_magnitude(Some(3_120_000_000_000.0)), "3.12T");
        assert_eq!(format_magnitude(Some(2_500_000_000.0)), "2.50B");
        assert_eq!(format_magnitude(Some(12_300_000.0)), "12.30M");
        assert_eq!(format_magnitude(Some(999.0)), "999.00");
        assert_eq!(format_magnitude(Some(-5.0)), "-5.00");
        assert_eq!(format_magnitude(Some(0.0)), "0.00");
    }

    #[test]
    fn percent_from_ratio() {
        assert_eq!(format_percent(None), "N/A");
        assert_eq!(format_percent(Some(0.0123)), "1.23%");
        assert_eq!(format_percent(Some(0.0)), "0.00%");
    }

    #[test]
    fn plain_two_decimals() {
        assert_eq!(format_plain(None), "N/A");
        assert_eq!(format_plain(Some(237.229)), "237.23");
    }

    #[test]
    fn price_groups_thousands() {
        assert_eq!(format_price(1234567.891), "1,234,567.89");
        assert_eq!(format_price(987.6), "987.60");
        assert_eq!(format_price(-1234.5), "-1,234.50");
        assert_eq!(format_price(0.0), "0.00");
    }
}
