use chrono::{DateTime, Local};
use indexmap::IndexMap;
use rust_decimal::{Decimal, RoundingStrategy};

use crate::types::HistoryPoint;

/// Percent change between the oldest and newest history points, two
/// decimals. Fewer than two points, or an oldest value of zero, reads
/// `"0.00"`.
pub fn daily_change(history: &[HistoryPoint]) -> String {
    let (Some(oldest), Some(newest)) = (history.first(), history.last()) else {
        return "0.00".to_string();
    };
    if history.len() < 2 {
        return "0.00".to_string();
    }

    let change = (newest.value - oldest.value)
        .checked_div(oldest.value)
        .and_then(|ratio| ratio.checked_mul(Decimal::ONE_HUNDRED))
        .unwrap_or(Decimal::ZERO);

    fixed(change, 2)
}

/// Asset with the largest amount. On ties the earliest asset wins.
pub fn top_asset(portfolio: &IndexMap<String, Decimal>) -> Option<&str> {
    let mut best: Option<(&String, &Decimal)> = None;
    for (asset, amount) in portfolio {
        match best {
            Some((_, top)) if amount <= top => {}
            _ => best = Some((asset, amount)),
        }
    }
    best.map(|(asset, _)| asset.as_str())
}

/// Elapsed time as `H:MM:SS`; hours are not padded.
pub fn format_uptime(start: Option<DateTime<Local>>, now: DateTime<Local>) -> String {
    let Some(start) = start else {
        return "0:00:00".to_string();
    };

    let total = (now - start).num_seconds().max(0);
    let hours = total / 3600;
    let minutes = (total % 3600) / 60;
    let seconds = total % 60;
    format!("{}:{:02}:{:02}", hours, minutes, seconds)
}

pub fn format_usd(value: Decimal) -> String {
    format!("${}", fixed(value, 2))
}

pub fn format_amount(value: Decimal) -> String {
    fixed(value, 8)
}

/// Fixed-point rendering that rounds half away from zero, like
/// `Number.toFixed`.
pub fn fixed(value: Decimal, dp: u32) -> String {
    let rounded = value.round_dp_with_strategy(dp, RoundingStrategy::MidpointAwayFromZero);
    format!("{:.*}", dp as usize, rounded)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use rust_decimal_macros::dec;

    fn point(value: Decimal) -> HistoryPoint {
        HistoryPoint {
            timestamp: "2024-03-01T10:00:00".to_string(),
            value,
        }
    }

    #[test]
    fn test_daily_change_short_history() {
        assert_eq!(daily_change(&[]), "0.00");
        assert_eq!(daily_change(&[point(dec!(100))]), "0.00");
    }

    #[test]
    fn test_daily_change() {
        assert_eq!(daily_change(&[point(dec!(100)), point(dec!(150))]), "50.00");
        assert_eq!(
            daily_change(&[point(dec!(200)), point(dec!(999)), point(dec!(150))]),
            "-25.00"
        );
        assert_eq!(daily_change(&[point(dec!(3)), point(dec!(4))]), "33.33");
    }

    #[test]
    fn test_daily_change_zero_base() {
        assert_eq!(daily_change(&[point(dec!(0)), point(dec!(150))]), "0.00");
    }

    #[test]
    fn test_daily_change_out_of_range() {
        assert_eq!(daily_change(&[point(dec!(1)), point(Decimal::MAX)]), "0.00");
    }

    #[test]
    fn test_top_asset() {
        let mut portfolio = IndexMap::new();
        portfolio.insert("BTC".to_string(), dec!(0.5));
        portfolio.insert("ETH".to_string(), dec!(10));
        assert_eq!(top_asset(&portfolio), Some("ETH"));
    }

    #[test]
    fn test_top_asset_tie_keeps_first() {
        let mut portfolio = IndexMap::new();
        portfolio.insert("SOL".to_string(), dec!(3));
        portfolio.insert("ADA".to_string(), dec!(7));
        portfolio.insert("DOT".to_string(), dec!(7));
        assert_eq!(top_asset(&portfolio), Some("ADA"));
        assert_eq!(top_asset(&IndexMap::new()), None);
    }

    #[test]
    fn test_format_uptime() {
        let now = Local::now();
        assert_eq!(format_uptime(None, now), "0:00:00");
        assert_eq!(
            format_uptime(Some(now - Duration::seconds(3 * 3600 + 5 * 60 + 9)), now),
            "3:05:09"
        );
        assert_eq!(
            format_uptime(Some(now - Duration::seconds(27 * 3600)), now),
            "27:00:00"
        );
        assert_eq!(format_uptime(Some(now + Duration::seconds(30)), now), "0:00:00");
    }

    #[test]
    fn test_fixed_rounding() {
        assert_eq!(fixed(dec!(1.005), 2), "1.01");
        assert_eq!(fixed(dec!(7), 2), "7.00");
        assert_eq!(format_usd(dec!(15230.126)), "$15230.13");
        assert_eq!(format_amount(dec!(0.5)), "0.50000000");
    }
}
