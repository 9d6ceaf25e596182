use indexmap::IndexMap;
use rust_decimal::Decimal;

use super::metrics::{fixed, format_amount};
use crate::types::{AssetSignal, LogBundle, SignalSet, Trade};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetCard {
    pub asset: String,
    pub amount: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignalCard {
    pub asset: String,
    pub sma: &'static str,
    pub rsi: String,
    pub macd: &'static str,
    pub sentiment: String,
}

impl SignalCard {
    pub fn new(asset: &str, signal: &AssetSignal) -> Self {
        Self {
            asset: asset.to_string(),
            sma: trend_label(signal.sma_signal),
            rsi: signal.rsi_signal.clone(),
            macd: trend_label(signal.macd_signal),
            sentiment: sentiment_text(signal.sentiment),
        }
    }

    pub fn lines(&self) -> [String; 4] {
        [
            format!("SMA: {}", self.sma),
            format!("RSI: {}", self.rsi),
            format!("MACD: {}", self.macd),
            format!("Sentiment: {}", self.sentiment),
        ]
    }
}

/// Two decimals, halves rounded away from zero. The exact binary value is
/// kept so 0.125 reads 0.13 but 1.005 (stored just below) reads 1.00.
pub fn sentiment_text(sentiment: f64) -> String {
    match Decimal::from_f64_retain(sentiment) {
        Some(value) => fixed(value, 2),
        None => format!("{:.2}", sentiment),
    }
}

pub fn trend_label(bullish: bool) -> &'static str {
    if bullish {
        "Bullish"
    } else {
        "Bearish"
    }
}

pub fn asset_cards(portfolio: &IndexMap<String, Decimal>) -> Vec<AssetCard> {
    portfolio
        .iter()
        .map(|(asset, amount)| AssetCard {
            asset: asset.clone(),
            amount: format_amount(*amount),
        })
        .collect()
}

/// `<time> - <type> <amount> <pair> @ <price>`
pub fn trade_line(trade: &Trade) -> String {
    format!(
        "{} - {} {} {} @ {}",
        trade.time, trade.side, trade.amount, trade.pair, trade.price
    )
}

pub fn trade_lines(trades: &[Trade]) -> Vec<String> {
    trades.iter().map(trade_line).collect()
}

/// The backend hands over raw file lines, most still ending in `\n`.
pub fn log_text(bundle: &LogBundle) -> String {
    bundle
        .logs
        .iter()
        .map(|line| line.strip_suffix('\n').unwrap_or(line))
        .map(|line| line.strip_suffix('\r').unwrap_or(line))
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn signal_cards(signals: &SignalSet) -> Vec<SignalCard> {
    signals
        .iter()
        .map(|(asset, signal)| SignalCard::new(asset, signal))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Scalar, TradeTime};
    use rust_decimal_macros::dec;

    #[test]
    fn test_sentiment_rounds_halves_away_from_zero() {
        assert_eq!(sentiment_text(0.125), "0.13");
        assert_eq!(sentiment_text(-0.125), "-0.13");
        assert_eq!(sentiment_text(0.5), "0.50");
        assert_eq!(sentiment_text(1.005), "1.00");
        assert_eq!(sentiment_text(f64::NAN), "NaN");

        let signal = AssetSignal {
            sma_signal: true,
            rsi_signal: "Neutral".to_string(),
            macd_signal: false,
            sentiment: 0.125,
        };
        assert_eq!(SignalCard::new("XXBTZUSD", &signal).sentiment, "0.13");
    }

    #[test]
    fn test_trade_line() {
        let trade = Trade {
            time: TradeTime::Text("not a date".to_string()),
            side: "buy".to_string(),
            amount: Scalar::Text("0.25".to_string()),
            pair: "XETHZUSD".to_string(),
            price: Scalar::Text("3000.5".to_string()),
        };
        assert_eq!(trade_line(&trade), "not a date - buy 0.25 XETHZUSD @ 3000.5");
    }

    #[test]
    fn test_trade_lines_keep_order() {
        let body = r#"[
            {"time": "2024-03-01T10:00:00", "pair": "A", "type": "buy", "price": 1, "amount": 1},
            {"time": "2024-03-01T09:00:00", "pair": "B", "type": "sell", "price": 2, "amount": 2}
        ]"#;
        let trades: Vec<Trade> = serde_json::from_str(body).unwrap();
        let lines = trade_lines(&trades);

        assert_eq!(lines[0], "2024-03-01 10:00:00 - buy 1 A @ 1");
        assert_eq!(lines[1], "2024-03-01 09:00:00 - sell 2 B @ 2");
    }

    #[test]
    fn test_log_text_strips_line_endings() {
        let bundle = LogBundle {
            logs: vec![
                "2024-03-01 10:00:00 - INFO - Bot started\n".to_string(),
                "2024-03-01 10:05:00 - ERROR - boom\r\n".to_string(),
                "last".to_string(),
            ],
        };
        assert_eq!(
            log_text(&bundle),
            "2024-03-01 10:00:00 - INFO - Bot started\n2024-03-01 10:05:00 - ERROR - boom\nlast"
        );
        assert_eq!(log_text(&LogBundle { logs: vec![] }), "");
    }

    #[test]
    fn test_signal_card() {
        let card = SignalCard::new(
            "XETH",
            &AssetSignal {
                sma_signal: true,
                rsi_signal: "Overbought".to_string(),
                macd_signal: false,
                sentiment: 0.126,
            },
        );
        assert_eq!(
            card.lines(),
            [
                "SMA: Bullish".to_string(),
                "RSI: Overbought".to_string(),
                "MACD: Bearish".to_string(),
                "Sentiment: 0.13".to_string(),
            ]
        );
    }

    #[test]
    fn test_asset_cards() {
        let mut portfolio = IndexMap::new();
        portfolio.insert("XXBT".to_string(), dec!(0.5));
        portfolio.insert("ZUSD".to_string(), dec!(120.123456789));

        let cards = asset_cards(&portfolio);
        assert_eq!(cards[0].amount, "0.50000000");
        assert_eq!(cards[1].asset, "ZUSD");
        assert_eq!(cards[1].amount, "120.12345679");
    }
}
