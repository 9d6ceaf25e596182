use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

/// Bot settings as the backend stores them. Risk, rebalance and volatility
/// thresholds are fractions (0.02 means 2%).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    pub check_interval: u64,
    pub max_risk_per_trade: Decimal,
    pub sentiment_threshold: Decimal,
    pub rebalance_threshold: Decimal,
    pub volatility_threshold: Decimal,
    pub min_trade_size: Decimal,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            check_interval: 300,
            max_risk_per_trade: dec!(0.02),
            sentiment_threshold: dec!(0.2),
            rebalance_threshold: dec!(0.1),
            volatility_threshold: dec!(0.02),
            min_trade_size: dec!(5),
        }
    }
}

/// Body of `/update_settings`. Percent fields carry the displayed percent
/// value; the backend divides them by 100.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SettingsPayload {
    pub check_interval: u64,
    pub max_risk_per_trade: Decimal,
    pub sentiment_threshold: Decimal,
    pub rebalance_threshold: Decimal,
    pub volatility_threshold: Decimal,
    pub min_trade_size: Decimal,
}
