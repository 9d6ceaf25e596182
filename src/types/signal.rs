use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Body of `/get_trading_signals`, keyed by asset.
pub type SignalSet = IndexMap<String, AssetSignal>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssetSignal {
    pub sma_signal: bool,
    pub rsi_signal: String,
    pub macd_signal: bool,
    pub sentiment: f64,
}

/// Body of `/get_logs`: raw log file lines, newest last.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogBundle {
    #[serde(default)]
    pub logs: Vec<String>,
}
