use serde::{Deserialize, Serialize};
use std::fmt;

use super::TradeTime;

/// Body of `/get_trades`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TradeList {
    #[serde(default)]
    pub trades: Vec<Trade>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trade {
    pub time: TradeTime,
    #[serde(rename = "type")]
    pub side: String,
    pub amount: Scalar,
    pub pair: String,
    pub price: Scalar,
}

/// Exchange fields that arrive either as JSON numbers or as decimal strings.
/// They are shown exactly as received.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Scalar {
    Number(serde_json::Number),
    Text(String),
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::Number(n) => write!(f, "{}", n),
            Scalar::Text(s) => write!(f, "{}", s),
        }
    }
}
