use indexmap::IndexMap;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Body of `/get_portfolio`. Asset order is kept as sent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortfolioSnapshot {
    pub total_value: Decimal,
    #[serde(default)]
    pub portfolio: IndexMap<String, Decimal>,
    #[serde(default)]
    pub history: Vec<HistoryPoint>,
    #[serde(default)]
    pub start_time: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryPoint {
    pub timestamp: String,
    pub value: Decimal,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_portfolio_keeps_asset_order() {
        let body = r#"{
            "portfolio": {"ZUSD": 120.5, "XXBT": 0.5, "XETH": 10},
            "total_value": 15230.12,
            "history": [{"timestamp": "2024-03-01T10:00:00", "value": 15000.0}],
            "start_time": "2024-03-01T09:00:00"
        }"#;
        let snapshot: PortfolioSnapshot = serde_json::from_str(body).unwrap();

        let assets: Vec<&str> = snapshot.portfolio.keys().map(String::as_str).collect();
        assert_eq!(assets, vec!["ZUSD", "XXBT", "XETH"]);
        assert_eq!(snapshot.portfolio["XXBT"], dec!(0.5));
        assert_eq!(snapshot.total_value, dec!(15230.12));
        assert_eq!(snapshot.history.len(), 1);
    }
}
