use chrono::{DateTime, Local, NaiveDateTime, TimeZone};
use serde::{Deserialize, Serialize};
use std::fmt;

const NAIVE_FORMATS: [&str; 3] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
];

/// Parses a backend timestamp into local time.
///
/// The bot writes `datetime.now().isoformat()`, which carries no offset, so a
/// naive timestamp is read as local wall-clock time. RFC 3339 strings with an
/// explicit offset are converted.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Local>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts.with_timezone(&Local));
    }

    NAIVE_FORMATS.iter().find_map(|fmt| {
        NaiveDateTime::parse_from_str(raw, fmt)
            .ok()
            .and_then(|naive| Local.from_local_datetime(&naive).earliest())
    })
}

/// Converts fractional unix seconds into local time.
pub fn from_unix_seconds(secs: f64) -> Option<DateTime<Local>> {
    if !secs.is_finite() {
        return None;
    }
    let millis = (secs * 1000.0).round() as i64;
    Local.timestamp_millis_opt(millis).single()
}

/// Trade time as sent by the backend: exchange trade history reports unix
/// seconds, other sources send date strings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TradeTime {
    Seconds(f64),
    Text(String),
}

impl TradeTime {
    pub fn to_local(&self) -> Option<DateTime<Local>> {
        match self {
            TradeTime::Seconds(secs) => from_unix_seconds(*secs),
            TradeTime::Text(text) => parse_timestamp(text).or_else(|| {
                text.trim().parse::<f64>().ok().and_then(from_unix_seconds)
            }),
        }
    }
}

impl fmt::Display for TradeTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.to_local() {
            Some(ts) => write!(f, "{}", ts.format("%Y-%m-%d %H:%M:%S")),
            None => match self {
                TradeTime::Seconds(secs) => write!(f, "{}", secs),
                TradeTime::Text(text) => write!(f, "{}", text),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};

    #[test]
    fn test_naive_timestamp_is_local() {
        let ts = parse_timestamp("2024-03-01T10:15:30.123456").unwrap();
        assert_eq!(ts.hour(), 10);
        assert_eq!(ts.minute(), 15);
        assert_eq!(ts.day(), 1);
    }

    #[test]
    fn test_rfc3339_timestamp() {
        let ts = parse_timestamp("2024-03-01T10:15:30Z").unwrap();
        assert_eq!(ts.timestamp(), 1709288130);
    }

    #[test]
    fn test_garbage_timestamp() {
        assert!(parse_timestamp("").is_none());
        assert!(parse_timestamp("yesterday").is_none());
    }

    #[test]
    fn test_trade_time_from_seconds() {
        let time: TradeTime = serde_json::from_str("1709288130.5").unwrap();
        assert_eq!(time.to_local().unwrap().timestamp(), 1709288130);

        let text: TradeTime = serde_json::from_str("\"1709288130\"").unwrap();
        assert_eq!(text.to_local().unwrap().timestamp(), 1709288130);
    }

    #[test]
    fn test_unparseable_trade_time_renders_raw() {
        let time = TradeTime::Text("n/a".to_string());
        assert_eq!(time.to_string(), "n/a");
    }
}
