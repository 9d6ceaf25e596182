use chrono::{DateTime, Local};
use rust_decimal::prelude::ToPrimitive;

use crate::types::{parse_timestamp, HistoryPoint};

/// Portfolio value line. Labels and values are replaced together and stay
/// paired by index.
#[derive(Debug, Clone, Default)]
pub struct ChartSeries {
    labels: Vec<Option<DateTime<Local>>>,
    values: Vec<f64>,
    revision: u64,
}

impl ChartSeries {
    pub fn replace(&mut self, history: &[HistoryPoint]) {
        self.labels = history.iter().map(|p| parse_timestamp(&p.timestamp)).collect();
        self.values = history
            .iter()
            .map(|p| p.value.to_f64().unwrap_or(0.0))
            .collect();
        self.revision += 1;
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    #[cfg(test)]
    pub fn labels(&self) -> &[Option<DateTime<Local>>] {
        &self.labels
    }

    #[cfg(test)]
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Bumped on every replace; the renderer redraws when it moves.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// `(unix seconds, value)` for every point with a readable timestamp.
    pub fn points(&self) -> Vec<(f64, f64)> {
        self.labels
            .iter()
            .zip(&self.values)
            .filter_map(|(label, value)| label.map(|ts| (ts.timestamp() as f64, *value)))
            .collect()
    }

    pub fn time_bounds(&self) -> Option<(DateTime<Local>, DateTime<Local>)> {
        let mut stamps = self.labels.iter().flatten();
        let first = *stamps.next()?;
        let (min, max) = stamps.fold((first, first), |(lo, hi), ts| (lo.min(*ts), hi.max(*ts)));
        Some((min, max))
    }

    pub fn value_bounds(&self) -> Option<(f64, f64)> {
        let mut values = self.values.iter().copied();
        let first = values.next()?;
        Some(values.fold((first, first), |(lo, hi), v| (lo.min(v), hi.max(v))))
    }
}
