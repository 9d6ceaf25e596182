use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::types::{Settings, SettingsPayload};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldId {
    CheckInterval,
    MaxRiskPerTrade,
    SentimentThreshold,
    RebalanceThreshold,
    VolatilityThreshold,
    MinTradeSize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Slider,
    Number,
}

impl FieldId {
    pub const ALL: [FieldId; 6] = [
        FieldId::CheckInterval,
        FieldId::MaxRiskPerTrade,
        FieldId::SentimentThreshold,
        FieldId::RebalanceThreshold,
        FieldId::VolatilityThreshold,
        FieldId::MinTradeSize,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            FieldId::CheckInterval => "Check interval (s)",
            FieldId::MaxRiskPerTrade => "Max risk per trade",
            FieldId::SentimentThreshold => "Sentiment threshold",
            FieldId::RebalanceThreshold => "Rebalance threshold",
            FieldId::VolatilityThreshold => "Volatility threshold",
            FieldId::MinTradeSize => "Min trade size",
        }
    }

    /// Shown as a percent of the stored fraction.
    pub fn is_percent(&self) -> bool {
        matches!(
            self,
            FieldId::MaxRiskPerTrade | FieldId::RebalanceThreshold | FieldId::VolatilityThreshold
        )
    }

    pub fn kind(&self) -> FieldKind {
        match self {
            FieldId::CheckInterval | FieldId::MinTradeSize => FieldKind::Number,
            _ => FieldKind::Slider,
        }
    }

    /// `(min, max, step)` of the control.
    pub fn range(&self) -> (Decimal, Decimal, Decimal) {
        match self {
            FieldId::CheckInterval => (dec!(60), dec!(3600), dec!(60)),
            FieldId::MaxRiskPerTrade => (dec!(0.5), dec!(10), dec!(0.5)),
            FieldId::SentimentThreshold => (dec!(0), dec!(1), dec!(0.05)),
            FieldId::RebalanceThreshold => (dec!(1), dec!(50), dec!(1)),
            FieldId::VolatilityThreshold => (dec!(0.5), dec!(20), dec!(0.5)),
            FieldId::MinTradeSize => (dec!(1), dec!(1000), dec!(1)),
        }
    }

}

/// Stored fraction as a percent; a value too large to scale is shown as is.
fn percent(fraction: Decimal) -> Decimal {
    fraction.checked_mul(Decimal::ONE_HUNDRED).unwrap_or(fraction)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormField {
    pub id: FieldId,
    value: Decimal,
    output: String,
}

impl FormField {
    fn new(id: FieldId, value: Decimal) -> Self {
        let mut field = Self {
            id,
            value,
            output: String::new(),
        };
        field.sync_output();
        field
    }

    pub fn value(&self) -> Decimal {
        self.value
    }

    /// Text of the output element next to a slider.
    pub fn output_text(&self) -> &str {
        &self.output
    }

    fn set(&mut self, value: Decimal) {
        self.value = value;
        self.sync_output();
    }

    fn sync_output(&mut self) {
        let suffix = if self.id.is_percent() { "%" } else { "" };
        self.output = format!("{}{}", self.value.normalize(), suffix);
    }
}

/// Local copy of the bot settings being edited.
#[derive(Debug, Clone)]
pub struct SettingsForm {
    fields: Vec<FormField>,
    selected: usize,
    dirty: bool,
}

impl SettingsForm {
    pub fn new() -> Self {
        let mut form = Self {
            fields: FieldId::ALL
                .into_iter()
                .map(|id| FormField::new(id, Decimal::ZERO))
                .collect(),
            selected: 0,
            dirty: false,
        };
        form.populate(&Settings::default());
        form
    }

    /// Loads stored settings, scaling fractions up to percent.
    pub fn populate(&mut self, settings: &Settings) {
        let values = [
            Decimal::from(settings.check_interval),
            percent(settings.max_risk_per_trade),
            settings.sentiment_threshold,
            percent(settings.rebalance_threshold),
            percent(settings.volatility_threshold),
            settings.min_trade_size,
        ];
        for (field, value) in self.fields.iter_mut().zip(values) {
            field.set(value.normalize());
        }
        self.dirty = false;
    }

    /// Values exactly as displayed; percent fields stay in percent.
    pub fn payload(&self) -> SettingsPayload {
        SettingsPayload {
            check_interval: self.value(FieldId::CheckInterval).trunc().to_u64().unwrap_or(0),
            max_risk_per_trade: self.value(FieldId::MaxRiskPerTrade),
            sentiment_threshold: self.value(FieldId::SentimentThreshold),
            rebalance_threshold: self.value(FieldId::RebalanceThreshold),
            volatility_threshold: self.value(FieldId::VolatilityThreshold),
            min_trade_size: self.value(FieldId::MinTradeSize),
        }
    }

    pub fn fields(&self) -> &[FormField] {
        &self.fields
    }

    pub fn field(&self, id: FieldId) -> &FormField {
        &self.fields[Self::index(id)]
    }

    pub fn value(&self, id: FieldId) -> Decimal {
        self.field(id).value
    }

    pub fn set_value(&mut self, id: FieldId, value: Decimal) {
        self.fields[Self::index(id)].set(value);
        self.dirty = true;
    }

    /// Moves a field by whole steps, clamped to the control's range.
    pub fn adjust(&mut self, id: FieldId, steps: i32) {
        let (min, max, step) = id.range();
        let current = self.value(id);
        let next = step
            .checked_mul(Decimal::from(steps))
            .and_then(|delta| current.checked_add(delta))
            .unwrap_or(current)
            .clamp(min, max);
        self.set_value(id, next.normalize());
    }

    pub fn adjust_selected(&mut self, steps: i32) {
        self.adjust(self.selected(), steps);
    }

    pub fn selected(&self) -> FieldId {
        self.fields[self.selected].id
    }

    pub fn select_next(&mut self) {
        self.selected = (self.selected + 1) % self.fields.len();
    }

    pub fn select_previous(&mut self) {
        self.selected = (self.selected + self.fields.len() - 1) % self.fields.len();
    }

    /// Edited since the last populate.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn mark_clean(&mut self) {
        self.dirty = false;
    }

    fn index(id: FieldId) -> usize {
        FieldId::ALL
            .iter()
            .position(|f| *f == id)
            .unwrap_or_default()
    }
}

impl Default for SettingsForm {
    fn default() -> Self {
        Self::new()
    }
}
