use chrono::{DateTime, Local};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, error, info};

use super::{
    asset_cards, daily_change, format_uptime, format_usd, log_text, signal_cards, top_asset,
    trade_lines, AssetCard, ChartSeries, Navigation, SettingsForm, SignalCard, StatusIndicator,
    ToastLevel, ToastQueue, ToggleControl,
};
use crate::api::ApiError;
use crate::engine::{Feed, FeedSequencer, Update};
use crate::types::{parse_timestamp, PortfolioSnapshot, StatusResponse};

const STATUS_FAILED: &str = "Failed to update bot status. Check the log file for details.";
const INITIAL_STATUS_FAILED: &str = "Failed to get initial bot status. Check the log file for details.";
const DASHBOARD_FAILED: &str = "Failed to update dashboard. Check the log file for details.";
const TRADES_FAILED: &str = "Failed to update trade list. Check the log file for details.";
const LOGS_FAILED: &str = "Failed to update logs. Check the log file for details.";
const SIGNALS_FAILED: &str = "Failed to update trading signals. Check the log file for details.";
const COMMAND_FAILED: &str = "An error occurred. Check the log file for details.";
const SETTINGS_FAILED: &str = "Error reconfiguring trader. Check the log file for details.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummaryCards {
    pub total_value: String,
    pub daily_change: String,
    pub top_asset: String,
}

impl Default for SummaryCards {
    fn default() -> Self {
        Self {
            total_value: "$0.00".to_string(),
            daily_change: "0.00%".to_string(),
            top_asset: "N/A".to_string(),
        }
    }
}

/// What the UI loop should do after applying an update.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApplyOutcome {
    Applied,
    /// An older response than one already requested; ignored.
    Stale,
    /// The bot was just started, so the feeds are worth fetching now.
    RefreshFeeds,
}

/// Everything the dashboard shows. Owned by the UI task and only changed
/// through `apply` and the user-input methods.
#[derive(Debug)]
pub struct ClientState {
    pub indicator: StatusIndicator,
    pub toggle: ToggleControl,
    pub summary: SummaryCards,
    pub assets: Vec<AssetCard>,
    pub chart: ChartSeries,
    pub trades: Vec<String>,
    pub logs: String,
    pub signals: Vec<SignalCard>,
    pub settings: SettingsForm,
    pub nav: Navigation,
    pub toasts: ToastQueue,
    pub last_update: Option<DateTime<Local>>,
    started_at: Option<DateTime<Local>>,
    /// Set once the form holds the bot's stored settings.
    settings_loaded: bool,
    sequencer: Arc<FeedSequencer>,
}

impl ClientState {
    pub fn new(sequencer: Arc<FeedSequencer>, max_toasts: usize) -> Self {
        Self {
            indicator: StatusIndicator::default(),
            toggle: ToggleControl::default(),
            summary: SummaryCards::default(),
            assets: Vec::new(),
            chart: ChartSeries::default(),
            trades: Vec::new(),
            logs: String::new(),
            signals: Vec::new(),
            settings: SettingsForm::new(),
            nav: Navigation::default(),
            toasts: ToastQueue::new(max_toasts),
            last_update: None,
            started_at: None,
            settings_loaded: false,
            sequencer,
        }
    }

    pub fn sequencer(&self) -> Arc<FeedSequencer> {
        Arc::clone(&self.sequencer)
    }

    pub fn uptime(&self, now: DateTime<Local>) -> String {
        format_uptime(self.started_at, now)
    }

    pub fn notify(&mut self, message: impl Into<String>, level: ToastLevel, now: Instant) {
        self.toasts.push(message, level, now);
    }

    pub fn apply(&mut self, update: Update, now: Instant) -> ApplyOutcome {
        if let Some(ticket) = update.ticket() {
            if !self.sequencer.is_current(ticket) {
                debug!("Discarding stale {:?} response #{}", ticket.feed, ticket.seq);
                return ApplyOutcome::Stale;
            }
        }

        let outcome = match update {
            Update::Status { initial, result, .. } => {
                self.apply_status(initial, result, now);
                ApplyOutcome::Applied
            }
            Update::Portfolio { result, .. } => {
                match result {
                    Ok(snapshot) => self.apply_portfolio(&snapshot),
                    Err(e) => self.feed_failed(&e, DASHBOARD_FAILED, now),
                }
                ApplyOutcome::Applied
            }
            Update::Trades { result, .. } => {
                match result {
                    Ok(list) => self.trades = trade_lines(&list.trades),
                    Err(e) => self.feed_failed(&e, TRADES_FAILED, now),
                }
                ApplyOutcome::Applied
            }
            Update::Logs { result, .. } => {
                match result {
                    Ok(bundle) => self.logs = log_text(&bundle),
                    Err(e) => self.feed_failed(&e, LOGS_FAILED, now),
                }
                ApplyOutcome::Applied
            }
            Update::Signals { result, .. } => {
                match result {
                    Ok(signals) => self.signals = signal_cards(&signals),
                    Err(e) => self.feed_failed(&e, SIGNALS_FAILED, now),
                }
                ApplyOutcome::Applied
            }
            Update::Command { command, result } => match result {
                Ok(reply) => {
                    info!("Trader reply to {}: {} ({})", command, reply.message, reply.status);
                    self.notify(reply.message.clone(), ToastLevel::from_status(&reply.status), now);
                    if reply.is_accepted() {
                        self.set_running(command.target_running());
                        // A status poll sent before the command would report
                        // the old state; retire it.
                        self.sequencer.issue(Feed::Status);
                        if command.target_running() {
                            ApplyOutcome::RefreshFeeds
                        } else {
                            ApplyOutcome::Applied
                        }
                    } else {
                        ApplyOutcome::Applied
                    }
                }
                Err(e) => {
                    error!("Trader error: {}", e);
                    self.indicator = StatusIndicator::Error;
                    self.notify(COMMAND_FAILED, ToastLevel::Error, now);
                    ApplyOutcome::Applied
                }
            },
            Update::SettingsSaved { result } => {
                match result {
                    Ok(reply) => {
                        info!("Trader settings updated: {} ({})", reply.message, reply.status);
                        if reply.status == "success" {
                            self.settings.mark_clean();
                        }
                        self.notify(reply.message, ToastLevel::from_status(&reply.status), now);
                    }
                    Err(e) => {
                        error!("Error updating trader settings: {}", e);
                        self.notify(SETTINGS_FAILED, ToastLevel::Error, now);
                    }
                }
                ApplyOutcome::Applied
            }
        };

        self.last_update = Some(Local::now());
        outcome
    }

    fn apply_status(&mut self, initial: bool, result: Result<StatusResponse, ApiError>, now: Instant) {
        match result {
            Ok(status) => {
                self.indicator = StatusIndicator::from_status(&status.status);
                self.toggle.set_running(status.is_running());
                if status.is_running() {
                    if let Some(start) = status.start_time.as_deref().and_then(parse_timestamp) {
                        self.started_at = Some(start);
                    }
                } else {
                    self.started_at = None;
                }
                // The first poll may be retired or superseded, so the form
                // loads from whichever status reply lands first.
                if !self.settings_loaded && !self.settings.is_dirty() {
                    if let Some(settings) = &status.current_settings {
                        self.settings.populate(settings);
                        self.settings_loaded = true;
                    }
                }
            }
            Err(e) => {
                error!("Error getting bot status: {}", e);
                self.indicator = StatusIndicator::Error;
                let message = if initial { INITIAL_STATUS_FAILED } else { STATUS_FAILED };
                self.notify(message, ToastLevel::Error, now);
            }
        }
    }

    fn apply_portfolio(&mut self, snapshot: &PortfolioSnapshot) {
        self.summary = SummaryCards {
            total_value: format_usd(snapshot.total_value),
            daily_change: format!("{}%", daily_change(&snapshot.history)),
            top_asset: top_asset(&snapshot.portfolio).unwrap_or("N/A").to_string(),
        };
        if let Some(start) = snapshot.start_time.as_deref().and_then(parse_timestamp) {
            self.started_at = Some(start);
        }
        self.assets = asset_cards(&snapshot.portfolio);
        self.chart.replace(&snapshot.history);
        debug!(
            "Chart revision {} with {} points",
            self.chart.revision(),
            self.chart.len()
        );
    }

    fn feed_failed(&mut self, err: &ApiError, message: &str, now: Instant) {
        error!("Error updating {}: {}", err.endpoint(), err);
        self.notify(message, ToastLevel::Error, now);
    }

    fn set_running(&mut self, running: bool) {
        self.toggle.set_running(running);
        self.indicator = if running {
            StatusIndicator::Online
        } else {
            StatusIndicator::Offline
        };
        if !running {
            self.started_at = None;
        }
    }
}
