pub mod client;
pub mod error;

pub use client::*;
pub use error::*;

use async_trait::async_trait;

use crate::types::{
    BotCommand, CommandReply, LogBundle, PortfolioSnapshot, SettingsPayload, SignalSet,
    StatusResponse, TradeList,
};

/// The bot's HTTP control surface.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BotApi: Send + Sync {
    async fn get_status(&self) -> ApiResult<StatusResponse>;
    async fn get_portfolio(&self) -> ApiResult<PortfolioSnapshot>;
    async fn get_trades(&self) -> ApiResult<TradeList>;
    async fn get_logs(&self) -> ApiResult<LogBundle>;
    async fn get_signals(&self) -> ApiResult<SignalSet>;
    async fn send_command(&self, command: BotCommand) -> ApiResult<CommandReply>;
    async fn update_settings(&self, payload: SettingsPayload) -> ApiResult<CommandReply>;
}
