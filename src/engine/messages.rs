use crate::api::ApiResult;
use crate::types::{
    BotCommand, CommandReply, LogBundle, PortfolioSnapshot, SignalSet, StatusResponse, TradeList,
};

use super::Ticket;

/// Result of a background request, handed to the UI task to apply.
#[derive(Debug)]
pub enum Update {
    Status {
        ticket: Ticket,
        initial: bool,
        result: ApiResult<StatusResponse>,
    },
    Portfolio {
        ticket: Ticket,
        result: ApiResult<PortfolioSnapshot>,
    },
    Trades {
        ticket: Ticket,
        result: ApiResult<TradeList>,
    },
    Logs {
        ticket: Ticket,
        result: ApiResult<LogBundle>,
    },
    Signals {
        ticket: Ticket,
        result: ApiResult<SignalSet>,
    },
    Command {
        command: BotCommand,
        result: ApiResult<CommandReply>,
    },
    SettingsSaved {
        result: ApiResult<CommandReply>,
    },
}

impl Update {
    pub fn ticket(&self) -> Option<Ticket> {
        match self {
            Update::Status { ticket, .. }
            | Update::Portfolio { ticket, .. }
            | Update::Trades { ticket, .. }
            | Update::Logs { ticket, .. }
            | Update::Signals { ticket, .. } => Some(*ticket),
            Update::Command { .. } | Update::SettingsSaved { .. } => None,
        }
    }
}
