use serde::{Deserialize, Serialize};
use std::fmt;

use super::Settings;

pub const STATUS_RUNNING: &str = "running";

/// Body of `/get_bot_status`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusResponse {
    pub status: String,
    #[serde(default)]
    pub start_time: Option<String>,
    #[serde(default)]
    pub uptime: Option<f64>,
    #[serde(default)]
    pub current_settings: Option<Settings>,
}

impl StatusResponse {
    pub fn is_running(&self) -> bool {
        self.status == STATUS_RUNNING
    }
}

/// Start/stop request sent by the toggle control.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BotCommand {
    Start,
    Stop,
}

impl BotCommand {
    pub fn path(&self) -> &'static str {
        match self {
            BotCommand::Start => "/start_bot",
            BotCommand::Stop => "/stop_bot",
        }
    }

    /// Running state the bot is in once the command has been accepted.
    pub fn target_running(&self) -> bool {
        matches!(self, BotCommand::Start)
    }
}

impl fmt::Display for BotCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BotCommand::Start => write!(f, "start_bot"),
            BotCommand::Stop => write!(f, "stop_bot"),
        }
    }
}

/// `{status, message}` reply of the command endpoints. The backend sends it
/// with 4xx/5xx codes too.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandReply {
    pub status: String,
    #[serde(default)]
    pub message: String,
}

impl CommandReply {
    /// `success` and `warning` both mean the bot ended up in the requested
    /// state ("already running" is a warning).
    pub fn is_accepted(&self) -> bool {
        matches!(self.status.as_str(), "success" | "warning")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_without_settings() {
        let status: StatusResponse =
            serde_json::from_str(r#"{"status":"stopped","start_time":null,"uptime":null,"current_settings":null}"#)
                .unwrap();
        assert!(!status.is_running());
        assert!(status.current_settings.is_none());
    }

    #[test]
    fn test_status_minimal_body() {
        let status: StatusResponse = serde_json::from_str(r#"{"status":"running"}"#).unwrap();
        assert!(status.is_running());
        assert!(status.start_time.is_none());
    }

    #[test]
    fn test_command_paths() {
        assert_eq!(BotCommand::Start.path(), "/start_bot");
        assert_eq!(BotCommand::Stop.path(), "/stop_bot");
        assert!(BotCommand::Start.target_running());
        assert!(!BotCommand::Stop.target_running());
    }

    #[test]
    fn test_reply_acceptance() {
        let warning = CommandReply {
            status: "warning".to_string(),
            message: "Bot is already running".to_string(),
        };
        assert!(warning.is_accepted());

        let error: CommandReply =
            serde_json::from_str(r#"{"status":"error","message":"Error starting bot: boom"}"#).unwrap();
        assert!(!error.is_accepted());
    }
}
