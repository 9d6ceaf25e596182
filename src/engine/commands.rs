use std::sync::Arc;
use tracing::info;

use super::{Update, UpdateSender};
use crate::api::BotApi;
use crate::types::{BotCommand, SettingsPayload};

/// Sends a start/stop request in the background; the reply comes back as
/// `Update::Command`.
pub fn spawn_command(api: Arc<dyn BotApi>, tx: UpdateSender, command: BotCommand) {
    info!("Trader action: {}", command);
    tokio::spawn(async move {
        let result = api.send_command(command).await;
        let _ = tx.send(Update::Command { command, result });
    });
}

pub fn spawn_settings_update(api: Arc<dyn BotApi>, tx: UpdateSender, payload: SettingsPayload) {
    info!(
        "Submitting settings: check_interval={}s, max_risk_per_trade={}%",
        payload.check_interval, payload.max_risk_per_trade
    );
    tokio::spawn(async move {
        let result = api.update_settings(payload).await;
        let _ = tx.send(Update::SettingsSaved { result });
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::MockBotApi;
    use crate::types::CommandReply;
    use mockall::predicate::eq;
    use tokio::sync::mpsc;

    #[tokio::test]
    async fn test_command_reply_is_forwarded() {
        let mut api = MockBotApi::new();
        api.expect_send_command()
            .with(eq(BotCommand::Stop))
            .times(1)
            .returning(|_| {
                Ok(CommandReply {
                    status: "success".to_string(),
                    message: "Bot stopped successfully".to_string(),
                })
            });

        let (tx, mut rx) = mpsc::unbounded_channel();
        spawn_command(Arc::new(api), tx, BotCommand::Stop);

        match rx.recv().await {
            Some(Update::Command { command, result }) => {
                assert_eq!(command, BotCommand::Stop);
                assert_eq!(result.unwrap().message, "Bot stopped successfully");
            }
            other => panic!("unexpected update: {:?}", other),
        }
    }
}
