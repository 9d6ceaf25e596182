use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

use super::{ApiError, ApiResult, BotApi};
use crate::types::{
    BotCommand, CommandReply, LogBundle, PortfolioSnapshot, SettingsPayload, SignalSet,
    StatusResponse, TradeList,
};

pub const STATUS_PATH: &str = "/get_bot_status";
pub const PORTFOLIO_PATH: &str = "/get_portfolio";
pub const TRADES_PATH: &str = "/get_trades";
pub const LOGS_PATH: &str = "/get_logs";
pub const SIGNALS_PATH: &str = "/get_trading_signals";
pub const SETTINGS_PATH: &str = "/update_settings";

/// Error bodies the backend sends with non-2xx codes.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: Option<String>,
    message: Option<String>,
}

#[derive(Debug, Clone)]
pub struct HttpBotClient {
    client: Client,
    base_url: String,
}

impl HttpBotClient {
    pub fn new(base_url: &str, timeout: Duration) -> ApiResult<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|source| ApiError::Transport { endpoint: "client", source })?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &'static str) -> ApiResult<T> {
        debug!("GET {}", path);
        let resp = self
            .client
            .get(self.url(path))
            .send()
            .await
            .map_err(|source| ApiError::Transport { endpoint: path, source })?;

        let status = resp.status();
        let body = resp
            .bytes()
            .await
            .map_err(|source| ApiError::Transport { endpoint: path, source })?;

        if !status.is_success() {
            return Err(backend_error(path, status, &body));
        }

        serde_json::from_slice(&body).map_err(|source| ApiError::Decode { endpoint: path, source })
    }

    /// Command endpoints answer `{status, message}` whatever the HTTP code, so
    /// the body is decoded first and the code only matters when it isn't a
    /// reply.
    async fn post_command(
        &self,
        path: &'static str,
        payload: Option<&SettingsPayload>,
    ) -> ApiResult<CommandReply> {
        debug!("POST {}", path);
        let request = self.client.post(self.url(path));
        let request = match payload {
            Some(body) => request.json(body),
            None => request.header(reqwest::header::CONTENT_TYPE, "application/json"),
        };

        let resp = request
            .send()
            .await
            .map_err(|source| ApiError::Transport { endpoint: path, source })?;

        let status = resp.status();
        let body = resp
            .bytes()
            .await
            .map_err(|source| ApiError::Transport { endpoint: path, source })?;

        match serde_json::from_slice::<CommandReply>(&body) {
            Ok(reply) => Ok(reply),
            Err(_) if !status.is_success() => Err(backend_error(path, status, &body)),
            Err(source) => Err(ApiError::Decode { endpoint: path, source }),
        }
    }
}

fn backend_error(endpoint: &'static str, status: StatusCode, body: &[u8]) -> ApiError {
    let message = serde_json::from_slice::<ErrorBody>(body)
        .ok()
        .and_then(|b| b.error.or(b.message))
        .unwrap_or_else(|| String::from_utf8_lossy(body).trim().to_string());

    ApiError::Backend {
        endpoint,
        status: status.as_u16(),
        message,
    }
}

#[async_trait]
impl BotApi for HttpBotClient {
    async fn get_status(&self) -> ApiResult<StatusResponse> {
        self.get_json(STATUS_PATH).await
    }

    async fn get_portfolio(&self) -> ApiResult<PortfolioSnapshot> {
        self.get_json(PORTFOLIO_PATH).await
    }

    async fn get_trades(&self) -> ApiResult<TradeList> {
        self.get_json(TRADES_PATH).await
    }

    async fn get_logs(&self) -> ApiResult<LogBundle> {
        self.get_json(LOGS_PATH).await
    }

    async fn get_signals(&self) -> ApiResult<SignalSet> {
        self.get_json(SIGNALS_PATH).await
    }

    async fn send_command(&self, command: BotCommand) -> ApiResult<CommandReply> {
        self.post_command(command.path(), None).await
    }

    async fn update_settings(&self, payload: SettingsPayload) -> ApiResult<CommandReply> {
        self.post_command(SETTINGS_PATH, Some(&payload)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        http::StatusCode as HttpStatus,
        routing::{get, post},
        Json, Router,
    };
    use rust_decimal_macros::dec;
    use serde_json::{json, Value};
    use std::sync::{Arc, Mutex};

    async fn serve(app: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{}", addr)
    }

    fn client(base: &str) -> HttpBotClient {
        HttpBotClient::new(base, Duration::from_secs(5)).unwrap()
    }

    #[tokio::test]
    async fn test_get_status() {
        let app = Router::new().route(
            STATUS_PATH,
            get(|| async { Json(json!({"status": "running", "start_time": "2024-03-01T09:00:00", "uptime": 12.5, "current_settings": null})) }),
        );
        let base = serve(app).await;

        let status = tokio_test::assert_ok!(client(&base).get_status().await);
        assert!(status.is_running());
        assert_eq!(status.uptime, Some(12.5));
    }

    #[tokio::test]
    async fn test_feed_error_body_becomes_backend_error() {
        let app = Router::new().route(
            PORTFOLIO_PATH,
            get(|| async { (HttpStatus::BAD_REQUEST, Json(json!({"error": "Bot is not running"}))) }),
        );
        let base = serve(app).await;

        let err = client(&base).get_portfolio().await.unwrap_err();
        match err {
            ApiError::Backend { endpoint, status, message } => {
                assert_eq!(endpoint, PORTFOLIO_PATH);
                assert_eq!(status, 400);
                assert_eq!(message, "Bot is not running");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn test_non_json_body_is_decode_error() {
        let app = Router::new().route(LOGS_PATH, get(|| async { "<html>oops</html>" }));
        let base = serve(app).await;

        let err = client(&base).get_logs().await.unwrap_err();
        assert!(matches!(err, ApiError::Decode { endpoint: LOGS_PATH, .. }));
    }

    #[tokio::test]
    async fn test_command_reply_decoded_on_server_error() {
        let app = Router::new().route(
            "/start_bot",
            post(|| async {
                (
                    HttpStatus::INTERNAL_SERVER_ERROR,
                    Json(json!({"status": "error", "message": "Error starting bot: no key"})),
                )
            }),
        );
        let base = serve(app).await;

        let reply = tokio_test::assert_ok!(client(&base).send_command(BotCommand::Start).await);
        assert_eq!(reply.status, "error");
        assert_eq!(reply.message, "Error starting bot: no key");
    }

    #[tokio::test]
    async fn test_update_settings_posts_camel_case_body() {
        let seen: Arc<Mutex<Option<Value>>> = Arc::new(Mutex::new(None));
        let sink = Arc::clone(&seen);
        let app = Router::new().route(
            SETTINGS_PATH,
            post(move |Json(body): Json<Value>| {
                let sink = Arc::clone(&sink);
                async move {
                    *sink.lock().unwrap() = Some(body);
                    Json(json!({"status": "success", "message": "Settings updated successfully"}))
                }
            }),
        );
        let base = serve(app).await;

        let payload = SettingsPayload {
            check_interval: 600,
            max_risk_per_trade: dec!(5),
            sentiment_threshold: dec!(0.3),
            rebalance_threshold: dec!(10),
            volatility_threshold: dec!(2.5),
            min_trade_size: dec!(10),
        };
        let reply = client(&base).update_settings(payload).await.unwrap();
        assert!(reply.is_accepted());

        let body = seen.lock().unwrap().clone().unwrap();
        assert_eq!(body["checkInterval"], 600);
        assert_eq!(body["maxRiskPerTrade"], "5");
        assert_eq!(body["volatilityThreshold"], "2.5");
    }

    #[tokio::test]
    async fn test_unreachable_backend_is_transport_error() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let err = client(&format!("http://{}/", addr)).get_trades().await.unwrap_err();
        assert!(matches!(err, ApiError::Transport { endpoint: TRADES_PATH, .. }));
    }
}
