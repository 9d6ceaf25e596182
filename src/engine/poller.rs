use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, watch, Notify};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, error, info};

use super::{Feed, FeedSequencer, Update};
use crate::api::BotApi;

pub type UpdateSender = mpsc::UnboundedSender<Update>;

/// Periodic status poll. Each tick runs as its own task, so a slow backend
/// never delays the next tick; the sequencer sorts out overlapping replies.
pub struct Poller {
    api: Arc<dyn BotApi>,
    sequencer: Arc<FeedSequencer>,
    tx: UpdateSender,
    interval: Duration,
}

impl Poller {
    pub fn new(
        api: Arc<dyn BotApi>,
        sequencer: Arc<FeedSequencer>,
        tx: UpdateSender,
        interval: Duration,
    ) -> Self {
        Self {
            api,
            sequencer,
            tx,
            interval,
        }
    }

    /// Starts polling; the first cycle runs immediately.
    pub fn spawn(self) -> PollerHandle {
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let refresh = Arc::new(Notify::new());
        let task = tokio::spawn(self.run(shutdown_rx, Arc::clone(&refresh)));

        PollerHandle {
            shutdown: shutdown_tx,
            refresh,
            task: Some(task),
        }
    }

    async fn run(self, mut shutdown: watch::Receiver<bool>, refresh: Arc<Notify>) {
        info!("Polling bot status every {:?}", self.interval);
        let mut ticker = tokio::time::interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let mut initial = true;

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    self.spawn_cycle(initial);
                    initial = false;
                }
                _ = refresh.notified() => {
                    debug!("Manual refresh");
                    self.spawn_cycle(initial);
                    initial = false;
                }
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        break;
                    }
                }
            }
        }

        info!("Status polling stopped");
    }

    fn spawn_cycle(&self, initial: bool) {
        let api = Arc::clone(&self.api);
        let sequencer = Arc::clone(&self.sequencer);
        let tx = self.tx.clone();
        tokio::spawn(async move {
            poll_cycle(api, sequencer, tx, initial).await;
        });
    }
}

/// Owns the polling task; dropping it stops the poll loop.
pub struct PollerHandle {
    shutdown: watch::Sender<bool>,
    refresh: Arc<Notify>,
    task: Option<JoinHandle<()>>,
}

impl PollerHandle {
    /// Runs a cycle now without waiting for the next tick.
    pub fn refresh(&self) {
        self.refresh.notify_one();
    }

    pub fn cancel(&self) {
        let _ = self.shutdown.send(true);
    }

    pub async fn stop(mut self) {
        self.cancel();
        if let Some(task) = self.task.take() {
            if let Err(e) = task.await {
                error!("Poll task ended abnormally: {}", e);
            }
        }
    }
}

impl Drop for PollerHandle {
    fn drop(&mut self) {
        self.cancel();
    }
}

/// Fetches status and, when the bot is running, fans out to every feed.
pub async fn poll_cycle(
    api: Arc<dyn BotApi>,
    sequencer: Arc<FeedSequencer>,
    tx: UpdateSender,
    initial: bool,
) {
    let ticket = sequencer.issue(Feed::Status);
    let result = api.get_status().await;

    let running = matches!(&result, Ok(status) if status.is_running());

    let _ = tx.send(Update::Status {
        ticket,
        initial,
        result,
    });

    if running {
        refresh_feeds(&api, &sequencer, &tx);
    }
}

/// One independent request per feed; a failing feed never holds up the
/// others.
pub fn refresh_feeds(api: &Arc<dyn BotApi>, sequencer: &FeedSequencer, tx: &UpdateSender) {
    for feed in Feed::ALL.into_iter().filter(|f| *f != Feed::Status) {
        let ticket = sequencer.issue(feed);
        let api = Arc::clone(api);
        let tx = tx.clone();

        tokio::spawn(async move {
            let update = match feed {
                Feed::Portfolio => Update::Portfolio {
                    ticket,
                    result: api.get_portfolio().await,
                },
                Feed::Trades => Update::Trades {
                    ticket,
                    result: api.get_trades().await,
                },
                Feed::Logs => Update::Logs {
                    ticket,
                    result: api.get_logs().await,
                },
                Feed::Signals => Update::Signals {
                    ticket,
                    result: api.get_signals().await,
                },
                Feed::Status => return,
            };

            let _ = tx.send(update);
        });
    }
}
