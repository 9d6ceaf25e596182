use anyhow::Result;
use chrono::Local;
use crossterm::{
    event::{Event, EventStream, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use futures::StreamExt;
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::mpsc;
use tracing::{debug, info};

use super::{input::map_key, render, Action};
use crate::api::BotApi;
use crate::config::ClientConfig;
use crate::dashboard::{ApplyOutcome, ClientState};
use crate::engine::{
    refresh_feeds, spawn_command, spawn_settings_update, FeedSequencer, Poller, PollerHandle,
    Update, UpdateSender,
};

const FRAME_INTERVAL: Duration = Duration::from_millis(100);

/// Ties the view state to the backend: user actions go out as background
/// requests, their results come back through `updates`.
pub struct App {
    pub state: ClientState,
    api: Arc<dyn BotApi>,
    tx: UpdateSender,
    updates: mpsc::UnboundedReceiver<Update>,
    poller: Option<PollerHandle>,
}

impl App {
    pub fn new(api: Arc<dyn BotApi>, max_toasts: usize) -> Self {
        let (tx, updates) = mpsc::unbounded_channel();
        Self {
            state: ClientState::new(Arc::new(FeedSequencer::new()), max_toasts),
            api,
            tx,
            updates,
            poller: None,
        }
    }

    pub fn start_polling(&mut self, interval: Duration) {
        let poller = Poller::new(
            Arc::clone(&self.api),
            self.state.sequencer(),
            self.tx.clone(),
            interval,
        );
        self.poller = Some(poller.spawn());
    }

    /// Returns `true` when the user asked to quit.
    pub fn handle_action(&mut self, action: Action) -> bool {
        debug!("Action: {:?}", action);
        match action {
            Action::Quit => return true,
            Action::NextSection => self.state.nav.next(),
            Action::PreviousSection => self.state.nav.previous(),
            Action::Goto(section) => self.state.nav.activate(section),
            Action::ToggleBot => {
                let command = self.state.toggle.next_command();
                spawn_command(Arc::clone(&self.api), self.tx.clone(), command);
            }
            Action::Refresh => self.refresh(),
            Action::SelectNextField => self.state.settings.select_next(),
            Action::SelectPreviousField => self.state.settings.select_previous(),
            Action::Adjust(steps) => self.state.settings.adjust_selected(steps),
            Action::SubmitSettings => {
                let payload = self.state.settings.payload();
                spawn_settings_update(Arc::clone(&self.api), self.tx.clone(), payload);
            }
        }
        false
    }

    pub fn apply(&mut self, update: Update) {
        if self.state.apply(update, Instant::now()) == ApplyOutcome::RefreshFeeds {
            refresh_feeds(&self.api, &self.state.sequencer(), &self.tx);
        }
    }

    fn refresh(&self) {
        match &self.poller {
            Some(poller) => poller.refresh(),
            None => refresh_feeds(&self.api, &self.state.sequencer(), &self.tx),
        }
    }

    pub async fn next_update(&mut self) -> Option<Update> {
        self.updates.recv().await
    }

    pub async fn shutdown(&mut self) {
        if let Some(poller) = self.poller.take() {
            poller.stop().await;
        }
    }
}

/// Runs the interactive dashboard until the user quits. `section` is a
/// fragment such as `#trades` or `settings`.
pub async fn run_dashboard(
    cfg: &ClientConfig,
    api: Arc<dyn BotApi>,
    section: Option<&str>,
) -> Result<()> {
    info!("Trader dashboard initialized against {}", cfg.base_url);

    let mut app = App::new(api, cfg.max_toasts);
    if let Some(fragment) = section {
        app.state.nav.activate_fragment(fragment);
    }
    app.start_polling(cfg.poll_interval());

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = event_loop(&mut terminal, &mut app).await;

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    app.shutdown().await;
    res
}

async fn event_loop<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
) -> Result<()> {
    let mut events = EventStream::new();
    let mut frame_tick = tokio::time::interval(FRAME_INTERVAL);

    loop {
        terminal.draw(|f| render::draw(f, &app.state, Local::now(), Instant::now()))?;

        tokio::select! {
            event = events.next() => match event {
                Some(Ok(Event::Key(key))) if key.kind == KeyEventKind::Press => {
                    if let Some(action) = map_key(key, app.state.nav.active()) {
                        if app.handle_action(action) {
                            return Ok(());
                        }
                    }
                }
                Some(Ok(_)) => {}
                Some(Err(e)) => return Err(e.into()),
                None => return Ok(()),
            },
            Some(update) = app.next_update() => app.apply(update),
            _ = frame_tick.tick() => app.state.toasts.prune(Instant::now()),
        }
    }
}
