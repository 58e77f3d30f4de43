use super::{events, layout, render, Action, Navigator, Surface, TerminalManager};
use crate::config::Config;
use anyhow::Result;
use crossterm::event::{Event, EventStream, KeyEvent, KeyEventKind};
use futures::StreamExt;
use std::time::Duration;
use tokio::time::{Instant, Interval, MissedTickBehavior};
use tracing::{debug, error, info, warn};

pub struct App<S: Surface = TerminalManager> {
    terminal: S,
    navigator: Navigator,
    refresh: Option<Interval>, // periodic now-playing poll
}

/// Resolves on the next refresh tick, or never when refreshing is disabled
async fn next_refresh(refresh: &mut Option<Interval>) {
    match refresh {
        Some(ticker) => {
            ticker.tick().await;
        }
        None => std::future::pending::<()>().await,
    }
}

impl App<TerminalManager> {
    pub async fn new(config: &Config, mut navigator: Navigator) -> Result<Self> {
        let terminal = TerminalManager::new()?;
        navigator.refresh_now_playing().await;

        let refresh = match config.ui.refresh_interval_secs {
            0 => None,
            secs => {
                let period = Duration::from_secs(secs);
                // First tick after one full period; startup already refreshed
                let mut ticker = interval_after(period);
                ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
                Some(ticker)
            }
        };

        Ok(Self {
            terminal,
            navigator,
            refresh,
        })
    }

    pub async fn run(&mut self) -> Result<()> {
        let mut events = EventStream::new();
        self.render();

        // Single loop: every key, resize and refresh tick is handled here, one at a time
        while self.navigator.is_running() {
            let event = tokio::select! {
                maybe_event = events.next() => match maybe_event {
                    Some(Ok(event)) => event,
                    Some(Err(e)) => {
                        error!("Terminal event stream failed: {}", e);
                        return Err(e.into());
                    }
                    None => break,
                },
                _ = next_refresh(&mut self.refresh) => {
                    self.navigator.refresh_now_playing().await;
                    self.render();
                    continue;
                }
            };

            self.handle_event(event).await;
            self.render();
        }

        info!("Event loop finished");
        Ok(())
    }
}

impl<S: Surface> App<S> {
    async fn handle_event(&mut self, event: Event) {
        match event {
            Event::Key(key) if key.kind == KeyEventKind::Press => self.handle_key(key).await,
            Event::Resize(width, height) => self.recover_from_resize(width, height).await,
            _ => {}
        }
    }

    async fn handle_key(&mut self, key: KeyEvent) {
        let Some(action) = events::key_to_action(self.navigator.mode_kind(), key) else {
            return;
        };

        // Below minimum size nothing is on screen to interact with - only quitting works
        if action != Action::Quit && self.is_too_small() {
            debug!("Ignoring {:?}, terminal too small", action);
            return;
        }

        debug!("{:?} in {:?}", action, self.navigator.mode_kind());
        if let Err(e) = self.navigator.handle(action).await {
            error!("Handling {:?} failed: {:#}", action, e);
            self.navigator.fall_back_to_idle();
        }
    }

    fn is_too_small(&self) -> bool {
        match self.terminal.size() {
            Ok(area) => layout::compute(area).is_err(),
            Err(_) => false,
        }
    }

    /// Full reset, not a resume: the surface is rebuilt and the navigator starts over in Idle
    async fn recover_from_resize(&mut self, width: u16, height: u16) {
        info!("Terminal resized to {}x{}, resetting", width, height);

        if let Err(e) = self.terminal.reinitialize() {
            // Retried on the next resize event
            error!("Terminal reinitialization failed: {:#}", e);
        }
        self.navigator.reset();
        self.navigator.refresh_now_playing().await;
    }

    fn render(&mut self) {
        let navigator = &self.navigator;
        if let Err(e) = self.terminal.draw(|f| render::draw(f, navigator)) {
            warn!("Draw failed: {:#}", e);
            self.navigator.fall_back_to_idle();
        }
    }
}

fn interval_after(period: Duration) -> Interval {
    tokio::time::interval_at(Instant::now() + period, period)
}
