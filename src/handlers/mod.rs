use crate::config::Config;
use crate::db::Preferences;
use crate::error::Result;
use crate::leaderboard::{Leaderboard, RefreshOutcome};
use crate::models::{RefreshInterval, Theme};
use crate::tasks::auto_refresh::AutoRefresh;
use crate::tasks::debounce::Debouncer;
use crate::view::{self, ViewState};
use log::{debug, error, info, warn};
use std::fmt;
use std::ops::ControlFlow;
use std::sync::Arc;
use tokio::sync::mpsc::UnboundedSender;

pub const HELP: &str = "\
Commands:
  search <text>     filter by name, email or rank (empty clears)
  completed         toggle completed-only
  top               toggle the top-3 podium
  refresh           reload the CSV now
  interval <off|15|30|60|300>
  theme             toggle light/dark
  export            print visible rows as JSON
  help, quit";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Search(String),
    ToggleCompleted,
    ToggleTop,
    Refresh,
    Interval(RefreshInterval),
    ToggleTheme,
    Export,
    Help,
    Quit,
}

pub fn parse_command(line: &str) -> std::result::Result<Command, String> {
    let line = line.trim_start();
    let (name, rest) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
    match name.to_lowercase().as_str() {
        "search" | "s" | "/" => Ok(Command::Search(rest.to_string())),
        "completed" | "c" => Ok(Command::ToggleCompleted),
        "top" => Ok(Command::ToggleTop),
        "refresh" | "r" => Ok(Command::Refresh),
        "interval" => parse_interval(rest.trim()).map(Command::Interval),
        "theme" => Ok(Command::ToggleTheme),
        "export" => Ok(Command::Export),
        "help" | "?" | "" => Ok(Command::Help),
        "quit" | "exit" | "q" => Ok(Command::Quit),
        other => Err(format!("Unknown command `{}`. Type `help` for a list.", other)),
    }
}

fn parse_interval(value: &str) -> std::result::Result<RefreshInterval, String> {
    let secs = match value.to_lowercase().as_str() {
        "off" => Some(0),
        "1m" => Some(60),
        "5m" => Some(300),
        other => other.trim_end_matches('s').parse::<u64>().ok(),
    };
    secs.and_then(RefreshInterval::from_secs)
        .ok_or_else(|| format!("Interval must be one of off, 15, 30, 60, 300 (got `{}`)", value))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trigger {
    Startup,
    Manual,
    Timer,
}

impl fmt::Display for Trigger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Trigger::Startup => write!(f, "startup"),
            Trigger::Manual => write!(f, "manual"),
            Trigger::Timer => write!(f, "timer"),
        }
    }
}

#[derive(Debug)]
pub enum AppEvent {
    Input(String),
    InputClosed,
    QuerySettled(String),
    RefreshRequested(Trigger),
    Loaded(Trigger, Result<RefreshOutcome>),
}

/// State of the interactive session. Every event is handled on the caller's
/// loop; only CSV loads and timers run as separate tasks.
pub struct Console {
    board: Arc<Leaderboard>,
    prefs: Option<Preferences>,
    state: ViewState,
    auto_refresh: AutoRefresh,
    search: Debouncer<String>,
    events: UnboundedSender<AppEvent>,
}

impl Console {
    pub fn new(
        board: Arc<Leaderboard>,
        prefs: Option<Preferences>,
        theme: Theme,
        config: &Config,
        events: UnboundedSender<AppEvent>,
    ) -> Self {
        let settled = events.clone();
        let search = Debouncer::spawn(config.search_debounce, move |query: String| {
            let _ = settled.send(AppEvent::QuerySettled(query));
        });
        Self {
            board,
            prefs,
            state: ViewState::new(theme, RefreshInterval::Off),
            auto_refresh: AutoRefresh::new(),
            search,
            events,
        }
    }

    pub fn start(&mut self, interval: RefreshInterval) {
        self.request_refresh(Trigger::Startup);
        self.set_interval(interval);
    }

    pub async fn handle(&mut self, event: AppEvent) -> ControlFlow<()> {
        match event {
            AppEvent::Input(line) => match parse_command(&line) {
                Ok(command) => return self.handle_command(command).await,
                Err(message) => println!("{}", message),
            },
            AppEvent::InputClosed => {
                // Headless runs keep refreshing on the timer.
                if self.state.refresh_interval == RefreshInterval::Off {
                    return ControlFlow::Break(());
                }
                info!("Input closed; continuing with auto-refresh every {}", self.state.refresh_interval);
            }
            AppEvent::QuerySettled(query) => {
                self.state.query = query;
                self.render();
            }
            AppEvent::RefreshRequested(trigger) => self.request_refresh(trigger),
            AppEvent::Loaded(trigger, result) => self.on_loaded(trigger, result),
        }
        ControlFlow::Continue(())
    }

    async fn handle_command(&mut self, command: Command) -> ControlFlow<()> {
        match command {
            Command::Search(text) => self.search.push(text),
            Command::ToggleCompleted => {
                self.state.completed_only = !self.state.completed_only;
                self.render();
            }
            Command::ToggleTop => {
                self.state.show_top = !self.state.show_top;
                self.render();
            }
            Command::Refresh => self.request_refresh(Trigger::Manual),
            Command::Interval(interval) => {
                self.set_interval(interval);
                println!("Auto-refresh: {}", interval);
            }
            Command::ToggleTheme => {
                self.state.theme = self.state.theme.toggled();
                if let Some(prefs) = &self.prefs {
                    if let Err(e) = prefs.save_theme(self.state.theme).await {
                        warn!("Failed to persist theme: {}", e);
                    }
                }
                self.render();
            }
            Command::Export => match view::export_json(&self.board.snapshot(), &self.state) {
                Ok(json) => println!("{}", json),
                Err(e) => error!("Failed to export leaderboard: {}", e),
            },
            Command::Help => println!("{}", HELP),
            Command::Quit => return ControlFlow::Break(()),
        }
        ControlFlow::Continue(())
    }

    fn set_interval(&mut self, interval: RefreshInterval) {
        let events = self.events.clone();
        self.auto_refresh.set(interval, move || {
            let _ = events.send(AppEvent::RefreshRequested(Trigger::Timer));
        });
        self.state.refresh_interval = self.auto_refresh.interval();
    }

    fn request_refresh(&self, trigger: Trigger) {
        let board = Arc::clone(&self.board);
        let events = self.events.clone();
        tokio::spawn(async move {
            let result = board.refresh().await;
            let _ = events.send(AppEvent::Loaded(trigger, result));
        });
    }

    fn on_loaded(&mut self, trigger: Trigger, result: Result<RefreshOutcome>) {
        match result {
            Ok(RefreshOutcome::Committed { sequence, participants }) => {
                info!(
                    "Snapshot #{} committed ({} participants, {} refresh)",
                    sequence, participants, trigger
                );
                self.render();
            }
            Ok(RefreshOutcome::Stale { sequence, current }) => {
                debug!("Ignored {} refresh #{}; #{} is newer", trigger, sequence, current);
            }
            Err(e) => {
                // Last good snapshot stays on screen.
                error!("CSV load failed on {} refresh: {}", trigger, e);
            }
        }
    }

    fn render(&self) {
        println!("{}", view::render(&self.board.snapshot(), &self.state, self.board.locator()));
    }
}
