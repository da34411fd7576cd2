//! docqa: ask questions about a PDF or web page from the terminal.
//!
//! Entry point for the `docqa` binary. Wires together configuration
//! (`config`), file logging, the terminal lifecycle (`tui`), the event bus
//! (`event`), the backend worker (`worker`), and rendering (`ui`) around the
//! `docqa_core::Workflow` state machine held in `app::AppState`.
//!
//! # Startup sequence
//!
//! 1. Parse flags and load settings. Read-only, safe before terminal init.
//! 2. Open the log file and install the tracing subscriber.
//! 3. Build the HTTP client. A bad backend URL aborts here, before raw mode.
//! 4. `install_panic_hook()` then `register_sigterm()` then `init_tui()`.
//! 5. Spawn the input task and the API worker.
//! 6. Queue the health check, session restore, and the optional SOURCE.
//!
//! `restore_tui()` runs after the event loop exits on every path; inside the
//! loop `?` is only used in the Render arm, whose error breaks out first.

mod app;
mod config;
mod event;
mod theme;
mod tui;
mod ui;
mod worker;

use std::fs::OpenOptions;
use std::sync::atomic::Ordering;
use std::sync::{Arc, Mutex};

use anyhow::Context as _;
use clap::Parser;
use docqa_core::{Backend, HttpBackend};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::config::{Cli, Settings};
use crate::event::AppEvent;
use crate::ui::keybindings::{self, KeyAction};

fn init_logging(settings: &Settings) -> anyhow::Result<()> {
    let path = settings.log_path();
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("creating log directory {}", dir.display()))?;
    }
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .with_context(|| format!("opening log file {}", path.display()))?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let settings = Settings::resolve(&cli);
    init_logging(&settings)?;

    let backend = HttpBackend::new(&settings.backend_url, settings.request_timeout())
        .with_context(|| format!("invalid backend URL {:?}", settings.backend_url))?;
    info!(backend = %backend.base_url(), "starting docqa");
    let backend: Arc<dyn Backend> = Arc::new(backend);

    let theme = theme::Theme::from_name(&settings.theme);
    let mut state = app::AppState::new(settings.backend_url.clone());

    tui::install_panic_hook();
    let term_flag = tui::register_sigterm().context("registering SIGTERM handler")?;
    let mut terminal = tui::init_tui().context("initialising terminal")?;

    let handler = event::EventHandler::new();
    event::spawn_event_task(handler.tx.clone());
    let api = worker::spawn_api_worker(backend, handler.tx.clone());
    let mut rx = handler.rx;

    api.dispatch(state.workflow.check_backend_health());
    match cli.source.as_deref() {
        // An explicit SOURCE replaces whatever the backend was holding.
        Some(source) => match state.workflow.submit_source(source) {
            Ok(commands) => api.dispatch(commands),
            Err(e) => warn!(error = %e, "startup source rejected"),
        },
        None => api.dispatch(state.workflow.restore_session_on_load()),
    }

    let result = run(&mut terminal, &mut state, &theme, &mut rx, &api, &term_flag).await;

    tui::restore_tui()?;
    info!("exiting");
    result
}

/// The event loop. Returns on quit, SIGTERM, channel close, or a draw error.
async fn run(
    terminal: &mut tui::Tui,
    state: &mut app::AppState,
    theme: &theme::Theme,
    rx: &mut tokio::sync::mpsc::UnboundedReceiver<AppEvent>,
    api: &worker::ApiHandle,
    term_flag: &std::sync::atomic::AtomicBool,
) -> anyhow::Result<()> {
    loop {
        tokio::select! {
            // Heartbeat so SIGTERM is noticed even when no events arrive.
            _ = tokio::time::sleep(std::time::Duration::from_millis(50)) => {}
            maybe_event = rx.recv() => {
                let action = match maybe_event {
                    Some(AppEvent::Render) => {
                        terminal.draw(|frame| ui::render(frame, state, theme))?;
                        KeyAction::Continue
                    }
                    Some(AppEvent::Key(key)) => keybindings::handle_key(key, state),
                    Some(AppEvent::Mouse(mouse)) => keybindings::handle_mouse(mouse, state),
                    Some(AppEvent::Paste(text)) => keybindings::handle_paste(&text, state),
                    Some(AppEvent::Tick) => {
                        state.workflow.tick();
                        KeyAction::Continue
                    }
                    Some(AppEvent::Api(outcome)) => {
                        KeyAction::from(state.workflow.apply(*outcome))
                    }
                    // ratatui picks up the new size on the next draw.
                    Some(AppEvent::Resize(_, _)) => KeyAction::Continue,
                    Some(AppEvent::Quit) | None => KeyAction::Quit,
                };
                match action {
                    KeyAction::Continue => {}
                    KeyAction::Dispatch(commands) => api.dispatch(commands),
                    KeyAction::Quit => return Ok(()),
                }
            }
        }
        if term_flag.load(Ordering::Relaxed) {
            return Ok(());
        }
    }
}
