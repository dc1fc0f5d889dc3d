//! # TUI Adapter
//!
//! The ratatui-specific layer and this crate's transport. Handles terminal
//! I/O, renders the current `Render`, and turns key presses into core
//! `Action` values for the dispatcher.
//!
//! This is the only module that knows about ratatui and crossterm.
//! A chat or web adapter would sit beside it and talk to the same
//! `Dispatcher`.
//!
//! ## Redraw Strategy
//!
//! Nothing animates, so the loop sleeps up to 500ms waiting for input and
//! only redraws after an event or a terminal resize.
//!
//! ## Outer-shell navigation
//!
//! Some views (About) carry no buttons. `m`/`Home` always sends
//! `Action::OpenList`, so the reader is never stuck.

mod component;
mod components;
mod event;
pub mod rich_text;
mod ui;

use log::info;
use std::io::stdout;
use std::sync::Arc;
use std::time::Duration;

use crossterm::cursor::{Hide, Show};
use crossterm::execute;

use crate::core::action::Action;
use crate::core::dispatch::Dispatcher;
use crate::core::navigator::Transition;
use crate::core::render::Render;
use crate::core::state::SessionView;
use crate::tui::component::EventHandler;
use crate::tui::components::ButtonGridState;
use crate::tui::event::{TuiEvent, poll_event_immediate, poll_event_timeout};

/// How the TUI session begins.
#[derive(Debug, Clone, Default)]
pub struct Launch {
    /// Continue a stored session instead of starting on the menu.
    pub resume: bool,
    /// Button identifier to apply right after start (deep link).
    pub open: Option<String>,
}

/// TUI-specific presentation state (not part of core business logic)
pub struct TuiState {
    pub view: SessionView,
    pub render: Render,
    pub buttons: ButtonGridState,
    pub status_message: String,
    /// Vertical scroll of the page body, in wrapped lines
    pub scroll: u16,
}

impl TuiState {
    pub fn new(transition: Transition) -> Self {
        let mut state = Self {
            view: SessionView::default(),
            render: transition.render.clone(),
            buttons: ButtonGridState::default(),
            status_message: String::new(),
            scroll: 0,
        };
        state.apply(transition);
        state
    }

    /// Show the outcome of a navigation step.
    pub fn apply(&mut self, transition: Transition) {
        // Readers see the localized notice; Display stays in the log
        self.status_message = transition
            .error
            .as_ref()
            .map(|e| e.user_message().to_string())
            .unwrap_or_default();
        self.view = transition.view;
        self.buttons.replace(transition.render.buttons.clone());
        self.render = transition.render;
        self.scroll = 0;
    }
}

struct TerminalModeGuard;

impl TerminalModeGuard {
    fn new() -> std::io::Result<Self> {
        execute!(stdout(), Hide)?;
        info!("Terminal modes enabled (hidden cursor)");
        Ok(Self)
    }
}

impl Drop for TerminalModeGuard {
    fn drop(&mut self) {
        let _ = execute!(stdout(), Show);
    }
}

pub async fn run(
    dispatcher: Arc<Dispatcher>,
    session_id: String,
    launch: Launch,
) -> std::io::Result<()> {
    let first = if launch.resume {
        dispatcher.resume(&session_id).await
    } else {
        dispatcher.start(&session_id).await
    };
    let mut tui = TuiState::new(first);

    if let Some(data) = launch.open.as_deref() {
        info!("Opening deep link {data:?}");
        let transition = dispatcher.dispatch_callback(&session_id, data).await;
        tui.apply(transition);
    }

    let mut terminal = ratatui::init();
    let _terminal_mode_guard = TerminalModeGuard::new();
    let result = event_loop(&mut terminal, &dispatcher, &session_id, &mut tui).await;
    ratatui::restore();
    result
}

async fn event_loop(
    terminal: &mut ratatui::DefaultTerminal,
    dispatcher: &Dispatcher,
    session_id: &str,
    tui: &mut TuiState,
) -> std::io::Result<()> {
    let mut needs_redraw = true; // Force first frame

    loop {
        if needs_redraw {
            terminal.draw(|f| ui::draw_ui(f, tui))?;
            needs_redraw = false;
        }

        // crossterm polling blocks the thread; keep it off the async workers
        let first_event =
            tokio::task::block_in_place(|| poll_event_timeout(Duration::from_millis(500)));
        if first_event.is_some() {
            needs_redraw = true;
        }

        // Process first event + drain ALL pending events before next draw
        let pending: Vec<TuiEvent> = first_event
            .into_iter()
            .chain(std::iter::from_fn(poll_event_immediate))
            .collect();

        for event in pending {
            let action = match event {
                TuiEvent::Quit | TuiEvent::ForceQuit => {
                    info!("Session {session_id} closing");
                    return Ok(());
                }
                TuiEvent::Resize => continue,
                TuiEvent::Home => Some(Action::OpenList),
                TuiEvent::ScrollUp => {
                    tui.scroll = tui.scroll.saturating_sub(5);
                    None
                }
                TuiEvent::ScrollDown => {
                    // Clamped against the wrapped height when drawn
                    tui.scroll = tui.scroll.saturating_add(5);
                    None
                }
                _ => tui.buttons.handle_event(&event),
            };

            if let Some(action) = action {
                let transition = dispatcher.dispatch(session_id, &action).await;
                tui.apply(transition);
            }
        }
    }
}
