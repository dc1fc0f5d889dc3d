use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers};

/// TUI-specific input events
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TuiEvent {
    // Leaving
    Quit,
    ForceQuit,

    // Button grid
    CursorUp,
    CursorDown,
    CursorLeft,
    CursorRight,
    Press,

    // Outer-shell navigation, available from every view
    Home,

    // Page body
    ScrollUp,
    ScrollDown,

    Resize,
}

/// Poll for an event without blocking (returns immediately)
pub fn poll_event_immediate() -> Option<TuiEvent> {
    poll_event_timeout(std::time::Duration::ZERO)
}

/// Poll for an event, blocking up to `timeout`.
pub fn poll_event_timeout(timeout: std::time::Duration) -> Option<TuiEvent> {
    match event::poll(timeout) {
        Ok(true) => {}
        Ok(false) => return None,
        Err(e) => {
            log::warn!("Event poll failed: {e}");
            return None;
        }
    }

    match event::read() {
        Ok(Event::Key(key_event)) if key_event.kind != KeyEventKind::Release => {
            log::debug!(
                "Key event: {:?} with modifiers {:?}",
                key_event.code,
                key_event.modifiers
            );
            map_key(key_event.modifiers, key_event.code)
        }
        Ok(Event::Resize(_, _)) => Some(TuiEvent::Resize),
        Ok(_) => None,
        Err(e) => {
            log::warn!("Event read failed: {e}");
            None
        }
    }
}

fn map_key(modifiers: KeyModifiers, code: KeyCode) -> Option<TuiEvent> {
    match (modifiers, code) {
        (KeyModifiers::CONTROL, KeyCode::Char('c')) => Some(TuiEvent::ForceQuit),
        (_, KeyCode::Char('q')) | (_, KeyCode::Esc) => Some(TuiEvent::Quit),
        (_, KeyCode::Up) | (_, KeyCode::Char('k')) => Some(TuiEvent::CursorUp),
        (_, KeyCode::Down) | (_, KeyCode::Char('j')) => Some(TuiEvent::CursorDown),
        (_, KeyCode::Left) | (_, KeyCode::Char('h')) | (_, KeyCode::BackTab) => {
            Some(TuiEvent::CursorLeft)
        }
        (_, KeyCode::Right) | (_, KeyCode::Char('l')) | (_, KeyCode::Tab) => {
            Some(TuiEvent::CursorRight)
        }
        (_, KeyCode::Enter) | (_, KeyCode::Char(' ')) => Some(TuiEvent::Press),
        (_, KeyCode::Home) | (_, KeyCode::Char('m')) => Some(TuiEvent::Home),
        (_, KeyCode::PageUp) => Some(TuiEvent::ScrollUp),
        (_, KeyCode::PageDown) => Some(TuiEvent::ScrollDown),
        _ => None,
    }
}
