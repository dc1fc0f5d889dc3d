//! # TitleBar Component
//!
//! Top status bar: application name, where the reader is, and the last
//! status message (e.g. a recovered error).
//!
//! Purely presentational. All data arrives as props:
//!
//! ```rust,ignore
//! let mut title_bar = TitleBar::new(location, tui.status_message.clone());
//! title_bar.render(frame, title_area);
//! ```

use crate::core::state::SessionView;
use crate::tui::component::Component;
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::Span;

pub struct TitleBar {
    /// Short description of the current view
    pub location: String,
    /// Transient status, empty when there is nothing to report
    pub status_message: String,
}

impl TitleBar {
    pub fn new(location: String, status_message: String) -> Self {
        Self {
            location,
            status_message,
        }
    }

    /// The line shown in the bar.
    pub fn title_text(&self) -> String {
        if self.status_message.is_empty() {
            format!("Thinkers | {}", self.location)
        } else {
            format!("Thinkers | {} | {}", self.location, self.status_message)
        }
    }
}

/// Short label for a view, e.g. `kant · page 2`.
pub fn location_label(view: &SessionView) -> String {
    match view {
        SessionView::List => "menu".to_string(),
        SessionView::About => "about".to_string(),
        SessionView::Bio {
            thinker_key,
            page_index,
        } => format!("{thinker_key} · page {}", page_index + 1),
        SessionView::GlossaryLetters { thinker_key } => format!("{thinker_key} · glossary"),
        SessionView::GlossaryTerms {
            thinker_key,
            letter,
        } => format!("{thinker_key} · glossary {letter}"),
    }
}

impl Component for TitleBar {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let span = Span::styled(
            self.title_text(),
            Style::default().add_modifier(Modifier::REVERSED),
        );
        frame.render_widget(span, area);
    }
}
