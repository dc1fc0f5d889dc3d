//! # ButtonGrid Component
//!
//! Draws a render's button rows as a grid of bordered cells and tracks which
//! button is selected.
//!
//! Follows the persistent state + transient wrapper pattern:
//! - `ButtonGridState` lives in `TuiState` and survives between frames
//! - `ButtonGrid` is created each frame with borrowed rows and state
//!
//! Moving up or down keeps the column where possible and clamps it to the
//! length of the new row, since rows have different widths.

use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Block, Paragraph};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::core::action::Action;
use crate::core::render::Button;
use crate::tui::component::{Component, EventHandler};
use crate::tui::event::TuiEvent;

/// Height of one bordered button row.
pub const ROW_HEIGHT: u16 = 3;

/// Selection within the current button rows.
#[derive(Debug, Default, Clone)]
pub struct ButtonGridState {
    pub rows: Vec<Vec<Button>>,
    pub row: usize,
    pub col: usize,
}

impl ButtonGridState {
    pub fn new(rows: Vec<Vec<Button>>) -> Self {
        Self { rows, row: 0, col: 0 }
    }

    /// Swap in a new set of buttons and select the first one.
    pub fn replace(&mut self, rows: Vec<Vec<Button>>) {
        *self = Self::new(rows);
    }

    pub fn selected(&self) -> Option<&Button> {
        self.rows.get(self.row).and_then(|r| r.get(self.col))
    }

    /// Total height needed to show every row.
    pub fn height(&self) -> u16 {
        ROW_HEIGHT.saturating_mul(self.rows.len() as u16)
    }

    fn clamp_col(&mut self) {
        let len = self.rows.get(self.row).map_or(0, Vec::len);
        self.col = self.col.min(len.saturating_sub(1));
    }
}

impl EventHandler for ButtonGridState {
    type Event = Action;

    fn handle_event(&mut self, event: &TuiEvent) -> Option<Action> {
        if self.rows.is_empty() {
            return None;
        }
        match event {
            TuiEvent::CursorUp => {
                self.row = self.row.saturating_sub(1);
                self.clamp_col();
                None
            }
            TuiEvent::CursorDown => {
                self.row = (self.row + 1).min(self.rows.len() - 1);
                self.clamp_col();
                None
            }
            TuiEvent::CursorLeft => {
                if self.col > 0 {
                    self.col -= 1;
                } else if self.row > 0 {
                    // Wrap to the end of the previous row
                    self.row -= 1;
                    self.col = self.rows[self.row].len().saturating_sub(1);
                }
                None
            }
            TuiEvent::CursorRight => {
                let len = self.rows[self.row].len();
                if self.col + 1 < len {
                    self.col += 1;
                } else if self.row + 1 < self.rows.len() {
                    self.row += 1;
                    self.col = 0;
                }
                None
            }
            TuiEvent::Press => self.selected().map(|b| b.action.clone()),
            _ => None,
        }
    }
}

/// Truncate `label` to `width` terminal columns, marking the cut with `…`.
pub fn fit_label(label: &str, width: usize) -> String {
    if label.width() <= width {
        return label.to_string();
    }
    if width == 0 {
        return String::new();
    }

    let mut out = String::new();
    let mut used = 0;
    for c in label.chars() {
        let w = c.width().unwrap_or(0);
        if used + w > width - 1 {
            break;
        }
        out.push(c);
        used += w;
    }
    out.push('…');
    out
}

/// Transient render wrapper for the button grid.
pub struct ButtonGrid<'a> {
    state: &'a ButtonGridState,
}

impl<'a> ButtonGrid<'a> {
    pub fn new(state: &'a ButtonGridState) -> Self {
        Self { state }
    }
}

impl Component for ButtonGrid<'_> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let rows = Layout::vertical(
            self.state
                .rows
                .iter()
                .map(|_| Constraint::Length(ROW_HEIGHT)),
        )
        .split(area);

        for (r, (buttons, row_area)) in self.state.rows.iter().zip(rows.iter()).enumerate() {
            if buttons.is_empty() {
                continue;
            }
            let cells = Layout::horizontal(
                buttons
                    .iter()
                    .map(|_| Constraint::Ratio(1, buttons.len() as u32)),
            )
            .split(*row_area);

            for (c, (button, cell)) in buttons.iter().zip(cells.iter()).enumerate() {
                let selected = r == self.state.row && c == self.state.col;
                let style = if selected {
                    Style::default()
                        .fg(Color::Black)
                        .bg(Color::Cyan)
                        .add_modifier(Modifier::BOLD)
                } else {
                    Style::default()
                };
                let inner_width = cell.width.saturating_sub(2) as usize;
                let label = Paragraph::new(fit_label(&button.label, inner_width))
                    .alignment(Alignment::Center)
                    .style(style)
                    .block(Block::bordered().border_style(Style::default().fg(Color::DarkGray)));
                frame.render_widget(label, *cell);
            }
        }
    }
}
