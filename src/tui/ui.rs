use crate::tui::TuiState;
use crate::tui::component::Component;
use crate::tui::components::title_bar::location_label;
use crate::tui::components::{ButtonGrid, TitleBar};
use crate::tui::rich_text::to_text;

use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Style};
use ratatui::text::Span;
use ratatui::widgets::{Block, Padding, Paragraph, Wrap};

const HELP_TEXT: &str = " ←↑↓→ select  Enter open  PgUp/PgDn scroll  m menu  q quit ";

pub fn draw_ui(frame: &mut Frame, tui: &mut TuiState) {
    use Constraint::{Length, Min};

    // Keep at least a few body lines even with many button rows
    let grid_height = tui
        .buttons
        .height()
        .min(frame.area().height.saturating_sub(6));
    let layout = Layout::vertical([Length(1), Min(3), Length(grid_height), Length(1)]);
    let [title_area, body_area, grid_area, help_area] = layout.areas(frame.area());

    let mut title_bar = TitleBar::new(location_label(&tui.view), tui.status_message.clone());
    title_bar.render(frame, title_area);

    draw_body(frame, body_area, tui);

    ButtonGrid::new(&tui.buttons).render(frame, grid_area);

    frame.render_widget(
        Span::styled(HELP_TEXT, Style::default().fg(Color::DarkGray)),
        help_area,
    );
}

fn draw_body(frame: &mut Frame, area: Rect, tui: &mut TuiState) {
    let paragraph = Paragraph::new(to_text(&tui.render.text))
        .block(Block::bordered().padding(Padding::horizontal(1)))
        .wrap(Wrap { trim: false });

    // Clamp scroll to the wrapped height so PgDn can't run off the end
    let inner_height = area.height.saturating_sub(2);
    // line_count takes the outer width and counts the block's borders
    let lines = (paragraph.line_count(area.width) as u16).saturating_sub(2);
    tui.scroll = tui.scroll.min(lines.saturating_sub(inner_height));

    frame.render_widget(paragraph.scroll((tui.scroll, 0)), area);
}
