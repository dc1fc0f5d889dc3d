//! Maps the core's semantic emphasis onto terminal styles.
//!
//! Bold becomes `Modifier::BOLD`, italic becomes `Modifier::ITALIC`. Terminals
//! without italics show plain text, which is still readable.

use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span, Text};

use crate::core::render::{Emphasis, RichText};

fn style_for(emphasis: Emphasis) -> Style {
    match emphasis {
        Emphasis::Plain => Style::default(),
        Emphasis::Bold => Style::default().add_modifier(Modifier::BOLD),
        Emphasis::Italic => Style::default().add_modifier(Modifier::ITALIC),
    }
}

/// Borrow `text` as a ratatui `Text`, one `Line` per rich-text line.
pub fn to_text(text: &RichText) -> Text<'_> {
    text.lines
        .iter()
        .map(|line| {
            Line::from(
                line.iter()
                    .map(|span| Span::styled(span.text.as_str(), style_for(span.emphasis)))
                    .collect::<Vec<_>>(),
            )
        })
        .collect::<Vec<_>>()
        .into()
}
