//! # Render Payload
//!
//! What the transport should show: formatted text plus rows of buttons.
//!
//! Text carries *semantic* emphasis only (bold, italic). Each transport maps
//! that to its own markup, so nothing here knows about HTML or terminal
//! escape codes.
//!
//! Every view has exactly one builder. The root menu in particular is built
//! only by [`render_list`], whether it is reached from first contact, a
//! "back to list" button, or an error recovery.

use crate::core::action::{Action, Direction};
use crate::core::store::{ContentStore, Term, Thinker};

pub const APP_TITLE: &str = "📚 Книга мыслителей";
pub const ABOUT_TEXT: &str =
    "Книга мыслителей. Выбирай мыслителя и читай биографию и глоссарий. Сделано для учёбы.";

const THINKERS_PER_ROW: usize = 2;
const LETTERS_PER_ROW: usize = 7;

// ============================================================================
// Rich text
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Emphasis {
    Plain,
    Bold,
    Italic,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Span {
    pub text: String,
    pub emphasis: Emphasis,
}

/// Lines of emphasized spans.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RichText {
    pub lines: Vec<Vec<Span>>,
}

impl RichText {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a span to the current line. Embedded newlines start new lines.
    fn push(mut self, text: &str, emphasis: Emphasis) -> Self {
        for (i, part) in text.split('\n').enumerate() {
            if i > 0 || self.lines.is_empty() {
                self.lines.push(Vec::new());
            }
            if !part.is_empty()
                && let Some(line) = self.lines.last_mut()
            {
                line.push(Span {
                    text: part.to_string(),
                    emphasis,
                });
            }
        }
        self
    }

    pub fn plain(self, text: &str) -> Self {
        self.push(text, Emphasis::Plain)
    }

    pub fn bold(self, text: &str) -> Self {
        self.push(text, Emphasis::Bold)
    }

    pub fn italic(self, text: &str) -> Self {
        self.push(text, Emphasis::Italic)
    }

    /// Start a new line.
    pub fn line(mut self) -> Self {
        self.lines.push(Vec::new());
        self
    }

    /// Text with emphasis stripped, lines joined by `\n`.
    pub fn to_plain(&self) -> String {
        self.lines
            .iter()
            .map(|line| line.iter().map(|s| s.text.as_str()).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

// ============================================================================
// Render
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Button {
    pub label: String,
    pub action: Action,
}

impl Button {
    pub fn new(label: impl Into<String>, action: Action) -> Self {
        Self {
            label: label.into(),
            action,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Render {
    pub text: RichText,
    pub buttons: Vec<Vec<Button>>,
}

impl Render {
    /// Prefix the text with an italic notice line (used for recovered errors).
    pub fn with_notice(mut self, notice: &str) -> Self {
        let mut text = RichText::new().italic(notice).line();
        text.lines.append(&mut self.text.lines);
        self.text = text;
        self
    }

    /// Every button, row by row.
    pub fn all_buttons(&self) -> impl Iterator<Item = &Button> {
        self.buttons.iter().flatten()
    }
}

fn to_list_button() -> Button {
    Button::new("В список мыслителей", Action::OpenList)
}

fn to_bio_button(key: &str, label: &str) -> Button {
    Button::new(label, Action::OpenThinker(key.to_string()))
}

// ============================================================================
// View builders
// ============================================================================

/// Root menu: one button per thinker, two per row, then "About".
pub fn render_list(store: &ContentStore) -> Render {
    let thinkers: Vec<Button> = store
        .iter()
        .map(|(key, thinker)| {
            Button::new(
                thinker.display_name.as_str(),
                Action::OpenThinker(key.to_string()),
            )
        })
        .collect();

    let mut buttons: Vec<Vec<Button>> = thinkers
        .chunks(THINKERS_PER_ROW)
        .map(<[Button]>::to_vec)
        .collect();
    buttons.push(vec![Button::new("О книге", Action::OpenAbout)]);

    Render {
        text: RichText::new().bold(APP_TITLE).line().line().plain("Выбери мыслителя:"),
        buttons,
    }
}

/// One page of a biography. `page_index` must already be in range.
pub fn render_bio(
    key: &str,
    thinker: &Thinker,
    page: &str,
    page_index: usize,
    page_count: usize,
) -> Render {
    let text = RichText::new()
        .bold(&thinker.display_name)
        .line()
        .line()
        .plain(page)
        .line()
        .line()
        .italic(&format!("(Страница {}/{})", page_index + 1, page_count));

    let mut buttons = Vec::new();
    if page_count > 1 {
        buttons.push(vec![
            Button::new("« Назад", Action::NavBio(Direction::Prev)),
            Button::new("Вперёд »", Action::NavBio(Direction::Next)),
        ]);
    }
    buttons.push(vec![Button::new(
        "Глоссарий",
        Action::OpenGlossaryLetters(key.to_string()),
    )]);
    buttons.push(vec![to_list_button()]);

    Render { text, buttons }
}

/// Letter picker for a thinker's glossary.
pub fn render_letters(key: &str, thinker: &Thinker) -> Render {
    let letters = thinker.letters();

    let mut text = RichText::new()
        .bold(&format!("📖 Глоссарий — {}", thinker.display_name))
        .line()
        .line();
    text = if letters.is_empty() {
        text.italic("Глоссарий пока пуст.")
    } else {
        text.plain("Выберите букву:")
    };

    let mut buttons: Vec<Vec<Button>> = letters
        .chunks(LETTERS_PER_ROW)
        .map(|row| {
            row.iter()
                .map(|&letter| {
                    Button::new(
                        letter,
                        Action::OpenGlossaryTerms(key.to_string(), letter.to_string()),
                    )
                })
                .collect()
        })
        .collect();
    buttons.push(vec![to_bio_button(key, "Назад в биографию")]);
    buttons.push(vec![to_list_button()]);

    Render { text, buttons }
}

/// Navigation shown with a term list, and with the "no terms" notice.
fn terms_buttons(key: &str) -> Vec<Vec<Button>> {
    vec![
        vec![Button::new(
            "← К буквам",
            Action::OpenGlossaryLetters(key.to_string()),
        )],
        vec![to_bio_button(key, "В биографию"), to_list_button()],
    ]
}

/// Every term under `letter`, bold term followed by its definition.
pub fn render_terms(key: &str, thinker: &Thinker, letter: &str, terms: &[Term]) -> Render {
    let mut text = RichText::new()
        .bold(&format!("📚 Глоссарий — {}", thinker.display_name))
        .line()
        .bold(&format!("Буква {letter}"))
        .plain(&format!(" — найдено терминов: {}", terms.len()))
        .line();

    for term in terms {
        text = text
            .line()
            .plain("• ")
            .bold(&term.term)
            .line()
            .plain(&term.definition);
    }

    Render {
        text,
        buttons: terms_buttons(key),
    }
}

/// Shown instead of a term list when the letter has nothing under it.
pub fn render_no_terms(key: &str, notice: &str) -> Render {
    Render {
        text: RichText::new().italic(notice),
        buttons: terms_buttons(key),
    }
}

/// Static description. Leaving it is up to the outer shell.
pub fn render_about() -> Render {
    Render {
        text: RichText::new().plain(ABOUT_TEXT),
        buttons: Vec::new(),
    }
}
