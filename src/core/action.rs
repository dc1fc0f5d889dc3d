//! # Actions
//!
//! Everything a reader can do becomes an `Action`.
//! Pressing a thinker's button? That's `Action::OpenThinker(key)`.
//! Paging forward? That's `Action::NavBio(Direction::Next)`.
//!
//! The navigator takes the current view and an action, then returns the next
//! view plus what to show. No side effects here. I/O happens elsewhere.
//!
//! ```text
//! SessionView + Action  →  Navigator::handle()  →  SessionView + Render
//! ```
//!
//! Transports that can only carry short strings on their buttons use the
//! callback codec below (`thinker:kant`, `bio_nav:next`, ...).

use std::fmt;

use crate::core::navigator::NavError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Prev,
    Next,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    OpenList,
    OpenAbout,
    OpenThinker(String),
    NavBio(Direction),
    OpenGlossaryLetters(String),
    OpenGlossaryTerms(String, String),
}

impl Action {
    /// Compact button identifier for this action.
    pub fn encode(&self) -> String {
        match self {
            Action::OpenList => "to_list".to_string(),
            Action::OpenAbout => "about".to_string(),
            Action::OpenThinker(key) => format!("thinker:{key}"),
            Action::NavBio(Direction::Prev) => "bio_nav:prev".to_string(),
            Action::NavBio(Direction::Next) => "bio_nav:next".to_string(),
            Action::OpenGlossaryLetters(key) => format!("gloss_letters:{key}"),
            Action::OpenGlossaryTerms(key, letter) => format!("gloss_terms:{key}:{letter}"),
        }
    }

    /// Parse a button identifier produced by [`Action::encode`].
    pub fn decode(data: &str) -> Result<Action, NavError> {
        let malformed = || NavError::MalformedAction(data.to_string());
        let mut parts = data.split(':');
        let tag = parts.next().unwrap_or_default();
        let args: Vec<&str> = parts.collect();

        if args.iter().any(|a| a.is_empty()) {
            return Err(malformed());
        }

        match (tag, args.as_slice()) {
            ("to_list", []) => Ok(Action::OpenList),
            ("about", []) => Ok(Action::OpenAbout),
            ("thinker", [key]) => Ok(Action::OpenThinker(key.to_string())),
            ("bio_nav", ["prev"]) => Ok(Action::NavBio(Direction::Prev)),
            ("bio_nav", ["next"]) => Ok(Action::NavBio(Direction::Next)),
            ("gloss_letters", [key]) => Ok(Action::OpenGlossaryLetters(key.to_string())),
            ("gloss_terms", [key, letter]) => Ok(Action::OpenGlossaryTerms(
                key.to_string(),
                letter.to_string(),
            )),
            _ => Err(malformed()),
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.encode())
    }
}
