//! # Session State
//!
//! Where a reader currently is. This is the only per-session state; everything
//! else (page text, menus) is recomputed from it and the content store.
//!
//! ```text
//! SessionView
//! ├── ListView                              // root menu
//! ├── BioView { thinker_key, page_index }   // reading a biography
//! ├── GlossaryLettersView { thinker_key }   // picking a letter
//! ├── GlossaryTermsView { thinker_key, letter }
//! └── AboutView
//! ```
//!
//! The serde form is the persistence contract: a stored view reloads into
//! exactly the same navigation position.

use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(tag = "view", rename_all = "snake_case")]
pub enum SessionView {
    #[default]
    List,
    Bio {
        thinker_key: String,
        page_index: usize,
    },
    GlossaryLetters {
        thinker_key: String,
    },
    GlossaryTerms {
        thinker_key: String,
        letter: String,
    },
    About,
}

impl SessionView {
    /// The thinker this view is about, if any.
    pub fn thinker_key(&self) -> Option<&str> {
        match self {
            SessionView::Bio { thinker_key, .. }
            | SessionView::GlossaryLetters { thinker_key }
            | SessionView::GlossaryTerms { thinker_key, .. } => Some(thinker_key),
            SessionView::List | SessionView::About => None,
        }
    }
}
