//! # Navigator
//!
//! The per-session state machine. Given where the reader is (`SessionView`)
//! and what they pressed (`Action`), produce where they are next and what to
//! show them.
//!
//! ```text
//!              OpenList                 OpenThinker(k)
//!   any ─────────────────► List   any ─────────────────► Bio{k,0}
//!                                                          │  ▲
//!                                             NavBio(prev) │  │ NavBio(next)
//!                                             (clamped)    ▼  │ (clamped)
//!                                                        Bio{k,p}
//!   any ── OpenGlossaryLetters(k) ──► Letters{k} ── OpenGlossaryTerms(k,L) ──► Terms{k,L}
//!   any ── OpenAbout ──► About
//! ```
//!
//! Terms only open from that thinker's letter picker; from anywhere else
//! the press is stale and recovers to the list.
//!
//! The navigator holds no per-session state and never locks. Callers own the
//! `SessionView` and must not run two actions for one session at once.
//!
//! Nothing here fails hard. Every error is rendered as a notice and lands the
//! session on a valid view (usually the root menu).

use std::fmt;
use std::sync::Arc;

use log::{debug, warn};

use crate::core::action::{Action, Direction};
use crate::core::paginate::{page_count, paginate};
use crate::core::render::{self, Render};
use crate::core::state::SessionView;
use crate::core::store::ContentStore;

/// Default page size in characters.
pub const DEFAULT_PAGE_BUDGET: usize = 1800;

// ============================================================================
// Error Type
// ============================================================================

/// Recoverable navigation failures. Each one has a user-facing message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavError {
    UnknownThinker(String),
    /// The letter is absent from the glossary or has no terms.
    UnknownLetter { thinker_key: String, letter: String },
    /// Bio navigation without a bio open (state lost or never set).
    StaleOrMissingSession,
    /// A button identifier that does not decode to an action.
    MalformedAction(String),
}

impl NavError {
    /// Message shown to the reader.
    pub fn user_message(&self) -> &'static str {
        match self {
            NavError::UnknownThinker(_) => "Мыслитель не найден.",
            NavError::UnknownLetter { .. } => "Термины на эту букву не найдены.",
            NavError::StaleOrMissingSession => "Время вышло, выбери мыслителя заново.",
            NavError::MalformedAction(_) => "Неизвестная команда.",
        }
    }
}

impl fmt::Display for NavError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NavError::UnknownThinker(key) => write!(f, "unknown thinker: {key}"),
            NavError::UnknownLetter {
                thinker_key,
                letter,
            } => write!(f, "no glossary terms for {thinker_key}/{letter}"),
            NavError::StaleOrMissingSession => write!(f, "stale or missing session"),
            NavError::MalformedAction(data) => write!(f, "malformed action: {data:?}"),
        }
    }
}

impl std::error::Error for NavError {}

// ============================================================================
// Transition
// ============================================================================

/// Result of one navigation step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    pub view: SessionView,
    pub render: Render,
    /// Set when the step recovered from an error; the render already says so.
    pub error: Option<NavError>,
}

impl Transition {
    fn ok(view: SessionView, render: Render) -> Self {
        Self {
            view,
            render,
            error: None,
        }
    }
}

// ============================================================================
// Navigator
// ============================================================================

#[derive(Debug, Clone)]
pub struct Navigator {
    store: Arc<ContentStore>,
    budget: usize,
}

impl Navigator {
    pub fn new(store: Arc<ContentStore>, budget: usize) -> Self {
        Self {
            store,
            budget: budget.max(1),
        }
    }

    pub fn store(&self) -> &ContentStore {
        &self.store
    }

    pub fn budget(&self) -> usize {
        self.budget
    }

    /// Apply `action` to `view`.
    pub fn handle(&self, view: &SessionView, action: &Action) -> Transition {
        debug!("Navigate: {view:?} + {action}");
        match action {
            Action::OpenList => self.list(),
            Action::OpenAbout => Transition::ok(SessionView::About, render::render_about()),
            Action::OpenThinker(key) => self.bio(key, 0),
            Action::NavBio(direction) => match view {
                SessionView::Bio {
                    thinker_key,
                    page_index,
                } => self.step_bio(thinker_key, *page_index, *direction),
                _ => self.recover(NavError::StaleOrMissingSession),
            },
            Action::OpenGlossaryLetters(key) => self.letters(key),
            Action::OpenGlossaryTerms(key, letter) => match view {
                SessionView::GlossaryLetters { thinker_key } if thinker_key == key => {
                    self.terms(view, key, letter)
                }
                _ => self.recover(NavError::StaleOrMissingSession),
            },
        }
    }

    /// Decode a button identifier and apply it.
    pub fn handle_callback(&self, view: &SessionView, data: &str) -> Transition {
        match Action::decode(data) {
            Ok(action) => self.handle(view, &action),
            Err(e) => self.recover(e),
        }
    }

    /// Render `view` as-is, e.g. after restoring it from storage.
    ///
    /// A view that no longer fits the store degrades the same way an action
    /// would: unknown thinkers fall back to the list, pages are clamped.
    pub fn show(&self, view: &SessionView) -> Transition {
        match view {
            SessionView::List => self.list(),
            SessionView::About => Transition::ok(SessionView::About, render::render_about()),
            SessionView::Bio {
                thinker_key,
                page_index,
            } => self.bio(thinker_key, *page_index),
            SessionView::GlossaryLetters { thinker_key } => self.letters(thinker_key),
            SessionView::GlossaryTerms {
                thinker_key,
                letter,
            } => {
                let fallback = SessionView::GlossaryLetters {
                    thinker_key: thinker_key.clone(),
                };
                let transition = self.terms(&fallback, thinker_key, letter);
                if transition.error.is_some() {
                    // The letter is gone; show the picker instead of a dead end
                    self.letters(thinker_key)
                } else {
                    transition
                }
            }
        }
    }

    /// Number of pages in `key`'s biography, or None for unknown thinkers.
    pub fn pages_count(&self, key: &str) -> Option<usize> {
        self.store
            .get(key)
            .map(|t| page_count(&t.bio, self.budget))
    }

    fn list(&self) -> Transition {
        Transition::ok(SessionView::List, render::render_list(&self.store))
    }

    /// Land on the list with a notice explaining what went wrong.
    fn recover(&self, error: NavError) -> Transition {
        warn!("Recovered navigation error: {error}");
        Transition {
            view: SessionView::List,
            render: render::render_list(&self.store).with_notice(error.user_message()),
            error: Some(error),
        }
    }

    fn bio(&self, key: &str, page_index: usize) -> Transition {
        let Some(thinker) = self.store.get(key) else {
            return self.recover(NavError::UnknownThinker(key.to_string()));
        };

        let pages = paginate(&thinker.bio, self.budget);
        let last = pages.len() - 1;
        let page_index = page_index.min(last);

        Transition::ok(
            SessionView::Bio {
                thinker_key: key.to_string(),
                page_index,
            },
            render::render_bio(key, thinker, pages[page_index], page_index, pages.len()),
        )
    }

    fn step_bio(&self, key: &str, page_index: usize, direction: Direction) -> Transition {
        let target = match direction {
            Direction::Prev => page_index.saturating_sub(1),
            // Clamped against the page count inside bio()
            Direction::Next => page_index.saturating_add(1),
        };
        self.bio(key, target)
    }

    fn letters(&self, key: &str) -> Transition {
        let Some(thinker) = self.store.get(key) else {
            return self.recover(NavError::UnknownThinker(key.to_string()));
        };

        Transition::ok(
            SessionView::GlossaryLetters {
                thinker_key: key.to_string(),
            },
            render::render_letters(key, thinker),
        )
    }

    fn terms(&self, view: &SessionView, key: &str, letter: &str) -> Transition {
        let Some(thinker) = self.store.get(key) else {
            return self.recover(NavError::UnknownThinker(key.to_string()));
        };

        match thinker.terms(letter) {
            Some(terms) if !terms.is_empty() => Transition::ok(
                SessionView::GlossaryTerms {
                    thinker_key: key.to_string(),
                    letter: letter.to_string(),
                },
                render::render_terms(key, thinker, letter, terms),
            ),
            _ => {
                let error = NavError::UnknownLetter {
                    thinker_key: key.to_string(),
                    letter: letter.to_string(),
                };
                warn!("Recovered navigation error: {error}");
                // The view stays where it was; the notice offers a way back
                Transition {
                    view: view.clone(),
                    render: render::render_no_terms(key, error.user_message()),
                    error: Some(error),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{test_navigator, test_store};

    fn bio_view(key: &str, page_index: usize) -> SessionView {
        SessionView::Bio {
            thinker_key: key.to_string(),
            page_index,
        }
    }

    fn button_labels(render: &Render) -> Vec<&str> {
        render.all_buttons().map(|b| b.label.as_str()).collect()
    }

    #[test]
    fn test_open_list_from_anywhere() {
        let nav = test_navigator(40);
        for view in [SessionView::About, bio_view("kant", 1), SessionView::List] {
            let t = nav.handle(&view, &Action::OpenList);
            assert_eq!(t.view, SessionView::List);
            assert!(t.error.is_none());
            assert_eq!(t.render, render::render_list(nav.store()));
        }
    }

    #[test]
    fn test_open_about() {
        let nav = test_navigator(40);
        let t = nav.handle(&SessionView::List, &Action::OpenAbout);
        assert_eq!(t.view, SessionView::About);
        assert!(t.render.buttons.is_empty());
    }

    #[test]
    fn test_open_thinker_starts_at_first_page() {
        let nav = test_navigator(40);
        let t = nav.handle(&SessionView::List, &Action::OpenThinker("kant".into()));
        assert_eq!(t.view, bio_view("kant", 0));
        let text = t.render.text.to_plain();
        assert!(text.starts_with("Иммануил Кант"));
        assert!(text.contains("(Страница 1/"));
    }

    #[test]
    fn test_unknown_thinker_recovers_to_list() {
        let nav = test_navigator(40);
        let t = nav.handle(
            &bio_view("kant", 2),
            &Action::OpenThinker("does-not-exist".into()),
        );
        assert_eq!(t.view, SessionView::List);
        assert_eq!(
            t.error,
            Some(NavError::UnknownThinker("does-not-exist".into()))
        );
        assert!(t.render.text.to_plain().starts_with("Мыслитель не найден."));
        // Still a usable menu
        assert!(button_labels(&t.render).contains(&"Иммануил Кант"));
    }

    #[test]
    fn test_nav_next_and_prev() {
        let nav = test_navigator(40);
        let count = nav.pages_count("kant").unwrap();
        assert!(count > 2, "fixture bio should span several pages");

        let t = nav.handle(&bio_view("kant", 0), &Action::NavBio(Direction::Next));
        assert_eq!(t.view, bio_view("kant", 1));
        let t = nav.handle(&t.view, &Action::NavBio(Direction::Prev));
        assert_eq!(t.view, bio_view("kant", 0));
    }

    #[test]
    fn test_nav_clamps_at_both_ends() {
        let nav = test_navigator(40);
        let last = nav.pages_count("kant").unwrap() - 1;

        let t = nav.handle(&bio_view("kant", last), &Action::NavBio(Direction::Next));
        assert_eq!(t.view, bio_view("kant", last));
        assert!(t.error.is_none());

        let t = nav.handle(&bio_view("kant", 0), &Action::NavBio(Direction::Prev));
        assert_eq!(t.view, bio_view("kant", 0));
        assert!(t.error.is_none());
    }

    #[test]
    fn test_nav_without_bio_is_stale_session() {
        let nav = test_navigator(40);
        for view in [
            SessionView::List,
            SessionView::About,
            SessionView::GlossaryLetters {
                thinker_key: "kant".into(),
            },
        ] {
            let t = nav.handle(&view, &Action::NavBio(Direction::Next));
            assert_eq!(t.view, SessionView::List);
            assert_eq!(t.error, Some(NavError::StaleOrMissingSession));
            assert!(t.render.text.to_plain().starts_with("Время вышло"));
        }
    }

    #[test]
    fn test_nav_on_vanished_thinker_recovers() {
        let nav = test_navigator(40);
        let t = nav.handle(&bio_view("ghost", 3), &Action::NavBio(Direction::Prev));
        assert_eq!(t.view, SessionView::List);
        assert_eq!(t.error, Some(NavError::UnknownThinker("ghost".into())));
    }

    #[test]
    fn test_single_page_bio_has_no_nav_buttons() {
        let nav = test_navigator(DEFAULT_PAGE_BUDGET);
        let t = nav.handle(&SessionView::List, &Action::OpenThinker("nietzsche".into()));
        assert_eq!(nav.pages_count("nietzsche"), Some(1));
        assert!(!button_labels(&t.render).contains(&"Вперёд »"));
        assert!(button_labels(&t.render).contains(&"Глоссарий"));
    }

    #[test]
    fn test_glossary_letters_in_alphabet_order() {
        let nav = test_navigator(40);
        let t = nav.handle(
            &bio_view("kant", 0),
            &Action::OpenGlossaryLetters("kant".into()),
        );
        assert_eq!(
            t.view,
            SessionView::GlossaryLetters {
                thinker_key: "kant".into()
            }
        );
        let letters: Vec<&str> = t.render.buttons[0]
            .iter()
            .map(|b| b.label.as_str())
            .collect();
        assert_eq!(letters, vec!["А", "К"]);
    }

    #[test]
    fn test_glossary_letters_unknown_thinker() {
        let nav = test_navigator(40);
        let t = nav.handle(
            &SessionView::List,
            &Action::OpenGlossaryLetters("nobody".into()),
        );
        assert_eq!(t.view, SessionView::List);
        assert_eq!(t.error, Some(NavError::UnknownThinker("nobody".into())));
    }

    #[test]
    fn test_glossary_terms() {
        let nav = test_navigator(40);
        let from = SessionView::GlossaryLetters {
            thinker_key: "kant".into(),
        };
        let t = nav.handle(
            &from,
            &Action::OpenGlossaryTerms("kant".into(), "А".into()),
        );
        assert_eq!(
            t.view,
            SessionView::GlossaryTerms {
                thinker_key: "kant".into(),
                letter: "А".into()
            }
        );
        let text = t.render.text.to_plain();
        assert!(text.contains("Априори"));
        assert!(text.contains("Антиномия"));
    }

    #[test]
    fn test_glossary_terms_outside_letter_picker_is_stale() {
        let nav = test_navigator(40);
        let open_kant_a = Action::OpenGlossaryTerms("kant".into(), "А".into());
        let sources = [
            SessionView::List,
            SessionView::About,
            bio_view("kant", 0),
            SessionView::GlossaryLetters {
                thinker_key: "hegel".into(),
            },
            SessionView::GlossaryTerms {
                thinker_key: "kant".into(),
                letter: "К".into(),
            },
        ];
        for from in sources {
            let t = nav.handle(&from, &open_kant_a);
            assert_eq!(t.view, SessionView::List, "from {from:?}");
            assert_eq!(t.error, Some(NavError::StaleOrMissingSession));
            let notice = NavError::StaleOrMissingSession.user_message();
            assert!(t.render.text.to_plain().contains(notice));
        }
    }

    #[test]
    fn test_missing_letter_keeps_state_and_offers_way_back() {
        let nav = test_navigator(40);
        // kant has no "Я" at all; hegel files "Я" with an empty list
        for key in ["kant", "hegel"] {
            let from = SessionView::GlossaryLetters {
                thinker_key: key.into(),
            };
            let t = nav.handle(
                &from,
                &Action::OpenGlossaryTerms(key.into(), "Я".into()),
            );
            assert_eq!(t.view, from);
            assert!(matches!(t.error, Some(NavError::UnknownLetter { .. })));
            assert_eq!(
                t.render.text.to_plain(),
                "Термины на эту букву не найдены."
            );
            assert!(button_labels(&t.render).contains(&"← К буквам"));
        }
    }

    #[test]
    fn test_malformed_callback_recovers() {
        let nav = test_navigator(40);
        let t = nav.handle_callback(&bio_view("kant", 1), "bio_nav:up");
        assert_eq!(t.view, SessionView::List);
        assert!(matches!(t.error, Some(NavError::MalformedAction(_))));
    }

    #[test]
    fn test_callback_round_trip_through_buttons() {
        let nav = test_navigator(40);
        let t = nav.handle(&SessionView::List, &Action::OpenList);
        let kant = &t.render.buttons[0][0];
        let t = nav.handle_callback(&t.view, &kant.action.encode());
        assert_eq!(t.view, bio_view("kant", 0));
    }

    #[test]
    fn test_show_clamps_restored_page() {
        let nav = test_navigator(40);
        let last = nav.pages_count("kant").unwrap() - 1;
        let t = nav.show(&bio_view("kant", 10_000));
        assert_eq!(t.view, bio_view("kant", last));
    }

    #[test]
    fn test_show_restored_terms_with_vanished_letter() {
        let nav = test_navigator(40);
        let t = nav.show(&SessionView::GlossaryTerms {
            thinker_key: "kant".into(),
            letter: "Ж".into(),
        });
        assert_eq!(
            t.view,
            SessionView::GlossaryLetters {
                thinker_key: "kant".into()
            }
        );
    }

    #[test]
    fn test_every_page_reachable_in_order() {
        let nav = test_navigator(25);
        let store = test_store();
        let pages = paginate(&store.get("kant").unwrap().bio, 25);

        let mut view = nav.handle(&SessionView::List, &Action::OpenThinker("kant".into())).view;
        for (i, page) in pages.iter().enumerate() {
            let t = nav.show(&view);
            assert_eq!(t.view, bio_view("kant", i));
            assert!(t.render.text.to_plain().contains(page));
            view = nav.handle(&view, &Action::NavBio(Direction::Next)).view;
        }
    }
}
