//! # Core Application Logic
//!
//! This module contains the browser's business logic.
//! It knows nothing about any specific UI technology.
//!
//! ```text
//!                    ┌─────────────────────────┐
//!                    │         CORE            │
//!                    │  (this module)          │
//!                    │                         │
//!                    │  • SessionView (state)  │
//!                    │  • Action (events)      │
//!                    │  • Navigator (reducer)  │
//!                    │  • Render (output)      │
//!                    │                         │
//!                    │  No terminal. No markup.│
//!                    └───────────┬─────────────┘
//!                                │
//!            ┌───────────────────┼───────────────────┐
//!            ▼                   ▼                   ▼
//!     ┌────────────┐      ┌────────────┐      ┌────────────┐
//!     │    TUI     │      │    Chat    │      │    Web     │
//!     │  Adapter   │      │   Adapter  │      │  (future)  │
//!     │ (ratatui)  │      │  (future)  │      │            │
//!     └────────────┘      └────────────┘      └────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`paginate`]: splitting long text into pages
//! - [`store`]: the read-only thinker catalog
//! - [`alphabet`]: glossary letter ordering
//! - [`state`]: `SessionView`, where a reader currently is
//! - [`action`]: the `Action` enum and its button codec
//! - [`render`]: text + buttons for each view
//! - [`navigator`]: the state machine
//! - [`session`]: per-session view storage
//! - [`dispatch`]: per-session serialization around the navigator
//! - [`config`]: settings resolution

pub mod action;
pub mod alphabet;
pub mod config;
pub mod dispatch;
pub mod navigator;
pub mod paginate;
pub mod render;
pub mod session;
pub mod state;
pub mod store;
