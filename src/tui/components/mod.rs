//! # TUI Components
//!
//! ## Stateless Components (Props-Based Rendering)
//!
//! - `TitleBar`: top status bar showing the current view and status
//!
//! ## Stateful Components (Event-Driven)
//!
//! - `ButtonGrid`: the render's button rows, with keyboard selection
//!
//! Each component file holds its state type, rendering, event handling and
//! tests. Components receive external data as props rather than reading
//! shared state, which keeps them testable without a terminal.

pub mod button_grid;
pub mod title_bar;

pub use button_grid::{ButtonGrid, ButtonGridState};
pub use title_bar::TitleBar;
