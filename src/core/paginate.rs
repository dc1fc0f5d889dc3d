//! # Paginator
//!
//! Splits long text into pages of at most `budget` characters, preferring to
//! break after a newline, then after a sentence (`". "`), and only then in the
//! middle of a line.
//!
//! ```text
//! |<------------- budget ------------->|
//! Line one.\nLine two is longer and ...
//!           ^ cut here (one past the last newline in the window)
//! ```
//!
//! Pages are borrowed slices of the input with boundary whitespace trimmed.
//! The untrimmed spans are contiguous, so nothing but that whitespace is lost.

/// Split `text` into trimmed pages of at most `budget` characters.
///
/// `budget` counts `char`s, not bytes. A budget of 0 is treated as 1.
/// Always returns at least one page; empty input yields a single empty page.
pub fn paginate(text: &str, budget: usize) -> Vec<&str> {
    spans(text, budget).into_iter().map(str::trim).collect()
}

/// Number of pages `paginate` would produce. Never 0.
pub fn page_count(text: &str, budget: usize) -> usize {
    spans(text, budget).len()
}

/// Untrimmed, contiguous spans covering all of `text`.
fn spans(text: &str, budget: usize) -> Vec<&str> {
    let budget = budget.max(1);
    let mut spans = Vec::new();
    let mut offset = 0;

    loop {
        let rest = &text[offset..];

        // Byte position of the first char past the window. None means the
        // remainder fits and becomes the last page.
        let Some((limit, _)) = rest.char_indices().nth(budget) else {
            spans.push(rest);
            break;
        };

        let len = break_point(&rest[..limit]).unwrap_or(limit);
        spans.push(&rest[..len]);
        offset += len;
    }

    spans
}

/// Length of the span ending at the last readable boundary in `window`.
/// Returns None when the window has no boundary that moves the cursor.
fn break_point(window: &str) -> Option<usize> {
    window
        .rfind('\n')
        .map(|i| i + 1)
        // The space stays with the next span and is trimmed there
        .or_else(|| window.rfind(". ").map(|i| i + 1))
        .filter(|&len| len > 0)
}
