//! Glossary letter ordering.
//!
//! Letters are ranked by their position in the Russian alphabet. Anything
//! outside the table ranks after every known letter; ties keep their input
//! order because the sort is stable.

/// Uppercase Russian alphabet, in dictionary order.
pub const ALPHABET: [char; 33] = [
    'А', 'Б', 'В', 'Г', 'Д', 'Е', 'Ё', 'Ж', 'З', 'И', 'Й', 'К', 'Л', 'М', 'Н', 'О', 'П', 'Р', 'С',
    'Т', 'У', 'Ф', 'Х', 'Ц', 'Ч', 'Ш', 'Щ', 'Ъ', 'Ы', 'Ь', 'Э', 'Ю', 'Я',
];

/// Position of `letter` in [`ALPHABET`], or `ALPHABET.len()` for anything else
/// (multi-char keys, Latin letters, digits, lowercase).
pub fn letter_rank(letter: &str) -> usize {
    let mut chars = letter.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => ALPHABET
            .iter()
            .position(|&a| a == c)
            .unwrap_or(ALPHABET.len()),
        _ => ALPHABET.len(),
    }
}

/// Sort glossary letters into alphabetical order, unknown letters last.
pub fn sort_letters<S: AsRef<str>>(letters: &mut [S]) {
    letters.sort_by_key(|l| letter_rank(l.as_ref()));
}
