//! Character categories and the fixed alphabets they are drawn from.

use std::fmt;

/// ASCII lowercase letters.
pub const LOWERCASE: &[u8] = b"abcdefghijklmnopqrstuvwxyz";
/// ASCII uppercase letters.
pub const UPPERCASE: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ";
/// ASCII digits.
pub const DIGITS: &[u8] = b"0123456789";
/// The 32 ASCII punctuation characters.
pub const SYMBOLS: &[u8] = b"!\"#$%&'()*+,-./:;<=>?@[\\]^_`{|}~";

/// Category of a single password character.
///
/// `None` covers everything outside the four alphabets (whitespace,
/// non-ASCII letters, control characters, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CharacterCategory {
    Lowercase,
    Uppercase,
    Digit,
    Symbol,
    None,
}

impl CharacterCategory {
    /// Alphabet backing this category, `None` for the catch-all.
    pub fn alphabet(self) -> Option<&'static [u8]> {
        match self {
            CharacterCategory::Lowercase => Some(LOWERCASE),
            CharacterCategory::Uppercase => Some(UPPERCASE),
            CharacterCategory::Digit => Some(DIGITS),
            CharacterCategory::Symbol => Some(SYMBOLS),
            CharacterCategory::None => None,
        }
    }

    /// Whether characters of this category can form a run.
    pub fn forms_runs(self) -> bool {
        !matches!(self, CharacterCategory::None)
    }
}

impl fmt::Display for CharacterCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            CharacterCategory::Lowercase => "lowercase",
            CharacterCategory::Uppercase => "uppercase",
            CharacterCategory::Digit => "digit",
            CharacterCategory::Symbol => "symbol",
            CharacterCategory::None => "none",
        };
        f.write_str(name)
    }
}

/// Maps a character to its category.
pub fn classify(c: char) -> CharacterCategory {
    if c.is_ascii_lowercase() {
        CharacterCategory::Lowercase
    } else if c.is_ascii_uppercase() {
        CharacterCategory::Uppercase
    } else if c.is_ascii_digit() {
        CharacterCategory::Digit
    } else if c.is_ascii_punctuation() {
        CharacterCategory::Symbol
    } else {
        CharacterCategory::None
    }
}
