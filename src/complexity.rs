//! Complexity labels based on character uniqueness.

use std::collections::HashSet;
use std::fmt;

use secrecy::{ExposeSecret, SecretString};

/// Coarse complexity classification of a password.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ComplexityLabel {
    /// No character repeats, ignoring case.
    SuperStrong,
    /// At least one character repeats, ignoring case.
    Strong,
}

impl ComplexityLabel {
    /// Labels a plain password string.
    pub fn of(password: &str) -> Self {
        let unique: HashSet<char> = password.to_lowercase().chars().collect();
        if unique.len() == password.chars().count() {
            ComplexityLabel::SuperStrong
        } else {
            ComplexityLabel::Strong
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ComplexityLabel::SuperStrong => "Super Strong",
            ComplexityLabel::Strong => "Strong",
        }
    }
}

impl fmt::Display for ComplexityLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // pad() so width/alignment specifiers work in table output
        f.pad(self.as_str())
    }
}

/// Computes the complexity label of a password.
pub fn score_password(password: &SecretString) -> ComplexityLabel {
    ComplexityLabel::of(password.expose_secret())
}
