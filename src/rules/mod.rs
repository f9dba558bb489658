//! Structural password rules
//!
//! Each rule checks one part of the password invariant. A password
//! produced by the generator satisfies all of them.

mod first_char;
mod length;
mod run_length;

use secrecy::SecretString;
use thiserror::Error;

use crate::category::CharacterCategory;

pub use first_char::first_char_rule;
pub use length::length_rule;
pub use run_length::{first_violation, is_valid, run_length_rule};

/// Minimum number of characters in a password.
pub const MIN_LENGTH: usize = 8;

/// Longest allowed run of same-category characters.
pub const MAX_RUN: usize = 2;

/// A broken structural rule.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RuleViolation {
    #[error("Password must be at least {min} characters (got {actual})")]
    TooShort { min: usize, actual: usize },
    #[error("Password must start with a lowercase letter")]
    FirstCharNotLowercase,
    #[error("More than {max} consecutive {category} characters at position {position}", max = MAX_RUN)]
    CategoryRunTooLong {
        category: CharacterCategory,
        position: usize,
    },
}

/// Result type for rule functions.
/// - `Some(violation)` - Rule broken
/// - `None` - Rule satisfied
pub type RuleResult = Option<RuleViolation>;

/// Runs every rule against the password and collects the violations.
///
/// An empty vector means the password satisfies the full invariant.
pub fn check_password(password: &SecretString) -> Vec<RuleViolation> {
    let rules: [(&str, fn(&SecretString) -> RuleResult); 3] = [
        ("length", length_rule),
        ("first_char", first_char_rule),
        ("run_length", run_length_rule),
    ];

    let mut violations = Vec::new();
    for (rule_name, rule_fn) in rules {
        if let Some(violation) = rule_fn(password) {
            #[cfg(feature = "tracing")]
            tracing::debug!("Rule {} failed: {}", rule_name, violation);
            #[cfg(not(feature = "tracing"))]
            let _ = rule_name;
            violations.push(violation);
        }
    }
    violations
}
