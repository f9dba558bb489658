//! First character rule.

use secrecy::{ExposeSecret, SecretString};

use super::{RuleResult, RuleViolation};
use crate::category::{CharacterCategory, classify};

/// Checks that the password starts with a lowercase letter.
pub fn first_char_rule(password: &SecretString) -> RuleResult {
    match password.expose_secret().chars().next().map(classify) {
        Some(CharacterCategory::Lowercase) => None,
        _ => Some(RuleViolation::FirstCharNotLowercase),
    }
}
