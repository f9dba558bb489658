//! Length rule - checks password minimum length.

use secrecy::{ExposeSecret, SecretString};

use super::{MIN_LENGTH, RuleResult, RuleViolation};

/// Checks if the password has at least [`MIN_LENGTH`] characters.
pub fn length_rule(password: &SecretString) -> RuleResult {
    let actual = password.expose_secret().chars().count();
    if actual < MIN_LENGTH {
        return Some(RuleViolation::TooShort {
            min: MIN_LENGTH,
            actual,
        });
    }
    None
}
