//! Run length rule - no more than two consecutive characters of one category.

use secrecy::{ExposeSecret, SecretString};

use super::{MAX_RUN, RuleResult, RuleViolation};
use crate::category::{CharacterCategory, classify};

/// Finds the first run longer than [`MAX_RUN`].
///
/// Returns the run's category and the char index at which it became too
/// long. Characters classified as [`CharacterCategory::None`] never extend
/// a run.
pub fn first_violation(password: &str) -> Option<(CharacterCategory, usize)> {
    let mut previous = CharacterCategory::None;
    let mut count = 0usize;

    for (position, c) in password.chars().enumerate() {
        let current = classify(c);
        if current.forms_runs() && current == previous {
            count += 1;
            if count > MAX_RUN {
                return Some((current, position));
            }
        } else {
            count = 1;
        }
        previous = current;
    }
    None
}

/// Returns `true` when no category run exceeds [`MAX_RUN`].
///
/// The empty password is valid.
pub fn is_valid(password: &str) -> bool {
    first_violation(password).is_none()
}

/// Rule wrapper over [`first_violation`].
pub fn run_length_rule(password: &SecretString) -> RuleResult {
    first_violation(password.expose_secret())
        .map(|(category, position)| RuleViolation::CategoryRunTooLong { category, position })
}
