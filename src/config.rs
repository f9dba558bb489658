//! Generator configuration.

/// Environment variable overriding [`GeneratorConfig::max_attempts`].
pub const MAX_ATTEMPTS_ENV: &str = "PWD_GEN_MAX_ATTEMPTS";

/// Floor of the length-derived attempt cap.
pub const MIN_ATTEMPTS: usize = 4096;

/// Multiple of the expected number of draws allowed before giving up.
pub const ATTEMPT_FACTOR: f64 = 32.0;

/// Lower bound on the share of candidates each extra character lets
/// through the run length rule.
const PER_CHAR_ACCEPTANCE: f64 = 0.948;

/// Settings for [`crate::PasswordGenerator`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GeneratorConfig {
    /// Fixed number of candidates drawn before generation gives up with
    /// [`crate::GenerationError::Exhausted`]. `None` derives the cap from
    /// the password length, see [`GeneratorConfig::attempts_for`].
    pub max_attempts: Option<usize>,
}

impl GeneratorConfig {
    /// Builds a configuration from the environment.
    ///
    /// Priority:
    /// 1. Environment variable `PWD_GEN_MAX_ATTEMPTS` (positive integer)
    /// 2. Length-derived cap
    ///
    /// Unparsable or zero values fall back to the derived cap.
    pub fn from_env() -> Self {
        let max_attempts = match std::env::var(MAX_ATTEMPTS_ENV) {
            Ok(raw) => {
                let parsed = parse_max_attempts(&raw);
                if parsed.is_none() {
                    #[cfg(feature = "tracing")]
                    tracing::warn!(
                        "Ignoring invalid {}={:?}, using the length-derived cap",
                        MAX_ATTEMPTS_ENV,
                        raw
                    );
                }
                parsed
            }
            Err(_) => None,
        };
        Self { max_attempts }
    }

    /// Attempt cap for passwords of `length` characters.
    ///
    /// Without a fixed cap this is [`ATTEMPT_FACTOR`] times a pessimistic
    /// estimate of the expected number of draws, and never below
    /// [`MIN_ATTEMPTS`].
    pub fn attempts_for(&self, length: usize) -> usize {
        self.max_attempts
            .unwrap_or_else(|| derived_attempts(length))
    }
}

fn derived_attempts(length: usize) -> usize {
    let expected = PER_CHAR_ACCEPTANCE.powf(-(length as f64));
    // float to int casts saturate
    ((ATTEMPT_FACTOR * expected).ceil() as usize).max(MIN_ATTEMPTS)
}

fn parse_max_attempts(raw: &str) -> Option<usize> {
    raw.trim().parse::<usize>().ok().filter(|&n| n > 0)
}
