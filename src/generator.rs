//! Password generator - builds balanced candidates and rejects those
//! breaking the run length rule.

use rand::Rng;
use rand::seq::SliceRandom;
use secrecy::SecretString;
use thiserror::Error;

#[cfg(feature = "async")]
use tokio::sync::mpsc;

#[cfg(feature = "async")]
use tokio_util::sync::CancellationToken;

use crate::category::{DIGITS, LOWERCASE, SYMBOLS, UPPERCASE};
use crate::config::GeneratorConfig;
use crate::rules::{MIN_LENGTH, is_valid};

/// Longest password the generator accepts.
///
/// Acceptance of a candidate falls off geometrically with its length, so
/// far longer requests would need millions of draws.
pub const MAX_LENGTH: usize = 256;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GenerationError {
    #[error("Password length {requested} exceeds the maximum of {max} characters")]
    LengthTooLong { requested: usize, max: usize },
    #[error("No valid password found after {0} attempts")]
    Exhausted(usize),
    #[error("Password generation cancelled")]
    Cancelled,
}

/// Number of characters drawn from each alphabet for a given length.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CategoryDistribution {
    pub lowercase: usize,
    pub uppercase: usize,
    pub digit: usize,
    pub symbol: usize,
}

impl CategoryDistribution {
    /// Splits `length` as evenly as possible, the remainder going to
    /// lowercase, then uppercase, then digits.
    pub fn for_length(length: usize) -> Self {
        let base = length / 4;
        let rem = length % 4;
        Self {
            lowercase: base + usize::from(rem > 0),
            uppercase: base + usize::from(rem > 1),
            digit: base + usize::from(rem > 2),
            symbol: base,
        }
    }

    pub fn total(&self) -> usize {
        self.lowercase + self.uppercase + self.digit + self.symbol
    }
}

/// A password returned by the generator.
///
/// The text is only reachable through [`GeneratedPassword::password`];
/// `Debug` output is redacted.
#[derive(Debug)]
pub struct GeneratedPassword {
    password: SecretString,
    requested_length: usize,
    length: usize,
}

impl GeneratedPassword {
    pub fn password(&self) -> &SecretString {
        &self.password
    }

    pub fn into_secret(self) -> SecretString {
        self.password
    }

    /// Length asked for by the caller, before clamping.
    pub fn requested_length(&self) -> usize {
        self.requested_length
    }

    /// Length of the password in characters.
    pub fn length(&self) -> usize {
        self.length
    }

    /// `true` when the requested length was below the minimum and got
    /// raised to it.
    pub fn length_adjusted(&self) -> bool {
        self.length != self.requested_length
    }
}

/// Generates passwords from an injected random source.
#[derive(Debug, Clone, Default)]
pub struct PasswordGenerator {
    config: GeneratorConfig,
}

impl PasswordGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: GeneratorConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// Generates a password of `requested_length` characters, or
    /// [`MIN_LENGTH`] if less was requested.
    ///
    /// # Errors
    ///
    /// - [`GenerationError::LengthTooLong`] above [`MAX_LENGTH`]
    /// - [`GenerationError::Exhausted`] if no candidate passes the run
    ///   length rule within [`GeneratorConfig::attempts_for`] draws
    pub fn generate<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        requested_length: usize,
    ) -> Result<GeneratedPassword, GenerationError> {
        self.generate_until(rng, requested_length, || false)
    }

    /// Like [`PasswordGenerator::generate`], checking `token` before each
    /// attempt.
    #[cfg(feature = "async")]
    pub fn generate_cancellable<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        requested_length: usize,
        token: &CancellationToken,
    ) -> Result<GeneratedPassword, GenerationError> {
        self.generate_until(rng, requested_length, || token.is_cancelled())
    }

    fn generate_until<R, C>(
        &self,
        rng: &mut R,
        requested_length: usize,
        is_cancelled: C,
    ) -> Result<GeneratedPassword, GenerationError>
    where
        R: Rng + ?Sized,
        C: Fn() -> bool,
    {
        let length = requested_length.max(MIN_LENGTH);
        if length != requested_length {
            #[cfg(feature = "tracing")]
            tracing::warn!(
                "Password length adjusted from {} to the minimum of {}",
                requested_length,
                length
            );
        }
        if length > MAX_LENGTH {
            return Err(GenerationError::LengthTooLong {
                requested: requested_length,
                max: MAX_LENGTH,
            });
        }

        let distribution = CategoryDistribution::for_length(length);
        let max_attempts = self.config.attempts_for(length);
        let candidate = retry_until_valid(max_attempts, is_cancelled, || {
            build_candidate(&mut *rng, &distribution)
        })?;

        Ok(GeneratedPassword {
            password: SecretString::new(candidate.into()),
            requested_length,
            length,
        })
    }
}

/// Draws candidates until one passes the run length rule.
fn retry_until_valid<C, F>(
    max_attempts: usize,
    is_cancelled: C,
    mut candidate: F,
) -> Result<String, GenerationError>
where
    C: Fn() -> bool,
    F: FnMut() -> String,
{
    for attempt in 1..=max_attempts {
        if is_cancelled() {
            #[cfg(feature = "tracing")]
            tracing::info!("Password generation cancelled before attempt {}", attempt);
            return Err(GenerationError::Cancelled);
        }

        let password = candidate();
        if is_valid(&password) {
            #[cfg(feature = "tracing")]
            tracing::debug!("Password accepted after {} attempt(s)", attempt);
            #[cfg(not(feature = "tracing"))]
            let _ = attempt;
            return Ok(password);
        }
    }

    #[cfg(feature = "tracing")]
    tracing::error!("No valid password after {} attempts", max_attempts);
    Err(GenerationError::Exhausted(max_attempts))
}

/// Builds one unchecked candidate of exactly `distribution.total()` chars.
///
/// The forced lowercase first character replaces a randomly removed one,
/// so the final composition may differ from `distribution` by one
/// character.
fn build_candidate<R: Rng + ?Sized>(rng: &mut R, distribution: &CategoryDistribution) -> String {
    let mut chars: Vec<char> = Vec::with_capacity(distribution.total() + 1);
    for (alphabet, count) in [
        (LOWERCASE, distribution.lowercase),
        (UPPERCASE, distribution.uppercase),
        (DIGITS, distribution.digit),
        (SYMBOLS, distribution.symbol),
    ] {
        chars.extend((0..count).map(|_| pick(&mut *rng, alphabet)));
    }
    chars.shuffle(rng);

    chars.insert(0, pick(rng, LOWERCASE));
    let removed = rng.random_range(1..chars.len());
    chars.remove(removed);

    chars.into_iter().collect()
}

fn pick<R: Rng + ?Sized>(rng: &mut R, alphabet: &[u8]) -> char {
    alphabet[rng.random_range(0..alphabet.len())] as char
}

/// Generates a password using the thread-local random generator and the
/// environment configuration.
///
/// # Arguments
/// * `length` - Requested length; values below 8 are raised to 8
/// * `token` - Optional cancellation token (async feature only)
pub fn generate_password(
    length: usize,
    #[cfg(feature = "async")] token: Option<CancellationToken>,
) -> Result<GeneratedPassword, GenerationError> {
    let generator = PasswordGenerator::with_config(GeneratorConfig::from_env());
    let mut rng = rand::rng();

    #[cfg(feature = "async")]
    {
        if let Some(ref t) = token {
            return generator.generate_cancellable(&mut rng, length, t);
        }
    }

    generator.generate(&mut rng, length)
}

/// Async version that sends the generation result via channel.
#[cfg(feature = "async")]
pub async fn generate_password_tx(
    length: usize,
    token: CancellationToken,
    tx: mpsc::Sender<Result<GeneratedPassword, GenerationError>>,
) {
    #[cfg(feature = "tracing")]
    tracing::info!("password generation is about to start...");

    let result = generate_password(length, Some(token));

    if let Err(e) = tx.send(result).await {
        #[cfg(feature = "tracing")]
        tracing::error!("Failed to send generated password: {}", e);
        #[cfg(not(feature = "tracing"))]
        let _ = e;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::category::{CharacterCategory, classify};
    use crate::rules::check_password;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use secrecy::ExposeSecret;
    use serial_test::serial;

    const TEST_SEED: u64 = 42;

    fn composition(password: &str) -> CategoryDistribution {
        let mut counts = CategoryDistribution {
            lowercase: 0,
            uppercase: 0,
            digit: 0,
            symbol: 0,
        };
        for c in password.chars() {
            match classify(c) {
                CharacterCategory::Lowercase => counts.lowercase += 1,
                CharacterCategory::Uppercase => counts.uppercase += 1,
                CharacterCategory::Digit => counts.digit += 1,
                CharacterCategory::Symbol => counts.symbol += 1,
                CharacterCategory::None => panic!("unexpected char {:?}", c),
            }
        }
        counts
    }

    #[test]
    fn test_distribution_for_small_lengths() {
        let expected = [
            (8, (2, 2, 2, 2)),
            (9, (3, 2, 2, 2)),
            (10, (3, 3, 2, 2)),
            (11, (3, 3, 3, 2)),
            (12, (3, 3, 3, 3)),
        ];
        for (length, (l, u, d, s)) in expected {
            let dist = CategoryDistribution::for_length(length);
            assert_eq!(
                dist,
                CategoryDistribution {
                    lowercase: l,
                    uppercase: u,
                    digit: d,
                    symbol: s,
                },
                "length {}",
                length
            );
        }
    }

    #[test]
    fn test_distribution_sums_to_length() {
        for length in 0..200 {
            assert_eq!(CategoryDistribution::for_length(length).total(), length);
        }
    }

    #[test]
    fn test_generate_exact_length_and_invariants() {
        let generator = PasswordGenerator::new();
        let mut rng = StdRng::seed_from_u64(TEST_SEED);

        for length in 8..=64 {
            for _ in 0..50 {
                let generated = generator.generate(&mut rng, length).unwrap();
                let pwd = generated.password().expose_secret();

                assert_eq!(pwd.chars().count(), length);
                assert_eq!(generated.length(), length);
                assert!(!generated.length_adjusted());
                assert!(pwd.chars().next().is_some_and(|c| c.is_ascii_lowercase()));
                assert!(is_valid(pwd), "invalid password {:?}", pwd);
                assert!(check_password(generated.password()).is_empty());
            }
        }
    }

    #[test]
    fn test_generate_short_length_is_clamped() {
        let generator = PasswordGenerator::new();
        let mut rng = StdRng::seed_from_u64(TEST_SEED);

        for requested in 0..8 {
            let generated = generator.generate(&mut rng, requested).unwrap();
            assert_eq!(generated.password().expose_secret().chars().count(), 8);
            assert_eq!(generated.requested_length(), requested);
            assert_eq!(generated.length(), 8);
            assert!(generated.length_adjusted());
        }
    }

    #[test]
    fn test_thousand_passwords_of_twelve_are_valid() {
        let generator = PasswordGenerator::new();
        let mut rng = StdRng::seed_from_u64(TEST_SEED);

        let valid = (0..1000)
            .map(|_| generator.generate(&mut rng, 12).unwrap())
            .filter(|g| is_valid(g.password().expose_secret()))
            .count();
        assert_eq!(valid, 1000);
    }

    #[test]
    fn test_same_seed_same_password() {
        let generator = PasswordGenerator::new();
        let mut first = StdRng::seed_from_u64(7);
        let mut second = StdRng::seed_from_u64(7);

        let a = generator.generate(&mut first, 20).unwrap();
        let b = generator.generate(&mut second, 20).unwrap();
        assert_eq!(a.password().expose_secret(), b.password().expose_secret());
    }

    #[test]
    fn test_candidate_composition_is_off_by_at_most_one() {
        let mut rng = StdRng::seed_from_u64(TEST_SEED);

        for length in [8, 9, 10, 11, 16, 33] {
            let dist = CategoryDistribution::for_length(length);
            for _ in 0..200 {
                let candidate = build_candidate(&mut rng, &dist);
                assert_eq!(candidate.chars().count(), length);
                assert!(candidate.starts_with(|c: char| c.is_ascii_lowercase()));

                let got = composition(&candidate);
                assert!(got.lowercase == dist.lowercase || got.lowercase == dist.lowercase + 1);
                for (g, d) in [
                    (got.uppercase, dist.uppercase),
                    (got.digit, dist.digit),
                    (got.symbol, dist.symbol),
                ] {
                    assert!(g == d || g + 1 == d, "got {:?} for {:?}", got, dist);
                }
                assert_eq!(got.total(), length);
            }
        }
    }

    #[test]
    fn test_retry_exhausted() {
        let mut calls = 0;
        let result = retry_until_valid(5, || false, || {
            calls += 1;
            "aaa".to_string()
        });
        assert_eq!(result, Err(GenerationError::Exhausted(5)));
        assert_eq!(calls, 5);
    }

    #[test]
    fn test_retry_accepts_first_valid() {
        let mut candidates = vec!["ab", "!!!", "AAAA"];
        let result = retry_until_valid(10, || false, || {
            candidates.pop().unwrap_or("zzz").to_string()
        });
        assert_eq!(result, Ok("ab".to_string()));
    }

    #[test]
    fn test_retry_cancelled_before_first_attempt() {
        let mut calls = 0;
        let result = retry_until_valid(10, || true, || {
            calls += 1;
            "ab".to_string()
        });
        assert_eq!(result, Err(GenerationError::Cancelled));
        assert_eq!(calls, 0);
    }

    #[test]
    fn test_zero_attempt_cap_exhausts() {
        let generator = PasswordGenerator::with_config(GeneratorConfig { max_attempts: Some(0) });
        let mut rng = StdRng::seed_from_u64(TEST_SEED);
        assert_eq!(
            generator.generate(&mut rng, 12).unwrap_err(),
            GenerationError::Exhausted(0)
        );
    }

    #[test]
    fn test_generate_long_lengths() {
        let generator = PasswordGenerator::new();
        let mut rng = StdRng::seed_from_u64(TEST_SEED);

        for (length, trials) in [(96, 10), (128, 10), (200, 3), (MAX_LENGTH, 1)] {
            for _ in 0..trials {
                let generated = generator
                    .generate(&mut rng, length)
                    .unwrap_or_else(|e| panic!("length {}: {}", length, e));
                let pwd = generated.password().expose_secret();

                assert_eq!(pwd.chars().count(), length);
                assert!(pwd.starts_with(|c: char| c.is_ascii_lowercase()));
                assert!(is_valid(pwd));
            }
        }
    }

    #[test]
    fn test_length_above_maximum_is_rejected() {
        let generator = PasswordGenerator::new();
        let mut rng = StdRng::seed_from_u64(TEST_SEED);

        for requested in [MAX_LENGTH + 1, 1_000_000, usize::MAX] {
            assert_eq!(
                generator.generate(&mut rng, requested).unwrap_err(),
                GenerationError::LengthTooLong {
                    requested,
                    max: MAX_LENGTH,
                }
            );
        }
        assert_eq!(
            GenerationError::LengthTooLong { requested: 300, max: 256 }.to_string(),
            "Password length 300 exceeds the maximum of 256 characters"
        );
    }

    #[test]
    fn test_debug_output_is_redacted() {
        let mut rng = StdRng::seed_from_u64(TEST_SEED);
        let generated = PasswordGenerator::new().generate(&mut rng, 16).unwrap();
        let debug = format!("{:?}", generated);
        assert!(!debug.contains(generated.password().expose_secret()));
    }

    #[test]
    #[serial]
    fn test_generate_password_thread_rng() {
        unsafe { std::env::remove_var(crate::config::MAX_ATTEMPTS_ENV); }

        #[cfg(feature = "async")]
        let generated = generate_password(5, None).unwrap();

        #[cfg(not(feature = "async"))]
        let generated = generate_password(5).unwrap();

        assert!(generated.length_adjusted());
        assert_eq!(generated.password().expose_secret().chars().count(), 8);
        assert!(check_password(generated.password()).is_empty());
    }
}

#[cfg(all(test, feature = "async"))]
mod async_tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use secrecy::ExposeSecret;
    use serial_test::serial;

    #[tokio::test]
    #[serial]
    async fn test_generate_with_cancellation() {
        let token = CancellationToken::new();
        token.cancel();

        let result = generate_password(16, Some(token));
        assert_eq!(result.unwrap_err(), GenerationError::Cancelled);
    }

    #[tokio::test]
    #[serial]
    async fn test_generate_without_cancellation() {
        let token = CancellationToken::new();
        let mut rng = StdRng::seed_from_u64(3);

        let generated = PasswordGenerator::new()
            .generate_cancellable(&mut rng, 16, &token)
            .unwrap();
        assert_eq!(generated.length(), 16);
    }

    #[tokio::test]
    #[serial]
    async fn test_generate_password_tx() {
        let (tx, mut rx) = mpsc::channel(1);
        let token = CancellationToken::new();

        generate_password_tx(10, token, tx).await;

        let generated = rx
            .recv()
            .await
            .expect("Should receive generation result")
            .expect("Generation should succeed");
        assert_eq!(generated.password().expose_secret().chars().count(), 10);
    }

    #[tokio::test]
    #[serial]
    async fn test_generate_password_tx_closed_receiver() {
        let (tx, rx) = mpsc::channel(1);
        drop(rx);

        // must not panic when nobody listens
        generate_password_tx(10, CancellationToken::new(), tx).await;
    }
}
