//! Strict password generation library
//!
//! Generates passwords that follow a fixed set of structural rules and
//! labels passwords by character uniqueness.
//!
//! Every generated password:
//! - is at least 8 characters long (shorter requests are raised to 8)
//!   and at most 256
//! - starts with a lowercase letter
//! - never has more than two consecutive characters of the same category
//!   (lowercase, uppercase, digit, symbol)
//! - draws roughly a quarter of its characters from each category
//!
//! Candidates are built at random and rejected until one satisfies the run
//! rule, up to a configurable number of attempts.
//!
//! # Features
//!
//! - `async` (default): Enables cancellation support and channel delivery
//! - `tracing`: Enables logging via tracing crate
//!
//! # Environment Variables
//!
//! - `PWD_GEN_MAX_ATTEMPTS`: Fixed attempt cap for [`generate_password`]
//!   (default: derived from the length, at least 4096)
//!
//! # Randomness
//!
//! [`generate_password`] uses `rand::rng()`. [`PasswordGenerator::generate`]
//! accepts any `rand::Rng`, so callers can pass a seeded generator for
//! reproducible output or any `CryptoRng` when they want that guarantee
//! spelled out in the type.
//!
//! # Example
//!
//! ```rust,no_run
//! use pwd_generator::{generate_password, score_password};
//! use secrecy::ExposeSecret;
//!
//! #[cfg(feature = "async")]
//! let generated = generate_password(12, None).expect("generation failed");
//!
//! #[cfg(not(feature = "async"))]
//! let generated = generate_password(12).expect("generation failed");
//!
//! println!("Password: {}", generated.password().expose_secret());
//! println!("Complexity: {}", score_password(generated.password()));
//! ```

// Internal modules
mod category;
mod complexity;
mod config;
mod generator;
mod rules;

// Public API
pub use category::{CharacterCategory, DIGITS, LOWERCASE, SYMBOLS, UPPERCASE, classify};
pub use complexity::{ComplexityLabel, score_password};
pub use config::{ATTEMPT_FACTOR, GeneratorConfig, MAX_ATTEMPTS_ENV, MIN_ATTEMPTS};
pub use generator::{
    CategoryDistribution, GeneratedPassword, GenerationError, MAX_LENGTH, PasswordGenerator,
    generate_password,
};
pub use rules::{MAX_RUN, MIN_LENGTH, RuleViolation, check_password, first_violation, is_valid};

#[cfg(feature = "async")]
pub use generator::generate_password_tx;
