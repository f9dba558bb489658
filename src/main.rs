//! Interactive front end: menu loop, analysis table and timed display.

use std::io::{self, BufRead, Write};
use std::time::Duration;

use pwd_generator::{GeneratedPassword, GenerationError, MAX_LENGTH, MIN_LENGTH, score_password};
use secrecy::ExposeSecret;

/// Environment variable holding the seconds a single password stays on screen.
const REVEAL_SECS_ENV: &str = "PWD_REVEAL_SECS";
const DEFAULT_REVEAL_SECS: u64 = 15;

/// Most passwords a single analysis table holds.
const MAX_COUNT: i64 = 1000;

const INDEX_WIDTH: usize = 5;
const LABEL_WIDTH: usize = 12;

fn main() -> io::Result<()> {
    #[cfg(feature = "tracing")]
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let stdin = io::stdin();
    let mut input = stdin.lock();
    let mut out = io::stdout();
    run(&mut input, &mut out, reveal_delay())
}

fn reveal_delay() -> Duration {
    let secs = std::env::var(REVEAL_SECS_ENV)
        .ok()
        .and_then(|raw| raw.trim().parse::<u64>().ok())
        .unwrap_or(DEFAULT_REVEAL_SECS);
    Duration::from_secs(secs)
}

#[cfg(feature = "async")]
fn generate(length: usize) -> Result<GeneratedPassword, GenerationError> {
    pwd_generator::generate_password(length, None)
}

#[cfg(not(feature = "async"))]
fn generate(length: usize) -> Result<GeneratedPassword, GenerationError> {
    pwd_generator::generate_password(length)
}

fn run<R: BufRead, W: Write>(input: &mut R, out: &mut W, reveal: Duration) -> io::Result<()> {
    writeln!(out, "--- Strict Password Generator ---")?;

    loop {
        writeln!(out, "\n--- Main Menu ---")?;
        writeln!(out, "1. Generate a single password")?;
        writeln!(out, "2. Generate and analyze a set of passwords")?;
        writeln!(out, "3. Exit")?;

        let Some(choice) = prompt(input, out, "Choose an option: ")? else {
            writeln!(out)?;
            return Ok(());
        };

        match choice.trim() {
            "1" => single_password(input, out, reveal)?,
            "2" => analyze_passwords(input, out)?,
            "3" => {
                writeln!(out, "Goodbye!")?;
                return Ok(());
            }
            _ => writeln!(out, "Invalid option. Please choose 1, 2 or 3.")?,
        }
    }
}

/// Prints `message` and reads one line. `None` at end of input.
fn prompt<R: BufRead, W: Write>(input: &mut R, out: &mut W, message: &str) -> io::Result<Option<String>> {
    write!(out, "{}", message)?;
    out.flush()?;

    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line))
}

fn parse_integer(line: &str) -> Option<i64> {
    line.trim().parse().ok()
}

/// Negative lengths are treated like any other length below the minimum.
fn to_length(n: i64) -> usize {
    usize::try_from(n).unwrap_or(0)
}

/// Writes an error and returns `false` when `length` is above [`MAX_LENGTH`].
fn check_max_length<W: Write>(out: &mut W, length: i64) -> io::Result<bool> {
    if to_length(length) > MAX_LENGTH {
        writeln!(
            out,
            "Error: the length must be at most {} characters.",
            MAX_LENGTH
        )?;
        return Ok(false);
    }
    Ok(true)
}

fn single_password<R: BufRead, W: Write>(input: &mut R, out: &mut W, reveal: Duration) -> io::Result<()> {
    let message = format!("Enter the desired password length (minimum {}): ", MIN_LENGTH);
    let Some(line) = prompt(input, out, &message)? else {
        return Ok(());
    };
    let Some(length) = parse_integer(&line) else {
        writeln!(out, "Error: please enter a valid number for the length.")?;
        return Ok(());
    };
    if !check_max_length(out, length)? {
        return Ok(());
    }

    let generated = match generate(to_length(length)) {
        Ok(generated) => generated,
        Err(e) => {
            writeln!(out, "Error: {}", e)?;
            return Ok(());
        }
    };

    if generated.length_adjusted() {
        writeln!(
            out,
            "Warning: password length was raised to the minimum of {} characters.",
            MIN_LENGTH
        )?;
    }
    writeln!(out, "\nGenerated password:")?;
    writeln!(out, "-> {} <-\n", generated.password().expose_secret())?;

    // Display timer only. Nothing is erased from the terminal or its scrollback.
    writeln!(
        out,
        "The password will be hidden in {} seconds (display timer only)...",
        reveal.as_secs()
    )?;
    out.flush()?;
    std::thread::sleep(reveal);
    drop(generated);
    writeln!(out, "\nPassword display timer elapsed.")?;
    Ok(())
}

fn analyze_passwords<R: BufRead, W: Write>(input: &mut R, out: &mut W) -> io::Result<()> {
    let Some(line) = prompt(input, out, "\nEnter the number of passwords to generate: ")? else {
        return Ok(());
    };
    let Some(count) = parse_integer(&line) else {
        writeln!(out, "Error: please enter a valid number.")?;
        return Ok(());
    };
    if count <= 0 {
        writeln!(out, "The number of passwords must be positive.")?;
        return Ok(());
    }
    if count > MAX_COUNT {
        writeln!(out, "The number of passwords must be at most {}.", MAX_COUNT)?;
        return Ok(());
    }

    let message = format!("Enter the password length (minimum {}): ", MIN_LENGTH);
    let Some(line) = prompt(input, out, &message)? else {
        return Ok(());
    };
    let Some(length) = parse_integer(&line) else {
        writeln!(out, "Error: please enter a valid number.")?;
        return Ok(());
    };
    if !check_max_length(out, length)? {
        return Ok(());
    }

    let length = to_length(length);
    let mut passwords = Vec::new();
    for _ in 0..count {
        match generate(length) {
            Ok(generated) => passwords.push(generated),
            Err(e) => {
                writeln!(out, "Error: {}", e)?;
                return Ok(());
            }
        }
    }

    if passwords.first().is_some_and(|g| g.length_adjusted()) {
        writeln!(
            out,
            "Warning: password length was raised to the minimum of {} characters.",
            MIN_LENGTH
        )?;
    }

    writeln!(out, "\n--- Password analysis table ---")?;
    write!(out, "{}", render_table(&passwords))?;
    Ok(())
}

/// Renders the `No. | Password | Complexity` table, one row per password.
fn render_table(passwords: &[GeneratedPassword]) -> String {
    let width = passwords
        .iter()
        .map(GeneratedPassword::length)
        .max()
        .unwrap_or(0)
        .max("Password".len());

    let mut table = format!(
        "{:<INDEX_WIDTH$} | {:<width$} | {}\n",
        "No.", "Password", "Complexity"
    );
    table.push_str(&"-".repeat(INDEX_WIDTH + 3 + width + 3 + LABEL_WIDTH));
    table.push('\n');

    for (i, generated) in passwords.iter().enumerate() {
        table.push_str(&format!(
            "{:<INDEX_WIDTH$} | {:<width$} | {}\n",
            i + 1,
            generated.password().expose_secret(),
            score_password(generated.password())
        ));
    }
    table
}
