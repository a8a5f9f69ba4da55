//! CLI command implementations.

mod capsule;
mod signin;
mod signup;

pub use capsule::capsule_create;
pub use signin::signin;
pub use signup::signup;

use anyhow::bail;
use form_schema::FieldError;
use std::io::{self, BufRead, Write};

/// Read one trimmed line, failing when the input has been closed so
/// interactive loops terminate instead of re-prompting forever.
fn read_trimmed_line(reader: &mut impl BufRead) -> anyhow::Result<String> {
    let mut input = String::new();
    if reader.read_line(&mut input)? == 0 {
        bail!("input closed");
    }
    Ok(input.trim().to_string())
}

/// Prompt on stdout and read one trimmed line from stdin.
pub(crate) fn prompt_line(label: &str) -> anyhow::Result<String> {
    print!("{}", label);
    io::stdout().flush()?;
    read_trimmed_line(&mut io::stdin().lock())
}

/// Print validation failures one per line.
pub(crate) fn print_field_errors(errors: &[FieldError]) {
    for error in errors {
        eprintln!("  {}: {}", error.field, error.message);
    }
}
