//! Line prompts on the command's input stream.

use anyhow::{Context, Result};
use std::io::{BufRead, Write};

/// Writes `question` and reads one line. `None` at end of input.
pub fn ask_line(input: &mut dyn BufRead, out: &mut dyn Write, question: &str) -> Result<Option<String>> {
    write!(out, "{question} ")?;
    out.flush()?;

    let mut line = String::new();
    let read = input.read_line(&mut line).context("reading from stdin")?;
    if read == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim().to_string()))
}

/// Asks a yes/no question; anything but `y`/`yes` is a no.
pub fn confirm(input: &mut dyn BufRead, out: &mut dyn Write, question: &str) -> Result<bool> {
    let answer = ask_line(input, out, &format!("{question} [y/N]"))?;
    Ok(matches!(
        answer.as_deref().map(str::to_lowercase).as_deref(),
        Some("y" | "yes")
    ))
}
