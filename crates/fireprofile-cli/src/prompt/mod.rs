//! Line-based terminal collaborators: the profile selector shown for
//! unmatched URLs and the interactive config editor.
//!
//! Both read from any `BufRead` and write to any `Write`, so they run the
//! same against a terminal and against scripted input in tests.

mod editor;
mod selector;

pub use editor::ConfigEditor;
pub use selector::TerminalSelector;

use std::io::{self, BufRead, Write};

/// Print `label` and read one trimmed line; `None` at end of input
fn ask<R: BufRead, W: Write>(input: &mut R, output: &mut W, label: &str) -> io::Result<Option<String>> {
    write!(output, "{}", label)?;
    output.flush()?;

    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        writeln!(output)?;
        return Ok(None);
    }
    Ok(Some(line.trim().to_string()))
}

/// Interpret a yes/no answer, falling back to `default` for empty input
fn parse_yes_no(answer: &str, default: bool) -> Option<bool> {
    match answer.to_lowercase().as_str() {
        "" => Some(default),
        "y" | "yes" => Some(true),
        "n" | "no" => Some(false),
        _ => None,
    }
}
