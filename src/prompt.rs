//! Interactive candidate input.

use std::io::{self, BufRead, Write};

/// Prompt label written before reading the candidate.
pub(crate) const PROMPT: &str = "HASH: ";

/// Prompt for and read a single candidate line.
///
/// Returns an empty string at EOF so a closed stdin means no verification.
/// Invalid UTF-8 is replaced rather than rejected; such a line never matches.
pub(crate) fn read_candidate<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
) -> io::Result<String> {
    output.write_all(PROMPT.as_bytes())?;
    output.flush()?;
    let mut raw = Vec::new();
    input.read_until(b'\n', &mut raw)?;
    while matches!(raw.last(), Some(b'\n' | b'\r')) {
        raw.pop();
    }
    Ok(String::from_utf8_lossy(&raw).into_owned())
}
