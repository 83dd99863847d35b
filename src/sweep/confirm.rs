/// Interactive confirmation before an expensive sweep.
use std::io::{self, BufRead, Write};

/// Ask whether to run `iterations` simulations.
///
/// Only an answer starting with `n` or `N` declines; an empty line or end of
/// input accepts.
///
/// # Errors
///
/// Returns any I/O error from reading the answer or writing the prompt.
pub fn confirm<R: BufRead, W: Write>(input: &mut R, out: &mut W, iterations: usize) -> io::Result<bool> {
    writeln!(out)?;
    writeln!(out, "Model testing will take {iterations} iterations.")?;
    writeln!(
        out,
        "Each iteration can take up to an hour, and the output files can be up to a few GB, \
         depending on the type of model and dataset used."
    )?;
    write!(out, "Are you sure you would like to continue? [Yn] ")?;
    out.flush()?;

    let mut answer = String::new();
    input.read_line(&mut answer)?;
    Ok(!answer.trim_start().to_lowercase().starts_with('n'))
}
