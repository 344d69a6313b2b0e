use std::{
    fs::File,
    io::{self, BufRead, BufReader},
    path::Path,
};

use crate::domain::line::strip_comment;

/// One logical line of a requirements file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogicalLine {
    /// The 1-based number of the physical line the logical line starts on.
    pub number: usize,
    /// The line's text, with continuations joined.
    pub text: String,
}

/// Reads a requirements file into logical lines.
///
/// A physical line ending in `\` is joined with the line that follows it.
/// A `\` at the end of a comment is part of the comment, so comment lines
/// never continue.
/// The file is closed before returning, whether or not reading succeeded.
pub fn read_lines(path: &Path) -> io::Result<Vec<LogicalLine>> {
    let file = File::open(path)?;
    split_lines(BufReader::new(file))
}

fn split_lines<R: BufRead>(reader: R) -> io::Result<Vec<LogicalLine>> {
    let mut lines = Vec::new();
    let mut pending: Option<LogicalLine> = None;

    for (index, line) in reader.lines().enumerate() {
        let line = line?;
        let mut logical = pending.take().unwrap_or_else(|| LogicalLine {
            number: index + 1,
            text: String::new(),
        });

        if let Some(head) = strip_comment(&line).strip_suffix('\\') {
            logical.text.push_str(head);
            pending = Some(logical);
        } else {
            // keep a comment that ends a continuation separated from the text before it
            if !logical.text.is_empty() && line.trim_start().starts_with('#') {
                logical.text.push(' ');
            }
            logical.text.push_str(&line);
            lines.push(logical);
        }
    }

    // a continuation on the final line has nothing to join with
    lines.extend(pending);

    Ok(lines)
}
