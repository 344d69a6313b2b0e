use std::{io, path::PathBuf};

use crate::domain::ParseError;

/// Errors that can occur while collecting dependencies.
///
/// Any of these aborts the whole collection; no partial manifest is produced.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A file named by an include directive could not be opened.
    #[error("cannot resolve '{}' included from '{}'", .path.display(), .included_from.display())]
    FileResolution {
        /// The included path, resolved against the including file's directory.
        path: PathBuf,
        /// The file containing the include directive.
        included_from: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// A requirement line could not be parsed.
    #[error("{}:{line_number}: cannot parse requirement '{line}'", .path.display())]
    Parse {
        /// The file containing the line.
        path: PathBuf,
        /// The 1-based line number.
        line_number: usize,
        /// The offending line.
        line: String,
        /// Why parsing failed.
        #[source]
        source: ParseError,
    },

    /// A requirements file could not be read.
    #[error("failed to read '{}'", .path.display())]
    Io {
        /// The file being read.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// Include directives were nested deeper than the configured limit.
    #[error("includes nested deeper than {limit} levels at '{}'", .path.display())]
    IncludeDepthExceeded {
        /// The include that would have exceeded the limit.
        path: PathBuf,
        /// The configured limit.
        limit: usize,
    },
}
