//! Expansion of `-r` include directives.
//!
//! Files are walked with an explicit stack rather than by recursion. Each
//! stack frame is an open file and its remaining lines. An include pushes a
//! new frame, so the included lines are visited as if they were inlined at
//! the directive. Every file is expanded at most once per [`Includes`].

use std::{
    collections::HashSet,
    io,
    path::{Path, PathBuf},
    vec,
};

use crate::{
    domain::Line,
    storage::{
        error::Error,
        reader::{read_lines, LogicalLine},
    },
};

/// Tracks visited files across the walks of a single scope.
#[derive(Debug)]
pub struct Includes {
    visited: HashSet<PathBuf>,
    max_depth: usize,
}

struct Frame {
    path: PathBuf,
    lines: vec::IntoIter<LogicalLine>,
}

impl Includes {
    #[must_use]
    pub fn new(max_depth: usize) -> Self {
        Self {
            visited: HashSet::new(),
            max_depth,
        }
    }

    /// Visits every line reachable from `root`, expanding include directives
    /// in place.
    ///
    /// `visit` receives the file a line came from, its line number, and the
    /// classified line. It never sees [`Line::Include`]. If `root` was already
    /// expanded by an earlier walk, nothing is visited.
    pub fn walk<F>(&mut self, root: &Path, mut visit: F) -> Result<(), Error>
    where
        F: FnMut(&Path, usize, Line<'_>) -> Result<(), Error>,
    {
        let Some(frame) = self.enter(root.to_path_buf(), None, 0)? else {
            return Ok(());
        };
        let mut stack = vec![frame];

        while let Some(frame) = stack.last_mut() {
            let Some(logical) = frame.lines.next() else {
                stack.pop();
                continue;
            };

            match Line::classify(&logical.text) {
                Line::Include(target) => {
                    let target = frame
                        .path
                        .parent()
                        .map_or_else(|| PathBuf::from(target), |dir| dir.join(target));
                    let including = frame.path.clone();

                    if let Some(child) = self.enter(target, Some(including), stack.len())? {
                        stack.push(child);
                    }
                }
                line => visit(&frame.path, logical.number, line)?,
            }
        }

        Ok(())
    }

    /// Opens `path` unless it was already visited.
    ///
    /// `depth` is the number of files currently open above it.
    fn enter(
        &mut self,
        path: PathBuf,
        included_from: Option<PathBuf>,
        depth: usize,
    ) -> Result<Option<Frame>, Error> {
        let canonical = match path.canonicalize() {
            Ok(canonical) => canonical,
            Err(source) => {
                return Err(match included_from {
                    Some(included_from) => Error::FileResolution {
                        path,
                        included_from,
                        source,
                    },
                    None => Error::Io { path, source },
                });
            }
        };

        if let Some(included_from) = included_from.filter(|_| !canonical.is_file()) {
            return Err(Error::FileResolution {
                path,
                included_from,
                source: io::Error::new(io::ErrorKind::InvalidInput, "not a regular file"),
            });
        }

        if !self.visited.insert(canonical) {
            tracing::debug!("Skipping already expanded file {}", path.display());
            return Ok(None);
        }

        if depth >= self.max_depth {
            return Err(Error::IncludeDepthExceeded {
                path,
                limit: self.max_depth,
            });
        }

        tracing::trace!("Reading requirements from {}", path.display());
        let lines = read_lines(&path).map_err(|source| Error::Io {
            path: path.clone(),
            source,
        })?;

        Ok(Some(Frame {
            path,
            lines: lines.into_iter(),
        }))
    }
}
