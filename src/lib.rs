//! Pip-style requirements files as a packaging dependency manifest.
//!
//! [`Requirements`] finds the requirements files of a project, expands their
//! `-r` includes and reduces them to three lists: install requirements, test
//! requirements and dependency links.

pub mod domain;
pub use domain::{Config, Line, Operator, ParseError, Requirement, Specifier};

/// Discovery, include expansion and aggregation of requirements files.
pub mod storage;
pub use storage::{Dependencies, Error, Requirements, Scope};
