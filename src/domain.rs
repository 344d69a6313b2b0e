//! Domain models for requirements files.
//!
//! This module contains the line-level types: parsed requirements, version
//! specifiers, line classification and configuration.

/// Requirement line parsing and canonical rendering.
pub mod requirement;
pub use requirement::{ParseError, Requirement};

mod config;
pub use config::Config;

pub mod line;
pub use line::Line;

/// Version operators and `(operator, version)` constraints.
pub mod specifier;
pub use specifier::{Operator, Specifier, SpecifierError};
