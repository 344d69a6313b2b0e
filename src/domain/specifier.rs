//! Version specifiers such as `>= 2.8.5`.

use std::{fmt, str::FromStr};

/// A version comparison operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
    /// `==`
    Equal,
    /// `!=`
    NotEqual,
    /// `>=`
    GreaterEqual,
    /// `<=`
    LessEqual,
    /// `~=`
    Compatible,
    /// `>`
    Greater,
    /// `<`
    Less,
}

impl Operator {
    /// Operators in matching order.
    ///
    /// Two-character operators come first so that `>=` is never read as `>`
    /// followed by a version starting with `=`.
    const ALL: [Self; 7] = [
        Self::Equal,
        Self::NotEqual,
        Self::GreaterEqual,
        Self::LessEqual,
        Self::Compatible,
        Self::Greater,
        Self::Less,
    ];

    /// Returns the textual form of the operator.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Equal => "==",
            Self::NotEqual => "!=",
            Self::GreaterEqual => ">=",
            Self::LessEqual => "<=",
            Self::Compatible => "~=",
            Self::Greater => ">",
            Self::Less => "<",
        }
    }

    /// Splits a leading operator off `s`, returning it with the remainder.
    ///
    /// Returns `None` if `s` does not start with a recognised operator.
    #[must_use]
    pub fn split_prefix(s: &str) -> Option<(Self, &str)> {
        Self::ALL
            .into_iter()
            .find_map(|op| s.strip_prefix(op.as_str()).map(|rest| (op, rest)))
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Operator {
    type Err = SpecifierError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match Self::split_prefix(s) {
            Some((op, "")) => Ok(op),
            _ => Err(SpecifierError::InvalidOperator(s.to_string())),
        }
    }
}

/// A single `(operator, version)` constraint.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Specifier {
    operator: Operator,
    version: String,
}

impl Specifier {
    /// Creates a specifier from its parts.
    #[must_use]
    pub const fn new(operator: Operator, version: String) -> Self {
        Self { operator, version }
    }

    /// The comparison operator.
    #[must_use]
    pub const fn operator(&self) -> Operator {
        self.operator
    }

    /// The version the operator compares against.
    #[must_use]
    pub fn version(&self) -> &str {
        &self.version
    }
}

impl fmt::Display for Specifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.operator, self.version)
    }
}

impl FromStr for Specifier {
    type Err = SpecifierError;

    /// Parses a clause such as `>=2.8.5` or `  <=  2.9.1 `.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let clause = s.trim();
        let (operator, rest) = Operator::split_prefix(clause)
            .ok_or_else(|| SpecifierError::InvalidOperator(clause.to_string()))?;

        let version = rest.trim();
        if version.is_empty() {
            return Err(SpecifierError::MissingVersion(clause.to_string()));
        }

        Ok(Self::from((operator, version)))
    }
}

impl From<(Operator, &str)> for Specifier {
    fn from((operator, version): (Operator, &str)) -> Self {
        Self::new(operator, version.to_string())
    }
}

/// Errors raised while parsing a single specifier clause.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum SpecifierError {
    /// The clause does not start with a known comparison operator.
    #[error("no version operator in '{0}'")]
    InvalidOperator(String),

    /// The operator is not followed by a version.
    #[error("missing version after operator in '{0}'")]
    MissingVersion(String),
}
