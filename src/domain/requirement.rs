use std::{fmt, str::FromStr};

use non_empty_string::NonEmptyString;

use crate::domain::{
    line::strip_comment,
    specifier::{Specifier, SpecifierError},
};

/// A single package requirement, such as `requests>=2.8.5,<=2.9.1`.
///
/// The [`Display`](fmt::Display) implementation renders the canonical form
/// used in the dependency manifest: the name, followed by each specifier
/// separated by `, ` with a single space around every operator.
///
/// ```
/// use reqs::Requirement;
///
/// let requirement = Requirement::parse("requests<=2.9.1,>=2.8.5  # pinned").unwrap();
///
/// assert_eq!(requirement.name(), "requests");
/// assert_eq!(requirement.line(), "requests<=2.9.1,>=2.8.5");
/// assert_eq!(requirement.to_string(), "requests <= 2.9.1, >= 2.8.5");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Requirement {
    line: String,
    name: NonEmptyString,
    extras: Vec<String>,
    specs: Vec<Specifier>,
    marker: Option<String>,
}

impl Requirement {
    /// Parses a requirement from a single line of a requirements file.
    ///
    /// Trailing comments are removed before parsing. A `#` only starts a
    /// comment when it begins the line or follows whitespace.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - the line does not begin with a package name
    /// - an extras list is not closed
    /// - a version clause is not of the form `<op><version>`
    pub fn parse(raw: &str) -> Result<Self, ParseError> {
        let line = strip_comment(raw).trim();

        let name_len = line
            .find(|c: char| !is_name_char(c))
            .unwrap_or(line.len());
        let (name, rest) = line.split_at(name_len);
        let name = NonEmptyString::from_str(name)
            .map_err(|_| ParseError::MissingName(line.to_string()))?;

        let (extras, rest) = split_extras(rest.trim_start(), line)?;

        let (constraints, marker) = match rest.split_once(';') {
            Some((constraints, marker)) => (constraints, Some(marker.trim())),
            None => (rest, None),
        };

        let specs = if constraints.trim().is_empty() {
            Vec::new()
        } else {
            constraints
                .split(',')
                .map(Specifier::from_str)
                .collect::<Result<_, _>>()
                .map_err(|source| ParseError::InvalidSpecifier {
                    line: line.to_string(),
                    source,
                })?
        };

        Ok(Self {
            line: line.to_string(),
            name,
            extras,
            specs,
            marker: marker.filter(|m| !m.is_empty()).map(str::to_string),
        })
    }

    /// Builds the requirement implied by a dependency link's `#egg=` fragment.
    ///
    /// The requirement carries no version constraints.
    #[must_use]
    pub fn from_egg(link: &str, name: NonEmptyString) -> Self {
        Self {
            line: link.to_string(),
            name,
            extras: Vec::new(),
            specs: Vec::new(),
            marker: None,
        }
    }

    /// The source text, trimmed and without its comment.
    #[must_use]
    pub fn line(&self) -> &str {
        &self.line
    }

    /// The package name.
    #[must_use]
    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    /// Optional features requested in square brackets after the name.
    #[must_use]
    pub fn extras(&self) -> &[String] {
        &self.extras
    }

    /// Version constraints, in the order they appeared.
    #[must_use]
    pub fn specs(&self) -> &[Specifier] {
        &self.specs
    }

    /// The environment marker following `;`, if any.
    #[must_use]
    pub fn marker(&self) -> Option<&str> {
        self.marker.as_deref()
    }
}

impl fmt::Display for Requirement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name.as_str())?;

        if !self.extras.is_empty() {
            write!(f, "[{}]", self.extras.join(","))?;
        }

        for (i, spec) in self.specs.iter().enumerate() {
            let separator = if i == 0 { " " } else { ", " };
            write!(f, "{separator}{spec}")?;
        }

        if let Some(marker) = &self.marker {
            write!(f, "; {marker}")?;
        }

        Ok(())
    }
}

impl FromStr for Requirement {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// Returns `true` if `c` may appear in a package name.
pub(crate) const fn is_name_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-')
}

fn split_extras<'a>(rest: &'a str, line: &str) -> Result<(Vec<String>, &'a str), ParseError> {
    let Some(inner) = rest.strip_prefix('[') else {
        return Ok((Vec::new(), rest));
    };

    let (extras, rest) = inner
        .split_once(']')
        .ok_or_else(|| ParseError::UnclosedExtras(line.to_string()))?;

    let extras = extras
        .split(',')
        .map(str::trim)
        .filter(|extra| !extra.is_empty())
        .map(str::to_string)
        .collect();

    Ok((extras, rest))
}

/// Errors that can occur when parsing a requirement line.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ParseError {
    /// The line does not start with a package name.
    #[error("no package name found in '{0}'")]
    MissingName(String),

    /// An opening `[` has no matching `]`.
    #[error("unclosed extras list in '{0}'")]
    UnclosedExtras(String),

    /// A version clause could not be parsed.
    #[error("invalid version specifier in '{line}'")]
    InvalidSpecifier {
        /// The offending line.
        line: String,
        /// The underlying clause error.
        #[source]
        source: SpecifierError,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::specifier::Operator;

    #[test]
    fn parses_name_specs_and_strips_comment() {
        let requirement = Requirement::parse("  requests==2.9.1,>=2.8.1 # jambon").unwrap();

        assert_eq!(requirement.line(), "requests==2.9.1,>=2.8.1");
        assert_eq!(requirement.name(), "requests");
        assert_eq!(
            requirement.specs(),
            &[
                Specifier::from((Operator::Equal, "2.9.1")),
                Specifier::from((Operator::GreaterEqual, "2.8.1")),
            ]
        );
    }

    #[test]
    fn bare_name_renders_as_name() {
        let requirement = Requirement::parse("boto").unwrap();
        assert!(requirement.specs().is_empty());
        assert_eq!(requirement.to_string(), "boto");
    }

    #[test]
    fn internal_whitespace_is_normalised() {
        let requirement = Requirement::parse("requests   <=  2.9.1 , >=2.8.5").unwrap();
        assert_eq!(requirement.to_string(), "requests <= 2.9.1, >= 2.8.5");
    }

    #[test]
    fn rendering_is_stable_under_reparsing() {
        for line in [
            "requests==2.9.1",
            "Django>=1.8,<1.9,!=1.8.3 # lts",
            "zope.interface~=4.1",
            "flake8",
        ] {
            let rendered = Requirement::parse(line).unwrap().to_string();
            let reparsed = Requirement::parse(&rendered).unwrap().to_string();
            assert_eq!(rendered, reparsed);
        }
    }

    #[test]
    fn keeps_extras_and_marker() {
        let requirement =
            Requirement::parse("requests[security, socks]>=2.8; python_version < \"3\"").unwrap();

        assert_eq!(requirement.name(), "requests");
        assert_eq!(requirement.extras(), &["security", "socks"]);
        assert_eq!(requirement.marker(), Some("python_version < \"3\""));
        assert_eq!(
            requirement.to_string(),
            "requests[security,socks] >= 2.8; python_version < \"3\""
        );
    }

    #[test]
    fn hash_inside_word_is_not_a_comment() {
        let error = Requirement::parse("foo#bar").unwrap_err();
        assert!(matches!(error, ParseError::InvalidSpecifier { .. }));
    }

    #[test]
    fn missing_name_is_rejected() {
        assert_eq!(
            Requirement::parse(">=1.0"),
            Err(ParseError::MissingName(">=1.0".to_string()))
        );
    }

    #[test]
    fn unclosed_extras_is_rejected() {
        assert_eq!(
            Requirement::parse("requests[security"),
            Err(ParseError::UnclosedExtras("requests[security".to_string()))
        );
    }

    #[test]
    fn trailing_garbage_is_rejected() {
        let error = Requirement::parse("requests 2.9.1").unwrap_err();
        assert!(matches!(
            error,
            ParseError::InvalidSpecifier {
                source: SpecifierError::InvalidOperator(_),
                ..
            }
        ));
    }

    #[test]
    fn egg_requirement_has_no_specs() {
        let link = "git+https://host/repo.git@master#egg=requests";
        let requirement = Requirement::from_egg(link, NonEmptyString::from_str("requests").unwrap());

        assert_eq!(requirement.line(), link);
        assert_eq!(requirement.to_string(), "requests");
    }
}
