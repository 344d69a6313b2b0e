//! Aggregation of requirements files into a dependency manifest.
//!
//! [`Requirements`] is the entry point of the crate. It locates the primary
//! files of a project, expands their includes, and partitions what it finds
//! into install requirements, test requirements and dependency links.

use std::{
    cell::OnceCell,
    fmt,
    path::{Path, PathBuf},
};

use indexmap::IndexSet;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::{
    domain::{Config, Line, Requirement},
    storage::{discovery, error::Error, includes::Includes},
};

/// The name of the optional configuration file in the project root.
pub const CONFIG_FILE: &str = "reqs.toml";

/// The dependency manifest produced by [`Requirements::dependencies`].
///
/// Serializes to a mapping with exactly the keys `install_requires`,
/// `tests_require` and `dependency_links`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dependencies {
    /// Canonical requirement strings needed at install time.
    pub install_requires: Vec<String>,
    /// Canonical requirement strings needed to run the tests.
    pub tests_require: Vec<String>,
    /// VCS and direct URL references, for use by an installer.
    pub dependency_links: Vec<String>,
}

impl Dependencies {
    /// Returns the requirement strings of the given scope.
    #[must_use]
    pub fn requirements(&self, scope: Scope) -> &[String] {
        match scope {
            Scope::Install => &self.install_requires,
            Scope::Tests => &self.tests_require,
        }
    }

    /// Renders the manifest as pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

/// The partition a requirements file contributes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Scope {
    /// Reached from the install requirements file.
    Install,
    /// Reached from the tests requirements file.
    Tests,
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Install => write!(f, "install_requires"),
            Self::Tests => write!(f, "tests_require"),
        }
    }
}

/// Collects the requirements files of a single project.
///
/// All relative paths are resolved against the project root given at
/// construction, never against the process working directory.
///
/// ```no_run
/// use reqs::Requirements;
///
/// let mut requirements = Requirements::new("path/to/project");
/// requirements.set_tests_requirements_path("requirements/dev.txt");
///
/// let dependencies = requirements.dependencies()?;
/// println!("{}", dependencies.install_requires.join("\n"));
/// # Ok::<(), reqs::Error>(())
/// ```
#[derive(Debug)]
pub struct Requirements {
    root: PathBuf,
    config: Config,
    dependencies: OnceCell<Dependencies>,
}

impl Requirements {
    /// Creates a collector for the project at `root`, using the default
    /// configuration.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self::with_config(root, Config::default())
    }

    /// Creates a collector for the project at `root` with the given
    /// configuration.
    #[must_use]
    pub fn with_config(root: impl Into<PathBuf>, config: Config) -> Self {
        Self {
            root: root.into(),
            config,
            dependencies: OnceCell::new(),
        }
    }

    /// Creates a collector for the project at `root`, reading
    /// [`CONFIG_FILE`] from the root if it exists.
    ///
    /// An unreadable or invalid configuration file falls back to the
    /// defaults.
    #[must_use]
    pub fn open(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        let config = load_config(&root);
        Self::with_config(root, config)
    }

    /// The project root.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// The active configuration.
    #[must_use]
    pub const fn config(&self) -> &Config {
        &self.config
    }

    /// The explicit install requirements file, if set.
    #[must_use]
    pub fn requirements_path(&self) -> Option<&Path> {
        self.config.requirements_path.as_deref()
    }

    /// The explicit tests requirements file, if set.
    #[must_use]
    pub fn tests_requirements_path(&self) -> Option<&Path> {
        self.config.tests_requirements_path.as_deref()
    }

    /// Sets the install requirements file, bypassing discovery.
    ///
    /// A relative path is resolved against the project root.
    pub fn set_requirements_path(&mut self, path: impl Into<PathBuf>) {
        self.config.requirements_path = Some(path.into());
        self.dependencies.take();
    }

    /// Sets the tests requirements file, bypassing discovery.
    ///
    /// A relative path is resolved against the project root.
    pub fn set_tests_requirements_path(&mut self, path: impl Into<PathBuf>) {
        self.config.tests_requirements_path = Some(path.into());
        self.dependencies.take();
    }

    /// Returns the dependency manifest, computing it on first use.
    ///
    /// The result is cached until one of the paths is changed.
    ///
    /// # Errors
    ///
    /// This method can fail if:
    ///
    /// - a file named by an include directive does not exist
    /// - a requirement line cannot be parsed
    /// - a requirements file cannot be read
    /// - includes are nested deeper than the configured limit
    ///
    /// Nothing is cached on failure.
    pub fn dependencies(&self) -> Result<&Dependencies, Error> {
        if let Some(dependencies) = self.dependencies.get() {
            return Ok(dependencies);
        }

        let dependencies = self.collect()?;
        Ok(self.dependencies.get_or_init(|| dependencies))
    }

    #[instrument(skip(self), fields(root = %self.root.display()))]
    fn collect(&self) -> Result<Dependencies, Error> {
        let sources = discovery::locate(&self.root, &self.config);
        let mut links = IndexSet::new();

        let install_requires = self.collect_scope(Scope::Install, &sources.install, &mut links)?;
        let tests_require =
            self.collect_scope(Scope::Tests, sources.tests.as_slice(), &mut links)?;

        let dependencies = Dependencies {
            install_requires,
            tests_require,
            dependency_links: links.into_iter().collect(),
        };

        for scope in [Scope::Install, Scope::Tests] {
            tracing::debug!(
                "Collected {} {scope} entries",
                dependencies.requirements(scope).len()
            );
        }

        Ok(dependencies)
    }

    fn collect_scope(
        &self,
        scope: Scope,
        sources: &[PathBuf],
        links: &mut IndexSet<String>,
    ) -> Result<Vec<String>, Error> {
        let mut includes = Includes::new(self.config.max_include_depth());
        let mut requirements = IndexSet::new();

        for source in sources {
            includes.walk(source, |path, line_number, line| {
                match line {
                    // expanded by the walk itself
                    Line::Blank | Line::Include(_) => {}
                    Line::Option { flag, known: true } => {
                        tracing::trace!("Ignoring option {flag} at {}:{line_number}", path.display());
                    }
                    Line::Option { flag, known: false } => {
                        tracing::warn!(
                            "Ignoring unrecognised option {flag} at {}:{line_number}",
                            path.display()
                        );
                    }
                    Line::Link {
                        url,
                        egg: Some(name),
                    } => {
                        links.insert(url.to_string());
                        requirements.insert(Requirement::from_egg(url, name).to_string());
                    }
                    Line::Link { url, egg: None } => {
                        tracing::warn!(
                            "Ignoring link without an #egg= fragment at {}:{line_number}: {url}",
                            path.display()
                        );
                    }
                    Line::Plain(text) => {
                        let requirement =
                            Requirement::parse(text).map_err(|source| Error::Parse {
                                path: path.to_path_buf(),
                                line_number,
                                line: text.to_string(),
                                source,
                            })?;
                        requirements.insert(requirement.to_string());
                    }
                }
                Ok(())
            })?;
        }

        Ok(requirements.into_iter().collect())
    }
}

fn load_config(root: &Path) -> Config {
    let path = root.join(CONFIG_FILE);
    if !path.exists() {
        return Config::default();
    }

    Config::load(&path).unwrap_or_else(|e| {
        tracing::debug!("Failed to load config: {e}");
        Config::default()
    })
}
