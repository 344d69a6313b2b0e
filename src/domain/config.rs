use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Configuration for locating and expanding requirements files.
///
/// Holds the discovery conventions used when no explicit path is set, the
/// two explicit path overrides, and the limit on nested includes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Versions", into = "Versions")]
pub struct Config {
    /// Name of the install requirements file in the project root.
    ///
    /// Defaults to `requirements.txt`.
    requirements_file: String,

    /// Name of the directory holding split requirements files.
    ///
    /// Defaults to `requirements`. If the root requirements file is absent,
    /// every file directly inside this directory, except the tests file, is
    /// an install source.
    requirements_dir: String,

    /// Name of the tests requirements file inside the requirements directory.
    ///
    /// Defaults to `tests.txt`.
    tests_file: String,

    /// The maximum number of nested `-r` includes before giving up.
    max_include_depth: usize,

    /// Explicit install requirements file, overriding discovery.
    ///
    /// Relative paths are resolved against the project root.
    pub requirements_path: Option<PathBuf>,

    /// Explicit tests requirements file, overriding discovery.
    ///
    /// Relative paths are resolved against the project root.
    pub tests_requirements_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            requirements_file: default_requirements_file(),
            requirements_dir: default_requirements_dir(),
            tests_file: default_tests_file(),
            max_include_depth: default_max_include_depth(),
            requirements_path: None,
            tests_requirements_path: None,
        }
    }
}

impl Config {
    /// Loads the configuration from a TOML file at the given path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or if the TOML content is
    /// invalid.
    pub fn load(path: &Path) -> Result<Self, String> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read config file: {e}"))?;
        toml::from_str(&content).map_err(|e| format!("Failed to parse config file: {e}"))
    }

    /// Saves the configuration to a TOML file at the given path.
    ///
    /// Writing [`CONFIG_FILE`](crate::storage::CONFIG_FILE) in a project root
    /// makes [`Requirements::open`](crate::Requirements::open) pick it up.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration cannot be serialized to TOML or if
    /// the file cannot be written.
    pub fn save(&self, path: &Path) -> Result<(), String> {
        let content =
            toml::to_string_pretty(self).map_err(|e| format!("Failed to serialize config: {e}"))?;
        std::fs::write(path, content).map_err(|e| format!("Failed to write config file: {e}"))
    }

    /// Returns the name of the root install requirements file.
    #[must_use]
    pub fn requirements_file(&self) -> &str {
        &self.requirements_file
    }

    /// Returns the name of the split requirements directory.
    #[must_use]
    pub fn requirements_dir(&self) -> &str {
        &self.requirements_dir
    }

    /// Returns the name of the tests requirements file.
    #[must_use]
    pub fn tests_file(&self) -> &str {
        &self.tests_file
    }

    /// Returns the maximum include nesting depth.
    #[must_use]
    pub const fn max_include_depth(&self) -> usize {
        self.max_include_depth
    }

    /// Sets the maximum include nesting depth.
    pub const fn set_max_include_depth(&mut self, depth: usize) {
        self.max_include_depth = depth;
    }
}

fn default_requirements_file() -> String {
    "requirements.txt".to_string()
}

fn default_requirements_dir() -> String {
    "requirements".to_string()
}

fn default_tests_file() -> String {
    "tests.txt".to_string()
}

const fn default_max_include_depth() -> usize {
    32
}

/// The serialized versions of the configuration.
#[derive(Debug, Serialize, Deserialize)]
#[serde(tag = "_version")]
enum Versions {
    #[serde(rename = "1")]
    V1 {
        #[serde(default = "default_requirements_file")]
        requirements_file: String,

        #[serde(default = "default_requirements_dir")]
        requirements_dir: String,

        #[serde(default = "default_tests_file")]
        tests_file: String,

        #[serde(default = "default_max_include_depth")]
        max_include_depth: usize,

        #[serde(default, skip_serializing_if = "Option::is_none")]
        requirements_path: Option<PathBuf>,

        #[serde(default, skip_serializing_if = "Option::is_none")]
        tests_requirements_path: Option<PathBuf>,
    },
}

impl From<Versions> for Config {
    fn from(versions: Versions) -> Self {
        match versions {
            Versions::V1 {
                requirements_file,
                requirements_dir,
                tests_file,
                max_include_depth,
                requirements_path,
                tests_requirements_path,
            } => Self {
                requirements_file,
                requirements_dir,
                tests_file,
                max_include_depth,
                requirements_path,
                tests_requirements_path,
            },
        }
    }
}

impl From<Config> for Versions {
    fn from(config: Config) -> Self {
        Self::V1 {
            requirements_file: config.requirements_file,
            requirements_dir: config.requirements_dir,
            tests_file: config.tests_file,
            max_include_depth: config.max_include_depth,
            requirements_path: config.requirements_path,
            tests_requirements_path: config.tests_requirements_path,
        }
    }
}
