//! Locating the primary requirements files of a project.
//!
//! Install requirements come from, in order of preference:
//! 1. the explicit `requirements_path`, if set
//! 2. `requirements.txt` in the project root
//! 3. every file directly inside `requirements/`, except the tests file
//!
//! Test requirements come from the explicit `tests_requirements_path`, or
//! from `requirements/tests.txt`. A missing file is never an error; the scope
//! is just empty.

use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::domain::Config;

/// The primary files for each scope.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct Sources {
    pub install: Vec<PathBuf>,
    pub tests: Option<PathBuf>,
}

#[must_use]
pub fn locate(root: &Path, config: &Config) -> Sources {
    let tests = locate_tests(root, config);
    let install = locate_install(root, config, tests.as_deref());

    tracing::debug!(
        "Found {} install source(s) and {} tests source(s) under {}",
        install.len(),
        usize::from(tests.is_some()),
        root.display()
    );

    Sources { install, tests }
}

fn locate_install(root: &Path, config: &Config, tests: Option<&Path>) -> Vec<PathBuf> {
    if let Some(path) = &config.requirements_path {
        return existing_file(root.join(path)).into_iter().collect();
    }

    if let Some(path) = existing_file(root.join(config.requirements_file())) {
        return vec![path];
    }

    let dir = root.join(config.requirements_dir());
    if !dir.is_dir() {
        tracing::debug!("No install requirements found under {}", root.display());
        return Vec::new();
    }

    let tests = tests.and_then(|path| path.canonicalize().ok());

    collect_directory_files(&dir)
        .into_iter()
        .filter(|path| path.file_name().is_some_and(|name| name != config.tests_file()))
        .filter(|path| {
            tests
                .as_ref()
                .is_none_or(|tests| path.canonicalize().ok().as_ref() != Some(tests))
        })
        .collect()
}

fn locate_tests(root: &Path, config: &Config) -> Option<PathBuf> {
    let path = config.tests_requirements_path.as_ref().map_or_else(
        || {
            root.join(config.requirements_dir())
                .join(config.tests_file())
        },
        |path| root.join(path),
    );

    existing_file(path)
}

fn existing_file(path: PathBuf) -> Option<PathBuf> {
    if path.is_file() {
        Some(path)
    } else {
        tracing::debug!("No requirements file at {}", path.display());
        None
    }
}

/// Returns the regular, non-hidden files directly inside `dir`, sorted by
/// name.
fn collect_directory_files(dir: &Path) -> Vec<PathBuf> {
    WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|entry| {
            entry
                .map_err(|e| tracing::debug!("Skipping unreadable entry in {}: {e}", dir.display()))
                .ok()
        })
        .filter(|entry| entry.file_type().is_file())
        .filter(|entry| !entry.file_name().to_string_lossy().starts_with('.'))
        .map(walkdir::DirEntry::into_path)
        .collect()
}
