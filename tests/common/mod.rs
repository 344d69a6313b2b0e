use std::{fs, path::Path};

use tempfile::TempDir;

/// Routes `tracing` output through the test harness so it is shown for
/// failing tests.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("reqs=debug")),
        )
        .with_test_writer()
        .try_init();
}

/// An empty project directory that is removed when dropped.
pub struct Project {
    dir: TempDir,
}

impl Project {
    pub fn new() -> Self {
        init_tracing();
        Self {
            dir: TempDir::new().expect("failed to create temp dir"),
        }
    }

    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    /// Writes `content` to `name`, creating parent directories as needed.
    pub fn write(&self, name: &str, content: &str) -> &Self {
        let path = self.root().join(name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, content).unwrap();
        self
    }
}
