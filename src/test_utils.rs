//! Shared test utilities for execute tests.
//!
//! A [`TestProject`] is a temp directory holding a `schemas/` folder and an
//! output root, plus the [`ConfigFile`] pointing at both.

use std::fs;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

use crate::config::ConfigFile;
use crate::fixtures;

/// Go module path used by every test project.
pub const TEST_MODULE: &str = "github.com/acme/blog";

/// Temp project; the directory lives as long as the value.
pub struct TestProject {
    pub dir: TempDir,
    pub config: ConfigFile,
}

impl TestProject {
    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    /// Absolute path of a file under the output root.
    pub fn output(&self, relative: &str) -> PathBuf {
        self.config.output_root.join(relative)
    }

    /// Read a generated file, panicking with its path when missing.
    pub fn read_output(&self, relative: &str) -> String {
        let path = self.output(relative);
        fs::read_to_string(&path)
            .unwrap_or_else(|e| panic!("Failed to read {}: {}", path.display(), e))
    }
}

/// Create a project whose schemas directory holds the given `(file, json)`
/// documents.
pub fn project_with(schemas: &[(&str, &str)]) -> TestProject {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let schemas_dir = dir.path().join("schemas");
    fs::create_dir_all(&schemas_dir).expect("Failed to create schemas dir");
    for (file, json) in schemas {
        fs::write(schemas_dir.join(file), json).expect("Failed to write schema");
    }

    let config = ConfigFile {
        module_path: TEST_MODULE.to_string(),
        schemas_dir,
        output_root: dir.path().join("out"),
        dialect: None,
    };
    TestProject { dir, config }
}

/// Project with the post, user and store fixtures.
pub fn blog_project() -> TestProject {
    project_with(&[
        ("post.json", fixtures::POST),
        ("user.json", fixtures::USER),
        ("store.json", fixtures::STORE),
    ])
}
