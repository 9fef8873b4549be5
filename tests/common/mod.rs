//! Common test utilities for stackforge integration tests

use std::path::{Path, PathBuf};

use stackforge::recipe::{Query, Recipe, RecipeBuilder};
use tempfile::TempDir;

/// A scratch directory for integration tests
#[allow(dead_code)]
pub struct TestWorkspace {
    /// Temporary directory
    #[allow(dead_code)]
    pub temp: TempDir,
    /// Path to workspace root
    pub path: PathBuf,
}

impl TestWorkspace {
    /// Create a new test workspace
    pub fn new() -> Self {
        let temp = TempDir::new().expect("Failed to create temp directory");
        let path = temp.path().to_path_buf();
        Self { temp, path }
    }

    /// Write a file in workspace
    #[allow(dead_code)]
    pub fn write_file(&self, path: &str, content: &str) -> PathBuf {
        let file_path = self.path.join(path);
        if let Some(parent) = file_path.parent() {
            std::fs::create_dir_all(parent).expect("Failed to create parent directory");
        }
        std::fs::write(&file_path, content).expect("Failed to write file");
        file_path
    }

    /// Read a file from workspace
    #[allow(dead_code)]
    pub fn read_file(&self, path: &str) -> String {
        let file_path = self.path.join(path);
        std::fs::read_to_string(&file_path).expect("Failed to read file")
    }

    /// Check if a file exists in workspace
    #[allow(dead_code)]
    pub fn file_exists(&self, path: &str) -> bool {
        self.path.join(path).exists()
    }

    /// Resolve `query` against the packaged data set and save it as YAML
    #[allow(dead_code)]
    pub fn write_recipe(&self, name: &str, query: &Query) -> PathBuf {
        let recipe = resolve(query);
        let yaml = serde_yaml::to_string(&recipe).expect("Failed to serialize recipe");
        self.write_file(name, &yaml)
    }

    #[allow(dead_code)]
    pub fn join(&self, path: impl AsRef<Path>) -> PathBuf {
        self.path.join(path)
    }
}

impl Default for TestWorkspace {
    fn default() -> Self {
        Self::new()
    }
}

/// Resolve against the packaged data set
#[allow(dead_code)]
pub fn resolve(query: &Query) -> Recipe {
    RecipeBuilder::packaged()
        .expect("Packaged store should load")
        .build(Some(query))
        .expect("Resolution should succeed")
}
