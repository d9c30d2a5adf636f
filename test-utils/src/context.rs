use serde_json::Value;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

use crate::error::TestError;

/// Test context owning a temporary data directory and backup directory.
///
/// The directory tree is removed when the context is dropped, so keep the context alive for
/// the whole test.
pub struct TestContext {
    /// Root temporary directory.
    root: TempDir,
}

impl TestContext {
    /// Creates a new context with empty `data` and `backup` directories.
    ///
    /// # Returns
    /// - `Ok(TestContext)` - Context with both directories created
    /// - `Err(TestError::Io)` - Failed to create the temporary directory tree
    pub fn new() -> Result<Self, TestError> {
        let root = tempfile::tempdir()?;
        std::fs::create_dir_all(root.path().join("data"))?;
        std::fs::create_dir_all(root.path().join("backup"))?;

        Ok(Self { root })
    }

    /// Directory holding the live JSON documents.
    pub fn data_dir(&self) -> PathBuf {
        self.root.path().join("data")
    }

    /// Directory holding timestamped backup copies.
    pub fn backup_dir(&self) -> PathBuf {
        self.root.path().join("backup")
    }

    /// Writes a JSON document into the data directory.
    ///
    /// # Arguments
    /// - `file_name` - File name relative to the data directory
    /// - `value` - JSON value to write pretty-printed
    ///
    /// # Returns
    /// - `Ok(())` - Document written
    /// - `Err(TestError)` - Serialization or filesystem failure
    pub fn write_document(&self, file_name: &str, value: &Value) -> Result<(), TestError> {
        let contents = serde_json::to_string_pretty(value)?;
        std::fs::write(self.data_dir().join(file_name), contents)?;
        Ok(())
    }

    /// Reads a JSON document back from the data directory.
    ///
    /// # Arguments
    /// - `file_name` - File name relative to the data directory
    ///
    /// # Returns
    /// - `Ok(Value)` - Parsed document
    /// - `Err(TestError)` - File missing or not valid JSON
    pub fn read_document(&self, file_name: &str) -> Result<Value, TestError> {
        let contents = std::fs::read_to_string(self.data_dir().join(file_name))?;
        Ok(serde_json::from_str(&contents)?)
    }

    /// Lists backup file names, sorted ascending.
    ///
    /// # Returns
    /// - `Ok(Vec<String>)` - File names in the backup directory
    /// - `Err(TestError::Io)` - Failed to read the directory
    pub fn backup_files(&self) -> Result<Vec<String>, TestError> {
        list_files(&self.backup_dir())
    }
}

fn list_files(dir: &Path) -> Result<Vec<String>, TestError> {
    let mut names = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        if let Some(name) = entry.file_name().to_str() {
            names.push(name.to_string());
        }
    }
    names.sort();
    Ok(names)
}
