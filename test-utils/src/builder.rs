use serde_json::Value;

use crate::{context::TestContext, error::TestError};

/// Builder for creating test contexts with seeded JSON documents.
///
/// Provides a fluent interface for configuring test environments with a temporary data
/// directory. Use the builder pattern to add documents, then call `build()` to create the
/// configured test context.
///
/// # Example
///
/// ```rust,ignore
/// use test_utils::{builder::TestBuilder, fixture};
///
/// let test = TestBuilder::new()
///     .with_document(fixture::TENURE_RULES_FILE, fixture::tenure_rule(1, "check", "member", 90))
///     .build()?;
/// ```
pub struct TestBuilder {
    /// Documents written into the data directory during `build()`, keyed by file name.
    ///
    /// Documents are written in the order they were added; adding the same file twice
    /// keeps the last value.
    documents: Vec<(String, Value)>,

    /// Raw file contents written verbatim, used to simulate corrupt documents.
    raw_files: Vec<(String, String)>,
}

impl TestBuilder {
    /// Creates a new test builder with no seeded documents.
    ///
    /// # Returns
    /// - New `TestBuilder` instance with an empty data directory configuration
    pub fn new() -> Self {
        Self {
            documents: Vec::new(),
            raw_files: Vec::new(),
        }
    }

    /// Seeds a JSON document into the data directory.
    ///
    /// # Arguments
    /// - `file_name` - File name relative to the data directory (see `fixture` constants)
    /// - `value` - JSON value written pretty-printed
    ///
    /// # Returns
    /// - `Self` - Builder instance for method chaining
    pub fn with_document(mut self, file_name: &str, value: Value) -> Self {
        self.documents.push((file_name.to_string(), value));
        self
    }

    /// Seeds a file with raw text contents.
    ///
    /// Used for documents that must fail to parse or validate.
    ///
    /// # Arguments
    /// - `file_name` - File name relative to the data directory
    /// - `contents` - Text written as-is
    ///
    /// # Returns
    /// - `Self` - Builder instance for method chaining
    pub fn with_raw_file(mut self, file_name: &str, contents: &str) -> Self {
        self.raw_files
            .push((file_name.to_string(), contents.to_string()));
        self
    }

    /// Builds the test context.
    ///
    /// Creates the temporary directory with `data` and `backup` subdirectories, then writes
    /// every seeded document.
    ///
    /// # Returns
    /// - `Ok(TestContext)` - Test context ready for use
    /// - `Err(TestError)` - Failed to create directories or write documents
    pub fn build(self) -> Result<TestContext, TestError> {
        let context = TestContext::new()?;

        for (file_name, value) in self.documents {
            context.write_document(&file_name, &value)?;
        }

        for (file_name, contents) in self.raw_files {
            std::fs::write(context.data_dir().join(file_name), contents)?;
        }

        Ok(context)
    }
}

impl Default for TestBuilder {
    fn default() -> Self {
        Self::new()
    }
}
