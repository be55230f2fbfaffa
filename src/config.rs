use std::path::{Path, PathBuf};

/// File name of the combined workbook when none is configured.
pub const DEFAULT_OUTPUT_NAME: &str = "combined_data.xlsx";

/// Where to look for the source documents and what to call the result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeConfig {
    pub directory: PathBuf,
    pub output_name: String,
}

impl MergeConfig {
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
            output_name: DEFAULT_OUTPUT_NAME.to_string(),
        }
    }

    pub fn with_output_name(mut self, output_name: impl Into<String>) -> Self {
        self.output_name = output_name.into();
        self
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    /// The output name is resolved against the source directory.
    pub fn output_path(&self) -> PathBuf {
        self.directory.join(&self.output_name)
    }
}
