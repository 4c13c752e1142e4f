//! Rendering options and configuration.

/// Base URL of the bucket that holds uploaded files.
pub const DEFAULT_FILE_BASE_URL: &str = "https://dev-file-uploads.s3.us-east-2.amazonaws.com";

/// Options for rendering block content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderOptions {
    /// Base URL that stored file keys are appended to
    pub file_base_url: String,

    /// Collect rendering statistics
    pub collect_stats: bool,
}

impl RenderOptions {
    /// Create new render options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the file storage base URL.
    pub fn with_file_base_url(mut self, url: impl Into<String>) -> Self {
        self.file_base_url = url.into();
        self
    }

    /// Resolve a stored file key into a fetchable URL. The key is appended verbatim.
    pub fn file_url(&self, file_key: &str) -> String {
        format!("{}/{}", self.file_base_url.trim_end_matches('/'), file_key)
    }
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            file_base_url: DEFAULT_FILE_BASE_URL.to_string(),
            collect_stats: false,
        }
    }
}
