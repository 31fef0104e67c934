use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Container/codec identifier used when the request does not name one.
pub const DEFAULT_FORMAT: &str = "webm";

/// Input of one pipeline run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineRequest {
    pub source_key: String,
    #[serde(default)]
    pub options: HashMap<String, String>,
}

impl PipelineRequest {
    pub fn new(source_key: impl Into<String>) -> Self {
        Self {
            source_key: source_key.into(),
            options: HashMap::new(),
        }
    }

    pub fn with_option(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.options.insert(key.into(), value.into());
        self
    }

    /// Target format, falling back to `webm` when absent or empty.
    pub fn format(&self) -> &str {
        self.option("format").unwrap_or(DEFAULT_FORMAT)
    }

    /// Requested output height such as `720p`, if any.
    pub fn resolution(&self) -> Option<&str> {
        self.option("resolution")
    }

    fn option(&self, key: &str) -> Option<&str> {
        self.options
            .get(key)
            .map(String::as_str)
            .filter(|v| !v.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_defaults_to_webm() {
        assert_eq!(PipelineRequest::new("clip.mp4").format(), "webm");
        assert_eq!(
            PipelineRequest::new("clip.mp4")
                .with_option("format", "")
                .format(),
            "webm"
        );
        assert_eq!(
            PipelineRequest::new("clip.mp4")
                .with_option("format", "mp4")
                .format(),
            "mp4"
        );
    }

    #[test]
    fn test_resolution_ignores_empty_value() {
        let request = PipelineRequest::new("clip.mp4").with_option("resolution", "");
        assert_eq!(request.resolution(), None);
        let request = PipelineRequest::new("clip.mp4").with_option("resolution", "720p");
        assert_eq!(request.resolution(), Some("720p"));
    }
}
