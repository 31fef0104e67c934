use serde::{Deserialize, Serialize};

/// Description of one uploaded artifact.
///
/// Width and height are `0` when probing the local file failed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaDescriptor {
    #[serde(rename = "filename")]
    pub remote_key: String,
    #[serde(rename = "filesize")]
    pub filesize_bytes: u64,
    pub height: u32,
    pub width: u32,
    pub mime_type: String,
}

/// Outcome of the optimize flow.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PipelineResult {
    #[serde(rename = "optimizedVideo")]
    pub video: MediaDescriptor,
    pub thumbnail: MediaDescriptor,
}
