//! Vidopt Processing Library
//!
//! The transcoding pipeline and the pieces it is built from: an external tool
//! runner, ffmpeg argument builders, a metadata probe and a scoped guard that owns
//! every temporary file a run creates.

pub mod artifacts;
pub mod command;
pub mod encoding;
pub mod pipeline;
pub mod probe;

// Re-export commonly used types
pub use artifacts::{ArtifactKind, TempArtifact, TempArtifacts};
pub use command::{ProcessRunner, ToolError, ToolOutput, ToolRunner};
pub use encoding::resolution_to_scale;
pub use pipeline::{sanitize_source_key, OutputKeys, PipelineError, TranscodePipeline};
pub use probe::{parse_dimensions, MetadataProbe, ProbeError};
