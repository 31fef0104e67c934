//! Domain models shared between the pipeline and the HTTP surface

pub mod media;
pub mod pipeline;

pub use media::{MediaDescriptor, PipelineResult};
pub use pipeline::{PipelineRequest, DEFAULT_FORMAT};
