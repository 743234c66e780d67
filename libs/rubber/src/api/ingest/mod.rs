//! Ingest pipelines.
mod delete_pipeline;
mod get_pipeline;
mod put_pipeline;
mod simulate_pipeline;

pub use delete_pipeline::IngestDeletePipelineService;
pub use get_pipeline::{IngestGetPipeline, IngestGetPipelineResponse, IngestGetPipelineService};
pub use put_pipeline::IngestPutPipelineService;
pub use simulate_pipeline::{
    IngestSimulateDocumentResult, IngestSimulatePipelineResponse, IngestSimulatePipelineService,
    IngestSimulateProcessorResult,
};
