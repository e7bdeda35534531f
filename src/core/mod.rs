pub mod analysis;
pub mod ingestion;
pub mod schema;

pub use crate::domain::model::{AnalysisResult, DataUrl, ImagePayload, IngestedImage};
pub use crate::domain::ports::{ConfigProvider, GenerationRequest, StructuredGenerationClient};
pub use crate::utils::error::Result;
