use crate::core::schema::ResponseSchema;
use crate::domain::model::ImagePayload;
use crate::utils::error::AnalysisError;
use async_trait::async_trait;
use std::time::Duration;

/// 一次結構化生成請求：圖片、指令、回應 schema 與取樣溫度。
#[derive(Debug, Clone)]
pub struct GenerationRequest {
    pub image: ImagePayload,
    pub instruction: String,
    pub schema: ResponseSchema,
    pub temperature: f32,
}

/// A multimodal model that answers with text constrained by a response schema.
///
/// Implementations perform exactly one remote call per `generate` and return
/// the raw response text; parsing and shape checks happen in the caller.
#[async_trait]
pub trait StructuredGenerationClient: Send + Sync {
    async fn generate(&self, request: GenerationRequest) -> Result<String, AnalysisError>;

    /// Vendor label used in logs.
    fn vendor(&self) -> &str;
}

pub trait ConfigProvider: Send + Sync {
    fn api_endpoint(&self) -> &str;
    fn model(&self) -> &str;
    fn api_key(&self) -> Option<&str>;
    fn temperature(&self) -> f32;
    fn request_timeout(&self) -> Duration;
}
