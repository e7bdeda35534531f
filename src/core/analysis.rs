use crate::core::schema::{analysis_schema, ResponseSchema, ANALYSIS_INSTRUCTION, DEFAULT_TEMPERATURE};
use crate::domain::model::{AnalysisResult, ImagePayload};
use crate::domain::ports::{GenerationRequest, StructuredGenerationClient};
use crate::utils::error::AnalysisError;

/// Sends one image to a structured generation backend and parses the reply.
///
/// There is no retry or caching: every call to [`AnalysisClient::analyze`] is
/// exactly one remote request, and any failure is returned to the caller.
pub struct AnalysisClient<G: StructuredGenerationClient> {
    generator: G,
    schema: ResponseSchema,
    instruction: String,
    temperature: f32,
}

impl<G: StructuredGenerationClient> AnalysisClient<G> {
    pub fn new(generator: G) -> Self {
        Self {
            generator,
            schema: analysis_schema(),
            instruction: ANALYSIS_INSTRUCTION.to_string(),
            temperature: DEFAULT_TEMPERATURE,
        }
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn generator(&self) -> &G {
        &self.generator
    }

    pub fn temperature(&self) -> f32 {
        self.temperature
    }

    pub fn build_request(&self, payload: &ImagePayload) -> GenerationRequest {
        GenerationRequest {
            image: payload.clone(),
            instruction: self.instruction.clone(),
            schema: self.schema.clone(),
            temperature: self.temperature,
        }
    }

    pub async fn analyze(&self, payload: &ImagePayload) -> Result<AnalysisResult, AnalysisError> {
        tracing::info!(
            "Requesting analysis from {} ({}, {} base64 chars)",
            self.generator.vendor(),
            payload.mime_type,
            payload.data.len()
        );

        let text = self.generator.generate(self.build_request(payload)).await?;
        let result = parse_analysis(&text)?;

        tracing::info!(
            "Analysis received: appearance={}, fortune={}",
            result.appearance_score,
            result.fortune_score
        );
        Ok(result)
    }
}

/// 解析模型回傳的文字。空回應、非 JSON、缺欄位或多欄位都視為失敗，不回傳部分結果。
pub fn parse_analysis(text: &str) -> Result<AnalysisResult, AnalysisError> {
    let text = text.trim();
    if text.is_empty() {
        return Err(AnalysisError::EmptyResponse);
    }

    let result: AnalysisResult = serde_json::from_str(text)?;

    for (field, value) in [
        ("compliment", &result.compliment),
        ("poem", &result.poem),
        ("fortuneAdvice", &result.fortune_advice),
    ] {
        if value.trim().is_empty() {
            return Err(AnalysisError::NonConforming {
                field: field.to_string(),
                reason: "text must not be empty".to_string(),
            });
        }
    }

    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::{Arc, Mutex};

    #[derive(Clone)]
    struct MockGenerator {
        reply: Arc<dyn Fn() -> Result<String, AnalysisError> + Send + Sync>,
        requests: Arc<Mutex<Vec<GenerationRequest>>>,
    }

    impl MockGenerator {
        fn replying(text: &str) -> Self {
            let text = text.to_string();
            Self {
                reply: Arc::new(move || Ok(text.clone())),
                requests: Arc::new(Mutex::new(Vec::new())),
            }
        }

        fn failing() -> Self {
            Self {
                reply: Arc::new(|| {
                    Err(AnalysisError::Api {
                        status: 429,
                        body: "quota exceeded".to_string(),
                    })
                }),
                requests: Arc::new(Mutex::new(Vec::new())),
            }
        }

        fn request_count(&self) -> usize {
            self.requests.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl StructuredGenerationClient for MockGenerator {
        async fn generate(&self, request: GenerationRequest) -> Result<String, AnalysisError> {
            self.requests.lock().unwrap().push(request);
            (self.reply)()
        }

        fn vendor(&self) -> &str {
            "mock"
        }
    }

    fn payload() -> ImagePayload {
        ImagePayload {
            mime_type: "image/jpeg".to_string(),
            data: "/9j/4AAQ".to_string(),
        }
    }

    const WELL_FORMED: &str = r#"{"appearanceScore":88,"compliment":"神清气朗","poem":"镜中人面如春晓，气质清雅胜群芳。","fortuneScore":92,"fortuneAdvice":"宜静心"}"#;

    #[tokio::test]
    async fn test_analyze_sends_one_request_with_schema() {
        let generator = MockGenerator::replying(WELL_FORMED);
        let client = AnalysisClient::new(generator.clone());

        let result = client.analyze(&payload()).await.unwrap();

        assert_eq!(result.appearance_score, 88.0);
        assert_eq!(result.fortune_score, 92.0);
        assert_eq!(generator.request_count(), 1);

        let requests = generator.requests.lock().unwrap();
        let request = &requests[0];
        assert_eq!(request.image, payload());
        assert_eq!(request.temperature, DEFAULT_TEMPERATURE);
        assert_eq!(request.schema.required.len(), 5);
        assert!(request.instruction.contains("七言二句"));
    }

    #[tokio::test]
    async fn test_analyze_uses_configured_temperature() {
        let generator = MockGenerator::replying(WELL_FORMED);
        let client = AnalysisClient::new(generator.clone()).with_temperature(0.2);

        client.analyze(&payload()).await.unwrap();

        assert_eq!(generator.requests.lock().unwrap()[0].temperature, 0.2);
    }

    #[tokio::test]
    async fn test_analyze_propagates_backend_failure_without_retry() {
        let generator = MockGenerator::failing();
        let client = AnalysisClient::new(generator.clone());

        let err = client.analyze(&payload()).await.unwrap_err();

        assert!(matches!(err, AnalysisError::Api { status: 429, .. }));
        assert_eq!(generator.request_count(), 1);
    }

    #[test]
    fn test_parse_empty_response() {
        assert!(matches!(parse_analysis(""), Err(AnalysisError::EmptyResponse)));
        assert!(matches!(parse_analysis("  \n"), Err(AnalysisError::EmptyResponse)));
    }

    #[test]
    fn test_parse_missing_field_fails() {
        let missing_poem = r#"{"appearanceScore":88,"compliment":"好","fortuneScore":92,"fortuneAdvice":"吉"}"#;
        assert!(matches!(
            parse_analysis(missing_poem),
            Err(AnalysisError::MalformedResponse(_))
        ));
    }

    #[test]
    fn test_parse_wrong_type_fails() {
        let text = r#"{"appearanceScore":"88","compliment":"好","poem":"甲，乙。","fortuneScore":92,"fortuneAdvice":"吉"}"#;
        assert!(matches!(
            parse_analysis(text),
            Err(AnalysisError::MalformedResponse(_))
        ));
    }

    #[test]
    fn test_parse_not_json_fails() {
        assert!(matches!(
            parse_analysis("今日大吉"),
            Err(AnalysisError::MalformedResponse(_))
        ));
    }

    #[test]
    fn test_parse_blank_text_field_fails() {
        let text = r#"{"appearanceScore":88,"compliment":" ","poem":"甲，乙。","fortuneScore":92,"fortuneAdvice":"吉"}"#;
        match parse_analysis(text) {
            Err(AnalysisError::NonConforming { field, .. }) => assert_eq!(field, "compliment"),
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[test]
    fn test_parse_keeps_out_of_range_scores() {
        let text = r#"{"appearanceScore":150,"compliment":"好","poem":"甲，乙。","fortuneScore":-5,"fortuneAdvice":"吉"}"#;
        let result = parse_analysis(text).unwrap();
        assert_eq!(result.appearance_score, 150.0);
        assert_eq!(result.fortune_score, -5.0);
    }
}
