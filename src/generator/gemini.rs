use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::{AnswerGenerator, GenerationParams, GeneratorError};
use crate::models::ModelInfo;

const API_KEY_HEADER: &str = "x-goog-api-key";
const GENERATE_METHOD: &str = "generateContent";

// Gemini generateContent request format
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest<'a> {
    contents: Vec<Content<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    generation_config: Option<GenerationConfig>,
}

#[derive(Serialize)]
struct Content<'a> {
    role: &'static str,
    parts: Vec<RequestPart<'a>>,
}

#[derive(Serialize)]
struct RequestPart<'a> {
    text: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_output_tokens: Option<u32>,
}

// Gemini generateContent response format
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    content: Option<CandidateContent>,
    finish_reason: Option<String>,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    block_reason: Option<String>,
}

#[derive(Deserialize)]
struct ModelList {
    #[serde(default)]
    models: Vec<RemoteModel>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RemoteModel {
    name: String,
    #[serde(default)]
    display_name: String,
    #[serde(default)]
    supported_generation_methods: Vec<String>,
}

/// REST client for the Gemini `v1beta` API.
pub struct GeminiClient {
    client: reqwest::Client,
    api_key: Option<String>,
    base_url: String,
    model: String,
}

impl std::fmt::Debug for GeminiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiClient")
            .field("api_key", &self.api_key.as_ref().map(|_| "***"))
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .finish()
    }
}

impl GeminiClient {
    pub fn new(
        api_key: Option<String>,
        base_url: &str,
        model: &str,
        timeout: Duration,
    ) -> Result<Self, GeneratorError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| GeneratorError::ClientInit(e.to_string()))?;
        // Accept both "gemini-x" and "models/gemini-x"
        let model = if model.starts_with("models/") {
            model.to_string()
        } else {
            format!("models/{model}")
        };
        Ok(Self {
            client,
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
            model,
        })
    }

    fn api_key(&self) -> Result<&str, GeneratorError> {
        self.api_key.as_deref().ok_or(GeneratorError::MissingApiKey)
    }

    // Non-2xx responses keep status and body for classification
    async fn check_status(res: reqwest::Response) -> Result<reqwest::Response, GeneratorError> {
        let status = res.status();
        if status.is_success() {
            return Ok(res);
        }
        let body = res
            .text()
            .await
            .unwrap_or_else(|_| "could not read error body".to_string());
        Err(GeneratorError::HttpStatus {
            code: status.as_u16(),
            body,
        })
    }
}

fn extract_text(body: GenerateResponse) -> Result<String, GeneratorError> {
    if let Some(reason) = body.prompt_feedback.and_then(|f| f.block_reason) {
        return Err(GeneratorError::Blocked(format!("blockReason: {reason}")));
    }
    let candidate = body
        .candidates
        .into_iter()
        .next()
        .ok_or(GeneratorError::EmptyResponse)?;

    let text: String = candidate
        .content
        .map(|c| c.parts.into_iter().filter_map(|p| p.text).collect())
        .unwrap_or_default();

    if text.is_empty() {
        return match candidate.finish_reason.as_deref() {
            Some("SAFETY") => Err(GeneratorError::Blocked("finishReason: SAFETY".to_string())),
            _ => Err(GeneratorError::EmptyResponse),
        };
    }
    Ok(text)
}

#[async_trait]
impl AnswerGenerator for GeminiClient {
    fn model(&self) -> &str {
        &self.model
    }

    fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }

    async fn generate(
        &self,
        prompt: &str,
        params: GenerationParams,
    ) -> Result<String, GeneratorError> {
        let api_key = self.api_key()?;
        let generation_config = (params != GenerationParams::default()).then_some(GenerationConfig {
            temperature: params.temperature,
            max_output_tokens: params.max_output_tokens,
        });
        let request = GenerateRequest {
            contents: vec![Content {
                role: "user",
                parts: vec![RequestPart { text: prompt }],
            }],
            generation_config,
        };

        let res = self
            .client
            .post(format!(
                "{}/v1beta/{}:{GENERATE_METHOD}",
                self.base_url, self.model
            ))
            .header(API_KEY_HEADER, api_key)
            .json(&request)
            .send()
            .await?;
        let body: GenerateResponse = Self::check_status(res).await?.json().await?;
        extract_text(body)
    }

    async fn list_models(&self) -> Result<Vec<ModelInfo>, GeneratorError> {
        let api_key = self.api_key()?;
        let res = self
            .client
            .get(format!("{}/v1beta/models?pageSize=1000", self.base_url))
            .header(API_KEY_HEADER, api_key)
            .send()
            .await?;
        let list: ModelList = Self::check_status(res).await?.json().await?;

        Ok(list
            .models
            .into_iter()
            .filter(|m| m.supported_generation_methods.iter().any(|g| g == GENERATE_METHOD))
            .map(|m| ModelInfo {
                name: m.name,
                display_name: m.display_name,
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::FailureKind;
    use wiremock::matchers::{body_json, header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const GENERATE_PATH: &str = "/v1beta/models/gemini-2.5-flash:generateContent";

    fn client_for(server: &MockServer, key: Option<&str>) -> GeminiClient {
        GeminiClient::new(
            key.map(str::to_string),
            &server.uri(),
            "gemini-2.5-flash",
            Duration::from_secs(5),
        )
        .unwrap()
    }

    fn text_response(parts: &[&str]) -> serde_json::Value {
        let parts: Vec<_> = parts.iter().map(|t| serde_json::json!({ "text": t })).collect();
        serde_json::json!({
            "candidates": [{
                "content": { "role": "model", "parts": parts },
                "finishReason": "STOP"
            }]
        })
    }

    #[tokio::test]
    async fn sends_key_and_generation_config() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(GENERATE_PATH))
            .and(header("x-goog-api-key", "test-key"))
            .and(body_json(serde_json::json!({
                "contents": [{ "role": "user", "parts": [{ "text": "hello" }] }],
                "generationConfig": { "temperature": 0.5, "maxOutputTokens": 200 }
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(text_response(&["hi"])))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server, Some("test-key"));
        let params = GenerationParams {
            temperature: Some(0.5),
            max_output_tokens: Some(200),
        };
        assert_eq!(client.generate("hello", params).await.unwrap(), "hi");
    }

    #[tokio::test]
    async fn default_params_omit_generation_config() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(GENERATE_PATH))
            .and(body_json(serde_json::json!({
                "contents": [{ "role": "user", "parts": [{ "text": "smoke" }] }]
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(text_response(&["ok"])))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server, Some("k"));
        assert_eq!(
            client.generate("smoke", GenerationParams::default()).await.unwrap(),
            "ok"
        );
    }

    #[tokio::test]
    async fn concatenates_text_parts() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(GENERATE_PATH))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(text_response(&["Four", "."])),
            )
            .mount(&server)
            .await;

        let client = client_for(&server, Some("k"));
        let text = client.generate("2+2?", GenerationParams::default()).await.unwrap();
        assert_eq!(text, "Four.");
    }

    #[tokio::test]
    async fn http_errors_keep_status_for_classification() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(GENERATE_PATH))
            .respond_with(ResponseTemplate::new(429).set_body_string("Resource exhausted"))
            .mount(&server)
            .await;

        let client = client_for(&server, Some("k"));
        let err = client.generate("q", GenerationParams::default()).await.unwrap_err();
        assert!(matches!(err, GeneratorError::HttpStatus { code: 429, .. }));
        assert_eq!(FailureKind::from(&err), FailureKind::RateLimited);
    }

    #[tokio::test]
    async fn invalid_key_body_is_classified() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(GENERATE_PATH))
            .respond_with(ResponseTemplate::new(400).set_body_json(serde_json::json!({
                "error": {
                    "code": 400,
                    "message": "API key not valid. Please pass a valid API key.",
                    "status": "INVALID_ARGUMENT",
                    "details": [{ "reason": "API_KEY_INVALID" }]
                }
            })))
            .mount(&server)
            .await;

        let client = client_for(&server, Some("bad"));
        let err = client.generate("q", GenerationParams::default()).await.unwrap_err();
        assert_eq!(FailureKind::from(&err), FailureKind::InvalidCredentials);
    }

    #[tokio::test]
    async fn safety_blocks_are_reported() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(GENERATE_PATH))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "candidates": [{ "finishReason": "SAFETY" }]
            })))
            .mount(&server)
            .await;

        let client = client_for(&server, Some("k"));
        let err = client.generate("q", GenerationParams::default()).await.unwrap_err();
        assert!(matches!(err, GeneratorError::Blocked(_)));
        assert_eq!(FailureKind::from(&err), FailureKind::SafetyBlocked);
    }

    #[tokio::test]
    async fn prompt_feedback_block_is_reported() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(GENERATE_PATH))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "promptFeedback": { "blockReason": "SAFETY" }
            })))
            .mount(&server)
            .await;

        let client = client_for(&server, Some("k"));
        let err = client.generate("q", GenerationParams::default()).await.unwrap_err();
        assert_eq!(FailureKind::from(&err), FailureKind::SafetyBlocked);
    }

    #[tokio::test]
    async fn missing_key_fails_without_a_request() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let client = client_for(&server, None);
        assert!(!client.has_api_key());
        let err = client.generate("q", GenerationParams::default()).await.unwrap_err();
        assert!(matches!(err, GeneratorError::MissingApiKey));
    }

    #[tokio::test]
    async fn lists_only_generation_capable_models() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1beta/models"))
            .and(query_param("pageSize", "1000"))
            .and(header("x-goog-api-key", "k"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "models": [
                    {
                        "name": "models/gemini-2.5-flash",
                        "displayName": "Gemini 2.5 Flash",
                        "supportedGenerationMethods": ["generateContent", "countTokens"]
                    },
                    {
                        "name": "models/text-embedding-004",
                        "displayName": "Text Embedding 004",
                        "supportedGenerationMethods": ["embedContent"]
                    }
                ]
            })))
            .mount(&server)
            .await;

        let client = client_for(&server, Some("k"));
        let models = client.list_models().await.unwrap();
        assert_eq!(
            models,
            vec![ModelInfo {
                name: "models/gemini-2.5-flash".into(),
                display_name: "Gemini 2.5 Flash".into(),
            }]
        );
    }

    #[test]
    fn model_name_gets_prefix() {
        let client = GeminiClient::new(None, "http://x/", "gemini-pro", Duration::from_secs(1))
            .unwrap();
        assert_eq!(client.model(), "models/gemini-pro");
        assert_eq!(client.base_url, "http://x");
    }
}
