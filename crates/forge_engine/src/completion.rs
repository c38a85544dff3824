use std::time::Duration;

use forge_logging::{forge_debug, forge_info, forge_warn};
use futures_util::StreamExt;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::{Completion, CompletionError, FailureKind};

pub const DEFAULT_ENDPOINT: &str = "https://generativelanguage.googleapis.com/";
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";

#[derive(Debug, Clone)]
pub struct CompletionSettings {
    /// Base URL of the service; the model path is joined onto it.
    pub endpoint: String,
    pub model: String,
    pub api_key: Option<String>,
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
    pub max_bytes: u64,
}

impl Default for CompletionSettings {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            model: DEFAULT_MODEL.to_string(),
            api_key: None,
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(120),
            max_bytes: 4 * 1024 * 1024,
        }
    }
}

/// Sends one instruction and returns the generated text.
///
/// Implementations perform exactly one outbound request per call and never
/// retry; a failure is final for that call.
#[async_trait::async_trait]
pub trait CompletionClient: Send + Sync {
    async fn complete(&self, instruction: &str) -> Result<Completion, CompletionError>;
}

/// Client for the Gemini `generateContent` REST endpoint.
#[derive(Debug, Clone)]
pub struct GeminiClient {
    settings: CompletionSettings,
}

impl GeminiClient {
    pub fn new(settings: CompletionSettings) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> &CompletionSettings {
        &self.settings
    }

    fn build_client(&self) -> Result<reqwest::Client, CompletionError> {
        reqwest::Client::builder()
            .connect_timeout(self.settings.connect_timeout)
            .timeout(self.settings.request_timeout)
            .build()
            .map_err(|err| CompletionError::new(FailureKind::Network, err.to_string()))
    }

    fn generate_url(&self) -> Result<Url, CompletionError> {
        let mut base = Url::parse(&self.settings.endpoint)
            .map_err(|err| CompletionError::new(FailureKind::InvalidEndpoint, err.to_string()))?;
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        base.join(&format!(
            "v1beta/models/{}:generateContent",
            self.settings.model
        ))
        .map_err(|err| CompletionError::new(FailureKind::InvalidEndpoint, err.to_string()))
    }

    async fn read_body(&self, response: reqwest::Response) -> Result<Vec<u8>, CompletionError> {
        let max_bytes = self.settings.max_bytes;
        if let Some(content_len) = response.content_length() {
            if content_len > max_bytes {
                return Err(CompletionError::new(
                    FailureKind::TooLarge {
                        max_bytes,
                        actual: Some(content_len),
                    },
                    "response too large",
                ));
            }
        }

        let mut bytes = Vec::new();
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(map_reqwest_error)?;
            let next_len = bytes.len() as u64 + chunk.len() as u64;
            if next_len > max_bytes {
                return Err(CompletionError::new(
                    FailureKind::TooLarge {
                        max_bytes,
                        actual: Some(next_len),
                    },
                    "response too large",
                ));
            }
            bytes.extend_from_slice(&chunk);
        }
        Ok(bytes)
    }
}

#[async_trait::async_trait]
impl CompletionClient for GeminiClient {
    async fn complete(&self, instruction: &str) -> Result<Completion, CompletionError> {
        let api_key = self
            .settings
            .api_key
            .as_deref()
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| CompletionError::new(FailureKind::MissingApiKey, "no api key configured"))?;
        let url = self.generate_url()?;
        let client = self.build_client()?;

        let body = GenerateRequest {
            contents: vec![RequestContent {
                role: "user",
                parts: vec![RequestPart { text: instruction }],
            }],
        };

        forge_info!(
            "completion request model={} instruction_len={}",
            self.settings.model,
            instruction.len()
        );

        let response = client
            .post(url)
            .header("x-goog-api-key", api_key)
            .json(&body)
            .send()
            .await
            .map_err(map_reqwest_error)?;

        let status = response.status();
        let bytes = self.read_body(response).await?;
        forge_debug!("completion reply status={} bytes={}", status, bytes.len());

        if !status.is_success() {
            let message = serde_json::from_slice::<ErrorEnvelope>(&bytes)
                .map(|envelope| envelope.error.message)
                .unwrap_or_else(|_| status.to_string());
            forge_warn!("completion failed status={} message={}", status, message);
            return Err(CompletionError::new(
                FailureKind::HttpStatus(status.as_u16()),
                message,
            ));
        }

        let reply: GenerateResponse = serde_json::from_slice(&bytes)
            .map_err(|err| CompletionError::new(FailureKind::Malformed, err.to_string()))?;
        let completion = reply.into_completion(&self.settings.model)?;
        forge_info!(
            "completion ok model={} reply_len={} finish_reason={:?}",
            completion.model,
            completion.text.len(),
            completion.finish_reason
        );
        Ok(completion)
    }
}

fn map_reqwest_error(err: reqwest::Error) -> CompletionError {
    if err.is_timeout() {
        return CompletionError::new(FailureKind::Timeout, err.to_string());
    }
    CompletionError::new(FailureKind::Network, err.to_string())
}

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    contents: Vec<RequestContent<'a>>,
}

#[derive(Debug, Serialize)]
struct RequestContent<'a> {
    role: &'a str,
    parts: Vec<RequestPart<'a>>,
}

#[derive(Debug, Serialize)]
struct RequestPart<'a> {
    text: &'a str,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    prompt_feedback: Option<PromptFeedback>,
    model_version: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    content: Option<CandidateContent>,
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    block_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}

impl GenerateResponse {
    fn into_completion(self, requested_model: &str) -> Result<Completion, CompletionError> {
        let model = self
            .model_version
            .unwrap_or_else(|| requested_model.to_string());
        let Some(candidate) = self.candidates.into_iter().next() else {
            if let Some(reason) = self.prompt_feedback.and_then(|f| f.block_reason) {
                return Err(CompletionError::new(
                    FailureKind::Blocked {
                        reason: reason.clone(),
                    },
                    format!("prompt blocked: {reason}"),
                ));
            }
            return Err(CompletionError::new(
                FailureKind::Malformed,
                "reply carried no candidates",
            ));
        };

        // Text parts are concatenated in order; a candidate without any is malformed.
        let texts: Vec<String> = candidate
            .content
            .map(|content| content.parts)
            .unwrap_or_default()
            .into_iter()
            .filter_map(|part| part.text)
            .collect();
        if texts.is_empty() {
            return Err(CompletionError::new(
                FailureKind::Malformed,
                "reply carried no text",
            ));
        }

        Ok(Completion {
            text: texts.concat(),
            model,
            finish_reason: candidate.finish_reason,
        })
    }
}
