//! Gemini API client
//!
//! Direct HTTP client for the Gemini REST API. Implements
//! [`GenerativeService`] so the orchestrators can stay transport-agnostic.

use crate::config::ScoutConfig;
use crate::error::AppError;
use crate::gemini::types::{
    Content, GenerateContentRequest, GenerateContentResponse, GenerationConfig, ImageConfig,
    Operation, PredictLongRunningRequest, ThinkingConfig, VideoImage, VideoInstance,
    VideoParameters,
};
use crate::orchestrator::plan_types::{GroundedText, ImageData, MapSource};
use crate::orchestrator::service::{
    ChatTurnRequest, GenerativeService, ImageRequest, JobStatus, StructuredRequest, TextRequest,
    TurnRole, VideoOperation, VideoRequest,
};
use anyhow::anyhow;
use async_trait::async_trait;
use serde::{de::DeserializeOwned, Serialize};
use std::time::Duration;

/// Finish reasons that mean the safety filter stopped generation
const BLOCKING_FINISH_REASONS: &[&str] = &[
    "SAFETY",
    "PROHIBITED_CONTENT",
    "BLOCKLIST",
    "SPII",
    "IMAGE_SAFETY",
    "IMAGE_PROHIBITED_CONTENT",
];

/// HTTP client for the Gemini API
#[derive(Clone)]
pub struct GeminiClient {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl GeminiClient {
    /// Create a client from configuration
    ///
    /// # Errors
    /// * Returns `AppError::Internal` if the HTTP client cannot be built.
    pub fn new(config: &ScoutConfig) -> Result<Self, AppError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .map_err(|e| AppError::Internal(anyhow!("Failed to create HTTP client: {}", e)))?;

        tracing::info!(base_url = %config.api_base_url, "Gemini client initialized");

        Ok(Self {
            client,
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
        })
    }

    fn ensure_key(&self) -> Result<(), AppError> {
        if self.api_key.is_empty() {
            return Err(AppError::AuthenticationFailure("API key is empty".to_string()));
        }
        Ok(())
    }

    /// Send a request and decode a JSON body, normalizing every failure
    async fn send_json<R: DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<R, AppError> {
        self.ensure_key()?;

        let response = request
            .query(&[("key", self.api_key.as_str())])
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();
        if !status.is_success() {
            let status_code = status.as_u16();
            let error_body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unable to read error body".to_string());

            tracing::error!(
                status_code = status_code,
                error_body = %error_body,
                "Gemini API returned error status"
            );

            return Err(AppError::from_http(status_code, &error_body));
        }

        let response_body = response.text().await.map_err(map_transport_error)?;

        serde_json::from_str(&response_body).map_err(|e| {
            AppError::MalformedResponse(format!(
                "Failed to parse JSON response from Gemini API: {} - Response body: {}",
                e, response_body
            ))
        })
    }

    async fn post_json<T: Serialize, R: DeserializeOwned>(
        &self,
        url: &str,
        body: &T,
    ) -> Result<R, AppError> {
        self.send_json(self.client.post(url).json(body)).await
    }

    /// Call `generateContent` and reject blocked responses
    async fn generate_content(
        &self,
        model: &str,
        request: &GenerateContentRequest,
    ) -> Result<GenerateContentResponse, AppError> {
        let url = format!("{}/models/{}:generateContent", self.base_url, model);

        tracing::debug!(
            model = %model,
            turns = request.contents.len(),
            json_mode = request
                .generation_config
                .as_ref()
                .and_then(|c| c.response_mime_type.as_ref())
                .is_some(),
            "Calling Gemini generateContent"
        );

        let parsed: GenerateContentResponse = self.post_json(&url, request).await?;

        if let Some(reason) = parsed
            .prompt_feedback
            .as_ref()
            .and_then(|f| f.block_reason.as_ref())
        {
            return Err(AppError::ContentBlocked(format!(
                "Gemini API blocked the prompt: {}",
                reason
            )));
        }

        if let Some(candidate) = parsed.candidates.first() {
            if let Some(reason) = candidate.finish_reason.as_deref() {
                if BLOCKING_FINISH_REASONS.contains(&reason) {
                    return Err(AppError::ContentBlocked(format!(
                        "Gemini API stopped generation: {}",
                        reason
                    )));
                }
            }
        }

        Ok(parsed)
    }
}

fn map_transport_error(e: reqwest::Error) -> AppError {
    if e.is_timeout() || e.is_connect() {
        AppError::ServiceUnavailable(format!("Failed to reach Gemini API: {}", e))
    } else {
        AppError::classify_message(&format!("HTTP request to Gemini API failed: {}", e))
    }
}

/// Concatenate the answer text of the first candidate
fn extract_text(response: &GenerateContentResponse) -> Result<String, AppError> {
    let candidate = response.candidates.first().ok_or_else(|| {
        AppError::MalformedResponse("Gemini API response contains no candidates".to_string())
    })?;

    let text: String = candidate
        .content
        .iter()
        .flat_map(|c| c.parts.iter())
        .filter(|p| p.thought != Some(true))
        .filter_map(|p| p.text.as_deref())
        .collect();

    if text.trim().is_empty() {
        return Err(AppError::MalformedResponse(
            "Gemini API response text is empty".to_string(),
        ));
    }
    Ok(text)
}

fn extract_sources(response: &GenerateContentResponse) -> Vec<MapSource> {
    let mut sources: Vec<MapSource> = Vec::new();
    let chunks = response
        .candidates
        .first()
        .and_then(|c| c.grounding_metadata.as_ref())
        .map(|m| m.grounding_chunks.as_slice())
        .unwrap_or_default();

    for chunk in chunks {
        let Some(link) = chunk.maps.as_ref().or(chunk.web.as_ref()) else {
            continue;
        };
        let Some(uri) = link.uri.clone() else {
            continue;
        };
        if sources.iter().any(|s| s.uri == uri) {
            continue;
        }
        sources.push(MapSource {
            title: link.title.clone().unwrap_or_else(|| uri.clone()),
            uri,
        });
    }
    sources
}

impl From<Operation> for VideoOperation {
    fn from(op: Operation) -> Self {
        let status = if !op.done {
            JobStatus::Pending
        } else if let Some(error) = &op.error {
            JobStatus::Failed {
                message: error.message.clone(),
            }
        } else {
            JobStatus::Succeeded {
                video_uri: op.video_uri().map(str::to_string),
            }
        };
        VideoOperation {
            name: op.name,
            status,
        }
    }
}

#[async_trait]
impl GenerativeService for GeminiClient {
    async fn generate_text(&self, request: TextRequest) -> Result<GroundedText, AppError> {
        let mut body = GenerateContentRequest {
            contents: vec![Content::text(Some("user"), request.prompt)],
            ..Default::default()
        };
        if request.maps_grounding {
            body.tools.push(serde_json::json!({ "googleMaps": {} }));
        }

        let response = self.generate_content(&request.model, &body).await?;
        Ok(GroundedText {
            text: extract_text(&response)?,
            sources: extract_sources(&response),
        })
    }

    async fn generate_structured(&self, request: StructuredRequest) -> Result<String, AppError> {
        let body = GenerateContentRequest {
            contents: vec![Content::text(Some("user"), request.prompt)],
            generation_config: Some(GenerationConfig {
                response_mime_type: Some("application/json".to_string()),
                response_schema: Some(request.schema),
                thinking_config: request
                    .thinking_budget
                    .map(|thinking_budget| ThinkingConfig { thinking_budget }),
                ..Default::default()
            }),
            ..Default::default()
        };

        let response = self.generate_content(&request.model, &body).await?;
        let text = extract_text(&response)?;

        tracing::debug!(
            response_len = text.len(),
            "Received structured response from Gemini API"
        );
        Ok(text)
    }

    async fn generate_image(&self, request: ImageRequest) -> Result<Option<ImageData>, AppError> {
        let body = GenerateContentRequest {
            contents: vec![Content::text(Some("user"), request.prompt)],
            generation_config: Some(GenerationConfig {
                response_modalities: Some(vec!["IMAGE".to_string()]),
                image_config: request.aspect_ratio.map(|ratio| ImageConfig {
                    aspect_ratio: ratio.as_str().to_string(),
                }),
                ..Default::default()
            }),
            ..Default::default()
        };

        let response = self.generate_content(&request.model, &body).await?;
        let image = response
            .candidates
            .first()
            .and_then(|c| c.content.as_ref())
            .and_then(|content| content.parts.iter().find_map(|p| p.inline_data.as_ref()))
            .map(|inline| ImageData {
                mime_type: inline.mime_type.clone(),
                base64: inline.data.clone(),
            });
        Ok(image)
    }

    async fn submit_video_job(&self, request: VideoRequest) -> Result<VideoOperation, AppError> {
        let url = format!("{}/models/{}:predictLongRunning", self.base_url, request.model);
        let body = PredictLongRunningRequest {
            instances: vec![VideoInstance {
                prompt: request.prompt,
                image: VideoImage {
                    bytes_base64_encoded: request.image.base64,
                    mime_type: request.image.mime_type,
                },
            }],
            parameters: VideoParameters {
                aspect_ratio: request.aspect_ratio.as_str().to_string(),
                sample_count: request.sample_count,
                resolution: request.resolution,
            },
        };

        tracing::debug!(model = %request.model, "Submitting video job");
        let operation: Operation = self.post_json(&url, &body).await?;
        Ok(operation.into())
    }

    async fn poll_video_job(
        &self,
        operation: &VideoOperation,
    ) -> Result<VideoOperation, AppError> {
        let url = format!("{}/{}", self.base_url, operation.name);
        let refreshed: Operation = self.send_json(self.client.get(&url)).await?;
        Ok(refreshed.into())
    }

    async fn fetch_video_bytes(&self, uri: &str) -> Result<Vec<u8>, AppError> {
        self.ensure_key()?;

        let response = self
            .client
            .get(uri)
            .query(&[("key", self.api_key.as_str())])
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::from_http(status.as_u16(), &body));
        }

        let bytes = response.bytes().await.map_err(map_transport_error)?;
        if bytes.is_empty() {
            return Err(AppError::EmptyResult("Downloaded video is empty".to_string()));
        }
        Ok(bytes.to_vec())
    }

    async fn chat_send(&self, request: ChatTurnRequest) -> Result<String, AppError> {
        let mut contents: Vec<Content> = request
            .history
            .iter()
            .map(|turn| {
                let role = match turn.role {
                    TurnRole::User => "user",
                    TurnRole::Model => "model",
                };
                Content::text(Some(role), turn.text.clone())
            })
            .collect();
        contents.push(Content::text(Some("user"), request.text));

        let body = GenerateContentRequest {
            contents,
            system_instruction: Some(Content::text(None, request.system_context)),
            ..Default::default()
        };

        let response = self.generate_content(&request.model, &body).await?;
        extract_text(&response)
    }
}
