//! Gemini API wire types
//!
//! Structs that mirror the Gemini REST JSON format (camelCase on the wire).
//! Used to serialize requests and deserialize responses into typed structs.

use serde::{Deserialize, Serialize};

/// Top-level `generateContent` response
#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentResponse {
    /// List of candidate responses from the model
    #[serde(default)]
    pub candidates: Vec<Candidate>,
    /// Optional feedback about the prompt (e.g., if it was blocked)
    #[serde(default)]
    pub prompt_feedback: Option<PromptFeedback>,
}

/// A single candidate response from the model
#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    /// The content of this candidate (absent when generation was blocked)
    #[serde(default)]
    pub content: Option<Content>,
    /// Why the model stopped generating (if applicable)
    #[serde(default)]
    pub finish_reason: Option<String>,
    /// Citations attached by grounding tools
    #[serde(default)]
    pub grounding_metadata: Option<GroundingMetadata>,
}

/// Content structure, used in both directions
#[derive(Serialize, Deserialize, Debug, Default, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Content {
    /// "user" or "model"; omitted for system instructions
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    /// List of content parts
    #[serde(default)]
    pub parts: Vec<Part>,
}

impl Content {
    /// A single text part with a role
    pub fn text(role: Option<&str>, text: impl Into<String>) -> Self {
        Self {
            role: role.map(str::to_string),
            parts: vec![Part::text(text)],
        }
    }
}

/// A single part: text or inline binary data
#[derive(Serialize, Deserialize, Debug, Default, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Part {
    /// The text content of this part
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    /// Inline base64 data (images)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inline_data: Option<InlineData>,
    /// Set on internal reasoning summaries, which are not answer text
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thought: Option<bool>,
}

impl Part {
    /// Text-only part
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            ..Default::default()
        }
    }
}

/// Inline base64 payload
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct InlineData {
    /// MIME type of the payload
    pub mime_type: String,
    /// Base64 data
    pub data: String,
}

/// Feedback about the prompt (e.g., if it was blocked)
#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct PromptFeedback {
    /// Reason the prompt was blocked (if applicable)
    #[serde(default)]
    pub block_reason: Option<String>,
}

/// Grounding metadata attached to a candidate
#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub struct GroundingMetadata {
    /// Cited sources
    #[serde(default)]
    pub grounding_chunks: Vec<GroundingChunk>,
}

/// One cited source
#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub struct GroundingChunk {
    /// Map place citation
    #[serde(default)]
    pub maps: Option<WebLink>,
    /// Web citation
    #[serde(default)]
    pub web: Option<WebLink>,
}

/// Title and URI of a citation
#[derive(Deserialize, Debug, Default)]
pub struct WebLink {
    /// Link target
    #[serde(default)]
    pub uri: Option<String>,
    /// Display title
    #[serde(default)]
    pub title: Option<String>,
}

/// Request structure for `generateContent`
#[derive(Serialize, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentRequest {
    /// Conversation turns (a single user turn for one-shot requests)
    pub contents: Vec<Content>,
    /// Fixed system context
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system_instruction: Option<Content>,
    /// Tools such as map grounding
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tools: Vec<serde_json::Value>,
    /// Optional generation configuration
    #[serde(skip_serializing_if = "Option::is_none")]
    pub generation_config: Option<GenerationConfig>,
}

/// Generation configuration for requests
#[derive(Serialize, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfig {
    /// MIME type to force for response (e.g., "application/json")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_mime_type: Option<String>,
    /// OpenAPI-subset schema the JSON should follow
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_schema: Option<serde_json::Value>,
    /// E.g. ["IMAGE"] for image models
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_modalities: Option<Vec<String>>,
    /// Reasoning budget
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thinking_config: Option<ThinkingConfig>,
    /// Image output settings
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_config: Option<ImageConfig>,
}

/// Thinking budget
#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct ThinkingConfig {
    /// Tokens the model may spend deliberating
    pub thinking_budget: u32,
}

/// Image output settings
#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct ImageConfig {
    /// E.g. "16:9"
    pub aspect_ratio: String,
}

/// Request structure for `predictLongRunning` (video)
#[derive(Serialize, Debug)]
pub struct PredictLongRunningRequest {
    /// One instance per requested video
    pub instances: Vec<VideoInstance>,
    /// Output parameters
    pub parameters: VideoParameters,
}

/// Prompt and reference image for a video job
#[derive(Serialize, Debug)]
pub struct VideoInstance {
    /// Motion/style prompt
    pub prompt: String,
    /// Reference still
    pub image: VideoImage,
}

/// Reference still as raw base64
#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct VideoImage {
    /// Base64 without a data-URI prefix
    pub bytes_base64_encoded: String,
    /// MIME type of the still
    pub mime_type: String,
}

/// Video output parameters
#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct VideoParameters {
    /// "16:9" or "9:16"
    pub aspect_ratio: String,
    /// Number of videos
    pub sample_count: u32,
    /// Resolution tier, e.g. "720p"
    pub resolution: String,
}

/// Long-running operation as returned by submit and poll
#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct Operation {
    /// Operation resource name, used as the poll handle
    pub name: String,
    /// Whether the operation is terminal
    #[serde(default)]
    pub done: bool,
    /// Terminal error
    #[serde(default)]
    pub error: Option<OperationError>,
    /// Terminal result
    #[serde(default)]
    pub response: Option<OperationResponse>,
}

/// Terminal error of an operation
#[derive(Deserialize, Debug)]
pub struct OperationError {
    /// Error text reported by the job
    #[serde(default)]
    pub message: String,
}

/// Terminal result of a video operation
#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct OperationResponse {
    /// Generated videos
    #[serde(default)]
    pub generate_video_response: Option<GenerateVideoResponse>,
}

/// Generated videos
#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct GenerateVideoResponse {
    /// One entry per sample
    #[serde(default)]
    pub generated_samples: Vec<GeneratedSample>,
}

/// A generated video sample
#[derive(Deserialize, Debug)]
pub struct GeneratedSample {
    /// Retrieval handle
    #[serde(default)]
    pub video: Option<VideoFile>,
}

/// Downloadable video
#[derive(Deserialize, Debug)]
pub struct VideoFile {
    /// Authenticated download URI
    #[serde(default)]
    pub uri: Option<String>,
}

impl Operation {
    /// Download URI of the first generated sample, if any
    pub fn video_uri(&self) -> Option<&str> {
        self.response
            .as_ref()?
            .generate_video_response
            .as_ref()?
            .generated_samples
            .iter()
            .find_map(|s| s.video.as_ref()?.uri.as_deref())
    }
}
