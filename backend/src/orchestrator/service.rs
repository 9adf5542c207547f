//! Generative service seam
//!
//! The orchestrators never talk HTTP themselves. They call a
//! [`GenerativeService`], which the Gemini client implements and tests stub.
//! A [`ServiceContext`] bundles the service with the configuration and is
//! passed explicitly into every orchestrator call.

use crate::config::ScoutConfig;
use crate::error::AppError;
use crate::orchestrator::plan_types::{AspectRatio, GroundedText, ImageData};
use async_trait::async_trait;
use std::sync::Arc;

/// Plain text request, optionally grounded on map data
#[derive(Debug, Clone)]
pub struct TextRequest {
    /// Model name
    pub model: String,
    /// Prompt text
    pub prompt: String,
    /// Attach the map grounding tool
    pub maps_grounding: bool,
}

/// JSON-constrained request
#[derive(Debug, Clone)]
pub struct StructuredRequest {
    /// Model name
    pub model: String,
    /// Prompt text (also restates the expected shape)
    pub prompt: String,
    /// Response schema hint
    pub schema: serde_json::Value,
    /// Optional reasoning budget
    pub thinking_budget: Option<u32>,
}

/// Image generation request
#[derive(Debug, Clone)]
pub struct ImageRequest {
    /// Model name
    pub model: String,
    /// Prompt text
    pub prompt: String,
    /// Structured aspect ratio hint
    pub aspect_ratio: Option<AspectRatio>,
}

/// Video job submission
#[derive(Debug, Clone)]
pub struct VideoRequest {
    /// Model name
    pub model: String,
    /// Motion/style prompt
    pub prompt: String,
    /// Reference still
    pub image: ImageData,
    /// Output aspect ratio
    pub aspect_ratio: AspectRatio,
    /// Resolution tier
    pub resolution: String,
    /// Number of videos (always one)
    pub sample_count: u32,
}

/// Status of a video job
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobStatus {
    /// Still running
    Pending,
    /// Finished with a result
    Succeeded {
        /// Download URI, if the job reported one
        video_uri: Option<String>,
    },
    /// Finished with the job's own error text
    Failed {
        /// Error text reported by the job
        message: String,
    },
}

/// Handle of a submitted video job
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoOperation {
    /// Operation name, used for every status query
    pub name: String,
    /// Status as of the last query
    pub status: JobStatus,
}

impl VideoOperation {
    /// Whether no further state transition will occur
    pub fn is_terminal(&self) -> bool {
        !matches!(self.status, JobStatus::Pending)
    }
}

/// Who sent a chat turn
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnRole {
    /// The person asking
    User,
    /// The model answering
    Model,
}

/// One prior chat turn carried with a chat request
#[derive(Debug, Clone)]
pub struct ChatTurn {
    /// Author of the turn
    pub role: TurnRole,
    /// Turn text
    pub text: String,
}

/// A chat request: fixed context, prior turns, and the new user text
#[derive(Debug, Clone)]
pub struct ChatTurnRequest {
    /// Model name
    pub model: String,
    /// Fixed system context
    pub system_context: String,
    /// Earlier turns, oldest first
    pub history: Vec<ChatTurn>,
    /// The new user message
    pub text: String,
}

/// Operations the orchestration core needs from the generative service
#[async_trait]
pub trait GenerativeService: Send + Sync {
    /// Free text, optionally with map sources
    async fn generate_text(&self, request: TextRequest) -> Result<GroundedText, AppError>;

    /// Raw JSON text; callers parse it defensively
    async fn generate_structured(&self, request: StructuredRequest) -> Result<String, AppError>;

    /// One inline image, or `None` when the response had no image part
    async fn generate_image(&self, request: ImageRequest) -> Result<Option<ImageData>, AppError>;

    /// Submit a video job and return its handle
    async fn submit_video_job(&self, request: VideoRequest) -> Result<VideoOperation, AppError>;

    /// Re-query a job using its handle
    async fn poll_video_job(&self, operation: &VideoOperation)
        -> Result<VideoOperation, AppError>;

    /// Authenticated download of a finished video
    async fn fetch_video_bytes(&self, uri: &str) -> Result<Vec<u8>, AppError>;

    /// One chat reply
    async fn chat_send(&self, request: ChatTurnRequest) -> Result<String, AppError>;
}

/// Service plus configuration, threaded into every orchestrator call
#[derive(Clone)]
pub struct ServiceContext {
    /// The generative service
    pub service: Arc<dyn GenerativeService>,
    /// Current configuration
    pub config: Arc<ScoutConfig>,
}

impl ServiceContext {
    /// Bundle a service with its configuration
    pub fn new(service: Arc<dyn GenerativeService>, config: ScoutConfig) -> Self {
        Self {
            service,
            config: Arc::new(config),
        }
    }

    /// Build a context backed by the Gemini REST client
    pub fn gemini(config: ScoutConfig) -> Result<Self, AppError> {
        config.validate()?;
        let client = crate::gemini::GeminiClient::new(&config)?;
        Ok(Self::new(Arc::new(client), config))
    }

    /// Rebuild the context after the user picked a different API key
    pub fn with_credential(&self, api_key: &str) -> Result<Self, AppError> {
        tracing::info!("Credential changed, rebuilding service client");
        Self::gemini(self.config.with_api_key(api_key))
    }
}

impl std::fmt::Debug for ServiceContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceContext")
            .field("api_base_url", &self.config.api_base_url)
            .finish_non_exhaustive()
    }
}
