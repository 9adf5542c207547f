//! Application configuration
//!
//! Centralized configuration management with environment variable support
//! and sensible defaults.

use crate::error::AppError;
use std::env;
use std::path::PathBuf;
use std::time::Duration;

/// Gemini REST API base URL
pub const GEMINI_API_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Application configuration
#[derive(Debug, Clone)]
pub struct ScoutConfig {
    /// API key used for every request
    pub api_key: String,
    /// Base URL of the generative service
    pub api_base_url: String,
    /// Model names per request family
    pub models: ModelConfig,
    /// Thinking budget for the full travel profile request
    pub thinking_budget: u32,
    /// Video job configuration
    pub video: VideoConfig,
    /// Per-request HTTP timeout (in seconds)
    pub request_timeout_secs: u64,
    /// Directory where fetched videos are materialized
    pub media_dir: PathBuf,
    /// Directory where saved plans and videos are written
    pub export_dir: PathBuf,
}

/// Model names
#[derive(Debug, Clone)]
pub struct ModelConfig {
    /// Plain (grounded) text generation
    pub text: String,
    /// Structured JSON generation
    pub structured: String,
    /// Image generation
    pub image: String,
    /// Video synthesis
    pub video: String,
    /// Follow-up chat
    pub chat: String,
}

/// Video job configuration
#[derive(Debug, Clone)]
pub struct VideoConfig {
    /// Fixed wait between status queries (in seconds)
    pub poll_interval_secs: u64,
    /// Give up after this long (in seconds)
    pub max_wait_secs: u64,
    /// Resolution tier requested for every job
    pub resolution: String,
}

impl Default for ScoutConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            api_base_url: GEMINI_API_BASE_URL.to_string(),
            models: ModelConfig::default(),
            thinking_budget: 32768,
            video: VideoConfig::default(),
            request_timeout_secs: 300,
            media_dir: env::temp_dir().join("travel-scout"),
            export_dir: default_export_dir(),
        }
    }
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            text: "gemini-2.5-flash".to_string(),
            structured: "gemini-2.5-pro".to_string(),
            image: "gemini-2.5-flash-image".to_string(),
            video: "veo-3.1-fast-generate-preview".to_string(),
            chat: "gemini-2.5-flash".to_string(),
        }
    }
}

impl Default for VideoConfig {
    fn default() -> Self {
        Self {
            poll_interval_secs: 5,
            max_wait_secs: 600, // 10 minutes
            resolution: "720p".to_string(),
        }
    }
}

impl ScoutConfig {
    /// Load configuration from environment variables with defaults
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            api_key: env::var("GEMINI_API_KEY").unwrap_or_default(),
            api_base_url: env::var("GEMINI_API_BASE_URL").unwrap_or(defaults.api_base_url),
            models: ModelConfig {
                text: env::var("SCOUT_TEXT_MODEL").unwrap_or(defaults.models.text),
                structured: env::var("SCOUT_STRUCTURED_MODEL")
                    .unwrap_or(defaults.models.structured),
                image: env::var("SCOUT_IMAGE_MODEL").unwrap_or(defaults.models.image),
                video: env::var("SCOUT_VIDEO_MODEL").unwrap_or(defaults.models.video),
                chat: env::var("SCOUT_CHAT_MODEL").unwrap_or(defaults.models.chat),
            },
            thinking_budget: env_parse("SCOUT_THINKING_BUDGET").unwrap_or(defaults.thinking_budget),
            video: VideoConfig {
                poll_interval_secs: env_parse("SCOUT_VIDEO_POLL_SECS")
                    .unwrap_or(defaults.video.poll_interval_secs),
                max_wait_secs: env_parse("SCOUT_VIDEO_MAX_WAIT_SECS")
                    .unwrap_or(defaults.video.max_wait_secs),
                resolution: defaults.video.resolution,
            },
            request_timeout_secs: env_parse("SCOUT_REQUEST_TIMEOUT_SECS")
                .unwrap_or(defaults.request_timeout_secs),
            media_dir: env::var_os("SCOUT_MEDIA_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.media_dir),
            export_dir: env::var_os("SCOUT_EXPORT_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.export_dir),
        }
    }

    /// Reject settings that would make the orchestrators misbehave
    pub fn validate(&self) -> Result<(), AppError> {
        if self.video.poll_interval_secs == 0 {
            return Err(AppError::InvalidInput(
                "video poll interval must be > 0".to_string(),
            ));
        }
        if self.video.max_wait_secs < self.video.poll_interval_secs {
            return Err(AppError::InvalidInput(
                "video max wait must be at least one poll interval".to_string(),
            ));
        }
        let models = [
            &self.models.text,
            &self.models.structured,
            &self.models.image,
            &self.models.video,
            &self.models.chat,
        ];
        if models.iter().any(|m| m.trim().is_empty()) {
            return Err(AppError::InvalidInput("model names cannot be empty".to_string()));
        }
        Ok(())
    }

    /// Copy of this configuration using a different API key
    pub fn with_api_key(&self, api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            ..self.clone()
        }
    }

    /// Poll interval as a `Duration`
    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.video.poll_interval_secs)
    }

    /// Maximum video wait as a `Duration`
    pub fn max_video_wait(&self) -> Duration {
        Duration::from_secs(self.video.max_wait_secs)
    }
}

fn env_parse<T: std::str::FromStr>(key: &str) -> Option<T> {
    env::var(key).ok().and_then(|v| v.parse().ok())
}

fn default_export_dir() -> PathBuf {
    // Default to ~/Downloads or current directory
    match env::var_os("HOME") {
        Some(home) => PathBuf::from(home).join("Downloads"),
        None => PathBuf::from("."),
    }
}
