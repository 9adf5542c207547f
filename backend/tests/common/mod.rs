//! Shared fixtures for integration tests
//!
//! `StubService` is a scripted [`GenerativeService`]: every response is queued
//! up front and every call is recorded so tests can assert on counts, order
//! and timing.

#![allow(dead_code)]

use async_trait::async_trait;
use std::collections::VecDeque;
use std::path::Path;
use std::sync::{Arc, Mutex};
use tokio::time::Instant;
use travel_scout_backend::config::ScoutConfig;
use travel_scout_backend::error::AppError;
use travel_scout_backend::orchestrator::plan_types::{GroundedText, ImageData};
use travel_scout_backend::orchestrator::service::{
    ChatTurnRequest, GenerativeService, ImageRequest, JobStatus, ServiceContext, StructuredRequest,
    TextRequest, VideoOperation, VideoRequest,
};

/// How the stub answers image requests
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageMode {
    /// Return a small PNG payload
    Succeed,
    /// Return a service error
    Fail,
    /// Return a response without an image part
    Empty,
}

/// Scripted generative service
pub struct StubService {
    structured: Mutex<VecDeque<Result<String, AppError>>>,
    text: Mutex<VecDeque<Result<GroundedText, AppError>>>,
    chat: Mutex<VecDeque<Result<String, AppError>>>,
    polls: Mutex<VecDeque<JobStatus>>,
    image_mode: Mutex<ImageMode>,
    video_bytes: Vec<u8>,
    /// Every image request, in call order
    pub image_requests: Mutex<Vec<ImageRequest>>,
    /// Every structured request, in call order
    pub structured_requests: Mutex<Vec<StructuredRequest>>,
    /// Every video submission
    pub video_requests: Mutex<Vec<VideoRequest>>,
    /// Instants at which status queries arrived
    pub poll_instants: Mutex<Vec<Instant>>,
    /// Every chat request
    pub chat_requests: Mutex<Vec<ChatTurnRequest>>,
    /// URIs fetched
    pub fetched: Mutex<Vec<String>>,
}

impl StubService {
    pub fn new() -> Self {
        Self {
            structured: Mutex::new(VecDeque::new()),
            text: Mutex::new(VecDeque::new()),
            chat: Mutex::new(VecDeque::new()),
            polls: Mutex::new(VecDeque::new()),
            image_mode: Mutex::new(ImageMode::Succeed),
            video_bytes: b"\x00\x00\x00\x18ftypmp42".to_vec(),
            image_requests: Mutex::new(Vec::new()),
            structured_requests: Mutex::new(Vec::new()),
            video_requests: Mutex::new(Vec::new()),
            poll_instants: Mutex::new(Vec::new()),
            chat_requests: Mutex::new(Vec::new()),
            fetched: Mutex::new(Vec::new()),
        }
    }

    pub fn push_structured(&self, response: Result<String, AppError>) -> &Self {
        self.structured.lock().unwrap().push_back(response);
        self
    }

    pub fn push_text(&self, response: Result<GroundedText, AppError>) -> &Self {
        self.text.lock().unwrap().push_back(response);
        self
    }

    pub fn push_chat(&self, response: Result<String, AppError>) -> &Self {
        self.chat.lock().unwrap().push_back(response);
        self
    }

    pub fn push_poll(&self, status: JobStatus) -> &Self {
        self.polls.lock().unwrap().push_back(status);
        self
    }

    pub fn set_image_mode(&self, mode: ImageMode) {
        *self.image_mode.lock().unwrap() = mode;
    }

    pub fn image_calls(&self) -> usize {
        self.image_requests.lock().unwrap().len()
    }

    pub fn poll_calls(&self) -> usize {
        self.poll_instants.lock().unwrap().len()
    }
}

#[async_trait]
impl GenerativeService for StubService {
    async fn generate_text(&self, _request: TextRequest) -> Result<GroundedText, AppError> {
        self.text
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(AppError::RequestFailed("no scripted text".to_string())))
    }

    async fn generate_structured(&self, request: StructuredRequest) -> Result<String, AppError> {
        self.structured_requests.lock().unwrap().push(request);
        self.structured
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(AppError::RequestFailed("no scripted response".to_string())))
    }

    async fn generate_image(&self, request: ImageRequest) -> Result<Option<ImageData>, AppError> {
        self.image_requests.lock().unwrap().push(request);
        let mode = *self.image_mode.lock().unwrap();
        match mode {
            ImageMode::Succeed => Ok(Some(ImageData {
                mime_type: "image/png".to_string(),
                base64: "iVBORw0KGgo=".to_string(),
            })),
            ImageMode::Fail => Err(AppError::ServiceUnavailable("model overloaded".to_string())),
            ImageMode::Empty => Ok(None),
        }
    }

    async fn submit_video_job(&self, request: VideoRequest) -> Result<VideoOperation, AppError> {
        self.video_requests.lock().unwrap().push(request);
        Ok(VideoOperation {
            name: "models/veo/operations/stub-1".to_string(),
            status: JobStatus::Pending,
        })
    }

    async fn poll_video_job(
        &self,
        operation: &VideoOperation,
    ) -> Result<VideoOperation, AppError> {
        self.poll_instants.lock().unwrap().push(Instant::now());
        let status = self
            .polls
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(JobStatus::Pending);
        Ok(VideoOperation {
            name: operation.name.clone(),
            status,
        })
    }

    async fn fetch_video_bytes(&self, uri: &str) -> Result<Vec<u8>, AppError> {
        self.fetched.lock().unwrap().push(uri.to_string());
        Ok(self.video_bytes.clone())
    }

    async fn chat_send(&self, request: ChatTurnRequest) -> Result<String, AppError> {
        self.chat_requests.lock().unwrap().push(request);
        self.chat
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(AppError::RequestFailed("no scripted reply".to_string())))
    }
}

/// Configuration pointing media output at `media_dir`
pub fn test_config(media_dir: &Path) -> ScoutConfig {
    let mut config = ScoutConfig::default();
    config.api_key = "test-key".to_string();
    config.media_dir = media_dir.to_path_buf();
    config.export_dir = media_dir.join("exports");
    config
}

/// Context backed by a stub
pub fn stub_context(stub: Arc<StubService>, media_dir: &Path) -> ServiceContext {
    ServiceContext::new(stub, test_config(media_dir))
}

const MONTHS: [&str; 12] = [
    "January", "February", "March", "April", "May", "June", "July", "August", "September",
    "October", "November", "December",
];

const KYOTO_SCORES: [u8; 12] = [35, 40, 85, 95, 60, 45, 55, 60, 50, 75, 95, 40];

/// Fixed travel plan JSON for "Kyoto, Japan"
pub fn kyoto_plan_json() -> String {
    plan_json_with_scores(&KYOTO_SCORES)
}

/// Kyoto plan JSON with every crowd-curve entry labelled with the same month
pub fn plan_json_with_month(month: &str) -> String {
    let mut plan: serde_json::Value = serde_json::from_str(&kyoto_plan_json()).unwrap();
    if let Some(curve) = plan["weather"]["crowd_curve"].as_array_mut() {
        for entry in curve {
            entry["month"] = serde_json::Value::from(month);
        }
    }
    plan.to_string()
}

/// Travel plan JSON with a custom crowd curve
pub fn plan_json_with_scores(scores: &[u8]) -> String {
    let curve: Vec<serde_json::Value> = scores
        .iter()
        .enumerate()
        .map(|(i, score)| {
            serde_json::json!({ "month": MONTHS[i % MONTHS.len()], "score": score })
        })
        .collect();

    serde_json::json!({
        "confidence": "High",
        "overview": "Former imperial capital known for temples, gardens and wooden machiya.",
        "disaster_profile": {
            "zone_type": "Seismic and typhoon zone",
            "risk_score": "6/10",
            "details": "Moderate earthquake risk; typhoons in late summer."
        },
        "safety_measures": [
            "Register with your embassy",
            "Learn the nearest evacuation shelter",
            "Keep a copy of your passport"
        ],
        "itinerary": [
            "Day 1: Fushimi Inari at dawn, then Gion",
            "Day 2: Arashiyama bamboo grove and Tenryu-ji",
            "Day 3: Kinkaku-ji and Nishiki Market"
        ],
        "weather": {
            "crowd_summary": "Peaks in cherry blossom and autumn foliage seasons.",
            "crowd_curve": curve,
            "best_time": "Late November",
            "forecast": "Cool and dry"
        },
        "photography": {
            "guide": "Arrive before sunrise at popular shrines.",
            "settings": {
                "iso": "200",
                "shutter_speed": "1/125",
                "aperture": "f/8",
                "notes": "Bring a polarizer"
            }
        },
        "trip_guide": {
            "transport": "Buses and the Karasuma subway line",
            "tips": ["Buy an ICOCA card", "Carry cash"],
            "packing": ["Comfortable shoes", "Umbrella"],
            "scam_warnings": "Rare; watch for overpriced rickshaw tours."
        }
    })
    .to_string()
}

/// Hidden gems JSON array with `count` entries
pub fn gems_json(count: usize) -> String {
    let gems: Vec<serde_json::Value> = (0..count)
        .map(|i| {
            serde_json::json!({
                "name": format!("Spot {}", i + 1),
                "description": "A quiet garden away from the crowds.",
                "location_hint": "North of the old town"
            })
        })
        .collect();
    serde_json::Value::Array(gems).to_string()
}
