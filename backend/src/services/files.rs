//! File system service
//!
//! Materializes downloaded videos as local files and writes one-way exports
//! (plain-text plans, video copies). Nothing here is ever read back.

use crate::error::AppError;
use crate::orchestrator::plan_types::TravelPlan;
use serde::Serialize;
use std::path::{Path, PathBuf};
use tokio::fs;
use uuid::Uuid;

/// MIME type of materialized videos
pub const VIDEO_MIME_TYPE: &str = "video/mp4";

/// A locally playable video file
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VideoResource {
    /// Canonical path of the file
    pub path: PathBuf,
    /// MIME type
    pub mime_type: String,
    /// File size in bytes
    pub size: u64,
}

/// File system service
pub struct FileService;

impl FileService {
    /// Write downloaded video bytes to a fresh file under `media_dir`
    ///
    /// # Arguments
    /// * `media_dir` - Directory for materialized media (created if missing)
    /// * `bytes` - Video container bytes, written unexamined
    ///
    /// # Returns
    /// * `Ok(VideoResource)` - Handle to the written file
    /// * `Err(AppError)` - If the directory or file cannot be written
    pub async fn materialize_video(media_dir: &Path, bytes: &[u8]) -> Result<VideoResource, AppError> {
        if bytes.is_empty() {
            return Err(AppError::EmptyResult("video payload is empty".to_string()));
        }

        fs::create_dir_all(media_dir).await?;
        let path = media_dir.join(format!("drone-{}.mp4", Uuid::new_v4()));
        fs::write(&path, bytes).await?;
        let path = fs::canonicalize(&path).await?;

        tracing::debug!(path = %path.display(), size = bytes.len(), "Video materialized");

        Ok(VideoResource {
            path,
            mime_type: VIDEO_MIME_TYPE.to_string(),
            size: bytes.len() as u64,
        })
    }

    /// Delete a materialized video that is no longer shown
    /// Failures are logged; a missing file is not an error
    pub fn remove_video(video: &VideoResource) {
        match std::fs::remove_file(&video.path) {
            Ok(()) => tracing::debug!(path = %video.path.display(), "Video removed"),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => {
                tracing::warn!(path = %video.path.display(), error = %e, "Failed to remove video")
            }
        }
    }

    /// Save a plan as a plain-text report
    ///
    /// # Returns
    /// * `Ok(PathBuf)` - Path of the written file
    pub async fn save_plan(
        export_dir: &Path,
        location: &str,
        plan: &TravelPlan,
    ) -> Result<PathBuf, AppError> {
        fs::create_dir_all(export_dir).await?;
        let path = export_dir.join(format!("{}-travel-plan.txt", file_stem(location)));
        fs::write(&path, plan.to_report(location)).await?;

        tracing::info!(path = %path.display(), "Travel plan saved");
        Ok(path)
    }

    /// Copy a materialized video into the export directory
    ///
    /// # Returns
    /// * `Ok(PathBuf)` - Path of the copy
    pub async fn save_video(
        export_dir: &Path,
        location: &str,
        video: &VideoResource,
    ) -> Result<PathBuf, AppError> {
        fs::create_dir_all(export_dir).await?;
        let path = export_dir.join(format!("{}-drone.mp4", file_stem(location)));
        fs::copy(&video.path, &path).await?;

        tracing::info!(path = %path.display(), "Drone video saved");
        Ok(path)
    }
}

/// Turn a free-text location into a safe file name stem
pub fn file_stem(location: &str) -> String {
    let mut stem = String::with_capacity(location.len());
    for c in location.trim().chars() {
        if c.is_alphanumeric() {
            stem.extend(c.to_lowercase());
        } else if !stem.ends_with('-') && !stem.is_empty() {
            stem.push('-');
        }
    }
    let stem = stem.trim_end_matches('-');
    if stem.is_empty() {
        "location".to_string()
    } else {
        stem.to_string()
    }
}
