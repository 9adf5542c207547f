//! Services module
//!
//! Local file operations used by the orchestrators and exports.

pub mod files;

pub use files::{FileService, VideoResource};
