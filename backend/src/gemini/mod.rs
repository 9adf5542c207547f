//! Gemini REST client
//!
//! Wire types and the HTTP client implementing the generative service.

pub mod client;
pub mod types;

pub use client::GeminiClient;
