//! Travel Scout Backend Library
//!
//! Orchestration core for the travel scout: Gemini client, orchestrators,
//! follow-up chat, file exports and the view state the GUI renders from.

pub mod chat;
pub mod config;
pub mod error;
pub mod gemini;
pub mod orchestrator;
pub mod services;
/// View state management
///
/// Applies generation-tagged orchestrator events.
pub mod state;
