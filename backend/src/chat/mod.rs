//! Chat module
//!
//! Follow-up conversation about a generated travel plan.

pub mod models;
pub mod session;

pub use models::{ChatMessage, MessageRole};
pub use session::{ChatReply, ChatSession, PendingReply};
