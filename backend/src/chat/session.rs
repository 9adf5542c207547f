//! Follow-up chat session
//!
//! A session is opened once per generated travel plan. It keeps the
//! serialized plan as fixed system context, the visible transcript, and the
//! turns the service has actually seen. Callers only ever pass the new user
//! text; prior turns travel with the session.
//!
//! Sending is split in two so the view can own the session while the request
//! runs elsewhere: [`ChatSession::begin_send`] appends the user message
//! optimistically and returns a [`PendingReply`]; resolving it yields a
//! [`ChatReply`] that [`ChatSession::apply_reply`] appends.

use crate::chat::models::{ChatMessage, MessageRole};
use crate::orchestrator::plan_types::TravelPlan;
use crate::orchestrator::prompts::{chat_system_context, CHAT_FALLBACK_REPLY};
use crate::orchestrator::service::{ChatTurn, ChatTurnRequest, GenerativeService, TurnRole};
use uuid::Uuid;

/// Conversation bound to one travel plan
#[derive(Debug, Clone)]
pub struct ChatSession {
    id: Uuid,
    model: String,
    system_context: String,
    transcript: Vec<ChatMessage>,
    /// Turns acknowledged by the service (failed exchanges are not included)
    history: Vec<ChatTurn>,
    awaiting_reply: bool,
}

/// An issued chat request that has not resolved yet
#[derive(Debug)]
pub struct PendingReply {
    session_id: Uuid,
    request: ChatTurnRequest,
}

/// Outcome of a chat request
#[derive(Debug, Clone)]
pub struct ChatReply {
    /// Session the request was issued on
    pub session_id: Uuid,
    /// The user text that was sent
    pub prompt: String,
    /// Model answer, `None` when the request failed
    pub answer: Option<String>,
}

impl ChatReply {
    /// The model-role message to show: the answer or the generic fallback
    pub fn message(&self) -> ChatMessage {
        ChatMessage::model(self.answer.as_deref().unwrap_or(CHAT_FALLBACK_REPLY))
    }
}

impl ChatSession {
    /// Open a session seeded with the full plan
    pub fn open(plan: &TravelPlan, location: &str, model: impl Into<String>) -> Self {
        let session = Self {
            id: Uuid::new_v4(),
            model: model.into(),
            system_context: chat_system_context(plan, location),
            transcript: Vec::new(),
            history: Vec::new(),
            awaiting_reply: false,
        };
        tracing::debug!(
            session_id = %session.id,
            context_len = session.system_context.len(),
            "Chat session opened"
        );
        session
    }

    /// Session identifier
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Fixed system context (the serialized plan)
    pub fn system_context(&self) -> &str {
        &self.system_context
    }

    /// Visible messages, oldest first
    pub fn transcript(&self) -> &[ChatMessage] {
        &self.transcript
    }

    /// Whether a request is outstanding
    pub fn is_awaiting_reply(&self) -> bool {
        self.awaiting_reply
    }

    /// Append the user message and build the request
    ///
    /// Returns `None` (and changes nothing) for blank text or while a reply
    /// is still outstanding.
    pub fn begin_send(&mut self, text: &str) -> Option<PendingReply> {
        let text = text.trim();
        if text.is_empty() || self.awaiting_reply {
            return None;
        }

        self.transcript.push(ChatMessage::user(text));
        self.awaiting_reply = true;

        Some(PendingReply {
            session_id: self.id,
            request: ChatTurnRequest {
                model: self.model.clone(),
                system_context: self.system_context.clone(),
                history: self.history.clone(),
                text: text.to_string(),
            },
        })
    }

    /// Append a resolved reply
    ///
    /// Returns `false` if the reply belongs to a different (replaced) session.
    pub fn apply_reply(&mut self, reply: ChatReply) -> bool {
        if reply.session_id != self.id {
            tracing::debug!(
                session_id = %self.id,
                reply_session_id = %reply.session_id,
                "Discarding chat reply for a replaced session"
            );
            return false;
        }

        self.transcript.push(reply.message());
        if let Some(answer) = reply.answer {
            self.history.push(ChatTurn {
                role: TurnRole::User,
                text: reply.prompt,
            });
            self.history.push(ChatTurn {
                role: TurnRole::Model,
                text: answer,
            });
        }
        self.awaiting_reply = false;
        true
    }

    /// Send and apply in one step
    ///
    /// # Returns
    /// * `Some(String)` - The model text appended (answer or fallback)
    /// * `None` - Nothing was sent
    pub async fn send(&mut self, service: &dyn GenerativeService, text: &str) -> Option<String> {
        let pending = self.begin_send(text)?;
        let reply = pending.resolve(service).await;
        let shown = reply.message().content;
        self.apply_reply(reply);
        Some(shown)
    }

    /// Count of messages from one role
    pub fn count(&self, role: MessageRole) -> usize {
        self.transcript.iter().filter(|m| m.role == role).count()
    }
}

impl PendingReply {
    /// Session the request belongs to
    pub fn session_id(&self) -> Uuid {
        self.session_id
    }

    /// Issue the request; failures become an unanswered reply
    pub async fn resolve(self, service: &dyn GenerativeService) -> ChatReply {
        let prompt = self.request.text.clone();
        let answer = match service.chat_send(self.request).await {
            Ok(text) => Some(text),
            Err(e) => {
                tracing::warn!(
                    session_id = %self.session_id,
                    error = %e,
                    "Chat request failed, showing fallback reply"
                );
                None
            }
        };
        ChatReply {
            session_id: self.session_id,
            prompt,
            answer,
        }
    }
}
