//! Farm assistant chat.
//!
//! A [`ChatSession`] keeps the conversation in an append-only
//! [`ConversationLog`] and sends each new message, with the prior history, to
//! a hosted assistant function. The user's message is appended before the
//! call goes out; if the call fails, that entry is removed again so the log
//! only ever holds exchanges the assistant actually answered.

use crate::error::{StoreError, StoreResult};
use crate::protocol::FunctionResponse;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::{debug, error};

/// Invokes hosted functions.
#[async_trait]
pub trait FunctionInvoker: Send + Sync {
    /// Calls `function` with a JSON `body`.
    async fn invoke(&self, function: &str, body: &Value) -> StoreResult<FunctionResponse>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

/// One entry in a conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
    pub timestamp: DateTime<Utc>,
}

impl ChatMessage {
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
            timestamp: Utc::now(),
        }
    }
}

/// Position of an entry in a [`ConversationLog`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EntryHandle(usize);

/// Ordered conversation history.
///
/// Entries are only ever appended, except that the most recent append can be
/// retracted through the handle [`append`](Self::append) returned.
#[derive(Debug, Clone, Default)]
pub struct ConversationLog {
    entries: Vec<ChatMessage>,
}

impl ConversationLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, message: ChatMessage) -> EntryHandle {
        self.entries.push(message);
        EntryHandle(self.entries.len() - 1)
    }

    /// Removes the entry at `handle` if it is still the latest one.
    ///
    /// Returns the removed entry, or `None` when something was appended since.
    pub fn retract(&mut self, handle: EntryHandle) -> Option<ChatMessage> {
        if handle.0 + 1 == self.entries.len() {
            self.entries.pop()
        } else {
            None
        }
    }

    pub fn entries(&self) -> &[ChatMessage] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// `[{role, content}]` for every entry before `handle`.
    fn history_before(&self, handle: EntryHandle) -> Value {
        Value::Array(
            self.entries[..handle.0]
                .iter()
                .map(|m| json!({"role": m.role, "content": m.content}))
                .collect(),
        )
    }
}

/// A conversation with the farm assistant.
pub struct ChatSession {
    invoker: Arc<dyn FunctionInvoker>,
    function: String,
    log: ConversationLog,
}

impl ChatSession {
    pub fn new(invoker: Arc<dyn FunctionInvoker>, function: impl Into<String>) -> Self {
        Self {
            invoker,
            function: function.into(),
            log: ConversationLog::new(),
        }
    }

    pub fn log(&self) -> &ConversationLog {
        &self.log
    }

    pub fn messages(&self) -> &[ChatMessage] {
        self.log.entries()
    }

    /// Sends `text` and returns the assistant's reply.
    ///
    /// Blank input is rejected without touching the log. On any failure the
    /// user's message is retracted before the error is returned.
    pub async fn send(&mut self, text: &str) -> StoreResult<ChatMessage> {
        let text = text.trim();
        if text.is_empty() {
            return Err(StoreError::EmptyMessage);
        }

        let handle = self.log.append(ChatMessage::new(Role::User, text));
        let body = json!({
            "message": text,
            "conversationHistory": self.log.history_before(handle),
        });
        debug!(function = %self.function, history = handle.0, "sending chat message");

        match self.exchange(&body).await {
            Ok(reply) => {
                let message = ChatMessage::new(Role::Assistant, reply);
                self.log.append(message.clone());
                Ok(message)
            }
            Err(e) => {
                error!(function = %self.function, error = %e, "assistant call failed");
                self.log.retract(handle);
                Err(e)
            }
        }
    }

    async fn exchange(&self, body: &Value) -> StoreResult<String> {
        let response = self.invoker.invoke(&self.function, body).await?;
        if !response.success {
            return Err(StoreError::rejected(
                response.message,
                "failed to get assistant response",
            ));
        }
        response
            .data
            .as_ref()
            .and_then(|data| data.get("message"))
            .and_then(Value::as_str)
            .map(str::to_string)
            .ok_or_else(|| StoreError::BackendRejected {
                message: "assistant reply had no message".to_string(),
            })
    }

    /// Forgets the whole conversation.
    pub fn clear(&mut self) {
        self.log.clear();
    }
}
