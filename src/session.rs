//! Per-user chat session: transcript plus conversation stage
//!
//! Sessions live only in memory. A new session and a reset session look
//! the same: one seeded assistant greeting, stage `Greeting`.

use crate::state_machine::Stage;
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Seeded assistant message for new and reset sessions
pub const GREETING: &str =
    "Hello! I'm here to help you solve math problems, especially fractions. How are you feeling today?";

/// File name offered for transcript downloads
pub const EXPORT_FILE_NAME: &str = "math_chat_history.txt";

/// Message role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    User,
    Assistant,
}

impl Role {
    /// Capitalized label used in prompts and exports
    pub fn label(self) -> &'static str {
        match self {
            Role::User => "User",
            Role::Assistant => "Assistant",
        }
    }

    #[cfg(test)]
    fn from_label(label: &str) -> Option<Self> {
        match label {
            "User" => Some(Role::User),
            "Assistant" => Some(Role::Assistant),
            _ => None,
        }
    }
}

/// A single transcript entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

impl Message {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }

    /// `"<Role>: <content>"`
    pub fn render(&self) -> String {
        format!("{}: {}", self.role.label(), self.content)
    }
}

/// Chat state for one user
#[derive(Debug, Clone)]
pub struct Session {
    id: String,
    stage: Stage,
    transcript: Vec<Message>,
    created_at: DateTime<Utc>,
    last_active: DateTime<Utc>,
}

impl Session {
    pub fn new(id: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: id.into(),
            stage: Stage::Greeting,
            transcript: vec![Message::assistant(GREETING)],
            created_at: now,
            last_active: now,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn stage(&self) -> Stage {
        self.stage
    }

    pub fn transcript(&self) -> &[Message] {
        &self.transcript
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn last_active(&self) -> DateTime<Utc> {
        self.last_active
    }

    /// Back to a single greeting and stage `Greeting`, whatever came before
    pub fn reset(&mut self) {
        self.stage = Stage::Greeting;
        self.transcript = vec![Message::assistant(GREETING)];
        self.touch();
    }

    /// Record a completed turn. Only the state machine calls this.
    pub(crate) fn record_turn(&mut self, user_text: &str, reply: &str, next: Stage) {
        self.transcript.push(Message::user(user_text));
        self.transcript.push(Message::assistant(reply));
        self.stage = next;
        self.touch();
    }

    pub fn touch(&mut self) {
        self.last_active = Utc::now();
    }

    /// Plain-text transcript, one `"<Role>: <content>"` entry per message
    pub fn export(&self) -> String {
        export_transcript(&self.transcript)
    }
}

pub fn export_transcript(messages: &[Message]) -> String {
    messages
        .iter()
        .map(Message::render)
        .collect::<Vec<_>>()
        .join("\n")
}

/// Inverse of [`export_transcript`].
///
/// A line that starts with a role label opens a new message; any other line
/// continues the previous message, so multi-line content survives. Lines
/// before the first labelled line are dropped.
#[cfg(test)]
pub fn parse_export(text: &str) -> Vec<Message> {
    let mut messages: Vec<Message> = Vec::new();

    for line in text.split('\n') {
        let labelled = line
            .split_once(": ")
            .and_then(|(label, content)| Role::from_label(label).map(|role| (role, content)));

        if let Some((role, content)) = labelled {
            messages.push(Message {
                role,
                content: content.to_string(),
            });
        } else if let Some(prev) = messages.last_mut() {
            prev.content.push('\n');
            prev.content.push_str(line);
        }
    }

    messages
}
