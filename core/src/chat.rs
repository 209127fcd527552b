//! Conversation state and document selection for the chat widget.

use chrono::{DateTime, Local, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{ApiError, ApiResult};

/// Display name of the assistant.
pub const ASSISTANT_NAME: &str = "TextAssist";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

impl Role {
    pub fn label(&self) -> &'static str {
        match self {
            Role::User => "You",
            Role::Assistant => ASSISTANT_NAME,
        }
    }

    /// CSS modifier class of a message bubble.
    pub fn css_class(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Assistant => "assistant",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub id: Uuid,
    pub role: Role,
    pub content: String,
    pub timestamp: DateTime<Utc>,
}

impl ChatMessage {
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            role,
            content: content.into(),
            timestamp: Utc::now(),
        }
    }
}

/// Messages exchanged in the current session.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Conversation {
    messages: Vec<ChatMessage>,
}

impl Conversation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn push_user(&mut self, content: impl Into<String>) -> &ChatMessage {
        self.push(ChatMessage::new(Role::User, content))
    }

    pub fn push_assistant(&mut self, content: impl Into<String>) -> &ChatMessage {
        self.push(ChatMessage::new(Role::Assistant, content))
    }

    fn push(&mut self, message: ChatMessage) -> &ChatMessage {
        self.messages.push(message);
        &self.messages[self.messages.len() - 1]
    }

    /// Appends the assistant side of a query, turning failures into text.
    pub fn record_reply(&mut self, reply: ApiResult<String>) -> &ChatMessage {
        let content = match reply {
            Ok(answer) => answer,
            Err(ApiError::Server { status, message }) if (200..300).contains(&status) => {
                format!("Error: {}", message)
            }
            Err(err) => format!("Sorry, I encountered an error: {}", err.reason()),
        };
        self.push_assistant(content)
    }

    /// Empties the conversation; `false` when there was nothing to clear.
    pub fn clear(&mut self) -> bool {
        if self.messages.is_empty() {
            return false;
        }
        self.messages.clear();
        true
    }

    /// Plain-text export of the whole conversation.
    pub fn transcript(&self) -> String {
        self.messages
            .iter()
            .map(|msg| {
                let local = msg.timestamp.with_timezone(&Local);
                format!(
                    "{} ({}):\n{}\n\n",
                    msg.role.label(),
                    local.format("%-m/%-d/%Y, %-I:%M:%S %p"),
                    msg.content
                )
            })
            .collect()
    }
}

/// File name used when downloading a transcript.
pub fn transcript_file_name(date: NaiveDate) -> String {
    format!("textassist-conversation-{}.txt", date.format("%Y-%m-%d"))
}

/// Documents known to the server and the subset chosen for querying.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DocumentSelection {
    available: Vec<String>,
    selected: Vec<String>,
}

impl DocumentSelection {
    pub fn available(&self) -> &[String] {
        &self.available
    }

    pub fn selected(&self) -> &[String] {
        &self.selected
    }

    pub fn is_selected(&self, name: &str) -> bool {
        self.selected.iter().any(|s| s == name)
    }

    /// Replaces the document list, keeping still-valid selections.
    pub fn set_available(&mut self, available: Vec<String>) {
        self.selected.retain(|s| available.contains(s));
        self.available = available;
    }

    /// Flips selection of `name`; unknown names are ignored.
    pub fn toggle(&mut self, name: &str) {
        if !self.available.iter().any(|a| a == name) {
            return;
        }
        if let Some(pos) = self.selected.iter().position(|s| s == name) {
            self.selected.remove(pos);
        } else {
            self.selected.push(name.to_string());
        }
    }

    /// Names sent with a query; empty means all documents.
    pub fn query_names(&self) -> Vec<String> {
        self.selected.clone()
    }

    pub fn can_query(&self) -> bool {
        !self.available.is_empty()
    }

    pub fn count_line(&self) -> String {
        format!("{} of {} selected", self.selected.len(), self.available.len())
    }

    pub fn status_line(&self) -> String {
        if self.available.is_empty() {
            "No documents to query.".to_string()
        } else if self.selected.is_empty() {
            format!("Querying all {} document(s).", self.available.len())
        } else {
            format!("Querying {} selected document(s).", self.selected.len())
        }
    }
}

/// Whether the send control should be enabled.
pub fn can_send(input: &str, selection: &DocumentSelection, query_in_flight: bool) -> bool {
    !input.trim().is_empty() && selection.can_query() && !query_in_flight
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_reply_variants() {
        let mut conversation = Conversation::new();
        conversation.push_user("What is in the report?");
        conversation.record_reply(Ok("A summary.".into()));
        conversation.record_reply(Err(ApiError::Server {
            status: 200,
            message: "No context".into(),
        }));
        conversation.record_reply(Err(ApiError::Network("offline".into())));

        let contents: Vec<_> = conversation.messages().iter().map(|m| m.content.as_str()).collect();
        assert_eq!(
            contents,
            vec![
                "What is in the report?",
                "A summary.",
                "Error: No context",
                "Sorry, I encountered an error: offline",
            ]
        );
        assert_eq!(conversation.messages()[1].role, Role::Assistant);
    }

    #[test]
    fn test_clear() {
        let mut conversation = Conversation::new();
        assert!(!conversation.clear());
        conversation.push_user("hi");
        assert!(conversation.clear());
        assert!(conversation.is_empty());
    }

    #[test]
    fn test_transcript_layout() {
        let mut conversation = Conversation::new();
        conversation.push_user("hi");
        conversation.push_assistant("hello");
        let transcript = conversation.transcript();
        assert!(transcript.starts_with("You ("));
        assert!(transcript.contains("):\nhi\n\n"));
        assert!(transcript.contains("TextAssist ("));
        assert!(transcript.ends_with("hello\n\n"));
    }

    #[test]
    fn test_transcript_file_name() {
        let date = NaiveDate::from_ymd_opt(2025, 3, 9).unwrap();
        assert_eq!(transcript_file_name(date), "textassist-conversation-2025-03-09.txt");
    }

    #[test]
    fn test_selection_status_lines() {
        let mut selection = DocumentSelection::default();
        assert_eq!(selection.status_line(), "No documents to query.");
        assert!(!can_send("question", &selection, false));

        selection.set_available(vec!["a.pdf".into(), "b.pdf".into()]);
        assert_eq!(selection.status_line(), "Querying all 2 document(s).");

        selection.toggle("b.pdf");
        selection.toggle("missing.pdf");
        assert_eq!(selection.status_line(), "Querying 1 selected document(s).");
        assert_eq!(selection.count_line(), "1 of 2 selected");
        assert_eq!(selection.query_names(), vec!["b.pdf".to_string()]);

        selection.set_available(vec!["a.pdf".into()]);
        assert!(selection.selected().is_empty());

        assert!(can_send("  question ", &selection, false));
        assert!(!can_send("   ", &selection, false));
        assert!(!can_send("question", &selection, true));
    }
}
