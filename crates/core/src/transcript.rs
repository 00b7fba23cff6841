//! Page-session transcript of chat turns.
//!
//! The store is append-only: entries are never removed, edited or reordered.
//! It lives for the lifetime of the page and is shared by cloning the handle,
//! which is cheap. Everything runs on the page's single thread, so the handle
//! is deliberately `!Send`.

use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use crate::error::Result;
use crate::logging::truncate_for_log;

/// Who produced a chat turn
///
/// The set of labels is open; anything other than `user` and `assistant`
/// is carried verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Role {
    User,
    Assistant,
    Other(String),
}

impl Role {
    pub fn as_str(&self) -> &str {
        match self {
            Role::User => "user",
            Role::Assistant => "assistant",
            Role::Other(label) => label,
        }
    }
}

impl From<String> for Role {
    fn from(label: String) -> Self {
        match label.as_str() {
            "user" => Role::User,
            "assistant" => Role::Assistant,
            _ => Role::Other(label),
        }
    }
}

impl From<&str> for Role {
    fn from(label: &str) -> Self {
        Role::from(label.to_string())
    }
}

impl From<Role> for String {
    fn from(role: Role) -> Self {
        match role {
            Role::Other(label) => label,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One entry in the transcript
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatTurn {
    role: Role,
    content: String,
}

impl ChatTurn {
    pub fn new(role: impl Into<Role>, content: impl Into<String>) -> Self {
        Self { role: role.into(), content: content.into() }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Role::User, content)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(Role::Assistant, content)
    }

    pub fn role(&self) -> &Role {
        &self.role
    }

    pub fn content(&self) -> &str {
        &self.content
    }
}

/// Shared handle to the page-session transcript
#[derive(Debug, Clone, Default)]
pub struct TranscriptStore {
    turns: Rc<RefCell<Vec<ChatTurn>>>,
}

impl TranscriptStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a turn to the end of the transcript.
    ///
    /// No trimming, validation or deduplication happens here.
    pub fn append(&self, role: impl Into<Role>, content: impl Into<String>) {
        let turn = ChatTurn::new(role, content);
        tracing::debug!(
            role = %turn.role,
            content = %truncate_for_log(&turn.content),
            position = self.len(),
            "transcript append"
        );
        self.turns.borrow_mut().push(turn);
    }

    /// Copy of the transcript as it is right now.
    ///
    /// The returned vector is independent: later appends do not show up in it.
    pub fn snapshot(&self) -> Vec<ChatTurn> {
        self.turns.borrow().clone()
    }

    pub fn len(&self) -> usize {
        self.turns.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.borrow().is_empty()
    }

    /// Most recent turn, if any
    pub fn last(&self) -> Option<ChatTurn> {
        self.turns.borrow().last().cloned()
    }

    /// Transcript serialized as the `[{role, content}, ...]` array sent with each request
    pub fn history_json(&self) -> Result<String> {
        Ok(serde_json::to_string(&*self.turns.borrow())?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_from_label() {
        assert_eq!(Role::from("user"), Role::User);
        assert_eq!(Role::from("assistant"), Role::Assistant);
        assert_eq!(Role::from("system"), Role::Other("system".to_string()));
        assert_eq!(Role::from("Assistant"), Role::Other("Assistant".to_string()));
    }

    #[test]
    fn test_role_display() {
        assert_eq!(Role::User.to_string(), "user");
        assert_eq!(Role::Assistant.to_string(), "assistant");
        assert_eq!(Role::Other("tool".to_string()).to_string(), "tool");
    }

    #[test]
    fn test_role_serializes_as_plain_string() {
        let json = serde_json::to_string(&Role::Other("narrator".to_string())).unwrap();
        assert_eq!(json, "\"narrator\"");

        let role: Role = serde_json::from_str("\"assistant\"").unwrap();
        assert_eq!(role, Role::Assistant);
    }

    #[test]
    fn test_new_store_is_empty() {
        let store = TranscriptStore::new();
        assert!(store.is_empty());
        assert_eq!(store.len(), 0);
        assert!(store.last().is_none());
        assert!(store.snapshot().is_empty());
    }

    #[test]
    fn test_append_preserves_order() {
        let store = TranscriptStore::new();
        store.append(Role::User, "first");
        store.append(Role::Assistant, "second");
        store.append("system", "third");

        let turns = store.snapshot();
        assert_eq!(turns.len(), 3);
        assert_eq!(turns[0], ChatTurn::user("first"));
        assert_eq!(turns[1], ChatTurn::assistant("second"));
        assert_eq!(turns[2].role(), &Role::Other("system".to_string()));
        assert_eq!(turns[2].content(), "third");
    }

    #[test]
    fn test_append_does_not_trim_or_dedup() {
        let store = TranscriptStore::new();
        store.append(Role::Assistant, "  padded  ");
        store.append(Role::Assistant, "  padded  ");
        store.append(Role::Assistant, "");

        assert_eq!(store.len(), 3);
        assert_eq!(store.snapshot()[0].content(), "  padded  ");
        assert_eq!(store.last().unwrap().content(), "");
    }

    #[test]
    fn test_snapshot_is_independent_copy() {
        let store = TranscriptStore::new();
        store.append(Role::User, "hello");

        let before = store.snapshot();
        store.append(Role::Assistant, "hi");

        assert_eq!(before.len(), 1);
        assert_eq!(store.snapshot().len(), 2);
    }

    #[test]
    fn test_cloned_handles_share_state() {
        let store = TranscriptStore::new();
        let handle = store.clone();

        handle.append(Role::Assistant, "shared");
        assert_eq!(store.len(), 1);
        assert_eq!(store.last(), Some(ChatTurn::assistant("shared")));
    }

    #[test]
    fn test_history_json() {
        let store = TranscriptStore::new();
        assert_eq!(store.history_json().unwrap(), "[]");

        store.append(Role::User, "ping");
        store.append(Role::Assistant, "pong");
        assert_eq!(
            store.history_json().unwrap(),
            r#"[{"role":"user","content":"ping"},{"role":"assistant","content":"pong"}]"#
        );
    }
}
