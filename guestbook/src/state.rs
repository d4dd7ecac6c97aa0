use serde::{Deserialize, Serialize};
use validator::Validate;

use dto::entry::{EntryDto, EntryId};

pub const LOAD_FAILED: &str = "Failed to load guestbook entries.";
pub const CREATE_FAILED: &str = "Failed to add guestbook entry.";
pub const UPDATE_FAILED: &str = "Failed to update guestbook entry.";
pub const DELETE_FAILED: &str = "Failed to delete guestbook entry.";
pub const PASSWORD_MISMATCH: &str = "password does not match";

/// Values typed into the new entry form.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize, Validate)]
#[serde(default)]
pub struct EntryForm {
    #[validate(length(min = 1))]
    pub name: String,

    #[validate(length(min = 1))]
    pub message: String,

    #[validate(length(min = 1))]
    pub password: String,
}

/// Replacement message and password collected before an edit is sent.
#[derive(Debug, Clone)]
pub struct EditRequest {
    pub id: EntryId,
    pub message: String,
    pub password: String,
}

/// Password collected before a delete is sent.
#[derive(Debug, Clone)]
pub struct DeleteRequest {
    pub id: EntryId,
    pub password: String,
}

/// How a single request/response exchange ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The server accepted the request and local state reflects it.
    Applied,

    /// The server rejected the entry password. Nothing changed locally.
    PasswordMismatch,

    /// Transport or server failure, reported through the error banner.
    Failed,

    /// Required form fields were empty so nothing was sent.
    Incomplete,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClientState {
    pub inputs: EntryForm,
    pub entries: Vec<EntryDto>,
    pub error: Option<String>,
}

impl ClientState {
    pub fn replace_entries(&mut self, entries: Vec<EntryDto>) {
        self.entries = entries;
    }

    pub fn prepend_entry(&mut self, entry: EntryDto) {
        self.entries.insert(0, entry);
    }

    /// Swaps the entry with the same id, if it is still listed.
    pub fn replace_entry(&mut self, entry: EntryDto) {
        if let Some(existing) = self.entries.iter_mut().find(|e| e.id == entry.id) {
            *existing = entry;
        }
    }

    pub fn remove_entry(&mut self, id: &EntryId) {
        self.entries.retain(|e| &e.id != id);
    }

    pub fn set_error(&mut self, msg: &str) {
        self.error = Some(msg.to_string());
    }

    pub fn clear_inputs(&mut self) {
        self.inputs = EntryForm::default();
    }

    /// Resolves an id as rendered in a URL back to the listed entry.
    /// Ids are compared by their text, so the first entry rendering to `id` wins.
    pub fn find_entry(&self, id: &str) -> Option<&EntryDto> {
        self.entries.iter().find(|e| e.id.to_string() == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entry::test_entry;

    fn create_test_state() -> ClientState {
        ClientState {
            inputs: EntryForm::default(),
            entries: vec![
                test_entry(3, "C", "third"),
                test_entry(2, "B", "second"),
                test_entry(1, "A", "first"),
            ],
            error: None,
        }
    }

    #[test]
    fn test_replace_entry_keeps_position() {
        let mut state = create_test_state();
        state.replace_entry(test_entry(2, "B", "changed"));

        let messages: Vec<&str> = state.entries.iter().map(|e| e.message.as_str()).collect();
        assert_eq!(messages, vec!["third", "changed", "first"]);
    }

    #[test]
    fn test_replace_unknown_entry() {
        let mut state = create_test_state();
        let before = state.clone();
        state.replace_entry(test_entry(9, "Z", "ghost"));

        assert_eq!(state, before);
    }

    #[test]
    fn test_remove_entry_keeps_order() {
        let mut state = create_test_state();
        state.remove_entry(&EntryId::Number(2));

        let ids: Vec<String> = state.entries.iter().map(|e| e.id.to_string()).collect();
        assert_eq!(ids, vec!["3", "1"]);
    }

    #[test]
    fn test_last_error_wins() {
        let mut state = create_test_state();
        state.set_error(LOAD_FAILED);
        state.set_error(DELETE_FAILED);

        assert_eq!(state.error.as_deref(), Some(DELETE_FAILED));
    }

    #[test]
    fn test_find_entry() {
        let state = create_test_state();

        assert_eq!(state.find_entry("2").map(|e| e.name.as_str()), Some("B"));
        assert!(state.find_entry("20").is_none());
    }

    #[test]
    fn test_find_entry_first_match_wins() {
        let mut text_id = test_entry(1, "T", "text id");
        text_id.id = EntryId::from("1");
        let mut state = create_test_state();
        state.entries.insert(0, text_id);

        let found = state.find_entry("1").unwrap();
        assert_eq!(found.id, EntryId::from("1"));
        assert_eq!(found.message, "text id");
    }

    #[test]
    fn test_required_fields() {
        let mut form = EntryForm {
            name: "A".to_string(),
            message: "hi".to_string(),
            password: "x".to_string(),
        };
        assert!(form.validate().is_ok());

        form.password = "".to_string();
        assert!(form.validate().is_err());
    }
}
