//! Error messages and the process-wide message stores.
//!
//! Messages are resolved when an issue is raised, in this order: the message
//! given for that failure, the unit's own message, the specific message for
//! the unit's reference, the schema message (schema units only), the
//! configuration's message, the global message, and finally the generic
//! `Invalid ...` template. Every store is keyed by an optional language.

use crate::core::issue::Issue;
use once_cell::sync::Lazy;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Function that renders a message from the issue being raised.
pub type MessageFn = Arc<dyn Fn(&Issue) -> String + Send + Sync>;

/// A literal message or a function of the issue.
#[derive(Clone)]
pub enum ErrorMessage {
    /// Fixed text.
    Literal(String),
    /// Text rendered from the issue.
    Dynamic(MessageFn),
}

impl ErrorMessage {
    /// Create a message computed from the issue.
    pub fn dynamic<F>(f: F) -> Self
    where
        F: Fn(&Issue) -> String + Send + Sync + 'static,
    {
        ErrorMessage::Dynamic(Arc::new(f))
    }

    /// Render the message for an issue.
    pub fn resolve(&self, issue: &Issue) -> String {
        match self {
            ErrorMessage::Literal(text) => text.clone(),
            ErrorMessage::Dynamic(f) => f(issue),
        }
    }
}

impl fmt::Debug for ErrorMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorMessage::Literal(text) => f.debug_tuple("Literal").field(text).finish(),
            ErrorMessage::Dynamic(_) => f.debug_tuple("Dynamic").field(&"<closure>").finish(),
        }
    }
}

impl From<&str> for ErrorMessage {
    fn from(text: &str) -> Self {
        ErrorMessage::Literal(text.to_string())
    }
}

impl From<String> for ErrorMessage {
    fn from(text: String) -> Self {
        ErrorMessage::Literal(text)
    }
}

/// Generic message used when no store provides one.
pub fn default_message(label: &str, expected: Option<&str>, received: &str) -> String {
    match expected {
        Some(expected) => format!(
            "Invalid {}: Expected {} but received {}",
            label, expected, received
        ),
        None => format!("Invalid {}: Received {}", label, received),
    }
}

// ============================================================================
// Stores
// ============================================================================

type ByLang = HashMap<Option<String>, ErrorMessage>;

#[derive(Default)]
struct MessageStore {
    global: ByLang,
    schema: ByLang,
    specific: HashMap<&'static str, ByLang>,
}

static MESSAGES: Lazy<RwLock<MessageStore>> = Lazy::new(|| RwLock::new(MessageStore::default()));

fn key(lang: Option<&str>) -> Option<String> {
    lang.map(str::to_string)
}

/// Set the message used by every unit for a language.
pub fn set_global_message(message: impl Into<ErrorMessage>, lang: Option<&str>) {
    MESSAGES.write().global.insert(key(lang), message.into());
}

/// Get the global message for a language.
pub fn global_message(lang: Option<&str>) -> Option<ErrorMessage> {
    MESSAGES.read().global.get(&key(lang)).cloned()
}

/// Remove the global message for a language.
pub fn delete_global_message(lang: Option<&str>) {
    MESSAGES.write().global.remove(&key(lang));
}

/// Set the message used by schema units for a language.
pub fn set_schema_message(message: impl Into<ErrorMessage>, lang: Option<&str>) {
    MESSAGES.write().schema.insert(key(lang), message.into());
}

/// Get the schema message for a language.
pub fn schema_message(lang: Option<&str>) -> Option<ErrorMessage> {
    MESSAGES.read().schema.get(&key(lang)).cloned()
}

/// Remove the schema message for a language.
pub fn delete_schema_message(lang: Option<&str>) {
    MESSAGES.write().schema.remove(&key(lang));
}

/// Set the message for one unit reference (e.g. `"min_length"`) and language.
pub fn set_specific_message(
    reference: &'static str,
    message: impl Into<ErrorMessage>,
    lang: Option<&str>,
) {
    MESSAGES
        .write()
        .specific
        .entry(reference)
        .or_default()
        .insert(key(lang), message.into());
}

/// Get the specific message for a unit reference and language.
pub fn specific_message(reference: &str, lang: Option<&str>) -> Option<ErrorMessage> {
    MESSAGES
        .read()
        .specific
        .get(reference)
        .and_then(|by_lang| by_lang.get(&key(lang)))
        .cloned()
}

/// Remove the specific message for a unit reference and language.
pub fn delete_specific_message(reference: &str, lang: Option<&str>) {
    let mut store = MESSAGES.write();
    if let Some(by_lang) = store.specific.get_mut(reference) {
        by_lang.remove(&key(lang));
        if by_lang.is_empty() {
            store.specific.remove(reference);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Each test uses its own language tag because the stores are shared
    // across the test threads.

    #[test]
    fn test_default_message() {
        assert_eq!(
            default_message("length", Some(">=1"), "0"),
            "Invalid length: Expected >=1 but received 0"
        );
        assert_eq!(
            default_message("decimal", None, "\"\""),
            "Invalid decimal: Received \"\""
        );
    }

    #[test]
    fn test_global_message_by_lang() {
        let lang = Some("x-msg-global");
        assert!(global_message(lang).is_none());

        set_global_message("global", lang);
        assert!(matches!(global_message(lang), Some(ErrorMessage::Literal(ref m)) if m == "global"));
        assert!(global_message(Some("x-msg-other")).is_none());

        delete_global_message(lang);
        assert!(global_message(lang).is_none());
    }

    #[test]
    fn test_specific_message_by_reference() {
        let lang = Some("x-msg-specific");
        set_specific_message("decimal", "not a decimal", lang);
        assert!(specific_message("decimal", lang).is_some());
        assert!(specific_message("jwt", lang).is_none());

        delete_specific_message("decimal", lang);
        assert!(specific_message("decimal", lang).is_none());
    }

    #[test]
    fn test_schema_message() {
        let lang = Some("x-msg-schema");
        set_schema_message(ErrorMessage::dynamic(|issue| format!("bad {}", issue.type_name)), lang);
        assert!(matches!(schema_message(lang), Some(ErrorMessage::Dynamic(_))));
        delete_schema_message(lang);
        assert!(schema_message(lang).is_none());
    }
}
