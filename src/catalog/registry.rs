//! Registry of named schemas.
//!
//! Pipelines are plain values, so the engine needs no registry. This one
//! exists for callers that pick a schema by name at run time, such as the
//! command-line tool.

use crate::catalog::builtin::{
    any, array, decimal, email, jwt, max_words, min_length, min_value, number, object, string,
    to_snake_case, trim,
};
use crate::core::unit::Unit;
use crate::pipeline::Pipe;
use indexmap::IndexMap;
use std::sync::Arc;

/// Factory function for creating schema instances.
pub type SchemaFactory = Arc<dyn Fn() -> Arc<dyn Unit> + Send + Sync>;

/// Registry entry containing a description and factory.
#[derive(Clone)]
pub struct RegistryEntry {
    /// Factory function to create instances.
    pub factory: SchemaFactory,
    /// One-line description shown in listings.
    pub description: String,
    /// Tags for organization and search.
    pub tags: Vec<String>,
}

/// Named schemas available for lookup.
#[derive(Clone, Default)]
pub struct SchemaRegistry {
    schemas: IndexMap<String, RegistryEntry>,
}

impl SchemaRegistry {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry pre-populated with the built-in schemas.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        register_builtins(&mut registry);
        registry
    }

    /// Register a schema under `name`, replacing any previous entry.
    pub fn register<F, U>(&mut self, name: impl Into<String>, description: impl Into<String>, factory: F)
    where
        F: Fn() -> U + Send + Sync + 'static,
        U: Unit + 'static,
    {
        self.register_with_tags(name, description, Vec::new(), factory);
    }

    /// Register a schema with additional tags.
    pub fn register_with_tags<F, U>(
        &mut self,
        name: impl Into<String>,
        description: impl Into<String>,
        tags: Vec<String>,
        factory: F,
    ) where
        F: Fn() -> U + Send + Sync + 'static,
        U: Unit + 'static,
    {
        let entry = RegistryEntry {
            factory: Arc::new(move || Arc::new(factory()) as Arc<dyn Unit>),
            description: description.into(),
            tags,
        };
        self.schemas.insert(name.into(), entry);
    }

    /// Create a new instance of a schema by name.
    pub fn create(&self, name: &str) -> Option<Arc<dyn Unit>> {
        self.schemas.get(name).map(|entry| (entry.factory)())
    }

    /// Get a registry entry.
    pub fn get_entry(&self, name: &str) -> Option<&RegistryEntry> {
        self.schemas.get(name)
    }

    /// Check if a schema is registered.
    pub fn contains(&self, name: &str) -> bool {
        self.schemas.contains_key(name)
    }

    /// Registered names in registration order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.schemas.keys().map(|s| s.as_str())
    }

    /// All entries in registration order.
    pub fn entries(&self) -> impl Iterator<Item = (&str, &RegistryEntry)> {
        self.schemas.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Search schemas by name, description or tag.
    pub fn search(&self, query: &str) -> Vec<&str> {
        let query = query.to_lowercase();

        self.schemas
            .iter()
            .filter(|(name, entry)| {
                name.to_lowercase().contains(&query)
                    || entry.description.to_lowercase().contains(&query)
                    || entry.tags.iter().any(|t| t.to_lowercase().contains(&query))
            })
            .map(|(name, _)| name.as_str())
            .collect()
    }

    /// Unregister a schema.
    pub fn unregister(&mut self, name: &str) -> bool {
        self.schemas.shift_remove(name).is_some()
    }

    /// Get the total number of registered schemas.
    pub fn len(&self) -> usize {
        self.schemas.len()
    }

    /// Check if the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.schemas.is_empty()
    }
}

fn tags(list: &[&str]) -> Vec<String> {
    list.iter().map(|t| t.to_string()).collect()
}

fn register_builtins(registry: &mut SchemaRegistry) {
    registry.register_with_tags(
        "decimal_text",
        "Trimmed, non-empty decimal string",
        tags(&["string", "number"]),
        || Pipe::new(string()).then(trim()).then(min_length(1)).then(decimal()),
    );
    registry.register_with_tags(
        "token",
        "JSON Web Token with a JWT header",
        tags(&["string", "auth"]),
        || Pipe::new(string()).then(jwt(None)),
    );
    registry.register_with_tags(
        "user",
        "Object with a name, an email address and an age",
        tags(&["object"]),
        || {
            object()
                .entry("name", Pipe::new(string()).then(trim()).then(min_length(1)))
                .entry("email", Pipe::new(string()).then(trim()).then(email()))
                .entry("age", Pipe::new(number()).then(min_value(0.0)))
        },
    );
    registry.register_with_tags(
        "tags",
        "Array of non-empty strings",
        tags(&["array", "string"]),
        || array(Pipe::new(string()).then(min_length(1))),
    );
    registry.register_with_tags(
        "snake_keys",
        "Any value, with object keys renamed to snake case",
        tags(&["object", "transform"]),
        || Pipe::new(any()).then(to_snake_case(None)),
    );
    registry.register_with_tags(
        "short_bio",
        "English text of at most 20 words",
        tags(&["string", "words"]),
        || Pipe::new(string()).then(trim()).then(max_words("en", 20)),
    );
}
