//! Tag registry: named indirection for recursive grammars
//!
//! The registry maps tag names to matcher arena indices. It is filled during
//! grammar construction, before any matching occurs, which is what lets a
//! `TagRef` target a matcher that is still under construction and lets rules
//! reference each other mutually.

use crate::zone::matching::matcher::MatcherId;
use crate::zone::matching::GrammarError;
use std::collections::HashMap;

/// Mapping from tag name to matcher, shared by all matchers of one grammar
#[derive(Debug, Clone, Default)]
pub struct TagRegistry {
    entries: HashMap<String, MatcherId>,
}

impl TagRegistry {
    pub fn new() -> Self {
        TagRegistry::default()
    }

    /// Register a matcher under a tag name. Re-registering a tag replaces
    /// the previous entry.
    pub fn register(&mut self, tag: &str, id: MatcherId) {
        self.entries.insert(tag.to_string(), id);
    }

    /// Resolve a tag to its matcher. An unregistered tag is a configuration
    /// error in the grammar definition, not a user input error.
    pub fn resolve(&self, tag: &str) -> Result<MatcherId, GrammarError> {
        self.entries
            .get(tag)
            .copied()
            .ok_or_else(|| GrammarError::UnregisteredTag(tag.to_string()))
    }

    pub fn is_registered(&self, tag: &str) -> bool {
        self.entries.contains_key(tag)
    }
}
