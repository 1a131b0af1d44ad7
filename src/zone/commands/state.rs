//! Parser state shared by all statement processors

use crate::zone::repository::{CompositeDef, Member, TypeRepository};
use std::sync::Arc;

/// State threaded through command-file parsing: the type repository plus the
/// ordered list of currently used types.
///
/// Used types are the implicit lookup scopes for bare member names in
/// expressions, consulted most-recently-used first.
#[derive(Debug, Clone)]
pub struct CommandParserState {
    repository: TypeRepository,
    used_types: Vec<Arc<CompositeDef>>,
}

impl CommandParserState {
    pub fn new(repository: TypeRepository) -> Self {
        CommandParserState {
            repository,
            used_types: Vec::new(),
        }
    }

    pub fn repository(&self) -> &TypeRepository {
        &self.repository
    }

    /// Currently used types, most recent first
    pub fn used_types(&self) -> impl Iterator<Item = &Arc<CompositeDef>> {
        self.used_types.iter()
    }

    /// Activate a type as the preferred member lookup scope
    pub fn push_used_type(&mut self, composite: Arc<CompositeDef>) {
        self.used_types.retain(|used| used.name != composite.name);
        self.used_types.insert(0, composite);
    }

    /// Resolve a dotted path against the used types in order, falling back
    /// to the global repository lookup
    pub fn resolve_member_path(
        &self,
        parts: &[&str],
    ) -> Option<(Arc<CompositeDef>, Vec<Member>)> {
        for used in self.used_types() {
            if let Some(chain) = self.repository.members_from_parts(parts, used) {
                return Some((Arc::clone(used), chain));
            }
        }
        self.repository.typename_and_members_from_parts(parts)
    }
}
