//! Repository storage and lookups

use crate::zone::repository::types::{
    CompositeDef, DataType, EnumDef, Member,
};
use std::collections::HashMap;
use std::sync::Arc;

/// In-memory store of data type declarations.
///
/// Enums keep their insertion order so constant lookups scan them
/// deterministically.
#[derive(Debug, Clone, Default)]
pub struct TypeRepository {
    types: HashMap<String, DataType>,
    enums: Vec<Arc<EnumDef>>,
}

impl TypeRepository {
    pub fn new() -> Self {
        TypeRepository::default()
    }

    /// Add a struct or union declaration; returns the shared definition
    pub fn add_composite(&mut self, def: CompositeDef) -> Arc<CompositeDef> {
        let shared = Arc::new(def);
        self.types.insert(
            shared.name.clone(),
            DataType::Composite(Arc::clone(&shared)),
        );
        shared
    }

    /// Add an enum declaration; returns the shared definition
    pub fn add_enum(&mut self, def: EnumDef) -> Arc<EnumDef> {
        let shared = Arc::new(def);
        self.types
            .insert(shared.name.clone(), DataType::Enum(Arc::clone(&shared)));
        self.enums.push(Arc::clone(&shared));
        shared
    }

    /// Add a built-in scalar type
    pub fn add_primitive(&mut self, name: &str) {
        self.types
            .insert(name.to_string(), DataType::Primitive(name.to_string()));
    }

    pub fn data_type_by_name(&self, name: &str) -> Option<&DataType> {
        self.types.get(name)
    }

    /// All enum declarations, in insertion order
    pub fn all_enums(&self) -> impl Iterator<Item = &Arc<EnumDef>> {
        self.enums.iter()
    }

    /// Look a constant up by member name across all enums; first declaration
    /// wins
    pub fn enum_member_value(&self, name: &str) -> Option<i64> {
        self.all_enums()
            .flat_map(|e| e.members.iter())
            .find(|member| member.name == name)
            .map(|member| member.value)
    }

    /// Resolve a dotted path as a member chain rooted at `candidate`.
    ///
    /// Every intermediate part must name a member whose type is itself a
    /// composite known to the repository; the final part may be of any type.
    pub fn members_from_parts(
        &self,
        parts: &[&str],
        candidate: &Arc<CompositeDef>,
    ) -> Option<Vec<Member>> {
        let (last, intermediate) = parts.split_last()?;
        let mut chain = Vec::with_capacity(parts.len());
        let mut current = Arc::clone(candidate);

        for part in intermediate {
            let member = current.member(part)?.clone();
            let next = match self.data_type_by_name(&member.type_name)? {
                DataType::Composite(composite) => Arc::clone(composite),
                _ => return None,
            };
            chain.push(member);
            current = next;
        }

        chain.push(current.member(last)?.clone());
        Some(chain)
    }

    /// Global fallback: infer both the owning type and the member chain from
    /// a dotted path alone.
    ///
    /// Type-name prefixes of the path are tried from shortest to longest;
    /// the first prefix naming a composite whose remaining parts resolve as
    /// a member chain wins. The member chain is never empty, so the full
    /// path is never consumed as a bare type name.
    pub fn typename_and_members_from_parts(
        &self,
        parts: &[&str],
    ) -> Option<(Arc<CompositeDef>, Vec<Member>)> {
        for split in 1..parts.len() {
            let type_name = parts[..split].join("::");
            if let Some(DataType::Composite(composite)) = self.data_type_by_name(&type_name) {
                if let Some(chain) = self.members_from_parts(&parts[split..], composite) {
                    return Some((Arc::clone(composite), chain));
                }
            }
        }
        None
    }
}
