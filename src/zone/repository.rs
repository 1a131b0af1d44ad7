//! Type repository
//!
//! An in-memory store of the struct, union and enum declarations the
//! declaration language refers to. Populated once (programmatically or from
//! a YAML schema file), read-only during parsing. It answers name lookups,
//! enumerates enums for constant resolution, and resolves dotted member
//! paths either against a known candidate type or globally by inferring the
//! owning type from a path prefix.

pub mod repository_impl;
pub mod schema;
pub mod types;

pub use repository_impl::TypeRepository;
pub use schema::{repository_from_yaml, SchemaError};
pub use types::{CompositeDef, CompositeKind, DataType, EnumDef, EnumMember, Member};
