//! Data type definitions stored in the repository

use std::sync::Arc;

/// Whether a composite lays its members out sequentially or overlapped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompositeKind {
    Struct,
    Union,
}

/// A member of a struct or union
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Member {
    pub name: String,
    pub type_name: String,
    /// Declared array dimensions, outermost first; empty for scalars
    pub array_dims: Vec<usize>,
}

/// A struct or union declaration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompositeDef {
    pub name: String,
    pub kind: CompositeKind,
    pub members: Vec<Member>,
}

impl CompositeDef {
    pub fn member(&self, name: &str) -> Option<&Member> {
        self.members.iter().find(|member| member.name == name)
    }
}

/// A named enum constant
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumMember {
    pub name: String,
    pub value: i64,
}

/// An enum declaration with ordered members
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumDef {
    pub name: String,
    pub members: Vec<EnumMember>,
}

/// Any data type the repository can answer a name lookup with
#[derive(Debug, Clone, PartialEq)]
pub enum DataType {
    Composite(Arc<CompositeDef>),
    Enum(Arc<EnumDef>),
    /// A built-in scalar type such as `int`
    Primitive(String),
}
