//! YAML type schemas
//!
//! The declaration language's own type-definition syntax is handled by a
//! separate front end; for the inspection binary and tests the repository is
//! populated from a YAML schema document instead:
//!
//! ```yaml
//! types:
//!   - kind: struct
//!     name: PhysPreset
//!     members:
//!       - name: mass
//!         type: int
//!       - name: bounds
//!         type: int
//!         array: [3]
//!   - kind: enum
//!     name: PhysFlag
//!     members:
//!       - name: PHYS_NONE
//!       - name: PHYS_STATIC
//! ```
//!
//! Enum member values follow C semantics: an omitted value is the previous
//! value plus one, starting at zero. Built-in scalar types are registered
//! before the schema's own types.

use crate::zone::repository::repository_impl::TypeRepository;
use crate::zone::repository::types::{CompositeDef, CompositeKind, EnumDef, EnumMember, Member};
use serde::Deserialize;
use std::fmt;

/// Built-in scalar types every repository knows
const PRIMITIVE_TYPES: &[&str] = &[
    "bool", "char", "uchar", "short", "ushort", "int", "uint", "long", "ulong", "float", "double",
];

/// Errors that can occur while loading a schema
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SchemaError {
    Parse(String),
    DuplicateType(String),
}

impl fmt::Display for SchemaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SchemaError::Parse(message) => write!(f, "invalid type schema: {}", message),
            SchemaError::DuplicateType(name) => {
                write!(f, "type '{}' is declared more than once", name)
            }
        }
    }
}

impl std::error::Error for SchemaError {}

#[derive(Debug, Clone, Deserialize)]
struct SchemaFile {
    #[serde(default)]
    types: Vec<SchemaType>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
enum SchemaType {
    Struct(SchemaComposite),
    Union(SchemaComposite),
    Enum(SchemaEnum),
}

#[derive(Debug, Clone, Deserialize)]
struct SchemaComposite {
    name: String,
    #[serde(default)]
    members: Vec<SchemaMember>,
}

#[derive(Debug, Clone, Deserialize)]
struct SchemaMember {
    name: String,
    #[serde(rename = "type")]
    type_name: String,
    #[serde(default)]
    array: Vec<usize>,
}

#[derive(Debug, Clone, Deserialize)]
struct SchemaEnum {
    name: String,
    #[serde(default)]
    members: Vec<SchemaEnumMember>,
}

#[derive(Debug, Clone, Deserialize)]
struct SchemaEnumMember {
    name: String,
    value: Option<i64>,
}

/// Load a repository from a YAML schema document
pub fn repository_from_yaml(source: &str) -> Result<TypeRepository, SchemaError> {
    let schema: SchemaFile =
        serde_yaml::from_str(source).map_err(|e| SchemaError::Parse(e.to_string()))?;

    let mut repository = TypeRepository::new();
    for primitive in PRIMITIVE_TYPES {
        repository.add_primitive(primitive);
    }

    for schema_type in schema.types {
        let name = match &schema_type {
            SchemaType::Struct(c) | SchemaType::Union(c) => c.name.clone(),
            SchemaType::Enum(e) => e.name.clone(),
        };
        if repository.data_type_by_name(&name).is_some() {
            return Err(SchemaError::DuplicateType(name));
        }

        match schema_type {
            SchemaType::Struct(composite) => {
                repository.add_composite(convert_composite(composite, CompositeKind::Struct));
            }
            SchemaType::Union(composite) => {
                repository.add_composite(convert_composite(composite, CompositeKind::Union));
            }
            SchemaType::Enum(schema_enum) => {
                repository.add_enum(convert_enum(schema_enum));
            }
        }
    }

    Ok(repository)
}

fn convert_composite(composite: SchemaComposite, kind: CompositeKind) -> CompositeDef {
    CompositeDef {
        name: composite.name,
        kind,
        members: composite
            .members
            .into_iter()
            .map(|member| Member {
                name: member.name,
                type_name: member.type_name,
                array_dims: member.array,
            })
            .collect(),
    }
}

fn convert_enum(schema_enum: SchemaEnum) -> EnumDef {
    let mut next_value = 0i64;
    let mut members = Vec::with_capacity(schema_enum.members.len());
    for member in schema_enum.members {
        let value = member.value.unwrap_or(next_value);
        next_value = value + 1;
        members.push(EnumMember {
            name: member.name,
            value,
        });
    }
    EnumDef {
        name: schema_enum.name,
        members,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::zone::repository::types::DataType;

    const SAMPLE: &str = r#"
types:
  - kind: struct
    name: PhysPreset
    members:
      - name: mass
        type: int
      - name: bounds
        type: int
        array: [3]
  - kind: union
    name: Payload
    members:
      - name: preset
        type: PhysPreset
  - kind: enum
    name: PhysFlag
    members:
      - name: PHYS_NONE
      - name: PHYS_STATIC
      - name: PHYS_LAST
        value: 16
      - name: PHYS_PAST_LAST
"#;

    #[test]
    fn test_schema_loads_types() {
        let repository = repository_from_yaml(SAMPLE).unwrap();
        match repository.data_type_by_name("PhysPreset") {
            Some(DataType::Composite(c)) => {
                assert_eq!(c.kind, CompositeKind::Struct);
                assert_eq!(c.members.len(), 2);
                assert_eq!(c.members[1].array_dims, vec![3]);
            }
            other => panic!("expected struct, got {:?}", other),
        }
        match repository.data_type_by_name("Payload") {
            Some(DataType::Composite(c)) => assert_eq!(c.kind, CompositeKind::Union),
            other => panic!("expected union, got {:?}", other),
        }
    }

    #[test]
    fn test_enum_values_auto_increment() {
        let repository = repository_from_yaml(SAMPLE).unwrap();
        assert_eq!(repository.enum_member_value("PHYS_NONE"), Some(0));
        assert_eq!(repository.enum_member_value("PHYS_STATIC"), Some(1));
        assert_eq!(repository.enum_member_value("PHYS_LAST"), Some(16));
        assert_eq!(repository.enum_member_value("PHYS_PAST_LAST"), Some(17));
    }

    #[test]
    fn test_primitives_are_builtin() {
        let repository = repository_from_yaml("types: []").unwrap();
        assert!(matches!(
            repository.data_type_by_name("int"),
            Some(DataType::Primitive(_))
        ));
    }

    #[test]
    fn test_duplicate_type_is_rejected() {
        let source = r#"
types:
  - kind: struct
    name: Twice
  - kind: enum
    name: Twice
    members: []
"#;
        assert_eq!(
            repository_from_yaml(source).unwrap_err(),
            SchemaError::DuplicateType("Twice".to_string())
        );
    }

    #[test]
    fn test_malformed_schema_is_a_parse_error() {
        assert!(matches!(
            repository_from_yaml("types: [{kind: spaceship, name: X}]"),
            Err(SchemaError::Parse(_))
        ));
    }
}
