//! Document model (DMMF) input types
//!
//! The document is produced by an external schema processor and handed to
//! the generator as JSON. It is borrowed read-only for one generation pass.

use serde::Deserialize;
use std::fmt;
use std::str::FromStr;

use crate::error::GeneratorError;

/// A complete document: models and enums in declaration order
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    /// Models
    #[serde(default)]
    pub models: Vec<Model>,

    /// Enums
    #[serde(default)]
    pub enums: Vec<Enum>,
}

/// Full DMMF envelope as emitted by the schema processor
#[derive(Deserialize)]
struct Envelope {
    datamodel: Document,
}

impl Document {
    /// Parse either a bare `{models, enums}` document or the full
    /// `{datamodel: {...}}` envelope.
    pub fn from_json(input: &str) -> Result<Self, GeneratorError> {
        let value: serde_json::Value = serde_json::from_str(input)?;
        Self::from_value(value)
    }

    /// Same as [`Document::from_json`] for an already-parsed value
    pub fn from_value(value: serde_json::Value) -> Result<Self, GeneratorError> {
        if value.get("datamodel").is_some() {
            let envelope: Envelope = serde_json::from_value(value)?;
            Ok(envelope.datamodel)
        } else {
            Ok(serde_json::from_value(value)?)
        }
    }

    /// Look up a model by name
    pub fn model(&self, name: &str) -> Option<&Model> {
        self.models.iter().find(|m| m.name == name)
    }

    /// Look up an enum by name
    pub fn enum_def(&self, name: &str) -> Option<&Enum> {
        self.enums.iter().find(|e| e.name == name)
    }
}

/// A model (table)
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Model {
    /// Model name, unique within the document
    pub name: String,

    /// Database name override
    #[serde(default)]
    pub db_name: Option<String>,

    /// Fields in declaration order
    #[serde(default)]
    pub fields: Vec<Field>,

    /// Triple-slash documentation
    #[serde(default)]
    pub documentation: Option<String>,

    /// Compound primary key (`@@id`)
    #[serde(default)]
    pub primary_key: Option<PrimaryKey>,

    /// Legacy compound id field list
    #[serde(default)]
    pub id_fields: Vec<String>,

    /// Compound unique groups (`@@unique`)
    #[serde(default)]
    pub unique_fields: Vec<Vec<String>>,

    /// Named compound unique indexes
    #[serde(default)]
    pub unique_indexes: Vec<UniqueIndex>,
}

impl Model {
    /// Look up a field by name
    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.name == name)
    }
}

/// Compound primary key
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrimaryKey {
    /// Optional explicit key name
    #[serde(default)]
    pub name: Option<String>,

    /// Member fields, in key order
    #[serde(default)]
    pub fields: Vec<String>,
}

/// Named compound unique index
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UniqueIndex {
    /// Optional explicit index name
    #[serde(default)]
    pub name: Option<String>,

    /// Member fields, in index order
    #[serde(default)]
    pub fields: Vec<String>,
}

/// A field of a model
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Field {
    /// Field name, unique within its model
    pub name: String,

    /// Field kind
    pub kind: FieldKind,

    /// Native scalar name, or the related model/enum name
    #[serde(rename = "type")]
    pub type_name: String,

    /// List cardinality
    #[serde(default)]
    pub is_list: bool,

    /// Required (non-nullable)
    #[serde(default)]
    pub is_required: bool,

    /// Single-field `@id`
    #[serde(default)]
    pub is_id: bool,

    /// Single-field `@unique`
    #[serde(default)]
    pub is_unique: bool,

    /// Has a `@default(...)`
    #[serde(default)]
    pub has_default_value: bool,

    /// Read only (relation scalar backing a foreign key)
    #[serde(default)]
    pub is_read_only: bool,

    /// `@updatedAt`
    #[serde(default)]
    pub is_updated_at: bool,

    /// Triple-slash documentation
    #[serde(default)]
    pub documentation: Option<String>,

    /// Relation name for object fields
    #[serde(default)]
    pub relation_name: Option<String>,

    /// Foreign key fields on this side of the relation
    #[serde(default)]
    pub relation_from_fields: Vec<String>,

    /// Referenced fields on the other side of the relation
    #[serde(default)]
    pub relation_to_fields: Vec<String>,
}

impl Field {
    /// Whether this field points at another model
    pub fn is_relation(&self) -> bool {
        self.kind == FieldKind::Object
    }
}

/// Field kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldKind {
    /// Native scalar
    Scalar,
    /// Reference to a document enum
    Enum,
    /// Relation to another model
    Object,
    /// Native type without a client mapping
    Unsupported,
}

/// An enum definition
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Enum {
    /// Enum name, unique within the document
    pub name: String,

    /// Members in declaration order
    #[serde(default)]
    pub values: Vec<EnumValue>,

    /// Triple-slash documentation
    #[serde(default)]
    pub documentation: Option<String>,
}

/// An enum member
///
/// Accepts both `{ "name": "RED", "dbName": null }` and a bare `"RED"`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "EnumValueRepr")]
pub struct EnumValue {
    /// Member name
    pub name: String,

    /// Database value override
    pub db_name: Option<String>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum EnumValueRepr {
    Bare(String),
    #[serde(rename_all = "camelCase")]
    Full {
        name: String,
        #[serde(default)]
        db_name: Option<String>,
    },
}

impl From<EnumValueRepr> for EnumValue {
    fn from(repr: EnumValueRepr) -> Self {
        match repr {
            EnumValueRepr::Bare(name) => Self { name, db_name: None },
            EnumValueRepr::Full { name, db_name } => Self { name, db_name },
        }
    }
}

/// Native scalar types a scalar field may carry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[allow(missing_docs)]
pub enum ScalarType {
    String,
    Int,
    Boolean,
    Float,
    BigInt,
    DateTime,
    Json,
    Bytes,
    Decimal,
}

impl ScalarType {
    /// Every native scalar, in a stable order
    pub const ALL: [ScalarType; 9] = [
        ScalarType::String,
        ScalarType::Int,
        ScalarType::Boolean,
        ScalarType::Float,
        ScalarType::BigInt,
        ScalarType::DateTime,
        ScalarType::Json,
        ScalarType::Bytes,
        ScalarType::Decimal,
    ];

    /// Native name as it appears in the document
    pub fn as_str(self) -> &'static str {
        match self {
            ScalarType::String => "String",
            ScalarType::Int => "Int",
            ScalarType::Boolean => "Boolean",
            ScalarType::Float => "Float",
            ScalarType::BigInt => "BigInt",
            ScalarType::DateTime => "DateTime",
            ScalarType::Json => "Json",
            ScalarType::Bytes => "Bytes",
            ScalarType::Decimal => "Decimal",
        }
    }
}

impl fmt::Display for ScalarType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ScalarType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ScalarType::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| s.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_envelope_and_bare_document() {
        let bare = r#"{"models":[{"name":"User","fields":[]}],"enums":[]}"#;
        let wrapped = r#"{"datamodel":{"models":[{"name":"User","fields":[]}],"enums":[]},"schema":{}}"#;

        assert_eq!(Document::from_json(bare).unwrap().models[0].name, "User");
        assert_eq!(Document::from_json(wrapped).unwrap().models[0].name, "User");
    }

    #[test]
    fn test_parse_field_flags_and_enum_values() {
        let doc = Document::from_json(
            r#"{
                "models": [{
                    "name": "User",
                    "fields": [
                        {"name": "id", "kind": "scalar", "type": "String", "isId": true, "isRequired": true},
                        {"name": "posts", "kind": "object", "type": "Post", "isList": true, "isRequired": true,
                         "relationName": "PostToUser"}
                    ]
                }],
                "enums": [{"name": "Color", "values": [{"name": "RED", "dbName": null}, "GREEN"]}]
            }"#,
        )
        .unwrap();

        let user = doc.model("User").unwrap();
        assert!(user.field("id").unwrap().is_id);
        assert!(user.field("posts").unwrap().is_relation());
        assert_eq!(user.field("posts").unwrap().type_name, "Post");

        let names: Vec<_> = doc.enums[0].values.iter().map(|v| v.name.as_str()).collect();
        assert_eq!(names, ["RED", "GREEN"]);
    }

    #[test]
    fn test_scalar_type_from_str() {
        for scalar in ScalarType::ALL {
            assert_eq!(scalar.as_str().parse::<ScalarType>(), Ok(scalar));
        }
        assert_eq!("Geometry".parse::<ScalarType>(), Err("Geometry".to_string()));
    }
}
