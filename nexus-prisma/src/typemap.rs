//! Field type mapping
//!
//! Maps a document field to its GraphQL named type and wraps it according
//! to the field's list/required flags.

use crate::dmmf::{Field, FieldKind, Model, ScalarType};
use crate::error::GeneratorError;
use crate::schema::TypeRef;
use crate::settings::{IdIntProjection, Settings};

/// GraphQL `ID` scalar
pub const ID: &str = "ID";

/// Parse a scalar field's native type, failing with the model/field named
pub fn scalar_type(model: &Model, field: &Field) -> Result<ScalarType, GeneratorError> {
    field
        .type_name
        .parse()
        .map_err(|scalar| GeneratorError::UnsupportedScalar {
            model: model.name.clone(),
            field: field.name.clone(),
            scalar,
        })
}

/// GraphQL named type for a field
///
/// Enum, relation and unsupported fields keep their document type name.
/// Scalars map one-to-one, except identifiers which may become `ID`.
pub fn map_field_type(
    model: &Model,
    field: &Field,
    settings: &Settings,
) -> Result<String, GeneratorError> {
    match field.kind {
        FieldKind::Enum | FieldKind::Object | FieldKind::Unsupported => Ok(field.type_name.clone()),
        FieldKind::Scalar => {
            let scalar = scalar_type(model, field)?;
            Ok(map_scalar(scalar, field.is_id, settings).to_string())
        }
    }
}

/// GraphQL name of a native scalar in a given identifier context
pub fn map_scalar(scalar: ScalarType, is_id: bool, settings: &Settings) -> &'static str {
    match scalar {
        ScalarType::String if is_id => ID,
        ScalarType::Int
            if is_id && settings.project_id_int_to_graphql == IdIntProjection::Id =>
        {
            ID
        }
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

/// Scalars the consumer must declare in their own schema
pub fn is_custom_scalar(name: &str) -> bool {
    matches!(name, "BigInt" | "DateTime" | "Json" | "Bytes" | "Decimal")
}

/// Wrap a named type per the field's cardinality
///
/// List items are always non-null.
pub fn wrap_field_type(named: &str, is_list: bool, is_required: bool) -> TypeRef {
    let base = TypeRef::named(named);
    match (is_list, is_required) {
        (true, true) => base.non_null().list().non_null(),
        (true, false) => base.non_null().list(),
        (false, true) => base.non_null(),
        (false, false) => base,
    }
}

/// Full output type of a field
pub fn field_type_ref(
    model: &Model,
    field: &Field,
    settings: &Settings,
) -> Result<TypeRef, GeneratorError> {
    let named = map_field_type(model, field, settings)?;
    Ok(wrap_field_type(&named, field.is_list, field.is_required))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn field(json: &str) -> Field {
        serde_json::from_str(json).unwrap()
    }

    fn model() -> Model {
        Model {
            name: "M1".to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_every_scalar_maps_to_a_name() {
        let settings = Settings::default();
        for scalar in ScalarType::ALL {
            assert_eq!(map_scalar(scalar, false, &settings), scalar.as_str());
        }
    }

    #[test]
    fn test_string_id_becomes_id() {
        let f = field(r#"{"name":"id","kind":"scalar","type":"String","isId":true,"isRequired":true}"#);
        assert_eq!(map_field_type(&model(), &f, &Settings::default()).unwrap(), "ID");
    }

    #[test]
    fn test_int_id_follows_projection_setting() {
        let f = field(r#"{"name":"id","kind":"scalar","type":"Int","isId":true,"isRequired":true}"#);
        let mut settings = Settings::default();
        assert_eq!(map_field_type(&model(), &f, &settings).unwrap(), "Int");

        settings.project_id_int_to_graphql = IdIntProjection::Id;
        assert_eq!(map_field_type(&model(), &f, &settings).unwrap(), "ID");
    }

    #[test]
    fn test_relation_and_enum_keep_type_name() {
        let rel = field(r#"{"name":"author","kind":"object","type":"User"}"#);
        let en = field(r#"{"name":"color","kind":"enum","type":"Color"}"#);
        let settings = Settings::default();
        assert_eq!(map_field_type(&model(), &rel, &settings).unwrap(), "User");
        assert_eq!(map_field_type(&model(), &en, &settings).unwrap(), "Color");
    }

    #[test]
    fn test_unknown_scalar_is_fatal() {
        let f = field(r#"{"name":"area","kind":"scalar","type":"Geometry"}"#);
        let err = map_field_type(&model(), &f, &Settings::default()).unwrap_err();
        assert_eq!(
            err.to_string(),
            "unsupported scalar type `Geometry` on field `M1.area`"
        );
    }

    #[test]
    fn test_wrapping_table() {
        assert_eq!(wrap_field_type("T", true, true).to_string(), "[T!]!");
        assert_eq!(wrap_field_type("T", true, false).to_string(), "[T!]");
        assert_eq!(wrap_field_type("T", false, true).to_string(), "T!");
        assert_eq!(wrap_field_type("T", false, false).to_string(), "T");
    }
}
