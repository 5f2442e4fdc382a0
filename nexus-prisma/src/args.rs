//! Request argument mapping
//!
//! Input fields can be exposed under aliases. Before a `where` argument is
//! handed to the data client, every aliased key is renamed back to the
//! native field name, at every nesting level.

use serde_json::{Map, Value};

use crate::error::ResolverError;
use crate::resolvers::ResolveInfo;
use crate::session::Schema;

/// Paging arguments of a resolver call, with native field names
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RequestArguments {
    /// `where`, rewritten to native names
    pub where_clause: Option<Value>,
    /// `take`
    pub take: Option<i64>,
    /// `skip`
    pub skip: Option<i64>,
}

/// Extract and rewrite the arguments of the field named by `info`
pub fn map_request_arguments(
    schema: &Schema,
    info: &ResolveInfo,
    raw: &Value,
) -> Result<RequestArguments, ResolverError> {
    let field = schema
        .field(&info.parent_type, &info.field_name)
        .ok_or_else(|| ResolverError::UnknownField {
            parent: info.parent_type.clone(),
            field: info.field_name.clone(),
        })?;

    let where_clause = match (raw.get("where"), field.args.get("where")) {
        (None | Some(Value::Null), _) => None,
        (Some(value), Some(ty)) => Some(map_input_value(schema, ty.named_type(), value)),
        (Some(value), None) => Some(value.clone()),
    };

    Ok(RequestArguments {
        where_clause,
        take: paging_argument(info, raw, "take")?,
        skip: paging_argument(info, raw, "skip")?,
    })
}

fn paging_argument(
    info: &ResolveInfo,
    raw: &Value,
    argument: &'static str,
) -> Result<Option<i64>, ResolverError> {
    match raw.get(argument).and_then(Value::as_i64) {
        Some(value) if value < 0 => Err(ResolverError::NegativeArgument {
            parent: info.parent_type.clone(),
            field: info.field_name.clone(),
            argument,
            value,
        }),
        value => Ok(value),
    }
}

/// Rewrite aliased keys of `value`, declared as input type `type_name`
///
/// Keys the input type does not declare are copied untouched, so mapping
/// an already mapped value changes nothing.
pub fn map_input_value(schema: &Schema, type_name: &str, value: &Value) -> Value {
    match value {
        Value::Array(items) => Value::Array(
            items
                .iter()
                .map(|item| map_input_value(schema, type_name, item))
                .collect(),
        ),
        Value::Object(object) => {
            let Some(def) = schema.input(type_name) else {
                return value.clone();
            };

            let mut mapped = Map::with_capacity(object.len());
            for (key, nested) in object {
                match def.fields.get(key) {
                    Some(field) => {
                        let nested = map_input_value(schema, field.ty.named_type(), nested);
                        let native = schema
                            .aliases
                            .original_name(type_name, key)
                            .unwrap_or(key);
                        mapped.insert(native.to_string(), nested);
                    }
                    None => {
                        mapped.insert(key.clone(), nested.clone());
                    }
                }
            }
            Value::Object(mapped)
        }
        _ => value.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dmmf::Document;
    use crate::session::GenerationSession;
    use crate::settings::Settings;
    use crate::synth::synthesize;
    use serde_json::json;
    use std::sync::Arc;

    fn schema() -> Arc<Schema> {
        let document = Document::from_value(json!({
            "models": [
                {
                    "name": "User",
                    "fields": [
                        {"name": "id", "kind": "scalar", "type": "String", "isId": true, "isRequired": true},
                        {"name": "name", "kind": "scalar", "type": "String", "isRequired": true},
                        {"name": "posts", "kind": "object", "type": "Post", "isList": true, "isRequired": true}
                    ]
                },
                {
                    "name": "Post",
                    "fields": [
                        {"name": "id", "kind": "scalar", "type": "Int", "isId": true, "isRequired": true},
                        {"name": "title", "kind": "scalar", "type": "String", "isRequired": true}
                    ]
                }
            ]
        }))
        .unwrap();
        let settings = Settings::default();
        let mut session = GenerationSession::new(&document, &settings);
        let configs = synthesize(&mut session).unwrap();
        session.alias_input_field("UserWhereInput", "name", "fullName").unwrap();
        session.alias_input_field("PostWhereInput", "title", "headline").unwrap();
        session.finish(configs)
    }

    #[test]
    fn test_aliases_renamed_at_every_level() {
        let schema = schema();
        let info = ResolveInfo::new("Query", "users");
        let raw = json!({
            "where": {
                "fullName": {"equals": "Ada"},
                "OR": [{"fullName": {"startsWith": "A"}}],
                "posts": {"some": {"headline": {"contains": "rust"}}}
            },
            "take": 2
        });

        let args = map_request_arguments(&schema, &info, &raw).unwrap();
        assert_eq!(
            args.where_clause,
            Some(json!({
                "name": {"equals": "Ada"},
                "OR": [{"name": {"startsWith": "A"}}],
                "posts": {"some": {"title": {"contains": "rust"}}}
            }))
        );
        assert_eq!(args.take, Some(2));
        assert_eq!(args.skip, None);
    }

    #[test]
    fn test_mapping_is_idempotent() {
        let schema = schema();
        let value = json!({"fullName": {"equals": "Ada"}, "id": {"equals": "u1"}});
        let once = map_input_value(&schema, "UserWhereInput", &value);
        let twice = map_input_value(&schema, "UserWhereInput", &once);
        assert_eq!(once, json!({"name": {"equals": "Ada"}, "id": {"equals": "u1"}}));
        assert_eq!(once, twice);
    }

    #[test]
    fn test_missing_where_is_none() {
        let schema = schema();
        let info = ResolveInfo::new("User", "posts");
        let args = map_request_arguments(&schema, &info, &json!({"where": null, "skip": 1})).unwrap();
        assert_eq!(args.where_clause, None);
        assert_eq!(args.skip, Some(1));
    }

    #[test]
    fn test_negative_paging_is_rejected() {
        let schema = schema();
        let info = ResolveInfo::new("Query", "posts");
        let err = map_request_arguments(&schema, &info, &json!({"take": 2, "skip": -1})).unwrap_err();
        assert!(matches!(
            err,
            ResolverError::NegativeArgument { argument: "skip", value: -1, ref field, .. } if field == "posts"
        ));

        let args = map_request_arguments(&schema, &info, &json!({"take": 0, "skip": 0})).unwrap();
        assert_eq!((args.take, args.skip), (Some(0), Some(0)));
    }

    #[test]
    fn test_unknown_field() {
        let schema = schema();
        let info = ResolveInfo::new("Query", "comments");
        assert!(matches!(
            map_request_arguments(&schema, &info, &json!({})),
            Err(ResolverError::UnknownField { .. })
        ));
    }
}
