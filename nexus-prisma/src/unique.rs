//! Unique identifier resolution
//!
//! A model's identity is the first of: its single `@id` field, its compound
//! primary key, its first `@unique` field, its first compound unique group.

use serde_json::{Map, Value};

use crate::dmmf::Model;
use crate::error::{GeneratorError, ResolverError};

/// Resolve the ordered field names forming a model's unique identity
pub fn resolve_unique_identifiers(model: &Model) -> Result<Vec<String>, GeneratorError> {
    let mut ids = model.fields.iter().filter(|f| f.is_id);
    if let (Some(id), None) = (ids.next(), ids.next()) {
        return Ok(vec![id.name.clone()]);
    }

    let primary_key = model
        .primary_key
        .as_ref()
        .map(|pk| pk.fields.as_slice())
        .filter(|fields| !fields.is_empty())
        .unwrap_or(model.id_fields.as_slice());
    if !primary_key.is_empty() {
        return Ok(primary_key.to_vec());
    }

    if let Some(unique) = model.fields.iter().find(|f| f.is_unique) {
        return Ok(vec![unique.name.clone()]);
    }

    let group = model
        .unique_fields
        .iter()
        .find(|group| !group.is_empty())
        .or_else(|| {
            model
                .unique_indexes
                .iter()
                .map(|index| &index.fields)
                .find(|fields| !fields.is_empty())
        });
    if let Some(group) = group {
        return Ok(group.clone());
    }

    Err(GeneratorError::UniqueIdentifierNotFound {
        model: model.name.clone(),
    })
}

/// Property name of a unique identifier in a native where-clause
///
/// Compound keys join their member names with `_`.
pub fn compound_key_name(fields: &[String]) -> String {
    fields.join("_")
}

/// Build a native unique where-clause from a parent record
pub fn where_unique_from_parent(
    model: &str,
    identifiers: &[String],
    parent: &Value,
) -> Result<Value, ResolverError> {
    let mut values = Map::new();
    for field in identifiers {
        let value = parent
            .get(field)
            .filter(|v| !v.is_null())
            .ok_or_else(|| ResolverError::MissingUniqueField {
                model: model.to_string(),
                field: field.clone(),
            })?;
        values.insert(field.clone(), value.clone());
    }

    let mut clause = Map::new();
    if identifiers.len() > 1 {
        clause.insert(compound_key_name(identifiers), Value::Object(values));
    } else {
        clause.extend(values);
    }
    Ok(Value::Object(clause))
}
