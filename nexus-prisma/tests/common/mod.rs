//! Shared fixtures: a blog document and an in-memory data client

#![allow(dead_code)]

use async_trait::async_trait;
use nexus_prisma::{ClientError, ClientMethod, DataClient, Document, Operation};
use serde_json::{Map, Value, json};
use std::collections::HashSet;
use std::sync::Mutex;

/// Users with posts, a compound-keyed membership and an enum
pub fn blog_document() -> Document {
    Document::from_value(json!({
        "datamodel": {
            "models": [
                {
                    "name": "User",
                    "documentation": "A registered author",
                    "fields": [
                        {"name": "id", "kind": "scalar", "type": "String", "isId": true, "isRequired": true},
                        {"name": "name", "kind": "scalar", "type": "String", "isRequired": true,
                         "documentation": "Display name"},
                        {"name": "role", "kind": "enum", "type": "Role", "isRequired": true},
                        {"name": "posts", "kind": "object", "type": "Post", "isList": true, "isRequired": true,
                         "relationName": "PostToUser"}
                    ]
                },
                {
                    "name": "Post",
                    "fields": [
                        {"name": "id", "kind": "scalar", "type": "Int", "isId": true, "isRequired": true},
                        {"name": "title", "kind": "scalar", "type": "String", "isRequired": true},
                        {"name": "published", "kind": "scalar", "type": "Boolean", "isRequired": true},
                        {"name": "authorId", "kind": "scalar", "type": "String"},
                        {"name": "author", "kind": "object", "type": "User", "relationName": "PostToUser",
                         "relationFromFields": ["authorId"], "relationToFields": ["id"]}
                    ]
                },
                {
                    "name": "Membership",
                    "fields": [
                        {"name": "userId", "kind": "scalar", "type": "String", "isRequired": true},
                        {"name": "teamId", "kind": "scalar", "type": "Int", "isRequired": true},
                        {"name": "user", "kind": "object", "type": "User", "isRequired": true}
                    ],
                    "primaryKey": {"name": null, "fields": ["userId", "teamId"]}
                }
            ],
            "enums": [
                {"name": "Role", "values": [{"name": "ADMIN"}, {"name": "EDITOR"}, {"name": "READER"}]}
            ]
        }
    }))
    .unwrap()
}

/// In-memory client over pre-joined records
///
/// Relation fields are stored inline on the parent record.
pub struct MemoryClient {
    id: String,
    records: Vec<(String, Value)>,
    missing: HashSet<(String, ClientMethod)>,
    omit_counts: bool,
    calls: Mutex<Vec<String>>,
}

impl MemoryClient {
    pub fn new() -> Self {
        Self {
            id: "@prisma/client".to_string(),
            records: Vec::new(),
            missing: HashSet::new(),
            omit_counts: false,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn with_id(mut self, id: &str) -> Self {
        self.id = id.to_string();
        self
    }

    pub fn with_record(mut self, model: &str, record: Value) -> Self {
        self.records.push((model.to_string(), record));
        self
    }

    pub fn without_method(mut self, model: &str, method: ClientMethod) -> Self {
        self.missing.insert((model.to_string(), method));
        self
    }

    /// Drop `_count` from every selection, like a client that ignores it
    pub fn without_counts(mut self) -> Self {
        self.omit_counts = true;
        self
    }

    /// Log of `model.method` calls; transactions appear as `transaction[..]`
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn log(&self, entry: String) {
        self.calls.lock().unwrap().push(entry);
    }

    fn rows(&self, model: &str) -> impl Iterator<Item = &Value> {
        self.records
            .iter()
            .filter(move |(m, _)| m == model)
            .map(|(_, record)| record)
    }

    fn run(&self, operation: &Operation) -> Result<Value, ClientError> {
        let args = &operation.args;
        let filter = args.get("where");
        match operation.method {
            ClientMethod::FindUnique => {
                let found = self
                    .rows(&operation.model)
                    .find(|record| matches_unique(record, filter))
                    .cloned();
                match (found, args.get("select")) {
                    (None, _) => Ok(Value::Null),
                    (Some(record), None) => Ok(record),
                    (Some(record), Some(select)) => {
                        let mut projected = project(&record, select);
                        if self.omit_counts {
                            if let Value::Object(fields) = &mut projected {
                                fields.remove("_count");
                            }
                        }
                        Ok(projected)
                    }
                }
            }
            ClientMethod::FindMany => {
                let rows: Vec<Value> = self
                    .rows(&operation.model)
                    .filter(|record| matches(record, filter))
                    .cloned()
                    .collect();
                Ok(Value::Array(page(rows, args)))
            }
            ClientMethod::Count => {
                let count = self
                    .rows(&operation.model)
                    .filter(|record| matches(record, filter))
                    .count();
                Ok(json!(count))
            }
        }
    }
}

#[async_trait]
impl DataClient for MemoryClient {
    fn client_id(&self) -> &str {
        &self.id
    }

    fn has_method(&self, model: &str, method: ClientMethod) -> bool {
        !self.missing.contains(&(model.to_string(), method))
    }

    async fn execute(&self, operation: Operation) -> Result<Value, ClientError> {
        self.log(format!("{}.{}", operation.model, operation.method.as_str()));
        self.run(&operation)
    }

    async fn transaction(&self, operations: Vec<Operation>) -> Result<Vec<Value>, ClientError> {
        let names: Vec<String> = operations
            .iter()
            .map(|op| format!("{}.{}", op.model, op.method.as_str()))
            .collect();
        self.log(format!("transaction[{}]", names.join(",")));
        operations.iter().map(|op| self.run(op)).collect()
    }
}

/// Unique lookup: compound keys arrive nested under `a_b`
fn matches_unique(record: &Value, filter: Option<&Value>) -> bool {
    let Some(Value::Object(filter)) = filter else {
        return false;
    };
    filter.iter().all(|(key, value)| match (record.get(key), value) {
        (Some(actual), expected) => actual == expected,
        (None, Value::Object(members)) => members.iter().all(|(k, v)| record.get(k) == Some(v)),
        (None, _) => false,
    })
}

/// Supports `equals`, `contains`, `in` and bare values
fn matches(record: &Value, filter: Option<&Value>) -> bool {
    let Some(Value::Object(filter)) = filter else {
        return true;
    };
    filter.iter().all(|(key, condition)| {
        let actual = record.get(key).unwrap_or(&Value::Null);
        match condition {
            Value::Object(ops) => ops.iter().all(|(op, expected)| match op.as_str() {
                "equals" => actual == expected,
                "contains" => match (actual.as_str(), expected.as_str()) {
                    (Some(a), Some(e)) => a.contains(e),
                    _ => false,
                },
                "in" => expected.as_array().is_some_and(|items| items.contains(actual)),
                _ => true,
            }),
            expected => actual == expected,
        }
    })
}

fn page(rows: Vec<Value>, args: &Value) -> Vec<Value> {
    let skip = args.get("skip").and_then(Value::as_u64).unwrap_or(0) as usize;
    let take = args.get("take").and_then(Value::as_u64).map(|t| t as usize);
    let rows = rows.into_iter().skip(skip);
    match take {
        Some(take) => rows.take(take).collect(),
        None => rows.collect(),
    }
}

fn project(record: &Value, select: &Value) -> Value {
    let mut out = Map::new();
    let Some(select) = select.as_object() else {
        return Value::Object(out);
    };
    for (key, selection) in select {
        if key == "_count" {
            let mut counts = Map::new();
            if let Some(fields) = selection.get("select").and_then(Value::as_object) {
                for (field, args) in fields {
                    let items = record.get(field).and_then(Value::as_array);
                    let count = items.map_or(0, |items| {
                        items.iter().filter(|item| matches(item, args.get("where"))).count()
                    });
                    counts.insert(field.clone(), json!(count));
                }
            }
            out.insert(key.clone(), Value::Object(counts));
            continue;
        }

        let value = record.get(key).cloned().unwrap_or(Value::Null);
        let value = match (value, selection) {
            (Value::Array(items), Value::Object(_)) => {
                let filtered = items
                    .into_iter()
                    .filter(|item| matches(item, selection.get("where")))
                    .collect();
                Value::Array(page(filtered, selection))
            }
            (value, _) => value,
        };
        out.insert(key.clone(), value);
    }
    Value::Object(out)
}

/// A user with `count` posts titled `Post 1`..`Post n`
pub fn user_with_posts(id: &str, count: usize) -> Value {
    let posts: Vec<Value> = (1..=count)
        .map(|n| json!({"id": n, "title": format!("Post {n}"), "published": n % 2 == 0, "authorId": id}))
        .collect();
    json!({"id": id, "name": "Ada", "role": "ADMIN", "posts": posts})
}
