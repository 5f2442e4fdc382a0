//! Default resolvers
//!
//! Resolves the fields synthesized with a [`ResolverSpec`]:
//! - To-one relations: parent lookup, then projection of the relation field
//! - To-many relations: list and count in one parent lookup
//! - Root `findUnique` and paginated `findMany`
//!
//! Resolvers read the frozen [`Schema`] and talk to the data client found on
//! the request context.

use async_trait::async_trait;
use indexmap::IndexMap;
use serde_json::{Map, Value, json};
use std::sync::Arc;

use crate::args::{RequestArguments, map_request_arguments};
use crate::checks::{check_client_on_context, enforce};
use crate::error::{ClientError, ResolverError};
use crate::session::Schema;
use crate::settings::{RuntimeSettings, runtime_settings_over};
use crate::synth::ResolverSpec;
use crate::unique::where_unique_from_parent;

/// Data client methods the resolvers call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ClientMethod {
    /// Fetch one record by a unique where-clause
    FindUnique,
    /// Fetch many records
    FindMany,
    /// Count records
    Count,
}

impl ClientMethod {
    /// Method name as seen on the client
    pub fn as_str(&self) -> &'static str {
        match self {
            ClientMethod::FindUnique => "findUnique",
            ClientMethod::FindMany => "findMany",
            ClientMethod::Count => "count",
        }
    }
}

/// One call against the data client
#[derive(Debug, Clone, PartialEq)]
pub struct Operation {
    /// Target model
    pub model: String,
    /// Method to call
    pub method: ClientMethod,
    /// Native arguments (`where`, `select`, `take`, `skip`)
    pub args: Value,
}

impl Operation {
    /// Build an operation
    pub fn new(model: impl Into<String>, method: ClientMethod, args: Value) -> Self {
        Self {
            model: model.into(),
            method,
            args,
        }
    }
}

/// The data-access client resolvers delegate to
#[async_trait]
pub trait DataClient: Send + Sync {
    /// Identity checked by the strict client check
    fn client_id(&self) -> &str;

    /// Whether `method` is available on `model`
    fn has_method(&self, model: &str, method: ClientMethod) -> bool;

    /// Run one operation
    async fn execute(&self, operation: Operation) -> Result<Value, ClientError>;

    /// Run operations atomically, results in operation order
    async fn transaction(&self, operations: Vec<Operation>) -> Result<Vec<Value>, ClientError>;
}

/// Per-request context: named slots, one of which holds the data client
#[derive(Default, Clone)]
pub struct ResolverContext {
    slots: IndexMap<String, Arc<dyn DataClient>>,
}

impl ResolverContext {
    /// Empty context
    pub fn new() -> Self {
        Self::default()
    }

    /// Put a client into a slot
    pub fn with_client(mut self, slot: impl Into<String>, client: Arc<dyn DataClient>) -> Self {
        self.slots.insert(slot.into(), client);
        self
    }

    /// Client in a slot
    pub fn client(&self, slot: &str) -> Option<&Arc<dyn DataClient>> {
        self.slots.get(slot)
    }
}

/// Which field is being resolved
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolveInfo {
    /// Parent type name
    pub parent_type: String,
    /// Field name
    pub field_name: String,
}

impl ResolveInfo {
    /// Info for `parent_type.field_name`
    pub fn new(parent_type: impl Into<String>, field_name: impl Into<String>) -> Self {
        Self {
            parent_type: parent_type.into(),
            field_name: field_name.into(),
        }
    }
}

/// Whether more records follow the requested page
pub fn has_more(total: i64, take: Option<i64>, skip: Option<i64>) -> bool {
    match take {
        Some(take) => take
            .checked_add(skip.unwrap_or(0))
            .is_some_and(|end| total > end),
        None => false,
    }
}

/// `{list, total, hasMore}` page result
pub fn list_result(list: Vec<Value>, total: i64, has_more: bool) -> Value {
    json!({ "list": list, "total": total, "hasMore": has_more })
}

/// Resolver set bound to one frozen schema
pub struct Resolvers {
    schema: Arc<Schema>,
    settings: RuntimeSettings,
}

impl Resolvers {
    /// Bind to `schema` with the runtime settings it was generated with,
    /// under any overrides made through
    /// [`change_settings`](crate::settings::change_settings)
    pub fn new(schema: Arc<Schema>) -> Self {
        let settings = runtime_settings_over(&schema.settings.runtime);
        Self::with_settings(schema, settings)
    }

    /// Bind to `schema` with explicit runtime settings
    pub fn with_settings(schema: Arc<Schema>, settings: RuntimeSettings) -> Self {
        Self { schema, settings }
    }

    /// Schema the resolvers read
    pub fn schema(&self) -> &Arc<Schema> {
        &self.schema
    }

    /// Resolve `info.parent_type.info.field_name` for one parent value
    ///
    /// Fields without a resolver read the parent property of the same name.
    pub async fn resolve(
        &self,
        parent: &Value,
        args: &Value,
        ctx: &ResolverContext,
        info: &ResolveInfo,
    ) -> Result<Value, ResolverError> {
        let field = self
            .schema
            .field(&info.parent_type, &info.field_name)
            .ok_or_else(|| ResolverError::UnknownField {
                parent: info.parent_type.clone(),
                field: info.field_name.clone(),
            })?;

        let Some(spec) = &field.resolve else {
            return Ok(parent.get(&info.field_name).cloned().unwrap_or(Value::Null));
        };

        tracing::trace!(parent = %info.parent_type, field = %info.field_name, "resolving field");
        let client = self.client(ctx)?;
        match spec {
            ResolverSpec::RelationUnique { model, field } => {
                self.relation_unique(client, model, field, parent).await
            }
            ResolverSpec::RelationList { model, field, .. } => {
                let request = map_request_arguments(&self.schema, info, args)?;
                self.relation_list(client, model, field, parent, request).await
            }
            ResolverSpec::FindUnique { model } => {
                let request = map_request_arguments(&self.schema, info, args)?;
                self.find_unique(client, model, request).await
            }
            ResolverSpec::FindMany { model } => {
                let request = map_request_arguments(&self.schema, info, args)?;
                self.find_many(client, model, request).await
            }
        }
    }

    /// The data client on the context, after the configured check
    fn client<'c>(&self, ctx: &'c ResolverContext) -> Result<&'c dyn DataClient, ResolverError> {
        let field = &self.settings.prisma_client_context_field;
        let client = ctx
            .client(field)
            .ok_or_else(|| ResolverError::MissingClient {
                field: field.clone(),
            })?;

        let outcome = check_client_on_context(
            client.as_ref(),
            self.schema.configs.models.keys().map(String::as_str),
            &self.settings,
        );
        enforce(outcome)?;
        Ok(client.as_ref())
    }

    async fn relation_unique(
        &self,
        client: &dyn DataClient,
        model: &str,
        field: &str,
        parent: &Value,
    ) -> Result<Value, ResolverError> {
        require(client, model, ClientMethod::FindUnique)?;
        let where_clause = self.parent_where(model, parent)?;

        let record = client
            .execute(Operation::new(
                model,
                ClientMethod::FindUnique,
                json!({ "where": where_clause, "select": { field: true } }),
            ))
            .await?;

        Ok(record.get(field).cloned().unwrap_or(Value::Null))
    }

    async fn relation_list(
        &self,
        client: &dyn DataClient,
        model: &str,
        field: &str,
        parent: &Value,
        request: RequestArguments,
    ) -> Result<Value, ResolverError> {
        require(client, model, ClientMethod::FindUnique)?;
        let where_clause = self.parent_where(model, parent)?;

        let mut relation = Map::new();
        let mut count = Map::new();
        if let Some(filter) = &request.where_clause {
            relation.insert("where".to_string(), filter.clone());
            count.insert("where".to_string(), filter.clone());
        }
        if let Some(take) = request.take {
            relation.insert("take".to_string(), take.into());
        }
        if let Some(skip) = request.skip {
            relation.insert("skip".to_string(), skip.into());
        }

        let select = json!({
            field: selection(relation),
            "_count": { "select": { field: selection(count) } },
        });
        let record = client
            .execute(Operation::new(
                model,
                ClientMethod::FindUnique,
                json!({ "where": where_clause, "select": select }),
            ))
            .await?;

        if record.is_null() {
            return Ok(list_result(Vec::new(), 0, false));
        }
        let list = record
            .get(field)
            .and_then(Value::as_array)
            .cloned()
            .unwrap_or_default();
        let total = record
            .get("_count")
            .and_then(|c| c.get(field))
            .and_then(Value::as_i64)
            .ok_or_else(|| {
                ClientError::from(format!(
                    "`findUnique` on `{model}` did not return `_count.{field}`"
                ))
            })?;

        let more = has_more(total, request.take, request.skip);
        Ok(list_result(list, total, more))
    }

    async fn find_unique(
        &self,
        client: &dyn DataClient,
        model: &str,
        request: RequestArguments,
    ) -> Result<Value, ResolverError> {
        require(client, model, ClientMethod::FindUnique)?;
        let where_clause = request.where_clause.unwrap_or_else(|| json!({}));
        let record = client
            .execute(Operation::new(
                model,
                ClientMethod::FindUnique,
                json!({ "where": where_clause }),
            ))
            .await?;
        Ok(record)
    }

    async fn find_many(
        &self,
        client: &dyn DataClient,
        model: &str,
        request: RequestArguments,
    ) -> Result<Value, ResolverError> {
        require(client, model, ClientMethod::FindMany)?;

        let mut find_args = Map::new();
        let mut count_args = Map::new();
        if let Some(filter) = &request.where_clause {
            find_args.insert("where".to_string(), filter.clone());
            count_args.insert("where".to_string(), filter.clone());
        }
        if let Some(take) = request.take {
            find_args.insert("take".to_string(), take.into());
        }
        if let Some(skip) = request.skip {
            find_args.insert("skip".to_string(), skip.into());
        }
        let find = Operation::new(model, ClientMethod::FindMany, Value::Object(find_args));

        if request.take.is_none() && request.skip.is_none() {
            let list = as_list(client.execute(find).await?);
            let total = list.len() as i64;
            return Ok(list_result(list, total, false));
        }

        require(client, model, ClientMethod::Count)?;
        let count = Operation::new(model, ClientMethod::Count, Value::Object(count_args));
        let mut results = client.transaction(vec![find, count]).await?.into_iter();
        let list = as_list(results.next().unwrap_or(Value::Null));
        let total = results
            .next()
            .as_ref()
            .and_then(Value::as_i64)
            .ok_or_else(|| ClientError::from(format!("`count` on `{model}` did not return a number")))?;

        let more = has_more(total, request.take, request.skip);
        Ok(list_result(list, total, more))
    }

    fn parent_where(&self, model: &str, parent: &Value) -> Result<Value, ResolverError> {
        let identifiers = self
            .schema
            .unique_identifiers(model)
            .ok_or_else(|| ResolverError::UnknownModel(model.to_string()))?;
        where_unique_from_parent(model, identifiers, parent)
    }
}

fn require(client: &dyn DataClient, model: &str, method: ClientMethod) -> Result<(), ResolverError> {
    if client.has_method(model, method) {
        Ok(())
    } else {
        Err(ResolverError::MissingClientMethod {
            model: model.to_string(),
            method: method.as_str(),
        })
    }
}

/// Relation selection: `true` when nothing narrows it
fn selection(args: Map<String, Value>) -> Value {
    if args.is_empty() {
        Value::Bool(true)
    } else {
        Value::Object(args)
    }
}

fn as_list(value: Value) -> Vec<Value> {
    match value {
        Value::Array(items) => items,
        _ => Vec::new(),
    }
}
