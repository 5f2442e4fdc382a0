//! Generator and runtime settings
//!
//! [`Settings`] is the resolved configuration for one generation pass.
//! [`RuntimeSettings`] is the slice of it that resolvers consult at request
//! time. Overrides passed to [`change_settings`] accumulate process-wide and
//! are laid over whatever runtime settings a schema was generated with.

use indexmap::IndexMap;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::sync::{PoisonError, RwLock};

/// Default context slot holding the data client
pub const DEFAULT_CONTEXT_FIELD: &str = "prisma";

/// Default identity of the data client
pub const DEFAULT_CLIENT_IMPORT_ID: &str = "@prisma/client";

/// Resolved settings for a generation pass
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Settings {
    /// How `Int` identifiers are projected
    #[serde(rename = "projectIdIntToGraphQL")]
    pub project_id_int_to_graphql: IdIntProjection,

    /// Documentation propagation toggles
    pub doc_propagation: DocPropagation,

    /// What to write into declarations for undocumented models and fields
    pub jsdoc_propagation_default: JsDocDefault,

    /// Which runtime module flavors to emit
    pub output: OutputFormats,

    /// Declarative input field aliases: input type → original field → alias
    pub input_field_aliases: IndexMap<String, IndexMap<String, String>>,

    /// Settings shared with resolvers
    #[serde(flatten)]
    pub runtime: RuntimeSettings,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            project_id_int_to_graphql: IdIntProjection::Int,
            doc_propagation: DocPropagation::default(),
            jsdoc_propagation_default: JsDocDefault::Guide,
            output: OutputFormats::default(),
            input_field_aliases: IndexMap::new(),
            runtime: RuntimeSettings::default(),
        }
    }
}

/// Projection of `Int` identifier fields
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub enum IdIntProjection {
    /// Project as the GraphQL `ID` scalar
    #[serde(rename = "ID")]
    Id,
    /// Keep as `Int`
    Int,
}

/// Documentation propagation toggles
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct DocPropagation {
    /// Copy documentation into declaration comments
    #[serde(rename = "JSDoc")]
    pub js_doc: bool,

    /// Copy documentation into GraphQL descriptions
    #[serde(rename = "GraphQLDocs")]
    pub graphql_docs: bool,
}

impl Default for DocPropagation {
    fn default() -> Self {
        Self {
            js_doc: true,
            graphql_docs: true,
        }
    }
}

/// Fallback declaration comment for undocumented items
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum JsDocDefault {
    /// Emit a short guide pointing at the missing documentation
    Guide,
    /// Emit nothing
    None,
}

/// Runtime module flavors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct OutputFormats {
    /// ES module (`index.mjs`)
    pub esm: bool,
    /// CommonJS module (`index.js`)
    pub cjs: bool,
}

impl Default for OutputFormats {
    fn default() -> Self {
        Self { esm: true, cjs: true }
    }
}

/// Settings consulted by resolvers at request time
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RuntimeSettings {
    /// Context slot holding the data client
    pub prisma_client_context_field: String,

    /// Identity the strict client check expects
    pub prisma_client_import_id: String,

    /// Optional runtime sanity checks
    pub checks: Checks,
}

impl Default for RuntimeSettings {
    fn default() -> Self {
        Self {
            prisma_client_context_field: DEFAULT_CONTEXT_FIELD.to_string(),
            prisma_client_import_id: DEFAULT_CLIENT_IMPORT_ID.to_string(),
            checks: Checks::default(),
        }
    }
}

/// Runtime sanity checks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Checks {
    /// Verify the context slot really holds the expected data client
    #[serde(rename = "PrismaClientOnContext")]
    pub prisma_client_on_context: CheckSetting,
}

/// One check's configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct CheckSetting {
    /// Run the check at all
    pub enabled: bool,
    /// How to run it
    pub strategy: CheckStrategy,
}

impl Default for CheckSetting {
    fn default() -> Self {
        Self {
            enabled: true,
            strategy: CheckStrategy::StrictWithFallback,
        }
    }
}

/// Strategy for the client-on-context check
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum CheckStrategy {
    /// The client must report the configured identity
    #[serde(rename = "strict", alias = "instanceOf")]
    StrictIdentity,
    /// The client must answer the methods resolvers call
    #[serde(rename = "structural", alias = "duckType")]
    StructuralProbe,
    /// Strict first, structural with a warning second
    StrictWithFallback,
}

/// Partial runtime settings accepted by [`change_settings`]
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SettingsInput {
    /// New context slot
    pub prisma_client_context_field: Option<String>,
    /// New client identity
    pub prisma_client_import_id: Option<String>,
    /// Check overrides
    pub checks: Option<ChecksInput>,
}

/// Partial [`Checks`]
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ChecksInput {
    /// Client-on-context override
    #[serde(rename = "PrismaClientOnContext")]
    pub prisma_client_on_context: Option<CheckSettingInput>,
}

/// Partial [`CheckSetting`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct CheckSettingInput {
    /// New enabled flag
    pub enabled: Option<bool>,
    /// New strategy
    pub strategy: Option<CheckStrategy>,
}

impl RuntimeSettings {
    /// Merge a partial input; unspecified fields keep their current value
    pub fn merge(&mut self, input: SettingsInput) {
        if let Some(field) = input.prisma_client_context_field {
            self.prisma_client_context_field = field;
        }
        if let Some(id) = input.prisma_client_import_id {
            self.prisma_client_import_id = id;
        }
        if let Some(check) = input.checks.and_then(|c| c.prisma_client_on_context) {
            let current = &mut self.checks.prisma_client_on_context;
            if let Some(enabled) = check.enabled {
                current.enabled = enabled;
            }
            if let Some(strategy) = check.strategy {
                current.strategy = strategy;
            }
        }
    }
}

impl SettingsInput {
    /// Fold a later input over this one; fields the later input sets win
    pub fn overlay(&mut self, later: SettingsInput) {
        self.prisma_client_context_field = later
            .prisma_client_context_field
            .or(self.prisma_client_context_field.take());
        self.prisma_client_import_id = later
            .prisma_client_import_id
            .or(self.prisma_client_import_id.take());

        if let Some(later) = later.checks.and_then(|c| c.prisma_client_on_context) {
            let check = self
                .checks
                .get_or_insert_with(ChecksInput::default)
                .prisma_client_on_context
                .get_or_insert_with(CheckSettingInput::default);
            check.enabled = later.enabled.or(check.enabled);
            check.strategy = later.strategy.or(check.strategy);
        }
    }
}

/// Process-wide overrides accumulated by [`change_settings`]
static SETTINGS_OVERRIDES: Lazy<RwLock<SettingsInput>> =
    Lazy::new(|| RwLock::new(SettingsInput::default()));

/// Merge `input` into the process-wide runtime overrides
///
/// Idempotent: applying the same input twice leaves the same state.
/// Unspecified fields keep their current value.
pub fn change_settings(input: SettingsInput) {
    let mut overrides = SETTINGS_OVERRIDES
        .write()
        .unwrap_or_else(PoisonError::into_inner);
    overrides.overlay(input);
    tracing::debug!(overrides = ?*overrides, "runtime settings changed");
}

/// `base` with the process-wide overrides applied
pub fn runtime_settings_over(base: &RuntimeSettings) -> RuntimeSettings {
    let overrides = SETTINGS_OVERRIDES
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .clone();
    let mut settings = base.clone();
    settings.merge(overrides);
    settings
}

/// Default runtime settings with the process-wide overrides applied
pub fn runtime_settings() -> RuntimeSettings {
    runtime_settings_over(&RuntimeSettings::default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_settings_defaults_from_empty_json() {
        let settings: Settings = serde_json::from_str("{}").unwrap();
        assert_eq!(settings, Settings::default());
        assert_eq!(settings.runtime.prisma_client_context_field, "prisma");
        assert_eq!(settings.project_id_int_to_graphql, IdIntProjection::Int);
    }

    #[test]
    fn test_settings_from_json() {
        let settings: Settings = serde_json::from_str(
            r#"{
                "projectIdIntToGraphQL": "ID",
                "docPropagation": {"JSDoc": false},
                "prismaClientContextField": "db",
                "checks": {"PrismaClientOnContext": {"strategy": "duckType"}}
            }"#,
        )
        .unwrap();

        assert_eq!(settings.project_id_int_to_graphql, IdIntProjection::Id);
        assert!(!settings.doc_propagation.js_doc);
        assert!(settings.doc_propagation.graphql_docs);
        assert_eq!(settings.runtime.prisma_client_context_field, "db");
        let check = settings.runtime.checks.prisma_client_on_context;
        assert!(check.enabled);
        assert_eq!(check.strategy, CheckStrategy::StructuralProbe);
    }

    #[test]
    fn test_merge_keeps_unspecified_fields() {
        let mut settings = RuntimeSettings::default();
        let input = SettingsInput {
            checks: Some(ChecksInput {
                prisma_client_on_context: Some(CheckSettingInput {
                    enabled: Some(false),
                    strategy: None,
                }),
            }),
            ..Default::default()
        };

        settings.merge(input.clone());
        settings.merge(input);

        assert_eq!(settings.prisma_client_context_field, "prisma");
        assert!(!settings.checks.prisma_client_on_context.enabled);
        assert_eq!(
            settings.checks.prisma_client_on_context.strategy,
            CheckStrategy::StrictWithFallback
        );
    }

    #[test]
    fn test_overlay_keeps_earlier_fields() {
        let mut overrides: SettingsInput = serde_json::from_value(serde_json::json!({
            "prismaClientContextField": "db",
            "checks": {"PrismaClientOnContext": {"enabled": false}}
        }))
        .unwrap();
        overrides.overlay(
            serde_json::from_value(serde_json::json!({
                "checks": {"PrismaClientOnContext": {"strategy": "strict"}}
            }))
            .unwrap(),
        );

        let mut settings = RuntimeSettings::default();
        settings.merge(overrides);
        assert_eq!(settings.prisma_client_context_field, "db");
        assert_eq!(settings.prisma_client_import_id, DEFAULT_CLIENT_IMPORT_ID);
        let check = settings.checks.prisma_client_on_context;
        assert!(!check.enabled);
        assert_eq!(check.strategy, CheckStrategy::StrictIdentity);
    }

    #[test]
    fn test_change_settings_merges_into_global() {
        let before = runtime_settings();
        change_settings(SettingsInput {
            prisma_client_import_id: Some(before.prisma_client_import_id.clone()),
            ..Default::default()
        });
        assert_eq!(runtime_settings(), before);
    }
}
