//! Generation session
//!
//! All registries written during synthesis live here instead of in module
//! globals. A session is populated once, then frozen into a [`Schema`]
//! that request-time resolvers share read-only.

use indexmap::IndexMap;
use serde::Serialize;
use std::sync::Arc;

use crate::dmmf::Document;
use crate::error::GeneratorError;
use crate::filters::FilterRegistry;
use crate::schema::InputObjectDef;
use crate::settings::Settings;
use crate::synth::{FieldConfig, ObjectTypeConfig, TypeDefConfigurations};

/// Input field aliases: input type → alias → original field name
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct AliasTable {
    entries: IndexMap<String, IndexMap<String, String>>,
}

impl AliasTable {
    /// Record that `alias` on `input_type` stands for `original`
    pub fn record(&mut self, input_type: &str, alias: &str, original: &str) {
        self.entries
            .entry(input_type.to_string())
            .or_default()
            .insert(alias.to_string(), original.to_string());
    }

    /// Forget an alias
    fn remove(&mut self, input_type: &str, alias: &str) {
        if let Some(aliases) = self.entries.get_mut(input_type) {
            aliases.shift_remove(alias);
        }
    }

    /// Original field name behind `key`, if `key` is an alias
    pub fn original_name(&self, input_type: &str, key: &str) -> Option<&str> {
        self.entries
            .get(input_type)
            .and_then(|aliases| aliases.get(key))
            .map(String::as_str)
    }

    /// Aliases of one input type
    pub fn aliases_of(&self, input_type: &str) -> Option<&IndexMap<String, String>> {
        self.entries.get(input_type)
    }

    /// Every (input type, aliases) pair in recording order
    pub fn iter(&self) -> impl Iterator<Item = (&String, &IndexMap<String, String>)> {
        self.entries.iter()
    }

    /// Whether any alias was recorded
    pub fn is_empty(&self) -> bool {
        self.entries.values().all(IndexMap::is_empty)
    }
}

/// Mutable state of one generation pass
pub struct GenerationSession<'a> {
    /// Input document
    pub document: &'a Document,
    /// Resolved settings
    pub settings: &'a Settings,
    /// Input and enum types created so far
    pub registry: FilterRegistry,
    /// Input field aliases recorded so far
    pub aliases: AliasTable,
    /// Unique identifiers per model
    pub identifiers: IndexMap<String, Vec<String>>,
}

impl<'a> GenerationSession<'a> {
    /// Fresh session over a document
    pub fn new(document: &'a Document, settings: &'a Settings) -> Self {
        Self {
            document,
            settings,
            registry: FilterRegistry::new(),
            aliases: AliasTable::default(),
            identifiers: IndexMap::new(),
        }
    }

    /// Re-expose `field` of `input_type` under `alias`
    ///
    /// The field keeps its position. Aliasing an alias again keeps pointing
    /// at the original field.
    pub fn alias_input_field(
        &mut self,
        input_type: &str,
        field: &str,
        alias: &str,
    ) -> Result<(), GeneratorError> {
        let def = self
            .registry
            .input_mut(input_type)
            .ok_or_else(|| GeneratorError::UnknownInputType(input_type.to_string()))?;

        if !def.fields.contains_key(field) {
            return Err(GeneratorError::UnknownInputField {
                input: input_type.to_string(),
                field: field.to_string(),
            });
        }
        if field != alias && def.fields.contains_key(alias) {
            return Err(GeneratorError::CodeGenError(format!(
                "cannot alias `{input_type}.{field}` as `{alias}`: the name is already taken"
            )));
        }

        rename_field(def, field, alias);

        let original = self
            .aliases
            .original_name(input_type, field)
            .unwrap_or(field)
            .to_string();
        self.aliases.remove(input_type, field);
        if original != alias {
            self.aliases.record(input_type, alias, &original);
        }
        tracing::debug!(input_type, field = %original, alias, "aliased input field");
        Ok(())
    }

    /// Freeze the session together with its synthesized configurations
    pub fn finish(self, configs: TypeDefConfigurations) -> Arc<Schema> {
        Arc::new(Schema {
            settings: self.settings.clone(),
            configs,
            registry: self.registry,
            aliases: self.aliases,
            identifiers: self.identifiers,
        })
    }
}

fn rename_field(def: &mut InputObjectDef, from: &str, to: &str) {
    def.fields = std::mem::take(&mut def.fields)
        .into_iter()
        .map(|(key, mut field)| {
            if key == from {
                field.name = to.to_string();
                (to.to_string(), field)
            } else {
                (key, field)
            }
        })
        .collect();
}

/// Frozen result of a generation pass
#[derive(Debug)]
pub struct Schema {
    /// Settings the pass ran with
    pub settings: Settings,
    /// Object, enum and root configurations
    pub configs: TypeDefConfigurations,
    /// Input and enum types
    pub registry: FilterRegistry,
    /// Input field aliases
    pub aliases: AliasTable,
    /// Unique identifiers per model
    pub identifiers: IndexMap<String, Vec<String>>,
}

impl Schema {
    /// Object configuration by type name (models, list results, `Query`)
    pub fn object(&self, name: &str) -> Option<&ObjectTypeConfig> {
        self.configs.object(name)
    }

    /// Field configuration by parent type and field name
    pub fn field(&self, parent: &str, field: &str) -> Option<&FieldConfig> {
        self.object(parent).and_then(|object| object.field(field))
    }

    /// Input type by name
    pub fn input(&self, name: &str) -> Option<&Arc<InputObjectDef>> {
        self.registry.input(name)
    }

    /// Unique identifiers of a model
    pub fn unique_identifiers(&self, model: &str) -> Option<&[String]> {
        self.identifiers.get(model).map(Vec::as_slice)
    }

    /// Full SDL of the generated type graph, in emission order
    pub fn to_sdl(&self) -> String {
        let mut blocks: Vec<String> = Vec::new();
        blocks.extend(self.configs.enums.values().map(|e| e.to_enum_def().to_sdl()));
        blocks.extend(self.registry.enums().map(|e| e.to_sdl()));
        blocks.extend(self.configs.objects().map(ObjectTypeConfig::to_sdl));
        blocks.extend(self.registry.inputs().map(|i| i.to_sdl()));
        let mut sdl = blocks.join("\n\n");
        sdl.push('\n');
        sdl
    }
}
