//! Type-definition synthesis
//!
//! Walks the document once, in declaration order, and produces:
//! - One object configuration per model (fields, descriptions, resolvers)
//! - One `<Model>List` result object per model
//! - One enum configuration per document enum
//! - The root `Query` configuration (`user`, `users`, ...)
//! - `<Model>WhereInput` and `<Model>WhereUniqueInput` in the session registry

use heck::{ToLowerCamelCase, ToUpperCamelCase};
use indexmap::IndexMap;

use crate::dmmf::{Enum, Field, FieldKind, Model};
use crate::error::GeneratorError;
use crate::filters::{where_input_name, where_unique_input_name};
use crate::schema::{EnumTypeDef, InputFieldDef, InputObjectDef, TypeRef, push_sdl_description};
use crate::session::GenerationSession;
use crate::typemap::{field_type_ref, map_field_type, map_scalar, scalar_type, wrap_field_type};
use crate::unique::{compound_key_name, resolve_unique_identifiers};

/// Key of the type name metadata entry
pub const NAME_KEY: &str = "$name";

/// Key of the description metadata entry
pub const DESCRIPTION_KEY: &str = "$description";

/// Name of the root query type
pub const QUERY_TYPE: &str = "Query";

/// Name of the paginated result object of a model
pub fn list_result_name(model: &str) -> String {
    format!("{model}List")
}

/// Root field fetching one record of a model
pub fn find_unique_field_name(model: &str) -> String {
    model.to_lower_camel_case()
}

/// Root field fetching a page of records of a model
pub fn find_many_field_name(model: &str) -> String {
    format!("{}s", model.to_lower_camel_case())
}

/// Which resolver a field gets at request time
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolverSpec {
    /// To-one relation: look the parent up, project the field
    RelationUnique {
        /// Parent model
        model: String,
        /// Relation field
        field: String,
    },
    /// To-many relation: list and count through the parent
    RelationList {
        /// Parent model
        model: String,
        /// Relation field
        field: String,
        /// Related model
        target: String,
    },
    /// Root accessor for one record
    FindUnique {
        /// Model
        model: String,
    },
    /// Root accessor for a page of records
    FindMany {
        /// Model
        model: String,
    },
}

impl ResolverSpec {
    /// Model the resolver reads from
    pub fn model(&self) -> &str {
        match self {
            ResolverSpec::RelationUnique { model, .. }
            | ResolverSpec::RelationList { model, .. }
            | ResolverSpec::FindUnique { model }
            | ResolverSpec::FindMany { model } => model,
        }
    }
}

/// A field of an object configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldConfig {
    /// Field name
    pub name: String,
    /// Output type
    pub ty: TypeRef,
    /// GraphQL description, subject to documentation propagation
    pub description: Option<String>,
    /// Source documentation, for declaration comments
    pub documentation: Option<String>,
    /// Arguments in declaration order
    pub args: IndexMap<String, TypeRef>,
    /// Resolver; `None` means the parent property is read as is
    pub resolve: Option<ResolverSpec>,
}

impl FieldConfig {
    fn new(name: impl Into<String>, ty: TypeRef) -> Self {
        Self {
            name: name.into(),
            ty,
            description: None,
            documentation: None,
            args: IndexMap::new(),
            resolve: None,
        }
    }
}

/// Metadata carried next to the fields of an object configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MetadataConfig {
    /// `$name`
    Name(String),
    /// `$description`, present only for documented types
    Description(Option<String>),
}

/// One entry of an object configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigEntry {
    /// Type-level metadata
    Metadata(MetadataConfig),
    /// A real field
    Field(FieldConfig),
}

/// Kind of object configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObjectKind {
    /// A document model
    Model,
    /// A `<Model>List` page result
    ListResult,
    /// The root query type
    Query,
}

/// An object type configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectTypeConfig {
    /// What the object stands for
    pub kind: ObjectKind,
    /// Source documentation, for declaration comments
    pub documentation: Option<String>,
    /// Metadata and fields, metadata first
    pub entries: IndexMap<String, ConfigEntry>,
}

impl ObjectTypeConfig {
    fn new(kind: ObjectKind, name: &str, description: Option<String>) -> Self {
        let mut entries = IndexMap::new();
        entries.insert(
            NAME_KEY.to_string(),
            ConfigEntry::Metadata(MetadataConfig::Name(name.to_string())),
        );
        if description.is_some() {
            entries.insert(
                DESCRIPTION_KEY.to_string(),
                ConfigEntry::Metadata(MetadataConfig::Description(description)),
            );
        }
        Self {
            kind,
            documentation: None,
            entries,
        }
    }

    fn push_field(&mut self, field: FieldConfig) {
        self.entries
            .insert(field.name.clone(), ConfigEntry::Field(field));
    }

    /// Type name
    pub fn name(&self) -> &str {
        self.entries
            .values()
            .find_map(|entry| match entry {
                ConfigEntry::Metadata(MetadataConfig::Name(name)) => Some(name.as_str()),
                _ => None,
            })
            .unwrap_or_default()
    }

    /// Type description
    pub fn description(&self) -> Option<&str> {
        self.entries.values().find_map(|entry| match entry {
            ConfigEntry::Metadata(MetadataConfig::Description(description)) => {
                description.as_deref()
            }
            _ => None,
        })
    }

    /// Fields in declaration order
    pub fn fields(&self) -> impl Iterator<Item = &FieldConfig> {
        self.entries.values().filter_map(|entry| match entry {
            ConfigEntry::Field(field) => Some(field),
            ConfigEntry::Metadata(_) => None,
        })
    }

    /// Field by name
    pub fn field(&self, name: &str) -> Option<&FieldConfig> {
        match self.entries.get(name) {
            Some(ConfigEntry::Field(field)) => Some(field),
            _ => None,
        }
    }

    /// SDL rendering
    pub fn to_sdl(&self) -> String {
        let mut out = String::new();
        push_sdl_description(&mut out, self.description(), "");
        out.push_str(&format!("type {} {{\n", self.name()));
        for field in self.fields() {
            push_sdl_description(&mut out, field.description.as_deref(), "  ");
            let args = if field.args.is_empty() {
                String::new()
            } else {
                let rendered: Vec<String> = field
                    .args
                    .iter()
                    .map(|(name, ty)| format!("{name}: {ty}"))
                    .collect();
                format!("({})", rendered.join(", "))
            };
            out.push_str(&format!("  {}{}: {}\n", field.name, args, field.ty));
        }
        out.push('}');
        out
    }
}

/// An enum type configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumTypeConfig {
    /// Type name
    pub name: String,
    /// GraphQL description, subject to documentation propagation
    pub description: Option<String>,
    /// Source documentation, for declaration comments
    pub documentation: Option<String>,
    /// Members in declared order
    pub members: Vec<String>,
}

impl EnumTypeConfig {
    /// As a schema enum definition
    pub fn to_enum_def(&self) -> EnumTypeDef {
        EnumTypeDef {
            name: self.name.clone(),
            description: self.description.clone(),
            members: self.members.clone(),
        }
    }
}

/// Everything synthesized from one document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeDefConfigurations {
    /// Model objects by model name
    pub models: IndexMap<String, ObjectTypeConfig>,
    /// `<Model>List` objects by type name
    pub list_results: IndexMap<String, ObjectTypeConfig>,
    /// Enums by name
    pub enums: IndexMap<String, EnumTypeConfig>,
    /// Root query
    pub query: ObjectTypeConfig,
}

impl TypeDefConfigurations {
    /// Object configuration by type name
    pub fn object(&self, name: &str) -> Option<&ObjectTypeConfig> {
        if name == QUERY_TYPE {
            return Some(&self.query);
        }
        self.models
            .get(name)
            .or_else(|| self.list_results.get(name))
    }

    /// Every object configuration: models, list results, then `Query`
    pub fn objects(&self) -> impl Iterator<Item = &ObjectTypeConfig> {
        self.models
            .values()
            .chain(self.list_results.values())
            .chain(std::iter::once(&self.query))
    }
}

/// Synthesize every configuration of the session's document
pub fn synthesize(session: &mut GenerationSession<'_>) -> Result<TypeDefConfigurations, GeneratorError> {
    let document = session.document;

    // Identity first: a model without one aborts before anything is built.
    for model in &document.models {
        let identifiers = resolve_unique_identifiers(model)?;
        session.identifiers.insert(model.name.clone(), identifiers);
    }

    let enums = document
        .enums
        .iter()
        .map(|e| (e.name.clone(), synthesize_enum(session, e)))
        .collect();

    let mut models = IndexMap::new();
    let mut list_results = IndexMap::new();
    for model in &document.models {
        tracing::debug!(model = %model.name, fields = model.fields.len(), "synthesizing model");
        models.insert(model.name.clone(), synthesize_model(session, model)?);
        let list_result = synthesize_list_result(&model.name);
        list_results.insert(list_result.name().to_string(), list_result);
    }

    for model in &document.models {
        synthesize_where_input(session, model)?;
        synthesize_where_unique_input(session, model)?;
    }

    let query = synthesize_query(document.models.iter().map(|m| m.name.as_str()))?;

    let settings = session.settings;
    for (input_type, aliases) in &settings.input_field_aliases {
        for (field, alias) in aliases {
            session.alias_input_field(input_type, field, alias)?;
        }
    }

    Ok(TypeDefConfigurations {
        models,
        list_results,
        enums,
        query,
    })
}

fn propagated(session: &GenerationSession<'_>, documentation: &Option<String>) -> Option<String> {
    if session.settings.doc_propagation.graphql_docs {
        documentation.clone()
    } else {
        None
    }
}

fn synthesize_enum(session: &GenerationSession<'_>, enum_def: &Enum) -> EnumTypeConfig {
    EnumTypeConfig {
        name: enum_def.name.clone(),
        description: propagated(session, &enum_def.documentation),
        documentation: enum_def.documentation.clone(),
        members: enum_def.values.iter().map(|v| v.name.clone()).collect(),
    }
}

fn synthesize_model(
    session: &GenerationSession<'_>,
    model: &Model,
) -> Result<ObjectTypeConfig, GeneratorError> {
    let mut config = ObjectTypeConfig::new(
        ObjectKind::Model,
        &model.name,
        propagated(session, &model.documentation),
    );
    config.documentation = model.documentation.clone();

    for field in &model.fields {
        config.push_field(synthesize_field(session, model, field)?);
    }
    Ok(config)
}

fn synthesize_field(
    session: &GenerationSession<'_>,
    model: &Model,
    field: &Field,
) -> Result<FieldConfig, GeneratorError> {
    let mut config = if field.is_relation() && field.is_list {
        let mut config = FieldConfig::new(
            &field.name,
            TypeRef::named(list_result_name(&field.type_name)).non_null(),
        );
        config.args = paging_args(&field.type_name);
        config.resolve = Some(ResolverSpec::RelationList {
            model: model.name.clone(),
            field: field.name.clone(),
            target: field.type_name.clone(),
        });
        config
    } else if field.is_relation() {
        let mut config = FieldConfig::new(&field.name, field_type_ref(model, field, session.settings)?);
        config.resolve = Some(ResolverSpec::RelationUnique {
            model: model.name.clone(),
            field: field.name.clone(),
        });
        config
    } else {
        FieldConfig::new(&field.name, field_type_ref(model, field, session.settings)?)
    };

    config.description = propagated(session, &field.documentation);
    config.documentation = field.documentation.clone();
    Ok(config)
}

fn paging_args(model: &str) -> IndexMap<String, TypeRef> {
    let mut args = IndexMap::new();
    args.insert("where".to_string(), TypeRef::named(where_input_name(model)));
    args.insert("take".to_string(), TypeRef::named("Int"));
    args.insert("skip".to_string(), TypeRef::named("Int"));
    args
}

fn synthesize_list_result(model: &str) -> ObjectTypeConfig {
    let name = list_result_name(model);
    let mut config = ObjectTypeConfig::new(ObjectKind::ListResult, &name, None);
    config.push_field(FieldConfig::new("list", wrap_field_type(model, true, true)));
    config.push_field(FieldConfig::new("total", TypeRef::named("Int").non_null()));
    config.push_field(FieldConfig::new("hasMore", TypeRef::named("Boolean").non_null()));
    config
}

fn synthesize_query<'m>(
    models: impl Iterator<Item = &'m str>,
) -> Result<ObjectTypeConfig, GeneratorError> {
    let mut query = ObjectTypeConfig::new(ObjectKind::Query, QUERY_TYPE, None);
    for model in models {
        for accessor in [find_unique_field_name(model), find_many_field_name(model)] {
            if let Some(existing) = query.field(&accessor) {
                return Err(GeneratorError::CodeGenError(format!(
                    "query accessor `{accessor}` of model `{model}` collides with the accessor of model `{}`",
                    existing.resolve.as_ref().map_or("", ResolverSpec::model)
                )));
            }
        }

        let mut unique = FieldConfig::new(find_unique_field_name(model), TypeRef::named(model));
        unique.args.insert(
            "where".to_string(),
            TypeRef::named(where_unique_input_name(model)).non_null(),
        );
        unique.resolve = Some(ResolverSpec::FindUnique {
            model: model.to_string(),
        });
        query.push_field(unique);

        let mut many = FieldConfig::new(
            find_many_field_name(model),
            TypeRef::named(list_result_name(model)).non_null(),
        );
        many.args = paging_args(model);
        many.resolve = Some(ResolverSpec::FindMany {
            model: model.to_string(),
        });
        query.push_field(many);
    }
    Ok(query)
}

fn synthesize_where_input(
    session: &mut GenerationSession<'_>,
    model: &Model,
) -> Result<(), GeneratorError> {
    let name = where_input_name(&model.name);
    let mut def = InputObjectDef::new(&name)
        .field("AND", TypeRef::list_of_non_null(&name))
        .field("OR", TypeRef::list_of_non_null(&name))
        .field("NOT", TypeRef::list_of_non_null(&name));

    for field in &model.fields {
        let filter_type = match field.kind {
            FieldKind::Scalar => {
                let scalar = scalar_type(model, field)?;
                let graphql_type = map_scalar(scalar, field.is_id, session.settings);
                let filter = if field.is_list {
                    Some(session.registry.scalar_list_filter(graphql_type))
                } else {
                    session.registry.scalar_filter(graphql_type, scalar)
                };
                filter.map(|f| f.name.clone())
            }
            FieldKind::Enum if field.is_list => {
                Some(session.registry.scalar_list_filter(&field.type_name).name.clone())
            }
            FieldKind::Enum => Some(session.registry.enum_filter(&field.type_name).name.clone()),
            FieldKind::Object if field.is_list => {
                Some(session.registry.object_list_filter(&field.type_name).name.clone())
            }
            FieldKind::Object => Some(where_input_name(&field.type_name)),
            FieldKind::Unsupported => None,
        };

        if let Some(filter_type) = filter_type {
            def = def.field(&field.name, TypeRef::named(filter_type));
        }
    }

    session.registry.define_input(def);
    Ok(())
}

fn synthesize_where_unique_input(
    session: &mut GenerationSession<'_>,
    model: &Model,
) -> Result<(), GeneratorError> {
    let identifiers = session
        .identifiers
        .get(&model.name)
        .cloned()
        .unwrap_or_default();

    let mut members = Vec::with_capacity(identifiers.len());
    for name in &identifiers {
        let field = model.field(name).ok_or_else(|| {
            GeneratorError::CodeGenError(format!(
                "unique identifier `{name}` of model `{}` is not a field of the model",
                model.name
            ))
        })?;
        members.push((name, map_field_type(model, field, session.settings)?));
    }

    let mut def = InputObjectDef::new(where_unique_input_name(&model.name));
    if let [(name, graphql_type)] = members.as_slice() {
        def = def.field(name, TypeRef::named(graphql_type));
    } else {
        let compound_name = format!(
            "{}{}CompoundUniqueInput",
            model.name,
            identifiers
                .iter()
                .map(|f| f.to_upper_camel_case())
                .collect::<String>()
        );
        let fields = members
            .iter()
            .map(|(name, graphql_type)| {
                InputFieldDef::new(name.as_str(), TypeRef::named(graphql_type).non_null())
            })
            .collect();
        let compound = session.registry.compound_unique_input(&compound_name, fields);
        def = def.field(&compound_key_name(&identifiers), TypeRef::named(&compound.name));
    }

    session.registry.define_input(def);
    Ok(())
}
