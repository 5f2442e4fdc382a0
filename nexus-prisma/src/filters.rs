//! Filter input type registry
//!
//! Builds the input objects used by `where` arguments:
//! - Scalar filters (StringFilter, IntFilter, BooleanFilter, ...)
//! - Enum filters (ColorFilter, ...)
//! - To-many relation filters (PostListFilter)
//! - Scalar list filters (StringScalarListFilter)
//! - The QueryMode enum used by StringFilter
//!
//! Every type is created at most once. Requests for a name that already
//! exists return the cached definition.

use indexmap::IndexMap;
use std::sync::Arc;

use crate::dmmf::ScalarType;
use crate::schema::{EnumTypeDef, InputFieldDef, InputObjectDef, TypeRef};
use crate::typemap::ID;

/// Case sensitivity enum referenced by `StringFilter.mode`
pub const QUERY_MODE: &str = "QueryMode";

/// Depth-limited `not` target of `StringFilter`
pub const NESTED_STRING_FILTER: &str = "NestedStringFilter";

/// Registry of input object and enum types, keyed by type name
#[derive(Debug, Default, Clone)]
pub struct FilterRegistry {
    inputs: IndexMap<String, Arc<InputObjectDef>>,
    enums: IndexMap<String, Arc<EnumTypeDef>>,
}

/// Filter type name for a scalar filter
pub fn scalar_filter_name(graphql_type: &str, native: ScalarType) -> String {
    if graphql_type == ID && native == ScalarType::Int {
        "IntIDFilter".to_string()
    } else {
        format!("{graphql_type}Filter")
    }
}

/// Filter type name for an enum
pub fn enum_filter_name(enum_name: &str) -> String {
    format!("{enum_name}Filter")
}

/// Filter type name for a to-many relation
pub fn object_list_filter_name(model: &str) -> String {
    format!("{model}ListFilter")
}

/// Filter type name for a scalar or enum list field
pub fn scalar_list_filter_name(element: &str) -> String {
    format!("{element}ScalarListFilter")
}

/// `where` input name of a model
pub fn where_input_name(model: &str) -> String {
    format!("{model}WhereInput")
}

/// Unique `where` input name of a model
pub fn where_unique_input_name(model: &str) -> String {
    format!("{model}WhereUniqueInput")
}

impl FilterRegistry {
    /// Empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the input named `name`, creating it with `build` if absent
    fn get_or_create(
        &mut self,
        name: &str,
        build: impl FnOnce(&mut Self) -> InputObjectDef,
    ) -> Arc<InputObjectDef> {
        if let Some(existing) = self.inputs.get(name) {
            return Arc::clone(existing);
        }
        let def = Arc::new(build(self));
        tracing::trace!(name, "registered input type");
        self.inputs.insert(name.to_string(), Arc::clone(&def));
        def
    }

    /// Register a fully built input object
    ///
    /// An existing definition with the same name wins and is returned.
    pub fn define_input(&mut self, def: InputObjectDef) -> Arc<InputObjectDef> {
        let name = def.name.clone();
        self.get_or_create(&name, |_| def)
    }

    /// Filter for a scalar field
    ///
    /// `graphql_type` is the mapped name (possibly `ID`), `native` the
    /// document type that decides the shape of identifier filters.
    /// Returns `None` for names that have no filter.
    pub fn scalar_filter(
        &mut self,
        graphql_type: &str,
        native: ScalarType,
    ) -> Option<Arc<InputObjectDef>> {
        let name = scalar_filter_name(graphql_type, native);
        let filter = match graphql_type {
            "String" => self.get_or_create(&name, |registry| {
                let mode = registry.query_mode();
                let def = text_fields(InputObjectDef::new(&name), "String");
                def.field("mode", TypeRef::named(&mode.name)).field(
                    "not",
                    TypeRef::named(&registry.nested_string_filter().name),
                )
            }),
            ID => match native {
                ScalarType::String => self.get_or_create(&name, |_| {
                    text_fields(InputObjectDef::new(&name), ID).field("not", TypeRef::named(&name))
                }),
                _ => self.get_or_create(&name, |_| {
                    comparable_fields(InputObjectDef::new(&name), ID)
                        .field("not", TypeRef::named(&name))
                }),
            },
            "Int" | "Float" | "BigInt" | "DateTime" | "Decimal" => {
                self.get_or_create(&name, |_| {
                    comparable_fields(InputObjectDef::new(&name), graphql_type)
                        .field("not", TypeRef::named(&name))
                })
            }
            "Boolean" => self.get_or_create(&name, |_| {
                value_fields(base_fields(InputObjectDef::new(&name), "Boolean"), "Boolean")
                    .field("not", TypeRef::named(&name))
            }),
            "Bytes" => self.get_or_create(&name, |_| {
                in_fields(base_fields(InputObjectDef::new(&name), "Bytes"), "Bytes")
                    .field("not", TypeRef::named(&name))
            }),
            "Json" => self.get_or_create(&name, |_| {
                InputObjectDef::new(&name)
                    .field("equals", TypeRef::named("Json"))
                    .field("path", TypeRef::list_of_non_null("String"))
                    .field("string_starts_with", TypeRef::named("String"))
                    .field("string_ends_with", TypeRef::named("String"))
                    .field("array_contains", TypeRef::named("Json"))
                    .field("array_starts_with", TypeRef::named("Json"))
                    .field("array_ends_with", TypeRef::named("Json"))
                    .field("not", TypeRef::named(&name))
            }),
            _ => return None,
        };
        Some(filter)
    }

    /// Filter for an enum field
    pub fn enum_filter(&mut self, enum_name: &str) -> Arc<InputObjectDef> {
        let name = enum_filter_name(enum_name);
        self.get_or_create(&name, |_| {
            in_fields(base_fields(InputObjectDef::new(&name), enum_name), enum_name)
                .field("not", TypeRef::named(&name))
        })
    }

    /// Filter for a to-many relation field
    pub fn object_list_filter(&mut self, model: &str) -> Arc<InputObjectDef> {
        let name = object_list_filter_name(model);
        let where_input = where_input_name(model);
        self.get_or_create(&name, |_| {
            InputObjectDef::new(&name)
                .field("every", TypeRef::named(&where_input))
                .field("some", TypeRef::named(&where_input))
                .field("none", TypeRef::named(&where_input))
        })
    }

    /// Filter for a scalar or enum list field
    pub fn scalar_list_filter(&mut self, element: &str) -> Arc<InputObjectDef> {
        let name = scalar_list_filter_name(element);
        self.get_or_create(&name, |_| {
            InputObjectDef::new(&name)
                .field("equals", TypeRef::list_of_non_null(element))
                .field("has", TypeRef::named(element))
                .field("hasEvery", TypeRef::list_of_non_null(element))
                .field("hasSome", TypeRef::list_of_non_null(element))
                .field("isEmpty", TypeRef::named("Boolean"))
        })
    }

    /// Input addressing a record by a compound identifier
    pub fn compound_unique_input(
        &mut self,
        name: &str,
        fields: Vec<InputFieldDef>,
    ) -> Arc<InputObjectDef> {
        self.get_or_create(name, |_| {
            let mut def = InputObjectDef::new(name);
            for field in fields {
                def.fields.insert(field.name.clone(), field);
            }
            def
        })
    }

    /// `QueryMode { default, insensitive }`, created on first use
    pub fn query_mode(&mut self) -> Arc<EnumTypeDef> {
        if let Some(existing) = self.enums.get(QUERY_MODE) {
            return Arc::clone(existing);
        }
        let def = Arc::new(EnumTypeDef {
            name: QUERY_MODE.to_string(),
            description: None,
            members: vec!["default".to_string(), "insensitive".to_string()],
        });
        self.enums.insert(QUERY_MODE.to_string(), Arc::clone(&def));
        def
    }

    /// Text filter without `mode` or `not`
    fn nested_string_filter(&mut self) -> Arc<InputObjectDef> {
        self.get_or_create(NESTED_STRING_FILTER, |_| {
            text_fields(InputObjectDef::new(NESTED_STRING_FILTER), "String")
        })
    }

    /// Look up an input type
    pub fn input(&self, name: &str) -> Option<&Arc<InputObjectDef>> {
        self.inputs.get(name)
    }

    /// Mutable access for renaming fields during synthesis
    pub fn input_mut(&mut self, name: &str) -> Option<&mut InputObjectDef> {
        self.inputs.get_mut(name).map(Arc::make_mut)
    }

    /// Look up an enum type
    pub fn enum_type(&self, name: &str) -> Option<&Arc<EnumTypeDef>> {
        self.enums.get(name)
    }

    /// Input types in creation order
    pub fn inputs(&self) -> impl Iterator<Item = &Arc<InputObjectDef>> {
        self.inputs.values()
    }

    /// Enum types in creation order
    pub fn enums(&self) -> impl Iterator<Item = &Arc<EnumTypeDef>> {
        self.enums.values()
    }

    /// Number of registered types
    pub fn len(&self) -> usize {
        self.inputs.len() + self.enums.len()
    }

    /// Whether nothing was registered yet
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// `equals`
fn base_fields(def: InputObjectDef, ty: &str) -> InputObjectDef {
    def.field("equals", TypeRef::named(ty))
}

/// `in`, `notIn`
fn in_fields(def: InputObjectDef, ty: &str) -> InputObjectDef {
    def.field("in", TypeRef::list_of_non_null(ty))
        .field("notIn", TypeRef::list_of_non_null(ty))
}

/// `lt`, `lte`, `gt`, `gte`
fn value_fields(def: InputObjectDef, ty: &str) -> InputObjectDef {
    def.field("lt", TypeRef::named(ty))
        .field("lte", TypeRef::named(ty))
        .field("gt", TypeRef::named(ty))
        .field("gte", TypeRef::named(ty))
}

/// Equality, membership and ordering
fn comparable_fields(def: InputObjectDef, ty: &str) -> InputObjectDef {
    value_fields(in_fields(base_fields(def, ty), ty), ty)
}

/// Equality, membership and substring matching
fn text_fields(def: InputObjectDef, ty: &str) -> InputObjectDef {
    in_fields(base_fields(def, ty), ty)
        .field("contains", TypeRef::named(ty))
        .field("startsWith", TypeRef::named(ty))
        .field("endsWith", TypeRef::named(ty))
}
