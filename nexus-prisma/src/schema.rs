//! GraphQL type graph shared by the synthesizer, the emitter and resolvers

use indexmap::IndexMap;
use std::fmt;

/// A GraphQL type reference: a named type under list/non-null wrappers
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TypeRef {
    /// A named type (`String`, `User`, `UserWhereInput`, ...)
    Named(String),
    /// `[T]`
    List(Box<TypeRef>),
    /// `T!`
    NonNull(Box<TypeRef>),
}

impl TypeRef {
    /// A nullable named type
    pub fn named(name: impl Into<String>) -> Self {
        TypeRef::Named(name.into())
    }

    /// Wrap in a list
    pub fn list(self) -> Self {
        TypeRef::List(Box::new(self))
    }

    /// Wrap in non-null; already non-null references are returned as is
    pub fn non_null(self) -> Self {
        match self {
            TypeRef::NonNull(_) => self,
            other => TypeRef::NonNull(Box::new(other)),
        }
    }

    /// `[T!]`
    pub fn list_of_non_null(name: impl Into<String>) -> Self {
        TypeRef::named(name).non_null().list()
    }

    /// The named type under every wrapper
    pub fn named_type(&self) -> &str {
        match self {
            TypeRef::Named(name) => name,
            TypeRef::List(inner) | TypeRef::NonNull(inner) => inner.named_type(),
        }
    }

    /// Whether the outermost wrapper is non-null
    pub fn is_non_null(&self) -> bool {
        matches!(self, TypeRef::NonNull(_))
    }

    /// Whether a list wrapper appears anywhere
    pub fn is_list(&self) -> bool {
        match self {
            TypeRef::Named(_) => false,
            TypeRef::List(_) => true,
            TypeRef::NonNull(inner) => inner.is_list(),
        }
    }
}

impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeRef::Named(name) => f.write_str(name),
            TypeRef::List(inner) => write!(f, "[{inner}]"),
            TypeRef::NonNull(inner) => write!(f, "{inner}!"),
        }
    }
}

/// A field of an input object
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputFieldDef {
    /// Exposed field name (the alias, once aliased)
    pub name: String,
    /// Field type
    pub ty: TypeRef,
    /// Optional description
    pub description: Option<String>,
}

impl InputFieldDef {
    /// A field without description
    pub fn new(name: impl Into<String>, ty: TypeRef) -> Self {
        Self {
            name: name.into(),
            ty,
            description: None,
        }
    }
}

/// An input object definition
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputObjectDef {
    /// Type name
    pub name: String,
    /// Optional description
    pub description: Option<String>,
    /// Fields keyed by exposed name, in declaration order
    pub fields: IndexMap<String, InputFieldDef>,
}

impl InputObjectDef {
    /// An empty input object
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            fields: IndexMap::new(),
        }
    }

    /// Builder-style field append
    pub fn field(mut self, name: &str, ty: TypeRef) -> Self {
        self.fields
            .insert(name.to_string(), InputFieldDef::new(name, ty));
        self
    }

    /// Builder-style description
    pub fn description(mut self, description: Option<String>) -> Self {
        self.description = description;
        self
    }

    /// SDL rendering
    pub fn to_sdl(&self) -> String {
        let mut out = String::new();
        push_sdl_description(&mut out, self.description.as_deref(), "");
        out.push_str(&format!("input {} {{\n", self.name));
        for field in self.fields.values() {
            push_sdl_description(&mut out, field.description.as_deref(), "  ");
            out.push_str(&format!("  {}: {}\n", field.name, field.ty));
        }
        out.push('}');
        out
    }
}

/// An enum definition
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumTypeDef {
    /// Type name
    pub name: String,
    /// Optional description
    pub description: Option<String>,
    /// Members in declared order
    pub members: Vec<String>,
}

impl EnumTypeDef {
    /// SDL rendering
    pub fn to_sdl(&self) -> String {
        let mut out = String::new();
        push_sdl_description(&mut out, self.description.as_deref(), "");
        out.push_str(&format!("enum {} {{\n", self.name));
        for member in &self.members {
            out.push_str(&format!("  {member}\n"));
        }
        out.push('}');
        out
    }
}

pub(crate) fn push_sdl_description(out: &mut String, description: Option<&str>, indent: &str) {
    if let Some(text) = description {
        out.push_str(&format!("{indent}\"\"\"\n"));
        for line in text.lines() {
            out.push_str(&format!("{indent}{line}\n"));
        }
        out.push_str(&format!("{indent}\"\"\"\n"));
    }
}
