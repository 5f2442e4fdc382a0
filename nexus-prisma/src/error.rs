//! Error types for generation and resolution
//!
//! Generation-time errors abort the whole pass. Request-time errors are
//! returned from resolvers untouched so the executor can surface them.

/// Error type for code generation
#[derive(Debug, thiserror::Error)]
pub enum GeneratorError {
    /// Code generation failed
    #[error("code generation error: {0}")]
    CodeGenError(String),

    /// Failed to parse the document model or settings
    #[error("parse error: {0}")]
    Parse(String),

    /// None of the unique-identifier tiers produced a field set
    #[error(
        "unable to resolve a unique identifier for model `{model}`: it has no @id field, \
         no compound primary key, no @unique field and no compound unique group"
    )]
    UniqueIdentifierNotFound {
        /// Offending model
        model: String,
    },

    /// A scalar field uses a native type the mapper does not know
    #[error("unsupported scalar type `{scalar}` on field `{model}.{field}`")]
    UnsupportedScalar {
        /// Owning model
        model: String,
        /// Offending field
        field: String,
        /// Native type name as found in the document
        scalar: String,
    },

    /// An alias targets an input type the session never created
    #[error("unknown input type `{0}`")]
    UnknownInputType(String),

    /// An alias targets a field the input type does not declare
    #[error("input type `{input}` has no field `{field}`")]
    UnknownInputField {
        /// Input type name
        input: String,
        /// Missing field name
        field: String,
    },
}

impl From<String> for GeneratorError {
    fn from(s: String) -> Self {
        GeneratorError::CodeGenError(s)
    }
}

impl From<serde_json::Error> for GeneratorError {
    fn from(e: serde_json::Error) -> Self {
        GeneratorError::Parse(e.to_string())
    }
}

/// Error type for request-time resolution
#[derive(Debug, thiserror::Error)]
pub enum ResolverError {
    /// The context has no data client under the configured field
    #[error("no data client found on the context under `{field}`")]
    MissingClient {
        /// Configured context field
        field: String,
    },

    /// The data client cannot perform a method the resolver needs
    #[error("the data client has no `{method}` method for model `{model}`")]
    MissingClientMethod {
        /// Model being resolved
        model: String,
        /// Missing method
        method: &'static str,
    },

    /// The parent record lacks one of its model's identifier values
    #[error("parent record of model `{model}` is missing unique identifier field `{field}`")]
    MissingUniqueField {
        /// Parent model
        model: String,
        /// Missing identifier field
        field: String,
    },

    /// The resolver references a model the schema does not contain
    #[error("unknown model `{0}`")]
    UnknownModel(String),

    /// The resolve info names a field the schema does not contain
    #[error("unknown field `{parent}.{field}`")]
    UnknownField {
        /// Parent type
        parent: String,
        /// Field name
        field: String,
    },

    /// A paging argument is negative
    #[error("argument `{argument}` of `{parent}.{field}` must not be negative, got {value}")]
    NegativeArgument {
        /// Parent type
        parent: String,
        /// Field name
        field: String,
        /// `take` or `skip`
        argument: &'static str,
        /// Value received
        value: i64,
    },

    /// The client-on-context check failed every strategy
    #[error("client check failed: {0}")]
    ClientCheck(String),

    /// The data client itself reported an error
    #[error("data client error: {0}")]
    Client(#[from] ClientError),
}

/// Error reported by a [`DataClient`](crate::resolvers::DataClient)
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{0}")]
pub struct ClientError(pub String);

impl From<String> for ClientError {
    fn from(s: String) -> Self {
        ClientError(s)
    }
}

impl From<&str> for ClientError {
    fn from(s: &str) -> Self {
        ClientError(s.to_string())
    }
}
