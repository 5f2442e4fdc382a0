//! nexus-prisma
//!
//! Generates Nexus GraphQL bindings from a Prisma DMMF document:
//! - Object, enum and root `Query` configurations per model
//! - `WhereInput`, `WhereUniqueInput` and filter input types
//! - Default resolvers for relations and root accessors
//! - A runtime module (ESM and CommonJS) and a matching declaration module
//!
//! ```no_run
//! use nexus_prisma::{Document, Settings, generate};
//!
//! # fn main() -> Result<(), nexus_prisma::GeneratorError> {
//! let document = Document::from_json(r#"{"models": [], "enums": []}"#)?;
//! for module in generate(&document, &Settings::default())? {
//!     println!("{}: {} bytes", module.file_name, module.content.len());
//! }
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

use std::sync::Arc;

pub mod args;
pub mod checks;
pub mod dmmf;
pub mod emit;
mod error;
pub mod filters;
pub mod resolvers;
pub mod schema;
pub mod session;
pub mod settings;
pub mod synth;
pub mod typemap;
pub mod unique;

pub use dmmf::Document;
pub use emit::ModuleSpec;
pub use error::{ClientError, GeneratorError, ResolverError};
pub use resolvers::{ClientMethod, DataClient, Operation, ResolveInfo, ResolverContext, Resolvers};
pub use session::{GenerationSession, Schema};
pub use settings::{Settings, SettingsInput, change_settings, runtime_settings, runtime_settings_over};

/// Synthesize and freeze the type graph of a document
///
/// Fails without partial output when a model has no resolvable identity
/// or a field uses an unknown scalar.
pub fn generate_schema(
    document: &Document,
    settings: &Settings,
) -> Result<Arc<Schema>, GeneratorError> {
    let mut session = GenerationSession::new(document, settings);
    let configs = synth::synthesize(&mut session)?;
    let schema = session.finish(configs);

    tracing::info!(
        models = schema.configs.models.len(),
        enums = schema.configs.enums.len(),
        types = schema.registry.len(),
        aliases = !schema.aliases.is_empty(),
        "generated schema"
    );
    Ok(schema)
}

/// Generate every module for a document
pub fn generate(document: &Document, settings: &Settings) -> Result<Vec<ModuleSpec>, GeneratorError> {
    let schema = generate_schema(document, settings)?;
    emit::emit_modules(&schema)
}
