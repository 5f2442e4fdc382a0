//! Module emission
//!
//! Renders a frozen [`Schema`] into the generated modules:
//! - `index.js`: CommonJS runtime module
//! - `index.mjs`: ES runtime module
//! - `index.d.ts`: declarations for both
//!
//! All three read the same schema, so names, types and nullability agree
//! between what runs and what type-checks.

mod declaration;
mod runtime;

use serde::Serialize;

use crate::error::GeneratorError;
use crate::session::Schema;

pub use declaration::render_declaration;
pub use runtime::render_runtime;

/// CommonJS runtime module file name
pub const CJS_FILE: &str = "index.js";

/// ES runtime module file name
pub const ESM_FILE: &str = "index.mjs";

/// Declaration module file name
pub const DECLARATION_FILE: &str = "index.d.ts";

/// Package the runtime modules import their helpers from
pub const RUNTIME_IMPORT: &str = "nexus-prisma/runtime";

/// First line of every generated module
pub const GENERATED_BANNER: &str = "// Generated by nexus-prisma. Do not edit.";

/// A generated module
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ModuleSpec {
    /// File name relative to the output directory
    pub file_name: String,
    /// Module source
    pub content: String,
}

impl ModuleSpec {
    fn new(file_name: &str, content: String) -> Self {
        Self {
            file_name: file_name.to_string(),
            content,
        }
    }
}

/// Runtime module flavor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModuleFlavor {
    /// `import`/`export`
    Esm,
    /// `require`/`exports`
    Cjs,
}

/// Render every module the settings ask for
///
/// The declaration module is always emitted.
pub fn emit_modules(schema: &Schema) -> Result<Vec<ModuleSpec>, GeneratorError> {
    let output = schema.settings.output;
    let mut modules = Vec::with_capacity(3);

    if output.cjs {
        modules.push(ModuleSpec::new(CJS_FILE, render_runtime(schema, ModuleFlavor::Cjs)?));
    }
    if output.esm {
        modules.push(ModuleSpec::new(ESM_FILE, render_runtime(schema, ModuleFlavor::Esm)?));
    }
    modules.push(ModuleSpec::new(DECLARATION_FILE, render_declaration(schema)));

    tracing::debug!(
        modules = ?modules.iter().map(|m| m.file_name.as_str()).collect::<Vec<_>>(),
        "emitted modules"
    );
    Ok(modules)
}

/// JS/TS string literal
pub(crate) fn string_literal(text: &str) -> String {
    serde_json::Value::String(text.to_string()).to_string()
}

/// Line-oriented source builder with two-space indentation
#[derive(Debug, Default)]
pub(crate) struct Writer {
    out: String,
    depth: usize,
}

impl Writer {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Append one line at the current depth
    pub(crate) fn line(&mut self, text: impl AsRef<str>) {
        let text = text.as_ref();
        if !text.is_empty() {
            for _ in 0..self.depth {
                self.out.push_str("  ");
            }
            self.out.push_str(text);
        }
        self.out.push('\n');
    }

    pub(crate) fn blank(&mut self) {
        self.out.push('\n');
    }

    /// Append `open`, then indent until the matching [`Writer::close`]
    pub(crate) fn open(&mut self, open: impl AsRef<str>) {
        self.line(open);
        self.depth += 1;
    }

    pub(crate) fn close(&mut self, close: impl AsRef<str>) {
        self.depth = self.depth.saturating_sub(1);
        self.line(close);
    }

    pub(crate) fn finish(self) -> String {
        self.out
    }
}
