//! Declaration module rendering (`index.d.ts`)
//!
//! Every exported runtime binding gets a matching declaration. Field types
//! are guarded by a conditional type so that a reference to a type the
//! consumer never defined surfaces as a readable message instead of a
//! silent `any`.

use super::{GENERATED_BANNER, Writer, string_literal};
use crate::schema::{EnumTypeDef, InputObjectDef, TypeRef};
use crate::session::Schema;
use crate::settings::{JsDocDefault, Settings};
use crate::synth::{ConfigEntry, FieldConfig, MetadataConfig, ObjectKind, ObjectTypeConfig};

/// Module the declarations import framework types from
const CORE_IMPORT: &str = "nexus/dist/core";

/// Render the declaration module
pub fn render_declaration(schema: &Schema) -> String {
    let settings = &schema.settings;
    let mut w = Writer::new();
    w.line(GENERATED_BANNER);
    w.line(format!("import type * as NexusCore from {}", string_literal(CORE_IMPORT)));
    w.blank();
    write_settings(&mut w);

    for config in schema.configs.enums.values() {
        w.blank();
        let doc = doc_lines(settings, config.documentation.as_deref(), || {
            enum_guide(&config.name)
        });
        write_enum(&mut w, &config.to_enum_def(), &doc);
    }
    for def in schema.registry.enums() {
        w.blank();
        write_enum(&mut w, def, &[]);
    }
    for object in schema.configs.objects() {
        w.blank();
        write_object(&mut w, settings, object);
    }
    for input in schema.registry.inputs() {
        w.blank();
        write_input(&mut w, input);
    }

    w.finish()
}

fn write_settings(w: &mut Writer) {
    w.open("export interface Settings {");
    w.line("prismaClientContextField?: string");
    w.line("prismaClientImportId?: string");
    w.open("checks?: {");
    w.open("PrismaClientOnContext?: {");
    w.line("enabled?: boolean");
    w.line("strategy?: 'strict' | 'structural' | 'strictWithFallback' | 'instanceOf' | 'duckType'");
    w.close("}");
    w.close("}");
    w.close("}");
    w.blank();
    w.line("export declare const $settings: (settings: Settings) => void");
}

/// Declaration type of a type reference, wrappers included
fn type_declaration(ty: &TypeRef) -> String {
    match ty {
        TypeRef::Named(name) => format!("'{name}'"),
        TypeRef::List(inner) => format!("NexusCore.NexusListDef<{}>", type_declaration(inner)),
        TypeRef::NonNull(inner) => {
            format!("NexusCore.NexusNonNullDef<{}>", type_declaration(inner))
        }
    }
}

/// `type` member of a field declaration, guarded on the named type
fn guarded_type(ty: &TypeRef) -> [String; 3] {
    let name = ty.named_type();
    [
        format!("'{name}' extends NexusCore.GetGen<'allNamedTypes', string>"),
        format!("  ? {}", type_declaration(ty)),
        format!(
            "  : 'Warning/Error: The type \\'{name}\\' is not among the union of GetGen<\\'allNamedTypes\\', string>. This means that either: 1) You need to run nexus typegen reflection. 2) You need to add the type \\'{name}\\' to your GraphQL API.'"
        ),
    ]
}

fn description_type(description: Option<&str>) -> String {
    description.map_or_else(|| "undefined".to_string(), string_literal)
}

fn write_doc(w: &mut Writer, lines: &[String]) {
    if lines.is_empty() {
        return;
    }
    w.line("/**");
    for line in lines {
        if line.is_empty() {
            w.line(" *");
        } else {
            w.line(format!(" * {}", line.replace("*/", "*\\/")));
        }
    }
    w.line(" */");
}

/// Declaration comment lines for a documented or undocumented item
fn doc_lines(
    settings: &Settings,
    documentation: Option<&str>,
    guide: impl FnOnce() -> Vec<String>,
) -> Vec<String> {
    if !settings.doc_propagation.js_doc {
        return Vec::new();
    }
    match (documentation, settings.jsdoc_propagation_default) {
        (Some(doc), _) => doc.lines().map(str::to_string).collect(),
        (None, JsDocDefault::Guide) => guide(),
        (None, JsDocDefault::None) => Vec::new(),
    }
}

fn model_guide(model: &str) -> Vec<String> {
    vec![
        format!("Missing documentation for model `{model}`."),
        String::new(),
        "Add a triple-slash comment above the model in your Prisma schema".to_string(),
        "and it will appear here. For example:".to_string(),
        String::new(),
        "```prisma".to_string(),
        "/// Lorem ipsum dolor sit amet...".to_string(),
        format!("model {model} {{"),
        "  foo  String".to_string(),
        "}".to_string(),
        "```".to_string(),
    ]
}

fn field_guide(model: &str, field: &str) -> Vec<String> {
    vec![
        format!("Missing documentation for field `{model}.{field}`."),
        String::new(),
        "Add a triple-slash comment above the field in your Prisma schema".to_string(),
        "and it will appear here. For example:".to_string(),
        String::new(),
        "```prisma".to_string(),
        format!("model {model} {{"),
        "  /// Lorem ipsum dolor sit amet.".to_string(),
        format!("  {field}  String"),
        "}".to_string(),
        "```".to_string(),
    ]
}

fn enum_guide(name: &str) -> Vec<String> {
    vec![
        format!("Missing documentation for enum `{name}`."),
        String::new(),
        "Add a triple-slash comment above the enum in your Prisma schema".to_string(),
        "and it will appear here.".to_string(),
    ]
}

fn write_object(w: &mut Writer, settings: &Settings, object: &ObjectTypeConfig) {
    let name = object.name();
    if object.kind == ObjectKind::Model {
        let doc = doc_lines(settings, object.documentation.as_deref(), || model_guide(name));
        write_doc(w, &doc);
    }

    w.open(format!("export interface {name} {{"));
    for (key, entry) in &object.entries {
        match entry {
            ConfigEntry::Metadata(MetadataConfig::Name(value)) => {
                w.line(format!("{key}: {}", string_literal(value)));
            }
            ConfigEntry::Metadata(MetadataConfig::Description(description)) => {
                w.line(format!("{key}: {}", description_type(description.as_deref())));
            }
            ConfigEntry::Field(field) => {
                if object.kind == ObjectKind::Model {
                    let doc = doc_lines(settings, field.documentation.as_deref(), || {
                        field_guide(name, &field.name)
                    });
                    write_doc(w, &doc);
                }
                write_field(w, name, field);
            }
        }
    }
    w.close("}");
    w.blank();
    w.line(format!("export declare const {name}: {name}"));
}

fn write_field(w: &mut Writer, parent: &str, field: &FieldConfig) {
    w.open(format!("{}: {{", field.name));
    w.line(format!("name: {}", string_literal(&field.name)));
    let [condition, then, otherwise] = guarded_type(&field.ty);
    w.line(format!("type: {condition}"));
    w.line(format!("  {then}"));
    w.line(format!("  {otherwise}"));
    w.line(format!(
        "description: {}",
        description_type(field.description.as_deref())
    ));
    if !field.args.is_empty() {
        w.open("args: {");
        for (name, ty) in &field.args {
            w.line(format!("{name}: {}", type_declaration(ty)));
        }
        w.close("}");
    }
    let resolver = format!("NexusCore.FieldResolver<'{parent}', '{}'>", field.name);
    if field.resolve.is_some() {
        w.line(format!("resolve: {resolver}"));
    } else {
        w.line("resolve: undefined");
    }
    w.close("}");
}

fn write_enum(w: &mut Writer, def: &EnumTypeDef, doc: &[String]) {
    write_doc(w, doc);
    w.open(format!("export interface {} {{", def.name));
    w.line(format!("name: {}", string_literal(&def.name)));
    w.line(format!("description: {}", description_type(def.description.as_deref())));
    let members: Vec<String> = def.members.iter().map(|m| string_literal(m)).collect();
    w.line(format!("members: [{}]", members.join(", ")));
    w.close("}");
    w.blank();
    w.line(format!("export declare const {name}: {name}", name = def.name));
}

fn write_input(w: &mut Writer, def: &InputObjectDef) {
    w.open(format!("export interface {} {{", def.name));
    w.line(format!("name: {}", string_literal(&def.name)));
    w.line(format!("description: {}", description_type(def.description.as_deref())));
    w.open("definition: {");
    for field in def.fields.values() {
        w.line(format!("{}: {}", field.name, type_declaration(&field.ty)));
    }
    w.close("}");
    w.close("}");
    w.blank();
    w.line(format!("export declare const {name}: {name}", name = def.name));
}
