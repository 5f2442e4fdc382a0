//! Runtime module rendering (ESM and CommonJS)

use serde_json::json;

use super::{GENERATED_BANNER, ModuleFlavor, RUNTIME_IMPORT, Writer, string_literal};
use crate::error::GeneratorError;
use crate::schema::{EnumTypeDef, InputObjectDef, TypeRef};
use crate::session::Schema;
use crate::synth::{ConfigEntry, FieldConfig, MetadataConfig, ObjectTypeConfig, ResolverSpec};

/// Local binding of the runtime helper package
const RUNTIME: &str = "$runtime";

/// Local binding of the schema handle resolvers are created from
const SCHEMA: &str = "$schema";

/// Render the runtime module in one flavor
pub fn render_runtime(schema: &Schema, flavor: ModuleFlavor) -> Result<String, GeneratorError> {
    let mut w = Writer::new();
    w.line(GENERATED_BANNER);
    match flavor {
        ModuleFlavor::Esm => {
            w.line(format!("import * as {RUNTIME} from {}", string_literal(RUNTIME_IMPORT)));
        }
        ModuleFlavor::Cjs => {
            w.line("\"use strict\"");
            w.blank();
            w.line(format!("const {RUNTIME} = require({})", string_literal(RUNTIME_IMPORT)));
        }
    }
    w.blank();

    let handle = json!({
        "settings": schema.settings.runtime,
        "identifiers": schema.identifiers,
        "aliases": schema.aliases,
    });
    w.line(format!(
        "const {SCHEMA} = {RUNTIME}.createSchema({})",
        serde_json::to_string(&handle)?
    ));
    w.blank();
    w.line(format!("{} {RUNTIME}.changeSettings", export(flavor, "$settings")));

    for config in schema.configs.enums.values() {
        w.blank();
        write_enum(&mut w, flavor, &config.to_enum_def());
    }
    for def in schema.registry.enums() {
        w.blank();
        write_enum(&mut w, flavor, def);
    }
    for object in schema.configs.objects() {
        w.blank();
        write_object(&mut w, flavor, object);
    }
    for input in schema.registry.inputs() {
        w.blank();
        write_input(&mut w, flavor, input);
    }

    Ok(w.finish())
}

/// Left-hand side of an exported binding
fn export(flavor: ModuleFlavor, name: &str) -> String {
    match flavor {
        ModuleFlavor::Esm => format!("export const {name} ="),
        ModuleFlavor::Cjs => format!("exports.{name} ="),
    }
}

/// Runtime expression of a type reference
pub(crate) fn type_expression(ty: &TypeRef) -> String {
    match ty {
        TypeRef::Named(name) => string_literal(name),
        TypeRef::List(inner) => format!("{RUNTIME}.list({})", type_expression(inner)),
        TypeRef::NonNull(inner) => format!("{RUNTIME}.nonNull({})", type_expression(inner)),
    }
}

fn description_expression(description: Option<&str>) -> String {
    description.map_or_else(|| "undefined".to_string(), string_literal)
}

fn resolver_expression(resolve: Option<&ResolverSpec>) -> String {
    let Some(spec) = resolve else {
        return "undefined".to_string();
    };
    match spec {
        ResolverSpec::RelationUnique { model, field } => format!(
            "{SCHEMA}.relationUnique({}, {})",
            string_literal(model),
            string_literal(field)
        ),
        ResolverSpec::RelationList {
            model,
            field,
            target,
        } => format!(
            "{SCHEMA}.relationList({}, {}, {})",
            string_literal(model),
            string_literal(field),
            string_literal(target)
        ),
        ResolverSpec::FindUnique { model } => {
            format!("{SCHEMA}.findUnique({})", string_literal(model))
        }
        ResolverSpec::FindMany { model } => {
            format!("{SCHEMA}.findMany({})", string_literal(model))
        }
    }
}

fn write_object(w: &mut Writer, flavor: ModuleFlavor, object: &ObjectTypeConfig) {
    w.open(format!("{} {{", export(flavor, object.name())));
    for (key, entry) in &object.entries {
        match entry {
            ConfigEntry::Metadata(MetadataConfig::Name(name)) => {
                w.line(format!("{key}: {},", string_literal(name)));
            }
            ConfigEntry::Metadata(MetadataConfig::Description(description)) => {
                w.line(format!("{key}: {},", description_expression(description.as_deref())));
            }
            ConfigEntry::Field(field) => write_field(w, field),
        }
    }
    w.close("}");
}

fn write_field(w: &mut Writer, field: &FieldConfig) {
    w.open(format!("{}: {{", field.name));
    w.line(format!("name: {},", string_literal(&field.name)));
    w.line(format!("type: {},", type_expression(&field.ty)));
    w.line(format!(
        "description: {},",
        description_expression(field.description.as_deref())
    ));
    if !field.args.is_empty() {
        w.open("args: {");
        for (name, ty) in &field.args {
            w.line(format!("{name}: {},", type_expression(ty)));
        }
        w.close("},");
    }
    w.line(format!("resolve: {},", resolver_expression(field.resolve.as_ref())));
    w.close("},");
}

fn write_enum(w: &mut Writer, flavor: ModuleFlavor, def: &EnumTypeDef) {
    w.open(format!("{} {{", export(flavor, &def.name)));
    w.line(format!("name: {},", string_literal(&def.name)));
    w.line(format!(
        "description: {},",
        description_expression(def.description.as_deref())
    ));
    let members: Vec<String> = def.members.iter().map(|m| string_literal(m)).collect();
    w.line(format!("members: [{}],", members.join(", ")));
    w.close("}");
}

fn write_input(w: &mut Writer, flavor: ModuleFlavor, def: &InputObjectDef) {
    w.open(format!("{} {{", export(flavor, &def.name)));
    w.line(format!("name: {},", string_literal(&def.name)));
    w.line(format!(
        "description: {},",
        description_expression(def.description.as_deref())
    ));
    w.open("definition: {");
    for field in def.fields.values() {
        w.line(format!("{}: {},", field.name, type_expression(&field.ty)));
    }
    w.close("},");
    w.close("}");
}
