use crate::framework::insert_framework_definitions;
use crate::SchemaError;
use apollo_compiler::ast;
use apollo_compiler::schema::{ExtendedType, FieldDefinition, InputValueDefinition};
use apollo_compiler::{Node, Schema};
use houdini_config::ProjectConfig;
use houdini_ir::{IrStore, Result as IrResult, SqlContext, TypeKind};
use houdini_syntax::split_type;
use rusqlite::{params, Transaction};
use std::collections::BTreeSet;

/// Counts of what an import wrote
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SchemaSummary {
    pub types: usize,
    pub fields: usize,
    pub directives: usize,
}

/// Read the schema file named by the project config and import it
#[tracing::instrument(skip(store, config), fields(path = %config.resolved_schema_path().display()))]
pub fn import_schema_file(
    store: &IrStore,
    config: &ProjectConfig,
) -> Result<SchemaSummary, SchemaError> {
    let path = config.resolved_schema_path();
    let source = std::fs::read_to_string(&path).map_err(|source| SchemaError::Io {
        path: path.clone(),
        source,
    })?;
    import_schema(store, &source, &path.display().to_string())
}

/// Parse and validate a schema, then write its types, fields, arguments,
/// possible types and directives into the IR in one transaction.
///
/// The framework's own scalar and directives are added afterwards.
#[tracing::instrument(skip(store, source), fields(size = source.len()))]
pub fn import_schema(
    store: &IrStore,
    source: &str,
    path: &str,
) -> Result<SchemaSummary, SchemaError> {
    let schema = Schema::parse_and_validate(source, path)
        .map_err(|with_errors| SchemaError::Invalid(with_errors.errors.to_string()))?;

    let mut conn = store.get()?;
    let summary = store.write(&mut conn, |tx| -> Result<SchemaSummary, SchemaError> {
        let summary = write_schema(tx, &schema)?;
        insert_framework_definitions(tx)?;
        Ok(summary)
    })?;

    tracing::debug!(
        types = summary.types,
        fields = summary.fields,
        directives = summary.directives,
        "Schema imported"
    );
    Ok(summary)
}

fn write_schema(tx: &Transaction<'_>, schema: &Schema) -> IrResult<SchemaSummary> {
    let mut writer = SchemaWriter {
        tx,
        summary: SchemaSummary::default(),
    };
    // interface -> implementing objects
    let mut implementations: BTreeSet<(String, String)> = BTreeSet::new();

    for (name, ty) in &schema.types {
        let name = name.as_str();
        let kind = match ty {
            ExtendedType::Scalar(_) => TypeKind::Scalar,
            ExtendedType::Object(_) => TypeKind::Object,
            ExtendedType::Interface(_) => TypeKind::Interface,
            ExtendedType::Union(_) => TypeKind::Union,
            ExtendedType::Enum(_) => TypeKind::Enum,
            ExtendedType::InputObject(_) => TypeKind::Input,
        };
        writer.insert_type(name, kind, describe(ty))?;

        match ty {
            ExtendedType::Scalar(_) => {}
            ExtendedType::Object(object) => {
                for field in object.fields.values() {
                    writer.insert_field(name, field)?;
                }
                for interface in &object.implements_interfaces {
                    implementations.insert((interface.name.to_string(), name.to_string()));
                }
                writer.insert_typename(name)?;
            }
            ExtendedType::Interface(interface) => {
                for field in interface.fields.values() {
                    writer.insert_field(name, field)?;
                }
                writer.insert_typename(name)?;
            }
            ExtendedType::Union(union_) => {
                for member in &union_.members {
                    writer.insert_possible_type(name, member.name.as_str())?;
                }
                writer.insert_typename(name)?;
            }
            ExtendedType::Enum(enum_) => {
                for value in enum_.values.values() {
                    writer.insert_enum_value(
                        name,
                        value.value.as_str(),
                        value.description.as_deref(),
                    )?;
                }
            }
            ExtendedType::InputObject(input) => {
                for field in input.fields.values() {
                    writer.insert_input_field(name, field)?;
                }
            }
        }
    }

    for (interface, object) in &implementations {
        writer.insert_possible_type(interface, object)?;
    }

    for directive in schema.directive_definitions.values() {
        writer.insert_directive(directive)?;
    }

    let roots = [
        ("query", &schema.schema_definition.query),
        ("mutation", &schema.schema_definition.mutation),
        ("subscription", &schema.schema_definition.subscription),
    ];
    for (operation, root) in roots {
        if let Some(root) = root {
            writer.insert_operation_type(operation, root.name.as_str())?;
        }
    }

    Ok(writer.summary)
}

fn describe(ty: &ExtendedType) -> Option<&str> {
    match ty {
        ExtendedType::Scalar(t) => t.description.as_deref(),
        ExtendedType::Object(t) => t.description.as_deref(),
        ExtendedType::Interface(t) => t.description.as_deref(),
        ExtendedType::Union(t) => t.description.as_deref(),
        ExtendedType::Enum(t) => t.description.as_deref(),
        ExtendedType::InputObject(t) => t.description.as_deref(),
    }
}

fn print_default(value: Option<&Node<ast::Value>>) -> Option<String> {
    value.map(ToString::to_string)
}

struct SchemaWriter<'a, 'conn> {
    tx: &'a Transaction<'conn>,
    summary: SchemaSummary,
}

impl SchemaWriter<'_, '_> {
    fn insert_type(&mut self, name: &str, kind: TypeKind, description: Option<&str>) -> IrResult<()> {
        const SQL: &str =
            "INSERT INTO types (name, kind, description, internal) VALUES (?1, ?2, ?3, ?4)";
        self.tx
            .prepare_cached(SQL)
            .and_then(|mut stmt| stmt.execute(params![name, kind, description, name.starts_with("__")]))
            .sql_context("could not insert type", SQL)?;
        self.summary.types += 1;
        Ok(())
    }

    fn insert_field(&mut self, parent: &str, field: &FieldDefinition) -> IrResult<()> {
        const SQL: &str = "INSERT INTO type_fields (id, parent, name, type, type_modifiers, description) VALUES (?1, ?2, ?3, ?4, ?5, ?6)";
        let id = format!("{parent}.{}", field.name);
        let (base, modifiers) = split_type(&field.ty);
        self.tx
            .prepare_cached(SQL)
            .and_then(|mut stmt| {
                stmt.execute(params![
                    id,
                    parent,
                    field.name.as_str(),
                    base,
                    modifiers.as_str(),
                    field.description.as_deref()
                ])
            })
            .sql_context("could not insert field", SQL)?;
        self.summary.fields += 1;

        for argument in &field.arguments {
            self.insert_field_argument(&id, argument)?;
        }
        Ok(())
    }

    fn insert_field_argument(&mut self, field: &str, argument: &InputValueDefinition) -> IrResult<()> {
        const SQL: &str = "INSERT INTO field_argument_definitions (id, field, name, type, type_modifiers, default_value) VALUES (?1, ?2, ?3, ?4, ?5, ?6)";
        let (base, modifiers) = split_type(&argument.ty);
        self.tx
            .prepare_cached(SQL)
            .and_then(|mut stmt| {
                stmt.execute(params![
                    format!("{field}.{}", argument.name),
                    field,
                    argument.name.as_str(),
                    base,
                    modifiers.as_str(),
                    print_default(argument.default_value.as_ref())
                ])
            })
            .sql_context("could not insert field argument", SQL)?;
        Ok(())
    }

    fn insert_input_field(&mut self, parent: &str, field: &InputValueDefinition) -> IrResult<()> {
        const SQL: &str = "INSERT INTO type_fields (id, parent, name, type, type_modifiers, default_value, description) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)";
        let (base, modifiers) = split_type(&field.ty);
        self.tx
            .prepare_cached(SQL)
            .and_then(|mut stmt| {
                stmt.execute(params![
                    format!("{parent}.{}", field.name),
                    parent,
                    field.name.as_str(),
                    base,
                    modifiers.as_str(),
                    print_default(field.default_value.as_ref()),
                    field.description.as_deref()
                ])
            })
            .sql_context("could not insert input field", SQL)?;
        self.summary.fields += 1;
        Ok(())
    }

    /// `__typename` is selectable on every composite type
    fn insert_typename(&mut self, parent: &str) -> IrResult<()> {
        const SQL: &str = "INSERT OR IGNORE INTO type_fields (id, parent, name, type, type_modifiers, internal) VALUES (?1, ?2, '__typename', 'String', '!', 1)";
        self.tx
            .prepare_cached(SQL)
            .and_then(|mut stmt| stmt.execute(params![format!("{parent}.__typename"), parent]))
            .sql_context("could not insert __typename", SQL)?;
        Ok(())
    }

    fn insert_possible_type(&mut self, abstract_type: &str, member: &str) -> IrResult<()> {
        const SQL: &str = "INSERT OR IGNORE INTO possible_types (type, member) VALUES (?1, ?2)";
        self.tx
            .prepare_cached(SQL)
            .and_then(|mut stmt| stmt.execute(params![abstract_type, member]))
            .sql_context("could not insert possible type", SQL)?;
        Ok(())
    }

    fn insert_enum_value(&mut self, parent: &str, value: &str, description: Option<&str>) -> IrResult<()> {
        const SQL: &str = "INSERT INTO enum_values (parent, value, description) VALUES (?1, ?2, ?3)";
        self.tx
            .prepare_cached(SQL)
            .and_then(|mut stmt| stmt.execute(params![parent, value, description]))
            .sql_context("could not insert enum value", SQL)?;
        Ok(())
    }

    fn insert_directive(&mut self, directive: &ast::DirectiveDefinition) -> IrResult<()> {
        const DIRECTIVE: &str = "INSERT INTO directives (name, repeatable, internal, visible, description) VALUES (?1, ?2, 0, ?3, ?4)";
        const ARGUMENT: &str = "INSERT INTO directive_arguments (parent, name, type, type_modifiers, default_value) VALUES (?1, ?2, ?3, ?4, ?5)";
        const LOCATION: &str =
            "INSERT OR IGNORE INTO directive_locations (directive, location) VALUES (?1, ?2)";

        let name = directive.name.as_str();
        self.tx
            .prepare_cached(DIRECTIVE)
            .and_then(|mut stmt| {
                stmt.execute(params![
                    name,
                    directive.repeatable,
                    !name.starts_with("__"),
                    directive.description.as_deref()
                ])
            })
            .sql_context("could not insert directive", DIRECTIVE)?;

        for argument in &directive.arguments {
            let (base, modifiers) = split_type(&argument.ty);
            self.tx
                .prepare_cached(ARGUMENT)
                .and_then(|mut stmt| {
                    stmt.execute(params![
                        name,
                        argument.name.as_str(),
                        base,
                        modifiers.as_str(),
                        print_default(argument.default_value.as_ref())
                    ])
                })
                .sql_context("could not insert directive argument", ARGUMENT)?;
        }

        for location in &directive.locations {
            self.tx
                .prepare_cached(LOCATION)
                .and_then(|mut stmt| stmt.execute(params![name, location.name()]))
                .sql_context("could not insert directive location", LOCATION)?;
        }

        self.summary.directives += 1;
        Ok(())
    }

    fn insert_operation_type(&mut self, operation: &str, type_name: &str) -> IrResult<()> {
        const SQL: &str = "INSERT INTO operation_types (operation, type) VALUES (?1, ?2)";
        self.tx
            .prepare_cached(SQL)
            .and_then(|mut stmt| stmt.execute(params![operation, type_name]))
            .sql_context("could not insert operation type", SQL)?;
        Ok(())
    }
}
