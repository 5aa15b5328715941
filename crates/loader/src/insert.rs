//! Writing planned documents into the IR.

use crate::plan::{DocumentPlan, PreparedDocument};
use crate::LoadSummary;
use apollo_compiler::ast;
use apollo_compiler::Node;
use houdini_ir::{DocumentKind, Result, SelectionKind, SqlContext};
use houdini_syntax::split_type;
use houdini_types::Position;
use rusqlite::{params, OptionalExtension, Transaction};

/// Which table pair a directive instance belongs to
#[derive(Debug, Clone, Copy)]
enum DirectiveHost {
    Selection,
    Document,
    Variable,
}

impl DirectiveHost {
    /// Statements inserting the instance and one of its arguments
    const fn statements(self) -> (&'static str, &'static str) {
        match self {
            Self::Selection => (
                "INSERT INTO selection_directives (selection_id, directive, row, column) VALUES (?1, ?2, ?3, ?4)",
                "INSERT INTO selection_directive_arguments (parent, name, value) VALUES (?1, ?2, ?3)",
            ),
            Self::Document => (
                "INSERT INTO document_directives (document, directive, row, column) VALUES (?1, ?2, ?3, ?4)",
                "INSERT INTO document_directive_arguments (parent, name, value) VALUES (?1, ?2, ?3)",
            ),
            Self::Variable => (
                "INSERT INTO operation_variable_directives (parent, directive, row, column) VALUES (?1, ?2, ?3, ?4)",
                "INSERT INTO operation_variable_directive_arguments (parent, name, value) VALUES (?1, ?2, ?3)",
            ),
        }
    }
}

/// Insert every planned definition of a prepared document
pub(crate) fn insert_document(
    tx: &Transaction<'_>,
    prepared: &PreparedDocument,
) -> Result<LoadSummary> {
    let mut summary = LoadSummary::default();
    for plan in &prepared.plans {
        let mut writer = DocumentWriter {
            tx,
            prepared,
            document: 0,
            selections: 0,
        };
        writer.insert(plan)?;
        summary.documents += 1;
        summary.selections += writer.selections;
    }
    Ok(summary)
}

struct DocumentWriter<'a, 'conn> {
    tx: &'a Transaction<'conn>,
    prepared: &'a PreparedDocument,
    document: i64,
    selections: usize,
}

impl DocumentWriter<'_, '_> {
    fn insert(&mut self, plan: &DocumentPlan) -> Result<()> {
        const SQL: &str = "INSERT INTO documents (name, raw_document, kind, type_condition, row, column) VALUES (?1, ?2, ?3, ?4, ?5, ?6)";

        let root = match &plan.type_condition {
            Some(condition) => self.known_type(condition)?,
            None => Some(self.root_type(plan.kind)?),
        };

        let position = self.host_position(plan.position);
        self.document = self
            .tx
            .prepare_cached(SQL)
            .and_then(|mut stmt| {
                stmt.insert(params![
                    plan.name,
                    self.prepared.raw.id,
                    plan.kind,
                    plan.type_condition,
                    position.line,
                    position.column
                ])
            })
            .sql_context("could not insert document", SQL)?;
        tracing::trace!(document = self.document, name = %plan.name, "Inserted document");

        for variable in &plan.variables {
            self.insert_variable(variable)?;
        }
        for (index, selection) in plan.selection_set.iter().enumerate() {
            self.insert_selection(None, root.as_deref(), selection, index)?;
        }
        self.insert_directives(DirectiveHost::Document, self.document, &plan.directives)
    }

    fn insert_variable(&mut self, variable: &Node<ast::VariableDefinition>) -> Result<()> {
        const SQL: &str = "INSERT INTO operation_variables (document, name, type, type_modifiers, default_value, row, column) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)";

        let (base, modifiers) = split_type(&variable.ty);
        let position = self.position_of(variable);
        let id = self
            .tx
            .prepare_cached(SQL)
            .and_then(|mut stmt| {
                stmt.insert(params![
                    self.document,
                    variable.name.as_str(),
                    base,
                    modifiers.as_str(),
                    variable.default_value.as_ref().map(ToString::to_string),
                    position.line,
                    position.column
                ])
            })
            .sql_context("could not insert operation variable", SQL)?;

        self.insert_directives(DirectiveHost::Variable, id, &variable.directives)
    }

    /// Insert a selection, the ref to its parent, then its arguments,
    /// directives and children. `parent_type` is `None` when the enclosing
    /// type could not be resolved.
    fn insert_selection(
        &mut self,
        parent: Option<i64>,
        parent_type: Option<&str>,
        selection: &ast::Selection,
        index: usize,
    ) -> Result<()> {
        match selection {
            ast::Selection::Field(field) => {
                let type_id = parent_type.map(|parent| format!("{parent}.{}", field.name));
                let id = self.insert_row(
                    field.name.as_str(),
                    field.alias.as_ref().map(apollo_compiler::Name::as_str),
                    index,
                    SelectionKind::Field,
                    type_id.as_deref(),
                )?;
                self.insert_ref(parent, id, self.position_of(field))?;

                for argument in &field.arguments {
                    self.insert_argument(id, argument)?;
                }
                self.insert_directives(DirectiveHost::Selection, id, &field.directives)?;

                let field_type = match &type_id {
                    Some(type_id) => self.field_type(type_id)?,
                    None => None,
                };
                for (index, child) in field.selection_set.iter().enumerate() {
                    self.insert_selection(Some(id), field_type.as_deref(), child, index)?;
                }
            }
            ast::Selection::InlineFragment(fragment) => {
                let name = fragment
                    .type_condition
                    .as_ref()
                    .map_or("inline_fragment", apollo_compiler::Name::as_str);
                let id = self.insert_row(name, None, index, SelectionKind::InlineFragment, None)?;
                self.insert_ref(parent, id, self.position_of(fragment))?;

                let inner_type = match &fragment.type_condition {
                    Some(condition) => self.known_type(condition)?,
                    None => parent_type.map(str::to_string),
                };
                for (index, child) in fragment.selection_set.iter().enumerate() {
                    self.insert_selection(Some(id), inner_type.as_deref(), child, index)?;
                }
                self.insert_directives(DirectiveHost::Selection, id, &fragment.directives)?;
            }
            ast::Selection::FragmentSpread(spread) => {
                let id = self.insert_row(
                    spread.fragment_name.as_str(),
                    None,
                    index,
                    SelectionKind::Fragment,
                    None,
                )?;
                self.insert_ref(parent, id, self.position_of(spread))?;
                self.insert_directives(DirectiveHost::Selection, id, &spread.directives)?;
            }
        }
        Ok(())
    }

    fn insert_row(
        &mut self,
        field_name: &str,
        alias: Option<&str>,
        index: usize,
        kind: SelectionKind,
        type_id: Option<&str>,
    ) -> Result<i64> {
        const SQL: &str = "INSERT INTO selections (field_name, alias, path_index, kind, type) VALUES (?1, ?2, ?3, ?4, ?5)";
        let id = self
            .tx
            .prepare_cached(SQL)
            .and_then(|mut stmt| stmt.insert(params![field_name, alias, index, kind, type_id]))
            .sql_context("could not insert selection", SQL)?;
        self.selections += 1;
        Ok(id)
    }

    fn insert_ref(&self, parent: Option<i64>, child: i64, position: Position) -> Result<()> {
        const SQL: &str = "INSERT INTO selection_refs (parent_id, child_id, document, row, column) VALUES (?1, ?2, ?3, ?4, ?5)";
        self.tx
            .prepare_cached(SQL)
            .and_then(|mut stmt| {
                stmt.execute(params![
                    parent,
                    child,
                    self.document,
                    position.line,
                    position.column
                ])
            })
            .sql_context("could not insert selection ref", SQL)?;
        Ok(())
    }

    fn insert_argument(&self, selection: i64, argument: &Node<ast::Argument>) -> Result<()> {
        const SQL: &str = "INSERT INTO selection_arguments (selection_id, name, value, row, column, document) VALUES (?1, ?2, ?3, ?4, ?5, ?6)";
        let position = self.position_of(argument);
        self.tx
            .prepare_cached(SQL)
            .and_then(|mut stmt| {
                stmt.execute(params![
                    selection,
                    argument.name.as_str(),
                    argument.value.to_string(),
                    position.line,
                    position.column,
                    self.document
                ])
            })
            .sql_context("could not insert selection argument", SQL)?;
        Ok(())
    }

    fn insert_directives(
        &self,
        host: DirectiveHost,
        host_id: i64,
        directives: &ast::DirectiveList,
    ) -> Result<()> {
        let (instance_sql, argument_sql) = host.statements();
        for directive in directives.iter() {
            let position = self.position_of(directive);
            let id = self
                .tx
                .prepare_cached(instance_sql)
                .and_then(|mut stmt| {
                    stmt.insert(params![
                        host_id,
                        directive.name.as_str(),
                        position.line,
                        position.column
                    ])
                })
                .sql_context("could not insert directive", instance_sql)?;

            for argument in &directive.arguments {
                self.tx
                    .prepare_cached(argument_sql)
                    .and_then(|mut stmt| {
                        stmt.execute(params![id, argument.name.as_str(), argument.value.to_string()])
                    })
                    .sql_context("could not insert directive argument", argument_sql)?;
            }
        }
        Ok(())
    }

    /// Named type of a schema field, by `Parent.field` id
    fn field_type(&self, type_id: &str) -> Result<Option<String>> {
        const SQL: &str = "SELECT type FROM type_fields WHERE id = ?1";
        self.tx
            .prepare_cached(SQL)
            .and_then(|mut stmt| stmt.query_row(params![type_id], |row| row.get(0)).optional())
            .sql_context("could not look up field type", SQL)
    }

    fn known_type(&self, name: &str) -> Result<Option<String>> {
        const SQL: &str = "SELECT name FROM types WHERE name = ?1";
        self.tx
            .prepare_cached(SQL)
            .and_then(|mut stmt| stmt.query_row(params![name], |row| row.get(0)).optional())
            .sql_context("could not look up type", SQL)
    }

    /// Root type of an operation; falls back to the conventional name so a
    /// missing root still produces resolvable-looking field ids.
    fn root_type(&self, kind: DocumentKind) -> Result<String> {
        const SQL: &str = "SELECT type FROM operation_types WHERE operation = ?1";
        let root: Option<String> = self
            .tx
            .prepare_cached(SQL)
            .and_then(|mut stmt| stmt.query_row(params![kind], |row| row.get(0)).optional())
            .sql_context("could not look up root type", SQL)?;
        Ok(root.unwrap_or_else(|| match kind {
            DocumentKind::Mutation => "Mutation".to_string(),
            DocumentKind::Subscription => "Subscription".to_string(),
            DocumentKind::Query | DocumentKind::Fragment => "Query".to_string(),
        }))
    }

    fn position_of<T>(&self, node: &Node<T>) -> Position {
        self.host_position(self.prepared.parsed.position_of(node))
    }

    fn host_position(&self, position: Position) -> Position {
        self.prepared.raw.offset.apply(position)
    }
}
