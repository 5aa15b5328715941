//! Checking argument literals against the types they are passed to.

use super::variable_usage::modifiers_at;
use crate::query::{location_at, suggest, SchemaIndex};
use crate::RuleContext;
use apollo_compiler::ast;
use houdini_ir::{Result, TypeKind};
use houdini_syntax::parse_value;
use houdini_types::{Diagnostic, SourceLocation, TypeModifiers};

/// A field argument's printed value together with the argument's type
#[derive(Debug, Clone)]
pub(crate) struct ArgumentValue {
    pub argument: String,
    pub field: String,
    pub value: String,
    pub type_name: String,
    pub modifiers: TypeModifiers,
    pub location: SourceLocation,
}

/// Literal arguments of resolved fields. `structured` selects arguments
/// whose named type is an input object; otherwise scalars and enums.
pub(crate) fn argument_values(ctx: &RuleContext<'_>, structured: bool) -> Result<Vec<ArgumentValue>> {
    const SQL: &str = "
        SELECT arguments.name, selections.field_name, arguments.value,
               definitions.type, definitions.type_modifiers,
               raw.filepath, arguments.row, arguments.column
        FROM selection_arguments arguments
        JOIN selections ON selections.id = arguments.selection_id
        JOIN field_argument_definitions definitions
             ON definitions.field = selections.type AND definitions.name = arguments.name
        JOIN types ON types.name = definitions.type
        JOIN documents ON documents.id = arguments.document
        JOIN raw_documents raw ON raw.id = documents.raw_document
        WHERE arguments.value NOT LIKE '$%'
          AND (types.kind = 'INPUT') = ?1";

    ctx.query(SQL, [structured], |row| {
        Ok(ArgumentValue {
            argument: row.get(0)?,
            field: row.get(1)?,
            value: row.get(2)?,
            type_name: row.get(3)?,
            modifiers: modifiers_at(row, 4)?,
            location: location_at(row, 5)?,
        })
    })
}

/// Check every literal argument of one category and report each problem
pub(crate) fn literal_diagnostics(
    ctx: &RuleContext<'_>,
    rule: &str,
    structured: bool,
) -> Result<Vec<Diagnostic>> {
    let arguments = argument_values(ctx, structured)?;
    if arguments.is_empty() {
        return Ok(Vec::new());
    }

    let index = SchemaIndex::load(ctx)?;
    let mut diagnostics = Vec::new();
    for argument in arguments {
        let Some(value) = parse_value(&argument.value) else {
            continue;
        };
        let problems = ValueChecker::new(&index).check(
            &value,
            &argument.type_name,
            &argument.modifiers,
            &argument.argument,
        );
        for problem in problems {
            diagnostics.push(
                Diagnostic::validation(
                    rule,
                    format!(
                        "argument {} of field {} {}",
                        problem.path, argument.field, problem.message
                    ),
                )
                .with_location(argument.location.clone()),
            );
        }
    }
    Ok(diagnostics)
}

/// A literal that does not fit its type. `path` names the offending part of
/// the value (`filter.tags[1]`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ValueProblem {
    pub path: String,
    pub message: String,
}

/// Whether a literal is acceptable for a built-in scalar. Custom scalars
/// accept any literal.
fn scalar_accepts(scalar: &str, value: &ast::Value) -> bool {
    match scalar {
        "Int" => matches!(value, ast::Value::Int(_)),
        "Float" => matches!(value, ast::Value::Int(_) | ast::Value::Float(_)),
        "String" => matches!(value, ast::Value::String(_)),
        "Boolean" => matches!(value, ast::Value::Boolean(_)),
        "ID" => matches!(value, ast::Value::String(_)),
        _ => true,
    }
}

/// Recursive descent over a literal and the type it is checked against
pub(crate) struct ValueChecker<'a> {
    index: &'a SchemaIndex,
    problems: Vec<ValueProblem>,
}

impl<'a> ValueChecker<'a> {
    pub fn new(index: &'a SchemaIndex) -> Self {
        Self {
            index,
            problems: Vec::new(),
        }
    }

    /// Check `value` against `type_name` wrapped in `modifiers`
    pub fn check(
        mut self,
        value: &ast::Value,
        type_name: &str,
        modifiers: &TypeModifiers,
        path: &str,
    ) -> Vec<ValueProblem> {
        self.check_value(value, type_name, modifiers, path);
        self.problems
    }

    fn report(&mut self, path: &str, message: String) {
        self.problems.push(ValueProblem {
            path: path.to_string(),
            message,
        });
    }

    fn check_value(
        &mut self,
        value: &ast::Value,
        type_name: &str,
        modifiers: &TypeModifiers,
        path: &str,
    ) {
        match value {
            // variables are checked against their declaration elsewhere
            ast::Value::Variable(_) => {}
            ast::Value::Null => {
                if modifiers.is_non_null() {
                    self.report(path, format!("expects {}, found null", modifiers.wrap(type_name)));
                }
            }
            _ => match modifiers.unwrap_list() {
                Some(item) => match value {
                    ast::Value::List(items) => {
                        for (position, item_value) in items.iter().enumerate() {
                            self.check_value(
                                item_value,
                                type_name,
                                &item,
                                &format!("{path}[{position}]"),
                            );
                        }
                    }
                    _ => self.report(
                        path,
                        format!("expects {}, found {value}", modifiers.wrap(type_name)),
                    ),
                },
                None => self.check_named(value, type_name, path),
            },
        }
    }

    fn check_named(&mut self, value: &ast::Value, type_name: &str, path: &str) {
        match self.index.kind(type_name) {
            Some(TypeKind::Scalar) => {
                if !scalar_accepts(type_name, value) {
                    self.report(path, format!("expects {type_name}, found {value}"));
                }
            }
            Some(TypeKind::Enum) => match value {
                ast::Value::Enum(name) => {
                    let known = self
                        .index
                        .enum_values
                        .get(type_name)
                        .is_some_and(|values| values.contains(name.as_str()));
                    if !known {
                        self.report(path, format!("has no value {name} in enum {type_name}"));
                    }
                }
                _ => self.report(path, format!("expects enum {type_name}, found {value}")),
            },
            Some(TypeKind::Input) => match value {
                ast::Value::Object(fields) => self.check_object(fields, type_name, path),
                _ => self.report(path, format!("expects input {type_name}, found {value}")),
            },
            _ => {}
        }
    }

    fn check_object(
        &mut self,
        fields: &[(apollo_compiler::Name, apollo_compiler::Node<ast::Value>)],
        type_name: &str,
        path: &str,
    ) {
        let index = self.index;
        let Some(definitions) = index.input_fields.get(type_name) else {
            return;
        };

        for (name, field_value) in fields {
            let field_path = format!("{path}.{name}");
            match definitions.get(name.as_str()) {
                Some(definition) => {
                    let modifiers =
                        TypeModifiers::parse(&definition.modifiers).unwrap_or_default();
                    self.check_value(field_value, &definition.type_name, &modifiers, &field_path);
                }
                None => {
                    let mut message = format!("is not a field of input {type_name}");
                    if let Some(candidate) =
                        suggest(name.as_str(), definitions.keys().map(String::as_str))
                    {
                        message.push_str(&format!(". Did you mean {candidate}?"));
                    }
                    self.report(&field_path, message);
                }
            }
        }

        let mut missing: Vec<&str> = definitions
            .iter()
            .filter(|(_, definition)| definition.modifiers.ends_with('!') && !definition.has_default)
            .map(|(name, _)| name.as_str())
            .filter(|name| !fields.iter().any(|(provided, _)| provided.as_str() == *name))
            .collect();
        missing.sort_unstable();
        for name in missing {
            self.report(path, format!("is missing required field {name} of input {type_name}"));
        }
    }
}
