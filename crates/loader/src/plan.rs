//! Turning a raw document into the definitions the writer inserts.
//!
//! Everything here runs outside the write gate: parsing, the checks that
//! need only the AST, and the lifting of inline component fields.

use apollo_compiler::ast;
use apollo_compiler::{name, Node};
use houdini_ir::{DocumentKind, RawDocument};
use houdini_schema::{component_field_fragment_name, COMPONENT_FIELD_DIRECTIVE};
use houdini_syntax::{parse_document, ParsedDocument};
use houdini_types::{Diagnostic, Position, SourceLocation};

/// Raw document marked by the extractor as an inline component field
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct InlineMarker {
    /// Prop the extractor found next to the document
    pub prop: Option<String>,
}

/// One unit of work for the loader's workers
#[derive(Debug)]
pub(crate) struct WorkItem {
    pub raw: RawDocument,
    pub inline: Option<InlineMarker>,
}

/// A document definition ready to be written
#[derive(Debug)]
pub(crate) struct DocumentPlan {
    pub name: String,
    pub kind: DocumentKind,
    pub type_condition: Option<String>,
    /// Position of the definition inside the raw document
    pub position: Position,
    pub variables: Vec<Node<ast::VariableDefinition>>,
    pub directives: ast::DirectiveList,
    pub selection_set: Vec<ast::Selection>,
}

/// A parsed raw document and the definitions taken from it
#[derive(Debug)]
pub(crate) struct PreparedDocument {
    pub raw: RawDocument,
    pub parsed: ParsedDocument,
    pub plans: Vec<DocumentPlan>,
}

impl PreparedDocument {
    pub fn locate(&self, position: Position) -> SourceLocation {
        locate(&self.raw, position)
    }
}

fn locate(raw: &RawDocument, position: Position) -> SourceLocation {
    SourceLocation::at(raw.filepath.clone(), raw.offset.apply(position))
}

/// Parse a raw document and plan its definitions.
///
/// Problems found here are returned as diagnostics next to whatever could
/// still be planned. A document with syntax errors yields no plan at all.
pub(crate) fn prepare(item: WorkItem) -> (Option<PreparedDocument>, Vec<Diagnostic>) {
    let WorkItem { raw, inline } = item;

    let parsed = match parse_document(&raw.content, &raw.filepath) {
        Ok(parsed) => parsed,
        Err(errors) => {
            let diagnostics = errors
                .into_iter()
                .map(|error| {
                    Diagnostic::parse(error.message).with_location(locate(&raw, error.position))
                })
                .collect();
            return (None, diagnostics);
        }
    };

    let mut plans = Vec::new();
    let mut diagnostics = Vec::new();
    for definition in &parsed.ast().definitions {
        match definition {
            ast::Definition::OperationDefinition(operation) => {
                let position = parsed.position_of(operation);
                if let Some(marker) = &inline {
                    match lift_component_field(&parsed, operation, marker.prop.as_deref()) {
                        Ok(plan) => plans.push(plan),
                        Err(errors) => diagnostics.extend(errors.into_iter().map(
                            |(message, position)| {
                                Diagnostic::validation("component_field", message)
                                    .with_location(locate(&raw, position))
                            },
                        )),
                    }
                    continue;
                }

                let Some(name) = &operation.name else {
                    diagnostics.push(
                        Diagnostic::validation("anonymous_operation", "operations must have a name")
                            .with_location(locate(&raw, position)),
                    );
                    continue;
                };
                plans.push(DocumentPlan {
                    name: name.to_string(),
                    kind: document_kind(operation.operation_type),
                    type_condition: None,
                    position,
                    variables: operation.variables.clone(),
                    directives: operation.directives.clone(),
                    selection_set: operation.selection_set.clone(),
                });
            }
            ast::Definition::FragmentDefinition(fragment) => plans.push(DocumentPlan {
                name: fragment.name.to_string(),
                kind: DocumentKind::Fragment,
                type_condition: Some(fragment.type_condition.to_string()),
                position: parsed.position_of(fragment),
                variables: Vec::new(),
                directives: fragment.directives.clone(),
                selection_set: fragment.selection_set.clone(),
            }),
            other => {
                let position = other
                    .location()
                    .map_or(Position::new(1, 1), |span| parsed.position_at(span.offset()));
                diagnostics.push(
                    Diagnostic::parse("documents may only contain operations and fragments")
                        .with_location(locate(&raw, position)),
                );
            }
        }
    }

    (Some(PreparedDocument { raw, parsed, plans }), diagnostics)
}

fn document_kind(operation: ast::OperationType) -> DocumentKind {
    match operation {
        ast::OperationType::Query => DocumentKind::Query,
        ast::OperationType::Mutation => DocumentKind::Mutation,
        ast::OperationType::Subscription => DocumentKind::Subscription,
    }
}

type LiftErrors = Vec<(String, Position)>;

/// Turn `{ ... on T @componentField(field: "F") { ... } }` into
/// `fragment __componentField__T_F on T @componentField(...) { ... }`.
///
/// The registered prop is added to the directive when it doesn't name one.
fn lift_component_field(
    parsed: &ParsedDocument,
    operation: &Node<ast::OperationDefinition>,
    registered_prop: Option<&str>,
) -> Result<DocumentPlan, LiftErrors> {
    let operation_position = parsed.position_of(operation);
    let fragment = match operation.selection_set.as_slice() {
        [ast::Selection::InlineFragment(fragment)] => fragment,
        [_] => {
            return Err(vec![(
                "inline component fields must be an inline fragment".to_string(),
                operation_position,
            )])
        }
        selections => {
            return Err(vec![(
                format!(
                    "inline component fields must have exactly one selection, found {}",
                    selections.len()
                ),
                operation_position,
            )])
        }
    };

    let position = parsed.position_of(fragment);
    let Some(type_condition) = &fragment.type_condition else {
        return Err(vec![(
            "inline component fields must have a type condition".to_string(),
            position,
        )]);
    };
    let Some(directive) = fragment.directives.get(COMPONENT_FIELD_DIRECTIVE) else {
        return Err(vec![(
            format!("inline component fields must have a @{COMPONENT_FIELD_DIRECTIVE} directive"),
            position,
        )]);
    };

    let directive_position = parsed.position_of(directive);
    let field = string_argument(directive, "field");
    let explicit_prop = string_argument(directive, "prop");
    let prop = explicit_prop.or(registered_prop);

    let mut errors = Vec::new();
    if field.is_none() {
        errors.push((
            format!("@{COMPONENT_FIELD_DIRECTIVE} requires a string field argument"),
            directive_position,
        ));
    }
    if prop.is_none() {
        errors.push((
            format!("@{COMPONENT_FIELD_DIRECTIVE} requires a prop argument"),
            directive_position,
        ));
    }
    let (Some(field), Some(prop)) = (field, prop) else {
        return Err(errors);
    };

    let mut directives = fragment.directives.clone();
    if explicit_prop.is_none() {
        for directive in &mut directives.0 {
            if directive.name.as_str() == COMPONENT_FIELD_DIRECTIVE {
                directive.make_mut().arguments.push(Node::new(ast::Argument {
                    name: name!("prop"),
                    value: Node::new(ast::Value::String(prop.to_string())),
                }));
            }
        }
    }

    Ok(DocumentPlan {
        name: component_field_fragment_name(type_condition, field),
        kind: DocumentKind::Fragment,
        type_condition: Some(type_condition.to_string()),
        position,
        variables: Vec::new(),
        directives,
        selection_set: fragment.selection_set.clone(),
    })
}

fn string_argument<'a>(directive: &'a ast::Directive, name: &str) -> Option<&'a str> {
    match directive.specified_argument_by_name(name).map(|value| &**value) {
        Some(ast::Value::String(value)) => Some(value.as_str()),
        _ => None,
    }
}
