//! Where documents reference variables, and which arguments variables feed.

use crate::query::location_at;
use crate::RuleContext;
use houdini_ir::Result;
use houdini_syntax::variables_in;
use houdini_types::{SourceLocation, TypeModifiers};
use std::collections::{HashMap, HashSet};

/// Printed values that may hold a variable, with the document they appear in
const USAGES: &str = "
SELECT selection_arguments.document, selection_arguments.value,
       raw.filepath, selection_arguments.row, selection_arguments.column
FROM selection_arguments
JOIN documents ON documents.id = selection_arguments.document
JOIN raw_documents raw ON raw.id = documents.raw_document
WHERE selection_arguments.value LIKE '%$%'
UNION ALL
SELECT refs.document, arguments.value, raw.filepath, directives.row, directives.column
FROM selection_directive_arguments arguments
JOIN selection_directives directives ON directives.id = arguments.parent
JOIN selection_refs refs ON refs.child_id = directives.selection_id
JOIN documents ON documents.id = refs.document
JOIN raw_documents raw ON raw.id = documents.raw_document
WHERE arguments.value LIKE '%$%'
UNION ALL
SELECT directives.document, arguments.value, raw.filepath, directives.row, directives.column
FROM document_directive_arguments arguments
JOIN document_directives directives ON directives.id = arguments.parent
JOIN documents ON documents.id = directives.document
JOIN raw_documents raw ON raw.id = documents.raw_document
WHERE arguments.value LIKE '%$%'";

/// One reference to `$name`
#[derive(Debug, Clone)]
pub(crate) struct Usage {
    pub name: String,
    pub location: SourceLocation,
}

/// Variable references grouped by the document that contains them
pub(crate) fn usages_by_document(ctx: &RuleContext<'_>) -> Result<HashMap<i64, Vec<Usage>>> {
    let values = ctx.query(USAGES, [], |row| {
        Ok((row.get::<_, i64>(0)?, row.get::<_, String>(1)?, location_at(row, 2)?))
    })?;

    let mut usages: HashMap<i64, Vec<Usage>> = HashMap::new();
    for (document, value, location) in values {
        let mut names: Vec<String> = variables_in(&value).into_iter().collect();
        names.sort_unstable();
        usages.entry(document).or_default().extend(names.into_iter().map(|name| Usage {
            name,
            location: location.clone(),
        }));
    }
    Ok(usages)
}

/// A declared operation variable
#[derive(Debug, Clone)]
pub(crate) struct Declaration {
    pub document: i64,
    pub operation: String,
    pub name: String,
    pub location: SourceLocation,
}

pub(crate) fn declarations(ctx: &RuleContext<'_>) -> Result<Vec<Declaration>> {
    const SQL: &str = "
        SELECT operation_variables.document, documents.name, operation_variables.name,
               raw.filepath, operation_variables.row, operation_variables.column
        FROM operation_variables
        JOIN documents ON documents.id = operation_variables.document
        JOIN raw_documents raw ON raw.id = documents.raw_document
        ORDER BY operation_variables.id";

    ctx.query(SQL, [], |row| {
        Ok(Declaration {
            document: row.get(0)?,
            operation: row.get(1)?,
            name: row.get(2)?,
            location: location_at(row, 3)?,
        })
    })
}

/// Fragment spreads per document
const SPREADS: &str = "
SELECT refs.document, selections.field_name
FROM selection_refs refs
JOIN selections ON selections.id = refs.child_id
WHERE selections.kind = 'fragment'";

const FRAGMENTS: &str = "SELECT name, id FROM documents WHERE kind = 'fragment'";

/// Which fragments each document spreads, by name and by document id
#[derive(Debug, Default)]
pub(crate) struct SpreadGraph {
    spreads: HashMap<i64, Vec<String>>,
    fragments: HashMap<String, Vec<i64>>,
}

impl SpreadGraph {
    pub(crate) fn load(ctx: &RuleContext<'_>) -> Result<Self> {
        let mut graph = Self::default();
        for (document, fragment) in ctx.query(SPREADS, [], |row| {
            Ok((row.get::<_, i64>(0)?, row.get::<_, String>(1)?))
        })? {
            graph.spreads.entry(document).or_default().push(fragment);
        }
        for (name, document) in ctx.query(FRAGMENTS, [], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, i64>(1)?))
        })? {
            graph.fragments.entry(name).or_default().push(document);
        }
        Ok(graph)
    }

    /// The document itself plus every fragment document it spreads, transitively
    pub(crate) fn reachable(&self, document: i64) -> HashSet<i64> {
        let mut seen = HashSet::from([document]);
        let mut stack = vec![document];
        while let Some(current) = stack.pop() {
            let targets = self
                .spreads
                .get(&current)
                .into_iter()
                .flatten()
                .filter_map(|name| self.fragments.get(name))
                .flatten();
            for target in targets {
                if seen.insert(*target) {
                    stack.push(*target);
                }
            }
        }
        seen
    }
}

/// Names each fragment declares through `@arguments`
pub(crate) fn fragment_arguments(ctx: &RuleContext<'_>) -> Result<HashMap<i64, HashSet<String>>> {
    const SQL: &str = "
        SELECT directives.document, arguments.name
        FROM document_directive_arguments arguments
        JOIN document_directives directives ON directives.id = arguments.parent
        WHERE directives.directive = 'arguments'";

    let mut declared: HashMap<i64, HashSet<String>> = HashMap::new();
    for (document, name) in ctx.query(SQL, [], |row| {
        Ok((row.get::<_, i64>(0)?, row.get::<_, String>(1)?))
    })? {
        declared.entry(document).or_default().insert(name);
    }
    Ok(declared)
}

/// A field argument whose whole value is a variable, with both types
#[derive(Debug, Clone)]
pub(crate) struct VariableArgument {
    pub variable: String,
    pub argument: String,
    pub field: String,
    pub variable_type: String,
    pub variable_modifiers: TypeModifiers,
    pub variable_has_default: bool,
    pub argument_type: String,
    pub argument_modifiers: TypeModifiers,
    pub argument_has_default: bool,
    pub location: SourceLocation,
}

pub(crate) fn variable_arguments(ctx: &RuleContext<'_>) -> Result<Vec<VariableArgument>> {
    const SQL: &str = "
        SELECT operation_variables.name, selection_arguments.name, selections.field_name,
               operation_variables.type, operation_variables.type_modifiers,
               operation_variables.default_value IS NOT NULL,
               definitions.type, definitions.type_modifiers,
               definitions.default_value IS NOT NULL,
               raw.filepath, selection_arguments.row, selection_arguments.column
        FROM selection_arguments
        JOIN selections ON selections.id = selection_arguments.selection_id
        JOIN field_argument_definitions definitions
             ON definitions.field = selections.type AND definitions.name = selection_arguments.name
        JOIN operation_variables
             ON operation_variables.document = selection_arguments.document
            AND '$' || operation_variables.name = selection_arguments.value
        JOIN documents ON documents.id = selection_arguments.document
        JOIN raw_documents raw ON raw.id = documents.raw_document
        WHERE selection_arguments.value LIKE '$%'";

    ctx.query(SQL, [], |row| {
        Ok(VariableArgument {
            variable: row.get(0)?,
            argument: row.get(1)?,
            field: row.get(2)?,
            variable_type: row.get(3)?,
            variable_modifiers: modifiers_at(row, 4)?,
            variable_has_default: row.get(5)?,
            argument_type: row.get(6)?,
            argument_modifiers: modifiers_at(row, 7)?,
            argument_has_default: row.get(8)?,
            location: location_at(row, 9)?,
        })
    })
}

pub(crate) fn modifiers_at(row: &rusqlite::Row<'_>, index: usize) -> rusqlite::Result<TypeModifiers> {
    let text: String = row.get(index)?;
    TypeModifiers::parse(&text).ok_or_else(|| {
        rusqlite::Error::FromSqlConversionFailure(
            index,
            rusqlite::types::Type::Text,
            format!("invalid type modifiers '{text}'").into(),
        )
    })
}
