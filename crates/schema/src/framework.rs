//! Definitions the framework adds on top of every user schema.

use rusqlite::{params, Transaction};
use houdini_ir::{Result, SqlContext};

/// Scalar used as the type of synthesized component fields
pub const COMPONENT_SCALAR: &str = "Component";

/// Marks a fragment (named or inline) as a component field
pub const COMPONENT_FIELD_DIRECTIVE: &str = "componentField";

/// Attached to variables whose custom scalar type was swapped for a schema scalar
pub const RUNTIME_SCALAR_DIRECTIVE: &str = "__houdini__runtimeScalar";

/// Prefix of the fragments lifted out of inline component fields
pub const COMPONENT_FIELD_FRAGMENT_PREFIX: &str = "__componentField__";

/// Name of the fragment lifted out of an inline component field
#[must_use]
pub fn component_field_fragment_name(type_name: &str, field: &str) -> String {
    format!("{COMPONENT_FIELD_FRAGMENT_PREFIX}{type_name}_{field}")
}

/// Built-in scalars. The parser only adds the ones a schema references, but
/// the framework's directive arguments need them all.
const BUILT_IN_SCALARS: &[&str] = &["Int", "Float", "String", "Boolean", "ID"];

/// A directive argument: name, named type, type modifiers
type ArgumentDef = (&'static str, &'static str, &'static str);

struct FrameworkDirective {
    name: &'static str,
    description: &'static str,
    repeatable: bool,
    locations: &'static [&'static str],
    arguments: &'static [ArgumentDef],
}

const DIRECTIVES: &[FrameworkDirective] = &[
    FrameworkDirective {
        name: "list",
        description: "Mark a field as a list the cache can add records to",
        repeatable: false,
        locations: &["FIELD"],
        arguments: &[("name", "String", "!"), ("connection", "Boolean", "")],
    },
    FrameworkDirective {
        name: "paginate",
        description: "Generate pagination helpers for a field",
        repeatable: false,
        locations: &["FIELD"],
        arguments: &[("name", "String", ""), ("mode", "String", "")],
    },
    FrameworkDirective {
        name: "prepend",
        description: "Insert list operation results at the start of the list",
        repeatable: false,
        locations: &["FRAGMENT_SPREAD"],
        arguments: &[],
    },
    FrameworkDirective {
        name: "append",
        description: "Insert list operation results at the end of the list",
        repeatable: false,
        locations: &["FRAGMENT_SPREAD"],
        arguments: &[],
    },
    FrameworkDirective {
        name: "dedupe",
        description: "Drop a request when an identical one is in flight",
        repeatable: false,
        locations: &["QUERY", "MUTATION"],
        arguments: &[("cancelFirst", "Boolean", ""), ("match", "String", "")],
    },
    FrameworkDirective {
        name: "optimisticKey",
        description: "Generate an optimistic value for a key field",
        repeatable: false,
        locations: &["FIELD"],
        arguments: &[],
    },
    FrameworkDirective {
        name: "allLists",
        description: "Apply a list operation to every list with the same name",
        repeatable: false,
        locations: &["FRAGMENT_SPREAD"],
        arguments: &[],
    },
    FrameworkDirective {
        name: "parentID",
        description: "Target the list owned by the record with this id",
        repeatable: false,
        locations: &["FRAGMENT_SPREAD"],
        arguments: &[("value", "ID", "!")],
    },
    FrameworkDirective {
        name: "when",
        description: "Only apply a list operation when the list's arguments match",
        repeatable: false,
        locations: &["FRAGMENT_SPREAD"],
        arguments: &[],
    },
    FrameworkDirective {
        name: "when_not",
        description: "Only apply a list operation when the list's arguments differ",
        repeatable: false,
        locations: &["FRAGMENT_SPREAD"],
        arguments: &[],
    },
    FrameworkDirective {
        name: "arguments",
        description: "Declare the arguments a fragment accepts",
        repeatable: false,
        locations: &["FRAGMENT_DEFINITION"],
        arguments: &[],
    },
    FrameworkDirective {
        name: "with",
        description: "Pass arguments to a fragment",
        repeatable: false,
        locations: &["FRAGMENT_SPREAD"],
        arguments: &[],
    },
    FrameworkDirective {
        name: "cache",
        description: "Set the cache policy of a query",
        repeatable: false,
        locations: &["QUERY"],
        arguments: &[("policy", "String", ""), ("partial", "Boolean", "")],
    },
    FrameworkDirective {
        name: "mask_enable",
        description: "Mask the fields of a fragment spread",
        repeatable: false,
        locations: &["FRAGMENT_SPREAD"],
        arguments: &[],
    },
    FrameworkDirective {
        name: "mask_disable",
        description: "Expose the fields of a fragment spread",
        repeatable: false,
        locations: &["FRAGMENT_SPREAD"],
        arguments: &[],
    },
    FrameworkDirective {
        name: "loading",
        description: "Include a selection in the loading state",
        repeatable: false,
        locations: &["QUERY", "FRAGMENT_DEFINITION", "FIELD", "FRAGMENT_SPREAD"],
        arguments: &[("count", "Int", ""), ("cascade", "Boolean", "")],
    },
    FrameworkDirective {
        name: "required",
        description: "Treat a nullable field as required",
        repeatable: false,
        locations: &["FIELD"],
        arguments: &[],
    },
    FrameworkDirective {
        name: COMPONENT_FIELD_DIRECTIVE,
        description: "Register a fragment as a component field of its type",
        repeatable: false,
        locations: &["FRAGMENT_DEFINITION", "INLINE_FRAGMENT"],
        arguments: &[("field", "String", "!"), ("prop", "String", "")],
    },
    FrameworkDirective {
        name: RUNTIME_SCALAR_DIRECTIVE,
        description: "Records the custom scalar a variable was declared with",
        repeatable: false,
        locations: &["VARIABLE_DEFINITION"],
        arguments: &[("type", "String", "!")],
    },
];

/// Names of every directive the framework defines
pub fn framework_directive_names() -> impl Iterator<Item = &'static str> {
    DIRECTIVES.iter().map(|directive| directive.name)
}

/// Insert the built-in scalars the schema left out, then the framework's
/// scalar and directives.
///
/// Rows that already exist are left alone, so a schema that declares one of
/// these itself keeps its own definition.
pub(crate) fn insert_framework_definitions(tx: &Transaction<'_>) -> Result<()> {
    const BUILT_IN: &str =
        "INSERT OR IGNORE INTO types (name, kind, internal) VALUES (?1, 'SCALAR', 0)";
    const TYPE: &str =
        "INSERT OR IGNORE INTO types (name, kind, description, internal) VALUES (?1, 'SCALAR', ?2, 1)";
    const DIRECTIVE: &str = "INSERT OR IGNORE INTO directives (name, repeatable, internal, visible, description) VALUES (?1, ?2, 1, ?3, ?4)";
    const ARGUMENT: &str = "INSERT OR IGNORE INTO directive_arguments (parent, name, type, type_modifiers) VALUES (?1, ?2, ?3, ?4)";
    const LOCATION: &str =
        "INSERT OR IGNORE INTO directive_locations (directive, location) VALUES (?1, ?2)";

    for scalar in BUILT_IN_SCALARS {
        tx.prepare_cached(BUILT_IN)
            .and_then(|mut stmt| stmt.execute(params![scalar]))
            .sql_context("could not insert built-in scalar", BUILT_IN)?;
    }

    tx.prepare_cached(TYPE)
        .and_then(|mut stmt| {
            stmt.execute(params![
                COMPONENT_SCALAR,
                "A component rendered by a component field"
            ])
        })
        .sql_context("could not insert framework scalar", TYPE)?;

    for directive in DIRECTIVES {
        let inserted = tx
            .prepare_cached(DIRECTIVE)
            .and_then(|mut stmt| {
                stmt.execute(params![
                    directive.name,
                    directive.repeatable,
                    !directive.name.starts_with("__"),
                    directive.description
                ])
            })
            .sql_context("could not insert framework directive", DIRECTIVE)?;
        if inserted == 0 {
            tracing::debug!(directive = directive.name, "Schema already defines directive");
            continue;
        }

        for (name, type_name, modifiers) in directive.arguments {
            tx.prepare_cached(ARGUMENT)
                .and_then(|mut stmt| stmt.execute(params![directive.name, name, type_name, modifiers]))
                .sql_context("could not insert framework directive argument", ARGUMENT)?;
        }
        for location in directive.locations {
            tx.prepare_cached(LOCATION)
                .and_then(|mut stmt| stmt.execute(params![directive.name, location]))
                .sql_context("could not insert framework directive location", LOCATION)?;
        }
    }

    tracing::trace!(directives = DIRECTIVES.len(), "Framework definitions inserted");
    Ok(())
}
