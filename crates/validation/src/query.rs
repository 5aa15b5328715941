//! Helpers shared by the rules: decoding aggregated locations, suggestions,
//! and the parts of the schema several rules load into memory.

use crate::RuleContext;
use houdini_ir::{Result, TypeKind};
use houdini_types::SourceLocation;
use rusqlite::types::Type;
use rusqlite::Row;
use std::collections::{HashMap, HashSet};

/// The type every selection is evaluated against.
///
/// Root selections take their document's type (fragment condition or root
/// operation type). Children of a field take the field's named type;
/// children of an inline fragment take its condition, or the fragment's own
/// enclosing type when it has none. Unresolvable types are NULL.
pub(crate) const ENCLOSING_TYPES: &str = "
WITH RECURSIVE enclosing(selection, type) AS (
    SELECT refs.child_id,
           CASE WHEN documents.kind = 'fragment' THEN documents.type_condition
                ELSE COALESCE(
                    (SELECT operation_types.type FROM operation_types
                     WHERE operation_types.operation = documents.kind),
                    CASE documents.kind WHEN 'mutation' THEN 'Mutation'
                                        WHEN 'subscription' THEN 'Subscription'
                                        ELSE 'Query' END)
           END
    FROM selection_refs refs
    JOIN documents ON documents.id = refs.document
    WHERE refs.parent_id IS NULL
  UNION ALL
    SELECT refs.child_id,
           CASE WHEN parent.kind = 'field'
                    THEN (SELECT type_fields.type FROM type_fields WHERE type_fields.id = parent.type)
                WHEN parent.field_name = 'inline_fragment' THEN enclosing.type
                ELSE parent.field_name
           END
    FROM enclosing
    JOIN selections parent ON parent.id = enclosing.selection
    JOIN selection_refs refs ON refs.parent_id = parent.id
)";

/// Read a single location from three consecutive columns: path, line, column
pub(crate) fn location_at(row: &Row<'_>, index: usize) -> rusqlite::Result<SourceLocation> {
    Ok(SourceLocation::new(
        row.get::<_, String>(index)?,
        row.get(index + 1)?,
        row.get(index + 2)?,
    ))
}

/// Decode a `json_group_array(json_object('filepath', .., 'line', .., 'column', ..))`
/// column, sorted and without duplicates
pub(crate) fn locations_at(row: &Row<'_>, index: usize) -> rusqlite::Result<Vec<SourceLocation>> {
    let json: String = row.get(index)?;
    let mut locations: Vec<SourceLocation> = serde_json::from_str(&json)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(index, Type::Text, Box::new(e)))?;
    locations.sort();
    locations.dedup();
    Ok(locations)
}

/// Decode a `json_group_array` of strings, sorted
pub(crate) fn strings_at(row: &Row<'_>, index: usize) -> rusqlite::Result<Vec<String>> {
    let json: String = row.get(index)?;
    let mut strings: Vec<String> = serde_json::from_str(&json)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(index, Type::Text, Box::new(e)))?;
    strings.sort();
    Ok(strings)
}

/// The closest candidate to `name`, if any is close enough to be a typo
pub(crate) fn suggest<'a>(
    name: &str,
    candidates: impl IntoIterator<Item = &'a str>,
) -> Option<&'a str> {
    let threshold = (name.chars().count() / 3).max(1);
    candidates
        .into_iter()
        .filter(|candidate| *candidate != name)
        .map(|candidate| (strsim::osa_distance(name, candidate), candidate))
        .filter(|(distance, _)| *distance <= threshold)
        .min()
        .map(|(_, candidate)| candidate)
}

/// Append a "did you mean" hint to a message
pub(crate) fn with_suggestion<'a>(
    message: String,
    name: &str,
    candidates: impl IntoIterator<Item = &'a str>,
) -> String {
    match suggest(name, candidates) {
        Some(candidate) => format!("{message}. Did you mean {candidate}?"),
        None => message,
    }
}

/// A field of an input object, as needed to check literals against it
#[derive(Debug, Clone)]
pub(crate) struct InputField {
    pub type_name: String,
    pub modifiers: String,
    pub has_default: bool,
}

/// Type kinds, possible types, input fields and enum values
#[derive(Debug, Default)]
pub(crate) struct SchemaIndex {
    pub kinds: HashMap<String, TypeKind>,
    pub possible_types: HashMap<String, HashSet<String>>,
    pub input_fields: HashMap<String, HashMap<String, InputField>>,
    pub enum_values: HashMap<String, HashSet<String>>,
}

impl SchemaIndex {
    pub fn load(ctx: &RuleContext<'_>) -> Result<Self> {
        const INPUT_FIELDS: &str = "
            SELECT type_fields.parent, type_fields.name, type_fields.type,
                   type_fields.type_modifiers, type_fields.default_value IS NOT NULL
            FROM type_fields
            JOIN types ON types.name = type_fields.parent
            WHERE types.kind = 'INPUT'";

        let mut index = Self::default();

        for (name, kind) in ctx.query("SELECT name, kind FROM types", [], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
        })? {
            index.kinds.insert(name, kind.parse()?);
        }

        for (abstract_type, member) in ctx.query(
            "SELECT type, member FROM possible_types",
            [],
            |row| Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?)),
        )? {
            index
                .possible_types
                .entry(abstract_type)
                .or_default()
                .insert(member);
        }

        for (parent, name, field) in ctx.query(INPUT_FIELDS, [], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                InputField {
                    type_name: row.get(2)?,
                    modifiers: row.get(3)?,
                    has_default: row.get(4)?,
                },
            ))
        })? {
            index.input_fields.entry(parent).or_default().insert(name, field);
        }

        for (parent, value) in ctx.query("SELECT parent, value FROM enum_values", [], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
        })? {
            index.enum_values.entry(parent).or_default().insert(value);
        }

        Ok(index)
    }

    pub fn kind(&self, name: &str) -> Option<TypeKind> {
        self.kinds.get(name).copied()
    }

    /// Concrete types a value of `name` can have at runtime
    pub fn concrete_types<'a>(&'a self, name: &'a str) -> HashSet<&'a str> {
        match self.kind(name) {
            Some(TypeKind::Object) => std::iter::once(name).collect(),
            Some(TypeKind::Interface | TypeKind::Union) => self
                .possible_types
                .get(name)
                .map(|members| members.iter().map(String::as_str).collect())
                .unwrap_or_default(),
            _ => HashSet::new(),
        }
    }

    /// Whether some concrete type satisfies both `a` and `b`
    pub fn overlaps(&self, a: &str, b: &str) -> bool {
        a == b || !self.concrete_types(a).is_disjoint(&self.concrete_types(b))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_suggest_close_names() {
        let candidates = ["name", "friends", "avatar"];
        assert_eq!(suggest("nmae", candidates), Some("name"));
        assert_eq!(suggest("friend", candidates), Some("friends"));
        assert_eq!(suggest("xyz", candidates), None);
    }

    #[test]
    fn test_with_suggestion() {
        assert_eq!(
            with_suggestion("unknown directive @lsit".to_string(), "lsit", ["list"]),
            "unknown directive @lsit. Did you mean list?"
        );
        assert_eq!(
            with_suggestion("unknown directive @zzz".to_string(), "zzz", ["list"]),
            "unknown directive @zzz"
        );
    }

    #[test]
    fn test_overlaps() {
        let mut index = SchemaIndex::default();
        index.kinds.insert("User".into(), TypeKind::Object);
        index.kinds.insert("Post".into(), TypeKind::Object);
        index.kinds.insert("Node".into(), TypeKind::Interface);
        index.kinds.insert("Named".into(), TypeKind::Interface);
        index
            .possible_types
            .insert("Node".into(), ["User".to_string(), "Post".to_string()].into());
        index
            .possible_types
            .insert("Named".into(), ["User".to_string()].into());

        assert!(index.overlaps("User", "User"));
        assert!(index.overlaps("Node", "User"));
        assert!(index.overlaps("Node", "Named"));
        assert!(!index.overlaps("Post", "Named"));
        assert!(!index.overlaps("Post", "User"));
    }
}
