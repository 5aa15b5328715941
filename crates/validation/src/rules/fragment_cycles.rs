use crate::query::location_at;
use crate::{RuleContext, ValidationRule};
use houdini_ir::Result;
use houdini_types::{Diagnostic, SourceLocation};
use std::collections::{BTreeMap, HashMap};

/// Trait implementation for `fragment_cycles` rule
pub struct FragmentCyclesRuleImpl;

/// Spread edges between fragments, in a stable order
const EDGES: &str = "
SELECT documents.name, selections.field_name, raw.filepath, refs.row, refs.column
FROM selection_refs refs
JOIN selections ON selections.id = refs.child_id
JOIN documents ON documents.id = refs.document
JOIN raw_documents raw ON raw.id = documents.raw_document
WHERE documents.kind = 'fragment' AND selections.kind = 'fragment'
ORDER BY documents.name, refs.row, refs.column, selections.field_name";

/// A spread of `target` inside some fragment
struct Edge {
    target: String,
    location: SourceLocation,
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Mark {
    OnPath,
    Done,
}

/// Depth-first search that records one cycle per back edge
struct CycleFinder<'a> {
    graph: &'a BTreeMap<String, Vec<Edge>>,
    marks: HashMap<&'a str, Mark>,
    path: Vec<&'a str>,
    cycles: Vec<(Vec<&'a str>, &'a SourceLocation)>,
}

impl<'a> CycleFinder<'a> {
    fn new(graph: &'a BTreeMap<String, Vec<Edge>>) -> Self {
        Self {
            graph,
            marks: HashMap::new(),
            path: Vec::new(),
            cycles: Vec::new(),
        }
    }

    fn run(mut self) -> Vec<(Vec<&'a str>, &'a SourceLocation)> {
        let graph = self.graph;
        for fragment in graph.keys() {
            if !self.marks.contains_key(fragment.as_str()) {
                self.visit(fragment);
            }
        }
        self.cycles
    }

    fn visit(&mut self, fragment: &'a str) {
        let graph = self.graph;
        self.marks.insert(fragment, Mark::OnPath);
        self.path.push(fragment);

        for edge in graph.get(fragment).into_iter().flatten() {
            let target = edge.target.as_str();
            match self.marks.get(target) {
                Some(Mark::OnPath) => {
                    let start = self.path.iter().rposition(|name| *name == target).unwrap_or(0);
                    let mut cycle = self.path[start..].to_vec();
                    cycle.push(target);
                    self.cycles.push((cycle, &edge.location));
                }
                Some(Mark::Done) => {}
                // spreads of undefined fragments end here
                None if !graph.contains_key(target) => {}
                None => self.visit(target),
            }
        }

        self.path.pop();
        self.marks.insert(fragment, Mark::Done);
    }
}

impl ValidationRule for FragmentCyclesRuleImpl {
    fn name(&self) -> &'static str {
        "fragment_cycles"
    }

    fn description(&self) -> &'static str {
        "Fragments must not spread themselves, directly or through other fragments"
    }

    fn check(&self, ctx: &RuleContext<'_>) -> Result<Vec<Diagnostic>> {
        let edges = ctx.query(EDGES, [], |row| {
            Ok((
                row.get::<_, String>(0)?,
                Edge {
                    target: row.get(1)?,
                    location: location_at(row, 2)?,
                },
            ))
        })?;

        let mut graph: BTreeMap<String, Vec<Edge>> = BTreeMap::new();
        for (fragment, edge) in edges {
            graph.entry(fragment).or_default().push(edge);
        }
        // fragments without spreads still terminate a path
        for name in ctx.query(
            "SELECT DISTINCT name FROM documents WHERE kind = 'fragment'",
            [],
            |row| row.get::<_, String>(0),
        )? {
            graph.entry(name).or_default();
        }
        ctx.check_cancelled()?;

        Ok(CycleFinder::new(&graph)
            .run()
            .into_iter()
            .map(|(cycle, location)| {
                Diagnostic::validation(
                    self.name(),
                    format!("fragment cycle detected: {}", cycle.join(" → ")),
                )
                .with_location(location.clone())
            })
            .collect())
    }
}
