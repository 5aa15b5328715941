use crate::LineIndex;
use apollo_compiler::ast;
use apollo_compiler::Node;
use houdini_types::Position;

/// A syntax error with its position inside the parsed text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyntaxError {
    pub message: String,
    /// Position inside the document (1-indexed, not shifted by any host offset)
    pub position: Position,
}

impl std::fmt::Display for SyntaxError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} (at {}:{})",
            self.message, self.position.line, self.position.column
        )
    }
}

/// A successfully parsed executable document together with what is needed
/// to locate its nodes.
#[derive(Debug, Clone)]
pub struct ParsedDocument {
    source: String,
    line_index: LineIndex,
    ast: ast::Document,
}

impl ParsedDocument {
    #[must_use]
    pub const fn ast(&self) -> &ast::Document {
        &self.ast
    }

    #[must_use]
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Position of a byte offset (1-indexed line, 1-indexed character column)
    #[must_use]
    pub fn position_at(&self, offset: usize) -> Position {
        self.line_index.position(&self.source, offset)
    }

    /// Position where a node starts. Synthesized nodes have no location and
    /// report the start of the document.
    #[must_use]
    pub fn position_of<T: ?Sized>(&self, node: &Node<T>) -> Position {
        node.location()
            .map_or(Position::new(1, 1), |span| self.position_at(span.offset()))
    }

    /// Position where a name starts
    #[must_use]
    pub fn name_position(&self, name: &apollo_compiler::Name) -> Position {
        name.location()
            .map_or(Position::new(1, 1), |span| self.position_at(span.offset()))
    }
}

/// Parse an executable GraphQL document.
///
/// Syntax errors come from `apollo-parser`, which reports every error with a
/// byte index. If the CST is clean the AST is built with `apollo-compiler`;
/// anything it rejects is reported at the location it gives.
#[tracing::instrument(skip(source), fields(size = source.len()))]
pub fn parse_document(source: &str, path: &str) -> Result<ParsedDocument, Vec<SyntaxError>> {
    let line_index = LineIndex::new(source);

    let tree = apollo_parser::Parser::new(source).parse();
    let errors: Vec<SyntaxError> = tree
        .errors()
        .map(|e| SyntaxError {
            message: e.message().to_string(),
            position: line_index.position(source, e.index()),
        })
        .collect();
    if !errors.is_empty() {
        tracing::debug!(errors = errors.len(), "Document has syntax errors");
        return Err(errors);
    }

    match ast::Document::parse(source, path) {
        Ok(ast) => Ok(ParsedDocument {
            source: source.to_string(),
            line_index,
            ast,
        }),
        Err(with_errors) => Err(with_errors
            .errors
            .iter()
            .map(|e| SyntaxError {
                message: e.error.to_string(),
                position: e.line_column_range().map_or(Position::new(1, 1), |range| {
                    Position::new(range.start.line as u32, range.start.column as u32)
                }),
            })
            .collect()),
    }
}
