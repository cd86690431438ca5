//! Tree-sitter integration for Go source.

use tree_sitter::{Node, Tree};

use crate::error::ParseError;

/// Parse Go source and return the tree-sitter tree.
///
/// Trees containing error or missing nodes are rejected: the position of the
/// first one is reported and no partial tree is returned.
pub fn parse_go(source: &str) -> Result<Tree, ParseError> {
    let language: tree_sitter::Language = tree_sitter_go::LANGUAGE.into();
    let mut parser = tree_sitter::Parser::new();
    parser.set_language(&language)?;
    let tree = parser
        .parse(source.as_bytes(), None)
        .ok_or(ParseError::NoTree)?;

    let root = tree.root_node();
    if root.has_error() {
        let bad = first_error(root).unwrap_or(root);
        let pos = bad.start_position();
        let snippet: String = source[bad.byte_range()].chars().take(32).collect();
        return Err(ParseError::Syntax {
            line: pos.row + 1,
            column: pos.column + 1,
            snippet,
        });
    }
    Ok(tree)
}

/// Depth-first search for the first ERROR or MISSING node.
fn first_error(node: Node<'_>) -> Option<Node<'_>> {
    if node.is_error() || node.is_missing() {
        return Some(node);
    }
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        if (child.has_error() || child.is_missing())
            && let Some(found) = first_error(child)
        {
            return Some(found);
        }
    }
    None
}

/// Source text covered by `node`.
pub fn text<'s>(node: Node<'_>, source: &'s str) -> &'s str {
    &source[node.byte_range()]
}

/// First named child that is not a comment.
pub fn first_named(node: Node<'_>) -> Option<Node<'_>> {
    let mut cursor = node.walk();
    node.named_children(&mut cursor)
        .find(|child| child.kind() != "comment")
}
