//! Structural extraction of function definitions from source text.
//!
//! The walk itself is written against [`SyntaxNode`], a small capability trait,
//! so the same adjacency rules apply to any conforming tree. [`FunctionExtractor`]
//! binds that walk to the tree-sitter Rust grammar.
//!
//! Two sibling chains are read for every function, each starting from the
//! function node itself:
//! - attributes: the unbroken run of attribute items directly above it;
//! - docstring: the unbroken run of line comments directly above it.
//!
//! The chains are independent, so in `// doc`, `#[attr]`, `fn f() {}` the
//! comment is not adjacent to the function and the docstring is `None`.

mod lines;
mod syntax;

use std::ops::Range;

use thiserror::Error;
use tracing::debug;
use tree_sitter::{Language, Parser};

use crate::model::FunctionRecord;

pub use lines::LineIndex;
pub use syntax::SyntaxNode;

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("failed to load grammar: {0}")]
    Language(#[from] tree_sitter::LanguageError),
    /// No syntax tree could be produced for the input.
    #[error("parser produced no syntax tree")]
    Parse,
}

/// Grammar-specific names the walk matches on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NodeKinds {
    pub function: &'static str,
    pub attribute: &'static str,
    pub line_comment: &'static str,
    /// Field holding the function's identifier.
    pub name_field: &'static str,
}

impl NodeKinds {
    /// Node kinds of the tree-sitter Rust grammar. Inner attributes (`#![..]`)
    /// have their own kind and are never collected.
    pub const RUST: NodeKinds = NodeKinds {
        function: "function_item",
        attribute: "attribute_item",
        line_comment: "line_comment",
        name_field: "name",
    };
}

/// Owned, reusable handle for extracting functions from Rust source.
///
/// Holds no parser state between calls; a parser is built per call so one
/// extractor can be shared by reference across threads.
pub struct FunctionExtractor {
    language: Language,
    kinds: NodeKinds,
}

impl FunctionExtractor {
    pub fn new(language: Language, kinds: NodeKinds) -> Self {
        Self { language, kinds }
    }

    /// Extractor for Rust source.
    pub fn rust() -> Self {
        Self::new(tree_sitter_rust::language(), NodeKinds::RUST)
    }

    pub fn kinds(&self) -> NodeKinds {
        self.kinds
    }

    /// Extract every named function in `source`, in document order.
    pub fn extract(&self, source: &str) -> Result<Vec<FunctionRecord>, ExtractError> {
        let mut parser = Parser::new();
        parser.set_language(&self.language)?;
        let tree = parser.parse(source, None).ok_or(ExtractError::Parse)?;
        let root = tree.root_node();
        if root.has_error() {
            debug!("syntax tree contains error nodes; extracting recoverable functions");
        }
        Ok(extract_functions(root, source, &self.kinds))
    }
}

/// Pre-order walk collecting a [`FunctionRecord`] for every function node with
/// a resolvable name, at any nesting depth.
pub fn extract_functions<N: SyntaxNode>(
    root: N,
    source: &str,
    kinds: &NodeKinds,
) -> Vec<FunctionRecord> {
    let lines = LineIndex::new(source);
    let mut functions = Vec::new();
    let mut stack = vec![root];

    while let Some(node) = stack.pop() {
        if node.kind() == kinds.function {
            match function_record(&node, source, &lines, kinds) {
                Some(record) => functions.push(record),
                None => debug!(range = ?node.byte_range(), "skipping function without a name"),
            }
        }
        stack.extend(node.children().into_iter().rev());
    }

    functions
}

fn function_record<N: SyntaxNode>(
    node: &N,
    source: &str,
    lines: &LineIndex,
    kinds: &NodeKinds,
) -> Option<FunctionRecord> {
    let name_node = node.child_by_field(kinds.name_field)?;
    let name = slice(source, name_node.byte_range());
    if name.is_empty() {
        return None;
    }

    let range = node.byte_range();
    let attributes: Vec<String> = preceding_run(node, kinds.attribute, source)
        .into_iter()
        .map(str::to_string)
        .collect();
    let comments: Vec<&str> = preceding_run(node, kinds.line_comment, source)
        .into_iter()
        .map(|c| c.trim_end_matches(['\n', '\r']))
        .collect();
    let docstring = if comments.is_empty() { None } else { Some(comments.join("\n")) };

    Some(FunctionRecord {
        name: name.to_string(),
        content: slice(source, range.clone()).to_string(),
        start_line: lines.line_of(range.start),
        end_line: lines.line_of(range.end),
        attributes,
        docstring,
    })
}

/// Text of the consecutive `kind` siblings directly before `node`, top to bottom.
fn preceding_run<'s, N: SyntaxNode>(node: &N, kind: &str, source: &'s str) -> Vec<&'s str> {
    let mut run = Vec::new();
    let mut current = node.prev_sibling();
    while let Some(prev) = current {
        if prev.kind() != kind {
            break;
        }
        run.push(slice(source, prev.byte_range()));
        current = prev.prev_sibling();
    }
    run.reverse();
    run
}

fn slice(source: &str, range: Range<usize>) -> &str {
    source.get(range).unwrap_or_default()
}
