use std::ops::Range;

/// The narrow slice of a concrete syntax tree the extractor relies on.
///
/// Anything that can answer these questions (kind, byte span, field lookup,
/// previous sibling, ordered children) can drive [`super::extract_functions`].
/// Sibling navigation must include anonymous nodes and extras such as comments,
/// since adjacency is decided on the raw sibling chain.
pub trait SyntaxNode: Sized {
    fn kind(&self) -> &str;

    /// Half-open byte range into the source text.
    fn byte_range(&self) -> Range<usize>;

    fn child_by_field(&self, field: &str) -> Option<Self>;

    fn prev_sibling(&self) -> Option<Self>;

    fn children(&self) -> Vec<Self>;
}

impl<'tree> SyntaxNode for tree_sitter::Node<'tree> {
    fn kind(&self) -> &str {
        tree_sitter::Node::kind(self)
    }

    fn byte_range(&self) -> Range<usize> {
        tree_sitter::Node::byte_range(self)
    }

    fn child_by_field(&self, field: &str) -> Option<Self> {
        self.child_by_field_name(field)
    }

    fn prev_sibling(&self) -> Option<Self> {
        tree_sitter::Node::prev_sibling(self)
    }

    fn children(&self) -> Vec<Self> {
        let mut cursor = self.walk();
        tree_sitter::Node::children(self, &mut cursor).collect()
    }
}
