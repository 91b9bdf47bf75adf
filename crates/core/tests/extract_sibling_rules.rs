//! Exercises the extraction walk against a hand-built tree, independent of any grammar.

use std::ops::Range;

use scout_core::extract::{extract_functions, NodeKinds, SyntaxNode};

const KINDS: NodeKinds = NodeKinds {
    function: "fn_def",
    attribute: "attr",
    line_comment: "comment",
    name_field: "name",
};

struct FakeData {
    kind: &'static str,
    range: Range<usize>,
    parent: Option<usize>,
    children: Vec<usize>,
    name: Option<usize>,
}

/// Builds a source string and a matching tree, one line per leaf.
struct FakeTree {
    source: String,
    nodes: Vec<FakeData>,
}

impl FakeTree {
    fn new() -> Self {
        let root =
            FakeData { kind: "root", range: 0..0, parent: None, children: vec![], name: None };
        Self { source: String::new(), nodes: vec![root] }
    }

    fn push(&mut self, parent: usize, kind: &'static str, range: Range<usize>) -> usize {
        let id = self.nodes.len();
        self.nodes.push(FakeData {
            kind,
            range,
            parent: Some(parent),
            children: vec![],
            name: None,
        });
        self.nodes[parent].children.push(id);
        id
    }

    fn leaf(&mut self, parent: usize, kind: &'static str, text: &str) -> usize {
        let start = self.source.len();
        self.source.push_str(text);
        let id = self.push(parent, kind, start..self.source.len());
        self.source.push('\n');
        id
    }

    /// `fn <name>() {` ... `}` with children added by `body`.
    fn function(
        &mut self,
        parent: usize,
        name: Option<&str>,
        body: impl FnOnce(&mut FakeTree, usize),
    ) -> usize {
        let start = self.source.len();
        let id = self.push(parent, KINDS.function, start..start);
        self.source.push_str("fn ");
        if let Some(name) = name {
            let name_start = self.source.len();
            self.source.push_str(name);
            let name_id = self.push(id, "identifier", name_start..self.source.len());
            self.nodes[id].name = Some(name_id);
        }
        self.source.push_str("() {\n");
        body(self, id);
        self.source.push('}');
        self.nodes[id].range.end = self.source.len();
        self.source.push('\n');
        id
    }

    fn root(&self) -> FakeNode<'_> {
        FakeNode { tree: self, id: 0 }
    }
}

#[derive(Clone, Copy)]
struct FakeNode<'t> {
    tree: &'t FakeTree,
    id: usize,
}

impl<'t> FakeNode<'t> {
    fn data(&self) -> &'t FakeData {
        &self.tree.nodes[self.id]
    }
}

impl<'t> SyntaxNode for FakeNode<'t> {
    fn kind(&self) -> &str {
        self.data().kind
    }

    fn byte_range(&self) -> Range<usize> {
        self.data().range.clone()
    }

    fn child_by_field(&self, field: &str) -> Option<Self> {
        match field {
            "name" => self.data().name.map(|id| FakeNode { tree: self.tree, id }),
            _ => None,
        }
    }

    fn prev_sibling(&self) -> Option<Self> {
        let parent = &self.tree.nodes[self.data().parent?];
        let pos = parent.children.iter().position(|&c| c == self.id)?;
        let prev = *parent.children.get(pos.checked_sub(1)?)?;
        Some(FakeNode { tree: self.tree, id: prev })
    }

    fn children(&self) -> Vec<Self> {
        self.data().children.iter().map(|&id| FakeNode { tree: self.tree, id }).collect()
    }
}

#[test]
fn attributes_and_comments_are_read_from_the_function_node() {
    let mut tree = FakeTree::new();
    tree.leaf(0, "comment", "// far");
    tree.leaf(0, "attr", "#[one]");
    tree.leaf(0, "attr", "#[two]");
    tree.function(0, Some("f"), |_, _| {});

    let functions = extract_functions(tree.root(), &tree.source, &KINDS);
    assert_eq!(functions.len(), 1);
    assert_eq!(functions[0].attributes, vec!["#[one]", "#[two]"]);
    assert_eq!(functions[0].docstring, None);
}

#[test]
fn attribute_chain_stops_at_first_other_sibling() {
    let mut tree = FakeTree::new();
    tree.leaf(0, "attr", "#[hidden]");
    tree.leaf(0, "use_decl", "use x;");
    tree.leaf(0, "attr", "#[seen]");
    tree.function(0, Some("f"), |_, _| {});

    let functions = extract_functions(tree.root(), &tree.source, &KINDS);
    assert_eq!(functions[0].attributes, vec!["#[seen]"]);
}

#[test]
fn functions_without_a_name_child_are_dropped() {
    let mut tree = FakeTree::new();
    tree.function(0, None, |_, _| {});
    tree.function(0, Some("named"), |_, _| {});
    tree.function(0, Some(""), |_, _| {});

    let functions = extract_functions(tree.root(), &tree.source, &KINDS);
    let names: Vec<_> = functions.iter().map(|f| f.name.as_str()).collect();
    assert_eq!(names, vec!["named"]);
}

#[test]
fn nested_functions_use_their_own_siblings_and_preorder() {
    let mut tree = FakeTree::new();
    tree.leaf(0, "comment", "// outer doc");
    tree.function(0, Some("outer"), |t, outer| {
        t.leaf(outer, "attr", "#[inner_attr]");
        t.function(outer, Some("inner"), |t, inner| {
            t.leaf(inner, "comment", "// deepest doc");
            t.function(inner, Some("deepest"), |_, _| {});
        });
    });
    tree.function(0, Some("after"), |_, _| {});

    let functions = extract_functions(tree.root(), &tree.source, &KINDS);
    let names: Vec<_> = functions.iter().map(|f| f.name.as_str()).collect();
    assert_eq!(names, vec!["outer", "inner", "deepest", "after"]);

    assert_eq!(functions[0].docstring.as_deref(), Some("// outer doc"));
    assert_eq!(functions[1].attributes, vec!["#[inner_attr]"]);
    assert_eq!(functions[1].docstring, None);
    assert_eq!(functions[2].docstring.as_deref(), Some("// deepest doc"));
    assert!(functions[3].attributes.is_empty());
    assert_eq!(functions[3].docstring, None, "previous sibling is a function, not a comment");
}

#[test]
fn content_and_lines_follow_the_node_range() {
    let mut tree = FakeTree::new();
    tree.leaf(0, "comment", "// header");
    tree.function(0, Some("body"), |t, f| {
        t.leaf(f, "stmt", "    let x = 1;");
    });

    let functions = extract_functions(tree.root(), &tree.source, &KINDS);
    let f = &functions[0];
    assert_eq!(f.content, "fn body() {\n    let x = 1;\n}");
    assert_eq!((f.start_line, f.end_line), (2, 4));
    assert!(f.start_line <= f.end_line);
}
