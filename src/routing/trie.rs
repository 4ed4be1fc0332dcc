//! Segment trie used by the router, one tree per HTTP method.
//!
//! # Matching Rules
//! - Insertion reuses a child whose segment equals the incoming one, or the
//!   first capture child at that level, before creating a new child.
//! - Search considers every child that matches literally or is a capture,
//!   depth-first in insertion order, and returns the first terminal found.
//! - A node whose own segment starts with `*` ends the search immediately.
//!
//! The tree is append-only: nodes are created during registration and are
//! never removed.

use super::pattern::is_capture;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct Node {
    /// Full registered pattern, present only on terminal nodes.
    pattern: Option<String>,
    /// Raw segment text, e.g. `p`, `:lang` or `*filepath`. Empty on the root.
    part: String,
    children: Vec<Node>,
    is_wild: bool,
}

impl Node {
    fn child(part: &str) -> Self {
        Self {
            pattern: None,
            part: part.to_owned(),
            children: Vec::new(),
            is_wild: is_capture(part),
        }
    }

    pub(crate) fn pattern(&self) -> Option<&str> {
        self.pattern.as_deref()
    }

    /// First child matching `part` literally, or the first capture child.
    fn match_child(&self, part: &str) -> Option<usize> {
        self.children
            .iter()
            .position(|child| child.part == part || child.is_wild)
    }

    /// Every child matching `part` literally or by capture, in insertion order.
    fn match_children<'n, 'p>(&'n self, part: &'p str) -> impl Iterator<Item = &'n Node> {
        self.children
            .iter()
            .filter(move |child| child.part == part || child.is_wild)
    }

    /// Inserts `parts[height..]` below this node and marks the last node as
    /// terminal for `pattern`. Re-inserting overwrites the terminal marker.
    pub(crate) fn insert(&mut self, pattern: &str, parts: &[&str], height: usize) {
        if parts.len() == height {
            self.pattern = Some(pattern.to_owned());
            return;
        }

        let part = parts[height];
        let index = match self.match_child(part) {
            Some(index) => index,
            None => {
                self.children.push(Node::child(part));
                self.children.len() - 1
            }
        };

        self.children[index].insert(pattern, parts, height + 1);
    }

    /// Backtracking search for the terminal node matching `parts`.
    pub(crate) fn search(&self, parts: &[&str], height: usize) -> Option<&Node> {
        if parts.len() == height || self.part.starts_with('*') {
            return self.pattern.as_ref().map(|_| self);
        }

        let part = parts[height];
        self.match_children(part)
            .find_map(|child| child.search(parts, height + 1))
    }

    /// Collects every terminal node below (and including) this one, depth-first.
    pub(crate) fn travel<'n>(&'n self, out: &mut Vec<&'n Node>) {
        if self.pattern.is_some() {
            out.push(self);
        }
        for child in &self.children {
            child.travel(out);
        }
    }
}
