//! Indented text rendering of BSP trees.

use std::fmt::{self, Write};

use crate::Hyperplane;

use super::node::{NodeData, NodeId};
use super::tree::BspTree;

const INDENT: &str = "    ";

impl<H: Hyperplane, D: NodeData> BspTree<H, D> {
    /// Renders the tree, one node per line, down to `max_depth`.
    ///
    /// Internal nodes show their cut, leaves their data. Subtrees deeper than
    /// `max_depth` are replaced by a single `...` line.
    pub fn tree_string(&self, max_depth: usize) -> String {
        let mut out = String::new();
        // Writing into a String cannot fail.
        let _ = self.write_tree(&mut out, "BspTree", max_depth, |data: &D| format!("{data:?}"));
        out
    }

    /// Writes a `name` header and the tree to `out`, describing leaves with `describe_leaf`.
    pub(crate) fn write_tree<W, F>(&self, out: &mut W, name: &str, max_depth: usize, describe_leaf: F) -> fmt::Result
    where
        W: Write,
        F: Fn(&D) -> String,
    {
        writeln!(out, "{name}")?;
        self.write_node(out, self.root(), "root", 0, max_depth, &describe_leaf)
    }

    fn write_node<W, F>(
        &self,
        out: &mut W,
        node: NodeId,
        label: &str,
        depth: usize,
        max_depth: usize,
        describe_leaf: &F,
    ) -> fmt::Result
    where
        W: Write,
        F: Fn(&D) -> String,
    {
        let indent = INDENT.repeat(depth);
        if depth > max_depth {
            return writeln!(out, "{indent}...");
        }

        let n = &self[node];
        match (n.cut(), n.children()) {
            (Some(cut), Some((minus, plus))) => {
                writeln!(out, "{indent}{label}: cut {cut:?}")?;
                self.write_node(out, minus, "minus", depth + 1, max_depth, describe_leaf)?;
                self.write_node(out, plus, "plus", depth + 1, max_depth, describe_leaf)
            }
            _ => writeln!(out, "{indent}{label}: leaf {}", describe_leaf(n.data())),
        }
    }
}

impl<H: Hyperplane, D: NodeData> fmt::Display for BspTree<H, D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write_tree(f, "BspTree", usize::MAX, |data: &D| format!("{data:?}"))
    }
}
