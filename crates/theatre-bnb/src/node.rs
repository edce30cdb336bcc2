// Copyright (c) 2025 Felix Kahle.
//
// Permission is hereby granted, free of charge, to any person obtaining
// a copy of this software and associated documentation files (the
// "Software"), to deal in the Software without restriction, including
// without limitation the rights to use, copy, modify, merge, publish,
// distribute, sublicense, and/or sell copies of the Software, and to
// permit persons to whom the Software is furnished to do so, subject to
// the following conditions:
//
// The above copyright notice and this permission notice shall be
// included in all copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND,
// EXPRESS OR IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF
// MERCHANTABILITY, FITNESS FOR A PARTICULAR PURPOSE AND
// NONINFRINGEMENT. IN NO EVENT SHALL THE AUTHORS OR COPYRIGHT HOLDERS BE
// LIABLE FOR ANY CLAIM, DAMAGES OR OTHER LIABILITY, WHETHER IN AN ACTION
// OF CONTRACT, TORT OR OTHERWISE, ARISING FROM, OUT OF OR IN CONNECTION
// WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE SOFTWARE.

//! Search nodes.
//!
//! A node is the root problem plus its `BoundOverrides`. Nodes are kept in
//! an arena for the lifetime of one search; the frontier refers to them by
//! `NodeIndex`. Once a node is resolved its overrides are dropped, so a
//! long search holds bound sets only for the nodes still on the frontier.

use crate::monitor::tree_search_monitor::PruneReason;
use theatre_core::index::{TypedIndex, TypedIndexTag};
use theatre_lp::bounds::BoundOverrides;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeIndexTag;

impl TypedIndexTag for NodeIndexTag {
    const NAME: &'static str = "NodeIndex";
}

pub type NodeIndex = TypedIndex<NodeIndexTag>;

/// Lifecycle of a search node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeStatus {
    /// Created, waiting on the frontier.
    Active,
    /// Its relaxation was integral and became a candidate solution.
    SolvedInteger,
    /// Discarded without children.
    Pruned(PruneReason),
    /// Split into two children.
    Branched,
}

impl NodeStatus {
    #[inline]
    pub fn is_active(&self) -> bool {
        matches!(self, NodeStatus::Active)
    }
}

impl std::fmt::Display for NodeStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NodeStatus::Active => write!(f, "Active"),
            NodeStatus::SolvedInteger => write!(f, "SolvedInteger"),
            NodeStatus::Pruned(reason) => write!(f, "Pruned({})", reason),
            NodeStatus::Branched => write!(f, "Branched"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SearchNode {
    index: NodeIndex,
    parent: Option<NodeIndex>,
    depth: usize,
    overrides: BoundOverrides,
    bound: f64,
    status: NodeStatus,
}

impl SearchNode {
    #[inline]
    pub fn index(&self) -> NodeIndex {
        self.index
    }

    #[inline]
    pub fn parent(&self) -> Option<NodeIndex> {
        self.parent
    }

    #[inline]
    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }

    /// Number of branchings between the root and this node.
    #[inline]
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// The bound overrides of this node. Empty once the node is resolved.
    #[inline]
    pub fn overrides(&self) -> &BoundOverrides {
        &self.overrides
    }

    /// The best bound known for this node: its own relaxation objective once
    /// solved, the parent's before that, `+inf` for an unsolved root.
    #[inline]
    pub fn bound(&self) -> f64 {
        self.bound
    }

    #[inline]
    pub fn status(&self) -> NodeStatus {
        self.status
    }
}

impl std::fmt::Display for SearchNode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "SearchNode({}, depth: {}, bound: {}, status: {})",
            self.index.get(),
            self.depth,
            self.bound,
            self.status
        )
    }
}

/// Owns every node created during one search.
#[derive(Debug, Clone, Default)]
pub(crate) struct NodeArena {
    nodes: Vec<SearchNode>,
}

impl NodeArena {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[inline]
    pub fn clear(&mut self) {
        self.nodes.clear();
    }

    #[inline]
    pub fn get(&self, index: NodeIndex) -> &SearchNode {
        &self.nodes[index.get()]
    }

    /// Creates the root node with no overrides and an unknown bound.
    pub fn push_root(&mut self) -> NodeIndex {
        let index = NodeIndex::new(self.nodes.len());
        self.nodes.push(SearchNode {
            index,
            parent: None,
            depth: 0,
            overrides: BoundOverrides::new(),
            bound: f64::INFINITY,
            status: NodeStatus::Active,
        });
        index
    }

    /// Creates a child of `parent` that inherits the parent's bound.
    pub fn push_child(&mut self, parent: NodeIndex, overrides: BoundOverrides) -> NodeIndex {
        let index = NodeIndex::new(self.nodes.len());
        let (depth, bound) = {
            let p = self.get(parent);
            (p.depth + 1, p.bound)
        };
        self.nodes.push(SearchNode {
            index,
            parent: Some(parent),
            depth,
            overrides,
            bound,
            status: NodeStatus::Active,
        });
        index
    }

    #[inline]
    pub fn set_bound(&mut self, index: NodeIndex, bound: f64) {
        self.nodes[index.get()].bound = bound;
    }

    /// Resolves a node. Its overrides are no longer needed and are released.
    pub fn retire(&mut self, index: NodeIndex, status: NodeStatus) {
        let node = &mut self.nodes[index.get()];
        debug_assert!(node.status.is_active(), "{} resolved twice", index);
        node.status = status;
        node.overrides = BoundOverrides::new();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use theatre_model::index::ProcedureIndex;

    #[test]
    fn test_children_inherit_depth_and_bound() {
        let mut arena = NodeArena::new();
        let root = arena.push_root();
        assert!(arena.get(root).is_root());
        assert_eq!(arena.get(root).bound(), f64::INFINITY);

        arena.set_bound(root, 12.5);
        let overrides = BoundOverrides::new().with_upper(ProcedureIndex::new(1), 0);
        let child = arena.push_child(root, overrides.clone());

        let node = arena.get(child);
        assert_eq!(node.parent(), Some(root));
        assert_eq!(node.depth(), 1);
        assert_eq!(node.bound(), 12.5);
        assert_eq!(node.overrides(), &overrides);
        assert_eq!(arena.len(), 2);
    }

    #[test]
    fn test_retire_releases_overrides() {
        let mut arena = NodeArena::new();
        let root = arena.push_root();
        let child =
            arena.push_child(root, BoundOverrides::new().with_lower(ProcedureIndex::new(0), 2));

        arena.retire(child, NodeStatus::Pruned(PruneReason::Infeasible));
        let node = arena.get(child);
        assert_eq!(node.status(), NodeStatus::Pruned(PruneReason::Infeasible));
        assert!(node.overrides().is_empty());
        assert!(arena.get(root).status().is_active());
    }

    #[test]
    fn test_display() {
        let mut arena = NodeArena::new();
        let root = arena.push_root();
        arena.set_bound(root, 4.0);
        arena.retire(root, NodeStatus::Branched);
        assert_eq!(
            arena.get(root).to_string(),
            "SearchNode(0, depth: 0, bound: 4, status: Branched)"
        );
    }
}
