//! Resource graph storage

use crate::error::{GraphError, Result};
use crate::node::{EdgeKind, ResourceNode};
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;
use petgraph::Direction;
use sbmod_types::{NodeId, NodeKind};
use std::collections::HashMap;

/// Directed ownership graph of resource nodes.
///
/// Edges point from owner to owned. Iteration is dependency pre-order:
/// every node comes after its owner, and siblings keep insertion order.
#[derive(Debug, Clone, Default)]
pub struct ResourceGraph {
    graph: DiGraph<ResourceNode, EdgeKind>,
    index: HashMap<NodeId, NodeIndex>,
}

impl ResourceGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.graph.node_count()
    }

    pub fn is_empty(&self) -> bool {
        self.graph.node_count() == 0
    }

    pub fn contains(&self, id: &NodeId) -> bool {
        self.index.contains_key(id)
    }

    pub fn get(&self, id: &NodeId) -> Option<&ResourceNode> {
        self.index.get(id).map(|idx| &self.graph[*idx])
    }

    /// The first namespace node
    pub fn namespace(&self) -> Option<&ResourceNode> {
        self.roots()
            .map(|idx| &self.graph[idx])
            .find(|node| node.kind() == NodeKind::Namespace)
    }

    pub fn parent(&self, id: &NodeId) -> Option<&ResourceNode> {
        let idx = self.index.get(id)?;
        self.graph
            .edges_directed(*idx, Direction::Incoming)
            .next()
            .map(|edge| &self.graph[edge.source()])
    }

    /// Edge between a node and its owner
    pub fn edge_to(&self, id: &NodeId) -> Option<EdgeKind> {
        let idx = self.index.get(id)?;
        self.graph
            .edges_directed(*idx, Direction::Incoming)
            .next()
            .map(|edge| *edge.weight())
    }

    /// Directly owned nodes, in insertion order
    pub fn children(&self, id: &NodeId) -> Vec<&ResourceNode> {
        match self.index.get(id) {
            Some(idx) => self
                .child_indices(*idx)
                .into_iter()
                .map(|child| &self.graph[child])
                .collect(),
            None => Vec::new(),
        }
    }

    /// Every node in dependency pre-order
    pub fn nodes(&self) -> Vec<&ResourceNode> {
        let mut ordered = Vec::with_capacity(self.graph.node_count());
        let mut stack: Vec<NodeIndex> = self.roots().collect();
        stack.reverse();

        while let Some(idx) = stack.pop() {
            ordered.push(&self.graph[idx]);
            let mut children = self.child_indices(idx);
            children.reverse();
            stack.extend(children);
        }

        ordered
    }

    pub fn nodes_of_kind(&self, kind: NodeKind) -> impl Iterator<Item = &ResourceNode> {
        self.nodes().into_iter().filter(move |node| node.kind() == kind)
    }

    /// Insert a node, or replace the payload of an existing one.
    ///
    /// A new node is linked under `parent`, which must already exist. An
    /// existing node keeps its owner; asking for a different owner fails.
    pub fn upsert(
        &mut self,
        node: ResourceNode,
        parent: Option<&NodeId>,
        edge: EdgeKind,
    ) -> Result<()> {
        let parent_idx = match parent {
            Some(parent_id) => Some(
                *self
                    .index
                    .get(parent_id)
                    .ok_or_else(|| GraphError::MissingParent(parent_id.clone()))?,
            ),
            None => None,
        };

        if let Some(idx) = self.index.get(&node.id).copied() {
            let existing = self
                .graph
                .edges_directed(idx, Direction::Incoming)
                .next()
                .map(|e| e.source());
            if let (Some(existing), Some(requested)) = (existing, parent_idx) {
                if existing != requested {
                    return Err(GraphError::ParentMismatch {
                        node: node.id.clone(),
                        existing: self.graph[existing].id.clone(),
                        requested: self.graph[requested].id.clone(),
                    });
                }
            }
            self.graph[idx] = node;
            return Ok(());
        }

        self.insert(node, parent_idx, edge);
        Ok(())
    }

    /// Infallible insert used while building from a validated configuration
    pub(crate) fn insert(
        &mut self,
        node: ResourceNode,
        parent: Option<NodeIndex>,
        edge: EdgeKind,
    ) -> NodeIndex {
        if let Some(idx) = self.index.get(&node.id).copied() {
            self.graph[idx] = node;
            return idx;
        }

        let id = node.id.clone();
        let idx = self.graph.add_node(node);
        if let Some(parent) = parent {
            self.graph.add_edge(parent, idx, edge);
        }
        self.index.insert(id, idx);
        idx
    }

    fn roots(&self) -> impl Iterator<Item = NodeIndex> + '_ {
        self.graph.node_indices().filter(|idx| {
            self.graph
                .edges_directed(*idx, Direction::Incoming)
                .next()
                .is_none()
        })
    }

    fn child_indices(&self, idx: NodeIndex) -> Vec<NodeIndex> {
        let mut children: Vec<NodeIndex> = self
            .graph
            .edges_directed(idx, Direction::Outgoing)
            .map(|edge| edge.target())
            .collect();
        children.sort();
        children
    }
}

impl PartialEq for ResourceGraph {
    /// Same nodes, same ownership, same order
    fn eq(&self, other: &Self) -> bool {
        let ours = self.nodes();
        let theirs = other.nodes();
        ours.len() == theirs.len()
            && ours.iter().zip(theirs.iter()).all(|(a, b)| {
                a == b && self.parent(&a.id).map(|p| &p.id) == other.parent(&b.id).map(|p| &p.id)
            })
    }
}

impl Eq for ResourceGraph {}
