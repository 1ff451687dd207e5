//! Resource node identities
//!
//! A node is identified by `(kind, scope, name)`. The scope is the chain of
//! owning resources from the namespace down, so two rules named `default`
//! under different subscriptions never collide.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of a resource node
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeKind {
    Namespace,
    Queue,
    Topic,
    Subscription,
    Rule,
    AuthorizationRule,
    Feature,
}

impl NodeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            NodeKind::Namespace => "namespace",
            NodeKind::Queue => "queue",
            NodeKind::Topic => "topic",
            NodeKind::Subscription => "subscription",
            NodeKind::Rule => "rule",
            NodeKind::AuthorizationRule => "authorization_rule",
            NodeKind::Feature => "feature",
        }
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One owning resource in a scope path
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ScopeSegment {
    pub kind: NodeKind,
    pub name: String,
}

/// Chain of owning resources, outermost first
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ScopePath(Vec<ScopeSegment>);

impl ScopePath {
    /// The scope of a namespace node
    pub fn root() -> Self {
        Self(Vec::new())
    }

    /// Extend this scope by one owning resource
    pub fn child(&self, kind: NodeKind, name: impl Into<String>) -> Self {
        let mut segments = self.0.clone();
        segments.push(ScopeSegment {
            kind,
            name: name.into(),
        });
        Self(segments)
    }

    pub fn segments(&self) -> &[ScopeSegment] {
        &self.0
    }

    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    /// The innermost owning resource
    pub fn last(&self) -> Option<&ScopeSegment> {
        self.0.last()
    }
}

impl fmt::Display for ScopePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, segment) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str("/")?;
            }
            write!(f, "{}:{}", segment.kind, segment.name)?;
        }
        Ok(())
    }
}

/// Identity of a resource node
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct NodeId {
    pub kind: NodeKind,
    pub scope: ScopePath,
    pub name: String,
}

impl NodeId {
    pub fn new(kind: NodeKind, scope: ScopePath, name: impl Into<String>) -> Self {
        Self {
            kind,
            scope,
            name: name.into(),
        }
    }

    pub fn namespace(name: impl Into<String>) -> Self {
        Self::new(NodeKind::Namespace, ScopePath::root(), name)
    }

    /// Scope for nodes owned by this one
    pub fn child_scope(&self) -> ScopePath {
        self.scope.child(self.kind, self.name.clone())
    }

    /// Identity of a node owned by this one
    pub fn child(&self, kind: NodeKind, name: impl Into<String>) -> NodeId {
        NodeId::new(kind, self.child_scope(), name)
    }

    /// Identity of the owning node, if any
    pub fn parent(&self) -> Option<NodeId> {
        let segments = self.scope.segments();
        let (last, rest) = segments.split_last()?;
        Some(NodeId::new(
            last.kind,
            ScopePath(rest.to_vec()),
            last.name.clone(),
        ))
    }

    /// Name of the namespace this node lives in
    pub fn namespace_name(&self) -> &str {
        match self.scope.segments().first() {
            Some(segment) => &segment.name,
            None => &self.name,
        }
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.scope.is_root() {
            write!(f, "{}:{}", self.kind, self.name)
        } else {
            write!(f, "{}/{}:{}", self.scope, self.kind, self.name)
        }
    }
}
