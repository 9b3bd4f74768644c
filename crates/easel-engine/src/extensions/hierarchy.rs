// extensions/hierarchy.rs
//
// Transform hierarchy — an arena of Transforms linked by parent/child handles.
//
// The graph owns every Transform; a parent owns only the *membership* of its
// children list. Parent links and children lists are kept consistent in both
// directions by every edit, so callers never patch one side by hand.
//
// Usage:
//   let mut graph = TransformGraph::new();
//   let body = graph.create();
//   let arm = graph.create();
//   graph.add_child(body, arm)?;
//   let world = graph.composed_world_matrix(arm);

use std::collections::HashMap;
use std::fmt;
use glam::Mat4;
use crate::api::types::TransformId;
use super::transform::Transform;

/// Why a hierarchy query or edit was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransformError {
    /// The handle does not refer to a live transform.
    UnknownTransform(TransformId),
    /// Child index past the end of the children list.
    OutOfRange { index: usize, len: usize },
    /// `child` is not in `parent`'s children list.
    NotFound { parent: TransformId, child: TransformId },
    /// Linking would make a transform its own ancestor.
    CycleDetected { parent: TransformId, child: TransformId },
}

impl fmt::Display for TransformError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransformError::UnknownTransform(id) => write!(f, "unknown transform {}", id.0),
            TransformError::OutOfRange { index, len } => {
                write!(f, "child index {} out of range (len {})", index, len)
            }
            TransformError::NotFound { parent, child } => {
                write!(f, "transform {} is not a child of {}", child.0, parent.0)
            }
            TransformError::CycleDetected { parent, child } => {
                write!(f, "parenting {} under {} would create a cycle", child.0, parent.0)
            }
        }
    }
}

impl std::error::Error for TransformError {}

/// Node in the transform hierarchy.
#[derive(Debug, Clone, Default)]
struct TransformNode {
    transform: Transform,
    parent: Option<TransformId>,
    children: Vec<TransformId>,
}

/// Arena of transforms with parent/child links.
#[derive(Debug, Default)]
pub struct TransformGraph {
    nodes: HashMap<TransformId, TransformNode>,
    /// Transforms with no parent, in creation order.
    roots: Vec<TransformId>,
    next_id: u32,
}

impl TransformGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an identity transform as a new root.
    pub fn create(&mut self) -> TransformId {
        self.insert(Transform::new())
    }

    /// Add `transform` as a new root and return its handle.
    pub fn insert(&mut self, transform: Transform) -> TransformId {
        let id = TransformId(self.next_id);
        self.next_id += 1;
        self.nodes.insert(id, TransformNode {
            transform,
            ..Default::default()
        });
        self.roots.push(id);
        id
    }

    /// Remove a transform. It is detached from its parent and its children
    /// become roots (no cascade).
    pub fn remove(&mut self, id: TransformId) -> Option<Transform> {
        let node = self.nodes.remove(&id)?;

        if let Some(parent) = node.parent {
            if let Some(parent_node) = self.nodes.get_mut(&parent) {
                parent_node.children.retain(|&c| c != id);
            }
        }

        for child in &node.children {
            if let Some(child_node) = self.nodes.get_mut(child) {
                child_node.parent = None;
            }
            if !self.roots.contains(child) {
                self.roots.push(*child);
            }
        }

        self.roots.retain(|&r| r != id);
        log::debug!("transform {} removed, {} children orphaned", id.0, node.children.len());
        Some(node.transform)
    }

    pub fn contains(&self, id: TransformId) -> bool {
        self.nodes.contains_key(&id)
    }

    pub fn get(&self, id: TransformId) -> Option<&Transform> {
        self.nodes.get(&id).map(|n| &n.transform)
    }

    pub fn get_mut(&mut self, id: TransformId) -> Option<&mut Transform> {
        self.nodes.get_mut(&id).map(|n| &mut n.transform)
    }

    // -- Hierarchy edits --

    /// Append `child` to `parent`'s children and point `child` at `parent`.
    ///
    /// A child already under another parent is moved. Adding an existing
    /// child again is a no-op, so the list never holds duplicates.
    pub fn add_child(&mut self, parent: TransformId, child: TransformId) -> Result<(), TransformError> {
        self.set_parent(child, Some(parent))
    }

    /// Re-parent `child`. `None` makes it a root.
    pub fn set_parent(&mut self, child: TransformId, parent: Option<TransformId>) -> Result<(), TransformError> {
        let old_parent = self.node(child)?.parent;
        if let Some(p) = parent {
            self.node(p)?;
            if self.is_ancestor_or_self(child, p) {
                log::warn!("rejected re-parenting {} under {}: cycle", child.0, p.0);
                return Err(TransformError::CycleDetected { parent: p, child });
            }
        }
        if old_parent == parent {
            return Ok(());
        }

        self.detach(child);

        match parent {
            Some(p) => {
                if let Some(parent_node) = self.nodes.get_mut(&p) {
                    parent_node.children.push(child);
                }
                if let Some(child_node) = self.nodes.get_mut(&child) {
                    child_node.parent = Some(p);
                }
            }
            None => self.roots.push(child),
        }
        Ok(())
    }

    /// Remove `child` from `parent`'s children; it becomes a root.
    ///
    /// Fails with `NotFound` (and changes nothing) if `child` is not
    /// currently a child of `parent`.
    pub fn remove_child(&mut self, parent: TransformId, child: TransformId) -> Result<(), TransformError> {
        let index = self
            .child_index(parent, child)
            .ok_or(TransformError::NotFound { parent, child })?;
        self.remove_child_at(parent, index).map(|_| ())
    }

    /// Remove the child at `index`; it becomes a root. Returns its handle.
    pub fn remove_child_at(&mut self, parent: TransformId, index: usize) -> Result<TransformId, TransformError> {
        let child = self.child(parent, index)?;
        self.detach(child);
        self.roots.push(child);
        Ok(child)
    }

    // -- Hierarchy queries --

    pub fn parent(&self, id: TransformId) -> Option<TransformId> {
        self.nodes.get(&id).and_then(|n| n.parent)
    }

    /// Children of `id` in insertion order.
    pub fn children(&self, id: TransformId) -> Option<&[TransformId]> {
        self.nodes.get(&id).map(|n| n.children.as_slice())
    }

    pub fn child(&self, parent: TransformId, index: usize) -> Result<TransformId, TransformError> {
        let children = &self.node(parent)?.children;
        children
            .get(index)
            .copied()
            .ok_or(TransformError::OutOfRange { index, len: children.len() })
    }

    /// Position of `child` in `parent`'s children, `None` if absent.
    pub fn child_index(&self, parent: TransformId, child: TransformId) -> Option<usize> {
        self.nodes
            .get(&parent)
            .and_then(|n| n.children.iter().position(|&c| c == child))
    }

    /// Number of direct children. 0 for an unknown handle.
    pub fn child_count(&self, id: TransformId) -> usize {
        self.nodes.get(&id).map_or(0, |n| n.children.len())
    }

    /// Transforms with no parent.
    pub fn roots(&self) -> &[TransformId] {
        &self.roots
    }

    // -- Composition --

    /// World matrix including every ancestor: `root · … · parent · self`.
    pub fn composed_world_matrix(&self, id: TransformId) -> Option<Mat4> {
        self.compose(id, |t| t.world_matrix())
    }

    /// Inverse-transpose of `composed_world_matrix`, built from the
    /// per-transform cached inverse-transposes.
    pub fn composed_world_inverse_transpose(&self, id: TransformId) -> Option<Mat4> {
        self.compose(id, |t| t.world_inverse_transpose_matrix())
    }

    fn compose(&self, id: TransformId, local: impl Fn(&Transform) -> Mat4) -> Option<Mat4> {
        let node = self.nodes.get(&id)?;
        let mut matrix = local(&node.transform);
        let mut current = node.parent;
        while let Some(pid) = current {
            let Some(parent) = self.nodes.get(&pid) else { break };
            matrix = local(&parent.transform) * matrix;
            current = parent.parent;
        }
        Some(matrix)
    }

    /// Number of transforms in the graph.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Drop every transform. Handles are not reused afterwards.
    pub fn clear(&mut self) {
        self.nodes.clear();
        self.roots.clear();
    }

    fn node(&self, id: TransformId) -> Result<&TransformNode, TransformError> {
        self.nodes.get(&id).ok_or(TransformError::UnknownTransform(id))
    }

    /// Unlink `id` from its parent (or from the root list).
    fn detach(&mut self, id: TransformId) {
        let old_parent = self.nodes.get_mut(&id).and_then(|n| n.parent.take());
        match old_parent {
            Some(p) => {
                if let Some(parent_node) = self.nodes.get_mut(&p) {
                    parent_node.children.retain(|&c| c != id);
                }
            }
            None => self.roots.retain(|&r| r != id),
        }
    }

    /// Whether `ancestor` is `id` or one of its ancestors.
    fn is_ancestor_or_self(&self, ancestor: TransformId, id: TransformId) -> bool {
        let mut current = Some(id);
        while let Some(cur) = current {
            if cur == ancestor {
                return true;
            }
            current = self.parent(cur);
        }
        false
    }
}
