//! Transform system
//!
//! Keeps absolute transforms consistent down the hierarchy. Separated from
//! [`SceneGraph`](crate::scene::SceneGraph) so that it only borrows the node
//! arena.
//!
//! # Propagation
//!
//! Every node stores absolute values. When node `N` changes one channel from
//! `old` to `new`, each child `C` keeps its offset relative to `N`:
//!
//! ```text
//! rel   = relative(C.value, old)      // measured against N before the change
//! C.new = compose(rel, new)
//! ```
//!
//! and the same rule is applied to `C`'s children with `C`'s own old/new pair.
//! Only parent-before-child ordering matters; siblings are independent.
//!
//! Traversal uses an explicit stack, so deep scenes do not risk overflowing
//! the call stack. Only the changed channel is touched, so the other channels
//! of the descendants never pick up rounding error.

use glam::Vec3;
use slotmap::SlotMap;

use crate::scene::NodeHandle;
use crate::scene::node::Node;
use crate::scene::transform::{Channel, Transform};

/// Writes an absolute value of `channel` on `handle` and propagates the change
/// through its subtree.
///
/// Returns `false` if the handle is stale.
pub fn set_channel(
    nodes: &mut SlotMap<NodeHandle, Node>,
    handle: NodeHandle,
    channel: Channel,
    value: Vec3,
) -> bool {
    let Some(node) = nodes.get_mut(handle) else {
        return false;
    };

    let old = node.transform.get(channel);
    node.transform.set(channel, value);

    propagate_to_children(nodes, handle, channel, old, value);
    true
}

/// Writes all three channels of `handle` and propagates each of them.
///
/// Returns `false` if the handle is stale.
pub fn set_transform(
    nodes: &mut SlotMap<NodeHandle, Node>,
    handle: NodeHandle,
    transform: Transform,
) -> bool {
    Channel::ALL
        .into_iter()
        .all(|channel| set_channel(nodes, handle, channel, transform.get(channel)))
}

/// Re-derives the subtree below `handle` after its `channel` value went from
/// `parent_old` to `parent_new`. The node at `handle` itself is not modified.
pub fn propagate_to_children(
    nodes: &mut SlotMap<NodeHandle, Node>,
    handle: NodeHandle,
    channel: Channel,
    parent_old: Vec3,
    parent_new: Vec3,
) {
    // Work stack: (node, parent value before the change, parent value after)
    let mut stack: Vec<(NodeHandle, Vec3, Vec3)> = Vec::with_capacity(64);

    if let Some(node) = nodes.get(handle) {
        // Reverse so children are processed in stored order
        for &child in node.children.iter().rev() {
            stack.push((child, parent_old, parent_new));
        }
    }

    while let Some((node_handle, parent_old, parent_new)) = stack.pop() {
        let Some(node) = nodes.get_mut(node_handle) else {
            log::warn!("Dangling child handle {node_handle:?} skipped during propagation");
            continue;
        };

        let old = node.transform.get(channel);
        let relative = channel.relative(old, parent_old);
        let new = channel.compose(relative, parent_new);
        node.transform.set(channel, new);

        for &child in node.children.iter().rev() {
            stack.push((child, old, new));
        }
    }
}

/// Relative value of `channel` for `handle`, measured against its parent's
/// current absolute value. Returns `None` if the handle is stale.
pub fn relative_value(
    nodes: &SlotMap<NodeHandle, Node>,
    handle: NodeHandle,
    channel: Channel,
) -> Option<Vec3> {
    let node = nodes.get(handle)?;
    let parent = node.parent.and_then(|p| nodes.get(p));
    Some(node.transform.relative(channel, parent.map(|p| &p.transform)))
}

/// Sets the parent-relative value of `channel`: the absolute value becomes
/// `compose(relative, parent)`, or `relative` itself for a parentless node.
pub fn set_relative_value(
    nodes: &mut SlotMap<NodeHandle, Node>,
    handle: NodeHandle,
    channel: Channel,
    relative: Vec3,
) -> bool {
    let Some(node) = nodes.get(handle) else {
        return false;
    };

    let absolute = match node.parent.and_then(|p| nodes.get(p)) {
        Some(parent) => channel.compose(relative, parent.transform.get(channel)),
        None => relative,
    };
    set_channel(nodes, handle, channel, absolute)
}

/// Whether `ancestor` appears on the parent chain of `handle`.
/// A node is not its own descendant.
pub fn is_descendant_of(
    nodes: &SlotMap<NodeHandle, Node>,
    handle: NodeHandle,
    ancestor: NodeHandle,
) -> bool {
    let mut current = nodes.get(handle).and_then(|n| n.parent);
    while let Some(parent) = current {
        if parent == ancestor {
            return true;
        }
        current = nodes.get(parent).and_then(|n| n.parent);
    }
    false
}

/// Collects `root` and all of its descendants in pre-order.
pub fn collect_subtree(nodes: &SlotMap<NodeHandle, Node>, root: NodeHandle) -> Vec<NodeHandle> {
    DepthFirstIter::new(nodes, &[root]).map(|(handle, _)| handle).collect()
}

/// Pre-order traversal over a forest, children in stored order.
///
/// This is the order the renderer walks a scene in.
pub struct DepthFirstIter<'a> {
    nodes: &'a SlotMap<NodeHandle, Node>,
    stack: Vec<NodeHandle>,
}

impl<'a> DepthFirstIter<'a> {
    #[must_use]
    pub fn new(nodes: &'a SlotMap<NodeHandle, Node>, roots: &[NodeHandle]) -> Self {
        Self {
            nodes,
            stack: roots.iter().rev().copied().collect(),
        }
    }
}

impl<'a> Iterator for DepthFirstIter<'a> {
    type Item = (NodeHandle, &'a Node);

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(handle) = self.stack.pop() {
            let Some(node) = self.nodes.get(handle) else {
                continue;
            };
            self.stack.extend(node.children.iter().rev().copied());
            return Some((handle, node));
        }
        None
    }
}
