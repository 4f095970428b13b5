//! Chainable node operation wrapper.
//!
//! [`SceneNode`] borrows a [`SceneGraph`] mutably and provides a fluent API
//! for transforming one node. Every call goes through the graph, so the
//! change is propagated to the node's descendants.
//!
//! All methods silently no-op when the handle is stale, so users never
//! encounter panics from dangling handles.
//!
//! # Example
//!
//! ```rust,ignore
//! graph.node(handle)
//!     .set_position_rel(10.0, 20.0, 30.0)
//!     .translate(10.0, 10.0, 10.0)
//!     .rotate(0.0, 90.0, 0.0)
//!     .scale(2.0, 2.0, 2.0);
//! ```
#![allow(clippy::return_self_not_must_use)]
#![allow(clippy::must_use_candidate)]
use glam::Vec3;

use crate::scene::NodeHandle;
use crate::scene::graph::SceneGraph;

/// Temporary mutable borrow of a scene node for chainable operations.
pub struct SceneNode<'a> {
    graph: &'a mut SceneGraph,
    handle: NodeHandle,
}

impl<'a> SceneNode<'a> {
    #[inline]
    pub fn new(graph: &'a mut SceneGraph, handle: NodeHandle) -> Self {
        Self { graph, handle }
    }

    /// Returns the underlying handle.
    #[inline]
    #[must_use]
    pub fn handle(&self) -> NodeHandle {
        self.handle
    }

    // -- Absolute transform (chainable) --

    /// Sets the absolute position.
    #[inline]
    pub fn set_position(self, x: f32, y: f32, z: f32) -> Self {
        self.set_position_vec(Vec3::new(x, y, z))
    }

    #[inline]
    pub fn set_position_vec(self, position: Vec3) -> Self {
        self.graph.set_position(self.handle, position);
        self
    }

    /// Moves the node by an absolute offset.
    #[inline]
    pub fn translate(self, x: f32, y: f32, z: f32) -> Self {
        self.graph.translate(self.handle, Vec3::new(x, y, z));
        self
    }

    /// Sets the absolute rotation (Euler degrees).
    #[inline]
    pub fn set_rotation(self, x: f32, y: f32, z: f32) -> Self {
        self.graph.set_rotation(self.handle, Vec3::new(x, y, z));
        self
    }

    /// Adds Euler degrees to the absolute rotation.
    #[inline]
    pub fn rotate(self, x: f32, y: f32, z: f32) -> Self {
        self.graph.rotate(self.handle, Vec3::new(x, y, z));
        self
    }

    /// Sets the absolute scale.
    #[inline]
    pub fn set_scale(self, x: f32, y: f32, z: f32) -> Self {
        self.graph.set_scale(self.handle, Vec3::new(x, y, z));
        self
    }

    /// Multiplies the absolute scale component-wise.
    #[inline]
    pub fn scale(self, x: f32, y: f32, z: f32) -> Self {
        self.graph.scale(self.handle, Vec3::new(x, y, z));
        self
    }

    // -- Parent-relative transform (chainable) --

    #[inline]
    pub fn set_position_rel(self, x: f32, y: f32, z: f32) -> Self {
        self.graph.set_position_rel(self.handle, Vec3::new(x, y, z));
        self
    }

    #[inline]
    pub fn set_rotation_rel(self, x: f32, y: f32, z: f32) -> Self {
        self.graph.set_rotation_rel(self.handle, Vec3::new(x, y, z));
        self
    }

    #[inline]
    pub fn set_scale_rel(self, x: f32, y: f32, z: f32) -> Self {
        self.graph.set_scale_rel(self.handle, Vec3::new(x, y, z));
        self
    }

    // -- Hierarchy & editor state --

    /// Attaches `child` under this node.
    #[inline]
    pub fn add_child(self, child: NodeHandle) -> Self {
        self.graph.add_child(self.handle, child);
        self
    }

    #[inline]
    pub fn set_name(self, name: &str) -> Self {
        if let Some(node) = self.graph.get_node_mut(self.handle) {
            node.name = name.to_string();
        }
        self
    }

    #[inline]
    pub fn set_active(self, active: bool) -> Self {
        if let Some(node) = self.graph.get_node_mut(self.handle) {
            node.active = active;
        }
        self
    }
}
