use glam::{Affine3A, Vec3};

use crate::scene::NodeHandle;
use crate::scene::graph::SceneId;
use crate::scene::transform::Transform;

/// A game object of the scene graph.
///
/// # Hierarchy
///
/// Nodes form a forest through parent-child relationships:
/// - `parent`: handle of the parent node (None for roots and detached nodes)
/// - `children`: child handles in insertion order
/// - `graph`: id of the [`SceneGraph`](crate::scene::SceneGraph) owning the node
///
/// The links are plain handles; the nodes themselves live in the graph's arena.
///
/// # Transform
///
/// [`Transform`] holds the *absolute* position, rotation and scale. Rendering
/// reads these directly. Mutations go through the graph so that descendants are
/// kept in step.
#[derive(Debug, Clone)]
pub struct Node {
    pub name: String,
    /// Editor activity flag. Inactive nodes still take part in propagation.
    pub active: bool,

    pub(crate) parent: Option<NodeHandle>,
    pub(crate) children: Vec<NodeHandle>,
    pub(crate) graph: SceneId,

    pub(crate) transform: Transform,
}

impl Node {
    pub(crate) fn new(graph: SceneId, name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            active: true,
            parent: None,
            children: Vec::new(),
            graph,
            transform: Transform::new(),
        }
    }

    #[inline]
    #[must_use]
    pub fn parent(&self) -> Option<NodeHandle> {
        self.parent
    }

    #[inline]
    #[must_use]
    pub fn children(&self) -> &[NodeHandle] {
        &self.children
    }

    /// Id of the graph this node belongs to.
    #[inline]
    #[must_use]
    pub fn graph(&self) -> SceneId {
        self.graph
    }

    #[inline]
    #[must_use]
    pub fn transform(&self) -> &Transform {
        &self.transform
    }

    /// Absolute position.
    #[inline]
    #[must_use]
    pub fn position(&self) -> Vec3 {
        self.transform.position
    }

    /// Absolute rotation, Euler degrees.
    #[inline]
    #[must_use]
    pub fn rotation(&self) -> Vec3 {
        self.transform.rotation
    }

    /// Absolute scale.
    #[inline]
    #[must_use]
    pub fn scale(&self) -> Vec3 {
        self.transform.scale
    }

    #[inline]
    #[must_use]
    pub fn world_matrix(&self) -> Affine3A {
        self.transform.world_matrix()
    }
}
