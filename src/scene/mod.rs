//! Scene graph module
//!
//! Manages the node hierarchy of an editor scene:
//! - Node: a game object (parent/children links and absolute transform)
//! - Transform: absolute position, rotation and scale
//! - SceneGraph: the node arena and the ordered root collection
//! - transform_system: top-down propagation of transform changes
//! - SceneNode: chainable mutation wrapper
//! - SceneManager: the scenes of a project and the active one

pub mod graph;
pub mod manager;
pub mod node;
pub mod transform;
pub mod transform_system;
pub mod wrapper;

// Re-export commonly used types
pub use graph::{NodeBuilder, SceneGraph, SceneId};
pub use manager::{SceneHandle, SceneManager};
pub use node::Node;
pub use transform::{Channel, Transform};
pub use wrapper::SceneNode;

use slotmap::new_key_type;

new_key_type! {
    /// Generational handle of a node inside its [`SceneGraph`].
    pub struct NodeHandle;
}
