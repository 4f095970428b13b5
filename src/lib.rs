//! Hierarchical scene graph for 3D editors.
//!
//! Every game object stores its absolute (world-space) position, rotation and
//! scale. Parent-relative values are derived on demand, and any change to a
//! node is pushed down to its descendants so that their relative offsets are
//! preserved.
//!
//! ```rust,ignore
//! use arbor::SceneGraph;
//!
//! let mut graph = SceneGraph::new();
//! let root = graph.add_node();
//! let child = graph.create_node();
//! graph.add_child(root, child);
//!
//! graph.node(root).set_position(10.0, 20.0, 30.0);
//! assert_eq!(graph.get_node(child).unwrap().position(), glam::Vec3::new(10.0, 20.0, 30.0));
//! ```
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

pub mod errors;
pub mod scene;
pub mod settings;

pub use errors::{ArborError, Result};
pub use scene::{Channel, Node, NodeBuilder, NodeHandle, SceneGraph, SceneHandle, SceneId, SceneManager, SceneNode, Transform};
pub use settings::{ReparentPolicy, SceneSettings};
