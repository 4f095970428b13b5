//! Error Types
//!
//! This module defines the error types used by the checked scene-graph APIs.
//!
//! # Overview
//!
//! The core transform operations are total: they never fail, and operations
//! addressed through a stale [`NodeHandle`] are silent no-ops. The checked
//! variants (for example [`SceneGraph::try_add_child`]) report why a request
//! was refused through [`ArborError`]:
//! - Missing nodes or scenes
//! - Hierarchy violations (self-attachment, cycles)
//! - Invalid settings documents
//!
//! # Usage
//!
//! ```rust,ignore
//! use arbor::errors::{ArborError, Result};
//!
//! fn reparent(graph: &mut SceneGraph, parent: NodeHandle, child: NodeHandle) -> Result<()> {
//!     graph.try_add_child(parent, child)?;
//!     Ok(())
//! }
//! ```
//!
//! [`SceneGraph::try_add_child`]: crate::scene::SceneGraph::try_add_child

use thiserror::Error;

use crate::scene::NodeHandle;
use crate::scene::manager::SceneHandle;

/// The main error type of the scene graph.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ArborError {
    // ========================================================================
    // Lookup Errors
    // ========================================================================
    /// The handle does not refer to a live node of this graph.
    #[error("Node not found: {0:?}")]
    NodeNotFound(NodeHandle),

    /// The handle does not refer to a registered scene.
    #[error("Scene not found: {0:?}")]
    SceneNotFound(SceneHandle),

    // ========================================================================
    // Hierarchy Errors
    // ========================================================================
    /// A node cannot become its own child.
    #[error("Cannot attach node {0:?} to itself")]
    AttachToSelf(NodeHandle),

    /// The requested parent lies inside the child's subtree.
    #[error("Attaching {child:?} under {parent:?} would create a cycle")]
    WouldCycle {
        /// The node that was to be moved
        child: NodeHandle,
        /// The requested new parent, a descendant of `child`
        parent: NodeHandle,
    },

    // ========================================================================
    // Configuration Errors
    // ========================================================================
    /// The settings document could not be parsed.
    #[error("Invalid scene settings: {0}")]
    InvalidSettings(String),
}

impl From<serde_json::Error> for ArborError {
    fn from(err: serde_json::Error) -> Self {
        ArborError::InvalidSettings(err.to_string())
    }
}

/// Alias for `Result<T, ArborError>`.
pub type Result<T> = std::result::Result<T, ArborError>;
