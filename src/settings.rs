//! Scene Settings
//!
//! Editor-level configuration of a [`SceneGraph`](crate::scene::SceneGraph).
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use arbor::settings::{ReparentPolicy, SceneSettings};
//!
//! // Default: reparenting keeps absolute transforms untouched
//! let settings = SceneSettings::default();
//!
//! // Children follow their new parent, keeping their relative offsets
//! let settings = SceneSettings {
//!     reparent_policy: ReparentPolicy::KeepRelative,
//!     ..Default::default()
//! };
//!
//! // Or load from the editor's settings file contents
//! let settings = SceneSettings::from_json_str(r#"{ "reparent_policy": "keep_relative" }"#)?;
//! ```

use serde::{Deserialize, Serialize};

use crate::errors::Result;

/// Default name given to nodes created without an explicit name.
pub const DEFAULT_NODE_NAME: &str = "GameObject";

// ---------------------------------------------------------------------------
// ReparentPolicy
// ---------------------------------------------------------------------------

/// Controls what happens to a node's transform when it is moved under a new
/// parent with [`SceneGraph::add_child`](crate::scene::SceneGraph::add_child).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReparentPolicy {
    /// Absolute values stay as they are. Only the result of the relative
    /// queries changes, since they are now measured against the new parent.
    #[default]
    KeepAbsolute,

    /// The offset the node had relative to its previous parent (its absolute
    /// value when it was a root) is re-applied under the new parent. The node
    /// and its whole subtree move along with the new parent.
    KeepRelative,
}

// ---------------------------------------------------------------------------
// SceneSettings
// ---------------------------------------------------------------------------

/// Configuration shared by every node of one scene graph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneSettings {
    /// How [`SceneGraph::add_child`](crate::scene::SceneGraph::add_child)
    /// treats the transform of the moved node.
    pub reparent_policy: ReparentPolicy,

    /// Name assigned by [`SceneGraph::create_node`](crate::scene::SceneGraph::create_node).
    pub default_node_name: String,
}

impl Default for SceneSettings {
    fn default() -> Self {
        Self {
            reparent_policy: ReparentPolicy::default(),
            default_node_name: DEFAULT_NODE_NAME.to_string(),
        }
    }
}

impl SceneSettings {
    /// Parses settings from a JSON document. Missing fields fall back to
    /// their defaults.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let settings = serde_json::from_str(json)?;
        Ok(settings)
    }

    /// Serializes the settings to a pretty-printed JSON document.
    pub fn to_json_string(&self) -> Result<String> {
        let json = serde_json::to_string_pretty(self)?;
        Ok(json)
    }
}
