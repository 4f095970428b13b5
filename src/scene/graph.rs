use std::sync::atomic::{AtomicU32, Ordering};

use glam::{Affine3A, Vec3};
use slotmap::SlotMap;

use crate::errors::{ArborError, Result};
use crate::scene::NodeHandle;
use crate::scene::node::Node;
use crate::scene::transform::{Channel, Transform};
use crate::scene::transform_system::{self, DepthFirstIter};
use crate::scene::wrapper::SceneNode;
use crate::settings::{ReparentPolicy, SceneSettings};

static NEXT_SCENE_ID: AtomicU32 = AtomicU32::new(1);

/// Process-wide unique id of a [`SceneGraph`]. Nodes carry the id of the
/// graph that created them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SceneId(u32);

impl SceneId {
    pub(crate) fn next() -> Self {
        Self(NEXT_SCENE_ID.fetch_add(1, Ordering::Relaxed))
    }

    #[inline]
    #[must_use]
    pub fn get(self) -> u32 {
        self.0
    }
}

/// Scene graph of one editor scene.
///
/// Owns every node in an arena. Nodes refer to each other through
/// [`NodeHandle`]s; a removed node's handle never resolves again.
///
/// `root_nodes` is ordered: it is the traversal and render order of the
/// top-level game objects.
///
/// # Preconditions
///
/// - A node must not become a descendant of itself. [`add_child`](Self::add_child)
///   refuses such requests and leaves the hierarchy unchanged.
/// - Scale components of a parent must be non-zero for the relative scale of
///   its children to be finite.
pub struct SceneGraph {
    id: SceneId,
    settings: SceneSettings,

    nodes: SlotMap<NodeHandle, Node>,
    root_nodes: Vec<NodeHandle>,
}

impl Default for SceneGraph {
    fn default() -> Self {
        Self::new()
    }
}

impl SceneGraph {
    #[must_use]
    pub fn new() -> Self {
        Self::with_settings(SceneSettings::default())
    }

    #[must_use]
    pub fn with_settings(settings: SceneSettings) -> Self {
        Self {
            id: SceneId::next(),
            settings,
            nodes: SlotMap::with_key(),
            root_nodes: Vec::new(),
        }
    }

    #[inline]
    #[must_use]
    pub fn id(&self) -> SceneId {
        self.id
    }

    #[inline]
    #[must_use]
    pub fn settings(&self) -> &SceneSettings {
        &self.settings
    }

    pub fn set_reparent_policy(&mut self, policy: ReparentPolicy) {
        self.settings.reparent_policy = policy;
    }

    // ========================================================================
    // Node creation & lookup
    // ========================================================================

    /// Creates a detached node: no parent, no children, not a root.
    pub fn create_node(&mut self) -> NodeHandle {
        let name = self.settings.default_node_name.clone();
        self.create_node_with_name(name)
    }

    pub fn create_node_with_name(&mut self, name: impl Into<String>) -> NodeHandle {
        self.nodes.insert(Node::new(self.id, name))
    }

    /// Creates a node and appends it to the root collection.
    pub fn add_node(&mut self) -> NodeHandle {
        let handle = self.create_node();
        self.root_nodes.push(handle);
        handle
    }

    /// Creates a node and attaches it under `parent`.
    ///
    /// If `parent` is stale the node is kept as a root instead.
    pub fn add_to_parent(&mut self, parent: NodeHandle) -> NodeHandle {
        let handle = self.create_node();
        if let Err(err) = self.try_add_child(parent, handle) {
            log::warn!("{err}; keeping new node {handle:?} as a root");
            self.root_nodes.push(handle);
        }
        handle
    }

    /// Starts building a node.
    pub fn build_node(&'_ mut self, name: &str) -> NodeBuilder<'_> {
        NodeBuilder::new(self, name)
    }

    #[inline]
    #[must_use]
    pub fn get_node(&self, handle: NodeHandle) -> Option<&Node> {
        self.nodes.get(handle)
    }

    /// Mutable access to a node's editor data (name, activity).
    /// Hierarchy and transform are changed through the graph.
    #[inline]
    pub fn get_node_mut(&mut self, handle: NodeHandle) -> Option<&mut Node> {
        self.nodes.get_mut(handle)
    }

    #[inline]
    #[must_use]
    pub fn contains(&self, handle: NodeHandle) -> bool {
        self.nodes.contains_key(handle)
    }

    /// Number of nodes in the arena, attached or not.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// The root collection itself. Callers may push, reorder or remove roots
    /// in place.
    #[inline]
    pub fn game_objects(&mut self) -> &mut Vec<NodeHandle> {
        &mut self.root_nodes
    }

    #[inline]
    #[must_use]
    pub fn roots(&self) -> &[NodeHandle] {
        &self.root_nodes
    }

    /// Walks every node reachable from the roots, pre-order.
    pub fn iter_depth_first(&self) -> DepthFirstIter<'_> {
        DepthFirstIter::new(&self.nodes, &self.root_nodes)
    }

    /// First node reachable from the roots with the given name.
    #[must_use]
    pub fn find_by_name(&self, name: &str) -> Option<NodeHandle> {
        self.iter_depth_first()
            .find(|(_, node)| node.name == name)
            .map(|(handle, _)| handle)
    }

    /// Whether `ancestor` is on the parent chain of `handle`.
    #[must_use]
    pub fn is_descendant_of(&self, handle: NodeHandle, ancestor: NodeHandle) -> bool {
        transform_system::is_descendant_of(&self.nodes, handle, ancestor)
    }

    /// `root` and all of its descendants, pre-order.
    #[must_use]
    pub fn collect_subtree(&self, root: NodeHandle) -> Vec<NodeHandle> {
        transform_system::collect_subtree(&self.nodes, root)
    }

    // ========================================================================
    // Hierarchy
    // ========================================================================

    /// Moves `child` under `parent` in one step: it leaves its previous parent
    /// (or the root collection) and is appended to `parent`'s children.
    ///
    /// With the default [`ReparentPolicy::KeepAbsolute`] the absolute
    /// transform is left untouched. Invalid requests (stale handles, `child`
    /// equal to `parent`, `parent` inside `child`'s subtree) are refused with a
    /// warning; use [`try_add_child`](Self::try_add_child) to handle them.
    pub fn add_child(&mut self, parent: NodeHandle, child: NodeHandle) {
        if let Err(err) = self.try_add_child(parent, child) {
            log::warn!("add_child refused: {err}");
        }
    }

    /// Checked form of [`add_child`](Self::add_child).
    pub fn try_add_child(&mut self, parent: NodeHandle, child: NodeHandle) -> Result<()> {
        if parent == child {
            return Err(ArborError::AttachToSelf(child));
        }
        if !self.nodes.contains_key(parent) {
            return Err(ArborError::NodeNotFound(parent));
        }
        if !self.nodes.contains_key(child) {
            return Err(ArborError::NodeNotFound(child));
        }
        if self.is_descendant_of(parent, child) {
            return Err(ArborError::WouldCycle { child, parent });
        }

        // Offsets under the previous parent, taken before the link changes
        let previous_relative = match self.settings.reparent_policy {
            ReparentPolicy::KeepAbsolute => None,
            ReparentPolicy::KeepRelative => self.relative_transform(child),
        };

        self.unlink(child);
        self.link(parent, child);

        if let Some(relative) = previous_relative {
            let parent_transform = self.nodes[parent].transform;
            let mut absolute = relative;
            for channel in Channel::ALL {
                absolute.set(channel, channel.compose(relative.get(channel), parent_transform.get(channel)));
            }
            transform_system::set_transform(&mut self.nodes, child, absolute);
        }

        log::debug!("Attached {child:?} under {parent:?}");
        Ok(())
    }

    /// Removes `handle` from its parent and appends it to the root collection.
    /// The absolute transform is unchanged.
    pub fn detach(&mut self, handle: NodeHandle) -> bool {
        if !self.nodes.contains_key(handle) {
            log::warn!("detach: node {handle:?} not found");
            return false;
        }
        self.unlink(handle);
        self.root_nodes.push(handle);
        true
    }

    /// Removes a node together with its whole subtree.
    pub fn remove_node(&mut self, handle: NodeHandle) -> bool {
        if !self.nodes.contains_key(handle) {
            return false;
        }

        self.unlink(handle);
        let subtree = self.collect_subtree(handle);
        for &node in &subtree {
            self.nodes.remove(node);
        }
        self.root_nodes.retain(|h| !subtree.contains(h));

        log::debug!("Removed {} node(s) starting at {handle:?}", subtree.len());
        true
    }

    /// Clears `child`'s parent link and takes it out of the root collection.
    fn unlink(&mut self, child: NodeHandle) {
        let old_parent = self.nodes.get_mut(child).and_then(|n| n.parent.take());
        if let Some(p) = old_parent
            && let Some(parent) = self.nodes.get_mut(p)
            && let Some(i) = parent.children.iter().position(|&x| x == child)
        {
            parent.children.remove(i);
        }
        self.root_nodes.retain(|&h| h != child);
    }

    fn link(&mut self, parent: NodeHandle, child: NodeHandle) {
        self.nodes[parent].children.push(child);
        self.nodes[child].parent = Some(parent);
    }

    // ========================================================================
    // Absolute transform
    // ========================================================================

    /// Returns a chainable mutable view of one node.
    pub fn node(&mut self, handle: NodeHandle) -> SceneNode<'_> {
        SceneNode::new(self, handle)
    }

    pub fn set_position(&mut self, handle: NodeHandle, position: Vec3) {
        self.write(handle, Channel::Position, position);
    }

    pub fn translate(&mut self, handle: NodeHandle, delta: Vec3) {
        if let Some(node) = self.nodes.get(handle) {
            let position = node.transform.position + delta;
            self.write(handle, Channel::Position, position);
        }
    }

    pub fn set_rotation(&mut self, handle: NodeHandle, rotation: Vec3) {
        self.write(handle, Channel::Rotation, rotation);
    }

    /// Adds Euler degrees to the absolute rotation. No wraparound.
    pub fn rotate(&mut self, handle: NodeHandle, delta: Vec3) {
        if let Some(node) = self.nodes.get(handle) {
            let rotation = node.transform.rotation + delta;
            self.write(handle, Channel::Rotation, rotation);
        }
    }

    pub fn set_scale(&mut self, handle: NodeHandle, scale: Vec3) {
        self.write(handle, Channel::Scale, scale);
    }

    /// Multiplies the absolute scale component-wise.
    pub fn scale(&mut self, handle: NodeHandle, factor: Vec3) {
        if let Some(node) = self.nodes.get(handle) {
            let scale = node.transform.scale * factor;
            self.write(handle, Channel::Scale, scale);
        }
    }

    fn write(&mut self, handle: NodeHandle, channel: Channel, value: Vec3) {
        if !transform_system::set_channel(&mut self.nodes, handle, channel, value) {
            log::warn!("Cannot set {channel:?}: node {handle:?} not found");
        }
    }

    // ========================================================================
    // Relative transform
    // ========================================================================

    #[must_use]
    pub fn position_rel(&self, handle: NodeHandle) -> Option<Vec3> {
        transform_system::relative_value(&self.nodes, handle, Channel::Position)
    }

    #[must_use]
    pub fn rotation_rel(&self, handle: NodeHandle) -> Option<Vec3> {
        transform_system::relative_value(&self.nodes, handle, Channel::Rotation)
    }

    #[must_use]
    pub fn scale_rel(&self, handle: NodeHandle) -> Option<Vec3> {
        transform_system::relative_value(&self.nodes, handle, Channel::Scale)
    }

    /// All three relative channels at once.
    #[must_use]
    pub fn relative_transform(&self, handle: NodeHandle) -> Option<Transform> {
        Some(Transform {
            position: self.position_rel(handle)?,
            rotation: self.rotation_rel(handle)?,
            scale: self.scale_rel(handle)?,
        })
    }

    pub fn set_position_rel(&mut self, handle: NodeHandle, position: Vec3) {
        self.write_relative(handle, Channel::Position, position);
    }

    pub fn set_rotation_rel(&mut self, handle: NodeHandle, rotation: Vec3) {
        self.write_relative(handle, Channel::Rotation, rotation);
    }

    pub fn set_scale_rel(&mut self, handle: NodeHandle, scale: Vec3) {
        self.write_relative(handle, Channel::Scale, scale);
    }

    fn write_relative(&mut self, handle: NodeHandle, channel: Channel, value: Vec3) {
        if !transform_system::set_relative_value(&mut self.nodes, handle, channel, value) {
            log::warn!("Cannot set relative {channel:?}: node {handle:?} not found");
        }
    }

    /// World matrix built from the absolute transform.
    #[must_use]
    pub fn world_matrix(&self, handle: NodeHandle) -> Option<Affine3A> {
        self.nodes.get(handle).map(Node::world_matrix)
    }
}

/// Fluent construction of a node.
///
/// Transform values given to the builder are relative to the parent set with
/// [`with_parent`](Self::with_parent), or absolute for a root.
pub struct NodeBuilder<'a> {
    graph: &'a mut SceneGraph,
    name: String,
    relative: Transform,
    parent: Option<NodeHandle>,
}

impl<'a> NodeBuilder<'a> {
    pub fn new(graph: &'a mut SceneGraph, name: &str) -> Self {
        Self {
            graph,
            name: name.to_string(),
            relative: Transform::new(),
            parent: None,
        }
    }

    #[must_use]
    pub fn with_position(mut self, x: f32, y: f32, z: f32) -> Self {
        self.relative.position = Vec3::new(x, y, z);
        self
    }

    #[must_use]
    pub fn with_rotation(mut self, x: f32, y: f32, z: f32) -> Self {
        self.relative.rotation = Vec3::new(x, y, z);
        self
    }

    #[must_use]
    pub fn with_scale(mut self, x: f32, y: f32, z: f32) -> Self {
        self.relative.scale = Vec3::new(x, y, z);
        self
    }

    #[must_use]
    pub fn with_parent(mut self, parent: NodeHandle) -> Self {
        self.parent = Some(parent);
        self
    }

    /// Inserts the node and returns its handle. A stale parent makes the node
    /// a root.
    pub fn build(self) -> NodeHandle {
        let graph = self.graph;
        let handle = graph.create_node_with_name(self.name);

        let parent = self.parent.filter(|&p| {
            let alive = graph.contains(p);
            if !alive {
                log::warn!("NodeBuilder: parent {p:?} not found, building a root");
            }
            alive
        });

        match parent {
            Some(parent) => {
                graph.link(parent, handle);
                let parent_transform = graph.nodes[parent].transform;
                let node = &mut graph.nodes[handle];
                for channel in Channel::ALL {
                    let value = channel.compose(self.relative.get(channel), parent_transform.get(channel));
                    node.transform.set(channel, value);
                }
            }
            None => {
                graph.nodes[handle].transform = self.relative;
                graph.root_nodes.push(handle);
            }
        }

        handle
    }
}
