use slotmap::{SlotMap, new_key_type};

use crate::errors::{ArborError, Result};
use crate::scene::graph::SceneGraph;
use crate::settings::SceneSettings;

new_key_type! {
    pub struct SceneHandle;
}

/// Keeps the scenes of an editor project and tracks the one being edited.
pub struct SceneManager {
    scenes: SlotMap<SceneHandle, SceneGraph>,
    active_scene: Option<SceneHandle>,
    settings: SceneSettings,
}

impl SceneManager {
    #[must_use]
    pub fn new() -> Self {
        Self::with_settings(SceneSettings::default())
    }

    /// Every scene created by this manager starts with a copy of `settings`.
    #[must_use]
    pub fn with_settings(settings: SceneSettings) -> Self {
        Self {
            scenes: SlotMap::with_key(),
            active_scene: None,
            settings,
        }
    }

    /// Creates a new scene and returns its handle.
    pub fn create_scene(&mut self) -> SceneHandle {
        self.scenes.insert(SceneGraph::with_settings(self.settings.clone()))
    }

    /// Removes a scene; clears the active scene if it was the one removed.
    pub fn remove_scene(&mut self, handle: SceneHandle) -> Option<SceneGraph> {
        if self.active_scene == Some(handle) {
            self.active_scene = None;
            log::warn!("Active scene was removed! No scene is being edited.");
        }
        self.scenes.remove(handle)
    }

    /// Sets the active scene. Invalid handles are logged and ignored.
    pub fn set_active(&mut self, handle: SceneHandle) {
        if let Err(err) = self.try_set_active(handle) {
            log::error!("Attempted to activate invalid scene: {err}");
        }
    }

    pub fn try_set_active(&mut self, handle: SceneHandle) -> Result<()> {
        if !self.scenes.contains_key(handle) {
            return Err(ArborError::SceneNotFound(handle));
        }
        self.active_scene = Some(handle);
        Ok(())
    }

    /// Creates a new scene, makes it active and returns it.
    pub fn create_active(&mut self) -> &mut SceneGraph {
        let handle = self.create_scene();
        self.active_scene = Some(handle);
        &mut self.scenes[handle]
    }

    #[must_use]
    pub fn active_handle(&self) -> Option<SceneHandle> {
        self.active_scene
    }

    #[must_use]
    pub fn get_scene(&self, handle: SceneHandle) -> Option<&SceneGraph> {
        self.scenes.get(handle)
    }

    pub fn get_scene_mut(&mut self, handle: SceneHandle) -> Option<&mut SceneGraph> {
        self.scenes.get_mut(handle)
    }

    #[must_use]
    pub fn active_scene(&self) -> Option<&SceneGraph> {
        self.active_scene.and_then(|h| self.scenes.get(h))
    }

    pub fn active_scene_mut(&mut self) -> Option<&mut SceneGraph> {
        self.active_scene.and_then(|h| self.scenes.get_mut(h))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.scenes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.scenes.is_empty()
    }
}

impl Default for SceneManager {
    fn default() -> Self {
        Self::new()
    }
}
