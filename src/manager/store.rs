use std::collections::BTreeMap;

use emath::Rect;

use super::types::{ContainerId, ContainerRecord, WindowRecord};

/// Owns every window and container record and keeps the references between
/// them honest: memberships are edited only through methods that update both
/// sides, so a tab entry can never point at a dead window and a window can
/// never claim a container that does not list it.
///
/// `BTreeMap` keeps iteration deterministic, matching how ids are handed out.
#[derive(Debug)]
pub struct EntityStore<C> {
    windows: BTreeMap<String, WindowRecord<C>>,
    containers: BTreeMap<ContainerId, ContainerRecord>,
    next_container_serial: u64,
}

impl<C> Default for EntityStore<C> {
    fn default() -> Self {
        Self {
            windows: BTreeMap::new(),
            containers: BTreeMap::new(),
            next_container_serial: 1,
        }
    }
}

impl<C> EntityStore<C> {
    pub fn window(&self, id: &str) -> Option<&WindowRecord<C>> {
        self.windows.get(id)
    }

    pub(super) fn window_mut(&mut self, id: &str) -> Option<&mut WindowRecord<C>> {
        self.windows.get_mut(id)
    }

    pub fn container(&self, id: ContainerId) -> Option<&ContainerRecord> {
        self.containers.get(&id)
    }

    pub(super) fn container_mut(&mut self, id: ContainerId) -> Option<&mut ContainerRecord> {
        self.containers.get_mut(&id)
    }

    pub fn window_count(&self) -> usize {
        self.windows.len()
    }

    pub fn container_count(&self) -> usize {
        self.containers.len()
    }

    pub fn window_ids(&self) -> impl Iterator<Item = &str> {
        self.windows.keys().map(String::as_str)
    }

    pub fn container_ids(&self) -> impl Iterator<Item = ContainerId> + '_ {
        self.containers.keys().copied()
    }

    pub fn containers(&self) -> impl Iterator<Item = (ContainerId, &ContainerRecord)> {
        self.containers.iter().map(|(id, c)| (*id, c))
    }

    /// The container a window currently belongs to (its "home" while
    /// detached).
    pub fn container_of(&self, window: &str) -> Option<ContainerId> {
        self.windows.get(window)?.container
    }

    /// Tab order of a container; empty for unknown ids.
    pub fn windows_of(&self, container: ContainerId) -> &[String] {
        self.containers
            .get(&container)
            .map(|c| c.tabs.as_slice())
            .unwrap_or(&[])
    }

    /// Total containers ever allocated; drives cascade placement.
    pub(super) fn spawned_containers(&self) -> u64 {
        self.next_container_serial - 1
    }

    /// Rejects duplicate ids: replacing would fabricate an implicit close
    /// behind the caller's hooks.
    pub(super) fn insert_window(&mut self, id: String, record: WindowRecord<C>) -> bool {
        if self.windows.contains_key(&id) {
            log::warn!("ignoring create for taken window id {id:?}");
            return false;
        }
        self.windows.insert(id, record);
        true
    }

    /// Removes a window record. The window must already have been taken out
    /// of its container, otherwise the removal is refused: deleting it here
    /// would leave a dangling tab entry.
    pub(super) fn remove_window(&mut self, id: &str) -> Option<WindowRecord<C>> {
        if self.windows.get(id)?.container.is_some() {
            return None;
        }
        self.windows.remove(id)
    }

    pub(super) fn create_container(&mut self, rect: Rect, z: u64) -> ContainerId {
        let serial = self.next_container_serial;
        self.next_container_serial = serial.saturating_add(1);
        let id = ContainerId(serial);
        self.containers.insert(
            id,
            ContainerRecord {
                tabs: Vec::new(),
                active: None,
                minimized: false,
                z,
                rect,
            },
        );
        id
    }

    /// Silently refuses while the container still has members; callers must
    /// empty it first.
    pub(super) fn remove_container(&mut self, id: ContainerId) -> bool {
        let Some(container) = self.containers.get(&id) else {
            return false;
        };
        if !container.tabs.is_empty() {
            return false;
        }
        self.containers.remove(&id);
        true
    }

    /// Adds a window to a container's tab order (appended unless `index` is
    /// given). The window must exist and be homeless; both sides of the
    /// membership are updated together.
    pub(super) fn attach_window(
        &mut self,
        window: &str,
        container: ContainerId,
        index: Option<usize>,
    ) -> bool {
        if self
            .windows
            .get(window)
            .is_none_or(|record| record.container.is_some())
        {
            return false;
        }
        let Some(target) = self.containers.get_mut(&container) else {
            return false;
        };
        if target.tabs.iter().any(|tab| tab == window) {
            return false;
        }
        let index = index.unwrap_or(target.tabs.len()).min(target.tabs.len());
        target.tabs.insert(index, window.to_owned());
        if let Some(record) = self.windows.get_mut(window) {
            record.container = Some(container);
        }
        true
    }

    /// Takes a window out of its container's tab order and clears the
    /// backref. The (possibly now empty) container is left for the caller to
    /// finish: re-focus or delete.
    pub(super) fn remove_window_from_container(&mut self, window: &str) -> Option<ContainerId> {
        let container = self.windows.get(window)?.container?;
        if let Some(record) = self.containers.get_mut(&container) {
            record.tabs.retain(|tab| tab != window);
            if record.active.as_deref() == Some(window) {
                record.active = None;
            }
        }
        if let Some(record) = self.windows.get_mut(window) {
            record.container = None;
        }
        Some(container)
    }
}
