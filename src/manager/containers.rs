use emath::{Pos2, Rect, Vec2};
use itertools::Itertools as _;

use crate::geometry::{cascade_offset, constrain_to_viewport};

use super::PanelManager;
use super::hooks::HookKind;
use super::types::{ContainerId, DockItem};

impl<C> PanelManager<C> {
    pub(super) fn allocate_z(&mut self) -> u64 {
        self.next_z = self.next_z.saturating_add(1);
        self.next_z
    }

    /// Front-most is `max(z)`; serials are never reused, so ties are
    /// impossible.
    pub fn bring_container_to_front(&mut self, id: ContainerId) {
        if self.store.container(id).is_none() {
            return;
        }
        let z = self.allocate_z();
        if let Some(container) = self.store.container_mut(id) {
            container.z = z;
        }
    }

    /// Allocates an empty container. With no explicit position, successive
    /// spawns stagger from the viewport center so they don't stack exactly.
    pub(super) fn spawn_container_at(&mut self, pos: Option<Pos2>, size: Vec2) -> ContainerId {
        let size = size.max(self.options.min_container_size);
        let pos = pos.unwrap_or_else(|| {
            let offset = cascade_offset(
                self.store.spawned_containers(),
                self.options.cascade_step,
                self.options.cascade_wrap,
            );
            self.viewport.center() - size * 0.5 + offset
        });
        let rect = constrain_to_viewport(
            Rect::from_min_size(pos, size),
            self.viewport,
            self.options.min_visible,
        );
        let z = self.allocate_z();
        self.store.create_container(rect, z)
    }

    /// Collapses the container into the dock. Geometry is kept so restore
    /// returns to the exact prior rect.
    pub fn minimize_container(&mut self, id: ContainerId) {
        let Some(container) = self.store.container_mut(id) else {
            return;
        };
        if container.minimized {
            return;
        }
        container.minimized = true;

        let members = container.tabs.clone();
        let mut flipped = Vec::new();
        for member in &members {
            if let Some(record) = self.store.window_mut(member) {
                if !record.detached && !record.minimized {
                    record.minimized = true;
                    flipped.push(member.clone());
                }
            }
        }
        if !self.dock.contains(&id) {
            self.dock.push(id);
        }
        for member in &flipped {
            self.hooks.dispatch(HookKind::Minimize, member);
        }
        log::debug!("minimized container {id:?}");
    }

    /// Brings the container back out of the dock, raised to the front.
    pub fn restore_container(&mut self, id: ContainerId) {
        let Some(container) = self.store.container_mut(id) else {
            return;
        };
        if !container.minimized {
            return;
        }
        container.minimized = false;

        let members = container.tabs.clone();
        let mut flipped = Vec::new();
        for member in &members {
            if let Some(record) = self.store.window_mut(member) {
                if !record.detached && record.minimized {
                    record.minimized = false;
                    flipped.push(member.clone());
                }
            }
        }
        self.dock.retain(|&d| d != id);
        self.bring_container_to_front(id);
        for member in &flipped {
            self.hooks.dispatch(HookKind::Restore, member);
        }
        log::debug!("restored container {id:?}");
    }

    /// Moves every window of `source` into `target` (appended, source order
    /// preserved), deletes `source`, focuses the first moved visible window
    /// and raises `target`. No-op for identical or unknown ids.
    pub fn merge_containers(&mut self, source: ContainerId, target: ContainerId) {
        if source == target {
            return;
        }
        if self.store.container(source).is_none() || self.store.container(target).is_none() {
            return;
        }
        self.abort_drag_for_container(source);

        let moved = self.store.windows_of(source).to_vec();
        let target_minimized = self.store.container(target).is_some_and(|c| c.minimized);
        let mut visibility_flips: Vec<(String, bool)> = Vec::new();
        for member in &moved {
            self.store.remove_window_from_container(member);
            self.store.attach_window(member, target, None);
            if let Some(record) = self.store.window_mut(member) {
                if !record.detached && record.minimized != target_minimized {
                    record.minimized = target_minimized;
                    visibility_flips.push((member.clone(), target_minimized));
                }
            }
        }
        self.store.remove_container(source);
        self.dock.retain(|&d| d != source);

        let focus = moved
            .iter()
            .find(|w| self.store.window(w).is_some_and(|r| !r.detached))
            .cloned();
        if let Some(focus) = focus {
            if let Some(container) = self.store.container_mut(target) {
                container.active = Some(focus);
            }
        }
        self.fix_active(target);
        self.bring_container_to_front(target);
        self.sync_dock();

        for (member, minimized) in visibility_flips {
            let kind = if minimized {
                HookKind::Minimize
            } else {
                HookKind::Restore
            };
            self.hooks.dispatch(kind, &member);
        }
        log::debug!("merged container {source:?} into {target:?}");
    }

    /// Moves one window into an existing container (appended) and focuses it
    /// there. Moving within its own container is just a focus.
    pub fn move_window_to_container(&mut self, id: &str, target: ContainerId) {
        if self.store.container(target).is_none() {
            return;
        }
        let Some(source) = self.store.container_of(id) else {
            return;
        };
        if source == target {
            self.focus_window(id);
            return;
        }

        let was_minimized = self.store.window(id).is_some_and(|r| r.minimized);
        let target_minimized = self.store.container(target).is_some_and(|c| c.minimized);
        self.store.remove_window_from_container(id);
        self.store.attach_window(id, target, None);

        let detached = self.store.window(id).is_some_and(|r| r.detached);
        if let Some(record) = self.store.window_mut(id) {
            if !record.detached {
                record.minimized = target_minimized;
            }
        }
        self.finish_container_after_removal(source);

        if detached {
            self.fix_active(target);
        } else {
            if let Some(container) = self.store.container_mut(target) {
                container.active = Some(id.to_owned());
            }
            self.bring_container_to_front(target);
        }
        self.sync_dock();

        if !detached && was_minimized != target_minimized {
            let kind = if target_minimized {
                HookKind::Minimize
            } else {
                HookKind::Restore
            };
            self.hooks.dispatch(kind, id);
        }
    }

    /// Tears `id` off into its own container at `drop_point` (or a cascade
    /// slot). A sole-member source takes the early exit: the existing
    /// container is relocated, avoiding an empty-container flicker between
    /// destroy and create.
    pub(super) fn pop_out_window(&mut self, id: &str, drop_point: Option<Pos2>) -> Option<ContainerId> {
        let source = self.store.container_of(id)?;
        let source_rect = self.store.container(source)?.rect;

        if self.store.windows_of(source).len() <= 1 {
            self.restore_container(source);
            if let Some(pointer) = drop_point {
                let min = pointer - self.options.tear_off_grab_offset;
                let viewport = self.viewport;
                let min_visible = self.options.min_visible;
                if let Some(container) = self.store.container_mut(source) {
                    container.rect = constrain_to_viewport(
                        Rect::from_min_size(min, container.rect.size()),
                        viewport,
                        min_visible,
                    );
                }
            }
            self.bring_container_to_front(source);
            return Some(source);
        }

        let was_minimized = self.store.window(id).is_some_and(|r| r.minimized);
        let pos = drop_point.map(|p| p - self.options.tear_off_grab_offset);
        let dest = self.spawn_container_at(pos, source_rect.size());
        self.store.remove_window_from_container(id);
        self.store.attach_window(id, dest, None);
        if let Some(record) = self.store.window_mut(id) {
            record.minimized = false;
        }
        self.fix_active(dest);
        self.fix_active(source);
        self.bring_container_to_front(dest);
        self.sync_dock();
        if was_minimized {
            self.hooks.dispatch(HookKind::Restore, id);
        }
        log::debug!("popped window {id:?} out of {source:?} into {dest:?}");
        Some(dest)
    }

    /// Re-asserts that `active` names a visible member, reassigning or
    /// clearing it otherwise. "Active" strictly means visible & focused; it
    /// is `None` exactly when every member is detached.
    pub(super) fn fix_active(&mut self, id: ContainerId) {
        let Some(container) = self.store.container(id) else {
            return;
        };
        let ok = container.active.as_ref().is_some_and(|active| {
            container.tabs.contains(active)
                && self.store.window(active).is_some_and(|r| !r.detached)
        });
        if ok {
            return;
        }
        let next = container
            .tabs
            .iter()
            .find(|w| self.store.window(w).is_some_and(|r| !r.detached))
            .cloned();
        if let Some(container) = self.store.container_mut(id) {
            container.active = next;
        }
    }

    /// Drops dock entries whose container died or got restored elsewhere.
    pub(super) fn sync_dock(&mut self) {
        let store = &self.store;
        self.dock
            .retain(|&id| store.container(id).is_some_and(|c| c.minimized));
    }

    /// Dock projection: one item per minimized container that still has
    /// restorable (non-detached) members, labeled with their joined titles.
    pub fn dock_items(&self) -> Vec<DockItem> {
        self.dock
            .iter()
            .filter_map(|&id| {
                let container = self.store.container(id)?;
                if !container.minimized {
                    return None;
                }
                let label = container
                    .tabs
                    .iter()
                    .filter_map(|w| self.store.window(w))
                    .filter(|r| !r.detached)
                    .map(|r| r.title.as_str())
                    .join(", ");
                if label.is_empty() {
                    return None;
                }
                Some(DockItem {
                    container: id,
                    label,
                })
            })
            .collect()
    }

    /// Reorders the dock display sequence only; container identity and state
    /// are untouched.
    pub fn move_dock_item(&mut self, from: usize, to: usize) {
        if from == to || from >= self.dock.len() || to >= self.dock.len() {
            return;
        }
        let id = self.dock.remove(from);
        self.dock.insert(to, id);
    }
}
