use std::collections::BTreeMap;

use emath::{Pos2, Rect};
use itertools::Itertools as _;

mod containers;
mod detach;
mod gesture;
mod hooks;
mod integrity;
mod options;
mod store;
mod types;

#[cfg(test)]
mod model_tests;

pub use detach::{DetachedSurface, SurfaceHost};
pub use hooks::{Hook, WindowHooks, hook};
pub use options::PanelManagerOptions;
pub use store::EntityStore;
pub use types::{
    ContainerId, ContainerRecord, DockItem, DragIndicators, InsertSide, TabDragTarget, TabDropHint,
    WindowRecord, WindowSpec,
};

use hooks::{HookKind, HookRegistry};
use types::DragPhase;

/// Window/container/tab manager for a hosted editor surface.
///
/// Current scope:
/// - Windows live as tabs inside draggable/resizable containers; dragging a
///   tab reorders it, drops it onto another container, or tears it off into a
///   new container at the drop point.
/// - Dragging a container header moves it; dwelling over another container
///   merges into it on release.
/// - Containers minimize to a dock and restore with their geometry intact.
/// - A window can detach onto an independent host surface and returns to its
///   home container when that surface closes.
///
/// Rendering and input are external: the manager exposes its state as plain
/// data plus projection helpers, and is driven through an input-agnostic
/// gesture protocol with caller-supplied `f64`-second timestamps. Everything
/// runs single-threaded; id lookups that miss are silent no-ops because
/// gestures routinely race against closes.
pub struct PanelManager<C> {
    pub options: PanelManagerOptions,

    store: EntityStore<C>,
    viewport: Rect,

    /// Minimized containers in dock display order.
    dock: Vec<ContainerId>,

    drag: DragPhase,
    hooks: HookRegistry,

    /// Detach surface handles, keyed by window id. A handle is the sole
    /// owner of its surface's lifecycle.
    surfaces: BTreeMap<String, Box<dyn DetachedSurface>>,

    /// Windows whose `on_init` is due on the next `update` tick.
    pending_init: Vec<String>,

    next_z: u64,
    last_surface_poll: Option<f64>,
}

impl<C> PanelManager<C> {
    pub fn new(viewport: Rect) -> Self {
        Self::new_with_options(viewport, PanelManagerOptions::default())
    }

    pub fn new_with_options(viewport: Rect, options: PanelManagerOptions) -> Self {
        Self {
            options,
            store: EntityStore::default(),
            viewport,
            dock: Vec::new(),
            drag: DragPhase::Idle,
            hooks: HookRegistry::default(),
            surfaces: BTreeMap::new(),
            pending_init: Vec::new(),
            next_z: 0,
            last_surface_poll: None,
        }
    }

    pub fn store(&self) -> &EntityStore<C> {
        &self.store
    }

    pub fn viewport(&self) -> Rect {
        self.viewport
    }

    pub fn window(&self, id: &str) -> Option<&WindowRecord<C>> {
        self.store.window(id)
    }

    pub fn container(&self, id: ContainerId) -> Option<&ContainerRecord> {
        self.store.container(id)
    }

    /// Creates a window in a fresh container (cascade-placed) and schedules
    /// its `on_init` for the next `update` tick. Returns the new container,
    /// or `None` if the id is already taken.
    pub fn create_window(&mut self, spec: WindowSpec<C>) -> Option<ContainerId> {
        let WindowSpec {
            id,
            title,
            content,
            hooks,
        } = spec;
        let record = WindowRecord {
            title,
            content,
            minimized: false,
            detached: false,
            container: None,
        };
        if !self.store.insert_window(id.clone(), record) {
            return None;
        }

        let container = self.spawn_container_at(None, self.options.default_container_size);
        self.store.attach_window(&id, container, None);
        if let Some(c) = self.store.container_mut(container) {
            c.active = Some(id.clone());
        }

        self.hooks.register(&id, hooks);
        log::debug!("created window {id:?} in container {container:?}");
        self.pending_init.push(id);
        Some(container)
    }

    /// Closes a window, destroying its container if it was the last member.
    /// `on_close` fires before the record is deleted and cannot abort it.
    pub fn close_window(&mut self, id: &str) {
        if self.store.window(id).is_none() {
            return;
        }
        self.hooks.dispatch(HookKind::Close, id);

        if let Some(mut surface) = self.surfaces.remove(id) {
            surface.close();
        }
        self.abort_drag_for_window(id);

        if let Some(container) = self.store.remove_window_from_container(id) {
            self.finish_container_after_removal(container);
        }
        let _ = self.store.remove_window(id);
        self.hooks.remove(id);
        self.pending_init.retain(|pending| pending != id);
        self.sync_dock();
        log::debug!("closed window {id:?}");
    }

    /// Makes the window its container's active tab and raises the container.
    /// Does not restore a minimized container; that is `restore_window`.
    pub fn focus_window(&mut self, id: &str) {
        let Some(record) = self.store.window(id) else {
            return;
        };
        if record.detached {
            return;
        }
        let Some(container) = record.container else {
            return;
        };
        if let Some(c) = self.store.container_mut(container) {
            c.active = Some(id.to_owned());
        }
        self.bring_container_to_front(container);
    }

    /// Restores the window's container out of the dock and focuses it.
    pub fn restore_window(&mut self, id: &str) {
        let Some(container) = self.store.container_of(id) else {
            return;
        };
        self.restore_container(container);
        self.focus_window(id);
    }

    pub fn update_window_title(&mut self, id: &str, title: impl Into<String>) {
        if let Some(record) = self.store.window_mut(id) {
            record.title = title.into();
        }
    }

    /// Tears the window off into its own container. If it already is the
    /// only member of its container this is just a raise (no create/destroy
    /// churn). Returns the container now holding the window.
    pub fn move_window_to_new_container(&mut self, id: &str) -> Option<ContainerId> {
        self.pop_out_window(id, None)
    }

    /// Viewport change: every container is pushed back into reach.
    pub fn set_viewport(&mut self, viewport: Rect) {
        self.viewport = viewport;
        let ids: Vec<ContainerId> = self.store.container_ids().collect();
        for id in ids {
            let min_visible = self.options.min_visible;
            if let Some(c) = self.store.container_mut(id) {
                c.rect = crate::geometry::constrain_to_viewport(c.rect, viewport, min_visible);
            }
        }
    }

    /// Frame pump: flushes deferred `on_init` hooks and polls detached
    /// surfaces. `now` is any monotonic clock in seconds.
    pub fn update(&mut self, now: f64) {
        let pending = std::mem::take(&mut self.pending_init);
        for id in pending {
            if self.store.window(&id).is_none() {
                continue;
            }
            self.hooks.dispatch(HookKind::Init, &id);
        }
        self.poll_surfaces(now);
    }

    /// Whether the container occupies screen space: not minimized and not
    /// hidden because every member is off on a detached surface.
    pub fn container_is_visible(&self, id: ContainerId) -> bool {
        let Some(container) = self.store.container(id) else {
            return false;
        };
        !container.minimized
            && container
                .tabs
                .iter()
                .any(|w| self.store.window(w).is_some_and(|r| !r.detached))
    }

    /// Render order: every container id, back to front.
    pub fn containers_back_to_front(&self) -> Vec<ContainerId> {
        self.store
            .containers()
            .sorted_by_key(|(_, c)| c.z)
            .map(|(id, _)| id)
            .collect()
    }

    /// Topmost visible container under the pointer, by z-order.
    pub fn container_under_pointer(
        &self,
        pointer: Pos2,
        exclude: Option<ContainerId>,
    ) -> Option<ContainerId> {
        self.store
            .containers()
            .filter(|(id, c)| Some(*id) != exclude && c.rect.contains(pointer))
            .filter(|(id, _)| self.container_is_visible(*id))
            .max_by_key(|(_, c)| c.z)
            .map(|(id, _)| id)
    }

    /// After a membership removal: delete the container when it emptied,
    /// otherwise make sure `active` still names a visible member.
    fn finish_container_after_removal(&mut self, container: ContainerId) {
        if self.store.windows_of(container).is_empty() {
            self.abort_drag_for_container(container);
            self.store.remove_container(container);
            self.dock.retain(|&d| d != container);
        } else {
            self.fix_active(container);
        }
    }
}
