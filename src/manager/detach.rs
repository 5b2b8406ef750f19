use super::PanelManager;
use super::hooks::HookKind;

/// A live independent display surface hosting one window's content.
///
/// The handle is the sole owner of the surface's lifecycle: dropping it from
/// the manager after [`DetachedSurface::close`] is what ends the surface.
pub trait DetachedSurface {
    /// Whether the surface is still open on the host side.
    fn is_open(&self) -> bool;

    /// Ask the host to close the surface. Must be idempotent: the manager may
    /// call it again after the surface already closed itself.
    fn close(&mut self);
}

/// Host capability to open an independent display surface (e.g. a browser
/// popup) seeded with a window's content. Injected into
/// [`PanelManager::detach_window`] call-by-call, so the manager never holds
/// host state.
pub trait SurfaceHost<C> {
    /// Returns `None` when the host refuses (blocked popups and the like);
    /// the manager then falls back to tearing the window off in-editor.
    fn open_surface(
        &mut self,
        window: &str,
        title: &str,
        content: &C,
    ) -> Option<Box<dyn DetachedSurface>>;
}

impl<C> PanelManager<C> {
    /// Moves a window's content onto an independent host surface. Its
    /// container entry stays behind as the "home" to return to on close; a
    /// container whose members are all detached simply stops being visible
    /// (it is not deleted). A refused surface degrades to
    /// [`PanelManager::move_window_to_new_container`] — detaching never hard-fails.
    pub fn detach_window(&mut self, host: &mut dyn SurfaceHost<C>, id: &str) {
        let Some(record) = self.store.window(id) else {
            return;
        };
        if record.detached {
            return;
        }
        let Some(surface) = host.open_surface(id, &record.title, &record.content) else {
            log::warn!("host refused a detached surface for {id:?}; tearing off in-editor");
            self.pop_out_window(id, None);
            return;
        };
        let home = record.container;

        self.surfaces.insert(id.to_owned(), surface);
        if let Some(record) = self.store.window_mut(id) {
            record.detached = true;
            record.minimized = false;
        }
        self.abort_drag_for_window(id);
        if let Some(home) = home {
            self.fix_active(home);
        }
        self.sync_dock();
        self.hooks.dispatch(HookKind::Detach, id);
        log::debug!("window {id:?} detached to an independent surface");
    }

    /// Host-side close notification for hosts with a close event. Hosts
    /// without one are covered by the poll in [`PanelManager::update`].
    pub fn notify_surface_closed(&mut self, id: &str) {
        self.reattach_window(id);
    }

    pub fn detached_surface_count(&self) -> usize {
        self.surfaces.len()
    }

    /// Returns a detached window to its home container — or a freshly made
    /// one if the home vanished — restoring visibility and focus, with title
    /// and content untouched.
    fn reattach_window(&mut self, id: &str) {
        if self.store.window(id).is_none() {
            // The window died while detached; nothing left to restore.
            self.surfaces.remove(id);
            return;
        }
        if !self.store.window(id).is_some_and(|r| r.detached) {
            return;
        }
        if let Some(mut surface) = self.surfaces.remove(id) {
            // Idempotent; covers a close event racing the poll.
            surface.close();
        }

        let home = self
            .store
            .container_of(id)
            .filter(|&home| self.store.container(home).is_some());
        let home = match home {
            Some(home) => home,
            None => {
                if let Some(record) = self.store.window_mut(id) {
                    record.container = None;
                }
                let dest = self.spawn_container_at(None, self.options.default_container_size);
                self.store.attach_window(id, dest, None);
                dest
            }
        };

        let home_minimized = self.store.container(home).is_some_and(|c| c.minimized);
        if let Some(record) = self.store.window_mut(id) {
            record.detached = false;
            record.minimized = home_minimized;
        }

        let sole_visible = self
            .store
            .windows_of(home)
            .iter()
            .filter(|w| self.store.window(w).is_some_and(|r| !r.detached))
            .count()
            == 1;
        if sole_visible {
            if let Some(container) = self.store.container_mut(home) {
                container.active = Some(id.to_owned());
            }
        } else {
            self.fix_active(home);
        }
        self.sync_dock();
        self.hooks.dispatch(HookKind::DetachClose, id);
        log::debug!("window {id:?} returned from its detached surface to {home:?}");
    }

    /// Poll fallback for hosts without a close event; rate-limited by
    /// `surface_poll_interval`.
    pub(super) fn poll_surfaces(&mut self, now: f64) {
        if self.surfaces.is_empty() {
            return;
        }
        if self
            .last_surface_poll
            .is_some_and(|last| now - last < self.options.surface_poll_interval)
        {
            return;
        }
        self.last_surface_poll = Some(now);

        let closed: Vec<String> = self
            .surfaces
            .iter()
            .filter(|(_, surface)| !surface.is_open())
            .map(|(id, _)| id.clone())
            .collect();
        for id in closed {
            self.reattach_window(&id);
        }
    }
}
