use std::fmt;
use std::panic::{AssertUnwindSafe, catch_unwind};

/// A lifecycle hook. Receives the window id it fired for.
pub type Hook = Box<dyn FnMut(&str)>;

/// Caller-registered lifecycle hooks for one window.
///
/// Every hook is optional. Hooks are observers: they cannot veto or roll back
/// the transition they are told about, and a panicking hook is caught and
/// logged without disturbing the state that triggered it.
#[derive(Default)]
pub struct WindowHooks {
    /// Fired once, on the tick after creation, so the caller's handle is
    /// already populated when it runs.
    pub on_init: Option<Hook>,
    pub on_minimize: Option<Hook>,
    pub on_restore: Option<Hook>,
    /// Fired before the window record is deleted.
    pub on_close: Option<Hook>,
    pub on_detach: Option<Hook>,
    /// Fired after a detached surface closed and the window returned home.
    pub on_detach_close: Option<Hook>,
}

/// Wrap a closure as a [`Hook`], for `WindowHooks { on_close: hook(..), .. }`
/// construction sites.
pub fn hook(f: impl FnMut(&str) + 'static) -> Option<Hook> {
    Some(Box::new(f))
}

impl fmt::Debug for WindowHooks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WindowHooks")
            .field("on_init", &self.on_init.is_some())
            .field("on_minimize", &self.on_minimize.is_some())
            .field("on_restore", &self.on_restore.is_some())
            .field("on_close", &self.on_close.is_some())
            .field("on_detach", &self.on_detach.is_some())
            .field("on_detach_close", &self.on_detach_close.is_some())
            .finish()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(super) enum HookKind {
    Init,
    Minimize,
    Restore,
    Close,
    Detach,
    DetachClose,
}

impl HookKind {
    fn name(self) -> &'static str {
        match self {
            Self::Init => "on_init",
            Self::Minimize => "on_minimize",
            Self::Restore => "on_restore",
            Self::Close => "on_close",
            Self::Detach => "on_detach",
            Self::DetachClose => "on_detach_close",
        }
    }
}

/// Hooks live outside the entity store so the records stay plain data.
/// The map is lookup-only (register/remove/dispatch by id, never iterated).
#[derive(Default)]
pub(super) struct HookRegistry {
    hooks: ahash::HashMap<String, WindowHooks>,
}

impl HookRegistry {
    pub(super) fn register(&mut self, id: &str, hooks: WindowHooks) {
        self.hooks.insert(id.to_owned(), hooks);
    }

    pub(super) fn remove(&mut self, id: &str) {
        self.hooks.remove(id);
    }

    /// Invoke one hook. A panic inside the hook is isolated to this
    /// invocation: the transition that triggered it stands.
    pub(super) fn dispatch(&mut self, kind: HookKind, id: &str) {
        let Some(set) = self.hooks.get_mut(id) else {
            return;
        };
        let slot = match kind {
            HookKind::Init => &mut set.on_init,
            HookKind::Minimize => &mut set.on_minimize,
            HookKind::Restore => &mut set.on_restore,
            HookKind::Close => &mut set.on_close,
            HookKind::Detach => &mut set.on_detach,
            HookKind::DetachClose => &mut set.on_detach_close,
        };
        let Some(hook) = slot.as_mut() else {
            return;
        };
        if catch_unwind(AssertUnwindSafe(|| hook(id))).is_err() {
            log::warn!("{} hook for window {id:?} panicked; continuing", kind.name());
        }
    }
}
