use emath::{Pos2, Rect};

use crate::geometry::ResizeEdges;

use super::hooks::WindowHooks;

/// Identifier of a container (the draggable/resizable shell holding tabs).
///
/// Serials are allocated monotonically and never reused, so a stale id held
/// across a close can never alias a newer container.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ContainerId(pub(crate) u64);

impl ContainerId {
    pub fn raw(self) -> u64 {
        self.0
    }
}

/// A titled content panel. `C` is the opaque content blob; the core never
/// interprets it beyond handing it to the host when mounting a surface.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WindowRecord<C> {
    pub title: String,
    pub content: C,
    pub minimized: bool,
    pub detached: bool,
    /// The owning container. For a detached window this is the "home" it
    /// returns to when its independent surface closes.
    pub container: Option<ContainerId>,
}

/// A draggable/resizable shell holding one or more windows as tabs.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ContainerRecord {
    /// Tab order. No duplicates; every entry is a live window whose
    /// `container` backref points here.
    pub tabs: Vec<String>,
    /// The focused tab. Always a visible (non-detached) member; `None` iff
    /// every member is detached.
    pub active: Option<String>,
    pub minimized: bool,
    /// Monotonic z serial; the largest value is front-most.
    pub z: u64,
    pub rect: Rect,
}

/// Everything needed to create a window.
pub struct WindowSpec<C> {
    /// Caller-supplied unique key. Creation is rejected if it is taken.
    pub id: String,
    pub title: String,
    pub content: C,
    pub hooks: WindowHooks,
}

impl<C> WindowSpec<C> {
    pub fn new(id: impl Into<String>, title: impl Into<String>, content: C) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            content,
            hooks: WindowHooks::default(),
        }
    }

    pub fn with_hooks(mut self, hooks: WindowHooks) -> Self {
        self.hooks = hooks;
        self
    }
}

/// One entry of the minimized dock: a minimized container and the joined
/// titles of its restorable members.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DockItem {
    pub container: ContainerId,
    pub label: String,
}

/// Which side of the hovered tab a dragged tab would be inserted on.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InsertSide {
    Before,
    After,
}

/// Reorder indicator: insert the dragged window before/after this tab.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TabDropHint {
    pub tab: String,
    pub side: InsertSide,
}

/// What the renderer reports under the pointer during a tab drag. Tab strips
/// are laid out by the renderer, so tab-level rects come from outside; the
/// core resolves everything else from its own geometry.
#[derive(Clone, Debug)]
pub enum TabDragTarget {
    /// Over another tab; `rect` is that tab's on-screen rectangle.
    Tab { window: String, rect: Rect },
    /// Over the empty part of a container's tab bar.
    TabBar { container: ContainerId },
}

/// Pure projection of the current drag candidacy for rendering. Highlights
/// are derived from this, never the other way around.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DragIndicators {
    pub insert_hint: Option<TabDropHint>,
    pub merge_target: Option<ContainerId>,
    pub merge_eligible: bool,
}

#[derive(Debug)]
pub(super) struct TabDragState {
    pub(super) window: String,
    pub(super) source: ContainerId,
    pub(super) pointer: Option<Pos2>,
    /// The last move reported *some* tab-level target (even the dragged tab
    /// itself). Guards the tear-off fallback: dropping on a tab is never a
    /// tear-off, even when the indicator state came out empty.
    pub(super) over_target: bool,
    pub(super) insert_hint: Option<TabDropHint>,
    pub(super) merge_target: Option<ContainerId>,
}

#[derive(Clone, Copy, Debug)]
pub(super) struct MergeCandidate {
    pub(super) target: ContainerId,
    pub(super) entered_at: f64,
}

#[derive(Debug)]
pub(super) struct HeaderDragState {
    pub(super) container: ContainerId,
    pub(super) pointer_start: Pos2,
    pub(super) rect_start: Rect,
    /// Movement exceeded the click threshold, so this is a real drag.
    pub(super) engaged: bool,
    pub(super) candidate: Option<MergeCandidate>,
    pub(super) merge_eligible: bool,
}

#[derive(Debug)]
pub(super) struct ResizeState {
    pub(super) container: ContainerId,
    pub(super) rect_start: Rect,
    pub(super) edges: ResizeEdges,
}

#[derive(Debug, Default)]
pub(super) enum DragPhase {
    #[default]
    Idle,
    TabDrag(TabDragState),
    HeaderDrag(HeaderDragState),
    Resize(ResizeState),
}
