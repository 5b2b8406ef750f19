//! The drag protocol. Input-system agnostic: the host translates its pointer
//! events into these calls, supplying positions, `f64`-second timestamps and
//! (for tab drags) the hovered tab target, since tab strips are laid out by
//! the renderer. Events of one gesture are strictly ordered
//! (`start → move* → drop | end`), and an `end` without a preceding `drop` is
//! the outside-drop (tear-off) path.
//!
//! Every step re-checks that the dragged ids are still alive; a gesture whose
//! entities died under it (a racing close) silently returns to idle.

use emath::{Pos2, Rect, Vec2};

use crate::geometry::{ResizeEdges, clamp_drag, clamp_resize, constrain_to_viewport};

use super::PanelManager;
use super::types::{
    DragIndicators, DragPhase, HeaderDragState, InsertSide, MergeCandidate, ResizeState,
    TabDragState, TabDragTarget, TabDropHint,
};

impl<C> PanelManager<C> {
    /// Begins dragging a tab. Also focuses the window, as pressing a tab
    /// does.
    pub fn tab_drag_start(&mut self, window: &str) {
        let Some(record) = self.store.window(window) else {
            return;
        };
        if record.detached || record.minimized {
            return;
        }
        let Some(source) = record.container else {
            return;
        };
        self.focus_window(window);
        self.drag = DragPhase::TabDrag(TabDragState {
            window: window.to_owned(),
            source,
            pointer: None,
            over_target: false,
            insert_hint: None,
            merge_target: None,
        });
        log::debug!("tab drag start window={window:?} source={source:?}");
    }

    /// Updates the indicator state from the pointer and the hovered target:
    /// a tab of the source container yields an insert-before/after hint from
    /// its horizontal midpoint, anything belonging to another container
    /// yields a merge target. Hints are data; they change nothing until the
    /// drop, and the drop re-validates them by window identity.
    pub fn tab_drag_move(&mut self, pointer: Pos2, over: Option<TabDragTarget>) {
        let DragPhase::TabDrag(state) = &self.drag else {
            return;
        };
        if self.store.window(&state.window).is_none() || self.store.container(state.source).is_none()
        {
            self.drag = DragPhase::Idle;
            return;
        }

        let over_target = over.is_some();
        let mut insert_hint = None;
        let mut merge_target = None;
        match over {
            Some(TabDragTarget::Tab {
                window: hovered,
                rect,
            }) => {
                if hovered != state.window {
                    match self.store.container_of(&hovered) {
                        Some(container) if container == state.source => {
                            let side = if pointer.x < rect.center().x {
                                InsertSide::Before
                            } else {
                                InsertSide::After
                            };
                            insert_hint = Some(TabDropHint { tab: hovered, side });
                        }
                        Some(container) => merge_target = Some(container),
                        None => {}
                    }
                }
            }
            Some(TabDragTarget::TabBar { container }) => {
                if container != state.source && self.store.container(container).is_some() {
                    merge_target = Some(container);
                }
            }
            None => {}
        }

        let DragPhase::TabDrag(state) = &mut self.drag else {
            return;
        };
        state.pointer = Some(pointer);
        state.over_target = over_target;
        state.insert_hint = insert_hint;
        state.merge_target = merge_target;
    }

    /// Drops the dragged tab on whatever the session state says. Reorder and
    /// merge operate on window identity, never on stale screen positions.
    pub fn tab_drag_drop(&mut self) {
        let DragPhase::TabDrag(state) = std::mem::take(&mut self.drag) else {
            return;
        };
        let TabDragState {
            window,
            source,
            pointer,
            over_target,
            insert_hint,
            merge_target,
        } = state;
        if self.store.window(&window).is_none() {
            return;
        }

        if let Some(target) = merge_target {
            if self.store.container(target).is_some() {
                self.move_window_to_container(&window, target);
            }
            return;
        }
        if let Some(hint) = insert_hint {
            self.reorder_within(&window, source, hint);
            return;
        }
        // No indicator: tear off, but only for a genuine outside drop. A drop
        // on a tab that produced no indicator (the dragged tab itself, say)
        // is a no-op.
        if over_target {
            return;
        }
        if let Some(pointer) = pointer {
            if self.container_under_pointer(pointer, None).is_none() {
                self.pop_out_window(&window, Some(pointer));
            }
        }
    }

    /// Ends a tab drag that never saw a drop. With a known pointer outside
    /// every container this is the tear-off path; otherwise it only clears
    /// indicator state (cancellation-safe).
    pub fn tab_drag_end(&mut self, pointer: Option<Pos2>) {
        let DragPhase::TabDrag(state) = std::mem::take(&mut self.drag) else {
            return;
        };
        if self.store.window(&state.window).is_none() {
            return;
        }
        // An explicit release position is authoritative; falling back to the
        // last observed move also honors what it was hovering.
        let (pointer, over_target) = match pointer {
            Some(pointer) => (Some(pointer), false),
            None => (state.pointer, state.over_target),
        };
        let Some(pointer) = pointer else {
            return;
        };
        if !over_target && self.container_under_pointer(pointer, None).is_none() {
            self.pop_out_window(&state.window, Some(pointer));
        }
    }

    /// Splice by identity. If the anchor tab died since the hint was shown,
    /// the order is left as it was.
    fn reorder_within(&mut self, window: &str, container: super::ContainerId, hint: TabDropHint) {
        if hint.tab == window {
            return;
        }
        let Some(record) = self.store.container_mut(container) else {
            return;
        };
        let Some(from) = record.tabs.iter().position(|tab| tab == window) else {
            return;
        };
        let dragged = record.tabs.remove(from);
        let Some(anchor) = record.tabs.iter().position(|tab| *tab == hint.tab) else {
            record.tabs.insert(from.min(record.tabs.len()), dragged);
            return;
        };
        let at = match hint.side {
            InsertSide::Before => anchor,
            InsertSide::After => anchor + 1,
        };
        record.tabs.insert(at, dragged);
    }

    /// Begins moving a container by its header. The container is raised
    /// immediately, as pressing the header does.
    pub fn header_drag_start(&mut self, container: super::ContainerId, pointer: Pos2) {
        let Some(record) = self.store.container(container) else {
            return;
        };
        if record.minimized {
            return;
        }
        let rect_start = record.rect;
        self.bring_container_to_front(container);
        self.drag = DragPhase::HeaderDrag(HeaderDragState {
            container,
            pointer_start: pointer,
            rect_start,
            engaged: false,
            candidate: None,
            merge_eligible: false,
        });
    }

    /// Moves the container (viewport-clamped) and runs merge targeting:
    /// hovering another container arms a dwell timer; leaving it cancels the
    /// timer; outlasting the dwell makes that container merge-eligible.
    /// Below the click threshold nothing moves and no targeting happens.
    pub fn header_drag_move(&mut self, pointer: Pos2, now: f64) {
        let (container, pointer_start, rect_start, was_engaged, prev_candidate, was_eligible) =
            match &self.drag {
                DragPhase::HeaderDrag(s) => (
                    s.container,
                    s.pointer_start,
                    s.rect_start,
                    s.engaged,
                    s.candidate,
                    s.merge_eligible,
                ),
                _ => return,
            };
        if self.store.container(container).is_none() {
            self.drag = DragPhase::Idle;
            return;
        }

        let delta = pointer - pointer_start;
        if !was_engaged && delta.length() < self.options.header_drag_threshold {
            return;
        }

        let new_min = clamp_drag(rect_start, delta, self.viewport, self.options.min_visible);
        if let Some(record) = self.store.container_mut(container) {
            record.rect = Rect::from_min_size(new_min, rect_start.size());
        }

        let hovered = self.container_under_pointer(pointer, Some(container));
        let (candidate, merge_eligible) = match (prev_candidate, hovered) {
            (Some(candidate), Some(hovered)) if candidate.target == hovered => {
                let eligible =
                    was_eligible || now - candidate.entered_at >= self.options.merge_dwell;
                (Some(candidate), eligible)
            }
            (_, Some(hovered)) => (
                Some(MergeCandidate {
                    target: hovered,
                    entered_at: now,
                }),
                false,
            ),
            (_, None) => (None, false),
        };

        if let DragPhase::HeaderDrag(state) = &mut self.drag {
            state.engaged = true;
            state.candidate = candidate;
            state.merge_eligible = merge_eligible;
        }
    }

    /// Releases the header: merge into a dwell-qualified candidate, or snap
    /// the container back into the viewport.
    pub fn header_drag_end(&mut self, now: f64) {
        let DragPhase::HeaderDrag(state) = std::mem::take(&mut self.drag) else {
            return;
        };
        if !state.engaged {
            return; // a click: raised on press, nothing else to do
        }

        // The pointer may have rested on the candidate without further move
        // events, so the dwell is re-evaluated against the release time.
        let eligible = state.candidate.filter(|candidate| {
            state.merge_eligible || now - candidate.entered_at >= self.options.merge_dwell
        });
        if let Some(candidate) = eligible {
            if self.store.container(candidate.target).is_some()
                && self.store.container(state.container).is_some()
            {
                self.merge_containers(state.container, candidate.target);
                return;
            }
        }
        let viewport = self.viewport;
        let min_visible = self.options.min_visible;
        if let Some(record) = self.store.container_mut(state.container) {
            record.rect = constrain_to_viewport(record.rect, viewport, min_visible);
        }
    }

    pub fn resize_start(&mut self, container: super::ContainerId, edges: ResizeEdges) {
        if edges.is_empty() {
            return;
        }
        let Some(record) = self.store.container(container) else {
            return;
        };
        if record.minimized {
            return;
        }
        let rect_start = record.rect;
        self.bring_container_to_front(container);
        self.drag = DragPhase::Resize(ResizeState {
            container,
            rect_start,
            edges,
        });
    }

    pub fn resize_move(&mut self, delta: Vec2) {
        let (container, rect_start, edges) = match &self.drag {
            DragPhase::Resize(s) => (s.container, s.rect_start, s.edges),
            _ => return,
        };
        if self.store.container(container).is_none() {
            self.drag = DragPhase::Idle;
            return;
        }
        let rect = clamp_resize(
            rect_start,
            delta,
            edges,
            self.options.min_container_size,
            self.viewport,
            self.options.resize_edge_margin,
        );
        if let Some(record) = self.store.container_mut(container) {
            record.rect = rect;
        }
    }

    pub fn resize_end(&mut self) {
        let DragPhase::Resize(state) = std::mem::take(&mut self.drag) else {
            return;
        };
        let viewport = self.viewport;
        let min_visible = self.options.min_visible;
        if let Some(record) = self.store.container_mut(state.container) {
            record.rect = constrain_to_viewport(record.rect, viewport, min_visible);
        }
    }

    /// Current drag candidacy, for rendering. Tab-drag merge targets are
    /// immediately eligible; header-drag targets only after the dwell.
    pub fn drag_indicators(&self) -> DragIndicators {
        match &self.drag {
            DragPhase::TabDrag(state) => DragIndicators {
                insert_hint: state.insert_hint.clone(),
                merge_target: state.merge_target,
                merge_eligible: state.merge_target.is_some(),
            },
            DragPhase::HeaderDrag(state) => DragIndicators {
                insert_hint: None,
                merge_target: state.candidate.map(|c| c.target),
                merge_eligible: state.merge_eligible,
            },
            DragPhase::Resize(_) | DragPhase::Idle => DragIndicators::default(),
        }
    }

    /// A dragged window died (racing close): the session ends, silently.
    pub(super) fn abort_drag_for_window(&mut self, id: &str) {
        if matches!(&self.drag, DragPhase::TabDrag(s) if s.window == id) {
            self.drag = DragPhase::Idle;
        }
    }

    /// A container died: end sessions dragging it, and clear candidacy that
    /// pointed at it.
    pub(super) fn abort_drag_for_container(&mut self, id: super::ContainerId) {
        let killed = match &self.drag {
            DragPhase::TabDrag(state) => state.source == id,
            DragPhase::HeaderDrag(state) => state.container == id,
            DragPhase::Resize(state) => state.container == id,
            DragPhase::Idle => false,
        };
        if killed {
            self.drag = DragPhase::Idle;
            return;
        }
        match &mut self.drag {
            DragPhase::TabDrag(state) => {
                if state.merge_target == Some(id) {
                    state.merge_target = None;
                }
            }
            DragPhase::HeaderDrag(state) => {
                if state.candidate.is_some_and(|c| c.target == id) {
                    state.candidate = None;
                    state.merge_eligible = false;
                }
            }
            DragPhase::Resize(_) | DragPhase::Idle => {}
        }
    }
}
