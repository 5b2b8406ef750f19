//! Pure, viewport-constrained drag/resize math.
//!
//! Everything here is deterministic and side-effect-free, and is called on
//! every pointer-move tick during an active gesture, so it must stay O(1) and
//! allocation-free.

use emath::{Pos2, Rect, Vec2, pos2, vec2};

/// Which edges take part in a resize gesture. Corners are two edges at once.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ResizeEdges {
    pub left: bool,
    pub right: bool,
    pub top: bool,
    pub bottom: bool,
}

impl ResizeEdges {
    pub const LEFT: Self = Self {
        left: true,
        right: false,
        top: false,
        bottom: false,
    };
    pub const RIGHT: Self = Self {
        left: false,
        right: true,
        top: false,
        bottom: false,
    };
    pub const TOP: Self = Self {
        left: false,
        right: false,
        top: true,
        bottom: false,
    };
    pub const BOTTOM: Self = Self {
        left: false,
        right: false,
        top: false,
        bottom: true,
    };
    pub const TOP_LEFT: Self = Self {
        left: true,
        right: false,
        top: true,
        bottom: false,
    };
    pub const TOP_RIGHT: Self = Self {
        left: false,
        right: true,
        top: true,
        bottom: false,
    };
    pub const BOTTOM_LEFT: Self = Self {
        left: true,
        right: false,
        top: false,
        bottom: true,
    };
    pub const BOTTOM_RIGHT: Self = Self {
        left: false,
        right: true,
        top: false,
        bottom: true,
    };

    pub fn is_empty(self) -> bool {
        !(self.left || self.right || self.top || self.bottom)
    }
}

/// Largest per-axis visibility requirement that is actually satisfiable.
///
/// A caller may ask for more visible pixels than the rect (or the viewport)
/// has; clamping the requirement first keeps every bound below well-ordered,
/// so we never feed inverted bounds into a clamp.
fn satisfiable_visible(min_visible: f32, size: f32, viewport_extent: f32) -> f32 {
    min_visible.max(0.0).min(size).min(viewport_extent)
}

fn clamp_drag_axis(wanted: f32, vp_lo: f32, vp_hi: f32, size: f32, min_visible: f32) -> f32 {
    let vis = satisfiable_visible(min_visible, size, vp_hi - vp_lo);
    let lo = vp_lo - (size - vis);
    let hi = (vp_hi - vis).max(lo);
    wanted.max(lo).min(hi)
}

/// New top-left for a rect dragged by `delta`, keeping at least `min_visible`
/// pixels of it reachable inside `viewport` on every edge.
///
/// Horizontal and vertical axes clamp independently: running out of room on
/// one axis never freezes the other.
pub fn clamp_drag(start: Rect, delta: Vec2, viewport: Rect, min_visible: f32) -> Pos2 {
    let size = start.size();
    pos2(
        clamp_drag_axis(
            start.min.x + delta.x,
            viewport.min.x,
            viewport.max.x,
            size.x,
            min_visible,
        ),
        clamp_drag_axis(
            start.min.y + delta.y,
            viewport.min.y,
            viewport.max.y,
            size.y,
            min_visible,
        ),
    )
}

/// Resize `start` by `delta` applied to the given edges.
///
/// Each moving edge is limited to at most `edge_margin` pixels past the
/// viewport boundary it moves toward; `min_size` always wins over the margin
/// bound, so a rect pinned against the viewport edge still honors its minimum.
pub fn clamp_resize(
    start: Rect,
    delta: Vec2,
    edges: ResizeEdges,
    min_size: Vec2,
    viewport: Rect,
    edge_margin: f32,
) -> Rect {
    let mut rect = start;

    if edges.left {
        let x = (start.min.x + delta.x).max(viewport.min.x - edge_margin);
        rect.min.x = x.min(rect.max.x - min_size.x);
    }
    if edges.right {
        let x = (start.max.x + delta.x).min(viewport.max.x + edge_margin);
        rect.max.x = x.max(rect.min.x + min_size.x);
    }
    if edges.top {
        let y = (start.min.y + delta.y).max(viewport.min.y - edge_margin);
        rect.min.y = y.min(rect.max.y - min_size.y);
    }
    if edges.bottom {
        let y = (start.max.y + delta.y).min(viewport.max.y + edge_margin);
        rect.max.y = y.max(rect.min.y + min_size.y);
    }

    rect
}

/// Idempotent post-hoc correction applied after a drag/resize ends or the
/// viewport changes: the top edge never ends up above the viewport top (the
/// header must stay grabbable), and at least `min_visible` pixels remain
/// reachable on the left, right and bottom.
pub fn constrain_to_viewport(rect: Rect, viewport: Rect, min_visible: f32) -> Rect {
    let size = rect.size();
    let vis_x = satisfiable_visible(min_visible, size.x, viewport.width());
    let vis_y = satisfiable_visible(min_visible, size.y, viewport.height());

    let lo_x = viewport.min.x - (size.x - vis_x);
    let hi_x = (viewport.max.x - vis_x).max(lo_x);
    let x = rect.min.x.max(lo_x).min(hi_x);

    // Bottom bound first; the hard top bound wins when they conflict.
    let y = rect
        .min
        .y
        .min((viewport.max.y - vis_y).max(viewport.min.y))
        .max(viewport.min.y);

    Rect::from_min_size(pos2(x, y), size)
}

/// Cascading spawn offset: step per already-spawned container, wrapping so a
/// long session never marches off-screen.
pub fn cascade_offset(spawn_count: u64, step: f32, wrap: f32) -> Vec2 {
    if wrap <= 0.0 || step <= 0.0 {
        return Vec2::ZERO;
    }
    let offset = ((spawn_count as f32) * step) % wrap;
    vec2(offset, offset)
}
