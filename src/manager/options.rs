use emath::{Vec2, vec2};

/// Options for [`super::PanelManager`].
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PanelManagerOptions {
    /// Pixels of a container that must stay reachable inside the viewport on
    /// every edge during drags and after viewport changes, so the header can
    /// always be grabbed again.
    pub min_visible: f32,

    /// Hard lower bound on container size during resize.
    pub min_container_size: Vec2,

    /// Size of a freshly spawned container when nothing better is known.
    pub default_container_size: Vec2,

    /// Cascade step for spawn placement: each new container is offset by this
    /// many pixels (both axes) from the viewport center, per prior spawn.
    pub cascade_step: f32,

    /// The cascade wraps back to the center after reaching this offset, so a
    /// long session never marches containers off-screen.
    pub cascade_wrap: f32,

    /// Pointer travel (in pixels) below which a header press is treated as a
    /// click: the container is raised but not moved, and no merge targeting
    /// happens.
    pub header_drag_threshold: f32,

    /// Seconds the pointer must dwell over another container during a header
    /// drag before that container becomes merge-eligible. Gating on dwell
    /// keeps ordinary repositioning from merging just by passing over a
    /// neighbor.
    pub merge_dwell: f64,

    /// Offset between the drop pointer and the top-left of a container
    /// spawned by tearing a tab off, so the pointer lands inside the new
    /// header rather than on its corner.
    pub tear_off_grab_offset: Vec2,

    /// How far (in pixels) a resized edge may cross its viewport boundary.
    pub resize_edge_margin: f32,

    /// Seconds between liveness polls of detached surfaces, for hosts without
    /// a close event. Hosts that have one should call
    /// [`super::PanelManager::notify_surface_closed`] instead; polling is the
    /// documented fallback.
    pub surface_poll_interval: f64,
}

impl Default for PanelManagerOptions {
    fn default() -> Self {
        Self {
            min_visible: 48.0,
            min_container_size: vec2(220.0, 120.0),
            default_container_size: vec2(480.0, 360.0),
            cascade_step: 32.0,
            cascade_wrap: 320.0,
            header_drag_threshold: 5.0,
            merge_dwell: 0.3,
            tear_off_grab_offset: vec2(20.0, 10.0),
            resize_edge_margin: 8.0,
            surface_poll_interval: 0.5,
        }
    }
}
