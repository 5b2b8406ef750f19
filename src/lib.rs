//! Floating tabbed panels for hosted editor surfaces.
//!
//! [`PanelManager`] owns the window/container/tab state machine: windows live
//! as tabs inside draggable/resizable containers, tabs reorder and merge
//! across containers by drag-and-drop, containers minimize to a dock, and a
//! window can detach onto an independent host surface (returning home when it
//! closes). Rendering and input stay outside: the manager is driven through
//! an input-agnostic gesture protocol and exposes its state as plain data.

#![forbid(unsafe_code)]

pub mod geometry;
pub mod manager;

pub use geometry::{ResizeEdges, clamp_drag, clamp_resize, constrain_to_viewport};
pub use manager::{
    ContainerId, ContainerRecord, DetachedSurface, DockItem, DragIndicators, EntityStore, Hook,
    InsertSide, PanelManager, PanelManagerOptions, SurfaceHost, TabDragTarget, TabDropHint,
    WindowHooks, WindowRecord, WindowSpec, hook,
};
