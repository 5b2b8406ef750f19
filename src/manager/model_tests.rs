use std::cell::Cell;
use std::rc::Rc;

use emath::{Rect, pos2, vec2};

use super::integrity;
use super::{
    ContainerId, DetachedSurface, PanelManager, SurfaceHost, TabDragTarget, WindowSpec,
};

fn assert_manager_ok(manager: &PanelManager<String>) {
    let issues = integrity::integrity_issues(manager);
    assert!(
        issues.is_empty(),
        "manager integrity failed:\n{}",
        issues.join("\n")
    );
}

#[derive(Clone)]
struct Rng(u64);

impl Rng {
    fn new(seed: u64) -> Self {
        Self(seed ^ 0xD0C3_D0C3_D0C3_D0C3)
    }

    fn next_u64(&mut self) -> u64 {
        // Simple LCG: deterministic, fast, no dependency.
        self.0 = self
            .0
            .wrapping_mul(6364136223846793005u64)
            .wrapping_add(1442695040888963407u64);
        self.0
    }

    fn next_usize(&mut self, upper: usize) -> usize {
        if upper == 0 {
            return 0;
        }
        (self.next_u64() as usize) % upper
    }

    fn next_bool(&mut self) -> bool {
        (self.next_u64() & 1) != 0
    }

    fn next_pos(&mut self) -> emath::Pos2 {
        pos2(
            (self.next_usize(2000) as f32) - 200.0,
            (self.next_usize(1200) as f32) - 200.0,
        )
    }
}

struct ModelSurface {
    open: Rc<Cell<bool>>,
}

impl DetachedSurface for ModelSurface {
    fn is_open(&self) -> bool {
        self.open.get()
    }

    fn close(&mut self) {
        self.open.set(false);
    }
}

#[derive(Default)]
struct ModelHost {
    refuse_next: bool,
    open_flags: Vec<Rc<Cell<bool>>>,
}

impl SurfaceHost<String> for ModelHost {
    fn open_surface(
        &mut self,
        _window: &str,
        _title: &str,
        _content: &String,
    ) -> Option<Box<dyn DetachedSurface>> {
        if self.refuse_next {
            return None;
        }
        let open = Rc::new(Cell::new(true));
        self.open_flags.push(open.clone());
        Some(Box::new(ModelSurface { open }))
    }
}

fn random_window(manager: &PanelManager<String>, rng: &mut Rng) -> Option<String> {
    let ids: Vec<&str> = manager.store().window_ids().collect();
    if ids.is_empty() {
        return None;
    }
    Some(ids[rng.next_usize(ids.len())].to_owned())
}

fn random_container(manager: &PanelManager<String>, rng: &mut Rng) -> Option<ContainerId> {
    let ids: Vec<ContainerId> = manager.store().container_ids().collect();
    if ids.is_empty() {
        return None;
    }
    Some(ids[rng.next_usize(ids.len())])
}

#[test]
fn empty_manager_is_healthy() {
    let manager: PanelManager<String> =
        PanelManager::new(Rect::from_min_size(pos2(0.0, 0.0), vec2(1600.0, 900.0)));
    assert_manager_ok(&manager);
    assert!(manager.dock_items().is_empty());
    assert!(manager.containers_back_to_front().is_empty());
}

#[test]
fn model_random_operations_keep_integrity() {
    for seed in 1u64..=10u64 {
        let mut rng = Rng::new(seed);
        let mut manager: PanelManager<String> =
            PanelManager::new(Rect::from_min_size(pos2(0.0, 0.0), vec2(1600.0, 900.0)));
        let mut host = ModelHost::default();
        let mut next_window = 0usize;
        let mut now = 0.0f64;

        for _step in 0..400 {
            now += 0.05;
            let roll = rng.next_usize(100);

            if roll < 16 {
                let id = format!("w{next_window}");
                next_window += 1;
                let _ =
                    manager.create_window(WindowSpec::new(id.clone(), id.to_uppercase(), id));
            } else if roll < 24 {
                if let Some(id) = random_window(&manager, &mut rng) {
                    manager.close_window(&id);
                }
            } else if roll < 30 {
                if let Some(id) = random_window(&manager, &mut rng) {
                    manager.focus_window(&id);
                }
            } else if roll < 36 {
                if let Some(id) = random_container(&manager, &mut rng) {
                    manager.minimize_container(id);
                }
            } else if roll < 42 {
                if rng.next_bool() {
                    if let Some(id) = random_container(&manager, &mut rng) {
                        manager.restore_container(id);
                    }
                } else if let Some(id) = random_window(&manager, &mut rng) {
                    manager.restore_window(&id);
                }
            } else if roll < 48 {
                let (source, target) = (
                    random_container(&manager, &mut rng),
                    random_container(&manager, &mut rng),
                );
                if let (Some(source), Some(target)) = (source, target) {
                    manager.merge_containers(source, target);
                }
            } else if roll < 54 {
                let (window, target) = (
                    random_window(&manager, &mut rng),
                    random_container(&manager, &mut rng),
                );
                if let (Some(window), Some(target)) = (window, target) {
                    manager.move_window_to_container(&window, target);
                }
            } else if roll < 58 {
                if let Some(id) = random_window(&manager, &mut rng) {
                    let _ = manager.move_window_to_new_container(&id);
                }
            } else if roll < 64 {
                if let Some(id) = random_window(&manager, &mut rng) {
                    host.refuse_next = rng.next_usize(4) == 0;
                    manager.detach_window(&mut host, &id);
                }
            } else if roll < 68 {
                // A surface closes on the host side; a later poll observes it.
                if !host.open_flags.is_empty() {
                    let pick = rng.next_usize(host.open_flags.len());
                    host.open_flags[pick].set(false);
                }
            } else if roll < 74 {
                manager.update(now);
            } else if roll < 78 {
                if let Some(id) = random_window(&manager, &mut rng) {
                    manager.notify_surface_closed(&id);
                }
            } else if roll < 88 {
                // Tab drag soup: legal and stale targets alike.
                if let Some(dragged) = random_window(&manager, &mut rng) {
                    manager.tab_drag_start(&dragged);
                    let moves = 1 + rng.next_usize(3);
                    for _ in 0..moves {
                        let over = match rng.next_usize(3) {
                            0 => random_window(&manager, &mut rng).map(|window| {
                                TabDragTarget::Tab {
                                    window,
                                    rect: Rect::from_min_size(rng.next_pos(), vec2(80.0, 24.0)),
                                }
                            }),
                            1 => random_container(&manager, &mut rng)
                                .map(|container| TabDragTarget::TabBar { container }),
                            _ => None,
                        };
                        manager.tab_drag_move(rng.next_pos(), over);
                    }
                    if rng.next_usize(8) == 0 {
                        // The dragged window dies mid-gesture.
                        manager.close_window(&dragged);
                    }
                    if rng.next_bool() {
                        manager.tab_drag_drop();
                    } else {
                        let pointer = rng.next_bool().then(|| rng.next_pos());
                        manager.tab_drag_end(pointer);
                    }
                }
            } else if roll < 96 {
                if let Some(container) = random_container(&manager, &mut rng) {
                    manager.header_drag_start(container, rng.next_pos());
                    let moves = 1 + rng.next_usize(3);
                    for _ in 0..moves {
                        now += 0.05;
                        manager.header_drag_move(rng.next_pos(), now);
                    }
                    now += (rng.next_usize(10) as f64) * 0.05;
                    manager.header_drag_end(now);
                }
            } else {
                let width = 800 + rng.next_usize(1200);
                let height = 500 + rng.next_usize(800);
                manager.set_viewport(Rect::from_min_size(
                    pos2(0.0, 0.0),
                    vec2(width as f32, height as f32),
                ));
            }

            assert_manager_ok(&manager);
        }

        // Drain: close everything and make sure nothing is left behind.
        let ids: Vec<String> = manager.store().window_ids().map(str::to_owned).collect();
        for id in ids {
            manager.close_window(&id);
            assert_manager_ok(&manager);
        }
        assert_eq!(manager.store().window_count(), 0);
        assert_eq!(manager.store().container_count(), 0);
        assert!(manager.dock_items().is_empty());
        assert_eq!(manager.detached_surface_count(), 0);
    }
}
