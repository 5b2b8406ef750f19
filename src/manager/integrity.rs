use super::PanelManager;
use super::types::ContainerId;

/// Structural invariant sweep, used by the model tests (and cheap enough to
/// run after every random step). Returns human-readable issue lines; empty
/// means healthy.
pub(super) fn integrity_issues<C>(manager: &PanelManager<C>) -> Vec<String> {
    let mut issues: Vec<String> = Vec::new();
    let store = manager.store();

    let window_ids: Vec<&str> = store.window_ids().collect();
    for id in window_ids {
        let Some(record) = store.window(id) else {
            continue;
        };
        match record.container {
            None => issues.push(format!("integrity: window {id:?} has no container")),
            Some(home) => match store.container(home) {
                None => issues.push(format!(
                    "integrity: window {id:?} references missing container {home:?}"
                )),
                Some(container) => {
                    if !container.tabs.iter().any(|tab| tab == id) {
                        issues.push(format!(
                            "integrity: window {id:?} not listed by its container {home:?}"
                        ));
                    }
                    if record.detached {
                        if record.minimized {
                            issues.push(format!("integrity: detached window {id:?} is minimized"));
                        }
                    } else if record.minimized != container.minimized {
                        issues.push(format!(
                            "integrity: window {id:?} minimized={} diverges from container {home:?} minimized={}",
                            record.minimized, container.minimized
                        ));
                    }
                }
            },
        }
        if record.detached != manager.surfaces.contains_key(id) {
            issues.push(format!(
                "integrity: window {id:?} detached={} but surface handle present={}",
                record.detached,
                manager.surfaces.contains_key(id)
            ));
        }
    }

    let mut z_seen: ahash::HashMap<u64, ContainerId> = ahash::HashMap::default();
    for (id, container) in store.containers() {
        if container.tabs.is_empty() {
            issues.push(format!("integrity: container {id:?} is empty"));
        }

        let mut local: ahash::HashSet<&str> = ahash::HashSet::default();
        for tab in &container.tabs {
            if !local.insert(tab.as_str()) {
                issues.push(format!(
                    "integrity: container {id:?} lists duplicate tab {tab:?}"
                ));
            }
            match store.window(tab) {
                None => issues.push(format!(
                    "integrity: container {id:?} lists missing window {tab:?}"
                )),
                Some(record) => {
                    if record.container != Some(id) {
                        issues.push(format!(
                            "integrity: container {id:?} lists window {tab:?} homed at {:?}",
                            record.container
                        ));
                    }
                }
            }
        }

        let visible_members = container
            .tabs
            .iter()
            .filter(|tab| store.window(tab).is_some_and(|record| !record.detached))
            .count();
        match &container.active {
            Some(active) => {
                if !container.tabs.contains(active) {
                    issues.push(format!(
                        "integrity: container {id:?} active {active:?} is not a member"
                    ));
                } else if store.window(active).is_some_and(|record| record.detached) {
                    issues.push(format!(
                        "integrity: container {id:?} active {active:?} is detached"
                    ));
                }
            }
            None => {
                if visible_members > 0 {
                    issues.push(format!(
                        "integrity: container {id:?} has visible members but no active window"
                    ));
                }
            }
        }

        if let Some(other) = z_seen.insert(container.z, id) {
            issues.push(format!(
                "integrity: containers {other:?} and {id:?} share z={}",
                container.z
            ));
        }
    }

    let mut dock_seen: ahash::HashSet<ContainerId> = ahash::HashSet::default();
    for &id in &manager.dock {
        if !dock_seen.insert(id) {
            issues.push(format!("integrity: dock lists container {id:?} twice"));
        }
        match store.container(id) {
            None => issues.push(format!("integrity: dock lists missing container {id:?}")),
            Some(container) => {
                if !container.minimized {
                    issues.push(format!(
                        "integrity: dock lists non-minimized container {id:?}"
                    ));
                }
            }
        }
    }

    issues
}
