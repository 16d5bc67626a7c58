//! Export mode: the page in a capture-ready configuration.
//!
//! Entering export mode expands every collapsible, forces pending entrance
//! animations to their resting state, hides interactive-only chrome and marks
//! the root. Every change is recorded in an [`ExportJournal`] together with
//! the value it replaced, and reverting the journal restores the tree exactly.

use tracing::debug;

use crate::sections::view::{NodePath, ViewNode};

/// Root marker classes components can style against during export.
pub const EXPORT_MARKERS: [&str; 2] = ["generating-pdf", "pdf-type-enhanced"];

/// Classes of nodes that make no sense outside the interactive page.
const INTERACTIVE_ONLY: [&str; 7] = [
    "web-only",
    "navigation",
    "scroll-progress-bar",
    "scroll-to-top",
    "toggle-details",
    "project-filters",
    "project-modal",
];

#[derive(Debug, Clone, PartialEq, Eq)]
enum Change {
    /// A class that was added; reverting removes it.
    Class { path: NodePath, class: String },
    Attr {
        path: NodePath,
        name: String,
        previous: Option<String>,
    },
    Style {
        path: NodePath,
        name: String,
        previous: Option<String>,
    },
}

/// The changes applied by [`enter_export_mode`], in application order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[must_use = "export mode must be reverted"]
pub struct ExportJournal {
    changes: Vec<Change>,
}

impl ExportJournal {
    pub fn len(&self) -> usize {
        self.changes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }

    fn add_class(&mut self, root: &mut ViewNode, path: &[usize], class: &str) {
        let Some(node) = root.node_at_mut(path) else {
            return;
        };
        if node.classes.insert(class.to_string()) {
            self.changes.push(Change::Class {
                path: path.to_vec(),
                class: class.to_string(),
            });
        }
    }

    fn set_attr(&mut self, root: &mut ViewNode, path: &[usize], name: &str, value: &str) {
        let Some(node) = root.node_at_mut(path) else {
            return;
        };
        if node.attr_value(name) == Some(value) {
            return;
        }
        let previous = node.attrs.insert(name.to_string(), value.to_string());
        self.changes.push(Change::Attr {
            path: path.to_vec(),
            name: name.to_string(),
            previous,
        });
    }

    /// `None` removes the property.
    fn set_style(&mut self, root: &mut ViewNode, path: &[usize], name: &str, value: Option<&str>) {
        let Some(node) = root.node_at_mut(path) else {
            return;
        };
        if node.style_value(name) == value {
            return;
        }
        let previous = match value {
            Some(value) => node.styles.insert(name.to_string(), value.to_string()),
            None => node.styles.remove(name),
        };
        self.changes.push(Change::Style {
            path: path.to_vec(),
            name: name.to_string(),
            previous,
        });
    }

    /// Undoes every recorded change, newest first. Returns how many were undone.
    pub fn revert(self, root: &mut ViewNode) -> usize {
        let total = self.changes.len();
        for change in self.changes.into_iter().rev() {
            match change {
                Change::Class { path, class } => {
                    if let Some(node) = root.node_at_mut(&path) {
                        node.classes.remove(&class);
                    }
                }
                Change::Attr {
                    path,
                    name,
                    previous,
                } => {
                    if let Some(node) = root.node_at_mut(&path) {
                        restore(&mut node.attrs, name, previous);
                    }
                }
                Change::Style {
                    path,
                    name,
                    previous,
                } => {
                    if let Some(node) = root.node_at_mut(&path) {
                        restore(&mut node.styles, name, previous);
                    }
                }
            }
        }
        debug!(changes = total, "export mode reverted");
        total
    }
}

fn restore(
    map: &mut std::collections::BTreeMap<String, String>,
    name: String,
    previous: Option<String>,
) {
    match previous {
        Some(value) => {
            map.insert(name, value);
        }
        None => {
            map.remove(&name);
        }
    }
}

#[derive(Default)]
struct Targets {
    expanded: Vec<NodePath>,
    toggles: Vec<NodePath>,
    animating: Vec<NodePath>,
    hidden: Vec<NodePath>,
}

fn collect_targets(root: &ViewNode) -> Targets {
    let mut targets = Targets::default();
    root.walk_paths(&mut |path, node| {
        if node.has_class("expanded-content") {
            targets.expanded.push(path.clone());
        }
        if node.has_class("toggle-details") {
            targets.toggles.push(path.clone());
        }
        if node.has_class("animate-enter") {
            targets.animating.push(path.clone());
        }
        if INTERACTIVE_ONLY.iter().any(|class| node.has_class(class)) {
            targets.hidden.push(path.clone());
        }
    });
    targets
}

/// Puts `root` into export mode and returns the journal that undoes it.
pub fn enter_export_mode(root: &mut ViewNode) -> ExportJournal {
    let targets = collect_targets(root);
    let mut journal = ExportJournal::default();

    for marker in EXPORT_MARKERS {
        journal.add_class(root, &[], marker);
    }
    for path in &targets.expanded {
        journal.set_attr(root, path, "data-expanded", "true");
        journal.set_style(root, path, "display", None);
    }
    for path in &targets.toggles {
        journal.set_attr(root, path, "aria-expanded", "true");
    }
    for path in &targets.animating {
        journal.set_style(root, path, "opacity", Some("1"));
        journal.set_style(root, path, "transform", Some("none"));
        journal.add_class(root, path, "animated");
    }
    for path in &targets.hidden {
        journal.set_style(root, path, "display", Some("none"));
    }

    debug!(
        expanded = targets.expanded.len(),
        animations = targets.animating.len(),
        hidden = targets.hidden.len(),
        "export mode applied"
    );
    journal
}
