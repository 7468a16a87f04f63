use std::sync::{Arc, Weak};

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

use crate::composable::Composable;

/// Whether a view is drawn and whether it takes space in its parent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    #[default]
    Visible,
    Invisible,
    Gone,
}

/// Mutable state of a [`View`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ViewState {
    /// Resource-id name, if the view has an id.
    pub id: Option<String>,
    pub visibility: Visibility,
    pub width: i32,
    pub height: i32,
    pub focused: bool,
    pub enabled: bool,
    pub selected: bool,
    /// Text content, for views that display text.
    pub text: Option<String>,
    /// Whether the view receives input from the soft keyboard.
    pub ime_target: bool,
    /// Checked state, for checkable views.
    pub checked: Option<bool>,
    /// Set on window roots whose window has input focus.
    pub window_focus: bool,
}

impl Default for ViewState {
    fn default() -> Self {
        Self {
            id: None,
            visibility: Visibility::Visible,
            width: 0,
            height: 0,
            focused: false,
            enabled: true,
            selected: false,
            text: None,
            ime_target: false,
            checked: None,
            window_focus: false,
        }
    }
}

/// A toolkit view.
///
/// Views are shared as `Arc<View>` and every piece of state sits behind a
/// lock, so the tree can be restructured by another thread while a scan
/// walks it. Readers never hold a lock across calls: a child index read
/// after [`child_count`](Self::child_count) may already be gone.
#[derive(Debug)]
pub struct View {
    class_name: String,
    state: RwLock<ViewState>,
    children: RwLock<Vec<Arc<View>>>,
    parent: RwLock<Weak<View>>,
    composition: RwLock<Option<Arc<Composable>>>,
}

impl View {
    /// Create a detached view with default state.
    pub fn new(class_name: impl Into<String>) -> Arc<View> {
        Self::with_state(class_name, ViewState::default())
    }

    pub fn with_state(class_name: impl Into<String>, state: ViewState) -> Arc<View> {
        Arc::new(View {
            class_name: class_name.into(),
            state: RwLock::new(state),
            children: RwLock::new(Vec::new()),
            parent: RwLock::new(Weak::new()),
            composition: RwLock::new(None),
        })
    }

    /// Fully qualified class name, e.g. `android.widget.TextView`.
    pub fn class_name(&self) -> &str {
        &self.class_name
    }

    /// Class name without its package or outer class.
    pub fn simple_class_name(&self) -> &str {
        self.class_name
            .rsplit(['.', '$'])
            .next()
            .unwrap_or(&self.class_name)
    }

    /// Copy of the current state.
    pub fn state(&self) -> ViewState {
        self.state.read().clone()
    }

    pub fn update(&self, f: impl FnOnce(&mut ViewState)) {
        f(&mut self.state.write());
    }

    /// Append `child`, detaching it from its previous parent.
    pub fn add_child(self: &Arc<Self>, child: Arc<View>) {
        if let Some(previous) = child.parent() {
            previous.remove_child(&child);
        }
        *child.parent.write() = Arc::downgrade(self);
        self.children.write().push(child);
    }

    /// Remove `child` if it is a direct child of this view.
    pub fn remove_child(&self, child: &Arc<View>) -> bool {
        let mut children = self.children.write();
        let Some(index) = children.iter().position(|c| Arc::ptr_eq(c, child)) else {
            return false;
        };
        let removed = children.remove(index);
        *removed.parent.write() = Weak::new();
        true
    }

    pub fn remove_child_at(&self, index: usize) -> Option<Arc<View>> {
        let mut children = self.children.write();
        if index >= children.len() {
            return None;
        }
        let removed = children.remove(index);
        *removed.parent.write() = Weak::new();
        Some(removed)
    }

    pub fn clear_children(&self) {
        for child in self.children.write().drain(..) {
            *child.parent.write() = Weak::new();
        }
    }

    pub fn child_count(&self) -> usize {
        self.children.read().len()
    }

    /// Child at `index`, or `None` if there is no longer such a child.
    pub fn child_at(&self, index: usize) -> Option<Arc<View>> {
        self.children.read().get(index).cloned()
    }

    /// Snapshot of the current children.
    pub fn children(&self) -> Vec<Arc<View>> {
        self.children.read().clone()
    }

    pub fn parent(&self) -> Option<Arc<View>> {
        self.parent.read().upgrade()
    }

    /// Host a composition, or stop hosting one with `None`.
    pub fn set_composition(&self, root: Option<Arc<Composable>>) {
        *self.composition.write() = root;
    }

    pub fn composition(&self) -> Option<Arc<Composable>> {
        self.composition.read().clone()
    }

    /// Whether the window this view is attached to has input focus.
    pub fn has_window_focus(&self) -> bool {
        match self.parent() {
            None => self.state.read().window_focus,
            Some(mut ancestor) => {
                while let Some(next) = ancestor.parent() {
                    ancestor = next;
                }
                ancestor.state.read().window_focus
            }
        }
    }

    pub fn is_checkable(&self) -> bool {
        self.state.read().checked.is_some()
    }
}
