use std::sync::Arc;

use parking_lot::RwLock;

use crate::view::View;

/// A top-level window: a title and its root view.
#[derive(Debug, Clone)]
pub struct Window {
    pub title: String,
    pub root: Arc<View>,
}

impl Window {
    pub fn has_focus(&self) -> bool {
        self.root.has_window_focus()
    }
}

/// Registry of the windows currently attached, in attach order.
#[derive(Debug, Default)]
pub struct WindowManager {
    windows: RwLock<Vec<Window>>,
}

impl WindowManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_window(&self, title: impl Into<String>, root: Arc<View>) {
        self.windows.write().push(Window {
            title: title.into(),
            root,
        });
    }

    /// Detach the first window titled `title`.
    pub fn remove_window(&self, title: &str) -> Option<Window> {
        let mut windows = self.windows.write();
        let index = windows.iter().position(|window| window.title == title)?;
        Some(windows.remove(index))
    }

    /// Give input focus to the window titled `title`, taking it from every
    /// other window. Returns false if no such window is attached.
    pub fn focus_window(&self, title: &str) -> bool {
        let windows = self.windows.read();
        let mut found = false;
        for window in windows.iter() {
            let focused = !found && window.title == title;
            found |= focused;
            window.root.update(|state| state.window_focus = focused);
        }
        found
    }

    /// Snapshot of the attached windows.
    pub fn windows(&self) -> Vec<Window> {
        self.windows.read().clone()
    }

    pub fn len(&self) -> usize {
        self.windows.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.windows.read().is_empty()
    }
}
