//! JSON snapshots of a window hierarchy.
//!
//! ```json
//! {
//!   "windows": [
//!     {
//!       "title": "main",
//!       "focused": true,
//!       "root": {
//!         "class_name": "android.widget.FrameLayout",
//!         "state": { "width": 1080, "height": 1920 },
//!         "children": [
//!           { "class_name": "android.widget.TextView", "state": { "text": "Hello" } }
//!         ]
//!       }
//!     }
//!   ]
//! }
//! ```

use std::fs;
use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::composable::{Composable, ComposableState};
use crate::view::{View, ViewState};
use crate::window::WindowManager;

/// A saved hierarchy, loaded into a live [`WindowManager`] for scanning.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Snapshot {
    #[serde(default)]
    pub windows: Vec<WindowSnapshot>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WindowSnapshot {
    pub title: String,
    #[serde(default)]
    pub focused: bool,
    pub root: ViewSnapshot,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ViewSnapshot {
    pub class_name: String,
    #[serde(default)]
    pub state: ViewState,
    #[serde(default)]
    pub children: Vec<ViewSnapshot>,
    #[serde(default)]
    pub composition: Option<Box<ComposableSnapshot>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ComposableSnapshot {
    pub name: String,
    #[serde(default)]
    pub state: ComposableState,
    #[serde(default)]
    pub children: Vec<ComposableSnapshot>,
    #[serde(default)]
    pub view: Option<Box<ViewSnapshot>>,
}

impl Snapshot {
    pub fn from_json_str(input: &str) -> Result<Self> {
        serde_json::from_str(input).context("failed to parse hierarchy snapshot JSON")
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("failed to read hierarchy snapshot at {}", path.display()))?;

        Self::from_json_str(&raw)
            .with_context(|| format!("invalid hierarchy snapshot at {}", path.display()))
    }

    /// Capture the current state of every window of `manager`.
    pub fn capture(manager: &WindowManager) -> Self {
        let windows = manager
            .windows()
            .into_iter()
            .map(|window| WindowSnapshot {
                focused: window.has_focus(),
                root: ViewSnapshot::capture(&window.root),
                title: window.title,
            })
            .collect();
        Self { windows }
    }

    /// Build live windows from this snapshot. The last focused window wins
    /// focus.
    pub fn into_window_manager(self) -> WindowManager {
        let manager = WindowManager::new();
        let mut focused = None;
        for window in self.windows {
            if window.focused {
                focused = Some(window.title.clone());
            }
            manager.add_window(window.title, window.root.build());
        }
        if let Some(title) = focused {
            manager.focus_window(&title);
        }
        manager
    }
}

impl ViewSnapshot {
    /// Build a live view tree.
    pub fn build(self) -> Arc<View> {
        let view = View::with_state(self.class_name, self.state);
        for child in self.children {
            view.add_child(child.build());
        }
        if let Some(composition) = self.composition {
            view.set_composition(Some(composition.build()));
        }
        view
    }

    pub fn capture(view: &View) -> Self {
        let mut state = view.state();
        // Focus is captured per window.
        state.window_focus = false;
        Self {
            class_name: view.class_name().to_string(),
            state,
            children: view.children().iter().map(|child| Self::capture(child)).collect(),
            composition: view
                .composition()
                .map(|composition| Box::new(ComposableSnapshot::capture(&composition))),
        }
    }
}

impl ComposableSnapshot {
    pub fn build(self) -> Arc<Composable> {
        let composable = Composable::with_state(self.name, self.state);
        for child in self.children {
            composable.add_child(child.build());
        }
        if let Some(view) = self.view {
            composable.set_view(Some(view.build()));
        }
        composable
    }

    pub fn capture(composable: &Composable) -> Self {
        Self {
            name: composable.name().to_string(),
            state: composable.state(),
            children: composable
                .children()
                .iter()
                .map(|child| Self::capture(child))
                .collect(),
            view: composable
                .view()
                .map(|view| Box::new(ViewSnapshot::capture(&view))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::composable::SemanticsProperty;
    use crate::view::Visibility;

    const SNAPSHOT: &str = r#"
{
  "windows": [
    {
      "title": "main",
      "root": {
        "class_name": "android.widget.FrameLayout",
        "state": { "width": 1080, "height": 1920 },
        "children": [
          { "class_name": "android.widget.TextView", "state": { "text": "Hello", "visibility": "gone" } },
          {
            "class_name": "androidx.compose.ui.platform.ComposeView",
            "composition": {
              "name": "Column",
              "state": { "semantics": [{ "test-tag": "list" }] },
              "children": [
                { "name": "AndroidView", "view": { "class_name": "android.widget.CheckBox", "state": { "checked": true } } }
              ]
            }
          }
        ]
      }
    },
    { "title": "dialog", "focused": true, "root": { "class_name": "DecorView" } }
  ]
}
"#;

    #[test]
    fn loads_windows_and_nested_nodes() {
        let manager = Snapshot::from_json_str(SNAPSHOT).unwrap().into_window_manager();
        let windows = manager.windows();
        assert_eq!(windows.len(), 2);
        assert_eq!(windows[0].title, "main");
        assert!(!windows[0].has_focus());
        assert!(windows[1].has_focus());

        let root = &windows[0].root;
        assert_eq!(root.state().width, 1080);
        let text = root.child_at(0).unwrap();
        assert_eq!(text.state().text.as_deref(), Some("Hello"));
        assert_eq!(text.state().visibility, Visibility::Gone);

        let column = root.child_at(1).unwrap().composition().unwrap();
        assert_eq!(column.state().semantics, vec![SemanticsProperty::TestTag("list".into())]);
        let checkbox = column.child_at(0).unwrap().view().unwrap();
        assert_eq!(checkbox.state().checked, Some(true));
    }

    #[test]
    fn unknown_fields_are_rejected() {
        let err = Snapshot::from_json_str(r#"{ "windows": [], "extra": 1 }"#)
            .unwrap_err()
            .to_string();
        assert!(err.contains("failed to parse hierarchy snapshot JSON"));
    }

    #[test]
    fn capture_reproduces_the_snapshot() {
        let snapshot = Snapshot::from_json_str(SNAPSHOT).unwrap();
        let manager = snapshot.clone().into_window_manager();
        assert_eq!(Snapshot::capture(&manager), snapshot);
    }

    #[test]
    fn views_and_composables_nest_in_each_other() {
        let outer = View::new("ComposeView");
        let column = Composable::new("Column");
        let interop = Composable::new("AndroidView");
        let inner = View::new("ComposeView");
        inner.set_composition(Some(Composable::new("Text")));
        interop.set_view(Some(inner));
        column.add_child(interop);
        outer.set_composition(Some(column));

        let snapshot = ViewSnapshot::capture(&outer);
        let json = serde_json::to_string(&snapshot).unwrap();
        let parsed: ViewSnapshot = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, snapshot);

        let rebuilt = parsed.build();
        let text = rebuilt
            .composition()
            .and_then(|column| column.child_at(0))
            .and_then(|interop| interop.view())
            .and_then(|inner| inner.composition())
            .unwrap();
        assert_eq!(text.name(), "Text");
    }

    #[test]
    fn missing_file_names_the_path() {
        let err = Snapshot::from_path(Path::new("/nonexistent/hierarchy.json"))
            .unwrap_err()
            .to_string();
        assert!(err.contains("/nonexistent/hierarchy.json"));
    }
}
