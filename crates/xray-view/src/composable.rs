use std::fmt;
use std::sync::Arc;

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

use crate::view::View;

/// Pixel bounds of a composable in window coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct IntBounds {
    pub left: i32,
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
}

impl IntBounds {
    pub fn new(left: i32, top: i32, right: i32, bottom: i32) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    pub fn width(&self) -> i32 {
        self.right - self.left
    }

    pub fn height(&self) -> i32 {
        self.bottom - self.top
    }
}

/// Value given to a `layoutId` modifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LayoutId {
    Text(String),
    Number(i64),
}

impl fmt::Display for LayoutId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(text) => write!(f, "\"{text}\""),
            Self::Number(number) => write!(f, "{number}"),
        }
    }
}

/// Accessibility role of a composable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Role {
    Button,
    Checkbox,
    Switch,
    RadioButton,
    Tab,
    Image,
    DropdownList,
}

/// Action of the keyboard's enter key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ImeAction {
    Default,
    None,
    Go,
    Search,
    Send,
    Previous,
    Next,
    Done,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ToggleState {
    On,
    Off,
    Indeterminate,
}

/// One semantics entry attached to a composable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SemanticsProperty {
    TestTag(String),
    ContentDescription(Vec<String>),
    StateDescription(String),
    Disabled,
    Focused(bool),
    Dialog,
    Popup,
    ProgressBarRange { current: f32, start: f32, end: f32, steps: i32 },
    PaneTitle(String),
    SelectableGroup,
    Heading,
    InvisibleToUser,
    HorizontalScrollAxisRange { value: f32, max_value: f32 },
    VerticalScrollAxisRange { value: f32, max_value: f32 },
    Role(Role),
    TextSelectionRange { start: usize, end: usize },
    ImeAction(ImeAction),
    Selected(bool),
    ToggleState(ToggleState),
    Password,
    Text(Vec<String>),
    EditableText(String),
}

/// Mutable state of a [`Composable`].
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ComposableState {
    pub bounds: IntBounds,
    pub semantics: Vec<SemanticsProperty>,
    pub layout_id: Option<LayoutId>,
}

/// A node of a declarative composition.
///
/// Like [`View`], composables are shared as `Arc` and can be mutated while a
/// scan runs. A composable may embed a toolkit view, which is how a
/// composition nests views back inside itself.
#[derive(Debug)]
pub struct Composable {
    name: String,
    state: RwLock<ComposableState>,
    children: RwLock<Vec<Arc<Composable>>>,
    view: RwLock<Option<Arc<View>>>,
}

impl Composable {
    pub fn new(name: impl Into<String>) -> Arc<Composable> {
        Self::with_state(name, ComposableState::default())
    }

    pub fn with_state(name: impl Into<String>, state: ComposableState) -> Arc<Composable> {
        Arc::new(Composable {
            name: name.into(),
            state: RwLock::new(state),
            children: RwLock::new(Vec::new()),
            view: RwLock::new(None),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn state(&self) -> ComposableState {
        self.state.read().clone()
    }

    pub fn update(&self, f: impl FnOnce(&mut ComposableState)) {
        f(&mut self.state.write());
    }

    pub fn width(&self) -> i32 {
        self.state.read().bounds.width()
    }

    pub fn height(&self) -> i32 {
        self.state.read().bounds.height()
    }

    /// Every test tag set on this composable.
    pub fn test_tags(&self) -> Vec<String> {
        self.state
            .read()
            .semantics
            .iter()
            .filter_map(|property| match property {
                SemanticsProperty::TestTag(tag) => Some(tag.clone()),
                _ => None,
            })
            .collect()
    }

    pub fn add_child(&self, child: Arc<Composable>) {
        self.children.write().push(child);
    }

    pub fn remove_child_at(&self, index: usize) -> Option<Arc<Composable>> {
        let mut children = self.children.write();
        (index < children.len()).then(|| children.remove(index))
    }

    pub fn child_count(&self) -> usize {
        self.children.read().len()
    }

    /// Child at `index`, or `None` if there is no longer such a child.
    pub fn child_at(&self, index: usize) -> Option<Arc<Composable>> {
        self.children.read().get(index).cloned()
    }

    pub fn children(&self) -> Vec<Arc<Composable>> {
        self.children.read().clone()
    }

    /// Embed a toolkit view, or remove the embedded one with `None`.
    pub fn set_view(&self, view: Option<Arc<View>>) {
        *self.view.write() = view;
    }

    pub fn view(&self) -> Option<Arc<View>> {
        self.view.read().clone()
    }
}
