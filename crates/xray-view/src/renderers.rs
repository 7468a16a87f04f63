//! State renderers: the attributes printed after each node's name.

use std::sync::Arc;

use anyhow::Result;
use xray_core::attributes::{format_pixel_dimensions, AttributeAppendable, TextFormat};
use xray_core::ConfigError;

use crate::composable::{Composable, SemanticsProperty};
use crate::node::ScannableNode;
use crate::view::{View, Visibility};

/// Appends attributes describing one node.
///
/// Renderers run in order for every node, and each one ignores the node
/// kinds it does not know about.
pub trait ViewStateRenderer: Send + Sync {
    fn render(
        &self,
        attributes: &mut AttributeAppendable<'_>,
        node: &dyn ScannableNode,
    ) -> Result<()>;
}

pub type SharedStateRenderer = Arc<dyn ViewStateRenderer>;

/// Core view and composable attributes: id, visibility, size, focus,
/// enabled and selected state, semantics and layout id.
#[derive(Debug, Clone, Copy, Default)]
pub struct ViewRenderer;

impl ViewStateRenderer for ViewRenderer {
    fn render(
        &self,
        attributes: &mut AttributeAppendable<'_>,
        node: &dyn ScannableNode,
    ) -> Result<()> {
        if let Some(view) = node.as_view() {
            render_view(attributes, view);
        }
        if let Some(composable) = node.as_composable() {
            render_composable(attributes, composable);
        }
        Ok(())
    }
}

fn render_view(attributes: &mut AttributeAppendable<'_>, view: &View) {
    let state = view.state();
    if let Some(id) = &state.id {
        attributes.append_labeled("id", id);
    }
    match state.visibility {
        Visibility::Gone => attributes.append("GONE"),
        Visibility::Invisible => attributes.append("INVISIBLE"),
        Visibility::Visible => {}
    }
    attributes.append(format_pixel_dimensions(state.width, state.height));
    if state.focused {
        attributes.append("focused");
    }
    if !state.enabled {
        attributes.append("disabled");
    }
    if state.selected {
        attributes.append("selected");
    }
}

fn render_composable(attributes: &mut AttributeAppendable<'_>, composable: &Composable) {
    let state = composable.state();
    let (width, height) = (state.bounds.width(), state.bounds.height());
    if width != 0 || height != 0 {
        attributes.append(format_pixel_dimensions(width, height));
    }

    for property in &state.semantics {
        render_semantics(attributes, property);
    }

    if let Some(layout_id) = &state.layout_id {
        attributes.append_labeled("layout-id", layout_id);
    }
}

fn render_semantics(attributes: &mut AttributeAppendable<'_>, property: &SemanticsProperty) {
    use SemanticsProperty::*;

    match property {
        TestTag(tag) => attributes.append_quoted("test-tag", tag),
        ContentDescription(descriptions) => {
            let quoted: Vec<String> = descriptions.iter().map(|d| format!("\"{d}\"")).collect();
            attributes.append(format!("content-description:[{}]", quoted.join(", ")));
        }
        StateDescription(description) => attributes.append_quoted("state-description", description),
        Disabled => attributes.append("DISABLED"),
        Focused(true) => attributes.append("FOCUSED"),
        Focused(false) => {}
        Dialog => attributes.append("DIALOG"),
        Popup => attributes.append("POPUP"),
        ProgressBarRange {
            current,
            start,
            end,
            steps,
        } => attributes.append(format!(
            "progress-bar-range:ProgressBarRangeInfo(current={current:?}, range={start:?}..{end:?}, steps={steps})"
        )),
        PaneTitle(title) => attributes.append_quoted("pane-title", title),
        SelectableGroup => attributes.append("SELECTABLE-GROUP"),
        Heading => attributes.append("HEADING"),
        InvisibleToUser => attributes.append("INVISIBLE-TO-USER"),
        HorizontalScrollAxisRange { value, max_value } => attributes.append_quoted(
            "horizontal-scroll-axis-range",
            &format!("ScrollAxisRange(value={value:?}, maxValue={max_value:?})"),
        ),
        VerticalScrollAxisRange { value, max_value } => attributes.append_quoted(
            "vertical-scroll-axis-range",
            &format!("ScrollAxisRange(value={value:?}, maxValue={max_value:?})"),
        ),
        Role(role) => attributes.append_labeled("role", format!("{role:?}")),
        TextSelectionRange { .. } => attributes.append("SELECTED-TEXT"),
        ImeAction(action) => attributes.append_labeled("ime-action", format!("{action:?}")),
        Selected(true) => attributes.append("SELECTED"),
        Selected(false) => {}
        ToggleState(state) => attributes.append_labeled("toggle-state", format!("{state:?}")),
        Password => attributes.append("PASSWORD"),
        // Rendered by TextValueRenderer.
        Text(_) | EditableText(_) => {}
    }
}

/// Text content of views and composables.
///
/// The length is always printed. The content is printed only when the
/// renderer was built to include it, ellipsized to the maximum length.
#[derive(Debug, Clone, Copy, Default)]
pub struct TextValueRenderer {
    format: TextFormat,
}

impl TextValueRenderer {
    /// Fails if `render_value` is set and `max_length` is 0.
    pub fn new(render_value: bool, max_length: usize) -> Result<Self, ConfigError> {
        Ok(Self {
            format: TextFormat::new(render_value, max_length)?,
        })
    }

    pub fn format(&self) -> &TextFormat {
        &self.format
    }
}

impl ViewStateRenderer for TextValueRenderer {
    fn render(
        &self,
        attributes: &mut AttributeAppendable<'_>,
        node: &dyn ScannableNode,
    ) -> Result<()> {
        if let Some(view) = node.as_view() {
            let state = view.state();
            self.format.append_text(attributes, "text", state.text.as_deref());
            if state.ime_target {
                attributes.append("ime-target");
            }
        }

        if let Some(composable) = node.as_composable() {
            let semantics = composable.state().semantics;
            let texts: Vec<String> = semantics
                .iter()
                .filter_map(|property| match property {
                    SemanticsProperty::Text(values) => Some(values.join(", ")),
                    _ => None,
                })
                .collect();
            let editable: Vec<&str> = semantics
                .iter()
                .filter_map(|property| match property {
                    SemanticsProperty::EditableText(value) => Some(value.as_str()),
                    _ => None,
                })
                .collect();

            if !texts.is_empty() {
                self.format.append_text(attributes, "text", Some(&texts.join(" ")));
            }
            if !editable.is_empty() {
                self.format
                    .append_text(attributes, "editable-text", Some(&editable.join(" ")));
            }
        }
        Ok(())
    }
}

/// `checked` for checkable views that are checked.
#[derive(Debug, Clone, Copy, Default)]
pub struct CheckableRenderer;

impl ViewStateRenderer for CheckableRenderer {
    fn render(
        &self,
        attributes: &mut AttributeAppendable<'_>,
        node: &dyn ScannableNode,
    ) -> Result<()> {
        if node.as_view().and_then(|view| view.state().checked) == Some(true) {
            attributes.append("checked");
        }
        Ok(())
    }
}

/// Build a text renderer as a shared renderer.
pub fn text_renderer(
    render_value: bool,
    max_length: usize,
) -> Result<SharedStateRenderer, ConfigError> {
    Ok(Arc::new(TextValueRenderer::new(render_value, max_length)?))
}

/// Default renderers that never print text content.
pub fn defaults_no_pii() -> Vec<SharedStateRenderer> {
    vec![
        Arc::new(ViewRenderer),
        Arc::new(TextValueRenderer::default()),
        Arc::new(CheckableRenderer),
    ]
}

/// Default renderers, printing full text content.
pub fn defaults_including_pii() -> Vec<SharedStateRenderer> {
    vec![
        Arc::new(ViewRenderer),
        Arc::new(TextValueRenderer {
            format: TextFormat::full_value(),
        }),
        Arc::new(CheckableRenderer),
    ]
}

struct ViewsOnly<F>(F);

impl<F> ViewStateRenderer for ViewsOnly<F>
where
    F: Fn(&mut AttributeAppendable<'_>, &View) -> Result<()> + Send + Sync,
{
    fn render(
        &self,
        attributes: &mut AttributeAppendable<'_>,
        node: &dyn ScannableNode,
    ) -> Result<()> {
        match node.as_view() {
            Some(view) => (self.0)(attributes, view),
            None => Ok(()),
        }
    }
}

struct ComposablesOnly<F>(F);

impl<F> ViewStateRenderer for ComposablesOnly<F>
where
    F: Fn(&mut AttributeAppendable<'_>, &Composable) -> Result<()> + Send + Sync,
{
    fn render(
        &self,
        attributes: &mut AttributeAppendable<'_>,
        node: &dyn ScannableNode,
    ) -> Result<()> {
        match node.as_composable() {
            Some(composable) => (self.0)(attributes, composable),
            None => Ok(()),
        }
    }
}

/// Renderer that only runs `render` on views.
pub fn view_state_renderer_for_views<F>(render: F) -> SharedStateRenderer
where
    F: Fn(&mut AttributeAppendable<'_>, &View) -> Result<()> + Send + Sync + 'static,
{
    Arc::new(ViewsOnly(render))
}

/// Renderer that only runs `render` on composables.
pub fn view_state_renderer_for_composables<F>(render: F) -> SharedStateRenderer
where
    F: Fn(&mut AttributeAppendable<'_>, &Composable) -> Result<()> + Send + Sync + 'static,
{
    Arc::new(ComposablesOnly(render))
}
