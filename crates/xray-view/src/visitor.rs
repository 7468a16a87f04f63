use std::rc::Rc;
use std::sync::Arc;

use anyhow::Result;
use xray_core::attributes::AttributeAppendable;
use xray_core::filter::FilterResult;
use xray_core::render::{RenderingScope, SharedVisitor, TreeRenderingVisitor};

use crate::composable::Composable;
use crate::filters::SharedFilter;
use crate::node::{AnyNode, ScannableNode};
use crate::renderers::SharedStateRenderer;
use crate::view::View;

/// Describes views and registers their children.
///
/// A view hosting a composition registers the composition root with a
/// [`ComposableVisitor`], which hands embedded views back to a copy of this
/// visitor.
#[derive(Clone)]
pub struct ViewTreeVisitor {
    renderers: Arc<[SharedStateRenderer]>,
    filter: SharedFilter,
}

impl ViewTreeVisitor {
    pub fn new(renderers: Arc<[SharedStateRenderer]>, filter: SharedFilter) -> Self {
        Self { renderers, filter }
    }

    fn decide(&self, node: &AnyNode) -> FilterResult {
        self.filter.filter(node)
    }
}

impl TreeRenderingVisitor<Arc<View>> for ViewTreeVisitor {
    fn visit_node(&self, scope: &mut RenderingScope<'_, Arc<View>>, node: &Arc<View>) -> Result<()> {
        describe(scope.description(), &**node, &self.renderers)?;

        if let Some(root) = node.composition() {
            let result = self.decide(&*root);
            let composables: SharedVisitor<'_, Arc<Composable>> =
                Rc::new(ComposableVisitor::new(self.clone()));
            scope.add_filtered_child(root, composables, result);
        }

        // Read once: children removed meanwhile come back as None below.
        let child_count = node.child_count();
        for index in 0..child_count {
            let Some(child) = node.child_at(index) else {
                continue;
            };
            let result = self.decide(&*child);
            scope.add_filtered_child(child, scope.visitor(), result);
        }
        Ok(())
    }
}

/// Describes composables and registers their children, sending embedded
/// views back to the view visitor.
#[derive(Clone)]
pub struct ComposableVisitor {
    views: ViewTreeVisitor,
}

impl ComposableVisitor {
    pub fn new(views: ViewTreeVisitor) -> Self {
        Self { views }
    }
}

impl TreeRenderingVisitor<Arc<Composable>> for ComposableVisitor {
    fn visit_node(
        &self,
        scope: &mut RenderingScope<'_, Arc<Composable>>,
        node: &Arc<Composable>,
    ) -> Result<()> {
        describe(scope.description(), &**node, &self.views.renderers)?;

        let child_count = node.child_count();
        for index in 0..child_count {
            let Some(child) = node.child_at(index) else {
                continue;
            };
            let result = self.views.decide(&*child);
            scope.add_filtered_child(child, scope.visitor(), result);
        }

        if let Some(view) = node.view() {
            let result = self.views.decide(&*view);
            let views: SharedVisitor<'_, Arc<View>> = Rc::new(self.views.clone());
            scope.add_filtered_child(view, views, result);
        }
        Ok(())
    }
}

/// Describes the placeholder node standing for a root that could not be
/// read.
#[derive(Debug, Clone, Copy, Default)]
pub struct MessageVisitor;

impl TreeRenderingVisitor<String> for MessageVisitor {
    fn visit_node(&self, scope: &mut RenderingScope<'_, String>, node: &String) -> Result<()> {
        scope.description().push_str(node);
        Ok(())
    }
}

fn describe(
    out: &mut String,
    node: &dyn ScannableNode,
    renderers: &[SharedStateRenderer],
) -> Result<()> {
    out.push_str(node.display_name());
    let mut attributes = AttributeAppendable::new(out);
    for renderer in renderers {
        renderer.render(&mut attributes, node)?;
    }
    attributes.finish();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::composable::{ComposableState, IntBounds, SemanticsProperty};
    use crate::filters::{filter_for_composables, skip_ids_filter, skip_test_tags_filter};
    use crate::renderers::defaults_no_pii;
    use crate::view::ViewState;
    use anyhow::bail;
    use xray_core::filter::AllowAll;
    use xray_core::render::TreeRenderer;
    use xray_core::Glyphs;

    const BLANK: char = '\u{a0}';

    fn visitor_with(filter: SharedFilter) -> ViewTreeVisitor {
        ViewTreeVisitor::new(defaults_no_pii().into(), filter)
    }

    fn render_view(root: Arc<View>, visitor: ViewTreeVisitor) -> String {
        let mut out = String::new();
        TreeRenderer::default()
            .render(&mut out, root, Rc::new(visitor))
            .unwrap();
        out
    }

    fn lines(expected: &[&str]) -> String {
        expected
            .iter()
            .map(|line| format!("{BLANK}{line}\n"))
            .collect()
    }

    fn frame_layout() -> Arc<View> {
        let root = View::new("android.widget.FrameLayout");
        root.add_child(View::new("android.view.View"));
        let column = View::new("android.widget.LinearLayout");
        column.add_child(View::new("android.view.View"));
        column.add_child(View::new("android.view.View"));
        root.add_child(column);
        root
    }

    #[test]
    fn nested_views() {
        let out = render_view(frame_layout(), visitor_with(Arc::new(AllowAll)));
        assert_eq!(
            out,
            lines(&[
                "FrameLayout { 0x0px }",
                "├─View { 0x0px }",
                "╰─LinearLayout { 0x0px }",
                "  ├─View { 0x0px }",
                "  ╰─View { 0x0px }",
            ])
        );
    }

    #[test]
    fn skipped_ids_drop_the_subtree() {
        let root = frame_layout();
        let button = View::with_state(
            "Button",
            ViewState {
                id: Some("ads".into()),
                ..ViewState::default()
            },
        );
        button.add_child(View::new("TextView"));
        root.add_child(button);

        let out = render_view(root, visitor_with(Arc::new(skip_ids_filter(["ads"]))));
        assert!(out.contains("LinearLayout"));
        assert!(!out.contains("Button"));
        assert!(!out.contains("TextView"));
        assert!(out.contains("╰─LinearLayout"));
    }

    fn hosting_view() -> Arc<View> {
        let host = View::with_state(
            "androidx.compose.ui.platform.ComposeView",
            ViewState {
                width: 100,
                height: 200,
                ..ViewState::default()
            },
        );
        let column = Composable::with_state(
            "Column",
            ComposableState {
                bounds: IntBounds::new(0, 0, 100, 200),
                ..ComposableState::default()
            },
        );
        column.add_child(Composable::with_state(
            "Text",
            ComposableState {
                semantics: vec![SemanticsProperty::Text(vec!["Hello".into()])],
                ..ComposableState::default()
            },
        ));
        let interop = Composable::with_state(
            "AndroidView",
            ComposableState {
                semantics: vec![SemanticsProperty::TestTag("interop".into())],
                ..ComposableState::default()
            },
        );
        let embedded = View::new("android.widget.TextView");
        embedded.update(|state| state.text = Some("Hi".into()));
        interop.set_view(Some(embedded));
        column.add_child(interop);
        host.set_composition(Some(column));
        host
    }

    #[test]
    fn composition_and_embedded_views_switch_visitors() {
        let mut out = String::new();
        TreeRenderer::new(Glyphs::ASCII)
            .render(&mut out, hosting_view(), Rc::new(visitor_with(Arc::new(AllowAll))))
            .unwrap();
        assert_eq!(
            out,
            lines(&[
                "ComposeView { 100x200px }",
                "`-Column { 100x200px }",
                "  +-Text { text-length:5 }",
                "  `-AndroidView { test-tag:\"interop\" }",
                "    `-TextView { 0x0px, text-length:2 }",
            ])
        );
    }

    #[test]
    fn composables_can_be_flattened() {
        let filter = filter_for_composables(|composable| {
            if composable.name() == "Column" {
                FilterResult::IncludeOnlyChildren
            } else {
                FilterResult::Include
            }
        });
        let out = render_view(hosting_view(), visitor_with(Arc::new(filter)));
        assert_eq!(
            out,
            lines(&[
                "ComposeView { 100x200px }",
                "├─Text { text-length:5 }",
                "╰─AndroidView { test-tag:\"interop\" }",
                "  ╰─TextView { 0x0px, text-length:2 }",
            ])
        );
    }

    #[test]
    fn skipped_test_tags_drop_embedded_views() {
        let out = render_view(
            hosting_view(),
            visitor_with(Arc::new(skip_test_tags_filter(["interop"]))),
        );
        assert!(!out.contains("AndroidView"));
        assert!(!out.contains("TextView"));
        assert!(out.contains("╰─Text { text-length:5 }"));
    }

    #[test]
    fn failing_renderer_stops_traversal() {
        let failing: SharedStateRenderer =
            crate::renderers::view_state_renderer_for_views(|_, view| {
                if view.simple_class_name() == "LinearLayout" {
                    bail!("Leave me alone");
                }
                Ok(())
            });
        let visitor = ViewTreeVisitor::new(vec![failing].into(), Arc::new(AllowAll));
        let mut out = String::new();
        let err = TreeRenderer::default()
            .render(&mut out, frame_layout(), Rc::new(visitor))
            .unwrap_err();
        assert_eq!(err.to_string(), "Leave me alone");
        assert_eq!(out, lines(&["FrameLayout", "├─View"]));
    }
}
