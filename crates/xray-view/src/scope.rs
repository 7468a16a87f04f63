//! Scan scopes: where a scan finds the roots it renders.

use std::sync::Arc;

use crate::composable::Composable;
use crate::view::View;
use crate::window::WindowManager;

/// A node a scan starts from.
#[derive(Debug, Clone)]
pub enum ScanNode {
    View(Arc<View>),
    Composable(Arc<Composable>),
    /// A root that could not be read, rendered as its message.
    RenderingError(String),
}

/// A root to render, with the title printed above it.
#[derive(Debug, Clone)]
pub struct ScanRoot {
    pub title: String,
    pub window_focus: bool,
    pub node: ScanNode,
}

impl ScanRoot {
    pub fn view(title: impl Into<String>, view: Arc<View>) -> Self {
        Self {
            title: title.into(),
            window_focus: view.has_window_focus(),
            node: ScanNode::View(view),
        }
    }
}

/// Finds the roots of a scan.
pub trait ScanScope: Send + Sync {
    fn find_roots(&self) -> Vec<ScanRoot>;
}

/// Every attached window, in attach order.
#[derive(Debug, Clone)]
pub struct AllWindowsScope(pub Arc<WindowManager>);

impl ScanScope for AllWindowsScope {
    fn find_roots(&self) -> Vec<ScanRoot> {
        self.0
            .windows()
            .into_iter()
            .map(|window| ScanRoot::view(window.title, window.root))
            .collect()
    }
}

/// Attached windows that have focus.
#[derive(Debug, Clone)]
pub struct FocusedWindowScope(pub Arc<WindowManager>);

impl ScanScope for FocusedWindowScope {
    fn find_roots(&self) -> Vec<ScanRoot> {
        self.0
            .windows()
            .into_iter()
            .filter(|window| window.has_focus())
            .map(|window| ScanRoot::view(window.title, window.root))
            .collect()
    }
}

/// One explicit view, titled with its class name.
#[derive(Debug, Clone)]
pub struct SingleViewScope(pub Arc<View>);

impl ScanScope for SingleViewScope {
    fn find_roots(&self) -> Vec<ScanRoot> {
        vec![ScanRoot::view(self.0.class_name(), Arc::clone(&self.0))]
    }
}

/// No roots at all.
#[derive(Debug, Clone, Copy, Default)]
pub struct EmptyScope;

impl ScanScope for EmptyScope {
    fn find_roots(&self) -> Vec<ScanRoot> {
        Vec::new()
    }
}

/// The outermost composables carrying `tag`, found depth-first below the
/// roots of another scope. A match is not searched further, so nested
/// matches are rendered as part of their outer match.
pub struct TestTagScope {
    pub tag: String,
    pub in_scope: Box<dyn ScanScope>,
}

impl TestTagScope {
    pub fn new(tag: impl Into<String>, in_scope: impl ScanScope + 'static) -> Self {
        Self {
            tag: tag.into(),
            in_scope: Box::new(in_scope),
        }
    }
}

enum Pending {
    View(Arc<View>),
    Composable(Arc<Composable>),
}

impl ScanScope for TestTagScope {
    fn find_roots(&self) -> Vec<ScanRoot> {
        let mut found = Vec::new();
        for root in self.in_scope.find_roots() {
            let mut stack = match &root.node {
                ScanNode::View(view) => vec![Pending::View(Arc::clone(view))],
                ScanNode::Composable(composable) => {
                    vec![Pending::Composable(Arc::clone(composable))]
                }
                ScanNode::RenderingError(_) => {
                    found.push(root);
                    continue;
                }
            };

            while let Some(next) = stack.pop() {
                // Children are pushed in reverse so they pop in order.
                match next {
                    Pending::View(view) => {
                        stack.extend(view.children().into_iter().rev().map(Pending::View));
                        if let Some(composition) = view.composition() {
                            stack.push(Pending::Composable(composition));
                        }
                    }
                    Pending::Composable(composable) => {
                        if composable.test_tags().contains(&self.tag) {
                            found.push(ScanRoot {
                                title: composable.name().to_string(),
                                window_focus: root.window_focus,
                                node: ScanNode::Composable(composable),
                            });
                            continue;
                        }
                        if let Some(view) = composable.view() {
                            stack.push(Pending::View(view));
                        }
                        stack.extend(
                            composable
                                .children()
                                .into_iter()
                                .rev()
                                .map(Pending::Composable),
                        );
                    }
                }
            }
        }
        found
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::composable::{ComposableState, SemanticsProperty};

    fn titles(roots: &[ScanRoot]) -> Vec<&str> {
        roots.iter().map(|root| root.title.as_str()).collect()
    }

    fn manager() -> Arc<WindowManager> {
        let manager = Arc::new(WindowManager::new());
        manager.add_window("main", View::new("DecorView"));
        manager.add_window("dialog", View::new("DecorView"));
        manager.focus_window("dialog");
        manager
    }

    #[test]
    fn all_windows_in_attach_order() {
        let roots = AllWindowsScope(manager()).find_roots();
        assert_eq!(titles(&roots), vec!["main", "dialog"]);
        assert!(!roots[0].window_focus);
        assert!(roots[1].window_focus);
    }

    #[test]
    fn focused_window_only() {
        let roots = FocusedWindowScope(manager()).find_roots();
        assert_eq!(titles(&roots), vec!["dialog"]);
    }

    #[test]
    fn single_view_is_titled_with_its_class() {
        let roots = SingleViewScope(View::new("android.widget.FrameLayout")).find_roots();
        assert_eq!(titles(&roots), vec!["android.widget.FrameLayout"]);
    }

    #[test]
    fn empty_scope_has_no_roots() {
        assert!(EmptyScope.find_roots().is_empty());
    }

    fn tagged(name: &str, tag: &str) -> Arc<Composable> {
        Composable::with_state(
            name,
            ComposableState {
                semantics: vec![SemanticsProperty::TestTag(tag.into())],
                ..ComposableState::default()
            },
        )
    }

    #[test]
    fn test_tag_scope_finds_outermost_matches_in_order() {
        let root = View::new("DecorView");
        let host = View::new("ComposeView");
        root.add_child(Arc::clone(&host));

        let column = Composable::new("Column");
        let outer = tagged("Card", "item");
        outer.add_child(tagged("Nested", "item"));
        column.add_child(outer);

        // A tagged composable inside a view embedded in the composition.
        let interop = Composable::new("AndroidView");
        let embedded_host = View::new("ComposeView");
        embedded_host.set_composition(Some(tagged("Inner", "item")));
        interop.set_view(Some(embedded_host));
        column.add_child(interop);
        column.add_child(tagged("Other", "other"));
        host.set_composition(Some(column));

        let manager = Arc::new(WindowManager::new());
        manager.add_window("main", root);
        manager.focus_window("main");

        let roots = TestTagScope::new("item", AllWindowsScope(manager)).find_roots();
        assert_eq!(titles(&roots), vec!["Card", "Inner"]);
        assert!(roots.iter().all(|root| root.window_focus));
        assert!(matches!(roots[0].node, ScanNode::Composable(_)));
    }

    #[test]
    fn test_tag_scope_without_match_is_empty() {
        let roots = TestTagScope::new("missing", SingleViewScope(View::new("View"))).find_roots();
        assert!(roots.is_empty());
    }
}
