//! Filters deciding which views and composables end up in a scan.

use std::collections::BTreeSet;
use std::sync::Arc;

use xray_core::filter::{FilterResult, NodeFilter};

use crate::composable::{Composable, LayoutId};
use crate::node::AnyNode;
use crate::view::View;

pub type SharedFilter = Arc<dyn NodeFilter<AnyNode> + Send + Sync>;

/// Drops views whose resource-id name is in a set.
#[derive(Debug, Clone, Default)]
pub struct SkipIdsFilter {
    ids: BTreeSet<String>,
}

impl NodeFilter<AnyNode> for SkipIdsFilter {
    fn filter(&self, node: &AnyNode) -> FilterResult {
        let skipped = node
            .as_view()
            .and_then(|view| view.state().id)
            .is_some_and(|id| self.ids.contains(&id));
        FilterResult::from_bool(!skipped)
    }
}

/// Drop views with one of the given resource-id names, with their subtree.
pub fn skip_ids_filter<I, S>(ids: I) -> SkipIdsFilter
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    SkipIdsFilter {
        ids: ids.into_iter().map(Into::into).collect(),
    }
}

/// Drops window roots whose window does not have focus.
///
/// Only views at most one level below a parentless view are checked, so
/// the subtrees of focused windows are never affected.
#[derive(Debug, Clone, Copy, Default)]
pub struct FocusedWindowFilter;

impl NodeFilter<AnyNode> for FocusedWindowFilter {
    fn filter(&self, node: &AnyNode) -> FilterResult {
        let Some(view) = node.as_view() else {
            return FilterResult::Include;
        };
        let nested = view.parent().and_then(|parent| parent.parent()).is_some();
        FilterResult::from_bool(nested || view.has_window_focus())
    }
}

pub fn focused_window_filter() -> FocusedWindowFilter {
    FocusedWindowFilter
}

/// Drops composables carrying one of a set of test tags.
#[derive(Debug, Clone, Default)]
pub struct SkipTestTagsFilter {
    tags: BTreeSet<String>,
}

impl NodeFilter<AnyNode> for SkipTestTagsFilter {
    fn filter(&self, node: &AnyNode) -> FilterResult {
        let skipped = node.as_composable().is_some_and(|composable| {
            composable
                .test_tags()
                .iter()
                .any(|tag| self.tags.contains(tag))
        });
        FilterResult::from_bool(!skipped)
    }
}

pub fn skip_test_tags_filter<I, S>(tags: I) -> SkipTestTagsFilter
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    SkipTestTagsFilter {
        tags: tags.into_iter().map(Into::into).collect(),
    }
}

/// Filter applying a predicate to views only. Composables are included.
pub struct ViewsFilter<F>(F);

impl<F> NodeFilter<AnyNode> for ViewsFilter<F>
where
    F: Fn(&View) -> FilterResult,
{
    fn filter(&self, node: &AnyNode) -> FilterResult {
        node.as_view().map_or(FilterResult::Include, &self.0)
    }
}

pub fn filter_for_views<F>(predicate: F) -> ViewsFilter<F>
where
    F: Fn(&View) -> FilterResult,
{
    ViewsFilter(predicate)
}

/// Filter applying a predicate to composables only. Views are included.
pub struct ComposablesFilter<F>(F);

impl<F> NodeFilter<AnyNode> for ComposablesFilter<F>
where
    F: Fn(&Composable) -> FilterResult,
{
    fn filter(&self, node: &AnyNode) -> FilterResult {
        node.as_composable().map_or(FilterResult::Include, &self.0)
    }
}

pub fn filter_for_composables<F>(predicate: F) -> ComposablesFilter<F>
where
    F: Fn(&Composable) -> FilterResult,
{
    ComposablesFilter(predicate)
}

/// Drop composables whose layout id matches `skip`.
pub fn skip_layout_ids_filter<F>(
    skip: F,
) -> ComposablesFilter<impl Fn(&Composable) -> FilterResult>
where
    F: Fn(&LayoutId) -> bool,
{
    filter_for_composables(move |composable: &Composable| {
        let skipped = composable.state().layout_id.as_ref().is_some_and(&skip);
        FilterResult::from_bool(!skipped)
    })
}

/// Combine filters with [`FilterResult::and`]. No filters include everything.
pub fn all_of(filters: Vec<SharedFilter>) -> SharedFilter {
    Arc::new(AllOf(filters))
}

struct AllOf(Vec<SharedFilter>);

impl NodeFilter<AnyNode> for AllOf {
    fn filter(&self, node: &AnyNode) -> FilterResult {
        let mut result = FilterResult::Include;
        for filter in &self.0 {
            result = result.and(filter.filter(node));
            if result == FilterResult::Exclude {
                break;
            }
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::composable::{ComposableState, SemanticsProperty};
    use crate::view::ViewState;
    use xray_core::filter::{AllowAll, NodeFilterExt};
    use xray_core::filter::FilterResult::*;

    fn decide(
        filter: &impl NodeFilter<AnyNode>,
        node: &AnyNode,
    ) -> FilterResult {
        filter.filter(node)
    }

    fn view_with_id(id: &str) -> Arc<View> {
        View::with_state(
            "Button",
            ViewState {
                id: Some(id.into()),
                ..ViewState::default()
            },
        )
    }

    fn tagged(tag: &str) -> Arc<Composable> {
        Composable::with_state(
            "Box",
            ComposableState {
                semantics: vec![SemanticsProperty::TestTag(tag.into())],
                ..ComposableState::default()
            },
        )
    }

    #[test]
    fn skip_ids() {
        let filter = skip_ids_filter(["ads"]);
        assert_eq!(decide(&filter, &*view_with_id("ads")), Exclude);
        assert_eq!(decide(&filter, &*view_with_id("title")), Include);
        assert_eq!(decide(&filter, &*View::new("View")), Include);
        assert_eq!(decide(&filter, &*tagged("ads")), Include);
    }

    #[test]
    fn empty_skip_ids_keeps_everything() {
        let filter = skip_ids_filter(Vec::<String>::new());
        assert_eq!(decide(&filter, &*view_with_id("ads")), Include);
    }

    #[test]
    fn focused_window_only_checks_roots() {
        let root = View::new("DecorView");
        let content = View::new("FrameLayout");
        let leaf = View::new("View");
        root.add_child(Arc::clone(&content));
        content.add_child(Arc::clone(&leaf));

        let filter = focused_window_filter();
        assert_eq!(decide(&filter, &*root), Exclude);
        assert_eq!(decide(&filter, &*content), Exclude);
        assert_eq!(decide(&filter, &*leaf), Include);

        root.update(|state| state.window_focus = true);
        assert_eq!(decide(&filter, &*root), Include);
        assert_eq!(decide(&filter, &*content), Include);
    }

    #[test]
    fn skip_test_tags() {
        let filter = skip_test_tags_filter(["spinner"]);
        assert_eq!(decide(&filter, &*tagged("spinner")), Exclude);
        assert_eq!(decide(&filter, &*tagged("header")), Include);
        assert_eq!(decide(&filter, &*View::new("View")), Include);
    }

    #[test]
    fn skip_layout_ids() {
        let filter = skip_layout_ids_filter(|id| *id == LayoutId::Number(7));
        let composable = Composable::new("Box");
        assert_eq!(decide(&filter, &*composable), Include);
        composable.update(|state| state.layout_id = Some(LayoutId::Number(7)));
        assert_eq!(decide(&filter, &*composable), Exclude);
    }

    #[test]
    fn kind_specific_predicates() {
        let views = filter_for_views(|view| {
            if view.simple_class_name() == "EditText" {
                Exclude
            } else {
                Include
            }
        });
        let composables = filter_for_composables(|_| IncludeOnlyChildren);

        assert_eq!(decide(&views, &*View::new("EditText")), Exclude);
        assert_eq!(decide(&views, &*Composable::new("EditText")), Include);
        assert_eq!(decide(&composables, &*View::new("View")), Include);
        assert_eq!(decide(&composables, &*Composable::new("Box")), IncludeOnlyChildren);
    }

    #[test]
    fn combined_filters() {
        let filter = skip_ids_filter(["ads"]).and(skip_test_tags_filter(["spinner"]));
        assert_eq!(decide(&filter, &*view_with_id("ads")), Exclude);
        assert_eq!(decide(&filter, &*tagged("spinner")), Exclude);
        assert_eq!(decide(&filter, &*View::new("CheckBox")), Include);
    }

    #[test]
    fn all_of_uses_the_and_rule() {
        let flatten: SharedFilter = Arc::new(filter_for_composables(|_| IncludeOnlyChildren));
        let skip: SharedFilter = Arc::new(skip_test_tags_filter(["spinner"]));
        let allow: SharedFilter = Arc::new(AllowAll);
        let filter = all_of(vec![allow, flatten, skip]);

        assert_eq!(decide(&filter, &*View::new("View")), Include);
        assert_eq!(decide(&filter, &*Composable::new("Box")), IncludeOnlyChildren);
        assert_eq!(decide(&filter, &*tagged("spinner")), Exclude);
        assert_eq!(decide(&all_of(Vec::new()), &*tagged("spinner")), Include);
    }
}
