use std::marker::PhantomData;
use std::sync::Arc;

/// Decision a filter makes about a candidate node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FilterResult {
    /// Render the node and recurse into its children.
    Include,
    /// Skip the node's own line but render its children one level up.
    IncludeOnlyChildren,
    /// Skip the node and its whole subtree.
    Exclude,
}

impl FilterResult {
    /// Combine two decisions: `Exclude` wins, `Include` needs both sides.
    pub fn and(self, other: FilterResult) -> FilterResult {
        match (self, other) {
            (Self::Exclude, _) | (_, Self::Exclude) => Self::Exclude,
            (Self::Include, Self::Include) => Self::Include,
            _ => Self::IncludeOnlyChildren,
        }
    }

    /// Map a keep/drop predicate result.
    pub fn from_bool(keep: bool) -> FilterResult {
        if keep {
            Self::Include
        } else {
            Self::Exclude
        }
    }
}

/// Decides whether nodes of type `N` are rendered.
pub trait NodeFilter<N: ?Sized> {
    fn filter(&self, node: &N) -> FilterResult;
}

/// Filter that includes every node.
#[derive(Debug, Clone, Copy, Default)]
pub struct AllowAll;

impl<N: ?Sized> NodeFilter<N> for AllowAll {
    fn filter(&self, _node: &N) -> FilterResult {
        FilterResult::Include
    }
}

/// Filter backed by a closure. Build one with [`filter_fn`].
pub struct FnFilter<F, N: ?Sized> {
    f: F,
    _node: PhantomData<fn(&N)>,
}

impl<F, N> NodeFilter<N> for FnFilter<F, N>
where
    N: ?Sized,
    F: Fn(&N) -> FilterResult,
{
    fn filter(&self, node: &N) -> FilterResult {
        (self.f)(node)
    }
}

/// Wrap a closure as a [`NodeFilter`].
pub fn filter_fn<N: ?Sized, F>(f: F) -> FnFilter<F, N>
where
    F: Fn(&N) -> FilterResult,
{
    FnFilter {
        f,
        _node: PhantomData,
    }
}

/// Conjunction of two filters, see [`FilterResult::and`].
#[derive(Debug, Clone, Copy)]
pub struct And<A, B> {
    first: A,
    second: B,
}

impl<N, A, B> NodeFilter<N> for And<A, B>
where
    N: ?Sized,
    A: NodeFilter<N>,
    B: NodeFilter<N>,
{
    fn filter(&self, node: &N) -> FilterResult {
        let first = self.first.filter(node);
        if first == FilterResult::Exclude {
            return first;
        }
        first.and(self.second.filter(node))
    }
}

/// Combinators available on every sized filter.
pub trait NodeFilterExt<N: ?Sized>: NodeFilter<N> + Sized {
    /// Combine with `other`, see [`FilterResult::and`].
    fn and<B: NodeFilter<N>>(self, other: B) -> And<Self, B> {
        And {
            first: self,
            second: other,
        }
    }
}

impl<N: ?Sized, T: NodeFilter<N>> NodeFilterExt<N> for T {}

impl<N: ?Sized, T: NodeFilter<N> + ?Sized> NodeFilter<N> for Box<T> {
    fn filter(&self, node: &N) -> FilterResult {
        (**self).filter(node)
    }
}

impl<N: ?Sized, T: NodeFilter<N> + ?Sized> NodeFilter<N> for Arc<T> {
    fn filter(&self, node: &N) -> FilterResult {
        (**self).filter(node)
    }
}

impl<N: ?Sized, T: NodeFilter<N> + ?Sized> NodeFilter<N> for &T {
    fn filter(&self, node: &N) -> FilterResult {
        (**self).filter(node)
    }
}
