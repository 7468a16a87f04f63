//! Tree-to-string rendering.
//!
//! A [`TreeRenderingVisitor`] describes one node at a time through a
//! [`RenderingScope`]: it writes the node's description and registers the
//! children to visit next, each paired with the visitor that knows how to
//! describe it. A child can therefore be of a different node type than its
//! parent, which lets one tree embed subtrees of another.
//!
//! ```
//! use xray_core::render::{render_tree_string, RenderingScope, TreeRenderingVisitor};
//!
//! struct Dir {
//!     name: &'static str,
//!     children: Vec<Dir>,
//! }
//!
//! struct DirVisitor;
//!
//! impl<'t> TreeRenderingVisitor<&'t Dir> for DirVisitor {
//!     fn visit_node(
//!         &self,
//!         scope: &mut RenderingScope<'_, &'t Dir>,
//!         node: &&'t Dir,
//!     ) -> anyhow::Result<()> {
//!         let dir: &'t Dir = *node;
//!         scope.description().push_str(dir.name);
//!         for child in &dir.children {
//!             scope.add_child(child);
//!         }
//!         Ok(())
//!     }
//! }
//!
//! let leaf = |name| Dir { name, children: Vec::new() };
//! let tree = Dir { name: "root", children: vec![leaf("a"), leaf("b")] };
//!
//! let mut out = String::new();
//! render_tree_string(&mut out, &tree, DirVisitor).unwrap();
//! assert_eq!(out, "\u{a0}root\n\u{a0}├─a\n\u{a0}╰─b\n");
//! ```

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::rc::Rc;

use anyhow::Result;

use crate::filter::FilterResult;
use crate::prefix::{append_line_prefix, Glyphs, LastChildMask};

/// Prefix of the line inserted when rendering a tree fails.
pub const RENDER_FAILURE_PREFIX: &str = "Exception when going through view hierarchy: ";

/// Describes nodes of type `N` and declares their children.
pub trait TreeRenderingVisitor<N> {
    /// Write the description of `node` into `scope` and register the
    /// children to render below it.
    fn visit_node(&self, scope: &mut RenderingScope<'_, N>, node: &N) -> Result<()>;
}

/// Shared handle on a visitor, as stored by scopes and pending children.
pub type SharedVisitor<'a, N> = Rc<dyn TreeRenderingVisitor<N> + 'a>;

/// Per-node context handed to a visitor.
pub struct RenderingScope<'a, N: 'a> {
    description: String,
    children: Vec<ChildToVisit<'a>>,
    visitor: SharedVisitor<'a, N>,
}

impl<'a, N: 'a> RenderingScope<'a, N> {
    fn new(visitor: SharedVisitor<'a, N>) -> Self {
        Self {
            description: String::new(),
            children: Vec::new(),
            visitor,
        }
    }

    /// Buffer receiving this node's description. Line breaks start new,
    /// indented lines under the node.
    pub fn description(&mut self) -> &mut String {
        &mut self.description
    }

    /// The visitor currently describing this node.
    pub fn visitor(&self) -> SharedVisitor<'a, N> {
        Rc::clone(&self.visitor)
    }

    /// Register a child visited by the same visitor. Absent children are
    /// ignored.
    pub fn add_child(&mut self, child: impl Into<Option<N>>) {
        let visitor = self.visitor();
        self.add_child_with(child, visitor);
    }

    /// Register a child visited by `visitor`. Absent children are ignored.
    pub fn add_child_with<C: 'a>(
        &mut self,
        child: impl Into<Option<C>>,
        visitor: SharedVisitor<'a, C>,
    ) {
        if let Some(child) = child.into() {
            self.children.push(ChildToVisit::new(child, visitor, false));
        }
    }

    /// Register a child whose own line is skipped: its children are
    /// rendered in its place, at its depth.
    ///
    /// The child is visited as soon as its parent's children are queued, so
    /// if it fails none of its siblings are written.
    pub fn add_children_of<C: 'a>(
        &mut self,
        child: impl Into<Option<C>>,
        visitor: SharedVisitor<'a, C>,
    ) {
        if let Some(child) = child.into() {
            self.children.push(ChildToVisit::new(child, visitor, true));
        }
    }

    /// Register a child according to a filter decision.
    pub fn add_filtered_child<C: 'a>(
        &mut self,
        child: C,
        visitor: SharedVisitor<'a, C>,
        result: FilterResult,
    ) {
        match result {
            FilterResult::Include => self.add_child_with(child, visitor),
            FilterResult::IncludeOnlyChildren => self.add_children_of(child, visitor),
            FilterResult::Exclude => {}
        }
    }

    /// Number of children registered so far.
    pub fn child_count(&self) -> usize {
        self.children.len()
    }

    fn into_visited(self) -> VisitedNode<'a> {
        VisitedNode {
            description: self.description,
            children: self.children,
        }
    }
}

/// A node whose visitor has run.
struct VisitedNode<'a> {
    description: String,
    children: Vec<ChildToVisit<'a>>,
}

/// A registered child, visited lazily once its turn comes.
struct ChildToVisit<'a> {
    skip: bool,
    visit: Box<dyn FnOnce() -> Result<VisitedNode<'a>> + 'a>,
}

impl<'a> ChildToVisit<'a> {
    fn new<C: 'a>(node: C, visitor: SharedVisitor<'a, C>, skip: bool) -> Self {
        Self {
            skip,
            visit: Box::new(move || {
                let mut scope = RenderingScope::new(Rc::clone(&visitor));
                visitor.visit_node(&mut scope, &node)?;
                Ok(scope.into_visited())
            }),
        }
    }
}

/// Children of one rendered node still waiting to be rendered.
struct Siblings<'a> {
    pending: std::vec::IntoIter<ChildToVisit<'a>>,
    remaining: usize,
}

/// Renders trees with a given glyph set.
#[derive(Debug, Clone, Copy, Default)]
pub struct TreeRenderer {
    glyphs: Glyphs,
}

impl TreeRenderer {
    pub fn new(glyphs: Glyphs) -> Self {
        Self { glyphs }
    }

    pub fn glyphs(&self) -> &Glyphs {
        &self.glyphs
    }

    /// Render `root` and its descendants into `out`, one node per line.
    ///
    /// On error the lines rendered so far stay in `out` and traversal stops.
    pub fn render<'a, N: 'a>(
        &self,
        out: &mut String,
        root: N,
        visitor: SharedVisitor<'a, N>,
    ) -> Result<()> {
        let mut mask = LastChildMask::new();
        let root = (ChildToVisit::new(root, visitor, false).visit)()?;
        self.append_description(out, &root.description, 0, &mask);

        let mut stack: Vec<Siblings<'a>> = Vec::new();
        push_siblings(&mut stack, root.children)?;

        // Depth-first walk with an explicit stack so deep trees cannot
        // overflow the call stack.
        while let Some(parent_depth) = stack.len().checked_sub(1) {
            let siblings = &mut stack[parent_depth];
            let Some(child) = siblings.pending.next() else {
                stack.pop();
                continue;
            };
            siblings.remaining -= 1;
            mask.set(parent_depth, siblings.remaining == 0);

            let visited = (child.visit)()?;
            self.append_description(out, &visited.description, parent_depth + 1, &mask);
            push_siblings(&mut stack, visited.children)?;
        }
        Ok(())
    }

    /// Render like [`render`](Self::render), but never fail or panic: on
    /// failure an `Exception when going through view hierarchy: <message>`
    /// line is inserted where this call started writing, followed by the
    /// partial output.
    ///
    /// Returns the failure message, if any.
    pub fn render_or_annotate<'a, N: 'a>(
        &self,
        out: &mut String,
        root: N,
        visitor: SharedVisitor<'a, N>,
    ) -> Option<String> {
        let start = out.len();
        let outcome = panic::catch_unwind(AssertUnwindSafe(|| self.render(out, root, visitor)));
        let message = match outcome {
            Ok(Ok(())) => return None,
            Ok(Err(err)) => format!("{err:#}"),
            Err(payload) => panic_message(&*payload),
        };
        out.insert_str(start, &format!("{RENDER_FAILURE_PREFIX}{message}\n"));
        Some(message)
    }

    fn append_description(
        &self,
        out: &mut String,
        description: &str,
        depth: usize,
        mask: &LastChildMask,
    ) {
        for (index, line) in description.split('\n').enumerate() {
            let line = line.strip_suffix('\r').unwrap_or(line);
            append_line_prefix(out, depth, index > 0, mask, &self.glyphs);
            out.push_str(line);
            out.push('\n');
        }
    }
}

/// Expand skipped children in place and push the result as a new sibling
/// group, unless it is empty.
fn push_siblings<'a>(stack: &mut Vec<Siblings<'a>>, children: Vec<ChildToVisit<'a>>) -> Result<()> {
    let children = expand_skipped(children)?;
    if !children.is_empty() {
        stack.push(Siblings {
            remaining: children.len(),
            pending: children.into_iter(),
        });
    }
    Ok(())
}

/// Replace every skipped child by its own children, recursively, keeping
/// order.
fn expand_skipped(children: Vec<ChildToVisit<'_>>) -> Result<Vec<ChildToVisit<'_>>> {
    if children.iter().all(|child| !child.skip) {
        return Ok(children);
    }
    let mut expanded = Vec::with_capacity(children.len());
    let mut pending = vec![children.into_iter()];
    while let Some(group) = pending.last_mut() {
        match group.next() {
            None => {
                pending.pop();
            }
            Some(child) if child.skip => {
                let visited = (child.visit)()?;
                pending.push(visited.children.into_iter());
            }
            Some(child) => expanded.push(child),
        }
    }
    Ok(expanded)
}

/// Best-effort message from a panic payload.
pub fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "panic with a non-string payload".to_string()
    }
}

/// Render `root` with the default glyphs.
pub fn render_tree_string<'a, N, V>(out: &mut String, root: N, visitor: V) -> Result<()>
where
    N: 'a,
    V: TreeRenderingVisitor<N> + 'a,
{
    TreeRenderer::default().render(out, root, Rc::new(visitor))
}
