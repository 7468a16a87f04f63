//! The scan entry point: renders every root of a scope into one string.

use std::panic::{self, AssertUnwindSafe};
use std::rc::Rc;
use std::sync::Arc;

use anyhow::Result;
use tracing::{debug, warn};
use xray_core::filter::{AllowAll, FilterResult, NodeFilter};
use xray_core::render::{panic_message, SharedVisitor, TreeRenderer, RENDER_FAILURE_PREFIX};
use xray_core::Glyphs;

use crate::composable::Composable;
use crate::executor::ScanExecutor;
use crate::filters::SharedFilter;
use crate::node::AnyNode;
use crate::renderers::{defaults_no_pii, SharedStateRenderer};
use crate::scope::{ScanNode, ScanRoot, ScanScope};
use crate::view::View;
use crate::visitor::{ComposableVisitor, MessageVisitor, ViewTreeVisitor};

/// What to scan and how to describe it.
#[derive(Clone)]
pub struct ScanOptions {
    pub scope: Arc<dyn ScanScope>,
    pub renderers: Arc<[SharedStateRenderer]>,
    pub filter: SharedFilter,
    pub glyphs: Glyphs,
}

impl ScanOptions {
    /// Scan `scope` with the renderers that never print text content, no
    /// filtering and box-drawing glyphs.
    pub fn new(scope: impl ScanScope + 'static) -> Self {
        Self {
            scope: Arc::new(scope),
            renderers: defaults_no_pii().into(),
            filter: Arc::new(AllowAll),
            glyphs: Glyphs::UNICODE,
        }
    }

    pub fn with_renderers(mut self, renderers: Vec<SharedStateRenderer>) -> Self {
        self.renderers = renderers.into();
        self
    }

    pub fn with_filter(mut self, filter: SharedFilter) -> Self {
        self.filter = filter;
        self
    }

    pub fn with_glyphs(mut self, glyphs: Glyphs) -> Self {
        self.glyphs = glyphs;
        self
    }
}

/// Hierarchy scans.
pub struct Xray;

impl Xray {
    /// Render every root found by the scope, in order.
    ///
    /// Each root is printed as a `<title>:` line, a `window-focus:<bool>`
    /// line and its tree, with a blank line between roots. A root that fails
    /// to render keeps its partial tree, preceded by an
    /// `Exception when going through view hierarchy: <message>` line, and
    /// the next root is rendered as usual. Roots the filter excludes are
    /// left out.
    pub fn scan(options: &ScanOptions) -> String {
        let renderer = TreeRenderer::new(options.glyphs);
        let views = ViewTreeVisitor::new(
            Arc::clone(&options.renderers),
            Arc::clone(&options.filter),
        );

        let mut out = String::new();
        for root in options.scope.find_roots() {
            if root_filter_result(&root, &*options.filter) == FilterResult::Exclude {
                debug!(title = %root.title, "root filtered out");
                continue;
            }
            debug!(title = %root.title, "scanning root");

            if !out.is_empty() {
                out.push('\n');
            }
            out.push_str(&root.title);
            out.push_str(":\n");

            let start = out.len();
            let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
                render_root(&mut out, &root, &renderer, &views)
            }));
            let message = match outcome {
                Ok(Ok(())) => continue,
                Ok(Err(err)) => format!("{err:#}"),
                Err(payload) => panic_message(&*payload),
            };
            warn!(title = %root.title, error = %message, "failed to render root");
            out.insert_str(start, &format!("{RENDER_FAILURE_PREFIX}{message}\n"));
        }
        out
    }

    /// Run [`scan`](Self::scan) through `executor`.
    pub fn scan_with(options: &ScanOptions, executor: &dyn ScanExecutor) -> Result<String> {
        let options = options.clone();
        executor.execute(Box::new(move || -> Result<String> { Ok(Xray::scan(&options)) }))
    }
}

fn root_filter_result(
    root: &ScanRoot,
    filter: &(dyn NodeFilter<AnyNode> + Send + Sync),
) -> FilterResult {
    match &root.node {
        ScanNode::View(view) => filter.filter(&**view),
        ScanNode::Composable(composable) => filter.filter(&**composable),
        ScanNode::RenderingError(_) => FilterResult::Include,
    }
}

fn render_root(
    out: &mut String,
    root: &ScanRoot,
    renderer: &TreeRenderer,
    views: &ViewTreeVisitor,
) -> Result<()> {
    out.push(renderer.glyphs().marker);
    out.push_str(&format!("window-focus:{}\n", root.window_focus));

    match &root.node {
        ScanNode::View(view) => {
            let visitor: SharedVisitor<'_, Arc<View>> = Rc::new(views.clone());
            renderer.render(out, Arc::clone(view), visitor)
        }
        ScanNode::Composable(composable) => {
            let visitor: SharedVisitor<'_, Arc<Composable>> =
                Rc::new(ComposableVisitor::new(views.clone()));
            renderer.render(out, Arc::clone(composable), visitor)
        }
        ScanNode::RenderingError(message) => {
            let visitor: SharedVisitor<'_, String> = Rc::new(MessageVisitor);
            renderer.render(out, message.clone(), visitor)
        }
    }
}
