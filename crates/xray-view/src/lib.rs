//! Live UI hierarchy model and the scans that render it.
//!
//! Two node kinds make up a hierarchy: toolkit [`View`]s and declarative
//! [`Composable`]s. A view can host a composition and a composable can embed a
//! view, so a single scan walks both kinds with two visitors that hand
//! children back and forth. Every node is shared behind `Arc` and mutable
//! from other threads while a scan runs.

pub mod composable;
pub mod executor;
pub mod filters;
pub mod node;
pub mod renderers;
pub mod scan;
pub mod scope;
pub mod snapshot;
pub mod view;
pub mod visitor;
pub mod window;

pub use composable::{Composable, ComposableState, IntBounds, LayoutId, SemanticsProperty};
pub use executor::{
    ExecutorError, NeverThrowingExecutor, PassthroughExecutor, ScanExecutor, ThreadExecutor,
};
pub use filters::SharedFilter;
pub use node::{AnyNode, ScannableNode};
pub use renderers::{SharedStateRenderer, ViewStateRenderer};
pub use scan::{ScanOptions, Xray};
pub use scope::{ScanNode, ScanRoot, ScanScope};
pub use snapshot::Snapshot;
pub use view::{View, ViewState, Visibility};
pub use visitor::{ComposableVisitor, ViewTreeVisitor};
pub use window::{Window, WindowManager};
