//! Core of the xray hierarchy dumper.
//!
//! This crate renders arbitrary node trees to indented text: the line-prefix
//! calculator, the depth-first render driver with per-child visitors, the
//! attribute formatter, node filters, and the logging bootstrap shared by the
//! other xray crates. It knows nothing about any particular UI toolkit.

pub mod attributes;
pub mod error;
pub mod filter;
pub mod logging;
pub mod prefix;
pub mod render;

pub use attributes::{ellipsize, format_attributes, AttributeAppendable, TextFormat};
pub use error::ConfigError;
pub use filter::{filter_fn, AllowAll, FilterResult, NodeFilter, NodeFilterExt};
pub use prefix::{Glyphs, LastChildMask, LINE_MARKER};
pub use render::{
    render_tree_string, RenderingScope, SharedVisitor, TreeRenderer, TreeRenderingVisitor,
};
