//! Configuration types and loaders for xray.
//!
//! This crate owns the `xray.toml` schema so the CLI and library callers
//! validate scan settings the same way.

pub mod scan;

pub use scan::{ExecutorSection, FilterSection, GlyphStyle, OutputSection, ScanConfig, TextSection};
