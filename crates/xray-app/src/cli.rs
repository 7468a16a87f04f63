use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use xray_config::{GlyphStyle, ScanConfig};
use xray_core::Glyphs;
use xray_view::filters::{all_of, skip_ids_filter, skip_test_tags_filter};
use xray_view::renderers::{text_renderer, CheckableRenderer, ViewRenderer};
use xray_view::scope::{AllWindowsScope, FocusedWindowScope, TestTagScope};
use xray_view::{ScanOptions, ScanScope, SharedFilter, SharedStateRenderer, WindowManager};

#[derive(Parser, Debug)]
#[command(name = "xray")]
#[command(about = "Print a UI hierarchy as an indented text tree")]
#[command(version)]
pub struct Cli {
    /// Scan config file (TOML)
    #[arg(short = 'C', long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Only scan the focused window
    #[arg(long)]
    pub focused: bool,

    /// Draw branches with ASCII characters
    #[arg(long)]
    pub ascii: bool,

    /// Print text content, not just its length
    #[arg(long)]
    pub include_text: bool,

    /// Ellipsize printed text to N characters
    #[arg(long, value_name = "N")]
    pub max_text_length: Option<usize>,

    /// Only scan composables carrying this test tag
    #[arg(long, value_name = "TAG")]
    pub test_tag: Option<String>,

    /// Give up on a scan after this many milliseconds
    #[arg(long, value_name = "MS")]
    pub timeout_ms: Option<u64>,

    /// Also write logs to a daily rotated file
    #[arg(long)]
    pub log_file: bool,

    /// Hierarchy snapshot (JSON). A built-in sample is scanned when omitted.
    pub snapshot: Option<PathBuf>,
}

impl Cli {
    /// Load the config file, apply flag overrides and validate the result.
    pub fn load_config(&self) -> Result<ScanConfig> {
        let mut config = match &self.config {
            Some(path) => ScanConfig::from_path(path)?,
            None => ScanConfig::default(),
        };
        self.apply_overrides(&mut config);
        config.validate()?;
        Ok(config)
    }

    fn apply_overrides(&self, config: &mut ScanConfig) {
        if self.focused {
            config.filters.focused_window_only = true;
        }
        if self.ascii {
            config.output.glyphs = GlyphStyle::Ascii;
        }
        if self.include_text {
            config.text.render_value = true;
        }
        if let Some(max_length) = self.max_text_length {
            config.text.max_length = Some(max_length);
        }
        if let Some(timeout_ms) = self.timeout_ms {
            config.executor.timeout_ms = Some(timeout_ms);
        }
    }
}

/// Build scan options for `windows` from a validated config.
pub fn scan_options(
    config: &ScanConfig,
    windows: Arc<WindowManager>,
    test_tag: Option<&str>,
) -> Result<ScanOptions> {
    let scope: Arc<dyn ScanScope> = match (test_tag, config.filters.focused_window_only) {
        (Some(tag), true) => Arc::new(TestTagScope::new(tag, FocusedWindowScope(windows))),
        (Some(tag), false) => Arc::new(TestTagScope::new(tag, AllWindowsScope(windows))),
        (None, true) => Arc::new(FocusedWindowScope(windows)),
        (None, false) => Arc::new(AllWindowsScope(windows)),
    };

    let renderers: Vec<SharedStateRenderer> = vec![
        Arc::new(ViewRenderer),
        text_renderer(
            config.text.render_value,
            config.text.max_length.unwrap_or(usize::MAX),
        )?,
        Arc::new(CheckableRenderer),
    ];

    let mut filters: Vec<SharedFilter> = Vec::new();
    if !config.filters.skip_ids.is_empty() {
        filters.push(Arc::new(skip_ids_filter(config.filters.skip_ids.iter())));
    }
    if !config.filters.skip_test_tags.is_empty() {
        filters.push(Arc::new(skip_test_tags_filter(
            config.filters.skip_test_tags.iter(),
        )));
    }

    let glyphs = match config.output.glyphs {
        GlyphStyle::Unicode => Glyphs::UNICODE,
        GlyphStyle::Ascii => Glyphs::ASCII,
    };

    Ok(ScanOptions {
        scope,
        renderers: renderers.into(),
        filter: all_of(filters),
        glyphs,
    })
}
