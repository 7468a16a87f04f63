//! Attribute formatting for node descriptions.
//!
//! A node description is a name followed by an optional `{ k:v, flag }`
//! suffix. Attributes keep the order in which they are appended, absent ones
//! contribute nothing, and an empty attribute list renders no braces at all.

use std::borrow::Cow;
use std::fmt::Display;

use crate::error::ConfigError;

/// Character appended to ellipsized text.
pub const ELLIPSIS: char = '…';

/// Writes comma-separated attributes after a node name.
///
/// The opening ` { ` is written lazily with the first attribute, and
/// [`finish`](Self::finish) writes the closing ` }` only if something was
/// appended.
pub struct AttributeAppendable<'s> {
    out: &'s mut String,
    first: bool,
}

impl<'s> AttributeAppendable<'s> {
    pub fn new(out: &'s mut String) -> Self {
        Self { out, first: true }
    }

    /// Append a present attribute.
    pub fn append(&mut self, attribute: impl AsRef<str>) {
        if self.first {
            self.first = false;
            self.out.push_str(" { ");
        } else {
            self.out.push_str(", ");
        }
        self.out.push_str(attribute.as_ref());
    }

    /// Append an attribute that may be absent.
    pub fn append_optional<S: AsRef<str>>(&mut self, attribute: Option<S>) {
        if let Some(attribute) = attribute {
            self.append(attribute);
        }
    }

    /// Append `label:value`.
    pub fn append_labeled(&mut self, label: &str, value: impl Display) {
        self.append(format!("{label}:{value}"));
    }

    /// Append `label:"value"`.
    pub fn append_quoted(&mut self, label: &str, value: &str) {
        self.append(format!("{label}:\"{value}\""));
    }

    /// Return true if nothing has been appended yet.
    pub fn is_empty(&self) -> bool {
        self.first
    }

    /// Close the attribute list.
    pub fn finish(self) {
        if !self.first {
            self.out.push_str(" }");
        }
    }
}

/// Format an ordered list of optional attributes as `{ a, b }`.
///
/// Returns an empty string when every attribute is absent.
pub fn format_attributes<I, S>(attributes: I) -> String
where
    I: IntoIterator<Item = Option<S>>,
    S: AsRef<str>,
{
    let present: Vec<S> = attributes.into_iter().flatten().collect();
    if present.is_empty() {
        return String::new();
    }
    let joined = present
        .iter()
        .map(|attribute| attribute.as_ref())
        .collect::<Vec<&str>>()
        .join(", ");
    format!("{{ {joined} }}")
}

/// Truncate `text` to `max_length` characters, the last one being
/// [`ELLIPSIS`]. Text that already fits is returned unchanged.
pub fn ellipsize(text: &str, max_length: usize) -> Cow<'_, str> {
    if text.chars().count() <= max_length {
        return Cow::Borrowed(text);
    }
    let mut truncated: String = text.chars().take(max_length.saturating_sub(1)).collect();
    truncated.push(ELLIPSIS);
    Cow::Owned(truncated)
}

/// Format a pixel size as `WxHpx`.
pub fn format_pixel_dimensions(width: i32, height: i32) -> String {
    format!("{width}x{height}px")
}

/// How text content is rendered as attributes.
///
/// The length is always rendered as `<label>-length:N`. The content itself is
/// only rendered when [`include_value`](Self::include_value) is set, which
/// keeps sensitive text out of the output by default.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextFormat {
    include_value: bool,
    max_length: usize,
}

impl Default for TextFormat {
    fn default() -> Self {
        Self::length_only()
    }
}

impl TextFormat {
    /// Build a text format, rejecting a zero `max_length` when values are
    /// rendered.
    pub fn new(include_value: bool, max_length: usize) -> Result<Self, ConfigError> {
        if include_value && max_length == 0 {
            return Err(ConfigError::NonPositiveMaxLength(max_length));
        }
        Ok(Self {
            include_value,
            max_length,
        })
    }

    /// Render lengths only, never the content.
    pub fn length_only() -> Self {
        Self {
            include_value: false,
            max_length: usize::MAX,
        }
    }

    /// Render the full content, never truncated.
    pub fn full_value() -> Self {
        Self {
            include_value: true,
            max_length: usize::MAX,
        }
    }

    pub fn include_value(&self) -> bool {
        self.include_value
    }

    pub fn max_length(&self) -> usize {
        self.max_length
    }

    /// Append the attributes for `text` under `label`. Absent text appends
    /// nothing.
    pub fn append_text(
        &self,
        attributes: &mut AttributeAppendable<'_>,
        label: &str,
        text: Option<&str>,
    ) {
        let Some(text) = text else {
            return;
        };
        attributes.append_labeled(&format!("{label}-length"), text.chars().count());
        if self.include_value {
            attributes.append_quoted(label, &ellipsize(text, self.max_length));
        }
    }
}
