use crate::composable::Composable;
use crate::view::View;

/// Node type seen by filters.
pub type AnyNode = dyn ScannableNode + 'static;

/// Common face of both node kinds, as seen by filters and state renderers.
pub trait ScannableNode {
    /// Name printed at the start of the node's line.
    fn display_name(&self) -> &str;

    fn as_view(&self) -> Option<&View> {
        None
    }

    fn as_composable(&self) -> Option<&Composable> {
        None
    }
}

impl ScannableNode for View {
    fn display_name(&self) -> &str {
        self.simple_class_name()
    }

    fn as_view(&self) -> Option<&View> {
        Some(self)
    }
}

impl ScannableNode for Composable {
    fn display_name(&self) -> &str {
        self.name()
    }

    fn as_composable(&self) -> Option<&Composable> {
        Some(self)
    }
}
