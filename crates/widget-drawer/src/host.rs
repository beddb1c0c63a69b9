//! The widget-hosting collaborator.
//!
//! The drawer never creates widget views or measures them itself. A
//! [`WidgetHost`] supplies both, keyed by the entry's stable id.

use crate::entry::WidgetId;

/// Creates and measures hosted widget views.
pub trait WidgetHost: Send + Sync + 'static {
    /// The renderable produced for an entry.
    type View;

    /// Creates the view for the widget with `id`.
    fn create_view(&self, id: WidgetId) -> Self::View;

    /// The widget's natural (unadjusted) height in pixels.
    fn natural_height(&self, id: WidgetId) -> i32;
}
