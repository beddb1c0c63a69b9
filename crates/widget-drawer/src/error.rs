//! Error types for the widget drawer.

use crate::entry::WidgetId;

/// Result type alias for drawer operations.
pub type Result<T> = std::result::Result<T, DrawerError>;

/// Errors returned by drawer operations.
///
/// Every error is a rejected operation: the state that existed before the
/// failing call is left intact.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DrawerError {
    /// An entry with this id is already in the drawer.
    #[error("widget {0} is already in the drawer")]
    DuplicateId(WidgetId),

    /// No entry with this id is in the drawer.
    #[error("widget {0} is not in the drawer")]
    NotFound(WidgetId),

    /// The operation targets a structurally protected slot.
    #[error("invalid operation: {0}")]
    InvalidOperation(&'static str),

    /// Index-based access outside the valid range for the operation.
    #[error("index {index} out of range for drawer of {len} slots")]
    IndexOutOfRange { index: usize, len: usize },

    /// A size offset outside `[SIZE_MIN, SIZE_MAX]`.
    #[error("size offset {0} is out of range")]
    SizeOffsetOutOfRange(i32),

    /// A structural mutation was attempted from inside a notification.
    #[error("cannot mutate the drawer while notifications are being delivered")]
    ReentrantMutation,
}

impl DrawerError {
    pub(crate) fn header_protected() -> Self {
        Self::InvalidOperation("the header slot cannot be modified or removed")
    }
}
