//! Drawer session configuration.

/// Configuration for a drawer session.
///
/// Size offsets and the height step are fixed constants (see
/// [`crate::size`]); only layout and subscription behavior is configurable.
///
/// # Example
///
/// ```
/// use widget_drawer::DrawerConfig;
///
/// let config = DrawerConfig::new().with_column_count(3);
/// assert_eq!(config.column_count(), 3);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DrawerConfig {
    column_count: usize,
    replay_on_subscribe: bool,
}

impl Default for DrawerConfig {
    fn default() -> Self {
        Self {
            column_count: 2,
            replay_on_subscribe: true,
        }
    }
}

impl DrawerConfig {
    /// Creates the default configuration: two columns, replay on subscribe.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the number of layout columns. Values below 1 are raised to 1.
    pub fn with_column_count(mut self, column_count: usize) -> Self {
        self.column_count = column_count.max(1);
        self
    }

    /// Sets whether new edit-mode and selection subscribers immediately
    /// receive the current value.
    pub fn with_replay_on_subscribe(mut self, replay: bool) -> Self {
        self.replay_on_subscribe = replay;
        self
    }

    /// Number of layout columns; a full-span entry covers all of them.
    pub fn column_count(&self) -> usize {
        self.column_count
    }

    /// Whether subscribers get the current value on subscribe.
    pub fn replay_on_subscribe(&self) -> bool {
        self.replay_on_subscribe
    }
}
