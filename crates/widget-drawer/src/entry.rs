//! Widget entries and list slots.

use std::fmt;

use crate::error::{DrawerError, Result};
use crate::size::{SIZE_DEFAULT, SIZE_MAX, SIZE_MIN};

/// Stable identity of a hosted widget instance.
///
/// Assigned once per entry by the widget-hosting collaborator and never
/// changed while the entry exists. Display surfaces key their views on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct WidgetId(pub i32);

impl WidgetId {
    /// Reserved id of the header slot. No widget entry may use it.
    pub const HEADER: Self = Self(i32::MIN);

    /// Returns `true` for the header sentinel.
    pub fn is_header(self) -> bool {
        self == Self::HEADER
    }
}

impl fmt::Display for WidgetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_header() {
            write!(f, "<header>")
        } else {
            write!(f, "#{}", self.0)
        }
    }
}

impl From<i32> for WidgetId {
    fn from(id: i32) -> Self {
        Self(id)
    }
}

/// Discrete height adjustment, always within `[SIZE_MIN, SIZE_MAX]`.
///
/// `SIZE_DEFAULT` means no override: the widget renders at natural height.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SizeOffset(i32);

impl SizeOffset {
    /// The "no override" offset.
    pub const DEFAULT: Self = Self(SIZE_DEFAULT);
    /// Smallest allowed offset.
    pub const MIN: Self = Self(SIZE_MIN);
    /// Largest allowed offset.
    pub const MAX: Self = Self(SIZE_MAX);

    /// Validates `value` against the allowed range.
    pub fn new(value: i32) -> Result<Self> {
        if (SIZE_MIN..=SIZE_MAX).contains(&value) {
            Ok(Self(value))
        } else {
            Err(DrawerError::SizeOffsetOutOfRange(value))
        }
    }

    /// The raw offset value.
    pub fn get(self) -> i32 {
        self.0
    }

    /// Returns `true` if this is the "no override" offset.
    pub fn is_default(self) -> bool {
        self.0 == SIZE_DEFAULT
    }

    /// One step taller, saturating at `SIZE_MAX`.
    pub fn grow(self) -> Self {
        Self((self.0 + 1).min(SIZE_MAX))
    }

    /// One step shorter, saturating at `SIZE_MIN`.
    pub fn shrink(self) -> Self {
        Self((self.0 - 1).max(SIZE_MIN))
    }
}

impl Default for SizeOffset {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl TryFrom<i32> for SizeOffset {
    type Error = DrawerError;

    fn try_from(value: i32) -> Result<Self> {
        Self::new(value)
    }
}

/// One widget instance's drawer-visible configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WidgetEntry {
    /// Stable identity.
    pub id: WidgetId,
    /// Height adjustment relative to the widget's natural height.
    pub size_offset: SizeOffset,
    /// Whether the entry spans all layout columns.
    pub is_full_width: bool,
}

impl WidgetEntry {
    /// Creates an entry at natural size, spanning a single column.
    pub fn new(id: impl Into<WidgetId>) -> Self {
        Self {
            id: id.into(),
            size_offset: SizeOffset::DEFAULT,
            is_full_width: false,
        }
    }

    /// Sets the size offset.
    pub fn with_size_offset(mut self, size_offset: SizeOffset) -> Self {
        self.size_offset = size_offset;
        self
    }

    /// Sets the full-width flag.
    pub fn with_full_width(mut self, is_full_width: bool) -> Self {
        self.is_full_width = is_full_width;
        self
    }
}

/// What occupies a position in the drawer list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Slot {
    /// The protected first slot.
    Header,
    /// A hosted widget.
    Widget(WidgetEntry),
}

impl Slot {
    /// The slot's stable id; the header reports [`WidgetId::HEADER`].
    pub fn id(&self) -> WidgetId {
        match self {
            Self::Header => WidgetId::HEADER,
            Self::Widget(entry) => entry.id,
        }
    }

    /// The widget entry, if this is not the header.
    pub fn as_widget(&self) -> Option<&WidgetEntry> {
        match self {
            Self::Header => None,
            Self::Widget(entry) => Some(entry),
        }
    }
}
