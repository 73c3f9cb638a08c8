//! Per-site scratch state accumulated while walking a document.

use std::fmt;

use serde::Deserialize;

/// The fixed set of slots an extraction can write to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssetField {
    Date,
    Title,
    Poster,
    Rating,
    Theater,
    Map,
    Area,
    TheaterLink,
    Available,
    Link,
    Time,
}

impl AssetField {
    /// Every field, in slot order.
    pub const ALL: [AssetField; 11] = [
        AssetField::Date,
        AssetField::Title,
        AssetField::Poster,
        AssetField::Rating,
        AssetField::Theater,
        AssetField::Map,
        AssetField::Area,
        AssetField::TheaterLink,
        AssetField::Available,
        AssetField::Link,
        AssetField::Time,
    ];

    /// Fields cleared after each recorded showing.
    pub const SHOWING_FIELDS: [AssetField; 3] =
        [AssetField::Available, AssetField::Link, AssetField::Time];

    /// Fields cleared after each recorded listing.
    pub const LISTING_FIELDS: [AssetField; 3] =
        [AssetField::Poster, AssetField::Rating, AssetField::Title];

    fn slot(self) -> usize {
        self as usize
    }

    /// Schema name of the field.
    pub fn as_str(self) -> &'static str {
        match self {
            AssetField::Date => "date",
            AssetField::Title => "title",
            AssetField::Poster => "poster",
            AssetField::Rating => "rating",
            AssetField::Theater => "theater",
            AssetField::Map => "map",
            AssetField::Area => "area",
            AssetField::TheaterLink => "theater_link",
            AssetField::Available => "available",
            AssetField::Link => "link",
            AssetField::Time => "time",
        }
    }
}

impl fmt::Display for AssetField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Mapping from [`AssetField`] to the last extracted value.
///
/// All slots start empty and are reset to empty, never removed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AssetStore {
    values: [String; 11],
}

impl AssetStore {
    /// Create a store with every slot empty.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, field: AssetField) -> &str {
        &self.values[field.slot()]
    }

    pub fn set(&mut self, field: AssetField, value: impl Into<String>) {
        self.values[field.slot()] = value.into();
    }

    pub fn is_empty(&self, field: AssetField) -> bool {
        self.values[field.slot()].is_empty()
    }

    /// Reset one slot to empty.
    pub fn clear(&mut self, field: AssetField) {
        self.values[field.slot()].clear();
    }

    /// Reset the slots consumed by a showing: `available`, `link`, `time`.
    pub fn reset_showing(&mut self) {
        for field in AssetField::SHOWING_FIELDS {
            self.clear(field);
        }
    }

    /// Reset the slots consumed by a listing: `poster`, `rating`, `title`.
    pub fn reset_listing(&mut self) {
        for field in AssetField::LISTING_FIELDS {
            self.clear(field);
        }
    }

    /// Interpret the `available` slot.
    ///
    /// An empty slot means no sold-out marker was found.
    pub fn available(&self) -> bool {
        let raw = self.get(AssetField::Available).trim().to_lowercase();
        matches!(raw.as_str(), "" | "true" | "yes" | "1" | "available")
    }
}
