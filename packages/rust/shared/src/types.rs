//! Output record types: showings, listings, and the date/title grouping.

use std::collections::BTreeMap;

use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Showing / Listing
// ---------------------------------------------------------------------------

/// One screening time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Showing {
    /// Whether tickets can still be bought.
    pub available: bool,
    /// Ticketing link for this screening.
    pub link: String,
    /// Canonical `HHMM` time.
    pub time: String,
}

/// One theater's block of showings for a title on a date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Listing {
    /// Screenings in document order. Never empty.
    pub showings: Vec<Showing>,
    pub theater: String,
    pub map: String,
    pub area: String,
    pub theater_link: String,
}

impl Listing {
    /// Numeric value of the first showing's time, used for ordering.
    ///
    /// Times that are not plain digits sort after everything else.
    pub fn first_time(&self) -> u32 {
        self.showings
            .first()
            .and_then(|s| s.time.parse::<u32>().ok())
            .unwrap_or(u32::MAX)
    }
}

// ---------------------------------------------------------------------------
// Grouping
// ---------------------------------------------------------------------------

/// All listings of one title on one date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TitleBucket {
    /// Grouping key; serialized as the parent map key, not inline.
    #[serde(skip)]
    pub title: String,
    /// Poster file stem (URL-safe base64 of the poster name).
    pub poster: String,
    pub rating: String,
    pub listings: Vec<Listing>,
}

impl TitleBucket {
    /// Create an empty bucket. Poster and rating are fixed at creation.
    pub fn new(title: impl Into<String>, poster: impl Into<String>, rating: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            poster: poster.into(),
            rating: rating.into(),
            listings: Vec::new(),
        }
    }

    /// Ordering key: the first listing's first showing time.
    pub fn first_time(&self) -> u32 {
        self.listings
            .first()
            .map(Listing::first_time)
            .unwrap_or(u32::MAX)
    }
}

/// Ordered title buckets of one date, serialized as a `title -> bucket` object.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DateSchedule {
    pub titles: Vec<TitleBucket>,
}

impl DateSchedule {
    /// Look up a bucket by title.
    pub fn get(&self, title: &str) -> Option<&TitleBucket> {
        self.titles.iter().find(|b| b.title == title)
    }

    /// Find the bucket for `title`, creating it with `poster`/`rating` on first use.
    pub fn bucket_mut(&mut self, title: &str, poster: &str, rating: &str) -> &mut TitleBucket {
        let index = match self.titles.iter().position(|b| b.title == title) {
            Some(index) => index,
            None => {
                self.titles.push(TitleBucket::new(title, poster, rating));
                self.titles.len() - 1
            }
        };
        &mut self.titles[index]
    }
}

impl Serialize for DateSchedule {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.titles.len()))?;
        for bucket in &self.titles {
            map.serialize_entry(&bucket.title, bucket)?;
        }
        map.end()
    }
}

/// The final `date -> title -> bucket` structure.
///
/// Dates are canonical ISO strings, so the map's key order is chronological.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Output {
    pub dates: BTreeMap<String, DateSchedule>,
}

impl Output {
    /// Total number of listings across all dates and titles.
    pub fn listing_count(&self) -> usize {
        self.dates
            .values()
            .flat_map(|d| d.titles.iter())
            .map(|b| b.listings.len())
            .sum()
    }

    /// Look up a title bucket.
    pub fn bucket(&self, date: &str, title: &str) -> Option<&TitleBucket> {
        self.dates.get(date).and_then(|d| d.get(title))
    }
}
