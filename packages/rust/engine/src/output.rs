//! Accumulates listings into the `date -> title -> bucket` grouping.

use tracing::debug;

use showtime_shared::{Listing, Output};

use crate::sort::quicksort_by_key;

/// Collects listings across every scraped site.
///
/// Listings are kept in arrival order; ordering is applied to a copy in
/// [`finalize`](Self::finalize), so repeated calls give identical output.
#[derive(Debug, Default)]
pub struct OutputBuilder {
    output: Output,
}

impl OutputBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// File a listing under `date` and `title`.
    ///
    /// The title bucket is created on first use, taking `poster` and `rating`;
    /// later listings under the same title leave them untouched.
    pub fn add_listing(
        &mut self,
        date: &str,
        title: &str,
        poster: &str,
        rating: &str,
        listing: Listing,
    ) {
        let schedule = self.output.dates.entry(date.to_string()).or_default();
        let bucket = schedule.bucket_mut(title, poster, rating);
        bucket.listings.push(listing);
        debug!(date, title, listings = bucket.listings.len(), "listing added");
    }

    /// Accumulated, unsorted state.
    pub fn pending(&self) -> &Output {
        &self.output
    }

    pub fn listing_count(&self) -> usize {
        self.output.listing_count()
    }

    /// Ordered copy ready for serialization.
    ///
    /// Listings within a title sort by their first showing time; titles within
    /// a date sort by their first listing's first showing time. Equal times
    /// have no defined relative order.
    pub fn finalize(&self) -> Output {
        let mut output = self.output.clone();
        for schedule in output.dates.values_mut() {
            for bucket in &mut schedule.titles {
                quicksort_by_key(&mut bucket.listings, Listing::first_time);
            }
            quicksort_by_key(&mut schedule.titles, |bucket| bucket.first_time());
        }
        output
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use showtime_shared::Showing;

    fn listing(theater: &str, times: &[&str]) -> Listing {
        Listing {
            showings: times
                .iter()
                .map(|t| Showing {
                    available: true,
                    link: format!("https://tickets.example.com/{theater}/{t}"),
                    time: (*t).to_string(),
                })
                .collect(),
            theater: theater.into(),
            map: String::new(),
            area: String::new(),
            theater_link: String::new(),
        }
    }

    #[test]
    fn earlier_listing_sorts_first_within_title() {
        let mut builder = OutputBuilder::new();
        builder.add_listing("2024-03-15", "Alien", "YWxpZW4=", "R", listing("Roxie", &["1930"]));
        builder.add_listing("2024-03-15", "Alien", "", "", listing("Vogue", &["1800", "2200"]));

        let output = builder.finalize();
        let bucket = output.bucket("2024-03-15", "Alien").expect("bucket");
        let theaters: Vec<&str> = bucket.listings.iter().map(|l| l.theater.as_str()).collect();
        assert_eq!(theaters, ["Vogue", "Roxie"]);
        assert_eq!(bucket.poster, "YWxpZW4=");
        assert_eq!(bucket.rating, "R");
    }

    #[test]
    fn titles_sort_by_earliest_listing() {
        let mut builder = OutputBuilder::new();
        builder.add_listing("2024-03-15", "Late Show", "", "", listing("Roxie", &["2130"]));
        builder.add_listing("2024-03-15", "Matinee", "", "", listing("Roxie", &["1300"]));
        builder.add_listing("2024-03-15", "Evening", "", "", listing("Vogue", &["1900"]));
        builder.add_listing("2024-03-15", "Evening", "", "", listing("Roxie", &["1700"]));

        let output = builder.finalize();
        let titles: Vec<&str> = output.dates["2024-03-15"]
            .titles
            .iter()
            .map(|b| b.title.as_str())
            .collect();
        assert_eq!(titles, ["Matinee", "Evening", "Late Show"]);
    }

    #[test]
    fn dates_are_kept_apart() {
        let mut builder = OutputBuilder::new();
        builder.add_listing("2024-03-16", "Alien", "", "", listing("Roxie", &["1800"]));
        builder.add_listing("2024-03-15", "Alien", "", "", listing("Roxie", &["1800"]));

        let output = builder.finalize();
        let dates: Vec<&str> = output.dates.keys().map(String::as_str).collect();
        assert_eq!(dates, ["2024-03-15", "2024-03-16"]);
        assert_eq!(output.listing_count(), 2);
    }

    #[test]
    fn finalize_is_idempotent() {
        let mut builder = OutputBuilder::new();
        for (i, theater) in ["A", "B", "C", "D"].iter().enumerate() {
            let title = if i % 2 == 0 { "Same" } else { "Other" };
            builder.add_listing("2024-03-15", title, "", "", listing(theater, &["1800"]));
        }

        let first = builder.finalize();
        let second = builder.finalize();
        assert_eq!(first, second);
        assert_eq!(builder.listing_count(), 4);
    }
}
