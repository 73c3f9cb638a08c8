//! Mutable state threaded through one site's traversal.

use tracing::debug;

use showtime_shared::{Listing, Result, Showing, ShowtimeError};

use crate::convert::Clock;
use crate::output::OutputBuilder;
use crate::scrape::PosterRequest;
use crate::store::{AssetField, AssetStore};

/// Everything a traversal may read or mutate.
///
/// The store and the showing accumulator belong to this session alone; the
/// output builder and poster queue outlive it and are shared across sites.
pub struct Session<'a> {
    pub store: AssetStore,
    pub showings: Vec<Showing>,
    pub output: &'a mut OutputBuilder,
    pub posters: &'a mut Vec<PosterRequest>,
    pub clock: &'a Clock,
    pub showings_recorded: usize,
    pub listings_recorded: usize,
}

impl<'a> Session<'a> {
    pub fn new(
        store: AssetStore,
        output: &'a mut OutputBuilder,
        posters: &'a mut Vec<PosterRequest>,
        clock: &'a Clock,
    ) -> Self {
        Self {
            store,
            showings: Vec::new(),
            output,
            posters,
            clock,
            showings_recorded: 0,
            listings_recorded: 0,
        }
    }

    /// Build a showing from `available`/`link`/`time`, then clear those slots.
    pub fn record_showing(&mut self) -> Result<()> {
        if self.store.is_empty(AssetField::Time) {
            return Err(ShowtimeError::incomplete("showing has no time"));
        }

        let showing = Showing {
            available: self.store.available(),
            link: self.store.get(AssetField::Link).to_string(),
            time: self.store.get(AssetField::Time).to_string(),
        };
        debug!(time = %showing.time, available = showing.available, "showing recorded");

        self.showings.push(showing);
        self.store.reset_showing();
        self.showings_recorded += 1;
        Ok(())
    }

    /// Build a listing from the accumulated showings and hand it to the output.
    ///
    /// Clears the accumulator and the `poster`/`rating`/`title` slots.
    pub fn record_listing(&mut self) -> Result<()> {
        if self.showings.is_empty() {
            return Err(ShowtimeError::incomplete(format!(
                "listing for {:?} has no showings",
                self.store.get(AssetField::Title)
            )));
        }

        let store = &self.store;
        let listing = Listing {
            showings: std::mem::take(&mut self.showings),
            theater: store.get(AssetField::Theater).to_string(),
            map: store.get(AssetField::Map).to_string(),
            area: store.get(AssetField::Area).to_string(),
            theater_link: store.get(AssetField::TheaterLink).to_string(),
        };
        let title = store.get(AssetField::Title).replace("&amp;", "&");

        self.output.add_listing(
            store.get(AssetField::Date),
            &title,
            store.get(AssetField::Poster),
            store.get(AssetField::Rating),
            listing,
        );

        self.store.reset_listing();
        self.listings_recorded += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn clock() -> Clock {
        Clock::at_date(chrono::NaiveDate::from_ymd_opt(2024, 3, 15).unwrap())
    }

    #[test]
    fn showing_without_time_fails() {
        let clock = clock();
        let mut output = OutputBuilder::new();
        let mut posters = Vec::new();
        let mut session = Session::new(AssetStore::new(), &mut output, &mut posters, &clock);
        session.store.set(AssetField::Link, "https://tickets.example.com/1");

        let err = session.record_showing().unwrap_err();
        assert!(matches!(err, ShowtimeError::IncompleteRecord { .. }));
        assert!(session.showings.is_empty());
        assert_eq!(session.store.get(AssetField::Link), "https://tickets.example.com/1");
    }

    #[test]
    fn showing_appends_one_and_resets_slots() {
        let clock = clock();
        let mut output = OutputBuilder::new();
        let mut posters = Vec::new();
        let mut session = Session::new(AssetStore::new(), &mut output, &mut posters, &clock);
        session.store.set(AssetField::Time, "1930");
        session.store.set(AssetField::Link, "https://tickets.example.com/1");
        session.store.set(AssetField::Available, "Sold out");
        session.store.set(AssetField::Title, "Alien");

        session.record_showing().unwrap();

        assert_eq!(
            session.showings,
            vec![Showing {
                available: false,
                link: "https://tickets.example.com/1".into(),
                time: "1930".into(),
            }]
        );
        for field in AssetField::SHOWING_FIELDS {
            assert!(session.store.is_empty(field));
        }
        assert_eq!(session.store.get(AssetField::Title), "Alien");
    }

    #[test]
    fn listing_without_showings_fails() {
        let clock = clock();
        let mut output = OutputBuilder::new();
        let mut posters = Vec::new();
        let mut session = Session::new(AssetStore::new(), &mut output, &mut posters, &clock);
        session.store.set(AssetField::Title, "Alien");

        let err = session.record_listing().unwrap_err();
        assert!(matches!(err, ShowtimeError::IncompleteRecord { .. }));
        assert_eq!(session.listings_recorded, 0);
        drop(session);
        assert_eq!(output.listing_count(), 0);
    }

    #[test]
    fn listing_consumes_accumulator_and_resets_title_slots() {
        let clock = clock();
        let mut output = OutputBuilder::new();
        let mut posters = Vec::new();
        let mut store = AssetStore::new();
        store.set(AssetField::Theater, "Roxie");
        store.set(AssetField::Date, "2024-03-15");

        let mut session = Session::new(store, &mut output, &mut posters, &clock);
        session.store.set(AssetField::Title, "Fast &amp; Furious");
        session.store.set(AssetField::Rating, "PG-13");
        session.store.set(AssetField::Time, "1800");
        session.record_showing().unwrap();
        session.store.set(AssetField::Time, "2030");
        session.record_showing().unwrap();

        session.record_listing().unwrap();

        assert!(session.showings.is_empty());
        assert!(session.store.is_empty(AssetField::Title));
        assert!(session.store.is_empty(AssetField::Rating));
        assert_eq!(session.store.get(AssetField::Date), "2024-03-15");
        assert_eq!(session.store.get(AssetField::Theater), "Roxie");
        assert_eq!(session.listings_recorded, 1);
        drop(session);

        let bucket = output
            .pending()
            .bucket("2024-03-15", "Fast & Furious")
            .expect("bucket");
        assert_eq!(bucket.rating, "PG-13");
        assert_eq!(bucket.listings.len(), 1);
        assert_eq!(bucket.listings[0].showings.len(), 2);
        assert_eq!(bucket.listings[0].theater, "Roxie");
    }
}
