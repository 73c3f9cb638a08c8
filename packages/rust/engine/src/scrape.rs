//! One entry point per site: seed the store, walk the page, collect output.

use tracing::{info, instrument, warn};

use showtime_shared::{Output, Result, SiteConfig};

use crate::convert::Clock;
use crate::document::DocumentNode;
use crate::output::OutputBuilder;
use crate::schema::Schema;
use crate::session::Session;
use crate::store::{AssetField, AssetStore};
use crate::traverse::traverse;

/// A poster image to fetch once traversal is over.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PosterRequest {
    /// File name without extension.
    pub file_stem: String,
    /// Image source as written on the page; may be relative.
    pub src: String,
}

/// Theater fields copied onto every listing of a site.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SiteContext {
    pub theater: String,
    pub map: String,
    pub area: String,
    pub theater_link: String,
}

impl From<&SiteConfig> for SiteContext {
    fn from(site: &SiteConfig) -> Self {
        Self {
            theater: site.theater.clone(),
            map: site.map.clone(),
            area: site.area.clone(),
            theater_link: site.link.clone(),
        }
    }
}

/// Counts from one successful site run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScrapeSummary {
    pub showings: usize,
    pub listings: usize,
}

/// Runs schemas over documents and accumulates their listings.
///
/// One `Scraper` serves many sites; output and queued posters accumulate
/// across calls, while the asset store starts fresh for each site.
#[derive(Debug)]
pub struct Scraper {
    output: OutputBuilder,
    posters: Vec<PosterRequest>,
    clock: Clock,
}

impl Scraper {
    pub fn new(clock: Clock) -> Self {
        Self {
            output: OutputBuilder::new(),
            posters: Vec::new(),
            clock,
        }
    }

    /// Walk `root` with `schema`, filing every completed listing.
    ///
    /// Listings completed before an error stay in the output.
    #[instrument(skip_all, fields(theater = %site.theater))]
    pub fn scrape<N: DocumentNode>(
        &mut self,
        root: &N,
        schema: &Schema,
        site: &SiteContext,
    ) -> Result<ScrapeSummary> {
        let mut store = AssetStore::new();
        store.set(AssetField::Theater, site.theater.as_str());
        store.set(AssetField::Map, site.map.as_str());
        store.set(AssetField::Area, site.area.as_str());
        store.set(AssetField::TheaterLink, site.theater_link.as_str());

        let mut session = Session::new(store, &mut self.output, &mut self.posters, &self.clock);
        traverse(root, &schema.layout, &mut session)?;

        if !session.showings.is_empty() {
            warn!(
                dropped = session.showings.len(),
                "showings left without a listing were discarded"
            );
        }

        let summary = ScrapeSummary {
            showings: session.showings_recorded,
            listings: session.listings_recorded,
        };
        info!(showings = summary.showings, listings = summary.listings, "site scraped");
        Ok(summary)
    }

    /// Drain the queued poster downloads.
    pub fn take_posters(&mut self) -> Vec<PosterRequest> {
        std::mem::take(&mut self.posters)
    }

    /// Ordered output of everything scraped so far.
    pub fn finalize(&self) -> Output {
        self.output.finalize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::HtmlNode;
    use chrono::NaiveDate;
    use scraper::Html;

    const SCHEMA: &str = r#"{
      "layout": [
        { "by": "id", "field": "byDateTab", "meta": { "optional": true },
          "actions": [ { "action": "click" } ] },
        { "by": "class_name", "field": "date", "meta": { "multiple": true },
          "actions": [ { "action": "unpack", "children": [
            { "by": "css_selector", "field": "h3.date-title",
              "actions": [ { "action": "asset", "name": "date", "method": "text_member",
                             "convert": { "kind": "date", "format": "%A %d, %B" } } ] },
            { "by": "class_name", "field": "film", "meta": { "multiple": true },
              "actions": [
                { "action": "unpack", "children": [
                  { "by": "tag_name", "field": "img", "meta": { "optional": true },
                    "actions": [ { "action": "save_poster", "method": "get_attribute",
                                   "attribute": "alt" } ] },
                  { "by": "css_selector", "field": "h3.title",
                    "actions": [ { "action": "asset", "name": "title",
                                   "method": "get_attribute", "attribute": "innerHTML" } ] },
                  { "by": "class_name", "field": "censor", "meta": { "optional": true },
                    "actions": [ { "action": "asset", "name": "rating",
                                   "method": "text_member" } ] },
                  { "by": "css_selector", "field": ".session-times li", "meta": { "multiple": true },
                    "actions": [ { "action": "unpack", "children": [
                      { "by": "tag_name", "field": "a",
                        "actions": [ { "action": "asset", "name": "link",
                                       "method": "get_attribute", "attribute": "href" } ] },
                      { "by": "tag_name", "field": "time",
                        "actions": [ { "action": "asset", "name": "time", "method": "text_member",
                                       "convert": { "kind": "time", "format": "%I:%M %p" } } ] }
                    ] }, { "action": "create_showing" } ] }
                ] },
                { "action": "create_listing" } ] }
          ] } ] }
      ]
    }"#;

    fn page(film: &str, time: &str) -> Html {
        Html::parse_document(&format!(
            r#"<html><body>
              <div class="date">
                <h3 class="date-title">Friday 15, March</h3>
                <div class="film">
                  <img src="/posters/{film}.jpg" alt="{film}">
                  <h3 class="title">{film}</h3>
                  <span class="censor">R</span>
                  <ul class="session-times">
                    <li><a href="https://tickets.example.com/{time}"><time>{time}</time></a></li>
                  </ul>
                </div>
              </div>
            </body></html>"#
        ))
    }

    fn site(theater: &str) -> SiteContext {
        SiteContext {
            theater: theater.into(),
            map: format!("https://maps.example.com/{theater}"),
            area: "Mission".into(),
            theater_link: format!("https://{theater}.example.com"),
        }
    }

    fn scraper() -> Scraper {
        Scraper::new(Clock::at_date(NaiveDate::from_ymd_opt(2024, 3, 15).unwrap()))
    }

    #[test]
    fn two_theaters_same_title_earliest_first() {
        let schema = Schema::from_json(SCHEMA).unwrap();
        let mut scraper = scraper();

        let roxie = page("Alien", "7:30 PM");
        let summary = scraper
            .scrape(&HtmlNode::root(&roxie), &schema, &site("roxie"))
            .unwrap();
        assert_eq!(summary, ScrapeSummary { showings: 1, listings: 1 });

        let vogue = page("Alien", "6:00 PM");
        scraper
            .scrape(&HtmlNode::root(&vogue), &schema, &site("vogue"))
            .unwrap();

        let output = scraper.finalize();
        let bucket = output.bucket("2024-03-15", "Alien").expect("bucket");
        assert_eq!(bucket.rating, "R");
        assert_eq!(bucket.poster, crate::dispatch::poster_file_stem("alien"));

        let times: Vec<&str> = bucket
            .listings
            .iter()
            .map(|l| l.showings[0].time.as_str())
            .collect();
        assert_eq!(times, ["1800", "1930"]);
        assert_eq!(bucket.listings[0].theater, "vogue");
        assert_eq!(bucket.listings[0].area, "Mission");
        assert_eq!(bucket.listings[1].theater_link, "https://roxie.example.com");
        assert_eq!(bucket.listings[1].showings[0].link, "https://tickets.example.com/7:30 PM");

        let posters = scraper.take_posters();
        assert_eq!(posters.len(), 2);
        assert_eq!(posters[0].src, "/posters/Alien.jpg");
        assert!(scraper.take_posters().is_empty());
    }

    #[test]
    fn failing_site_leaves_earlier_output_intact() {
        let schema = Schema::from_json(SCHEMA).unwrap();
        let mut scraper = scraper();

        let good = page("Heat", "9:00 PM");
        scraper
            .scrape(&HtmlNode::root(&good), &schema, &site("roxie"))
            .unwrap();

        let broken = page("Alien", "Sold out");
        let err = scraper
            .scrape(&HtmlNode::root(&broken), &schema, &site("vogue"))
            .unwrap_err();
        assert!(matches!(err, showtime_shared::ShowtimeError::Conversion { .. }));

        let output = scraper.finalize();
        assert_eq!(output.listing_count(), 1);
        assert!(output.bucket("2024-03-15", "Heat").is_some());
        assert!(output.bucket("2024-03-15", "Alien").is_none());
    }

    #[test]
    fn site_fields_are_seeded_per_run() {
        let schema = Schema::from_json(SCHEMA).unwrap();
        let mut scraper = scraper();
        let doc = page("Heat", "9:00 PM");

        scraper
            .scrape(&HtmlNode::root(&doc), &schema, &SiteContext::default())
            .unwrap();
        let output = scraper.finalize();
        let listing = &output.bucket("2024-03-15", "Heat").unwrap().listings[0];
        assert_eq!(listing.theater, "");
        assert_eq!(listing.map, "");
    }
}
