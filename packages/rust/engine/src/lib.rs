//! Schema-driven showtime extraction engine.
//!
//! This crate provides:
//! - [`schema`]: the declarative layout tree ([`SchemaNode`], [`ActionSpec`]) and its loader
//! - [`document`]: the [`DocumentNode`] capability trait and the [`HtmlNode`] binding over `scraper`
//! - [`store`]: the per-site [`AssetStore`] scratch state
//! - [`convert`]: date/time normalization
//! - [`sort`]: the partition sort used to order output
//! - [`output`]: [`OutputBuilder`], grouping listings by date and title
//! - [`traverse`] / [`dispatch`]: the interpreter walking a document with a schema
//! - [`scrape`]: [`Scraper`], the entry point tying one site's run together

pub mod convert;
pub mod dispatch;
pub mod document;
pub mod output;
pub mod schema;
pub mod scrape;
pub mod session;
pub mod sort;
pub mod store;
pub mod traverse;

#[cfg(test)]
pub(crate) mod testing;

pub use convert::{Clock, normalize_date, normalize_time};
pub use document::{DocumentNode, HtmlNode, Locator, SelectorKind};
pub use output::OutputBuilder;
pub use schema::{
    ActionSpec, Cardinality, ConvertSpec, Meta, Optionality, ReadMethod, Schema, SchemaNode,
    load_schema,
};
pub use scrape::{PosterRequest, ScrapeSummary, Scraper, SiteContext};
pub use session::Session;
pub use sort::quicksort_by_key;
pub use store::{AssetField, AssetStore};
pub use traverse::traverse;
