//! [`DocumentNode`] binding over a parsed `scraper::Html` page.

use scraper::{ElementRef, Html, Selector};
use tracing::trace;

use showtime_shared::{Result, ShowtimeError};

use super::{DocumentNode, Locator};

/// A node of a static, already-rendered HTML page.
#[derive(Debug, Clone, Copy)]
pub struct HtmlNode<'a> {
    element: ElementRef<'a>,
}

impl<'a> HtmlNode<'a> {
    /// The document's root element.
    pub fn root(doc: &'a Html) -> Self {
        Self {
            element: doc.root_element(),
        }
    }
}

impl DocumentNode for HtmlNode<'_> {
    fn find_one(&self, locator: &Locator) -> Result<Self> {
        let selector = compile(locator)?;
        self.element
            .select(&selector)
            .next()
            .map(|element| Self { element })
            .ok_or_else(|| ShowtimeError::not_found(locator.to_string()))
    }

    fn find_all(&self, locator: &Locator) -> Result<Vec<Self>> {
        let selector = compile(locator)?;
        Ok(self
            .element
            .select(&selector)
            .map(|element| Self { element })
            .collect())
    }

    fn attribute(&self, name: &str) -> Option<String> {
        match name {
            "innerHTML" => Some(self.element.inner_html().trim().to_string()),
            "outerHTML" => Some(self.element.html()),
            "textContent" => Some(self.element.text().collect()),
            _ => self
                .element
                .value()
                .attr(name)
                .map(|value| value.trim().to_string()),
        }
    }

    fn text(&self) -> String {
        // Rendered text: whitespace runs collapse to one space.
        self.element
            .text()
            .flat_map(str::split_whitespace)
            .collect::<Vec<_>>()
            .join(" ")
    }

    fn activate(&self) -> Result<()> {
        // A static page has no script to run.
        trace!(tag = self.element.value().name(), "activate on static document ignored");
        Ok(())
    }
}

fn compile(locator: &Locator) -> Result<Selector> {
    let css = locator.to_css();
    Selector::parse(&css).map_err(|e| ShowtimeError::InvalidSelector {
        selector: locator.to_string(),
        message: e.to_string(),
    })
}
