//! Document capability trait and built-in bindings.
//!
//! The engine never touches a page directly; it asks a [`DocumentNode`] to
//! find children, read attributes or text, and activate itself. A static
//! HTML binding ([`HtmlNode`]) ships with the crate; browser-backed bindings
//! implement the same trait.

mod html;

use std::fmt;

use serde::Deserialize;
use showtime_shared::Result;

pub use html::HtmlNode;

// ---------------------------------------------------------------------------
// Locator
// ---------------------------------------------------------------------------

/// How a schema node's `field` is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectorKind {
    Id,
    ClassName,
    CssSelector,
    TagName,
}

impl SelectorKind {
    pub fn as_str(self) -> &'static str {
        match self {
            SelectorKind::Id => "id",
            SelectorKind::ClassName => "class_name",
            SelectorKind::CssSelector => "css_selector",
            SelectorKind::TagName => "tag_name",
        }
    }
}

/// A selector kind paired with its value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Locator {
    pub kind: SelectorKind,
    pub value: String,
}

impl Locator {
    pub fn new(kind: SelectorKind, value: impl Into<String>) -> Self {
        Self {
            kind,
            value: value.into(),
        }
    }

    /// Equivalent CSS selector text.
    pub fn to_css(&self) -> String {
        let value = self.value.trim();
        match self.kind {
            SelectorKind::Id => {
                let escaped = value.replace('\\', "\\\\").replace('"', "\\\"");
                format!("[id=\"{escaped}\"]")
            }
            SelectorKind::ClassName => format!(".{value}"),
            SelectorKind::CssSelector | SelectorKind::TagName => value.to_string(),
        }
    }
}

impl fmt::Display for Locator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.kind.as_str(), self.value)
    }
}

// ---------------------------------------------------------------------------
// Trait
// ---------------------------------------------------------------------------

/// Handle to one node of an already-loaded document.
///
/// Searches are scoped to the node's descendants. Calls are blocking and
/// treated as atomic by the engine.
pub trait DocumentNode: Sized {
    /// First descendant matching `locator`.
    /// Fails with [`ShowtimeError::ElementNotFound`](showtime_shared::ShowtimeError::ElementNotFound) if absent.
    fn find_one(&self, locator: &Locator) -> Result<Self>;

    /// All descendants matching `locator`, in document order. May be empty.
    fn find_all(&self, locator: &Locator) -> Result<Vec<Self>>;

    /// Attribute (or DOM property) value, if present.
    fn attribute(&self, name: &str) -> Option<String>;

    /// Rendered text of the node.
    fn text(&self) -> String;

    /// Click-equivalent activation.
    fn activate(&self) -> Result<()>;
}
