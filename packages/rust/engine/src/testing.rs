//! In-memory document tree for exercising the engine without a page.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use showtime_shared::{Result, ShowtimeError};

use crate::document::{DocumentNode, Locator, SelectorKind};

#[derive(Debug, Default)]
struct Inner {
    tag: String,
    attrs: Vec<(String, String)>,
    text: String,
    children: RefCell<Vec<FakeNode>>,
    hidden: RefCell<Vec<FakeNode>>,
    activations: Cell<usize>,
}

/// Cheaply clonable handle to a fake element.
#[derive(Debug, Clone)]
pub(crate) struct FakeNode(Rc<Inner>);

impl FakeNode {
    pub fn new(tag: &str) -> Self {
        Self(Rc::new(Inner {
            tag: tag.into(),
            ..Inner::default()
        }))
    }

    fn inner_mut(&mut self) -> &mut Inner {
        Rc::get_mut(&mut self.0).expect("fake node shared while still being built")
    }

    pub fn attr(mut self, name: &str, value: &str) -> Self {
        self.inner_mut().attrs.push((name.into(), value.into()));
        self
    }

    pub fn id(self, id: &str) -> Self {
        self.attr("id", id)
    }

    pub fn class(self, class: &str) -> Self {
        self.attr("class", class)
    }

    pub fn text(mut self, text: &str) -> Self {
        self.inner_mut().text = text.into();
        self
    }

    pub fn child(self, child: FakeNode) -> Self {
        self.0.children.borrow_mut().push(child);
        self
    }

    /// Child that only appears after the node is activated.
    pub fn revealed_by_click(self, child: FakeNode) -> Self {
        self.0.hidden.borrow_mut().push(child);
        self
    }

    pub fn activations(&self) -> usize {
        self.0.activations.get()
    }

    fn get_attr(&self, name: &str) -> Option<&str> {
        self.0
            .attrs
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    fn has_class(&self, class: &str) -> bool {
        self.get_attr("class")
            .is_some_and(|c| c.split_whitespace().any(|c| c == class))
    }

    /// Supports `tag`, `.class`, `#id` and compounds like `h3.title`.
    fn matches(&self, locator: &Locator) -> bool {
        let value = locator.value.trim();
        match locator.kind {
            SelectorKind::Id => self.get_attr("id") == Some(value),
            SelectorKind::ClassName => self.has_class(value),
            SelectorKind::TagName => self.0.tag == value,
            SelectorKind::CssSelector => self.matches_compound(value),
        }
    }

    fn matches_compound(&self, css: &str) -> bool {
        let mut rest = css;
        let tag_end = rest.find(['.', '#']).unwrap_or(rest.len());
        let (tag, tail) = rest.split_at(tag_end);
        if !tag.is_empty() && tag != self.0.tag {
            return false;
        }
        rest = tail;

        while !rest.is_empty() {
            let marker = &rest[..1];
            let body = &rest[1..];
            let end = body.find(['.', '#']).unwrap_or(body.len());
            let name = &body[..end];
            let ok = match marker {
                "." => self.has_class(name),
                _ => self.get_attr("id") == Some(name),
            };
            if !ok {
                return false;
            }
            rest = &body[end..];
        }
        true
    }

    fn collect_matches(&self, locator: &Locator, out: &mut Vec<FakeNode>) {
        for child in self.0.children.borrow().iter() {
            if child.matches(locator) {
                out.push(child.clone());
            }
            child.collect_matches(locator, out);
        }
    }
}

impl DocumentNode for FakeNode {
    fn find_one(&self, locator: &Locator) -> Result<Self> {
        self.find_all(locator)?
            .into_iter()
            .next()
            .ok_or_else(|| ShowtimeError::not_found(locator.to_string()))
    }

    fn find_all(&self, locator: &Locator) -> Result<Vec<Self>> {
        let mut out = Vec::new();
        self.collect_matches(locator, &mut out);
        Ok(out)
    }

    fn attribute(&self, name: &str) -> Option<String> {
        self.get_attr(name).map(|v| v.trim().to_string())
    }

    fn text(&self) -> String {
        if !self.0.text.is_empty() {
            return self.0.text.clone();
        }
        self.0
            .children
            .borrow()
            .iter()
            .map(DocumentNode::text)
            .filter(|t| !t.is_empty())
            .collect::<Vec<_>>()
            .join(" ")
    }

    fn activate(&self) -> Result<()> {
        self.0.activations.set(self.0.activations.get() + 1);
        let revealed: Vec<FakeNode> = self.0.hidden.borrow_mut().drain(..).collect();
        self.0.children.borrow_mut().extend(revealed);
        Ok(())
    }
}
