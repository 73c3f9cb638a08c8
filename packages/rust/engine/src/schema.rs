//! Declarative layout schema: what to find on a page and what to do with it.
//!
//! A schema file holds a `layout` array of [`SchemaNode`]s. Each node names a
//! selector, how many matches it expects, whether it may be absent, and the
//! [`ActionSpec`]s to run on every match. `unpack` actions carry nested nodes,
//! so the tree can be arbitrarily deep.
//!
//! ```json
//! { "layout": [
//!   { "by": "class_name", "field": "date", "meta": { "multiple": true },
//!     "actions": [ { "action": "unpack", "children": [ ... ] } ] } ] }
//! ```

use std::path::Path;

use serde::Deserialize;
use showtime_shared::{Result, ShowtimeError};

use crate::document::{Locator, SelectorKind};
use crate::store::AssetField;

// ---------------------------------------------------------------------------
// Nodes
// ---------------------------------------------------------------------------

/// Root of a schema file.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Schema {
    pub layout: Vec<SchemaNode>,
}

/// One step of the layout tree.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SchemaNode {
    /// Selector kind.
    pub by: SelectorKind,
    /// Selector value.
    pub field: String,
    #[serde(default)]
    pub meta: Meta,
    /// Run in order on every match.
    #[serde(default)]
    pub actions: Vec<ActionSpec>,
}

/// Match flags of a node.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Meta {
    #[serde(default)]
    pub optional: bool,
    #[serde(default)]
    pub multiple: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cardinality {
    Single,
    Multiple,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Optionality {
    Required,
    Optional,
}

impl SchemaNode {
    pub fn locator(&self) -> Locator {
        Locator::new(self.by, self.field.clone())
    }

    pub fn cardinality(&self) -> Cardinality {
        if self.meta.multiple {
            Cardinality::Multiple
        } else {
            Cardinality::Single
        }
    }

    pub fn optionality(&self) -> Optionality {
        if self.meta.optional {
            Optionality::Optional
        } else {
            Optionality::Required
        }
    }
}

// ---------------------------------------------------------------------------
// Actions
// ---------------------------------------------------------------------------

/// What to do with a matched node.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case", deny_unknown_fields)]
pub enum ActionSpec {
    /// Read a value into the asset store, optionally normalizing it.
    Asset {
        name: AssetField,
        method: ReadMethod,
        #[serde(default)]
        attribute: Option<String>,
        #[serde(default)]
        convert: Option<ConvertSpec>,
    },
    /// Click the node to reveal dynamic content.
    Click,
    /// Walk the nested nodes with the matched node as root.
    Unpack { children: Vec<SchemaNode> },
    /// Turn the store's `available`/`link`/`time` into a showing.
    CreateShowing,
    /// Turn the accumulated showings into a listing.
    CreateListing,
    /// Read a poster name into `poster` and queue the node's `src` image for download.
    SavePoster {
        method: ReadMethod,
        #[serde(default)]
        attribute: Option<String>,
    },
}

impl ActionSpec {
    /// Schema name of the action.
    pub fn name(&self) -> &'static str {
        match self {
            ActionSpec::Asset { .. } => "asset",
            ActionSpec::Click => "click",
            ActionSpec::Unpack { .. } => "unpack",
            ActionSpec::CreateShowing => "create_showing",
            ActionSpec::CreateListing => "create_listing",
            ActionSpec::SavePoster { .. } => "save_poster",
        }
    }
}

/// How a value is read from a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReadMethod {
    /// Trimmed attribute value (empty if absent).
    GetAttribute,
    /// Rendered text.
    TextMember,
    /// Attribute value up to the first comma.
    AttributeHead,
}

impl ReadMethod {
    pub fn needs_attribute(self) -> bool {
        matches!(self, ReadMethod::GetAttribute | ReadMethod::AttributeHead)
    }
}

/// Normalization applied to an extracted value.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case", deny_unknown_fields)]
pub enum ConvertSpec {
    /// Year-less date text to `YYYY-MM-DD`.
    Date { format: String },
    /// Clock text to `HHMM`.
    Time { format: String },
}

// ---------------------------------------------------------------------------
// Loading
// ---------------------------------------------------------------------------

impl Schema {
    /// Parse a JSON schema document.
    pub fn from_json(content: &str) -> Result<Self> {
        let schema: Schema = serde_json::from_str(content)
            .map_err(|e| ShowtimeError::schema(format!("invalid JSON schema: {e}")))?;
        schema.validate()?;
        Ok(schema)
    }

    /// Parse a TOML schema document.
    pub fn from_toml(content: &str) -> Result<Self> {
        let schema: Schema = toml::from_str(content)
            .map_err(|e| ShowtimeError::schema(format!("invalid TOML schema: {e}")))?;
        schema.validate()?;
        Ok(schema)
    }

    /// Check constraints serde cannot express.
    pub fn validate(&self) -> Result<()> {
        if self.layout.is_empty() {
            return Err(ShowtimeError::schema("layout is empty"));
        }
        validate_nodes(&self.layout, "layout")
    }

    /// Number of nodes in the whole tree.
    pub fn node_count(&self) -> usize {
        count_nodes(&self.layout)
    }

    /// Number of actions in the whole tree.
    pub fn action_count(&self) -> usize {
        count_actions(&self.layout)
    }
}

/// Load a schema file; the format follows the extension (`.toml`, otherwise JSON).
pub fn load_schema(path: &Path) -> Result<Schema> {
    let content = std::fs::read_to_string(path).map_err(|e| ShowtimeError::io(path, e))?;

    let is_toml = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("toml"));

    let schema = if is_toml {
        Schema::from_toml(&content)
    } else {
        Schema::from_json(&content)
    };

    schema.map_err(|e| match e {
        ShowtimeError::Schema { message } => {
            ShowtimeError::schema(format!("{}: {message}", path.display()))
        }
        other => other,
    })
}

fn validate_nodes(nodes: &[SchemaNode], path: &str) -> Result<()> {
    for (i, node) in nodes.iter().enumerate() {
        let here = format!("{path}[{i}]");

        if node.field.trim().is_empty() {
            return Err(ShowtimeError::schema(format!("{here}: empty selector")));
        }

        for action in &node.actions {
            match action {
                ActionSpec::Asset {
                    method, attribute, ..
                }
                | ActionSpec::SavePoster { method, attribute } => {
                    if method.needs_attribute() && attribute.is_none() {
                        return Err(ShowtimeError::schema(format!(
                            "{here}: {} with method {method:?} needs an `attribute`",
                            action.name()
                        )));
                    }
                }
                ActionSpec::Unpack { children } => {
                    if children.is_empty() {
                        return Err(ShowtimeError::schema(format!(
                            "{here}: unpack without children"
                        )));
                    }
                    validate_nodes(children, &format!("{here}.children"))?;
                }
                ActionSpec::Click | ActionSpec::CreateShowing | ActionSpec::CreateListing => {}
            }
        }
    }
    Ok(())
}

fn count_nodes(nodes: &[SchemaNode]) -> usize {
    nodes
        .iter()
        .map(|node| {
            1 + node
                .actions
                .iter()
                .map(|a| match a {
                    ActionSpec::Unpack { children } => count_nodes(children),
                    _ => 0,
                })
                .sum::<usize>()
        })
        .sum()
}

fn count_actions(nodes: &[SchemaNode]) -> usize {
    nodes
        .iter()
        .flat_map(|node| node.actions.iter())
        .map(|a| match a {
            ActionSpec::Unpack { children } => 1 + count_actions(children),
            _ => 1,
        })
        .sum()
}
