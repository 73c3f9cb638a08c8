//! Depth-first interpreter over a schema's layout tree.

use tracing::{debug, trace};

use showtime_shared::Result;

use crate::dispatch;
use crate::document::DocumentNode;
use crate::schema::{Cardinality, Optionality, SchemaNode};
use crate::session::Session;

/// Walk `schema` with `node` as the search root.
///
/// Nodes run in order. Each one resolves its selector against `node`, then
/// runs its actions in order on every match before the next node starts, so
/// a `click` on one node can reveal what a later sibling looks for.
///
/// A required single node that does not resolve aborts the walk. An optional
/// one is skipped. A multiple node with no matches runs nothing.
pub fn traverse<N: DocumentNode>(
    node: &N,
    schema: &[SchemaNode],
    session: &mut Session<'_>,
) -> Result<()> {
    for child in schema {
        let locator = child.locator();

        let matches = match child.cardinality() {
            Cardinality::Single => match node.find_one(&locator) {
                Ok(found) => vec![found],
                Err(e) if e.is_not_found() && child.optionality() == Optionality::Optional => {
                    trace!(%locator, "optional node absent, skipped");
                    continue;
                }
                Err(e) => return Err(e),
            },
            Cardinality::Multiple => node.find_all(&locator)?,
        };

        debug!(%locator, matches = matches.len(), actions = child.actions.len(), "node resolved");

        for matched in &matches {
            for action in &child.actions {
                dispatch::execute(matched, action, session)?;
            }
        }
    }
    Ok(())
}
