//! Executes one [`ActionSpec`] against a matched node.

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE;
use tracing::{trace, warn};

use showtime_shared::Result;

use crate::document::DocumentNode;
use crate::schema::{ActionSpec, ReadMethod};
use crate::scrape::PosterRequest;
use crate::session::Session;
use crate::store::AssetField;
use crate::traverse::traverse;

/// Run `action` on `node`.
pub fn execute<N: DocumentNode>(node: &N, action: &ActionSpec, session: &mut Session<'_>) -> Result<()> {
    match action {
        ActionSpec::Asset {
            name,
            method,
            attribute,
            convert,
        } => {
            let raw = read_value(node, *method, attribute.as_deref());
            let value = match convert {
                Some(spec) => session.clock.convert(spec, &raw)?,
                None => raw,
            };
            trace!(field = %name, %value, "asset extracted");
            session.store.set(*name, value);
            Ok(())
        }
        ActionSpec::Click => node.activate(),
        ActionSpec::Unpack { children } => traverse(node, children, session),
        ActionSpec::CreateShowing => session.record_showing(),
        ActionSpec::CreateListing => session.record_listing(),
        ActionSpec::SavePoster { method, attribute } => {
            save_poster(node, *method, attribute.as_deref(), session);
            Ok(())
        }
    }
}

/// Read a raw value with the given method.
fn read_value<N: DocumentNode>(node: &N, method: ReadMethod, attribute: Option<&str>) -> String {
    match method {
        ReadMethod::TextMember => node.text().trim().to_string(),
        ReadMethod::GetAttribute => attribute
            .and_then(|name| node.attribute(name))
            .unwrap_or_default(),
        ReadMethod::AttributeHead => attribute
            .and_then(|name| node.attribute(name))
            .and_then(|value| value.split(',').next().map(|head| head.trim().to_string()))
            .unwrap_or_default(),
    }
}

/// Name the poster after the node's label and queue its image.
fn save_poster<N: DocumentNode>(
    node: &N,
    method: ReadMethod,
    attribute: Option<&str>,
    session: &mut Session<'_>,
) {
    let name = read_value(node, method, attribute).to_lowercase();
    let file_stem = poster_file_stem(&name);
    session.store.set(AssetField::Poster, file_stem.clone());

    match node.attribute("src").filter(|src| !src.is_empty()) {
        Some(src) => session.posters.push(PosterRequest { file_stem, src }),
        None => warn!(poster = %name, "poster node has no src, image not queued"),
    }
}

/// URL-safe base64 of the lowercased poster name.
pub fn poster_file_stem(name: &str) -> String {
    URL_SAFE.encode(name.as_bytes())
}
