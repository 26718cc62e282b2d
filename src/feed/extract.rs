use std::slice;

use thiserror::Error;

use super::document::{FeedDocument, XmlValue};
use super::types::RawFeedItem;

/// The converted document has no items at `rss.channel.item` or `channel.item`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("malformed feed: no items at rss.channel.item or channel.item")]
pub struct MalformedFeedError;

/// Locates the feed's items and applies the item cap.
///
/// An `rss` root is checked first; only when it is absent is a bare `channel`
/// root used. A feed with one entry converts to a single item rather than a
/// list, and is treated as a one-element list here.
///
/// # Arguments
///
/// * `doc` - The converted feed
/// * `max` - Item cap. `None` keeps every item, `Some(n)` with `n <= 0` keeps none.
///
/// # Errors
///
/// Returns [`MalformedFeedError`] when neither item path exists.
pub fn extract_items(
    doc: &FeedDocument,
    max: Option<i64>,
) -> Result<Vec<RawFeedItem>, MalformedFeedError> {
    let channel = match doc.get("rss") {
        Some(rss) => rss.get("channel"),
        None => doc.get("channel"),
    };
    let items = channel
        .and_then(|c| c.get("item"))
        .ok_or(MalformedFeedError)?;

    let items: &[XmlValue] = match items {
        XmlValue::List(items) => items,
        single => slice::from_ref(single),
    };

    let limit = match max {
        None => usize::MAX,
        Some(n) => usize::try_from(n).unwrap_or(0),
    };

    let extracted: Vec<RawFeedItem> = items
        .iter()
        .take(limit)
        .map(RawFeedItem::from_value)
        .collect();

    tracing::debug!(
        available = items.len(),
        kept = extracted.len(),
        "Extracted feed items"
    );

    Ok(extracted)
}
