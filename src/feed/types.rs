use serde::Serialize;

use super::document::{XmlMap, XmlValue};

/// One `<item>` as converted from the feed, before normalization.
///
/// Fields are kept untyped; accessors cover the keys the pipeline reads.
/// Unknown keys (e.g. `guid`, `pubDate`, `category`) are preserved and can be
/// reached through [`RawFeedItem::field`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawFeedItem {
    fields: XmlMap,
}

impl RawFeedItem {
    pub fn new(fields: XmlMap) -> Self {
        Self { fields }
    }

    /// Builds an item from a converted `<item>` value.
    ///
    /// A text-only item (e.g. `<item/>`) has no fields.
    pub fn from_value(value: &XmlValue) -> Self {
        match value {
            XmlValue::Map(fields) => Self::new(fields.clone()),
            _ => Self::default(),
        }
    }

    pub fn field(&self, name: &str) -> Option<&XmlValue> {
        self.fields.get(name)
    }

    /// Text of a field, if present.
    pub fn text(&self, name: &str) -> Option<&str> {
        self.field(name).and_then(XmlValue::as_text)
    }

    /// Item title, empty when missing.
    pub fn title(&self) -> &str {
        self.text("title").unwrap_or_default()
    }

    /// Item link, empty when missing.
    ///
    /// Falls back to an `href` attribute for `<link href="..."/>` style links.
    pub fn link(&self) -> &str {
        self.text("link")
            .filter(|link| !link.is_empty())
            .or_else(|| self.field("link").and_then(|l| l.attribute("href")))
            .unwrap_or_default()
    }

    /// Description field, possibly HTML.
    pub fn description(&self) -> Option<&str> {
        self.text("description")
    }

    /// Extended content field (`content:encoded`), possibly HTML.
    pub fn encoded(&self) -> Option<&str> {
        self.text("encoded")
    }

    /// `url` attribute of the item's thumbnail, when present and non-empty.
    ///
    /// With several thumbnails the first one is used.
    pub fn thumbnail_url(&self) -> Option<&str> {
        let thumbnail = match self.field("thumbnail")? {
            XmlValue::List(items) => items.first()?,
            other => other,
        };
        thumbnail.attribute("url").filter(|url| !url.is_empty())
    }
}

/// A feed item with its derived excerpt and image.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NormalizedFeedItem {
    /// The item as converted from the feed
    pub raw: RawFeedItem,
    /// Plain text of the description, trimmed
    pub excerpt: String,
    /// Representative image URL, or empty
    pub image_src: String,
}

impl NormalizedFeedItem {
    pub fn title(&self) -> &str {
        self.raw.title()
    }

    pub fn link(&self) -> &str {
        self.raw.link()
    }
}

/// A render-ready item: normalized, with title and excerpt truncated for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DisplayItem {
    pub title: String,
    pub link: String,
    pub excerpt: String,
    pub image_src: String,
    /// Untruncated source item (for tooltips and alt text)
    #[serde(skip)]
    pub item: NormalizedFeedItem,
}
