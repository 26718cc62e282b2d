use crate::html::HtmlReader;

use super::types::{NormalizedFeedItem, RawFeedItem};

/// How an item's representative image is chosen.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ImageStrategy {
    /// First match wins: thumbnail `url`, first `<img>` in the description,
    /// first `<img>` in the encoded content.
    #[default]
    Precedence,
    /// Only the first `<img>` inside the named item field is considered.
    Field(String),
}

impl ImageStrategy {
    /// Strategy for an optional field override; `None` keeps the default chain.
    pub fn from_field(field: Option<&str>) -> Self {
        match field.map(str::trim).filter(|f| !f.is_empty()) {
            Some(field) => ImageStrategy::Field(field.to_string()),
            None => ImageStrategy::Precedence,
        }
    }
}

/// Derives the excerpt and image of an item using the default image strategy.
pub fn normalize<H: HtmlReader + ?Sized>(item: &RawFeedItem, html: &H) -> NormalizedFeedItem {
    normalize_with(item, html, &ImageStrategy::Precedence)
}

/// Derives the excerpt and image of an item.
///
/// The excerpt is the trimmed text content of the description (empty when
/// the description is missing). The input item is cloned into the result,
/// never modified.
pub fn normalize_with<H: HtmlReader + ?Sized>(
    item: &RawFeedItem,
    html: &H,
    strategy: &ImageStrategy,
) -> NormalizedFeedItem {
    let excerpt = non_empty(item.description())
        .map(|description| html.text_content(description).trim().to_string())
        .unwrap_or_default();

    let image_src = match strategy {
        ImageStrategy::Precedence => item
            .thumbnail_url()
            .map(str::to_owned)
            .or_else(|| first_image(html, item.description()))
            .or_else(|| first_image(html, item.encoded())),
        ImageStrategy::Field(field) => first_image(html, item.text(field)),
    }
    .unwrap_or_default();

    NormalizedFeedItem {
        raw: item.clone(),
        excerpt,
        image_src,
    }
}

fn first_image<H: HtmlReader + ?Sized>(html: &H, fragment: Option<&str>) -> Option<String> {
    non_empty(fragment).and_then(|fragment| html.first_image_src(fragment))
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}
