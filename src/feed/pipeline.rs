use quick_xml::escape::escape;
use thiserror::Error;

use crate::html::{HtmlReader, ScraperHtml};
use crate::util::truncate;

use super::document::{ConvertError, FeedDocument};
use super::extract::{extract_items, MalformedFeedError};
use super::normalize::{normalize_with, ImageStrategy};
use super::types::{DisplayItem, NormalizedFeedItem};

/// Default title bound, in characters.
pub const DEFAULT_MAX_TITLE_LENGTH: usize = 50;

/// Default excerpt bound, in characters.
pub const DEFAULT_MAX_EXCERPT_LENGTH: usize = 100;

/// Title of the item shown in place of a feed that could not be fetched.
pub const ERROR_ITEM_TITLE: &str = "Error Retrieving RSS";

/// Errors from turning raw XML into display items.
#[derive(Debug, Error)]
pub enum FeedError {
    /// The bytes are not a well-formed XML document
    #[error("Failed to convert feed XML: {0}")]
    Convert(#[from] ConvertError),
    /// The document has no recognizable item list
    #[error(transparent)]
    Malformed(#[from] MalformedFeedError),
}

/// Bounds applied while building display items.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineOptions {
    /// Item cap; `None` keeps every item, `<= 0` keeps none.
    pub max_items: Option<i64>,
    /// Title bound in characters; `None` or `0` disables truncation.
    pub max_title_length: Option<usize>,
    /// Excerpt bound in characters; `None` or `0` disables truncation.
    pub max_excerpt_length: Option<usize>,
    pub image_strategy: ImageStrategy,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            max_items: None,
            max_title_length: Some(DEFAULT_MAX_TITLE_LENGTH),
            max_excerpt_length: Some(DEFAULT_MAX_EXCERPT_LENGTH),
            image_strategy: ImageStrategy::Precedence,
        }
    }
}

/// Builds display items from a converted feed.
///
/// Extracts at most `options.max_items` items, normalizes each one, then
/// truncates its title and excerpt. Feed order is kept throughout.
///
/// # Errors
///
/// Returns [`MalformedFeedError`] when the document has no item list. An
/// empty result is only returned for a feed whose cap is zero, never as a
/// stand-in for a malformed feed.
pub fn build_feed_items<H: HtmlReader + ?Sized>(
    doc: &FeedDocument,
    options: &PipelineOptions,
    html: &H,
) -> Result<Vec<DisplayItem>, MalformedFeedError> {
    let items = extract_items(doc, options.max_items)?;

    Ok(items
        .iter()
        .map(|raw| normalize_with(raw, html, &options.image_strategy))
        .map(|item| to_display_item(item, options))
        .collect())
}

/// Truncates a normalized item's title and excerpt for display.
pub fn to_display_item(item: NormalizedFeedItem, options: &PipelineOptions) -> DisplayItem {
    DisplayItem {
        title: truncate(item.title(), options.max_title_length).into_owned(),
        link: item.link().to_owned(),
        excerpt: truncate(&item.excerpt, options.max_excerpt_length).into_owned(),
        image_src: item.image_src.clone(),
        item,
    }
}

/// RSS document describing a failed fetch, rendered like any other feed.
///
/// The message is escaped twice: once for the HTML description, once for XML.
pub fn error_feed_xml(message: &str) -> String {
    let html_message = escape(message).into_owned();
    format!(
        "<rss>\n  <channel>\n    <item>\n      <title>{ERROR_ITEM_TITLE}</title>\n      <link>https://</link>\n      <description>There was an error retrieving the rss: {}</description>\n      <thumbnail url=\"https://\"></thumbnail>\n    </item>\n  </channel>\n</rss>",
        escape(html_message.as_str())
    )
}

/// Feed-to-display-items pipeline with fixed options.
///
/// Stateless between calls: each build reads only its input and the options.
#[derive(Debug, Clone, Default)]
pub struct FeedPipeline<H = ScraperHtml> {
    options: PipelineOptions,
    html: H,
}

impl FeedPipeline<ScraperHtml> {
    pub fn new(options: PipelineOptions) -> Self {
        Self::with_html(options, ScraperHtml)
    }
}

impl<H: HtmlReader> FeedPipeline<H> {
    /// Pipeline using a custom HTML reader.
    pub fn with_html(options: PipelineOptions, html: H) -> Self {
        Self { options, html }
    }

    /// Builds display items from an already-converted document.
    pub fn build(&self, doc: &FeedDocument) -> Result<Vec<DisplayItem>, MalformedFeedError> {
        build_feed_items(doc, &self.options, &self.html)
    }

    /// Converts raw XML and builds display items from it.
    ///
    /// # Errors
    ///
    /// - [`FeedError::Convert`] - the bytes are not well-formed XML
    /// - [`FeedError::Malformed`] - no item list at a known path
    pub fn build_from_xml(&self, xml: &[u8]) -> Result<Vec<DisplayItem>, FeedError> {
        let doc = FeedDocument::parse(xml)?;
        let items = self.build(&doc)?;
        tracing::debug!(items = items.len(), "Built display items");
        Ok(items)
    }

    /// Display items for a feed that could not be retrieved.
    ///
    /// Runs a one-item error feed through the same pipeline, so the error is
    /// subject to the same truncation (and item cap) as real content.
    pub fn error_items(&self, message: &str) -> Result<Vec<DisplayItem>, FeedError> {
        self.build_from_xml(error_feed_xml(message).as_bytes())
    }
}
