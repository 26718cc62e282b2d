//! Feed ingestion: from raw RSS XML to display-ready items.
//!
//! - **Conversion**: XML into a generic nested mapping ([`FeedDocument`])
//! - **Extraction**: locating the item list and capping it ([`extract_items`])
//! - **Normalization**: excerpt and image per item ([`normalize`])
//! - **Pipeline**: all of the above plus display truncation ([`FeedPipeline`])
//! - **Fetching**: a single bounded HTTP GET ([`FeedFetcher`])
//!
//! # Example
//!
//! ```
//! use rss_items::feed::{FeedPipeline, PipelineOptions};
//!
//! let xml = br#"<rss><channel><item>
//!     <title>Hello</title>
//!     <link>https://example.com/hello</link>
//!     <description>&lt;p&gt;World&lt;/p&gt;</description>
//! </item></channel></rss>"#;
//!
//! let items = FeedPipeline::new(PipelineOptions::default())
//!     .build_from_xml(xml)
//!     .unwrap();
//! assert_eq!(items[0].title, "Hello");
//! assert_eq!(items[0].excerpt, "World");
//! ```

mod document;
mod extract;
mod fetcher;
mod normalize;
mod pipeline;
mod types;

pub use document::{ConvertError, FeedDocument, XmlMap, XmlValue, ATTRIBUTE_PREFIX, TEXT_KEY};
pub use extract::{extract_items, MalformedFeedError};
pub use fetcher::{validate_feed_url, FeedFetcher, FetchError, DEFAULT_TIMEOUT};
pub use normalize::{normalize, normalize_with, ImageStrategy};
pub use pipeline::{
    build_feed_items, error_feed_xml, to_display_item, FeedError, FeedPipeline, PipelineOptions,
    DEFAULT_MAX_EXCERPT_LENGTH, DEFAULT_MAX_TITLE_LENGTH, ERROR_ITEM_TITLE,
};
pub use types::{DisplayItem, NormalizedFeedItem, RawFeedItem};
