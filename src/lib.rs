//! Turns an RSS feed into a short list of display-ready items.
//!
//! The [`feed`] module holds the pipeline: XML conversion, item extraction,
//! excerpt and image normalization, and display truncation. [`html`] provides
//! the HTML capability the normalizer needs, [`config`] the TOML settings, and
//! [`output`] the JSON/text serialization used by the `rss-items` binary.

pub mod config;
pub mod feed;
pub mod html;
pub mod output;
pub mod util;
