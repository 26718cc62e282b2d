//! HTML fragment reading for feed item content.
//!
//! Item descriptions are HTML fragments. The normalizer needs two things from
//! them: their flattened text and the first image they reference. Both are
//! behind [`HtmlReader`] so the normalizer can be driven by a stub in tests.

use scraper::{Html, Selector};

/// Reads text and images out of HTML fragments.
pub trait HtmlReader {
    /// Concatenated text content of every node in the fragment, tags removed.
    ///
    /// Whitespace is preserved as-is; callers trim.
    fn text_content(&self, fragment: &str) -> String;

    /// `src` attribute of the fragment's first `<img>` element, with
    /// surrounding whitespace trimmed. A blank `src` counts as missing.
    ///
    /// Only the first `<img>` is considered: if it has no usable `src`, later
    /// images are not searched.
    fn first_image_src(&self, fragment: &str) -> Option<String>;
}

/// [`HtmlReader`] backed by the `scraper` HTML5 parser.
#[derive(Debug, Clone, Copy, Default)]
pub struct ScraperHtml;

impl HtmlReader for ScraperHtml {
    fn text_content(&self, fragment: &str) -> String {
        Html::parse_fragment(fragment).root_element().text().collect()
    }

    fn first_image_src(&self, fragment: &str) -> Option<String> {
        let selector = Selector::parse("img").ok()?;
        let document = Html::parse_fragment(fragment);
        let image = document.select(&selector).next()?;

        image
            .value()
            .attr("src")
            .map(str::trim)
            .filter(|src| !src.is_empty())
            .map(str::to_owned)
    }
}
