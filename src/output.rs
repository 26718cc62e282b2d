//! Serializing display items for the command-line front end.

use serde::Serialize;

use crate::config::Config;
use crate::feed::DisplayItem;
use crate::util::strip_control_chars;

/// Read-more link strings, taken verbatim from configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReadMoreText {
    pub anchor_text: String,
    pub anchor_title: String,
    pub image_alt: String,
}

impl ReadMoreText {
    /// Read-more strings when enabled in `config`.
    pub fn from_config(config: &Config) -> Option<Self> {
        config.show_read_more.then(|| Self {
            anchor_text: config.read_more_anchor_text.clone(),
            anchor_title: config.read_more_anchor_title.clone(),
            image_alt: config.read_more_image_alt.clone(),
        })
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ReadMoreLink<'a> {
    text: &'a str,
    title: String,
    href: &'a str,
    image_alt: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ItemOutput<'a> {
    #[serde(flatten)]
    item: &'a DisplayItem,
    #[serde(skip_serializing_if = "Option::is_none")]
    read_more: Option<ReadMoreLink<'a>>,
}

fn read_more_link<'a>(item: &'a DisplayItem, read_more: &'a ReadMoreText) -> ReadMoreLink<'a> {
    ReadMoreLink {
        text: &read_more.anchor_text,
        // The tooltip carries the full title, not the truncated one
        title: format!("{}{}", read_more.anchor_title, item.item.title()),
        href: &item.link,
        image_alt: &read_more.image_alt,
    }
}

/// Items as a pretty-printed JSON array.
pub fn render_json(
    items: &[DisplayItem],
    read_more: Option<&ReadMoreText>,
) -> Result<String, serde_json::Error> {
    let output: Vec<ItemOutput<'_>> = items
        .iter()
        .map(|item| ItemOutput {
            item,
            read_more: read_more.map(|rm| read_more_link(item, rm)),
        })
        .collect();
    serde_json::to_string_pretty(&output)
}

/// Items as plain text blocks separated by blank lines.
///
/// SEC-001: feed text is stripped of control characters before it reaches the terminal.
pub fn render_text(items: &[DisplayItem], read_more: Option<&ReadMoreText>) -> String {
    let mut out = String::new();

    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            out.push('\n');
        }
        out.push_str(&strip_control_chars(&item.title));
        out.push('\n');
        if !item.link.is_empty() {
            out.push_str(&format!("  {}\n", strip_control_chars(&item.link)));
        }
        if !item.image_src.is_empty() {
            out.push_str(&format!("  image: {}\n", strip_control_chars(&item.image_src)));
        }
        if !item.excerpt.is_empty() {
            out.push_str(&format!("  {}\n", strip_control_chars(&item.excerpt)));
        }
        if let Some(rm) = read_more {
            out.push_str(&format!(
                "  {} -> {}\n",
                strip_control_chars(&rm.anchor_text),
                strip_control_chars(&item.link)
            ));
        }
    }

    out
}
