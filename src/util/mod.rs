//! Utility functions for display text.
//!
//! - **Truncation**: character-based bounding with a trailing ellipsis
//! - **Terminal safety**: stripping control characters from feed-supplied text
//!
//! # Examples
//!
//! ```
//! use rss_items::util::{strip_control_chars, truncate};
//!
//! assert_eq!(truncate("Long article title", Some(4)), "Long...");
//! assert_eq!(strip_control_chars("\x1b[1mBold\x1b[0m"), "Bold");
//! ```

mod text;

pub use text::{strip_control_chars, truncate};
