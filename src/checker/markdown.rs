// src/checker/markdown.rs
// =============================================================================
// This module extracts link destinations from Markdown text.
//
// We use the `pulldown-cmark` crate which:
// - Parses Markdown into events (heading, paragraph, link, image, etc.)
// - Follows the CommonMark specification
// - Emits events in document order, which is a depth-first walk of the tree
//
// Nothing here touches the network or the filesystem. Filtering down to
// HTTP/HTTPS targets is the classifier's job (see classify.rs), so this
// returns every destination, duplicates included.
// =============================================================================

use pulldown_cmark::{Event, Parser, Tag};
use std::borrow::Cow;
use tracing::warn;

// Extracts every link and image destination from Markdown bytes
//
// Parameters:
//   markdown: the raw document bytes
//
// Returns: destinations in document order
//
// Bytes that aren't valid UTF-8 (a stray Latin-1 character, say) are
// replaced with U+FFFD before parsing, so the links around them survive.
//
// Example input:
//   "See [Rust](https://www.rust-lang.org) ![logo](logo.png)"
//
// Example output:
//   vec!["https://www.rust-lang.org", "logo.png"]
pub fn extract_links(markdown: &[u8]) -> Vec<String> {
    let text = String::from_utf8_lossy(markdown);
    if matches!(text, Cow::Owned(_)) {
        warn!("markdown is not valid UTF-8, invalid bytes were replaced");
    }

    Parser::new(&text)
        .filter_map(|event| match event {
            // In pulldown-cmark 0.9 both tags carry (link_type, dest_url, title).
            // Only Start events count; the matching End would be a duplicate.
            // Autolinks (<https://...>) arrive as Tag::Link too and are kept.
            Event::Start(Tag::Link(_, dest_url, _)) | Event::Start(Tag::Image(_, dest_url, _)) => {
                Some(dest_url.to_string())
            }
            _ => None,
        })
        .collect()
}
