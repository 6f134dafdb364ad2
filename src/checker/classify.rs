// src/checker/classify.rs
// =============================================================================
// Decides which destinations are worth probing.
//
// We only probe absolute HTTP/HTTPS URLs. Everything else is dropped here,
// before dispatch:
// - mailto: links (email addresses)
// - tel:, javascript:, ftp:, file: and other schemes
// - Relative links like ./docs/README.md or #anchors
//
// The check is purely on the scheme. A destination like "http://[::1" still
// passes, and the probe reports it as a malformed URL so the user sees it.
// =============================================================================

// Returns true if `destination` starts with an http:// or https:// scheme
//
// The scheme comparison is ASCII case-insensitive ("HTTPS://x" counts).
// Never panics, whatever the input.
pub fn is_http_link(destination: &str) -> bool {
    let Some((scheme, rest)) = destination.split_once(':') else {
        return false;
    };

    (scheme.eq_ignore_ascii_case("http") || scheme.eq_ignore_ascii_case("https"))
        && rest.starts_with("//")
}

// Keeps only the probe-worthy destinations, preserving their order
pub fn classify(destinations: Vec<String>) -> Vec<String> {
    destinations
        .into_iter()
        .filter(|destination| is_http_link(destination))
        .collect()
}
