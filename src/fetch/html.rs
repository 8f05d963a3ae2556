// src/fetch/html.rs
// =============================================================================
// This module turns a downloaded HTML document into a PageSnapshot.
//
// We use the `scraper` crate which:
// - Parses HTML into a DOM (Document Object Model)
// - Supports CSS selectors for finding elements
// - Is built on html5ever (Mozilla's HTML parser)
//
// What we pull out of a page:
// - title: text of the <title> element
// - body text: the visible text under <body> (no scripts or styles)
// - links: every <a href> that is ALREADY an absolute http(s) URL
//
// Relative links are dropped rather than resolved, same as fragment-only,
// mailto:, tel: and javascript: links.
// =============================================================================

use scraper::{Html, Selector};
use url::Url;

use super::PageSnapshot;

// Elements whose text never shows up on screen
const HIDDEN_ELEMENTS: &[&str] = &["script", "style", "noscript", "template"];

// Builds a snapshot from raw HTML
//
// Parameters:
//   html: the HTML content to parse
//   ready_selector: CSS selector that must match for the page to count as loaded
//
// Returns: Ok(snapshot), or Err(reason) when the selector is invalid or
//          the page never rendered the element we wait for
pub fn extract_snapshot(html: &str, ready_selector: &str) -> Result<PageSnapshot, String> {
    let document = Html::parse_document(html);

    let ready = Selector::parse(ready_selector)
        .map_err(|e| format!("invalid ready selector '{}': {:?}", ready_selector, e))?;
    if document.select(&ready).next().is_none() {
        return Err(format!(
            "document never became ready ('{}' not found)",
            ready_selector
        ));
    }

    Ok(PageSnapshot {
        title: extract_title(&document),
        body_text: extract_body_text(&document),
        links: extract_absolute_links(&document),
    })
}

fn extract_title(document: &Html) -> String {
    let selector = Selector::parse("title").expect("static selector");
    document
        .select(&selector)
        .next()
        .map(|title| collapse_whitespace(&title.text().collect::<String>()))
        .unwrap_or_default()
}

// Collects visible text under <body>, one text run per line
fn extract_body_text(document: &Html) -> String {
    let selector = Selector::parse("body").expect("static selector");
    let body = match document.select(&selector).next() {
        Some(body) => body,
        None => return String::new(),
    };

    let mut lines = Vec::new();
    for node in body.descendants() {
        let text = match node.value().as_text() {
            Some(text) => text,
            None => continue,
        };

        let hidden = node.ancestors().any(|ancestor| {
            ancestor
                .value()
                .as_element()
                .map_or(false, |el| HIDDEN_ELEMENTS.contains(&el.name()))
        });
        if hidden {
            continue;
        }

        let line = collapse_whitespace(text);
        if !line.is_empty() {
            lines.push(line);
        }
    }

    lines.join("\n")
}

// Extracts all absolute http(s) links, in document order
fn extract_absolute_links(document: &Html) -> Vec<String> {
    let selector = Selector::parse("a[href]").expect("static selector");

    document
        .select(&selector)
        .filter_map(|element| element.value().attr("href"))
        .filter_map(canonical_url)
        .collect()
}

/// Accepts a URL only if it is already a complete http:// or https:// URL,
/// and returns it in the one spelling the visited set uses.
///
/// Extracted links and the crawl root both go through here, so
/// "https://example.com" and "https://example.com/" are the same page.
//
// Examples:
//   "https://other.com"   -> Some("https://other.com/")
//   "/docs"               -> None (relative)
//   "#top"                -> None (fragment only)
//   "mailto:a@b.com"      -> None (not fetchable)
pub fn canonical_url(raw: &str) -> Option<String> {
    let url = Url::parse(raw.trim()).ok()?;
    match url.scheme() {
        "http" | "https" => Some(url.to_string()),
        _ => None,
    }
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. Why not resolve relative links like a browser would?
//    - We only want links that can be fetched exactly as written
//    - Url::parse() fails on "/docs", which is how we detect relative links
//
// 2. What is filter_map?
//    - Runs a closure that returns Option, keeps only the Some values
//    - It's map + filter in one step
//
// 3. Why .expect() on the selectors here?
//    - "title", "body" and "a[href]" are constants known to be valid
//    - The ready selector comes from configuration, so that one returns an error
// -----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extracts_title_and_text() {
        let html = r#"
            <html><head><title>  Hello   World </title></head>
            <body><h1>Heading</h1><p>Some   text here.</p></body></html>
        "#;
        let snapshot = extract_snapshot(html, "body").unwrap();
        assert_eq!(snapshot.title, "Hello World");
        assert_eq!(snapshot.body_text, "Heading\nSome text here.");
    }

    #[test]
    fn test_skips_script_and_style_text() {
        let html = r#"
            <html><body>
              <p>Visible</p>
              <script>var hidden = 1;</script>
              <style>p { color: red; }</style>
            </body></html>
        "#;
        let snapshot = extract_snapshot(html, "body").unwrap();
        assert_eq!(snapshot.body_text, "Visible");
    }

    #[test]
    fn test_keeps_only_absolute_links() {
        let html = r##"
            <html><body>
              <a href="https://www.rust-lang.org">Rust</a>
              <a href="http://example.com/page">Page</a>
              <a href="/docs">Docs</a>
              <a href="../about">About</a>
              <a href="#section">Anchor</a>
              <a href="mailto:test@example.com">Email</a>
              <a href="javascript:void(0)">JS</a>
            </body></html>
        "##;
        let snapshot = extract_snapshot(html, "body").unwrap();
        assert_eq!(
            snapshot.links,
            vec!["https://www.rust-lang.org/", "http://example.com/page"]
        );
    }

    #[test]
    fn test_missing_ready_element_is_an_error() {
        let html = "<html><body><p>No main here</p></body></html>";
        let err = extract_snapshot(html, "main").unwrap_err();
        assert!(err.contains("never became ready"));
    }

    #[test]
    fn test_missing_title_is_empty() {
        let snapshot = extract_snapshot("<p>hi</p>", "body").unwrap();
        assert_eq!(snapshot.title, "");
        assert_eq!(snapshot.body_text, "hi");
    }

    #[test]
    fn test_canonical_url_adds_root_slash() {
        assert_eq!(
            canonical_url("https://example.com").as_deref(),
            Some("https://example.com/")
        );
        assert_eq!(
            canonical_url(" https://example.com/en-us ").as_deref(),
            Some("https://example.com/en-us")
        );
        assert_eq!(canonical_url("ftp://example.com"), None);
        assert_eq!(canonical_url("example.com"), None);
    }
}
