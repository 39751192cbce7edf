//! Item extraction from raw text.
//!
//! Turns pasted or file text into the flat, deduplicated item list the
//! reconciliation engine consumes:
//!
//! 1. **Sitemap markup**: if the text contains `<loc>` or `<url>` tags, it is
//!    parsed as XML and the text of `<loc>` elements and of leaf `<url>`
//!    elements is used. CDATA sections and entity references are decoded.
//! 2. **URL pattern**: otherwise every `http(s)://` URL in the text.
//! 3. **Lines**: if no URL is found, every trimmed non-empty line.
//!
//! Markup that does not parse, or yields nothing, falls back to the URL
//! pattern. Items are
//! trimmed, never empty, and keep first-seen order.
//!
//! # Example
//!
//! ```
//! use urlrecon::extract::extract_items;
//!
//! let xml = "<urlset><url><loc>https://ex.com/a</loc></url></urlset>";
//! assert_eq!(extract_items(xml), vec!["https://ex.com/a"]);
//!
//! let text = "see https://ex.com/a and https://ex.com/b";
//! assert_eq!(extract_items(text), vec!["https://ex.com/a", "https://ex.com/b"]);
//!
//! assert_eq!(extract_items(" alpha \n\nbeta\r\nalpha"), vec!["alpha", "beta"]);
//! ```

use std::borrow::Cow;
use std::collections::HashSet;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use quick_xml::escape::unescape;
use quick_xml::events::Event;
use quick_xml::Reader;
use regex::Regex;
use thiserror::Error;

/// Errors that can occur while reading item lists.
#[derive(Debug, Error)]
pub enum ExtractError {
    /// The input file could not be read.
    #[error("Cannot read {path}: {source}")]
    Io {
        /// Path that failed (`-` for stdin)
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: std::io::Error,
    },
}

/// How items were found in the text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtractionMode {
    /// `<loc>`/`<url>` element text
    Markup,
    /// `http(s)://` URL pattern
    UrlPattern,
    /// Trimmed non-empty lines
    Lines,
}

fn url_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r#"https?://[^\s<>"']+"#).expect("valid URL pattern"))
}

/// Extract items from text, reporting which strategy produced them.
#[must_use]
pub fn extract_with_mode(text: &str) -> (Vec<String>, ExtractionMode) {
    if text.contains("<url>") || text.contains("<loc>") {
        match extract_markup(text) {
            Ok(items) if !items.is_empty() => return (items, ExtractionMode::Markup),
            Ok(_) => log::warn!(
                "Sitemap markup contained no <loc>/<url> values, falling back to URL pattern"
            ),
            Err(e) => log::warn!(
                "Sitemap markup could not be parsed ({}), falling back to URL pattern",
                e
            ),
        }
        return (extract_urls(text), ExtractionMode::UrlPattern);
    }

    let urls = extract_urls(text);
    if !urls.is_empty() {
        return (urls, ExtractionMode::UrlPattern);
    }

    (extract_lines(text), ExtractionMode::Lines)
}

/// Extract items from text.
#[must_use]
pub fn extract_items(text: &str) -> Vec<String> {
    extract_with_mode(text).0
}

/// An open element while walking the markup.
struct Element {
    item: bool,
    has_child: bool,
    text: String,
}

fn extract_markup(text: &str) -> Result<Vec<String>, quick_xml::Error> {
    let mut reader = Reader::from_str(text);
    let mut open: Vec<Element> = Vec::new();
    let mut values = Vec::new();

    loop {
        match reader.read_event()? {
            Event::Start(e) => {
                if let Some(parent) = open.last_mut() {
                    parent.has_child = true;
                }
                open.push(Element {
                    item: matches!(e.local_name().as_ref(), b"loc" | b"url"),
                    has_child: false,
                    text: String::new(),
                });
            }
            Event::Empty(_) => {
                if let Some(parent) = open.last_mut() {
                    parent.has_child = true;
                }
            }
            // A <url> wrapping a <loc> is not a leaf, so only the <loc> text is kept
            Event::End(_) => {
                if let Some(element) = open.pop() {
                    if element.item && !element.has_child {
                        values.push(element.text.trim().to_string());
                    }
                }
            }
            Event::Text(e) => push_text(&mut open, &String::from_utf8_lossy(&e)),
            Event::CData(e) => push_text(&mut open, &String::from_utf8_lossy(&e)),
            Event::GeneralRef(e) => {
                let entity = format!("&{};", String::from_utf8_lossy(&e));
                let resolved = unescape(&entity)
                    .map(Cow::into_owned)
                    .unwrap_or_else(|_| entity.clone());
                push_text(&mut open, &resolved);
            }
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(dedup(values.into_iter()))
}

fn push_text(open: &mut [Element], text: &str) {
    if let Some(element) = open.last_mut().filter(|element| element.item) {
        element.text.push_str(text);
    }
}

fn extract_urls(text: &str) -> Vec<String> {
    dedup(url_pattern().find_iter(text).map(|m| m.as_str().to_string()))
}

fn extract_lines(text: &str) -> Vec<String> {
    dedup(text.lines().map(|line| line.trim().to_string()))
}

fn dedup(items: impl Iterator<Item = String>) -> Vec<String> {
    let mut seen = HashSet::new();
    items
        .filter(|item| !item.is_empty())
        .filter(|item| seen.insert(item.clone()))
        .collect()
}

/// Read a file (or stdin when `path` is `-`) and extract its items.
///
/// # Errors
///
/// Returns `ExtractError::Io` if the input cannot be read as UTF-8 text.
pub fn read_items(path: &Path) -> Result<Vec<String>, ExtractError> {
    let io_err = |source| ExtractError::Io {
        path: path.to_path_buf(),
        source,
    };

    let text = if path == Path::new("-") {
        let mut buf = String::new();
        std::io::stdin().read_to_string(&mut buf).map_err(io_err)?;
        buf
    } else {
        std::fs::read_to_string(path).map_err(io_err)?
    };

    let (items, mode) = extract_with_mode(&text);
    log::debug!(
        "Extracted {} items from {} ({:?})",
        items.len(),
        path.display(),
        mode
    );
    Ok(items)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sitemap_loc() {
        let xml = r#"<?xml version="1.0" encoding="UTF-8"?>
<urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">
  <url>
    <loc> https://ex.com/a </loc>
    <lastmod>2024-01-01</lastmod>
  </url>
  <url><loc>https://ex.com/b?x=1&amp;y=2</loc></url>
</urlset>"#;
        let (items, mode) = extract_with_mode(xml);
        assert_eq!(mode, ExtractionMode::Markup);
        assert_eq!(items, vec!["https://ex.com/a", "https://ex.com/b?x=1&y=2"]);
    }

    #[test]
    fn test_leaf_url_elements() {
        let xml = "<list><url>https://ex.com/1</url><url>https://ex.com/2</url></list>";
        assert_eq!(
            extract_items(xml),
            vec!["https://ex.com/1", "https://ex.com/2"]
        );
    }

    #[test]
    fn test_markup_without_values_falls_back() {
        let text = "<url></url> https://ex.com/fallback";
        let (items, mode) = extract_with_mode(text);
        assert_eq!(mode, ExtractionMode::UrlPattern);
        assert_eq!(items, vec!["https://ex.com/fallback"]);
    }

    #[test]
    fn test_url_pattern_stops_at_delimiters() {
        let text = r#"<a href="https://ex.com/x">link</a> 'http://ex.com/y' https://ex.com/z"#;
        assert_eq!(
            extract_items(text),
            vec!["https://ex.com/x", "http://ex.com/y", "https://ex.com/z"]
        );
    }

    #[test]
    fn test_lines_fallback() {
        let (items, mode) = extract_with_mode("  one \r\n\n two\nthree  \n");
        assert_eq!(mode, ExtractionMode::Lines);
        assert_eq!(items, vec!["one", "two", "three"]);
    }

    #[test]
    fn test_dedup_keeps_first_seen_order() {
        let text = "https://b.com https://a.com https://b.com";
        assert_eq!(extract_items(text), vec!["https://b.com", "https://a.com"]);
    }

    #[test]
    fn test_empty_text() {
        assert!(extract_items("").is_empty());
        assert!(extract_items("   \n \n").is_empty());
    }

    #[test]
    fn test_cdata_values() {
        let xml = "<urlset><url><loc><![CDATA[https://ex.com/a?x=1&y=2]]></loc></url></urlset>";
        let (items, mode) = extract_with_mode(xml);
        assert_eq!(mode, ExtractionMode::Markup);
        assert_eq!(items, vec!["https://ex.com/a?x=1&y=2"]);
    }

    #[test]
    fn test_character_references() {
        let xml = "<urlset><url><loc>https://ex.com/a?x=1&#38;y=2&#x26;z=3</loc></url></urlset>";
        assert_eq!(extract_items(xml), vec!["https://ex.com/a?x=1&y=2&z=3"]);
    }

    #[test]
    fn test_entities_are_decoded_once() {
        let xml = "<list><url>https://ex.com/?q=a&amp;lt;b&quot;</url></list>";
        assert_eq!(extract_items(xml), vec!["https://ex.com/?q=a&lt;b\""]);
    }

    #[test]
    fn test_values_are_trimmed_not_split() {
        let xml = "<urlset>\n  <url><loc>\n    https://ex.com/a b\n  </loc></url>\n</urlset>";
        assert_eq!(extract_items(xml), vec!["https://ex.com/a b"]);
    }

    #[test]
    fn test_malformed_markup_falls_back() {
        let text = "<url><loc>https://ex.com/a</url></loc> https://ex.com/b";
        let (items, mode) = extract_with_mode(text);
        assert_eq!(mode, ExtractionMode::UrlPattern);
        assert_eq!(items, vec!["https://ex.com/a", "https://ex.com/b"]);
    }

    #[test]
    fn test_read_items_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("list.txt");
        std::fs::write(&path, "https://ex.com/1\nhttps://ex.com/2\n").unwrap();
        assert_eq!(
            read_items(&path).unwrap(),
            vec!["https://ex.com/1", "https://ex.com/2"]
        );
    }

    #[test]
    fn test_read_items_missing_file() {
        let err = read_items(Path::new("/definitely/not/here.txt")).unwrap_err();
        assert!(err.to_string().contains("/definitely/not/here.txt"));
    }
}
