//! Integration tests for reading item lists from files.

use std::fs;

use tempfile::tempdir;
use urlrecon::extract::{extract_with_mode, read_items, ExtractError, ExtractionMode};
use urlrecon::recon::{reconcile, ComparisonProfile};

const SITEMAP: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">
  <url>
    <loc>https://ex.com/</loc>
    <changefreq>daily</changefreq>
  </url>
  <url>
    <loc>https://ex.com/about</loc>
  </url>
  <url>
    <loc>https://ex.com/blog?page=2&amp;sort=new</loc>
  </url>
</urlset>
"#;

#[test]
fn test_sitemap_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("sitemap.xml");
    fs::write(&path, SITEMAP).unwrap();

    let items = read_items(&path).unwrap();
    assert_eq!(
        items,
        vec![
            "https://ex.com/",
            "https://ex.com/about",
            "https://ex.com/blog?page=2&sort=new",
        ]
    );
}

#[test]
fn test_sitemap_against_plain_list() {
    let dir = tempdir().unwrap();
    let sitemap = dir.path().join("sitemap.xml");
    let list = dir.path().join("crawl.txt");
    fs::write(&sitemap, SITEMAP).unwrap();
    fs::write(
        &list,
        "Crawled:\nhttps://ex.com/ (200)\nhttps://ex.com/about/ (301)\nhttps://ex.com/contact (200)\n",
    )
    .unwrap();

    let first = read_items(&sitemap).unwrap();
    let second = read_items(&list).unwrap();
    assert_eq!(
        second,
        vec![
            "https://ex.com/",
            "https://ex.com/about/",
            "https://ex.com/contact",
        ]
    );

    let result = reconcile(&first, &second, &ComparisonProfile::new(90.0, 100.0).unwrap());
    assert_eq!(result.matching, vec!["https://ex.com/"]);
    assert_eq!(result.unique_to_second, vec!["https://ex.com/about/", "https://ex.com/contact"]);
    assert!(result
        .partial_matches
        .iter()
        .any(|pm| pm.first == "https://ex.com/about" && pm.second == "https://ex.com/about/"));
}

#[test]
fn test_plain_lines_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("skus.txt");
    fs::write(&path, "SKU-1\r\n\r\n  SKU-2  \nSKU-1\n").unwrap();

    assert_eq!(read_items(&path).unwrap(), vec!["SKU-1", "SKU-2"]);
}

#[test]
fn test_empty_file_yields_no_items() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("empty.txt");
    fs::write(&path, "\n  \n").unwrap();

    assert!(read_items(&path).unwrap().is_empty());
}

#[test]
fn test_missing_file_error() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("missing.txt");

    let err = read_items(&path).unwrap_err();
    let ExtractError::Io { path: failed, .. } = &err;
    assert_eq!(failed, &path);
    assert!(err.to_string().starts_with("Cannot read"));
}

#[test]
fn test_extraction_modes() {
    assert_eq!(extract_with_mode(SITEMAP).1, ExtractionMode::Markup);
    assert_eq!(
        extract_with_mode("go to http://ex.com").1,
        ExtractionMode::UrlPattern
    );
    assert_eq!(extract_with_mode("a\nb").1, ExtractionMode::Lines);
}
