//! Directory listing module
//!
//! Collects the entries of a directory and renders them as HTML or JSON.

use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};
use serde::Serialize;
use std::fmt::Write as _;
use std::io;
use std::path::Path;
use tokio::fs;

/// Bytes escaped in a URL path (RFC 3986 path segment plus `%`)
const PATH_ESCAPE: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}');

/// One row of a listing
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ListingEntry {
    pub name: String,
    pub url: String,
}

/// Structured listing handed to the renderers
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DirectoryListing {
    pub title: String,
    pub files: Vec<ListingEntry>,
}

impl DirectoryListing {
    /// Build a listing from entry names, in the order given
    ///
    /// `request_path` is the decoded URL path of the directory; child URLs are
    /// that path joined with each name.
    pub fn new(request_path: &str, names: Vec<String>) -> Self {
        let base = request_path.trim_end_matches('/');
        let files = names
            .into_iter()
            .map(|name| {
                let url = utf8_percent_encode(&format!("{base}/{name}"), PATH_ESCAPE).to_string();
                ListingEntry { name, url }
            })
            .collect();

        Self {
            title: request_path.to_string(),
            files,
        }
    }
}

/// Read entry names in the order the filesystem reports them
pub async fn read_entries(dir: &Path) -> io::Result<Vec<String>> {
    let mut entries = fs::read_dir(dir).await?;
    let mut names = Vec::new();
    while let Some(entry) = entries.next_entry().await? {
        names.push(entry.file_name().to_string_lossy().into_owned());
    }
    Ok(names)
}

/// Render a listing as a standalone HTML page
pub fn render_html(listing: &DirectoryListing) -> String {
    let title = escape_html(&listing.title);
    let mut html = String::with_capacity(256 + listing.files.len() * 64);

    html.push_str("<!DOCTYPE html>\n<html>\n<head>\n");
    html.push_str("    <meta charset=\"utf-8\">\n");
    let _ = writeln!(html, "    <title>{title}</title>");
    html.push_str("</head>\n<body>\n");
    let _ = writeln!(html, "    <h1>{title}</h1>");
    html.push_str("    <ul>\n");
    for file in &listing.files {
        let _ = writeln!(
            html,
            "        <li><a href=\"{}\">{}</a></li>",
            escape_html(&file.url),
            escape_html(&file.name)
        );
    }
    html.push_str("    </ul>\n</body>\n</html>\n");
    html
}

/// Render a listing as JSON
pub fn render_json(listing: &DirectoryListing) -> serde_json::Result<Vec<u8>> {
    serde_json::to_vec(listing)
}

fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            c => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_child_urls() {
        let listing = DirectoryListing::new("/d", vec!["a.txt".to_string(), "b.txt".to_string()]);
        assert_eq!(listing.title, "/d");
        assert_eq!(listing.files[0].url, "/d/a.txt");
        assert_eq!(listing.files[1].url, "/d/b.txt");

        let root = DirectoryListing::new("/", vec!["index.html".to_string()]);
        assert_eq!(root.files[0].url, "/index.html");

        let trailing = DirectoryListing::new("/d/", vec!["a.txt".to_string()]);
        assert_eq!(trailing.files[0].url, "/d/a.txt");
    }

    #[test]
    fn test_child_urls_are_percent_encoded() {
        let listing = DirectoryListing::new("/docs", vec!["my notes#1.txt".to_string()]);
        assert_eq!(listing.files[0].name, "my notes#1.txt");
        assert_eq!(listing.files[0].url, "/docs/my%20notes%231.txt");
    }

    #[test]
    fn test_entry_order_is_preserved() {
        let names = vec!["z".to_string(), "a".to_string(), "m".to_string()];
        let listing = DirectoryListing::new("/", names);
        let order: Vec<_> = listing.files.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(order, ["z", "a", "m"]);
    }

    #[test]
    fn test_render_html_escapes_names() {
        let listing = DirectoryListing::new("/", vec!["<script>.txt".to_string()]);
        let html = render_html(&listing);
        assert!(html.contains("&lt;script&gt;.txt"));
        assert!(!html.contains("<script>"));
        assert!(html.contains("<title>/</title>"));
    }

    #[test]
    fn test_render_json_shape() {
        let listing = DirectoryListing::new("/d", vec!["a.txt".to_string()]);
        let value: serde_json::Value = serde_json::from_slice(&render_json(&listing).unwrap()).unwrap();
        assert_eq!(value["title"], "/d");
        assert_eq!(value["files"][0]["name"], "a.txt");
        assert_eq!(value["files"][0]["url"], "/d/a.txt");
    }

    #[tokio::test]
    async fn test_read_entries() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("a.txt"), b"a").unwrap();
        std::fs::create_dir(dir.path().join("sub")).unwrap();

        let mut names = read_entries(dir.path()).await.unwrap();
        names.sort();
        assert_eq!(names, ["a.txt", "sub"]);
    }
}
