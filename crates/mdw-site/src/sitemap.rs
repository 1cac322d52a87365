//! Sitemap generation.
//!
//! Produces a [sitemaps.org](https://www.sitemaps.org/protocol.html)
//! `urlset` document listing every indexed page. `lastmod` comes from the
//! source file's modification time; `changefreq` and `priority` come from
//! the page's `sitemap_changefreq` and `sitemap_priority` fields.

use std::fs;
use std::io;

use chrono::{DateTime, Utc};
use quick_xml::Writer;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use serde::Serialize;

use crate::error::BuildError;
use crate::site_index::SiteIndex;

const SITEMAP_NS: &str = "http://www.sitemaps.org/schemas/sitemap/0.9";
const XSI_NS: &str = "http://www.w3.org/2001/XMLSchema-instance";
const SCHEMA_LOCATION: &str = "http://www.sitemaps.org/schemas/sitemap/0.9 \
                               http://www.sitemaps.org/schemas/sitemap/0.9/sitemap.xsd";

/// One `<url>` element.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SitemapEntry {
    /// Absolute page URL.
    pub loc: String,
    /// Last modification time, `%Y-%m-%dT%H:%M:%S%z` in UTC.
    pub lastmod: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub changefreq: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<String>,
}

/// Collect sitemap entries for every page of `index`, in pre-order.
///
/// `base_url` is joined with each page's URL path; a trailing slash is
/// added when missing.
///
/// # Errors
///
/// Returns [`BuildError::Content`] if a source file's modification time
/// cannot be read.
pub fn entries(index: &SiteIndex, base_url: &str) -> Result<Vec<SitemapEntry>, BuildError> {
    let base = base_url.trim_end_matches('/');

    index
        .pages()
        .iter()
        .map(|page| {
            let path = page.file_path();
            let modified = fs::metadata(path)
                .and_then(|m| m.modified())
                .map_err(|e| BuildError::io(path, "Failed to read modification time", e))?;
            let lastmod = DateTime::<Utc>::from(modified)
                .format("%Y-%m-%dT%H:%M:%S%z")
                .to_string();
            let meta = page.meta_inf();

            Ok(SitemapEntry {
                loc: format!("{base}/{}", page.url_path()),
                lastmod,
                changefreq: meta.text("sitemap_changefreq").map(str::to_owned),
                priority: meta.text("sitemap_priority").map(str::to_owned),
            })
        })
        .collect()
}

/// Render entries as a sitemap XML document.
///
/// # Errors
///
/// Returns an I/O error if the XML writer fails.
pub fn render_xml(entries: &[SitemapEntry]) -> io::Result<String> {
    let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);

    emit(
        &mut writer,
        Event::Decl(BytesDecl::new("1.0", Some("utf-8"), None)),
    )?;
    emit(
        &mut writer,
        Event::Start(BytesStart::new("urlset").with_attributes([
            ("xmlns", SITEMAP_NS),
            ("xmlns:xsi", XSI_NS),
            ("xsi:schemaLocation", SCHEMA_LOCATION),
        ])),
    )?;

    for entry in entries {
        emit(&mut writer, Event::Start(BytesStart::new("url")))?;
        text_element(&mut writer, "loc", &entry.loc)?;
        text_element(&mut writer, "lastmod", &entry.lastmod)?;
        if let Some(changefreq) = &entry.changefreq {
            text_element(&mut writer, "changefreq", changefreq)?;
        }
        if let Some(priority) = &entry.priority {
            text_element(&mut writer, "priority", priority)?;
        }
        emit(&mut writer, Event::End(BytesEnd::new("url")))?;
    }

    emit(&mut writer, Event::End(BytesEnd::new("urlset")))?;

    String::from_utf8(writer.into_inner()).map_err(io::Error::other)
}

fn text_element(writer: &mut Writer<Vec<u8>>, name: &str, text: &str) -> io::Result<()> {
    emit(writer, Event::Start(BytesStart::new(name)))?;
    emit(writer, Event::Text(BytesText::new(text)))?;
    emit(writer, Event::End(BytesEnd::new(name)))
}

fn emit(writer: &mut Writer<Vec<u8>>, event: Event<'_>) -> io::Result<()> {
    writer.write_event(event).map_err(io::Error::other)
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use pretty_assertions::assert_eq;

    use super::*;
    use crate::context::{BuildContext, SiteOptions};
    use crate::navigation::NavigationNode;

    fn create_test_dir() -> tempfile::TempDir {
        tempfile::tempdir().unwrap()
    }

    fn build_index(root: &Path) -> SiteIndex {
        let ctx = BuildContext::new(root, SiteOptions::default()).unwrap();
        SiteIndex::flatten(&NavigationNode::build(&ctx).unwrap())
    }

    #[test]
    fn test_entries_for_every_page() {
        let temp_dir = create_test_dir();
        let root = temp_dir.path();
        fs::write(root.join("index.md"), "Home").unwrap();
        fs::create_dir(root.join("blog")).unwrap();
        fs::write(
            root.join("blog/post.md"),
            "/*\nSitemap Priority: 0.8\nSitemap Changefreq: weekly\n*/\nPost",
        )
        .unwrap();

        let entries = entries(&build_index(root), "https://example.com/").unwrap();

        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].loc, "https://example.com/");
        assert_eq!(entries[0].changefreq, None);
        assert_eq!(entries[1].loc, "https://example.com/blog/post");
        assert_eq!(entries[1].changefreq.as_deref(), Some("weekly"));
        assert_eq!(entries[1].priority.as_deref(), Some("0.8"));
        assert!(entries[1].lastmod.ends_with("+0000"));
        assert_eq!(entries[1].lastmod.len(), "2016-02-01T10:00:00+0000".len());
    }

    #[test]
    fn test_base_url_without_trailing_slash() {
        let temp_dir = create_test_dir();
        fs::write(temp_dir.path().join("index.md"), "Home").unwrap();

        let entries = entries(&build_index(temp_dir.path()), "https://example.com").unwrap();

        assert_eq!(entries[0].loc, "https://example.com/");
    }

    #[test]
    fn test_render_xml() {
        let entries = vec![
            SitemapEntry {
                loc: "https://example.com/".to_owned(),
                lastmod: "2016-02-01T10:00:00+0000".to_owned(),
                changefreq: None,
                priority: None,
            },
            SitemapEntry {
                loc: "https://example.com/a?b&c".to_owned(),
                lastmod: "2016-02-02T10:00:00+0000".to_owned(),
                changefreq: Some("daily".to_owned()),
                priority: Some("0.5".to_owned()),
            },
        ];

        let xml = render_xml(&entries).unwrap();

        assert!(xml.starts_with("<?xml version=\"1.0\" encoding=\"utf-8\"?>"));
        assert!(xml.contains(&format!("<urlset xmlns=\"{SITEMAP_NS}\"")));
        assert!(xml.contains("<loc>https://example.com/</loc>"));
        assert!(xml.contains("<loc>https://example.com/a?b&amp;c</loc>"));
        assert!(xml.contains("<changefreq>daily</changefreq>"));
        assert!(xml.contains("<priority>0.5</priority>"));
        assert_eq!(xml.matches("<url>").count(), 2);
        assert_eq!(xml.matches("<changefreq>").count(), 1);
        assert!(xml.trim_end().ends_with("</urlset>"));
    }

    #[test]
    fn test_render_empty() {
        let xml = render_xml(&[]).unwrap();
        assert!(xml.contains("<urlset"));
        assert!(xml.contains("</urlset>"));
    }
}
