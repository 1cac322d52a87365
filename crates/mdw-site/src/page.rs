//! Content pages.
//!
//! A page is one content file: its metainf block, its markdown body and the
//! rendered HTML. Pages are immutable once loaded and shared by `Arc`
//! between the navigation tree and the site index.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use mdw_meta::ParsedMetaInf;
use serde::Serialize;

use crate::context::{BuildContext, MetaInfDelimiter};
use crate::error::BuildError;

/// One content file.
#[derive(Clone, Debug, Serialize)]
pub struct Page {
    file_path: PathBuf,
    url_path: String,
    meta_inf: ParsedMetaInf,
    #[serde(skip)]
    raw_markdown: String,
    html: String,
    #[serde(rename = "abstract")]
    abstract_html: String,
}

impl Page {
    /// Load and parse the content file at `file_path`.
    ///
    /// # Errors
    ///
    /// - [`BuildError::PageParse`] if the file is outside the content root,
    ///   has no allowed extension, or has an unclosed metainf block
    /// - [`BuildError::Content`] if the file does not exist or cannot be read
    /// - [`BuildError::MetaInfField`] if the metainf block is invalid
    pub fn load(ctx: &BuildContext, file_path: &Path) -> Result<Self, BuildError> {
        let url_path = url_path_for(ctx, file_path)?;

        let text = fs::read_to_string(file_path).map_err(|e| {
            let message = if e.kind() == io::ErrorKind::NotFound {
                "Could not find file for content page"
            } else {
                "Failed to read content page"
            };
            BuildError::io(file_path, message, e)
        })?;

        Self::from_source(ctx, file_path.to_path_buf(), url_path, &text)
    }

    /// Build a page from already-read file contents.
    ///
    /// # Errors
    ///
    /// - [`BuildError::PageParse`] if the metainf block is not closed
    /// - [`BuildError::MetaInfField`] if the metainf block is invalid
    pub fn from_source(
        ctx: &BuildContext,
        file_path: PathBuf,
        url_path: String,
        text: &str,
    ) -> Result<Self, BuildError> {
        let Some((raw_meta, body)) = split_metainf(text, ctx.options().delimiter) else {
            return Err(BuildError::page_parse(&file_path, "Unclosed metainf block"));
        };

        let mut meta_inf = mdw_meta::parse(&ctx.page_schema(), raw_meta)
            .map_err(|e| BuildError::metainf(&file_path, e))?;
        meta_inf.fill_null_from("nav_name", "title");

        let html = ctx.renderer().render(body);
        let abstract_html = html.chars().take(ctx.options().abstract_length).collect();

        Ok(Self {
            file_path,
            url_path,
            meta_inf,
            raw_markdown: body.to_owned(),
            html,
            abstract_html,
        })
    }

    /// Absolute path of the source file.
    #[must_use]
    pub fn file_path(&self) -> &Path {
        &self.file_path
    }

    /// URL path without leading or trailing slash; `""` for the root page.
    #[must_use]
    pub fn url_path(&self) -> &str {
        &self.url_path
    }

    /// Parsed metainf block.
    #[must_use]
    pub fn meta_inf(&self) -> &ParsedMetaInf {
        &self.meta_inf
    }

    /// Markdown body with the metainf block removed.
    #[must_use]
    pub fn raw_markdown(&self) -> &str {
        &self.raw_markdown
    }

    /// Rendered HTML body.
    #[must_use]
    pub fn html(&self) -> &str {
        &self.html
    }

    /// Leading characters of the rendered HTML.
    #[must_use]
    pub fn abstract_html(&self) -> &str {
        &self.abstract_html
    }

    #[must_use]
    pub fn title(&self) -> Option<&str> {
        self.meta_inf.text("title")
    }

    /// Navigation label, falling back to the title.
    #[must_use]
    pub fn nav_name(&self) -> Option<&str> {
        self.meta_inf.text("nav_name")
    }

    #[must_use]
    pub fn order(&self) -> i64 {
        self.meta_inf.order()
    }

    #[must_use]
    pub fn is_published(&self) -> bool {
        self.meta_inf.bool("published").unwrap_or(true)
    }
}

/// Split `text` into the raw metainf block and the body.
///
/// Returns `None` when an opening delimiter has no closing one.
fn split_metainf(text: &str, delimiter: MetaInfDelimiter) -> Option<(&str, &str)> {
    let Some(rest) = text.trim_start().strip_prefix(delimiter.open()) else {
        return Some(("", text));
    };
    let end = rest.find(delimiter.close())?;
    Some((&rest[..end], &rest[end + delimiter.close().len()..]))
}

/// Derive the URL path of a content file.
///
/// The root prefix and the extension are stripped and a trailing index
/// component is dropped, so `<root>/about/index.md` maps to `about`.
///
/// # Errors
///
/// Returns [`BuildError::PageParse`] if the path is not under the content
/// root or does not carry an allowed content extension.
pub fn url_path_for(ctx: &BuildContext, file_path: &Path) -> Result<String, BuildError> {
    let relative = file_path
        .strip_prefix(ctx.root())
        .map_err(|_| BuildError::page_parse(file_path, "Unable to parse page path"))?;

    let has_content_ext = relative
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ctx.options().extensions.iter().any(|e| e == ext));
    if !has_content_ext {
        return Err(BuildError::page_parse(
            file_path,
            "Page path has no content extension",
        ));
    }

    let mut parts: Vec<String> = relative
        .with_extension("")
        .components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect();
    if parts.last().is_some_and(|last| *last == ctx.options().index_name) {
        parts.pop();
    }

    Ok(parts.join("/"))
}

/// Resolve a URL path back to its source file.
///
/// Prefers `<url>.<extension>` when such a file exists, otherwise
/// `<url>/<index_name>.<extension>`.
#[must_use]
pub fn url_to_source(root: &Path, url_path: &str, extension: &str, index_name: &str) -> PathBuf {
    let url = url_path.trim_matches('/');
    let index_file = format!("{index_name}.{extension}");
    if url.is_empty() {
        return root.join(index_file);
    }

    let direct = root.join(format!("{url}.{extension}"));
    if direct.is_file() {
        direct
    } else {
        root.join(url).join(index_file)
    }
}
