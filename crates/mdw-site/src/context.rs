//! Build options and the shared build context.

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use mdw_meta::MetaInfSchema;
use mdw_renderer::{CmarkRenderer, MarkdownRender};

use crate::error::BuildError;

/// Delimiters around the metainf block at the top of a content file.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum MetaInfDelimiter {
    /// `/*` ... `*/`
    #[default]
    Comment,
    /// ```` ```metainf ```` ... ```` ``` ````
    Fenced,
}

impl MetaInfDelimiter {
    /// Opening delimiter.
    #[must_use]
    pub fn open(self) -> &'static str {
        match self {
            Self::Comment => "/*",
            Self::Fenced => "```metainf",
        }
    }

    /// Closing delimiter.
    #[must_use]
    pub fn close(self) -> &'static str {
        match self {
            Self::Comment => "*/",
            Self::Fenced => "```",
        }
    }
}

/// Layout conventions for a content directory.
#[derive(Clone, Debug)]
pub struct SiteOptions {
    /// File extensions (without dot) treated as content.
    pub extensions: Vec<String>,
    /// File stem of a navigation level's own page.
    pub index_name: String,
    /// Per-directory navigation metadata file.
    pub nav_metadata_file: String,
    /// Metainf block delimiter style.
    pub delimiter: MetaInfDelimiter,
    /// Keep unknown metainf fields instead of failing.
    pub allow_custom_fields: bool,
    /// Number of HTML characters kept as the page abstract.
    pub abstract_length: usize,
    /// Root-level directory holding static assets.
    pub assets_dir: String,
    /// Root-level files served as-is.
    pub root_assets: Vec<String>,
}

impl Default for SiteOptions {
    fn default() -> Self {
        Self {
            extensions: vec!["md".to_owned()],
            index_name: "index".to_owned(),
            nav_metadata_file: "_navlevel.txt".to_owned(),
            delimiter: MetaInfDelimiter::Comment,
            allow_custom_fields: false,
            abstract_length: 100,
            assets_dir: "assets".to_owned(),
            root_assets: ["crossdomain.xml", "favicon.ico", "humans.txt", "robots.txt"]
                .into_iter()
                .map(str::to_owned)
                .collect(),
        }
    }
}

/// Everything a build needs: the content root, the options and the renderer.
///
/// Cheap to clone. Shared by every node of a tree built from it.
#[derive(Clone)]
pub struct BuildContext {
    root: Arc<Path>,
    options: Arc<SiteOptions>,
    renderer: Arc<dyn MarkdownRender>,
}

impl fmt::Debug for BuildContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BuildContext")
            .field("root", &self.root)
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

impl BuildContext {
    /// Create a context rendering markdown with [`CmarkRenderer`].
    ///
    /// # Errors
    ///
    /// Returns [`BuildError::Content`] if the root cannot be made absolute.
    pub fn new(root: impl Into<PathBuf>, options: SiteOptions) -> Result<Self, BuildError> {
        Self::with_renderer(root, options, Arc::new(CmarkRenderer::new()))
    }

    /// Create a context with a custom markdown renderer.
    ///
    /// # Errors
    ///
    /// Returns [`BuildError::Content`] if the root cannot be made absolute.
    pub fn with_renderer(
        root: impl Into<PathBuf>,
        options: SiteOptions,
        renderer: Arc<dyn MarkdownRender>,
    ) -> Result<Self, BuildError> {
        let root = root.into();
        let root = std::path::absolute(&root)
            .map_err(|e| BuildError::io(&root, "Cannot resolve content root", e))?;
        Ok(Self {
            root: Arc::from(root),
            options: Arc::new(options),
            renderer,
        })
    }

    /// Absolute content root.
    #[must_use]
    pub fn root(&self) -> &Arc<Path> {
        &self.root
    }

    /// Layout options.
    #[must_use]
    pub fn options(&self) -> &SiteOptions {
        &self.options
    }

    /// Markdown renderer.
    #[must_use]
    pub fn renderer(&self) -> &dyn MarkdownRender {
        self.renderer.as_ref()
    }

    /// Schema for page metainf blocks.
    #[must_use]
    pub fn page_schema(&self) -> MetaInfSchema {
        MetaInfSchema::page().with_custom_fields(self.options.allow_custom_fields)
    }

    /// Schema for navigation metadata files.
    #[must_use]
    pub fn nav_schema(&self) -> MetaInfSchema {
        MetaInfSchema::navigation().with_custom_fields(self.options.allow_custom_fields)
    }

    /// Stem of `file_name` if it has an allowed content extension.
    pub(crate) fn content_stem<'a>(&self, file_name: &'a str) -> Option<&'a str> {
        let (stem, ext) = file_name.rsplit_once('.')?;
        let allowed = self.options.extensions.iter().any(|e| e == ext);
        (allowed && !stem.is_empty()).then_some(stem)
    }

    /// Whether a root-level entry is reserved and never becomes content.
    pub(crate) fn is_reserved_root_entry(&self, file_name: &str, is_dir: bool) -> bool {
        if is_dir {
            return file_name == self.options.assets_dir;
        }
        if self.options.root_assets.iter().any(|a| a == file_name) {
            return true;
        }
        let stem = file_name.split_once('.').map_or(file_name, |(stem, _)| stem);
        is_error_page_stem(stem)
    }
}

/// A three-digit HTTP client or server error status (400-599).
fn is_error_page_stem(stem: &str) -> bool {
    stem.len() == 3
        && stem.bytes().all(|b| b.is_ascii_digit())
        && stem.parse::<u16>().is_ok_and(|code| (400..600).contains(&code))
}
