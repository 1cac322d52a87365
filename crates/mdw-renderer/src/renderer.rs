//! Markdown renderer trait and the pulldown-cmark backend.

use pulldown_cmark::{Options, Parser, html};

/// Converts markdown text to HTML.
///
/// Implementations must be total and free of side effects visible to the
/// caller; the site builder calls them once per page during a rebuild.
pub trait MarkdownRender: Send + Sync {
    /// Render `markdown` to an HTML fragment.
    fn render(&self, markdown: &str) -> String;
}

impl<F> MarkdownRender for F
where
    F: Fn(&str) -> String + Send + Sync,
{
    fn render(&self, markdown: &str) -> String {
        self(markdown)
    }
}

/// HTML renderer backed by `pulldown-cmark`.
///
/// GitHub Flavored Markdown extensions are enabled by default.
#[derive(Clone, Debug)]
pub struct CmarkRenderer {
    gfm: bool,
}

impl Default for CmarkRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl CmarkRenderer {
    /// Create a renderer with GFM enabled.
    #[must_use]
    pub fn new() -> Self {
        Self { gfm: true }
    }

    /// Enable or disable GitHub Flavored Markdown features.
    ///
    /// When enabled, the parser supports:
    /// - Tables
    /// - Strikethrough (`~~text~~`)
    /// - Task lists (`- [ ] item`)
    #[must_use]
    pub fn with_gfm(mut self, enabled: bool) -> Self {
        self.gfm = enabled;
        self
    }

    /// Parser options for the current configuration.
    #[must_use]
    pub fn parser_options(&self) -> Options {
        if self.gfm {
            Options::ENABLE_TABLES
                | Options::ENABLE_STRIKETHROUGH
                | Options::ENABLE_TASKLISTS
                | Options::ENABLE_GFM
        } else {
            Options::empty()
        }
    }
}

impl MarkdownRender for CmarkRenderer {
    fn render(&self, markdown: &str) -> String {
        let parser = Parser::new_ext(markdown, self.parser_options());
        let mut output = String::with_capacity(markdown.len() * 3 / 2);
        html::push_html(&mut output, parser);
        output
    }
}
