//! Pluggable markdown renderer for mdw.
//!
//! The site builder only needs a function from markdown text to HTML. This
//! crate defines that seam as the [`MarkdownRender`] trait and ships
//! [`CmarkRenderer`], an implementation on top of `pulldown-cmark`.
//!
//! Any `Fn(&str) -> String + Send + Sync` closure is also a renderer, which
//! keeps tests free of markdown details.
//!
//! # Example
//!
//! ```
//! use mdw_renderer::{CmarkRenderer, MarkdownRender};
//!
//! let html = CmarkRenderer::new().render("**Bold** text");
//! assert_eq!(html, "<p><strong>Bold</strong> text</p>\n");
//! ```

mod renderer;

pub use renderer::{CmarkRenderer, MarkdownRender};
