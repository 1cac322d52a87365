//! Navigation tree built from the content directory.
//!
//! Every directory under the content root is a navigation level. A level's
//! index file (`index.md`) is its own page; other content files are child
//! pages; subdirectories are child levels. Only the index file is allowed
//! at the top level.
//!
//! Entries are visited in file-name order and children are stable-sorted by
//! `order`, so equal orders keep file-name order and rebuilding the same
//! directory always yields the same tree.

use std::collections::HashSet;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use mdw_meta::ParsedMetaInf;
use sha2::{Digest, Sha256};

use crate::context::BuildContext;
use crate::error::BuildError;
use crate::page::Page;

/// One navigation level (a directory).
#[derive(Clone, Debug)]
pub struct NavigationNode {
    content_path: PathBuf,
    root_content_path: Arc<Path>,
    level: usize,
    name: Option<String>,
    slug: String,
    id: String,
    order: i64,
    meta_inf: Option<ParsedMetaInf>,
    page: Option<Arc<Page>>,
    child_pages: Vec<Arc<Page>>,
    child_navs: Vec<NavigationNode>,
    published: bool,
}

impl NavigationNode {
    /// Scan the content root and build the full tree.
    ///
    /// # Errors
    ///
    /// - [`BuildError::Content`] if the root is missing, unreadable or has no
    ///   index page, or any file cannot be read
    /// - [`BuildError::ContentStructure`] if the layout breaks a structural rule
    /// - [`BuildError::PageParse`] / [`BuildError::MetaInfField`] for invalid files
    pub fn build(ctx: &BuildContext) -> Result<Self, BuildError> {
        let start = Instant::now();
        let root_path = ctx.root().to_path_buf();

        if !root_path.is_dir() {
            return Err(BuildError::Content {
                path: root_path,
                message: "Content directory not found".to_owned(),
                source: None,
            });
        }

        let root = Self::scan(ctx, root_path, 0)?;
        if root.page.is_none() {
            return Err(BuildError::Content {
                path: root.content_path,
                message: "Content root has no index page".to_owned(),
                source: None,
            });
        }

        tracing::info!(
            root = %root.content_path.display(),
            pages = root.page_count(),
            levels = root.walk().count(),
            elapsed = ?start.elapsed(),
            "Built navigation tree"
        );

        Ok(root)
    }

    fn scan(ctx: &BuildContext, content_path: PathBuf, level: usize) -> Result<Self, BuildError> {
        let options = ctx.options();

        let mut entries = fs::read_dir(&content_path)
            .and_then(|dir| dir.collect::<Result<Vec<_>, _>>())
            .map_err(|e| BuildError::io(&content_path, "Failed to read content directory", e))?;
        entries.sort_by_key(fs::DirEntry::file_name);

        let nav_meta_path = content_path.join(&options.nav_metadata_file);
        let meta_inf = if nav_meta_path.is_file() {
            let raw = fs::read_to_string(&nav_meta_path).map_err(|e| {
                BuildError::io(&nav_meta_path, "Failed to read navigation metadata", e)
            })?;
            let parsed = mdw_meta::parse(&ctx.nav_schema(), &raw)
                .map_err(|e| BuildError::metainf(&nav_meta_path, e))?;
            Some(parsed)
        } else {
            None
        };

        let mut page: Option<Arc<Page>> = None;
        let mut child_pages = Vec::new();
        let mut child_navs = Vec::new();

        for entry in entries {
            let path = entry.path();
            let file_name = entry.file_name();
            let Some(file_name) = file_name.to_str() else {
                tracing::warn!(path = %path.display(), "Skipping entry with non UTF-8 name");
                continue;
            };
            if file_name.starts_with('.') || file_name == options.nav_metadata_file {
                continue;
            }

            let metadata = fs::metadata(&path)
                .map_err(|e| BuildError::io(&path, "Failed to read file metadata", e))?;
            if level == 0 && ctx.is_reserved_root_entry(file_name, metadata.is_dir()) {
                tracing::debug!(path = %path.display(), "Skipping reserved root entry");
                continue;
            }

            if metadata.is_dir() {
                child_navs.push(Self::scan(ctx, path, level + 1)?);
                continue;
            }
            if !metadata.is_file() {
                continue;
            }
            let Some(stem) = ctx.content_stem(file_name) else {
                continue;
            };

            if stem == options.index_name {
                if let Some(existing) = &page {
                    return Err(BuildError::structure(
                        &path,
                        format!(
                            "Navigation level already has index page {}",
                            existing.file_path().display()
                        ),
                    ));
                }
                page = Some(Arc::new(Page::load(ctx, &path)?));
            } else if level == 0 {
                return Err(BuildError::structure(
                    &path,
                    format!("Only index allowed in top level navigation, found {stem}"),
                ));
            } else {
                child_pages.push(Arc::new(Page::load(ctx, &path)?));
            }
        }

        // Levels without an index page add no URL of their own.
        let nav_urls: HashSet<String> = child_navs
            .iter()
            .filter(|nav| nav.has_page())
            .map(NavigationNode::url_path)
            .collect();
        if let Some(clash) = child_pages.iter().find(|p| nav_urls.contains(p.url_path())) {
            return Err(BuildError::structure(
                clash.file_path(),
                format!("Page and directory both resolve to URL '{}'", clash.url_path()),
            ));
        }

        child_navs.sort_by_key(|nav| nav.order);
        child_pages.sort_by_key(|p| p.order());

        let relative = relative_url(ctx.root(), &content_path);
        let slug = slugify(&relative);
        let id = node_id(&slug);

        let name = if level == 0 {
            None
        } else {
            meta_inf
                .as_ref()
                .and_then(|m| m.text("nav_name"))
                .map(str::to_owned)
                .or_else(|| {
                    content_path
                        .file_name()
                        .map(|n| n.to_string_lossy().into_owned())
                })
        };

        let order = match (&meta_inf, &page) {
            (Some(meta), _) => meta.order(),
            (None, Some(page)) => page.order(),
            (None, None) => 0,
        };
        let published = page.as_ref().is_none_or(|p| p.is_published());

        tracing::debug!(
            path = %content_path.display(),
            level,
            slug = %slug,
            has_page = page.is_some(),
            pages = child_pages.len(),
            levels = child_navs.len(),
            "Scanned navigation level"
        );

        Ok(Self {
            content_path,
            root_content_path: Arc::clone(ctx.root()),
            level,
            name,
            slug,
            id,
            order,
            meta_inf,
            page,
            child_pages,
            child_navs,
            published,
        })
    }

    /// Absolute directory path of this level.
    #[must_use]
    pub fn content_path(&self) -> &Path {
        &self.content_path
    }

    /// Absolute content root shared by the whole tree.
    #[must_use]
    pub fn root_content_path(&self) -> &Arc<Path> {
        &self.root_content_path
    }

    /// Depth below the root (root is `0`).
    #[must_use]
    pub fn level(&self) -> usize {
        self.level
    }

    /// Display name; `None` for the root.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    #[must_use]
    pub fn slug(&self) -> &str {
        &self.slug
    }

    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    #[must_use]
    pub fn order(&self) -> i64 {
        self.order
    }

    /// Parsed navigation metadata file, if the level has one.
    #[must_use]
    pub fn meta_inf(&self) -> Option<&ParsedMetaInf> {
        self.meta_inf.as_ref()
    }

    /// The level's own index page.
    #[must_use]
    pub fn page(&self) -> Option<&Arc<Page>> {
        self.page.as_ref()
    }

    #[must_use]
    pub fn child_pages(&self) -> &[Arc<Page>] {
        &self.child_pages
    }

    #[must_use]
    pub fn child_navs(&self) -> &[NavigationNode] {
        &self.child_navs
    }

    #[must_use]
    pub fn is_published(&self) -> bool {
        self.published
    }

    #[must_use]
    pub fn has_page(&self) -> bool {
        self.page.is_some()
    }

    #[must_use]
    pub fn has_children(&self) -> bool {
        !self.child_pages.is_empty() || !self.child_navs.is_empty()
    }

    /// URL path of this level, whether or not it has an index page.
    #[must_use]
    pub fn url_path(&self) -> String {
        relative_url(&self.root_content_path, &self.content_path)
    }

    /// Number of pages in this subtree.
    #[must_use]
    pub fn page_count(&self) -> usize {
        self.walk()
            .map(|nav| usize::from(nav.has_page()) + nav.child_pages.len())
            .sum()
    }

    /// Pre-order iterator over this node and all levels below it.
    pub fn walk(&self) -> Walk<'_> {
        Walk { stack: vec![self] }
    }

    /// Find the level whose URL path is `url` (slashes trimmed).
    #[must_use]
    pub fn find_nav(&self, url: &str) -> Option<&NavigationNode> {
        let url = url.trim_matches('/');
        self.walk().find(|nav| nav.url_path() == url)
    }

    /// Indented dump of the tree structure for debugging.
    #[must_use]
    pub fn debug_tree(&self) -> DebugTree<'_> {
        DebugTree { root: self }
    }
}

/// Pre-order iterator returned by [`NavigationNode::walk`].
pub struct Walk<'a> {
    stack: Vec<&'a NavigationNode>,
}

impl<'a> Iterator for Walk<'a> {
    type Item = &'a NavigationNode;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        self.stack.extend(node.child_navs.iter().rev());
        Some(node)
    }
}

/// Display adapter returned by [`NavigationNode::debug_tree`].
///
/// ```text
/// N[*:0] / (/srv/content)
///   N[-:1] docs (/srv/content/docs)
///     P install.md
/// ```
///
/// `*` marks levels with an index page, the number is the level.
pub struct DebugTree<'a> {
    root: &'a NavigationNode,
}

impl DebugTree<'_> {
    fn write_node(f: &mut fmt::Formatter<'_>, nav: &NavigationNode) -> fmt::Result {
        let indent = "  ".repeat(nav.level);
        writeln!(
            f,
            "{indent}N[{}:{}] {} ({})",
            if nav.has_page() { '*' } else { '-' },
            nav.level,
            nav.name().unwrap_or("/"),
            nav.content_path.display()
        )?;
        for page in &nav.child_pages {
            let file_name = page
                .file_path()
                .file_name()
                .map(|n| n.to_string_lossy())
                .unwrap_or_default();
            writeln!(f, "{indent}  P {file_name}")?;
        }
        for child in &nav.child_navs {
            Self::write_node(f, child)?;
        }
        Ok(())
    }
}

impl fmt::Display for DebugTree<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        Self::write_node(f, self.root)
    }
}

/// Relative path from `root` to `path`, `/`-joined.
fn relative_url(root: &Path, path: &Path) -> String {
    path.strip_prefix(root)
        .map(|relative| {
            relative
                .components()
                .map(|c| c.as_os_str().to_string_lossy())
                .collect::<Vec<_>>()
                .join("/")
        })
        .unwrap_or_default()
}

/// Slug for a level: relative path with `/` and `.` replaced by `_`.
fn slugify(relative: &str) -> String {
    if relative.is_empty() {
        return "_root_".to_owned();
    }
    relative.replace(['/', '.'], "_").to_lowercase()
}

/// Stable level id: first 16 hex characters of the SHA-256 of the slug.
fn node_id(slug: &str) -> String {
    let digest = Sha256::digest(slug.as_bytes());
    let mut id = hex::encode(digest);
    id.truncate(16);
    id
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::context::SiteOptions;

    fn create_test_dir() -> tempfile::TempDir {
        tempfile::tempdir().unwrap()
    }

    fn context(root: &Path) -> BuildContext {
        BuildContext::new(root, SiteOptions::default()).unwrap()
    }

    fn write(root: &Path, relative: &str, content: &str) {
        let path = root.join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, content).unwrap();
    }

    fn names(navs: &[NavigationNode]) -> Vec<&str> {
        navs.iter().filter_map(NavigationNode::name).collect()
    }

    fn urls(pages: &[Arc<Page>]) -> Vec<&str> {
        pages.iter().map(|p| p.url_path()).collect()
    }

    /// Site fixture with ordered sections and pages.
    fn create_ordered_site(root: &Path) {
        write(root, "index.md", "/*\nTitle: Home\n*/\nWelcome");
        write(root, "about/index.md", "/*\nTitle: About\nOrder: 4\n*/\nAbout");
        write(root, "about/team.md", "/*\nTitle: Team\nOrder: 2\n*/\nTeam");
        write(root, "about/history.md", "/*\nTitle: History\nOrder: 1\n*/\n");
        write(root, "contact/index.md", "/*\nTitle: Contact\nOrder: 1\n*/\n");
        write(root, "docs/_navlevel.txt", "Nav Name: Documentation\nOrder: 7\n");
        write(root, "docs/install.md", "/*\nTitle: Install\n*/\n");
    }

    // ========================================================================
    // Structure
    // ========================================================================

    #[test]
    fn test_build_ordered_site() {
        let temp_dir = create_test_dir();
        create_ordered_site(temp_dir.path());

        let root = NavigationNode::build(&context(temp_dir.path())).unwrap();

        assert_eq!(root.level(), 0);
        assert_eq!(root.name(), None);
        assert_eq!(root.page().unwrap().url_path(), "");
        assert!(root.child_pages().is_empty());
        assert_eq!(names(root.child_navs()), vec!["contact", "about", "Documentation"]);

        let orders: Vec<i64> = root.child_navs().iter().map(NavigationNode::order).collect();
        assert_eq!(orders, vec![1, 4, 7]);

        let about = &root.child_navs()[1];
        assert_eq!(urls(about.child_pages()), vec!["about/history", "about/team"]);
        assert_eq!(about.level(), 1);
        assert!(about.has_page());
        assert!(about.has_children());
    }

    #[test]
    fn test_section_without_index() {
        let temp_dir = create_test_dir();
        create_ordered_site(temp_dir.path());

        let root = NavigationNode::build(&context(temp_dir.path())).unwrap();
        let docs = root.find_nav("/docs/").unwrap();

        assert!(!docs.has_page());
        assert!(docs.has_children());
        assert!(docs.is_published());
        assert_eq!(docs.meta_inf().unwrap().text("nav_name"), Some("Documentation"));
    }

    #[test]
    fn test_root_with_only_index() {
        let temp_dir = create_test_dir();
        write(temp_dir.path(), "index.md", "Home");

        let root = NavigationNode::build(&context(temp_dir.path())).unwrap();

        assert!(root.has_page());
        assert!(!root.has_children());
        assert_eq!(root.page().unwrap().url_path(), "");
    }

    #[test]
    fn test_nested_level_with_only_index() {
        let temp_dir = create_test_dir();
        write(temp_dir.path(), "index.md", "Home");
        write(temp_dir.path(), "a/index.md", "Section A");

        let root = NavigationNode::build(&context(temp_dir.path())).unwrap();
        let a = &root.child_navs()[0];

        assert!(a.has_page());
        assert!(!a.has_children());
        assert_eq!(a.page().unwrap().url_path(), "a");
        assert_eq!(a.level(), 1);
    }

    #[test]
    fn test_empty_section_is_legal() {
        let temp_dir = create_test_dir();
        write(temp_dir.path(), "index.md", "Home");
        fs::create_dir(temp_dir.path().join("empty")).unwrap();

        let root = NavigationNode::build(&context(temp_dir.path())).unwrap();
        let empty = &root.child_navs()[0];

        assert_eq!(empty.name(), Some("empty"));
        assert!(!empty.has_page());
        assert!(!empty.has_children());
        assert_eq!(empty.order(), 0);
    }

    #[test]
    fn test_equal_orders_keep_file_name_order() {
        let temp_dir = create_test_dir();
        write(temp_dir.path(), "index.md", "Home");
        for name in ["delta", "alpha", "charlie", "bravo"] {
            write(temp_dir.path(), &format!("{name}/index.md"), name);
        }

        let root = NavigationNode::build(&context(temp_dir.path())).unwrap();

        assert_eq!(
            names(root.child_navs()),
            vec!["alpha", "bravo", "charlie", "delta"]
        );
    }

    #[test]
    fn test_navlevel_order_overrides_index_order() {
        let temp_dir = create_test_dir();
        write(temp_dir.path(), "index.md", "Home");
        write(temp_dir.path(), "a/index.md", "/* Order: 9 */");
        write(temp_dir.path(), "a/_navlevel.txt", "Order: 2");

        let root = NavigationNode::build(&context(temp_dir.path())).unwrap();

        assert_eq!(root.child_navs()[0].order(), 2);
    }

    #[test]
    fn test_unpublished_index_marks_node() {
        let temp_dir = create_test_dir();
        write(temp_dir.path(), "index.md", "Home");
        write(temp_dir.path(), "draft/index.md", "/* Published: false */");

        let root = NavigationNode::build(&context(temp_dir.path())).unwrap();

        assert!(!root.child_navs()[0].is_published());
        assert!(root.is_published());
    }

    // ========================================================================
    // Skipped entries
    // ========================================================================

    #[test]
    fn test_reserved_and_hidden_entries_are_skipped() {
        let temp_dir = create_test_dir();
        let root_path = temp_dir.path();
        write(root_path, "index.md", "Home");
        write(root_path, "404.md", "Not found");
        write(root_path, "500.md", "Server error");
        write(root_path, "favicon.ico", "");
        write(root_path, "robots.txt", "");
        write(root_path, "assets/style.md", "");
        write(root_path, ".git/index.md", "");
        write(root_path, "docs/.hidden.md", "");
        write(root_path, "docs/notes.txt", "");
        write(root_path, "docs/guide.md", "Guide");

        let root = NavigationNode::build(&context(root_path)).unwrap();

        assert_eq!(names(root.child_navs()), vec!["docs"]);
        assert_eq!(urls(root.child_navs()[0].child_pages()), vec!["docs/guide"]);
        assert_eq!(root.page_count(), 2);
    }

    #[test]
    fn test_error_pages_only_reserved_at_root() {
        let temp_dir = create_test_dir();
        write(temp_dir.path(), "index.md", "Home");
        write(temp_dir.path(), "errors/404.md", "Nested");

        let root = NavigationNode::build(&context(temp_dir.path())).unwrap();

        assert_eq!(urls(root.child_navs()[0].child_pages()), vec!["errors/404"]);
    }

    // ========================================================================
    // Structural errors
    // ========================================================================

    #[test]
    fn test_two_top_level_files() {
        let temp_dir = create_test_dir();
        write(temp_dir.path(), "index.md", "Home");
        write(temp_dir.path(), "about.md", "About");

        let err = NavigationNode::build(&context(temp_dir.path())).unwrap_err();

        assert!(matches!(err, BuildError::ContentStructure { .. }));
        assert!(err.to_string().contains("found about"));
    }

    #[test]
    fn test_empty_root() {
        let temp_dir = create_test_dir();

        let err = NavigationNode::build(&context(temp_dir.path())).unwrap_err();

        assert!(matches!(err, BuildError::Content { .. }));
    }

    #[test]
    fn test_missing_root() {
        let temp_dir = create_test_dir();

        let err = NavigationNode::build(&context(&temp_dir.path().join("nope"))).unwrap_err();

        assert!(matches!(err, BuildError::Content { .. }));
    }

    #[test]
    fn test_root_without_index_but_sections() {
        let temp_dir = create_test_dir();
        write(temp_dir.path(), "docs/index.md", "Docs");

        let err = NavigationNode::build(&context(temp_dir.path())).unwrap_err();

        assert!(matches!(err, BuildError::Content { .. }));
    }

    #[test]
    fn test_duplicate_index_files() {
        let temp_dir = create_test_dir();
        let options = SiteOptions {
            extensions: vec!["md".to_owned(), "markdown".to_owned()],
            ..SiteOptions::default()
        };
        write(temp_dir.path(), "index.md", "Home");
        write(temp_dir.path(), "docs/index.markdown", "One");
        write(temp_dir.path(), "docs/index.md", "Two");

        let ctx = BuildContext::new(temp_dir.path(), options).unwrap();
        let err = NavigationNode::build(&ctx).unwrap_err();

        assert!(matches!(err, BuildError::ContentStructure { .. }));
    }

    #[test]
    fn test_page_and_directory_url_collision() {
        let temp_dir = create_test_dir();
        write(temp_dir.path(), "index.md", "Home");
        write(temp_dir.path(), "docs/setup.md", "Setup page");
        write(temp_dir.path(), "docs/setup/index.md", "Setup section");

        let err = NavigationNode::build(&context(temp_dir.path())).unwrap_err();

        assert!(matches!(err, BuildError::ContentStructure { .. }));
        assert!(err.path().ends_with("docs/setup.md"));
    }

    #[test]
    fn test_page_beside_section_without_index() {
        let temp_dir = create_test_dir();
        write(temp_dir.path(), "index.md", "Home");
        write(temp_dir.path(), "docs/setup.md", "Setup page");
        write(temp_dir.path(), "docs/setup/linux.md", "Linux");

        let root = NavigationNode::build(&context(temp_dir.path())).unwrap();
        let docs = root.find_nav("docs").unwrap();

        assert_eq!(urls(docs.child_pages()), vec!["docs/setup"]);
        let setup = &docs.child_navs()[0];
        assert!(!setup.has_page());
        assert_eq!(urls(setup.child_pages()), vec!["docs/setup/linux"]);
    }

    #[test]
    fn test_invalid_navlevel_metadata() {
        let temp_dir = create_test_dir();
        write(temp_dir.path(), "index.md", "Home");
        write(temp_dir.path(), "docs/_navlevel.txt", "Title: Not allowed here");

        let err = NavigationNode::build(&context(temp_dir.path())).unwrap_err();

        assert!(matches!(err, BuildError::MetaInfField { .. }));
        assert!(err.path().ends_with("_navlevel.txt"));
    }

    // ========================================================================
    // Identity
    // ========================================================================

    #[test]
    fn test_slug_and_id() {
        assert_eq!(slugify(""), "_root_");
        assert_eq!(slugify("About/Team.v2"), "about_team_v2");

        let id = node_id("_root_");
        assert_eq!(id.len(), 16);
        assert!(id.chars().all(|c| c.is_ascii_hexdigit()));
        assert_eq!(id, node_id("_root_"));
        assert_ne!(id, node_id("about"));
    }

    #[test]
    fn test_node_slugs_from_tree() {
        let temp_dir = create_test_dir();
        create_ordered_site(temp_dir.path());

        let root = NavigationNode::build(&context(temp_dir.path())).unwrap();

        assert_eq!(root.slug(), "_root_");
        assert_eq!(root.id(), node_id("_root_"));
        assert_eq!(root.find_nav("about").unwrap().slug(), "about");
        assert_eq!(root.url_path(), "");
    }

    #[test]
    fn test_root_path_shared_by_all_nodes() {
        let temp_dir = create_test_dir();
        create_ordered_site(temp_dir.path());

        let root = NavigationNode::build(&context(temp_dir.path())).unwrap();

        for nav in root.walk() {
            assert!(Arc::ptr_eq(nav.root_content_path(), root.root_content_path()));
        }
    }

    // ========================================================================
    // Traversal and debug output
    // ========================================================================

    #[test]
    fn test_walk_is_pre_order() {
        let temp_dir = create_test_dir();
        write(temp_dir.path(), "index.md", "Home");
        write(temp_dir.path(), "a/index.md", "A");
        write(temp_dir.path(), "a/b/index.md", "B");
        write(temp_dir.path(), "c/index.md", "C");

        let root = NavigationNode::build(&context(temp_dir.path())).unwrap();
        let visited: Vec<String> = root.walk().map(NavigationNode::url_path).collect();

        assert_eq!(visited, vec!["", "a", "a/b", "c"]);
    }

    #[test]
    fn test_debug_tree() {
        let temp_dir = create_test_dir();
        create_ordered_site(temp_dir.path());

        let root = NavigationNode::build(&context(temp_dir.path())).unwrap();
        let dump = root.debug_tree().to_string();
        let lines: Vec<&str> = dump.lines().collect();

        assert!(lines[0].starts_with("N[*:0] / ("));
        assert!(lines[1].starts_with("  N[*:1] contact ("));
        assert!(lines[2].starts_with("  N[*:1] about ("));
        assert_eq!(lines[3], "    P history.md");
        assert_eq!(lines[4], "    P team.md");
        assert!(lines[5].starts_with("  N[-:1] Documentation ("));
        assert_eq!(lines[6], "    P install.md");
    }
}
