//! Content tree compiler for mdw.
//!
//! Scans a directory of markdown files into a navigation tree and a flat
//! URL index:
//!
//! - [`Page`]: one content file with its parsed metainf block and HTML
//! - [`NavigationNode`]: one directory level, built recursively
//! - [`SiteIndex`]: URL path to page map, plus [`sort_pages`] and [`published`]
//! - [`sitemap`]: sitemap entries and XML
//! - [`Site`]: the current snapshot with serialized rebuilds and atomic swaps
//!
//! # Content layout
//!
//! ```text
//! content/
//! ├── index.md            # site root page (the only file allowed here)
//! ├── 404.md              # error pages and root assets are skipped
//! ├── about/
//! │   ├── index.md        # /about
//! │   └── team.md         # /about/team
//! └── docs/
//!     ├── _navlevel.txt   # Nav Name / Order for this level
//!     └── install.md      # /docs/install
//! ```

mod context;
mod error;
mod navigation;
mod page;
mod site;
mod site_index;
pub mod sitemap;

pub use context::{BuildContext, MetaInfDelimiter, SiteOptions};
pub use error::BuildError;
pub use navigation::{DebugTree, NavigationNode, Walk};
pub use page::{Page, url_path_for, url_to_source};
pub use site::{Hook, HookEvent, Site, SiteSnapshot};
pub use site_index::{SiteIndex, published, sort_pages};
