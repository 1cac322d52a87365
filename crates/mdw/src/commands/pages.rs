//! `mdw pages` command implementation.

use std::sync::Arc;

use clap::Args;
use mdw_site::{Page, published, sort_pages};

use super::{SiteArgs, build_site};
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the pages command.
#[derive(Args)]
pub(crate) struct PagesArgs {
    #[command(flatten)]
    site: SiteArgs,

    /// Metainf field to sort by (falls back to `order`).
    #[arg(long, default_value = "order")]
    sort_by: String,

    /// Maximum number of pages to list.
    #[arg(short = 'n', long)]
    limit: Option<usize>,

    /// Sort in descending order.
    #[arg(short, long)]
    reverse: bool,

    /// Only list published pages.
    #[arg(long)]
    published: bool,

    /// Only list pages under this URL prefix.
    #[arg(long)]
    under: Option<String>,

    /// Print pages as JSON.
    #[arg(long)]
    json: bool,
}

impl PagesArgs {
    pub(crate) fn execute(self, output: &Output) -> Result<(), CliError> {
        let config = self.site.load_config(None)?;
        let snapshot = build_site(&config)?;

        let mut pages: Vec<Arc<Page>> = snapshot.index().pages().to_vec();
        if let Some(prefix) = self.under.as_deref() {
            pages.retain(|page| is_under(page.url_path(), prefix));
        }
        if self.published {
            pages = published(&pages);
        }
        let pages = sort_pages(&pages, &self.sort_by, self.limit, self.reverse);

        if self.json {
            let list: Vec<&Page> = pages.iter().map(AsRef::as_ref).collect();
            output.print(&serde_json::to_string_pretty(&list)?);
            return Ok(());
        }

        if pages.is_empty() {
            output.warning("No pages found");
            return Ok(());
        }
        for page in &pages {
            output.print(&format!(
                "/{}\t{}",
                page.url_path(),
                page.title().unwrap_or("")
            ));
        }

        Ok(())
    }
}

/// Whether `url` equals `prefix` or lies below it.
fn is_under(url: &str, prefix: &str) -> bool {
    let prefix = prefix.trim_matches('/');
    prefix.is_empty()
        || url == prefix
        || url
            .strip_prefix(prefix)
            .is_some_and(|rest| rest.starts_with('/'))
}
