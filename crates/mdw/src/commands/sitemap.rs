//! `mdw sitemap` command implementation.

use std::fs;
use std::path::PathBuf;

use clap::Args;
use mdw_site::sitemap;

use super::{SiteArgs, build_site};
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the sitemap command.
#[derive(Args)]
pub(crate) struct SitemapArgs {
    #[command(flatten)]
    site: SiteArgs,

    /// Site base URL (overrides config).
    #[arg(long, env = "MDW_BASE_URL")]
    base_url: Option<String>,

    /// Write the sitemap to this file instead of stdout.
    #[arg(short, long)]
    output: Option<PathBuf>,
}

impl SitemapArgs {
    pub(crate) fn execute(self, output: &Output) -> Result<(), CliError> {
        let config = self.site.load_config(self.base_url)?;
        let base_url = config.require_base_url()?;
        let snapshot = build_site(&config)?;

        let entries = sitemap::entries(snapshot.index(), base_url)?;
        let xml = sitemap::render_xml(&entries)?;

        match self.output {
            Some(path) => {
                fs::write(&path, xml)?;
                output.success(&format!(
                    "Wrote {} URLs to {}",
                    entries.len(),
                    path.display()
                ));
            }
            None => output.print(xml.trim_end()),
        }

        Ok(())
    }
}
