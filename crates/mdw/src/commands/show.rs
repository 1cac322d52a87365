//! `mdw show` command implementation.

use clap::Args;

use super::{SiteArgs, build_site};
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the show command.
#[derive(Args)]
pub(crate) struct ShowArgs {
    #[command(flatten)]
    site: SiteArgs,

    /// URL path of the page (e.g. `/about/team`, `/` for the root page).
    url: String,

    /// Print the page as JSON.
    #[arg(long)]
    json: bool,
}

impl ShowArgs {
    pub(crate) fn execute(self, output: &Output) -> Result<(), CliError> {
        let config = self.site.load_config(None)?;
        let snapshot = build_site(&config)?;

        let page = snapshot
            .index()
            .lookup(&self.url)
            .ok_or_else(|| CliError::PageNotFound(self.url.trim_matches('/').to_owned()))?;

        if self.json {
            output.print(&serde_json::to_string_pretty(&**page)?);
            return Ok(());
        }

        output.highlight(&format!("/{}", page.url_path()));
        output.print(&format!("file: {}", page.file_path().display()));
        for (name, value) in page.meta_inf().iter() {
            if !value.is_null() {
                output.print(&format!("{name}: {value}"));
            }
        }
        for (name, value) in page.meta_inf().custom_fields() {
            output.print(&format!("{name}: {value}"));
        }
        output.separator();
        output.print(page.html().trim_end());

        Ok(())
    }
}
