//! `mdw check` command implementation.

use clap::Args;

use super::{SiteArgs, build_site};
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the check command.
#[derive(Args)]
pub(crate) struct CheckArgs {
    #[command(flatten)]
    site: SiteArgs,
}

impl CheckArgs {
    pub(crate) fn execute(self, output: &Output) -> Result<(), CliError> {
        let config = self.site.load_config(None)?;
        output.info(&format!(
            "Source directory: {}",
            config.content.source_dir.display()
        ));

        let snapshot = build_site(&config)?;
        let root = snapshot.root();
        let levels = root.walk().count();
        let unpublished = snapshot
            .index()
            .pages()
            .iter()
            .filter(|page| !page.is_published())
            .count();

        output.success(&format!(
            "Content OK: {} pages in {levels} navigation levels",
            snapshot.index().len()
        ));
        if unpublished > 0 {
            output.warning(&format!("{unpublished} pages are unpublished"));
        }

        Ok(())
    }
}
