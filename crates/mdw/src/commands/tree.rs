//! `mdw tree` command implementation.

use clap::Args;

use super::{SiteArgs, build_site};
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the tree command.
#[derive(Args)]
pub(crate) struct TreeArgs {
    #[command(flatten)]
    site: SiteArgs,
}

impl TreeArgs {
    pub(crate) fn execute(self, output: &Output) -> Result<(), CliError> {
        let config = self.site.load_config(None)?;
        let snapshot = build_site(&config)?;

        output.highlight("Navigation structure");
        output.print("  N[*:L] = level L with index page, N[-:L] without");
        output.print("  P      = page");
        output.separator();
        output.print(snapshot.root().debug_tree().to_string().trim_end());

        Ok(())
    }
}
