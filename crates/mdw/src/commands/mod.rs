//! CLI command implementations.

pub(crate) mod check;
pub(crate) mod pages;
pub(crate) mod show;
pub(crate) mod sitemap;
pub(crate) mod tree;

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Args, ValueEnum};
use mdw_config::{CliSettings, Config, MetaInfDelimiter as ConfigDelimiter};
use mdw_site::{BuildContext, HookEvent, MetaInfDelimiter, Site, SiteOptions, SiteSnapshot};

use crate::error::CliError;

pub(crate) use check::CheckArgs;
pub(crate) use pages::PagesArgs;
pub(crate) use show::ShowArgs;
pub(crate) use sitemap::SitemapArgs;
pub(crate) use tree::TreeArgs;

/// Metainf delimiter style accepted on the command line.
#[derive(Clone, Copy, ValueEnum)]
pub(crate) enum DelimiterArg {
    /// `/*` ... `*/`
    Comment,
    /// ```` ```metainf ```` ... ```` ``` ````
    Fenced,
}

impl From<DelimiterArg> for ConfigDelimiter {
    fn from(arg: DelimiterArg) -> Self {
        match arg {
            DelimiterArg::Comment => Self::Comment,
            DelimiterArg::Fenced => Self::Fenced,
        }
    }
}

/// Options shared by every command that builds the site.
#[derive(Args)]
pub(crate) struct SiteArgs {
    /// Path to configuration file (default: auto-discover mdw.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Content source directory (overrides config).
    #[arg(short, long)]
    source_dir: Option<PathBuf>,

    /// Accept unknown metainf fields as custom fields.
    #[arg(long)]
    allow_custom_fields: bool,

    /// Metainf delimiter style (overrides config).
    #[arg(long, value_enum)]
    delimiter: Option<DelimiterArg>,
}

impl SiteArgs {
    /// Load configuration with this command's overrides.
    pub(crate) fn load_config(&self, base_url: Option<String>) -> Result<Config, CliError> {
        let cli_settings = CliSettings {
            source_dir: self.source_dir.clone(),
            allow_custom_fields: self.allow_custom_fields.then_some(true),
            metainf_delimiter: self.delimiter.map(Into::into),
            base_url,
        };
        Ok(Config::load(self.config.as_deref(), Some(&cli_settings))?)
    }
}

/// Build site options from loaded configuration.
pub(crate) fn site_options_from_config(config: &Config) -> SiteOptions {
    let content = &config.content;
    SiteOptions {
        extensions: content.extensions.clone(),
        index_name: content.index_name.clone(),
        nav_metadata_file: content.nav_metadata_file.clone(),
        delimiter: match content.metainf_delimiter {
            ConfigDelimiter::Comment => MetaInfDelimiter::Comment,
            ConfigDelimiter::Fenced => MetaInfDelimiter::Fenced,
        },
        allow_custom_fields: content.allow_custom_fields,
        abstract_length: content.abstract_length,
        assets_dir: content.assets_dir.clone(),
        ..SiteOptions::default()
    }
}

/// Build the site described by `config` once.
pub(crate) fn build_site(config: &Config) -> Result<Arc<SiteSnapshot>, CliError> {
    let ctx = BuildContext::new(&config.content.source_dir, site_options_from_config(config))?;
    let site = Site::new(ctx).with_hook(|event| match event {
        HookEvent::PreScan { content_dir } => {
            tracing::info!(dir = %content_dir.display(), "Scanning content");
        }
        HookEvent::PostScan { root } => {
            tracing::debug!(levels = root.walk().count(), "Scan complete");
        }
        HookEvent::Swapped { .. } | HookEvent::Failed { .. } => {}
    });
    Ok(site.reload_if_needed()?)
}
