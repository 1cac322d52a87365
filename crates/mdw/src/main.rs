//! mdw CLI - markdown content tree compiler.
//!
//! Provides commands for:
//! - `check`: Build the content tree and report errors
//! - `tree`: Print the navigation structure
//! - `pages`: List pages, sorted and filtered
//! - `show`: Print one page's metadata and HTML
//! - `sitemap`: Generate sitemap XML

mod commands;
mod error;
mod output;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use commands::{CheckArgs, PagesArgs, ShowArgs, SitemapArgs, TreeArgs};
use output::Output;

/// mdw - Markdown content tree compiler.
#[derive(Parser)]
#[command(name = "mdw", version, about)]
struct Cli {
    /// Enable verbose output (build summary and timing logs).
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the content tree and report the first error.
    Check(CheckArgs),
    /// Print the navigation structure.
    Tree(TreeArgs),
    /// List pages.
    Pages(PagesArgs),
    /// Show a single page.
    Show(ShowArgs),
    /// Generate sitemap XML.
    Sitemap(SitemapArgs),
}

fn main() {
    let cli = Cli::parse();
    let output = Output::new();

    // --verbose enables INFO level, otherwise use RUST_LOG or default to WARN
    let filter = if cli.verbose {
        EnvFilter::new("info")
    } else {
        EnvFilter::from_default_env()
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let result = match cli.command {
        Commands::Check(args) => args.execute(&output),
        Commands::Tree(args) => args.execute(&output),
        Commands::Pages(args) => args.execute(&output),
        Commands::Show(args) => args.execute(&output),
        Commands::Sitemap(args) => args.execute(&output),
    };

    if let Err(err) = result {
        output.error(&format!("Error: {err}"));
        std::process::exit(1);
    }
}
