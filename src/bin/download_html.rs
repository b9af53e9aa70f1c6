use std::path::PathBuf;

use clap::Parser;
use linkedin_scraping::{config::Config, pipeline};

/// Logs in if needed and saves the creator analytics page.
#[derive(Parser)]
struct Opts {
    /// Where to save the page (default: posts.html)
    output: Option<PathBuf>,
    #[arg(long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    pretty_env_logger::init();

    let opts = Opts::parse();
    let mut config = Config::load(opts.config.as_deref())?;
    if let Some(output) = opts.output {
        config.set_html_path(output);
    }
    pipeline::download_html(&config).await
}
