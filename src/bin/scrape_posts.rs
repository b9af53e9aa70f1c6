use std::path::PathBuf;

use clap::Parser;
use linkedin_scraping::{config::Config, pipeline};

/// Scrapes every post linked from the analytics page into a JSON file.
#[derive(Parser)]
struct Opts {
    /// Saved analytics page (default: posts.html)
    input: Option<PathBuf>,
    /// Output JSON (default: posts-data.json)
    output: Option<PathBuf>,
    /// Read links from a list written by `get_links` instead of the HTML
    #[arg(long)]
    links: Option<PathBuf>,
    #[arg(long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    pretty_env_logger::init();

    let opts = Opts::parse();
    let mut config = Config::load(opts.config.as_deref())?;
    if let Some(input) = opts.input {
        config.set_html_path(input);
    }
    if let Some(output) = opts.output {
        config.set_data_path(output);
    }
    let links = match opts.links {
        Some(path) => {
            config.set_links_path(path);
            pipeline::read_link_list(config.links_path())?
        }
        None => pipeline::read_links_from_html(config.html_path())?,
    };
    pipeline::scrape_posts(&config, &links).await?;
    Ok(())
}
