use std::path::PathBuf;

use clap::Parser;
use linkedin_scraping::pipeline;

/// Extracts the post links from a saved analytics page.
#[derive(Parser)]
struct Opts {
    #[arg(default_value = "posts.html")]
    input: PathBuf,
    #[arg(long, default_value = "post-links.json")]
    output: PathBuf,
}

fn main() -> anyhow::Result<()> {
    pretty_env_logger::init();

    let opts = Opts::parse();
    let links = pipeline::read_links_from_html(&opts.input)?;
    for link in &links {
        println!("{link}");
    }
    pipeline::write_link_list(&opts.output, &links)?;
    println!("\nExtracted {} unique post links", links.len());
    Ok(())
}
