use std::path::PathBuf;

use clap::Parser;
use linkedin_scraping::{
    config::Config,
    pipeline::{self, Stage},
    summary::Summary,
};
use log::info;

/// Downloads the analytics page if needed, then scrapes every post listed on it.
#[derive(Parser)]
struct Opts {
    /// TOML file overriding the default settings
    #[arg(long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    pretty_env_logger::init();

    let opts = Opts::parse();
    let config = Config::load(opts.config.as_deref())?;
    println!("\nLinkedIn Post Scraper");

    if config.html_path().exists() {
        println!("{:?} already exists, skipping download", config.html_path());
    } else {
        Stage::DownloadHtml.announce();
        println!("This will open a browser window for you to log in...");
        pipeline::download_html(&config).await?;
    }

    Stage::ExtractLinks.announce();
    let links = pipeline::read_links_from_html(config.html_path())?;
    for link in &links {
        info!("{link}");
    }
    println!("Found {} unique post links", links.len());

    Stage::ScrapePosts.announce();
    println!("This will take a few minutes.  Scraping one post at a time...");
    let records = pipeline::scrape_posts(&config, &links).await?;

    Stage::Done.announce();
    println!("Successfully scraped {} posts!", records.len());
    println!("Results saved to: {:?}\n", config.data_path());
    println!("{}\n", Summary::new(&records));
    print_analysis_hint(&config);
    Ok(())
}

fn print_analysis_hint(config: &Config) {
    let rule = "=".repeat(60);
    println!("{rule}\nGET AI-POWERED INSIGHTS\n{rule}\n");
    println!("1. Open your LLM of choice");
    println!("2. Attach {:?}", config.data_path());
    println!("3. Ask it to analyse engagement patterns across your posts");
    println!("   (text length, posting time, images, likes, comments, reposts, impressions)");
    println!("4. Ask for recommendations tailored to your best performing posts\n");
}
