//! The stages of a run and the artifacts passed between them.

use std::path::{Path, PathBuf};

use anyhow::Context;
use chrono::Local;
use linkedin_scraping_utils::fs_json_util::{read_json, write_json_pretty};
use log::info;
use strum::Display;

use crate::{
    api::LinkedInClient,
    config::Config,
    data_collector::collect_posts_and_close,
    links::extract_links,
    schema::{PostLink, PostRecord},
};

#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("{what} not found at {path:?}.  {hint}")]
    MissingInput {
        what: &'static str,
        path: PathBuf,
        hint: &'static str,
    },
    #[error("No post links found in {0:?}.  Make sure it contains your analytics page.")]
    NoLinks(PathBuf),
}

#[derive(Clone, Copy, PartialEq, Eq, Debug, Display)]
pub enum Stage {
    #[strum(to_string = "Downloading your posts analytics page")]
    DownloadHtml,
    #[strum(to_string = "Extracting post links")]
    ExtractLinks,
    #[strum(to_string = "Scraping posts")]
    ScrapePosts,
    #[strum(to_string = "Done!")]
    Done,
}

impl Stage {
    pub fn announce(self) {
        let rule = "=".repeat(60);
        println!("\n{rule}\nStep {}: {self}\n{rule}\n", self as usize + 1);
    }
}

fn ensure_exists(what: &'static str, path: &Path, hint: &'static str) -> Result<(), PipelineError> {
    if path.exists() {
        Ok(())
    } else {
        Err(PipelineError::MissingInput {
            what,
            path: path.to_owned(),
            hint,
        })
    }
}

/// Logs in if needed and saves the analytics page to `config.html_path()`.
pub async fn download_html(config: &Config) -> anyhow::Result<()> {
    let client = LinkedInClient::new(config).await?;
    let html = client
        .download_analytics_html(Local::now().date_naive())
        .await;
    let closed = client.close().await;
    let html = html?;
    closed?;
    fs_err::write(config.html_path(), html)?;
    println!("Downloaded posts HTML to {:?}", config.html_path());
    Ok(())
}

/// Reads the analytics snapshot at `path` and extracts the post links from it.
pub fn read_links_from_html(path: &Path) -> anyhow::Result<Vec<PostLink>> {
    ensure_exists(
        "Analytics HTML",
        path,
        "Run `download_html` first, or save the page manually.",
    )?;
    let html = fs_err::read_to_string(path)?;
    let links = extract_links(&html);
    if links.is_empty() {
        return Err(PipelineError::NoLinks(path.to_owned()).into());
    }
    info!("Extracted {} unique post links from {path:?}", links.len());
    Ok(links)
}

/// Reads a link list written by `get_links`.
pub fn read_link_list(path: &Path) -> anyhow::Result<Vec<PostLink>> {
    ensure_exists("Link list", path, "Run `get_links` first.")?;
    let links: Vec<PostLink> = read_json(path)?;
    if links.is_empty() {
        return Err(PipelineError::NoLinks(path.to_owned()).into());
    }
    Ok(links)
}

pub fn write_link_list(path: &Path, links: &[PostLink]) -> anyhow::Result<()> {
    write_json_pretty(path, &links)
}

/// Scrapes every post in `links` and saves the records to `config.data_path()`.
pub async fn scrape_posts(config: &Config, links: &[PostLink]) -> anyhow::Result<Vec<PostRecord>> {
    let client = LinkedInClient::new(config).await?;
    let records = collect_posts_and_close(client, links, config.post_delay()).await?;
    write_json_pretty(config.data_path(), &records)
        .with_context(|| format!("Failed to save posts to {:?}", config.data_path()))?;
    println!(
        "Saved {} posts to {:?}",
        records.len(),
        config.data_path()
    );
    Ok(records)
}
