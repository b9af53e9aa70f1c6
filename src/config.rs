use std::{path::PathBuf, time::Duration};

use getset::{CopyGetters, Getters};
use linkedin_scraping_utils::fs_json_util::read_toml;
use log::{debug, warn};
use serde::Deserialize;
use serde_with::{serde_as, DurationMilliSeconds};
use typed_builder::TypedBuilder;

/// Settings shared by every stage, built once at process start.
///
/// Each field may be given in an optional TOML file; `HEADLESS` and `SLOW_MO`
/// from the environment take precedence over the file.
#[serde_as]
#[derive(Clone, Debug, Getters, CopyGetters, TypedBuilder, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    #[getset(get_copy = "pub")]
    #[builder(default)]
    headless: bool,
    /// Extra delay after every browser action.
    #[getset(get_copy = "pub")]
    #[builder(default)]
    #[serde_as(as = "DurationMilliSeconds<u64>")]
    slow_mo: Duration,
    /// Time given to a page to render after navigation.
    #[getset(get_copy = "pub")]
    #[builder(default = Duration::from_millis(1500))]
    #[serde_as(as = "DurationMilliSeconds<u64>")]
    settle_delay: Duration,
    /// Pause between two posts.
    #[getset(get_copy = "pub")]
    #[builder(default = Duration::from_millis(1000))]
    #[serde_as(as = "DurationMilliSeconds<u64>")]
    post_delay: Duration,
    #[getset(get_copy = "pub")]
    #[builder(default = Duration::from_secs(60))]
    #[serde_as(as = "DurationMilliSeconds<u64>")]
    navigation_timeout: Duration,
    /// How long to wait for the analytics list to appear.
    #[getset(get_copy = "pub")]
    #[builder(default = Duration::from_secs(15))]
    #[serde_as(as = "DurationMilliSeconds<u64>")]
    list_wait_timeout: Duration,
    #[getset(get_copy = "pub")]
    #[builder(default = Duration::from_secs(3))]
    #[serde_as(as = "DurationMilliSeconds<u64>")]
    list_settle_delay: Duration,
    #[getset(get = "pub")]
    #[builder(default = PathBuf::from("linkedin.auth.json"))]
    cookie_store_path: PathBuf,
    #[getset(get = "pub")]
    #[builder(default = PathBuf::from("posts.html"))]
    html_path: PathBuf,
    #[getset(get = "pub")]
    #[builder(default = PathBuf::from("post-links.json"))]
    links_path: PathBuf,
    #[getset(get = "pub")]
    #[builder(default = PathBuf::from("posts-data.json"))]
    data_path: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl Config {
    /// Reads the config file if given and applies the environment on top of it.
    pub fn load(path: Option<&std::path::Path>) -> anyhow::Result<Self> {
        let mut config = match path {
            Some(path) => read_toml(path)?,
            None => Self::default(),
        };
        config.apply_env(|key| std::env::var(key).ok());
        debug!("Config: {config:?}");
        Ok(config)
    }

    fn apply_env(&mut self, var: impl Fn(&str) -> Option<String>) {
        if let Some(headless) = var("HEADLESS") {
            self.headless = headless == "true";
        }
        if let Some(slow_mo) = var("SLOW_MO") {
            let millis = slow_mo.trim().parse().unwrap_or_else(|_| {
                warn!("Ignoring SLOW_MO={slow_mo:?}; it is not a number of milliseconds");
                0
            });
            self.slow_mo = Duration::from_millis(millis);
        }
    }

    pub fn set_html_path(&mut self, path: PathBuf) {
        self.html_path = path;
    }

    pub fn set_links_path(&mut self, path: PathBuf) {
        self.links_path = path;
    }

    pub fn set_data_path(&mut self, path: PathBuf) {
        self.data_path = path;
    }
}
