use anyhow::{anyhow, bail, Context};
use chromiumoxide::{
    cdp::browser_protocol::{
        network::{Cookie, CookieParam, SetCookiesParams, TimeSinceEpoch},
        page::AddScriptToEvaluateOnNewDocumentParams,
    },
    Browser, BrowserConfig, Page,
};
use chrono::{NaiveDate, TimeDelta};
use futures::StreamExt;
use inquire::Confirm;
use log::{debug, info, warn};
use scraper::Html;
use tokio::{task::JoinHandle, time::sleep};
use url::Url;

use crate::{
    config::Config,
    cookie_store::{CookieStore, CookieStoreLoadError, StoredCookie},
    data_collector::PostSource,
    links::BASE_URL,
    parser,
    schema::{ActivityId, PostDetail, PostLink},
};

const LOGIN_URL: &str = "https://www.linkedin.com/login";
const TOP_POSTS_URL: &str = "https://www.linkedin.com/analytics/creator/top-posts/";
const ANALYTICS_LIST_SELECTOR: &str =
    "ul.member-analytics-addon-analytics-object-list li a.member-analytics-addon__mini-update-item";

const LOGIN_BANNER_SCRIPT: &str = r#"
(() => {
  const show = () => {
    if (document.getElementById("scraper-banner")) return;
    const banner = document.createElement("div");
    banner.id = "scraper-banner";
    banner.style.cssText = "position:fixed;top:0;left:0;right:0;background:#10b981;color:white;"
      + "padding:16px;text-align:center;font-size:16px;font-weight:bold;z-index:10000;";
    banner.textContent = "Log in to LinkedIn, then return to your terminal and confirm.";
    document.body.prepend(banner);
  };
  if (document.body) show(); else document.addEventListener("DOMContentLoaded", show);
})();
"#;

/// A browser session logged in to LinkedIn.
///
/// One tab is reused for every request, so the cookies live for the whole run.
pub struct LinkedInClient<'c> {
    browser: Browser,
    handler: JoinHandle<()>,
    page: Page,
    config: &'c Config,
}

impl<'c> LinkedInClient<'c> {
    /// Launches the browser and restores the saved session.
    /// When no session is saved yet, the operator is asked to log in interactively.
    pub async fn new(config: &'c Config) -> anyhow::Result<LinkedInClient<'c>> {
        let mut browser_config =
            BrowserConfig::builder().request_timeout(config.navigation_timeout());
        if !config.headless() {
            browser_config = browser_config.with_head();
        }
        let browser_config = browser_config
            .build()
            .map_err(|e| anyhow!("Invalid browser configuration: {e}"))?;
        let (browser, mut handler) = Browser::launch(browser_config)
            .await
            .context("Failed to launch the browser")?;
        let handler = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if let Err(e) = event {
                    debug!("Browser handler event error: {e}");
                }
            }
        });
        info!("Browser launched (headless: {}).", config.headless());

        let cookie_store = match CookieStore::load(config.cookie_store_path()) {
            Ok(cookie_store) => {
                info!("Cookie store was found.  Reusing the saved session.");
                cookie_store
            }
            Err(CookieStoreLoadError::NotFound) => {
                info!("Cookie store was not found.");
                login(&browser, config).await?
            }
            Err(e) => return Err(e.into()),
        };
        if cookie_store.is_empty() {
            warn!("The saved session contains no cookies; pages may require logging in.");
        }

        let page = browser.new_page("about:blank").await?;
        let cookies = cookie_store
            .cookies
            .iter()
            .map(cookie_param)
            .collect::<anyhow::Result<Vec<_>>>()?;
        page.execute(SetCookiesParams::new(cookies)).await?;
        debug!("Restored {cookie_store:?}");

        let client = Self {
            browser,
            handler,
            page,
            config,
        };
        client.slow_mo().await;
        Ok(client)
    }

    /// Navigates to `url`, lets the page settle and returns its HTML.
    pub async fn fetch_html(&self, url: &str) -> anyhow::Result<String> {
        debug!("Navigating to {url}");
        self.page
            .goto(url)
            .await
            .with_context(|| format!("Failed to navigate to {url}"))?;
        self.slow_mo().await;
        sleep(self.config.settle_delay()).await;
        let html = self
            .page
            .content()
            .await
            .with_context(|| format!("Failed to read the content of {url}"))?;
        self.slow_mo().await;
        Ok(html)
    }

    /// Downloads the creator analytics page listing the posts of the past year.
    pub async fn download_analytics_html(&self, today: NaiveDate) -> anyhow::Result<String> {
        let url = top_posts_url(today)?;
        info!("Fetching your posts analytics page...");
        self.page
            .goto(url.as_str())
            .await
            .with_context(|| format!("Failed to navigate to {url}"))?;
        self.slow_mo().await;

        if !self
            .wait_for_selector(ANALYTICS_LIST_SELECTOR, self.config.list_wait_timeout())
            .await
        {
            warn!("Analytics list may not have loaded, but continuing anyway...");
        }
        sleep(self.config.list_settle_delay()).await;
        Ok(self.page.content().await?)
    }

    async fn wait_for_selector(&self, selector: &str, timeout: std::time::Duration) -> bool {
        let poll = async {
            while self.page.find_element(selector).await.is_err() {
                sleep(std::time::Duration::from_millis(250)).await;
            }
        };
        tokio::time::timeout(timeout, poll).await.is_ok()
    }

    async fn slow_mo(&self) {
        if !self.config.slow_mo().is_zero() {
            sleep(self.config.slow_mo()).await;
        }
    }

    pub async fn close(mut self) -> anyhow::Result<()> {
        self.browser.close().await?;
        self.browser.wait().await?;
        self.handler.await?;
        debug!("Browser closed.");
        Ok(())
    }
}

impl PostSource for LinkedInClient<'_> {
    async fn fetch_post(
        &mut self,
        link: &PostLink,
        activity_id: Option<&ActivityId>,
    ) -> anyhow::Result<PostDetail> {
        let html = self.fetch_html(link.as_ref()).await?;
        Ok(parser::post::parse(&Html::parse_document(&html), activity_id))
    }

    async fn fetch_impressions(&mut self, activity_id: &ActivityId) -> anyhow::Result<Option<u64>> {
        let html = self.fetch_html(post_summary_url(activity_id).as_str()).await?;
        Ok(parser::impressions::parse(&Html::parse_document(&html)))
    }

    async fn close(self) -> anyhow::Result<()> {
        LinkedInClient::close(self).await
    }
}

async fn login(browser: &Browser, config: &Config) -> anyhow::Result<CookieStore> {
    if config.headless() {
        warn!("Logging in needs a visible browser window; run with HEADLESS unset if none appears.");
    }
    println!("Opening LinkedIn login...");
    let page = browser.new_page("about:blank").await?;
    page.execute(AddScriptToEvaluateOnNewDocumentParams::new(
        LOGIN_BANNER_SCRIPT,
    ))
    .await?;
    page.goto(LOGIN_URL)
        .await
        .with_context(|| format!("Failed to open {LOGIN_URL}"))?;

    let confirmed = tokio::task::spawn_blocking(|| {
        Confirm::new("Log in to LinkedIn in the browser window. Finished logging in?")
            .with_default(true)
            .with_help_message("Press ENTER once the LinkedIn feed is visible")
            .prompt()
    })
    .await??;
    if !confirmed {
        bail!("Login was not confirmed.");
    }

    let cookies = page.get_cookies().await?;
    page.close().await?;
    let cookie_store = CookieStore {
        cookies: cookies.into_iter().map(StoredCookie::from).collect(),
    };
    cookie_store.save(config.cookie_store_path())?;
    info!(
        "Session saved to {:?} ({} cookies).",
        config.cookie_store_path(),
        cookie_store.cookies.len()
    );
    Ok(cookie_store)
}

impl From<Cookie> for StoredCookie {
    fn from(cookie: Cookie) -> Self {
        Self {
            name: cookie.name,
            value: cookie.value,
            domain: cookie.domain,
            path: cookie.path,
            expires: (!cookie.session && cookie.expires > 0.).then_some(cookie.expires),
            http_only: cookie.http_only,
            secure: cookie.secure,
        }
    }
}

fn cookie_param(cookie: &StoredCookie) -> anyhow::Result<CookieParam> {
    let mut builder = CookieParam::builder()
        .name(&cookie.name)
        .value(&cookie.value)
        .domain(&cookie.domain)
        .path(&cookie.path)
        .http_only(cookie.http_only)
        .secure(cookie.secure);
    if let Some(expires) = cookie.expires {
        builder = builder.expires(TimeSinceEpoch::new(expires));
    }
    builder
        .build()
        .map_err(|e| anyhow!("Invalid cookie {:?}: {e}", cookie.name))
}

/// Analytics page of the posts published within the 365 days ending at `today`.
pub fn top_posts_url(today: NaiveDate) -> anyhow::Result<Url> {
    let start = today - TimeDelta::days(364);
    Ok(Url::parse_with_params(
        TOP_POSTS_URL,
        &[
            ("endDate", today.to_string()),
            ("metricType", "IMPRESSIONS".to_owned()),
            ("startDate", start.to_string()),
            ("timeRange", "past_365_days".to_owned()),
        ],
    )?)
}

pub fn post_summary_url(activity_id: &ActivityId) -> String {
    format!("{BASE_URL}/analytics/post-summary/urn:li:activity:{activity_id}")
}
