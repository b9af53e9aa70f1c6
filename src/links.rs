//! Extraction of post permalinks from the analytics page snapshot.

use indexmap::IndexSet;
use linkedin_scraping_utils::regex;
use log::{debug, trace};

use crate::schema::{ActivityId, PostLink};

pub const BASE_URL: &str = "https://www.linkedin.com";
const PERMALINK_SEGMENT: &str = "/feed/update/urn:li:activity:";

impl PostLink {
    /// Builds the canonical permalink for `href`, which may be relative.
    /// Query strings and trailing path segments are dropped.
    pub fn canonicalize(href: &str) -> Option<Self> {
        let id = activity_id(href)?;
        Some(Self::from_activity_id(&id))
    }

    pub fn from_activity_id(id: &ActivityId) -> Self {
        format!("{BASE_URL}{PERMALINK_SEGMENT}{id}/").into()
    }

    pub fn activity_id(&self) -> Option<ActivityId> {
        activity_id(self.as_ref())
    }
}

/// Returns the digit run following `activity:` in `url`.
pub fn activity_id(url: &str) -> Option<ActivityId> {
    let captures = regex!(r"activity:(\d+)").captures(url)?;
    Some(captures[1].to_owned().into())
}

/// Finds every post permalink in `html`, canonicalized and deduplicated,
/// in order of first occurrence.
///
/// Anchors carrying the analytics list class are preferred.  Only when none of
/// them points to a post is every `href` in the document considered.
/// An empty result means the snapshot does not look like the analytics page.
pub fn extract_links(html: &str) -> Vec<PostLink> {
    let marked = regex!(
        r#"class="[^"]*member-analytics-addon__mini-update-item[^"]*"[^>]*href="([^"]+)"|href="([^"]+)"[^>]*class="[^"]*member-analytics-addon__mini-update-item"#,
        ignore_case
    )
    .captures_iter(html)
    .filter_map(|captures| captures.get(1).or_else(|| captures.get(2)))
    .map(|m| m.as_str());
    let links = collect_permalinks(marked);
    if !links.is_empty() {
        debug!("Found {} links in analytics list items", links.len());
        return links.into_iter().collect();
    }

    debug!("No analytics list items found; scanning every href");
    let every = regex!(r#"href\s*=\s*"([^"]+)""#, ignore_case)
        .captures_iter(html)
        .filter_map(|captures| captures.get(1))
        .map(|m| m.as_str());
    collect_permalinks(every).into_iter().collect()
}

fn collect_permalinks<'a>(hrefs: impl Iterator<Item = &'a str>) -> IndexSet<PostLink> {
    hrefs
        .filter(|href| href.contains(PERMALINK_SEGMENT))
        .filter_map(|href| {
            let absolute = if href.starts_with("http") {
                href.to_owned()
            } else {
                format!("{BASE_URL}{href}")
            };
            let link = PostLink::canonicalize(&absolute);
            trace!("{href} -> {link:?}");
            link
        })
        .collect()
}
