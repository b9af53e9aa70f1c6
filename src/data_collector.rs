use std::time::Duration;

use log::{debug, info};
use tokio::time::sleep;

use crate::schema::{ActivityId, PostDetail, PostLink, PostRecord};

/// Something that can load the pages of a post, e.g. a logged-in browser.
#[allow(async_fn_in_trait)]
pub trait PostSource {
    async fn fetch_post(
        &mut self,
        link: &PostLink,
        activity_id: Option<&ActivityId>,
    ) -> anyhow::Result<PostDetail>;

    async fn fetch_impressions(&mut self, activity_id: &ActivityId) -> anyhow::Result<Option<u64>>;

    async fn close(self) -> anyhow::Result<()>;
}

/// Scrapes `links` one after another, pausing `post_delay` after each post.
///
/// Any error aborts the whole batch; missing fields only show up as `null`s.
pub async fn collect_posts<S: PostSource>(
    source: &mut S,
    links: &[PostLink],
    post_delay: Duration,
) -> anyhow::Result<Vec<PostRecord>> {
    let mut records = Vec::with_capacity(links.len());
    for (i, link) in links.iter().enumerate() {
        let done = i + 1;
        info!(
            "Scraping post {done}/{} ({}%)...",
            links.len(),
            (done * 100 + links.len() / 2) / links.len()
        );
        let activity_id = link.activity_id();
        let detail = source.fetch_post(link, activity_id.as_ref()).await?;
        let impressions = match &activity_id {
            Some(activity_id) => source.fetch_impressions(activity_id).await?,
            None => None,
        };
        let record = PostRecord::new(link.clone(), activity_id, detail, impressions);
        debug!("{record:?}");
        records.push(record);
        sleep(post_delay).await;
    }
    Ok(records)
}

/// Runs [`collect_posts`] and closes `source` afterwards, also when the batch failed.
/// A scraping error takes precedence over an error while closing.
pub async fn collect_posts_and_close<S: PostSource>(
    mut source: S,
    links: &[PostLink],
    post_delay: Duration,
) -> anyhow::Result<Vec<PostRecord>> {
    let records = collect_posts(&mut source, links, post_delay).await;
    let closed = source.close().await;
    let records = records?;
    closed?;
    Ok(records)
}

#[cfg(test)]
mod tests {
    use std::{cell::Cell, rc::Rc, time::Duration};

    use anyhow::bail;

    use super::{collect_posts, collect_posts_and_close, PostSource};
    use crate::schema::{ActivityId, PostDetail, PostLink};

    #[derive(Default)]
    struct FakeSource {
        visited: Vec<String>,
        fail_on: Option<&'static str>,
        closed: Rc<Cell<bool>>,
    }

    impl PostSource for FakeSource {
        async fn fetch_post(
            &mut self,
            link: &PostLink,
            activity_id: Option<&ActivityId>,
        ) -> anyhow::Result<PostDetail> {
            self.visited.push(link.to_string());
            let id = activity_id.map(ToString::to_string).unwrap_or_default();
            if self.fail_on == Some(id.as_str()) {
                bail!("navigation failed");
            }
            Ok(PostDetail::builder()
                .post_text(Some(format!("post {id}")))
                .likes((id == "1").then_some(10))
                .build())
        }

        async fn fetch_impressions(
            &mut self,
            activity_id: &ActivityId,
        ) -> anyhow::Result<Option<u64>> {
            self.visited.push(format!("impressions {activity_id}"));
            Ok(Some(activity_id.to_string().parse::<u64>()? * 100))
        }

        async fn close(self) -> anyhow::Result<()> {
            self.closed.set(true);
            Ok(())
        }
    }

    fn links(ids: &[&str]) -> Vec<PostLink> {
        ids.iter()
            .map(|id| PostLink::from_activity_id(&id.to_string().into()))
            .collect()
    }

    #[tokio::test]
    async fn test_records_follow_link_order() {
        let mut source = FakeSource::default();
        let records = collect_posts(&mut source, &links(&["2", "1"]), Duration::ZERO)
            .await
            .unwrap();
        assert_eq!(
            source.visited,
            [
                "https://www.linkedin.com/feed/update/urn:li:activity:2/",
                "impressions 2",
                "https://www.linkedin.com/feed/update/urn:li:activity:1/",
                "impressions 1",
            ]
        );
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].activity_id.as_ref().map(ToString::to_string).as_deref(), Some("2"));
        assert_eq!(records[0].post_text.as_deref(), Some("post 2"));
        assert_eq!(records[0].likes, None);
        assert_eq!(records[0].impressions, Some(200));
        assert_eq!(records[1].likes, Some(10));
        assert_eq!(records[1].impressions, Some(100));
    }

    #[tokio::test]
    async fn test_failure_aborts_batch() {
        let mut source = FakeSource {
            fail_on: Some("2"),
            ..Default::default()
        };
        let res = collect_posts(&mut source, &links(&["1", "2", "3"]), Duration::ZERO).await;
        assert!(res.is_err());
        assert!(!source.visited.iter().any(|v| v.contains("activity:3")));
    }

    #[tokio::test]
    async fn test_no_links() {
        let mut source = FakeSource::default();
        let records = collect_posts(&mut source, &[], Duration::ZERO).await.unwrap();
        assert!(records.is_empty());
        assert!(source.visited.is_empty());
    }

    #[tokio::test]
    async fn test_source_closed_after_batch() {
        let source = FakeSource::default();
        let closed = Rc::clone(&source.closed);
        let records = collect_posts_and_close(source, &links(&["1"]), Duration::ZERO)
            .await
            .unwrap();
        assert_eq!(records.len(), 1);
        assert!(closed.get());
    }

    #[tokio::test]
    async fn test_source_closed_after_failure() {
        let source = FakeSource {
            fail_on: Some("1"),
            ..Default::default()
        };
        let closed = Rc::clone(&source.closed);
        let err = collect_posts_and_close(source, &links(&["1", "2"]), Duration::ZERO)
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "navigation failed");
        assert!(closed.get());
    }
}
