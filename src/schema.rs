use derive_more::{AsRef, Display, From, Into};
use serde::{Deserialize, Serialize};
use typed_builder::TypedBuilder;

/// Numeric identifier of a post, e.g. `7012345678901234567`.
#[derive(
    Clone, PartialEq, Eq, Hash, Debug, Display, From, Into, AsRef, Serialize, Deserialize,
)]
#[as_ref(forward)]
pub struct ActivityId(String);

/// Canonical permalink of a post,
/// `https://www.linkedin.com/feed/update/urn:li:activity:<id>/`.
#[derive(
    Clone, PartialEq, Eq, Hash, Debug, Display, From, Into, AsRef, Serialize, Deserialize,
)]
#[as_ref(forward)]
pub struct PostLink(String);

/// Fields extracted from a rendered post page.
#[derive(Clone, PartialEq, Eq, Debug, Default, TypedBuilder, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostDetail {
    #[builder(default)]
    pub post_text: Option<String>,
    #[builder(default)]
    pub time_of_day: Option<String>,
    #[builder(default)]
    pub image_url: Option<String>,
    #[builder(default)]
    pub has_image: bool,
    #[builder(default)]
    pub likes: Option<u64>,
    #[builder(default)]
    pub comments: Option<u64>,
    #[builder(default)]
    pub reposts: Option<u64>,
}

/// One entry of the final `posts-data.json`.
///
/// Missing values are kept as `null`, which is different from a count of zero.
#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostRecord {
    pub link: PostLink,
    pub activity_id: Option<ActivityId>,
    pub post_text: Option<String>,
    pub time_of_day: Option<String>,
    pub image_url: Option<String>,
    pub has_image: bool,
    pub likes: Option<u64>,
    pub comments: Option<u64>,
    pub reposts: Option<u64>,
    pub impressions: Option<u64>,
}

impl PostRecord {
    pub fn new(
        link: PostLink,
        activity_id: Option<ActivityId>,
        detail: PostDetail,
        impressions: Option<u64>,
    ) -> Self {
        let PostDetail {
            post_text,
            time_of_day,
            image_url,
            has_image,
            likes,
            comments,
            reposts,
        } = detail;
        Self {
            link,
            activity_id,
            post_text,
            time_of_day,
            image_url,
            has_image,
            likes,
            comments,
            reposts,
            impressions,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{PostDetail, PostRecord};

    #[test]
    fn test_record_json() {
        let detail = PostDetail::builder()
            .post_text(Some("Hello".to_owned()))
            .likes(Some(0))
            .build();
        let record = PostRecord::new(
            "https://www.linkedin.com/feed/update/urn:li:activity:1/"
                .to_owned()
                .into(),
            Some("1".to_owned().into()),
            detail,
            None,
        );
        let json = serde_json::to_string(&record).unwrap();
        assert_eq!(
            json,
            concat!(
                r#"{"link":"https://www.linkedin.com/feed/update/urn:li:activity:1/","#,
                r#""activityId":"1","postText":"Hello","timeOfDay":null,"imageUrl":null,"#,
                r#""hasImage":false,"likes":0,"comments":null,"reposts":null,"impressions":null}"#
            )
        );
    }
}
