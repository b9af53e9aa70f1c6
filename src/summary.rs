use std::fmt::{self, Display};

use getset::CopyGetters;
use num_format::{Locale, ToFormattedString};

use crate::schema::PostRecord;

/// Aggregate numbers shown at the end of a run.
#[derive(Clone, Copy, PartialEq, Eq, Debug, CopyGetters)]
#[getset(get_copy = "pub")]
pub struct Summary {
    total: usize,
    with_images: usize,
    average_likes: u64,
    average_impressions: u64,
}

impl Summary {
    /// Posts whose counts are unknown contribute zero to the averages.
    pub fn new(records: &[PostRecord]) -> Self {
        let average = |value: fn(&PostRecord) -> Option<u64>| {
            if records.is_empty() {
                return 0;
            }
            let sum: u64 = records.iter().filter_map(value).sum();
            (sum as f64 / records.len() as f64).round() as u64
        };
        Self {
            total: records.len(),
            with_images: records.iter().filter(|r| r.has_image).count(),
            average_likes: average(|r| r.likes),
            average_impressions: average(|r| r.impressions),
        }
    }
}

impl Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Summary:")?;
        writeln!(f, "  - Total posts: {}", self.total.to_formatted_string(&Locale::en))?;
        writeln!(
            f,
            "  - Posts with images: {}",
            self.with_images.to_formatted_string(&Locale::en)
        )?;
        writeln!(
            f,
            "  - Average likes: {}",
            self.average_likes.to_formatted_string(&Locale::en)
        )?;
        write!(
            f,
            "  - Average impressions: {}",
            self.average_impressions.to_formatted_string(&Locale::en)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::Summary;
    use crate::schema::{PostDetail, PostLink, PostRecord};

    fn record(id: &str, has_image: bool, likes: Option<u64>, impressions: Option<u64>) -> PostRecord {
        let detail = PostDetail::builder().has_image(has_image).likes(likes).build();
        let link = PostLink::from_activity_id(&id.to_owned().into());
        PostRecord::new(link, Some(id.to_owned().into()), detail, impressions)
    }

    #[test]
    fn test_nulls_count_as_zero() {
        let records = [
            record("1", true, Some(10), Some(1000)),
            record("2", false, None, Some(2001)),
            record("3", true, Some(5), None),
        ];
        let summary = Summary::new(&records);
        assert_eq!(summary.total(), 3);
        assert_eq!(summary.with_images(), 2);
        assert_eq!(summary.average_likes(), 5);
        assert_eq!(summary.average_impressions(), 1000);
        assert_eq!(
            summary.to_string(),
            "Summary:\n  - Total posts: 3\n  - Posts with images: 2\n  - Average likes: 5\n  - Average impressions: 1,000"
        );
    }

    #[test]
    fn test_empty() {
        let summary = Summary::new(&[]);
        assert_eq!(summary.total(), 0);
        assert_eq!(summary.average_likes(), 0);
        assert_eq!(summary.average_impressions(), 0);
    }
}
