use std::cmp::Reverse;

use linkedin_scraping_utils::{regex, selector};
use log::debug;
use regex::Regex;
use scraper::{ElementRef, Html, Selector};

use super::{closest, inner_text};
use crate::{count::parse_count, schema::ActivityId, schema::PostDetail};

fn comment_thread() -> &'static Selector {
    selector!(
        "div.comments-comments-list",
        "div.comment",
        "div.comments-comment-item",
        "div.comments-comment-item__main-content",
        "section.comments",
        "div.feed-shared-update-v2__comments-container",
        "div.update-components-comments",
    )
}

fn post_text_containers() -> &'static Selector {
    selector!(
        "div.update-components-text",
        "div.update-components-text-view",
        "div.feed-shared-update-v2__commentary",
        "div.feed-shared-update-v2__description",
        "div.feed-shared-update-v2__description-wrapper",
        "[data-test-id='main-feed-activity-card__commentary']",
    )
}

fn post_images() -> &'static Selector {
    selector!(
        "img.feed-shared-image__image",
        "img.update-components-image__image",
        "img.ivm-view-attr__img--centered",
    )
}

/// Extracts the post identified by `activity_id` from a rendered post page.
pub fn parse(html: &Html, activity_id: Option<&ActivityId>) -> PostDetail {
    let root = html
        .select(selector!("main"))
        .next()
        .unwrap_or_else(|| html.root_element());
    let container = find_container(root, activity_id);

    let image_url = find_image_url(container);
    let detail = PostDetail {
        post_text: find_post_text(container),
        time_of_day: find_time_of_day(root, container),
        has_image: image_url.is_some(),
        image_url,
        likes: find_likes(container),
        comments: aria_count(container, regex!(r"comments?", ignore_case)),
        reposts: aria_count(container, regex!(r"reposts?", ignore_case)),
    };
    debug!("Parsed post {activity_id:?}: {detail:?}");
    detail
}

fn find_container<'a>(root: ElementRef<'a>, activity_id: Option<&ActivityId>) -> ElementRef<'a> {
    let by_urn = activity_id
        .and_then(|id| Selector::parse(&format!(r#"[data-urn*="activity:{id}"]"#)).ok())
        .and_then(|selector| root.select(&selector).next())
        .and_then(|element| {
            closest(element, selector!("article"))
                .or_else(|| closest(element, selector!("div.feed-shared-update-v2")))
        });
    by_urn
        .or_else(|| root.select(selector!("div.feed-shared-update-v2")).next())
        .or_else(|| root.select(selector!("article")).next())
        .unwrap_or(root)
}

fn is_in_comments(element: ElementRef) -> bool {
    closest(element, comment_thread()).is_some()
}

/// The longest non-empty text among `elements`; the first one wins a tie.
fn longest_text<'a>(elements: impl Iterator<Item = ElementRef<'a>>) -> Option<String> {
    elements
        .filter(|e| !is_in_comments(*e))
        .map(inner_text)
        .filter(|text| !text.is_empty())
        .min_by_key(|text| Reverse(text.chars().count()))
}

fn find_post_text(container: ElementRef) -> Option<String> {
    longest_text(container.select(post_text_containers()))
        .or_else(|| longest_text(container.select(selector!("span.break-words"))))
}

fn find_time_of_day(root: ElementRef, container: ElementRef) -> Option<String> {
    let time = container
        .select(selector!("time"))
        .next()
        .or_else(|| root.select(selector!("time")).next());
    time.and_then(|time| {
        time.value()
            .attr("datetime")
            .map(str::to_owned)
            .filter(|s| !s.is_empty())
            .or_else(|| Some(inner_text(time)).filter(|s| !s.is_empty()))
    })
    .or_else(|| {
        aria_labels(container)
            .find(|label| regex!(r"posted on|posted|published", ignore_case).is_match(label))
            .map(str::to_owned)
    })
}

fn find_image_url(container: ElementRef) -> Option<String> {
    let image_url = |img: ElementRef| {
        let alt = img.value().attr("alt").unwrap_or_default().to_lowercase();
        if alt.contains("profile") || alt.contains("avatar") {
            return None;
        }
        let element = img.value();
        element
            .attr("src")
            .filter(|src| !src.is_empty())
            .or_else(|| element.attr("data-delayed-url"))
            .filter(|src| !src.is_empty())
            .map(str::to_owned)
    };
    container
        .select(post_images())
        .find_map(image_url)
        .or_else(|| container.select(selector!("img")).find_map(image_url))
}

fn find_likes(container: ElementRef) -> Option<u64> {
    let counter = container
        .select(selector!(".social-details-social-counts__reactions-count"))
        .next()
        .map(inner_text);
    parse_count(counter.as_deref())
        .or_else(|| aria_count(container, regex!(r"reactions|likes", ignore_case)))
}

fn aria_labels<'a>(container: ElementRef<'a>) -> impl Iterator<Item = &'a str> {
    container
        .select(selector!("[aria-label]"))
        .filter_map(|e| e.value().attr("aria-label"))
}

/// Normalizes the first `aria-label` matching `pattern`.
fn aria_count(container: ElementRef, pattern: &Regex) -> Option<u64> {
    let label = aria_labels(container).find(|label| pattern.is_match(label));
    parse_count(label)
}
