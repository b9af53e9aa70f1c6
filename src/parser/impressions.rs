use linkedin_scraping_utils::{regex, selector};
use log::trace;
use scraper::{ElementRef, Html};

use super::inner_text;
use crate::count::parse_count;

/// Reads the impression count from a post analytics page.
pub fn parse(html: &Html) -> Option<u64> {
    let body = html
        .select(selector!("body"))
        .next()
        .unwrap_or_else(|| html.root_element());
    let text = inner_text(body);
    if let Some(captures) =
        regex!(r"([0-9.,]+\s*(?-u:[KMB])?)\s+Impressions", ignore_case).captures(&text)
    {
        trace!("Impressions found in page text: {:?}", &captures[0]);
        return parse_count(Some(&captures[1]));
    }

    let label = body
        .select(selector!("span", "div"))
        .find(|e| inner_text(*e).to_lowercase() == "impressions")?;
    trace!("Impressions label found; looking for the nearest number");
    label
        .ancestors()
        .filter_map(ElementRef::wrap)
        .filter(|e| selector!("li", "div", "section").matches(e))
        .find_map(|container| {
            container
                .select(selector!("span", "div"))
                .find(|e| e.text().any(|t| t.chars().any(|c| c.is_ascii_digit())))
        })
        .and_then(|number| parse_count(Some(&inner_text(number))))
}
