//! Extraction of post data from rendered page snapshots.
//!
//! Every lookup here is best effort: a selector that matches nothing yields `None`
//! and never affects the other fields of the same record.

use itertools::Itertools;
use linkedin_scraping_utils::regex;
use scraper::{ElementRef, Selector};

pub mod impressions;
pub mod post;

const BLOCK_ELEMENTS: &[&str] = &[
    "address", "article", "aside", "blockquote", "dd", "div", "dl", "dt", "figcaption",
    "figure", "footer", "form", "h1", "h2", "h3", "h4", "h5", "h6", "header", "hr", "li",
    "main", "nav", "ol", "p", "pre", "section", "table", "tr", "ul",
];

/// Approximates the rendered text of `element`.
///
/// Whitespace runs inside text nodes collapse to one space, `<br>` and block
/// elements break lines, table cells are separated by whitespace, and at most one
/// empty line is kept in a row.
pub fn inner_text(element: ElementRef) -> String {
    let mut raw = String::new();
    push_text(element, &mut raw);
    let text = raw
        .lines()
        .map(|line| line.split_whitespace().join(" "))
        .join("\n");
    regex!(r"\n{3,}").replace_all(&text, "\n\n").trim().to_owned()
}

fn push_text(element: ElementRef, out: &mut String) {
    for child in element.children() {
        if let Some(text) = child.value().as_text() {
            out.extend(text.chars().map(|c| if c.is_whitespace() { ' ' } else { c }));
        } else if let Some(child) = ElementRef::wrap(child) {
            match child.value().name() {
                "br" => out.push('\n'),
                "td" | "th" => {
                    push_text(child, out);
                    out.push('\t');
                }
                "script" | "style" | "template" | "noscript" => {}
                name if BLOCK_ELEMENTS.contains(&name) => {
                    out.push('\n');
                    push_text(child, out);
                    out.push('\n');
                }
                _ => push_text(child, out),
            }
        }
    }
}

/// The nearest element matching `selector`, starting from `element` itself.
pub fn closest<'a>(element: ElementRef<'a>, selector: &Selector) -> Option<ElementRef<'a>> {
    std::iter::once(element)
        .chain(element.ancestors().filter_map(ElementRef::wrap))
        .find(|e| selector.matches(e))
}

#[cfg(test)]
mod tests {
    use linkedin_scraping_utils::selector;
    use scraper::Html;

    use super::{closest, inner_text};

    #[test]
    fn test_inner_text() {
        let html = Html::parse_fragment(
            r#"<div id="t">
                 <span>First   line</span><br>
                 <span>second</span>
                 <p>para</p><br><br><br><br>
                 <script>var x = 1;</script>
                 <b>end</b>
               </div>"#,
        );
        let div = html.select(selector!("#t")).next().unwrap();
        assert_eq!(inner_text(div), "First line\nsecond\npara\n\nend");
    }

    #[test]
    fn test_inner_text_table_cells() {
        let html = Html::parse_fragment(
            r#"<table id="t"><tr><th>Metric</th><th>Value</th></tr><tr><td>12,345</td><td>Impressions</td></tr></table>"#,
        );
        let table = html.select(selector!("#t")).next().unwrap();
        assert_eq!(inner_text(table), "Metric Value\n\n12,345 Impressions");
    }

    #[test]
    fn test_closest_includes_self() {
        let html = Html::parse_fragment(
            r#"<article id="a"><div class="x" id="b"><span id="c">t</span></div></article>"#,
        );
        let span = html.select(selector!("#c")).next().unwrap();
        let div = html.select(selector!("#b")).next().unwrap();
        assert_eq!(
            closest(span, selector!("article")).and_then(|e| e.value().id()),
            Some("a")
        );
        assert_eq!(closest(div, selector!("div.x")).and_then(|e| e.value().id()), Some("b"));
        assert!(closest(span, selector!("section")).is_none());
    }
}
