/// Compiles a CSS selector on first use and yields `&'static Selector`.
///
/// Several expressions may be given; they are joined into one selector group,
/// so `selector!("div.a", "div.b")` matches the same elements as `"div.a, div.b"`.
/// The calling crate must depend on `once_cell` and `scraper`.
#[macro_export]
macro_rules! selector {
    ($($e: expr),+ $(,)?) => {{
        use ::once_cell::sync::Lazy;
        use ::scraper::Selector;
        static SELECTOR: Lazy<Selector> =
            Lazy::new(|| Selector::parse(&[$($e),+].join(", ")).unwrap());
        &*SELECTOR
    }};
}

/// Compiles a regex on first use and yields `&'static Regex`.
///
/// `regex!(pattern, ignore_case)` builds a case-insensitive one.
#[macro_export]
macro_rules! regex {
    ($e: expr) => {{
        use ::once_cell::sync::Lazy;
        use ::regex::Regex;
        static PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new($e).unwrap());
        &*PATTERN
    }};
    ($e: expr, ignore_case) => {{
        use ::once_cell::sync::Lazy;
        use ::regex::{Regex, RegexBuilder};
        static PATTERN: Lazy<Regex> = Lazy::new(|| {
            RegexBuilder::new($e)
                .case_insensitive(true)
                .build()
                .unwrap()
        });
        &*PATTERN
    }};
}

#[cfg(test)]
mod tests {
    use scraper::Html;

    #[test]
    fn test_selector_group() {
        let html = Html::parse_fragment(r#"<div class="a">1</div><p class="b">2</p><div>3</div>"#);
        let texts: Vec<String> = html
            .select(selector!("div.a", "p.b"))
            .map(|e| e.text().collect())
            .collect();
        assert_eq!(texts, ["1", "2"]);
    }

    #[test]
    fn test_regex_ignore_case() {
        assert!(regex!(r"impressions", ignore_case).is_match("12 IMPRESSIONS"));
        assert!(!regex!(r"impressions").is_match("12 IMPRESSIONS"));
    }
}
