//! Normalization of human-readable counters such as `"1,234"`, `"2.3K"` or `"1M"`.

use linkedin_scraping_utils::regex;

/// Parses the first count found in `text`.
///
/// Thousands separators are ignored and a `K`/`M`/`B` suffix directly after the
/// number scales it.  The result is rounded to the nearest integer.
/// Returns `None` when the input is absent or contains no number.
pub fn parse_count(text: Option<&str>) -> Option<u64> {
    let text = text?.replace(',', "");
    // ASCII suffixes only; Unicode case folding would also match the Kelvin sign.
    let captures = regex!(r"(\d+(?:\.\d+)?)([KMBkmb])?").captures(text.trim())?;
    let value: f64 = captures[1].parse().ok()?;
    let scale = match captures.get(2).map(|m| m.as_str().to_ascii_uppercase()) {
        None => 1e0,
        Some(suffix) => match suffix.as_str() {
            "K" => 1e3,
            "M" => 1e6,
            "B" => 1e9,
            _ => return None,
        },
    };
    Some((value * scale).round() as u64)
}

#[cfg(test)]
mod tests {
    use super::parse_count;

    #[test]
    fn test_plain_and_grouped() {
        assert_eq!(parse_count(Some("0")), Some(0));
        assert_eq!(parse_count(Some("42")), Some(42));
        assert_eq!(parse_count(Some("1,234")), Some(1234));
        assert_eq!(parse_count(Some("  12,345,678 ")), Some(12_345_678));
    }

    #[test]
    fn test_suffixes() {
        assert_eq!(parse_count(Some("2.5K")), Some(2500));
        assert_eq!(parse_count(Some("2.5k")), Some(2500));
        assert_eq!(parse_count(Some("1M")), Some(1_000_000));
        assert_eq!(parse_count(Some("1.25m")), Some(1_250_000));
        assert_eq!(parse_count(Some("3B")), Some(3_000_000_000));
    }

    #[test]
    fn test_rounding() {
        assert_eq!(parse_count(Some("3.7")), Some(4));
        assert_eq!(parse_count(Some("12.7")), Some(13));
        assert_eq!(parse_count(Some("12.2")), Some(12));
        assert_eq!(parse_count(Some("0.5")), Some(1));
    }

    #[test]
    fn test_missing() {
        assert_eq!(parse_count(None), None);
        assert_eq!(parse_count(Some("")), None);
        assert_eq!(parse_count(Some("   ")), None);
        assert_eq!(parse_count(Some("no reactions yet")), None);
    }

    #[test]
    fn test_first_number_wins() {
        assert_eq!(parse_count(Some("15 reactions, 3 comments")), Some(15));
        assert_eq!(parse_count(Some("Liked by 1,024 people and 2 others")), Some(1024));
        // The suffix has to be glued to the number.
        assert_eq!(parse_count(Some("7 Members")), Some(7));
    }

    #[test]
    fn test_non_ascii_suffix_is_ignored() {
        assert_eq!(parse_count(Some("5\u{212A} reactions")), Some(5));
        assert_eq!(parse_count(Some("5\u{212A}")), Some(5));
    }
}
