use std::sync::LazyLock;

use regex::{Captures, Regex};

/// Marker for the view counter on MathWorks blog pages: the watch-icon span
/// followed by a digits-and-commas group and the word "views".
static VIEW_COUNT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)class="icon-watch icon_16"></span>\s*([0-9,]+)\s+views"#)
        .expect("valid regex")
});

static AMP_OR_NUMERIC_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"&(?:amp;|#(?:[xX]([0-9a-fA-F]+)|([0-9]+));)").expect("valid regex")
});

/// Prepare raw page markup for matching: non-breaking spaces become regular
/// spaces, then HTML entities are decoded.
pub fn normalize_content(html: &str) -> String {
    decode_entities(&html.replace('\u{a0}', " "))
}

/// Decode the HTML entities that show up in blog markup. Named entities get
/// targeted replacements; `&amp;` and numeric character references decode
/// together in one final pass, so a decoded reference can never feed a later
/// replacement and double-escaped entities stay escaped.
pub fn decode_entities(text: &str) -> String {
    let text = text
        .replace("&nbsp;", " ")
        .replace("&quot;", "\"")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&apos;", "'");
    AMP_OR_NUMERIC_RE
        .replace_all(&text, |caps: &Captures| {
            // No capture group set means the match is a literal `&amp;`.
            if caps.get(1).is_none() && caps.get(2).is_none() {
                return "&".to_string();
            }
            let code = caps
                .get(1)
                .and_then(|hex| u32::from_str_radix(hex.as_str(), 16).ok())
                .or_else(|| caps.get(2).and_then(|dec| dec.as_str().parse().ok()));
            match code.and_then(char::from_u32) {
                Some(ch) => ch.to_string(),
                None => caps[0].to_string(),
            }
        })
        .into_owned()
}

/// Pull the integer view count out of normalized page content. Commas are
/// stripped from the matched group before parsing.
pub fn extract_view_count(content: &str) -> Option<u64> {
    VIEW_COUNT_RE
        .captures(content)
        .and_then(|caps| caps.get(1))
        .and_then(|group| group.as_str().replace(',', "").parse().ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page_with_counter(counter: &str) -> String {
        format!(
            "<html><body><p>Some post</p>\
             <span class=\"icon-watch icon_16\"></span> {counter}</body></html>"
        )
    }

    #[test]
    fn parses_count_with_commas() {
        let page = page_with_counter("12,345 views");
        assert_eq!(extract_view_count(&page), Some(12_345));
    }

    #[test]
    fn parses_count_without_commas() {
        let page = page_with_counter("87 views");
        assert_eq!(extract_view_count(&page), Some(87));
    }

    #[test]
    fn match_is_case_insensitive() {
        let page = "<SPAN CLASS=\"icon-watch icon_16\"></SPAN> 500 Views";
        assert_eq!(extract_view_count(page), Some(500));
    }

    #[test]
    fn whitespace_between_marker_and_count_is_allowed() {
        let page = "<span class=\"icon-watch icon_16\"></span>\n\t  1,000 views";
        assert_eq!(extract_view_count(page), Some(1_000));
    }

    #[test]
    fn nbsp_entity_between_count_and_word_is_normalized() {
        let raw = page_with_counter("12,345&nbsp;views");
        assert_eq!(extract_view_count(&normalize_content(&raw)), Some(12_345));
    }

    #[test]
    fn raw_non_breaking_space_is_normalized() {
        let raw = page_with_counter("9,876\u{a0}views");
        assert_eq!(extract_view_count(&normalize_content(&raw)), Some(9_876));
    }

    #[test]
    fn numeric_entity_is_decoded() {
        let raw = page_with_counter("4,200&#160;views");
        assert_eq!(extract_view_count(&normalize_content(&raw)), Some(4_200));
    }

    #[test]
    fn missing_marker_yields_none() {
        let page = "<html><body>42 views, but no icon span</body></html>";
        assert_eq!(extract_view_count(page), None);
    }

    #[test]
    fn digitless_match_yields_none() {
        let page = page_with_counter(",, views");
        assert_eq!(extract_view_count(&page), None);
    }

    #[test]
    fn double_escaped_entities_stay_escaped() {
        assert_eq!(decode_entities("&amp;nbsp;"), "&nbsp;");
        assert_eq!(decode_entities("&#38;amp;"), "&amp;");
        assert_eq!(decode_entities("&#x26;nbsp;"), "&nbsp;");
        assert_eq!(decode_entities("Tom &amp; Jerry"), "Tom & Jerry");
    }

    #[test]
    fn hex_entity_is_decoded() {
        assert_eq!(decode_entities("&#x41;&#x42;"), "AB");
    }

    #[test]
    fn invalid_numeric_entity_is_left_alone() {
        assert_eq!(decode_entities("&#1114112;"), "&#1114112;");
    }
}
