//! Minimal RSS 2.0 item extraction

use std::sync::LazyLock;

use regex::Regex;

static ITEM_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<item\b[^>]*>(.*?)</item>").expect("valid regex"));

static TITLE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<title\b[^>]*>(.*?)</title>").expect("valid regex"));

static LINK_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<link\b[^>]*>(.*?)</link>").expect("valid regex"));

static CDATA_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<!\[CDATA\[(.*?)\]\]>").expect("valid regex"));

/// Title and link of one feed item
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedItem {
    pub title: String,
    pub link: String,
}

/// Extract items in document order; items without a title are skipped
#[must_use]
pub fn parse_items(xml: &str) -> Vec<FeedItem> {
    ITEM_REGEX
        .captures_iter(xml)
        .filter_map(|item| {
            let body = item.get(1)?.as_str();
            let title = field(&TITLE_REGEX, body)?;
            if title.is_empty() {
                return None;
            }
            let link = field(&LINK_REGEX, body).unwrap_or_default();
            Some(FeedItem { title, link })
        })
        .collect()
}

fn field(regex: &Regex, body: &str) -> Option<String> {
    let raw = regex.captures(body)?.get(1)?.as_str();
    let text = CDATA_REGEX.replace_all(raw, "$1");
    Some(decode_entities(text.trim()))
}

fn decode_entities(text: &str) -> String {
    text.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&apos;", "'")
        .replace("&amp;", "&")
}

#[cfg(test)]
mod tests {
    use super::*;

    const FEED: &str = r#"<?xml version="1.0"?>
<rss version="2.0"><channel>
  <title>Example</title>
  <link>https://example.com</link>
  <item>
    <title><![CDATA[ Budget passed ]]></title>
    <link>https://example.com/budget</link>
  </item>
  <item><title>Rain &amp; floods</title><link>https://example.com/rain</link></item>
  <item><description>no title</description></item>
</channel></rss>"#;

    #[test]
    fn test_parse_items() {
        let items = parse_items(FEED);
        assert_eq!(
            items,
            vec![
                FeedItem {
                    title: "Budget passed".to_string(),
                    link: "https://example.com/budget".to_string(),
                },
                FeedItem {
                    title: "Rain & floods".to_string(),
                    link: "https://example.com/rain".to_string(),
                },
            ]
        );
    }

    #[test]
    fn test_not_a_feed() {
        assert!(parse_items("<html><body>hi</body></html>").is_empty());
    }
}
