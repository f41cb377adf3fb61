use std::collections::BTreeMap;

use channelcast::application::render::{ChannelContext, FeedDocument, RenderError};
use channelcast::domain::channel::ChannelId;
use channelcast::domain::construct::{FeedItem, FieldValue};
use channelcast::domain::types::FeedFormat;
use time::macros::datetime;

fn news(format: FeedFormat, url: &str) -> ChannelContext {
    ChannelContext {
        channel: ChannelId::parse("news").expect("channel id"),
        format,
        published: "2024-01-01T00:00:00Z".to_string(),
        caching: false,
        url: url.to_string(),
        home_url: "https://home/".to_string(),
        language: String::new(),
    }
}

fn overrides(pairs: &[(&str, &str)]) -> BTreeMap<String, FieldValue> {
    pairs
        .iter()
        .map(|(key, value)| (key.to_string(), FieldValue::text(*value)))
        .collect()
}

fn sample_item() -> FeedItem {
    FeedItem::new()
        .with("title", "Hi")
        .with("link", "https://x/1")
        .with("description", "d")
        .with("author", "")
        .with("pubDate", "")
        .with("category", "tech,world")
        .with("comments", "")
}

fn assert_in_order(haystack: &str, needles: &[&str]) {
    let mut cursor = 0;
    for needle in needles {
        match haystack[cursor..].find(needle) {
            Some(offset) => cursor += offset + needle.len(),
            None => panic!("`{needle}` missing after byte {cursor} in:\n{haystack}"),
        }
    }
}

#[test]
fn rss_document_matches_reference_layout() {
    let xml = FeedDocument::new(
        news(FeedFormat::Rss, "https://x/feed/news"),
        &overrides(&[
            ("title", "News"),
            ("link", "https://x"),
            ("description", "Daily"),
        ]),
        vec![sample_item()],
    )
    .expect("rss document")
    .with_clock(datetime!(2024-03-05 10:20:30 UTC))
    .render();

    assert_in_order(
        &xml,
        &[
            "<title>News</title>",
            "<link>https://x</link>",
            "<atom:link rel=\"self\" type=\"application/rss+xml\" href=\"https://x/feed/news\"/>",
            "<description>Daily</description>",
            "<item>",
            "<title>Hi</title>",
            "<link>https://x/1</link>",
            "<description><![CDATA[d]]></description>",
            "<guid isPermaLink=\"true\">https://x/1</guid>",
            "<pubDate>Mon, 01 Jan 2024 00:00:00 +0000</pubDate>",
            "<category>tech</category>",
            "<category>world</category>",
            "</item>",
            "</channel>",
            "</rss>",
        ],
    );
    assert!(!xml.contains("<author>"), "empty author must be omitted");
    assert!(!xml.contains("<comments>"), "empty comments must be omitted");
}

#[test]
fn construct_order_follows_template_not_overrides() {
    let xml = FeedDocument::new(
        news(FeedFormat::Rss, "https://x/feed/news"),
        &overrides(&[
            ("ttl", "60"),
            ("copyright", "(c) x"),
            ("description", "Daily"),
            ("title", "News"),
        ]),
        Vec::new(),
    )
    .expect("rss document")
    .render();

    assert_in_order(
        &xml,
        &[
            "<title>News</title>",
            "<description>Daily</description>",
            "<copyright>(c) x</copyright>",
            "<ttl>60</ttl>",
        ],
    );
}

#[test]
fn unknown_override_keys_are_ignored() {
    let xml = FeedDocument::new(
        news(FeedFormat::Rss, "https://x/feed/news"),
        &overrides(&[("title", "News"), ("mood", "sunny")]),
        Vec::new(),
    )
    .expect("rss document")
    .render();

    assert!(xml.contains("<title>News</title>"));
    assert!(!xml.contains("mood"));
}

#[test]
fn every_item_is_rendered_once_in_order() {
    let items: Vec<FeedItem> = (1..=3)
        .map(|n| FeedItem::new().with("title", format!("Post {n}")))
        .collect();

    let xml = FeedDocument::new(
        news(FeedFormat::Rss, "https://x/feed/news"),
        &BTreeMap::new(),
        items,
    )
    .expect("rss document")
    .render();

    assert_eq!(xml.matches("<item>").count(), 3);
    assert_in_order(
        &xml,
        &[
            "<title>Post 1</title>",
            "<title>Post 2</title>",
            "<title>Post 3</title>",
        ],
    );
}

#[test]
fn rendering_is_idempotent_with_a_fixed_clock() {
    let build = || {
        FeedDocument::new(
            news(FeedFormat::Rss, "https://x/feed/news"),
            &overrides(&[("title", "News")]),
            vec![sample_item()],
        )
        .expect("rss document")
        .with_clock(datetime!(2024-03-05 10:20:30 UTC))
    };

    let document = build();
    assert_eq!(document.render(), document.render());
    assert_eq!(document.render(), build().render());
}

#[test]
fn atom_document_uses_text_constructs_and_generic_category() {
    let xml = FeedDocument::new(
        news(FeedFormat::Atom, "https://x/rss/news.atom"),
        &overrides(&[
            ("title", "News"),
            ("subtitle", "Daily"),
            ("category", "a,b,c"),
            ("author", "Desk"),
            ("updated", "2024-02-01 08:00:00"),
        ]),
        vec![FeedItem::new().with("title", "Hi").with("link", "https://x/1")],
    )
    .expect("atom document")
    .render();

    assert_in_order(
        &xml,
        &[
            "<feed xmlns=\"http://www.w3.org/2005/Atom\">",
            "<title type=\"text\">News</title>",
            "<link rel=\"self\" type=\"application/atom+xml\" href=\"https://x/rss/news.atom\"/>",
            "<link rel=\"alternate\" type=\"text/html\" href=\"https://home/\"/>",
            "<subtitle type=\"text\">Daily</subtitle>",
            "<id>https://x/rss/news.atom</id>",
            "<author>\n<name>Desk</name>\n</author>",
            "<published>2024-01-01T00:00:00Z</published>",
            "<updated>2024-02-01T08:00:00Z</updated>",
            "<category>a,b,c</category>",
            "<entry>",
            "<id>https://x/1</id>",
            "</entry>",
            "</feed>",
        ],
    );
}

#[test]
fn text_is_escaped() {
    let xml = FeedDocument::new(
        news(FeedFormat::Rss, "https://x/feed/news?a=1&b=2"),
        &overrides(&[("title", "Tom & Jerry <live>")]),
        Vec::new(),
    )
    .expect("rss document")
    .render();

    assert!(xml.contains("<title>Tom &amp; Jerry &lt;live&gt;</title>"));
    assert!(xml.contains("href=\"https://x/feed/news?a=1&amp;b=2\""));
}

#[test]
fn json_has_no_renderer() {
    let result = FeedDocument::new(
        news(FeedFormat::Json, "https://x/feed/news"),
        &BTreeMap::new(),
        Vec::new(),
    );
    assert!(matches!(
        result,
        Err(RenderError::UnsupportedFormat(FeedFormat::Json))
    ));
}
