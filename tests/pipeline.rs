//! Integration tests for the feed pipeline: raw XML in, display items out.
//!
//! Feeds here mirror real-world shapes: RSS 2.0 with Media RSS thumbnails,
//! WordPress-style `content:encoded` bodies, and bare `<channel>` documents.

use pretty_assertions::assert_eq;
use rss_items::feed::{
    build_feed_items, extract_items, FeedDocument, FeedError, FeedPipeline, ImageStrategy,
    MalformedFeedError, PipelineOptions, XmlMap, XmlValue,
};
use rss_items::html::ScraperHtml;

const BLOG_FEED: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<rss version="2.0"
     xmlns:content="http://purl.org/rss/1.0/modules/content/"
     xmlns:media="http://search.yahoo.com/mrss/">
  <channel>
    <title>Example Blog</title>
    <link>https://blog.example.com</link>
    <item>
      <title>Thumbnail wins over inline images</title>
      <link>https://blog.example.com/posts/1</link>
      <description><![CDATA[<p><img src="https://blog.example.com/inline-1.jpg"> Thumbnails come first.</p>]]></description>
      <media:thumbnail url="https://cdn.example.com/thumb-1.jpg" width="300" height="200"/>
    </item>
    <item>
      <title>Description image</title>
      <link>https://blog.example.com/posts/2</link>
      <description>&lt;p&gt;Intro &lt;img src="https://blog.example.com/inline-2.jpg"&gt; text&lt;/p&gt;</description>
      <content:encoded><![CDATA[<img src="https://blog.example.com/encoded-2.jpg">]]></content:encoded>
    </item>
    <item>
      <title>Encoded fallback</title>
      <link>https://blog.example.com/posts/3</link>
      <description></description>
      <content:encoded><![CDATA[<p><img src='https://blog.example.com/encoded-3.jpg'></p><p>Body</p>]]></content:encoded>
    </item>
    <item>
      <title>No image at all</title>
      <link>https://blog.example.com/posts/4</link>
      <description>Plain   text    summary   </description>
    </item>
  </channel>
</rss>"#;

fn unbounded() -> PipelineOptions {
    PipelineOptions {
        max_items: None,
        max_title_length: None,
        max_excerpt_length: None,
        image_strategy: ImageStrategy::Precedence,
    }
}

fn items_xml(count: usize) -> String {
    (1..=count)
        .map(|i| {
            format!(
                "<item><title>Story number {i} with a long headline</title><link>https://news.example.com/{i}</link><description>Summary {i}</description></item>"
            )
        })
        .collect()
}

#[test]
fn test_blog_feed_images_follow_precedence() {
    let items = FeedPipeline::new(unbounded())
        .build_from_xml(BLOG_FEED.as_bytes())
        .unwrap();

    let images: Vec<_> = items.iter().map(|i| i.image_src.as_str()).collect();
    assert_eq!(
        images,
        vec![
            "https://cdn.example.com/thumb-1.jpg",
            "https://blog.example.com/inline-2.jpg",
            "https://blog.example.com/encoded-3.jpg",
            "",
        ]
    );
}

#[test]
fn test_blog_feed_excerpts() {
    let items = FeedPipeline::new(unbounded())
        .build_from_xml(BLOG_FEED.as_bytes())
        .unwrap();

    assert_eq!(items[0].excerpt, "Thumbnails come first.");
    assert_eq!(items[1].excerpt, "Intro  text");
    assert_eq!(items[2].excerpt, "");
    // Interior whitespace is kept, only the ends are trimmed
    assert_eq!(items[3].excerpt, "Plain   text    summary");
    assert_eq!(items[3].link, "https://blog.example.com/posts/4");
}

#[test]
fn test_rss_and_bare_channel_roots_match() {
    let body = items_xml(3);
    let rss = format!("<rss version=\"2.0\"><channel>{body}</channel></rss>");
    let bare = format!("<channel>{body}</channel>");

    let pipeline = FeedPipeline::new(PipelineOptions::default());
    assert_eq!(
        pipeline.build_from_xml(rss.as_bytes()).unwrap(),
        pipeline.build_from_xml(bare.as_bytes()).unwrap()
    );
}

#[test]
fn test_single_item_feed_yields_one_item() {
    let xml = "<rss><channel><item><title>Lonely</title><description>Only entry</description></item></channel></rss>";
    let items = FeedPipeline::new(PipelineOptions::default())
        .build_from_xml(xml.as_bytes())
        .unwrap();

    assert_eq!(items.len(), 1);
    assert_eq!(items[0].title, "Lonely");
    assert_eq!(items[0].excerpt, "Only entry");
}

#[test]
fn test_five_items_capped_to_two_with_short_titles() {
    let xml = format!(
        "<rss><channel>{}<item><title>Tiny</title></item></channel></rss>",
        items_xml(4)
    );
    let items = FeedPipeline::new(PipelineOptions {
        max_items: Some(2),
        max_title_length: Some(10),
        ..PipelineOptions::default()
    })
    .build_from_xml(xml.as_bytes())
    .unwrap();

    assert_eq!(items.len(), 2);
    for item in &items {
        assert!(item.title.chars().count() <= 13);
        assert!(item.title.ends_with("..."));
    }
    assert_eq!(items[0].title, "Story numb...");
    assert_eq!(items[1].link, "https://news.example.com/2");
}

#[test]
fn test_short_titles_are_not_ellipsized() {
    let xml = "<rss><channel><item><title>Tiny</title></item><item><title>Exactly 10</title></item></channel></rss>";
    let items = FeedPipeline::new(PipelineOptions {
        max_title_length: Some(10),
        ..PipelineOptions::default()
    })
    .build_from_xml(xml.as_bytes())
    .unwrap();

    assert_eq!(items[0].title, "Tiny");
    assert_eq!(items[1].title, "Exactly 10");
}

#[test]
fn test_zero_and_large_caps() {
    let doc = FeedDocument::parse(format!("<rss><channel>{}</channel></rss>", items_xml(3)).as_bytes())
        .unwrap();

    assert!(extract_items(&doc, Some(0)).unwrap().is_empty());
    let all = extract_items(&doc, Some(100)).unwrap();
    let titles: Vec<_> = all.iter().map(|i| i.title().to_string()).collect();
    assert_eq!(
        titles,
        vec![
            "Story number 1 with a long headline",
            "Story number 2 with a long headline",
            "Story number 3 with a long headline",
        ]
    );
}

#[test]
fn test_feed_without_items_is_malformed() {
    let doc = FeedDocument::parse(b"<rss><channel><title>Nothing yet</title></channel></rss>").unwrap();
    assert_eq!(
        build_feed_items(&doc, &PipelineOptions::default(), &ScraperHtml),
        Err(MalformedFeedError)
    );

    let result = FeedPipeline::new(PipelineOptions::default())
        .build_from_xml(b"<feed xmlns=\"http://www.w3.org/2005/Atom\"><entry/></feed>");
    assert!(matches!(result, Err(FeedError::Malformed(_))));
}

#[test]
fn test_image_field_override() {
    let items = FeedPipeline::new(PipelineOptions {
        image_strategy: ImageStrategy::Field("encoded".to_string()),
        ..unbounded()
    })
    .build_from_xml(BLOG_FEED.as_bytes())
    .unwrap();

    let images: Vec<_> = items.iter().map(|i| i.image_src.as_str()).collect();
    assert_eq!(
        images,
        vec![
            "",
            "https://blog.example.com/encoded-2.jpg",
            "https://blog.example.com/encoded-3.jpg",
            "",
        ]
    );
}

#[test]
fn test_raw_fields_survive_normalization() {
    let xml = "<rss><channel><item><title>T</title><guid isPermaLink=\"false\">abc-123</guid><pubDate>Tue, 10 Jun 2003 04:00:00 GMT</pubDate></item></channel></rss>";
    let items = FeedPipeline::new(PipelineOptions::default())
        .build_from_xml(xml.as_bytes())
        .unwrap();

    let raw = &items[0].item.raw;
    assert_eq!(raw.text("guid"), Some("abc-123"));
    assert_eq!(
        raw.field("guid").and_then(|g| g.attribute("isPermaLink")),
        Some("false")
    );
    assert_eq!(raw.text("pubDate"), Some("Tue, 10 Jun 2003 04:00:00 GMT"));
}

#[test]
fn test_latin1_feed_builds() {
    let mut xml = b"<?xml version=\"1.0\" encoding=\"ISO-8859-1\"?><rss><channel><item><title>Caf".to_vec();
    xml.extend_from_slice(b"\xE9 del barrio</title><description>Men\xFA del d\xEDa</description></item></channel></rss>");

    let items = FeedPipeline::new(PipelineOptions::default())
        .build_from_xml(&xml)
        .unwrap();
    assert_eq!(items[0].title, "Caf\u{e9} del barrio");
    assert_eq!(items[0].excerpt, "Men\u{fa} del d\u{ed}a");
}

#[test]
fn test_hand_built_document() {
    let text = |s: &str| XmlValue::Text(s.to_string());
    let item = |title: &str| {
        XmlValue::Map(XmlMap::from([
            ("title".to_string(), text(title)),
            ("link".to_string(), text("https://example.com/a")),
            (
                "description".to_string(),
                text("<img src=\"https://example.com/a.png\"> Converted elsewhere"),
            ),
        ]))
    };
    let channel = XmlMap::from([(
        "item".to_string(),
        XmlValue::List(vec![item("First"), item("Second")]),
    )]);
    let doc = FeedDocument::from_map(XmlMap::from([(
        "channel".to_string(),
        XmlValue::Map(channel),
    )]));

    let items = FeedPipeline::new(PipelineOptions::default()).build(&doc).unwrap();
    assert_eq!(items.len(), 2);
    assert_eq!(items[1].title, "Second");
    assert_eq!(items[0].image_src, "https://example.com/a.png");
    assert_eq!(items[0].excerpt, "Converted elsewhere");
}
