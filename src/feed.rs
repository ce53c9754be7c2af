use anyhow::{Context, Result};
use async_trait::async_trait;
use quick_xml::events::Event;
use tracing::info;

/// One raw feed entry: a title and the HTML blob carrying the labeled fields.
#[derive(Debug, Clone, PartialEq)]
pub struct FeedItem {
    pub title: String,
    pub content: String,
}

#[async_trait]
pub trait FeedSource {
    /// Fetch the full current item list, in the order the feed delivers it.
    async fn fetch(&self) -> Result<Vec<FeedItem>>;
}

pub struct HttpFeed {
    client: reqwest::Client,
    url: String,
}

impl HttpFeed {
    pub fn new(url: impl Into<String>) -> Self {
        HttpFeed {
            client: reqwest::Client::new(),
            url: url.into(),
        }
    }
}

#[async_trait]
impl FeedSource for HttpFeed {
    async fn fetch(&self) -> Result<Vec<FeedItem>> {
        let xml = self
            .client
            .get(&self.url)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .with_context(|| format!("Failed to fetch feed {}", self.url))?
            .text()
            .await
            .context("Failed to read feed body")?;

        let items = parse_feed(&xml)?;
        info!(items = items.len(), "Fetched feed");
        Ok(items)
    }
}

#[derive(Clone, Copy)]
enum Field {
    Title,
    Content,
    Summary,
}

/// Parse RSS `<item>`s (or Atom `<entry>`s) into feed items, in document order.
///
/// Content comes from `<content:encoded>` (Atom: `<content>`), falling back
/// to `<description>` (Atom: `<summary>`) when the item has none.
pub fn parse_feed(xml: &str) -> Result<Vec<FeedItem>> {
    let mut reader = quick_xml::Reader::from_str(xml);
    let mut items = Vec::new();
    let mut in_item = false;
    let mut field: Option<Field> = None;
    let mut title = String::new();
    let mut content = String::new();
    let mut summary = String::new();
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) => match e.name().as_ref() {
                b"item" | b"entry" => {
                    in_item = true;
                    title.clear();
                    content.clear();
                    summary.clear();
                }
                b"title" if in_item => field = Some(Field::Title),
                b"content:encoded" | b"content" if in_item => field = Some(Field::Content),
                b"description" | b"summary" if in_item => field = Some(Field::Summary),
                _ => {}
            },
            Ok(Event::Text(e)) if field.is_some() => {
                let text = e.unescape()?;
                push_text(field, &text, &mut title, &mut content, &mut summary);
            }
            Ok(Event::CData(e)) if field.is_some() => {
                let text = std::str::from_utf8(&e).context("Feed CDATA is not UTF-8")?;
                push_text(field, text, &mut title, &mut content, &mut summary);
            }
            Ok(Event::End(e)) => match e.name().as_ref() {
                b"item" | b"entry" if in_item => {
                    in_item = false;
                    field = None;
                    let body = if content.trim().is_empty() {
                        std::mem::take(&mut summary)
                    } else {
                        std::mem::take(&mut content)
                    };
                    items.push(FeedItem {
                        title: title.trim().to_string(),
                        content: body,
                    });
                }
                b"title" | b"content:encoded" | b"content" | b"description" | b"summary" => {
                    field = None
                }
                _ => {}
            },
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(e)
                    .with_context(|| format!("Malformed feed at byte {}", reader.buffer_position()))
            }
            _ => {}
        }
        buf.clear();
    }
    Ok(items)
}

fn push_text(
    field: Option<Field>,
    text: &str,
    title: &mut String,
    content: &mut String,
    summary: &mut String,
) {
    match field {
        Some(Field::Title) => title.push_str(text),
        Some(Field::Content) => content.push_str(text),
        Some(Field::Summary) => summary.push_str(text),
        None => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rss_fixture() {
        let xml = std::fs::read_to_string("tests/fixtures/upwork.rss").unwrap();
        let items = parse_feed(&xml).unwrap();
        assert_eq!(items.len(), 3);
        assert_eq!(items[0].title, "Rust CLI for log parsing - Upwork");
        assert!(items[0].content.contains("<b>Posted On</b>: October 17, 2026 08:45 UTC"));
        assert!(items[1].content.contains("<b>Budget</b>: $1,200"));
        // No content:encoded on the third item, so description is used.
        assert!(items[2].content.contains("<b>Country</b>: India"));
    }

    #[test]
    fn channel_title_not_an_item() {
        let xml = "<rss><channel><title>feed</title><item><title>a</title>\
                   <description>&lt;b&gt;Country&lt;/b&gt;: Peru&lt;br /&gt;</description></item></channel></rss>";
        let items = parse_feed(xml).unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].title, "a");
        assert_eq!(items[0].content, "<b>Country</b>: Peru<br />");
    }

    #[test]
    fn atom_entries() {
        let xml = "<feed><title>x</title><entry><title>one</title><content>body 1</content></entry>\
                   <entry><title>two</title><summary>body 2</summary></entry></feed>";
        let items = parse_feed(xml).unwrap();
        let titles: Vec<&str> = items.iter().map(|i| i.title.as_str()).collect();
        assert_eq!(titles, vec!["one", "two"]);
        assert_eq!(items[1].content, "body 2");
    }

    #[test]
    fn malformed_xml_errors() {
        assert!(parse_feed("<rss><channel><item><title>a</item></channel></rss>").is_err());
    }

    #[test]
    fn empty_channel() {
        assert!(parse_feed("<rss><channel></channel></rss>").unwrap().is_empty());
    }
}
