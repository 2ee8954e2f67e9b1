//! Podcast RSS feed fetcher.
//!
//! Pulls a hosted podcast feed (Anchor, Podbean, and friends all serve
//! plain RSS 2.0) and maps its items onto podcast episode rows.

use chrono::{DateTime, NaiveDate};
use quick_xml::events::Event;
use quick_xml::Reader;
use std::time::Duration;
use thiserror::Error;
use tracing::info;

#[derive(Debug, Error)]
pub enum FeedError {
    #[error("Feed request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Feed XML error: {0}")]
    Xml(#[from] quick_xml::Error),
}

/// One `<item>` from a podcast feed
#[derive(Debug, Clone, Default)]
pub struct FeedEpisode {
    pub title: String,
    pub link: Option<String>,
    pub published: Option<NaiveDate>,
    pub description: Option<String>,
    /// `<enclosure url=...>` - the hosted audio file
    pub audio_url: Option<String>,
    /// `<itunes:image href=...>` episode artwork
    pub image_url: Option<String>,
    pub duration_secs: Option<i64>,
}

/// Fetch a feed URL and parse its episodes
pub async fn fetch_feed(
    url: &str,
    user_agent: &str,
    timeout_ms: u64,
) -> Result<Vec<FeedEpisode>, FeedError> {
    let client = reqwest::Client::builder()
        .user_agent(user_agent.to_string())
        .timeout(Duration::from_millis(timeout_ms))
        .build()?;

    let body = client.get(url).send().await?.error_for_status()?.text().await?;
    let episodes = parse_rss(&body)?;
    info!("Fetched {} episodes from {}", episodes.len(), url);
    Ok(episodes)
}

/// Parse RSS 2.0 item elements from feed XML
pub fn parse_rss(xml: &str) -> Result<Vec<FeedEpisode>, FeedError> {
    let mut reader = Reader::from_str(xml);
    reader.trim_text(true);

    let mut episodes = Vec::new();
    let mut current: Option<FeedEpisode> = None;
    let mut tag: Vec<u8> = Vec::new();
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Start(ref e) if e.name().as_ref() == b"item" => {
                current = Some(FeedEpisode::default());
                tag.clear();
            }
            Event::Start(ref e) | Event::Empty(ref e) => {
                tag = e.name().as_ref().to_vec();
                if let Some(episode) = current.as_mut() {
                    match e.name().as_ref() {
                        b"enclosure" => {
                            for attr in e.attributes().flatten() {
                                if attr.key.as_ref() == b"url" {
                                    if let Ok(url) = attr.unescape_value() {
                                        episode.audio_url = Some(url.into_owned());
                                    }
                                }
                            }
                        }
                        b"itunes:image" => {
                            for attr in e.attributes().flatten() {
                                if attr.key.as_ref() == b"href" {
                                    if let Ok(href) = attr.unescape_value() {
                                        episode.image_url = Some(href.into_owned());
                                    }
                                }
                            }
                        }
                        _ => {}
                    }
                }
            }
            Event::Text(ref e) => {
                if let Some(episode) = current.as_mut() {
                    let text = e.unescape().map(|c| c.into_owned()).unwrap_or_default();
                    apply_field(episode, &tag, text);
                }
            }
            Event::CData(ref e) => {
                if let Some(episode) = current.as_mut() {
                    let text = String::from_utf8_lossy(e.as_ref()).into_owned();
                    apply_field(episode, &tag, text);
                }
            }
            Event::End(ref e) => {
                if e.name().as_ref() == b"item" {
                    if let Some(episode) = current.take() {
                        if !episode.title.is_empty() {
                            episodes.push(episode);
                        }
                    }
                }
                tag.clear();
            }
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    Ok(episodes)
}

fn apply_field(episode: &mut FeedEpisode, tag: &[u8], text: String) {
    match tag {
        b"title" => episode.title = text,
        b"link" => episode.link = Some(text),
        b"pubDate" => {
            episode.published = DateTime::parse_from_rfc2822(&text)
                .ok()
                .map(|d| d.date_naive());
        }
        b"description" => episode.description = Some(text),
        b"itunes:duration" => episode.duration_secs = parse_duration(&text),
        _ => {}
    }
}

/// Parse `HH:MM:SS`, `MM:SS`, or plain seconds
pub fn parse_duration(raw: &str) -> Option<i64> {
    let parts: Vec<&str> = raw.trim().split(':').collect();
    let nums: Vec<i64> = parts.iter().filter_map(|p| p.parse::<i64>().ok()).collect();
    if nums.len() != parts.len() || nums.is_empty() {
        return None;
    }
    Some(nums.iter().fold(0, |acc, n| acc * 60 + n))
}

#[cfg(test)]
mod tests {
    use super::*;

    const FEED: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<rss version="2.0" xmlns:itunes="http://www.itunes.com/dtds/podcast-1.0.dtd">
  <channel>
    <title>Beyond Podcast</title>
    <link>https://example.org/beyond</link>
    <item>
      <title>Episode One</title>
      <link>https://example.org/beyond/1</link>
      <pubDate>Sun, 07 Jan 2024 12:00:00 +0000</pubDate>
      <description><![CDATA[The first episode]]></description>
      <enclosure url="https://cdn.example.org/1.mp3" type="audio/mpeg" length="123"/>
      <itunes:image href="https://cdn.example.org/1.jpg"/>
      <itunes:duration>1:02:03</itunes:duration>
    </item>
    <item>
      <title>Episode Two</title>
      <pubDate>not a date</pubDate>
    </item>
  </channel>
</rss>"#;

    #[test]
    fn parses_items() {
        let episodes = parse_rss(FEED).unwrap();
        assert_eq!(episodes.len(), 2);

        let first = &episodes[0];
        assert_eq!(first.title, "Episode One");
        assert_eq!(first.link.as_deref(), Some("https://example.org/beyond/1"));
        assert_eq!(first.published, NaiveDate::from_ymd_opt(2024, 1, 7));
        assert_eq!(first.description.as_deref(), Some("The first episode"));
        assert_eq!(first.audio_url.as_deref(), Some("https://cdn.example.org/1.mp3"));
        assert_eq!(first.image_url.as_deref(), Some("https://cdn.example.org/1.jpg"));
        assert_eq!(first.duration_secs, Some(3723));
    }

    #[test]
    fn bad_pubdate_is_none() {
        let episodes = parse_rss(FEED).unwrap();
        assert!(episodes[1].published.is_none());
    }

    #[test]
    fn channel_metadata_outside_items_is_ignored() {
        let episodes = parse_rss(FEED).unwrap();
        assert!(episodes.iter().all(|e| e.title != "Beyond Podcast"));
    }

    #[test]
    fn durations() {
        assert_eq!(parse_duration("1:02:03"), Some(3723));
        assert_eq!(parse_duration("45:10"), Some(2710));
        assert_eq!(parse_duration("90"), Some(90));
        assert_eq!(parse_duration("abc"), None);
    }
}
