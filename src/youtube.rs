use eyre::{Result, WrapErr};
use log::{debug, info, warn};
use serde::{Deserialize, Deserializer};

use crate::{ChannelInfo, TranscriptKind, TranscriptResult, VideoMetadata, duration};

/// Root of the YouTube Data API v3
pub const DEFAULT_API_BASE: &str = "https://www.googleapis.com/youtube/v3";

const METADATA_PARTS: &str = "snippet,statistics,contentDetails";
const PREFERRED_LANGUAGE: &str = "en";
const STANDARD_TRACK_KIND: &str = "standard";
const CAPTION_FORMAT: &str = "srt";

#[derive(Debug, Deserialize)]
struct VideoListResponse {
    items: Option<Vec<VideoItem>>,
}

#[derive(Debug, Deserialize)]
struct VideoItem {
    snippet: VideoSnippet,
    #[serde(default)]
    statistics: VideoStatistics,
    #[serde(rename = "contentDetails", default)]
    content_details: ContentDetails,
}

#[derive(Debug, Deserialize)]
struct VideoSnippet {
    title: String,
    #[serde(default)]
    description: String,
    #[serde(rename = "publishedAt")]
    published_at: String,
    #[serde(rename = "channelTitle")]
    channel_title: String,
}

#[derive(Debug, Default, Deserialize)]
struct VideoStatistics {
    #[serde(rename = "viewCount", default, deserialize_with = "count")]
    view_count: u64,
    #[serde(rename = "likeCount", default, deserialize_with = "count")]
    like_count: u64,
    #[serde(rename = "commentCount", default, deserialize_with = "count")]
    comment_count: u64,
}

#[derive(Debug, Default, Deserialize)]
struct ContentDetails {
    #[serde(default)]
    duration: String,
}

impl VideoItem {
    fn into_metadata(self) -> VideoMetadata {
        let publish_date = match self.snippet.published_at.split_once('T') {
            Some((date, _)) => date.to_string(),
            None => self.snippet.published_at,
        };

        VideoMetadata {
            title: self.snippet.title,
            description: self.snippet.description,
            duration_seconds: duration::to_seconds(&self.content_details.duration),
            views: self.statistics.view_count,
            likes: self.statistics.like_count,
            comments: self.statistics.comment_count,
            publish_date,
            channel: ChannelInfo {
                name: self.snippet.channel_title,
                subscribers: None,
            },
        }
    }
}

/// Statistics arrive as decimal strings; plain numbers and `null` are tolerated too
fn count<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Count {
        Number(u64),
        Text(String),
    }

    match Option::<Count>::deserialize(deserializer)? {
        None => Ok(0),
        Some(Count::Number(n)) => Ok(n),
        Some(Count::Text(s)) if s.is_empty() => Ok(0),
        Some(Count::Text(s)) => s.parse().map_err(serde::de::Error::custom),
    }
}

#[derive(Debug, Deserialize)]
struct CaptionListResponse {
    items: Option<Vec<CaptionTrack>>,
}

#[derive(Debug, Clone, Deserialize)]
struct CaptionTrack {
    id: String,
    snippet: CaptionSnippet,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct CaptionSnippet {
    #[serde(default)]
    language: String,
    #[serde(rename = "trackKind", default)]
    track_kind: String,
}

impl CaptionTrack {
    fn kind(&self) -> TranscriptKind {
        if self.snippet.track_kind == STANDARD_TRACK_KIND {
            TranscriptKind::Official
        } else {
            TranscriptKind::Auto
        }
    }
}

/// First track in `lang`, else the first track listed
fn select_track<'a>(tracks: &'a [CaptionTrack], lang: &str) -> Option<&'a CaptionTrack> {
    tracks
        .iter()
        .find(|t| t.snippet.language == lang)
        .or_else(|| tracks.first())
}

/// Client for the YouTube Data API, bound to a single API key
#[derive(Clone)]
pub struct YouTubeClient {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
}

impl std::fmt::Debug for YouTubeClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("YouTubeClient")
            .field("base_url", &self.base_url)
            .field("api_key", &"<redacted>")
            .finish()
    }
}

impl YouTubeClient {
    pub fn new(client: reqwest::Client, api_key: impl Into<String>) -> Self {
        Self {
            client,
            api_key: api_key.into(),
            base_url: DEFAULT_API_BASE.to_string(),
        }
    }

    /// Point the client at a different API root
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Look up a video via `videos.list`
    ///
    /// Returns `Ok(None)` when the call fails or the video does not exist.
    /// A successful response that cannot be decoded is an error.
    pub async fn fetch_metadata(&self, video_id: &str) -> Result<Option<VideoMetadata>> {
        let url = format!("{}/videos", self.base_url);
        debug!("Fetching video metadata: {url} id={video_id}");

        let sent = self
            .client
            .get(&url)
            .query(&[("part", METADATA_PARTS), ("id", video_id), ("key", self.api_key.as_str())])
            .send()
            .await;

        let resp = match sent {
            Ok(resp) if resp.status().is_success() => resp,
            Ok(resp) => {
                info!("Metadata lookup for {video_id} returned {}", resp.status());
                return Ok(None);
            }
            Err(e) => {
                warn!("Metadata lookup for {video_id} failed: {}", e.without_url());
                return Ok(None);
            }
        };

        let body: VideoListResponse = resp
            .json()
            .await
            .map_err(reqwest::Error::without_url)
            .wrap_err("failed to decode videos.list response")?;

        let metadata = body
            .items
            .unwrap_or_default()
            .into_iter()
            .next()
            .map(VideoItem::into_metadata);

        if metadata.is_none() {
            info!("No video found for {video_id}");
        }
        Ok(metadata)
    }

    /// Fetch the preferred caption track for a video
    ///
    /// Every failure along the way collapses to `None`.
    pub async fn fetch_transcript(&self, video_id: &str) -> Option<TranscriptResult> {
        match self.try_fetch_transcript(video_id).await {
            Ok(transcript) => transcript,
            Err(e) => {
                debug!("Caption retrieval for {video_id} failed: {e:#}");
                None
            }
        }
    }

    async fn try_fetch_transcript(&self, video_id: &str) -> Result<Option<TranscriptResult>> {
        let tracks = self.list_captions(video_id).await?;

        let Some(track) = select_track(&tracks, PREFERRED_LANGUAGE) else {
            debug!("No caption tracks for {video_id}");
            return Ok(None);
        };
        debug!(
            "Using caption track {}: lang={} kind={}",
            track.id, track.snippet.language, track.snippet.track_kind
        );

        let text = self.download_caption(&track.id).await?;

        Ok(Some(TranscriptResult {
            available: true,
            kind: track.kind(),
            text,
        }))
    }

    async fn list_captions(&self, video_id: &str) -> Result<Vec<CaptionTrack>> {
        let url = format!("{}/captions", self.base_url);
        debug!("Listing caption tracks: {url} videoId={video_id}");

        let resp: CaptionListResponse = self
            .client
            .get(&url)
            .query(&[("part", "snippet"), ("videoId", video_id), ("key", self.api_key.as_str())])
            .send()
            .await
            .map_err(reqwest::Error::without_url)?
            .error_for_status()
            .map_err(reqwest::Error::without_url)?
            .json()
            .await
            .map_err(reqwest::Error::without_url)
            .wrap_err("failed to decode captions.list response")?;

        Ok(resp.items.unwrap_or_default())
    }

    async fn download_caption(&self, caption_id: &str) -> Result<String> {
        let url = format!("{}/captions/{caption_id}", self.base_url);
        debug!("Downloading caption track: {url}");

        let text = self
            .client
            .get(&url)
            .query(&[("tfmt", CAPTION_FORMAT), ("key", self.api_key.as_str())])
            .send()
            .await
            .map_err(reqwest::Error::without_url)?
            .error_for_status()
            .map_err(reqwest::Error::without_url)?
            .text()
            .await
            .map_err(reqwest::Error::without_url)?;

        Ok(text)
    }
}
