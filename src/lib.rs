pub mod analyze;
pub mod config;
pub mod duration;
pub mod output;
pub mod server;
pub mod youtube;

use serde::Serialize;
use url::Url;

/// Host of the short-link form, `https://youtu.be/<id>`
const SHORT_LINK_HOST: &str = "youtu.be";

/// Host of the canonical form, `https://www.youtube.com/watch?v=<id>`
const CANONICAL_HOST: &str = "youtube.com";

/// Caveats attached to every analysis, in this order
pub const LIMITATIONS: &[&str] = &["No CTR data", "No retention graph access", "No impressions data"];

/// Supported video hosting platforms
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Youtube,
}

impl Platform {
    /// Look up a platform by the name callers send in requests
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "youtube" => Some(Platform::Youtube),
            _ => None,
        }
    }
}

impl std::fmt::Display for Platform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Platform::Youtube => write!(f, "youtube"),
        }
    }
}

/// A video on a supported platform, identified by its opaque id
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoReference {
    pub platform: Platform,
    pub id: String,
}

impl VideoReference {
    pub fn from_url(input: &str) -> Option<Self> {
        extract_video_id(input).map(|id| VideoReference {
            platform: Platform::Youtube,
            id,
        })
    }
}

/// Channel that published a video
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChannelInfo {
    pub name: String,
    /// Not exposed by the videos endpoint, always serialized as `null`
    pub subscribers: Option<u64>,
}

/// Normalized video metadata
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VideoMetadata {
    pub title: String,
    pub description: String,
    pub duration_seconds: u64,
    pub views: u64,
    pub likes: u64,
    pub comments: u64,
    pub publish_date: String,
    pub channel: ChannelInfo,
}

/// Origin of a caption track
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TranscriptKind {
    #[default]
    None,
    Official,
    Auto,
}

impl std::fmt::Display for TranscriptKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TranscriptKind::None => write!(f, "none"),
            TranscriptKind::Official => write!(f, "official"),
            TranscriptKind::Auto => write!(f, "auto"),
        }
    }
}

/// Caption text for a video, or the empty `none` variant
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TranscriptResult {
    pub available: bool,
    #[serde(rename = "type")]
    pub kind: TranscriptKind,
    pub text: String,
}

impl TranscriptResult {
    /// Used both when the caller opts out and when no captions could be fetched
    pub fn none() -> Self {
        Self::default()
    }
}

/// Complete analysis payload returned to callers
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AnalysisResponse {
    pub platform: Platform,
    pub video_id: String,
    pub metadata: VideoMetadata,
    pub transcript: TranscriptResult,
    pub analysis_ready: bool,
    pub limitations: &'static [&'static str],
}

impl AnalysisResponse {
    pub fn new(video: VideoReference, metadata: VideoMetadata, transcript: TranscriptResult) -> Self {
        Self {
            platform: video.platform,
            video_id: video.id,
            metadata,
            transcript,
            analysis_ready: true,
            limitations: LIMITATIONS,
        }
    }
}

/// True if `host` is `domain` itself or one of its subdomains
fn host_matches(host: &str, domain: &str) -> bool {
    host == domain
        || host
            .strip_suffix(domain)
            .is_some_and(|prefix| prefix.ends_with('.'))
}

/// Extract video ID from a YouTube URL
///
/// `youtu.be` links yield the path without its leading `/`; `youtube.com`
/// links yield the `v` query parameter. Subdomains such as `www.` and `m.`
/// are accepted, lookalike hosts such as `notyoutube.com` are not.
pub fn extract_video_id(input: &str) -> Option<String> {
    let url = Url::parse(input.trim()).ok()?;
    let host = url.host_str()?.to_ascii_lowercase();

    let id = if host_matches(&host, SHORT_LINK_HOST) {
        let path = url.path();
        path.strip_prefix('/').unwrap_or(path).to_string()
    } else if host_matches(&host, CANONICAL_HOST) {
        url.query_pairs()
            .find(|(key, _)| key == "v")
            .map(|(_, value)| value.into_owned())?
    } else {
        return None;
    };

    // Empty ids can never resolve upstream
    if id.is_empty() { None } else { Some(id) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_url() {
        assert_eq!(extract_video_id("https://youtu.be/abc123"), Some("abc123".to_string()));
    }

    #[test]
    fn test_short_url_ignores_query() {
        assert_eq!(
            extract_video_id("https://youtu.be/dQw4w9WgXcQ?t=30"),
            Some("dQw4w9WgXcQ".to_string())
        );
    }

    #[test]
    fn test_short_url_keeps_rest_of_path() {
        assert_eq!(extract_video_id("https://youtu.be/abc/def"), Some("abc/def".to_string()));
    }

    #[test]
    fn test_short_url_empty_path() {
        assert_eq!(extract_video_id("https://youtu.be/"), None);
        assert_eq!(extract_video_id("https://youtu.be"), None);
    }

    #[test]
    fn test_watch_url() {
        assert_eq!(
            extract_video_id("https://www.youtube.com/watch?v=dQw4w9WgXcQ"),
            Some("dQw4w9WgXcQ".to_string())
        );
    }

    #[test]
    fn test_watch_url_param_order() {
        let expected = Some("dQw4w9WgXcQ".to_string());
        assert_eq!(extract_video_id("https://www.youtube.com/watch?v=dQw4w9WgXcQ&t=120"), expected);
        assert_eq!(
            extract_video_id("https://www.youtube.com/watch?list=PLrAXtmRdnEQy&v=dQw4w9WgXcQ&index=2"),
            expected
        );
    }

    #[test]
    fn test_watch_url_subdomains() {
        assert_eq!(extract_video_id("https://m.youtube.com/watch?v=abc"), Some("abc".to_string()));
        assert_eq!(extract_video_id("https://youtube.com/watch?v=abc"), Some("abc".to_string()));
        assert_eq!(extract_video_id("https://WWW.YOUTUBE.COM/watch?v=abc"), Some("abc".to_string()));
    }

    #[test]
    fn test_watch_url_without_v() {
        assert_eq!(extract_video_id("https://www.youtube.com/playlist?list=PLrAXtmRdnEQy"), None);
        assert_eq!(extract_video_id("https://www.youtube.com/watch?v="), None);
    }

    #[test]
    fn test_unsupported_host() {
        assert_eq!(extract_video_id("https://vimeo.com/123456789"), None);
        assert_eq!(extract_video_id("https://notyoutube.com/watch?v=abc"), None);
        assert_eq!(extract_video_id("https://youtube.com.evil.example/watch?v=abc"), None);
    }

    #[test]
    fn test_unparsable_input() {
        assert_eq!(extract_video_id("not a url"), None);
        assert_eq!(extract_video_id("dQw4w9WgXcQ"), None);
        assert_eq!(extract_video_id(""), None);
    }

    #[test]
    fn test_video_reference_from_url() {
        let video = VideoReference::from_url("https://youtu.be/abc123").unwrap();
        assert_eq!(video.platform, Platform::Youtube);
        assert_eq!(video.id, "abc123");
        assert!(VideoReference::from_url("https://vimeo.com/1").is_none());
    }

    #[test]
    fn test_platform_from_name() {
        assert_eq!(Platform::from_name("youtube"), Some(Platform::Youtube));
        assert_eq!(Platform::from_name("YouTube"), None);
        assert_eq!(Platform::from_name("tiktok"), None);
    }

    #[test]
    fn test_default_transcript_serialization() {
        let json = serde_json::to_value(TranscriptResult::none()).unwrap();
        assert_eq!(json, serde_json::json!({"available": false, "type": "none", "text": ""}));
    }
}
