use axum::http::StatusCode;
use log::debug;
use serde_json::Value;
use thiserror::Error;

use crate::youtube::YouTubeClient;
use crate::{AnalysisResponse, Platform, TranscriptResult, VideoReference};

/// Body of an analysis request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalyzeRequest {
    pub platform: Option<String>,
    pub video_url: Option<String>,
    pub include_transcript: bool,
}

impl From<&Value> for AnalyzeRequest {
    /// Fields of the wrong type never fail decoding: a non-string `platform`
    /// is unsupported, a truthy non-string `video_url` is kept in its JSON
    /// form so it fails URL parsing, and `include_transcript` defaults to
    /// true only when the key is absent.
    fn from(body: &Value) -> Self {
        let field = |name: &str| body.as_object().and_then(|obj| obj.get(name));

        let video_url = field("video_url").filter(|v| is_truthy(v)).map(|v| match v {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        });

        Self {
            platform: field("platform").and_then(Value::as_str).map(str::to_string),
            video_url,
            include_transcript: field("include_transcript").is_none_or(is_truthy),
        }
    }
}

/// JSON values that a loosely typed caller would treat as "set"
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Reasons an analysis request is rejected
#[derive(Debug, Error)]
pub enum AnalyzeError {
    #[error("Invalid JSON body")]
    InvalidBody,

    #[error("Unsupported platform or missing URL")]
    UnsupportedPlatform,

    #[error("Invalid YouTube URL")]
    InvalidUrl,

    #[error("Video not found or unavailable")]
    NotFound,

    /// The detail is for logs only, callers see the fixed message
    #[error("Upstream returned malformed data")]
    Upstream(String),
}

impl AnalyzeError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AnalyzeError::InvalidBody | AnalyzeError::UnsupportedPlatform | AnalyzeError::InvalidUrl => {
                StatusCode::BAD_REQUEST
            }
            AnalyzeError::NotFound => StatusCode::NOT_FOUND,
            AnalyzeError::Upstream(_) => StatusCode::BAD_GATEWAY,
        }
    }
}

/// Validate a request and run the analysis it describes
pub async fn analyze(youtube: &YouTubeClient, request: &AnalyzeRequest) -> Result<AnalysisResponse, AnalyzeError> {
    let platform = request.platform.as_deref().and_then(Platform::from_name);
    let video_url = request.video_url.as_deref().filter(|url| !url.is_empty());

    let (Some(Platform::Youtube), Some(video_url)) = (platform, video_url) else {
        return Err(AnalyzeError::UnsupportedPlatform);
    };

    analyze_url(youtube, video_url, request.include_transcript).await
}

/// Resolve `video_url`, fetch its metadata and optionally its captions
pub async fn analyze_url(
    youtube: &YouTubeClient,
    video_url: &str,
    include_transcript: bool,
) -> Result<AnalysisResponse, AnalyzeError> {
    let video = VideoReference::from_url(video_url).ok_or(AnalyzeError::InvalidUrl)?;
    debug!("Analyzing {} video {}", video.platform, video.id);

    let metadata = youtube
        .fetch_metadata(&video.id)
        .await
        .map_err(|e| AnalyzeError::Upstream(format!("{e:#}")))?
        .ok_or(AnalyzeError::NotFound)?;

    let transcript = if include_transcript {
        youtube.fetch_transcript(&video.id).await.unwrap_or_default()
    } else {
        TranscriptResult::none()
    };

    Ok(AnalysisResponse::new(video, metadata, transcript))
}
