use eyre::Result;

use crate::AnalysisResponse;

/// Render the response exactly as the HTTP endpoint returns it
pub fn render_json(resp: &AnalysisResponse) -> Result<String> {
    Ok(serde_json::to_string(resp)?)
}

pub fn render_pretty(resp: &AnalysisResponse) -> Result<String> {
    Ok(serde_json::to_string_pretty(resp)?)
}

/// Render a human-readable summary, followed by the transcript if there is one
pub fn render_text(resp: &AnalysisResponse) -> String {
    let m = &resp.metadata;
    let subscribers = m
        .channel
        .subscribers
        .map_or_else(|| "unknown".to_string(), |n| n.to_string());

    let mut lines = vec![
        format!("Title:       {}", m.title),
        format!("Video:       {} ({})", resp.video_id, resp.platform),
        format!("Channel:     {} ({subscribers} subscribers)", m.channel.name),
        format!("Published:   {}", m.publish_date),
        format!("Duration:    {}", format_duration(m.duration_seconds)),
        format!("Views:       {}", m.views),
        format!("Likes:       {}", m.likes),
        format!("Comments:    {}", m.comments),
        format!("Transcript:  {}", resp.transcript.kind),
    ];

    for limitation in resp.limitations {
        lines.push(format!("Limitation:  {limitation}"));
    }

    if resp.transcript.available {
        lines.push(String::new());
        lines.push(resp.transcript.text.trim_end().to_string());
    }

    lines.join("\n")
}

fn format_duration(total: u64) -> String {
    let (h, m, s) = (total / 3600, (total % 3600) / 60, total % 60);
    if h > 0 {
        format!("{h}:{m:02}:{s:02}")
    } else {
        format!("{m}:{s:02}")
    }
}
