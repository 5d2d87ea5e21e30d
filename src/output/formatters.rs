use chrono::SecondsFormat;
use html_escape::{encode_double_quoted_attribute as attr, encode_text as text};
use serde_json::json;
use std::fmt::Write;

use crate::metadata::{is_likely_short, ChannelInfo, VideoRecord};
use crate::report::{ChannelReport, GrowthWindow};
use crate::transcript::TranscriptOutcome;
use crate::utils::{display_iso_duration, format_count};
use crate::{InsightsError, Result};

const NOT_AVAILABLE: &str = "N/A";

const VIDEO_COLUMNS: [&str; 10] = [
    "Video ID",
    "Title",
    "Type",
    "Published At",
    "Views",
    "Likes",
    "Comments",
    "Duration",
    "Tags",
    "Thumbnail",
];

fn or_na(value: Option<u64>) -> String {
    value.map(|n| n.to_string()).unwrap_or_else(|| NOT_AVAILABLE.to_string())
}

fn csv_writer(buffer: Vec<u8>) -> csv::Writer<Vec<u8>> {
    csv::WriterBuilder::new()
        .flexible(true)
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(buffer)
}

fn finish(writer: csv::Writer<Vec<u8>>) -> Result<Vec<u8>> {
    writer.into_inner().map_err(|e| InsightsError::Export(e.to_string()))
}

/// Channel summary block, a blank line, then one row per video
pub fn format_report_csv(info: &ChannelInfo, videos: &[VideoRecord]) -> Result<String> {
    let snippet = &info.snippet;
    let description = if snippet.description.trim().is_empty() {
        NOT_AVAILABLE
    } else {
        snippet.description.as_str()
    };

    let mut summary = csv_writer(Vec::new());
    summary.write_record(["Channel Report"])?;
    summary.write_record(["Channel Title", snippet.title.as_str()])?;
    summary.write_record(["Description", description])?;
    summary.write_record(["Subscribers".to_string(), or_na(info.subscribers())])?;
    summary.write_record(["Views".to_string(), or_na(info.statistics.view_count)])?;
    summary.write_record(["Video Count".to_string(), or_na(info.statistics.video_count)])?;
    summary.write_record(["Joined".to_string(), snippet.published_at.date_naive().to_string()])?;
    summary.write_record(["Country", snippet.country.as_deref().unwrap_or(NOT_AVAILABLE)])?;

    let mut buffer = finish(summary)?;
    buffer.push(b'\n');

    let mut table = csv_writer(buffer);
    table.write_record(VIDEO_COLUMNS)?;
    for video in videos {
        let kind = if is_likely_short(&video.duration) { "Short" } else { "Regular" };
        let tags = if video.tags.is_empty() {
            NOT_AVAILABLE.to_string()
        } else {
            video.tags.join(", ")
        };

        table.write_record([
            video.id.clone(),
            video.title.clone(),
            kind.to_string(),
            video.published_at.to_rfc3339_opts(SecondsFormat::Secs, true),
            video.view_count.to_string(),
            video.like_count.to_string(),
            video.comment_count.to_string(),
            video.duration.clone(),
            tags,
            video.thumbnails.high_url().unwrap_or(NOT_AVAILABLE).to_string(),
        ])?;
    }

    String::from_utf8(finish(table)?).map_err(|e| InsightsError::Export(e.to_string()))
}

pub fn format_report_json(report: &ChannelReport) -> Result<String> {
    Ok(serde_json::to_string_pretty(report)?)
}

/// Console summary of a report
pub fn format_report_text(report: &ChannelReport) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "{}", report.title);
    let _ = writeln!(out, "{}", "=".repeat(report.title.chars().count().max(3)));
    let _ = writeln!(out, "Channel ID:    {}", report.id);
    let _ = writeln!(
        out,
        "Subscribers:   {}",
        report.subscribers.map(format_count).unwrap_or_else(|| "Hidden".to_string())
    );
    let _ = writeln!(out, "Total views:   {}", format_count(report.views));
    let _ = writeln!(
        out,
        "Videos:        {}",
        report.video_count.map(|n| n.to_string()).unwrap_or_else(|| NOT_AVAILABLE.to_string())
    );
    let _ = writeln!(out, "Created:       {}", report.created.date_naive());
    let _ = writeln!(out, "Country:       {}", report.country.as_deref().unwrap_or(NOT_AVAILABLE));
    let _ = writeln!(out);

    let _ = writeln!(out, "Estimated income (rough)");
    let _ = writeln!(out, "  Monthly:     {}", report.income.monthly);
    let _ = writeln!(out, "  Lifetime:    {}", report.income.lifetime);
    let _ = writeln!(out);

    let _ = writeln!(out, "Contact email: {}", report.email);
    if report.social_links.is_empty() {
        let _ = writeln!(out, "Social links:  none found");
    } else {
        let _ = writeln!(out, "Social links:");
        for (platform, links) in &report.social_links {
            let _ = writeln!(out, "  {}: {}", platform, links.join(", "));
        }
    }
    let _ = writeln!(out);

    let _ = writeln!(out, "Growth by publish date");
    for window in GrowthWindow::ALL {
        match report.growth.series(window) {
            None => {
                let _ = writeln!(out, "  {}: no uploads", window);
            }
            Some(series) => {
                let _ = writeln!(out, "  {}:", window);
                for i in 0..series.len() {
                    let _ = writeln!(
                        out,
                        "    {}  views {:>8}  likes {:>7}  comments {:>6}",
                        series.dates[i],
                        format_count(series.views[i]),
                        format_count(series.likes[i]),
                        format_count(series.comments[i])
                    );
                }
            }
        }
    }
    let _ = writeln!(out);

    let _ = writeln!(
        out,
        "Latest videos ({} shown, {} likely shorts)",
        report.videos.len(),
        report.shorts_count
    );
    for entry in &report.videos {
        let video = &entry.video;
        let _ = writeln!(
            out,
            "  {} {}{}",
            video.published_at.date_naive(),
            video.title,
            if entry.is_short { " [short]" } else { "" }
        );
        let _ = writeln!(
            out,
            "      {} views | {} likes | {} comments | {} | https://www.youtube.com/watch?v={}",
            format_count(video.view_count),
            format_count(video.like_count),
            format_count(video.comment_count),
            display_iso_duration(&video.duration),
            video.id
        );
    }

    if !report.shorts.is_empty() {
        let _ = writeln!(out);
        let _ = writeln!(out, "Shorts ({})", report.shorts.len());
        for short in &report.shorts {
            let _ = writeln!(
                out,
                "  {} {} ({} views) https://www.youtube.com/shorts/{}",
                short.published_at.date_naive(),
                short.title,
                format_count(short.view_count),
                short.id
            );
        }
    }

    out
}

/// Standalone HTML page for a report
pub fn format_report_html(report: &ChannelReport) -> String {
    let mut html = String::new();
    let title = text(&report.title);

    let _ = writeln!(html, "<!DOCTYPE html>\n<html lang=\"en\">\n<head>");
    let _ = writeln!(html, "<meta charset=\"utf-8\">");
    let _ = writeln!(html, "<title>{} - Channel Report</title>", title);
    let _ = writeln!(
        html,
        "<style>body{{font-family:sans-serif;max-width:960px;margin:2rem auto}}table{{border-collapse:collapse;width:100%}}td,th{{border:1px solid #ddd;padding:4px 8px;text-align:left}}.short{{color:#c00}}</style>"
    );
    let _ = writeln!(html, "</head>\n<body>");

    if let Some(banner) = &report.banner {
        let _ = writeln!(html, "<img class=\"banner\" src=\"{}\" alt=\"banner\" width=\"100%\">", attr(banner));
    }
    if let Some(thumbnail) = &report.thumbnail {
        let _ = writeln!(html, "<img class=\"avatar\" src=\"{}\" alt=\"{}\">", attr(thumbnail), attr(&report.title));
    }
    let _ = writeln!(html, "<h1>{}</h1>", title);
    let _ = writeln!(html, "<p class=\"description\">{}</p>", text(&report.description));

    let _ = writeln!(html, "<table class=\"stats\">");
    let rows = [
        ("Channel ID", report.id.clone()),
        (
            "Subscribers",
            report.subscribers.map(|n| n.to_string()).unwrap_or_else(|| "Hidden".to_string()),
        ),
        ("Views", report.views.to_string()),
        (
            "Videos",
            report.video_count.map(|n| n.to_string()).unwrap_or_else(|| NOT_AVAILABLE.to_string()),
        ),
        ("Shorts in latest uploads", report.shorts_count.to_string()),
        ("Created", report.created.date_naive().to_string()),
        ("Country", report.country.clone().unwrap_or_else(|| NOT_AVAILABLE.to_string())),
        ("Monthly income (est.)", report.income.monthly.to_string()),
        ("Lifetime income (est.)", report.income.lifetime.to_string()),
        ("Email", report.email.clone()),
    ];
    for (label, value) in rows {
        let _ = writeln!(html, "<tr><th>{}</th><td>{}</td></tr>", label, text(&value));
    }
    let _ = writeln!(html, "</table>");

    if !report.social_links.is_empty() {
        let _ = writeln!(html, "<h2>Social links</h2>\n<ul>");
        for (platform, links) in &report.social_links {
            for link in links {
                let href = if link.starts_with("http") {
                    link.clone()
                } else {
                    format!("https://{}", link)
                };
                let _ = writeln!(
                    html,
                    "<li>{}: <a href=\"{}\">{}</a></li>",
                    text(platform),
                    attr(&href),
                    text(link)
                );
            }
        }
        let _ = writeln!(html, "</ul>");
    }

    let _ = writeln!(html, "<h2>Growth</h2>");
    for window in GrowthWindow::ALL {
        let _ = writeln!(html, "<h3>{}</h3>", window);
        match report.growth.series(window) {
            None => {
                let _ = writeln!(html, "<p>No uploads in this period.</p>");
            }
            Some(series) => {
                let _ = writeln!(html, "<table><tr><th>Date</th><th>Views</th><th>Likes</th><th>Comments</th></tr>");
                for i in 0..series.len() {
                    let _ = writeln!(
                        html,
                        "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>",
                        series.dates[i], series.views[i], series.likes[i], series.comments[i]
                    );
                }
                let _ = writeln!(html, "</table>");
            }
        }
    }

    let _ = writeln!(html, "<h2>Latest videos</h2>");
    let _ = writeln!(
        html,
        "<table><tr><th></th><th>Title</th><th>Published</th><th>Views</th><th>Likes</th><th>Comments</th></tr>"
    );
    for entry in &report.videos {
        let video = &entry.video;
        let thumb = video
            .thumbnails
            .medium_url()
            .map(|url| format!("<img src=\"{}\" alt=\"\" width=\"160\">", attr(url)))
            .unwrap_or_default();
        let _ = writeln!(
            html,
            "<tr><td>{}</td><td><a href=\"https://www.youtube.com/watch?v={}\">{}</a>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>",
            thumb,
            attr(&video.id),
            text(&video.title),
            if entry.is_short { " <span class=\"short\">Short</span>" } else { "" },
            video.published_at.date_naive(),
            video.view_count,
            video.like_count,
            video.comment_count
        );
    }
    let _ = writeln!(html, "</table>");

    if !report.shorts.is_empty() {
        let _ = writeln!(html, "<h2>Shorts</h2>\n<ul>");
        for short in &report.shorts {
            let _ = writeln!(
                html,
                "<li><a href=\"https://www.youtube.com/shorts/{}\">{}</a> ({} views)</li>",
                attr(&short.id),
                text(&short.title),
                short.view_count
            );
        }
        let _ = writeln!(html, "</ul>");
    }

    let _ = writeln!(
        html,
        "<footer>Generated {}</footer>\n</body>\n</html>",
        report.generated_at.to_rfc3339_opts(SecondsFormat::Secs, true)
    );
    html
}

/// Title line, author line, blank line, transcript body
pub fn format_transcript_text(outcome: &TranscriptOutcome) -> String {
    format!("Title: {}\nAuthor: {}\n\n{}", outcome.title(), outcome.author(), outcome.body())
}

pub fn format_transcript_json(video_id: &str, outcome: &TranscriptOutcome) -> Result<String> {
    let value = json!({
        "video_id": video_id,
        "title": outcome.title(),
        "author": outcome.author(),
        "transcript": outcome.body(),
        "outcome": outcome,
    });
    Ok(serde_json::to_string_pretty(&value)?)
}

pub fn format_transcript_html(video_id: &str, outcome: &TranscriptOutcome) -> String {
    let mut html = String::new();
    let _ = writeln!(html, "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">");
    let _ = writeln!(html, "<title>{} - Transcript</title>\n</head>\n<body>", text(outcome.title()));
    let _ = writeln!(html, "<h1>{}</h1>", text(outcome.title()));
    let _ = writeln!(html, "<p class=\"author\">{}</p>", text(outcome.author()));
    let _ = writeln!(
        html,
        "<p><a href=\"https://www.youtube.com/watch?v={}\">Watch on YouTube</a></p>",
        attr(video_id)
    );
    let _ = writeln!(html, "<pre class=\"transcript\">{}</pre>", text(&outcome.body()));
    let _ = writeln!(html, "</body>\n</html>");
    html
}
