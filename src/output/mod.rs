use std::path::{Path, PathBuf};

use crate::cli::{ReportFormat, TranscriptFormat};
use crate::pipeline::ChannelAnalysis;
use crate::transcript::TranscriptOutcome;
use crate::utils::sanitize_filename;
use crate::Result;

pub mod formatters;

pub use formatters::*;

/// Render a channel analysis in the requested format
pub fn render_report(analysis: &ChannelAnalysis, format: ReportFormat) -> Result<String> {
    match format {
        ReportFormat::Text => Ok(format_report_text(&analysis.report)),
        ReportFormat::Json => format_report_json(&analysis.report),
        ReportFormat::Csv => format_report_csv(&analysis.info, &analysis.videos),
        ReportFormat::Html => Ok(format_report_html(&analysis.report)),
    }
}

/// Render one transcript outcome in the requested format
pub fn render_transcript(video_id: &str, outcome: &TranscriptOutcome, format: TranscriptFormat) -> Result<String> {
    match format {
        TranscriptFormat::Text => Ok(format_transcript_text(outcome)),
        TranscriptFormat::Json => format_transcript_json(video_id, outcome),
        TranscriptFormat::Html => Ok(format_transcript_html(video_id, outcome)),
    }
}

/// Save rendered content to file, creating parent directories as needed
pub fn save_to_file(content: &str, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs_err::create_dir_all(parent)?;
        }
    }

    fs_err::write(path, content)?;
    tracing::debug!("Wrote {} bytes to {}", content.len(), path.display());
    Ok(())
}

/// Print rendered content to console
pub fn print_to_console(content: &str) {
    if content.ends_with('\n') {
        print!("{}", content);
    } else {
        println!("{}", content);
    }
}

pub fn default_report_filename(channel_id: &str, format: ReportFormat) -> PathBuf {
    PathBuf::from(format!(
        "youtube_report_{}.{}",
        sanitize_filename(channel_id),
        format.extension()
    ))
}

pub fn default_transcript_filename(video_id: &str, format: TranscriptFormat) -> PathBuf {
    PathBuf::from(format!(
        "transcript_{}.{}",
        sanitize_filename(video_id),
        format.extension()
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_filenames() {
        assert_eq!(
            default_report_filename("UCabc", ReportFormat::Csv),
            PathBuf::from("youtube_report_UCabc.csv")
        );
        assert_eq!(
            default_transcript_filename("dQw4w9WgXcQ", TranscriptFormat::Text),
            PathBuf::from("transcript_dQw4w9WgXcQ.txt")
        );
        assert_eq!(
            default_transcript_filename("bad/input?", TranscriptFormat::Json),
            PathBuf::from("transcript_bad_input_.json")
        );
    }

    #[test]
    fn test_save_to_file_creates_parent_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("out.txt");

        let content = render_transcript("abc", &TranscriptOutcome::failed("offline"), TranscriptFormat::Text).unwrap();
        save_to_file(&content, &path).unwrap();

        let written = fs_err::read_to_string(&path).unwrap();
        assert!(written.starts_with("Title: Error\n"));
        assert!(written.ends_with("Error retrieving transcript: offline"));
    }
}
