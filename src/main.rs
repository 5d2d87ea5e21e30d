use anyhow::{Context, Result};
use clap::Parser;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use channel_insights::cli::{Cli, Commands, ReportFormat, TranscriptFormat};
use channel_insights::config::Config;
use channel_insights::output;
use channel_insights::pipeline::ChannelPipeline;
use channel_insights::resolver::{resolve_video, resolve_video_input};
use channel_insights::transcript::{fetch_all, TranscriptFetcher, TranscriptOutcome, TranscriptSource};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let default_filter = if cli.verbose {
        "channel_insights=debug"
    } else {
        "channel_insights=warn"
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    if let Err(err) = run(cli).await {
        eprintln!("{} {:#}", style("Error:").red().bold(), err);
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    if let Commands::Config { init: true, .. } = cli.command {
        let path = Config::default().save(cli.config.as_deref())?;
        println!("{} Configuration written to: {}", style("✓").green(), path.display());
        return Ok(());
    }

    let config = Config::load(cli.config.as_deref())?.with_api_key(cli.api_key.clone());

    match cli.command {
        Commands::Report {
            url,
            output,
            format,
            max_videos,
            max_shorts,
        } => {
            let pipeline = ChannelPipeline::new(&config)?.with_limits(max_videos, max_shorts);
            report(&pipeline, &url, output, format, cli.quiet).await?;
        }
        Commands::Transcript { inputs, output, format } => {
            let fetcher = TranscriptFetcher::new(&config.transcript_settings())?;
            transcripts(fetcher, &inputs, output, format, cli.quiet).await?;
        }
        Commands::Resolve { url, video } => {
            if video {
                println!("{}", resolve_video(&url)?);
            } else {
                let pipeline = ChannelPipeline::new(&config)?;
                println!("{}", pipeline.resolve(&url).await?);
            }
        }
        Commands::Config { show, .. } => {
            config.display();
            if !show {
                let path = match cli.config {
                    Some(path) => path,
                    None => Config::config_path()?,
                };
                println!();
                println!("Config file: {}", path.display());
            }
        }
    }

    Ok(())
}

fn spinner(quiet: bool, message: &str) -> Result<ProgressBar> {
    if quiet {
        return Ok(ProgressBar::hidden());
    }

    let progress = ProgressBar::new_spinner();
    progress.set_style(ProgressStyle::default_spinner().template("{spinner:.green} [{elapsed_precise}] {msg}")?);
    progress.enable_steady_tick(Duration::from_millis(120));
    progress.set_message(message.to_string());
    Ok(progress)
}

async fn report(
    pipeline: &ChannelPipeline,
    url: &str,
    output: Option<PathBuf>,
    format: ReportFormat,
    quiet: bool,
) -> Result<()> {
    let progress = spinner(quiet, "Analysing channel...")?;
    let analysis = match pipeline.analyze(url).await {
        Ok(analysis) => analysis,
        Err(err) => {
            progress.finish_and_clear();
            return Err(err.into());
        }
    };
    progress.finish_and_clear();

    let content = output::render_report(&analysis, format)?;

    // CSV and HTML always go to a file
    let target = output.or_else(|| {
        matches!(format, ReportFormat::Csv | ReportFormat::Html)
            .then(|| output::default_report_filename(analysis.channel.as_str(), format))
    });

    match target {
        Some(path) => {
            output::save_to_file(&content, &path)?;
            println!("{} Report saved to: {}", style("✓").green(), path.display());
        }
        None => output::print_to_console(&content),
    }

    Ok(())
}

async fn transcripts(
    fetcher: TranscriptFetcher,
    inputs: &[String],
    output: Option<PathBuf>,
    format: TranscriptFormat,
    quiet: bool,
) -> Result<()> {
    if let [input] = inputs {
        let video_id = resolve_video_input(input)?;
        let progress = spinner(quiet, "Fetching transcript...")?;
        let outcome = fetcher.fetch(&video_id).await;
        progress.finish_and_clear();

        if let TranscriptOutcome::Failed { reason } = &outcome {
            tracing::warn!("Transcript for {} failed: {}", video_id, reason);
        }

        let content = output::render_transcript(&video_id, &outcome, format)?;
        match output {
            Some(path) => {
                output::save_to_file(&content, &path)?;
                println!("{} Transcript saved to: {}", style("✓").green(), path.display());
            }
            None => output::print_to_console(&content),
        }
        return Ok(());
    }

    let progress = spinner(quiet, &format!("Fetching {} transcripts...", inputs.len()))?;
    let source: Arc<dyn TranscriptSource> = Arc::new(fetcher);
    let batch = fetch_all(source, inputs).await;
    progress.finish_and_clear();

    let mut entries: Vec<_> = batch.into_iter().collect();
    entries.sort_by(|a, b| a.0.cmp(&b.0));

    for (key, outcome) in &entries {
        let content = output::render_transcript(key, outcome, format)?;
        match &output {
            Some(dir) => {
                let path = dir.join(output::default_transcript_filename(key, format));
                output::save_to_file(&content, &path)
                    .with_context(|| format!("Failed to save transcript for {}", key))?;
                let mark = if outcome.is_failure() {
                    style("✗").red()
                } else {
                    style("✓").green()
                };
                println!("{} {} -> {}", mark, key, path.display());
            }
            None => {
                println!("{}", style(format!("==> {} <==", key)).bold());
                output::print_to_console(&content);
                println!();
            }
        }
    }

    let failed = entries.iter().filter(|(_, outcome)| outcome.is_failure()).count();
    if failed > 0 {
        eprintln!(
            "{} {} of {} transcripts could not be retrieved",
            style("Warning:").yellow(),
            failed,
            entries.len()
        );
    }

    Ok(())
}
