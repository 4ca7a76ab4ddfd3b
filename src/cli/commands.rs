//! Command implementations

use std::io::Write;
use std::path::Path;

use anyhow::{bail, Context, Result};
use serde::Serialize;
use tracing::{info, warn};

use crate::adapters::ArgsFilePicker;
use crate::app::{AppContainer, ExportOutcome};
use crate::cli::args::{ProbeArgs, TimelineArgs};
use crate::domain::model::MediaMetadata;
use crate::domain::store::EditStore;
use crate::render::{ExportScope, FfmpegCommandBuilder, ProgressCallback, RenderJob, RenderRequestBuilder};
use crate::utils::format_clock;

/// Execute the probe command
pub async fn probe(container: &dyn AppContainer, args: ProbeArgs) -> Result<()> {
    info!(input = %args.input.display(), "Starting probe");

    let metadata = container
        .probe_port()
        .probe(&args.input)
        .await
        .with_context(|| format!("Failed to probe {}", args.input.display()))?;

    if args.json {
        let json = serde_json::to_string_pretty(&metadata)
            .context("Failed to serialize media info to JSON")?;
        println!("{}", json);
    } else {
        display_media_info(&args.input, &metadata);
    }
    Ok(())
}

/// Import the `--clip` sources in order and apply their trims
pub async fn build_timeline(container: &dyn AppContainer, args: &TimelineArgs) -> Result<EditStore> {
    let mut store = EditStore::new();
    let picker = ArgsFilePicker::sources(args.clips.iter().map(|spec| spec.path.clone()).collect());

    let ids = container
        .import_interactor()
        .import(&mut store, &picker)
        .await
        .context("Failed to import sources")?;
    if ids.len() != args.clips.len() {
        bail!(
            "Only {} of {} sources could be imported",
            ids.len(),
            args.clips.len()
        );
    }

    for (id, spec) in ids.into_iter().zip(&args.clips) {
        let bounds = spec.bounds();
        if bounds.is_empty() {
            continue;
        }
        store.update_clip(id, bounds);

        if let Some(clip) = store.clip(id) {
            let moved = |requested: Option<f64>, actual: f64| requested.is_some_and(|r| r != actual);
            if moved(spec.start, clip.start()) || moved(spec.end, clip.end()) {
                warn!(
                    path = %spec.path.display(),
                    start = clip.start(),
                    end = clip.end(),
                    "Requested trim was clamped to the source"
                );
            }
        }
    }

    Ok(store)
}

#[derive(Serialize)]
struct PlanReport<'a> {
    job: &'a RenderJob,
    total_duration: f64,
    program: String,
    args: Vec<String>,
}

/// Execute the plan command
pub async fn plan(container: &dyn AppContainer, args: TimelineArgs) -> Result<()> {
    let store = build_timeline(container, &args).await?;
    let job = RenderRequestBuilder::for_scope(&store, ExportScope::Project, args.output.clone())
        .context("Failed to build render job")?;

    let config = container.config();
    let builder = FfmpegCommandBuilder::new().with_threads(config.render.threads);
    let report = PlanReport {
        job: &job,
        total_duration: job.total_duration(),
        program: config.tools.ffmpeg().to_string_lossy().into_owned(),
        args: builder.args(&job),
    };

    let json = serde_json::to_string_pretty(&report).context("Failed to serialize render plan")?;
    println!("{}", json);
    Ok(())
}

/// Execute the render command
pub async fn render(container: &dyn AppContainer, args: TimelineArgs) -> Result<()> {
    let mut store = build_timeline(container, &args).await?;
    let picker = ArgsFilePicker::destination(args.output.clone());

    let outcome = container
        .export_interactor()
        .export(&mut store, ExportScope::Project, &picker, &ConsoleProgress)
        .await
        .with_context(|| format!("Failed to render {}", args.output.display()))?;

    match outcome {
        ExportOutcome::Exported(path) => {
            let size = std::fs::metadata(&path).map(|m| m.len()).unwrap_or(0);
            println!("Rendered {} ({})", path.display(), rendered_size(size));
            Ok(())
        }
        ExportOutcome::Cancelled | ExportOutcome::NothingToExport => {
            bail!("Nothing was rendered")
        }
    }
}

/// Progress line on stderr
pub struct ConsoleProgress;

impl ProgressCallback for ConsoleProgress {
    fn on_start(&self, total_seconds: f64) {
        eprintln!("Rendering {} of video", format_clock(total_seconds));
    }

    fn on_progress(&self, percent: f64) {
        eprint!("\rRendering: {:>3.0}%", percent);
        let _ = std::io::stderr().flush();
    }

    fn on_complete(&self, _output: &Path) {
        eprintln!("\rRendering: 100%");
    }

    fn on_error(&self, error: &str) {
        eprintln!();
        eprintln!("Render failed: {}", error);
    }
}

/// Display media information in human-readable format
fn display_media_info(path: &Path, metadata: &MediaMetadata) {
    println!("Media Information");
    println!("=================");
    println!("File: {}", path.display());
    println!("Format: {}", metadata.format);
    println!("Duration: {:.3}s ({})", metadata.duration, format_clock(metadata.duration));
    match (metadata.width, metadata.height) {
        (Some(width), Some(height)) => println!("Video: {}x{}", width, height),
        _ => println!("Video: none"),
    }
    println!("Audio: {}", if metadata.has_audio { "yes" } else { "no" });
}

/// Output size for the render summary, binary units with one decimal
fn rendered_size(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["KiB", "MiB", "GiB", "TiB"];

    if bytes < 1024 {
        return format!("{} bytes", bytes);
    }

    let mut value = bytes as f64 / 1024.0;
    let mut unit = UNITS[0];
    for next in &UNITS[1..] {
        if value < 1024.0 {
            break;
        }
        value /= 1024.0;
        unit = next;
    }
    format!("{:.1} {}", value, unit)
}
