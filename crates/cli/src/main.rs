use std::path::PathBuf;
use std::process;
use std::sync::Arc;

use clap::Parser;

use intervox_core::media::infrastructure::ffmpeg_media_loader::FfmpegMediaLoader;
use intervox_core::pipeline::chunk_executor::{FailurePolicy, RunConfig};
use intervox_core::pipeline::events::{self, PipelineEvent};
use intervox_core::pipeline::infrastructure::threaded_chunk_executor::ThreadedChunkExecutor;
use intervox_core::pipeline::transcribe_media_use_case::TranscribeMediaUseCase;
use intervox_core::pipeline::transcription_engine::TranscriptionEngine;
use intervox_core::recognition::domain::model_size::ModelSize;
use intervox_core::recognition::infrastructure::model_manager::ModelManager;
use intervox_core::shared::constants::DEFAULT_CHUNK_DURATION_SECS;
use intervox_core::transcript::export::{self, ExportFormat};

/// Timestamped transcription of interview audio and video recordings.
#[derive(Parser)]
#[command(name = "intervox")]
struct Cli {
    /// Input audio or video file (mp3, wav, m4a, mp4, avi, mov).
    input: Option<PathBuf>,

    /// Output file. The rendered transcript goes to stdout if omitted.
    output: Option<PathBuf>,

    /// Model size: base, small, medium, or large.
    #[arg(long, default_value = "base")]
    model: String,

    /// Chunk length in seconds.
    #[arg(long, default_value_t = DEFAULT_CHUNK_DURATION_SECS)]
    chunk_duration: f64,

    /// Output format: txt, srt, or json.
    #[arg(long, default_value = "txt")]
    format: String,

    /// What to do when one chunk fails: abort or placeholder.
    #[arg(long, default_value = "abort")]
    on_error: String,

    /// Worker threads for chunk transcription (1 = sequential).
    #[arg(long, default_value = "1")]
    workers: usize,

    /// Delete downloaded model weights and cached handles, then exit.
    #[arg(long)]
    clear_model_cache: bool,
}

fn main() {
    env_logger::init();

    if let Err(e) = run() {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    validate(&cli)?;

    let manager = Arc::new(ModelManager::with_whisper(Some(Arc::new(
        download_progress,
    ))));

    if cli.clear_model_cache {
        manager.evict_all()?;
        log::info!("Model cache cleared");
        return Ok(());
    }

    let model_size: ModelSize = cli.model.parse()?;
    let format = parse_format(&cli.format);
    let input = cli.input.expect("validated");

    let engine = if cli.workers > 1 {
        TranscriptionEngine::new(Box::new(ThreadedChunkExecutor::new(cli.workers)))
    } else {
        TranscriptionEngine::sequential()
    };
    let use_case = TranscribeMediaUseCase::new(Box::new(FfmpegMediaLoader::new()), manager, engine);

    let (event_tx, event_rx) = events::channel();
    let listener = std::thread::spawn(move || {
        for event in event_rx {
            match event {
                PipelineEvent::MediaLoadStarted { path } => {
                    log::info!("Loading {}", path.display());
                }
                PipelineEvent::MediaLoaded { duration } => {
                    log::info!("Decoded {duration:.1}s of audio");
                }
                PipelineEvent::ChunkingCompleted { chunks } => {
                    log::info!("Split into {chunks} chunk(s)");
                }
                PipelineEvent::ModelLoadStarted { size } => {
                    log::info!(
                        "Loading {size} model (~{} MB)",
                        size.approx_size_bytes() / 1_000_000
                    );
                }
                PipelineEvent::ModelLoadCompleted { size } => {
                    log::info!("{size} model ready");
                }
                PipelineEvent::ChunkStarted { .. } | PipelineEvent::ChunkCompleted { .. } => {}
            }
        }
    });

    let config = RunConfig {
        failure_policy: parse_policy(&cli.on_error),
        on_progress: Some(Box::new(|done, total| {
            eprint!("\rTranscribing chunk {done}/{total}");
            true
        })),
        events: Some(event_tx),
        ..RunConfig::default()
    };

    let result = use_case.run(&input, model_size, cli.chunk_duration, &config);
    drop(config);
    let _ = listener.join();
    eprintln!();

    let transcript = result?;

    match cli.output {
        Some(ref path) => {
            export::write_transcript(path, &transcript, format)?;
            log::info!(
                "Transcript ({} segments) written to {}",
                transcript.len(),
                path.display()
            );
        }
        None => {
            print!("{}", export::render(&transcript, format)?);
        }
    }

    Ok(())
}

fn validate(cli: &Cli) -> Result<(), Box<dyn std::error::Error>> {
    if cli.clear_model_cache {
        return Ok(());
    }
    let input = match cli.input {
        Some(ref input) => input,
        None => return Err("Input file is required unless --clear-model-cache is used".into()),
    };
    if !input.exists() {
        return Err(format!("Input file not found: {}", input.display()).into());
    }
    if !cli.chunk_duration.is_finite() || cli.chunk_duration <= 0.0 {
        return Err(format!(
            "Chunk duration must be a positive number of seconds, got {}",
            cli.chunk_duration
        )
        .into());
    }
    if cli.workers == 0 {
        return Err("Workers must be at least 1".into());
    }
    if cli.model.parse::<ModelSize>().is_err() {
        return Err(format!(
            "Model must be one of: base, small, medium, large, got '{}'",
            cli.model
        )
        .into());
    }
    if !["txt", "srt", "json"].contains(&cli.format.as_str()) {
        return Err(format!(
            "Format must be one of: txt, srt, json, got '{}'",
            cli.format
        )
        .into());
    }
    if cli.on_error != "abort" && cli.on_error != "placeholder" {
        return Err(format!(
            "On-error policy must be 'abort' or 'placeholder', got '{}'",
            cli.on_error
        )
        .into());
    }
    Ok(())
}

fn parse_format(format: &str) -> ExportFormat {
    match format {
        "srt" => ExportFormat::Srt,
        "json" => ExportFormat::Json,
        _ => ExportFormat::Plain,
    }
}

fn parse_policy(policy: &str) -> FailurePolicy {
    if policy == "placeholder" {
        FailurePolicy::Placeholder
    } else {
        FailurePolicy::Abort
    }
}

fn download_progress(downloaded: u64, total: u64) {
    if total > 0 {
        let pct = (downloaded as f64 / total as f64 * 100.0) as u32;
        eprint!("\rDownloading model weights... {pct}%");
    } else {
        eprint!("\rDownloading model weights... {downloaded} bytes");
    }
}
