//! Narration pipeline binary.

use std::path::PathBuf;

use tracing::{error, info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use narr_models::{format_seconds, Timeline};
use narr_pipeline::{NarrationPipeline, PipelineConfig};

fn print_usage() {
    eprintln!("Usage: narrate <video> <timestamp>...");
    eprintln!();
    eprintln!("Timestamps are seconds into the video, strictly increasing.");
    eprintln!("Formats: SS, SS.mmm, MM:SS, HH:MM:SS (e.g. 3 28 1:46)");
}

#[tokio::main]
async fn main() {
    // Install rustls crypto provider (required for TLS/HTTPS)
    rustls::crypto::ring::default_provider()
        .install_default()
        .expect("Failed to install rustls crypto provider");

    // Load environment variables
    dotenvy::dotenv().ok();

    // Initialize tracing with colored output for dev, JSON for production
    let use_json = std::env::var("LOG_FORMAT")
        .map(|v| v.to_lowercase() == "json")
        .unwrap_or(false);

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    if use_json {
        tracing_subscriber::registry()
            .with(fmt::layer().json())
            .with(env_filter)
            .init();
    } else {
        tracing_subscriber::registry()
            .with(
                fmt::layer()
                    .with_ansi(true)
                    .with_target(true)
                    .with_thread_ids(false)
                    .with_file(false)
                    .with_line_number(false),
            )
            .with(env_filter)
            .init();
    }

    let args: Vec<String> = std::env::args().skip(1).collect();
    if args.len() < 2 {
        print_usage();
        std::process::exit(2);
    }

    let video = PathBuf::from(&args[0]);
    let timeline = match Timeline::parse(&args[1..]) {
        Ok(timeline) => timeline,
        Err(e) => {
            error!("Invalid cue timestamps: {}", e);
            print_usage();
            std::process::exit(2);
        }
    };

    let config = PipelineConfig::from_env();
    info!("Pipeline config: {:?}", config);

    let pipeline = match NarrationPipeline::from_env(config) {
        Ok(pipeline) => pipeline,
        Err(e) => {
            error!("Failed to create pipeline: {}", e);
            std::process::exit(1);
        }
    };

    match pipeline.run(&video, &timeline).await {
        Ok(report) => {
            info!(
                "Narrated {} of {} cues into {}",
                report.cues_narrated,
                report.cues_total,
                report.narrated_video.display()
            );
            for skipped in &report.skipped {
                warn!(
                    "Skipped cue {} at {} during {}: {}",
                    skipped.cue_index,
                    format_seconds(skipped.timestamp_secs),
                    skipped.stage,
                    skipped.reason
                );
            }
            for overlap in &report.overlaps {
                warn!(
                    "Cue {} overlapped by {:.2}s; narration drifts rather than losing words",
                    overlap.cue_index, overlap.overrun_secs
                );
            }
        }
        Err(e) => {
            error!("Narration run failed: {}", e);
            std::process::exit(1);
        }
    }
}
