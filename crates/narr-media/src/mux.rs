//! Muxing the narration track onto the source video.

use std::path::Path;
use tracing::info;

use crate::command::{FfmpegCommand, FfmpegRunner};
use crate::error::{MediaError, MediaResult};
use narr_models::encoding::{MUX_AUDIO_BITRATE, MUX_AUDIO_CODEC};

/// Overlay the assembled narration track onto the source video.
///
/// The video stream is copied untouched; the narration WAV replaces the
/// audio. No `-shortest`: a final clip that runs past the end of the video
/// keeps its narration rather than being cut off.
pub async fn mux_narration(
    video: impl AsRef<Path>,
    track: impl AsRef<Path>,
    output: impl AsRef<Path>,
) -> MediaResult<()> {
    let video = video.as_ref();
    let track = track.as_ref();
    let output = output.as_ref();

    info!(
        "Muxing narration: {} + {} -> {}",
        video.display(),
        track.display(),
        output.display()
    );

    let cmd = FfmpegCommand::new(video, output)
        .add_input(track)
        .output_args(["-map", "0:v:0", "-map", "1:a:0"])
        .output_args(["-c:v", "copy"])
        .audio_codec(MUX_AUDIO_CODEC)
        .audio_bitrate(MUX_AUDIO_BITRATE);

    FfmpegRunner::new().run(&cmd).await.map_err(|e| match e {
        MediaError::FfmpegFailed {
            message, stderr, ..
        } => MediaError::mux_failed(match stderr {
            Some(stderr) if !stderr.trim().is_empty() => {
                format!("{}: {}", message, stderr.trim())
            }
            _ => message,
        }),
        other => other,
    })?;

    info!("Narrated video written: {}", output.display());
    Ok(())
}
