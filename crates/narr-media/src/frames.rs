//! Frame sampling at cue timestamps.

use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::debug;

use crate::command::{FfmpegCommand, FfmpegRunner};
use crate::error::{MediaError, MediaResult};
use narr_models::encoding::{FRAME_JPEG_QUALITY, FRAME_SCALE_WIDTH};

/// Reset the frame workspace, dropping frames from any previous run.
pub async fn prepare_frames_dir(dir: impl AsRef<Path>) -> MediaResult<()> {
    let dir = dir.as_ref();
    match fs::remove_dir_all(dir).await {
        Ok(()) => {}
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(e) => return Err(e.into()),
    }
    fs::create_dir_all(dir).await?;
    Ok(())
}

/// Sample one still frame at `timestamp_secs` into `frames_dir`.
///
/// The frame is scaled down to the vision input width before encoding.
/// Any FFmpeg failure (including seeking past the end of the stream, which
/// succeeds but writes nothing) surfaces as [`MediaError::FrameUnavailable`]
/// so the caller can skip the cue and continue.
pub async fn sample_frame(
    video: impl AsRef<Path>,
    cue_index: usize,
    timestamp_secs: f64,
    frames_dir: impl AsRef<Path>,
) -> MediaResult<PathBuf> {
    let output = frame_path(frames_dir.as_ref(), cue_index);

    let cmd = FfmpegCommand::new(video.as_ref(), &output)
        .seek(timestamp_secs)
        .single_frame()
        .video_filter(format!("scale={}:-2", FRAME_SCALE_WIDTH))
        .output_arg("-q:v")
        .output_arg(FRAME_JPEG_QUALITY.to_string());

    match FfmpegRunner::new().run(&cmd).await {
        Ok(()) => {}
        Err(e) => {
            debug!("Frame sampling at {:.3}s failed: {}", timestamp_secs, e);
            return Err(MediaError::FrameUnavailable { timestamp_secs });
        }
    }

    // ffmpeg exits 0 when the seek lands past the last frame
    if !fs::try_exists(&output).await.unwrap_or(false) {
        return Err(MediaError::FrameUnavailable { timestamp_secs });
    }

    Ok(output)
}

fn frame_path(dir: &Path, cue_index: usize) -> PathBuf {
    dir.join(format!("frame_{:04}.jpg", cue_index))
}
