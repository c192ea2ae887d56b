//! Narration track assembly.
//!
//! Materializes a [`Schedule`] into one contiguous PCM buffer: per entry,
//! silence for the (clamped) gap plus the clip samples verbatim. No
//! resampling and no gain adjustment; every clip must match the sample spec
//! of the first one.

use std::io::Cursor;
use std::path::Path;
use std::str::FromStr;

use hound::{SampleFormat, WavReader, WavSpec, WavWriter};
use tracing::debug;

use crate::error::{MediaError, MediaResult};
use narr_models::Schedule;

/// Where the silence for a gap is laid down relative to its clip.
///
/// `Before` keeps clips starting at their cue timestamps and is the default;
/// `After` pushes each clip to the previous clip's end and pads behind it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SilencePlacement {
    #[default]
    Before,
    After,
}

impl FromStr for SilencePlacement {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "before" => Ok(Self::Before),
            "after" => Ok(Self::After),
            other => Err(format!(
                "unknown silence placement '{other}', expected 'before' or 'after'"
            )),
        }
    }
}

/// Sample spec shared by every clip in a track.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrackSpec {
    pub sample_rate: u32,
    pub channels: u16,
    pub bits_per_sample: u16,
}

impl std::fmt::Display for TrackSpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} Hz, {} ch, {}-bit",
            self.sample_rate, self.channels, self.bits_per_sample
        )
    }
}

/// The assembled narration track, held in memory until written out once.
#[derive(Debug, Clone)]
pub struct AssembledTrack {
    spec: TrackSpec,
    samples: Vec<i16>,
}

impl AssembledTrack {
    pub fn spec(&self) -> TrackSpec {
        self.spec
    }

    /// Total duration in seconds.
    pub fn duration_secs(&self) -> f64 {
        let frames = self.samples.len() as f64 / self.spec.channels as f64;
        frames / self.spec.sample_rate as f64
    }

    /// Write the track as a WAV file.
    pub fn write_wav(&self, path: impl AsRef<Path>) -> MediaResult<()> {
        let spec = WavSpec {
            channels: self.spec.channels,
            sample_rate: self.spec.sample_rate,
            bits_per_sample: self.spec.bits_per_sample,
            sample_format: SampleFormat::Int,
        };
        let mut writer = WavWriter::create(path.as_ref(), spec)?;
        for &sample in &self.samples {
            writer.write_sample(sample)?;
        }
        writer.finalize()?;
        Ok(())
    }

    #[cfg(test)]
    fn samples(&self) -> &[i16] {
        &self.samples
    }
}

/// Assemble the narration track from a schedule.
///
/// Negative gaps contribute no silence (overlapping clips play
/// back-to-back). The first clip fixes the sample spec; a later clip with a
/// different spec fails the whole run with [`MediaError::FormatMismatch`] —
/// no partial track is produced.
pub fn assemble_track(
    schedule: &Schedule,
    placement: SilencePlacement,
) -> MediaResult<AssembledTrack> {
    if schedule.is_empty() {
        return Err(MediaError::EmptySchedule);
    }

    let mut spec: Option<TrackSpec> = None;
    let mut samples: Vec<i16> = Vec::new();

    for entry in &schedule.entries {
        let mut reader = WavReader::new(Cursor::new(entry.clip.wav.as_slice()))?;
        let clip_spec = track_spec(&reader.spec())?;

        let spec = *spec.get_or_insert(clip_spec);
        if spec != clip_spec {
            return Err(MediaError::FormatMismatch {
                expected: spec.to_string(),
                found: clip_spec.to_string(),
            });
        }

        let silence = silence_samples(entry.gap_secs, spec);
        debug!(
            "Cue {}: {} silence samples, {:.3}s clip",
            entry.cue_index,
            silence,
            entry.clip.duration_secs
        );

        match placement {
            SilencePlacement::Before => {
                samples.resize(samples.len() + silence, 0);
                append_clip(&mut samples, &mut reader)?;
            }
            SilencePlacement::After => {
                append_clip(&mut samples, &mut reader)?;
                samples.resize(samples.len() + silence, 0);
            }
        }
    }

    Ok(AssembledTrack {
        spec: spec.expect("non-empty schedule always fixes a spec"),
        samples,
    })
}

/// Validate a clip's WAV spec; only 16-bit integer PCM is accepted.
fn track_spec(spec: &WavSpec) -> MediaResult<TrackSpec> {
    if spec.sample_format != SampleFormat::Int || spec.bits_per_sample != 16 {
        return Err(MediaError::UnsupportedFormat(format!(
            "{:?} {}-bit (only 16-bit integer PCM clips are supported)",
            spec.sample_format, spec.bits_per_sample
        )));
    }
    Ok(TrackSpec {
        sample_rate: spec.sample_rate,
        channels: spec.channels,
        bits_per_sample: spec.bits_per_sample,
    })
}

/// Number of zero samples for a gap, clamped at no silence.
fn silence_samples(gap_secs: f64, spec: TrackSpec) -> usize {
    let frames = (gap_secs.max(0.0) * spec.sample_rate as f64).round() as usize;
    frames * spec.channels as usize
}

fn append_clip<R: std::io::Read>(
    samples: &mut Vec<i16>,
    reader: &mut WavReader<R>,
) -> MediaResult<()> {
    for sample in reader.samples::<i16>() {
        samples.push(sample?);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use narr_models::{Clip, NarrationScheduler};

    /// A clip of `duration_secs` of constant `value` samples.
    fn test_clip(duration_secs: f64, sample_rate: u32, value: i16) -> Clip {
        let spec = WavSpec {
            channels: 1,
            sample_rate,
            bits_per_sample: 16,
            sample_format: SampleFormat::Int,
        };
        let mut cursor = Cursor::new(Vec::new());
        {
            let mut writer = WavWriter::new(&mut cursor, spec).unwrap();
            let frames = (duration_secs * sample_rate as f64).round() as usize;
            for _ in 0..frames {
                writer.write_sample(value).unwrap();
            }
            writer.finalize().unwrap();
        }
        Clip::new(cursor.into_inner(), duration_secs)
    }

    fn schedule_of(cues: &[(f64, f64)], sample_rate: u32) -> Schedule {
        let mut scheduler = NarrationScheduler::new();
        for (i, &(timestamp, duration)) in cues.iter().enumerate() {
            scheduler.place(i + 1, timestamp, test_clip(duration, sample_rate, 1000));
        }
        scheduler.into_schedule()
    }

    #[test]
    fn test_assembled_duration_matches_schedule() {
        let schedule = schedule_of(&[(3.0, 2.0), (10.0, 4.0), (50.0, 1.5)], 8000);
        let track = assemble_track(&schedule, SilencePlacement::Before).unwrap();

        assert!((track.duration_secs() - schedule.total_duration_secs()).abs() < 1e-3);
        assert!((track.duration_secs() - 51.5).abs() < 1e-3);
    }

    #[test]
    fn test_duration_is_placement_independent() {
        let schedule = schedule_of(&[(3.0, 2.0), (10.0, 4.0)], 8000);
        let before = assemble_track(&schedule, SilencePlacement::Before).unwrap();
        let after = assemble_track(&schedule, SilencePlacement::After).unwrap();
        assert!((before.duration_secs() - after.duration_secs()).abs() < 1e-9);
    }

    #[test]
    fn test_silence_before_places_clip_at_cue() {
        let schedule = schedule_of(&[(1.0, 0.5)], 8000);
        let track = assemble_track(&schedule, SilencePlacement::Before).unwrap();

        let samples = track.samples();
        assert!(samples[..8000].iter().all(|&s| s == 0));
        assert_eq!(samples[8000], 1000);
    }

    #[test]
    fn test_silence_after_pads_behind_clip() {
        let schedule = schedule_of(&[(1.0, 0.5)], 8000);
        let track = assemble_track(&schedule, SilencePlacement::After).unwrap();

        let samples = track.samples();
        assert_eq!(samples[0], 1000);
        assert!(samples[4000..].iter().all(|&s| s == 0));
    }

    #[test]
    fn test_negative_gap_inserts_no_silence() {
        // second clip overlaps: clips play back-to-back
        let schedule = schedule_of(&[(5.0, 6.0), (8.0, 1.0)], 8000);
        assert_eq!(schedule.overlaps.len(), 1);

        let track = assemble_track(&schedule, SilencePlacement::Before).unwrap();
        // 5 + 6 + 0 + 1 seconds
        assert!((track.duration_secs() - 12.0).abs() < 1e-3);
    }

    #[test]
    fn test_format_mismatch_fails_whole_run() {
        let mut scheduler = NarrationScheduler::new();
        scheduler.place(1, 1.0, test_clip(0.5, 22_050, 1000));
        scheduler.place(2, 3.0, test_clip(0.5, 44_100, 1000));
        let schedule = scheduler.into_schedule();

        let result = assemble_track(&schedule, SilencePlacement::Before);
        assert!(matches!(result, Err(MediaError::FormatMismatch { .. })));
    }

    #[test]
    fn test_float_clip_is_unsupported() {
        let spec = WavSpec {
            channels: 1,
            sample_rate: 22_050,
            bits_per_sample: 32,
            sample_format: SampleFormat::Float,
        };
        let mut cursor = Cursor::new(Vec::new());
        {
            let mut writer = WavWriter::new(&mut cursor, spec).unwrap();
            for _ in 0..2205 {
                writer.write_sample(0.25f32).unwrap();
            }
            writer.finalize().unwrap();
        }
        let mut scheduler = NarrationScheduler::new();
        scheduler.place(1, 1.0, Clip::new(cursor.into_inner(), 0.1));

        let result = assemble_track(&scheduler.into_schedule(), SilencePlacement::Before);
        assert!(matches!(result, Err(MediaError::UnsupportedFormat(_))));
    }

    #[test]
    fn test_empty_schedule_is_rejected() {
        let result = assemble_track(&Schedule::default(), SilencePlacement::Before);
        assert!(matches!(result, Err(MediaError::EmptySchedule)));
    }

    #[test]
    fn test_write_wav_roundtrip() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("narration.wav");

        let schedule = schedule_of(&[(1.0, 0.5)], 8000);
        let track = assemble_track(&schedule, SilencePlacement::Before).unwrap();
        track.write_wav(&path).unwrap();

        let reader = WavReader::open(&path).unwrap();
        assert_eq!(reader.spec().sample_rate, 8000);
        let frames = reader.duration() as f64 / reader.spec().sample_rate as f64;
        assert!((frames - 1.5).abs() < 1e-3);
    }

    #[test]
    fn test_silence_placement_from_str() {
        assert_eq!(
            "before".parse::<SilencePlacement>().unwrap(),
            SilencePlacement::Before
        );
        assert_eq!(
            "After".parse::<SilencePlacement>().unwrap(),
            SilencePlacement::After
        );
        assert!("sideways".parse::<SilencePlacement>().is_err());
    }
}
