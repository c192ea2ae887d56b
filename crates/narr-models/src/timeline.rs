//! Cue timelines.
//!
//! A timeline is the ordered list of timestamps (seconds into the source
//! video) at which narration cues are anchored. The start of the video is an
//! implicit cue origin at `t = 0`; every explicit cue timestamp must come
//! strictly after it and after its predecessor.

use thiserror::Error;

use crate::timestamp::{parse_timestamp, TimestampError};

/// Buffer allowed past the probed video duration before a cue is rejected.
const DURATION_SLACK_SECS: f64 = 1.0;

/// Validated, strictly increasing cue timestamps.
#[derive(Debug, Clone, PartialEq)]
pub struct Timeline {
    cues: Vec<f64>,
}

impl Timeline {
    /// Build a timeline from cue timestamps in seconds.
    pub fn new(timestamps: Vec<f64>) -> Result<Self, TimelineError> {
        let mut prev = 0.0;
        for &t in &timestamps {
            if !t.is_finite() {
                return Err(TimelineError::NotFinite(t));
            }
            if t <= 0.0 {
                return Err(TimelineError::BeforeStart(t));
            }
            if t <= prev {
                return Err(TimelineError::NotIncreasing { prev, next: t });
            }
            prev = t;
        }
        Ok(Self { cues: timestamps })
    }

    /// Build a timeline from human-readable timestamp strings
    /// (`"90"`, `"1:30"`, `"00:01:30.500"`).
    pub fn parse<S: AsRef<str>>(specs: &[S]) -> Result<Self, TimelineError> {
        let timestamps = specs
            .iter()
            .map(|s| parse_timestamp(s.as_ref()))
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(timestamps)
    }

    /// Number of cues (the implicit origin is not counted).
    pub fn len(&self) -> usize {
        self.cues.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cues.is_empty()
    }

    /// Timestamp of the cue at `index` (1-based).
    pub fn get(&self, index: usize) -> Option<f64> {
        index.checked_sub(1).and_then(|i| self.cues.get(i)).copied()
    }

    /// Iterate cues as `(index, timestamp_secs)`, indices starting at 1.
    pub fn iter(&self) -> impl Iterator<Item = (usize, f64)> + '_ {
        self.cues.iter().enumerate().map(|(i, &t)| (i + 1, t))
    }

    /// Timestamp of the last cue, or the origin when there are none.
    pub fn last_secs(&self) -> f64 {
        self.cues.last().copied().unwrap_or(0.0)
    }

    /// Reject timelines that extend past the source video.
    pub fn ensure_within(&self, video_duration_secs: f64) -> Result<(), TimelineError> {
        let last = self.last_secs();
        if last > video_duration_secs + DURATION_SLACK_SECS {
            return Err(TimelineError::ExceedsVideoDuration {
                timestamp_secs: last,
                video_duration_secs,
            });
        }
        Ok(())
    }
}

/// Timeline validation error.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TimelineError {
    #[error("Cue timestamp is not a finite number: {0}")]
    NotFinite(f64),

    #[error("Cue timestamp {0}s is not after the start of the video")]
    BeforeStart(f64),

    #[error("Cue timestamps must be strictly increasing ({prev}s followed by {next}s)")]
    NotIncreasing { prev: f64, next: f64 },

    #[error("Cue at {timestamp_secs:.1}s is past the end of the video ({video_duration_secs:.1}s)")]
    ExceedsVideoDuration {
        timestamp_secs: f64,
        video_duration_secs: f64,
    },

    #[error(transparent)]
    Timestamp(#[from] TimestampError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_timeline() {
        let timeline = Timeline::new(vec![3.0, 10.0, 50.0]).unwrap();
        assert_eq!(timeline.len(), 3);
        assert_eq!(timeline.get(1), Some(3.0));
        assert_eq!(timeline.get(3), Some(50.0));
        assert_eq!(timeline.get(4), None);
        assert_eq!(timeline.last_secs(), 50.0);
    }

    #[test]
    fn test_empty_timeline_is_allowed() {
        let timeline = Timeline::new(vec![]).unwrap();
        assert!(timeline.is_empty());
        assert_eq!(timeline.last_secs(), 0.0);
    }

    #[test]
    fn test_iteration_is_one_indexed() {
        let timeline = Timeline::new(vec![3.0, 10.0]).unwrap();
        let cues: Vec<_> = timeline.iter().collect();
        assert_eq!(cues, vec![(1, 3.0), (2, 10.0)]);
    }

    #[test]
    fn test_rejects_cue_at_origin() {
        assert!(matches!(
            Timeline::new(vec![0.0, 5.0]),
            Err(TimelineError::BeforeStart(_))
        ));
    }

    #[test]
    fn test_rejects_non_increasing() {
        assert!(matches!(
            Timeline::new(vec![5.0, 5.0]),
            Err(TimelineError::NotIncreasing { .. })
        ));
        assert!(matches!(
            Timeline::new(vec![5.0, 3.0]),
            Err(TimelineError::NotIncreasing { .. })
        ));
    }

    #[test]
    fn test_rejects_non_finite() {
        assert!(matches!(
            Timeline::new(vec![f64::NAN]),
            Err(TimelineError::NotFinite(_))
        ));
        assert!(matches!(
            Timeline::new(vec![f64::INFINITY]),
            Err(TimelineError::NotFinite(_))
        ));
    }

    #[test]
    fn test_parse_mixed_formats() {
        let timeline = Timeline::parse(&["3", "1:30", "00:02:15.500"]).unwrap();
        let cues: Vec<_> = timeline.iter().map(|(_, t)| t).collect();
        assert_eq!(cues[0], 3.0);
        assert_eq!(cues[1], 90.0);
        assert!((cues[2] - 135.5).abs() < 1e-9);
    }

    #[test]
    fn test_parse_propagates_timestamp_errors() {
        assert!(matches!(
            Timeline::parse(&["3", "bogus"]),
            Err(TimelineError::Timestamp(_))
        ));
    }

    #[test]
    fn test_ensure_within() {
        let timeline = Timeline::new(vec![3.0, 50.0]).unwrap();
        assert!(timeline.ensure_within(60.0).is_ok());
        // within the slack buffer
        assert!(timeline.ensure_within(49.5).is_ok());
        assert!(matches!(
            timeline.ensure_within(40.0),
            Err(TimelineError::ExceedsVideoDuration { .. })
        ));
    }
}
