//! Narration scheduling.
//!
//! The scheduler turns a cue timeline plus an incrementally arriving stream
//! of clip durations into a schedule: for each cue, how much silence to lay
//! down before its clip so the clip starts as close as possible to the cue's
//! timestamp. Clip durations are only known after synthesis, and each cue's
//! description may depend on the previous one, so clips are consumed one at
//! a time, strictly in timeline order.

use serde::Serialize;

use crate::clip::Clip;

/// One scheduled cue: the silence gap to insert and the clip to play.
#[derive(Debug, Clone, PartialEq)]
pub struct ScheduleEntry {
    /// 1-based position in the timeline.
    pub cue_index: usize,
    /// Cue timestamp in seconds.
    pub timestamp_secs: f64,
    /// Silence before (or after, depending on placement policy) the clip.
    /// Non-positive when the previous clip overran its window; the assembler
    /// clamps to zero.
    pub gap_secs: f64,
    pub clip: Clip,
}

/// Non-fatal overlap condition: the clip preceding `cue_index` ran past this
/// cue's timestamp by `overrun_secs`. Overlaps are reported, never corrected;
/// truncating audio would destroy narration content, so actual timing is
/// allowed to drift instead.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Overlap {
    pub cue_index: usize,
    pub overrun_secs: f64,
}

/// The complete assembly plan: ordered gap/clip pairs plus every overlap
/// detected while building them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Schedule {
    pub entries: Vec<ScheduleEntry>,
    pub overlaps: Vec<Overlap>,
}

impl Schedule {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Duration of the assembled track: negative gaps contribute no silence.
    pub fn total_duration_secs(&self) -> f64 {
        self.entries
            .iter()
            .map(|e| e.gap_secs.max(0.0) + e.clip.duration_secs)
            .sum()
    }
}

/// Builds a [`Schedule`] from clips arriving one at a time.
///
/// For cue `i` the gap is `t_i - t_prev - d_prev`, where `t_prev`/`d_prev`
/// describe the previously *placed* cue (the origin `t = 0` with no clip at
/// the start). A cue that is skipped is never placed, so the next placed
/// cue's gap spans the hole and downstream cues keep their timestamps.
///
/// The scheduler is deterministic: identical timelines and duration streams
/// always produce identical schedules.
#[derive(Debug, Default)]
pub struct NarrationScheduler {
    /// Timestamp of the previously placed cue.
    cursor_secs: f64,
    /// Duration of the previously placed clip.
    pending_secs: f64,
    schedule: Schedule,
}

impl NarrationScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Place the clip for the cue at `timestamp_secs` and return its gap.
    ///
    /// A non-positive gap means the previous clip reached (or ran past) this
    /// cue's timestamp; exactly one [`Overlap`] is recorded for it and the
    /// gap is emitted as computed.
    pub fn place(&mut self, cue_index: usize, timestamp_secs: f64, clip: Clip) -> f64 {
        let gap_secs = timestamp_secs - self.cursor_secs - self.pending_secs;
        if gap_secs <= 0.0 {
            self.schedule.overlaps.push(Overlap {
                cue_index,
                overrun_secs: gap_secs.abs(),
            });
        }
        self.cursor_secs = timestamp_secs;
        self.pending_secs = clip.duration_secs;
        self.schedule.entries.push(ScheduleEntry {
            cue_index,
            timestamp_secs,
            gap_secs,
            clip,
        });
        gap_secs
    }

    pub fn into_schedule(self) -> Schedule {
        self.schedule
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn clip(duration_secs: f64) -> Clip {
        Clip::new(vec![0u8; 8], duration_secs)
    }

    fn plan(cues: &[(f64, f64)]) -> Schedule {
        let mut scheduler = NarrationScheduler::new();
        for (i, &(timestamp, duration)) in cues.iter().enumerate() {
            scheduler.place(i + 1, timestamp, clip(duration));
        }
        scheduler.into_schedule()
    }

    #[test]
    fn test_gap_formula() {
        let schedule = plan(&[(3.0, 2.0), (10.0, 4.0), (50.0, 1.5)]);
        let gaps: Vec<_> = schedule.entries.iter().map(|e| e.gap_secs).collect();

        assert!((gaps[0] - 3.0).abs() < 1e-6);
        assert!((gaps[1] - 5.0).abs() < 1e-6);
        assert!((gaps[2] - 36.0).abs() < 1e-6);
        assert!(schedule.overlaps.is_empty());
        assert!((schedule.total_duration_secs() - 51.5).abs() < 1e-6);
    }

    #[test]
    fn test_first_gap_is_offset_from_video_start() {
        let schedule = plan(&[(7.5, 1.0)]);
        assert!((schedule.entries[0].gap_secs - 7.5).abs() < 1e-6);
    }

    #[test]
    fn test_overlap_detection() {
        let schedule = plan(&[(5.0, 6.0), (8.0, 1.0)]);
        let gaps: Vec<_> = schedule.entries.iter().map(|e| e.gap_secs).collect();

        assert!((gaps[0] - 5.0).abs() < 1e-6);
        assert!((gaps[1] - (-3.0)).abs() < 1e-6);
        assert_eq!(schedule.overlaps.len(), 1);
        assert_eq!(schedule.overlaps[0].cue_index, 2);
        assert!((schedule.overlaps[0].overrun_secs - 3.0).abs() < 1e-6);
    }

    #[test]
    fn test_touching_clips_count_as_overlap() {
        // previous clip ends exactly on the next cue
        let schedule = plan(&[(5.0, 3.0), (8.0, 1.0)]);
        assert_eq!(schedule.overlaps.len(), 1);
        assert_eq!(schedule.overlaps[0].cue_index, 2);
        assert!(schedule.overlaps[0].overrun_secs.abs() < 1e-9);
    }

    #[test]
    fn test_one_overlap_event_per_occurrence() {
        let schedule = plan(&[(2.0, 10.0), (4.0, 10.0), (6.0, 1.0)]);
        assert_eq!(schedule.overlaps.len(), 2);
        assert_eq!(schedule.overlaps[0].cue_index, 2);
        assert_eq!(schedule.overlaps[1].cue_index, 3);
    }

    #[test]
    fn test_skipped_cue_widens_next_gap() {
        let mut scheduler = NarrationScheduler::new();
        scheduler.place(1, 3.0, clip(2.0));
        // cue 2 at t=10 failed synthesis: never placed
        let gap = scheduler.place(3, 50.0, clip(1.5));

        // spans from cue 1, not from the dropped timestamp
        assert!((gap - 45.0).abs() < 1e-6);
        let schedule = scheduler.into_schedule();
        assert_eq!(schedule.len(), 2);
        assert_eq!(schedule.entries[1].cue_index, 3);
    }

    #[test]
    fn test_deterministic() {
        let cues = [(3.0, 2.0), (10.0, 4.0), (50.0, 1.5)];
        assert_eq!(plan(&cues), plan(&cues));
    }

    #[test]
    fn test_total_duration_clamps_negative_gaps() {
        let schedule = plan(&[(5.0, 6.0), (8.0, 1.0)]);
        // 5 + 6 + 0 + 1: the -3 gap contributes no silence
        assert!((schedule.total_duration_secs() - 12.0).abs() < 1e-6);
    }
}
