use std::time::Instant;

use time::OffsetDateTime;

use crate::error::InvalidInput;
use crate::model::{DisplayState, LapRecord};

/// Stopwatch state machine for a single lap-timing session.
///
/// Calls made in an inapplicable state (`start` while running, `record_lap`
/// while stopped) are benign no-ops: spurious key repeats from the UI must
/// never corrupt the session. Only an out-of-range lap tag is an error.
#[derive(Debug)]
pub struct LapTimer {
    running: bool,
    /// Start of the current running interval; `None` while stopped.
    start_reference: Option<Instant>,
    /// Seconds accumulated across completed running intervals.
    accumulated_seconds: f64,
    laps: Vec<LapRecord>,
}

impl Default for LapTimer {
    fn default() -> Self {
        Self::new()
    }
}

impl LapTimer {
    pub fn new() -> Self {
        Self {
            running: false,
            start_reference: None,
            accumulated_seconds: 0.0,
            laps: Vec::new(),
        }
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn display_state(&self) -> DisplayState {
        DisplayState::from_running(self.running)
    }

    /// Laps in recording order. Read-only: the exporter and the render layer
    /// never mutate the sequence.
    pub fn laps(&self) -> &[LapRecord] {
        &self.laps
    }

    /// Elapsed running time in seconds, excluding paused intervals.
    pub fn current_elapsed(&self) -> f64 {
        self.elapsed_at(Instant::now())
    }

    pub fn start(&mut self) {
        self.start_at(Instant::now());
    }

    pub fn stop(&mut self) {
        self.stop_at(Instant::now());
    }

    pub fn toggle(&mut self) {
        self.toggle_at(Instant::now());
    }

    /// Record a lap tagged with the digit the user pressed. Returns the new
    /// record, or `None` when the timer is stopped and nothing was recorded.
    pub fn record_lap(&mut self, tag: u8) -> Result<Option<LapRecord>, InvalidInput> {
        self.record_lap_at(tag, Instant::now(), OffsetDateTime::now_utc())
    }

    /// Discard any in-flight interval, zero the accumulator and clear all
    /// laps. Valid from either state; always ends stopped.
    pub fn reset(&mut self) {
        self.running = false;
        self.start_reference = None;
        self.accumulated_seconds = 0.0;
        self.laps.clear();
    }

    fn start_at(&mut self, now: Instant) {
        if self.running {
            return;
        }
        self.start_reference = Some(now);
        self.running = true;
    }

    fn stop_at(&mut self, now: Instant) {
        if !self.running {
            return;
        }
        if let Some(started) = self.start_reference.take() {
            self.accumulated_seconds += now.duration_since(started).as_secs_f64();
        }
        self.running = false;
    }

    fn toggle_at(&mut self, now: Instant) {
        if self.running {
            self.stop_at(now);
        } else {
            self.start_at(now);
        }
    }

    fn elapsed_at(&self, now: Instant) -> f64 {
        match (self.running, self.start_reference) {
            (true, Some(started)) => {
                self.accumulated_seconds + now.duration_since(started).as_secs_f64()
            }
            _ => self.accumulated_seconds,
        }
    }

    fn record_lap_at(
        &mut self,
        tag: u8,
        now: Instant,
        wall: OffsetDateTime,
    ) -> Result<Option<LapRecord>, InvalidInput> {
        if tag > 9 {
            return Err(InvalidInput::TagOutOfRange(tag));
        }
        if !self.running {
            return Ok(None);
        }
        let total_seconds = self.elapsed_at(now);
        let previous_total = self.laps.last().map_or(0.0, |lap| lap.total_seconds);
        let lap = LapRecord {
            tag,
            lap_seconds: total_seconds - previous_total,
            total_seconds,
            timestamp: wall,
        };
        self.laps.push(lap);
        Ok(Some(lap))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use time::macros::datetime;

    const TOL: f64 = 1e-9;

    fn wall() -> OffsetDateTime {
        datetime!(2025-06-01 10:30:05.589 UTC)
    }

    #[test]
    fn records_laps_against_cumulative_elapsed() {
        let mut timer = LapTimer::new();
        let t0 = Instant::now();
        timer.start_at(t0);

        let lap1 = timer
            .record_lap_at(1, t0 + Duration::from_millis(5_247), wall())
            .unwrap()
            .unwrap();
        assert_eq!(lap1.tag, 1);
        assert!((lap1.lap_seconds - 5.247).abs() < TOL);
        assert!((lap1.total_seconds - 5.247).abs() < TOL);

        let lap2 = timer
            .record_lap_at(2, t0 + Duration::from_millis(12_394), wall())
            .unwrap()
            .unwrap();
        assert_eq!(lap2.tag, 2);
        assert!((lap2.lap_seconds - 7.147).abs() < TOL);
        assert!((lap2.total_seconds - 12.394).abs() < TOL);
        assert_eq!(lap2.timestamp, wall());
    }

    #[test]
    fn lap_durations_sum_to_last_total() {
        let mut timer = LapTimer::new();
        let t0 = Instant::now();
        timer.start_at(t0);

        for (i, ms) in [321_u64, 1_750, 4_002, 9_781].iter().enumerate() {
            timer
                .record_lap_at(i as u8, t0 + Duration::from_millis(*ms), wall())
                .unwrap();
        }

        let sum: f64 = timer.laps().iter().map(|lap| lap.lap_seconds).sum();
        let last_total = timer.laps().last().unwrap().total_seconds;
        assert!((sum - last_total).abs() < TOL);
    }

    #[test]
    fn pause_and_resume_carry_accumulated_time() {
        let mut timer = LapTimer::new();
        let t0 = Instant::now();
        timer.start_at(t0);
        timer.stop_at(t0 + Duration::from_secs(5));
        assert!(!timer.is_running());

        // The paused gap must not count.
        assert!((timer.elapsed_at(t0 + Duration::from_secs(60)) - 5.0).abs() < TOL);

        timer.start_at(t0 + Duration::from_secs(60));
        assert!((timer.elapsed_at(t0 + Duration::from_secs(62)) - 7.0).abs() < TOL);
    }

    #[test]
    fn start_while_running_is_idempotent() {
        let mut timer = LapTimer::new();
        let t0 = Instant::now();
        timer.start_at(t0);
        timer.start_at(t0 + Duration::from_secs(10));
        assert!((timer.elapsed_at(t0 + Duration::from_secs(20)) - 20.0).abs() < TOL);
    }

    #[test]
    fn stop_while_stopped_is_a_no_op() {
        let mut timer = LapTimer::new();
        let t0 = Instant::now();
        timer.stop_at(t0);
        assert!(!timer.is_running());
        assert_eq!(timer.elapsed_at(t0 + Duration::from_secs(3)), 0.0);
    }

    #[test]
    fn record_lap_while_stopped_leaves_laps_unchanged() {
        let mut timer = LapTimer::new();
        let t0 = Instant::now();
        assert_eq!(timer.record_lap_at(3, t0, wall()), Ok(None));
        assert!(timer.laps().is_empty());

        timer.start_at(t0);
        timer.stop_at(t0 + Duration::from_secs(1));
        assert_eq!(
            timer.record_lap_at(3, t0 + Duration::from_secs(2), wall()),
            Ok(None)
        );
        assert!(timer.laps().is_empty());
    }

    #[test]
    fn out_of_range_tag_is_rejected() {
        let mut timer = LapTimer::new();
        let t0 = Instant::now();
        timer.start_at(t0);
        assert_eq!(
            timer.record_lap_at(10, t0 + Duration::from_secs(1), wall()),
            Err(InvalidInput::TagOutOfRange(10))
        );
        assert!(timer.laps().is_empty());
    }

    #[test]
    fn reset_clears_everything_from_either_state() {
        let mut timer = LapTimer::new();
        let t0 = Instant::now();
        timer.start_at(t0);
        timer
            .record_lap_at(5, t0 + Duration::from_secs(2), wall())
            .unwrap();

        timer.reset();
        assert!(!timer.is_running());
        assert!(timer.laps().is_empty());
        assert_eq!(timer.elapsed_at(t0 + Duration::from_secs(30)), 0.0);
        assert_eq!(timer.display_state(), DisplayState::Stopped);
    }

    #[test]
    fn toggle_alternates_between_states() {
        let mut timer = LapTimer::new();
        let t0 = Instant::now();
        timer.toggle_at(t0);
        assert!(timer.is_running());
        assert_eq!(timer.display_state(), DisplayState::Running);

        timer.toggle_at(t0 + Duration::from_secs(4));
        assert!(!timer.is_running());
        assert!((timer.elapsed_at(t0 + Duration::from_secs(9)) - 4.0).abs() < TOL);
    }
}
