use std::path::PathBuf;
use std::time::Duration;

use time::{OffsetDateTime, UtcOffset};

/// One recorded lap. `tag` is the digit the user pressed, not a sequence
/// index; the same tag may appear any number of times.
///
/// Records are immutable once created. For laps in recording order,
/// `total_seconds` is non-decreasing and `lap_seconds` is the delta to the
/// previous lap's total (or to zero for the first lap).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LapRecord {
    pub tag: u8,
    /// Seconds since the previous lap, or since start for the first lap.
    pub lap_seconds: f64,
    /// Seconds since start at the moment of recording.
    pub total_seconds: f64,
    /// Wall-clock capture instant, millisecond precision. Stored in UTC and
    /// shifted to the configured offset at render time.
    pub timestamp: OffsetDateTime,
}

/// Presentation-facing timer state. The render layer maps this to styling;
/// the timer itself knows nothing about colors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayState {
    Running,
    Stopped,
}

impl DisplayState {
    pub fn from_running(is_running: bool) -> Self {
        if is_running {
            DisplayState::Running
        } else {
            DisplayState::Stopped
        }
    }
}

/// Resolved runtime configuration, built once from CLI arguments.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Name stamped on exports; generated at save time when absent.
    pub session_name: Option<String>,
    /// Export directory; the user documents directory when absent.
    pub output_dir: Option<PathBuf>,
    /// Display refresh interval for the UI driver.
    pub tick_interval: Duration,
    pub start_on_launch: bool,
    /// Local offset resolved at startup; UTC when the platform refuses one.
    pub utc_offset: UtcOffset,
}
