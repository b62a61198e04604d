/*!
 * Timecode conversion between millisecond offsets and `HH:MM:SS:FF` strings.
 *
 * Frame numbers are derived from the nominal frame rate. No drop-frame
 * correction is applied, not even for 23.976, 29.97 or 59.94 fps, so an
 * exported 29.97 timeline drifts from wall-clock by about 3.6 s per hour.
 * Every exported EDL therefore declares `FCM: NON-DROP FRAME`.
 */

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::errors::TimelineError;

// @const: Non-drop timecode pattern
static TIMECODE_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(\d{2,}):(\d{2}):(\d{2}):(\d{2,})$").unwrap()
});

const MS_PER_HOUR: u64 = 3_600_000;
const MS_PER_MINUTE: u64 = 60_000;
const MS_PER_SECOND: u64 = 1_000;

/// Supported frame rate range; keeps frame numbers and rational denominators small
pub const MIN_FPS: f64 = 1.0;
pub const MAX_FPS: f64 = 1000.0;

/// Frame rate in frames per second, integral (24, 30) or fractional (29.97)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct FrameRate(f64);

impl FrameRate {
    /// Create a frame rate between 1 and 1000 fps inclusive
    pub fn new(fps: f64) -> Result<Self, TimelineError> {
        if (MIN_FPS..=MAX_FPS).contains(&fps) {
            Ok(Self(fps))
        } else {
            Err(TimelineError::InvalidFrameRate(fps))
        }
    }

    pub fn as_f64(self) -> f64 {
        self.0
    }

    /// Whether the rate is a whole number of frames per second
    pub fn is_integral(self) -> bool {
        self.0.fract() == 0.0
    }

    /// `fps * 1000` as an integer, the denominator used for rational durations
    pub fn millis_denominator(self) -> u64 {
        (self.0 * 1000.0).round() as u64
    }

    /// Number of whole frames elapsed after `ms` milliseconds
    pub fn frames_at(self, ms: u64) -> u64 {
        if self.is_integral() {
            ms * self.0 as u64 / MS_PER_SECOND
        } else {
            (ms as f64 * self.0 / 1000.0).floor() as u64
        }
    }

    /// Rational duration of a single frame, e.g. `1/30s` or `1000/29970s`
    pub fn frame_duration(self) -> String {
        if self.is_integral() {
            format!("1/{}s", self.0 as u64)
        } else {
            format!("1000/{}s", self.millis_denominator())
        }
    }

    /// Frame-rate-relative duration fraction `<ms>/<fps>000s`
    pub fn rational_duration(self, ms: u64) -> String {
        format!("{}/{}s", ms, self.millis_denominator())
    }
}

impl Default for FrameRate {
    fn default() -> Self {
        Self(30.0)
    }
}

impl TryFrom<f64> for FrameRate {
    type Error = TimelineError;

    fn try_from(fps: f64) -> Result<Self, Self::Error> {
        Self::new(fps)
    }
}

impl From<FrameRate> for f64 {
    fn from(rate: FrameRate) -> Self {
        rate.0
    }
}

impl fmt::Display for FrameRate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_integral() {
            write!(f, "{}", self.0 as u64)
        } else {
            write!(f, "{}", self.0)
        }
    }
}

/// Convert a millisecond offset to a non-drop `HH:MM:SS:FF` timecode
pub fn to_timecode(ms: u64, fps: FrameRate) -> String {
    let hours = ms / MS_PER_HOUR;
    let minutes = (ms % MS_PER_HOUR) / MS_PER_MINUTE;
    let seconds = (ms % MS_PER_MINUTE) / MS_PER_SECOND;
    let frames = fps.frames_at(ms % MS_PER_SECOND);

    format!("{:02}:{:02}:{:02}:{:02}", hours, minutes, seconds, frames)
}

/// Convert a timecode back to milliseconds.
///
/// Returns the smallest offset that `to_timecode` maps onto `timecode`, so
/// `to_timecode(to_ms(tc)?, fps) == tc` for every timecode `to_timecode` can
/// produce. Frame numbers that cannot occur at `fps` are rejected.
pub fn to_ms(timecode: &str, fps: FrameRate) -> Result<u64, TimelineError> {
    let invalid = || TimelineError::InvalidTimecode(timecode.to_string());

    let caps = TIMECODE_REGEX.captures(timecode.trim()).ok_or_else(invalid)?;
    let field = |idx: usize| -> Result<u64, TimelineError> {
        caps[idx].parse::<u64>().map_err(|_| invalid())
    };

    let hours = field(1)?;
    let minutes = field(2)?;
    let seconds = field(3)?;
    let frames = field(4)?;

    if minutes >= 60 || seconds >= 60 || frames > fps.frames_at(MS_PER_SECOND - 1) {
        return Err(invalid());
    }

    // First millisecond inside the second whose frame index reaches `frames`
    let mut sub_ms = ((frames as f64) * 1000.0 / fps.as_f64()).ceil().min(999.0) as u64;
    while fps.frames_at(sub_ms) < frames {
        sub_ms += 1;
    }
    while sub_ms > 0 && fps.frames_at(sub_ms - 1) >= frames {
        sub_ms -= 1;
    }

    Ok(hours * MS_PER_HOUR + minutes * MS_PER_MINUTE + seconds * MS_PER_SECOND + sub_ms)
}
