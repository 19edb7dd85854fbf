use crate::foundation::error::{ClipmillError, ClipmillResult};

/// Half-open timeline window `[start, end)` in seconds.
///
/// Serialized as a two-element JSON array `[start, end]`, the wire format the
/// transcriber and search-term planner produce.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(try_from = "(f64, f64)", into = "(f64, f64)")]
pub struct TimeInterval {
    /// Inclusive window start in seconds.
    pub start: f64,
    /// Exclusive window end in seconds.
    pub end: f64,
}

impl TimeInterval {
    /// Create a validated interval with `0 <= start < end`, both finite.
    pub fn new(start: f64, end: f64) -> ClipmillResult<Self> {
        if !start.is_finite() || !end.is_finite() {
            return Err(ClipmillError::coverage(format!(
                "interval bounds must be finite, got [{start}, {end})"
            )));
        }
        if start < 0.0 {
            return Err(ClipmillError::coverage(format!(
                "interval start must be >= 0, got {start}"
            )));
        }
        if start >= end {
            return Err(ClipmillError::coverage(format!(
                "interval start must be < end, got [{start}, {end})"
            )));
        }
        Ok(Self { start, end })
    }

    /// Window length in seconds.
    pub fn duration(self) -> f64 {
        self.end - self.start
    }

    /// Return `true` when `t` is inside `[start, end)`.
    pub fn contains(self, t: f64) -> bool {
        self.start <= t && t < self.end
    }

    /// Return `true` when `next` begins exactly where this interval ends,
    /// within float slack.
    pub fn abuts(self, next: TimeInterval) -> bool {
        (self.end - next.start).abs() <= TIME_EPSILON
    }
}

/// Slack applied when comparing timeline positions parsed from JSON floats.
pub const TIME_EPSILON: f64 = 1e-6;

impl TryFrom<(f64, f64)> for TimeInterval {
    type Error = ClipmillError;

    fn try_from(value: (f64, f64)) -> ClipmillResult<Self> {
        Self::new(value.0, value.1)
    }
}

impl From<TimeInterval> for (f64, f64) {
    fn from(value: TimeInterval) -> Self {
        (value.start, value.end)
    }
}

/// Frames-per-second represented as a rational `num/den`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Fps {
    /// Numerator (frames).
    pub num: u32,
    /// Denominator (seconds), must be non-zero.
    pub den: u32,
}

impl Fps {
    /// Create a validated FPS value.
    pub fn new(num: u32, den: u32) -> ClipmillResult<Self> {
        if num == 0 || den == 0 {
            return Err(ClipmillError::render("fps num and den must be > 0"));
        }
        Ok(Self { num, den })
    }

    /// Convert to floating-point FPS.
    pub fn as_f64(self) -> f64 {
        f64::from(self.num) / f64::from(self.den)
    }
}

/// Output canvas dimensions in pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Canvas {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}
