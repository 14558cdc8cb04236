use std::fmt;

use crate::foundation::error::{ReelError, ReelResult};

/// Absolute 0-based frame index within one scene.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize,
)]
pub struct FrameIndex(pub u64);

/// Contiguous frame span `[start, end)`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize)]
pub struct FrameRange {
    pub start: FrameIndex,
    pub end: FrameIndex, // exclusive
}

impl FrameRange {
    /// Span of `len` frames beginning at `start`.
    pub fn starting_at(start: FrameIndex, len: u64) -> Self {
        Self {
            start,
            end: FrameIndex(start.0.saturating_add(len)),
        }
    }

    pub fn len_frames(self) -> u64 {
        self.end.0.saturating_sub(self.start.0)
    }

    pub fn is_empty(self) -> bool {
        self.start.0 == self.end.0
    }
}

/// Rational frame rate.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
pub struct Fps {
    pub num: u32,
    pub den: u32, // must be > 0
}

impl Default for Fps {
    fn default() -> Self {
        Self { num: 20, den: 1 }
    }
}

impl Fps {
    pub fn new(num: u32, den: u32) -> ReelResult<Self> {
        if den == 0 {
            return Err(ReelError::validation("fps den must be > 0"));
        }
        if num == 0 {
            return Err(ReelError::validation("fps num must be > 0"));
        }
        Ok(Self { num, den })
    }

    /// Parse `N` or `NUM/DEN`.
    pub fn parse(s: &str) -> ReelResult<Self> {
        let s = s.trim();
        let bad = || ReelError::validation(format!("invalid fps '{s}' (expected N or NUM/DEN)"));
        match s.split_once('/') {
            Some((num, den)) => Self::new(
                num.trim().parse().map_err(|_| bad())?,
                den.trim().parse().map_err(|_| bad())?,
            ),
            None => Self::new(s.parse().map_err(|_| bad())?, 1),
        }
    }

    /// `floor(secs * fps)`, with products within 1e-9 of an integer snapped onto it so that
    /// e.g. `2.3s` at 10 fps yields 23 frames rather than 22.
    pub fn secs_to_frames_floor(self, secs: f64) -> u64 {
        let exact = secs * f64::from(self.num) / f64::from(self.den);
        let nearest = exact.round();
        let frames = if (exact - nearest).abs() < 1e-9 {
            nearest
        } else {
            exact.floor()
        };
        frames.max(0.0) as u64
    }
}

impl fmt::Display for Fps {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.den == 1 {
            write!(f, "{}", self.num)
        } else {
            write!(f, "{}/{}", self.num, self.den)
        }
    }
}

/// Output size of one scene in pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
pub struct Resolution {
    pub width: u32,
    pub height: u32,
}

impl Default for Resolution {
    fn default() -> Self {
        Self {
            width: 1000,
            height: 1000,
        }
    }
}

impl Resolution {
    /// Parse `W,H`.
    pub fn parse(s: &str) -> ReelResult<Self> {
        let (w, h) = parse_pair::<u32>(s).ok_or_else(|| {
            ReelError::validation(format!("invalid resolution '{s}' (expected W,H)"))
        })?;
        if w == 0 || h == 0 {
            return Err(ReelError::validation(format!(
                "resolution '{s}' must have width and height > 0"
            )));
        }
        Ok(Self {
            width: w,
            height: h,
        })
    }
}

/// Cell of the multi-scene layout grid.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize)]
pub struct GridPosition {
    pub row: u32,
    pub column: u32,
}

impl GridPosition {
    /// Parse `ROW,COL`.
    pub fn parse(s: &str) -> ReelResult<Self> {
        let (row, column) = parse_pair::<u32>(s).ok_or_else(|| {
            ReelError::validation(format!("invalid position '{s}' (expected ROW,COL)"))
        })?;
        Ok(Self { row, column })
    }
}

pub(crate) fn parse_pair<T: std::str::FromStr>(s: &str) -> Option<(T, T)> {
    let (a, b) = s.split_once(',')?;
    Some((a.trim().parse().ok()?, b.trim().parse().ok()?))
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
