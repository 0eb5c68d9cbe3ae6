//! Review score value type.
//!
//! # Responsibility
//! - Represent a resolved score on the site's half-point `[0.0, 5.0]` scale.
//! - Keep the "unscored" sentinel explicit instead of a magic float.
//!
//! # Invariants
//! - Rated values are stored in half-points, so `3.5` is `7`.
//! - Rated values never exceed `5.0`; values between half-points such as
//!   `3.7` are not representable.
//! - `Score::Unscored` always serializes as `-1.0`.

use std::fmt::{Display, Formatter};

/// Serialized value of the unscored sentinel.
pub const UNSCORED_VALUE: f64 = -1.0;

const MAX_HALF_POINTS: u8 = 10;

/// Number of half-point buckets between `0.0` and `5.0` inclusive.
pub const SCORE_BUCKETS: usize = 11;

/// A review score, or the marker that no score could be resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum Score {
    /// No score could be resolved for the review.
    #[default]
    Unscored,
    /// Resolved score in half-points.
    Rated(u8),
}

impl Score {
    /// Builds a rated score from a float, rejecting anything off the scale.
    ///
    /// `-1.0` maps to [`Score::Unscored`]. Values that are not a multiple
    /// of `0.5` (within float noise) are rejected.
    pub fn from_f64(value: f64) -> Option<Self> {
        if !value.is_finite() {
            return None;
        }
        if value == UNSCORED_VALUE {
            return Some(Self::Unscored);
        }
        if !(0.0..=5.0).contains(&value) {
            return None;
        }

        let half_points = (value * 2.0).round();
        if (half_points - value * 2.0).abs() > 1e-6 {
            return None;
        }

        Self::from_half_points(half_points as u8)
    }

    /// Builds a rated score from half-points, so `7` is `3.5`.
    pub fn from_half_points(half_points: u8) -> Option<Self> {
        if half_points > MAX_HALF_POINTS {
            None
        } else {
            Some(Self::Rated(half_points))
        }
    }

    /// Parses a `d.d` token such as `"4.5"`.
    pub fn parse_decimal(text: &str) -> Option<Self> {
        let value: f64 = text.trim().parse().ok()?;
        match Self::from_f64(value)? {
            Self::Unscored => None,
            rated => Some(rated),
        }
    }

    /// Float view of the score; `-1.0` for unscored.
    pub fn as_f64(&self) -> f64 {
        match self {
            Self::Unscored => UNSCORED_VALUE,
            Self::Rated(half_points) => f64::from(*half_points) / 2.0,
        }
    }

    pub fn is_scored(&self) -> bool {
        matches!(self, Self::Rated(_))
    }

    /// Histogram bucket index, `score * 2`.
    ///
    /// Returns `None` for unscored reviews.
    pub fn histogram_bucket(&self) -> Option<usize> {
        match self {
            Self::Unscored => None,
            Self::Rated(half_points) => Some(usize::from(*half_points)),
        }
    }
}

impl Display for Score {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.1}", self.as_f64())
    }
}

#[cfg(test)]
mod tests {
    use super::Score;

    #[test]
    fn sentinel_maps_to_unscored() {
        assert_eq!(Score::from_f64(-1.0), Some(Score::Unscored));
        assert_eq!(Score::Unscored.to_string(), "-1.0");
    }

    #[test]
    fn rejects_off_scale_values() {
        assert_eq!(Score::from_f64(5.5), None);
        assert_eq!(Score::from_f64(-0.5), None);
        assert_eq!(Score::from_f64(3.25), None);
        assert_eq!(Score::parse_decimal("9.9"), None);
    }

    #[test]
    fn rejects_values_between_half_points() {
        assert_eq!(Score::from_f64(3.7), None);
        assert_eq!(Score::from_f64(4.2), None);
        assert_eq!(Score::parse_decimal("3.7"), None);
        assert_eq!(Score::from_f64(3.5), Some(Score::Rated(7)));
        assert_eq!(Score::from_half_points(11), None);
    }

    #[test]
    fn buckets_follow_half_point_steps() {
        assert_eq!(Score::from_f64(0.0).unwrap().histogram_bucket(), Some(0));
        assert_eq!(Score::from_f64(2.5).unwrap().histogram_bucket(), Some(5));
        assert_eq!(Score::from_f64(5.0).unwrap().histogram_bucket(), Some(10));
        assert_eq!(Score::Unscored.histogram_bucket(), None);
    }
}
