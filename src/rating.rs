use std::fmt;

/// A final player rating on the `0.0..=100.0` scale. Higher is better.
#[derive(Debug, Copy, Clone, PartialEq, PartialOrd, Default)]
pub struct Rating(pub f64);

impl From<Rating> for f64 {
    #[inline]
    fn from(Rating(rating): Rating) -> f64 {
        rating
    }
}

impl From<f64> for Rating {
    #[inline]
    fn from(rating: f64) -> Rating {
        Rating(rating)
    }
}

impl Rating {
    pub const MIN: Rating = Rating(0.0);
    pub const MAX: Rating = Rating(100.0);

    /// Clamps into `MIN..=MAX`. Undefined values become `fallback`.
    #[must_use]
    #[inline]
    pub fn clamped_or(value: f64, fallback: Rating) -> Rating {
        if value.is_nan() {
            fallback
        } else {
            Rating(value.clamp(Rating::MIN.0, Rating::MAX.0))
        }
    }

    #[inline]
    pub fn is_valid(self) -> bool {
        (Rating::MIN.0..=Rating::MAX.0).contains(&self.0)
    }
}

impl fmt::Display for Rating {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamp() {
        let fallback = Rating(65.0);
        assert_eq!(Rating::clamped_or(-3.0, fallback), Rating::MIN);
        assert_eq!(Rating::clamped_or(f64::INFINITY, fallback), Rating::MAX);
        assert_eq!(Rating::clamped_or(f64::NAN, fallback), fallback);
        assert_eq!(Rating::clamped_or(71.5, fallback), Rating(71.5));
        assert_eq!(Rating(71.4567).to_string(), "71.46");
    }
}
