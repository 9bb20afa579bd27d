use std::f64::consts::PI;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::ConfigError;

/// Named easing applied to the curve parameter before the sag shape is
/// evaluated.
///
/// Every profile maps `[0, 1]` onto itself monotonically, fixes `0`, `0.5`
/// and `1`, and satisfies `p(1 - t) == 1 - p(t)`, so the apex stays in the
/// middle of the curved span and the row stays mirror-symmetric.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum AngleProfile {
    /// Gentle: cosine ease, keys near the ends tilt less.
    #[default]
    Cosine,
    /// Natural: the plain curve tangent.
    Bezier,
    /// Smooth: quadratic ease-in-out.
    Quadratic,
}

impl AngleProfile {
    pub const ALL: [AngleProfile; 3] = [
        AngleProfile::Cosine,
        AngleProfile::Bezier,
        AngleProfile::Quadratic,
    ];

    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            AngleProfile::Cosine => "cosine",
            AngleProfile::Bezier => "bezier",
            AngleProfile::Quadratic => "quadratic",
        }
    }

    /// Shaped parameter `t'` for `t` in `[0, 1]` (clamped).
    #[must_use]
    pub fn shape(self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        match self {
            AngleProfile::Cosine => (1.0 - (PI * t).cos()) / 2.0,
            AngleProfile::Bezier => t,
            AngleProfile::Quadratic => {
                if t <= 0.5 {
                    2.0 * t * t
                } else {
                    let r = 1.0 - t;
                    1.0 - 2.0 * r * r
                }
            }
        }
    }

    /// `d shape / dt` at `t`.
    #[must_use]
    pub fn slope(self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        match self {
            AngleProfile::Cosine => PI / 2.0 * (PI * t).sin(),
            AngleProfile::Bezier => 1.0,
            AngleProfile::Quadratic => {
                if t <= 0.5 {
                    4.0 * t
                } else {
                    4.0 * (1.0 - t)
                }
            }
        }
    }
}

impl fmt::Display for AngleProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for AngleProfile {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim();
        Self::ALL
            .into_iter()
            .find(|p| p.name().eq_ignore_ascii_case(needle))
            .ok_or_else(|| ConfigError::UnknownProfile {
                name: s.to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn profiles_fix_ends_and_midpoint() {
        for p in AngleProfile::ALL {
            assert_abs_diff_eq!(p.shape(0.0), 0.0, epsilon = 1e-12);
            assert_abs_diff_eq!(p.shape(0.5), 0.5, epsilon = 1e-12);
            assert_abs_diff_eq!(p.shape(1.0), 1.0, epsilon = 1e-12);
        }
    }

    #[test]
    fn profiles_are_odd_symmetric_and_monotone() {
        for p in AngleProfile::ALL {
            let mut prev = p.shape(0.0);
            for i in 1..=100 {
                let t = f64::from(i) / 100.0;
                let v = p.shape(t);
                assert!(v >= prev, "{p} not monotone at {t}");
                assert_abs_diff_eq!(p.shape(1.0 - t), 1.0 - v, epsilon = 1e-12);
                prev = v;
            }
        }
    }

    #[test]
    fn slope_matches_finite_difference() {
        let h = 1e-6;
        for p in AngleProfile::ALL {
            for t in [0.1, 0.3, 0.45, 0.7, 0.9] {
                let numeric = (p.shape(t + h) - p.shape(t - h)) / (2.0 * h);
                assert_abs_diff_eq!(p.slope(t), numeric, epsilon = 1e-5);
            }
        }
    }

    #[test]
    fn parses_names_case_insensitively() {
        assert_eq!("Cosine".parse::<AngleProfile>(), Ok(AngleProfile::Cosine));
        assert_eq!(" bezier ".parse::<AngleProfile>(), Ok(AngleProfile::Bezier));
        assert_eq!(
            "quadratic".parse::<AngleProfile>(),
            Ok(AngleProfile::Quadratic)
        );
        assert!(matches!(
            "linear".parse::<AngleProfile>(),
            Err(ConfigError::UnknownProfile { .. })
        ));
    }

    #[test]
    fn serde_uses_lowercase_names() {
        let s = serde_json::to_string(&AngleProfile::Quadratic).unwrap();
        assert_eq!(s, "\"quadratic\"");
    }
}
