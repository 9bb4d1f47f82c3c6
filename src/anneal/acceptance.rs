//! Acceptance criteria.

use crate::error::ConfigError;
use rand::{Rng, RngCore};
use std::fmt;
use std::str::FromStr;

/// Decides whether the search moves to a candidate.
///
/// `delta` is `score(candidate) - score(current)`; scores are maximized,
/// so a negative delta is a regression.
pub trait AcceptanceFunction: Send + Sync {
    /// Probability of accepting a move with this delta at this temperature.
    fn probability(&self, delta: f64, temperature: f64) -> f64;

    /// Draws the decision.
    ///
    /// Certain outcomes (probability 0 or 1) consume no randomness, so a
    /// trajectory's random stream only advances on genuine coin flips.
    fn accept(&self, delta: f64, temperature: f64, rng: &mut dyn RngCore) -> bool {
        let p = self.probability(delta, temperature);
        if p >= 1.0 {
            true
        } else if p <= 0.0 {
            false
        } else {
            rng.random_range(0.0..1.0) < p
        }
    }
}

/// Selector tags for the built-in acceptance criteria.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "SCREAMING_SNAKE_CASE"))]
pub enum AcceptanceKind {
    /// Metropolis criterion, `exp(delta / temperature)`.
    ///
    /// Reference: Kirkpatrick, Gelatt & Vecchi (1983)
    #[default]
    StandardExponential,
}

impl AcceptanceKind {
    pub const ALL: [AcceptanceKind; 1] = [AcceptanceKind::StandardExponential];

    pub fn tag(self) -> &'static str {
        match self {
            AcceptanceKind::StandardExponential => "STANDARD_EXPONENTIAL",
        }
    }
}

impl AcceptanceFunction for AcceptanceKind {
    fn probability(&self, delta: f64, temperature: f64) -> f64 {
        match self {
            AcceptanceKind::StandardExponential => {
                if delta >= 0.0 {
                    1.0
                } else if temperature > 0.0 {
                    (delta / temperature).exp()
                } else {
                    0.0
                }
            }
        }
    }
}

impl fmt::Display for AcceptanceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl FromStr for AcceptanceKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        AcceptanceKind::ALL
            .into_iter()
            .find(|k| k.tag() == s)
            .ok_or_else(|| ConfigError::UnknownSelector {
                kind: "acceptance function",
                tag: s.to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::create_rng;
    use proptest::prelude::*;

    const F: AcceptanceKind = AcceptanceKind::StandardExponential;

    #[test]
    fn test_improvement_consumes_no_randomness() {
        let mut a = create_rng(1);
        let mut b = create_rng(1);
        assert!(F.accept(0.0, 0.0, &mut a));
        assert!(F.accept(3.0, 0.7, &mut a));
        assert_eq!(a.next_u64(), b.next_u64());
    }

    #[test]
    fn test_cold_rejects_regressions() {
        let mut rng = create_rng(2);
        for _ in 0..100 {
            assert!(!F.accept(-1e-9, 0.0, &mut rng));
        }
    }

    #[test]
    fn test_acceptance_rate_matches_probability() {
        let mut rng = create_rng(42);
        let trials = 20_000;
        let hits = (0..trials).filter(|_| F.accept(-1.0, 1.0, &mut rng)).count();
        let rate = hits as f64 / trials as f64;
        let expected = (-1.0f64).exp();
        assert!(
            (rate - expected).abs() < 0.02,
            "expected rate near {expected}, got {rate}"
        );
    }

    proptest! {
        #[test]
        fn prop_non_negative_delta_always_accepted(
            delta in 0.0f64..1e6,
            temperature in 0.0f64..=1.0,
            seed in any::<u64>(),
        ) {
            let mut rng = create_rng(seed);
            prop_assert!(F.accept(delta, temperature, &mut rng));
        }

        #[test]
        fn prop_probability_grows_with_temperature(
            delta in -50.0f64..-1e-6,
            t1 in 1e-3f64..=1.0,
            t2 in 1e-3f64..=1.0,
        ) {
            let (lo, hi) = if t1 <= t2 { (t1, t2) } else { (t2, t1) };
            prop_assert!(F.probability(delta, lo) <= F.probability(delta, hi));
            prop_assert!(F.probability(delta, 0.0) <= F.probability(delta, lo));
        }
    }
}
