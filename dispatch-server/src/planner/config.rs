//! Search configuration for the route planner.

use std::fmt;
use std::str::FromStr;

use crate::map::Pose;

/// Remaining-cost estimate used to order the A* frontier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Heuristic {
    /// Planar Euclidean distance between lat/lng pairs.
    ///
    /// Only admissible when edge lengths never undercut the straight-line
    /// distance between their endpoints in the same units.
    #[default]
    Euclidean,

    /// Always zero, turning A* into Dijkstra. Optimal for any non-negative
    /// edge weights.
    Zero,
}

impl Heuristic {
    /// Estimated cost from `from` to `goal`.
    pub fn estimate(self, from: &Pose, goal: &Pose) -> f64 {
        match self {
            Heuristic::Euclidean => from.planar_distance(goal),
            Heuristic::Zero => 0.0,
        }
    }
}

/// Error returned when parsing an unknown heuristic name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown heuristic {0:?} (expected \"euclidean\" or \"zero\")")]
pub struct UnknownHeuristic(String);

impl FromStr for Heuristic {
    type Err = UnknownHeuristic;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "euclidean" => Ok(Heuristic::Euclidean),
            "zero" | "dijkstra" => Ok(Heuristic::Zero),
            _ => Err(UnknownHeuristic(s.to_string())),
        }
    }
}

impl fmt::Display for Heuristic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Heuristic::Euclidean => f.write_str("euclidean"),
            Heuristic::Zero => f.write_str("zero"),
        }
    }
}

/// Configuration parameters for route search.
#[derive(Debug, Clone, Default)]
pub struct SearchConfig {
    /// Frontier ordering heuristic.
    pub heuristic: Heuristic,
}

impl SearchConfig {
    /// Create a new configuration with the given heuristic.
    pub fn new(heuristic: Heuristic) -> Self {
        Self { heuristic }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let config = SearchConfig::default();
        assert_eq!(config.heuristic, Heuristic::Euclidean);
    }

    #[test]
    fn parse_heuristic() {
        assert_eq!("euclidean".parse(), Ok(Heuristic::Euclidean));
        assert_eq!(" Zero ".parse(), Ok(Heuristic::Zero));
        assert_eq!("dijkstra".parse(), Ok(Heuristic::Zero));
        assert!("manhattan".parse::<Heuristic>().is_err());
    }

    #[test]
    fn heuristic_display_roundtrip() {
        for h in [Heuristic::Euclidean, Heuristic::Zero] {
            assert_eq!(h.to_string().parse(), Ok(h));
        }
    }

    #[test]
    fn estimates() {
        let a = Pose::new(0.0, 0.0);
        let b = Pose::new(3.0, 4.0);

        assert_eq!(Heuristic::Euclidean.estimate(&a, &b), 5.0);
        assert_eq!(Heuristic::Zero.estimate(&a, &b), 0.0);
    }
}
