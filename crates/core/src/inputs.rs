//! Normalization of raw dashboard inputs before a generation request is built.

use serde::{Deserialize, Serialize};

use crate::family::Family;
use crate::request::{Parameters, SampleShape};

/// Probability substituted when a non-positive probability is entered.
pub const MIN_PROBABILITY_FALLBACK: f64 = 0.1;

/// Bounds of the observation slider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObservationRange {
    pub min: usize,
    pub max: usize,
}

impl ObservationRange {
    pub fn new(min: usize, max: usize) -> Self {
        Self { min, max }
    }

    /// Swap the bounds when they were entered the wrong way round.
    pub fn normalized(self) -> Self {
        if self.min > self.max {
            Self { min: self.max, max: self.min }
        } else {
            self
        }
    }

    /// Clamp a requested observation count into the normalized range.
    pub fn clamp(self, observations: usize) -> usize {
        let range = self.normalized();
        observations.clamp(range.min, range.max)
    }

    /// Dashboard matrix mode draws a `min × max` grid.
    pub fn matrix_shape(self) -> SampleShape {
        let range = self.normalized();
        SampleShape::Matrix {
            rows: range.min,
            cols: range.max,
        }
    }

    /// Default slider position: half way to the upper bound.
    pub fn midpoint(self) -> usize {
        self.normalized().max / 2
    }
}

/// Keep a probability input inside (0, 1].
pub fn clamp_probability(p: f64) -> f64 {
    if p > 1.0 {
        1.0
    } else if p <= 0.0 {
        MIN_PROBABILITY_FALLBACK
    } else {
        p
    }
}

/// Clamp every probability-typed parameter of `family`.
pub fn normalize_parameters(family: Family, parameters: Parameters) -> Parameters {
    let schema = family.params();
    match parameters {
        Parameters::Named(mut map) => {
            for (key, value) in map.iter_mut() {
                if schema.iter().any(|p| p.name == "prob" && p.matches(key)) {
                    *value = clamp_probability(*value);
                }
            }
            Parameters::Named(map)
        }
        Parameters::Positional(mut values) => {
            for (param, value) in schema.iter().zip(values.iter_mut()) {
                if param.name == "prob" {
                    *value = clamp_probability(*value);
                }
            }
            Parameters::Positional(values)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn swapped_bounds_are_normalized() {
        let range = ObservationRange::new(500, 10).normalized();
        assert_eq!(range, ObservationRange::new(10, 500));
    }

    #[test]
    fn observations_are_clamped() {
        let range = ObservationRange::new(10, 100);
        assert_eq!(range.clamp(5), 10);
        assert_eq!(range.clamp(50), 50);
        assert_eq!(range.clamp(1_000), 100);
        assert_eq!(ObservationRange::new(100, 10).clamp(1_000), 100);
    }

    #[test]
    fn matrix_shape_uses_range() {
        let shape = ObservationRange::new(3, 5).matrix_shape();
        assert_eq!(shape, SampleShape::Matrix { rows: 3, cols: 5 });
        assert_eq!(ObservationRange::new(5, 3).matrix_shape().total(), 15);
    }

    #[test]
    fn probability_is_clamped() {
        assert_eq!(clamp_probability(1.5), 1.0);
        assert_eq!(clamp_probability(0.0), MIN_PROBABILITY_FALLBACK);
        assert_eq!(clamp_probability(-2.0), MIN_PROBABILITY_FALLBACK);
        assert_eq!(clamp_probability(0.3), 0.3);
    }

    #[test]
    fn probability_parameters_are_clamped_in_both_bindings() {
        let named = normalize_parameters(
            Family::Binomial,
            Parameters::named([("trials", 10.0), ("p", 1.7)]),
        );
        assert_eq!(named, Parameters::named([("trials", 10.0), ("p", 1.0)]));

        let positional = normalize_parameters(Family::Binomial, Parameters::positional(vec![10.0, -0.5]));
        assert_eq!(positional, Parameters::positional(vec![10.0, MIN_PROBABILITY_FALLBACK]));

        let untouched = normalize_parameters(Family::Normal, Parameters::positional(vec![2.0, 3.0]));
        assert_eq!(untouched, Parameters::positional(vec![2.0, 3.0]));
    }
}
