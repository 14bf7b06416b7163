use serde::Serialize;

/// Equal-width histogram of a flattened sample.
///
/// `edges` has `counts.len() + 1` entries. Every bin is half-open except the
/// last, which also holds the maximum.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Histogram {
    pub edges: Vec<f64>,
    pub counts: Vec<usize>,
}

impl Histogram {
    /// Bin the finite values into `bins` equal-width buckets over their range.
    pub fn from_values(values: &[f64], bins: usize) -> Self {
        let finite: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
        if finite.is_empty() || bins == 0 {
            return Self {
                edges: Vec::new(),
                counts: Vec::new(),
            };
        }

        let min = finite.iter().copied().fold(f64::INFINITY, f64::min);
        let max = finite.iter().copied().fold(f64::NEG_INFINITY, f64::max);

        // A constant sample gets one unit-wide bin centred on the value.
        if min == max {
            return Self {
                edges: vec![min - 0.5, max + 0.5],
                counts: vec![finite.len()],
            };
        }

        let width = (max - min) / bins as f64;
        let edges: Vec<f64> = (0..=bins)
            .map(|i| if i == bins { max } else { min + width * i as f64 })
            .collect();

        let mut counts = vec![0usize; bins];
        for x in finite {
            let slot = ((x - min) / width).floor() as usize;
            counts[slot.min(bins - 1)] += 1;
        }

        Self { edges, counts }
    }

    pub fn bins(&self) -> usize {
        self.counts.len()
    }

    pub fn total(&self) -> usize {
        self.counts.iter().sum()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_every_finite_value() {
        let values = [0.0, 0.1, 0.5, 0.9, 1.0, f64::NAN, f64::INFINITY];
        let h = Histogram::from_values(&values, 2);
        assert_eq!(h.edges, vec![0.0, 0.5, 1.0]);
        assert_eq!(h.counts, vec![2, 3]);
        assert_eq!(h.total(), 5);
    }

    #[test]
    fn maximum_lands_in_last_bin() {
        let values: Vec<f64> = (0..=10).map(f64::from).collect();
        let h = Histogram::from_values(&values, 5);
        assert_eq!(h.bins(), 5);
        assert_eq!(h.counts, vec![2, 2, 2, 2, 3]);
    }

    #[test]
    fn constant_sample_gets_a_single_bin() {
        let h = Histogram::from_values(&[3.0, 3.0, 3.0], 10);
        assert_eq!(h.edges, vec![2.5, 3.5]);
        assert_eq!(h.counts, vec![3]);
    }

    #[test]
    fn empty_input_is_empty() {
        assert!(Histogram::from_values(&[], 10).is_empty());
        assert!(Histogram::from_values(&[f64::NAN], 10).is_empty());
        assert!(Histogram::from_values(&[1.0, 2.0], 0).is_empty());
    }
}
