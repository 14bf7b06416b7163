use serde::Serialize;
use statrs::distribution::{Binomial, Exp, Geometric, Normal, Poisson, Uniform};
use statrs::statistics::Statistics;

/// Mean, variance, skewness and excess kurtosis ("mvsk").
///
/// Undefined moments are NaN.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Moments {
    pub mean: f64,
    pub variance: f64,
    pub skewness: f64,
    pub kurtosis: f64,
}

impl Moments {
    pub fn as_array(&self) -> [f64; 4] {
        [self.mean, self.variance, self.skewness, self.kurtosis]
    }
}

/// Closed-form excess kurtosis; statrs exposes the other three moments but
/// not this one.
pub trait ExcessKurtosis {
    fn excess_kurtosis(&self) -> f64;
}

impl ExcessKurtosis for Normal {
    fn excess_kurtosis(&self) -> f64 {
        0.0
    }
}

impl ExcessKurtosis for Exp {
    fn excess_kurtosis(&self) -> f64 {
        6.0
    }
}

impl ExcessKurtosis for Uniform {
    fn excess_kurtosis(&self) -> f64 {
        -6.0 / 5.0
    }
}

impl ExcessKurtosis for Poisson {
    fn excess_kurtosis(&self) -> f64 {
        1.0 / self.lambda()
    }
}

impl ExcessKurtosis for Binomial {
    fn excess_kurtosis(&self) -> f64 {
        let n = self.n() as f64;
        let pq = self.p() * (1.0 - self.p());
        (1.0 - 6.0 * pq) / (n * pq)
    }
}

impl ExcessKurtosis for Geometric {
    fn excess_kurtosis(&self) -> f64 {
        let p = self.p();
        6.0 + p * p / (1.0 - p)
    }
}

/// Moments of a drawn sample.
///
/// Variance is the unbiased (n - 1) estimate; skewness and kurtosis are the
/// biased moment ratios m3 / m2^1.5 and m4 / m2^2 - 3.
pub fn sample_moments(values: &[f64]) -> Moments {
    if values.is_empty() {
        return Moments {
            mean: f64::NAN,
            variance: f64::NAN,
            skewness: f64::NAN,
            kurtosis: f64::NAN,
        };
    }

    let mean = Statistics::mean(values);
    let variance = Statistics::variance(values);

    let n = values.len() as f64;
    let (mut m2, mut m3, mut m4) = (0.0, 0.0, 0.0);
    for &v in values {
        let d = v - mean;
        let d2 = d * d;
        m2 += d2;
        m3 += d2 * d;
        m4 += d2 * d2;
    }
    m2 /= n;
    m3 /= n;
    m4 /= n;

    Moments {
        mean,
        variance,
        skewness: m3 / m2.powf(1.5),
        kurtosis: m4 / (m2 * m2) - 3.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sample_moments_of_symmetric_data() {
        let m = sample_moments(&[1.0, 2.0, 3.0, 4.0, 5.0]);
        assert!((m.mean - 3.0).abs() < 1e-12);
        assert!((m.variance - 2.5).abs() < 1e-12);
        assert!(m.skewness.abs() < 1e-12);
        // m2 = 2, m4 = 6.8 -> 6.8 / 4 - 3
        assert!((m.kurtosis - (-1.3)).abs() < 1e-12);
    }

    #[test]
    fn skewed_sample_has_positive_skewness() {
        let m = sample_moments(&[0.0, 0.0, 0.0, 0.0, 10.0]);
        assert!(m.skewness > 0.0);
    }

    #[test]
    fn constant_sample_has_undefined_shape_moments() {
        let m = sample_moments(&[2.0, 2.0, 2.0]);
        assert_eq!(m.variance, 0.0);
        assert!(m.skewness.is_nan());
        assert!(m.kurtosis.is_nan());
    }

    #[test]
    fn closed_form_kurtosis() {
        assert_eq!(Normal::new(0.0, 1.0).unwrap().excess_kurtosis(), 0.0);
        assert!((Poisson::new(4.0).unwrap().excess_kurtosis() - 0.25).abs() < 1e-12);
        let b = Binomial::new(0.5, 10).unwrap();
        assert!((b.excess_kurtosis() - (-0.2)).abs() < 1e-12);
        let g = Geometric::new(0.5).unwrap();
        assert!((g.excess_kurtosis() - 6.5).abs() < 1e-12);
    }
}
