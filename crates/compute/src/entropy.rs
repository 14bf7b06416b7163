//! Differential / Shannon entropy in nats.
//!
//! statrs is inconsistent across families: `Geometric::entropy` is in bits
//! and `Poisson::entropy` is an asymptotic series that goes negative for
//! small rates. Continuous families are passed through; discrete ones are
//! computed here.

use statrs::distribution::{Binomial, Discrete, Exp, Geometric, Normal, Poisson, Uniform};
use statrs::statistics::Distribution as LibraryMoments;

/// Standard deviations on either side of the mean covered by a summed
/// entropy. The excluded tails carry no measurable mass at f64 precision.
const WINDOW_SDS: f64 = 40.0;

/// Above this rate the Poisson series is accurate to well below 1e-9.
const POISSON_SERIES_RATE: f64 = 1000.0;

pub trait Entropy {
    /// `None` when the entropy is undefined.
    fn entropy_nats(&self) -> Option<f64>;
}

impl Entropy for Normal {
    fn entropy_nats(&self) -> Option<f64> {
        self.entropy()
    }
}

impl Entropy for Exp {
    fn entropy_nats(&self) -> Option<f64> {
        self.entropy()
    }
}

impl Entropy for Uniform {
    fn entropy_nats(&self) -> Option<f64> {
        self.entropy()
    }
}

impl Entropy for Poisson {
    fn entropy_nats(&self) -> Option<f64> {
        let lambda = self.lambda();
        if lambda >= POISSON_SERIES_RATE {
            return self.entropy();
        }
        let (lo, hi) = window(lambda, lambda.sqrt(), u64::MAX);
        Some(summed_entropy(self, lo, hi))
    }
}

impl Entropy for Binomial {
    fn entropy_nats(&self) -> Option<f64> {
        let n = self.n();
        let p = self.p();
        let mean = n as f64 * p;
        let sd = (mean * (1.0 - p)).sqrt();
        let (lo, hi) = window(mean, sd, n);
        Some(summed_entropy(self, lo, hi))
    }
}

impl Entropy for Geometric {
    /// Closed form `(-(1 - p) ln(1 - p) - p ln p) / p`.
    fn entropy_nats(&self) -> Option<f64> {
        let p = self.p();
        if p >= 1.0 {
            return Some(0.0);
        }
        let q = 1.0 - p;
        Some((-q * q.ln() - p * p.ln()) / p)
    }
}

/// Support points within `WINDOW_SDS` standard deviations of `mean`,
/// clamped to `[0, max]`.
fn window(mean: f64, sd: f64, max: u64) -> (u64, u64) {
    let reach = WINDOW_SDS * sd + 10.0;
    let lo = (mean - reach).floor().max(0.0) as u64;
    let hi = (mean + reach).ceil().min(max as f64) as u64;
    (lo, hi.min(max))
}

/// `-sum p ln p` over `lo..=hi`.
fn summed_entropy<D: Discrete<u64, f64>>(d: &D, lo: u64, hi: u64) -> f64 {
    (lo..=hi)
        .map(|k| {
            let ln_p = d.ln_pmf(k);
            let p = ln_p.exp();
            if p > 0.0 {
                -p * ln_p
            } else {
                0.0
            }
        })
        .sum()
}
