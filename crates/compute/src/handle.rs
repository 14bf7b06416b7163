//! Object-safe view over a constructed statrs distribution.
//!
//! Continuous and discrete statrs types expose different trait sets
//! (`Continuous`/`ContinuousCDF` over `f64` vs `Discrete`/`DiscreteCDF` over
//! `u64`). The two adapters below bring both under [`DistributionHandle`] so
//! the assembler works on real-valued points regardless of kind.

use rand::distributions::Distribution as Sampler;
use rand::rngs::StdRng;
use rand_distr::Binomial as BinomialSampler;
use statrs::distribution::{Binomial, Continuous, ContinuousCDF, Discrete, DiscreteCDF, Geometric, Poisson};
use statrs::statistics::{Distribution as LibraryMoments, Max, Min};

use distboard_core::Kind;

use crate::entropy::Entropy;
use crate::fit::{FitError, FitLocScale, Fitted};
use crate::moments::{ExcessKurtosis, Moments};

pub trait DistributionHandle: Send + Sync {
    fn kind(&self) -> Kind;

    /// Draw a single variate.
    fn draw(&self, rng: &mut StdRng) -> f64;

    /// Density for continuous families, mass for discrete ones.
    fn density(&self, x: f64) -> f64;

    fn log_density(&self, x: f64) -> f64;

    fn cumulative(&self, x: f64) -> f64;

    fn survival(&self, x: f64) -> f64;

    /// Inverse of `cumulative`. Callers must pass `p` within [0, 1].
    fn quantile(&self, p: f64) -> f64;

    fn moments(&self) -> Moments;

    fn entropy(&self) -> Option<f64>;

    /// `None` when the family cannot be refitted.
    fn fit(&self, samples: &[f64]) -> Option<Result<Fitted, FitError>>;
}

fn library_moments<D: LibraryMoments<f64> + ExcessKurtosis>(d: &D) -> Moments {
    Moments {
        mean: d.mean().unwrap_or(f64::NAN),
        variance: d.variance().unwrap_or(f64::NAN),
        skewness: d.skewness().unwrap_or(f64::NAN),
        kurtosis: d.excess_kurtosis(),
    }
}

// ── Continuous ────────────────────────────────────────────────

pub struct ContinuousHandle<D>(pub D);

impl<D> DistributionHandle for ContinuousHandle<D>
where
    D: Continuous<f64, f64>
        + ContinuousCDF<f64, f64>
        + LibraryMoments<f64>
        + Sampler<f64>
        + ExcessKurtosis
        + Entropy
        + FitLocScale
        + Send
        + Sync,
{
    fn kind(&self) -> Kind {
        Kind::Continuous
    }

    fn draw(&self, rng: &mut StdRng) -> f64 {
        self.0.sample(rng)
    }

    fn density(&self, x: f64) -> f64 {
        self.0.pdf(x)
    }

    fn log_density(&self, x: f64) -> f64 {
        self.0.ln_pdf(x)
    }

    fn cumulative(&self, x: f64) -> f64 {
        self.0.cdf(x)
    }

    fn survival(&self, x: f64) -> f64 {
        self.0.sf(x)
    }

    fn quantile(&self, p: f64) -> f64 {
        self.0.inverse_cdf(p)
    }

    fn moments(&self) -> Moments {
        library_moments(&self.0)
    }

    fn entropy(&self) -> Option<f64> {
        self.0.entropy_nats()
    }

    fn fit(&self, samples: &[f64]) -> Option<Result<Fitted, FitError>> {
        Some(D::fit_loc_scale(samples))
    }
}

// ── Discrete ──────────────────────────────────────────────────

/// Per-family variate generator for the discrete adapter.
pub trait DiscreteVariate {
    fn variate(&self, rng: &mut StdRng) -> f64;
}

impl DiscreteVariate for Poisson {
    fn variate(&self, rng: &mut StdRng) -> f64 {
        Sampler::<f64>::sample(self, rng)
    }
}

impl DiscreteVariate for Geometric {
    fn variate(&self, rng: &mut StdRng) -> f64 {
        Sampler::<f64>::sample(self, rng)
    }
}

/// statrs runs one Bernoulli trial per unit of `n` for every draw; BTPE
/// keeps the cost independent of the trial count.
impl DiscreteVariate for Binomial {
    fn variate(&self, rng: &mut StdRng) -> f64 {
        BinomialSampler::new(self.n(), self.p()).map_or(f64::NAN, |btpe| btpe.sample(rng) as f64)
    }
}

pub struct DiscreteHandle<D>(pub D);

/// Integer support point for `x`, if it is one.
fn lattice_point(x: f64) -> Option<u64> {
    if x.is_finite() && x >= 0.0 && x.fract() == 0.0 {
        Some(x as u64)
    } else {
        None
    }
}

impl<D> DiscreteHandle<D>
where
    D: DiscreteCDF<u64, f64>,
{
    fn upper_bound(&self) -> f64 {
        let max = Max::max(&self.0);
        if max == u64::MAX {
            f64::INFINITY
        } else {
            max as f64
        }
    }
}

impl<D> DistributionHandle for DiscreteHandle<D>
where
    D: Discrete<u64, f64>
        + DiscreteCDF<u64, f64>
        + LibraryMoments<f64>
        + DiscreteVariate
        + ExcessKurtosis
        + Entropy
        + Send
        + Sync,
{
    fn kind(&self) -> Kind {
        Kind::Discrete
    }

    fn draw(&self, rng: &mut StdRng) -> f64 {
        self.0.variate(rng)
    }

    fn density(&self, x: f64) -> f64 {
        lattice_point(x).map_or(0.0, |k| self.0.pmf(k))
    }

    fn log_density(&self, x: f64) -> f64 {
        lattice_point(x).map_or(f64::NEG_INFINITY, |k| self.0.ln_pmf(k))
    }

    fn cumulative(&self, x: f64) -> f64 {
        if x.is_nan() {
            f64::NAN
        } else if x < 0.0 {
            0.0
        } else if x.is_infinite() {
            1.0
        } else {
            self.0.cdf(x.floor() as u64)
        }
    }

    fn survival(&self, x: f64) -> f64 {
        if x.is_nan() {
            f64::NAN
        } else if x < 0.0 {
            1.0
        } else if x.is_infinite() {
            0.0
        } else {
            self.0.sf(x.floor() as u64)
        }
    }

    /// Smallest support point `k` with `cdf(k) >= p`.
    fn quantile(&self, p: f64) -> f64 {
        let lower = Min::min(&self.0);
        let upper = Max::max(&self.0);
        if p == 0.0 {
            return lower as f64 - 1.0;
        }
        if p >= 1.0 {
            return self.upper_bound();
        }
        if self.0.cdf(lower) >= p {
            return lower as f64;
        }

        // Invariant: cdf(lo) < p <= cdf(hi).
        let mut lo = lower;
        let mut hi = std::cmp::max(lower, 1);
        while self.0.cdf(hi) < p {
            if hi >= upper {
                return self.upper_bound();
            }
            lo = hi;
            hi = std::cmp::min(hi.saturating_mul(2), upper);
        }
        while hi - lo > 1 {
            let mid = lo + (hi - lo) / 2;
            if self.0.cdf(mid) >= p {
                hi = mid;
            } else {
                lo = mid;
            }
        }
        hi as f64
    }

    fn moments(&self) -> Moments {
        library_moments(&self.0)
    }

    fn entropy(&self) -> Option<f64> {
        self.0.entropy_nats()
    }

    fn fit(&self, _samples: &[f64]) -> Option<Result<Fitted, FitError>> {
        None
    }
}
