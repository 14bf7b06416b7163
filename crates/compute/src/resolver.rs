//! Distribution Resolver: family name + parameters -> constructed distribution.

use std::fmt::Display;

use rand::rngs::StdRng;
use rand::SeedableRng;
use statrs::distribution::{Binomial, Exp, Geometric, Normal, Poisson, Uniform};
use tracing::debug;

use distboard_core::{DistError, DistResult, DistributionSpec, Family, Kind, Parameters, SampleShape, Stage};

use crate::fit::{FitError, Fitted};
use crate::functional::Functional;
use crate::handle::{ContinuousHandle, DiscreteHandle, DistributionHandle};
use crate::moments::Moments;
use crate::result::Grid;

/// Largest binomial trial count accepted. Entropy is summed over a window
/// that grows with the square root of the trial count.
pub const MAX_BINOMIAL_TRIALS: f64 = 1e9;

/// A parameterized distribution ready for sampling and evaluation.
pub struct ResolvedDistribution {
    family: Family,
    handle: Box<dyn DistributionHandle>,
}

impl std::fmt::Debug for ResolvedDistribution {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResolvedDistribution")
            .field("family", &self.family)
            .finish_non_exhaustive()
    }
}

/// Resolve a spec against the family registry and construct the distribution.
pub fn resolve(spec: &DistributionSpec) -> DistResult<ResolvedDistribution> {
    let family: Family = spec.name.parse()?;
    let fail = |cause: String| DistError::failure(family.id(), Stage::Construction, cause);

    if spec.is_continuous != family.kind().is_continuous() {
        let declared = if spec.is_continuous { Kind::Continuous } else { Kind::Discrete };
        return Err(fail(format!(
            "'{}' is a {} family but the request declared it {}",
            family,
            family.kind(),
            declared
        )));
    }

    let values = bind(family, &spec.parameters).map_err(fail)?;
    let handle = construct(family, &values).map_err(fail)?;
    debug!(family = %family, params = ?values, "resolved distribution");

    Ok(ResolvedDistribution { family, handle })
}

/// Bind named or positional parameters to the family's ordered schema.
fn bind(family: Family, parameters: &Parameters) -> Result<Vec<f64>, String> {
    let schema = family.params();

    let values = match parameters {
        Parameters::Positional(values) => {
            if values.len() != schema.len() {
                let names: Vec<&str> = schema.iter().map(|p| p.name).collect();
                return Err(format!(
                    "expected {} positional parameters ({}), got {}",
                    schema.len(),
                    names.join(", "),
                    values.len()
                ));
            }
            values.clone()
        }
        Parameters::Named(map) => {
            if let Some(unknown) = map.keys().find(|k| !schema.iter().any(|p| p.matches(k))) {
                return Err(format!("unexpected parameter '{}'", unknown));
            }
            schema
                .iter()
                .map(|param| {
                    let mut hits = map.iter().filter(|(k, _)| param.matches(k));
                    match (hits.next(), hits.next()) {
                        (Some((_, &v)), None) => Ok(v),
                        (None, _) => Err(format!("missing parameter '{}'", param.name)),
                        (Some(_), Some(_)) => Err(format!("parameter '{}' given more than once", param.name)),
                    }
                })
                .collect::<Result<Vec<_>, _>>()?
        }
    };

    for (param, &v) in schema.iter().zip(&values) {
        if !v.is_finite() {
            return Err(format!("parameter '{}' must be finite, got {}", param.name, v));
        }
        if param.integer && (v < 0.0 || v.fract() != 0.0) {
            return Err(format!(
                "parameter '{}' must be a non-negative whole number, got {}",
                param.name, v
            ));
        }
    }

    Ok(values)
}

fn library<T, E: Display>(built: Result<T, E>) -> Result<T, String> {
    built.map_err(|e| e.to_string())
}

fn construct(family: Family, values: &[f64]) -> Result<Box<dyn DistributionHandle>, String> {
    let handle: Box<dyn DistributionHandle> = match (family, values) {
        (Family::Normal, &[mean, sd]) => Box::new(ContinuousHandle(library(Normal::new(mean, sd))?)),
        (Family::Exponential, &[scale]) => {
            if scale <= 0.0 {
                return Err(format!("scale must be positive, got {}", scale));
            }
            Box::new(ContinuousHandle(library(Exp::new(1.0 / scale))?))
        }
        (Family::Uniform, &[low, high]) => Box::new(ContinuousHandle(library(Uniform::new(low, high))?)),
        (Family::Poisson, &[events]) => Box::new(DiscreteHandle(library(Poisson::new(events))?)),
        (Family::Binomial, &[trials, prob]) => {
            if trials > MAX_BINOMIAL_TRIALS {
                return Err(format!("trials must be at most {}, got {}", MAX_BINOMIAL_TRIALS, trials));
            }
            Box::new(DiscreteHandle(library(Binomial::new(prob, trials as u64))?))
        }
        (Family::Geometric, &[prob]) => Box::new(DiscreteHandle(library(Geometric::new(prob))?)),
        _ => {
            return Err(format!(
                "expected {} parameters for {}, got {}",
                family.params().len(),
                family,
                values.len()
            ))
        }
    };
    Ok(handle)
}

impl ResolvedDistribution {
    pub fn family(&self) -> Family {
        self.family
    }

    pub fn kind(&self) -> Kind {
        self.handle.kind()
    }

    pub fn handle(&self) -> &dyn DistributionHandle {
        self.handle.as_ref()
    }

    /// Draw `n` variates. A seed makes the draw reproducible.
    pub fn sample(&self, n: usize, seed: Option<u64>) -> Vec<f64> {
        let mut rng = rng_for(seed);
        (0..n).map(|_| self.handle.draw(&mut rng)).collect()
    }

    /// Draw a grid of the requested shape in row-major order.
    ///
    /// Matrix and flat draws share one stream, so a seeded `rows × cols`
    /// grid flattens to the seeded flat draw of `rows * cols` variates.
    pub fn sample_grid(&self, shape: SampleShape, seed: Option<u64>) -> Grid {
        Grid::new(shape, self.sample(shape.total(), seed))
    }

    pub fn density(&self, x: f64) -> f64 {
        self.handle.density(x)
    }

    pub fn log_density(&self, x: f64) -> f64 {
        self.handle.log_density(x)
    }

    pub fn cumulative(&self, x: f64) -> f64 {
        self.handle.cumulative(x)
    }

    pub fn survival(&self, x: f64) -> f64 {
        self.handle.survival(x)
    }

    /// Inverse CDF; `None` outside [0, 1].
    pub fn quantile(&self, p: f64) -> Option<f64> {
        (0.0..=1.0).contains(&p).then(|| self.handle.quantile(p))
    }

    /// Resolve a functional label for this distribution's kind.
    pub fn functional(&self, label: &str) -> DistResult<Functional> {
        match Functional::parse(label) {
            Some(f) if f.supports(self.kind()) => Ok(f),
            _ => Err(DistError::unsupported(self.family.id(), label)),
        }
    }

    pub fn evaluate(&self, functional: Functional, x: f64) -> DistResult<f64> {
        functional
            .evaluate(self.handle(), x)
            .map_err(|cause| DistError::failure(self.family.id(), Stage::Functional, format!("{}: {}", functional.label(), cause)))
    }

    pub fn moments(&self) -> Moments {
        self.handle.moments()
    }

    /// Entropy in nats; NaN when the library leaves it undefined.
    pub fn entropy(&self) -> f64 {
        self.handle.entropy().unwrap_or(f64::NAN)
    }

    /// Loc/scale refit; `None` for families without fitting support.
    pub fn fit(&self, samples: &[f64]) -> Option<Result<Fitted, FitError>> {
        self.handle.fit(samples)
    }
}

fn rng_for(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spec(name: &str, continuous: bool, parameters: Parameters) -> DistributionSpec {
        DistributionSpec {
            name: name.to_string(),
            is_continuous: continuous,
            parameters,
        }
    }

    fn construction_cause(err: DistError) -> String {
        match err {
            DistError::GenerationFailure { stage: Stage::Construction, cause, .. } => cause,
            other => panic!("expected construction failure, got {other:?}"),
        }
    }

    #[test]
    fn named_and_positional_binding_agree() {
        let named = resolve(&spec("norm", true, Parameters::named([("sd", 2.0), ("mean", 1.0)]))).unwrap();
        let positional = resolve(&spec("Normal", true, Parameters::positional(vec![1.0, 2.0]))).unwrap();
        assert_eq!(named.moments(), positional.moments());
        assert_eq!(named.moments().mean, 1.0);
        assert_eq!(named.moments().variance, 4.0);
    }

    #[test]
    fn aliases_bind_by_keyword() {
        let d = resolve(&spec("binom", false, Parameters::named([("n", 10.0), ("p", 0.5)]))).unwrap();
        assert_eq!(d.family(), Family::Binomial);
        assert_eq!(d.moments().mean, 5.0);
    }

    #[test]
    fn unknown_family_is_reported() {
        let err = resolve(&spec("frobnicate", true, Parameters::positional(Vec::<f64>::new()))).unwrap_err();
        assert_eq!(err, DistError::UnknownDistribution("frobnicate".into()));
    }

    #[test]
    fn binding_errors_are_construction_failures() {
        let missing = resolve(&spec("norm", true, Parameters::named([("mean", 0.0)]))).unwrap_err();
        assert!(construction_cause(missing).contains("missing parameter 'sd'"));

        let extra = resolve(&spec("poisson", false, Parameters::named([("events", 1.0), ("obs", 5.0)]))).unwrap_err();
        assert!(construction_cause(extra).contains("unexpected parameter 'obs'"));

        let arity = resolve(&spec("uniform", true, Parameters::positional(vec![0.0]))).unwrap_err();
        assert!(construction_cause(arity).contains("expected 2 positional parameters"));

        let dup = resolve(&spec("norm", true, Parameters::named([("mean", 0.0), ("loc", 1.0), ("sd", 1.0)]))).unwrap_err();
        assert!(construction_cause(dup).contains("more than once"));

        let fractional = resolve(&spec("binom", false, Parameters::positional(vec![2.5, 0.5]))).unwrap_err();
        assert!(construction_cause(fractional).contains("whole number"));
    }

    #[test]
    fn library_rejections_surface_as_construction_failures() {
        let err = resolve(&spec("norm", true, Parameters::positional(vec![0.0, -1.0]))).unwrap_err();
        assert_eq!(err.kind(), "generation_failure");

        let err = resolve(&spec("expon", true, Parameters::positional(vec![0.0]))).unwrap_err();
        assert!(construction_cause(err).contains("scale must be positive"));
    }

    #[test]
    fn binomial_trials_are_capped() {
        let err = resolve(&spec("binom", false, Parameters::positional(vec![3e9, 0.5]))).unwrap_err();
        assert!(construction_cause(err).contains("trials must be at most"));

        let err = resolve(&spec("binom", false, Parameters::positional(vec![1e30, 0.5]))).unwrap_err();
        assert!(construction_cause(err).contains("trials must be at most"));

        let d = resolve(&spec("binom", false, Parameters::positional(vec![MAX_BINOMIAL_TRIALS, 0.5]))).unwrap();
        assert_eq!(d.moments().mean, 5e8);
    }

    #[test]
    fn kind_mismatch_is_rejected() {
        let err = resolve(&spec("poisson", true, Parameters::positional(vec![3.0]))).unwrap_err();
        assert!(construction_cause(err).contains("discrete"));
    }

    #[test]
    fn seeded_sampling_is_reproducible() {
        let d = resolve(&spec("expon", true, Parameters::named([("scale", 2.0)]))).unwrap();
        assert_eq!(d.sample(50, Some(7)), d.sample(50, Some(7)));
        assert_ne!(d.sample(50, Some(7)), d.sample(50, Some(8)));
    }

    #[test]
    fn matrix_draw_flattens_to_flat_draw() {
        let d = resolve(&spec("poisson", false, Parameters::positional(vec![4.0]))).unwrap();
        let grid = d.sample_grid(SampleShape::Matrix { rows: 5, cols: 3 }, Some(42));
        let flat = d.sample_grid(SampleShape::Flat(15), Some(42));
        assert_eq!((grid.rows, grid.cols), (5, 3));
        assert_eq!(grid.flatten(), flat.flatten());
    }

    #[test]
    fn quantile_checks_its_domain() {
        let d = resolve(&spec("norm", true, Parameters::positional(vec![3.0, 1.0]))).unwrap();
        assert!((d.quantile(0.5).unwrap() - 3.0).abs() < 1e-9);
        assert_eq!(d.quantile(1.5), None);
        let expected = -0.5 * (2.0 * std::f64::consts::PI).ln();
        assert!((d.log_density(3.0) - expected).abs() < 1e-12);
    }

    #[test]
    fn functional_lookup_respects_kind() {
        let poisson = resolve(&spec("poisson", false, Parameters::positional(vec![4.0]))).unwrap();
        assert_eq!(poisson.functional("Probability Mass Function").unwrap(), Functional::Pmf);
        let err = poisson.functional("pdf").unwrap_err();
        assert_eq!(err, DistError::unsupported("poisson", "pdf"));
        assert!(matches!(
            poisson.functional("Nonexistent Function"),
            Err(DistError::UnsupportedOperation { .. })
        ));
    }
}
