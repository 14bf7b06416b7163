//! Maximum-likelihood loc/scale re-estimation for continuous families.

use serde::Serialize;
use statrs::distribution::{Exp, Normal, Uniform};
use statrs::statistics::Statistics;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Fitted {
    pub loc: f64,
    pub scale: f64,
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum FitError {
    #[error("cannot fit an empty sample")]
    Empty,

    #[error("sample contains non-finite values")]
    NonFinite,

    #[error("fit diverged: scale estimate {0} is not positive")]
    Degenerate(f64),
}

pub trait FitLocScale {
    fn fit_loc_scale(samples: &[f64]) -> Result<Fitted, FitError>;
}

fn checked(samples: &[f64]) -> Result<&[f64], FitError> {
    if samples.is_empty() {
        return Err(FitError::Empty);
    }
    if samples.iter().any(|v| !v.is_finite()) {
        return Err(FitError::NonFinite);
    }
    Ok(samples)
}

fn finish(loc: f64, scale: f64) -> Result<Fitted, FitError> {
    if scale > 0.0 && scale.is_finite() {
        Ok(Fitted { loc, scale })
    } else {
        Err(FitError::Degenerate(scale))
    }
}

impl FitLocScale for Normal {
    fn fit_loc_scale(samples: &[f64]) -> Result<Fitted, FitError> {
        let samples = checked(samples)?;
        finish(Statistics::mean(samples), Statistics::population_std_dev(samples))
    }
}

impl FitLocScale for Exp {
    fn fit_loc_scale(samples: &[f64]) -> Result<Fitted, FitError> {
        let samples = checked(samples)?;
        let loc = Statistics::min(samples);
        finish(loc, Statistics::mean(samples) - loc)
    }
}

impl FitLocScale for Uniform {
    fn fit_loc_scale(samples: &[f64]) -> Result<Fitted, FitError> {
        let samples = checked(samples)?;
        let loc = Statistics::min(samples);
        finish(loc, Statistics::max(samples) - loc)
    }
}
