//! Closed registry of supported distribution families.
//!
//! Every family the dashboard can generate from is a variant of [`Family`].
//! The registry describes how a family is parameterized (ordered parameter
//! schema with aliases), whether it is continuous or discrete, and whether
//! it can be refitted from samples.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::DistError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Kind {
    Continuous,
    Discrete,
}

impl Kind {
    pub fn is_continuous(self) -> bool {
        matches!(self, Kind::Continuous)
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Kind::Continuous => f.write_str("continuous"),
            Kind::Discrete => f.write_str("discrete"),
        }
    }
}

/// One parameter of a family's construction schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParamSpec {
    pub name: &'static str,
    pub aliases: &'static [&'static str],
    /// Parameter must be a non-negative whole number.
    pub integer: bool,
}

impl ParamSpec {
    const fn real(name: &'static str, aliases: &'static [&'static str]) -> Self {
        Self { name, aliases, integer: false }
    }

    const fn count(name: &'static str, aliases: &'static [&'static str]) -> Self {
        Self { name, aliases, integer: true }
    }

    /// True when `key` names this parameter (case-insensitive).
    pub fn matches(&self, key: &str) -> bool {
        let key = key.trim();
        self.name.eq_ignore_ascii_case(key) || self.aliases.iter().any(|a| a.eq_ignore_ascii_case(key))
    }
}

const NORMAL_PARAMS: &[ParamSpec] = &[
    ParamSpec::real("mean", &["loc", "mu"]),
    ParamSpec::real("sd", &["scale", "sigma"]),
];
const EXPONENTIAL_PARAMS: &[ParamSpec] = &[ParamSpec::real("scale", &[])];
const UNIFORM_PARAMS: &[ParamSpec] = &[ParamSpec::real("low", &[]), ParamSpec::real("high", &[])];
const POISSON_PARAMS: &[ParamSpec] = &[ParamSpec::real("events", &["mu", "lambda"])];
const BINOMIAL_PARAMS: &[ParamSpec] = &[
    ParamSpec::count("trials", &["n"]),
    ParamSpec::real("prob", &["p"]),
];
const GEOMETRIC_PARAMS: &[ParamSpec] = &[ParamSpec::real("prob", &["p"])];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Family {
    Normal,
    Exponential,
    Uniform,
    Poisson,
    Binomial,
    Geometric,
}

impl Family {
    /// All families in display order.
    pub fn all() -> &'static [Family] {
        &[
            Family::Normal,
            Family::Poisson,
            Family::Exponential,
            Family::Geometric,
            Family::Binomial,
            Family::Uniform,
        ]
    }

    /// Short identifier, as used by statistics libraries (`norm`, `binom`, ...).
    pub fn id(self) -> &'static str {
        match self {
            Family::Normal => "norm",
            Family::Exponential => "expon",
            Family::Uniform => "uniform",
            Family::Poisson => "poisson",
            Family::Binomial => "binom",
            Family::Geometric => "geom",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Family::Normal => "Normal",
            Family::Exponential => "Exponential",
            Family::Uniform => "Uniform",
            Family::Poisson => "Poisson",
            Family::Binomial => "Binomial",
            Family::Geometric => "Geometric",
        }
    }

    pub fn kind(self) -> Kind {
        match self {
            Family::Normal | Family::Exponential | Family::Uniform => Kind::Continuous,
            Family::Poisson | Family::Binomial | Family::Geometric => Kind::Discrete,
        }
    }

    /// Whether loc/scale can be re-estimated from drawn samples.
    pub fn supports_fit(self) -> bool {
        self.kind().is_continuous()
    }

    /// Ordered parameter schema; positional binding follows this order.
    pub fn params(self) -> &'static [ParamSpec] {
        match self {
            Family::Normal => NORMAL_PARAMS,
            Family::Exponential => EXPONENTIAL_PARAMS,
            Family::Uniform => UNIFORM_PARAMS,
            Family::Poisson => POISSON_PARAMS,
            Family::Binomial => BINOMIAL_PARAMS,
            Family::Geometric => GEOMETRIC_PARAMS,
        }
    }
}

impl fmt::Display for Family {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for Family {
    type Err = DistError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim();
        Family::all()
            .iter()
            .copied()
            .find(|f| f.id().eq_ignore_ascii_case(needle) || f.label().eq_ignore_ascii_case(needle))
            .ok_or_else(|| DistError::UnknownDistribution(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_ids_and_labels() {
        assert_eq!("norm".parse::<Family>().unwrap(), Family::Normal);
        assert_eq!("Normal".parse::<Family>().unwrap(), Family::Normal);
        assert_eq!(" BINOM ".parse::<Family>().unwrap(), Family::Binomial);
        assert_eq!("geometric".parse::<Family>().unwrap(), Family::Geometric);
    }

    #[test]
    fn unknown_name_is_rejected() {
        let err = "frobnicate".parse::<Family>().unwrap_err();
        assert_eq!(err, DistError::UnknownDistribution("frobnicate".into()));
    }

    #[test]
    fn only_continuous_families_fit() {
        for family in Family::all() {
            assert_eq!(family.supports_fit(), family.kind() == Kind::Continuous);
        }
    }

    #[test]
    fn param_aliases_match() {
        let sd = &Family::Normal.params()[1];
        assert!(sd.matches("sd"));
        assert!(sd.matches("Scale"));
        assert!(!sd.matches("mean"));
        assert!(Family::Binomial.params()[0].integer);
    }
}
