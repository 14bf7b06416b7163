//! User-selectable statistical functionals.
//!
//! A functional is chosen by a human-readable label ("Survival Function",
//! "ISF", "percent point function"). Labels are normalized (lowercase, all
//! whitespace removed) and matched against a closed table; each entry maps a
//! [`Functional`] to the kinds it applies to and an evaluator.

use serde::{Deserialize, Serialize};

use distboard_core::Kind;

use crate::handle::DistributionHandle;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Functional {
    Pdf,
    LogPdf,
    Pmf,
    LogPmf,
    Cdf,
    LogCdf,
    Sf,
    LogSf,
    Ppf,
    Isf,
}

type Evaluator = fn(&dyn DistributionHandle, f64) -> Result<f64, String>;

struct Entry {
    functional: Functional,
    label: &'static str,
    tokens: &'static [&'static str],
    kinds: &'static [Kind],
    eval: Evaluator,
}

const CONTINUOUS: &[Kind] = &[Kind::Continuous];
const DISCRETE: &[Kind] = &[Kind::Discrete];
const BOTH: &[Kind] = &[Kind::Continuous, Kind::Discrete];

// Indexed by discriminant; order must follow the enum.
const TABLE: &[Entry] = &[
    Entry {
        functional: Functional::Pdf,
        label: "Probability Density Function",
        tokens: &["pdf"],
        kinds: CONTINUOUS,
        eval: density,
    },
    Entry {
        functional: Functional::LogPdf,
        label: "Log Probability Density Function",
        tokens: &["logpdf"],
        kinds: CONTINUOUS,
        eval: log_density,
    },
    Entry {
        functional: Functional::Pmf,
        label: "Probability Mass Function",
        tokens: &["pmf"],
        kinds: DISCRETE,
        eval: density,
    },
    Entry {
        functional: Functional::LogPmf,
        label: "Log Probability Mass Function",
        tokens: &["logpmf"],
        kinds: DISCRETE,
        eval: log_density,
    },
    Entry {
        functional: Functional::Cdf,
        label: "Cumulative Distribution Function",
        tokens: &["cdf"],
        kinds: BOTH,
        eval: cumulative,
    },
    Entry {
        functional: Functional::LogCdf,
        label: "Log Cumulative Distribution Function",
        tokens: &["logcdf"],
        kinds: BOTH,
        eval: log_cumulative,
    },
    Entry {
        functional: Functional::Sf,
        label: "Survival Function",
        tokens: &["sf"],
        kinds: BOTH,
        eval: survival,
    },
    Entry {
        functional: Functional::LogSf,
        label: "Log Survival Function",
        tokens: &["logsf"],
        kinds: BOTH,
        eval: log_survival,
    },
    Entry {
        functional: Functional::Ppf,
        label: "Percent Point Function",
        tokens: &["ppf", "quantile", "quantilefunction"],
        kinds: BOTH,
        eval: percent_point,
    },
    Entry {
        functional: Functional::Isf,
        label: "Inverse Survival Function",
        tokens: &["isf"],
        kinds: BOTH,
        eval: inverse_survival,
    },
];

fn density(h: &dyn DistributionHandle, x: f64) -> Result<f64, String> {
    Ok(h.density(x))
}

fn log_density(h: &dyn DistributionHandle, x: f64) -> Result<f64, String> {
    Ok(h.log_density(x))
}

fn cumulative(h: &dyn DistributionHandle, x: f64) -> Result<f64, String> {
    Ok(h.cumulative(x))
}

fn log_cumulative(h: &dyn DistributionHandle, x: f64) -> Result<f64, String> {
    Ok(h.cumulative(x).ln())
}

fn survival(h: &dyn DistributionHandle, x: f64) -> Result<f64, String> {
    Ok(h.survival(x))
}

fn log_survival(h: &dyn DistributionHandle, x: f64) -> Result<f64, String> {
    Ok(h.survival(x).ln())
}

fn probability(p: f64) -> Result<f64, String> {
    if (0.0..=1.0).contains(&p) {
        Ok(p)
    } else {
        Err(format!("probability {} is outside [0, 1]", p))
    }
}

fn percent_point(h: &dyn DistributionHandle, p: f64) -> Result<f64, String> {
    Ok(h.quantile(probability(p)?))
}

fn inverse_survival(h: &dyn DistributionHandle, p: f64) -> Result<f64, String> {
    Ok(h.quantile(1.0 - probability(p)?))
}

/// Lowercase and strip all whitespace: "Survival Function" -> "survivalfunction".
pub fn normalize(label: &str) -> String {
    label
        .chars()
        .filter(|c| !c.is_whitespace())
        .flat_map(char::to_lowercase)
        .collect()
}

impl Functional {
    fn entry(self) -> &'static Entry {
        &TABLE[self as usize]
    }

    pub fn all() -> impl Iterator<Item = Functional> {
        TABLE.iter().map(|e| e.functional)
    }

    /// Functionals applicable to a distribution kind, in table order.
    pub fn available(kind: Kind) -> impl Iterator<Item = Functional> {
        Self::all().filter(move |f| f.supports(kind))
    }

    pub fn label(self) -> &'static str {
        self.entry().label
    }

    pub fn supports(self, kind: Kind) -> bool {
        self.entry().kinds.contains(&kind)
    }

    /// Match a user-facing label, ignoring case and whitespace.
    pub fn parse(label: &str) -> Option<Functional> {
        let token = normalize(label);
        if token.is_empty() {
            return None;
        }
        TABLE
            .iter()
            .find(|e| normalize(e.label) == token || e.tokens.contains(&token.as_str()))
            .map(|e| e.functional)
    }

    /// Evaluate at a single point. Errors describe an out-of-domain input.
    pub fn evaluate(self, handle: &dyn DistributionHandle, x: f64) -> Result<f64, String> {
        (self.entry().eval)(handle, x)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handle::{ContinuousHandle, DiscreteHandle};
    use statrs::distribution::{Normal, Poisson};

    #[test]
    fn table_follows_enum_order() {
        for (i, entry) in TABLE.iter().enumerate() {
            assert_eq!(entry.functional as usize, i, "{}", entry.label);
        }
    }

    #[test]
    fn labels_normalize() {
        assert_eq!(normalize("Survival Function"), "survivalfunction");
        assert_eq!(normalize("  Log SF "), "logsf");
        assert_eq!(Functional::parse("Survival Function"), Some(Functional::Sf));
        assert_eq!(Functional::parse("survival  function"), Some(Functional::Sf));
        assert_eq!(Functional::parse("ISF"), Some(Functional::Isf));
        assert_eq!(Functional::parse("Quantile"), Some(Functional::Ppf));
        assert_eq!(Functional::parse("Nonexistent Function"), None);
        assert_eq!(Functional::parse("   "), None);
    }

    #[test]
    fn kinds_partition_density_and_mass() {
        assert!(Functional::Pdf.supports(Kind::Continuous));
        assert!(!Functional::Pdf.supports(Kind::Discrete));
        assert!(Functional::Pmf.supports(Kind::Discrete));
        assert!(!Functional::Pmf.supports(Kind::Continuous));
        assert_eq!(Functional::available(Kind::Discrete).count(), 8);
        assert_eq!(Functional::available(Kind::Continuous).count(), 8);
    }

    #[test]
    fn survival_and_isf_are_consistent() {
        let h = ContinuousHandle(Normal::new(0.0, 1.0).unwrap());
        let sf = Functional::Sf.evaluate(&h, 1.0).unwrap();
        let back = Functional::Isf.evaluate(&h, sf).unwrap();
        assert!((back - 1.0).abs() < 1e-6);
    }

    #[test]
    fn quantiles_reject_out_of_domain_input() {
        let h = DiscreteHandle(Poisson::new(2.0).unwrap());
        assert!(Functional::Ppf.evaluate(&h, 1.5).is_err());
        assert!(Functional::Isf.evaluate(&h, -0.1).is_err());
        assert!(Functional::Ppf.evaluate(&h, f64::NAN).is_err());
        assert!(Functional::Ppf.evaluate(&h, 0.5).is_ok());
    }
}
