//! Concentration-time output of a simulation

use serde::{Deserialize, Serialize};

use crate::drug::TherapeuticRange;

/// Maximum concentration and the time it first occurs
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Peak {
    /// Maximum concentration
    pub cmax: f64,
    /// Time of maximum concentration
    pub tmax: f64,
    /// Index in the sample arrays
    pub index: usize,
}

/// Ordered (time, concentration) samples over one dosing interval
///
/// Times are in hours, concentrations in mg/L. Both vectors always have the same length.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConcentrationTrajectory {
    times: Vec<f64>,
    concentrations: Vec<f64>,
}

impl ConcentrationTrajectory {
    pub(crate) fn new(times: Vec<f64>, concentrations: Vec<f64>) -> Self {
        debug_assert_eq!(times.len(), concentrations.len());
        Self {
            times,
            concentrations,
        }
    }

    pub fn len(&self) -> usize {
        self.times.len()
    }

    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }

    pub fn times(&self) -> &[f64] {
        &self.times
    }

    pub fn concentrations(&self) -> &[f64] {
        &self.concentrations
    }

    /// Iterate over `(time, concentration)` pairs
    pub fn iter(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.times
            .iter()
            .copied()
            .zip(self.concentrations.iter().copied())
    }

    pub fn first(&self) -> Option<(f64, f64)> {
        self.iter().next()
    }

    pub fn last(&self) -> Option<(f64, f64)> {
        self.iter().last()
    }

    /// Cmax / Tmax. Ties resolve to the earliest sample.
    pub fn peak(&self) -> Option<Peak> {
        let mut peak: Option<Peak> = None;
        for (index, (tmax, cmax)) in self.iter().enumerate() {
            if peak.map_or(true, |p| cmax > p.cmax) {
                peak = Some(Peak { cmax, tmax, index });
            }
        }
        peak
    }

    /// Area under the curve over the sampled window, linear trapezoidal rule (mg·h/L)
    pub fn auc(&self) -> f64 {
        self.times
            .windows(2)
            .zip(self.concentrations.windows(2))
            .map(|(t, c)| (t[1] - t[0]) * (c[0] + c[1]) / 2.0)
            .sum()
    }

    /// Fraction of samples whose concentration lies within `range`
    pub fn fraction_within(&self, range: &TherapeuticRange) -> f64 {
        if self.is_empty() {
            return 0.0;
        }
        let inside = self
            .concentrations
            .iter()
            .filter(|&&c| range.contains(c))
            .count();
        inside as f64 / self.len() as f64
    }
}
