pub mod analytical;
pub mod integrator;
pub mod trajectory;

use serde::{Deserialize, Serialize};

use crate::{dose::DoseRecommendation, DosingError};
use analytical::one_compartment_constant_input;
use integrator::{validate_grid, Integrator};
pub use trajectory::{ConcentrationTrajectory, Peak};

pub type T = f64;
pub type V = nalgebra::DVector<T>;
pub type M = nalgebra::DMatrix<T>;

/// Default first-order absorption rate constant (1/h)
pub const DEFAULT_KA: f64 = 1.2;
/// Default number of output samples
pub const DEFAULT_SAMPLE_COUNT: usize = 100;
/// Default simulated window (h), one dosing interval
pub const DEFAULT_HORIZON: f64 = 24.0;

/// How the concentration curve is evaluated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SimulationMethod {
    /// Adaptive BDF integration of the model ODE
    #[default]
    Ode,
    /// Closed-form solution of the same ODE
    Analytical,
}

/// Simulation settings
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SimulationSettings {
    /// Absorption rate constant ka (1/h)
    pub ka: f64,
    /// Number of evenly spaced samples from 0 to `horizon`, both ends included
    pub sample_count: usize,
    /// End of the simulated window (h)
    pub horizon: f64,
    pub method: SimulationMethod,
    /// Relative tolerance override for the ODE solver
    pub rtol: Option<f64>,
    /// Absolute tolerance override for the ODE solver
    pub atol: Option<f64>,
}

impl Default for SimulationSettings {
    fn default() -> Self {
        Self {
            ka: DEFAULT_KA,
            sample_count: DEFAULT_SAMPLE_COUNT,
            horizon: DEFAULT_HORIZON,
            method: SimulationMethod::default(),
            rtol: None,
            atol: None,
        }
    }
}

impl SimulationSettings {
    pub fn validate(&self) -> Result<(), DosingError> {
        if !(self.ka.is_finite() && self.ka > 0.0) {
            return Err(DosingError::invalid("ka", self.ka));
        }
        if self.sample_count == 0 {
            return Err(DosingError::invalid("sample_count", self.sample_count));
        }
        if !(self.horizon.is_finite() && self.horizon > 0.0) {
            return Err(DosingError::invalid("horizon", self.horizon));
        }
        for (name, tol) in [("rtol", self.rtol), ("atol", self.atol)] {
            if let Some(tol) = tol {
                if !(tol.is_finite() && tol > 0.0) {
                    return Err(DosingError::invalid(name, tol));
                }
            }
        }
        Ok(())
    }
}

/// `n` evenly spaced times from 0 to `horizon` inclusive
pub fn time_grid(horizon: f64, n: usize) -> Vec<f64> {
    match n {
        0 => Vec::new(),
        1 => vec![0.0],
        _ => {
            let last = (n - 1) as f64;
            (0..n).map(|i| horizon * (i as f64 / last)).collect()
        }
    }
}

/// Simulates the one-compartment absorption/elimination model
///
/// ```text
/// dC/dt = ka · Dose / Vd − ke · C,    C(0) = 0,    ke = CL / Vd
/// ```
///
/// The `ka · Dose / Vd` input is applied at every instant of the window rather than as a
/// single bolus or a time-limited infusion, so the curve rises monotonically toward
/// `ka · Dose / CL` instead of peaking and declining. This is the model's documented behavior.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ConcentrationSimulator {
    settings: SimulationSettings,
}

impl ConcentrationSimulator {
    pub fn new(settings: SimulationSettings) -> Result<Self, DosingError> {
        settings.validate()?;
        Ok(Self { settings })
    }

    pub fn settings(&self) -> &SimulationSettings {
        &self.settings
    }

    /// Simulate the curve for a dose recommendation
    pub fn simulate_recommendation(
        &self,
        recommendation: &DoseRecommendation,
    ) -> Result<ConcentrationTrajectory, DosingError> {
        self.simulate(
            recommendation.dose,
            recommendation.clearance,
            recommendation.volume,
        )
    }

    /// Simulate concentrations for `dose` (mg) with clearance (L/h) and volume (L)
    ///
    /// # Errors
    /// - [`DosingError::InvalidInput`] if `dose` is negative or non-finite, or if the sample grid
    ///   cannot be represented as finite, strictly increasing times
    /// - [`DosingError::NumericalError`] if clearance or volume is zero, negative or
    ///   non-finite, if the derived rate constants overflow, or if the solver produces a
    ///   non-finite concentration
    pub fn simulate(
        &self,
        dose: f64,
        clearance: f64,
        volume: f64,
    ) -> Result<ConcentrationTrajectory, DosingError> {
        if !(dose.is_finite() && dose >= 0.0) {
            return Err(DosingError::invalid("dose", dose));
        }
        if !(volume.is_finite() && volume > 0.0) {
            return Err(DosingError::numerical(format!(
                "volume of distribution must be positive and finite, got {volume}"
            )));
        }
        if !(clearance.is_finite() && clearance > 0.0) {
            return Err(DosingError::numerical(format!(
                "clearance must be positive and finite, got {clearance}"
            )));
        }

        let ka = self.settings.ka;
        let ke = clearance / volume;
        let input_rate = ka * dose / volume;
        if !(ke.is_finite() && ke > 0.0) || !input_rate.is_finite() {
            return Err(DosingError::numerical(format!(
                "rate constants are undefined (ke = {ke}, input rate = {input_rate})"
            )));
        }

        let times = time_grid(self.settings.horizon, self.settings.sample_count);
        validate_grid(&times)?;
        tracing::debug!(
            dose,
            clearance,
            volume,
            ke,
            samples = times.len(),
            method = ?self.settings.method,
            "simulating concentration curve"
        );

        let concentrations = match self.settings.method {
            SimulationMethod::Analytical => times
                .iter()
                .map(|&t| one_compartment_constant_input(0.0, input_rate, ke, t))
                .collect::<Vec<_>>(),
            SimulationMethod::Ode => self.integrate(ka, dose, volume, ke, &times)?,
        };

        if let Some((t, c)) = times
            .iter()
            .zip(concentrations.iter())
            .find(|(_, c)| !c.is_finite())
        {
            return Err(DosingError::numerical(format!(
                "concentration at t = {t} is {c}"
            )));
        }

        Ok(ConcentrationTrajectory::new(times, concentrations))
    }

    fn integrate(
        &self,
        ka: f64,
        dose: f64,
        volume: f64,
        ke: f64,
        times: &[f64],
    ) -> Result<Vec<f64>, DosingError> {
        let mut integrator = Integrator::new();
        if let Some(rtol) = self.settings.rtol {
            integrator = integrator.with_rtol(rtol);
        }
        if let Some(atol) = self.settings.atol {
            integrator = integrator.with_atol(atol);
        }

        // p = [ka, dose, vd, ke]
        let states = integrator.integrate(
            |x, p, _t, dx| dx[0] = p[0] * p[1] / p[2] - p[3] * x[0],
            |_x, p, _t, v, y| y[0] = -p[3] * v[0],
            &[ka, dose, volume, ke],
            &[0.0],
            times,
        )?;
        Ok(states.iter().map(|x| x[0]).collect())
    }
}
