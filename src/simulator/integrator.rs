use diffsol::{
    error::{DiffsolError, OdeSolverError},
    ode_solver::method::OdeSolverMethod,
    NalgebraLU, OdeBuilder, OdeSolverStopReason,
};

use super::{M, T, V};
use crate::DosingError;

/// Adaptive integration of an ODE system over a fixed output grid.
///
/// Uses diffsol's variable-order, variable-step BDF method with a dense nalgebra LU for the
/// Newton iterations. The solver steps freely between grid points and is stopped exactly on
/// each one, so the returned states are not interpolated.
///
/// Tolerances left as `None` use the solver defaults.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Integrator {
    rtol: Option<f64>,
    atol: Option<f64>,
}

impl Integrator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_rtol(mut self, rtol: f64) -> Self {
        self.rtol = Some(rtol);
        self
    }

    pub fn with_atol(mut self, atol: f64) -> Self {
        self.atol = Some(atol);
        self
    }

    /// Integrate `dx/dt = rhs(x, p, t)` from `x(times[0]) = y0` and return the state at every
    /// time in `times`.
    ///
    /// # Arguments
    /// * `rhs` - Right-hand side, writes dx/dt into its last argument
    /// * `jac` - Jacobian-vector product J(x, p, t) · v, written into its last argument
    /// * `params` - Parameter vector handed to both closures
    /// * `y0` - Initial state at `times[0]`
    /// * `times` - Strictly increasing output grid; the first entry is the initial time
    ///
    /// # Errors
    /// [`DosingError::InvalidInput`] for an empty, non-finite or non-increasing grid, or an
    /// empty initial state. [`DosingError::NumericalError`] if the step size collapses or the
    /// state stops being finite, which happens when the solution blows up inside the grid.
    pub fn integrate<F, G>(
        &self,
        rhs: F,
        jac: G,
        params: &[f64],
        y0: &[f64],
        times: &[f64],
    ) -> Result<Vec<V>, DosingError>
    where
        F: Fn(&V, &V, T, &mut V),
        G: Fn(&V, &V, T, &V, &mut V),
    {
        validate_grid(times)?;
        if y0.is_empty() {
            return Err(DosingError::invalid("initial_state", "[]"));
        }
        let nstates = y0.len();
        let initial = V::from_column_slice(y0);

        let mut builder = OdeBuilder::<M>::new().t0(times[0]).p(params.to_vec());
        if let Some(rtol) = self.rtol {
            builder = builder.rtol(rtol);
        }
        if let Some(atol) = self.atol {
            builder = builder.atol(vec![atol; nstates]);
        }
        let problem = builder
            .rhs_implicit(rhs, jac)
            .init(move |_p, _t| initial.clone())
            .build()?;

        let mut solver = problem.bdf::<NalgebraLU<f64>>()?;

        let mut states = Vec::with_capacity(times.len());
        states.push(solver.state().y.clone());

        for &stop in &times[1..] {
            match solver.set_stop_time(stop) {
                Ok(_) => loop {
                    match solver.step() {
                        Ok(OdeSolverStopReason::InternalTimestep) => continue,
                        Ok(OdeSolverStopReason::TstopReached) => break,
                        Ok(reason) => {
                            return Err(DosingError::numerical(format!(
                                "unexpected solver stop before t = {stop}: {reason:?}"
                            )))
                        }
                        Err(DiffsolError::OdeSolverError(
                            OdeSolverError::StepSizeTooSmall { time }
                            | OdeSolverError::TooManyErrorTestFailures { time },
                        )) => {
                            return Err(DosingError::numerical(format!(
                                "the ODE step size collapsed at t = {time} before reaching {stop}"
                            )))
                        }
                        Err(err) => return Err(err.into()),
                    }
                },
                Err(DiffsolError::OdeSolverError(OdeSolverError::StopTimeAtCurrentTime)) => {}
                Err(err) => return Err(err.into()),
            }
            let state = solver.state().y;
            if state.iter().any(|x| !x.is_finite()) {
                return Err(DosingError::numerical(format!(
                    "the ODE state is not finite at t = {stop}"
                )));
            }
            states.push(state.clone());
        }

        Ok(states)
    }
}

pub(super) fn validate_grid(times: &[f64]) -> Result<(), DosingError> {
    if times.is_empty() {
        return Err(DosingError::invalid("times", "[]"));
    }
    if let Some(t) = times.iter().find(|t| !t.is_finite()) {
        return Err(DosingError::invalid("times", t));
    }
    if let Some(w) = times.windows(2).find(|w| w[1] <= w[0]) {
        return Err(DosingError::invalid(
            "times",
            format!("not strictly increasing at {} -> {}", w[0], w[1]),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn exponential_decay() {
        let times: Vec<f64> = (0..=10).map(|i| i as f64).collect();
        let states = Integrator::new()
            .with_rtol(1e-8)
            .with_atol(1e-8)
            .integrate(
                |x, p, _t, dx| dx[0] = -p[0] * x[0],
                |_x, p, _t, v, y| y[0] = -p[0] * v[0],
                &[0.3],
                &[100.0],
                &times,
            )
            .unwrap();

        assert_eq!(states.len(), times.len());
        assert_eq!(states[0][0], 100.0);
        for (state, &t) in states.iter().zip(times.iter()) {
            assert_relative_eq!(state[0], 100.0 * (-0.3 * t).exp(), max_relative = 1e-4);
        }
    }

    #[test]
    fn two_state_chain() {
        // depot -> central -> out
        let (ka, ke) = (1.0, 0.1);
        let times = [0.0, 0.5, 1.0, 2.0, 4.0, 8.0, 12.0];
        let states = Integrator::new()
            .with_rtol(1e-8)
            .with_atol(1e-8)
            .integrate(
                |x, p, _t, dx| {
                    dx[0] = -p[0] * x[0];
                    dx[1] = p[0] * x[0] - p[1] * x[1];
                },
                |_x, p, _t, v, y| {
                    y[0] = -p[0] * v[0];
                    y[1] = p[0] * v[0] - p[1] * v[1];
                },
                &[ka, ke],
                &[100.0, 0.0],
                &times,
            )
            .unwrap();

        for (state, &t) in states.iter().zip(times.iter()) {
            let central = 100.0 * ka / (ka - ke) * ((-ke * t).exp() - (-ka * t).exp());
            assert_relative_eq!(state[1], central, max_relative = 1e-4, epsilon = 1e-6);
        }
    }

    #[test]
    fn single_point_grid_returns_initial_state() {
        let states = Integrator::new()
            .integrate(
                |x, _p, _t, dx| dx[0] = -x[0],
                |_x, _p, _t, v, y| y[0] = -v[0],
                &[],
                &[3.0],
                &[0.0],
            )
            .unwrap();
        assert_eq!(states.len(), 1);
        assert_eq!(states[0][0], 3.0);
    }

    #[test]
    fn rejects_bad_grids() {
        let run = |times: &[f64]| {
            Integrator::new().integrate(
                |x, _p, _t, dx| dx[0] = -x[0],
                |_x, _p, _t, v, y| y[0] = -v[0],
                &[],
                &[1.0],
                times,
            )
        };
        assert!(run(&[]).unwrap_err().is_invalid_input());
        assert!(run(&[0.0, 2.0, 1.0]).unwrap_err().is_invalid_input());
        assert!(run(&[0.0, 1.0, 1.0]).unwrap_err().is_invalid_input());
        assert!(run(&[0.0, f64::NAN]).unwrap_err().is_invalid_input());
    }

    #[test]
    fn finite_time_blow_up_is_numerical_error() {
        // x' = x², x(0) = 1 has the solution 1 / (1 − t), singular at t = 1
        let err = Integrator::new()
            .integrate(
                |x, p, _t, dx| dx[0] = p[0] * x[0] * x[0],
                |x, p, _t, v, y| y[0] = 2.0 * p[0] * x[0] * v[0],
                &[1.0],
                &[1.0],
                &[0.0, 0.5, 2.0],
            )
            .unwrap_err();
        assert!(err.is_numerical(), "{err}");
    }
}
