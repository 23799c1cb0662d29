/// Closed-form solution of the one-compartment model with a constant input rate.
///
/// Solves `dC/dt = rate - ke · C` from `C(0) = c0`:
///
/// ```text
/// C(t) = c0 · e^(−ke·t) + rate / ke · (1 − e^(−ke·t))
/// ```
///
/// # Assumptions
/// - `ke` is strictly positive
/// - `rate` is the concentration input rate (mg/L/h), i.e. `ka · Dose / Vd` for the
///   continuously driven absorption model
pub fn one_compartment_constant_input(c0: f64, rate: f64, ke: f64, t: f64) -> f64 {
    // exp_m1 keeps precision when ke·t is small
    let accumulated = -(-ke * t).exp_m1();
    c0 * (-ke * t).exp() + rate / ke * accumulated
}
