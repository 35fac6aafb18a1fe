//! Derived-metrics recomputation.
//!
//! The metrics are a pure function of the current knot/string configuration
//! and are rewritten in full at the end of every tick, including drag-only
//! ticks with a zero time step. `entropy` is a crude activity proxy (summed
//! speed components), not thermodynamic entropy.

use crate::constants::{ALPHA, EXPANSION_RATE_BASE};
use crate::state::SimulationState;
use crate::traits::Scalar;

/// Aggregate tension: summed absolute deviation of each resolvable string
/// from its rest length. Transient, never stored per string.
pub fn average_tension<T: Scalar>(state: &SimulationState<T>) -> T {
    let mut tension = T::zero();
    for s in &state.strings {
        let knot_a = state.knots.iter().find(|k| k.id == s.a);
        let knot_b = state.knots.iter().find(|k| k.id == s.b);
        if let (Some(a), Some(b)) = (knot_a, knot_b) {
            let dx = a.x - b.x;
            let dy = a.y - b.y;
            let dist = (dx * dx + dy * dy).sqrt();
            tension = tension + (dist - s.rest_length).abs();
        }
    }
    tension
}

/// Recomputes all six derived metrics in place.
///
/// `time_dilation` written here becomes the feedback input to the next
/// tick's effective time step.
pub fn recompute<T: Scalar>(state: &mut SimulationState<T>) {
    let one = T::one();
    let alpha = T::from_f64(ALPHA).unwrap();

    let mut total_mass = T::zero();
    let mut total_charge = T::zero();
    let mut activity = T::zero();
    for k in &state.knots {
        total_mass = total_mass + k.mass;
        total_charge = total_charge + k.charge;
        activity = activity + k.vx.abs() + k.vy.abs();
    }

    let tension = average_tension(state);

    state.total_mass = total_mass;
    state.total_charge = total_charge;
    state.entropy = activity * T::from_f64(0.01).unwrap();
    state.expansion_rate =
        T::from_f64(EXPANSION_RATE_BASE).unwrap() * (one + tension * T::from_f64(0.001).unwrap());
    state.time_dilation =
        one + tension * T::from_f64(0.005).unwrap() + alpha * T::from_f64(10.0).unwrap();
    state.stability_ratio = T::zero().max(one - tension * T::from_f64(0.02).unwrap());
}
