//! The integrator/metrics engine.
//!
//! Owns a [`SimulationState`] for the duration of a run and is its sole
//! mutator. Each call to [`PhysicsEngine::advance`] applies, in order: the
//! pointer-drag override, force accumulation and position integration,
//! fixed-count string relaxation, and metrics recomputation.
//!
//! There are no fallible paths here: zero distances, logs of near-zero and
//! unresolvable string endpoints are all neutralized with floors, epsilons
//! and skips rather than raised as errors.

use crate::constants::{
    ALPHA, BETA, DISTANCE_EPSILON, ELECTRON_KICK_BASE, FRICTION_BASE, FRICTION_CEILING,
    GRAVITY_STRENGTH_BASE, ORIGIN_X, ORIGIN_Y, RELATIVITY_CORRECTION, RELAXATION_ITERATIONS,
    STRING_STIFFNESS_BASE,
};
use crate::metrics;
use crate::profiles::VibrationProfiles;
use crate::state::{KnotKind, Point2, SimulationState};
use crate::traits::Scalar;

pub struct PhysicsEngine<T: Scalar> {
    state: SimulationState<T>,
    profiles: VibrationProfiles<T>,
}

impl<T: Scalar> PhysicsEngine<T> {
    /// Takes ownership of the state with the default vibration profiles.
    pub fn new(state: SimulationState<T>) -> Self {
        Self::with_profiles(state, VibrationProfiles::default())
    }

    pub fn with_profiles(state: SimulationState<T>, profiles: VibrationProfiles<T>) -> Self {
        PhysicsEngine { state, profiles }
    }

    pub fn state(&self) -> &SimulationState<T> {
        &self.state
    }

    pub fn profiles(&self) -> &VibrationProfiles<T> {
        &self.profiles
    }

    /// Profile writes land between ticks; the next `advance` reads them.
    pub fn profiles_mut(&mut self) -> &mut VibrationProfiles<T> {
        &mut self.profiles
    }

    /// Sets or clears a knot's pinned flag. Returns false if the id does
    /// not name a knot.
    pub fn set_pinned(&mut self, id: &str, pinned: bool) -> bool {
        match self.state.knots.iter_mut().find(|k| k.id == id) {
            Some(knot) => {
                knot.pinned = pinned;
                true
            }
            None => false,
        }
    }

    /// Advances the simulation by `dt` time units (one unit is one nominal
    /// 60 Hz frame). `dt` of zero is valid and applies a pure pointer-drag
    /// update: no positional force integration, but string relaxation and
    /// metrics recomputation still run.
    ///
    /// The raw `dt` is divided by the previous tick's `time_dilation`
    /// (feedback: high tension slows local time) before it scales any
    /// velocity or position update.
    pub fn advance(
        &mut self,
        dt: T,
        pointer: Option<Point2<T>>,
        dragged: Option<&str>,
    ) -> &SimulationState<T> {
        let zero = T::zero();
        let one = T::one();
        let c = |v: f64| T::from_f64(v).unwrap();

        let effective_dt = dt / (self.state.time_dilation * (one + c(RELATIVITY_CORRECTION)));

        let gravity = c(GRAVITY_STRENGTH_BASE) * (self.profiles.a() * c(2.0));
        let friction =
            c(FRICTION_CEILING).min(c(FRICTION_BASE) * (c(0.9) + self.profiles.b() * c(0.1)));
        let kick = c(ELECTRON_KICK_BASE) + self.profiles.c() * c(5.0);
        let origin_x = c(ORIGIN_X);
        let origin_y = c(ORIGIN_Y);
        let alpha = c(ALPHA);
        let half_pi = c(std::f64::consts::FRAC_PI_2);

        for knot in &mut self.state.knots {
            if let (Some(p), Some(id)) = (pointer, dragged) {
                if knot.id == id {
                    knot.x = p.x;
                    knot.y = p.y;
                    knot.vx = zero;
                    knot.vy = zero;
                    continue;
                }
            }
            if knot.pinned {
                continue;
            }

            let dx = origin_x - knot.x;
            let dy = origin_y - knot.y;
            let dist = (dx * dx + dy * dy).sqrt();
            let dist = if dist == zero { one } else { dist };

            let curvature = alpha * dist * (dist + c(DISTANCE_EPSILON)).ln() * self.profiles.a();
            knot.vx = knot.vx + (dx / dist) * (gravity + curvature) * effective_dt;
            knot.vy = knot.vy + (dy / dist) * (gravity + curvature) * effective_dt;

            // The tangential kick is a velocity injection, not a force;
            // it is not scaled by the effective time step.
            if knot.kind == KnotKind::Electron {
                let angle = (knot.y - origin_y).atan2(knot.x - origin_x) + half_pi;
                knot.vx = knot.vx + angle.cos() * kick;
                knot.vy = knot.vy + angle.sin() * kick;
            }

            knot.x = knot.x + knot.vx * effective_dt;
            knot.y = knot.y + knot.vy * effective_dt;
            knot.vx = knot.vx * friction;
            knot.vy = knot.vy * friction;
        }

        self.relax_strings(dragged);
        metrics::recompute(&mut self.state);
        &self.state
    }

    /// Verlet-style position correction over every string connection, a
    /// fixed number of sweeps per tick. Each sweep perturbs knots shared
    /// with adjacent strings, so the loop is an approximation to a full
    /// relaxation solve; the residual error is the visible tension.
    ///
    /// Endpoint movement is gated per endpoint on "not pinned and not the
    /// dragged id", a different exclusion rule than the force pass above.
    /// The two checks must stay independent.
    fn relax_strings(&mut self, dragged: Option<&str>) {
        let zero = T::zero();
        let one = T::one();
        let c = |v: f64| T::from_f64(v).unwrap();

        let stiffness = c(STRING_STIFFNESS_BASE) * (c(0.5) + self.profiles.b());
        let beta = c(BETA);
        let half = c(0.5);
        let profile_c = self.profiles.c();

        for _ in 0..RELAXATION_ITERATIONS {
            for si in 0..self.state.strings.len() {
                let (ia, ib, rest) = {
                    let s = &self.state.strings[si];
                    let ia = self.state.knots.iter().position(|k| k.id == s.a);
                    let ib = self.state.knots.iter().position(|k| k.id == s.b);
                    match (ia, ib) {
                        (Some(ia), Some(ib)) => (ia, ib, s.rest_length),
                        _ => continue,
                    }
                };

                let (dx, dy) = {
                    let a = &self.state.knots[ia];
                    let b = &self.state.knots[ib];
                    (b.x - a.x, b.y - a.y)
                };
                let len = (dx * dx + dy * dy).sqrt();
                let len = if len == zero { one } else { len };

                let beta_correction = one + beta * len * len * profile_c;
                let diff = (len - rest) / len;
                let offset_x = dx * half * diff * stiffness * beta_correction;
                let offset_y = dy * half * diff * stiffness * beta_correction;

                let a = &mut self.state.knots[ia];
                if !a.pinned && dragged != Some(a.id.as_str()) {
                    a.x = a.x + offset_x;
                    a.y = a.y + offset_y;
                }
                let b = &mut self.state.knots[ib];
                if !b.pinned && dragged != Some(b.id.as_str()) {
                    b.x = b.x - offset_x;
                    b.y = b.y - offset_y;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::{Knot, StringConnection};

    fn default_engine() -> PhysicsEngine<f64> {
        PhysicsEngine::new(SimulationState::proton_electron())
    }

    fn resting_pair() -> SimulationState<f64> {
        // Two knots exactly at the rest length: zero tension, zero velocity.
        let knots = vec![
            Knot::at_rest("a", 100.0, 100.0, 1.0, 0.0, KnotKind::Up),
            Knot::at_rest("b", 160.0, 100.0, 1.0, 0.0, KnotKind::Up),
        ];
        let strings = vec![StringConnection {
            a: "a".to_string(),
            b: "b".to_string(),
            rest_length: 60.0,
            stiffness: 0.1,
        }];
        SimulationState::with_topology(knots, strings)
    }

    #[test]
    fn mass_and_charge_are_invariant() {
        let mut engine = default_engine();
        engine.advance(1.0, None, None);
        let mass = engine.state().total_mass;
        let charge = engine.state().total_charge;
        assert!((mass - 9.911).abs() < 1e-12);
        assert!(charge.abs() < 1e-9);

        for _ in 0..50 {
            engine.advance(1.0, None, None);
            assert_eq!(engine.state().total_mass, mass);
            assert_eq!(engine.state().total_charge, charge);
        }
    }

    #[test]
    fn first_tick_metrics_and_finiteness() {
        let mut engine = default_engine();
        engine.advance(1.0, None, None);
        let state = engine.state();

        // 1 + avg_tension * 0.005 + ALPHA * 10, with tension >= 0.
        assert!(state.time_dilation >= 1.0009999);
        assert!(state.stability_ratio >= 0.0);
        for k in &state.knots {
            assert!(k.x.is_finite() && k.y.is_finite(), "knot {} diverged", k.id);
            assert!(k.vx.is_finite() && k.vy.is_finite());
        }
    }

    #[test]
    fn stability_ratio_never_negative() {
        let mut engine = default_engine();
        for _ in 0..200 {
            engine.advance(2.5, None, None);
            assert!(engine.state().stability_ratio >= 0.0);
        }
    }

    #[test]
    fn drag_overrides_position_exactly() {
        let mut engine = default_engine();
        engine.advance(0.0, Some(Point2 { x: 100.0, y: 100.0 }), Some("p3"));
        let p3 = engine.state().knot("p3").expect("p3 exists");
        assert_eq!(p3.x, 100.0);
        assert_eq!(p3.y, 100.0);
        assert_eq!(p3.vx, 0.0);
        assert_eq!(p3.vy, 0.0);

        // The electron still receives its tangential kick on the next
        // nonzero-dt tick.
        let before = {
            let e = engine.state().knot("e1").expect("e1 exists");
            (e.x, e.y)
        };
        engine.advance(1.0, None, None);
        let e = engine.state().knot("e1").expect("e1 exists");
        assert!(e.x != before.0 || e.y != before.1);
        assert!(e.vx != 0.0 || e.vy != 0.0);
    }

    #[test]
    fn dragged_endpoint_is_excluded_from_relaxation() {
        // p1 is a string endpoint; dragging must win over the relaxation
        // displacement on its own side.
        let mut engine = default_engine();
        engine.advance(0.0, Some(Point2 { x: 0.0, y: 0.0 }), Some("p1"));
        let p1 = engine.state().knot("p1").expect("p1 exists");
        assert_eq!(p1.x, 0.0);
        assert_eq!(p1.y, 0.0);
    }

    #[test]
    fn drag_without_pointer_is_no_drag_override() {
        let mut engine = default_engine();
        let before = engine.state().knot("p3").expect("p3").x;
        engine.advance(0.0, None, Some("p3"));
        // No pointer: no hard overwrite. p3 is still excluded from
        // relaxation displacement, so its position is untouched at dt = 0.
        assert_eq!(engine.state().knot("p3").expect("p3").x, before);
    }

    #[test]
    fn zero_dt_with_zero_tension_moves_nothing() {
        let mut engine = PhysicsEngine::new(resting_pair());
        engine.advance(0.0, None, None);
        let state = engine.state();
        assert_eq!(state.knots[0].x, 100.0);
        assert_eq!(state.knots[0].y, 100.0);
        assert_eq!(state.knots[1].x, 160.0);
        assert_eq!(state.knots[1].y, 100.0);
        assert_eq!(state.knots[0].vx, 0.0);
        assert_eq!(state.knots[1].vy, 0.0);
    }

    #[test]
    fn pinned_knot_is_frozen() {
        let mut engine = default_engine();
        assert!(engine.set_pinned("p1", true));
        let before = {
            let p1 = engine.state().knot("p1").expect("p1");
            (p1.x, p1.y, p1.vx, p1.vy)
        };
        for _ in 0..10 {
            engine.advance(1.0, None, None);
        }
        let p1 = engine.state().knot("p1").expect("p1");
        assert_eq!((p1.x, p1.y, p1.vx, p1.vy), before);
    }

    #[test]
    fn set_pinned_rejects_unknown_id() {
        let mut engine = default_engine();
        assert!(!engine.set_pinned("ghost", true));
    }

    #[test]
    fn dangling_string_is_inert() {
        let mut reference = default_engine();
        let mut state = SimulationState::proton_electron();
        state.strings.push(StringConnection {
            a: "p1".to_string(),
            b: "ghost".to_string(),
            rest_length: 10.0,
            stiffness: 0.1,
        });
        let mut with_ghost = PhysicsEngine::new(state);

        for _ in 0..5 {
            reference.advance(1.0, None, None);
            with_ghost.advance(1.0, None, None);
        }
        for (a, b) in reference
            .state()
            .knots
            .iter()
            .zip(with_ghost.state().knots.iter())
        {
            assert_eq!(a.x, b.x);
            assert_eq!(a.y, b.y);
            assert_eq!(a.vx, b.vx);
            assert_eq!(a.vy, b.vy);
        }
        assert_eq!(
            reference.state().time_dilation,
            with_ghost.state().time_dilation
        );
    }

    #[test]
    fn replay_is_deterministic() {
        let mut a = default_engine();
        let mut b = default_engine();
        for i in 0..30 {
            let drag = if i % 7 == 0 {
                (Some(Point2 { x: 120.0, y: 80.0 }), Some("p2"))
            } else {
                (None, None)
            };
            a.advance(0.9, drag.0, drag.1);
            b.advance(0.9, drag.0, drag.1);
        }
        for (ka, kb) in a.state().knots.iter().zip(b.state().knots.iter()) {
            assert_eq!(ka.x, kb.x);
            assert_eq!(ka.y, kb.y);
        }
        assert_eq!(a.state().entropy, b.state().entropy);
        assert_eq!(a.state().time_dilation, b.state().time_dilation);
    }

    #[test]
    fn central_attraction_pulls_toward_origin() {
        let knots = vec![Knot::at_rest("solo", 500.0, 300.0, 1.0, 0.0, KnotKind::Up)];
        let mut engine = PhysicsEngine::new(SimulationState::with_topology(knots, vec![]));
        engine.advance(1.0, None, None);
        let solo = engine.state().knot("solo").expect("solo");
        assert!(solo.x < 500.0);
        assert_eq!(solo.y, 300.0);
    }

    #[test]
    fn profile_changes_take_effect_next_tick() {
        let mut calm = default_engine();
        let mut kicked = default_engine();
        kicked.profiles_mut().set_c(1.0);
        calm.advance(1.0, None, None);
        kicked.advance(1.0, None, None);

        let calm_e = calm.state().knot("e1").expect("e1");
        let kicked_e = kicked.state().knot("e1").expect("e1");
        let calm_speed = calm_e.vx.abs() + calm_e.vy.abs();
        let kicked_speed = kicked_e.vx.abs() + kicked_e.vy.abs();
        assert!(kicked_speed > calm_speed);
    }
}
