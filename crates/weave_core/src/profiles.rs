//! The three vibration-profile sliders biasing the simulated forces.

use serde::{Deserialize, Serialize};

use crate::traits::Scalar;

/// Engine-owned global configuration: three sliders in `[0, 1]`.
///
/// Profile `a` scales the central attraction, `b` scales friction and
/// string stiffness, `c` scales the tangential kick and the quadratic
/// softening of relaxation. Writes take effect at the start of the next
/// `advance` call; last write wins. Not safe for concurrent external
/// mutation without an added lock; the engine assumes exclusive,
/// non-reentrant access per tick.
#[derive(Copy, Clone, Debug, Serialize, Deserialize)]
pub struct VibrationProfiles<T> {
    a: T,
    b: T,
    c: T,
}

impl<T: Scalar> VibrationProfiles<T> {
    pub fn new(a: T, b: T, c: T) -> Self {
        VibrationProfiles {
            a: clamp_unit(a),
            b: clamp_unit(b),
            c: clamp_unit(c),
        }
    }

    /// Attraction slider.
    pub fn a(&self) -> T {
        self.a
    }

    /// Balance slider.
    pub fn b(&self) -> T {
        self.b
    }

    /// Kinetic slider.
    pub fn c(&self) -> T {
        self.c
    }

    pub fn set_a(&mut self, value: T) {
        self.a = clamp_unit(value);
    }

    pub fn set_b(&mut self, value: T) {
        self.b = clamp_unit(value);
    }

    pub fn set_c(&mut self, value: T) {
        self.c = clamp_unit(value);
    }
}

impl<T: Scalar> Default for VibrationProfiles<T> {
    fn default() -> Self {
        let c = |v: f64| T::from_f64(v).unwrap();
        VibrationProfiles::new(c(0.8), c(0.5), c(0.3))
    }
}

fn clamp_unit<T: Scalar>(value: T) -> T {
    value.max(T::zero()).min(T::one())
}
