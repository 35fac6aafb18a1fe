//! Fixed physical and numerical constants of the simulation.
//!
//! All constants are plain `f64` values; generic code lowers them into the
//! working scalar type with `T::from_f64(..)`.

/// Base magnitude of the central attraction, before profile scaling.
pub const GRAVITY_STRENGTH_BASE: f64 = 0.05;

/// Base velocity damping factor, before profile scaling.
pub const FRICTION_BASE: f64 = 0.98;

/// Damping is clamped so it can never exceed this ceiling.
pub const FRICTION_CEILING: f64 = 0.99;

/// Base stiffness applied during string relaxation, before profile scaling.
pub const STRING_STIFFNESS_BASE: f64 = 0.02;

/// Curvature-correction coefficient of the central attraction.
pub const ALPHA: f64 = 1e-4;

/// Quadratic softening coefficient of string relaxation.
pub const BETA: f64 = 1e-6;

/// Small additive correction in the effective-time divisor.
pub const RELATIVITY_CORRECTION: f64 = 0.0069;

/// Numerical floor inside `ln` to keep the curvature term finite at the origin.
pub const DISTANCE_EPSILON: f64 = 1e-10;

/// Geometric center every knot is attracted toward.
pub const ORIGIN_X: f64 = 400.0;
pub const ORIGIN_Y: f64 = 300.0;

/// Relaxation sweeps per tick. Deliberately a fixed count rather than a
/// convergence-checked loop: the residual error is the visible "tension".
pub const RELAXATION_ITERATIONS: usize = 5;

/// Base tangential speed of electron-kind knots, before profile scaling.
pub const ELECTRON_KICK_BASE: f64 = 2.5;

/// Baseline of the expansion-rate metric.
pub const EXPANSION_RATE_BASE: f64 = 70.4;

/// One simulation time unit corresponds to one nominal 60 Hz frame.
/// Callers normalize wall-clock milliseconds by this to get `dt` in units.
pub const FRAME_MS: f64 = 16.67;

/// Maximum number of retained commentary-feed entries.
pub const COMMENTARY_LOG_CAPACITY: usize = 30;
