//! Data model: knots, string connections, and the aggregate simulation state.
//!
//! Pure data. All kinematic fields and derived metrics are written only by
//! the engine; collaborators get read access through `PhysicsEngine::state`.

use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::traits::Scalar;

/// Stable identifier of a knot, unique for the knot's lifetime.
pub type KnotId = String;

/// Closed set of knot categories. The category determines rendering
/// color/size downstream and whether the tangential kick applies.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KnotKind {
    Up,
    Down,
    Electron,
    Fragment,
}

/// A point mass participating in force integration.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Knot<T> {
    pub id: KnotId,
    pub x: T,
    pub y: T,
    pub vx: T,
    pub vy: T,
    pub mass: T,
    pub charge: T,
    #[serde(rename = "type")]
    pub kind: KnotKind,
    /// Pinned knots are excluded from force integration and from
    /// relaxation displacement on their own endpoint.
    #[serde(default)]
    pub pinned: bool,
}

impl<T: Scalar> Knot<T> {
    /// A knot at rest at `(x, y)` with the given static attributes.
    pub fn at_rest(id: &str, x: T, y: T, mass: T, charge: T, kind: KnotKind) -> Self {
        Knot {
            id: id.to_string(),
            x,
            y,
            vx: T::zero(),
            vy: T::zero(),
            mass,
            charge,
            kind,
            pinned: false,
        }
    }
}

/// A symmetric spring-like positional constraint between two knots.
///
/// Endpoint ids referencing missing knots are tolerated: the connection is
/// skipped for the tick rather than treated as fatal.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StringConnection<T> {
    pub a: KnotId,
    pub b: KnotId,
    pub rest_length: T,
    pub stiffness: T,
}

/// A 2D point in the knot coordinate space, used for pointer input.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Point2<T> {
    pub x: T,
    pub y: T,
}

/// Aggregate root: the full knot/string configuration plus derived metrics.
///
/// The derived scalars are always a pure function of the current knot and
/// string configuration; only the metrics pass writes them. `time_dilation`
/// is carried between ticks on purpose: tick N's value scales tick N+1's
/// effective time step, so it is part of replayable state.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulationState<T> {
    pub knots: Vec<Knot<T>>,
    pub strings: Vec<StringConnection<T>>,
    pub time_dilation: T,
    pub entropy: T,
    pub expansion_rate: T,
    pub total_mass: T,
    pub total_charge: T,
    pub stability_ratio: T,
}

impl<T: Scalar> SimulationState<T> {
    /// A state with the given topology and neutral derived metrics.
    pub fn with_topology(knots: Vec<Knot<T>>, strings: Vec<StringConnection<T>>) -> Self {
        SimulationState {
            knots,
            strings,
            time_dilation: T::one(),
            entropy: T::zero(),
            expansion_rate: T::zero(),
            total_mass: T::zero(),
            total_charge: T::zero(),
            stability_ratio: T::one(),
        }
    }

    /// Like [`with_topology`](Self::with_topology), but rejects knots that
    /// would make the integrator meaningless: empty or duplicate ids, or a
    /// non-positive mass. Dangling string endpoints are allowed since the
    /// engine skips unresolvable connections per tick.
    pub fn validated(knots: Vec<Knot<T>>, strings: Vec<StringConnection<T>>) -> Result<Self> {
        let mut seen: HashSet<&str> = HashSet::new();
        for knot in &knots {
            if knot.id.is_empty() {
                bail!("Knot id must not be empty");
            }
            if !seen.insert(knot.id.as_str()) {
                bail!("Duplicate knot id: {}", knot.id);
            }
            if knot.mass <= T::zero() {
                bail!("Knot {} has non-positive mass {:?}", knot.id, knot.mass);
            }
        }
        Ok(Self::with_topology(knots, strings))
    }

    /// The fixed initial configuration: three up/down knots forming a
    /// closed triangle of strings, plus one free electron knot.
    pub fn proton_electron() -> Self {
        let c = |v: f64| T::from_f64(v).unwrap();
        let up_charge = c(2.0 / 3.0);
        let down_charge = c(-1.0 / 3.0);
        let knots = vec![
            Knot::at_rest("p1", c(400.0), c(300.0), c(2.3), up_charge, KnotKind::Up),
            Knot::at_rest("p2", c(440.0), c(340.0), c(2.3), up_charge, KnotKind::Up),
            Knot::at_rest("p3", c(380.0), c(340.0), c(4.8), down_charge, KnotKind::Down),
            Knot::at_rest("e1", c(550.0), c(320.0), c(0.511), c(-1.0), KnotKind::Electron),
        ];
        let string = |a: &str, b: &str| StringConnection {
            a: a.to_string(),
            b: b.to_string(),
            rest_length: c(60.0),
            stiffness: c(0.1),
        };
        let strings = vec![string("p1", "p2"), string("p2", "p3"), string("p3", "p1")];
        Self::with_topology(knots, strings)
    }

    /// Looks a knot up by id.
    pub fn knot(&self, id: &str) -> Option<&Knot<T>> {
        self.knots.iter().find(|k| k.id == id)
    }
}
