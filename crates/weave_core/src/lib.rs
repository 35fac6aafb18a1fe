//! The `weave_core` crate is the engine behind the Weave interactive
//! knot/string network simulator: a small set of point masses ("knots")
//! joined by spring-like constraints ("strings"), advanced frame by frame
//! and summarized into a handful of derived metrics.
//!
//! Key components:
//! - **Traits**: `Scalar` (numeric type abstraction; the engine is generic
//!   over `f32`/`f64`).
//! - **State**: `Knot`, `StringConnection`, `SimulationState`: pure data,
//!   mutated only by the engine.
//! - **Engine**: `PhysicsEngine`: force accumulation, fixed-count string
//!   relaxation, and metrics recomputation per tick.
//! - **Profiles**: `VibrationProfiles`: the three external sliders biasing
//!   attraction, friction, and stiffness.
//! - **Commentary**: the injectable external text-service boundary and its
//!   polling/cooldown state machine, fully outside the physics core.
pub mod commentary;
pub mod constants;
pub mod engine;
pub mod metrics;
pub mod profiles;
pub mod state;
pub mod traits;

pub use commentary::{CommentaryError, CommentaryFeed, CommentarySource, FeedPhase};
pub use engine::PhysicsEngine;
pub use profiles::VibrationProfiles;
pub use state::{Knot, KnotId, KnotKind, Point2, SimulationState, StringConnection};
pub use traits::Scalar;
