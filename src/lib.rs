//! Collision geometry catalog and runtime state for multibody simulation.
//!
//! This crate provides the geometry half of a Model/Data simulation
//! architecture:
//!
//! - [`GeomModel`] is static: the ordered catalog of geometry objects, each
//!   rigidly attached to a joint of the kinematic model, plus the list of
//!   candidate collision pairs between them.
//! - [`GeomData`] is dynamic: one world placement per geometry, one
//!   activation flag and one query-parameter record per collision pair, and
//!   the derived inner/outer joint indexes. One `GeomData` is created per
//!   simulation session via [`GeomModel::make_data`].
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                        GeomModel                            │
//! │  Static: geometry objects, candidate collision pairs        │
//! └─────────────────────────┬───────────────────────────────────┘
//!                           │ make_data()
//!                           ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │                        GeomData                             │
//! │  Dynamic: placements, per-pair activation, query params     │
//! │  Per step: kinematics writes geom_xpos, policy toggles      │
//! │  activation, compute_collisions() drives the backend        │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! The crate deliberately does **not** compute placements (the caller's
//! forward kinematics does), does not partition space, and does not
//! implement any collision or distance algorithm. Both external
//! collaborators are trait boundaries: [`KinematicTree`] supplies frame
//! parent joints during registration, and [`NarrowPhase`] answers the
//! per-pair queries that [`compute_collisions`] dispatches.
//!
//! # Quick Start
//!
//! ```
//! use sim_geom::{GeomModel, GeomObject, GeomShape};
//!
//! let mut model = GeomModel::new();
//! let a = model.add_geom(GeomObject::new("wrist", 1, 1, GeomShape::sphere(0.05)));
//! let b = model.add_geom(GeomObject::new("table", 0, 0, GeomShape::ground_plane()));
//! model.add_all_collision_pairs();
//!
//! let mut data = model.make_data();
//! assert_eq!(data.active_collision_pairs, vec![true]);
//! data.deactivate_collision_pair(0).unwrap();
//! # let _ = (a, b);
//! ```

#![deny(clippy::unwrap_used, clippy::expect_used)]
#![warn(missing_docs)]
#![allow(
    clippy::module_name_repetitions, // GeomModel/GeomData naming is the point
    clippy::missing_const_for_fn     // Many methods can't be const due to nalgebra
)]

pub mod data;
pub mod error;
mod factories;
pub mod model;
pub mod narrow_phase;
pub mod shape;

pub use data::{GeomData, PairQueryState, PairRequest, PairResult};
pub use error::GeomError;
pub use model::{
    CollisionPair, FrameIndex, GeomIndex, GeomModel, GeomObject, JointIndex, KinematicTree,
    PairIndex,
};
pub use narrow_phase::{compute_collisions, NarrowPhase};
pub use shape::GeomShape;
