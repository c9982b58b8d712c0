//! Error types for catalog and runtime-state operations.
//!
//! Two semantic kinds exist and call sites rely on the distinction:
//!
//! - **argument errors** — an index is out of range or a frame-supplied
//!   parent joint conflicts with an explicit one
//!   ([`GeomIndexOutOfRange`](GeomError::GeomIndexOutOfRange),
//!   [`PairIndexOutOfRange`](GeomError::PairIndexOutOfRange),
//!   [`SelfCollisionPair`](GeomError::SelfCollisionPair),
//!   [`ParentJointMismatch`](GeomError::ParentJointMismatch));
//! - **size/consistency errors** — a dense map has the wrong dimensions or
//!   a per-pair array is stale relative to the catalog
//!   ([`MapSizeMismatch`](GeomError::MapSizeMismatch),
//!   [`PairCountMismatch`](GeomError::PairCountMismatch),
//!   [`GeomCountMismatch`](GeomError::GeomCountMismatch),
//!   [`NarrowPhaseUnavailable`](GeomError::NarrowPhaseUnavailable)).
//!
//! Every failing operation checks its preconditions up front and mutates
//! nothing when it errors. Lookups (`geom_id`, `find_collision_pair`,
//! `exist_*`) are deliberately non-failing and report "not found" through
//! a sentinel or a boolean instead — see their documentation.

use thiserror::Error;

/// Errors raised by [`GeomModel`](crate::GeomModel) and
/// [`GeomData`](crate::GeomData) operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum GeomError {
    /// A pair references a geometry index outside the catalog.
    #[error("geometry index {index} out of range (catalog has {ngeom} geometries)")]
    GeomIndexOutOfRange {
        /// The offending geometry index.
        index: usize,
        /// Number of geometries in the catalog.
        ngeom: usize,
    },

    /// A pair id is outside the runtime state's pair arrays.
    #[error("collision pair index {index} out of range ({npair} pairs)")]
    PairIndexOutOfRange {
        /// The offending pair index.
        index: usize,
        /// Number of pairs in the runtime state.
        npair: usize,
    },

    /// Both sides of a candidate pair reference the same geometry.
    #[error("collision pair ({index}, {index}) pairs a geometry with itself")]
    SelfCollisionPair {
        /// The geometry index appearing on both sides.
        index: usize,
    },

    /// The object's explicit parent joint conflicts with the parent joint
    /// of its referenced frame in the supplying kinematic model.
    #[error(
        "parent joint {parent_joint} does not match parent joint {frame_joint} of frame {frame}"
    )]
    ParentJointMismatch {
        /// The referenced frame index.
        frame: usize,
        /// Parent joint of that frame in the kinematic model.
        frame_joint: usize,
        /// Parent joint carried by the geometry object.
        parent_joint: usize,
    },

    /// A dense input map is not `ngeom` x `ngeom`.
    #[error("input map is {rows}x{cols}, expected {ngeom}x{ngeom}")]
    MapSizeMismatch {
        /// Rows of the supplied map.
        rows: usize,
        /// Columns of the supplied map.
        cols: usize,
        /// Current geometry count of the catalog.
        ngeom: usize,
    },

    /// The runtime state's per-pair arrays are stale relative to the
    /// catalog's current pair list. Reconstruct the data to recover.
    #[error("catalog has {model_pairs} collision pairs but data arrays hold {data_pairs}")]
    PairCountMismatch {
        /// Pair count of the catalog.
        model_pairs: usize,
        /// Pair-array length of the runtime state.
        data_pairs: usize,
    },

    /// The runtime state's placement array is stale relative to the
    /// catalog's current geometry count.
    #[error("catalog has {model_geoms} geometries but data holds {data_geoms} placements")]
    GeomCountMismatch {
        /// Geometry count of the catalog.
        model_geoms: usize,
        /// Placement-array length of the runtime state.
        data_geoms: usize,
    },

    /// The runtime state was built without narrow-phase query arrays
    /// (see [`GeomData::placements_only`](crate::GeomData::placements_only)).
    #[error("geometry data was built without narrow-phase query state")]
    NarrowPhaseUnavailable,
}
