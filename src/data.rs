//! Geometry runtime state: placements, pair activation, query parameters.
//!
//! [`GeomData`] is the dynamic half of the geometry Model/Data split. It is
//! constructed from a [`GeomModel`] snapshot and fully decoupled from it
//! afterward: the model may keep evolving, but this state's per-pair arrays
//! keep their construction-time length and ordering. Every bulk operation
//! that relies on the positional pair alignment re-checks it explicitly and
//! fails instead of assuming it.

use std::collections::HashMap;
use std::fmt;

use nalgebra::{DMatrix, Isometry3, Scalar, Vector3};
use serde::{Deserialize, Serialize};

use crate::error::GeomError;
use crate::model::{CollisionPair, GeomIndex, GeomModel, JointIndex, PairIndex};

/// Per-pair narrow-phase query parameters.
///
/// Stored and forwarded by this crate, interpreted only by the backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PairRequest {
    /// Extra clearance added to the pair's collision/distance query.
    pub security_margin: f64,
    /// Whether the backend may warm-start its support search from
    /// `cached_guess`.
    pub enable_cached_guess: bool,
    /// Backend warm-start hint (support direction). The backend updates it
    /// in place on every query.
    pub cached_guess: Vector3<f64>,
}

impl Default for PairRequest {
    fn default() -> Self {
        Self {
            security_margin: 0.0,
            enable_cached_guess: true,
            cached_guess: Vector3::x(),
        }
    }
}

/// Per-pair narrow-phase result record.
///
/// Opaque to this crate: stored positionally, never interpreted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PairResult {
    /// Whether the last query reported the pair in collision.
    pub in_collision: bool,
    /// Signed distance reported by the last query.
    pub distance: f64,
}

impl Default for PairResult {
    fn default() -> Self {
        Self {
            in_collision: false,
            distance: f64::INFINITY,
        }
    }
}

/// Narrow-phase request/result arrays, positionally aligned with the
/// catalog's pair list.
///
/// Present on a [`GeomData`] only when it was built for a configured
/// narrow-phase backend; placements-only data carries `None` instead.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PairQueryState {
    /// Query parameters, one per collision pair.
    pub requests: Vec<PairRequest>,
    /// Last query results, one per collision pair.
    pub results: Vec<PairResult>,
}

/// Dynamic geometry state for one simulation session.
///
/// Constructed from a catalog snapshot; deep-copyable; mutated every step
/// by the caller's kinematics pass (placements) and collision policy
/// (activation, margins). There is no incremental update path: after any
/// catalog pair-list change, reconstruct the data (or at least re-derive
/// the joint indexes with [`fill_inner_outer_maps`](Self::fill_inner_outer_maps)).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeomData {
    /// World placement of each geometry, indexed like the catalog.
    /// Written by the caller's forward kinematics; never computed here.
    pub geom_xpos: Vec<Isometry3<f64>>,
    /// Activation flag per collision pair, positionally aligned with the
    /// catalog's pair list. All `true` at construction.
    pub active_collision_pairs: Vec<bool>,
    /// Narrow-phase query state, or `None` for placements-only data.
    pub query: Option<PairQueryState>,
    /// Joint to the geometries rigidly attached to it ("inner objects").
    pub inner_objects: HashMap<JointIndex, Vec<GeomIndex>>,
    /// Joint to the geometries on the far side of every pair whose near
    /// side belongs to that joint ("outer objects").
    pub outer_objects: HashMap<JointIndex, Vec<GeomIndex>>,
}

/// Dense input maps must be square with dimension `ngeom`.
fn check_map_size<T: Scalar>(map: &DMatrix<T>, ngeom: usize) -> Result<(), GeomError> {
    if map.nrows() != ngeom || map.ncols() != ngeom {
        return Err(GeomError::MapSizeMismatch {
            rows: map.nrows(),
            cols: map.ncols(),
            ngeom,
        });
    }
    Ok(())
}

/// Authoritative cell of a dense triangular map for a canonical pair.
///
/// Pairs are stored `(min, max)`, so `upper` selects the upper-triangle
/// cell `(min, max)` and `!upper` its mirror `(max, min)`.
fn map_cell(pair: CollisionPair, upper: bool) -> (usize, usize) {
    if upper {
        (pair.first, pair.second)
    } else {
        (pair.second, pair.first)
    }
}

impl GeomData {
    fn with_query(model: &GeomModel, narrow_phase: bool) -> Self {
        let npair = model.npair();
        let mut data = Self {
            geom_xpos: vec![Isometry3::identity(); model.ngeom],
            active_collision_pairs: vec![true; npair],
            query: narrow_phase.then(|| PairQueryState {
                requests: vec![PairRequest::default(); npair],
                results: vec![PairResult::default(); npair],
            }),
            inner_objects: HashMap::new(),
            outer_objects: HashMap::new(),
        };
        data.fill_inner_outer_maps(model);
        data
    }

    /// Create runtime state from a catalog snapshot, with narrow-phase
    /// query arrays allocated and every pair active.
    #[must_use]
    pub fn new(model: &GeomModel) -> Self {
        Self::with_query(model, true)
    }

    /// Create placements-only runtime state: no narrow-phase backend is
    /// configured, so no per-pair query arrays are allocated. Activation
    /// flags are still present — they are core state, not backend state.
    #[must_use]
    pub fn placements_only(model: &GeomModel) -> Self {
        Self::with_query(model, false)
    }

    /// Number of collision pairs this state was built for.
    #[must_use]
    pub fn npair(&self) -> usize {
        self.active_collision_pairs.len()
    }

    /// Rebuild the inner/outer joint indexes from scratch.
    ///
    /// Derive-on-demand only: nothing keeps these maps current when the
    /// catalog changes, and there is deliberately no memoization. Call this
    /// again (or reconstruct the data) after editing the catalog.
    pub fn fill_inner_outer_maps(&mut self, model: &GeomModel) {
        self.inner_objects.clear();
        self.outer_objects.clear();

        for (gid, geom) in model.geoms.iter().enumerate() {
            self.inner_objects
                .entry(geom.parent_joint)
                .or_default()
                .push(gid);
        }
        for pair in &model.collision_pairs {
            let near_joint = model.geoms[pair.first].parent_joint;
            self.outer_objects
                .entry(near_joint)
                .or_default()
                .push(pair.second);
        }
    }

    fn set_pair_active(&mut self, pair_id: PairIndex, active: bool) -> Result<(), GeomError> {
        let npair = self.active_collision_pairs.len();
        let flag = self
            .active_collision_pairs
            .get_mut(pair_id)
            .ok_or(GeomError::PairIndexOutOfRange {
                index: pair_id,
                npair,
            })?;
        *flag = active;
        Ok(())
    }

    /// Enable the narrow-phase query for one pair.
    ///
    /// # Errors
    ///
    /// [`GeomError::PairIndexOutOfRange`] when `pair_id >= npair()`.
    pub fn activate_collision_pair(&mut self, pair_id: PairIndex) -> Result<(), GeomError> {
        self.set_pair_active(pair_id, true)
    }

    /// Disable the narrow-phase query for one pair.
    ///
    /// # Errors
    ///
    /// [`GeomError::PairIndexOutOfRange`] when `pair_id >= npair()`.
    pub fn deactivate_collision_pair(&mut self, pair_id: PairIndex) -> Result<(), GeomError> {
        self.set_pair_active(pair_id, false)
    }

    /// Mark every pair active.
    pub fn activate_all_collision_pairs(&mut self) {
        self.active_collision_pairs.fill(true);
    }

    /// Mark every pair inactive.
    pub fn deactivate_all_collision_pairs(&mut self) {
        self.active_collision_pairs.fill(false);
    }

    /// Drive per-pair activation from a dense boolean map, without the
    /// caller needing to know the pair ordering.
    ///
    /// For each pair `k` the activation flag is set to the authoritative
    /// triangular cell of `map` (see [`set_security_margins`](Self::set_security_margins)
    /// for the same rule applied to margins).
    ///
    /// # Errors
    ///
    /// [`GeomError::MapSizeMismatch`] unless `map` is `ngeom` x `ngeom`;
    /// [`GeomError::PairCountMismatch`] when this state's activation array
    /// is stale relative to the catalog's pair list. No flag is modified
    /// on either error.
    pub fn set_active_collision_pairs(
        &mut self,
        model: &GeomModel,
        map: &DMatrix<bool>,
        upper: bool,
    ) -> Result<(), GeomError> {
        check_map_size(map, model.ngeom)?;
        if model.npair() != self.active_collision_pairs.len() {
            return Err(GeomError::PairCountMismatch {
                model_pairs: model.npair(),
                data_pairs: self.active_collision_pairs.len(),
            });
        }
        for (k, pair) in model.collision_pairs.iter().enumerate() {
            self.active_collision_pairs[k] = map[map_cell(*pair, upper)];
        }
        Ok(())
    }

    /// Drive per-pair security margins from a dense real-valued map, with
    /// the same triangular cell rule as
    /// [`set_active_collision_pairs`](Self::set_active_collision_pairs).
    ///
    /// # Errors
    ///
    /// [`GeomError::MapSizeMismatch`] unless `map` is `ngeom` x `ngeom`;
    /// [`GeomError::NarrowPhaseUnavailable`] on placements-only data;
    /// [`GeomError::PairCountMismatch`] when the request array is stale
    /// relative to the catalog's pair list. No margin is modified on any
    /// error.
    pub fn set_security_margins(
        &mut self,
        model: &GeomModel,
        map: &DMatrix<f64>,
        upper: bool,
    ) -> Result<(), GeomError> {
        check_map_size(map, model.ngeom)?;
        let query = self.query.as_mut().ok_or(GeomError::NarrowPhaseUnavailable)?;
        if model.npair() != query.requests.len() {
            return Err(GeomError::PairCountMismatch {
                model_pairs: model.npair(),
                data_pairs: query.requests.len(),
            });
        }
        for (k, pair) in model.collision_pairs.iter().enumerate() {
            query.requests[k].security_margin = map[map_cell(*pair, upper)];
        }
        Ok(())
    }
}

impl fmt::Display for GeomData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.query.is_some() {
            writeln!(
                f,
                "Number of collision pairs = {}",
                self.active_collision_pairs.len()
            )?;
            for (k, active) in self.active_collision_pairs.iter().enumerate() {
                writeln!(f, "Pair {k} {}", if *active { "active" } else { "inactive" })?;
            }
        } else {
            writeln!(
                f,
                "WARNING: no narrow-phase backend configured; only geometry placements are available."
            )?;
            writeln!(f, "Number of geometry objects = {}", self.geom_xpos.len())?;
        }
        Ok(())
    }
}
