//! Narrow-phase collaborator boundary.
//!
//! The catalog decides, per pair, whether a query runs and with what
//! parameters; the backend computes the actual collision/distance answer.
//! This crate never interprets the answer — it stores the result record
//! positionally and moves on.

use nalgebra::Isometry3;

use crate::data::{GeomData, PairRequest, PairResult};
use crate::error::GeomError;
use crate::model::GeomModel;
use crate::shape::GeomShape;

/// Narrow-phase collision/distance engine.
///
/// Implementations receive both shapes, both world placements, and the
/// pair's query parameters. The request is passed mutably so the backend
/// can update its warm-start hint in place.
pub trait NarrowPhase {
    /// Run one pair query.
    fn collide(
        &mut self,
        shape1: &GeomShape,
        placement1: &Isometry3<f64>,
        shape2: &GeomShape,
        placement2: &Isometry3<f64>,
        request: &mut PairRequest,
    ) -> PairResult;
}

/// Run the backend over every active pair, storing each result at the
/// pair's position in `data.query`.
///
/// Inactive pairs are skipped and keep their previous result untouched.
/// Placements must already be up to date — this function only gates and
/// forwards.
///
/// # Errors
///
/// [`GeomError::GeomCountMismatch`] or [`GeomError::PairCountMismatch`]
/// when `data` is stale relative to `model`, and
/// [`GeomError::NarrowPhaseUnavailable`] on placements-only data. No query
/// runs on any error.
pub fn compute_collisions<B: NarrowPhase>(
    model: &GeomModel,
    data: &mut GeomData,
    backend: &mut B,
) -> Result<(), GeomError> {
    let GeomData {
        geom_xpos,
        active_collision_pairs,
        query,
        ..
    } = data;

    if geom_xpos.len() != model.ngeom {
        return Err(GeomError::GeomCountMismatch {
            model_geoms: model.ngeom,
            data_geoms: geom_xpos.len(),
        });
    }
    let model_pairs = model.npair();
    if active_collision_pairs.len() != model_pairs {
        return Err(GeomError::PairCountMismatch {
            model_pairs,
            data_pairs: active_collision_pairs.len(),
        });
    }
    let query = query.as_mut().ok_or(GeomError::NarrowPhaseUnavailable)?;
    if query.requests.len() != model_pairs {
        return Err(GeomError::PairCountMismatch {
            model_pairs,
            data_pairs: query.requests.len(),
        });
    }

    for (k, pair) in model.collision_pairs.iter().enumerate() {
        if !active_collision_pairs[k] {
            continue;
        }
        let g1 = &model.geoms[pair.first];
        let g2 = &model.geoms[pair.second];
        query.results[k] = backend.collide(
            &g1.shape,
            &geom_xpos[pair.first],
            &g2.shape,
            &geom_xpos[pair.second],
            &mut query.requests[k],
        );
    }
    Ok(())
}
