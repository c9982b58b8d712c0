//! Geometry catalog: objects, candidate collision pairs, name lookup.
//!
//! [`GeomModel`] is the static half of the geometry Model/Data split. It is
//! populated by a loader (or by hand), stays fixed during stepping, and is
//! the construction source for [`GeomData`]. The catalog's pair list is the
//! positional key for every per-pair array in the runtime state: whenever
//! the pair list changes, existing `GeomData` instances are stale until
//! reconstructed.

use std::fmt;

use nalgebra::{DMatrix, Isometry3};
use serde::{Deserialize, Serialize};

use crate::data::GeomData;
use crate::error::GeomError;
use crate::shape::GeomShape;

/// Positional index of a geometry in the catalog.
pub type GeomIndex = usize;
/// Positional index of a collision pair in the pair list.
pub type PairIndex = usize;
/// Joint index in the supplying kinematic model.
pub type JointIndex = usize;
/// Frame index in the supplying kinematic model.
pub type FrameIndex = usize;

/// Read-only view of the kinematic model used during geometry registration.
///
/// The multibody model itself lives outside this crate; registration only
/// needs the frame count and each frame's parent joint for the cross-check
/// in [`GeomModel::add_geom_with_model`].
pub trait KinematicTree {
    /// Number of frames in the model.
    fn nframe(&self) -> usize;

    /// Parent joint of `frame`. Only called with `frame < self.nframe()`.
    fn frame_parent(&self, frame: FrameIndex) -> JointIndex;
}

/// One collision/visual shape rigidly attached to one joint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeomObject {
    /// Geometry name. Not required to be unique; used by name lookup.
    pub name: String,
    /// Joint the geometry is rigidly attached to.
    pub parent_joint: JointIndex,
    /// Frame the geometry is attached to in the supplying model.
    pub parent_frame: FrameIndex,
    /// Placement of the geometry relative to its parent joint frame.
    pub placement: Isometry3<f64>,
    /// Shape payload. Opaque to the catalog; consumed by the narrow phase.
    pub shape: GeomShape,
}

impl GeomObject {
    /// Create a geometry object with identity local placement.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        parent_joint: JointIndex,
        parent_frame: FrameIndex,
        shape: GeomShape,
    ) -> Self {
        Self {
            name: name.into(),
            parent_joint,
            parent_frame,
            placement: Isometry3::identity(),
            shape,
        }
    }
}

impl fmt::Display for GeomObject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Geometry object '{}': parent joint {}, parent frame {}, {}",
            self.name, self.parent_joint, self.parent_frame, self.shape
        )
    }
}

/// Unordered candidate pair of catalog indices.
///
/// The constructor canonicalizes to `(min, max)`, so `(a, b)` and `(b, a)`
/// compare equal everywhere: existence checks, removal, and the triangular
/// cell selection of the matrix-driven bulk operations all agree on which
/// pair is meant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CollisionPair {
    /// Lower geometry index.
    pub first: GeomIndex,
    /// Upper geometry index.
    pub second: GeomIndex,
}

impl CollisionPair {
    /// Create a canonicalized pair; argument order is irrelevant.
    #[must_use]
    pub fn new(a: GeomIndex, b: GeomIndex) -> Self {
        Self {
            first: a.min(b),
            second: a.max(b),
        }
    }
}

impl fmt::Display for CollisionPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "collision pair ({}, {})", self.first, self.second)
    }
}

/// Static catalog of geometry objects and candidate collision pairs.
///
/// Append-mostly: the geometry count only grows. The pair list can be
/// edited freely, but every edit leaves previously constructed
/// [`GeomData`] instances stale — their per-pair arrays keep the old
/// length and positions until the data is reconstructed.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GeomModel {
    /// Number of geometry objects. Always equals `geoms.len()`.
    pub ngeom: usize,
    /// Geometry objects in insertion order.
    pub geoms: Vec<GeomObject>,
    /// Candidate collision pairs in insertion order. Removal shifts
    /// subsequent entries; pairs are never otherwise reordered.
    pub collision_pairs: Vec<CollisionPair>,
}

impl GeomModel {
    /// Create an empty catalog.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current number of candidate collision pairs.
    #[must_use]
    pub fn npair(&self) -> usize {
        self.collision_pairs.len()
    }

    /// Append a geometry object and return its positional index.
    pub fn add_geom(&mut self, geom: GeomObject) -> GeomIndex {
        if self.exist_geom_name(&geom.name) {
            tracing::warn!(
                name = %geom.name,
                "duplicate geometry name registered; geom_id resolves to the first match"
            );
        }
        let idx = self.ngeom;
        self.ngeom += 1;
        self.geoms.push(geom);
        idx
    }

    /// Append a geometry object, cross-checking its parent joint against
    /// the supplying kinematic model.
    ///
    /// When the object's frame reference is in range, the stored parent
    /// joint is taken from the frame. When the frame reference is out of
    /// range the object is appended as-is and the cross-check is skipped.
    ///
    /// # Errors
    ///
    /// [`GeomError::ParentJointMismatch`] when the frame is in range but
    /// its parent joint differs from the object's explicit parent joint.
    /// The catalog is unchanged on error.
    pub fn add_geom_with_model<M: KinematicTree>(
        &mut self,
        mut geom: GeomObject,
        model: &M,
    ) -> Result<GeomIndex, GeomError> {
        if geom.parent_frame < model.nframe() {
            let frame_joint = model.frame_parent(geom.parent_frame);
            if geom.parent_joint != frame_joint {
                return Err(GeomError::ParentJointMismatch {
                    frame: geom.parent_frame,
                    frame_joint,
                    parent_joint: geom.parent_joint,
                });
            }
            geom.parent_joint = frame_joint;
        } else {
            tracing::debug!(
                frame = geom.parent_frame,
                nframe = model.nframe(),
                "parent frame out of range; joint cross-check skipped"
            );
        }
        Ok(self.add_geom(geom))
    }

    /// Index of the first geometry with the given name, or `ngeom` when
    /// no geometry matches.
    ///
    /// Non-failing by contract: "not found" is the catalog's own size, and
    /// the caller must bounds-check the result before indexing with it.
    #[must_use]
    pub fn geom_id(&self, name: &str) -> GeomIndex {
        self.geoms
            .iter()
            .position(|g| g.name == name)
            .unwrap_or(self.ngeom)
    }

    /// Whether any geometry has the given name.
    #[must_use]
    pub fn exist_geom_name(&self, name: &str) -> bool {
        self.geoms.iter().any(|g| g.name == name)
    }

    /// Both pair indices must reference existing geometries.
    fn check_pair(&self, pair: CollisionPair) -> Result<(), GeomError> {
        if pair.first >= self.ngeom {
            return Err(GeomError::GeomIndexOutOfRange {
                index: pair.first,
                ngeom: self.ngeom,
            });
        }
        if pair.second >= self.ngeom {
            return Err(GeomError::GeomIndexOutOfRange {
                index: pair.second,
                ngeom: self.ngeom,
            });
        }
        Ok(())
    }

    /// Insert a candidate pair. Inserting a pair that is already present
    /// (in either order) is a silent no-op.
    ///
    /// # Errors
    ///
    /// [`GeomError::GeomIndexOutOfRange`] when either index is `>= ngeom`,
    /// [`GeomError::SelfCollisionPair`] when both indices are equal. The
    /// pair list is unchanged on error.
    pub fn add_collision_pair(&mut self, pair: CollisionPair) -> Result<(), GeomError> {
        self.check_pair(pair)?;
        if pair.first == pair.second {
            return Err(GeomError::SelfCollisionPair { index: pair.first });
        }
        if !self.exist_collision_pair(pair) {
            self.collision_pairs.push(pair);
        }
        Ok(())
    }

    /// Replace the pair list from a dense adjacency map.
    ///
    /// Clears all existing pairs, then inserts every `(i, j)`, `i < j`,
    /// whose authoritative cell is true: `(i, j)` when `upper`, `(j, i)`
    /// otherwise.
    ///
    /// # Errors
    ///
    /// [`GeomError::MapSizeMismatch`] unless the map is `ngeom` x `ngeom`.
    /// The pair list is unchanged on error.
    pub fn add_collision_pairs(
        &mut self,
        map: &DMatrix<bool>,
        upper: bool,
    ) -> Result<(), GeomError> {
        if map.nrows() != self.ngeom || map.ncols() != self.ngeom {
            return Err(GeomError::MapSizeMismatch {
                rows: map.nrows(),
                cols: map.ncols(),
                ngeom: self.ngeom,
            });
        }
        self.remove_all_collision_pairs();
        for i in 0..self.ngeom {
            for j in (i + 1)..self.ngeom {
                let cell = if upper { map[(i, j)] } else { map[(j, i)] };
                if cell {
                    self.collision_pairs.push(CollisionPair::new(i, j));
                }
            }
        }
        Ok(())
    }

    /// Replace the pair list with every `(i, j)`, `i < j`, whose parent
    /// joints differ. A body is never a collision candidate against
    /// geometry rigidly attached to its own joint.
    pub fn add_all_collision_pairs(&mut self) {
        self.remove_all_collision_pairs();
        for i in 0..self.ngeom {
            let joint_i = self.geoms[i].parent_joint;
            for j in (i + 1)..self.ngeom {
                if joint_i != self.geoms[j].parent_joint {
                    self.collision_pairs.push(CollisionPair::new(i, j));
                }
            }
        }
    }

    /// Remove a pair if present; subsequent pairs shift down one position.
    /// Removing an absent pair is a silent no-op.
    ///
    /// # Errors
    ///
    /// [`GeomError::GeomIndexOutOfRange`] when either index is `>= ngeom`.
    pub fn remove_collision_pair(&mut self, pair: CollisionPair) -> Result<(), GeomError> {
        self.check_pair(pair)?;
        if let Some(k) = self.collision_pairs.iter().position(|p| *p == pair) {
            self.collision_pairs.remove(k);
        }
        Ok(())
    }

    /// Remove every candidate pair.
    pub fn remove_all_collision_pairs(&mut self) {
        self.collision_pairs.clear();
    }

    /// Whether the pair is present (argument order irrelevant).
    #[must_use]
    pub fn exist_collision_pair(&self, pair: CollisionPair) -> bool {
        self.collision_pairs.contains(&pair)
    }

    /// Position of the pair in the pair list, or the pair count when the
    /// pair is absent.
    ///
    /// Non-failing by contract: "not found" is the pair list's own size,
    /// and the caller must bounds-check the result before indexing with it.
    #[must_use]
    pub fn find_collision_pair(&self, pair: CollisionPair) -> PairIndex {
        self.collision_pairs
            .iter()
            .position(|p| *p == pair)
            .unwrap_or(self.collision_pairs.len())
    }

    /// Create runtime state for this catalog, with narrow-phase query
    /// arrays allocated. See [`GeomData::new`].
    #[must_use]
    pub fn make_data(&self) -> GeomData {
        GeomData::new(self)
    }
}

impl fmt::Display for GeomModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Number of geometry objects = {}", self.ngeom)?;
        for geom in &self.geoms {
            writeln!(f, "{geom}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    /// One unit sphere per entry, attached to the given joint; frame index
    /// mirrors the joint index.
    fn catalog(joints: &[JointIndex]) -> GeomModel {
        let mut model = GeomModel::new();
        for (i, &j) in joints.iter().enumerate() {
            model.add_geom(GeomObject::new(format!("g{i}"), j, j, GeomShape::sphere(0.1)));
        }
        model
    }

    #[test]
    fn add_geom_returns_positional_index() {
        let mut model = GeomModel::new();
        let a = model.add_geom(GeomObject::new("a", 0, 0, GeomShape::sphere(1.0)));
        let b = model.add_geom(GeomObject::new("b", 1, 1, GeomShape::sphere(1.0)));
        assert_eq!((a, b), (0, 1));
        assert_eq!(model.ngeom, 2);
        assert_eq!(model.geoms.len(), 2);
    }

    #[test]
    fn geom_id_missing_returns_ngeom_sentinel() {
        let model = catalog(&[0, 0, 1]);
        assert_eq!(model.geom_id("missing"), model.ngeom);
        assert!(!model.exist_geom_name("missing"));
        assert_eq!(model.geom_id("g1"), 1);
        assert!(model.exist_geom_name("g1"));
    }

    #[test]
    fn geom_id_resolves_duplicate_names_to_first_match() {
        let mut model = catalog(&[0]);
        model.add_geom(GeomObject::new("g0", 1, 1, GeomShape::sphere(0.2)));
        assert_eq!(model.geom_id("g0"), 0);
    }

    #[test]
    fn pair_insert_is_order_insensitive() {
        let mut model = catalog(&[0, 1, 2]);
        model.add_collision_pair(CollisionPair::new(2, 0)).unwrap();
        assert!(model.exist_collision_pair(CollisionPair::new(0, 2)));
        assert!(model.exist_collision_pair(CollisionPair::new(2, 0)));
        assert_eq!(model.find_collision_pair(CollisionPair::new(0, 2)), 0);
        assert_eq!(model.find_collision_pair(CollisionPair::new(2, 0)), 0);
        // Stored canonically as (min, max).
        assert_eq!(model.collision_pairs[0], CollisionPair { first: 0, second: 2 });
    }

    #[test]
    fn pair_insert_is_idempotent() {
        let mut model = catalog(&[0, 1]);
        model.add_collision_pair(CollisionPair::new(0, 1)).unwrap();
        model.add_collision_pair(CollisionPair::new(0, 1)).unwrap();
        model.add_collision_pair(CollisionPair::new(1, 0)).unwrap();
        assert_eq!(model.npair(), 1);
    }

    #[test]
    fn pair_indices_validated_independently() {
        let mut model = catalog(&[0, 1, 2]);
        assert_eq!(
            model.add_collision_pair(CollisionPair::new(0, 5)),
            Err(GeomError::GeomIndexOutOfRange { index: 5, ngeom: 3 })
        );
        assert_eq!(
            model.add_collision_pair(CollisionPair::new(7, 9)),
            Err(GeomError::GeomIndexOutOfRange { index: 7, ngeom: 3 })
        );
        assert_eq!(model.npair(), 0);
    }

    #[test]
    fn self_pair_rejected() {
        let mut model = catalog(&[0, 1]);
        assert_eq!(
            model.add_collision_pair(CollisionPair::new(1, 1)),
            Err(GeomError::SelfCollisionPair { index: 1 })
        );
        assert_eq!(model.npair(), 0);
    }

    #[test]
    fn add_all_pairs_excludes_same_joint() {
        // A and B share joint 1; C sits on joint 2. A-B is never a candidate.
        let mut model = catalog(&[1, 1, 2]);
        model.add_all_collision_pairs();
        assert_eq!(
            model.collision_pairs,
            vec![CollisionPair::new(0, 2), CollisionPair::new(1, 2)]
        );
    }

    #[test]
    fn add_all_pairs_single_joint_yields_none() {
        let mut model = catalog(&[3, 3, 3, 3]);
        model.add_all_collision_pairs();
        assert!(model.collision_pairs.is_empty());
    }

    #[test]
    fn matrix_pairs_upper_and_transposed_lower_agree() {
        let mut upper_model = catalog(&[0, 1, 2, 3]);
        let mut lower_model = upper_model.clone();

        let n = upper_model.ngeom;
        let mut map = DMatrix::from_element(n, n, false);
        map[(0, 1)] = true;
        map[(0, 3)] = true;
        map[(2, 3)] = true;

        upper_model.add_collision_pairs(&map, true).unwrap();
        lower_model.add_collision_pairs(&map.transpose(), false).unwrap();

        assert_eq!(upper_model.collision_pairs, lower_model.collision_pairs);
        assert_eq!(upper_model.npair(), 3);
    }

    #[test]
    fn matrix_pairs_replace_existing_list() {
        let mut model = catalog(&[0, 1, 2]);
        model.add_collision_pair(CollisionPair::new(0, 1)).unwrap();

        let map = DMatrix::from_element(3, 3, false);
        model.add_collision_pairs(&map, true).unwrap();
        assert!(model.collision_pairs.is_empty());
    }

    #[test]
    fn matrix_pairs_wrong_size_rejected_without_mutation() {
        let mut model = catalog(&[0, 1, 2]);
        model.add_collision_pair(CollisionPair::new(0, 1)).unwrap();

        let map = DMatrix::from_element(2, 3, true);
        assert_eq!(
            model.add_collision_pairs(&map, true),
            Err(GeomError::MapSizeMismatch { rows: 2, cols: 3, ngeom: 3 })
        );
        assert_eq!(model.npair(), 1);
    }

    #[test]
    fn remove_pair_shifts_subsequent_entries() {
        let mut model = catalog(&[0, 1, 2]);
        model.add_all_collision_pairs();
        assert_eq!(model.npair(), 3);

        model.remove_collision_pair(CollisionPair::new(1, 0)).unwrap();
        assert_eq!(model.npair(), 2);
        assert!(!model.exist_collision_pair(CollisionPair::new(0, 1)));
        // (0, 2) shifted into position 0.
        assert_eq!(model.find_collision_pair(CollisionPair::new(0, 2)), 0);
    }

    #[test]
    fn remove_absent_pair_is_noop() {
        let mut model = catalog(&[0, 1, 2]);
        model.add_collision_pair(CollisionPair::new(0, 1)).unwrap();
        model.remove_collision_pair(CollisionPair::new(1, 2)).unwrap();
        assert_eq!(model.npair(), 1);
    }

    #[test]
    fn display_lists_objects_in_insertion_order() {
        let model = catalog(&[0, 1]);
        let text = model.to_string();
        assert!(text.starts_with("Number of geometry objects = 2"));
        let g0 = text.find("'g0'").unwrap();
        let g1 = text.find("'g1'").unwrap();
        assert!(g0 < g1);
    }
}
