//! Factory constructors for canonical geometry catalogs.
//!
//! Pre-configured [`GeomModel`] instances for test scenes and doc
//! examples; not intended for production loading paths.

use crate::model::{GeomModel, GeomObject};
use crate::shape::GeomShape;

impl GeomModel {
    /// Create a catalog of `njoint * per_joint` small spheres, `per_joint`
    /// on each joint, with frame `j` mapping to joint `j` and names
    /// `geom_{joint}_{k}`. No collision pairs are added.
    #[must_use]
    pub fn sphere_chain(njoint: usize, per_joint: usize) -> Self {
        let mut model = Self::new();
        for j in 0..njoint {
            for k in 0..per_joint {
                model.add_geom(GeomObject::new(
                    format!("geom_{j}_{k}"),
                    j,
                    j,
                    GeomShape::sphere(0.1),
                ));
            }
        }
        model
    }
}
