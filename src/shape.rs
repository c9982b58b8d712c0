//! Geometry shape payloads.
//!
//! The catalog stores shapes by value but never inspects them; only the
//! narrow-phase backend interprets the payload. Mesh and terrain assets are
//! out of scope for this crate.

use std::fmt;

use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

/// Collision shape carried by a geometry object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GeomShape {
    /// Sphere with given radius.
    Sphere {
        /// Sphere radius in meters.
        radius: f64,
    },
    /// Box with half-extents.
    Box {
        /// Half-extents along each local axis.
        half_extents: Vector3<f64>,
    },
    /// Capsule (cylinder with hemispherical caps) along the local Z axis.
    Capsule {
        /// Half-length of the cylindrical portion.
        half_length: f64,
        /// Capsule radius.
        radius: f64,
    },
    /// Cylinder (without caps) along the local Z axis.
    Cylinder {
        /// Half-length of the cylinder.
        half_length: f64,
        /// Cylinder radius.
        radius: f64,
    },
    /// Infinite plane with equation `normal . x = distance`.
    Plane {
        /// Unit normal of the plane.
        normal: Vector3<f64>,
        /// Distance from the origin along the normal.
        distance: f64,
    },
}

impl GeomShape {
    /// Create a sphere shape.
    #[must_use]
    pub fn sphere(radius: f64) -> Self {
        Self::Sphere { radius }
    }

    /// Create a capsule along the local Z axis.
    #[must_use]
    pub fn capsule(half_length: f64, radius: f64) -> Self {
        Self::Capsule {
            half_length,
            radius,
        }
    }

    /// Create a ground plane at height 0 with +Z normal.
    #[must_use]
    pub fn ground_plane() -> Self {
        Self::Plane {
            normal: Vector3::z(),
            distance: 0.0,
        }
    }
}

impl fmt::Display for GeomShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Sphere { radius } => write!(f, "sphere (radius {radius})"),
            Self::Box { half_extents } => write!(
                f,
                "box (half-extents {} {} {})",
                half_extents.x, half_extents.y, half_extents.z
            ),
            Self::Capsule {
                half_length,
                radius,
            } => write!(f, "capsule (half-length {half_length}, radius {radius})"),
            Self::Cylinder {
                half_length,
                radius,
            } => write!(f, "cylinder (half-length {half_length}, radius {radius})"),
            Self::Plane { normal, distance } => write!(
                f,
                "plane (normal {} {} {}, distance {distance})",
                normal.x, normal.y, normal.z
            ),
        }
    }
}
