//! Volume Geometry
//!
//! Geometric primitives that make up a scene: cuboids, vertical cylinders,
//! horizontally unbounded slabs and spheres. Each shape answers a single
//! question, whether a point lies inside it. Bounds are validated on
//! construction so a `Shape` value is never degenerate.

use crate::error::ApiError;
use crate::types::{SceneId, VolumeId};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind tag of a volume, derived from its shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ZoneType {
    Cuboid,
    Cylinder,
    Slab,
    Sphere,
}

impl fmt::Display for ZoneType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ZoneType::Cuboid => "cuboid",
            ZoneType::Cylinder => "cylinder",
            ZoneType::Slab => "slab",
            ZoneType::Sphere => "sphere",
        };
        f.write_str(name)
    }
}

/// Shape-specific bounds.
///
/// Every range is closed: points on the boundary are inside.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Shape {
    Cuboid {
        min: [f64; 3],
        max: [f64; 3],
    },
    Cylinder {
        x: f64,
        z: f64,
        min_y: f64,
        max_y: f64,
        radius: f64,
    },
    Slab {
        min_y: f64,
        max_y: f64,
    },
    Sphere {
        x: f64,
        y: f64,
        z: f64,
        radius: f64,
    },
}

/// Axis-aligned bounds of a shape, possibly infinite on some axes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub min: [f64; 3],
    pub max: [f64; 3],
}

impl BoundingBox {
    pub fn intersects(&self, other: &BoundingBox) -> bool {
        (0..3).all(|axis| self.min[axis] <= other.max[axis] && other.min[axis] <= self.max[axis])
    }
}

fn require_finite(values: &[f64]) -> Result<(), ApiError> {
    if values.iter().all(|v| v.is_finite()) {
        Ok(())
    } else {
        Err(ApiError::InvalidArgument(
            "Volume coordinates must be finite numbers".to_string(),
        ))
    }
}

/// Stored bounds must stay finite and keep a positive extent after rounding.
fn require_span(min: f64, max: f64, what: &str) -> Result<(), ApiError> {
    if min.is_finite() && max.is_finite() && max > min {
        Ok(())
    } else {
        Err(ApiError::InvalidArgument(format!(
            "The {} does not fit within representable coordinates",
            what
        )))
    }
}

fn require_reach(centers: &[f64], radius: f64, what: &str) -> Result<(), ApiError> {
    for center in centers {
        require_span(center - radius, center + radius, what)?;
    }
    if !(radius * radius).is_finite() {
        return Err(ApiError::InvalidArgument(format!(
            "The {} does not fit within representable coordinates",
            what
        )));
    }
    Ok(())
}

impl Shape {
    /// Cuboid spanning two opposite corners, given in any order.
    pub fn cuboid(
        x1: f64,
        y1: f64,
        z1: f64,
        x2: f64,
        y2: f64,
        z2: f64,
    ) -> Result<Self, ApiError> {
        require_finite(&[x1, y1, z1, x2, y2, z2])?;
        let min = [x1.min(x2), y1.min(y2), z1.min(z2)];
        let max = [x1.max(x2), y1.max(y2), z1.max(z2)];
        if (0..3).any(|axis| max[axis] <= min[axis]) {
            return Err(ApiError::InvalidArgument(
                "A cuboid must have a positive extent on every axis".to_string(),
            ));
        }
        Ok(Shape::Cuboid { min, max })
    }

    /// Vertical cylinder whose base center is `(x, y, z)`.
    pub fn cylinder(x: f64, y: f64, z: f64, radius: f64, height: f64) -> Result<Self, ApiError> {
        require_finite(&[x, y, z, radius, height])?;
        if radius <= 0.0 {
            return Err(ApiError::InvalidArgument(
                "The radius of a cylinder must be positive".to_string(),
            ));
        }
        if height <= 0.0 {
            return Err(ApiError::InvalidArgument(
                "The height of a cylinder must be positive".to_string(),
            ));
        }
        require_span(y, y + height, "height of a cylinder")?;
        require_reach(&[x, z], radius, "radius of a cylinder")?;
        Ok(Shape::Cylinder {
            x,
            z,
            min_y: y,
            max_y: y + height,
            radius,
        })
    }

    /// Horizontally unbounded layer starting at `y`.
    pub fn slab(y: f64, height: f64) -> Result<Self, ApiError> {
        require_finite(&[y, height])?;
        if height <= 0.0 {
            return Err(ApiError::InvalidArgument(
                "The height of a slab must be positive".to_string(),
            ));
        }
        require_span(y, y + height, "height of a slab")?;
        Ok(Shape::Slab {
            min_y: y,
            max_y: y + height,
        })
    }

    pub fn sphere(x: f64, y: f64, z: f64, radius: f64) -> Result<Self, ApiError> {
        require_finite(&[x, y, z, radius])?;
        if radius <= 0.0 {
            return Err(ApiError::InvalidArgument(
                "The radius of a sphere must be positive".to_string(),
            ));
        }
        require_reach(&[x, y, z], radius, "radius of a sphere")?;
        Ok(Shape::Sphere { x, y, z, radius })
    }

    /// Re-run construction checks, for shapes that arrive through deserialization.
    pub fn validate(&self) -> Result<(), ApiError> {
        match *self {
            Shape::Cuboid { min, max } => {
                Shape::cuboid(min[0], min[1], min[2], max[0], max[1], max[2]).map(|_| ())
            }
            Shape::Cylinder {
                x,
                z,
                min_y,
                max_y,
                radius,
            } => Shape::cylinder(x, min_y, z, radius, max_y - min_y).map(|_| ()),
            Shape::Slab { min_y, max_y } => Shape::slab(min_y, max_y - min_y).map(|_| ()),
            Shape::Sphere { x, y, z, radius } => Shape::sphere(x, y, z, radius).map(|_| ()),
        }
    }

    pub fn zone_type(&self) -> ZoneType {
        match self {
            Shape::Cuboid { .. } => ZoneType::Cuboid,
            Shape::Cylinder { .. } => ZoneType::Cylinder,
            Shape::Slab { .. } => ZoneType::Slab,
            Shape::Sphere { .. } => ZoneType::Sphere,
        }
    }

    pub fn contains(&self, px: f64, py: f64, pz: f64) -> bool {
        match *self {
            Shape::Cuboid { min, max } => {
                px >= min[0]
                    && px <= max[0]
                    && py >= min[1]
                    && py <= max[1]
                    && pz >= min[2]
                    && pz <= max[2]
            }
            Shape::Cylinder {
                x,
                z,
                min_y,
                max_y,
                radius,
            } => {
                let dx = px - x;
                let dz = pz - z;
                py >= min_y && py <= max_y && dx * dx + dz * dz <= radius * radius
            }
            Shape::Slab { min_y, max_y } => py >= min_y && py <= max_y,
            Shape::Sphere { x, y, z, radius } => {
                let dx = px - x;
                let dy = py - y;
                let dz = pz - z;
                dx * dx + dy * dy + dz * dz <= radius * radius
            }
        }
    }

    pub fn bounding_box(&self) -> BoundingBox {
        match *self {
            Shape::Cuboid { min, max } => BoundingBox { min, max },
            Shape::Cylinder {
                x,
                z,
                min_y,
                max_y,
                radius,
            } => BoundingBox {
                min: [x - radius, min_y, z - radius],
                max: [x + radius, max_y, z + radius],
            },
            Shape::Slab { min_y, max_y } => BoundingBox {
                min: [f64::NEG_INFINITY, min_y, f64::NEG_INFINITY],
                max: [f64::INFINITY, max_y, f64::INFINITY],
            },
            Shape::Sphere { x, y, z, radius } => BoundingBox {
                min: [x - radius, y - radius, z - radius],
                max: [x + radius, y + radius, z + radius],
            },
        }
    }
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Shape::Cuboid { min, max } => write!(
                f,
                "cuboid ({}, {}, {}) -> ({}, {}, {})",
                min[0], min[1], min[2], max[0], max[1], max[2]
            ),
            Shape::Cylinder {
                x,
                z,
                min_y,
                max_y,
                radius,
            } => write!(
                f,
                "cylinder at ({}, {}) r={} y={}..{}",
                x, z, radius, min_y, max_y
            ),
            Shape::Slab { min_y, max_y } => write!(f, "slab y={}..{}", min_y, max_y),
            Shape::Sphere { x, y, z, radius } => {
                write!(f, "sphere at ({}, {}, {}) r={}", x, y, z, radius)
            }
        }
    }
}

/// A shape placed in a domain and owned by one scene.
#[derive(Debug, Clone, PartialEq)]
pub struct Volume {
    pub id: VolumeId,
    /// Case-folded name of the domain indexing this volume.
    pub domain: String,
    pub scene: SceneId,
    pub shape: Shape,
}

impl Volume {
    pub fn zone_type(&self) -> ZoneType {
        self.shape.zone_type()
    }

    pub fn contains(&self, x: f64, y: f64, z: f64) -> bool {
        self.shape.contains(x, y, z)
    }
}
