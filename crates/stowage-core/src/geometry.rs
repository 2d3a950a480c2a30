//! Geometry kernel: axis-aligned boxes and the six box orientations.

use crate::{Error, Result};
use nalgebra::Vector3;
use std::fmt;
use std::str::FromStr;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// One of the six permutations mapping an item's (width, depth, height)
/// onto the container's (x, y, z) axes.
///
/// The enumeration order is fixed; the allocator scans orientations in this
/// order and ties between placement options preserve it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Orientation {
    /// Identity: (w, d, h).
    #[default]
    Xyz,
    /// Depth and height swapped: (w, h, d).
    Xzy,
    /// Width and depth swapped: (d, w, h).
    Yxz,
    /// Rotate left: (d, h, w).
    Yzx,
    /// Rotate right: (h, w, d).
    Zxy,
    /// Width and height swapped: (h, d, w).
    Zyx,
}

impl Orientation {
    /// All six orientations in the fixed enumeration order.
    pub const ALL: [Orientation; 6] = [
        Orientation::Xyz,
        Orientation::Xzy,
        Orientation::Yxz,
        Orientation::Yzx,
        Orientation::Zxy,
        Orientation::Zyx,
    ];

    /// Applies the permutation to raw (width, depth, height) dimensions,
    /// yielding the effective footprint along the container axes.
    pub fn apply(&self, dims: Vector3<f64>) -> Vector3<f64> {
        let (w, d, h) = (dims.x, dims.y, dims.z);
        match self {
            Orientation::Xyz => Vector3::new(w, d, h),
            Orientation::Xzy => Vector3::new(w, h, d),
            Orientation::Yxz => Vector3::new(d, w, h),
            Orientation::Yzx => Vector3::new(d, h, w),
            Orientation::Zxy => Vector3::new(h, w, d),
            Orientation::Zyx => Vector3::new(h, d, w),
        }
    }

    /// Returns the wire code ("xyz", "xzy", ...).
    pub fn code(&self) -> &'static str {
        match self {
            Orientation::Xyz => "xyz",
            Orientation::Xzy => "xzy",
            Orientation::Yxz => "yxz",
            Orientation::Yzx => "yzx",
            Orientation::Zxy => "zxy",
            Orientation::Zyx => "zyx",
        }
    }
}

impl fmt::Display for Orientation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Orientation {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "xyz" => Ok(Orientation::Xyz),
            "xzy" => Ok(Orientation::Xzy),
            "yxz" => Ok(Orientation::Yxz),
            "yzx" => Ok(Orientation::Yzx),
            "zxy" => Ok(Orientation::Zxy),
            "zyx" => Ok(Orientation::Zyx),
            other => Err(Error::InvalidOrientation(other.to_string())),
        }
    }
}

/// Axis-aligned bounding box in container coordinates.
///
/// x runs along the container width, y along the depth (y = 0 is the open
/// face), z along the height.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Aabb {
    /// Minimum x coordinate.
    pub min_x: f64,
    /// Minimum y coordinate.
    pub min_y: f64,
    /// Minimum z coordinate.
    pub min_z: f64,
    /// Maximum x coordinate.
    pub max_x: f64,
    /// Maximum y coordinate.
    pub max_y: f64,
    /// Maximum z coordinate.
    pub max_z: f64,
}

impl Aabb {
    /// Creates a new AABB from min/max coordinates.
    pub fn new(min_x: f64, min_y: f64, min_z: f64, max_x: f64, max_y: f64, max_z: f64) -> Self {
        Self {
            min_x,
            min_y,
            min_z,
            max_x,
            max_y,
            max_z,
        }
    }

    /// Creates an AABB from a min corner and effective dimensions.
    pub fn from_position(position: Vector3<f64>, dims: Vector3<f64>) -> Self {
        Self {
            min_x: position.x,
            min_y: position.y,
            min_z: position.z,
            max_x: position.x + dims.x,
            max_y: position.y + dims.y,
            max_z: position.z + dims.z,
        }
    }

    /// Returns the extent along x.
    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    /// Returns the extent along y.
    pub fn depth(&self) -> f64 {
        self.max_y - self.min_y
    }

    /// Returns the extent along z.
    pub fn height(&self) -> f64 {
        self.max_z - self.min_z
    }

    /// Returns the volume of the box.
    pub fn volume(&self) -> f64 {
        self.width() * self.depth() * self.height()
    }

    /// Half-open overlap test: boxes that only touch at a boundary do not
    /// overlap, so flush packing is always admissible.
    pub fn overlaps(&self, other: &Aabb) -> bool {
        self.min_x < other.max_x
            && self.max_x > other.min_x
            && self.min_y < other.max_y
            && self.max_y > other.min_y
            && self.min_z < other.max_z
            && self.max_z > other.min_z
    }

    /// Overlap of the 2D footprints projected on the x–z plane, using the
    /// same half-open semantics. This is the occlusion test along the
    /// depth (access) axis.
    pub fn footprint_overlaps(&self, other: &Aabb) -> bool {
        self.min_x < other.max_x
            && self.max_x > other.min_x
            && self.min_z < other.max_z
            && self.max_z > other.min_z
    }

    /// Returns true if this box lies entirely within
    /// [0, w] x [0, d] x [0, h].
    pub fn within_bounds(&self, bounds: Vector3<f64>) -> bool {
        self.min_x >= 0.0
            && self.min_y >= 0.0
            && self.min_z >= 0.0
            && self.max_x <= bounds.x
            && self.max_y <= bounds.y
            && self.max_z <= bounds.z
    }
}

/// Raw-bounds fit test: each effective dimension at most the corresponding
/// container dimension.
pub fn fits(container_dims: Vector3<f64>, dims: Vector3<f64>) -> bool {
    dims.x <= container_dims.x && dims.y <= container_dims.y && dims.z <= container_dims.z
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_orientation_permutations() {
        let dims = Vector3::new(1.0, 2.0, 3.0);
        let expected = [
            (1.0, 2.0, 3.0),
            (1.0, 3.0, 2.0),
            (2.0, 1.0, 3.0),
            (2.0, 3.0, 1.0),
            (3.0, 1.0, 2.0),
            (3.0, 2.0, 1.0),
        ];
        for (orientation, (x, y, z)) in Orientation::ALL.iter().zip(expected) {
            let e = orientation.apply(dims);
            assert_eq!((e.x, e.y, e.z), (x, y, z), "orientation {orientation}");
        }
    }

    #[test]
    fn test_orientation_preserves_volume() {
        let dims = Vector3::new(2.0, 5.0, 7.0);
        for orientation in Orientation::ALL {
            let e = orientation.apply(dims);
            assert_relative_eq!(e.x * e.y * e.z, 70.0);
        }
    }

    #[test]
    fn test_orientation_codes_round_trip() {
        for orientation in Orientation::ALL {
            let parsed: Orientation = orientation.code().parse().unwrap();
            assert_eq!(parsed, orientation);
        }
        assert!("wdh".parse::<Orientation>().is_err());
    }

    #[test]
    fn test_overlap_half_open() {
        let a = Aabb::new(0.0, 0.0, 0.0, 10.0, 10.0, 10.0);
        let b = Aabb::new(5.0, 5.0, 5.0, 15.0, 15.0, 15.0);
        assert!(a.overlaps(&b));

        // Touching faces do not overlap.
        let c = Aabb::new(10.0, 0.0, 0.0, 20.0, 10.0, 10.0);
        assert!(!a.overlaps(&c));
        assert!(!c.overlaps(&a));
    }

    #[test]
    fn test_overlap_requires_all_axes() {
        let a = Aabb::new(0.0, 0.0, 0.0, 10.0, 10.0, 10.0);
        // Overlaps on x and z but is entirely in front on y.
        let b = Aabb::new(0.0, 20.0, 0.0, 10.0, 30.0, 10.0);
        assert!(!a.overlaps(&b));
        assert!(a.footprint_overlaps(&b));
    }

    #[test]
    fn test_within_bounds() {
        let bounds = Vector3::new(100.0, 100.0, 100.0);
        let inside = Aabb::new(0.0, 0.0, 0.0, 100.0, 100.0, 100.0);
        assert!(inside.within_bounds(bounds));

        let sticking_out = Aabb::new(95.0, 0.0, 0.0, 105.0, 10.0, 10.0);
        assert!(!sticking_out.within_bounds(bounds));
    }

    #[test]
    fn test_fits() {
        let container = Vector3::new(50.0, 40.0, 30.0);
        assert!(fits(container, Vector3::new(50.0, 40.0, 30.0)));
        assert!(!fits(container, Vector3::new(50.1, 40.0, 30.0)));
    }

    #[test]
    fn test_aabb_from_position() {
        let aabb = Aabb::from_position(Vector3::new(1.0, 2.0, 3.0), Vector3::new(10.0, 20.0, 30.0));
        assert_relative_eq!(aabb.max_x, 11.0);
        assert_relative_eq!(aabb.max_y, 22.0);
        assert_relative_eq!(aabb.max_z, 33.0);
        assert_relative_eq!(aabb.volume(), 6000.0);
    }
}
