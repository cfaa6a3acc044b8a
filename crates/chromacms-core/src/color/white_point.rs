//! CIE standard illuminant white points
//!
//! Values from CIE standards and ICC.1:2022. Y is normalized to 1.0.

use crate::color::Xyz;

/// A white point definition
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WhitePoint {
    /// Name of the illuminant
    pub name: &'static str,
    /// CIE XYZ coordinates (Y normalized to 1.0)
    pub xyz: Xyz,
}

impl WhitePoint {
    /// Create a new white point
    pub const fn new(name: &'static str, x: f64, y: f64, z: f64) -> Self {
        Self {
            name,
            xyz: Xyz::new(x, y, z),
        }
    }

    /// Build an unnamed white point from measured XYZ
    pub const fn from_xyz(xyz: Xyz) -> Self {
        Self {
            name: "custom",
            xyz,
        }
    }

    /// Chromaticity coordinates (x, y)
    pub fn chromaticity(&self) -> (f64, f64) {
        let sum = self.xyz.x + self.xyz.y + self.xyz.z;
        if sum > 0.0 {
            (self.xyz.x / sum, self.xyz.y / sum)
        } else {
            (0.0, 0.0)
        }
    }
}

/// CIE Standard Illuminant D50 (~5003K)
///
/// The profile connection space white point in ICC profiles.
pub const D50: WhitePoint = WhitePoint::new("D50", 0.9642, 1.0, 0.8249);

/// CIE Standard Illuminant D65 (~6504K)
///
/// The white point of sRGB and Display P3.
pub const D65: WhitePoint = WhitePoint::new("D65", 0.9505, 1.0, 1.0890);
