//! Pipeline stages
//!
//! A stage maps a fixed number of input channels to a fixed number of
//! output channels. Transforms are a chain of stages evaluated in f64.

use crate::color::white_point::D50;
use crate::color::{lab_to_xyz, xyz_to_lab};
use crate::icc::tags::{Clut, Curve};
use crate::math::Matrix3x3;

/// One processing step of a transform pipeline
#[derive(Debug, Clone)]
pub enum Stage {
    /// Per-channel tone curves, forward or inverted
    Curves { curves: Vec<Curve>, inverse: bool },
    /// Affine map: M*v + offset (3 channels)
    Matrix {
        matrix: Matrix3x3,
        offset: [f64; 3],
    },
    /// Multi-dimensional table lookup
    Clut(Clut),
    /// Decode ICC-encoded Lab to D50-relative XYZ
    LabToXyz,
    /// Encode D50-relative XYZ as ICC Lab
    XyzToLab,
    /// Expand linear gray to XYZ along the D50 white axis
    GrayToXyz,
    /// Collapse XYZ to linear gray via relative luminance
    XyzToGray,
}

impl Stage {
    /// Plain matrix stage with zero offset
    pub fn matrix(matrix: Matrix3x3) -> Self {
        Self::Matrix {
            matrix,
            offset: [0.0; 3],
        }
    }

    /// Forward per-channel curves
    pub fn curves(curves: Vec<Curve>) -> Self {
        Self::Curves {
            curves,
            inverse: false,
        }
    }

    /// Inverted per-channel curves
    pub fn inverse_curves(curves: Vec<Curve>) -> Self {
        Self::Curves {
            curves,
            inverse: true,
        }
    }

    pub fn input_channels(&self) -> usize {
        match self {
            Self::Curves { curves, .. } => curves.len(),
            Self::Matrix { .. } | Self::LabToXyz | Self::XyzToLab | Self::XyzToGray => 3,
            Self::Clut(clut) => clut.input_channels(),
            Self::GrayToXyz => 1,
        }
    }

    pub fn output_channels(&self) -> usize {
        match self {
            Self::Curves { curves, .. } => curves.len(),
            Self::Matrix { .. } | Self::LabToXyz | Self::XyzToLab | Self::GrayToXyz => 3,
            Self::Clut(clut) => clut.output_channels,
            Self::XyzToGray => 1,
        }
    }

    /// Evaluate one sample; slices must match the channel counts
    pub fn eval(&self, input: &[f64], output: &mut [f64]) {
        match self {
            Self::Curves { curves, inverse } => {
                for (i, curve) in curves.iter().enumerate() {
                    output[i] = if *inverse {
                        curve.eval_inverse(input[i])
                    } else {
                        curve.eval(input[i])
                    };
                }
            }
            Self::Matrix { matrix, offset } => {
                let v = matrix.multiply_vec([input[0], input[1], input[2]]);
                output[0] = v[0] + offset[0];
                output[1] = v[1] + offset[1];
                output[2] = v[2] + offset[2];
            }
            Self::Clut(clut) => clut.eval(input, output),
            Self::LabToXyz => {
                // ICC v4 Lab encoding: L in [0,100] maps to [0,1],
                // a and b in [-128,127] map to [0,1]
                let lab = [
                    input[0] * 100.0,
                    input[1] * 255.0 - 128.0,
                    input[2] * 255.0 - 128.0,
                ];
                output[..3].copy_from_slice(&lab_to_xyz(lab));
            }
            Self::XyzToLab => {
                let lab = xyz_to_lab([input[0], input[1], input[2]]);
                output[0] = (lab[0] / 100.0).clamp(0.0, 1.0);
                output[1] = ((lab[1] + 128.0) / 255.0).clamp(0.0, 1.0);
                output[2] = ((lab[2] + 128.0) / 255.0).clamp(0.0, 1.0);
            }
            Self::GrayToXyz => {
                output[0] = input[0] * D50.xyz.x;
                output[1] = input[0] * D50.xyz.y;
                output[2] = input[0] * D50.xyz.z;
            }
            // D50 Y is 1.0, so relative luminance is the gray value
            Self::XyzToGray => output[0] = input[1],
        }
    }
}
