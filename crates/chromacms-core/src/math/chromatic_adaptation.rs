//! Chromatic adaptation between white points
//!
//! Absolute colorimetric transforms adapt the connection space between
//! the two profiles' declared illuminants. Bradford is the ICC
//! recommendation and the only method this engine uses.
//!
//! Reference: ICC.1:2022 Annex E.

use crate::color::WhitePoint;
use crate::math::Matrix3x3;

/// Bradford matrix: XYZ → LMS (cone response)
const BRADFORD_XYZ_TO_LMS: Matrix3x3 = Matrix3x3::new([
    [0.8951000, 0.2664000, -0.1614000],
    [-0.7502000, 1.7135000, 0.0367000],
    [0.0389000, -0.0685000, 1.0296000],
]);

/// Bradford matrix: LMS → XYZ (inverse)
const BRADFORD_LMS_TO_XYZ: Matrix3x3 = Matrix3x3::new([
    [0.9869929, -0.1470543, 0.1599627],
    [0.4323053, 0.5183603, 0.0492912],
    [-0.0085287, 0.0400428, 0.9684867],
]);

/// Compute the Bradford adaptation matrix from one white point to another
///
/// The result M is used as XYZ_dst = M × XYZ_src.
pub fn adaptation_matrix(src_white: &WhitePoint, dst_white: &WhitePoint) -> Matrix3x3 {
    let src_lms = BRADFORD_XYZ_TO_LMS.multiply_vec(src_white.xyz.to_array());
    let dst_lms = BRADFORD_XYZ_TO_LMS.multiply_vec(dst_white.xyz.to_array());

    let ratio = |dst: f64, src: f64| if src.abs() > 1e-10 { dst / src } else { 1.0 };
    let scale = Matrix3x3::diagonal(
        ratio(dst_lms[0], src_lms[0]),
        ratio(dst_lms[1], src_lms[1]),
        ratio(dst_lms[2], src_lms[2]),
    );

    BRADFORD_LMS_TO_XYZ.multiply(&scale.multiply(&BRADFORD_XYZ_TO_LMS))
}
