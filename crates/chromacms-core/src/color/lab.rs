//! CIE L*a*b* conversions
//!
//! Lab is the alternative profile connection space. LUT profiles with
//! a Lab PCS get converted through XYZ so the pipeline always connects
//! in one space. Conversions are relative to the D50 PCS illuminant.

use crate::color::white_point::D50;

const EPSILON: f64 = 216.0 / 24389.0; // (6/29)^3
const KAPPA: f64 = 24389.0 / 27.0; // (29/3)^3

fn f_forward(t: f64) -> f64 {
    if t > EPSILON {
        t.cbrt()
    } else {
        (KAPPA * t + 16.0) / 116.0
    }
}

fn f_inverse(t: f64) -> f64 {
    let t3 = t * t * t;
    if t3 > EPSILON {
        t3
    } else {
        (116.0 * t - 16.0) / KAPPA
    }
}

/// Convert XYZ (D50-relative) to Lab: L in [0, 100], a/b roughly [-128, 127]
pub fn xyz_to_lab(xyz: [f64; 3]) -> [f64; 3] {
    let fx = f_forward(xyz[0] / D50.xyz.x);
    let fy = f_forward(xyz[1] / D50.xyz.y);
    let fz = f_forward(xyz[2] / D50.xyz.z);

    [116.0 * fy - 16.0, 500.0 * (fx - fy), 200.0 * (fy - fz)]
}

/// Convert Lab to XYZ (D50-relative)
pub fn lab_to_xyz(lab: [f64; 3]) -> [f64; 3] {
    let fy = (lab[0] + 16.0) / 116.0;
    let fx = fy + lab[1] / 500.0;
    let fz = fy - lab[2] / 200.0;

    [
        f_inverse(fx) * D50.xyz.x,
        f_inverse(fy) * D50.xyz.y,
        f_inverse(fz) * D50.xyz.z,
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_white_is_l100() {
        let lab = xyz_to_lab(D50.xyz.to_array());
        assert!((lab[0] - 100.0).abs() < 1e-9);
        assert!(lab[1].abs() < 1e-9);
        assert!(lab[2].abs() < 1e-9);
    }

    #[test]
    fn test_black_is_l0() {
        let lab = xyz_to_lab([0.0, 0.0, 0.0]);
        assert!(lab[0].abs() < 1e-9);
    }

    #[test]
    fn test_roundtrip() {
        for xyz in [
            [0.2, 0.3, 0.1],
            [0.9642, 1.0, 0.8249],
            [0.01, 0.02, 0.015],
            [0.4124, 0.2126, 0.0193],
        ] {
            let lab = xyz_to_lab(xyz);
            let back = lab_to_xyz(lab);
            for c in 0..3 {
                assert!(
                    (back[c] - xyz[c]).abs() < 1e-9,
                    "roundtrip failed: {:?} -> {:?} -> {:?}",
                    xyz,
                    lab,
                    back
                );
            }
        }
    }
}
