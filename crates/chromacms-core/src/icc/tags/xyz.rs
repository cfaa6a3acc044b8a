//! 'XYZ ' and 'sf32' tag payloads

use crate::color::Xyz;
use crate::error::DecodeError;
use crate::icc::types::{S15Fixed16, XyzNumber};
use crate::math::Matrix3x3;

/// Decode an 'XYZ ' payload; the first XYZNumber is the value
pub fn decode_xyz(data: &[u8]) -> Result<Xyz, DecodeError> {
    if data.len() < 20 {
        return Err(DecodeError::Truncated {
            what: "XYZ tag",
            expected: 20,
            actual: data.len(),
        });
    }
    match XyzNumber::from_bytes(&data[8..20]) {
        Some(n) => Ok(n.to_xyz()),
        None => Err(DecodeError::Truncated {
            what: "XYZ number",
            expected: 12,
            actual: data.len() - 8,
        }),
    }
}

/// Decode an 'sf32' payload holding a 3x3 matrix, row-major
///
/// This is the layout of the 'chad' chromatic adaptation tag.
pub fn decode_sf32_matrix(data: &[u8]) -> Result<Matrix3x3, DecodeError> {
    const NEEDED: usize = 8 + 9 * 4;
    if data.len() < NEEDED {
        return Err(DecodeError::Truncated {
            what: "sf32 matrix",
            expected: NEEDED,
            actual: data.len(),
        });
    }

    let mut m = [[0.0; 3]; 3];
    for r in 0..3 {
        for c in 0..3 {
            let off = 8 + (r * 3 + c) * 4;
            m[r][c] =
                S15Fixed16::from_be_bytes([data[off], data[off + 1], data[off + 2], data[off + 3]])
                    .to_f64();
        }
    }
    Ok(Matrix3x3::new(m))
}
