//! Tone curve tags: 'curv' and 'para'

use crate::error::DecodeError;
use crate::icc::types::{S15Fixed16, U8Fixed8};
use crate::math::curves::{ParametricCurve, ParametricCurveType};
use crate::math::interpolation::lut1d_interp;

/// A decoded 1D tone curve
#[derive(Debug, Clone, PartialEq)]
pub enum Curve {
    /// Y = X ('curv' with zero entries)
    Identity,
    /// Y = X^g ('curv' with one u8Fixed8 entry)
    Gamma(f64),
    /// Sampled curve, values in [0, 1], uniform spacing
    Table(Vec<f64>),
    /// One of the five 'para' families
    Parametric(ParametricCurve),
}

impl Curve {
    /// Evaluate forward, input clamped to [0, 1]
    pub fn eval(&self, x: f64) -> f64 {
        let x = x.clamp(0.0, 1.0);
        match self {
            Self::Identity => x,
            Self::Gamma(g) => x.powf(*g),
            Self::Table(table) => lut1d_interp(table, x),
            Self::Parametric(p) => p.eval(x),
        }
    }

    /// Evaluate the inverse, input clamped to [0, 1]
    ///
    /// Tables are inverted by scanning for the bracketing segment,
    /// which assumes the curve is monotonically non-decreasing.
    pub fn eval_inverse(&self, y: f64) -> f64 {
        let y = y.clamp(0.0, 1.0);
        match self {
            Self::Identity => y,
            Self::Gamma(g) => {
                if g.abs() > 1e-10 {
                    y.powf(1.0 / g)
                } else {
                    y
                }
            }
            Self::Table(table) => invert_table(table, y),
            Self::Parametric(p) => p.eval_inverse(y),
        }
    }

    pub fn is_identity(&self) -> bool {
        matches!(self, Self::Identity)
    }
}

fn invert_table(table: &[f64], y: f64) -> f64 {
    if table.len() < 2 {
        return y;
    }
    let max_idx = (table.len() - 1) as f64;

    for i in 0..table.len() - 1 {
        let (y0, y1) = (table[i], table[i + 1]);
        if y >= y0 && y <= y1 {
            let t = if (y1 - y0).abs() > 1e-12 {
                (y - y0) / (y1 - y0)
            } else {
                0.0
            };
            return (i as f64 + t) / max_idx;
        }
    }

    if y <= table[0] { 0.0 } else { 1.0 }
}

/// Decode a 'curv' payload (type signature already verified)
pub fn decode_curv(data: &[u8]) -> Result<Curve, DecodeError> {
    if data.len() < 12 {
        return Err(DecodeError::Truncated {
            what: "curv header",
            expected: 12,
            actual: data.len(),
        });
    }

    let count = u32::from_be_bytes([data[8], data[9], data[10], data[11]]) as usize;
    match count {
        0 => Ok(Curve::Identity),
        1 => {
            if data.len() < 14 {
                return Err(DecodeError::Truncated {
                    what: "curv gamma entry",
                    expected: 14,
                    actual: data.len(),
                });
            }
            let gamma = U8Fixed8::from_be_bytes([data[12], data[13]]).to_f64();
            Ok(Curve::Gamma(gamma))
        }
        n => {
            let needed = 12 + n * 2;
            if data.len() < needed {
                return Err(DecodeError::Truncated {
                    what: "curv table",
                    expected: needed,
                    actual: data.len(),
                });
            }
            let table = (0..n)
                .map(|i| {
                    let off = 12 + i * 2;
                    u16::from_be_bytes([data[off], data[off + 1]]) as f64 / 65535.0
                })
                .collect();
            Ok(Curve::Table(table))
        }
    }
}

/// Decode a 'para' payload
pub fn decode_para(data: &[u8]) -> Result<Curve, DecodeError> {
    if data.len() < 12 {
        return Err(DecodeError::Truncated {
            what: "para header",
            expected: 12,
            actual: data.len(),
        });
    }

    let function_type = u16::from_be_bytes([data[8], data[9]]);
    let curve_type = ParametricCurveType::from_icc(function_type)
        .ok_or(DecodeError::UnknownCurveType(function_type))?;

    let param_count = curve_type.param_count();
    let needed = 12 + param_count * 4;
    if data.len() < needed {
        return Err(DecodeError::Truncated {
            what: "para parameters",
            expected: needed,
            actual: data.len(),
        });
    }

    let params: Vec<f64> = (0..param_count)
        .map(|i| {
            let off = 12 + i * 4;
            S15Fixed16::from_be_bytes([data[off], data[off + 1], data[off + 2], data[off + 3]])
                .to_f64()
        })
        .collect();

    let curve =
        ParametricCurve::from_params(curve_type, &params).ok_or(DecodeError::Corrupted {
            what: "para parameters",
            detail: format!("expected {} parameters", param_count),
        })?;
    Ok(Curve::Parametric(curve))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn curv_payload(entries: &[u16]) -> Vec<u8> {
        let mut data = Vec::new();
        data.extend_from_slice(b"curv");
        data.extend_from_slice(&[0; 4]);
        data.extend_from_slice(&(entries.len() as u32).to_be_bytes());
        for e in entries {
            data.extend_from_slice(&e.to_be_bytes());
        }
        data
    }

    #[test]
    fn test_curv_identity() {
        let curve = decode_curv(&curv_payload(&[])).unwrap();
        assert!(curve.is_identity());
        assert_eq!(curve.eval(0.42), 0.42);
    }

    #[test]
    fn test_curv_gamma() {
        // 2.2 in u8Fixed8 is 0x0233
        let curve = decode_curv(&curv_payload(&[0x0233])).unwrap();
        match curve {
            Curve::Gamma(g) => assert!((g - 2.19921875).abs() < 1e-9),
            other => panic!("expected gamma, got {:?}", other),
        }
    }

    #[test]
    fn test_curv_table() {
        let curve = decode_curv(&curv_payload(&[0, 32768, 65535])).unwrap();
        assert!((curve.eval(0.5) - 0.50000763).abs() < 1e-6);
        assert!((curve.eval(0.0) - 0.0).abs() < 1e-12);
        assert!((curve.eval(1.0) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_curv_truncated_table() {
        let mut data = curv_payload(&[0, 32768, 65535]);
        data.truncate(14);
        assert!(matches!(
            decode_curv(&data),
            Err(DecodeError::Truncated { .. })
        ));
    }

    fn para_payload(function_type: u16, params: &[f64]) -> Vec<u8> {
        let mut data = Vec::new();
        data.extend_from_slice(b"para");
        data.extend_from_slice(&[0; 4]);
        data.extend_from_slice(&function_type.to_be_bytes());
        data.extend_from_slice(&[0; 2]);
        for p in params {
            data.extend_from_slice(&S15Fixed16::from_f64(*p).to_be_bytes());
        }
        data
    }

    #[test]
    fn test_para_srgb() {
        let payload = para_payload(
            3,
            &[2.4, 1.0 / 1.055, 0.055 / 1.055, 1.0 / 12.92, 0.04045],
        );
        let curve = decode_para(&payload).unwrap();
        let reference = ParametricCurve::srgb();
        for i in 0..=20 {
            let x = i as f64 / 20.0;
            assert!((curve.eval(x) - reference.eval(x)).abs() < 1e-3);
        }
    }

    #[test]
    fn test_para_unknown_type() {
        let payload = para_payload(9, &[2.2]);
        assert!(matches!(
            decode_para(&payload),
            Err(DecodeError::UnknownCurveType(9))
        ));
    }

    #[test]
    fn test_table_inverse() {
        let table: Vec<f64> = (0..256).map(|i| (i as f64 / 255.0).powf(2.2)).collect();
        let curve = Curve::Table(table);
        for i in 0..=10 {
            let x = i as f64 / 10.0;
            let y = curve.eval(x);
            assert!((curve.eval_inverse(y) - x).abs() < 1e-2);
        }
    }
}
