//! Multi-dimensional LUT tags: 'mft1', 'mft2', 'mAB ' and 'mBA '
//!
//! All four wire formats decode to the same ordered-element model. An
//! element list already in evaluation order keeps the pipeline builder
//! out of the per-format layout business.

use crate::error::DecodeError;
use crate::icc::tags::curves::{decode_curv, decode_para, Curve};
use crate::icc::types::{S15Fixed16, TypeSignature};
use crate::math::interpolation::{multilinear_interp, MAX_CLUT_INPUTS};
use crate::math::Matrix3x3;

/// A multi-dimensional lookup table with per-dimension grid sizes
#[derive(Debug, Clone, PartialEq)]
pub struct Clut {
    /// Node count per input dimension, first dimension slowest
    pub grid_points: Vec<u8>,
    /// `output_channels` interleaved values per node, in [0, 1]
    pub samples: Vec<f64>,
    pub output_channels: usize,
}

impl Clut {
    pub fn input_channels(&self) -> usize {
        self.grid_points.len()
    }

    /// Evaluate by multilinear interpolation, inputs in [0, 1]
    pub fn eval(&self, input: &[f64], output: &mut [f64]) {
        multilinear_interp(
            &self.samples,
            &self.grid_points,
            self.output_channels,
            input,
            output,
        );
    }
}

/// One processing element of a decoded LUT, in evaluation order
#[derive(Debug, Clone, PartialEq)]
pub enum LutElement {
    /// Per-channel tone curves
    Curves(Vec<Curve>),
    /// 3x3 matrix plus offset, applied as M*v + o
    Matrix { matrix: Matrix3x3, offset: [f64; 3] },
    Clut(Clut),
}

/// A decoded LUT tag as an ordered element chain
#[derive(Debug, Clone, PartialEq)]
pub struct Lut {
    pub input_channels: usize,
    pub output_channels: usize,
    pub elements: Vec<LutElement>,
}

fn check_channels(input: u8, output: u8) -> Result<(usize, usize), DecodeError> {
    let (i, o) = (input as usize, output as usize);
    if i == 0 || i > MAX_CLUT_INPUTS || o == 0 || o > MAX_CLUT_INPUTS {
        return Err(DecodeError::Corrupted {
            what: "lut channel counts",
            detail: format!("{} in, {} out", i, o),
        });
    }
    Ok((i, o))
}

fn read_s15(data: &[u8], off: usize) -> f64 {
    S15Fixed16::from_be_bytes([data[off], data[off + 1], data[off + 2], data[off + 3]]).to_f64()
}

/// Decode 'mft1' (8-bit) or 'mft2' (16-bit)
pub fn decode_mft(data: &[u8], sixteen_bit: bool) -> Result<Lut, DecodeError> {
    let what = if sixteen_bit { "mft2" } else { "mft1" };
    let header_len = if sixteen_bit { 52 } else { 48 };
    if data.len() < header_len {
        return Err(DecodeError::Truncated {
            what,
            expected: header_len,
            actual: data.len(),
        });
    }

    let (input_channels, output_channels) = check_channels(data[8], data[9])?;
    let grid = data[10] as usize;
    if grid < 2 {
        return Err(DecodeError::Corrupted {
            what: "mft grid size",
            detail: format!("{} points per dimension", grid),
        });
    }

    // 3x3 matrix at offset 12, identity unless the source is PCSXYZ
    let mut m = [[0.0; 3]; 3];
    for r in 0..3 {
        for c in 0..3 {
            m[r][c] = read_s15(data, 12 + (r * 3 + c) * 4);
        }
    }
    let matrix = Matrix3x3::new(m);

    let (input_entries, output_entries, mut pos) = if sixteen_bit {
        let ie = u16::from_be_bytes([data[48], data[49]]) as usize;
        let oe = u16::from_be_bytes([data[50], data[51]]) as usize;
        (ie, oe, 52)
    } else {
        (256, 256, 48)
    };

    let sample_size = if sixteen_bit { 2 } else { 1 };

    fn read_sample(data: &[u8], off: usize, sixteen_bit: bool) -> f64 {
        if sixteen_bit {
            u16::from_be_bytes([data[off], data[off + 1]]) as f64 / 65535.0
        } else {
            data[off] as f64 / 255.0
        }
    }

    fn read_tables(
        data: &[u8],
        pos: &mut usize,
        count: usize,
        entries: usize,
        sixteen_bit: bool,
    ) -> Result<Vec<Curve>, DecodeError> {
        let sample_size = if sixteen_bit { 2 } else { 1 };
        let mut curves = Vec::with_capacity(count);
        for _ in 0..count {
            let needed = *pos + entries * sample_size;
            if data.len() < needed {
                return Err(DecodeError::Truncated {
                    what: "mft curve table",
                    expected: needed,
                    actual: data.len(),
                });
            }
            let table: Vec<f64> = (0..entries)
                .map(|i| read_sample(data, *pos + i * sample_size, sixteen_bit))
                .collect();
            *pos += entries * sample_size;
            curves.push(Curve::Table(table));
        }
        Ok(curves)
    }

    let input_curves = read_tables(data, &mut pos, input_channels, input_entries, sixteen_bit)?;

    let clut_nodes = grid.pow(input_channels as u32);
    let clut_values = clut_nodes * output_channels;
    let needed = pos + clut_values * sample_size;
    if data.len() < needed {
        return Err(DecodeError::Truncated {
            what: "mft clut",
            expected: needed,
            actual: data.len(),
        });
    }
    let samples: Vec<f64> = (0..clut_values)
        .map(|i| read_sample(data, pos + i * sample_size, sixteen_bit))
        .collect();
    pos += clut_values * sample_size;

    let output_curves = read_tables(data, &mut pos, output_channels, output_entries, sixteen_bit)?;

    let mut elements = Vec::new();
    if !matrix.is_identity(1e-9) {
        elements.push(LutElement::Matrix {
            matrix,
            offset: [0.0; 3],
        });
    }
    elements.push(LutElement::Curves(input_curves));
    elements.push(LutElement::Clut(Clut {
        grid_points: vec![grid as u8; input_channels],
        samples,
        output_channels,
    }));
    elements.push(LutElement::Curves(output_curves));

    Ok(Lut {
        input_channels,
        output_channels,
        elements,
    })
}

/// Read a packed sequence of 'curv'/'para' curves, each 4-byte aligned
fn read_curve_sequence(data: &[u8], start: usize, count: usize) -> Result<Vec<Curve>, DecodeError> {
    let mut curves = Vec::with_capacity(count);
    let mut pos = start;

    for _ in 0..count {
        if data.len() < pos + 12 {
            return Err(DecodeError::Truncated {
                what: "embedded curve",
                expected: pos + 12,
                actual: data.len(),
            });
        }
        let sig = TypeSignature(u32::from_be_bytes([
            data[pos],
            data[pos + 1],
            data[pos + 2],
            data[pos + 3],
        ]));
        let rest = &data[pos..];

        let (curve, len) = match sig {
            TypeSignature::CURVE => {
                let count =
                    u32::from_be_bytes([rest[8], rest[9], rest[10], rest[11]]) as usize;
                let len = 12 + count * 2;
                (decode_curv(rest)?, len)
            }
            TypeSignature::PARA => {
                let function_type = u16::from_be_bytes([rest[8], rest[9]]);
                let curve = decode_para(rest)?;
                let params = match function_type {
                    0 => 1,
                    1 => 3,
                    2 => 4,
                    3 => 5,
                    _ => 7,
                };
                (curve, 12 + params * 4)
            }
            other => {
                return Err(DecodeError::Corrupted {
                    what: "embedded curve",
                    detail: format!("unexpected type '{}'", other),
                });
            }
        };

        curves.push(curve);
        pos += len.div_ceil(4) * 4;
    }

    Ok(curves)
}

fn read_mab_matrix(data: &[u8], offset: usize) -> Result<LutElement, DecodeError> {
    if data.len() < offset + 48 {
        return Err(DecodeError::Truncated {
            what: "mAB matrix",
            expected: offset + 48,
            actual: data.len(),
        });
    }
    let mut m = [[0.0; 3]; 3];
    for r in 0..3 {
        for c in 0..3 {
            m[r][c] = read_s15(data, offset + (r * 3 + c) * 4);
        }
    }
    let mut off = [0.0; 3];
    for (i, o) in off.iter_mut().enumerate() {
        *o = read_s15(data, offset + 36 + i * 4);
    }
    Ok(LutElement::Matrix {
        matrix: Matrix3x3::new(m),
        offset: off,
    })
}

fn read_mab_clut(
    data: &[u8],
    offset: usize,
    input_channels: usize,
    output_channels: usize,
) -> Result<Clut, DecodeError> {
    if data.len() < offset + 20 {
        return Err(DecodeError::Truncated {
            what: "mAB clut header",
            expected: offset + 20,
            actual: data.len(),
        });
    }

    if input_channels > MAX_CLUT_INPUTS {
        return Err(DecodeError::TooManyGridDimensions(input_channels));
    }

    let grid_points: Vec<u8> = data[offset..offset + input_channels].to_vec();
    if grid_points.iter().any(|&g| g < 2) {
        return Err(DecodeError::Corrupted {
            what: "mAB clut grid",
            detail: format!("{:?}", grid_points),
        });
    }

    let precision = data[offset + 16] as usize;
    if precision != 1 && precision != 2 {
        return Err(DecodeError::Corrupted {
            what: "mAB clut precision",
            detail: format!("{} bytes per sample", precision),
        });
    }

    let nodes: usize = grid_points.iter().map(|&g| g as usize).product();
    let values = nodes * output_channels;
    let start = offset + 20;
    let needed = start + values * precision;
    if data.len() < needed {
        return Err(DecodeError::Truncated {
            what: "mAB clut samples",
            expected: needed,
            actual: data.len(),
        });
    }

    let samples: Vec<f64> = (0..values)
        .map(|i| {
            let off = start + i * precision;
            if precision == 2 {
                u16::from_be_bytes([data[off], data[off + 1]]) as f64 / 65535.0
            } else {
                data[off] as f64 / 255.0
            }
        })
        .collect();

    Ok(Clut {
        grid_points,
        samples,
        output_channels,
    })
}

/// Decode 'mAB ' (device → PCS) or 'mBA ' (PCS → device)
///
/// Both formats store five optional sub-elements addressed by offsets
/// from the tag start. 'mAB ' evaluates A → CLUT → M → matrix → B;
/// 'mBA ' evaluates B → matrix → M → CLUT → A.
pub fn decode_mab(data: &[u8], b_to_a: bool) -> Result<Lut, DecodeError> {
    let what = if b_to_a { "mBA" } else { "mAB" };
    if data.len() < 32 {
        return Err(DecodeError::Truncated {
            what,
            expected: 32,
            actual: data.len(),
        });
    }

    let (input_channels, output_channels) = check_channels(data[8], data[9])?;

    let read_offset = |off: usize| {
        u32::from_be_bytes([data[off], data[off + 1], data[off + 2], data[off + 3]]) as usize
    };
    let b_offset = read_offset(12);
    let matrix_offset = read_offset(16);
    let m_offset = read_offset(20);
    let clut_offset = read_offset(24);
    let a_offset = read_offset(28);

    // The B side always has 3 channels (PCS); the A side matches the
    // device. For mAB the A side is the input, for mBA the output.
    let (a_channels, b_channels) = if b_to_a {
        (output_channels, input_channels)
    } else {
        (input_channels, output_channels)
    };

    let a_curves = if a_offset != 0 {
        Some(LutElement::Curves(read_curve_sequence(
            data, a_offset, a_channels,
        )?))
    } else {
        None
    };
    let m_curves = if m_offset != 0 {
        Some(LutElement::Curves(read_curve_sequence(
            data, m_offset, b_channels,
        )?))
    } else {
        None
    };
    let b_curves = if b_offset != 0 {
        Some(LutElement::Curves(read_curve_sequence(
            data, b_offset, b_channels,
        )?))
    } else {
        None
    };
    let matrix = if matrix_offset != 0 {
        Some(read_mab_matrix(data, matrix_offset)?)
    } else {
        None
    };
    let clut = if clut_offset != 0 {
        let (ci, co) = if b_to_a {
            (b_channels, a_channels)
        } else {
            (a_channels, b_channels)
        };
        Some(LutElement::Clut(read_mab_clut(data, clut_offset, ci, co)?))
    } else {
        None
    };

    let ordered: Vec<Option<LutElement>> = if b_to_a {
        vec![b_curves, matrix, m_curves, clut, a_curves]
    } else {
        vec![a_curves, clut, m_curves, matrix, b_curves]
    };
    let elements: Vec<LutElement> = ordered.into_iter().flatten().collect();

    if elements.is_empty() {
        return Err(DecodeError::Corrupted {
            what: "mAB elements",
            detail: "all sub-element offsets are zero".into(),
        });
    }

    Ok(Lut {
        input_channels,
        output_channels,
        elements,
    })
}
