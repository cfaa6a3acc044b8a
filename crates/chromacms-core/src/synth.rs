//! Built-in profile synthesis
//!
//! Generates small, well-formed profile byte blobs for the common
//! working spaces so callers do not need profile files on disk. The
//! output parses through [`Profile::parse`] like any external profile.

use crate::color::white_point::{WhitePoint, D50, D65};
use crate::color::Xyz;
use crate::error::BuildError;
use crate::icc::header::{ColorSpace, ProfileClass, RenderingIntent, PROFILE_MAGIC};
use crate::icc::tags::text::encode_mluc;
use crate::icc::types::{S15Fixed16, TagSignature, U8Fixed8, XyzNumber};
use crate::math::chromatic_adaptation::adaptation_matrix;
use crate::math::Matrix3x3;

const VERSION_4_3: u32 = 0x0430_0000;

/// Chromaticity coordinates (x, y) of one primary
pub type Chromaticity = (f64, f64);

/// sRGB primaries per IEC 61966-2-1
pub const SRGB_PRIMARIES: [Chromaticity; 3] = [(0.64, 0.33), (0.30, 0.60), (0.15, 0.06)];

/// Display P3 primaries (DCI-P3 gamut, D65 white)
pub const DISPLAY_P3_PRIMARIES: [Chromaticity; 3] = [(0.680, 0.320), (0.265, 0.690), (0.150, 0.060)];

/// Transfer curve for a synthesized RGB profile
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TransferCurve {
    /// Y = X, written as an empty 'curv'
    Linear,
    /// Power function, written as a one-entry 'curv'
    Gamma(f64),
    /// IEC 61966-2-1, written as a type 3 'para'
    Srgb,
}

impl TransferCurve {
    fn encode(&self) -> Vec<u8> {
        match self {
            Self::Linear => curv_body(&[]),
            Self::Gamma(g) => {
                let mut body = Vec::new();
                body.extend_from_slice(b"curv");
                body.extend_from_slice(&[0; 4]);
                body.extend_from_slice(&1u32.to_be_bytes());
                body.extend_from_slice(&U8Fixed8::from_f64(*g).0.to_be_bytes());
                body
            }
            Self::Srgb => {
                let mut body = Vec::new();
                body.extend_from_slice(b"para");
                body.extend_from_slice(&[0; 4]);
                body.extend_from_slice(&3u16.to_be_bytes());
                body.extend_from_slice(&[0; 2]);
                for p in [2.4, 1.0 / 1.055, 0.055 / 1.055, 1.0 / 12.92, 0.04045] {
                    body.extend_from_slice(&S15Fixed16::from_f64(p).to_be_bytes());
                }
                body
            }
        }
    }
}

fn curv_body(entries: &[u16]) -> Vec<u8> {
    let mut body = Vec::new();
    body.extend_from_slice(b"curv");
    body.extend_from_slice(&[0; 4]);
    body.extend_from_slice(&(entries.len() as u32).to_be_bytes());
    for e in entries {
        body.extend_from_slice(&e.to_be_bytes());
    }
    body
}

fn xyz_body(xyz: Xyz) -> Vec<u8> {
    let mut body = Vec::new();
    body.extend_from_slice(b"XYZ ");
    body.extend_from_slice(&[0; 4]);
    body.extend_from_slice(&XyzNumber::from_xyz(xyz).to_bytes());
    body
}

fn sf32_body(m: &Matrix3x3) -> Vec<u8> {
    let mut body = Vec::new();
    body.extend_from_slice(b"sf32");
    body.extend_from_slice(&[0; 4]);
    for row in &m.m {
        for v in row {
            body.extend_from_slice(&S15Fixed16::from_f64(*v).to_be_bytes());
        }
    }
    body
}

/// Assemble header, tag table and bodies into profile bytes
fn assemble(
    class: ProfileClass,
    color_space: ColorSpace,
    tags: &[(TagSignature, Vec<u8>)],
) -> Vec<u8> {
    let table_end = 132 + tags.len() * 12;
    let mut offsets = Vec::with_capacity(tags.len());
    let mut bodies = Vec::new();
    let mut pos = table_end;
    for (_, body) in tags {
        offsets.push(pos as u32);
        bodies.extend_from_slice(body);
        let padded = body.len().div_ceil(4) * 4;
        bodies.resize(bodies.len() + padded - body.len(), 0);
        pos += padded;
    }

    let total = table_end + bodies.len();
    let mut data = vec![0u8; table_end];
    data[0..4].copy_from_slice(&(total as u32).to_be_bytes());
    data[8..12].copy_from_slice(&VERSION_4_3.to_be_bytes());
    data[12..16].copy_from_slice(&class.signature().to_be_bytes());
    data[16..20].copy_from_slice(&color_space.signature().to_be_bytes());
    data[20..24].copy_from_slice(&ColorSpace::Xyz.signature().to_be_bytes());
    data[36..40].copy_from_slice(&PROFILE_MAGIC.to_be_bytes());
    data[64..68]
        .copy_from_slice(&RenderingIntent::RelativeColorimetric.to_u32().to_be_bytes());
    data[68..80].copy_from_slice(&XyzNumber::from_xyz(D50.xyz).to_bytes());

    data[128..132].copy_from_slice(&(tags.len() as u32).to_be_bytes());
    for (i, ((sig, body), offset)) in tags.iter().zip(&offsets).enumerate() {
        let base = 132 + i * 12;
        data[base..base + 4].copy_from_slice(&sig.0.to_be_bytes());
        data[base + 4..base + 8].copy_from_slice(&offset.to_be_bytes());
        data[base + 8..base + 12].copy_from_slice(&(body.len() as u32).to_be_bytes());
    }
    data.extend_from_slice(&bodies);
    data
}

/// XYZ of a primary with luminance left unnormalized (Y = 1 per unit)
fn chromaticity_to_xyz((x, y): Chromaticity) -> Option<[f64; 3]> {
    if y.abs() < 1e-10 {
        return None;
    }
    Some([x / y, 1.0, (1.0 - x - y) / y])
}

/// Colorant matrix for primaries and white, adapted to D50
///
/// Column scaling follows the usual derivation: solve for the channel
/// gains that make the three primaries sum to the white point, then
/// Bradford-adapt the result so the stored colorants are D50-relative.
fn colorants_for(
    primaries: [Chromaticity; 3],
    white: WhitePoint,
) -> Result<Matrix3x3, BuildError> {
    let mut p = [[0.0; 3]; 3];
    for (col, chroma) in primaries.iter().enumerate() {
        let xyz = chromaticity_to_xyz(*chroma).ok_or(BuildError::SingularMatrix {
            side: "primaries",
        })?;
        for row in 0..3 {
            p[row][col] = xyz[row];
        }
    }
    let p = Matrix3x3::new(p);

    let inv = p.inverse().ok_or(BuildError::SingularMatrix {
        side: "primaries",
    })?;
    let s = inv.multiply_vec(white.xyz.to_array());
    let native = p.multiply(&Matrix3x3::diagonal(s[0], s[1], s[2]));

    let adapt = adaptation_matrix(&white, &D50);
    Ok(adapt.multiply(&native))
}

/// Synthesize an RGB display profile from primaries, white and curve
pub fn rgb(
    description: &str,
    primaries: [Chromaticity; 3],
    white: WhitePoint,
    curve: TransferCurve,
) -> Result<Vec<u8>, BuildError> {
    let colorants = colorants_for(primaries, white)?;
    let trc = curve.encode();

    let column = |c: usize| {
        Xyz::new(
            colorants.m[0][c],
            colorants.m[1][c],
            colorants.m[2][c],
        )
    };

    let tags = vec![
        (TagSignature::DESC, encode_mluc(description)),
        (
            TagSignature::COPYRIGHT,
            encode_mluc("Public domain synthetic profile"),
        ),
        (TagSignature::MEDIA_WHITE, xyz_body(D50.xyz)),
        (
            TagSignature::CHAD,
            sf32_body(&adaptation_matrix(&white, &D50)),
        ),
        (TagSignature::RED_COLORANT, xyz_body(column(0))),
        (TagSignature::GREEN_COLORANT, xyz_body(column(1))),
        (TagSignature::BLUE_COLORANT, xyz_body(column(2))),
        (TagSignature::RED_TRC, trc.clone()),
        (TagSignature::GREEN_TRC, trc.clone()),
        (TagSignature::BLUE_TRC, trc),
    ];

    Ok(assemble(ProfileClass::Display, ColorSpace::Rgb, &tags))
}

/// The standard sRGB display profile
pub fn srgb() -> Vec<u8> {
    rgb("sRGB built-in", SRGB_PRIMARIES, D65, TransferCurve::Srgb)
        .expect("sRGB primaries are non-degenerate")
}

/// Display P3 gamut with a linear transfer curve
pub fn linear_display_p3() -> Vec<u8> {
    rgb(
        "Linear Display P3 built-in",
        DISPLAY_P3_PRIMARIES,
        D65,
        TransferCurve::Linear,
    )
    .expect("Display P3 primaries are non-degenerate")
}

/// Grayscale profile with a power-function tone curve
pub fn gray(gamma: f64) -> Vec<u8> {
    let tags = vec![
        (TagSignature::DESC, encode_mluc("Gray built-in")),
        (TagSignature::MEDIA_WHITE, xyz_body(D50.xyz)),
        (TagSignature::GRAY_TRC, TransferCurve::Gamma(gamma).encode()),
    ];
    assemble(ProfileClass::Display, ColorSpace::Gray, &tags)
}
