//! Tag payload decoding
//!
//! Each tag body starts with a 4-byte type signature and 4 reserved
//! bytes; the dispatcher below maps the signature to the right decoder.
//! Unrecognized types are kept as raw bytes so a profile with vendor
//! tags still parses.

pub mod curves;
pub mod lut;
pub mod named;
pub mod text;
pub mod xyz;

pub use curves::Curve;
pub use lut::{Clut, Lut, LutElement};
pub use named::{NamedColor, NamedColorList};

use crate::color::Xyz;
use crate::error::DecodeError;
use crate::icc::types::{TagSignature, TypeSignature};
use crate::math::Matrix3x3;

/// A decoded tag payload
#[derive(Debug, Clone, PartialEq)]
pub enum TagData {
    Curve(Curve),
    Lut(Lut),
    Xyz(Xyz),
    /// 'sf32' 3x3 matrix (the 'chad' tag)
    Matrix(Matrix3x3),
    Text(String),
    NamedColors(NamedColorList),
    /// Unrecognized type, raw bytes preserved
    Opaque {
        type_sig: TypeSignature,
        data: Vec<u8>,
    },
}

impl TagData {
    pub fn as_curve(&self) -> Option<&Curve> {
        match self {
            Self::Curve(c) => Some(c),
            _ => None,
        }
    }

    pub fn as_lut(&self) -> Option<&Lut> {
        match self {
            Self::Lut(l) => Some(l),
            _ => None,
        }
    }

    pub fn as_xyz(&self) -> Option<Xyz> {
        match self {
            Self::Xyz(v) => Some(*v),
            _ => None,
        }
    }
}

/// Read a tag body's type signature
pub fn type_signature(data: &[u8]) -> Result<TypeSignature, DecodeError> {
    if data.len() < 8 {
        return Err(DecodeError::Truncated {
            what: "tag type header",
            expected: 8,
            actual: data.len(),
        });
    }
    Ok(TypeSignature(u32::from_be_bytes([
        data[0], data[1], data[2], data[3],
    ])))
}

/// Payload types a known tag signature is allowed to carry
///
/// Returns None for signatures this crate has no expectations about
/// (vendor tags decode by payload type alone).
fn permitted_types(tag: TagSignature) -> Option<(&'static [TypeSignature], &'static str)> {
    match tag {
        TagSignature::RED_TRC
        | TagSignature::GREEN_TRC
        | TagSignature::BLUE_TRC
        | TagSignature::GRAY_TRC => {
            Some((&[TypeSignature::CURVE, TypeSignature::PARA], "a curve ('curv' or 'para')"))
        }
        TagSignature::RED_COLORANT
        | TagSignature::GREEN_COLORANT
        | TagSignature::BLUE_COLORANT
        | TagSignature::MEDIA_WHITE
        | TagSignature::MEDIA_BLACK => Some((&[TypeSignature::XYZ], "'XYZ '")),
        TagSignature::CHAD => Some((&[TypeSignature::SF32], "'sf32'")),
        TagSignature::A2B0 | TagSignature::A2B1 | TagSignature::A2B2 => Some((
            &[TypeSignature::LUT8, TypeSignature::LUT16, TypeSignature::LUT_A2B],
            "a LUT ('mft1', 'mft2' or 'mAB ')",
        )),
        TagSignature::B2A0 | TagSignature::B2A1 | TagSignature::B2A2 => Some((
            &[TypeSignature::LUT8, TypeSignature::LUT16, TypeSignature::LUT_B2A],
            "a LUT ('mft1', 'mft2' or 'mBA ')",
        )),
        TagSignature::DESC | TagSignature::COPYRIGHT => Some((
            &[TypeSignature::TEXT, TypeSignature::DESC, TypeSignature::MLUC],
            "text ('text', 'desc' or 'mluc')",
        )),
        TagSignature::NAMED_COLOR2 => Some((&[TypeSignature::NAMED_COLOR2], "'ncl2'")),
        _ => None,
    }
}

/// Decode a tag body, checking the payload type against the tag
///
/// A known tag signature carrying a payload type it never uses (say a
/// TRC tag holding 'XYZ ' data) is rejected so the caller can degrade
/// it instead of silently misfiling the value.
pub fn decode(tag: TagSignature, data: &[u8]) -> Result<TagData, DecodeError> {
    let sig = type_signature(data)?;
    if let Some((allowed, expected)) = permitted_types(tag) {
        if !allowed.contains(&sig) {
            return Err(DecodeError::TypeMismatch {
                tag,
                type_sig: sig,
                expected,
            });
        }
    }
    match sig {
        TypeSignature::CURVE => Ok(TagData::Curve(curves::decode_curv(data)?)),
        TypeSignature::PARA => Ok(TagData::Curve(curves::decode_para(data)?)),
        TypeSignature::LUT8 => Ok(TagData::Lut(lut::decode_mft(data, false)?)),
        TypeSignature::LUT16 => Ok(TagData::Lut(lut::decode_mft(data, true)?)),
        TypeSignature::LUT_A2B => Ok(TagData::Lut(lut::decode_mab(data, false)?)),
        TypeSignature::LUT_B2A => Ok(TagData::Lut(lut::decode_mab(data, true)?)),
        TypeSignature::XYZ => Ok(TagData::Xyz(xyz::decode_xyz(data)?)),
        TypeSignature::SF32 => Ok(TagData::Matrix(xyz::decode_sf32_matrix(data)?)),
        TypeSignature::TEXT => Ok(TagData::Text(text::decode_text(data)?)),
        TypeSignature::DESC => Ok(TagData::Text(text::decode_desc(data)?)),
        TypeSignature::MLUC => Ok(TagData::Text(text::decode_mluc(data)?)),
        TypeSignature::NAMED_COLOR2 => Ok(TagData::NamedColors(named::decode_ncl2(data)?)),
        _ => Ok(TagData::Opaque {
            type_sig: sig,
            data: data.to_vec(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_type_is_opaque() {
        let mut data = Vec::new();
        data.extend_from_slice(b"vend");
        data.extend_from_slice(&[0; 4]);
        data.extend_from_slice(&[1, 2, 3]);
        let tag = TagSignature::from_bytes(*b"vndr");
        match decode(tag, &data).unwrap() {
            TagData::Opaque { type_sig, data } => {
                assert_eq!(type_sig, TypeSignature::from_bytes(*b"vend"));
                assert_eq!(data.len(), 11);
            }
            other => panic!("expected opaque, got {:?}", other),
        }
    }

    #[test]
    fn test_short_body() {
        assert!(matches!(
            decode(TagSignature::DESC, &[0u8; 4]),
            Err(DecodeError::Truncated { .. })
        ));
    }

    #[test]
    fn test_trc_with_xyz_payload_is_mismatch() {
        let mut data = Vec::new();
        data.extend_from_slice(b"XYZ ");
        data.extend_from_slice(&[0; 4]);
        data.extend_from_slice(&[0; 12]);
        let err = decode(TagSignature::RED_TRC, &data).unwrap_err();
        assert!(matches!(
            err,
            DecodeError::TypeMismatch {
                tag: TagSignature::RED_TRC,
                type_sig: TypeSignature::XYZ,
                ..
            }
        ));
    }

    #[test]
    fn test_a2b_rejects_mba_payload() {
        let mut data = Vec::new();
        data.extend_from_slice(b"mBA ");
        data.extend_from_slice(&[0; 4]);
        data.extend_from_slice(&[0; 24]);
        assert!(matches!(
            decode(TagSignature::A2B0, &data),
            Err(DecodeError::TypeMismatch { .. })
        ));
    }
}
