//! Profile container: header plus decoded tag table

use std::collections::HashMap;
use std::fmt;

use sha2::{Digest, Sha256};

use crate::color::{WhitePoint, Xyz};
use crate::error::{DecodeError, ParseError};
use crate::icc::header::{ColorSpace, ProfileHeader, RenderingIntent, HEADER_SIZE};
use crate::icc::tags::{self, Curve, Lut, NamedColorList, TagData};
use crate::icc::types::{TagSignature, TypeSignature};
use crate::math::Matrix3x3;

/// Upper bound on tag directory entries; real profiles carry a few
/// dozen at most, so anything beyond this is a hostile or corrupt file
pub const MAX_TAG_COUNT: usize = 100;

/// Content hash identifying a profile byte-for-byte (SHA-256)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ProfileId(pub [u8; 32]);

impl ProfileId {
    /// Hash raw profile bytes
    pub fn of(data: &[u8]) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(data);
        Self(hasher.finalize().into())
    }
}

impl fmt::Display for ProfileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for b in &self.0[..8] {
            write!(f, "{:02x}", b)?;
        }
        Ok(())
    }
}

/// Non-fatal condition noticed while parsing
///
/// A profile that produces warnings still parses; affected tags
/// degrade to [`TagData::Opaque`] (or, for curve tags with an unknown
/// function family, an identity curve) so the rest stays usable.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum ParseWarning {
    #[error("duplicate tag '{tag}', keeping the later entry")]
    DuplicateTag { tag: TagSignature },

    #[error("tag '{tag}' failed to decode: {reason}")]
    TagDecodeFailed { tag: TagSignature, reason: String },
}

/// A parsed ICC profile
#[derive(Debug, Clone)]
pub struct Profile {
    pub header: ProfileHeader,
    tags: HashMap<TagSignature, TagData>,
    warnings: Vec<ParseWarning>,
    id: ProfileId,
    data: Vec<u8>,
}

impl Profile {
    /// Parse a profile from raw bytes
    ///
    /// Structural problems (bad header, out-of-bounds tags) fail hard;
    /// per-tag decode problems degrade that tag to opaque bytes and
    /// are reported through [`Profile::warnings`].
    pub fn parse(data: &[u8]) -> Result<Self, ParseError> {
        let header = ProfileHeader::parse(data)?;
        let profile_len = header.size as usize;

        if data.len() < HEADER_SIZE + 4 {
            return Err(ParseError::TruncatedHeader {
                expected: HEADER_SIZE + 4,
                actual: data.len(),
            });
        }
        let count =
            u32::from_be_bytes([data[128], data[129], data[130], data[131]]) as usize;
        if count > MAX_TAG_COUNT {
            return Err(ParseError::TooManyTags {
                count,
                limit: MAX_TAG_COUNT,
            });
        }

        let table_end = 132 + count * 12;
        if data.len() < table_end {
            return Err(ParseError::TruncatedHeader {
                expected: table_end,
                actual: data.len(),
            });
        }

        let mut tags = HashMap::with_capacity(count);
        let mut warnings = Vec::new();

        for i in 0..count {
            let base = 132 + i * 12;
            let read = |off: usize| {
                u32::from_be_bytes([data[off], data[off + 1], data[off + 2], data[off + 3]])
            };
            let tag = TagSignature(read(base));
            let offset = read(base + 4);
            let size = read(base + 8);

            let end = offset as usize + size as usize;
            if (offset as usize) < HEADER_SIZE || end > profile_len {
                return Err(ParseError::TagOutOfBounds {
                    tag,
                    offset,
                    size,
                    profile_size: profile_len,
                });
            }

            let body = &data[offset as usize..end];
            let decoded = match tags::decode(tag, body) {
                Ok(decoded) => decoded,
                Err(err) => {
                    warnings.push(ParseWarning::TagDecodeFailed {
                        tag,
                        reason: err.to_string(),
                    });
                    match err {
                        // A curve tag with an unrecognized function
                        // family stays usable as an identity curve
                        DecodeError::UnknownCurveType(_) => TagData::Curve(Curve::Identity),
                        _ => {
                            let type_sig =
                                tags::type_signature(body).unwrap_or(TypeSignature(0));
                            TagData::Opaque {
                                type_sig,
                                data: body.to_vec(),
                            }
                        }
                    }
                }
            };

            // Later directory entries win over earlier ones
            if tags.insert(tag, decoded).is_some() {
                warnings.push(ParseWarning::DuplicateTag { tag });
            }
        }

        Ok(Self {
            header,
            tags,
            warnings,
            id: ProfileId::of(data),
            data: data.to_vec(),
        })
    }

    /// Content hash of the raw bytes this profile was parsed from
    pub fn id(&self) -> ProfileId {
        self.id
    }

    /// The raw profile bytes
    pub fn to_bytes(&self) -> &[u8] {
        &self.data
    }

    /// Non-fatal conditions encountered during parsing
    pub fn warnings(&self) -> &[ParseWarning] {
        &self.warnings
    }

    pub fn tag(&self, sig: TagSignature) -> Option<&TagData> {
        self.tags.get(&sig)
    }

    pub fn has_tag(&self, sig: TagSignature) -> bool {
        self.tags.contains_key(&sig)
    }

    pub fn curve(&self, sig: TagSignature) -> Option<&Curve> {
        self.tag(sig).and_then(TagData::as_curve)
    }

    pub fn xyz_tag(&self, sig: TagSignature) -> Option<Xyz> {
        self.tag(sig).and_then(TagData::as_xyz)
    }

    /// Media white point: the 'wtpt' tag, falling back to the header
    /// illuminant when the tag is missing
    pub fn white_point(&self) -> WhitePoint {
        let xyz = self
            .xyz_tag(TagSignature::MEDIA_WHITE)
            .unwrap_or(self.header.illuminant);
        WhitePoint::from_xyz(xyz)
    }

    /// The 'chad' chromatic adaptation matrix, if present
    pub fn chromatic_adaptation(&self) -> Option<Matrix3x3> {
        match self.tag(TagSignature::CHAD)? {
            TagData::Matrix(m) => Some(*m),
            _ => None,
        }
    }

    /// Profile description from 'desc', whichever text form it uses
    pub fn description(&self) -> Option<&str> {
        match self.tag(TagSignature::DESC)? {
            TagData::Text(s) => Some(s.as_str()),
            _ => None,
        }
    }

    pub fn named_colors(&self) -> Option<&NamedColorList> {
        match self.tag(TagSignature::NAMED_COLOR2)? {
            TagData::NamedColors(list) => Some(list),
            _ => None,
        }
    }

    /// RGB colorant matrix (columns rXYZ, gXYZ, bXYZ), if all present
    pub fn colorant_matrix(&self) -> Option<Matrix3x3> {
        let r = self.xyz_tag(TagSignature::RED_COLORANT)?;
        let g = self.xyz_tag(TagSignature::GREEN_COLORANT)?;
        let b = self.xyz_tag(TagSignature::BLUE_COLORANT)?;
        Some(Matrix3x3::new([
            [r.x, g.x, b.x],
            [r.y, g.y, b.y],
            [r.z, g.z, b.z],
        ]))
    }

    /// Per-channel TRC curves for an RGB matrix-shaper profile
    pub fn rgb_trc(&self) -> Option<[&Curve; 3]> {
        Some([
            self.curve(TagSignature::RED_TRC)?,
            self.curve(TagSignature::GREEN_TRC)?,
            self.curve(TagSignature::BLUE_TRC)?,
        ])
    }

    /// True when the profile can run as a matrix-shaper (TRCs plus
    /// colorants, no LUT required)
    pub fn is_matrix_shaper(&self) -> bool {
        self.rgb_trc().is_some() && self.colorant_matrix().is_some()
    }

    /// Device → PCS LUT for an intent, with ICC fallback order
    ///
    /// Colorimetric intents prefer A2B1, saturation prefers A2B2, and
    /// both fall back to A2B0. Absolute colorimetric shares the
    /// relative tables; the white point adjustment happens later.
    pub fn a2b_for_intent(&self, intent: RenderingIntent) -> Option<&Lut> {
        let order: &[TagSignature] = match intent {
            RenderingIntent::Perceptual => &[TagSignature::A2B0],
            RenderingIntent::RelativeColorimetric | RenderingIntent::AbsoluteColorimetric => {
                &[TagSignature::A2B1, TagSignature::A2B0]
            }
            RenderingIntent::Saturation => &[TagSignature::A2B2, TagSignature::A2B0],
        };
        order
            .iter()
            .find_map(|sig| self.tag(*sig).and_then(TagData::as_lut))
    }

    /// PCS → device LUT for an intent, same fallback order as A2B
    pub fn b2a_for_intent(&self, intent: RenderingIntent) -> Option<&Lut> {
        let order: &[TagSignature] = match intent {
            RenderingIntent::Perceptual => &[TagSignature::B2A0],
            RenderingIntent::RelativeColorimetric | RenderingIntent::AbsoluteColorimetric => {
                &[TagSignature::B2A1, TagSignature::B2A0]
            }
            RenderingIntent::Saturation => &[TagSignature::B2A2, TagSignature::B2A0],
        };
        order
            .iter()
            .find_map(|sig| self.tag(*sig).and_then(TagData::as_lut))
    }

    pub fn color_space(&self) -> ColorSpace {
        self.header.color_space
    }

    pub fn pcs(&self) -> ColorSpace {
        self.header.pcs
    }
}
