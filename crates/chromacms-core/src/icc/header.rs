//! ICC profile header (the first 128 bytes)

use crate::color::Xyz;
use crate::error::ParseError;
use crate::icc::types::XyzNumber;

/// Header length in bytes
pub const HEADER_SIZE: usize = 128;

/// 'acsp' magic at offset 36
pub const PROFILE_MAGIC: u32 = 0x61637370;

/// Profile device class (header offset 12)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProfileClass {
    Input,
    Display,
    Output,
    DeviceLink,
    ColorSpace,
    Abstract,
    NamedColor,
}

impl ProfileClass {
    pub fn from_signature(sig: u32) -> Result<Self, ParseError> {
        match &sig.to_be_bytes() {
            b"scnr" => Ok(Self::Input),
            b"mntr" => Ok(Self::Display),
            b"prtr" => Ok(Self::Output),
            b"link" => Ok(Self::DeviceLink),
            b"spac" => Ok(Self::ColorSpace),
            b"abst" => Ok(Self::Abstract),
            b"nmcl" => Ok(Self::NamedColor),
            _ => Err(ParseError::UnknownProfileClass(sig)),
        }
    }

    pub fn signature(&self) -> u32 {
        let bytes: &[u8; 4] = match self {
            Self::Input => b"scnr",
            Self::Display => b"mntr",
            Self::Output => b"prtr",
            Self::DeviceLink => b"link",
            Self::ColorSpace => b"spac",
            Self::Abstract => b"abst",
            Self::NamedColor => b"nmcl",
        };
        u32::from_be_bytes(*bytes)
    }
}

/// Color space signature (header offsets 16 and 20)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColorSpace {
    Xyz,
    Lab,
    Rgb,
    Gray,
    Cmyk,
    Cmy,
}

impl ColorSpace {
    pub fn from_signature(sig: u32) -> Result<Self, ParseError> {
        match &sig.to_be_bytes() {
            b"XYZ " => Ok(Self::Xyz),
            b"Lab " => Ok(Self::Lab),
            b"RGB " => Ok(Self::Rgb),
            b"GRAY" => Ok(Self::Gray),
            b"CMYK" => Ok(Self::Cmyk),
            b"CMY " => Ok(Self::Cmy),
            _ => Err(ParseError::UnknownColorSpace(sig)),
        }
    }

    pub fn signature(&self) -> u32 {
        let bytes: &[u8; 4] = match self {
            Self::Xyz => b"XYZ ",
            Self::Lab => b"Lab ",
            Self::Rgb => b"RGB ",
            Self::Gray => b"GRAY",
            Self::Cmyk => b"CMYK",
            Self::Cmy => b"CMY ",
        };
        u32::from_be_bytes(*bytes)
    }

    /// Number of color components (alpha excluded)
    pub fn channels(&self) -> usize {
        match self {
            Self::Gray => 1,
            Self::Xyz | Self::Lab | Self::Rgb | Self::Cmy => 3,
            Self::Cmyk => 4,
        }
    }
}

/// ICC rendering intent (header offset 64)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum RenderingIntent {
    Perceptual,
    #[default]
    RelativeColorimetric,
    Saturation,
    AbsoluteColorimetric,
}

impl RenderingIntent {
    pub fn from_u32(value: u32) -> Result<Self, ParseError> {
        match value {
            0 => Ok(Self::Perceptual),
            1 => Ok(Self::RelativeColorimetric),
            2 => Ok(Self::Saturation),
            3 => Ok(Self::AbsoluteColorimetric),
            _ => Err(ParseError::UnknownRenderingIntent(value)),
        }
    }

    pub fn to_u32(self) -> u32 {
        match self {
            Self::Perceptual => 0,
            Self::RelativeColorimetric => 1,
            Self::Saturation => 2,
            Self::AbsoluteColorimetric => 3,
        }
    }
}

/// Decoded profile header
#[derive(Debug, Clone)]
pub struct ProfileHeader {
    /// Declared profile size in bytes (header offset 0)
    pub size: u32,
    /// Version as raw BCD, e.g. 0x04300000 for v4.3
    pub version: u32,
    pub class: ProfileClass,
    /// Device color space (the A side)
    pub color_space: ColorSpace,
    /// Profile connection space, XYZ or Lab (the B side)
    pub pcs: ColorSpace,
    pub rendering_intent: RenderingIntent,
    /// PCS illuminant, nominally D50
    pub illuminant: Xyz,
    /// MD5 fingerprint field (offset 84), all zero if unset
    pub profile_id: [u8; 16],
}

impl ProfileHeader {
    /// Major version digit (2 or 4 in practice)
    pub fn version_major(&self) -> u8 {
        (self.version >> 24) as u8
    }

    /// Parse and validate the 128-byte header
    ///
    /// `data` is the whole profile; the declared size must not exceed
    /// the bytes actually present.
    pub fn parse(data: &[u8]) -> Result<Self, ParseError> {
        if data.len() < HEADER_SIZE {
            return Err(ParseError::TruncatedHeader {
                expected: HEADER_SIZE,
                actual: data.len(),
            });
        }

        let read_u32 =
            |off: usize| u32::from_be_bytes([data[off], data[off + 1], data[off + 2], data[off + 3]]);

        let magic = read_u32(36);
        if magic != PROFILE_MAGIC {
            return Err(ParseError::BadMagic(magic));
        }

        let size = read_u32(0);
        if size as usize > data.len() {
            return Err(ParseError::SizeMismatch {
                header_size: size,
                actual_size: data.len(),
            });
        }

        let version = read_u32(8);
        let class = ProfileClass::from_signature(read_u32(12))?;
        let color_space = ColorSpace::from_signature(read_u32(16))?;
        let pcs = ColorSpace::from_signature(read_u32(20))?;
        let rendering_intent = RenderingIntent::from_u32(read_u32(64))?;

        let illuminant = match XyzNumber::from_bytes(&data[68..80]) {
            Some(n) => n.to_xyz(),
            None => Xyz::new(0.9642, 1.0, 0.8249),
        };

        let mut profile_id = [0u8; 16];
        profile_id.copy_from_slice(&data[84..100]);

        Ok(Self {
            size,
            version,
            class,
            color_space,
            pcs,
            rendering_intent,
            illuminant,
            profile_id,
        })
    }
}
