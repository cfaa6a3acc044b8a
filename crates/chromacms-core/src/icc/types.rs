//! ICC basic numeric and signature types
//!
//! These match the ICC.1:2022 wire encodings exactly.

use std::fmt;

use crate::color::Xyz;

/// ICC tag signature (4-byte ASCII code)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TagSignature(pub u32);

impl TagSignature {
    /// Create from 4 ASCII characters
    pub const fn from_bytes(b: [u8; 4]) -> Self {
        Self(u32::from_be_bytes(b))
    }

    // Device → PCS LUTs, one per rendering intent
    pub const A2B0: Self = Self::from_bytes(*b"A2B0");
    pub const A2B1: Self = Self::from_bytes(*b"A2B1");
    pub const A2B2: Self = Self::from_bytes(*b"A2B2");
    // PCS → device LUTs
    pub const B2A0: Self = Self::from_bytes(*b"B2A0");
    pub const B2A1: Self = Self::from_bytes(*b"B2A1");
    pub const B2A2: Self = Self::from_bytes(*b"B2A2");

    pub const RED_COLORANT: Self = Self::from_bytes(*b"rXYZ");
    pub const GREEN_COLORANT: Self = Self::from_bytes(*b"gXYZ");
    pub const BLUE_COLORANT: Self = Self::from_bytes(*b"bXYZ");
    pub const RED_TRC: Self = Self::from_bytes(*b"rTRC");
    pub const GREEN_TRC: Self = Self::from_bytes(*b"gTRC");
    pub const BLUE_TRC: Self = Self::from_bytes(*b"bTRC");
    pub const GRAY_TRC: Self = Self::from_bytes(*b"kTRC");

    pub const MEDIA_WHITE: Self = Self::from_bytes(*b"wtpt");
    pub const MEDIA_BLACK: Self = Self::from_bytes(*b"bkpt");
    pub const CHAD: Self = Self::from_bytes(*b"chad");
    pub const DESC: Self = Self::from_bytes(*b"desc");
    pub const COPYRIGHT: Self = Self::from_bytes(*b"cprt");
    pub const NAMED_COLOR2: Self = Self::from_bytes(*b"ncl2");
}

impl fmt::Display for TagSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let bytes = self.0.to_be_bytes();
        if bytes.iter().all(|b| b.is_ascii_graphic() || *b == b' ') {
            write!(f, "{}", String::from_utf8_lossy(&bytes))
        } else {
            write!(f, "0x{:08X}", self.0)
        }
    }
}

/// Type signature identifying a tag payload's data format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TypeSignature(pub u32);

impl TypeSignature {
    pub const fn from_bytes(b: [u8; 4]) -> Self {
        Self(u32::from_be_bytes(b))
    }

    pub const XYZ: Self = Self::from_bytes(*b"XYZ ");
    pub const CURVE: Self = Self::from_bytes(*b"curv");
    pub const PARA: Self = Self::from_bytes(*b"para");
    pub const TEXT: Self = Self::from_bytes(*b"text");
    pub const DESC: Self = Self::from_bytes(*b"desc");
    pub const MLUC: Self = Self::from_bytes(*b"mluc");
    pub const LUT8: Self = Self::from_bytes(*b"mft1");
    pub const LUT16: Self = Self::from_bytes(*b"mft2");
    pub const LUT_A2B: Self = Self::from_bytes(*b"mAB ");
    pub const LUT_B2A: Self = Self::from_bytes(*b"mBA ");
    pub const SF32: Self = Self::from_bytes(*b"sf32");
    pub const NAMED_COLOR2: Self = Self::from_bytes(*b"ncl2");
}

impl fmt::Display for TypeSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        TagSignature(self.0).fmt(f)
    }
}

/// s15Fixed16Number: signed 16.16 fixed point, scale 1/65536
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct S15Fixed16(pub i32);

impl S15Fixed16 {
    pub fn from_f64(val: f64) -> Self {
        Self((val * 65536.0).round() as i32)
    }

    pub fn to_f64(self) -> f64 {
        self.0 as f64 / 65536.0
    }

    pub fn from_be_bytes(bytes: [u8; 4]) -> Self {
        Self(i32::from_be_bytes(bytes))
    }

    pub fn to_be_bytes(self) -> [u8; 4] {
        self.0.to_be_bytes()
    }
}

/// u8Fixed8Number: unsigned 8.8 fixed point, scale 1/256
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct U8Fixed8(pub u16);

impl U8Fixed8 {
    pub fn from_f64(val: f64) -> Self {
        Self((val * 256.0).round() as u16)
    }

    pub fn to_f64(self) -> f64 {
        self.0 as f64 / 256.0
    }

    pub fn from_be_bytes(bytes: [u8; 2]) -> Self {
        Self(u16::from_be_bytes(bytes))
    }
}

/// XYZNumber: three s15Fixed16 values
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct XyzNumber {
    pub x: S15Fixed16,
    pub y: S15Fixed16,
    pub z: S15Fixed16,
}

impl XyzNumber {
    /// Parse from 12 big-endian bytes
    pub fn from_bytes(bytes: &[u8]) -> Option<Self> {
        if bytes.len() < 12 {
            return None;
        }
        Some(Self {
            x: S15Fixed16::from_be_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]),
            y: S15Fixed16::from_be_bytes([bytes[4], bytes[5], bytes[6], bytes[7]]),
            z: S15Fixed16::from_be_bytes([bytes[8], bytes[9], bytes[10], bytes[11]]),
        })
    }

    /// Encode to 12 big-endian bytes
    pub fn to_bytes(&self) -> [u8; 12] {
        let mut out = [0u8; 12];
        out[0..4].copy_from_slice(&self.x.to_be_bytes());
        out[4..8].copy_from_slice(&self.y.to_be_bytes());
        out[8..12].copy_from_slice(&self.z.to_be_bytes());
        out
    }

    pub fn from_xyz(xyz: Xyz) -> Self {
        Self {
            x: S15Fixed16::from_f64(xyz.x),
            y: S15Fixed16::from_f64(xyz.y),
            z: S15Fixed16::from_f64(xyz.z),
        }
    }

    pub fn to_xyz(&self) -> Xyz {
        Xyz::new(self.x.to_f64(), self.y.to_f64(), self.z.to_f64())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_s15fixed16() {
        let one = S15Fixed16::from_f64(1.0);
        assert_eq!(one.0, 0x0001_0000);
        assert!((one.to_f64() - 1.0).abs() < 1e-6);

        let neg = S15Fixed16::from_f64(-1.5);
        assert!((neg.to_f64() + 1.5).abs() < 1e-6);
    }

    #[test]
    fn test_xyz_number_d50() {
        let bytes: [u8; 12] = [
            0x00, 0x00, 0xF6, 0xD6, // X = 0.9642
            0x00, 0x01, 0x00, 0x00, // Y = 1.0
            0x00, 0x00, 0xD3, 0x2D, // Z = 0.8249
        ];
        let xyz = XyzNumber::from_bytes(&bytes).unwrap().to_xyz();
        assert!((xyz.x - 0.9642).abs() < 0.001);
        assert!((xyz.y - 1.0).abs() < 0.001);
        assert!((xyz.z - 0.8249).abs() < 0.001);
    }

    #[test]
    fn test_xyz_number_roundtrip() {
        let xyz = Xyz::new(0.4361, 0.2225, 0.0139);
        let encoded = XyzNumber::from_xyz(xyz);
        let decoded = XyzNumber::from_bytes(&encoded.to_bytes()).unwrap();
        assert_eq!(encoded, decoded);
    }

    #[test]
    fn test_signature_display() {
        assert_eq!(TagSignature::DESC.to_string(), "desc");
        assert_eq!(TagSignature::RED_COLORANT.to_string(), "rXYZ");
        assert_eq!(TagSignature(0x0000_0001).to_string(), "0x00000001");
    }
}
