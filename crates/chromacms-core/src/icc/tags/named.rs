//! Named color tag: 'ncl2'

use crate::error::DecodeError;

/// One entry of a named color list
#[derive(Debug, Clone, PartialEq)]
pub struct NamedColor {
    pub name: String,
    /// PCS coordinates, 16-bit encoded and normalized to [0, 1]
    pub pcs: [f64; 3],
    /// Device coordinates, normalized to [0, 1]
    pub device: Vec<f64>,
}

/// A decoded 'ncl2' tag
#[derive(Debug, Clone, PartialEq, Default)]
pub struct NamedColorList {
    pub prefix: String,
    pub suffix: String,
    pub colors: Vec<NamedColor>,
}

impl NamedColorList {
    /// Look up an entry by its root name
    pub fn find(&self, name: &str) -> Option<&NamedColor> {
        self.colors.iter().find(|c| c.name == name)
    }
}

fn read_fixed_string(bytes: &[u8]) -> String {
    let end = bytes.iter().position(|&b| b == 0).unwrap_or(bytes.len());
    String::from_utf8_lossy(&bytes[..end]).into_owned()
}

/// Decode an 'ncl2' payload
pub fn decode_ncl2(data: &[u8]) -> Result<NamedColorList, DecodeError> {
    const HEADER: usize = 84;
    if data.len() < HEADER {
        return Err(DecodeError::Truncated {
            what: "ncl2 header",
            expected: HEADER,
            actual: data.len(),
        });
    }

    let count = u32::from_be_bytes([data[12], data[13], data[14], data[15]]) as usize;
    let device_coords = u32::from_be_bytes([data[16], data[17], data[18], data[19]]) as usize;
    if device_coords > 8 {
        return Err(DecodeError::Corrupted {
            what: "ncl2 device coords",
            detail: format!("{} coordinates", device_coords),
        });
    }

    let prefix = read_fixed_string(&data[20..52]);
    let suffix = read_fixed_string(&data[52..84]);

    let entry_size = 32 + 6 + device_coords * 2;
    let needed = HEADER + count * entry_size;
    if data.len() < needed {
        return Err(DecodeError::Truncated {
            what: "ncl2 entries",
            expected: needed,
            actual: data.len(),
        });
    }

    let mut colors = Vec::with_capacity(count);
    for i in 0..count {
        let base = HEADER + i * entry_size;
        let name = read_fixed_string(&data[base..base + 32]);

        let mut pcs = [0.0; 3];
        for (c, p) in pcs.iter_mut().enumerate() {
            let off = base + 32 + c * 2;
            *p = u16::from_be_bytes([data[off], data[off + 1]]) as f64 / 65535.0;
        }

        let device = (0..device_coords)
            .map(|c| {
                let off = base + 38 + c * 2;
                u16::from_be_bytes([data[off], data[off + 1]]) as f64 / 65535.0
            })
            .collect();

        colors.push(NamedColor { name, pcs, device });
    }

    Ok(NamedColorList {
        prefix,
        suffix,
        colors,
    })
}
