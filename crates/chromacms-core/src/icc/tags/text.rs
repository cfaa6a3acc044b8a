//! Text tags: 'text', 'desc' and 'mluc'
//!
//! All three decode to a plain String. For 'mluc' the first record is
//! taken; per-locale selection is not needed for profile descriptions.

use crate::error::DecodeError;

/// Decode a 'text' payload (7-bit ASCII, NUL terminated)
pub fn decode_text(data: &[u8]) -> Result<String, DecodeError> {
    if data.len() < 8 {
        return Err(DecodeError::Truncated {
            what: "text tag",
            expected: 8,
            actual: data.len(),
        });
    }
    let body = &data[8..];
    let end = body.iter().position(|&b| b == 0).unwrap_or(body.len());
    Ok(String::from_utf8_lossy(&body[..end]).into_owned())
}

/// Decode a v2 'desc' payload (ASCII section only)
pub fn decode_desc(data: &[u8]) -> Result<String, DecodeError> {
    if data.len() < 12 {
        return Err(DecodeError::Truncated {
            what: "desc tag",
            expected: 12,
            actual: data.len(),
        });
    }
    let ascii_len = u32::from_be_bytes([data[8], data[9], data[10], data[11]]) as usize;
    let needed = 12 + ascii_len;
    if data.len() < needed {
        return Err(DecodeError::Truncated {
            what: "desc ascii section",
            expected: needed,
            actual: data.len(),
        });
    }
    let body = &data[12..12 + ascii_len];
    let end = body.iter().position(|&b| b == 0).unwrap_or(body.len());
    Ok(String::from_utf8_lossy(&body[..end]).into_owned())
}

/// Decode a v4 'mluc' payload, taking the first record (UTF-16BE)
pub fn decode_mluc(data: &[u8]) -> Result<String, DecodeError> {
    if data.len() < 16 {
        return Err(DecodeError::Truncated {
            what: "mluc tag",
            expected: 16,
            actual: data.len(),
        });
    }
    let record_count = u32::from_be_bytes([data[8], data[9], data[10], data[11]]) as usize;
    if record_count == 0 {
        return Ok(String::new());
    }
    let record_size = u32::from_be_bytes([data[12], data[13], data[14], data[15]]) as usize;
    if record_size < 12 || data.len() < 16 + record_size {
        return Err(DecodeError::Corrupted {
            what: "mluc record",
            detail: format!("record size {}", record_size),
        });
    }

    // First record: 2-byte language, 2-byte country, length, offset
    let len = u32::from_be_bytes([data[20], data[21], data[22], data[23]]) as usize;
    let offset = u32::from_be_bytes([data[24], data[25], data[26], data[27]]) as usize;
    let needed = offset + len;
    if data.len() < needed {
        return Err(DecodeError::Truncated {
            what: "mluc string",
            expected: needed,
            actual: data.len(),
        });
    }

    let units: Vec<u16> = data[offset..offset + len]
        .chunks_exact(2)
        .map(|c| u16::from_be_bytes([c[0], c[1]]))
        .collect();
    Ok(String::from_utf16_lossy(&units))
}

/// Encode a minimal single-record 'mluc' payload ("enUS", UTF-16BE)
pub fn encode_mluc(text: &str) -> Vec<u8> {
    let units: Vec<u8> = text
        .encode_utf16()
        .flat_map(|u| u.to_be_bytes())
        .collect();

    let mut data = Vec::new();
    data.extend_from_slice(b"mluc");
    data.extend_from_slice(&[0; 4]);
    data.extend_from_slice(&1u32.to_be_bytes()); // record count
    data.extend_from_slice(&12u32.to_be_bytes()); // record size
    data.extend_from_slice(b"enUS");
    data.extend_from_slice(&(units.len() as u32).to_be_bytes());
    data.extend_from_slice(&28u32.to_be_bytes()); // string offset
    data.extend_from_slice(&units);
    data
}
