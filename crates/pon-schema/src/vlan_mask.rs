//! VLAN id bitmask codec
//!
//! The device stores VLAN id lists as a hex string of a 4096-bit mask: bit
//! `v` lives in byte `v / 8` under mask `0x80 >> (v % 8)`. An empty string is
//! the empty list, and shorter strings are zero-extended.

/// Number of bytes in a full mask
pub const MASK_BYTES: usize = 4096 / 8;

/// Error decoding a device bitmask
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum VlanMaskError {
    /// Not a hex string
    #[error("invalid VLAN bitmask: {0}")]
    InvalidHex(#[from] hex::FromHexError),

    /// More bytes than a 4096-bit mask
    #[error("VLAN bitmask too long: {len} bytes (max {MASK_BYTES})")]
    TooLong {
        /// Decoded length
        len: usize,
    },
}

/// Encode VLAN ids as a full-width hex mask. Ids above 4095 are ignored.
#[must_use]
pub fn encode(ids: &[u16]) -> String {
    let mut mask = vec![0u8; MASK_BYTES];
    for &id in ids {
        let idx = usize::from(id / 8);
        if let Some(byte) = mask.get_mut(idx) {
            *byte |= 0x80u8 >> (id % 8);
        }
    }
    hex::encode_upper(mask)
}

/// Decode a hex mask into ascending VLAN ids
///
/// # Errors
///
/// Returns [`VlanMaskError`] if the string is not hex or exceeds 4096 bits.
pub fn decode(mask: &str) -> Result<Vec<u16>, VlanMaskError> {
    let mask = mask.trim();
    if mask.is_empty() {
        return Ok(Vec::new());
    }
    let bytes = hex::decode(mask)?;
    if bytes.len() > MASK_BYTES {
        return Err(VlanMaskError::TooLong { len: bytes.len() });
    }

    let mut ids = Vec::new();
    for (idx, byte) in (0u16..).zip(bytes.iter()) {
        for bit in 0..8u16 {
            if byte & (0x80u8 >> bit) != 0 {
                ids.push(idx * 8 + bit);
            }
        }
    }
    Ok(ids)
}
