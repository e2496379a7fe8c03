//! General stuff.

/// Brings [unlikely](core::intrinsics::unlikely) to stable rust.
#[inline(always)]
pub(crate) const fn unlikely(b: bool) -> bool {
    #[allow(clippy::needless_bool, clippy::bool_to_int_with_if)]
    if (1i32).checked_div(if b { 0 } else { 1 }).is_none() {
        true
    } else {
        false
    }
}

/// Reads n-byte big-endian integer as `u32`.
///
/// `data` must contain at least `size` bytes and `size` must be in range `1..=4`.
#[inline]
pub(crate) fn read_be_u32(data: &[u8], size: usize) -> u32 {
    debug_assert!((1..=4).contains(&size));
    let mut bytes = [0u8; 4];
    bytes[4 - size..].copy_from_slice(&data[..size]);
    u32::from_be_bytes(bytes)
}

/// Reads n-byte big-endian integer as `u64`.
///
/// `data` must contain at least `size` bytes and `size` must be in range `1..=8`.
#[inline]
pub(crate) fn read_be_u64(data: &[u8], size: usize) -> u64 {
    debug_assert!((1..=8).contains(&size));
    let mut bytes = [0u8; 8];
    bytes[8 - size..].copy_from_slice(&data[..size]);
    u64::from_be_bytes(bytes)
}

#[cfg(any(feature = "base64", test))]
#[inline]
pub(crate) fn encode_base64<T: AsRef<[u8]>>(data: T) -> String {
    use base64::Engine;
    fn encode_base64_impl(data: &[u8]) -> String {
        base64::engine::general_purpose::STANDARD.encode(data)
    }
    encode_base64_impl(data.as_ref())
}

#[cfg(any(feature = "base64", test))]
#[inline]
pub(crate) fn decode_base64<T: AsRef<[u8]>>(data: T) -> Result<Vec<u8>, base64::DecodeError> {
    use base64::Engine;
    fn decode_base64_impl(data: &[u8]) -> Result<Vec<u8>, base64::DecodeError> {
        base64::engine::general_purpose::STANDARD.decode(data)
    }
    decode_base64_impl(data.as_ref())
}

/// CRC16/XMODEM used by user-friendly addresses.
#[cfg(any(feature = "base64", test))]
pub(crate) fn crc_16(data: &[u8]) -> u16 {
    let mut crc: u16 = 0;
    for byte in data {
        crc ^= (*byte as u16) << 8;
        for _ in 0..8 {
            crc = if crc & 0x8000 != 0 {
                (crc << 1) ^ 0x1021
            } else {
                crc << 1
            };
        }
    }
    crc
}

/// Returns the current unix timestamp in seconds.
pub(crate) fn now_sec() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crc16_xmodem() {
        assert_eq!(crc_16(b"123456789"), 0x31c3);
        assert_eq!(crc_16(&[]), 0);
    }

    #[test]
    fn be_reads() {
        assert_eq!(read_be_u32(&[0x01, 0x02, 0x03], 3), 0x010203);
        assert_eq!(read_be_u64(&[0xff; 8], 8), u64::MAX);
        assert_eq!(read_be_u64(&[0x12, 0x34, 0x56, 0x78, 0x9a], 5), 0x123456789a);
    }
}
