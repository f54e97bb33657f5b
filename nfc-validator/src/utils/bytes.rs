// nfc-validator/src/utils/bytes.rs

/// Index of the last non-zero byte, `None` when the buffer is empty or all
/// zeros.
pub fn last_nonzero_index(buffer: &[u8]) -> Option<usize> {
    buffer.iter().rposition(|&b| b != 0)
}

/// Strip the zero padding a fixed-size receive buffer leaves after the real
/// response.
pub fn trim_trailing_zeros(buffer: &[u8]) -> &[u8] {
    match last_nonzero_index(buffer) {
        Some(idx) => &buffer[..=idx],
        None => &[],
    }
}

/// Clamp `value` into `min..=max`.
pub fn clamp<T: PartialOrd>(value: T, min: T, max: T) -> T {
    if value < min {
        min
    } else if value > max {
        max
    } else {
        value
    }
}
