//! Daily selection hash.
//!
//! `h = h * 31 + unit` over the UTF-16 code units of the date string, with
//! 32-bit signed wrapping after every step. The index is `|h| mod n`, where
//! the absolute value is taken in 64 bits so `i32::MIN` maps to `2^31`.
//! Other implementations of the daily quote depend on this bit-for-bit.

/// 32-bit rolling hash of a date string.
pub fn date_hash(key: &str) -> i32 {
    key.encode_utf16()
        .fold(0i32, |h, unit| h.wrapping_mul(31).wrapping_add(i32::from(unit)))
}

/// Map a date string into `[0, n)`. Returns 0 when `n == 0`.
pub fn daily_index(key: &str, n: usize) -> usize {
    if n == 0 {
        return 0;
    }
    let magnitude = i64::from(date_hash(key)).unsigned_abs();
    (magnitude % n as u64) as usize
}
