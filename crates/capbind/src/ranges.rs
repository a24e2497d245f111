//! Representable ranges of the supported integer widths.

/// Inclusive bounds of a signed integer of `width` bits.
pub fn signed_bounds(width: u32) -> Option<(i128, i128)> {
    match width {
        8 => Some((i8::MIN.into(), i8::MAX.into())),
        16 => Some((i16::MIN.into(), i16::MAX.into())),
        32 => Some((i32::MIN.into(), i32::MAX.into())),
        64 => Some((i64::MIN.into(), i64::MAX.into())),
        _ => None,
    }
}

/// Largest value of an unsigned integer of `width` bits.
pub fn unsigned_max(width: u32) -> Option<u128> {
    match width {
        8 => Some(u8::MAX.into()),
        16 => Some(u16::MAX.into()),
        32 => Some(u32::MAX.into()),
        64 => Some(u64::MAX.into()),
        _ => None,
    }
}
