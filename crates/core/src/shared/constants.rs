/// Result buffer size required by the native detector (0x20000 bytes).
pub const RESULT_BUFFER_BYTES: usize = 0x20000;

/// Width of one result slot: a native-endian `i32`.
pub const SLOT_BYTES: usize = std::mem::size_of::<i32>();

pub const RESULT_BUFFER_SLOTS: usize = RESULT_BUFFER_BYTES / SLOT_BYTES;

/// Slots per face record: x, y, width, height, neighbors, angle.
pub const RECORD_SLOTS: usize = 6;

/// Landmark points per face in the result protocol's landmark block.
///
/// The protocol packs every value as an `i32` slot with all landmark blocks
/// after the fixed records. A native build must emit that layout to be decoded.
pub const LANDMARK_COUNT: usize = 68;

/// Slots per face in the landmark block: one (x, y) pair per point.
pub const LANDMARK_SLOTS: usize = LANDMARK_COUNT * 2;

pub const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "bmp", "tiff", "tif", "webp"];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_buffer_holds_32768_slots() {
        assert_eq!(RESULT_BUFFER_SLOTS, 32768);
        assert_eq!(RESULT_BUFFER_BYTES, 131072);
    }

    #[test]
    fn test_landmark_slots_are_pairs() {
        assert_eq!(LANDMARK_SLOTS, 2 * LANDMARK_COUNT);
    }
}
