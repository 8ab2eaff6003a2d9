use crate::shared::constants::{RESULT_BUFFER_BYTES, SLOT_BYTES};

/// Fixed-capacity region the detector writes its findings into.
///
/// Allocated once per tracking context and reused for every frame. There is
/// no resize operation; the memory is released when the buffer is dropped.
/// The backing store is `i32` slots, so the byte views handed out are always
/// aligned for the native `int*` writes.
pub struct ResultBuffer {
    slots: Box<[i32]>,
    len: usize,
}

impl ResultBuffer {
    /// Allocates a zero-initialised region of exactly `capacity_bytes`.
    pub fn acquire(capacity_bytes: usize) -> Self {
        let slot_count = capacity_bytes.div_ceil(SLOT_BYTES);
        Self {
            slots: vec![0i32; slot_count].into_boxed_slice(),
            len: capacity_bytes,
        }
    }

    pub fn capacity(&self) -> usize {
        self.len
    }

    /// Mutable view handed to the detector. Ownership stays with the buffer.
    pub fn as_write_target(&mut self) -> &mut [u8] {
        &mut bytemuck::cast_slice_mut::<i32, u8>(&mut self.slots)[..self.len]
    }

    pub fn as_bytes(&self) -> &[u8] {
        &bytemuck::cast_slice::<i32, u8>(&self.slots)[..self.len]
    }
}

impl Default for ResultBuffer {
    fn default() -> Self {
        Self::acquire(RESULT_BUFFER_BYTES)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_default_capacity_matches_native_requirement() {
        let buffer = ResultBuffer::default();
        assert_eq!(buffer.capacity(), 0x20000);
    }

    #[test]
    fn test_acquire_is_zeroed() {
        let buffer = ResultBuffer::acquire(64);
        assert_eq!(buffer.capacity(), 64);
        assert!(buffer.as_bytes().iter().all(|&b| b == 0));
    }

    #[test]
    fn test_write_target_keeps_capacity_and_contents() {
        let mut buffer = ResultBuffer::acquire(16);
        let ptr = buffer.as_bytes().as_ptr();
        buffer.as_write_target()[3] = 9;
        assert_eq!(buffer.capacity(), 16);
        assert_eq!(buffer.as_bytes()[3], 9);
        // Same allocation across accesses.
        assert_eq!(buffer.as_bytes().as_ptr(), ptr);
    }

    #[rstest]
    #[case(RESULT_BUFFER_BYTES)]
    #[case(64)]
    #[case(7)]
    fn test_views_are_int_aligned(#[case] capacity: usize) {
        let mut buffer = ResultBuffer::acquire(capacity);
        let align = std::mem::align_of::<i32>();
        assert_eq!(buffer.as_bytes().as_ptr() as usize % align, 0);
        assert_eq!(buffer.as_write_target().as_ptr() as usize % align, 0);
        assert_eq!(buffer.as_write_target().len(), capacity);
    }
}
