use crate::shared::tracker_error::TrackerError;

/// A single-channel 8-bit image plane in row-major order.
///
/// Rows are tightly packed, so the step handed to the detector equals
/// `width`. Grayscale conversion happens before this type is built.
#[derive(Clone, Debug)]
pub struct GrayFrame {
    data: Vec<u8>,
    width: u32,
    height: u32,
}

impl GrayFrame {
    pub fn new(data: Vec<u8>, width: u32, height: u32) -> Result<Self, TrackerError> {
        // A plane this large cannot exist on 32-bit targets.
        let expected = (width as usize)
            .checked_mul(height as usize)
            .unwrap_or(usize::MAX);
        if data.len() != expected {
            return Err(TrackerError::InvalidFrame {
                expected,
                actual: data.len(),
            });
        }
        Ok(Self {
            data,
            width,
            height,
        })
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Bytes between the starts of consecutive rows.
    pub fn step(&self) -> u32 {
        self.width
    }
}
