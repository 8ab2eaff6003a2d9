use std::fs;
use std::path::Path;

use crate::detection::domain::face_detector::{DetectorOutput, DetectorVariant, FaceDetector};
use crate::detection::domain::tracker_config::DetectParams;
use crate::shared::gray_frame::GrayFrame;
use crate::shared::tracker_error::TrackerError;

/// Replays a captured result-buffer dump instead of running detection.
///
/// Every call copies the dump into the write target and reports it as
/// written at offset 0, regardless of variant or image. An empty dump
/// reports that no detection was performed.
pub struct ReplayDetector {
    dump: Vec<u8>,
    call_count: usize,
}

impl ReplayDetector {
    pub fn new(dump: Vec<u8>) -> Self {
        Self {
            dump,
            call_count: 0,
        }
    }

    pub fn from_file(path: &Path) -> Result<Self, TrackerError> {
        let dump = fs::read(path).map_err(|e| {
            TrackerError::DetectorUnavailable(format!(
                "cannot read result dump {}: {e}",
                path.display()
            ))
        })?;
        Ok(Self::new(dump))
    }

    pub fn call_count(&self) -> usize {
        self.call_count
    }
}

impl FaceDetector for ReplayDetector {
    fn name(&self) -> &str {
        "replay"
    }

    fn detect(
        &mut self,
        _variant: DetectorVariant,
        buffer: &mut [u8],
        _frame: &GrayFrame,
        _params: &DetectParams,
    ) -> Result<DetectorOutput, TrackerError> {
        self.call_count += 1;
        if self.dump.is_empty() {
            return Ok(DetectorOutput::NoResult);
        }
        if self.dump.len() > buffer.len() {
            log::warn!(
                "Result dump is {} bytes, truncating to buffer capacity {}",
                self.dump.len(),
                buffer.len()
            );
        }
        let n = self.dump.len().min(buffer.len());
        buffer[..n].copy_from_slice(&self.dump[..n]);
        Ok(DetectorOutput::Written { offset: 0 })
    }
}
