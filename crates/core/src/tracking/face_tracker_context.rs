use std::sync::Arc;

use crate::detection::domain::detected_face::DetectedFace;
use crate::detection::domain::face_detector::{DetectorVariant, FaceDetector};
use crate::detection::domain::result_buffer::ResultBuffer;
use crate::detection::domain::result_decoder::decode_output;
use crate::detection::domain::tracker_config::TrackerConfig;
use crate::shared::gray_frame::GrayFrame;
use crate::shared::tracker_error::TrackerError;

/// Per-session face tracker: one detector, one result buffer, one snapshot.
///
/// Each detect call validates the configuration, runs the detector into the
/// shared buffer and decodes it. A successful decode replaces the face
/// snapshot wholesale; any error leaves the previous snapshot in place.
/// Calls take `&mut self`, so a context only ever has one detection in
/// flight. Use [`SharedFaceTracker`](super::shared_face_tracker::SharedFaceTracker)
/// to share one across threads.
pub struct FaceTrackerContext {
    config: TrackerConfig,
    buffer: ResultBuffer,
    detector: Box<dyn FaceDetector>,
    faces: Arc<[DetectedFace]>,
    frames_processed: usize,
}

impl FaceTrackerContext {
    pub fn new(detector: Box<dyn FaceDetector>) -> Self {
        Self::with_config(detector, TrackerConfig::default())
    }

    pub fn with_config(detector: Box<dyn FaceDetector>, config: TrackerConfig) -> Self {
        Self {
            config,
            buffer: ResultBuffer::default(),
            detector,
            faces: Arc::from(Vec::new()),
            frames_processed: 0,
        }
    }

    pub fn config(&self) -> &TrackerConfig {
        &self.config
    }

    /// Fields can be changed freely; they are validated on the next detect.
    pub fn config_mut(&mut self) -> &mut TrackerConfig {
        &mut self.config
    }

    pub fn set_config(&mut self, config: TrackerConfig) {
        self.config = config;
    }

    /// Faces from the last successfully decoded frame.
    pub fn faces(&self) -> Arc<[DetectedFace]> {
        Arc::clone(&self.faces)
    }

    pub fn face_count(&self) -> usize {
        self.faces.len()
    }

    /// Frames whose result replaced the snapshot.
    pub fn frames_processed(&self) -> usize {
        self.frames_processed
    }

    pub fn detector_name(&self) -> &str {
        self.detector.name()
    }

    pub fn buffer_capacity(&self) -> usize {
        self.buffer.capacity()
    }

    pub fn detect_frontal(
        &mut self,
        frame: &GrayFrame,
    ) -> Result<Arc<[DetectedFace]>, TrackerError> {
        self.detect(DetectorVariant::Frontal, frame)
    }

    pub fn detect_frontal_surveillance(
        &mut self,
        frame: &GrayFrame,
    ) -> Result<Arc<[DetectedFace]>, TrackerError> {
        self.detect(DetectorVariant::FrontalSurveillance, frame)
    }

    pub fn detect_multi_view(
        &mut self,
        frame: &GrayFrame,
    ) -> Result<Arc<[DetectedFace]>, TrackerError> {
        self.detect(DetectorVariant::MultiView, frame)
    }

    pub fn detect_multi_view_reinforce(
        &mut self,
        frame: &GrayFrame,
    ) -> Result<Arc<[DetectedFace]>, TrackerError> {
        self.detect(DetectorVariant::MultiViewReinforce, frame)
    }

    /// Runs one frame through `variant` and returns the new snapshot.
    pub fn detect(
        &mut self,
        variant: DetectorVariant,
        frame: &GrayFrame,
    ) -> Result<Arc<[DetectedFace]>, TrackerError> {
        let params = self.config.validate()?;

        let output = self
            .detector
            .detect(variant, self.buffer.as_write_target(), frame, &params)
            .map_err(|e| {
                log::warn!("{variant} detection failed: {e}");
                e
            })?;

        let faces = decode_output(self.buffer.as_bytes(), output, params.landmarks)
            .map_err(|e| {
                log::warn!("Discarding {variant} result: {e}");
                e
            })?;

        log::debug!(
            "{variant}: {} faces ({}x{} frame)",
            faces.len(),
            frame.width(),
            frame.height()
        );
        self.faces = Arc::from(faces);
        self.frames_processed += 1;
        Ok(self.faces())
    }
}
