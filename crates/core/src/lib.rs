//! Per-frame face tracking over an external detector.
//!
//! A [`FaceTrackerContext`](tracking::face_tracker_context::FaceTrackerContext)
//! owns a fixed-size result buffer, hands it to a
//! [`FaceDetector`](detection::domain::face_detector::FaceDetector) strategy
//! and decodes what was written into owned
//! [`DetectedFace`](detection::domain::detected_face::DetectedFace) records.

pub mod detection;
pub mod shared;
pub mod tracking;
