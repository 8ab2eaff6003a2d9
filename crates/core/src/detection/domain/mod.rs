pub mod detected_face;
pub mod face_detector;
pub mod result_buffer;
pub mod result_decoder;
pub mod tracker_config;
