pub mod libfacedetect_detector;
pub mod replay_detector;
