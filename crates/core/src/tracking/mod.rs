pub mod face_tracker_context;
pub mod shared_face_tracker;
