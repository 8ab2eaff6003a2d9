pub mod constants;
pub mod gray_frame;
pub mod tracker_error;
