//! Native detector backed by the prebuilt libfacedetect binaries.
//!
//! One binary exists per host architecture. The FFI binding is only compiled
//! with the `libfacedetect` feature; without it, construction reports the
//! detector as unavailable so callers can fall back to another strategy.

use crate::detection::domain::face_detector::{DetectorOutput, DetectorVariant, FaceDetector};
use crate::detection::domain::tracker_config::DetectParams;
use crate::shared::constants::RESULT_BUFFER_BYTES;
use crate::shared::gray_frame::GrayFrame;
use crate::shared::tracker_error::TrackerError;

/// Host architecture, as far as native detector selection is concerned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    X64,
    X86,
    Unsupported,
}

impl Platform {
    pub fn host() -> Self {
        if cfg!(target_arch = "x86_64") {
            Platform::X64
        } else if cfg!(target_arch = "x86") {
            Platform::X86
        } else {
            Platform::Unsupported
        }
    }

    pub fn library_name(&self) -> Option<&'static str> {
        match self {
            Platform::X64 => Some("libfacedetect-x64"),
            Platform::X86 => Some("libfacedetect-x86"),
            Platform::Unsupported => None,
        }
    }
}

pub struct LibFaceDetectDetector {
    library: &'static str,
}

impl LibFaceDetectDetector {
    /// Selects the native binary for the architecture this crate was built for.
    pub fn for_host() -> Result<Self, TrackerError> {
        Self::for_platform(Platform::host())
    }

    pub fn for_platform(platform: Platform) -> Result<Self, TrackerError> {
        let library = platform.library_name().ok_or_else(|| {
            TrackerError::DetectorUnavailable(format!(
                "no prebuilt libfacedetect for {}",
                std::env::consts::ARCH
            ))
        })?;
        if platform != Platform::host() {
            return Err(TrackerError::DetectorUnavailable(format!(
                "{library} does not match host architecture {}",
                std::env::consts::ARCH
            )));
        }
        if !cfg!(feature = "libfacedetect") {
            return Err(TrackerError::DetectorUnavailable(format!(
                "{library} is not linked; build with the `libfacedetect` feature"
            )));
        }
        log::info!("Selected native detector {library}");
        Ok(Self { library })
    }
}

impl FaceDetector for LibFaceDetectDetector {
    fn name(&self) -> &str {
        self.library
    }

    fn detect(
        &mut self,
        variant: DetectorVariant,
        buffer: &mut [u8],
        frame: &GrayFrame,
        params: &DetectParams,
    ) -> Result<DetectorOutput, TrackerError> {
        if buffer.len() < RESULT_BUFFER_BYTES {
            return Err(TrackerError::BufferOverrun {
                face_count: 0,
                required_bytes: RESULT_BUFFER_BYTES,
                capacity_bytes: buffer.len(),
            });
        }
        if frame.width() == 0 || frame.height() == 0 {
            return Ok(DetectorOutput::NoResult);
        }
        invoke(variant, buffer, frame, params)
    }
}

#[cfg(feature = "libfacedetect")]
fn invoke(
    variant: DetectorVariant,
    buffer: &mut [u8],
    frame: &GrayFrame,
    params: &DetectParams,
) -> Result<DetectorOutput, TrackerError> {
    let width = dimension("width", frame.width())?;
    let height = dimension("height", frame.height())?;
    let step = dimension("step", frame.step())?;
    let entry = ffi::entry_point(variant);

    // The detector only reads the image plane; the C signature is non-const.
    let result = unsafe {
        entry(
            buffer.as_mut_ptr(),
            frame.data().as_ptr() as *mut u8,
            width,
            height,
            step,
            params.scale,
            params.min_neighbors,
            params.min_object_width,
            params.max_object_width,
            params.landmark_flag(),
        )
    };
    output_from_pointer(buffer, result as *const u8)
}

#[cfg(not(feature = "libfacedetect"))]
fn invoke(
    _variant: DetectorVariant,
    _buffer: &mut [u8],
    _frame: &GrayFrame,
    _params: &DetectParams,
) -> Result<DetectorOutput, TrackerError> {
    Err(TrackerError::DetectorUnavailable("libfacedetect is not linked".into()))
}

#[cfg(feature = "libfacedetect")]
fn dimension(name: &str, value: u32) -> Result<i32, TrackerError> {
    i32::try_from(value).map_err(|_| {
        TrackerError::InvalidConfiguration(format!(
            "frame {name} {value} exceeds the detector's range"
        ))
    })
}

/// Translates the pointer returned by a native entry point into an offset
/// within `buffer`. Null means no detection was performed.
pub fn output_from_pointer(
    buffer: &[u8],
    ptr: *const u8,
) -> Result<DetectorOutput, TrackerError> {
    if ptr.is_null() {
        return Ok(DetectorOutput::NoResult);
    }
    let start = buffer.as_ptr() as usize;
    match (ptr as usize).checked_sub(start) {
        Some(offset) if offset < buffer.len() => Ok(DetectorOutput::Written { offset }),
        _ => Err(TrackerError::BufferOverrun {
            face_count: 0,
            required_bytes: (ptr as usize).abs_diff(start),
            capacity_bytes: buffer.len(),
        }),
    }
}

#[cfg(feature = "libfacedetect")]
mod ffi {
    use std::os::raw::{c_float, c_int, c_uchar};

    use crate::detection::domain::face_detector::DetectorVariant;

    pub type EntryPoint = unsafe extern "C" fn(
        result_buffer: *mut c_uchar,
        gray_image_data: *mut c_uchar,
        width: c_int,
        height: c_int,
        step: c_int,
        scale: c_float,
        min_neighbors: c_int,
        min_object_width: c_int,
        max_object_width: c_int,
        do_landmark: c_int,
    ) -> *mut c_int;

    #[cfg_attr(target_arch = "x86_64", link(name = "facedetect-x64"))]
    #[cfg_attr(target_arch = "x86", link(name = "facedetect-x86"))]
    extern "C" {
        fn facedetect_frontal(
            result_buffer: *mut c_uchar,
            gray_image_data: *mut c_uchar,
            width: c_int,
            height: c_int,
            step: c_int,
            scale: c_float,
            min_neighbors: c_int,
            min_object_width: c_int,
            max_object_width: c_int,
            do_landmark: c_int,
        ) -> *mut c_int;

        fn facedetect_frontal_surveillance(
            result_buffer: *mut c_uchar,
            gray_image_data: *mut c_uchar,
            width: c_int,
            height: c_int,
            step: c_int,
            scale: c_float,
            min_neighbors: c_int,
            min_object_width: c_int,
            max_object_width: c_int,
            do_landmark: c_int,
        ) -> *mut c_int;

        fn facedetect_multiview(
            result_buffer: *mut c_uchar,
            gray_image_data: *mut c_uchar,
            width: c_int,
            height: c_int,
            step: c_int,
            scale: c_float,
            min_neighbors: c_int,
            min_object_width: c_int,
            max_object_width: c_int,
            do_landmark: c_int,
        ) -> *mut c_int;

        fn facedetect_multiview_reinforce(
            result_buffer: *mut c_uchar,
            gray_image_data: *mut c_uchar,
            width: c_int,
            height: c_int,
            step: c_int,
            scale: c_float,
            min_neighbors: c_int,
            min_object_width: c_int,
            max_object_width: c_int,
            do_landmark: c_int,
        ) -> *mut c_int;
    }

    pub fn entry_point(variant: DetectorVariant) -> EntryPoint {
        match variant {
            DetectorVariant::Frontal => facedetect_frontal,
            DetectorVariant::FrontalSurveillance => facedetect_frontal_surveillance,
            DetectorVariant::MultiView => facedetect_multiview,
            DetectorVariant::MultiViewReinforce => facedetect_multiview_reinforce,
        }
    }
}
