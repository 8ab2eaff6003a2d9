//! Decodes the detector's result buffer into owned face records.
//!
//! Layout, one native-endian `i32` per slot:
//!
//! ```text
//! slot 0                     face count k
//! slots 1 .. 1+6k            k records of [x, y, width, height, neighbors, angle]
//! slots 1+6k .. 1+6k+2Lk     (landmarks only) k blocks of L (x, y) pairs
//! ```
//!
//! The full extent is checked against the view before any record is read,
//! so a decode either yields every face or none.

use crate::detection::domain::detected_face::DetectedFace;
use crate::detection::domain::face_detector::DetectorOutput;
use crate::shared::constants::{LANDMARK_SLOTS, RECORD_SLOTS, SLOT_BYTES};
use crate::shared::tracker_error::TrackerError;

const RECORD_BYTES: usize = RECORD_SLOTS * SLOT_BYTES;
const LANDMARK_BLOCK_BYTES: usize = LANDMARK_SLOTS * SLOT_BYTES;
const POINT_BYTES: usize = 2 * SLOT_BYTES;

/// Decodes a detector output against the buffer it was written into.
///
/// `NoResult` yields an empty list. A `Written` offset outside the buffer is
/// an overrun.
pub fn decode_output(
    buffer: &[u8],
    output: DetectorOutput,
    landmarks: bool,
) -> Result<Vec<DetectedFace>, TrackerError> {
    match output {
        DetectorOutput::NoResult => Ok(Vec::new()),
        DetectorOutput::Written { offset } => {
            let view = buffer.get(offset..).ok_or(TrackerError::BufferOverrun {
                face_count: 0,
                required_bytes: offset.saturating_add(SLOT_BYTES),
                capacity_bytes: buffer.len(),
            })?;
            decode(view, landmarks)
        }
    }
}

/// Decodes one frame's result view, preserving emission order.
///
/// When `landmarks` is false the landmark region is never read.
pub fn decode(view: &[u8], landmarks: bool) -> Result<Vec<DetectedFace>, TrackerError> {
    let header = view.get(..SLOT_BYTES).ok_or(TrackerError::BufferOverrun {
        face_count: 0,
        required_bytes: SLOT_BYTES,
        capacity_bytes: view.len(),
    })?;
    let face_count = slot_value(header);

    let required = match required_bytes(face_count, landmarks) {
        Some(needed) if needed <= view.len() => needed,
        needed => {
            return Err(TrackerError::BufferOverrun {
                face_count,
                required_bytes: needed.unwrap_or(usize::MAX),
                capacity_bytes: view.len(),
            })
        }
    };

    let count = face_count as usize;
    let body = &view[SLOT_BYTES..required];
    let (records, landmark_block) = body.split_at(count * RECORD_BYTES);

    let mut blocks = landmark_block.chunks_exact(LANDMARK_BLOCK_BYTES);
    let mut faces = Vec::with_capacity(count);
    for chunk in records.chunks_exact(RECORD_BYTES) {
        let points = match blocks.next() {
            Some(block) => decode_points(block),
            None => Vec::new(),
        };
        faces.push(DetectedFace::from_record(decode_record(chunk), points));
    }
    Ok(faces)
}

/// Bytes a result with `face_count` faces occupies, header included.
/// `None` for negative counts or sizes that overflow `usize`.
pub fn required_bytes(face_count: i32, landmarks: bool) -> Option<usize> {
    let count = usize::try_from(face_count).ok()?;
    let per_face = if landmarks {
        RECORD_SLOTS + LANDMARK_SLOTS
    } else {
        RECORD_SLOTS
    };
    count
        .checked_mul(per_face)?
        .checked_add(1)?
        .checked_mul(SLOT_BYTES)
}

fn decode_record(chunk: &[u8]) -> [i32; RECORD_SLOTS] {
    let mut record = [0i32; RECORD_SLOTS];
    for (dst, src) in record.iter_mut().zip(chunk.chunks_exact(SLOT_BYTES)) {
        *dst = slot_value(src);
    }
    record
}

fn decode_points(block: &[u8]) -> Vec<(i32, i32)> {
    block
        .chunks_exact(POINT_BYTES)
        .map(|p| (slot_value(&p[..SLOT_BYTES]), slot_value(&p[SLOT_BYTES..])))
        .collect()
}

fn slot_value(src: &[u8]) -> i32 {
    i32::from_ne_bytes([src[0], src[1], src[2], src[3]])
}
