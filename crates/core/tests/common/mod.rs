use facetrack_core::shared::constants::{LANDMARK_COUNT, SLOT_BYTES};
use facetrack_core::shared::gray_frame::GrayFrame;

/// Serializes a result as the detector would lay it out: header, records,
/// then one landmark block per face when `landmarks` holds one entry per face.
pub fn result_dump(records: &[[i32; 6]], landmarks: Option<&[Vec<(i32, i32)>]>) -> Vec<u8> {
    let mut slots = vec![records.len() as i32];
    for r in records {
        slots.extend_from_slice(r);
    }
    if let Some(blocks) = landmarks {
        for block in blocks {
            assert_eq!(block.len(), LANDMARK_COUNT);
            for &(x, y) in block {
                slots.push(x);
                slots.push(y);
            }
        }
    }
    let mut bytes = Vec::with_capacity(slots.len() * SLOT_BYTES);
    for v in slots {
        bytes.extend_from_slice(&v.to_ne_bytes());
    }
    bytes
}

pub fn landmark_block(seed: i32) -> Vec<(i32, i32)> {
    (0..LANDMARK_COUNT as i32)
        .map(|j| (seed + j, seed - j))
        .collect()
}

pub fn gray_frame(width: u32, height: u32) -> GrayFrame {
    GrayFrame::new(vec![128u8; (width * height) as usize], width, height).unwrap()
}
