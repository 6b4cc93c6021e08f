use crate::landmarks::{index, Landmarks};
use shared::Handedness;

pub const THUMB: usize = 0;
pub const INDEX: usize = 1;
pub const MIDDLE: usize = 2;
pub const RING: usize = 3;
pub const PINKY: usize = 4;

/// Per-finger up/down states ordered [thumb, index, middle, ring, pinky].
///
/// The thumb flexes laterally, so it is judged on the horizontal axis (tip
/// vs interphalangeal joint), with the comparison direction mirrored
/// between hands to match the horizontally flipped camera image. The other
/// four fingers are up when the fingertip sits above its PIP joint
/// (smaller y is higher in image space).
pub fn finger_states(landmarks: &Landmarks, handedness: Handedness) -> [bool; 5] {
    let thumb_tip_x = landmarks[index::THUMB_TIP][0];
    let thumb_ip_x = landmarks[index::THUMB_IP][0];
    let thumb_up = match handedness {
        Handedness::Right => thumb_tip_x < thumb_ip_x,
        Handedness::Left => thumb_tip_x > thumb_ip_x,
    };

    let up = |tip: usize, pip: usize| landmarks[tip][1] < landmarks[pip][1];

    [
        thumb_up,
        up(index::INDEX_TIP, index::INDEX_PIP),
        up(index::MIDDLE_TIP, index::MIDDLE_PIP),
        up(index::RING_TIP, index::RING_PIP),
        up(index::PINKY_TIP, index::PINKY_PIP),
    ]
}

pub fn count_up(fingers: &[bool; 5]) -> usize {
    fingers.iter().filter(|&&up| up).count()
}
