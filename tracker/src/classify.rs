use crate::fingers::{count_up, INDEX, MIDDLE, PINKY, RING, THUMB};
use crate::landmarks::{index, Landmarks};
use shared::Gesture;

/// Which gesture set a classifier run produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Vocabulary {
    Basic,
    Pointing,
}

impl Vocabulary {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "basic" => Some(Vocabulary::Basic),
            "pointing" => Some(Vocabulary::Pointing),
            _ => None,
        }
    }
}

/// Count-first classification: the total decides the candidate, then the
/// exact finger identities are verified. A count match with a non-canonical
/// combination (say two up fingers that are thumb and pinky) falls through
/// to `Other`.
pub fn classify(fingers: &[bool; 5]) -> Gesture {
    match count_up(fingers) {
        5 => Gesture::OpenHand,
        0 => Gesture::ClosedFist,
        1 if fingers[THUMB] || fingers[INDEX] => Gesture::OneFinger,
        2 if fingers[INDEX] && fingers[MIDDLE] => Gesture::TwoFingers,
        3 if fingers[INDEX] && fingers[MIDDLE] && fingers[RING] => Gesture::ThreeFingers,
        4 if fingers[INDEX] && fingers[MIDDLE] && fingers[RING] && fingers[PINKY] => {
            Gesture::FourFingers
        }
        _ => Gesture::Other,
    }
}

/// Extended vocabulary that splits pointing direction and thumbs-up out of
/// the one-finger and fist buckets. A tolerance band derived from the
/// index finger's own joint spacing separates "finger drooping below the
/// fist line" from "finger pointing down"; the band scale is a tuned
/// heuristic, not geometry.
pub fn classify_pointing(fingers: &[bool; 5], landmarks: &Landmarks, buffer_scale: f32) -> Gesture {
    let tip_y = landmarks[index::INDEX_TIP][1];
    let pip_y = landmarks[index::INDEX_PIP][1];
    let mcp_y = landmarks[index::INDEX_MCP][1];
    let buffer = buffer_scale * (pip_y - mcp_y).abs();

    match classify(fingers) {
        Gesture::OneFinger if fingers[INDEX] => {
            if tip_y + buffer < pip_y {
                Gesture::PointingUp
            } else {
                Gesture::OneFinger
            }
        }
        Gesture::OneFinger => Gesture::ThumbsUp,
        Gesture::ClosedFist => {
            if tip_y > pip_y + buffer {
                Gesture::PointingDown
            } else {
                Gesture::ClosedFist
            }
        }
        gesture => gesture,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_hand_and_fist() {
        assert_eq!(classify(&[true; 5]), Gesture::OpenHand);
        assert_eq!(classify(&[false; 5]), Gesture::ClosedFist);
    }

    #[test]
    fn test_canonical_counts() {
        assert_eq!(classify(&[false, true, false, false, false]), Gesture::OneFinger);
        assert_eq!(classify(&[true, false, false, false, false]), Gesture::OneFinger);
        assert_eq!(classify(&[false, true, true, false, false]), Gesture::TwoFingers);
        assert_eq!(classify(&[false, true, true, true, false]), Gesture::ThreeFingers);
        assert_eq!(classify(&[false, true, true, true, true]), Gesture::FourFingers);
    }

    #[test]
    fn test_non_canonical_combinations_are_other() {
        // Two up, but thumb + pinky rather than index + middle.
        assert_eq!(classify(&[true, false, false, false, true]), Gesture::Other);
        // Three up without the ring finger.
        assert_eq!(classify(&[false, true, true, false, true]), Gesture::Other);
        // Four up including the thumb but missing the pinky.
        assert_eq!(classify(&[true, true, true, true, false]), Gesture::Other);
        // One up that is neither thumb nor index.
        assert_eq!(classify(&[false, false, false, false, true]), Gesture::Other);
    }

    fn index_geometry(tip_y: f32) -> Landmarks {
        let mut lm = [[0.5, 0.5, 0.0]; 21];
        lm[index::INDEX_MCP][1] = 0.50;
        lm[index::INDEX_PIP][1] = 0.40;
        lm[index::INDEX_TIP][1] = tip_y;
        lm
    }

    #[test]
    fn test_pointing_up_beyond_buffer() {
        // Joint spacing 0.1 gives a 0.05 band; tip well above PIP.
        let lm = index_geometry(0.20);
        let fingers = [false, true, false, false, false];
        assert_eq!(classify_pointing(&fingers, &lm, 0.5), Gesture::PointingUp);
    }

    #[test]
    fn test_index_barely_up_stays_one_finger() {
        let lm = index_geometry(0.38);
        let fingers = [false, true, false, false, false];
        assert_eq!(classify_pointing(&fingers, &lm, 0.5), Gesture::OneFinger);
    }

    #[test]
    fn test_thumb_only_is_thumbs_up() {
        let lm = index_geometry(0.60);
        let fingers = [true, false, false, false, false];
        assert_eq!(classify_pointing(&fingers, &lm, 0.5), Gesture::ThumbsUp);
    }

    #[test]
    fn test_drooping_index_is_still_fist() {
        // Tip below PIP but inside the band.
        let lm = index_geometry(0.43);
        let fingers = [false; 5];
        assert_eq!(classify_pointing(&fingers, &lm, 0.5), Gesture::ClosedFist);
    }

    #[test]
    fn test_index_well_below_fist_line_points_down() {
        let lm = index_geometry(0.60);
        let fingers = [false; 5];
        assert_eq!(classify_pointing(&fingers, &lm, 0.5), Gesture::PointingDown);
    }

    #[test]
    fn test_vocabulary_names() {
        assert_eq!(Vocabulary::from_name("basic"), Some(Vocabulary::Basic));
        assert_eq!(Vocabulary::from_name("pointing"), Some(Vocabulary::Pointing));
        assert_eq!(Vocabulary::from_name("semaphore"), None);
    }
}
