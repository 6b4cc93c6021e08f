use serde::{Deserialize, Serialize};

/// Hand side as reported by the landmark model, after the horizontal flip
/// applied to the camera image.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Handedness {
    Left,
    Right,
}

impl Handedness {
    pub fn as_str(&self) -> &'static str {
        match self {
            Handedness::Left => "Left",
            Handedness::Right => "Right",
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        match label {
            "Left" => Some(Handedness::Left),
            "Right" => Some(Handedness::Right),
            _ => None,
        }
    }
}

/// Debounced gesture vocabulary. The wire labels are the exact strings the
/// tracker prints, so they double as the protocol encoding.
///
/// `PointingUp`, `PointingDown` and `ThumbsUp` only appear when the tracker
/// runs with the pointing vocabulary enabled; `NoHand` is the placeholder
/// for an absent side on a status line.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gesture {
    OpenHand,
    ClosedFist,
    OneFinger,
    TwoFingers,
    ThreeFingers,
    FourFingers,
    PointingUp,
    PointingDown,
    ThumbsUp,
    Other,
    NoHand,
}

impl Gesture {
    pub fn as_str(&self) -> &'static str {
        match self {
            Gesture::OpenHand => "Open Hand",
            Gesture::ClosedFist => "Closed Fist",
            Gesture::OneFinger => "One Finger",
            Gesture::TwoFingers => "Two Fingers",
            Gesture::ThreeFingers => "Three Fingers",
            Gesture::FourFingers => "Four Fingers",
            Gesture::PointingUp => "Pointing Up",
            Gesture::PointingDown => "Pointing Down",
            Gesture::ThumbsUp => "Thumbs Up",
            Gesture::Other => "Other",
            Gesture::NoHand => "No Hand",
        }
    }

    /// Unknown labels resolve to `Other` rather than failing: a newer
    /// tracker may emit labels this controller does not know about, and an
    /// unrecognized gesture must behave like one that matched no action.
    pub fn from_label(label: &str) -> Self {
        match label {
            "Open Hand" => Gesture::OpenHand,
            "Closed Fist" => Gesture::ClosedFist,
            "One Finger" => Gesture::OneFinger,
            "Two Fingers" => Gesture::TwoFingers,
            "Three Fingers" => Gesture::ThreeFingers,
            "Four Fingers" => Gesture::FourFingers,
            "Pointing Up" => Gesture::PointingUp,
            "Pointing Down" => Gesture::PointingDown,
            "Thumbs Up" => Gesture::ThumbsUp,
            "No Hand" => Gesture::NoHand,
            _ => Gesture::Other,
        }
    }
}
